use serde::{Deserialize, Serialize};

pub mod artist;
pub mod query;
pub mod schedule;
pub mod show;
pub mod venue;

/// `{id, name}` pair used by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchHit>,
}

impl SearchResults {
    pub fn new(data: Vec<SearchHit>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Serialize genres for the TEXT column.
pub(crate) fn encode_genres(genres: &[String]) -> String {
    serde_json::to_string(genres).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn decode_genres(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        log::warn!("Ignoring malformed genres column {:?}: {}", raw, e);
        Vec::new()
    })
}

/// Rejects records whose name is missing or whitespace only.
pub(crate) fn require_name(name: &str) -> crate::error::BookingResult<()> {
    if name.trim().is_empty() {
        return Err(crate::error::BookingError::Validation(
            "name must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genres_round_trip() {
        let genres = vec!["Jazz".to_string(), "Hip-Hop".to_string()];
        assert_eq!(decode_genres(&encode_genres(&genres)), genres);
    }

    #[test]
    fn test_decode_malformed_genres() {
        assert!(decode_genres("Jazz, Rock").is_empty());
        assert!(decode_genres("").is_empty());
    }

    #[test]
    fn test_require_name() {
        assert!(require_name("The Dueling Pianos Bar").is_ok());
        assert!(require_name("   ").is_err());
        assert!(require_name("").is_err());
    }

    #[test]
    fn test_search_results_count() {
        let results = SearchResults::new(vec![SearchHit {
            id: 1,
            name: "Park Square Live".into(),
            num_upcoming_shows: 2,
        }]);
        assert_eq!(results.count, 1);
    }
}
