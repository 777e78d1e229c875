use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, BookingResult};
use crate::services::artist::{Artist, ArtistInput};
use crate::services::show::NewShow;
use crate::services::venue::{Venue, VenueInput};

/// Value a checked checkbox submits.
const CHECKED: &str = "y";

/// Layouts accepted for a show's start time when no offset is given (read as UTC).
const START_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Layout used when pre-filling a show's start time.
const START_TIME_FORM_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn is_checked(value: Option<&str>) -> bool {
    value == Some(CHECKED)
}

fn checkbox(checked: bool) -> Option<String> {
    checked.then(|| CHECKED.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_genres(genres: Vec<String>) -> Vec<String> {
    genres
        .into_iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

/// Form pre-filled with a stored record, as served by the edit routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditPage<F> {
    pub id: i64,
    pub form: F,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seeking_talent: Option<String>,
    pub seeking_talent_description: Option<String>,
}

impl From<VenueForm> for VenueInput {
    fn from(form: VenueForm) -> Self {
        Self {
            seeking_talent: is_checked(form.seeking_talent.as_deref()),
            name: form.name.trim().to_string(),
            city: non_blank(form.city),
            state: non_blank(form.state),
            address: non_blank(form.address),
            phone: non_blank(form.phone),
            genres: clean_genres(form.genres),
            image_link: non_blank(form.image_link),
            website: non_blank(form.website),
            seeking_talent_description: non_blank(form.seeking_talent_description),
            facebook_link: non_blank(form.facebook_link),
        }
    }
}

impl From<Venue> for VenueForm {
    fn from(venue: Venue) -> Self {
        Self {
            name: venue.name,
            city: venue.city,
            state: venue.state,
            address: venue.address,
            phone: venue.phone,
            genres: venue.genres,
            image_link: venue.image_link,
            website: venue.website,
            facebook_link: venue.facebook_link,
            seeking_talent: checkbox(venue.seeking_talent),
            seeking_talent_description: venue.seeking_talent_description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seeking_venue: Option<String>,
    pub seeking_venue_description: Option<String>,
}

impl From<ArtistForm> for ArtistInput {
    fn from(form: ArtistForm) -> Self {
        Self {
            seeking_venue: is_checked(form.seeking_venue.as_deref()),
            name: form.name.trim().to_string(),
            city: non_blank(form.city),
            state: non_blank(form.state),
            phone: non_blank(form.phone),
            genres: clean_genres(form.genres),
            image_link: non_blank(form.image_link),
            website: non_blank(form.website),
            facebook_link: non_blank(form.facebook_link),
            seeking_venue_description: non_blank(form.seeking_venue_description),
        }
    }
}

impl From<Artist> for ArtistForm {
    fn from(artist: Artist) -> Self {
        Self {
            name: artist.name,
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            genres: artist.genres,
            image_link: artist.image_link,
            website: artist.website,
            facebook_link: artist.facebook_link,
            seeking_venue: checkbox(artist.seeking_venue),
            seeking_venue_description: artist.seeking_venue_description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

impl ShowForm {
    /// Blank form whose start time defaults to `now`.
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            start_time: now.format(START_TIME_FORM_FORMAT).to_string(),
            ..Default::default()
        }
    }
}

impl TryFrom<ShowForm> for NewShow {
    type Error = BookingError;

    fn try_from(form: ShowForm) -> BookingResult<Self> {
        Ok(Self {
            venue_id: parse_id("venue_id", &form.venue_id)?,
            artist_id: parse_id("artist_id", &form.artist_id)?,
            show_date: parse_start_time(&form.start_time)?,
        })
    }
}

fn parse_id(field: &str, value: &str) -> BookingResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| {
            BookingError::Validation(format!("{field} must be a numeric ID, got {value:?}"))
        })
}

pub fn parse_start_time(value: &str) -> BookingResult<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(&Utc));
    }

    START_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            BookingError::Validation(format!("start_time {value:?} is not a valid date"))
        })
}
