use chrono::{DateTime, Utc};

/// Display format for a show's start time, e.g. `21-05-2035 (20:30)`.
pub const START_TIME_FORMAT: &str = "%d-%m-%Y (%H:%M)";

pub fn format_start_time(show_date: &DateTime<Utc>) -> String {
    show_date.format(START_TIME_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    Past,
    Upcoming,
}

/// Classifies a show relative to `now`. Both comparisons are strict, so a
/// show starting exactly at `now` is neither past nor upcoming.
pub fn classify(show_date: &DateTime<Utc>, now: &DateTime<Utc>) -> Option<Timing> {
    if show_date > now {
        Some(Timing::Upcoming)
    } else if show_date < now {
        Some(Timing::Past)
    } else {
        None
    }
}

/// Splits dated entries into `(past, upcoming)`, preserving input order.
pub fn partition<T>(
    entries: impl IntoIterator<Item = (DateTime<Utc>, T)>,
    now: &DateTime<Utc>,
) -> (Vec<T>, Vec<T>) {
    let mut past = Vec::new();
    let mut upcoming = Vec::new();

    for (show_date, entry) in entries {
        match classify(&show_date, now) {
            Some(Timing::Past) => past.push(entry),
            Some(Timing::Upcoming) => upcoming.push(entry),
            None => {}
        }
    }

    (past, upcoming)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_start_time() {
        let date = Utc.with_ymd_and_hms(2035, 5, 21, 20, 30, 0).unwrap();
        assert_eq!(format_start_time(&date), "21-05-2035 (20:30)");
    }

    #[test]
    fn test_classify() {
        let now = now();
        assert_eq!(
            classify(&(now + Duration::seconds(1)), &now),
            Some(Timing::Upcoming)
        );
        assert_eq!(
            classify(&(now - Duration::seconds(1)), &now),
            Some(Timing::Past)
        );
    }

    #[test]
    fn test_classify_exactly_now_is_neither() {
        let now = now();
        assert_eq!(classify(&now, &now), None);
    }

    #[test]
    fn test_partition_keeps_order() {
        let now = now();
        let entries = vec![
            (now - Duration::days(2), "a"),
            (now + Duration::days(1), "b"),
            (now, "c"),
            (now - Duration::days(1), "d"),
            (now + Duration::days(3), "e"),
        ];

        let (past, upcoming) = partition(entries, &now);

        assert_eq!(past, vec!["a", "d"]);
        assert_eq!(upcoming, vec!["b", "e"]);
    }

    #[test]
    fn test_partition_empty() {
        let (past, upcoming) = partition(Vec::<(DateTime<Utc>, ())>::new(), &now());
        assert!(past.is_empty());
        assert!(upcoming.is_empty());
    }
}
