use chrono::{Datelike, Days, NaiveDate};

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date - Days::new(offset)
}

/// Sunday of the week containing `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Days::new(6)
}

/// Canonical `YYYY-MM-DD` key. This is the only date representation
/// that is persisted or compared, so lexical order equals
/// chronological order.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn week_start_is_always_monday() {
        // 2024-01-01 is a Monday; walk a few weeks of days
        let mut date = d("2024-01-01");
        for _ in 0..21 {
            let start = week_start(date);
            assert_eq!(start.weekday(), Weekday::Mon);
            assert!(start <= date);
            assert!(date <= week_end(date));
            date = date + Days::new(1);
        }
    }

    #[test]
    fn monday_input_is_its_own_week_start() {
        let monday = d("2024-01-15");
        assert_eq!(monday.weekday(), Weekday::Mon);
        assert_eq!(week_start(monday), monday);
        assert_eq!(week_end(monday), d("2024-01-21"));
    }

    #[test]
    fn sunday_input_belongs_to_the_preceding_monday() {
        let sunday = d("2024-01-21");
        assert_eq!(sunday.weekday(), Weekday::Sun);
        assert_eq!(week_start(sunday), d("2024-01-15"));
        assert_eq!(week_end(sunday), sunday);
    }

    #[test]
    fn all_days_of_a_week_share_a_start() {
        let monday = d("2024-03-04");
        for offset in 0..7 {
            let day = monday + Days::new(offset);
            assert_eq!(week_start(day), monday);
        }
    }

    #[test]
    fn week_end_is_start_plus_six() {
        for date in ["2024-02-29", "2023-12-31", "2025-01-01", "2024-06-12"] {
            let date = d(date);
            assert_eq!(week_end(date), week_start(date) + Days::new(6));
        }
    }

    #[test]
    fn week_spanning_year_boundary() {
        // 2024-12-30 is a Monday; the week runs into 2025
        assert_eq!(week_start(d("2025-01-01")), d("2024-12-30"));
        assert_eq!(week_end(d("2024-12-30")), d("2025-01-05"));
    }

    #[test]
    fn date_key_is_zero_padded() {
        assert_eq!(date_key(d("2024-01-05")), "2024-01-05");
        assert_eq!(date_key(d("2024-11-25")), "2024-11-25");
    }
}
