//! Configuration access port trait.

use chrono::NaiveDate;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    /// A `YYYY-MM-DD` value. `Some(Err(raw))` when present but unparseable.
    fn get_date(&self, section: &str, key: &str) -> Option<Result<NaiveDate, String>> {
        self.get_string(section, key).map(|raw| {
            let trimmed = raw.trim();
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| trimmed.to_string())
        })
    }

    /// Comma separated list, trimmed, empty entries kept so callers can reject them.
    fn get_list(&self, section: &str, key: &str) -> Option<Vec<String>> {
        self.get_string(section, key)
            .map(|raw| raw.split(',').map(|s| s.trim().to_string()).collect())
    }
}
