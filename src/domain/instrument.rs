//! Instrument descriptors advertised as measurements of the track.

pub const DEFAULT_CHART_TYPE: &str = "Line Track";

#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    /// Column id, lower case (e.g. `aapl`).
    pub id: String,
    /// Display name (e.g. `AAPL`).
    pub name: String,
    pub datasource: String,
    pub datasource_group: String,
    pub default_chart_type: String,
    pub min_value: f64,
    pub max_value: f64,
    pub metadata: Vec<String>,
}

impl Instrument {
    /// A stock measurement belonging to the `datasource` track.
    pub fn stock(id: &str, name: &str, datasource: &str, min_value: f64, max_value: f64) -> Self {
        Self {
            id: id.to_lowercase(),
            name: name.to_string(),
            datasource: datasource.to_string(),
            datasource_group: datasource.to_string(),
            default_chart_type: DEFAULT_CHART_TYPE.to_string(),
            min_value,
            max_value,
            metadata: vec!["date".to_string()],
        }
    }

    /// Ticker the feed is queried with.
    pub fn symbol(&self) -> String {
        self.id.to_uppercase()
    }
}

pub fn default_instruments(datasource: &str) -> Vec<Instrument> {
    vec![
        Instrument::stock("aapl", "AAPL", datasource, 0.0, 600.0),
        Instrument::stock("amzn", "AMZN", datasource, 0.0, 300.0),
    ]
}

/// Case-insensitive lookup by id.
pub fn find<'a>(instruments: &'a [Instrument], id: &str) -> Option<&'a Instrument> {
    instruments.iter().find(|i| i.id.eq_ignore_ascii_case(id))
}
