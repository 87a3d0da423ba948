//! Quote feed port trait.

use crate::domain::error::QuoteTrackError;
use crate::domain::quote::QuoteRecord;
use chrono::NaiveDate;

pub trait QuotePort {
    /// Daily closes for `symbol` between `from` and `to` inclusive.
    ///
    /// Order is unspecified; an empty `Vec` means the feed has nothing for
    /// the window.
    fn fetch_quotes(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<QuoteRecord>, QuoteTrackError>;
}
