//! Liturgical content: a Mass and its readings, and the calendar that supplies them.

use async_trait::async_trait;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One reading within a section, e.g. the citation `Jer 31:31-34` and its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub citation: String,
    pub text: String,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.citation)
    }
}

/// A titled part of the Mass such as "Reading I" or "Gospel".
///
/// Sections with alternatives (e.g. a longer and a shorter Gospel) carry several readings, in
/// the order the provider lists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub header: String,
    pub readings: Vec<Reading>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mass {
    pub date: Option<Date>,
    /// Liturgical name of the day, e.g. "Fifth Sunday of Lent".
    pub title: Option<String>,
    /// Where the readings were published.
    pub url: String,
    pub sections: Vec<Section>,
}

/// Which of a day's Masses to look up when a day has more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum MassType {
    /// The day's only (or principal) Mass.
    Default,
    Vigil,
    Night,
    Dawn,
    Day,
}

impl MassType {
    /// Suffix the readings site appends to the page name for this Mass.
    pub fn url_suffix(self) -> &'static str {
        match self {
            Self::Default => "",
            Self::Vigil => "-Vigil",
            Self::Night => "-Night",
            Self::Dawn => "-Dawn",
            Self::Day => "-Day",
        }
    }
}

/// Source of liturgical dates and Mass content.
#[async_trait]
pub trait LiturgicalCalendar: Send + Sync {
    /// Today's date in the parish's time zone.
    fn today(&self) -> Date;

    /// The Sundays in `[start, end]`; `end` defaults to four weeks after `start`.
    fn sunday_mass_dates(&self, start: Date, end: Option<Date>) -> Vec<Date> {
        let end = end.unwrap_or_else(|| crate::schedule::default_window_end(start));
        crate::schedule::sundays_between(start, end)
    }

    /// Looks up the Mass celebrated on `date`.
    ///
    /// With `types` empty the default Mass of the day is used; otherwise each type is tried in
    /// order and the first one found wins. `Ok(None)` means the provider has nothing for that
    /// date.
    async fn mass_from_date(&self, date: Date, types: &[MassType]) -> eyre::Result<Option<Mass>>;
}
