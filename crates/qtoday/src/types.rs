use std::{fmt::Display, str::FromStr};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const TITLE_NOT_FOUND: &str = "reference not found";
pub const SUBTITLE_NOT_FOUND: &str = "title not found";

#[derive(Debug, thiserror::Error)]
#[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
pub struct DateKeyParseError(String);

/// The day a devotional is requested for, rendered as `YYYY-MM-DD` in source URLs.
///
/// No timezone conversion happens anywhere: [`DateKey::today_utc`] is the UTC calendar date,
/// which can be a day behind the publisher's local date shortly after midnight KST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn today_utc() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Parses a caller-supplied date, treating a missing or blank value as today (UTC).
    pub fn from_optional(value: Option<&str>) -> Result<Self, DateKeyParseError> {
        match value.map(str::trim) {
            None | Some("") => Ok(Self::today_utc()),
            Some(s) => s.parse(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl FromStr for DateKey {
    type Err = DateKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DateKeyParseError(s.to_string()))
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub markup: String,
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Devotional {
    pub title: String,
    pub subtitle: String,
    pub verse: String,
}

impl Display for Devotional {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.subtitle)?;
        writeln!(f)?;
        write!(f, "{}", self.verse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcedDevotional {
    #[serde(flatten)]
    pub devotional: Devotional,
    pub source_url: String,
}

impl Display for SourcedDevotional {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.devotional)?;
        writeln!(f)?;
        write!(f, "Source: {}", self.source_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_key_parse_and_display() {
        let key: DateKey = " 2025-08-07 ".parse().expect("Should parse date key");
        assert_eq!(key.date(), NaiveDate::from_ymd_opt(2025, 8, 7).unwrap());
        assert_eq!(key.to_string(), "2025-08-07");
    }

    #[test]
    fn test_date_key_rejects_malformed_input() {
        assert!("2025/08/07".parse::<DateKey>().is_err());
        assert!("2025-02-30".parse::<DateKey>().is_err());
        assert!("today".parse::<DateKey>().is_err());
    }

    #[test]
    fn test_date_key_blank_defaults_to_today() {
        let today = DateKey::today_utc();
        // Guard against the test straddling midnight UTC.
        let blank = DateKey::from_optional(Some("   ")).unwrap();
        let missing = DateKey::from_optional(None).unwrap();
        assert!(blank >= today && missing >= today);
        assert!(blank.date() - today.date() <= chrono::Duration::days(1));
    }

    #[test]
    fn test_sourced_devotional_serializes_camel_case() {
        let sourced = SourcedDevotional {
            devotional: Devotional {
                title: "에스겔 21:1".to_string(),
                subtitle: "칼이 준비되었다".to_string(),
                verse: "본문".to_string(),
            },
            source_url: "https://www.duranno.com/qt/view/bible.asp".to_string(),
        };

        let json = serde_json::to_value(&sourced).expect("Should serialize");
        assert_eq!(json["title"], "에스겔 21:1");
        assert_eq!(json["subtitle"], "칼이 준비되었다");
        assert_eq!(json["verse"], "본문");
        assert_eq!(json["sourceUrl"], "https://www.duranno.com/qt/view/bible.asp");
    }
}
