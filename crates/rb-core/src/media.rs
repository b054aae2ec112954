//! Media-domain value types: content ratings and release dates.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static RELEASE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date pattern"));

/// Parse a release date given strictly as `YYYY-MM-DD`.
///
/// Fields must be zero-padded: `2023-05-10` is accepted, `2023-5-10` is not.
pub fn parse_release_date(value: &str) -> Result<NaiveDate> {
    let invalid = || Error::validation(format!("{value} is not in the form of %Y-%m-%d"));
    if !RELEASE_DATE_RE.is_match(value) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())
}

/// Values a release date can be assigned from: a structured date or its
/// `YYYY-MM-DD` text form.
pub trait IntoReleaseDate {
    fn into_release_date(self) -> Result<NaiveDate>;
}

impl IntoReleaseDate for NaiveDate {
    fn into_release_date(self) -> Result<NaiveDate> {
        Ok(self)
    }
}

impl IntoReleaseDate for &str {
    fn into_release_date(self) -> Result<NaiveDate> {
        parse_release_date(self)
    }
}

impl IntoReleaseDate for String {
    fn into_release_date(self) -> Result<NaiveDate> {
        parse_release_date(&self)
    }
}

// ---------------------------------------------------------------------------
// Rating
// ---------------------------------------------------------------------------

/// Content rating (MPAA and US TV parental guidelines).
///
/// The declaration order defines the integer code persisted in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Rating {
    #[serde(rename = "G")]
    G,
    #[serde(rename = "NC-17")]
    Nc17,
    #[serde(rename = "PG")]
    Pg,
    #[serde(rename = "PG-13")]
    Pg13,
    #[serde(rename = "R")]
    R,
    #[serde(rename = "UR")]
    #[default]
    Ur,
    #[serde(rename = "UNRATED")]
    Unrated,
    #[serde(rename = "NR")]
    Nr,
    #[serde(rename = "TV-Y")]
    TvY,
    #[serde(rename = "TV-Y7")]
    TvY7,
    #[serde(rename = "TV-Y7-FV")]
    TvY7Fv,
    #[serde(rename = "TV-G")]
    TvG,
    #[serde(rename = "TV-PG")]
    TvPg,
    #[serde(rename = "TV-14")]
    Tv14,
    #[serde(rename = "TV-MA")]
    TvMa,
}

impl Rating {
    /// All ratings in code order.
    pub const ALL: [Rating; 15] = [
        Rating::G,
        Rating::Nc17,
        Rating::Pg,
        Rating::Pg13,
        Rating::R,
        Rating::Ur,
        Rating::Unrated,
        Rating::Nr,
        Rating::TvY,
        Rating::TvY7,
        Rating::TvY7Fv,
        Rating::TvG,
        Rating::TvPg,
        Rating::Tv14,
        Rating::TvMa,
    ];

    /// Integer code stored in the database.
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::G => "G",
            Self::Nc17 => "NC-17",
            Self::Pg => "PG",
            Self::Pg13 => "PG-13",
            Self::R => "R",
            Self::Ur => "UR",
            Self::Unrated => "UNRATED",
            Self::Nr => "NR",
            Self::TvY => "TV-Y",
            Self::TvY7 => "TV-Y7",
            Self::TvY7Fv => "TV-Y7-FV",
            Self::TvG => "TV-G",
            Self::TvPg => "TV-PG",
            Self::Tv14 => "TV-14",
            Self::TvMa => "TV-MA",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| Error::validation(format!("{s} is not a known rating")))
    }
}

impl TryFrom<i64> for Rating {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| Error::validation(format!("{code} is not a known rating")))
    }
}

/// Values a rating can be assigned from: the enum itself, its literal, or
/// its integer code.
pub trait IntoRating {
    fn into_rating(self) -> Result<Rating>;
}

impl IntoRating for Rating {
    fn into_rating(self) -> Result<Rating> {
        Ok(self)
    }
}

impl IntoRating for &str {
    fn into_rating(self) -> Result<Rating> {
        self.parse()
    }
}

impl IntoRating for String {
    fn into_rating(self) -> Result<Rating> {
        self.parse()
    }
}

impl IntoRating for i64 {
    fn into_rating(self) -> Result<Rating> {
        Rating::try_from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_literal_roundtrips() {
        for rating in Rating::ALL {
            assert_eq!(rating.as_str().parse::<Rating>().unwrap(), rating);
            assert_eq!(Rating::try_from(rating.code()).unwrap(), rating);
        }
        assert_eq!(Rating::TvY7Fv.code(), 10);
    }

    #[test]
    fn unknown_ratings_fail() {
        assert!(matches!("X".parse::<Rating>(), Err(Error::Validation(_))));
        assert!(matches!("pg-13".parse::<Rating>(), Err(Error::Validation(_))));
        assert!(Rating::try_from(15).is_err());
        assert!(Rating::try_from(-1).is_err());
    }

    #[test]
    fn default_is_ur() {
        assert_eq!(Rating::default(), Rating::Ur);
    }

    #[test]
    fn serde_uses_literals() {
        let json = serde_json::to_string(&Rating::Pg13).unwrap();
        assert_eq!(json, r#""PG-13""#);
        let back: Rating = serde_json::from_str(r#""TV-MA""#).unwrap();
        assert_eq!(back, Rating::TvMa);
    }

    #[test]
    fn release_date_is_fixed_width() {
        assert_eq!(
            parse_release_date("2023-05-10").unwrap(),
            NaiveDate::from_ymd_opt(2023, 5, 10).unwrap()
        );
        for bad in ["2023-5-10", "10/05/2023", "2023-05-10T00:00:00", "", "2023-02-30"] {
            assert!(
                matches!(parse_release_date(bad), Err(Error::Validation(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
