//! Airport and country identifiers.

use anyhow::Error;
use derive_more::Display;
use std::str::FromStr;

/// A 3-letter IATA airport code, always upper case.
#[derive(Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Iata(String);

impl FromStr for Iata {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(Error::msg(format!(
                "invalid IATA airport code {s:?}: expected 3 letters"
            )))
        }
    }
}

impl Iata {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A 4-character ICAO location indicator, always upper case.
#[derive(Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Icao(String);

impl FromStr for Icao {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() == 4 && code.chars().all(|c| c.is_ascii_alphanumeric()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(Error::msg(format!(
                "invalid ICAO location indicator {s:?}: expected 4 letters or digits"
            )))
        }
    }
}

impl Icao {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The country name "United" on its own, which could mean several countries.
#[derive(Clone, Copy, Debug, Display)]
#[display(fmt = "United What? You can also use: US,USA,UK,UAE")]
pub struct AmbiguousCountry;

impl std::error::Error for AmbiguousCountry {}

/// A country, as named on the FlightRadar24 airport directory.
///
/// Common abbreviations are expanded when parsing, so `USA` becomes `United States`.
#[derive(Clone, Debug, Display, PartialEq, Eq, Hash)]
pub struct Country(String);

impl FromStr for Country {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(Error::msg("country name cannot be empty"));
        }
        // The name becomes a single path segment of the local replay layout.
        if name.contains(['/', '\\']) || name.chars().all(|c| c == '.') {
            return Err(Error::msg(format!("invalid country name {s:?}")));
        }
        let name = match name.to_ascii_uppercase().as_str() {
            "US" | "USA" => "United States".to_string(),
            "UK" => "United Kingdom".to_string(),
            "UAE" => "United Arab Emirates".to_string(),
            "UNITED" => return Err(AmbiguousCountry.into()),
            _ => name.to_string(),
        };
        Ok(Self(name))
    }
}

impl Country {
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The path segment used for this country in FlightRadar24 web URLs.
    pub fn slug(&self) -> String {
        self.0
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase()
    }
}

/// Which of an airport's flight boards to show.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Board {
    Arrivals,
    Departures,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_iata_normalized() {
        let code: Iata = " cph ".parse().unwrap();
        assert_eq!(code.as_str(), "CPH");
        assert_eq!(code.to_string(), "CPH");
    }

    #[test]
    fn test_iata_rejects_bad_codes() {
        for bad in ["", "CP", "COPH", "C1H", "ÆØÅ"] {
            assert!(bad.parse::<Iata>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_icao_allows_digits() {
        assert_eq!("k1g4".parse::<Icao>().unwrap().as_str(), "K1G4");
        assert!("EKC".parse::<Icao>().is_err());
    }

    #[test]
    fn test_country_aliases() {
        for (alias, name) in [
            ("US", "United States"),
            ("usa", "United States"),
            ("UK", "United Kingdom"),
            ("UAE", "United Arab Emirates"),
            ("Denmark", "Denmark"),
        ] {
            assert_eq!(alias.parse::<Country>().unwrap().name(), name);
        }
    }

    #[test]
    fn test_ambiguous_country() {
        let err = "United".parse::<Country>().unwrap_err();
        assert!(err.is::<AmbiguousCountry>());
        assert_eq!(err.to_string(), "United What? You can also use: US,USA,UK,UAE");
    }

    #[test]
    fn test_country_rejects_paths() {
        for bad in ["../../escaped", "..", ".", "Bosnia/Herzegovina", "a\\b"] {
            let err = bad.parse::<Country>().unwrap_err();
            assert!(!err.is::<AmbiguousCountry>(), "{bad}");
        }
        assert_eq!(
            "St. Lucia".parse::<Country>().unwrap().slug(),
            "st.-lucia"
        );
    }

    #[test]
    fn test_country_slug() {
        let country: Country = "United  Arab Emirates".parse().unwrap();
        assert_eq!(country.slug(), "united-arab-emirates");
    }

    #[test]
    fn test_board_names() {
        assert_eq!(Board::Arrivals.to_string(), "arrivals");
        assert_eq!("departures".parse::<Board>().unwrap(), Board::Departures);
        let name: &'static str = Board::Departures.into();
        assert_eq!(name, "departures");
    }
}
