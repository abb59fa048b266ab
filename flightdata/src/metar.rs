//! Decoding METAR surface weather reports.
//!
//! A METAR is a sequence of whitespace separated groups in a fixed order, for example
//!
//! ```text
//! METAR EKCH 081050Z AUTO 24010G20KT 200V270 9999 -SHRA FEW012 BKN030CB 05/03 Q1012 NOSIG
//! ```
//!
//! [`Metar::parse`] walks the groups in that order. Groups it does not recognize, or which are out
//! of order, are kept in [`Metar::unparsed`] instead of failing the whole report, since real
//! reports often carry regional extensions. The [`Display`](std::fmt::Display) implementation
//! prints a multi-line human readable report.

use derive_more::Display;
use serde::Serialize;
use std::str::FromStr;
use strum::{EnumIter, EnumString, IntoEnumIterator};

mod report;

/// A report which cannot be decoded at all.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum MetarError {
    #[display(fmt = "empty METAR report")]
    Empty,
    #[display(fmt = "METAR report has no station identifier")]
    MissingStation,
    #[display(fmt = "invalid METAR observation time {:?}", _0)]
    BadTime(String),
}

impl std::error::Error for MetarError {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ReportType {
    /// A routine report.
    #[default]
    Metar,
    /// A special report, issued when conditions change significantly.
    Speci,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, EnumString)]
pub enum Modifier {
    #[strum(serialize = "AUTO")]
    Automatic,
    #[strum(serialize = "COR")]
    Corrected,
    #[strum(serialize = "NIL")]
    Missing,
}

/// Day of month and UTC time of the observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ObservationTime {
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

impl ObservationTime {
    /// The hourly reporting cycle this observation belongs to.
    ///
    /// Observations from 45 minutes past the hour on count towards the next cycle.
    pub fn cycle(&self) -> u8 {
        if self.minute >= 45 {
            (self.hour + 1) % 24
        } else {
            self.hour
        }
    }
}

impl FromStr for ObservationTime {
    type Err = MetarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || MetarError::BadTime(s.to_string());
        let digits = s.strip_suffix('Z').ok_or_else(bad)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let field = |i: usize| digits[i..i + 2].parse::<u8>().map_err(|_| bad());
        let time = Self {
            day: field(0)?,
            hour: field(2)?,
            minute: field(4)?,
        };
        if time.day == 0 || time.day > 31 || time.hour > 23 || time.minute > 59 {
            return Err(bad());
        }
        Ok(time)
    }
}

/// The 16 points of the compass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, strum::Display, EnumString, EnumIter)]
pub enum Compass {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl Compass {
    /// The compass point closest to a bearing in degrees.
    pub fn from_degrees(degrees: f64) -> Self {
        let point = (degrees.rem_euclid(360.0) / 22.5).round() as usize % 16;
        Self::iter().nth(point).unwrap_or(Self::N)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, EnumString)]
pub enum SpeedUnit {
    #[strum(serialize = "KT")]
    Knots,
    #[strum(serialize = "MPS")]
    MetersPerSecond,
    #[strum(serialize = "KMH")]
    KilometersPerHour,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Wind {
    /// Direction the wind blows from in degrees, or `None` for variable winds.
    pub direction: Option<u16>,
    pub speed: u16,
    pub gust: Option<u16>,
    pub unit: SpeedUnit,
    /// The sector the direction varies across, in degrees.
    pub variation: Option<(u16, u16)>,
}

impl Wind {
    pub fn is_calm(&self) -> bool {
        self.speed == 0 && self.gust.is_none()
    }
}

/// Whether a reported value is a lower or upper limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Bound {
    /// The value is below the reported figure (`M`).
    Less,
    /// The value exceeds the reported figure (`P`, or a visibility of `9999`).
    Greater,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Visibility {
    /// Ceiling and visibility OK.
    Cavok,
    Meters {
        distance: u32,
        bound: Option<Bound>,
        direction: Option<Compass>,
    },
    /// Statute miles.
    Miles { distance: f64, bound: Option<Bound> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, EnumString)]
pub enum Tendency {
    #[strum(serialize = "U")]
    Up,
    #[strum(serialize = "D")]
    Down,
    #[strum(serialize = "N")]
    NoChange,
}

/// Runway visual range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunwayRange {
    pub runway: String,
    pub bound: Option<Bound>,
    pub distance: u32,
    /// Upper end of a varying range.
    pub upper: Option<(Option<Bound>, u32)>,
    pub feet: bool,
    pub tendency: Option<Tendency>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Intensity {
    Light,
    #[default]
    Moderate,
    Heavy,
    Vicinity,
}

/// One present or recent weather group, like `-SHRA`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WeatherGroup {
    pub intensity: Intensity,
    /// Two-letter descriptor code, like `SH` or `FZ`.
    pub descriptor: Option<String>,
    /// Two-letter precipitation, obscuration and other phenomenon codes, like `RA` or `BR`.
    pub phenomena: Vec<String>,
}

impl FromStr for WeatherGroup {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        if !s.is_ascii() {
            return Err(());
        }
        let (intensity, rest) = if let Some(rest) = s.strip_prefix('-') {
            (Intensity::Light, rest)
        } else if let Some(rest) = s.strip_prefix('+') {
            (Intensity::Heavy, rest)
        } else if let Some(rest) = s.strip_prefix("VC") {
            (Intensity::Vicinity, rest)
        } else {
            (Intensity::Moderate, s)
        };
        let (descriptor, rest) = match report::DESCRIPTORS
            .iter()
            .find(|(code, _)| rest.starts_with(code))
        {
            Some((code, _)) => (Some(code.to_string()), &rest[2..]),
            None => (None, rest),
        };
        if rest.len() % 2 != 0 || (descriptor.is_none() && rest.is_empty()) {
            return Err(());
        }
        let phenomena = (0..rest.len())
            .step_by(2)
            .map(|i| &rest[i..i + 2])
            .map(|code| {
                if report::phenomenon(code).is_some() {
                    Ok(code.to_string())
                } else {
                    Err(())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            intensity,
            descriptor,
            phenomena,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, EnumString)]
pub enum Cover {
    #[strum(serialize = "SKC")]
    SkyClear,
    #[strum(serialize = "CLR")]
    Clear,
    #[strum(serialize = "NSC")]
    NoSignificantCloud,
    #[strum(serialize = "NCD")]
    NoCloudDetected,
    #[strum(serialize = "FEW")]
    Few,
    #[strum(serialize = "SCT")]
    Scattered,
    #[strum(serialize = "BKN")]
    Broken,
    #[strum(serialize = "OVC")]
    Overcast,
    #[strum(serialize = "VV")]
    VerticalVisibility,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, EnumString)]
pub enum CloudType {
    #[strum(serialize = "CB")]
    Cumulonimbus,
    #[strum(serialize = "TCU")]
    ToweringCumulus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkyLayer {
    pub cover: Cover,
    /// Height of the cloud base in feet.
    pub height: Option<u32>,
    pub cloud: Option<CloudType>,
}

impl FromStr for SkyLayer {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        if let Ok(cover) = s.parse::<Cover>() {
            return match cover {
                Cover::SkyClear
                | Cover::Clear
                | Cover::NoSignificantCloud
                | Cover::NoCloudDetected => Ok(Self {
                    cover,
                    height: None,
                    cloud: None,
                }),
                _ => Err(()),
            };
        }
        if !s.is_ascii() || s.len() < 5 {
            return Err(());
        }
        let split = if s.starts_with("VV") { 2 } else { 3 };
        let cover = s[..split].parse::<Cover>().map_err(|_| ())?;
        let rest = &s[split..];
        if rest.len() < 3 {
            return Err(());
        }
        let (height, cloud) = rest.split_at(3);
        let height = match height {
            "///" => None,
            digits if digits.bytes().all(|b| b.is_ascii_digit()) => {
                Some(digits.parse::<u32>().map_err(|_| ())? * 100)
            }
            _ => return Err(()),
        };
        let cloud = match cloud {
            "" | "///" => None,
            code => Some(code.parse::<CloudType>().map_err(|_| ())?),
        };
        Ok(Self {
            cover,
            height,
            cloud,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum Pressure {
    Hectopascals(u16),
    InchesOfMercury(f64),
}

impl Pressure {
    pub fn millibars(&self) -> f64 {
        match self {
            Self::Hectopascals(hpa) => *hpa as f64,
            Self::InchesOfMercury(inhg) => inhg * 33.8639,
        }
    }
}

/// Wind shear reported along the take-off or landing path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum WindShear {
    AllRunways,
    Runway(String),
}

/// A decoded METAR report.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Metar {
    /// The report as given.
    pub raw: String,
    pub kind: ReportType,
    pub station: String,
    pub time: Option<ObservationTime>,
    pub modifier: Option<Modifier>,
    pub wind: Option<Wind>,
    pub visibility: Option<Visibility>,
    /// The lowest visibility and its direction, when it differs from the prevailing visibility.
    pub minimum_visibility: Option<Visibility>,
    pub runway: Vec<RunwayRange>,
    pub weather: Vec<WeatherGroup>,
    pub sky: Vec<SkyLayer>,
    /// Air temperature in degrees Celsius.
    pub temperature: Option<i32>,
    /// Dew point in degrees Celsius.
    pub dew_point: Option<i32>,
    pub pressure: Option<Pressure>,
    pub recent: Vec<WeatherGroup>,
    pub wind_shear: Vec<WindShear>,
    /// The trend forecast, starting with `NOSIG`, `BECMG` or `TEMPO`.
    pub trend: Option<String>,
    /// Everything after `RMK`.
    pub remarks: Option<String>,
    /// Groups which could not be decoded.
    pub unparsed: Vec<String>,
}

/// The groups after the observation time, in the order they appear in a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
enum Group {
    Modifier,
    Wind,
    WindVariation,
    Visibility,
    MinimumVisibility,
    Runway,
    Weather,
    Sky,
    Temperature,
    Pressure,
    Recent,
}

impl Group {
    /// Whether the group may occur more than once.
    fn repeats(self) -> bool {
        matches!(self, Self::Runway | Self::Weather | Self::Sky | Self::Recent)
    }
}

impl Metar {
    /// Decode a raw METAR report.
    pub fn parse(raw: &str) -> Result<Self, MetarError> {
        let raw = raw.trim();
        let mut tokens = raw.split_whitespace().peekable();
        if tokens.peek().is_none() {
            return Err(MetarError::Empty);
        }

        let mut metar = Self {
            raw: raw.to_string(),
            ..Default::default()
        };
        match tokens.peek().copied() {
            Some("METAR") => {
                tokens.next();
            }
            Some("SPECI") => {
                metar.kind = ReportType::Speci;
                tokens.next();
            }
            _ => {}
        }

        let station = tokens.next().ok_or(MetarError::MissingStation)?;
        if station.len() != 4
            || !station.starts_with(|c: char| c.is_ascii_alphabetic())
            || !station.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(MetarError::MissingStation);
        }
        metar.station = station.to_string();
        metar.time = Some(
            tokens
                .next()
                .ok_or_else(|| MetarError::BadTime(String::new()))?
                .parse()?,
        );

        let rest = tokens.collect::<Vec<_>>();
        let mut next = Group::Modifier;
        let mut i = 0;
        while i < rest.len() {
            let token = rest[i];
            match token {
                "RMK" => {
                    let remarks = rest[i + 1..].join(" ");
                    if !remarks.is_empty() {
                        metar.remarks = Some(remarks);
                    }
                    break;
                }
                "NOSIG" | "BECMG" | "TEMPO" => {
                    let end = rest[i..]
                        .iter()
                        .position(|token| *token == "RMK")
                        .map_or(rest.len(), |offset| i + offset);
                    metar.trend = Some(rest[i..end].join(" "));
                    i = end;
                    continue;
                }
                "WS" => {
                    if let Some(consumed) = metar.wind_shear(&rest[i + 1..]) {
                        i += 1 + consumed;
                        continue;
                    }
                }
                "//" | "////" => {
                    i += 1;
                    continue;
                }
                _ => {}
            }

            // Statute miles split into a whole number and a fraction, like `1 1/2SM`.
            if next <= Group::Visibility && metar.visibility.is_none() {
                if let Some(fraction) = rest.get(i + 1) {
                    if let Some(visibility) = split_miles(token, fraction) {
                        metar.visibility = Some(visibility);
                        next = Group::Runway;
                        i += 2;
                        continue;
                    }
                }
            }

            match Group::iter()
                .filter(|group| *group >= next)
                .find(|group| metar.group(*group, token))
            {
                Some(group) if group.repeats() => next = group,
                Some(group) => {
                    next = Group::iter().find(|later| *later > group).unwrap_or(group);
                }
                None => {
                    tracing::debug!("unrecognized METAR group {token}");
                    metar.unparsed.push(token.to_string());
                }
            }
            i += 1;
        }
        Ok(metar)
    }

    /// Decode `token` as `group`, returning whether it matched.
    fn group(&mut self, group: Group, token: &str) -> bool {
        match group {
            Group::Modifier => token.parse::<Modifier>().map(|m| self.modifier = Some(m)).is_ok(),
            Group::Wind => parse_wind(token).map(|w| self.wind = Some(w)).is_some(),
            Group::WindVariation => match (&mut self.wind, parse_variation(token)) {
                (Some(wind), Some(sector)) => {
                    wind.variation = Some(sector);
                    true
                }
                _ => false,
            },
            Group::Visibility => parse_visibility(token)
                .map(|v| self.visibility = Some(v))
                .is_some(),
            Group::MinimumVisibility => match parse_visibility(token) {
                Some(
                    minimum @ Visibility::Meters {
                        direction: Some(_),
                        ..
                    },
                ) if self.visibility.is_some() => {
                    self.minimum_visibility = Some(minimum);
                    true
                }
                _ => false,
            },
            Group::Runway => parse_runway(token).map(|r| self.runway.push(r)).is_some(),
            Group::Weather => token.parse::<WeatherGroup>().map(|w| self.weather.push(w)).is_ok(),
            Group::Sky => token.parse::<SkyLayer>().map(|s| self.sky.push(s)).is_ok(),
            Group::Temperature => match parse_temperatures(token) {
                Some((temperature, dew_point)) => {
                    self.temperature = temperature;
                    self.dew_point = dew_point;
                    true
                }
                None => false,
            },
            Group::Pressure => parse_pressure(token)
                .map(|p| self.pressure = Some(p))
                .is_some(),
            Group::Recent => token
                .strip_prefix("RE")
                .and_then(|code| code.parse::<WeatherGroup>().ok())
                .map(|w| self.recent.push(w))
                .is_some(),
        }
    }

    /// Decode the groups following `WS`, returning how many were used.
    fn wind_shear(&mut self, tokens: &[&str]) -> Option<usize> {
        match tokens {
            ["ALL", "RWY", ..] => {
                self.wind_shear.push(WindShear::AllRunways);
                Some(2)
            }
            ["RWY", runway, ..] => {
                self.wind_shear.push(WindShear::Runway(runway.to_string()));
                Some(2)
            }
            [runway, ..] if runway.starts_with('R') && runway.len() > 1 => {
                let runway = runway.trim_start_matches("RWY").trim_start_matches('R');
                self.wind_shear.push(WindShear::Runway(runway.to_string()));
                Some(1)
            }
            _ => None,
        }
    }
}

impl FromStr for Metar {
    type Err = MetarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn digits<T: FromStr>(s: &str) -> Option<T> {
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

/// `dddff[Gff]KT`, `VRBffKT` and the like.
fn parse_wind(token: &str) -> Option<Wind> {
    let (body, unit) = ["KT", "MPS", "KMH"]
        .iter()
        .find_map(|unit| Some((token.strip_suffix(unit)?, unit.parse::<SpeedUnit>().ok()?)))?;
    if body.len() < 5 || !body.is_ascii() {
        return None;
    }
    let (direction, rest) = body.split_at(3);
    let direction = match direction {
        "VRB" => None,
        degrees => Some(digits::<u16>(degrees).filter(|d| *d <= 360)?),
    };
    let (speed, gust) = match rest.split_once('G') {
        Some((speed, gust)) => (speed, Some(digits(gust)?)),
        None => (rest, None),
    };
    if !(2..=3).contains(&speed.len()) {
        return None;
    }
    Some(Wind {
        direction,
        speed: digits(speed)?,
        gust,
        unit,
        variation: None,
    })
}

/// `dddVddd`.
fn parse_variation(token: &str) -> Option<(u16, u16)> {
    let (from, to) = token.split_once('V')?;
    if from.len() != 3 || to.len() != 3 {
        return None;
    }
    Some((digits(from)?, digits(to)?))
}

fn parse_visibility(token: &str) -> Option<Visibility> {
    if token == "CAVOK" {
        return Some(Visibility::Cavok);
    }
    if let Some(miles) = token.strip_suffix("SM") {
        let (bound, miles) = match miles.as_bytes().first() {
            Some(b'M') => (Some(Bound::Less), &miles[1..]),
            Some(b'P') => (Some(Bound::Greater), &miles[1..]),
            _ => (None, miles),
        };
        return Some(Visibility::Miles {
            distance: parse_miles(miles)?,
            bound,
        });
    }
    if token.len() < 4 || !token.is_ascii() {
        return None;
    }
    let (distance, direction) = token.split_at(4);
    let distance: u32 = digits(distance)?;
    let direction = match direction {
        "" | "NDV" => None,
        point => Some(point.parse::<Compass>().ok()?),
    };
    Some(if distance == 9999 {
        Visibility::Meters {
            distance: 10000,
            bound: Some(Bound::Greater),
            direction,
        }
    } else {
        Visibility::Meters {
            distance,
            bound: None,
            direction,
        }
    })
}

/// A whole number or a fraction of miles, like `10` or `3/4`.
fn parse_miles(s: &str) -> Option<f64> {
    match s.split_once('/') {
        Some((num, den)) => {
            let den: u32 = digits(den)?;
            if den == 0 {
                return None;
            }
            Some(digits::<u32>(num)? as f64 / den as f64)
        }
        None => Some(digits::<u32>(s)? as f64),
    }
}

fn split_miles(whole: &str, fraction: &str) -> Option<Visibility> {
    let whole: u32 = digits(whole).filter(|_| whole.len() <= 2)?;
    let fraction = fraction.strip_suffix("SM")?;
    if !fraction.contains('/') {
        return None;
    }
    Some(Visibility::Miles {
        distance: whole as f64 + parse_miles(fraction)?,
        bound: None,
    })
}

/// `Rnn[LCR]/[PM]nnnn[V[PM]nnnn][FT][/][UDN]`.
fn parse_runway(token: &str) -> Option<RunwayRange> {
    let (runway, range) = token.strip_prefix('R')?.split_once('/')?;
    if !runway.is_ascii()
        || !(2..=3).contains(&runway.len())
        || digits::<u8>(&runway[..2]).is_none()
    {
        return None;
    }
    if !runway[2..].chars().all(|c| matches!(c, 'L' | 'C' | 'R')) {
        return None;
    }

    let (range, tendency) = match range.char_indices().last() {
        Some((i, c @ ('U' | 'D' | 'N'))) => (
            range[..i].trim_end_matches('/'),
            c.to_string().parse::<Tendency>().ok(),
        ),
        _ => (range, None),
    };
    let (range, feet) = match range.strip_suffix("FT") {
        Some(range) => (range, true),
        None => (range, false),
    };
    let (low, high) = match range.split_once('V') {
        Some((low, high)) => (low, Some(high)),
        None => (range, None),
    };
    let (bound, distance) = bounded(low)?;
    let upper = match high {
        Some(high) => Some(bounded(high)?),
        None => None,
    };
    Some(RunwayRange {
        runway: runway.to_string(),
        bound,
        distance,
        upper,
        feet,
        tendency,
    })
}

/// `[PM]nnnn`.
fn bounded(s: &str) -> Option<(Option<Bound>, u32)> {
    let (bound, s) = match s.as_bytes().first() {
        Some(b'M') => (Some(Bound::Less), &s[1..]),
        Some(b'P') => (Some(Bound::Greater), &s[1..]),
        _ => (None, s),
    };
    if s.len() != 4 {
        return None;
    }
    Some((bound, digits(s)?))
}

/// `[M]tt/[M]dd`, where either side may be missing.
fn parse_temperatures(token: &str) -> Option<(Option<i32>, Option<i32>)> {
    let (temperature, dew_point) = token.split_once('/')?;
    let celsius = |s: &str| -> Option<Option<i32>> {
        match s {
            "" | "//" | "XX" => Some(None),
            s => {
                let (sign, s) = match s.strip_prefix('M') {
                    Some(s) => (-1, s),
                    None => (1, s),
                };
                if s.len() != 2 {
                    return None;
                }
                Some(Some(sign * digits::<i32>(s)?))
            }
        }
    };
    let temperature = celsius(temperature)?;
    let dew_point = celsius(dew_point)?;
    if temperature.is_none() && dew_point.is_none() {
        return None;
    }
    Some((temperature, dew_point))
}

/// `Qnnnn` in hectopascals or `Annnn` in hundredths of inches of mercury.
fn parse_pressure(token: &str) -> Option<Pressure> {
    let value = token.get(1..).filter(|value| value.len() == 4)?;
    match token.as_bytes().first() {
        Some(b'Q') => Some(Pressure::Hectopascals(digits(value)?)),
        Some(b'A') => Some(Pressure::InchesOfMercury(digits::<u16>(value)? as f64 / 100.0)),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_full_report() {
        let metar = Metar::parse(
            "METAR EKCH 081050Z AUTO 24010G20KT 200V270 9999 R22L/P1500U -SHRA FEW012 BKN030CB 05/M03 Q1012 RERA WS R22L NOSIG RMK AO2",
        )
        .unwrap();
        assert_eq!(metar.kind, ReportType::Metar);
        assert_eq!(metar.station, "EKCH");
        assert_eq!(
            metar.time,
            Some(ObservationTime {
                day: 8,
                hour: 10,
                minute: 50
            })
        );
        assert_eq!(metar.modifier, Some(Modifier::Automatic));
        assert_eq!(
            metar.wind,
            Some(Wind {
                direction: Some(240),
                speed: 10,
                gust: Some(20),
                unit: SpeedUnit::Knots,
                variation: Some((200, 270)),
            })
        );
        assert_eq!(
            metar.visibility,
            Some(Visibility::Meters {
                distance: 10000,
                bound: Some(Bound::Greater),
                direction: None
            })
        );
        assert_eq!(
            metar.runway,
            [RunwayRange {
                runway: "22L".into(),
                bound: Some(Bound::Greater),
                distance: 1500,
                upper: None,
                feet: false,
                tendency: Some(Tendency::Up),
            }]
        );
        assert_eq!(
            metar.weather,
            [WeatherGroup {
                intensity: Intensity::Light,
                descriptor: Some("SH".into()),
                phenomena: vec!["RA".into()],
            }]
        );
        assert_eq!(
            metar.sky,
            [
                SkyLayer {
                    cover: Cover::Few,
                    height: Some(1200),
                    cloud: None
                },
                SkyLayer {
                    cover: Cover::Broken,
                    height: Some(3000),
                    cloud: Some(CloudType::Cumulonimbus)
                },
            ]
        );
        assert_eq!(metar.temperature, Some(5));
        assert_eq!(metar.dew_point, Some(-3));
        assert_eq!(metar.pressure, Some(Pressure::Hectopascals(1012)));
        assert_eq!(metar.recent[0].phenomena, ["RA"]);
        assert_eq!(metar.wind_shear, [WindShear::Runway("22L".into())]);
        assert_eq!(metar.trend.as_deref(), Some("NOSIG"));
        assert_eq!(metar.remarks.as_deref(), Some("AO2"));
        assert!(metar.unparsed.is_empty(), "{:?}", metar.unparsed);
    }

    #[test]
    fn test_us_report() {
        let metar = Metar::parse(
            "SPECI KJFK 121951Z 31015KT 1 1/2SM R04R/2000V4000FT -RA BR OVC008 12/11 A2992 RMK AO2 SLP132",
        )
        .unwrap();
        assert_eq!(metar.kind, ReportType::Speci);
        assert_eq!(
            metar.visibility,
            Some(Visibility::Miles {
                distance: 1.5,
                bound: None
            })
        );
        assert_eq!(metar.runway[0].runway, "04R");
        assert_eq!(metar.runway[0].upper, Some((None, 4000)));
        assert!(metar.runway[0].feet);
        assert_eq!(metar.weather.len(), 2);
        assert_eq!(metar.weather[1].phenomena, ["BR"]);
        assert_eq!(metar.sky[0].height, Some(800));
        assert_eq!(metar.pressure, Some(Pressure::InchesOfMercury(29.92)));
        assert_eq!(metar.remarks.as_deref(), Some("AO2 SLP132"));
        assert_eq!(metar.time.unwrap().cycle(), 20);
    }

    #[test]
    fn test_visibility_forms() {
        for (token, expected) in [
            ("CAVOK", Visibility::Cavok),
            (
                "0800",
                Visibility::Meters {
                    distance: 800,
                    bound: None,
                    direction: None,
                },
            ),
            (
                "1500SW",
                Visibility::Meters {
                    distance: 1500,
                    bound: None,
                    direction: Some(Compass::SW),
                },
            ),
            (
                "10SM",
                Visibility::Miles {
                    distance: 10.0,
                    bound: None,
                },
            ),
            (
                "M1/4SM",
                Visibility::Miles {
                    distance: 0.25,
                    bound: Some(Bound::Less),
                },
            ),
            (
                "P6SM",
                Visibility::Miles {
                    distance: 6.0,
                    bound: Some(Bound::Greater),
                },
            ),
        ] {
            assert_eq!(parse_visibility(token), Some(expected), "{token}");
        }
        assert_eq!(parse_visibility("Q1012"), None);
    }

    #[test]
    fn test_minimum_visibility() {
        let metar = Metar::parse("EGLL 081050Z 24010KT 2000 0800NE BR OVC004 08/07 Q1015").unwrap();
        assert_eq!(
            metar.visibility,
            Some(Visibility::Meters {
                distance: 2000,
                bound: None,
                direction: None,
            })
        );
        assert_eq!(
            metar.minimum_visibility,
            Some(Visibility::Meters {
                distance: 800,
                bound: None,
                direction: Some(Compass::NE),
            })
        );
        assert_eq!(metar.weather[0].phenomena, ["BR"]);
        assert!(metar.unparsed.is_empty(), "{:?}", metar.unparsed);

        // A second group without a direction is not a minimum visibility.
        let metar = Metar::parse("EGLL 081050Z 24010KT 2000 0800 08/07 Q1015").unwrap();
        assert_eq!(metar.minimum_visibility, None);
        assert_eq!(metar.unparsed, ["0800"]);
    }

    #[test]
    fn test_calm_and_variable_wind() {
        let calm = parse_wind("00000KT").unwrap();
        assert!(calm.is_calm());
        let variable = parse_wind("VRB03MPS").unwrap();
        assert_eq!(variable.direction, None);
        assert_eq!(variable.unit, SpeedUnit::MetersPerSecond);
        assert_eq!(parse_wind("24010"), None);
        assert_eq!(parse_wind("ABC10KT"), None);
    }

    #[test]
    fn test_vertical_visibility_and_clear_sky() {
        let metar = Metar::parse("LFPG 080900Z 00000KT 0100 FG VV001 M01/M01 Q1030").unwrap();
        assert_eq!(metar.weather[0].phenomena, ["FG"]);
        assert_eq!(
            metar.sky,
            [SkyLayer {
                cover: Cover::VerticalVisibility,
                height: Some(100),
                cloud: None
            }]
        );
        assert_eq!(metar.temperature, Some(-1));

        let metar = Metar::parse("KLAX 080953Z 00000KT 10SM CLR 14/06 A3004").unwrap();
        assert_eq!(metar.sky[0].cover, Cover::Clear);
    }

    #[test]
    fn test_missing_dew_point() {
        let metar = Metar::parse("ENGM 080950Z 18005KT 9999 SCT040 M05/ Q1005").unwrap();
        assert_eq!(metar.temperature, Some(-5));
        assert_eq!(metar.dew_point, None);
    }

    #[test]
    fn test_unknown_groups_are_kept() {
        let metar = Metar::parse("EKCH 081050Z 24010KT 9999 FEW012 05/03 Q1012 W12/H75").unwrap();
        assert_eq!(metar.unparsed, ["W12/H75"]);
        // Out of order groups are not decoded.
        let metar = Metar::parse("EKCH 081050Z Q1012 24010KT").unwrap();
        assert_eq!(metar.pressure, Some(Pressure::Hectopascals(1012)));
        assert_eq!(metar.wind, None);
        assert_eq!(metar.unparsed, ["24010KT"]);
    }

    #[test]
    fn test_trend_before_remarks() {
        let metar =
            Metar::parse("EGLL 081050Z 24010KT 9999 BKN020 08/05 Q1015 TEMPO 4000 -RA RMK NOSPECI")
                .unwrap();
        assert_eq!(metar.trend.as_deref(), Some("TEMPO 4000 -RA"));
        assert_eq!(metar.remarks.as_deref(), Some("NOSPECI"));
        assert!(metar.weather.is_empty());
    }

    #[test]
    fn test_errors() {
        assert_eq!(Metar::parse("  "), Err(MetarError::Empty));
        assert_eq!(Metar::parse("METAR"), Err(MetarError::MissingStation));
        assert_eq!(Metar::parse("METAR 12"), Err(MetarError::MissingStation));
        assert_eq!(Metar::parse("EKCH"), Err(MetarError::BadTime("".into())));
        assert_eq!(
            Metar::parse("EKCH 081290Z 24010KT"),
            Err(MetarError::BadTime("081290Z".into()))
        );
    }

    #[test]
    fn test_cycle() {
        let time = |hour, minute| ObservationTime {
            day: 1,
            hour,
            minute,
        };
        assert_eq!(time(10, 20).cycle(), 10);
        assert_eq!(time(10, 45).cycle(), 11);
        assert_eq!(time(23, 50).cycle(), 0);
    }

    #[test]
    fn test_compass() {
        assert_eq!(Compass::from_degrees(0.0), Compass::N);
        assert_eq!(Compass::from_degrees(240.0), Compass::WSW);
        assert_eq!(Compass::from_degrees(350.0), Compass::N);
        assert_eq!(Compass::from_degrees(225.0), Compass::SW);
        assert_eq!(Compass::from_degrees(360.0), Compass::N);
    }
}
