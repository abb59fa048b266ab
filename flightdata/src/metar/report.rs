//! Human readable METAR reports.

use super::*;
use std::fmt::{self, Display, Formatter};

pub(super) const DESCRIPTORS: &[(&str, &str)] = &[
    ("MI", "shallow"),
    ("PR", "partial"),
    ("BC", "patches of"),
    ("DR", "low drifting"),
    ("BL", "blowing"),
    ("SH", "showers"),
    ("TS", "thunderstorm"),
    ("FZ", "freezing"),
];

const PHENOMENA: &[(&str, &str)] = &[
    // Precipitation
    ("DZ", "drizzle"),
    ("RA", "rain"),
    ("SN", "snow"),
    ("SG", "snow grains"),
    ("IC", "ice crystals"),
    ("PL", "ice pellets"),
    ("GR", "hail"),
    ("GS", "snow pellets"),
    ("UP", "unknown precipitation"),
    // Obscuration
    ("BR", "mist"),
    ("FG", "fog"),
    ("FU", "smoke"),
    ("VA", "volcanic ash"),
    ("DU", "widespread dust"),
    ("SA", "sand"),
    ("HZ", "haze"),
    ("PY", "spray"),
    // Other
    ("PO", "sand whirls"),
    ("SQ", "squalls"),
    ("FC", "funnel cloud"),
    ("SS", "sandstorm"),
    ("DS", "dust storm"),
];

pub(super) fn phenomenon(code: &str) -> Option<&'static str> {
    PHENOMENA
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

fn descriptor(code: &str) -> Option<&'static str> {
    DESCRIPTORS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

impl Display for Modifier {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Automatic => write!(f, "automatic report"),
            Self::Corrected => write!(f, "manually corrected report"),
            Self::Missing => write!(f, "missing report"),
        }
    }
}

impl Display for ObservationTime {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "day {}, {:02}:{:02} UTC",
            self.day, self.hour, self.minute
        )
    }
}

impl Display for SpeedUnit {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Knots => write!(f, "knots"),
            Self::MetersPerSecond => write!(f, "m/s"),
            Self::KilometersPerHour => write!(f, "km/h"),
        }
    }
}

impl Display for Wind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_calm() {
            return write!(f, "calm");
        }
        match self.direction {
            Some(degrees) => write!(
                f,
                "{} ({degrees} degrees) at {} {}",
                Compass::from_degrees(degrees as f64),
                self.speed,
                self.unit
            )?,
            None => write!(f, "variable at {} {}", self.speed, self.unit)?,
        }
        if let Some(gust) = self.gust {
            write!(f, ", gusting to {gust} {}", self.unit)?;
        }
        if let Some((from, to)) = self.variation {
            write!(f, ", varying from {from} to {to} degrees")?;
        }
        Ok(())
    }
}

impl Display for Bound {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Less => write!(f, "less than"),
            Self::Greater => write!(f, "greater than"),
        }
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Cavok => write!(f, "greater than 10000 meters, no significant clouds (CAVOK)"),
            Self::Meters {
                distance,
                bound,
                direction,
            } => {
                if let Some(bound) = bound {
                    write!(f, "{bound} ")?;
                }
                write!(f, "{distance} meters")?;
                if let Some(direction) = direction {
                    write!(f, " to the {direction}")?;
                }
                Ok(())
            }
            Self::Miles { distance, bound } => {
                if let Some(bound) = bound {
                    write!(f, "{bound} ")?;
                }
                write!(f, "{distance} miles")
            }
        }
    }
}

impl Display for RunwayRange {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let unit = if self.feet { "feet" } else { "meters" };
        let range = |(bound, distance): (Option<Bound>, u32)| match bound {
            Some(bound) => format!("{bound} {distance}"),
            None => distance.to_string(),
        };
        write!(f, "on runway {}, ", self.runway)?;
        match self.upper {
            Some(upper) => write!(
                f,
                "from {} to {} {unit}",
                range((self.bound, self.distance)),
                range(upper)
            )?,
            None => write!(f, "{} {unit}", range((self.bound, self.distance)))?,
        }
        match self.tendency {
            Some(Tendency::Up) => write!(f, ", increasing"),
            Some(Tendency::Down) => write!(f, ", decreasing"),
            Some(Tendency::NoChange) => write!(f, ", no change"),
            None => Ok(()),
        }
    }
}

impl Display for WeatherGroup {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut words = vec![];
        match self.intensity {
            Intensity::Light => words.push("light"),
            Intensity::Heavy => words.push("heavy"),
            Intensity::Moderate | Intensity::Vicinity => {}
        }
        let phenomena = self
            .phenomena
            .iter()
            .map(|code| phenomenon(code).unwrap_or(code.as_str()))
            .collect::<Vec<_>>()
            .join(" and ");
        // Showers follow what they are showers of.
        let showers = self.descriptor.as_deref() == Some("SH");
        if let Some(code) = &self.descriptor {
            if !showers {
                words.push(descriptor(code).unwrap_or(code.as_str()));
            }
        }
        if !phenomena.is_empty() {
            words.push(&phenomena);
        }
        if showers {
            words.push("showers");
        }
        if self.intensity == Intensity::Vicinity {
            words.push("in the vicinity");
        }
        write!(f, "{}", words.join(" "))
    }
}

impl Display for CloudType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Cumulonimbus => write!(f, "cumulonimbus"),
            Self::ToweringCumulus => write!(f, "towering cumulus"),
        }
    }
}

impl Display for SkyLayer {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let clouds = match self.cloud {
            Some(cloud) => cloud.to_string(),
            None => "clouds".into(),
        };
        let cover = match self.cover {
            Cover::SkyClear | Cover::Clear => return write!(f, "clear"),
            Cover::NoSignificantCloud => return write!(f, "no significant clouds"),
            Cover::NoCloudDetected => return write!(f, "no clouds detected"),
            Cover::VerticalVisibility => {
                write!(f, "indefinite ceiling")?;
                if let Some(height) = self.height {
                    write!(f, ", vertical visibility to {height} feet")?;
                }
                return Ok(());
            }
            Cover::Few => "a few",
            Cover::Scattered => "scattered",
            Cover::Broken => "broken",
            Cover::Overcast => "overcast",
        };
        write!(f, "{cover} {clouds}")?;
        if let Some(height) = self.height {
            write!(f, " at {height} feet")?;
        }
        Ok(())
    }
}

impl Display for Pressure {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:.1} mb", self.millibars())
    }
}

impl Display for WindShear {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::AllRunways => write!(f, "all runways"),
            Self::Runway(runway) => write!(f, "runway {runway}"),
        }
    }
}

/// Continuation lines line up under the value of the first line.
const INDENT: &str = "     ";

fn list<T: Display>(f: &mut Formatter, label: &str, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i == 0 {
            writeln!(f, "{label}: {item}")?;
        } else {
            writeln!(f, "{INDENT}{item}")?;
        }
    }
    Ok(())
}

impl Display for Metar {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "station: {}", self.station)?;

        let kind = match self.kind {
            ReportType::Metar => "routine report",
            ReportType::Speci => "special report",
        };
        write!(f, "type: {kind}")?;
        if let Some(time) = &self.time {
            write!(f, ", cycle {}", time.cycle())?;
        }
        if let Some(modifier) = &self.modifier {
            write!(f, " ({modifier})")?;
        }
        writeln!(f)?;

        if let Some(time) = &self.time {
            writeln!(f, "time: {time}")?;
        }
        if let Some(temperature) = self.temperature {
            writeln!(f, "temperature: {temperature} C")?;
        }
        if let Some(dew_point) = self.dew_point {
            writeln!(f, "dew point: {dew_point} C")?;
        }
        if let Some(wind) = &self.wind {
            writeln!(f, "wind: {wind}")?;
        }
        if let Some(visibility) = &self.visibility {
            writeln!(f, "visibility: {visibility}")?;
        }
        if let Some(minimum) = &self.minimum_visibility {
            writeln!(f, "minimum visibility: {minimum}")?;
        }
        list(f, "visual range", &self.runway)?;
        if let Some(pressure) = &self.pressure {
            writeln!(f, "pressure: {pressure}")?;
        }
        if !self.weather.is_empty() {
            let weather = self
                .weather
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            writeln!(f, "weather: {}", weather.join("; "))?;
        }
        list(f, "sky", &self.sky)?;
        if !self.recent.is_empty() {
            let recent = self
                .recent
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            writeln!(f, "recent: {}", recent.join("; "))?;
        }
        list(f, "wind shear", &self.wind_shear)?;
        if let Some(trend) = &self.trend {
            writeln!(f, "trend: {trend}")?;
        }
        if let Some(remarks) = &self.remarks {
            writeln!(f, "remarks: {remarks}")?;
        }
        write!(f, "METAR: {}", self.raw)
    }
}
