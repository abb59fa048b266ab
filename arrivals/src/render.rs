//! Text output.
//!
//! Every function writes to an arbitrary [`Write`] so the output can be captured in tests. Table
//! renderers return the width of their rules, which [`done`] uses to close the output.

use ansi_term::Color;
use anyhow::Error;
use chrono::{DateTime, Local};
use flightdata::{
    flightradar::{AirportDetails, AirportEntry, Flight, Visibility, Weather},
    Board, Country, Iata, Metar, NotFound,
};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use std::io::Write;

/// Which time zone to show times in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Clock {
    /// The time zone of this computer.
    Local,
    Utc,
}

impl Display for Clock {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Utc => write!(f, "UTC"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Style {
    pub color: bool,
    pub clock: Clock,
}

impl Style {
    fn paint(&self, color: Color, text: impl Display) -> String {
        if self.color {
            color.paint(text.to_string()).to_string()
        } else {
            text.to_string()
        }
    }

    /// Format a Unix time, or `-` if there is none.
    fn time(&self, timestamp: Option<i64>, format: &str) -> String {
        let Some(time) = timestamp.and_then(|secs| DateTime::from_timestamp(secs, 0)) else {
            return "-".into();
        };
        match self.clock {
            Clock::Utc => time.format(format).to_string(),
            Clock::Local => time.with_timezone(&Local).format(format).to_string(),
        }
    }

    /// Highlight flight statuses worth noticing.
    fn status(&self, status: &str) -> String {
        if status == "Scheduled" {
            "-".into()
        } else if starts_with_word(status, "Delayed") {
            self.paint(Color::Yellow, status)
        } else if starts_with_word(status, "Canceled") {
            self.paint(Color::Red, status)
        } else if starts_with_word(status, "Landed") {
            self.paint(Color::Green, status)
        } else {
            status.into()
        }
    }

    fn note(&self, out: &mut impl Write) -> Result<(), Error> {
        writeln!(out, "\nNOTE: All times shown are in {} time!\n", self.clock)?;
        Ok(())
    }
}

const UNKNOWN: &str = "---";
const HOUR_MINUTE: &str = "%H:%M";
const DATE_TIME: &str = "%Y-%m-%d %H:%M";

/// An arrival or departure board.
pub fn board(
    out: &mut impl Write,
    style: &Style,
    airport: &Iata,
    board: Board,
    flights: &[Flight],
) -> Result<usize, Error> {
    let other_end = match board {
        Board::Arrivals => "From",
        Board::Departures => "To",
    };
    let header = format!(
        "ID\t Flight\t {other_end}\t Sched\t ETA\t {}\t {}",
        fit("Airline", 24),
        fit("Status", 15)
    );
    // Count each tab as 4 columns.
    let width = header.len() + 6 * 4;

    style.note(out)?;
    writeln!(out, "{airport} {}:", board.to_string().to_uppercase())?;
    rule(out, width)?;
    writeln!(out, "{header}")?;
    rule(out, width)?;
    for flight in flights {
        writeln!(
            out,
            "{}\t {}\t {}\t {}\t {}\t {}\t {}",
            flight.callsign().unwrap_or(UNKNOWN),
            flight.number().unwrap_or(UNKNOWN),
            flight.counterpart(board).unwrap_or(UNKNOWN),
            style.time(flight.scheduled(board), HOUR_MINUTE),
            style.time(flight.estimated(board), HOUR_MINUTE),
            fit(flight.airline().unwrap_or(UNKNOWN), 24),
            style.status(flight.status().unwrap_or("-")),
        )?;
    }
    Ok(width)
}

/// Direct flights between two airports.
pub fn route(
    out: &mut impl Write,
    style: &Style,
    origin: &Iata,
    destination: &Iata,
    flights: &[Flight],
) -> Result<usize, Error> {
    let header = format!(
        "{:<8}  {:<8} {:<16}  {:<5}  {:<24} {:<20} {}",
        "ID", "Flight", "Scheduled", "ETD", "Airline", "Aircraft", "Status"
    );
    let width = header.len() + 19 - "Status".len();

    style.note(out)?;
    writeln!(
        out,
        "DEPARTURES from {} to {}",
        style.paint(Color::Yellow, origin),
        style.paint(Color::Yellow, destination)
    )?;
    rule(out, width)?;
    writeln!(out, "{header}")?;
    rule(out, width)?;
    for flight in flights {
        writeln!(
            out,
            "{}  {} {}  {}  {} {} {}",
            fit(flight.callsign().unwrap_or(UNKNOWN), 8),
            fit(flight.number().unwrap_or(UNKNOWN), 8),
            fit(&style.time(flight.scheduled(Board::Departures), DATE_TIME), 16),
            fit(&style.time(flight.estimated(Board::Departures), HOUR_MINUTE), 5),
            fit(flight.airline().unwrap_or(UNKNOWN), 24),
            fit(flight.aircraft().unwrap_or(UNKNOWN), 20),
            style.status(&clip(flight.status().unwrap_or("-"), 19)),
        )?;
    }
    Ok(width)
}

/// The airports of a country.
pub fn airports(
    out: &mut impl Write,
    country: &Country,
    airports: &[AirportEntry],
) -> Result<usize, Error> {
    let header = format!("IATA\t {}", fit("Airport Name", 50));
    let width = header.len() + 4;

    writeln!(out, "\nAIRPORTS in {}", country.name())?;
    rule(out, width)?;
    writeln!(out, "{}", header.trim_end())?;
    rule(out, width)?;
    for airport in airports {
        writeln!(out, "{}\t {}", airport.iata, clip(&airport.name, 50))?;
    }
    Ok(width)
}

/// Details and weather of an airport.
pub fn airport_info(
    out: &mut impl Write,
    style: &Style,
    airport: &Iata,
    details: &AirportDetails,
    weather: &Weather,
) -> Result<usize, Error> {
    let width = "(Lat,Lon) [degrees]:\t".len() + 50 + ",".len() + 4;
    let (lat, lon) = (value(details.latitude()), value(details.longitude()));
    let timezone = details.timezone.clone().unwrap_or_default();
    let delays = details.delay_index.clone().unwrap_or_default();
    let country = details.country().cloned().unwrap_or_default();

    writeln!(out, "\nAIRPORT INFO for {airport}")?;
    rule(out, width)?;
    writeln!(
        out,
        "Name:\t\t\t{}",
        style.paint(Color::Yellow, clip(details.name.as_deref().unwrap_or(UNKNOWN), 50))
    )?;
    writeln!(out, "ICAO:\t\t\t{}", text(details.icao()))?;
    writeln!(out, "(Lat,Lon) [degrees]:\t{lat},{lon}")?;
    writeln!(out, "Map URL:\t\thttps://www.latlong.net/c/?lat={lat}&long={lon}")?;
    writeln!(out, "Elevation [meters]:\t{}", value(weather.elevation_m()))?;
    writeln!(
        out,
        "Country (code):\t\t{} ({})",
        text(country.name.as_deref()),
        text(country.code.as_deref())
    )?;
    writeln!(out, "City:\t\t\t{}", text(details.city()))?;
    writeln!(out, "Delay Index Arrivals:\t{}", value(delays.arrivals))?;
    writeln!(out, "Delay Index Departures:\t{}", value(delays.departures))?;
    writeln!(out, "TimeZone [name]:\t{}", text(timezone.name.as_deref()))?;
    writeln!(out, "TimeZone [short]:\t{}", text(timezone.abbr.as_deref()))?;
    writeln!(
        out,
        "TimeZone [offset]:\t{}",
        timezone.offset.map_or_else(|| "-".into(), utc_offset)
    )?;
    writeln!(
        out,
        "Daylight Saving Time:\t{}",
        match timezone.is_dst {
            Some(true) => "yes",
            Some(false) => "no",
            None => "-",
        }
    )?;
    writeln!(out, "Airport URL:\t\t{}", text(details.homepage()))?;

    rule(out, width)?;
    writeln!(
        out,
        "Weather Report @ {}",
        style.time(weather.time, HOUR_MINUTE)
    )?;
    rule(out, width)?;
    writeln!(
        out,
        "METAR:\t{}",
        style.paint(Color::Green, text(weather.metar.as_deref()))
    )?;
    writeln!(out, "Nav Category:\t\t{}", text(weather.category()))?;
    writeln!(out, "Sky Condition:\t\t{}", text(weather.sky_condition()))?;
    let (unit, distance) = visibility(weather.visibility());
    writeln!(out, "Visibility [{unit}]:\t{distance}")?;
    writeln!(
        out,
        "Wind:\t\t\t{} [km/h] {} ({}\u{b0})",
        style.paint(Color::Yellow, value(weather.wind_kmh())),
        text(weather.wind_direction()),
        value(weather.wind_degree())
    )?;
    writeln!(out, "Temperature [\u{b0}C]:\t{}", value(weather.celsius()))?;
    writeln!(out, "Dew Point [\u{b0}C]:\t\t{}", value(weather.dewpoint_celsius()))?;
    writeln!(out, "Pressure [mbar=hPa]:\t{}", value(weather.hpa()))?;
    writeln!(out, "Humidity [%]:\t\t{}", value(weather.humidity))?;
    Ok(width)
}

/// A decoded METAR report.
pub fn metar(
    out: &mut impl Write,
    style: &Style,
    airport: &Iata,
    metar: &Metar,
) -> Result<usize, Error> {
    let width = 80;
    writeln!(
        out,
        "\nMETAR INFO for {}",
        style.paint(Color::Yellow, airport)
    )?;
    rule(out, width)?;
    writeln!(out, "{metar}")?;
    Ok(width)
}

/// Close the output of a query.
pub fn done(out: &mut impl Write, width: usize) -> Result<(), Error> {
    rule(out, width)?;
    writeln!(out, "\nDone!\n")?;
    Ok(())
}

/// Explain a lookup which found nothing.
pub fn not_found(out: &mut impl Write, err: &NotFound) -> Result<(), Error> {
    match err {
        NotFound::Airport(_) | NotFound::Metar(_) => {
            writeln!(out, "Airport IATA code not found! Check your spelling!")?;
            writeln!(
                out,
                "NOTE: Airports need international network services to be found."
            )?;
        }
        NotFound::Country(_) => country_hint(out)?,
        NotFound::Route { .. } => {
            writeln!(out, "empty list - no connecting flights?")?;
            country_hint(out)?;
        }
    }
    Ok(())
}

fn country_hint(out: &mut impl Write) -> Result<(), Error> {
    writeln!(out, "Country not found! Check your spelling!")?;
    writeln!(out, "NOTE: Use double quotes for multi-word names and try one of:")?;
    writeln!(out, "      https://www.listofcountriesoftheworld.com/")?;
    Ok(())
}

/// Print a response for debugging.
pub fn dump<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<(), Error> {
    writeln!(out, "Debug List: ")?;
    writeln!(out, "\n{}\n", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn rule(out: &mut impl Write, width: usize) -> Result<(), Error> {
    writeln!(out, "{}", "-".repeat(width))?;
    Ok(())
}

/// Truncate or pad `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    format!("{:<width$}", clip(text, width))
}

/// Truncate `text` to at most `width` characters.
fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

fn text(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |value| value.to_string())
}

/// Whether `text` starts with `word`, allowing either case for the first letter.
fn starts_with_word(text: &str, word: &str) -> bool {
    let mut chars = text.chars();
    let mut expected = word.chars();
    match (chars.next(), expected.next()) {
        (Some(first), Some(expected_first)) => {
            first.eq_ignore_ascii_case(&expected_first) && chars.as_str().starts_with(expected.as_str())
        }
        _ => false,
    }
}

/// Format an offset from UTC in seconds as `UTC+hhmm`.
fn utc_offset(seconds: i64) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    format!("UTC{sign}{:02}{:02}", minutes / 60, minutes % 60)
}

/// The unit and value to show for the visibility.
///
/// FlightRadar24 sometimes reports absurd distances in kilometers, in which case the nautical mile
/// figure is used instead.
fn visibility(visibility: Option<&Visibility>) -> (&'static str, String) {
    let round = |distance: f64| ((distance * 10.0).round() / 10.0).to_string();
    let Some(visibility) = visibility else {
        return ("km", "-".into());
    };
    match visibility.km {
        None => ("km", "-".into()),
        Some(km) if km > 100_000.0 => ("nmi", visibility.nmi.map_or_else(|| "-".into(), round)),
        Some(km) => ("km", round(km)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    const PLAIN: Style = Style {
        color: false,
        clock: Clock::Utc,
    };

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<usize, Error>) -> String {
        let mut out = vec![];
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn flight(value: serde_json::Value) -> Flight {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_board() {
        let flights = [
            flight(json!({
                "identification": {"callsign": "LOT779", "number": {"default": "LO779"}},
                "status": {"text": "Landed 13:09"},
                "airline": {"name": "LOT Polish Airlines"},
                "airport": {"origin": {"code": {"iata": "WAW"}}},
                "time": {"scheduled": {"arrival": 1515331200}, "estimated": {"arrival": 1515330560}}
            })),
            flight(json!({
                "identification": {"callsign": "NAX3610", "number": {"default": "DY3610"}},
                "status": {"text": "Scheduled"},
                "airline": null,
                "airport": {"origin": null},
                "time": {"scheduled": {"arrival": 1515334200}}
            })),
        ];
        let out = render(|out| board(out, &PLAIN, &"CPH".parse().unwrap(), Board::Arrivals, &flights));
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines[1], "NOTE: All times shown are in UTC time!");
        assert_eq!(lines[3], "CPH ARRIVALS:");
        assert!(lines[5].starts_with("ID\t Flight\t From\t Sched\t ETA\t Airline "));
        assert_eq!(
            lines[7],
            "LOT779\t LO779\t WAW\t 13:20\t 13:09\t LOT Polish Airlines     \t Landed 13:09"
        );
        assert_eq!(
            lines[8],
            format!("NAX3610\t DY3610\t ---\t 14:10\t -\t {:<24}\t -", "---")
        );
    }

    #[test]
    fn test_status_colors() {
        let color = Style {
            color: true,
            clock: Clock::Utc,
        };
        assert_eq!(color.status("Scheduled"), "-");
        assert_eq!(
            color.status("delayed 14:00"),
            Color::Yellow.paint("delayed 14:00").to_string()
        );
        assert_eq!(
            color.status("Canceled"),
            Color::Red.paint("Canceled").to_string()
        );
        assert_eq!(
            color.status("Landed 13:09"),
            Color::Green.paint("Landed 13:09").to_string()
        );
        assert_eq!(color.status("Estimated 15:09"), "Estimated 15:09");
        assert_eq!(PLAIN.status("Delayed 14:00"), "Delayed 14:00");
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("SAS", 5), "SAS  ");
        assert_eq!(fit("Scandinavian Airlines System", 12), "Scandinavian");
        assert_eq!(clip("Køben", 3), "Køb");
    }

    #[test]
    fn test_utc_offset() {
        assert_eq!(utc_offset(3600), "UTC+0100");
        assert_eq!(utc_offset(-16200), "UTC-0430");
        assert_eq!(utc_offset(0), "UTC+0000");
    }

    #[test]
    fn test_visibility() {
        let parse = |value| serde_json::from_value::<Visibility>(value).unwrap();
        assert_eq!(visibility(None), ("km", "-".into()));
        assert_eq!(
            visibility(Some(&parse(json!({"km": null, "nmi": 5})))),
            ("km", "-".into())
        );
        assert_eq!(
            visibility(Some(&parse(json!({"km": 9.99, "nmi": 5.4})))),
            ("km", "10".into())
        );
        assert_eq!(
            visibility(Some(&parse(json!({"km": 12.34})))),
            ("km", "12.3".into())
        );
        assert_eq!(
            visibility(Some(&parse(json!({"km": 185200, "nmi": 10.04})))),
            ("nmi", "10".into())
        );
    }

    #[test]
    fn test_not_found_hints() {
        let mut out = vec![];
        not_found(
            &mut out,
            &NotFound::Route {
                origin: "OSL".parse().unwrap(),
                destination: "TLV".parse().unwrap(),
            },
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "empty list - no connecting flights?\n\
             Country not found! Check your spelling!\n\
             NOTE: Use double quotes for multi-word names and try one of:\n      \
             https://www.listofcountriesoftheworld.com/\n"
        );
    }

    #[test]
    fn test_done() {
        let mut out = vec![];
        done(&mut out, 4).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "----\n\nDone!\n\n");
    }
}
