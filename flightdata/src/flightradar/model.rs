//! The subset of FlightRadar24 responses the tool uses.
//!
//! FlightRadar24 leaves out, nulls, or sends an empty array in place of any part of a response it
//! has no data for, so every nested object is optional and deserialized leniently: a part that
//! cannot be understood is treated as absent instead of failing the whole response.

use crate::codes::Board;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A flight on an airport board or route search.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Flight {
    #[serde(default, deserialize_with = "lenient")]
    pub identification: Option<Identification>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<Status>,
    #[serde(default, deserialize_with = "lenient")]
    pub aircraft: Option<Aircraft>,
    #[serde(default, deserialize_with = "lenient")]
    pub airline: Option<Airline>,
    #[serde(default, deserialize_with = "lenient")]
    pub airport: Option<Route>,
    #[serde(default, deserialize_with = "lenient")]
    pub time: Option<Times>,
}

impl Flight {
    /// The ATC callsign, like `LOT779`.
    pub fn callsign(&self) -> Option<&str> {
        self.identification.as_ref()?.callsign.as_deref()
    }

    /// The commercial flight number, like `LO779`.
    pub fn number(&self) -> Option<&str> {
        self.identification
            .as_ref()?
            .number
            .as_ref()?
            .default
            .as_deref()
    }

    /// Free-form status, like `Estimated 15:09` or `Landed 13:02`.
    pub fn status(&self) -> Option<&str> {
        self.status.as_ref()?.text.as_deref()
    }

    pub fn airline(&self) -> Option<&str> {
        self.airline.as_ref()?.name.as_deref()
    }

    pub fn aircraft(&self) -> Option<&str> {
        self.aircraft.as_ref()?.model.as_ref()?.text.as_deref()
    }

    /// IATA code of the airport this flight comes from.
    pub fn origin(&self) -> Option<&str> {
        self.airport.as_ref()?.origin.as_ref()?.iata()
    }

    /// IATA code of the airport this flight goes to.
    pub fn destination(&self) -> Option<&str> {
        self.airport.as_ref()?.destination.as_ref()?.iata()
    }

    /// The IATA code of the other end of the flight, as seen from `board`.
    pub fn counterpart(&self, board: Board) -> Option<&str> {
        match board {
            Board::Arrivals => self.origin(),
            Board::Departures => self.destination(),
        }
    }

    /// Scheduled time of the movement shown on `board`, in Unix seconds.
    pub fn scheduled(&self, board: Board) -> Option<i64> {
        self.time.as_ref()?.scheduled.as_ref()?.at(board)
    }

    /// Estimated time of the movement shown on `board`, in Unix seconds.
    pub fn estimated(&self, board: Board) -> Option<i64> {
        self.time.as_ref()?.estimated.as_ref()?.at(board)
    }

    /// Actual time of the movement shown on `board`, in Unix seconds.
    pub fn real(&self, board: Board) -> Option<i64> {
        self.time.as_ref()?.real.as_ref()?.at(board)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Identification {
    pub id: Option<String>,
    pub callsign: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub number: Option<FlightNumber>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FlightNumber {
    pub default: Option<String>,
    pub alternative: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Status {
    pub text: Option<String>,
    pub live: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Aircraft {
    #[serde(default, deserialize_with = "lenient")]
    pub model: Option<AircraftModel>,
    pub registration: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AircraftModel {
    pub code: Option<String>,
    pub text: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Airline {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub code: Option<Codes>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Codes {
    pub iata: Option<String>,
    pub icao: Option<String>,
}

/// Both ends of a flight.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Route {
    #[serde(default, deserialize_with = "lenient")]
    pub origin: Option<AirportRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub destination: Option<AirportRef>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AirportRef {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub code: Option<Codes>,
    #[serde(default, deserialize_with = "lenient")]
    pub timezone: Option<Timezone>,
    #[serde(default, deserialize_with = "lenient")]
    pub info: Option<GateInfo>,
}

/// Where the flight is handled at one end.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct GateInfo {
    pub terminal: Option<String>,
    pub baggage: Option<String>,
    pub gate: Option<String>,
}

impl AirportRef {
    fn iata(&self) -> Option<&str> {
        self.code.as_ref()?.iata.as_deref()
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Times {
    #[serde(default, deserialize_with = "lenient")]
    pub scheduled: Option<Movement>,
    #[serde(default, deserialize_with = "lenient")]
    pub estimated: Option<Movement>,
    #[serde(default, deserialize_with = "lenient")]
    pub real: Option<Movement>,
}

/// Departure and arrival times, in Unix seconds.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Movement {
    #[serde(default, deserialize_with = "number")]
    pub departure: Option<i64>,
    #[serde(default, deserialize_with = "number")]
    pub arrival: Option<i64>,
}

impl Movement {
    fn at(&self, board: Board) -> Option<i64> {
        match board {
            Board::Arrivals => self.arrival,
            Board::Departures => self.departure,
        }
    }
}

/// Static information about an airport.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AirportDetails {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub code: Option<Codes>,
    #[serde(rename = "delayIndex", default, deserialize_with = "lenient")]
    pub delay_index: Option<DelayIndex>,
    #[serde(default, deserialize_with = "lenient")]
    pub position: Option<Position>,
    #[serde(default, deserialize_with = "lenient")]
    pub timezone: Option<Timezone>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<Links>,
}

impl AirportDetails {
    pub fn icao(&self) -> Option<&str> {
        self.code.as_ref()?.icao.as_deref()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.position.as_ref()?.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.position.as_ref()?.longitude
    }

    pub fn country(&self) -> Option<&CountryRef> {
        self.position.as_ref()?.country.as_ref()
    }

    pub fn city(&self) -> Option<&str> {
        self.position.as_ref()?.region.as_ref()?.city.as_deref()
    }

    pub fn homepage(&self) -> Option<&str> {
        self.url.as_ref()?.homepage.as_deref()
    }
}

/// How delayed flights currently are, from 0 (on time) to 5.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct DelayIndex {
    #[serde(default, deserialize_with = "number")]
    pub arrivals: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub departures: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Position {
    #[serde(default, deserialize_with = "number")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub longitude: Option<f64>,
    /// Elevation in feet.
    #[serde(default, deserialize_with = "number")]
    pub altitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub country: Option<CountryRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub region: Option<Region>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CountryRef {
    pub name: Option<String>,
    pub code: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Region {
    pub city: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Timezone {
    pub name: Option<String>,
    /// Offset from UTC in seconds.
    #[serde(default, deserialize_with = "number")]
    pub offset: Option<i64>,
    pub abbr: Option<String>,
    #[serde(rename = "abbrName")]
    pub abbr_name: Option<String>,
    #[serde(rename = "isDst")]
    pub is_dst: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Links {
    pub homepage: Option<String>,
    pub webcam: Option<String>,
    pub wikipedia: Option<String>,
}

/// Current weather at an airport.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Weather {
    pub metar: Option<String>,
    /// Observation time in Unix seconds.
    #[serde(default, deserialize_with = "number")]
    pub time: Option<i64>,
    #[serde(default, deserialize_with = "number")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub pressure: Option<Pressure>,
    #[serde(default, deserialize_with = "lenient")]
    pub sky: Option<Sky>,
    #[serde(default, deserialize_with = "lenient")]
    pub flight: Option<FlightCategory>,
    #[serde(default, deserialize_with = "lenient")]
    pub wind: Option<Wind>,
    #[serde(default, deserialize_with = "lenient")]
    pub temp: Option<Temperature>,
    #[serde(default, deserialize_with = "lenient")]
    pub dewpoint: Option<Temperature>,
    #[serde(default, deserialize_with = "lenient")]
    pub elevation: Option<Elevation>,
}

impl Weather {
    /// Flight rules category, like `VFR` or `IFR`.
    pub fn category(&self) -> Option<&str> {
        self.flight.as_ref()?.category.as_deref()
    }

    pub fn sky_condition(&self) -> Option<&str> {
        self.sky.as_ref()?.condition.as_ref()?.text.as_deref()
    }

    pub fn visibility(&self) -> Option<&Visibility> {
        self.sky.as_ref()?.visibility.as_ref()
    }

    pub fn wind_kmh(&self) -> Option<f64> {
        self.wind.as_ref()?.speed.as_ref()?.kmh
    }

    pub fn wind_degree(&self) -> Option<f64> {
        self.wind.as_ref()?.direction.as_ref()?.degree
    }

    pub fn wind_direction(&self) -> Option<&str> {
        self.wind.as_ref()?.direction.as_ref()?.text.as_deref()
    }

    pub fn celsius(&self) -> Option<f64> {
        self.temp.as_ref()?.celsius
    }

    pub fn dewpoint_celsius(&self) -> Option<f64> {
        self.dewpoint.as_ref()?.celsius
    }

    pub fn hpa(&self) -> Option<f64> {
        self.pressure.as_ref()?.hpa
    }

    pub fn elevation_m(&self) -> Option<f64> {
        self.elevation.as_ref()?.m
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Pressure {
    #[serde(default, deserialize_with = "number")]
    pub hg: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub hpa: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Sky {
    #[serde(default, deserialize_with = "lenient")]
    pub condition: Option<Condition>,
    #[serde(default, deserialize_with = "lenient")]
    pub visibility: Option<Visibility>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Condition {
    pub text: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Visibility {
    #[serde(default, deserialize_with = "number")]
    pub km: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub mi: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub nmi: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FlightCategory {
    pub category: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Wind {
    #[serde(default, deserialize_with = "lenient")]
    pub direction: Option<WindDirection>,
    #[serde(default, deserialize_with = "lenient")]
    pub speed: Option<WindSpeed>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct WindDirection {
    #[serde(default, deserialize_with = "number")]
    pub degree: Option<f64>,
    pub text: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct WindSpeed {
    #[serde(default, deserialize_with = "number")]
    pub kmh: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub kts: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub mph: Option<f64>,
    pub text: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Temperature {
    #[serde(default, deserialize_with = "number")]
    pub celsius: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub fahrenheit: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Elevation {
    #[serde(default, deserialize_with = "number")]
    pub m: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub ft: Option<f64>,
}

/// Interpret `value` as a `T`, treating `null`, `[]` and anything malformed as absent.
pub(super) fn from_value<T: DeserializeOwned>(value: &Value) -> Option<T> {
    match value {
        Value::Null => None,
        Value::Array(items) if items.is_empty() => None,
        value => match T::deserialize(value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!("ignoring malformed response field {value}: {err}");
                None
            }
        },
    }
}

fn lenient<'de, D: Deserializer<'de>, T: DeserializeOwned>(d: D) -> Result<Option<T>, D::Error> {
    Ok(from_value(&Value::deserialize(d)?))
}

/// A number, which FlightRadar24 sometimes sends as a string.
fn number<'de, D: Deserializer<'de>, T: std::str::FromStr + DeserializeOwned>(
    d: D,
) -> Result<Option<T>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => T::deserialize(Value::Number(n.clone()))
            .ok()
            .or_else(|| n.to_string().parse().ok()),
        _ => None,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flight_accessors() {
        let flight: Flight = serde_json::from_value(json!({
            "identification": {
                "id": "f1",
                "callsign": "LOT779",
                "number": {"default": "LO779", "alternative": null}
            },
            "status": {"live": false, "text": "Landed 13:09"},
            "aircraft": {"model": {"code": "E75L", "text": "Embraer E175LR"}},
            "airline": {"name": "LOT Polish Airlines", "code": {"iata": "LO", "icao": "LOT"}},
            "airport": {
                "origin": {
                    "code": {"iata": "WAW", "icao": "EPWA"},
                    "timezone": {"name": "Europe/Warsaw", "offset": 3600},
                    "info": {"terminal": "A", "gate": null}
                },
                "destination": null
            },
            "time": {
                "scheduled": {"departure": 1515325800, "arrival": 1515331200},
                "estimated": {"departure": null, "arrival": "1515330560"},
                "real": []
            }
        }))
        .unwrap();
        assert_eq!(flight.callsign(), Some("LOT779"));
        assert_eq!(flight.number(), Some("LO779"));
        assert_eq!(flight.status(), Some("Landed 13:09"));
        assert_eq!(flight.airline(), Some("LOT Polish Airlines"));
        assert_eq!(flight.aircraft(), Some("Embraer E175LR"));
        assert_eq!(flight.counterpart(Board::Arrivals), Some("WAW"));
        assert_eq!(flight.counterpart(Board::Departures), None);
        let origin = flight.airport.as_ref().unwrap().origin.as_ref().unwrap();
        assert_eq!(origin.timezone.as_ref().unwrap().offset, Some(3600));
        assert_eq!(origin.info.as_ref().unwrap().terminal.as_deref(), Some("A"));
        assert_eq!(flight.scheduled(Board::Arrivals), Some(1515331200));
        assert_eq!(flight.estimated(Board::Arrivals), Some(1515330560));
        assert_eq!(flight.estimated(Board::Departures), None);
        assert_eq!(flight.real(Board::Arrivals), None);
    }

    #[test]
    fn test_malformed_parts_are_absent() {
        let flight: Flight = serde_json::from_value(json!({
            "identification": {"callsign": "NAX3610", "number": {"default": "DY3610"}},
            "airline": "unknown",
            "aircraft": [],
            "airport": {"origin": 17}
        }))
        .unwrap();
        assert_eq!(flight.callsign(), Some("NAX3610"));
        assert_eq!(flight.airline(), None);
        assert_eq!(flight.aircraft(), None);
        assert_eq!(flight.origin(), None);
        assert_eq!(flight.status(), None);
    }

    #[test]
    fn test_weather_numbers() {
        let weather: Weather = serde_json::from_value(json!({
            "metar": "EKCH 081050Z 24010KT 9999 FEW012 05/03 Q1012",
            "time": 1515408600,
            "humidity": "87",
            "sky": {"condition": {"text": "Few clouds"}, "visibility": {"km": 10, "nmi": 5.4}},
            "wind": {"direction": {"degree": 240, "text": "Southwest"}, "speed": {"kmh": 18.5}},
            "temp": {"celsius": 5},
            "pressure": {"hpa": 1012},
        }))
        .unwrap();
        assert_eq!(weather.humidity, Some(87.0));
        assert_eq!(weather.sky_condition(), Some("Few clouds"));
        assert_eq!(weather.visibility().unwrap().km, Some(10.0));
        assert_eq!(weather.wind_kmh(), Some(18.5));
        assert_eq!(weather.wind_degree(), Some(240.0));
        assert_eq!(weather.celsius(), Some(5.0));
        assert_eq!(weather.dewpoint_celsius(), None);
        assert_eq!(weather.hpa(), Some(1012.0));
    }
}
