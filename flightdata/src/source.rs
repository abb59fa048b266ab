//! Raw access to the remote services, and a local replay of them.

use crate::codes::{Board, Country, Iata, Icao};
use anyhow::Error;
use async_trait::async_trait;
use clap::Args;
use derive_more::Display;
use std::path::PathBuf;
use surf::Url;

mod client;
mod local;
mod recorder;

pub use client::Client;
pub use local::LocalClient;
pub use recorder::Recorder;

/// A provider of raw response bodies.
#[async_trait]
pub trait Source: Send + Sync {
    /// Fetch the body served at `endpoint`.
    ///
    /// Fails with [`Missing`] if there is nothing at `endpoint`, so callers can tell an unknown
    /// airport or country apart from a network failure.
    async fn fetch(&self, endpoint: &Endpoint) -> Result<String, Error>;
}

#[async_trait]
impl<S: Source + ?Sized> Source for Box<S> {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<String, Error> {
        (**self).fetch(endpoint).await
    }
}

/// The requested resource does not exist.
#[derive(Clone, Debug, Display)]
#[display(fmt = "nothing found at {}", _0)]
pub struct Missing(pub String);

impl std::error::Error for Missing {}

/// Everything that can be requested from a [`Source`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// One page of an airport's arrival or departure board.
    Schedule {
        airport: Iata,
        board: Board,
        page: usize,
        limit: usize,
        /// Unix time the board should start from.
        timestamp: i64,
    },
    /// Airport details and current weather.
    Airport { airport: Iata },
    /// Direct flights between two airports.
    Route { origin: Iata, destination: Iata },
    /// The airport directory page of a country (HTML).
    Airports { country: Country },
    /// Recent raw METAR reports for a station (plain text).
    Metar { station: Icao },
}

impl Endpoint {
    /// Where the body of this endpoint lives relative to a replay directory.
    ///
    /// The layout is
    ///
    /// ```text
    /// DIR/
    ///     schedule/<IATA>-<board>-<page>.json
    ///     airport/<IATA>.json
    ///     route/<FROM>-<TO>.json
    ///     airports/<country-slug>.html
    ///     metar/<ICAO>.txt
    /// ```
    pub fn replay_path(&self) -> PathBuf {
        let (dir, file) = match self {
            Self::Schedule {
                airport,
                board,
                page,
                ..
            } => ("schedule", format!("{airport}-{board}-{page}.json")),
            Self::Airport { airport } => ("airport", format!("{airport}.json")),
            Self::Route {
                origin,
                destination,
            } => ("route", format!("{origin}-{destination}.json")),
            Self::Airports { country } => ("airports", format!("{}.html", country.slug())),
            Self::Metar { station } => ("metar", format!("{station}.txt")),
        };
        PathBuf::from(dir).join(file)
    }
}

pub const DEFAULT_API_URL: &str = "https://api.flightradar24.com/common/v1/";
pub const DEFAULT_WEB_URL: &str = "https://www.flightradar24.com/";
pub const DEFAULT_WEATHER_URL: &str = "https://aviationweather.gov/api/data/";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0";

/// Options for reaching the data sources.
#[derive(Clone, Debug, Args)]
#[group(id = "source")]
pub struct Options {
    /// Base URL of the FlightRadar24 JSON API.
    #[clap(long, env = "ARRIVALS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: Url,

    /// Base URL of the FlightRadar24 web site, used for the airport directory.
    #[clap(long, env = "ARRIVALS_WEB_URL", default_value = DEFAULT_WEB_URL)]
    pub web_url: Url,

    /// Base URL of the aviationweather.gov data API.
    #[clap(long, env = "ARRIVALS_WEATHER_URL", default_value = DEFAULT_WEATHER_URL)]
    pub weather_url: Url,

    /// FlightRadar24 API token, if you have one.
    #[clap(long, env = "ARRIVALS_TOKEN", default_value = "", hide_env_values = true)]
    pub token: String,

    /// User agent to send with every request.
    #[clap(long, env = "ARRIVALS_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Give up on a request after SECONDS.
    #[clap(
        long,
        env = "ARRIVALS_TIMEOUT",
        value_name = "SECONDS",
        default_value = "15"
    )]
    pub timeout: u64,

    /// Read responses from DIR instead of the network.
    #[clap(long, env = "ARRIVALS_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Save every response under DIR, so the session can be replayed with --data-dir.
    #[clap(long, env = "ARRIVALS_SAVE_DIR", value_name = "DIR")]
    pub save_dir: Option<PathBuf>,
}

impl Options {
    /// Build the source these options describe.
    pub fn connect(&self) -> Result<Box<dyn Source>, Error> {
        let source: Box<dyn Source> = match &self.data_dir {
            Some(dir) => {
                tracing::info!("replaying responses from {}", dir.display());
                Box::new(LocalClient::open(dir.clone()))
            }
            None => Box::new(Client::new(self)?),
        };
        Ok(match &self.save_dir {
            Some(dir) => Box::new(Recorder::new(source, dir.clone())),
            None => source,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_replay_paths() {
        let cph: Iata = "cph".parse().unwrap();
        let ist: Iata = "IST".parse().unwrap();
        let cases = [
            (
                Endpoint::Schedule {
                    airport: cph.clone(),
                    board: Board::Departures,
                    page: 2,
                    limit: 100,
                    timestamp: 1515331200,
                },
                "schedule/CPH-departures-2.json",
            ),
            (
                Endpoint::Airport {
                    airport: cph.clone(),
                },
                "airport/CPH.json",
            ),
            (
                Endpoint::Route {
                    origin: cph,
                    destination: ist,
                },
                "route/CPH-IST.json",
            ),
            (
                Endpoint::Airports {
                    country: "USA".parse().unwrap(),
                },
                "airports/united-states.html",
            ),
            (
                Endpoint::Metar {
                    station: "ekch".parse().unwrap(),
                },
                "metar/EKCH.txt",
            ),
        ];
        for (endpoint, path) in cases {
            assert_eq!(endpoint.replay_path(), PathBuf::from(path));
        }
    }
}
