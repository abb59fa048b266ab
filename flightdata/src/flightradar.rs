//! Typed access to FlightRadar24 data.

use crate::codes::{Board, Country, Iata, Icao};
use crate::source::{Endpoint, Missing, Source};
use anyhow::{Context, Error};
use chrono::Utc;
use derive_more::Display;
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;

mod directory;
mod model;

pub use directory::AirportEntry;
pub use model::*;

/// The most flights FlightRadar24 returns in one page of an airport board.
pub const PAGE_SIZE: usize = 100;

/// A lookup which found nothing.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum NotFound {
    #[display(fmt = "airport {} not found", _0)]
    Airport(Iata),
    #[display(fmt = "country {} not found", _0)]
    Country(Country),
    #[display(fmt = "no direct flights from {} to {}", origin, destination)]
    Route { origin: Iata, destination: Iata },
    #[display(fmt = "no METAR available for {}", _0)]
    Metar(Iata),
}

impl std::error::Error for NotFound {}

/// Flight, airport and weather data built on a [`Source`].
pub struct FlightData<S> {
    source: S,
}

impl<S: Source> FlightData<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Flights on the arrival or departure board of `airport`.
    ///
    /// Without a `limit`, this is the first page of the board. With a `limit`, as many pages as
    /// needed to reach it are fetched, and the result is cut to at most `limit` flights.
    pub async fn schedule(
        &self,
        airport: &Iata,
        board: Board,
        limit: Option<usize>,
    ) -> Result<Vec<Flight>, Error> {
        let page_size = limit.map_or(PAGE_SIZE, |limit| limit.clamp(1, PAGE_SIZE));
        let timestamp = Utc::now().timestamp();

        let (mut flights, total) = self
            .schedule_page(airport, board, 1, page_size, timestamp)
            .await?;
        if flights.is_empty() {
            return Err(NotFound::Airport(airport.clone()).into());
        }

        if let Some(limit) = limit {
            let pages = limit.div_ceil(page_size).min(total);
            if pages > 1 {
                tracing::info!("fetching {} more pages of {airport} {board}", pages - 1);
            }
            let rest = try_join_all(
                (2..=pages).map(|page| self.schedule_page(airport, board, page, page_size, timestamp)),
            )
            .await?;
            for (page, _) in rest {
                flights.extend(page);
            }
            flights.truncate(limit);
        }
        Ok(flights)
    }

    /// One page of a board, and the total number of pages.
    async fn schedule_page(
        &self,
        airport: &Iata,
        board: Board,
        page: usize,
        limit: usize,
        timestamp: i64,
    ) -> Result<(Vec<Flight>, usize), Error> {
        let json = self
            .json(
                Endpoint::Schedule {
                    airport: airport.clone(),
                    board,
                    page,
                    limit,
                    timestamp,
                },
                || NotFound::Airport(airport.clone()),
            )
            .await?;

        let schedule = json
            .pointer(&format!("/result/response/airport/pluginData/schedule/{board}"))
            .filter(|schedule| !is_empty(schedule))
            .ok_or_else(|| NotFound::Airport(airport.clone()))?;
        let total = schedule
            .pointer("/page/total")
            .and_then(Value::as_u64)
            .unwrap_or(1) as usize;
        let rows = schedule
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut flights: Vec<Flight> = Vec::with_capacity(rows.len());
        for row in rows {
            match row.get("flight").and_then(model::from_value) {
                Some(flight) => flights.push(flight),
                None => tracing::warn!("skipping malformed {board} row for {airport}"),
            }
        }
        tracing::debug!("{airport} {board} page {page}/{total}: {} flights", flights.len());
        Ok((flights, total))
    }

    /// Details and current weather for `airport`.
    pub async fn airport(&self, airport: &Iata) -> Result<(AirportDetails, Weather), Error> {
        match self.airport_data(airport).await? {
            (Some(details), Some(weather)) => Ok((details, weather)),
            _ => Err(NotFound::Airport(airport.clone()).into()),
        }
    }

    async fn airport_data(
        &self,
        airport: &Iata,
    ) -> Result<(Option<AirportDetails>, Option<Weather>), Error> {
        let json = self
            .json(
                Endpoint::Airport {
                    airport: airport.clone(),
                },
                || NotFound::Airport(airport.clone()),
            )
            .await?;
        Ok((
            lookup(&json, "/result/response/airport/pluginData/details"),
            lookup(&json, "/result/response/airport/pluginData/weather"),
        ))
    }

    /// Direct flights from `origin` to `destination`.
    pub async fn route(&self, origin: &Iata, destination: &Iata) -> Result<Vec<Flight>, Error> {
        let not_found = || NotFound::Route {
            origin: origin.clone(),
            destination: destination.clone(),
        };
        let json = self
            .json(
                Endpoint::Route {
                    origin: origin.clone(),
                    destination: destination.clone(),
                },
                not_found,
            )
            .await?;

        let flights: Vec<Flight> = json
            .pointer("/result/response/flight/data")
            .and_then(Value::as_array)
            .map(|rows| rows.iter().filter_map(model::from_value).collect())
            .unwrap_or_default();
        if flights.is_empty() {
            return Err(not_found().into());
        }
        Ok(flights)
    }

    /// Airports listed in the FlightRadar24 directory for `country`.
    pub async fn airports(&self, country: &Country) -> Result<Vec<AirportEntry>, Error> {
        let not_found = || NotFound::Country(country.clone());
        let html = self
            .fetch(
                Endpoint::Airports {
                    country: country.clone(),
                },
                not_found,
            )
            .await?;
        let airports = directory::parse(&html)?;
        if airports.is_empty() {
            return Err(not_found().into());
        }
        Ok(airports)
    }

    /// The latest raw METAR report for `airport`.
    ///
    /// The report included with the FlightRadar24 airport weather is used when there is one, unless
    /// `prefer_weather_service` is set. Otherwise the report is fetched from aviationweather.gov,
    /// using the ICAO code from the airport details. Either source is used as a fallback for the
    /// other.
    pub async fn metar(&self, airport: &Iata, prefer_weather_service: bool) -> Result<String, Error> {
        let (details, weather) = self.airport_data(airport).await?;
        if details.is_none() && weather.is_none() {
            return Err(NotFound::Airport(airport.clone()).into());
        }

        let reported = weather
            .and_then(|weather| weather.metar)
            .map(|metar| metar.trim().to_string())
            .filter(|metar| !metar.is_empty());
        if !prefer_weather_service {
            if let Some(metar) = &reported {
                return Ok(metar.clone());
            }
        }

        let station = details
            .as_ref()
            .and_then(AirportDetails::icao)
            .and_then(|icao| icao.parse::<Icao>().ok());
        if let Some(station) = station {
            match self
                .fetch(Endpoint::Metar { station }, || NotFound::Metar(airport.clone()))
                .await
            {
                Ok(body) => {
                    if let Some(line) = body.lines().map(str::trim).find(|line| !line.is_empty()) {
                        return Ok(line.to_string());
                    }
                }
                Err(err) if err.is::<NotFound>() => {}
                Err(err) if reported.is_some() => {
                    tracing::warn!("weather service unavailable, using FlightRadar24 METAR: {err:#}");
                }
                Err(err) => return Err(err),
            }
        }
        reported.ok_or_else(|| NotFound::Metar(airport.clone()).into())
    }

    /// Fetch `endpoint`, reporting a missing resource as `missing`.
    async fn fetch(
        &self,
        endpoint: Endpoint,
        missing: impl FnOnce() -> NotFound,
    ) -> Result<String, Error> {
        match self.source.fetch(&endpoint).await {
            Ok(body) => Ok(body),
            Err(err) if err.is::<Missing>() => {
                tracing::debug!("{err}");
                Err(missing().into())
            }
            Err(err) => Err(err),
        }
    }

    async fn json(
        &self,
        endpoint: Endpoint,
        missing: impl FnOnce() -> NotFound,
    ) -> Result<Value, Error> {
        let body = self.fetch(endpoint.clone(), missing).await?;
        serde_json::from_str(&body)
            .with_context(|| format!("malformed response for {endpoint:?}"))
    }
}

/// The value at `pointer` in `json`, if there is one and it can be understood.
fn lookup<T: DeserializeOwned>(json: &Value, pointer: &str) -> Option<T> {
    json.pointer(pointer).and_then(model::from_value)
}

/// FlightRadar24 sends `null` or `[]` in place of objects it has no data for.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
