//! A client for the live FlightRadar24 and aviationweather.gov services.

use super::{Endpoint, Missing, Options, Source};
use anyhow::Error;
use async_trait::async_trait;
use std::time::Duration;
use surf::{
    http::{headers::USER_AGENT, StatusCode},
    Url,
};

/// A client for the live services.
pub struct Client {
    http: surf::Client,
    api_url: Url,
    web_url: Url,
    weather_url: Url,
    token: String,
}

impl Client {
    /// Connect to the services named in `opt`.
    pub fn new(opt: &Options) -> Result<Self, Error> {
        let config = surf::Config::new()
            .add_header(USER_AGENT, opt.user_agent.as_str())
            .map_err(Error::msg)?
            .set_timeout(Some(Duration::from_secs(opt.timeout)));
        Ok(Self {
            http: surf::Client::try_from(config).map_err(Error::msg)?,
            api_url: opt.api_url.clone(),
            web_url: opt.web_url.clone(),
            weather_url: opt.weather_url.clone(),
            token: opt.token.clone(),
        })
    }

    /// The full URL, including query parameters, serving `endpoint`.
    fn url(&self, endpoint: &Endpoint) -> Result<Url, Error> {
        let (mut url, params) = match endpoint {
            Endpoint::Schedule {
                airport,
                board,
                page,
                limit,
                timestamp,
            } => {
                let board: &'static str = (*board).into();
                (
                    self.api_url.join("airport.json")?,
                    vec![
                        ("code", airport.as_str().to_lowercase()),
                        ("plugin[]", "schedule".into()),
                        ("plugin-setting[schedule][mode]", board.into()),
                        ("plugin-setting[schedule][timestamp]", timestamp.to_string()),
                        ("page", page.to_string()),
                        ("limit", limit.to_string()),
                        ("token", self.token.clone()),
                    ],
                )
            }
            Endpoint::Airport { airport } => (
                self.api_url.join("airport.json")?,
                vec![
                    ("code", airport.as_str().to_lowercase()),
                    ("plugin[]", "details".into()),
                    ("plugin[]", "weather".into()),
                    ("token", self.token.clone()),
                ],
            ),
            Endpoint::Route {
                origin,
                destination,
            } => (
                self.api_url.join("search.json")?,
                vec![
                    ("query", "default".into()),
                    ("origin", origin.to_string()),
                    ("destination", destination.to_string()),
                    ("token", self.token.clone()),
                ],
            ),
            Endpoint::Airports { country } => (
                self.web_url
                    .join(&format!("data/airports/{}", country.slug()))?,
                vec![],
            ),
            Endpoint::Metar { station } => (
                self.weather_url.join("metar")?,
                vec![
                    ("ids", station.to_string()),
                    ("format", "raw".into()),
                    ("hours", "1".into()),
                ],
            ),
        };
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }
}

#[async_trait]
impl Source for Client {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<String, Error> {
        let url = self.url(endpoint)?;
        tracing::info!(%url, "request");
        let mut res = self.http.get(url.as_str()).await.map_err(Error::msg)?;
        let status = res.status();
        if status == StatusCode::NotFound {
            return Err(Missing(url.to_string()).into());
        }
        if !status.is_success() {
            return Err(Error::msg(format!("request to {url} failed with status {status}")));
        }
        let body = res.body_string().await.map_err(Error::msg)?;
        tracing::debug!(%url, bytes = body.len(), "response");
        Ok(body)
    }
}
