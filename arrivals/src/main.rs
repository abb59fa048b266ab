use anyhow::Error;
use clap::{CommandFactory, Parser};
use flightdata::{
    codes::AmbiguousCountry, init_logging, source, source::Source, Board, Country, FlightData,
    Iata, Metar, NotFound,
};
use render::{Clock, Style};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use std::process::exit;

mod render;
mod test_runner;

const IMPORTANT: &str = "\
 --- IMPORTANT! -----------------------------------------------
   \u{2022} Times are shown in the time zone of your computer, unless --utc is given.
   \u{2022} Do not run these queries in rapid succession,
     as your IP might get blocked by the API providers.
 --------------------------------------------------------------";

/// Show airport arrivals, departures, details and METAR weather.
///
/// Give an airport IATA code to see its arrivals, or use one of the options for other queries. If
/// several queries are given, the first of -x, -m, -l, -i, -d and AIRPORT is run.
#[derive(Clone, Debug, Parser)]
#[clap(name = "arrivals", after_help = IMPORTANT)]
struct Options {
    /// Show the arrivals at AIRPORT, given by its IATA code.
    #[clap(value_name = "AIRPORT")]
    airport: Option<Iata>,

    /// Show departures from AIRPORT instead of arrivals.
    #[clap(short, long, value_name = "AIRPORT")]
    departures: Option<Iata>,

    /// Only show N flights (0 for no limit).
    #[clap(short = 'n', long, value_name = "N")]
    limit: Option<usize>,

    /// Show details and current weather of AIRPORT.
    #[clap(short, long, value_name = "AIRPORT")]
    info: Option<Iata>,

    /// Print the decoded response before the output: 1 for the first item, 2 for everything.
    #[clap(
        short = 'j',
        long,
        value_name = "LEVEL",
        value_parser = clap::value_parser!(u8).range(1..=2)
    )]
    debug: Option<u8>,

    /// List the airports of COUNTRY.
    ///
    /// Use double quotes for multi-word names. US, USA, UK and UAE are also understood.
    #[clap(short, long, value_name = "COUNTRY")]
    list: Option<String>,

    /// Show the latest METAR weather report for AIRPORT.
    #[clap(short, long, value_name = "AIRPORT")]
    metar: Option<Iata>,

    /// Get the METAR from aviationweather.gov instead of FlightRadar24.
    #[clap(long)]
    weather_service: bool,

    /// Show direct flights between two airports.
    #[clap(short = 'x', long, num_args = 2, value_names = ["FROM", "TO"])]
    between: Option<Vec<Iata>>,

    /// Show times in UTC instead of the local time zone.
    #[clap(short, long)]
    utc: bool,

    /// Do not color the output.
    ///
    /// Colors are also disabled when NO_COLOR is set or the output is not a terminal.
    #[clap(long)]
    no_color: bool,

    /// Print the license and maintenance URL.
    #[clap(short, long)]
    copyright: bool,

    /// Print the program version.
    #[clap(short = 'v', long)]
    version: bool,

    #[clap(flatten)]
    source: source::Options,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Query {
    Board(Iata, Board),
    Info(Iata),
    List(Country),
    Metar(Iata),
    Route(Iata, Iata),
}

impl Options {
    /// The query to run, if any was given.
    fn query(&self) -> Result<Option<Query>, Error> {
        if let Some(airports) = &self.between {
            let [origin, destination] = airports.as_slice() else {
                return Err(Error::msg("--between takes exactly two airports"));
            };
            return Ok(Some(Query::Route(origin.clone(), destination.clone())));
        }
        if let Some(airport) = &self.metar {
            return Ok(Some(Query::Metar(airport.clone())));
        }
        if let Some(country) = &self.list {
            return Ok(Some(Query::List(country.parse()?)));
        }
        if let Some(airport) = &self.info {
            return Ok(Some(Query::Info(airport.clone())));
        }
        if let Some(airport) = &self.departures {
            return Ok(Some(Query::Board(airport.clone(), Board::Departures)));
        }
        Ok(self
            .airport
            .clone()
            .map(|airport| Query::Board(airport, Board::Arrivals)))
    }

    fn style(&self) -> Style {
        Style {
            color: !self.no_color
                && std::env::var_os("NO_COLOR").is_none()
                && io::stdout().is_terminal(),
            clock: if self.utc { Clock::Utc } else { Clock::Local },
        }
    }

    /// Run the requested query, writing the results to `out`.
    ///
    /// Returns `false` if the query found nothing, after explaining why in `out`.
    async fn run(&self, out: &mut impl Write) -> Result<bool, Error> {
        if self.copyright {
            writeln!(
                out,
                "\nProgram License:  GPLv3\nMaintenance URL:  {}",
                env!("CARGO_PKG_REPOSITORY")
            )?;
            return Ok(true);
        }
        if self.version {
            writeln!(out, "Version:  {}", env!("CARGO_PKG_VERSION"))?;
            return Ok(true);
        }

        let query = match self.query() {
            Ok(Some(query)) => query,
            Ok(None) => {
                writeln!(out, "{}", Self::command().render_help())?;
                return Ok(true);
            }
            Err(err) if err.is::<AmbiguousCountry>() => {
                writeln!(out, "\n{err}")?;
                return Ok(false);
            }
            Err(err) => return Err(err),
        };
        tracing::info!(?query, "running query");

        let api = FlightData::new(self.source.connect()?);
        match self.execute(&api, &query, &self.style(), out).await {
            Ok(()) => Ok(true),
            Err(err) => match err.downcast_ref::<NotFound>() {
                Some(not_found) => {
                    tracing::info!("{not_found}");
                    render::not_found(out, not_found)?;
                    Ok(false)
                }
                None => Err(err),
            },
        }
    }

    async fn execute<S: Source>(
        &self,
        api: &FlightData<S>,
        query: &Query,
        style: &Style,
        out: &mut impl Write,
    ) -> Result<(), Error> {
        let width = match query {
            Query::Board(airport, board) => {
                let limit = self.limit.filter(|limit| *limit > 0);
                let flights = api.schedule(airport, *board, limit).await?;
                self.dump(out, &flights)?;
                render::board(out, style, airport, *board, &flights)?
            }
            Query::Info(airport) => {
                let (details, weather) = api.airport(airport).await?;
                match self.debug {
                    Some(1) => render::dump(out, &details)?,
                    Some(_) => render::dump(out, &(&details, &weather))?,
                    None => {}
                }
                render::airport_info(out, style, airport, &details, &weather)?
            }
            Query::List(country) => {
                let airports = api.airports(country).await?;
                self.dump(out, &airports)?;
                render::airports(out, country, &airports)?
            }
            Query::Metar(airport) => {
                let raw = api.metar(airport, self.weather_service).await?;
                let metar = Metar::parse(&raw)?;
                if self.debug.is_some() {
                    render::dump(out, &metar)?;
                }
                render::metar(out, style, airport, &metar)?
            }
            Query::Route(origin, destination) => {
                let flights = api.route(origin, destination).await?;
                self.dump(out, &flights)?;
                render::route(out, style, origin, destination, &flights)?
            }
        };
        render::done(out, width)
    }

    /// Print the first or all `items`, depending on the debug level.
    fn dump<T: Serialize>(&self, out: &mut impl Write, items: &[T]) -> Result<(), Error> {
        match (self.debug, items.first()) {
            (Some(1), Some(first)) => render::dump(out, first),
            (Some(_), _) => render::dump(out, items),
            (None, _) => Ok(()),
        }
    }
}

#[async_std::main]
async fn main() -> Result<(), Error> {
    init_logging();

    let opt = Options::parse();
    let mut stdout = io::stdout();
    let found = opt.run(&mut stdout).await?;
    stdout.flush()?;
    if !found {
        exit(1);
    }
    Ok(())
}
