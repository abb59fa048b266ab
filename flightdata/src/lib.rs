//! Airport boards, airport details and METAR weather from FlightRadar24 and aviationweather.gov.

use tracing_subscriber::EnvFilter;

pub mod codes;
pub mod flightradar;
pub mod metar;
pub mod source;

pub use codes::{Board, Country, Iata, Icao};
pub use flightradar::{FlightData, NotFound};
pub use metar::Metar;

/// Install the global `tracing` subscriber.
///
/// Logs go to stderr, filtered by `RUST_LOG` (default `warn`), so that they never interleave with
/// the tables printed on stdout. Calling this more than once is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
