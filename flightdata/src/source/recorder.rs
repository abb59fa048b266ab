//! Saving responses for later replay.

use super::{Endpoint, Source};
use anyhow::Error;
use async_trait::async_trait;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A source which saves everything fetched through it.
///
/// Responses are written to a directory with the layout read by
/// [`LocalClient`](super::LocalClient), so a live session can be replayed offline. Failing to save
/// a response is logged but does not fail the fetch.
pub struct Recorder<S> {
    inner: S,
    root: PathBuf,
}

impl<S> Recorder<S> {
    pub fn new(inner: S, root: PathBuf) -> Self {
        Self { inner, root }
    }
}

#[async_trait]
impl<S: Source> Source for Recorder<S> {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<String, Error> {
        let body = self.inner.fetch(endpoint).await?;
        let path = self.root.join(endpoint.replay_path());
        match save(&path, &body) {
            Ok(()) => tracing::info!("saved response to {}", path.display()),
            Err(err) => tracing::error!("unable to save response to {}: {err}", path.display()),
        }
        Ok(body)
    }
}

fn save(path: &Path, body: &str) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, body)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::source::{LocalClient, Missing};

    /// A source that serves the same body for every endpoint.
    struct Echo(&'static str);

    #[async_trait]
    impl Source for Echo {
        async fn fetch(&self, _endpoint: &Endpoint) -> Result<String, Error> {
            Ok(self.0.into())
        }
    }

    #[async_std::test]
    async fn test_record_then_replay() {
        let dir = std::env::temp_dir().join(format!("flightdata-recorder-{}", std::process::id()));
        let endpoint = Endpoint::Airport {
            airport: "CPH".parse().unwrap(),
        };

        let recorder = Recorder::new(Echo(r#"{"result":{}}"#), dir.clone());
        assert_eq!(recorder.fetch(&endpoint).await.unwrap(), r#"{"result":{}}"#);

        let replay = LocalClient::open(dir.clone());
        assert_eq!(replay.fetch(&endpoint).await.unwrap(), r#"{"result":{}}"#);

        // Anything not recorded is missing from the replay.
        let err = replay
            .fetch(&Endpoint::Airport {
                airport: "OSL".parse().unwrap(),
            })
            .await
            .unwrap_err();
        assert!(err.is::<Missing>());

        fs::remove_dir_all(dir).unwrap();
    }
}
