//! A source which reads from the local file system instead of the network.

use super::{Endpoint, Missing, Source};
use anyhow::{Context, Error};
use async_trait::async_trait;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// A source which replays responses saved in a local directory.
///
/// See [`Endpoint::replay_path`] for the expected layout.
pub struct LocalClient {
    root: PathBuf,
}

impl LocalClient {
    /// Open a directory of saved responses.
    pub fn open(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl Source for LocalClient {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<String, Error> {
        let path = self.root.join(endpoint.replay_path());
        match fs::read_to_string(&path) {
            Ok(body) => {
                tracing::debug!("replaying {}", path.display());
                Ok(body)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::info!("no saved response at {}", path.display());
                Err(Missing(path.display().to_string()).into())
            }
            Err(err) => Err(err).context(format!("unable to read {}", path.display())),
        }
    }
}
