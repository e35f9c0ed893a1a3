use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Clue file to upsert at startup. Unset means the registry is left as is.
    pub clues_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = var("HUNT_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("HUNT_PORT must be a port number")?;

        Ok(Self {
            host: var("HUNT_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: var("HUNT_DB_PATH").unwrap_or_else(|| "hunt.db".into()).into(),
            clues_path: var("HUNT_CLUES_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
