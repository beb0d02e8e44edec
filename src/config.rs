//! Environment-derived configuration.
//!
//! The connection string for the document store is required and its absence
//! is a fatal startup error; the listen port defaults sensibly for local
//! runs.

use anyhow::Context;

/// Settings read from the environment at process start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Document store connection string; must name a default database.
    pub mongodb_uri: String,
    /// TCP port the API listens on.
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let mongodb_uri = std::env::var("MONGODB_URI").context("MONGODB_URI must be set")?;
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a port number")?,
            Err(_) => 3001,
        };
        Ok(Self { mongodb_uri, port })
    }
}
