//! Startup configuration.
//!
//! Every setting can come from a command-line flag, an environment variable
//! (also read from `.env`), or its default, in that order of precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Args;

use crate::error::ConfigError;

/// Default CSV source, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "data/dogs-nyc.csv";

/// Default listening port
pub const DEFAULT_PORT: u16 = 8888;

/// Where to load the dataset from.
#[derive(Debug, Clone, Args)]
pub struct DatasetConfig {
    /// CSV file to load
    #[arg(short, long = "data", env = "TALLY_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data_path: PathBuf,

    /// CSV delimiter (auto-detect if not specified)
    #[arg(long, env = "TALLY_DELIMITER", value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

/// Settings for `tally serve`.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    #[command(flatten)]
    pub dataset: DatasetConfig,

    /// Address to bind
    #[arg(long, env = "TALLY_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "TALLY_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parse a delimiter given as a single ASCII character, `\t` or `tab`.
pub fn parse_delimiter(raw: &str) -> Result<u8, ConfigError> {
    match raw {
        "\\t" | "tab" | "\t" => Ok(b'\t'),
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(ConfigError::InvalidDelimiter(raw.to_string())),
            }
        }
    }
}
