use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::Path,
    time::Duration,
};

use anyhow::Context as _;
use obsidian_shared::config;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server: Server,
    pub catalog: Catalog,
    pub spotify: config::Spotify,
    pub discord: config::Discord,
}
impl Config {
    pub const FILENAME: &str = "obsidian.toml";

    /// Load [`Config::FILENAME`] from the working directory.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(Self::FILENAME))
    }

    /// Load a TOML config file, returning the default config if the file doesn't exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no {} found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Server {
    pub ip_addr: IpAddr,
    pub port: u16,
}
impl Server {
    pub const DEFAULT_PORT: u16 = 4000;

    pub fn socket_addr(self) -> SocketAddr {
        SocketAddr::new(self.ip_addr, self.port)
    }
}
impl Default for Server {
    fn default() -> Self {
        Self {
            ip_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: Self::DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Catalog {
    pub cache_ttl_secs: u64,
}
impl Catalog {
    pub fn cache_ttl(self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
impl Default for Catalog {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 10 * 60,
        }
    }
}
