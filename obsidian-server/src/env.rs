use std::{env, str::FromStr};

use tracing_subscriber::EnvFilter;

use crate::config::Config;

pub fn init_environment() {
    if let Ok(path) = dotenvy::dotenv() {
        // Print to stderr because logging has not been initialized yet
        eprintln!("Loaded environment from dotenv file {}", path.display());
    }
}

const TRACING_SUBSCRIBER_ENV_FILTER_DEFAULT: &str = "obsidian=info";

pub fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(TRACING_SUBSCRIBER_ENV_FILTER_DEFAULT));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))
}

const SPOTIFY_CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
const SPOTIFY_CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";
const SPOTIFY_PLAYLIST_ID_ENV: &str = "SPOTIFY_PLAYLIST_ID";
const DISCORD_WEBHOOK_URL_ENV: &str = "DISCORD_WEBHOOK_URL";
const HOST_ENV: &str = "HOST";
const PORT_ENV: &str = "PORT";
const CACHE_TTL_SECS_ENV: &str = "CACHE_TTL_SECS";

/// Override `config` with the process environment.
pub fn patch_config(config: &mut Config) {
    patch_config_from(config, |key| env::var(key).ok());
}

/// Override `config` with every non-blank variable that `var` yields.
///
/// Values that fail to parse are logged and leave the config untouched.
pub fn patch_config_from(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    let var = |key: &str| var(key).filter(|value| !value.trim().is_empty());

    for (key, target) in [
        (SPOTIFY_CLIENT_ID_ENV, &mut config.spotify.client_id),
        (SPOTIFY_CLIENT_SECRET_ENV, &mut config.spotify.client_secret),
        (SPOTIFY_PLAYLIST_ID_ENV, &mut config.spotify.playlist_id),
        (DISCORD_WEBHOOK_URL_ENV, &mut config.discord.webhook_url),
    ] {
        if let Some(value) = var(key) {
            tracing::debug!("{key} is set");
            *target = Some(value);
        }
    }

    parse_into(HOST_ENV, var(HOST_ENV), &mut config.server.ip_addr);
    parse_into(PORT_ENV, var(PORT_ENV), &mut config.server.port);
    parse_into(
        CACHE_TTL_SECS_ENV,
        var(CACHE_TTL_SECS_ENV),
        &mut config.catalog.cache_ttl_secs,
    );
}

fn parse_into<T>(key: &str, value: Option<String>, target: &mut T)
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    let Some(value) = value else {
        return;
    };
    match value.trim().parse() {
        Ok(parsed) => {
            tracing::debug!("{key} = {parsed}");
            *target = parsed;
        }
        Err(err) => {
            tracing::warn!("Failed to parse {key} = {value}: {err}; keeping {target}");
        }
    }
}
