use std::sync::Arc;

use obsidian_catalog::{CatalogCache, SpotifyReleaseSource, spotify};

mod config;
mod env;
mod error;
mod forms;
mod notify;
mod routes;

use notify::DiscordWebhook;
use routes::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env::init_environment();
    env::init_tracing()?;

    let mut config = config::Config::load()?;
    env::patch_config(&mut config);
    tracing::debug!("{config:?}");

    if config.spotify.playlist_id().is_none() {
        tracing::warn!("no Spotify playlist configured, /api/releases will fail");
    }
    if config.discord.webhook_url().is_none() {
        tracing::warn!("no Discord webhook configured, forms will not be forwarded");
    }

    let app = Arc::new(App {
        cache: CatalogCache::with_ttl(
            SpotifyReleaseSource::new(spotify::Client::new(), config.spotify.clone()),
            config.catalog.cache_ttl(),
        ),
        notifier: DiscordWebhook::new(reqwest::Client::new(), config.discord.clone()),
    });

    tracing::info!("caching releases for {:?}", app.cache.ttl());

    let filters = routes::create_filters(app);
    let (socket_addr, server) = warp::serve(filters).try_bind_with_graceful_shutdown(
        config.server.socket_addr(),
        async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {err}");
            }
        },
    )?;

    tracing::info!("Listening on http://{socket_addr}");
    server.await;
    tracing::info!("Stopped");

    Ok(())
}
