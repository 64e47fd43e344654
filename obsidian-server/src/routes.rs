use std::sync::Arc;

use obsidian_catalog::{CachedReleases, CatalogCache, Release, ReleaseSource};
use serde::{Serialize, de::DeserializeOwned};
use warp::{Filter, Rejection, Reply, filters::BoxedFilter};

use crate::{
    error::{handle_rejection, reject_on_error},
    forms::{ContactMessage, DemoSubmission},
    notify::{Notify, WebhookMessage},
};

const MAX_FORM_BODY_BYTES: u64 = 64 * 1024;

/// Everything the request handlers share.
pub struct App<S, N> {
    pub cache: CatalogCache<S>,
    pub notifier: N,
}

#[derive(Debug, Serialize)]
struct ReleasesResponseBody<'a> {
    releases: &'a [Release],
    cached: bool,
}

#[derive(Debug, Serialize)]
struct StatusResponseBody {
    status: &'static str,
}
const STATUS_OK: StatusResponseBody = StatusResponseBody { status: "ok" };

fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
{
    warp::body::content_length_limit(MAX_FORM_BODY_BYTES).and(warp::body::json())
}

pub fn create_filters<S, N>(app: Arc<App<S, N>>) -> BoxedFilter<(impl Reply,)>
where
    S: ReleaseSource + Send + Sync + 'static,
    N: Notify + Send + Sync + 'static,
{
    let app = warp::any().map(move || Arc::clone(&app));

    tracing::info!("Creating API routes");

    // GET /api/releases
    let releases = warp::path!("api" / "releases")
        .and(warp::get())
        .and(app.clone())
        .and_then(|app: Arc<App<S, N>>| async move {
            let CachedReleases { releases, cached } =
                app.cache.get().await.map_err(reject_on_error)?;
            Ok::<_, Rejection>(warp::reply::json(&ReleasesResponseBody {
                releases: &releases,
                cached,
            }))
        });

    // GET /api/health
    let health = warp::path!("api" / "health")
        .and(warp::get())
        .map(|| warp::reply::json(&STATUS_OK));

    // POST /api/submit
    let submit = warp::path!("api" / "submit")
        .and(warp::post())
        .and(json_body())
        .and(app.clone())
        .and_then(|form: DemoSubmission, app: Arc<App<S, N>>| async move {
            let message = form
                .into_message(chrono::Utc::now())
                .map_err(reject_on_error)?;
            forward(&app.notifier, &message).await
        });

    // POST /api/contact
    let contact = warp::path!("api" / "contact")
        .and(warp::post())
        .and(json_body())
        .and(app)
        .and_then(|form: ContactMessage, app: Arc<App<S, N>>| async move {
            let message = form
                .into_message(chrono::Utc::now())
                .map_err(reject_on_error)?;
            forward(&app.notifier, &message).await
        });

    releases
        .or(health)
        .or(submit)
        .or(contact)
        .recover(handle_rejection)
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_methods(vec!["GET", "POST"])
                .allow_header("content-type"),
        )
        .with(warp::trace::request())
        .boxed()
}

async fn forward<N: Notify>(
    notifier: &N,
    message: &WebhookMessage,
) -> Result<warp::reply::Json, Rejection> {
    notifier.notify(message).await.map_err(reject_on_error)?;
    Ok(warp::reply::json(&STATUS_OK))
}
