use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use profiledeck_lib::error::ViewModelError;
use profiledeck_lib::profile::Profile;
use profiledeck_lib::session::{ScrollMetrics, View};
use profiledeck_lib::view_model::Handle;
use serde::Deserialize;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing::{event, Level};
use uuid::Uuid;

pub async fn start_webserver(addr: SocketAddr, handle: Handle) -> anyhow::Result<()> {
    axum::Server::bind(&addr)
        .serve(router(handle).into_make_service())
        .await?;
    Ok(())
}

pub fn router(handle: Handle) -> Router {
    let cors = CorsLayer::new()
        // allow any headers
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any);

    Router::new()
        .route("/", get(view))
        .route("/view", get(view))
        .route("/profiles", get(profiles))
        .route("/filters", post(filters))
        .route("/scroll", post(scroll))
        .route("/load-more", post(load_more))
        .route("/select", post(select_profile))
        .route("/select/:id", post(select))
        .route("/selected", get(selected))
        .route("/refresh", post(refresh))
        .layer(cors)
        .with_state(handle)
}

#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl From<ViewModelError> for ApiError {
    fn from(e: ViewModelError) -> Self {
        ApiError(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    search: String,
    #[serde(default)]
    gender: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ScrollRequest {
    Distance {
        distance_from_bottom: u32,
    },
    Metrics {
        scroll_top: u32,
        viewport_height: u32,
        content_height: u32,
    },
}

impl ScrollRequest {
    fn distance_from_bottom(&self) -> u32 {
        match *self {
            ScrollRequest::Distance {
                distance_from_bottom,
            } => distance_from_bottom,
            ScrollRequest::Metrics {
                scroll_top,
                viewport_height,
                content_height,
            } => ScrollMetrics {
                scroll_top,
                viewport_height,
                content_height,
            }
            .distance_from_bottom(),
        }
    }
}

async fn view(State(handle): State<Handle>) -> ApiResult<View> {
    Ok(Json(handle.view().await?))
}

async fn profiles(State(handle): State<Handle>) -> ApiResult<Vec<Profile>> {
    Ok(Json(handle.view().await?.displayed))
}

async fn filters(
    State(handle): State<Handle>,
    Json(request): Json<FilterRequest>,
) -> ApiResult<View> {
    event!(Level::INFO, search = %request.search, gender = %request.gender, "Applying filters");
    handle.edit_search(request.search).await?;
    handle.edit_gender(request.gender).await?;
    Ok(Json(handle.apply_filters().await?))
}

async fn scroll(
    State(handle): State<Handle>,
    Json(request): Json<ScrollRequest>,
) -> ApiResult<View> {
    Ok(Json(handle.scroll(request.distance_from_bottom()).await?))
}

async fn load_more(State(handle): State<Handle>) -> ApiResult<View> {
    Ok(Json(handle.load_more().await?))
}

async fn select(State(handle): State<Handle>, Path(id): Path<Uuid>) -> ApiResult<View> {
    event!(Level::DEBUG, %id, "Selecting profile");
    let view = handle.select(id).await?;
    match &view.selected {
        Some(profile) if profile.id() == id => Ok(Json(view)),
        _ => Err(ApiError(
            StatusCode::NOT_FOUND,
            format!("No fetched profile with id {}", id),
        )),
    }
}

/// Select a profile the client already holds, even one from a pool that a
/// refresh has since replaced.
async fn select_profile(
    State(handle): State<Handle>,
    Json(profile): Json<Profile>,
) -> ApiResult<View> {
    event!(Level::DEBUG, id = %profile.id(), "Selecting profile");
    Ok(Json(handle.select_profile(profile).await?))
}

async fn selected(State(handle): State<Handle>) -> ApiResult<Option<Profile>> {
    Ok(Json(handle.view().await?.selected))
}

async fn refresh(State(handle): State<Handle>) -> ApiResult<View> {
    event!(Level::INFO, "Refetching profiles");
    Ok(Json(handle.fetch_initial().await?))
}
