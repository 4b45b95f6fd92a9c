//! HTTP surface: the pixel stream, view changes, and palette refresh.

use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tokio_stream::StreamExt;
use tower_http::services::ServeDir;

use crate::broadcast::Broadcaster;
use crate::palette::fetch_random_palette;
use glint_tracer::ViewParams;

#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<Broadcaster>,
    pub client: reqwest::Client,
    pub palette_url: String,
}

/// Build the router: the streaming and control endpoints plus static
/// assets at the root.
pub fn router(state: AppState, assets: &Path) -> Router {
    Router::new()
        .route("/stream", get(stream))
        .route("/change", post(change))
        .route("/randomize", post(randomize))
        .fallback_service(ServeDir::new(assets))
        .with_state(state)
}

/// Register a viewer and answer with the endless pixel-record body.
async fn stream(State(state): State<AppState>) -> Response {
    let viewer = state.hub.subscribe();
    let body = Body::from_stream(viewer.map(Ok::<_, Infallible>));
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        body,
    )
        .into_response()
}

/// View parameters as submitted by the control form.
///
/// Fields arrive as text; anything absent or non-numeric falls back to
/// the neutral 0 rather than failing the request.
#[derive(Debug, Default, Deserialize)]
struct ChangeForm {
    #[serde(default)]
    angle: Option<String>,
    #[serde(default)]
    zoom: Option<String>,
}

impl ChangeForm {
    fn view(&self) -> ViewParams {
        ViewParams {
            angle_degrees: parse_or_zero(self.angle.as_deref()),
            zoom_percent: parse_or_zero(self.zoom.as_deref()),
        }
    }
}

fn parse_or_zero(field: Option<&str>) -> f32 {
    field
        .and_then(|s| s.trim().parse::<f32>().ok())
        .unwrap_or(0.0)
}

async fn change(State(state): State<AppState>, Form(form): Form<ChangeForm>) -> StatusCode {
    state.hub.change_view(form.view());
    StatusCode::OK
}

/// Fetch a fresh palette and rebuild the scene from it. On provider
/// failure the current palette and scene stay as they are.
async fn randomize(State(state): State<AppState>) -> StatusCode {
    match fetch_random_palette(&state.client, &state.palette_url).await {
        Ok(palette) => {
            log::info!("applying fresh palette of {} colors", palette.len());
            state.hub.apply_palette(&palette);
            StatusCode::OK
        }
        Err(err) => {
            log::warn!("palette refresh failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_form_defaults_to_neutral_view() {
        let form = ChangeForm::default();
        assert_eq!(form.view(), ViewParams::default());
    }

    #[test]
    fn test_change_form_parses_numeric_fields() {
        let form = ChangeForm {
            angle: Some("45".into()),
            zoom: Some("12.5".into()),
        };
        let view = form.view();
        assert_eq!(view.angle_degrees, 45.0);
        assert_eq!(view.zoom_percent, 12.5);
    }

    #[test]
    fn test_change_form_ignores_garbage() {
        let form = ChangeForm {
            angle: Some("sideways".into()),
            zoom: Some("".into()),
        };
        assert_eq!(form.view(), ViewParams::default());
    }
}
