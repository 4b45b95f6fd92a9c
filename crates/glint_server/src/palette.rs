//! Client for the Colormind palette provider.

use glint_tracer::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default palette provider endpoint.
pub const COLORMIND_URL: &str = "http://colormind.io/api/";

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("palette request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("palette response contained no colors")]
    Empty,
}

#[derive(Serialize)]
struct PaletteRequest<'a> {
    model: &'a str,
}

#[derive(Deserialize)]
struct PaletteResponse {
    result: Vec<[f32; 3]>,
}

/// Fetch a random palette from the provider.
///
/// The provider answers `{"result": [[r, g, b], ..]}` with 8-bit channel
/// values; they are normalized into the engine's [0, 1] color space. A
/// failed request or an empty palette is an error and leaves the caller's
/// palette state untouched.
pub async fn fetch_random_palette(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<Color>, PaletteError> {
    let response: PaletteResponse = client
        .post(url)
        .json(&PaletteRequest { model: "default" })
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if response.result.is_empty() {
        return Err(PaletteError::Empty);
    }
    Ok(normalize(&response.result))
}

fn normalize(raw: &[[f32; 3]]) -> Vec<Color> {
    raw.iter()
        .map(|[r, g, b]| Color::new(r / 255.0, g / 255.0, b / 255.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_maps_channels_into_unit_range() {
        let colors = normalize(&[[255.0, 0.0, 127.5], [0.0, 255.0, 0.0]]);
        assert_eq!(colors.len(), 2);
        assert_eq!(colors[0], Color::new(1.0, 0.0, 0.5));
        assert_eq!(colors[1], Color::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_decode_provider_response() {
        let json = r#"{"result": [[18, 52, 86], [255, 255, 255]]}"#;
        let decoded: PaletteResponse = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.result, vec![[18.0, 52.0, 86.0], [255.0, 255.0, 255.0]]);
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_string(&PaletteRequest { model: "default" }).unwrap();
        assert_eq!(body, r#"{"model":"default"}"#);
    }
}
