//! Streaming ray-tracing server.
//!
//! Serves an endless binary pixel stream to any number of viewers while a
//! single authoritative render refines the image in the background. View
//! changes and palette refreshes cancel the in-flight render and start a
//! fresh one; every connected viewer sees the same records in the same
//! order.

pub mod broadcast;
pub mod config;
pub mod palette;
pub mod routes;

pub use broadcast::{encode_pixel, Broadcaster, Viewer, PIXEL_RECORD_LEN};
pub use config::Config;
pub use palette::{fetch_random_palette, PaletteError, COLORMIND_URL};
pub use routes::{router, AppState};
