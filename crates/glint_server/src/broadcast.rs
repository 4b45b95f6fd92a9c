//! Render supersession and pixel-record fan-out.
//!
//! A [`Broadcaster`] owns two pieces of shared state: the viewer registry
//! (who receives pixel records) and the current-render slot (which render
//! is authoritative). Every state change that needs a fresh image, a
//! viewer connecting, a view-parameter change, a new palette, goes through
//! the same supersede path: cancel the old render's token, snapshot the
//! new scene and camera, and spawn a fresh render on the blocking pool.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use bytes::Bytes;
use glint_tracer::{
    demo_world, render, Color, PixelUpdate, RenderOptions, ViewParams, World, DEFAULT_PALETTE,
};
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;

/// Bytes per pixel record on the wire.
pub const PIXEL_RECORD_LEN: usize = 7;

/// Encode one pixel update as a wire record: u16 LE x, u16 LE y, R, G, B.
pub fn encode_pixel(update: &PixelUpdate) -> [u8; PIXEL_RECORD_LEN] {
    let x = update.x.to_le_bytes();
    let y = update.y.to_le_bytes();
    let [r, g, b] = update.rgb;
    [x[0], x[1], y[0], y[1], r, g, b]
}

type ViewerId = u64;

/// Per-viewer buffer in records; a viewer further behind than this is
/// dropped rather than allowed to stall everyone.
const VIEWER_CHANNEL_CAPACITY: usize = 1 << 16;

struct RenderSlot {
    cancel: CancellationToken,
    view: ViewParams,
    world: Arc<World>,
}

/// Fan-out hub: viewer registry plus the authoritative render slot.
pub struct Broadcaster {
    options: RenderOptions,
    viewers: Mutex<HashMap<ViewerId, mpsc::Sender<Bytes>>>,
    next_viewer_id: AtomicU64,
    slot: Mutex<RenderSlot>,
}

impl Broadcaster {
    /// Create a hub around the demo scene. No render starts until the
    /// first subscriber or parameter change.
    pub fn new(options: RenderOptions) -> Self {
        let world = demo_world(&DEFAULT_PALETTE, &mut rand::thread_rng());
        Self {
            options,
            viewers: Mutex::new(HashMap::new()),
            next_viewer_id: AtomicU64::new(0),
            slot: Mutex::new(RenderSlot {
                cancel: CancellationToken::new(),
                view: ViewParams::default(),
                world: Arc::new(world),
            }),
        }
    }

    /// Register a viewer and supersede the current render so the new
    /// viewer receives a complete image from its first record.
    pub fn subscribe(self: &Arc<Self>) -> Viewer {
        let (tx, rx) = mpsc::channel(VIEWER_CHANNEL_CAPACITY);
        let id = self.next_viewer_id.fetch_add(1, Ordering::Relaxed);

        let active = {
            let mut viewers = self.viewers.lock().unwrap();
            viewers.insert(id, tx);
            viewers.len()
        };
        log::info!("viewer {id} connected ({active} active)");

        self.restart(|_| {});
        Viewer {
            id,
            rx,
            hub: Arc::clone(self),
        }
    }

    /// Number of registered viewers.
    pub fn viewer_count(&self) -> usize {
        self.viewers.lock().unwrap().len()
    }

    /// Supersede the current render with new view parameters.
    pub fn change_view(self: &Arc<Self>, view: ViewParams) {
        log::info!(
            "view change: angle {:.1} deg, zoom {:.1}%",
            view.angle_degrees,
            view.zoom_percent
        );
        self.restart(|slot| slot.view = view);
    }

    /// Install a new scene and supersede the current render.
    pub fn set_scene(self: &Arc<Self>, world: World) {
        self.restart(|slot| slot.world = Arc::new(world));
    }

    /// Regenerate the scene from a palette and supersede the current
    /// render.
    pub fn apply_palette(self: &Arc<Self>, palette: &[Color]) {
        let world = demo_world(palette, &mut rand::thread_rng());
        self.set_scene(world);
    }

    /// The single supersede path. Cancels the incumbent render under the
    /// slot lock, applies the state change, and spawns the successor.
    /// Because the old token is cancelled before the new one exists, the
    /// old render can never emit once the successor has started emitting.
    fn restart<F: FnOnce(&mut RenderSlot)>(self: &Arc<Self>, mutate: F) {
        let (cancel, view, world) = {
            let mut slot = self.slot.lock().unwrap();
            slot.cancel.cancel();
            mutate(&mut slot);
            slot.cancel = CancellationToken::new();
            (slot.cancel.clone(), slot.view, Arc::clone(&slot.world))
        };

        let hub = Arc::clone(self);
        let options = self.options.clone();
        tokio::task::spawn_blocking(move || {
            let camera = view.camera(options.width, options.height);
            let mut rng = rand::thread_rng();
            render(&world, &camera, &options, &cancel, &mut rng, &mut |update| {
                hub.fan_out(&cancel, &update);
            });
        });
    }

    /// Deliver one record to every registered viewer.
    ///
    /// The registry lock serializes delivery across renders, and the
    /// token is re-checked under it: a superseded render that lost the
    /// race to this point drops its record instead of interleaving with
    /// its successor. Viewers whose channel is closed or full are
    /// removed.
    fn fan_out(&self, cancel: &CancellationToken, update: &PixelUpdate) {
        let record = Bytes::copy_from_slice(&encode_pixel(update));

        let mut viewers = self.viewers.lock().unwrap();
        if cancel.is_cancelled() {
            return;
        }
        viewers.retain(|id, tx| match tx.try_send(record.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Closed(_)) => {
                log::info!("viewer {id} disconnected");
                false
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::warn!("dropping viewer {id}: receive buffer full");
                false
            }
        });
    }

    fn remove_viewer(&self, id: ViewerId) {
        let mut viewers = self.viewers.lock().unwrap();
        if viewers.remove(&id).is_some() {
            log::info!("viewer {id} removed ({} active)", viewers.len());
        }
    }
}

/// A registered viewer's half of the pixel-record stream.
///
/// Yields one [`Bytes`] chunk per wire record; dropping the viewer
/// removes it from the registry.
pub struct Viewer {
    id: ViewerId,
    rx: mpsc::Receiver<Bytes>,
    hub: Arc<Broadcaster>,
}

impl Viewer {
    /// Receive the next record, or `None` once the hub dropped this
    /// viewer.
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.rx.recv().await
    }
}

impl Stream for Viewer {
    type Item = Bytes;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Bytes>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.hub.remove_viewer(self.id);
    }
}
