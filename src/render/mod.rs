// ── Rendering abstraction ─────────────────────────────────────────────────────
//
// The shell draws through two small traits so that the device-resource
// lifecycle (create lazily, resize in place, discard on device loss) is plain
// Rust that can be exercised without a GPU.  The Direct2D implementation lives
// in `platform::win32::d2d`.

pub(crate) mod resources;

#[cfg(test)]
pub(crate) mod fake;

pub(crate) use resources::DeviceResources;

use serde::{Deserialize, Serialize};

use crate::{error::Result, platform::WindowId};

// ── Value types ───────────────────────────────────────────────────────────────

/// A size in device pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PixelSize {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl PixelSize {
    pub(crate) const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Straight (non-premultiplied) RGBA colour, each channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct Color {
    pub(crate) r: f32,
    pub(crate) g: f32,
    pub(crate) b: f32,
    #[serde(default = "opaque")]
    pub(crate) a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub(crate) const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub(crate) const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    pub(crate) const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

// ── Backend traits ────────────────────────────────────────────────────────────

/// A window-bound drawing surface (device-dependent resource).
pub(crate) trait Surface {
    fn begin_draw(&self);

    /// Reset the world transform to identity.
    fn reset_transform(&self);

    fn clear(&self, color: Color);

    /// Finish the draw pass and present.
    ///
    /// Returns `ScrawlError::DeviceLost` when the surface must be discarded
    /// and recreated before the next pass.
    fn end_draw(&self) -> Result<()>;

    /// Resize the backing buffer in place.
    fn resize(&self, size: PixelSize) -> Result<()>;

    #[cfg(test)]
    fn size(&self) -> PixelSize;
}

/// Creates surfaces for a window (owns the device-independent factory).
pub(crate) trait SurfaceFactory {
    type Surface: Surface + 'static;

    /// Current client-area size of `window`.
    fn client_size(&self, window: WindowId) -> Result<PixelSize>;

    fn create_surface(&self, window: WindowId, size: PixelSize) -> Result<Self::Surface>;
}
