// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the public interface that the rest of the codebase uses
// to talk to the OS.  No `unsafe` lives here; all Win32 FFI is confined to the
// `win32` sub-module and never leaks outward.

#[cfg(windows)]
pub mod win32;

/// Opaque identifier of an OS window (the `HWND` value on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct WindowId(pub(crate) isize);

/// The DPI at which one logical unit equals one device pixel.
pub(crate) const BASE_DPI: u32 = 96;

/// Convert a length in logical units (96 DPI) to device pixels at `dpi`,
/// rounding up so the drawable area is never smaller than requested.
pub(crate) fn scale_logical(logical: u32, dpi: u32) -> i32 {
    let px = (u64::from(logical) * u64::from(dpi)).div_ceil(u64::from(BASE_DPI));
    i32::try_from(px).unwrap_or(i32::MAX)
}

/// Device pixels to device-independent pixels (the unit Direct2D and
/// DirectWrite lay out in).
pub(crate) fn px_to_dip(px: f32, dpi: u32) -> f32 {
    px * BASE_DPI as f32 / dpi.max(1) as f32
}

/// DIPs back to whole device pixels, for APIs that take client coordinates.
pub(crate) fn dip_to_px(dip: f32, dpi: u32) -> i32 {
    (dip * dpi as f32 / BASE_DPI as f32).round() as i32
}

// ── Tests ─────────────────────────────────────────────────────────────────────
