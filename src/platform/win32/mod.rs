// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is the only module tree in the codebase where `unsafe` code is
// permitted.  Every `unsafe` block MUST carry a `// SAFETY:` comment that
// states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub mod com; // COM apartment guard for main()
pub mod window; // main window, WndProc, message loop

pub(crate) mod d2d; // Direct2D / DirectWrite factories and the HWND surface
pub(crate) mod dpi; // DPI awareness + system DPI query
pub(crate) mod plain_editor; // minimal DirectWrite editor hosted by default

use std::ffi::c_void;

use windows::Win32::{
    Foundation::HWND,
    System::Memory::{HeapEnableTerminationOnCorruption, HeapSetInformation},
};

use crate::{
    error::{Result, ScrawlError},
    platform::WindowId,
};

pub(crate) fn window_id(hwnd: HWND) -> WindowId {
    WindowId(hwnd.0 as isize)
}

pub(crate) fn hwnd_of(window: WindowId) -> HWND {
    HWND(window.0 as *mut c_void)
}

/// Build a `map_err` adapter that names the failing call.
pub(crate) fn failed(function: &'static str) -> impl FnOnce(windows::core::Error) -> ScrawlError {
    move |e| ScrawlError::Win32 {
        function,
        code: e.code().0 as u32,
    }
}

/// Make the process terminate on heap corruption instead of running on with
/// a damaged heap.  Applies to every heap; call before anything allocates
/// through COM.
pub(crate) fn enable_heap_termination() -> Result<()> {
    // SAFETY: a null heap handle with no payload is the documented form for
    // HeapEnableTerminationOnCorruption.
    unsafe { HeapSetInformation(None, HeapEnableTerminationOnCorruption, None, 0) }
        .map_err(failed("HeapSetInformation"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
