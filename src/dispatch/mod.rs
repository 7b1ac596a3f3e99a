// ── Event dispatch table ──────────────────────────────────────────────────────
//
// Raw window messages are decoded here into `WindowEvent`, the closed set of
// events the shell reacts to.  `app::Shell::dispatch` maps each event to its
// handler and answers with a `Reply`; OS side effects go through `Host`.
// Pure Rust: the window procedure in `platform::win32::window` is the only
// caller that touches real message parameters.

pub(crate) mod messages;

#[cfg(test)]
pub(crate) mod fake;

use crate::editor::{CharPosition, CompositionFlags};

use messages::*;

// ── WindowEvent ───────────────────────────────────────────────────────────────

/// A window message the shell handles, with its parameters unpacked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum WindowEvent {
    /// Cursor shape query; `hit_test` is the `HT*` code.
    SetCursor { hit_test: u16 },
    /// One UTF-16 code unit from `WM_CHAR`, `WM_SYSCHAR` or `WM_IME_CHAR`.
    Char(u16),
    KeyDown(u32),
    KeyUp(u32),
    LButtonDown { x: f32, y: f32 },
    LButtonUp { x: f32, y: f32 },
    MouseWheel(i16),
    ImeSetContext { flags: usize },
    ImeNotify { command: usize },
    /// `data` is the raw request payload (an `IMECHARPOSITION*` for
    /// `IMR_QUERYCHARPOSITION`).
    ImeRequest { command: usize, data: isize },
    ImeStartComposition,
    ImeComposition(CompositionFlags),
    ImeEndComposition,
    Resize { width: u32, height: u32 },
    Timer(usize),
    DisplayChange,
    Destroy,
}

impl WindowEvent {
    /// Decode a window message.  `None` means the shell has no handler and
    /// the message belongs to default processing.
    pub(crate) fn decode(msg: u32, wparam: usize, lparam: isize) -> Option<Self> {
        let event = match msg {
            WM_SETCURSOR => Self::SetCursor {
                hit_test: loword(lparam as usize),
            },
            WM_CHAR | WM_SYSCHAR | WM_IME_CHAR => Self::Char(wparam as u16),
            WM_KEYDOWN => Self::KeyDown(wparam as u32),
            WM_KEYUP => Self::KeyUp(wparam as u32),
            WM_LBUTTONDOWN => {
                let (x, y) = point_from_lparam(lparam);
                Self::LButtonDown { x, y }
            }
            WM_LBUTTONUP => {
                let (x, y) = point_from_lparam(lparam);
                Self::LButtonUp { x, y }
            }
            WM_MOUSEWHEEL => Self::MouseWheel(hiword(wparam) as i16),
            WM_IME_SETCONTEXT => Self::ImeSetContext {
                flags: lparam as usize,
            },
            WM_IME_NOTIFY => Self::ImeNotify { command: wparam },
            WM_IME_REQUEST => Self::ImeRequest {
                command: wparam,
                data: lparam,
            },
            WM_IME_STARTCOMPOSITION => Self::ImeStartComposition,
            WM_IME_COMPOSITION => Self::ImeComposition(CompositionFlags(lparam as u32)),
            WM_IME_ENDCOMPOSITION => Self::ImeEndComposition,
            WM_SIZE => Self::Resize {
                width: u32::from(loword(lparam as usize)),
                height: u32::from(hiword(lparam as usize)),
            },
            WM_TIMER => Self::Timer(wparam),
            WM_DISPLAYCHANGE => Self::DisplayChange,
            WM_DESTROY => Self::Destroy,
            _ => return None,
        };
        Some(event)
    }
}

// ── Reply ─────────────────────────────────────────────────────────────────────

/// What the window procedure returns for a dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reply {
    /// Fully handled; return this value without default processing.
    Handled(isize),
    /// Pass the original message on to default processing.
    Default,
    /// Pass the message on to default processing with a rewritten LPARAM.
    DefaultWith { lparam: isize },
}

// ── Host ──────────────────────────────────────────────────────────────────────

/// OS side effects a handler may request.
pub(crate) trait Host {
    /// Register a periodic timer on the window.  Returns `false` on failure.
    fn set_timer(&mut self, id: usize, interval_ms: u32) -> bool;

    fn set_ibeam_cursor(&mut self);

    /// Request a redraw of the whole client area.
    fn invalidate(&mut self);

    fn post_quit(&mut self, exit_code: i32);

    /// Hand the OS structure behind an `IMR_QUERYCHARPOSITION` request to
    /// `answer`, copying the filled-in fields back.
    fn answer_char_position(&mut self, request: isize, answer: &mut dyn FnMut(&mut CharPosition));
}

// ── Parameter unpacking ───────────────────────────────────────────────────────

fn loword(v: usize) -> u16 {
    (v & 0xFFFF) as u16
}

fn hiword(v: usize) -> u16 {
    ((v >> 16) & 0xFFFF) as u16
}

/// `GET_X_LPARAM` / `GET_Y_LPARAM`: signed so multi-monitor negatives survive.
fn point_from_lparam(lparam: isize) -> (f32, f32) {
    let x = loword(lparam as usize) as i16;
    let y = hiword(lparam as usize) as i16;
    (f32::from(x), f32::from(y))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
