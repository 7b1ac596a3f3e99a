// ── Window message constants ──────────────────────────────────────────────────
//
// Source of truth: WinUser.h / imm.h.  Only the messages the shell decodes are
// listed.  Kept free of the Win32 bindings so decoding builds on any host.

// ── Lifecycle ─────────────────────────────────────────────────────────────────

pub(crate) const WM_CREATE: u32 = 0x0001;
pub(crate) const WM_DESTROY: u32 = 0x0002;
pub(crate) const WM_SIZE: u32 = 0x0005;
pub(crate) const WM_SETCURSOR: u32 = 0x0020;
pub(crate) const WM_DISPLAYCHANGE: u32 = 0x007E;
pub(crate) const WM_NCDESTROY: u32 = 0x0082;
pub(crate) const WM_TIMER: u32 = 0x0113;

// ── Keyboard ──────────────────────────────────────────────────────────────────

pub(crate) const WM_KEYDOWN: u32 = 0x0100;
pub(crate) const WM_KEYUP: u32 = 0x0101;
pub(crate) const WM_CHAR: u32 = 0x0102;
pub(crate) const WM_SYSCHAR: u32 = 0x0106;

// ── Mouse ─────────────────────────────────────────────────────────────────────

pub(crate) const WM_LBUTTONDOWN: u32 = 0x0201;
pub(crate) const WM_LBUTTONUP: u32 = 0x0202;
pub(crate) const WM_MOUSEWHEEL: u32 = 0x020A;

/// `WM_SETCURSOR` hit-test code for the client area (LOWORD of LPARAM).
pub(crate) const HTCLIENT: u16 = 1;

// ── IME ───────────────────────────────────────────────────────────────────────

pub(crate) const WM_IME_STARTCOMPOSITION: u32 = 0x010D;
pub(crate) const WM_IME_ENDCOMPOSITION: u32 = 0x010E;
pub(crate) const WM_IME_COMPOSITION: u32 = 0x010F;
pub(crate) const WM_IME_SETCONTEXT: u32 = 0x0281;
pub(crate) const WM_IME_NOTIFY: u32 = 0x0282;
pub(crate) const WM_IME_CHAR: u32 = 0x0286;
pub(crate) const WM_IME_REQUEST: u32 = 0x0288;

/// `WM_IME_NOTIFY` command: the candidate list is about to open.
pub(crate) const IMN_OPENCANDIDATE: usize = 0x0005;
/// `WM_IME_REQUEST` command: LPARAM points to an `IMECHARPOSITION`.
pub(crate) const IMR_QUERYCHARPOSITION: usize = 0x0006;
/// `WM_IME_SETCONTEXT` flag asking the IME to draw its own composition window.
pub(crate) const ISC_SHOWUICOMPOSITIONWINDOW: usize = 0x8000_0000;
