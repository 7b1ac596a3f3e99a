// ── Editor component contract ─────────────────────────────────────────────────
//
// The shell owns exactly one editor and forwards window input to it.  The
// editor owns everything about text: buffer, caret, IME composition state and
// glyph drawing.  Nothing here touches Win32; the render target type is left
// to the platform through `Editor::Target`.

#[cfg(test)]
pub(crate) mod fake;

/// Everything the shell needs from the hosted text-editing component.
///
/// All methods run on the UI thread, strictly serialised with rendering.
pub(crate) trait Editor {
    /// The surface handed to `render`.  Chosen by the platform backend.
    type Target;

    /// One-time setup after construction (fonts, brushes, …).
    ///
    /// A failure here is fatal for the process: there is no useful window
    /// without a working editor.
    fn initialize(&mut self) -> Result<(), EditorError>;

    /// Replace the whole document.
    fn set_text(&mut self, text: &str);

    fn on_char(&mut self, ch: char);
    fn on_key_down(&mut self, virtual_key: u32);
    fn on_key_up(&mut self, virtual_key: u32);

    /// Pointer coordinates are client-area pixels.
    fn on_lbutton_down(&mut self, x: f32, y: f32);
    fn on_lbutton_up(&mut self, x: f32, y: f32);

    /// Signed wheel delta; one notch is `WHEEL_DELTA` (120).
    fn on_mouse_wheel(&mut self, delta: i16);

    fn on_open_candidate(&mut self);

    /// Answer the IME's "where is character N" request by filling `position`.
    fn on_query_char_position(&mut self, position: &mut CharPosition);

    fn on_ime_start_composition(&mut self);
    fn on_ime_composition(&mut self, flags: CompositionFlags);
    fn on_ime_end_composition(&mut self);

    fn on_resize(&mut self, width: u32, height: u32);

    /// Draw the document.  The shell has already begun the draw pass,
    /// reset the transform and cleared the surface.
    fn render(&mut self, target: &Self::Target);

    /// Timers the editor wants driven by the window.
    fn timers(&mut self) -> &mut [Timer];
}

// ── EditorError ───────────────────────────────────────────────────────────────

/// Domain error raised by an editor during `initialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorError {
    message: String,
}

impl EditorError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub(crate) fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EditorError {}

// ── Timer ─────────────────────────────────────────────────────────────────────

/// A periodic callback the editor asks the window to drive.
///
/// Every timer is registered with the OS at window creation regardless of
/// `enabled`; the flag only decides whether a tick runs `callback`.
pub(crate) struct Timer {
    pub(crate) id: usize,
    pub(crate) interval_ms: u32,
    pub(crate) enabled: bool,
    pub(crate) callback: Box<dyn FnMut()>,
}

impl Timer {
    pub(crate) fn new(id: usize, interval_ms: u32, callback: impl FnMut() + 'static) -> Self {
        Self {
            id,
            interval_ms,
            enabled: true,
            callback: Box::new(callback),
        }
    }

    /// Run the callback if this timer is enabled and carries `id`.
    /// Returns whether it fired.
    pub(crate) fn fire_if(&mut self, id: usize) -> bool {
        if self.id == id && self.enabled {
            (self.callback)();
            true
        } else {
            false
        }
    }
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("id", &self.id)
            .field("interval_ms", &self.interval_ms)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

// ── IME payloads ──────────────────────────────────────────────────────────────

/// Platform-neutral view of the IME's character-position query.
///
/// `char_index` is the input; the editor fills the remaining fields in
/// screen coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CharPosition {
    pub(crate) char_index: u32,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) line_height: u32,
    pub(crate) document: Rect,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rect {
    pub(crate) left: i32,
    pub(crate) top: i32,
    pub(crate) right: i32,
    pub(crate) bottom: i32,
}

/// The `GCS_*` bits that accompany a composition update.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CompositionFlags(pub(crate) u32);

impl CompositionFlags {
    pub(crate) const COMP_STR: u32 = 0x0008;
    pub(crate) const RESULT_STR: u32 = 0x0800;

    /// The in-progress composition string changed.
    pub(crate) fn has_composition(self) -> bool {
        self.0 & Self::COMP_STR != 0
    }

    /// A finished result string is available.
    pub(crate) fn has_result(self) -> bool {
        self.0 & Self::RESULT_STR != 0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
