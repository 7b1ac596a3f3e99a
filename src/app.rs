// ── Application lifecycle & top-level state ────────────────────────────────────
//
// A single `Shell` is created on startup and lives for the lifetime of the
// main window.  It owns the device resources and the editor, maps every
// decoded window event to its handler, and drives one render pass per
// message-loop iteration.  All mutations happen on the UI thread; there is no
// global mutable state here (the window procedure finds the shell through
// `registry::WindowRegistry`).

use crate::{
    config::ShellConfig,
    dispatch::{
        messages::{HTCLIENT, IMN_OPENCANDIDATE, IMR_QUERYCHARPOSITION, ISC_SHOWUICOMPOSITIONWINDOW},
        Host, Reply, WindowEvent,
    },
    editor::{CharPosition, Editor},
    error::{Result, ScrawlError},
    platform::WindowId,
    render::{Color, DeviceResources, Surface, SurfaceFactory},
};

/// The hosted editor, drawing onto surfaces of type `S`.
pub(crate) type BoxedEditor<S> = Box<dyn Editor<Target = S>>;

/// Builds the editor once the window exists.  Runs inside `WM_CREATE`.
pub(crate) type EditorFactory<S> = Box<dyn FnOnce(WindowId) -> BoxedEditor<S>>;

// ── Shell ─────────────────────────────────────────────────────────────────────

/// Top-level application state.
///
/// Passed by mutable reference into every handler so that all shell logic
/// sees a single, explicit state root.
pub(crate) struct Shell<F: SurfaceFactory> {
    editor: Option<BoxedEditor<F::Surface>>,
    resources: DeviceResources<F>,
    make_editor: Option<EditorFactory<F::Surface>>,
    window: Option<WindowId>,
    initial_text: String,
    background: Color,
    chars: Utf16Joiner,
    /// Set when `WM_CREATE` failed; collected by the window binder.
    startup_error: Option<ScrawlError>,
    /// `WM_DESTROY` seen: stop drawing into a window that is going away.
    destroyed: bool,
}

impl<F: SurfaceFactory> Shell<F> {
    pub(crate) fn new(
        factory: F,
        make_editor: EditorFactory<F::Surface>,
        config: &ShellConfig,
    ) -> Self {
        Self {
            editor: None,
            resources: DeviceResources::new(factory),
            make_editor: Some(make_editor),
            window: None,
            initial_text: config.initial_text.clone(),
            background: config.background,
            chars: Utf16Joiner::default(),
            startup_error: None,
            destroyed: false,
        }
    }

    // ── Window creation ───────────────────────────────────────────────────────

    /// One-time setup for the freshly created window: build and initialise
    /// the editor, seed its text, register its timers.
    ///
    /// On error the editor is not kept and nothing is registered.
    pub(crate) fn create(&mut self, window: WindowId, host: &mut dyn Host) -> Result<()> {
        let Some(make_editor) = self.make_editor.take() else {
            log::warn!("{window:?} created twice; keeping the existing editor");
            return Ok(());
        };

        self.window = Some(window);
        self.resources.bind(window);

        let mut editor = make_editor(window);
        editor.initialize()?;
        editor.set_text(&self.initial_text);

        // Registration is unconditional; `enabled` is checked per tick.
        let timers = editor.timers();
        for timer in timers.iter() {
            if !host.set_timer(timer.id, timer.interval_ms) {
                log::warn!(
                    "could not register timer {} ({} ms)",
                    timer.id,
                    timer.interval_ms
                );
            }
        }
        log::info!("editor ready on {window:?} with {} timer(s)", timers.len());

        self.editor = Some(editor);
        Ok(())
    }

    /// Remember why `WM_CREATE` failed so `run` can report it.
    pub(crate) fn fail_startup(&mut self, error: ScrawlError) {
        self.startup_error = Some(error);
    }

    pub(crate) fn take_startup_error(&mut self) -> Option<ScrawlError> {
        self.startup_error.take()
    }

    pub(crate) fn window(&self) -> Option<WindowId> {
        self.window
    }

    // ── Event dispatch ────────────────────────────────────────────────────────

    /// Route one decoded window event to its handler.
    ///
    /// Before the editor exists every event falls through to default
    /// processing and no editor method runs.
    pub(crate) fn dispatch(&mut self, event: WindowEvent, host: &mut dyn Host) -> Reply {
        let Some(editor) = self.editor.as_mut() else {
            return Reply::Default;
        };
        log::trace!("dispatch {event:?}");

        match event {
            WindowEvent::SetCursor { hit_test } if hit_test == HTCLIENT => {
                host.set_ibeam_cursor();
                Reply::Handled(1)
            }
            WindowEvent::SetCursor { .. } => Reply::Default,

            WindowEvent::Char(unit) => {
                if let Some(ch) = self.chars.push(unit) {
                    editor.on_char(ch);
                }
                Reply::Handled(0)
            }
            WindowEvent::KeyDown(key) => {
                editor.on_key_down(key);
                Reply::Handled(0)
            }
            WindowEvent::KeyUp(key) => {
                editor.on_key_up(key);
                Reply::Handled(0)
            }

            WindowEvent::LButtonDown { x, y } => {
                editor.on_lbutton_down(x, y);
                Reply::Handled(0)
            }
            WindowEvent::LButtonUp { x, y } => {
                editor.on_lbutton_up(x, y);
                Reply::Handled(0)
            }
            WindowEvent::MouseWheel(delta) => {
                editor.on_mouse_wheel(delta);
                Reply::Handled(0)
            }

            // Keep the IME active but stop it drawing its own composition
            // window; the editor draws composition text inline.  The masked
            // flags must reach DefWindowProc; returning 0 here would drop them.
            WindowEvent::ImeSetContext { flags } => Reply::DefaultWith {
                lparam: (flags & !ISC_SHOWUICOMPOSITIONWINDOW) as isize,
            },
            WindowEvent::ImeNotify { command } if command == IMN_OPENCANDIDATE => {
                editor.on_open_candidate();
                Reply::Handled(0)
            }
            WindowEvent::ImeNotify { .. } => Reply::Default,
            // The IME only accepts the answer on a non-zero return.
            WindowEvent::ImeRequest { command, data } if command == IMR_QUERYCHARPOSITION => {
                host.answer_char_position(data, &mut |position: &mut CharPosition| {
                    editor.on_query_char_position(position)
                });
                Reply::Handled(1)
            }
            WindowEvent::ImeRequest { .. } => Reply::Default,
            WindowEvent::ImeStartComposition => {
                editor.on_ime_start_composition();
                Reply::Default
            }
            WindowEvent::ImeComposition(flags) => {
                editor.on_ime_composition(flags);
                Reply::Default
            }
            WindowEvent::ImeEndComposition => {
                editor.on_ime_end_composition();
                Reply::Default
            }

            WindowEvent::Resize { width, height } => {
                self.resources.resize(width, height);
                editor.on_resize(width, height);
                Reply::Handled(0)
            }
            WindowEvent::Timer(id) => {
                let fired = editor
                    .timers()
                    .iter_mut()
                    .map(|timer| timer.fire_if(id))
                    .filter(|fired| *fired)
                    .count();
                log::trace!("timer {id}: {fired} callback(s)");
                Reply::Handled(0)
            }
            WindowEvent::DisplayChange => {
                host.invalidate();
                Reply::Handled(0)
            }
            WindowEvent::Destroy => {
                log::info!("main window destroyed");
                self.destroyed = true;
                self.resources.discard();
                host.post_quit(0);
                Reply::Handled(0)
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Draw one frame.  Called once per message-loop iteration.
    ///
    /// Device loss is not an error: the target is discarded and the next call
    /// recreates it.  Any other failure is returned to the caller as fatal.
    pub(crate) fn render(&mut self) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        let Some(editor) = self.editor.as_mut() else {
            return Ok(());
        };

        let target = self.resources.ensure()?;
        target.begin_draw();
        target.reset_transform();
        target.clear(self.background);
        editor.render(target);

        match target.end_draw() {
            Err(ScrawlError::DeviceLost) => {
                log::warn!("rendering device lost; recreating the render target");
                self.resources.discard();
                Ok(())
            }
            other => other,
        }
    }

    #[cfg(test)]
    pub(crate) fn resources(&self) -> &DeviceResources<F> {
        &self.resources
    }
}

// ── UTF-16 input joining ──────────────────────────────────────────────────────

/// Joins the two `WM_CHAR` messages of a surrogate pair into one `char`.
#[derive(Debug, Default)]
struct Utf16Joiner {
    high: Option<u16>,
}

impl Utf16Joiner {
    fn push(&mut self, unit: u16) -> Option<char> {
        match unit {
            0xD800..=0xDBFF => {
                if self.high.replace(unit).is_some() {
                    log::debug!("dropping unpaired high surrogate");
                }
                None
            }
            0xDC00..=0xDFFF => match self.high.take() {
                Some(high) => char::decode_utf16([high, unit]).next()?.ok(),
                None => Some(char::REPLACEMENT_CHARACTER),
            },
            _ => {
                if self.high.take().is_some() {
                    log::debug!("dropping unpaired high surrogate");
                }
                char::from_u32(u32::from(unit))
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
