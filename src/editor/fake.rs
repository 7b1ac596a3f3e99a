// Recording `Editor` for tests.  The call log is shared so a test can keep
// inspecting it after the editor has been boxed and moved into the shell.

use std::{cell::RefCell, rc::Rc};

use crate::render::fake::{DrawCall, FakeSurface};

use super::{CharPosition, CompositionFlags, Editor, EditorError, Timer};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EditorCall {
    Initialize,
    SetText(String),
    Char(char),
    KeyDown(u32),
    KeyUp(u32),
    LButtonDown(f32, f32),
    LButtonUp(f32, f32),
    MouseWheel(i16),
    OpenCandidate,
    QueryCharPosition(u32),
    ImeStart,
    ImeComposition(CompositionFlags),
    ImeEnd,
    Resize(u32, u32),
    Render,
}

pub(crate) type CallLog = Rc<RefCell<Vec<EditorCall>>>;

pub(crate) struct RecordingEditor {
    log: CallLog,
    timers: Vec<Timer>,
    init_error: Option<EditorError>,
}

impl RecordingEditor {
    pub(crate) fn new(log: &CallLog) -> Self {
        Self {
            log: Rc::clone(log),
            timers: Vec::new(),
            init_error: None,
        }
    }

    pub(crate) fn with_timers(mut self, timers: Vec<Timer>) -> Self {
        self.timers = timers;
        self
    }

    pub(crate) fn failing(mut self, message: &str) -> Self {
        self.init_error = Some(EditorError::new(message));
        self
    }

    fn push(&self, call: EditorCall) {
        self.log.borrow_mut().push(call);
    }
}

impl Editor for RecordingEditor {
    type Target = FakeSurface;

    fn initialize(&mut self) -> Result<(), EditorError> {
        self.push(EditorCall::Initialize);
        match self.init_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn set_text(&mut self, text: &str) {
        self.push(EditorCall::SetText(text.to_owned()));
    }

    fn on_char(&mut self, ch: char) {
        self.push(EditorCall::Char(ch));
    }

    fn on_key_down(&mut self, virtual_key: u32) {
        self.push(EditorCall::KeyDown(virtual_key));
    }

    fn on_key_up(&mut self, virtual_key: u32) {
        self.push(EditorCall::KeyUp(virtual_key));
    }

    fn on_lbutton_down(&mut self, x: f32, y: f32) {
        self.push(EditorCall::LButtonDown(x, y));
    }

    fn on_lbutton_up(&mut self, x: f32, y: f32) {
        self.push(EditorCall::LButtonUp(x, y));
    }

    fn on_mouse_wheel(&mut self, delta: i16) {
        self.push(EditorCall::MouseWheel(delta));
    }

    fn on_open_candidate(&mut self) {
        self.push(EditorCall::OpenCandidate);
    }

    fn on_query_char_position(&mut self, position: &mut CharPosition) {
        self.push(EditorCall::QueryCharPosition(position.char_index));
        position.x = 10;
        position.y = 20;
        position.line_height = 16;
    }

    fn on_ime_start_composition(&mut self) {
        self.push(EditorCall::ImeStart);
    }

    fn on_ime_composition(&mut self, flags: CompositionFlags) {
        self.push(EditorCall::ImeComposition(flags));
    }

    fn on_ime_end_composition(&mut self) {
        self.push(EditorCall::ImeEnd);
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.push(EditorCall::Resize(width, height));
    }

    fn render(&mut self, target: &FakeSurface) {
        self.push(EditorCall::Render);
        target.record(DrawCall::Content);
    }

    fn timers(&mut self) -> &mut [Timer] {
        &mut self.timers
    }
}
