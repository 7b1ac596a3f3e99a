// In-memory surface backend for tests.  Records every draw call so tests can
// check ordering, and lets a test script device loss or failures.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use crate::{
    error::{Result, ScrawlError},
    platform::WindowId,
};

use super::{Color, PixelSize, Surface, SurfaceFactory};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum DrawCall {
    Begin,
    ResetTransform,
    Clear(Color),
    /// Pushed by test editors from their `render`.
    Content,
    End,
}

/// Scripted outcome of the next `end_draw`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum EndDraw {
    DeviceLost,
    Fail(u32),
}

#[derive(Default)]
struct State {
    client: PixelSize,
    creations: usize,
    fail_create: bool,
    fail_resize: bool,
    end_draw: VecDeque<EndDraw>,
    calls: Vec<DrawCall>,
}

#[derive(Clone)]
pub(crate) struct FakeFactory(Rc<RefCell<State>>);

impl FakeFactory {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self(Rc::new(RefCell::new(State {
            client: PixelSize::new(width, height),
            ..State::default()
        })))
    }

    pub(crate) fn set_client_size(&self, width: u32, height: u32) {
        self.0.borrow_mut().client = PixelSize::new(width, height);
    }

    pub(crate) fn creations(&self) -> usize {
        self.0.borrow().creations
    }

    pub(crate) fn fail_next_create(&self) {
        self.0.borrow_mut().fail_create = true;
    }

    pub(crate) fn fail_next_resize(&self) {
        self.0.borrow_mut().fail_resize = true;
    }

    pub(crate) fn script_end_draw(&self, outcome: EndDraw) {
        self.0.borrow_mut().end_draw.push_back(outcome);
    }

    pub(crate) fn calls(&self) -> Vec<DrawCall> {
        self.0.borrow().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }
}

impl SurfaceFactory for FakeFactory {
    type Surface = FakeSurface;

    fn client_size(&self, _window: WindowId) -> Result<PixelSize> {
        Ok(self.0.borrow().client)
    }

    fn create_surface(&self, _window: WindowId, size: PixelSize) -> Result<FakeSurface> {
        let mut state = self.0.borrow_mut();
        if std::mem::take(&mut state.fail_create) {
            return Err(ScrawlError::Win32 {
                function: "CreateHwndRenderTarget",
                code: 0x8007_000E,
            });
        }
        state.creations += 1;
        Ok(FakeSurface {
            size: RefCell::new(size),
            state: Rc::clone(&self.0),
        })
    }
}

pub(crate) struct FakeSurface {
    size: RefCell<PixelSize>,
    state: Rc<RefCell<State>>,
}

impl FakeSurface {
    pub(crate) fn record(&self, call: DrawCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl Surface for FakeSurface {
    fn begin_draw(&self) {
        self.record(DrawCall::Begin);
    }

    fn reset_transform(&self) {
        self.record(DrawCall::ResetTransform);
    }

    fn clear(&self, color: Color) {
        self.record(DrawCall::Clear(color));
    }

    fn end_draw(&self) -> Result<()> {
        self.record(DrawCall::End);
        match self.state.borrow_mut().end_draw.pop_front() {
            None => Ok(()),
            Some(EndDraw::DeviceLost) => Err(ScrawlError::DeviceLost),
            Some(EndDraw::Fail(code)) => Err(ScrawlError::Win32 {
                function: "EndDraw",
                code,
            }),
        }
    }

    fn resize(&self, size: PixelSize) -> Result<()> {
        if std::mem::take(&mut self.state.borrow_mut().fail_resize) {
            return Err(ScrawlError::Win32 {
                function: "Resize",
                code: 0x8007_0057,
            });
        }
        *self.size.borrow_mut() = size;
        Ok(())
    }

    fn size(&self) -> PixelSize {
        *self.size.borrow()
    }
}
