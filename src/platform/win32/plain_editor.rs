// ── Plain editor ──────────────────────────────────────────────────────────────
//
// The editor hosted by the shipped binary: an append-only text area drawn with
// DirectWrite, a blinking caret, wheel scrolling and inline-IME positioning.
// It exists so the shell has something real to drive; editing features belong
// in a dedicated editor component, which plugs in through the same trait.

#![allow(unsafe_code)]

use std::{cell::Cell, rc::Rc};

use windows::{
    core::HSTRING,
    Win32::{
        Foundation::{BOOL, HWND, POINT, RECT},
        Graphics::{
            Direct2D::{
                Common::D2D_RECT_F, ID2D1HwndRenderTarget, D2D1_DRAW_TEXT_OPTIONS_NONE,
            },
            DirectWrite::{
                IDWriteFactory, IDWriteTextFormat, DWRITE_FONT_STRETCH_NORMAL,
                DWRITE_FONT_STYLE_NORMAL, DWRITE_FONT_WEIGHT_REGULAR, DWRITE_HIT_TEST_METRICS,
                DWRITE_MEASURING_MODE_NATURAL,
            },
            Gdi::ClientToScreen,
        },
        UI::WindowsAndMessaging::GetClientRect,
    },
};

use super::d2d::{to_d2d, HwndSurface};
use crate::{
    config::FontConfig,
    editor::{CharPosition, CompositionFlags, Editor, EditorError, Rect, Timer},
    platform::{dip_to_px, px_to_dip},
    render::Color,
};

/// Timer id for the caret blink.
const CARET_TIMER: usize = 1;
const CARET_BLINK_MS: u32 = 530;

/// Inset of the text from the client edge, in DIPs.
const MARGIN: f32 = 8.0;
/// Lines scrolled per wheel notch.
const WHEEL_LINES: f32 = 3.0;
const WHEEL_DELTA: f32 = 120.0;

const TEXT_COLOR: Color = Color::BLACK;

pub(crate) struct PlainEditor {
    hwnd: HWND,
    dwrite: IDWriteFactory,
    font: FontConfig,
    format: Option<IDWriteTextFormat>,
    text: String,
    caret_visible: Rc<Cell<bool>>,
    composing: bool,
    scroll_y: f32,
    /// DPI of the render target; layout happens in DIPs at this scale.
    dpi: u32,
    /// Client size in device pixels.
    width: f32,
    height: f32,
    timers: Vec<Timer>,
}

impl PlainEditor {
    /// `dpi` must be the DPI the render target draws at.
    pub(crate) fn new(hwnd: HWND, dwrite: IDWriteFactory, font: FontConfig, dpi: u32) -> Self {
        let caret_visible = Rc::new(Cell::new(true));
        let blink = Rc::clone(&caret_visible);
        let timers = vec![Timer::new(CARET_TIMER, CARET_BLINK_MS, move || {
            blink.set(!blink.get())
        })];

        Self {
            hwnd,
            dwrite,
            font,
            format: None,
            text: String::new(),
            caret_visible,
            composing: false,
            scroll_y: 0.0,
            dpi,
            width: 0.0,
            height: 0.0,
            timers,
        }
    }

    fn wake_caret(&self) {
        self.caret_visible.set(true);
    }

    fn width_dip(&self) -> f32 {
        px_to_dip(self.width, self.dpi)
    }

    /// Caret position (top-left, client DIPs) and line height.
    fn caret_metrics(&self) -> Option<(f32, f32, f32)> {
        let format = self.format.as_ref()?;
        let wide: Vec<u16> = self.text.encode_utf16().collect();
        let max_width = (self.width_dip() - 2.0 * MARGIN).max(1.0);

        // SAFETY: wide and format are valid for the duration of the calls;
        // the out pointers reference live locals.
        unsafe {
            let layout = self
                .dwrite
                .CreateTextLayout(&wide, format, max_width, f32::MAX)
                .ok()?;
            let (mut x, mut y) = (0.0_f32, 0.0_f32);
            let mut metrics = DWRITE_HIT_TEST_METRICS::default();
            layout
                .HitTestTextPosition(
                    wide.len() as u32,
                    BOOL::from(false),
                    &mut x,
                    &mut y,
                    &mut metrics,
                )
                .ok()?;
            Some((MARGIN + x, MARGIN + y - self.scroll_y, metrics.height))
        }
    }

    fn line_height(&self) -> f32 {
        self.caret_metrics()
            .map(|(_, _, h)| h)
            .unwrap_or(self.font.size * 1.2)
    }

    fn to_screen(&self, x: i32, y: i32) -> POINT {
        let mut pt = POINT { x, y };
        // SAFETY: hwnd is the live host window; pt is a valid in/out pointer.
        unsafe {
            let _ = ClientToScreen(self.hwnd, &mut pt);
        }
        pt
    }

    fn draw(&self, target: &ID2D1HwndRenderTarget) {
        let Some(format) = self.format.as_ref() else {
            return;
        };

        // SAFETY: called inside the shell's BeginDraw/EndDraw pass; every
        // pointer handed to Direct2D references a live local.
        unsafe {
            let brush = match target.CreateSolidColorBrush(&to_d2d(TEXT_COLOR), None) {
                Ok(brush) => brush,
                Err(e) => {
                    log::warn!("text brush creation failed: {e}");
                    return;
                }
            };

            let wide: Vec<u16> = self.text.encode_utf16().collect();
            let layout_rect = D2D_RECT_F {
                left: MARGIN,
                top: MARGIN - self.scroll_y,
                right: (self.width_dip() - MARGIN).max(MARGIN + 1.0),
                bottom: f32::MAX,
            };
            target.DrawText(
                &wide,
                format,
                &layout_rect,
                &brush,
                D2D1_DRAW_TEXT_OPTIONS_NONE,
                DWRITE_MEASURING_MODE_NATURAL,
            );

            if self.caret_visible.get() && !self.composing {
                if let Some((x, y, h)) = self.caret_metrics() {
                    let caret = D2D_RECT_F {
                        left: x,
                        top: y,
                        right: x + 1.0,
                        bottom: y + h,
                    };
                    target.FillRectangle(&caret, &brush);
                }
            }
        }
    }
}

impl Editor for PlainEditor {
    type Target = HwndSurface;

    fn initialize(&mut self) -> Result<(), EditorError> {
        let family = HSTRING::from(self.font.family.as_str());
        let locale = HSTRING::from("en-us");

        // SAFETY: the HSTRINGs outlive the call; no font collection means the
        // system collection.
        let format = unsafe {
            self.dwrite.CreateTextFormat(
                &family,
                None,
                DWRITE_FONT_WEIGHT_REGULAR,
                DWRITE_FONT_STYLE_NORMAL,
                DWRITE_FONT_STRETCH_NORMAL,
                self.font.size,
                &locale,
            )
        }
        .map_err(|e| {
            EditorError::new(format!(
                "font load failed: {} {}pt ({e})",
                self.font.family, self.font.size
            ))
        })?;

        self.format = Some(format);

        let mut rc = RECT::default();
        // SAFETY: hwnd is the window being created; rc is a valid out pointer.
        if unsafe { GetClientRect(self.hwnd, &mut rc) }.is_ok() {
            self.width = (rc.right - rc.left) as f32;
            self.height = (rc.bottom - rc.top) as f32;
        }
        log::debug!("plain editor using {} {}pt", self.font.family, self.font.size);
        Ok(())
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
        self.scroll_y = 0.0;
        self.wake_caret();
    }

    fn on_char(&mut self, ch: char) {
        match ch {
            '\u{8}' => {
                self.text.pop();
            }
            '\r' => self.text.push('\n'),
            '\t' => self.text.push('\t'),
            c if c.is_control() => return,
            c => self.text.push(c),
        }
        self.wake_caret();
    }

    fn on_key_down(&mut self, _virtual_key: u32) {
        self.wake_caret();
    }

    fn on_key_up(&mut self, _virtual_key: u32) {}

    fn on_lbutton_down(&mut self, x: f32, y: f32) {
        log::trace!("click at {x},{y}");
        self.wake_caret();
    }

    fn on_lbutton_up(&mut self, _x: f32, _y: f32) {}

    fn on_mouse_wheel(&mut self, delta: i16) {
        let lines = f32::from(delta) / WHEEL_DELTA * WHEEL_LINES;
        self.scroll_y = (self.scroll_y - lines * self.line_height()).max(0.0);
    }

    fn on_open_candidate(&mut self) {
        log::trace!("IME candidate list opened");
    }

    fn on_query_char_position(&mut self, position: &mut CharPosition) {
        let (x, y, h) = self
            .caret_metrics()
            .unwrap_or((MARGIN, MARGIN, self.font.size));
        // Caret metrics are DIPs; ClientToScreen works in device pixels.
        let pt = self.to_screen(dip_to_px(x, self.dpi), dip_to_px(y, self.dpi));
        let top_left = self.to_screen(0, 0);
        let bottom_right = self.to_screen(self.width as i32, self.height as i32);

        position.x = pt.x;
        position.y = pt.y;
        position.line_height = dip_to_px(h, self.dpi).max(0) as u32;
        position.document = Rect {
            left: top_left.x,
            top: top_left.y,
            right: bottom_right.x,
            bottom: bottom_right.y,
        };
    }

    fn on_ime_start_composition(&mut self) {
        self.composing = true;
    }

    fn on_ime_composition(&mut self, flags: CompositionFlags) {
        if flags.has_composition() {
            self.composing = true;
        }
        // The committed string arrives as WM_IME_CHAR after default handling.
        if flags.has_result() {
            self.wake_caret();
        }
    }

    fn on_ime_end_composition(&mut self) {
        self.composing = false;
        self.wake_caret();
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.width = width as f32;
        self.height = height as f32;
    }

    fn render(&mut self, target: &HwndSurface) {
        self.draw(target.target());
    }

    fn timers(&mut self) -> &mut [Timer] {
        &mut self.timers
    }
}
