// ── Direct2D backend ──────────────────────────────────────────────────────────
//
// `Factories` are the device-independent resources: created once, before the
// window, and never recreated.  `HwndSurfaces` turns the Direct2D factory into
// a `SurfaceFactory` whose surfaces are HWND render targets (device-dependent,
// lost and rebuilt on D2DERR_RECREATE_TARGET).

#![allow(unsafe_code)]

use windows::{
    Foundation::Numerics::Matrix3x2,
    Win32::{
        Foundation::{D2DERR_RECREATE_TARGET, RECT},
        Graphics::{
            Direct2D::{
                Common::{D2D1_COLOR_F, D2D_SIZE_U},
                D2D1CreateFactory, ID2D1Factory, ID2D1HwndRenderTarget,
                D2D1_FACTORY_TYPE_SINGLE_THREADED, D2D1_HWND_RENDER_TARGET_PROPERTIES,
                D2D1_PRESENT_OPTIONS_NONE, D2D1_RENDER_TARGET_PROPERTIES,
            },
            DirectWrite::{DWriteCreateFactory, IDWriteFactory, DWRITE_FACTORY_TYPE_SHARED},
        },
        UI::WindowsAndMessaging::GetClientRect,
    },
};

use super::{failed, hwnd_of};
use crate::{
    error::{Result, ScrawlError},
    platform::WindowId,
    render::{Color, PixelSize, Surface, SurfaceFactory},
};

// ── Device-independent resources ──────────────────────────────────────────────

/// The process-wide Direct2D and DirectWrite factories.
pub(crate) struct Factories {
    pub(crate) d2d: ID2D1Factory,
    pub(crate) dwrite: IDWriteFactory,
}

impl Factories {
    pub(crate) fn create() -> Result<Self> {
        // SAFETY: COM is initialised on this thread (ComApartment in main).
        // Single-threaded factory: every Direct2D call stays on the UI thread.
        let d2d: ID2D1Factory =
            unsafe { D2D1CreateFactory(D2D1_FACTORY_TYPE_SINGLE_THREADED, None) }
                .map_err(failed("D2D1CreateFactory"))?;

        // SAFETY: as above; the shared factory has no thread affinity.
        let dwrite: IDWriteFactory = unsafe { DWriteCreateFactory(DWRITE_FACTORY_TYPE_SHARED) }
            .map_err(failed("DWriteCreateFactory"))?;

        log::debug!("Direct2D and DirectWrite factories created");
        Ok(Self { d2d, dwrite })
    }
}

// ── Surface factory ───────────────────────────────────────────────────────────

pub(crate) struct HwndSurfaces {
    factory: ID2D1Factory,
}

impl HwndSurfaces {
    pub(crate) fn new(factory: ID2D1Factory) -> Self {
        Self { factory }
    }
}

impl SurfaceFactory for HwndSurfaces {
    type Surface = HwndSurface;

    fn client_size(&self, window: WindowId) -> Result<PixelSize> {
        let mut rc = RECT::default();
        // SAFETY: `window` is the live main window (bound at WM_CREATE and
        // never used after WM_DESTROY); rc is a valid out pointer.
        unsafe { GetClientRect(hwnd_of(window), &mut rc) }.map_err(failed("GetClientRect"))?;
        Ok(PixelSize::new(
            (rc.right - rc.left).max(0) as u32,
            (rc.bottom - rc.top).max(0) as u32,
        ))
    }

    fn create_surface(&self, window: WindowId, size: PixelSize) -> Result<HwndSurface> {
        let props = D2D1_RENDER_TARGET_PROPERTIES::default();
        let hwnd_props = D2D1_HWND_RENDER_TARGET_PROPERTIES {
            hwnd: hwnd_of(window),
            pixelSize: size_u(size),
            presentOptions: D2D1_PRESENT_OPTIONS_NONE,
        };

        // SAFETY: both property structs are fully initialised and outlive the
        // call; the HWND is live (see client_size).
        let target = unsafe { self.factory.CreateHwndRenderTarget(&props, &hwnd_props) }
            .map_err(failed("CreateHwndRenderTarget"))?;
        Ok(HwndSurface(target))
    }
}

// ── HWND render target ────────────────────────────────────────────────────────

/// A Direct2D render target bound to the main window.
pub(crate) struct HwndSurface(ID2D1HwndRenderTarget);

impl HwndSurface {
    /// The underlying target, for editors that draw with Direct2D directly.
    pub(crate) fn target(&self) -> &ID2D1HwndRenderTarget {
        &self.0
    }
}

impl Surface for HwndSurface {
    fn begin_draw(&self) {
        // SAFETY: the target is valid for the life of self.
        unsafe { self.0.BeginDraw() };
    }

    fn reset_transform(&self) {
        // SAFETY: the matrix is a valid value for the duration of the call.
        unsafe { self.0.SetTransform(&Matrix3x2::identity()) };
    }

    fn clear(&self, color: Color) {
        let color = to_d2d(color);
        // SAFETY: called between BeginDraw and EndDraw; color outlives the call.
        unsafe { self.0.Clear(Some(&color)) };
    }

    fn end_draw(&self) -> Result<()> {
        // SAFETY: pairs with begin_draw; tag out-pointers are optional.
        match unsafe { self.0.EndDraw(None, None) } {
            Ok(()) => Ok(()),
            Err(e) if e.code() == D2DERR_RECREATE_TARGET => Err(ScrawlError::DeviceLost),
            Err(e) => Err(failed("EndDraw")(e)),
        }
    }

    fn resize(&self, size: PixelSize) -> Result<()> {
        let size = size_u(size);
        // SAFETY: size is a valid D2D_SIZE_U that outlives the call.
        unsafe { self.0.Resize(&size) }.map_err(failed("ID2D1HwndRenderTarget::Resize"))
    }

    #[cfg(test)]
    fn size(&self) -> PixelSize {
        // SAFETY: the target is valid for the life of self.
        let size = unsafe { self.0.GetPixelSize() };
        PixelSize::new(size.width, size.height)
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

fn size_u(size: PixelSize) -> D2D_SIZE_U {
    D2D_SIZE_U {
        width: size.width,
        height: size.height,
    }
}

pub(crate) fn to_d2d(color: Color) -> D2D1_COLOR_F {
    D2D1_COLOR_F {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}
