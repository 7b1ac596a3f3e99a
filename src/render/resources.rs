// ── Device-dependent resources ────────────────────────────────────────────────
//
// Owns the current render target.  The target is absent until the first
// `ensure`, absent again after `discard`, and never handed out while absent.

use crate::{
    error::{Result, ScrawlError},
    platform::WindowId,
};

use super::{PixelSize, Surface, SurfaceFactory};

pub(crate) struct DeviceResources<F: SurfaceFactory> {
    factory: F,
    window: Option<WindowId>,
    target: Option<F::Surface>,
}

impl<F: SurfaceFactory> DeviceResources<F> {
    pub(crate) fn new(factory: F) -> Self {
        Self {
            factory,
            window: None,
            target: None,
        }
    }

    /// Associate the manager with the window its targets draw into.
    pub(crate) fn bind(&mut self, window: WindowId) {
        self.window = Some(window);
    }

    /// Return the render target, creating it at the window's current client
    /// size if none exists.  A second call without `discard` is a no-op.
    pub(crate) fn ensure(&mut self) -> Result<&F::Surface> {
        let target = match self.target.take() {
            Some(target) => target,
            None => {
                let window = self.window.ok_or(ScrawlError::NoWindow)?;
                let size = self.factory.client_size(window)?;
                let target = self.factory.create_surface(window, size)?;
                log::debug!(
                    "render target created at {}x{}",
                    size.width,
                    size.height
                );
                target
            }
        };
        Ok(self.target.insert(target))
    }

    /// Release the render target.  Safe when none exists.
    pub(crate) fn discard(&mut self) {
        if self.target.take().is_some() {
            log::debug!("render target discarded");
        }
    }

    /// Match an existing target to new client dimensions.
    ///
    /// Without a target this does nothing: one created later is sized from
    /// the client area at that time.  A target that cannot be resized is
    /// discarded so the next `ensure` rebuilds it at the right size.
    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        let Some(target) = self.target.as_ref() else {
            return;
        };
        if let Err(e) = target.resize(PixelSize::new(width, height)) {
            log::warn!("render target resize to {width}x{height} failed: {e}");
            self.discard();
        }
    }

    #[cfg(test)]
    pub(crate) fn target(&self) -> Option<&F::Surface> {
        self.target.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn has_target(&self) -> bool {
        self.target.is_some()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fake::FakeFactory;

    fn bound(factory: &FakeFactory) -> DeviceResources<FakeFactory> {
        let mut res = DeviceResources::new(factory.clone());
        res.bind(WindowId(1));
        res
    }

    #[test]
    fn ensure_without_window_fails() {
        let mut res = DeviceResources::new(FakeFactory::new(640, 480));
        assert!(matches!(res.ensure(), Err(ScrawlError::NoWindow)));
        assert!(!res.has_target());
    }

    #[test]
    fn ensure_twice_creates_once() {
        let factory = FakeFactory::new(640, 480);
        let mut res = bound(&factory);

        res.ensure().expect("first ensure");
        res.ensure().expect("second ensure");

        assert_eq!(factory.creations(), 1);
    }

    #[test]
    fn discard_then_ensure_uses_current_client_size() {
        let factory = FakeFactory::new(640, 480);
        let mut res = bound(&factory);
        res.ensure().expect("ensure");

        factory.set_client_size(1024, 768);
        res.discard();
        assert!(!res.has_target());

        let size = res.ensure().expect("ensure after discard").size();
        assert_eq!(size, PixelSize::new(1024, 768));
        assert_eq!(factory.creations(), 2);
    }

    #[test]
    fn discard_without_target_is_harmless() {
        let factory = FakeFactory::new(640, 480);
        let mut res = bound(&factory);
        res.discard();
        res.discard();
        assert!(!res.has_target());
    }

    #[test]
    fn resize_tracks_every_event() {
        let factory = FakeFactory::new(640, 480);
        let mut res = bound(&factory);
        res.ensure().expect("ensure");

        for (w, h) in [(800, 600), (1, 1), (1920, 1080), (300, 200)] {
            factory.set_client_size(w, h);
            res.resize(w, h);
            let size = res.target().expect("target kept").size();
            assert_eq!(size, PixelSize::new(w, h));
        }
    }

    #[test]
    fn resize_without_target_is_noop() {
        let factory = FakeFactory::new(640, 480);
        let mut res = bound(&factory);

        res.resize(800, 600);

        assert!(!res.has_target());
        assert_eq!(factory.creations(), 0);
    }

    #[test]
    fn failed_resize_discards_target() {
        let factory = FakeFactory::new(640, 480);
        let mut res = bound(&factory);
        res.ensure().expect("ensure");

        factory.fail_next_resize();
        res.resize(800, 600);

        assert!(!res.has_target());
    }
}
