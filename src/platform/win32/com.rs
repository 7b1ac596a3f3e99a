// ── COM apartment ─────────────────────────────────────────────────────────────
//
// Direct2D and DirectWrite are COM APIs.  `main()` holds one
// `ComApartment` for the whole run; dropping it uninitialises COM after every
// COM object owned by the window has been released.

#![allow(unsafe_code)]

use windows::Win32::System::Com::{CoInitializeEx, CoUninitialize, COINIT_APARTMENTTHREADED};

use super::failed;
use crate::error::Result;

/// RAII guard for a single-threaded COM apartment on the calling thread.
pub(crate) struct ComApartment(());

impl ComApartment {
    pub(crate) fn init() -> Result<Self> {
        // SAFETY: called once on the UI thread before any COM object exists.
        unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }
            .ok()
            .map_err(failed("CoInitializeEx"))?;
        Ok(Self(()))
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        // SAFETY: balanced with the successful CoInitializeEx in `init`.
        unsafe { CoUninitialize() };
    }
}
