// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in Scrawl return `error::Result<T>`.  No panics
// in production paths; fatal errors surface as a modal dialog raised by
// `main()` (see `platform::win32::window::show_error_dialog`).

use crate::editor::EditorError;

/// Every error that Scrawl can produce.
#[derive(Debug)]
pub enum ScrawlError {
    /// A Win32 / COM call returned a failure code.
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// The editor component refused to initialise.  Fatal at startup.
    EditorInit(EditorError),

    /// The rendering backend lost its device; the render target must be
    /// discarded and recreated.  Recovered by the render driver.
    DeviceLost,

    /// A window-bound resource was requested before the window existed.
    NoWindow,

    /// A standard I/O error (reading the configuration file, …).
    Io(std::io::Error),

    /// The configuration file is not valid JSON for `ShellConfig`.
    Config(serde_json::Error),
}

impl std::fmt::Display for ScrawlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Win32 { function, code } => {
                write!(f, "{function} failed (error {code:#010x})")
            }
            Self::EditorInit(e) => write!(f, "Editor initialization failed: {e}"),
            Self::DeviceLost => f.write_str("render target must be recreated"),
            Self::NoWindow => f.write_str("no window is bound to the render resources"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for ScrawlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EditorInit(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Win32 { .. } | Self::DeviceLost | Self::NoWindow => None,
        }
    }
}

impl From<std::io::Error> for ScrawlError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ScrawlError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e)
    }
}

impl From<EditorError> for ScrawlError {
    fn from(e: EditorError) -> Self {
        Self::EditorInit(e)
    }
}

// Convert a windows-crate error (HRESULT) directly into a ScrawlError so that
// `?` can be used on `windows::core::Result<T>` throughout the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for ScrawlError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScrawlError>;

// ── Tests ─────────────────────────────────────────────────────────────────────
