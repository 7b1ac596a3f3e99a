// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32,
// COM, Direct2D and DirectWrite FFI).  Each unsafe block in that module MUST
// carry a `// SAFETY:` comment.
#![deny(unsafe_code)]
// Release builds run as a GUI application (no console window).
// Debug builds keep the console so that log output on stderr is visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
// Off Windows only the platform-neutral core is built, for its tests.
#![cfg_attr(not(windows), allow(dead_code))]

mod app;
mod config;
mod dispatch;
mod editor;
mod error;
mod platform;
mod registry;
mod render;

#[cfg(windows)]
fn main() {
    use platform::win32::{com::ComApartment, window};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = platform::win32::enable_heap_termination() {
        log::warn!("heap corruption hardening unavailable: {e}");
    }
    let config = config::load();

    let result = ComApartment::init().and_then(|_com| window::run(&config));
    if let Err(e) = result {
        // Startup failed before or during the message loop.
        // Show a modal error dialog, the only safe output path in a GUI app.
        log::error!("{e}");
        window::show_error_dialog(&e.to_string());
        std::process::exit(1);
    }
    log::info!("shutdown complete");
}

#[cfg(not(windows))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::error!("scrawl needs Windows: it renders through Direct2D into a Win32 window");
    std::process::exit(1);
}
