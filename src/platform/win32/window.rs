// ── Main window ───────────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register the main window class.
//   • Create the top-level window, handing it a weak reference to the shell.
//   • Run the Win32 message loop, rendering once per iteration.
//   • Translate raw messages into `WindowEvent`s and `Reply`s into LRESULTs.
//   • Implement `Host` on top of the real window.
//   • Expose a safe error-dialog helper for use by main().

#![allow(unsafe_code)]

use std::{
    cell::RefCell,
    panic::{self, AssertUnwindSafe},
    rc::{Rc, Weak},
};

use windows::{
    core::{w, HSTRING, PCWSTR},
    Win32::{
        Foundation::{
            GetLastError, BOOL, ERROR_CLASS_ALREADY_EXISTS, HINSTANCE, HWND, LPARAM, LRESULT,
            RECT, WPARAM,
        },
        Graphics::Gdi::{InvalidateRect, UpdateWindow, HBRUSH},
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            Input::Ime::IMECHARPOSITION,
            WindowsAndMessaging::{
                AdjustWindowRectEx, CreateWindowExW, DefWindowProcW, DispatchMessageW,
                GetMessageW, LoadCursorW, LoadIconW, MessageBoxW, PostQuitMessage,
                RegisterClassExW, SetCursor, SetTimer, ShowWindow, TranslateMessage, CREATESTRUCTW,
                CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, HMENU, IDC_ARROW, IDC_IBEAM,
                IDI_APPLICATION, MB_ICONERROR, MB_OK, MSG, SW_SHOWNORMAL, WINDOW_EX_STYLE,
                WNDCLASSEXW, WS_OVERLAPPEDWINDOW,
            },
        },
    },
};

use super::{
    d2d::{Factories, HwndSurface, HwndSurfaces},
    dpi, failed, hwnd_of,
    plain_editor::PlainEditor,
    window_id,
};
use crate::{
    app::{BoxedEditor, Shell},
    config::{ShellConfig, WindowConfig},
    dispatch::{
        messages::{WM_CREATE, WM_NCDESTROY},
        Host, Reply, WindowEvent,
    },
    editor::{CharPosition, Rect},
    error::{Result, ScrawlError},
    registry::WindowRegistry,
};

// ── Window identity ───────────────────────────────────────────────────────────

/// Atom name used to register (and later find) the main window class.
const CLASS_NAME: PCWSTR = w!("ScrawlMainWindow");

type HostedShell = Shell<HwndSurfaces>;

thread_local! {
    /// Every live main window on the UI thread, keyed by handle.
    static WINDOWS: RefCell<WindowRegistry<HostedShell>> = RefCell::new(WindowRegistry::new());
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Create the factories, register the window class, create the window, and
/// drive the message loop until the user closes the application.
///
/// Returns the startup error if the editor could not be initialised, or the
/// first fatal rendering error.
pub(crate) fn run(config: &ShellConfig) -> Result<()> {
    // Startup benchmark harness: only compiled in debug builds so the
    // variable is never unused in release mode.
    #[cfg(debug_assertions)]
    let t0 = std::time::Instant::now();

    dpi::init();
    let factories = Factories::create()?;

    // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
    // always valid for the process lifetime and never fails in practice.
    let hmodule = unsafe { GetModuleHandleW(None) }.map_err(ScrawlError::from)?;

    // HINSTANCE and HMODULE are the same value under the Win32 ABI.
    let hinstance = HINSTANCE(hmodule.0);

    register_class(hinstance)?;

    let dwrite = factories.dwrite.clone();
    let font = config.font.clone();
    // Targets are created with default properties, i.e. at system DPI.
    let target_dpi = dpi::get_system_dpi();
    let shell: Rc<RefCell<HostedShell>> = Rc::new(RefCell::new(Shell::new(
        HwndSurfaces::new(factories.d2d.clone()),
        Box::new(move |window| {
            let editor = PlainEditor::new(hwnd_of(window), dwrite, font, target_dpi);
            Box::new(editor) as BoxedEditor<HwndSurface>
        }),
        config,
    )));

    let hwnd = match create_window(hinstance, &config.window, &Rc::downgrade(&shell)) {
        Ok(hwnd) => hwnd,
        // A failed WM_CREATE surfaces here as a generic creation failure;
        // the parked startup error says what actually went wrong.
        Err(e) => return Err(shell.borrow_mut().take_startup_error().unwrap_or(e)),
    };

    // SAFETY: hwnd was just returned by CreateWindowExW and is valid.
    // ShowWindow returns the previous visibility state; UpdateWindow returns
    // a success BOOL; both are intentionally ignored here.
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOWNORMAL);
        let _ = UpdateWindow(hwnd);
    }

    // Startup milestone: window is now visible on screen.
    #[cfg(debug_assertions)]
    log::info!("window visible in {:.1} ms", t0.elapsed().as_secs_f64() * 1000.0);
    log::info!("main window {:?} shown", shell.borrow().window());

    message_loop(&shell)
}

/// Show a modal error dialog with the given message.
///
/// Safe to call from any context; performs the UTF-16 conversion internally.
/// Used by `main()` when `run()` returns an error.
pub(crate) fn show_error_dialog(message: &str) {
    let text = HSTRING::from(message);

    // SAFETY: text is a valid null-terminated UTF-16 string that remains
    // allocated for the duration of the MessageBoxW call.
    // HWND::default() (null) means the dialog has no owner window.
    // Return value (button pressed) is intentionally unused for an error dialog.
    unsafe {
        let _ = MessageBoxW(
            HWND::default(),
            PCWSTR(text.as_ptr()),
            w!("Scrawl: fatal error"),
            MB_OK | MB_ICONERROR,
        );
    }
}

// ── Window class registration ─────────────────────────────────────────────────

fn register_class(hinstance: HINSTANCE) -> Result<()> {
    // SAFETY: LoadIconW with IDI_APPLICATION always succeeds; it loads the
    // built-in application icon resource, which exists on all Windows versions.
    let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }.map_err(ScrawlError::from)?;

    // SAFETY: LoadCursorW with IDC_ARROW always succeeds; the arrow cursor is
    // a built-in resource guaranteed to exist on all Windows versions.
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }.map_err(ScrawlError::from)?;

    let wndclass = WNDCLASSEXW {
        // WNDCLASSEXW is ~72 bytes; the cast to u32 is always lossless.
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wnd_proc),
        cbClsExtra: 0,
        cbWndExtra: 0,
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        // Direct2D paints every pixel; no GDI erase.
        hbrBackground: HBRUSH::default(),
        lpszMenuName: PCWSTR::null(),
        lpszClassName: CLASS_NAME,
        hIconSm: icon,
    };

    // SAFETY: wndclass is fully initialised with valid handles;
    // CLASS_NAME is a valid null-terminated UTF-16 string literal.
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        // SAFETY: read immediately after the failing call.
        let code = unsafe { GetLastError() };
        if code == ERROR_CLASS_ALREADY_EXISTS {
            log::debug!("window class already registered");
            return Ok(());
        }
        return Err(ScrawlError::Win32 {
            function: "RegisterClassExW",
            code: code.0,
        });
    }

    Ok(())
}

// ── Window creation ───────────────────────────────────────────────────────────

fn create_window(
    hinstance: HINSTANCE,
    window: &WindowConfig,
    shell: &Weak<RefCell<HostedShell>>,
) -> Result<HWND> {
    let (width, height) = dpi::window_size(window.width, window.height);

    // Widen to the outer size that yields a client area of width × height.
    let mut rc = RECT {
        left: 0,
        top: 0,
        right: width,
        bottom: height,
    };
    // SAFETY: rc is a valid in/out pointer for the duration of the call.
    unsafe {
        AdjustWindowRectEx(
            &mut rc,
            WS_OVERLAPPEDWINDOW,
            BOOL::from(false),
            WINDOW_EX_STYLE(0),
        )
    }
    .map_err(failed("AdjustWindowRectEx"))?;

    let title = HSTRING::from(window.title.as_str());

    // SAFETY: CLASS_NAME was just registered; hinstance is the exe's module.
    // HWND::default() (null parent) creates a top-level window.
    // lpParam points at `shell`, which outlives this call; wnd_proc reads it
    // during WM_CREATE only.
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            CLASS_NAME,
            PCWSTR(title.as_ptr()),
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            rc.right - rc.left,
            rc.bottom - rc.top,
            HWND::default(),
            HMENU::default(),
            hinstance,
            Some(shell as *const Weak<RefCell<HostedShell>> as *const std::ffi::c_void),
        )
    }
    .map_err(failed("CreateWindowExW"))?;

    Ok(hwnd)
}

// ── Message loop ──────────────────────────────────────────────────────────────

fn message_loop(shell: &Rc<RefCell<HostedShell>>) -> Result<()> {
    let mut msg = MSG::default();

    loop {
        // SAFETY: &mut msg is a valid MSG pointer; HWND::default() retrieves
        // messages for all windows on this thread; 0,0 filter accepts all.
        let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };

        match ret.0 {
            // GetMessageW returns -1 on error.
            -1 => return Err(last_error("GetMessageW")),
            // Returns 0 when WM_QUIT is retrieved; exit the loop cleanly.
            0 => break,
            // Any other value: a normal message to dispatch.
            _ => unsafe {
                // SAFETY: msg was populated by a successful GetMessageW call.
                // TranslateMessage return value (whether it generated WM_CHAR)
                // and DispatchMessageW's LRESULT are intentionally unused.
                let _ = TranslateMessage(&msg);
                let _ = DispatchMessageW(&msg);
            },
        }

        shell.borrow_mut().render()?;
    }

    log::info!("message loop finished (exit code {})", msg.wParam.0);
    Ok(())
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call; we must not store hwnd beyond the message handler.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    // Unwinding across the FFI boundary is undefined behaviour.
    let reply = panic::catch_unwind(AssertUnwindSafe(|| handle_message(hwnd, msg, wparam, lparam)))
        .unwrap_or_else(|_| {
            log::error!("panic while handling message {msg:#06x}; using default processing");
            Reply::Default
        });

    match reply {
        Reply::Handled(result) => LRESULT(result),
        Reply::Default => DefWindowProcW(hwnd, msg, wparam, lparam),
        Reply::DefaultWith { lparam } => DefWindowProcW(hwnd, msg, wparam, LPARAM(lparam)),
    }
}

fn handle_message(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> Reply {
    match msg {
        WM_CREATE => on_create(hwnd, lparam),
        WM_NCDESTROY => {
            WINDOWS.with(|windows| windows.borrow_mut().remove(window_id(hwnd)));
            Reply::Default
        }
        _ => {
            let Some(event) = WindowEvent::decode(msg, wparam.0, lparam.0) else {
                return Reply::Default;
            };
            let Some(shell) = WINDOWS.with(|windows| windows.borrow_mut().lookup(window_id(hwnd)))
            else {
                return Reply::Default;
            };
            let Ok(mut state) = shell.try_borrow_mut() else {
                log::trace!("re-entrant {event:?}; using default processing");
                return Reply::Default;
            };
            state.dispatch(event, &mut Win32Host { hwnd })
        }
    }
}

fn on_create(hwnd: HWND, lparam: LPARAM) -> Reply {
    // SAFETY: for WM_CREATE, lparam is the CREATESTRUCTW built by
    // CreateWindowExW, and lpCreateParams is the `&Weak` passed by
    // `create_window`, still borrowed on the caller's stack.
    let weak = unsafe {
        let cs = &*(lparam.0 as *const CREATESTRUCTW);
        (cs.lpCreateParams as *const Weak<RefCell<HostedShell>>).as_ref()
    };
    let Some(shell) = weak.and_then(Weak::upgrade) else {
        log::error!("WM_CREATE without an application instance");
        return Reply::Handled(-1);
    };

    let window = window_id(hwnd);
    let live = WINDOWS.with(|windows| {
        let mut windows = windows.borrow_mut();
        windows.insert(window, &shell);
        windows.len()
    });
    log::debug!("{window:?} registered ({live} live)");

    let Ok(mut state) = shell.try_borrow_mut() else {
        log::error!("application instance busy during WM_CREATE");
        WINDOWS.with(|windows| windows.borrow_mut().remove(window));
        return Reply::Handled(-1);
    };

    match state.create(window, &mut Win32Host { hwnd }) {
        Ok(()) => Reply::Handled(0),
        Err(e) => {
            log::error!("window creation aborted: {e}");
            state.fail_startup(e);
            WINDOWS.with(|windows| windows.borrow_mut().remove(window));
            // -1 makes CreateWindowExW destroy the window and fail.
            Reply::Handled(-1)
        }
    }
}

// ── Host ──────────────────────────────────────────────────────────────────────

/// OS side effects on the window currently being dispatched to.
struct Win32Host {
    hwnd: HWND,
}

impl Host for Win32Host {
    fn set_timer(&mut self, id: usize, interval_ms: u32) -> bool {
        // SAFETY: hwnd is the live window for this message.
        unsafe { SetTimer(self.hwnd, id, interval_ms, None) != 0 }
    }

    fn set_ibeam_cursor(&mut self) {
        // SAFETY: IDC_IBEAM is a built-in cursor resource.
        match unsafe { LoadCursorW(None, IDC_IBEAM) } {
            Ok(cursor) => unsafe {
                // SAFETY: cursor is a shared system cursor; nothing to free.
                SetCursor(cursor);
            },
            Err(e) => log::warn!("could not load the I-beam cursor: {e}"),
        }
    }

    fn invalidate(&mut self) {
        // SAFETY: hwnd is the live window; None means the whole client area.
        unsafe {
            let _ = InvalidateRect(self.hwnd, None, BOOL::from(false));
        }
    }

    fn post_quit(&mut self, exit_code: i32) {
        // SAFETY: posts WM_QUIT to this thread's queue; always safe.
        unsafe { PostQuitMessage(exit_code) };
    }

    fn answer_char_position(&mut self, request: isize, answer: &mut dyn FnMut(&mut CharPosition)) {
        // SAFETY: for IMR_QUERYCHARPOSITION the IME passes a writable
        // IMECHARPOSITION that stays valid until WM_IME_REQUEST returns.
        let Some(raw) = (unsafe { (request as *mut IMECHARPOSITION).as_mut() }) else {
            log::warn!("IMR_QUERYCHARPOSITION without a payload");
            return;
        };

        let mut position = CharPosition {
            char_index: raw.dwCharPos,
            x: raw.pt.x,
            y: raw.pt.y,
            line_height: raw.cLineHeight,
            document: Rect {
                left: raw.rcDocument.left,
                top: raw.rcDocument.top,
                right: raw.rcDocument.right,
                bottom: raw.rcDocument.bottom,
            },
        };
        answer(&mut position);

        raw.pt.x = position.x;
        raw.pt.y = position.y;
        raw.cLineHeight = position.line_height;
        raw.rcDocument = RECT {
            left: position.document.left,
            top: position.document.top,
            right: position.document.right,
            bottom: position.document.bottom,
        };
    }
}

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Capture the current Win32 last-error code and wrap it in a `ScrawlError`.
///
/// Call immediately after a Win32 function that signals failure: `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
fn last_error(function: &'static str) -> ScrawlError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    let code = unsafe { GetLastError() };
    ScrawlError::Win32 {
        function,
        code: code.0,
    }
}
