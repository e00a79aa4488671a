use std::{ffi::OsStr, os::windows::prelude::OsStrExt};

use log::{debug, info};
use thiserror::Error;
use windows_sys::{
    core::PCWSTR,
    Win32::{
        Foundation::{HWND, LPARAM, LRESULT, RECT, WPARAM},
        Graphics::Gdi::{GetStockObject, UpdateWindow, HBRUSH, WHITE_BRUSH},
        System::LibraryLoader::GetModuleHandleW,
        UI::WindowsAndMessaging::*,
    },
};

use super::{
    windows_gdi::{PaintContext, WindowDc},
    Host, HostEvent,
};

/// Posted to the queue whenever the window procedure validates a paint.
const WM_EXPOSED: u32 = WM_APP;

struct WindowClass {
    name: Vec<u16>,
    _atom: u16,
}

#[derive(Error, Debug)]
pub(crate) enum ClassRegisterError {
    #[error("class name was {0} chars long, max is 256")]
    ClassNameTooLong(usize),
    #[error("RegisterClassW returned zero")]
    WindowsError,
}

#[derive(Error, Debug)]
pub(crate) enum WindowError {
    #[error("cannot register the window class")]
    Class(#[from] ClassRegisterError),
    #[error("CreateWindowExW returned zero")]
    Create,
    #[error("GetDC returned no device context")]
    DeviceContext,
}

impl WindowClass {
    /// Attempts to register a window class.
    fn try_register(name: &str, mut class: WNDCLASSW) -> Result<WindowClass, ClassRegisterError> {
        let class_name = prepare_string(name);
        if class_name.len() > 256 {
            return Err(ClassRegisterError::ClassNameTooLong(class_name.len()));
        }
        class.lpszClassName = class_name.as_ptr();

        let result = unsafe { RegisterClassW(&class) };
        match result {
            0 => Err(ClassRegisterError::WindowsError),
            _ => Ok(WindowClass {
                name: class_name,
                _atom: result,
            }),
        }
    }

    fn name_ptr(&self) -> *const u16 {
        self.name.as_ptr()
    }
}

struct Window {
    hwnd: HWND,
}

impl Window {
    /// Creates a window whose client area is exactly `width` by `height`.
    fn try_create(class: &WindowClass, title: &str, width: i32, height: i32) -> Result<Window, WindowError> {
        let style = WS_OVERLAPPEDWINDOW;
        let mut frame = RECT {
            left: 0,
            top: 0,
            right: width,
            bottom: height,
        };
        let title_wide = prepare_string(title);
        let window_name: PCWSTR = title_wide.as_ptr();

        let hwnd = unsafe {
            AdjustWindowRect(&mut frame, style, 0);
            CreateWindowExW(
                0,
                class.name_ptr(),
                window_name,
                style,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                frame.right - frame.left,
                frame.bottom - frame.top,
                0 as HWND,
                0 as HMENU,
                GetModuleHandleW(std::ptr::null()),
                std::ptr::null(),
            )
        };

        match hwnd {
            0 => Err(WindowError::Create),
            _ => Ok(Window { hwnd }),
        }
    }

    fn hwnd(&self) -> HWND {
        self.hwnd
    }

    /// Activates the window and paints it once.
    fn show(&self) {
        unsafe {
            ShowWindow(self.hwnd(), SW_SHOW);
            UpdateWindow(self.hwnd());
        }
    }

    /// Removes a message from the thread's queue, if there is one.
    fn peek_message(&self) -> Option<MSG> {
        unsafe {
            let mut msg: MSG = std::mem::zeroed();
            match PeekMessageW(&mut msg, 0 as HWND, 0, 0, PM_REMOVE) {
                0 => None,
                _ => Some(msg),
            }
        }
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        unsafe {
            if IsWindow(self.hwnd) != 0 {
                DestroyWindow(self.hwnd);
            }
        }
    }
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_PAINT => {
            // Drawing happens from the loop, the paint only has to be validated.
            // Sizing and moving dispatch WM_PAINT from their own modal loop,
            // so the loop is told through its queue.
            let _paint = PaintContext::begin(hwnd);
            PostMessageW(hwnd, WM_EXPOSED, 0, 0);
            0
        }
        WM_CLOSE => {
            DestroyWindow(hwnd);
            0
        }
        WM_DESTROY => {
            PostQuitMessage(0);
            0
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

fn prepare_string(text: &str) -> Vec<u16> {
    let mut s: Vec<u16> = OsStr::new(text).encode_wide().collect();
    s.push(0);
    s
}

/// Signed client coordinates packed into a mouse message's `lParam`.
fn point_from_lparam(lparam: LPARAM) -> (i32, i32) {
    let x = (lparam & 0xffff) as u16 as i16 as i32;
    let y = ((lparam >> 16) & 0xffff) as u16 as i16 as i32;
    (x, y)
}

/// A top-level window driven by a non-blocking message pump.
pub struct GdiHost {
    window: Window,
    _class: WindowClass,
}

impl GdiHost {
    pub fn create(title: &str, width: i32, height: i32) -> anyhow::Result<GdiHost> {
        let class = WindowClass::try_register(
            "GdiBridgeWindowClass",
            WNDCLASSW {
                style: CS_HREDRAW | CS_VREDRAW | CS_OWNDC,
                lpfnWndProc: Some(window_proc),
                cbClsExtra: 0,
                cbWndExtra: 0,
                hInstance: unsafe { GetModuleHandleW(std::ptr::null()) },
                hIcon: unsafe { LoadIconW(0, IDI_APPLICATION) },
                hCursor: unsafe { LoadCursorW(0, IDC_ARROW) },
                hbrBackground: unsafe { GetStockObject(WHITE_BRUSH) } as HBRUSH,
                lpszMenuName: std::ptr::null(),
                lpszClassName: std::ptr::null(),
            },
        )
        .map_err(WindowError::from)?;

        let window = Window::try_create(&class, title, width, height)?;
        window.show();
        info!("window \"{}\" created with a {}x{} client area", title, width, height);

        Ok(GdiHost {
            window,
            _class: class,
        })
    }
}

impl Host for GdiHost {
    type Surface = WindowDc;

    fn acquire_surface(&mut self) -> anyhow::Result<WindowDc> {
        Ok(WindowDc::acquire(self.window.hwnd()).ok_or(WindowError::DeviceContext)?)
    }

    fn poll_event(&mut self) -> Option<HostEvent> {
        loop {
            let msg = self.window.peek_message()?;
            match msg.message {
                WM_QUIT => {
                    debug!("WM_QUIT received");
                    return Some(HostEvent::Quit(msg.wParam as i32));
                }
                WM_EXPOSED => return Some(HostEvent::Exposed),
                _ => {}
            }

            unsafe {
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }

            if msg.message == WM_LBUTTONDOWN {
                let (x, y) = point_from_lparam(msg.lParam);
                return Some(HostEvent::PointerPressed { x, y });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windows_sys::Win32::Graphics::Gdi::InvalidateRect;

    #[test_log::test]
    fn paints_outside_the_pump_expose_the_screen() {
        let mut host = GdiHost::create("gdi-bridge test", 64, 48).unwrap();
        while host.poll_event().is_some() {}

        // UpdateWindow sends WM_PAINT straight to the window procedure
        unsafe {
            InvalidateRect(host.window.hwnd(), std::ptr::null(), 1);
            UpdateWindow(host.window.hwnd());
        }

        let events: Vec<HostEvent> = std::iter::from_fn(|| host.poll_event()).collect();
        assert!(events.contains(&HostEvent::Exposed));
    }

    #[test_log::test]
    fn lparam_coordinates_are_signed_words() {
        assert_eq!(point_from_lparam(0x0050_0032), (50, 80));
        assert_eq!(point_from_lparam(-2), (-2, -1));
    }
}
