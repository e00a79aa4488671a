use windows_sys::Win32::{
    Foundation::{HWND, RECT},
    Graphics::Gdi::{
        BeginPaint, CreateSolidBrush, DeleteObject, EndPaint, FillRect, GetDC, ReleaseDC,
        SetPixel, HBRUSH, HDC, PAINTSTRUCT,
    },
};

use super::{ColorRef, Surface};
use crate::gui::Area;

pub(crate) trait GdiObject {
    fn delete(self);
}

pub(crate) struct Brush {
    handle: HBRUSH,
}

impl Brush {
    pub(crate) fn solid(color: ColorRef) -> Self {
        Self {
            handle: unsafe { CreateSolidBrush(color.into()) },
        }
    }
}

impl GdiObject for Brush {
    fn delete(self) {
        unsafe { DeleteObject(self.handle) };
    }
}

/// A `BeginPaint`/`EndPaint` pair scoped to a `WM_PAINT` message.
pub(crate) struct PaintContext {
    hwnd: HWND,
    ps: PAINTSTRUCT,
}

impl PaintContext {
    pub(crate) fn begin(hwnd: HWND) -> Self {
        let mut ps: PAINTSTRUCT = unsafe { std::mem::zeroed() };
        unsafe { BeginPaint(hwnd, &mut ps) };
        Self { hwnd, ps }
    }
}

impl Drop for PaintContext {
    fn drop(&mut self) {
        unsafe { EndPaint(self.hwnd, &self.ps) };
    }
}

/// The device context of a window, held until dropped.
pub struct WindowDc {
    hwnd: HWND,
    hdc: HDC,
}

impl WindowDc {
    /// Returns `None` if the window has no device context to give.
    pub(crate) fn acquire(hwnd: HWND) -> Option<Self> {
        let hdc = unsafe { GetDC(hwnd) };
        match hdc {
            0 => None,
            _ => Some(Self { hwnd, hdc }),
        }
    }
}

impl Surface for WindowDc {
    fn set_pixel(&mut self, x: i32, y: i32, color: ColorRef) {
        unsafe { SetPixel(self.hdc, x, y, color.into()) };
    }

    fn fill_rect(&mut self, area: &Area, color: ColorRef) {
        // FillRect leaves out the right and bottom edges
        let rect = RECT {
            left: area.x1,
            top: area.y1,
            right: area.x2 + 1,
            bottom: area.y2 + 1,
        };
        let brush = Brush::solid(color);
        unsafe { FillRect(self.hdc, &rect, brush.handle) };
        brush.delete();
    }
}

impl Drop for WindowDc {
    fn drop(&mut self) {
        unsafe { ReleaseDC(self.hwnd, self.hdc) };
    }
}
