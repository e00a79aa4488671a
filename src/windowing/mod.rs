use crate::gui::Area;

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
pub(crate) mod windows_gdi;

pub(crate) mod gdi;

#[cfg(test)]
pub(crate) mod memory;

pub use gdi::color::ColorRef;
#[cfg(target_os = "windows")]
pub use windows::GdiHost;
#[cfg(target_os = "windows")]
pub use windows_gdi::WindowDc;

/// Something that happened in the host window system, already translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Left button went down at the given client coordinates.
    PointerPressed { x: i32, y: i32 },
    /// Some part of the window needs repainting.
    Exposed,
    /// The host asked the loop to stop with an exit code.
    Quit(i32),
}

/// A drawing target that understands host-native colors.
pub trait Surface {
    fn set_pixel(&mut self, x: i32, y: i32, color: ColorRef);

    /// Fills the inclusive `area` with one color.
    fn fill_rect(&mut self, area: &Area, color: ColorRef) {
        for y in area.y1..=area.y2 {
            for x in area.x1..=area.x2 {
                self.set_pixel(x, y, color);
            }
        }
    }
}

/// The windowing side of the event loop.
pub trait Host {
    type Surface: Surface;

    /// Acquires the surface the display adapters draw on.
    fn acquire_surface(&mut self) -> anyhow::Result<Self::Surface>;

    /// Returns the next pending event without blocking.
    fn poll_event(&mut self) -> Option<HostEvent>;
}
