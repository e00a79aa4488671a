//! The driver contract between the rendering core and the host.
//!
//! The core never talks to a window directly. Whenever it needs pixels on a
//! screen or a pointer sample it calls through these traits, and the host
//! hands its implementations in on every [`crate::gui::Gui::task_handler`]
//! call through [`HostDrivers`].

use crate::gui::{Area, Color, Opa, Point};

mod context;
mod display;
mod gpu;
mod pointer;

pub use context::HostContext;
pub use display::SurfaceDisplay;
pub use gpu::SoftwareGpu;
pub use pointer::PointerInput;

/// Completion signal handed to [`DisplayDriver::flush`].
///
/// The core does not reuse its frame buffer until the flush has been
/// acknowledged, either through this token or later through
/// [`crate::gui::Gui::flush_ready`].
#[derive(Debug, Default)]
pub struct FlushReady {
    signals: u32,
}

impl FlushReady {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Tells the core the flushed area is on screen and its buffer is free.
    pub fn ready(&mut self) {
        self.signals += 1;
    }

    pub fn is_ready(&self) -> bool {
        self.signals > 0
    }

    /// How many times [`FlushReady::ready`] was called.
    pub fn signals(&self) -> u32 {
        self.signals
    }
}

/// Puts pixels on the physical display.
pub trait DisplayDriver {
    /// Copies a composited area out of the core's frame buffer.
    /// `pixels` is row-major and starts at `(area.x1, area.y1)`.
    /// Must call `ready.ready()` once the pixels are on screen.
    fn flush(&mut self, area: &Area, pixels: &[Color], ready: &mut FlushReady);

    /// Writes a pixel map directly. Only used when the core is unbuffered.
    fn map(&mut self, area: &Area, pixels: &[Color]);

    /// Fills an area with a single color.
    fn fill(&mut self, area: &Area, color: Color);
}

/// Memory operations the core can offload to an accelerator.
pub trait GpuDriver {
    /// Blends `src` over `dest` element by element with the given opacity.
    fn mem_blend(&mut self, dest: &mut [Color], src: &[Color], opa: Opa);

    /// Sets every element of `dest` to `color`.
    fn mem_fill(&mut self, dest: &mut [Color], color: Color);
}

/// Kind of input device, declared at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndevType {
    Pointer,
    Keypad,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum IndevState {
    #[default]
    Released,
    Pressed,
}

/// One sample reported by an input device.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndevData {
    pub point: Point,
    pub state: IndevState,
}

/// Reads an input device.
pub trait InputDriver {
    /// Fills `data` with the current sample.
    /// Returns true if more buffered samples are waiting to be read.
    fn read(&mut self, data: &mut IndevData) -> bool;
}

/// Everything the host exposes to the core for one task handler call.
pub trait HostDrivers {
    fn display(&mut self) -> &mut dyn DisplayDriver;

    fn gpu(&mut self) -> Option<&mut dyn GpuDriver> {
        None
    }

    fn input(&mut self) -> Option<&mut dyn InputDriver> {
        None
    }
}
