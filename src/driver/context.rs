use crate::{gui::Point, windowing::Surface};

use super::{
    DisplayDriver, GpuDriver, HostDrivers, InputDriver, PointerInput, SoftwareGpu,
    SurfaceDisplay,
};

/// The host state the adapters work on.
///
/// Owned by the event loop and lent to the core on every task handler call.
pub struct HostContext<S> {
    display: SurfaceDisplay<S>,
    gpu: Option<SoftwareGpu>,
    pointer: PointerInput,
    /// Display size, used to keep pointer samples on screen.
    hor_res: i32,
    ver_res: i32,
}

impl<S: Surface> HostContext<S> {
    pub fn new(surface: S, hor_res: i32, ver_res: i32) -> Self {
        Self {
            display: SurfaceDisplay::new(surface),
            gpu: None,
            pointer: PointerInput::default(),
            hor_res,
            ver_res,
        }
    }

    /// Exposes the memory acceleration hooks to the core.
    pub fn with_gpu(mut self) -> Self {
        self.gpu = Some(SoftwareGpu::default());
        self
    }

    pub fn surface(&self) -> &S {
        self.display.surface()
    }

    /// Latches a click at client coordinates, clamped to the display.
    pub fn press(&mut self, x: i32, y: i32) {
        let point = Point::new(
            x.clamp(0, self.hor_res - 1),
            y.clamp(0, self.ver_res - 1),
        );
        self.pointer.latch_mut().press(point);
    }
}

impl<S: Surface> HostDrivers for HostContext<S> {
    fn display(&mut self) -> &mut dyn DisplayDriver {
        &mut self.display
    }

    fn gpu(&mut self) -> Option<&mut dyn GpuDriver> {
        self.gpu.as_mut().map(|gpu| gpu as &mut dyn GpuDriver)
    }

    fn input(&mut self) -> Option<&mut dyn InputDriver> {
        Some(&mut self.pointer)
    }
}
