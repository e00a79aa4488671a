//! In-memory stand-ins for the GDI surface and the Win32 message queue.

use std::collections::VecDeque;

use anyhow::anyhow;

use super::{ColorRef, Host, HostEvent, Surface};

/// A plain pixel grid. Writes outside the grid are dropped, like GDI does.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    width: i32,
    height: i32,
    pixels: Vec<ColorRef>,
    writes: usize,
}

impl MemorySurface {
    pub fn new(width: i32, height: i32, background: ColorRef) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; (width * height) as usize],
            writes: 0,
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<ColorRef> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Number of pixels written since creation.
    pub fn writes(&self) -> usize {
        self.writes
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let inside = x >= 0 && y >= 0 && x < self.width && y < self.height;
        inside.then(|| (y * self.width + x) as usize)
    }
}

impl Surface for MemorySurface {
    fn set_pixel(&mut self, x: i32, y: i32, color: ColorRef) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
            self.writes += 1;
        }
    }
}

/// A host that replays a fixed list of events, one poll at a time.
pub struct ScriptedHost {
    surface: Option<MemorySurface>,
    events: VecDeque<Option<HostEvent>>,
}

impl ScriptedHost {
    pub fn new(surface: MemorySurface) -> Self {
        Self {
            surface: Some(surface),
            events: VecDeque::new(),
        }
    }

    /// A host whose surface cannot be acquired.
    pub fn without_surface() -> Self {
        Self {
            surface: None,
            events: VecDeque::new(),
        }
    }

    pub fn push(&mut self, event: HostEvent) {
        self.events.push_back(Some(event));
    }

    /// Ends the current drain so the loop gets one idle step.
    pub fn push_idle(&mut self) {
        self.events.push_back(None);
    }
}

impl Host for ScriptedHost {
    type Surface = MemorySurface;

    fn acquire_surface(&mut self) -> anyhow::Result<MemorySurface> {
        self.surface
            .take()
            .ok_or_else(|| anyhow!("no surface left to hand out"))
    }

    fn poll_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front().flatten()
    }
}
