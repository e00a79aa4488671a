//! Turns dirty areas into adapter calls.
//!
//! Buffered displays compose each area in the core's frame buffer (VDB) a
//! band of rows at a time and hand the band to `flush`. Unbuffered displays
//! get `fill` and `map` calls straight from the widgets' draw operations.

use log::trace;

use crate::driver::{FlushReady, HostDrivers};

use super::{
    screen::Screen,
    widget::{DrawOp, Widget},
    Area, Color, Opa, OPA_COVER, OPA_TRANSP,
};

/// Result of one refresh pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Refresh {
    /// Every dirty area reached the display.
    Done,
    /// A flush was not acknowledged, the rest is still dirty.
    AwaitingFlush,
}

/// Redraws all dirty areas through a frame buffer and `flush`.
pub(crate) fn refresh_buffered<H: HostDrivers + ?Sized>(
    vdb: &mut [Color],
    accelerated: bool,
    screen: &mut Screen,
    host: &mut H,
) -> Refresh {
    let mut areas = screen.take_invalid().into_iter();
    let mut scratch = Vec::new();

    while let Some(area) = areas.next() {
        let rows = (vdb.len() / area.width() as usize).max(1) as i32;
        let mut y = area.y1;
        while y <= area.y2 {
            let band = Area::new(area.x1, y, area.x2, (y + rows - 1).min(area.y2));
            let buf = &mut vdb[..band.size()];
            compose(screen, &band, buf, &mut scratch, accelerated, host);

            let mut ready = FlushReady::new();
            host.display().flush(&band, buf, &mut ready);
            trace!("flushed {:?}", band);
            y = band.y2 + 1;

            if !ready.is_ready() {
                if y <= area.y2 {
                    screen.invalidate(&Area::new(area.x1, y, area.x2, area.y2));
                }
                for rest in areas.by_ref() {
                    screen.invalidate(&rest);
                }
                return Refresh::AwaitingFlush;
            }
        }
    }
    Refresh::Done
}

/// Draws everything visible inside `band` into `buf`.
fn compose<H: HostDrivers + ?Sized>(
    screen: &Screen,
    band: &Area,
    buf: &mut [Color],
    scratch: &mut Vec<Color>,
    accelerated: bool,
    host: &mut H,
) {
    let mut mem = MemOps { host, accelerated };
    mem.fill(buf, screen.background());

    for widget in overlapping(screen, band) {
        for op in widget.draw_ops() {
            match op {
                DrawOp::Fill { area, color, opa } => {
                    let Some(clip) = area.intersect(band) else {
                        continue;
                    };
                    if opa == OPA_TRANSP {
                        continue;
                    }
                    let width = clip.width() as usize;
                    for y in clip.y1..=clip.y2 {
                        let start = band.offset_of(clip.x1, y);
                        let row = &mut buf[start..start + width];
                        if opa == OPA_COVER {
                            mem.fill(row, color);
                        } else {
                            scratch.clear();
                            scratch.resize(width, color);
                            mem.blend(row, scratch, opa);
                        }
                    }
                }
                DrawOp::Map { area, pixels } => {
                    let Some(clip) = area.intersect(band) else {
                        continue;
                    };
                    let width = clip.width() as usize;
                    for y in clip.y1..=clip.y2 {
                        let dst = band.offset_of(clip.x1, y);
                        let src = area.offset_of(clip.x1, y);
                        buf[dst..dst + width].copy_from_slice(&pixels[src..src + width]);
                    }
                }
            }
        }
    }
}

/// Redraws all dirty areas with direct `fill` and `map` calls.
///
/// Without a frame buffer there is nothing to blend against but the
/// background, so translucent fills are mixed with the screen color.
pub(crate) fn refresh_unbuffered<H: HostDrivers + ?Sized>(screen: &mut Screen, host: &mut H) {
    let background = screen.background();
    for area in screen.take_invalid() {
        host.display().fill(&area, background);

        for widget in overlapping(screen, &area) {
            for op in widget.draw_ops() {
                match op {
                    DrawOp::Fill { area: target, color, opa } => {
                        if opa == OPA_TRANSP {
                            continue;
                        }
                        if let Some(clip) = target.intersect(&area) {
                            host.display().fill(&clip, Color::mix(color, background, opa));
                        }
                    }
                    DrawOp::Map { area: target, pixels } => {
                        let Some(clip) = target.intersect(&area) else {
                            continue;
                        };
                        if clip == target {
                            host.display().map(&clip, pixels);
                        } else {
                            let clipped = clip_pixels(&target, pixels, &clip);
                            host.display().map(&clip, &clipped);
                        }
                    }
                }
            }
        }
        trace!("mapped {:?}", area);
    }
}

fn overlapping<'a>(screen: &'a Screen, area: &'a Area) -> impl Iterator<Item = &'a Widget> {
    screen
        .visible_widgets()
        .filter(move |w| w.area.intersect(area).is_some())
}

/// Cuts the pixels of `clip` out of a map covering `area`.
fn clip_pixels(area: &Area, pixels: &[Color], clip: &Area) -> Vec<Color> {
    let width = clip.width() as usize;
    let mut out = Vec::with_capacity(clip.size());
    for y in clip.y1..=clip.y2 {
        let start = area.offset_of(clip.x1, y);
        out.extend_from_slice(&pixels[start..start + width]);
    }
    out
}

/// Memory operations routed to the host's hooks when it offers them.
struct MemOps<'a, H: ?Sized> {
    host: &'a mut H,
    accelerated: bool,
}

impl<H: HostDrivers + ?Sized> MemOps<'_, H> {
    fn fill(&mut self, dest: &mut [Color], color: Color) {
        if self.accelerated {
            if let Some(gpu) = self.host.gpu() {
                gpu.mem_fill(dest, color);
                return;
            }
        }
        dest.fill(color);
    }

    fn blend(&mut self, dest: &mut [Color], src: &[Color], opa: Opa) {
        if self.accelerated {
            if let Some(gpu) = self.host.gpu() {
                gpu.mem_blend(dest, src, opa);
                return;
            }
        }
        for (d, s) in dest.iter_mut().zip(src) {
            *d = Color::mix(*s, *d, opa);
        }
    }
}
