use log::warn;

use crate::{
    gui::{Area, Color},
    windowing::{ColorRef, Surface},
};

use super::{DisplayDriver, FlushReady};

/// A [DisplayDriver] that puts pixels on a host [Surface] one by one.
pub struct SurfaceDisplay<S> {
    surface: S,
}

impl<S: Surface> SurfaceDisplay<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Copies `pixels` into `area` row by row.
    /// Element 0 lands on `(x1, y1)` and nothing past `area.size()` is read.
    fn put_pixels(&mut self, area: &Area, pixels: &[Color]) {
        if area.is_empty() {
            return;
        }
        let expected = area.size();
        if pixels.len() < expected {
            warn!(
                "pixel map for {:?} holds {} of {} pixels",
                area,
                pixels.len(),
                expected
            );
        }

        let width = area.width() as usize;
        let rows = pixels[..pixels.len().min(expected)].chunks(width);
        for (y, row) in (area.y1..=area.y2).zip(rows) {
            for (x, color) in (area.x1..=area.x2).zip(row) {
                self.surface.set_pixel(x, y, ColorRef::from(*color));
            }
        }
    }
}

impl<S: Surface> DisplayDriver for SurfaceDisplay<S> {
    fn flush(&mut self, area: &Area, pixels: &[Color], ready: &mut FlushReady) {
        self.put_pixels(area, pixels);
        ready.ready();
    }

    fn map(&mut self, area: &Area, pixels: &[Color]) {
        self.put_pixels(area, pixels);
    }

    fn fill(&mut self, area: &Area, color: Color) {
        self.surface.fill_rect(area, ColorRef::from(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::windowing::memory::MemorySurface;

    fn display() -> SurfaceDisplay<MemorySurface> {
        SurfaceDisplay::new(MemorySurface::new(32, 32, ColorRef::from(Color::WHITE)))
    }

    fn numbered(count: usize) -> Vec<Color> {
        (0..count).map(|i| Color::rgb(i as u8, 0, 0)).collect()
    }

    fn red_at(display: &SurfaceDisplay<MemorySurface>, x: i32, y: i32) -> u8 {
        display.surface().pixel(x, y).unwrap().red()
    }

    #[test_log::test]
    fn flush_starts_at_top_left_and_goes_row_major() {
        let mut display = display();
        let area = Area::new(2, 3, 5, 5);
        let pixels = numbered(area.size());
        let mut ready = FlushReady::new();

        display.flush(&area, &pixels, &mut ready);

        assert_eq!(red_at(&display, 2, 3), 0);
        assert_eq!(red_at(&display, 5, 3), 3);
        assert_eq!(red_at(&display, 2, 4), 4);
        assert_eq!(red_at(&display, 5, 5), 11);
        assert_eq!(display.surface().writes(), 12);
    }

    #[test_log::test]
    fn flush_signals_ready_exactly_once() {
        let mut display = display();
        let area = Area::new(0, 0, 1, 1);
        let mut ready = FlushReady::new();

        display.flush(&area, &numbered(4), &mut ready);

        assert_eq!(ready.signals(), 1);
    }

    #[test_log::test]
    fn map_writes_the_same_pixels_without_a_signal() {
        let mut display = display();
        let area = Area::new(10, 10, 12, 11);
        display.map(&area, &numbered(area.size()));

        assert_eq!(red_at(&display, 10, 10), 0);
        assert_eq!(red_at(&display, 12, 11), 5);
        assert_eq!(display.surface().writes(), 6);
    }

    #[test_log::test]
    fn oversized_maps_are_not_read_past_the_area() {
        let mut display = display();
        let area = Area::new(0, 0, 1, 1);
        display.map(&area, &numbered(10));

        assert_eq!(display.surface().writes(), 4);
        assert_eq!(red_at(&display, 2, 0), 255);
    }

    #[test_log::test]
    fn short_maps_write_what_is_there() {
        let mut display = display();
        let area = Area::new(0, 0, 3, 1);
        display.map(&area, &numbered(5));

        assert_eq!(display.surface().writes(), 5);
        assert_eq!(red_at(&display, 0, 1), 4);
        assert_eq!(red_at(&display, 1, 1), 255);
    }

    #[test_log::test]
    fn fill_covers_the_inclusive_rectangle_only() {
        let mut display = display();
        display.fill(&Area::new(0, 0, 9, 9), Color::RED);

        let red = ColorRef::from(Color::RED);
        let white = ColorRef::from(Color::WHITE);
        assert_eq!(display.surface().pixel(5, 5), Some(red));
        assert_eq!(display.surface().pixel(9, 9), Some(red));
        assert_eq!(display.surface().pixel(10, 10), Some(white));
        assert_eq!(display.surface().pixel(10, 0), Some(white));
        assert_eq!(display.surface().pixel(0, 10), Some(white));
        assert_eq!(display.surface().writes(), 100);
    }
}
