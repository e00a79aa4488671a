/// A point in display coordinates, origin top-left.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }
}

/// An axis-aligned rectangle with inclusive corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Area {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Area {
        Area { x1, y1, x2, y2 }
    }

    /// Builds an area from its top-left corner and its size.
    pub const fn with_size(x: i32, y: i32, width: i32, height: i32) -> Area {
        Area::new(x, y, x + width - 1, y + height - 1)
    }

    pub const fn width(&self) -> i32 {
        self.x2 - self.x1 + 1
    }

    pub const fn height(&self) -> i32 {
        self.y2 - self.y1 + 1
    }

    /// Number of pixels covered, zero for degenerate areas.
    pub fn size(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.width() as usize * self.height() as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.x1 > self.x2 || self.y1 > self.y2
    }

    pub const fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x1 && point.x <= self.x2 && point.y >= self.y1 && point.y <= self.y2
    }

    /// True if `other` lies completely inside this area.
    pub const fn contains(&self, other: &Area) -> bool {
        other.x1 >= self.x1 && other.y1 >= self.y1 && other.x2 <= self.x2 && other.y2 <= self.y2
    }

    pub fn intersect(&self, other: &Area) -> Option<Area> {
        let area = Area::new(
            self.x1.max(other.x1),
            self.y1.max(other.y1),
            self.x2.min(other.x2),
            self.y2.min(other.y2),
        );
        (!area.is_empty()).then_some(area)
    }

    /// Smallest area covering both.
    pub fn join(&self, other: &Area) -> Area {
        Area::new(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
        )
    }

    /// Index of `(x, y)` in a row-major buffer laid over this area.
    pub(crate) fn offset_of(&self, x: i32, y: i32) -> usize {
        (y - self.y1) as usize * self.width() as usize + (x - self.x1) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn size_is_inclusive() {
        let area = Area::new(0, 0, 9, 9);
        assert_eq!(area.width(), 10);
        assert_eq!(area.height(), 10);
        assert_eq!(area.size(), 100);
        assert_eq!(Area::new(3, 3, 3, 3).size(), 1);
        assert_eq!(Area::new(4, 0, 3, 0).size(), 0);
    }

    #[test_log::test]
    fn with_size_matches_corners() {
        assert_eq!(Area::with_size(10, 20, 5, 2), Area::new(10, 20, 14, 21));
    }

    #[test_log::test]
    fn intersect_and_join() {
        let a = Area::new(0, 0, 9, 9);
        let b = Area::new(5, 5, 14, 14);
        assert_eq!(a.intersect(&b), Some(Area::new(5, 5, 9, 9)));
        assert_eq!(a.join(&b), Area::new(0, 0, 14, 14));
        assert_eq!(a.intersect(&Area::new(10, 0, 12, 9)), None);
    }

    #[test_log::test]
    fn containment() {
        let a = Area::new(0, 0, 9, 9);
        assert!(a.contains(&Area::new(2, 2, 9, 9)));
        assert!(!a.contains(&Area::new(2, 2, 10, 9)));
        assert!(a.contains_point(Point::new(9, 0)));
        assert!(!a.contains_point(Point::new(10, 0)));
    }

    #[test_log::test]
    fn offset_is_row_major() {
        let area = Area::new(10, 20, 13, 22);
        assert_eq!(area.offset_of(10, 20), 0);
        assert_eq!(area.offset_of(13, 20), 3);
        assert_eq!(area.offset_of(10, 21), 4);
    }
}
