//! Coordinate primitives shared by every generator.

use std::fmt::Display;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// The integer type for database units (nanometers).
pub type Int = i64;

/// A direction: horizontal or vertical.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir {
    Horiz,
    Vert,
}

impl Default for Dir {
    fn default() -> Self {
        Self::Vert
    }
}

impl Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Horiz => write!(f, "horizontal"),
            Self::Vert => write!(f, "vertical"),
        }
    }
}

impl Dir {
    pub fn short_form(&self) -> &'static str {
        match *self {
            Self::Horiz => "h",
            Self::Vert => "v",
        }
    }

    pub fn other(&self) -> Self {
        match *self {
            Self::Horiz => Self::Vert,
            Self::Vert => Self::Horiz,
        }
    }
}

/// Placement transform of an instance. Consumed only by the geometry side;
/// the netlist never sees it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orient {
    R0,
    R90,
    R180,
    R270,
    /// Mirror about the x-axis.
    Mx,
    /// Mirror about the y-axis.
    My,
}

impl Default for Orient {
    fn default() -> Self {
        Self::R0
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: Int,
    pub y: Int,
}

impl Point {
    pub const fn new(x: Int, y: Int) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    pub fn coord(&self, dir: Dir) -> Int {
        match dir {
            Dir::Horiz => self.x,
            Dir::Vert => self.y,
        }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An axis-aligned rectangle. `p0` is the lower-left corner, `p1` the
/// upper-right corner.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub p0: Point,
    pub p1: Point,
}

impl Rect {
    pub fn new(p0: Point, p1: Point) -> Self {
        Self {
            p0: Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
            p1: Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
        }
    }

    pub fn with_size(ll: Point, width: Int, height: Int) -> Self {
        assert!(width >= 0);
        assert!(height >= 0);
        Self {
            p0: ll,
            p1: Point::new(ll.x + width, ll.y + height),
        }
    }

    pub fn width(&self) -> Int {
        self.p1.x - self.p0.x
    }

    pub fn height(&self) -> Int {
        self.p1.y - self.p0.y
    }

    pub fn center(&self) -> Point {
        Point::new((self.p0.x + self.p1.x) / 2, (self.p0.y + self.p1.y) / 2)
    }

    pub fn span(&self, dir: Dir) -> Int {
        match dir {
            Dir::Horiz => self.width(),
            Dir::Vert => self.height(),
        }
    }

    pub fn translate(&self, p: Point) -> Rect {
        Rect {
            p0: self.p0 + p,
            p1: self.p1 + p,
        }
    }

    pub fn expand(&self, dist: Int) -> Rect {
        assert!(self.p0.x <= self.p1.x);
        assert!(self.p0.y <= self.p1.y);
        Rect {
            p0: Point::new(self.p0.x - dist, self.p0.y - dist),
            p1: Point::new(self.p1.x + dist, self.p1.y + dist),
        }
    }

    pub fn expand_dir(&self, dir: Dir, dist: Int) -> Rect {
        match dir {
            Dir::Horiz => Rect {
                p0: Point::new(self.p0.x - dist, self.p0.y),
                p1: Point::new(self.p1.x + dist, self.p1.y),
            },
            Dir::Vert => Rect {
                p0: Point::new(self.p0.x, self.p0.y - dist),
                p1: Point::new(self.p1.x, self.p1.y + dist),
            },
        }
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            p0: Point::new(self.p0.x.min(other.p0.x), self.p0.y.min(other.p0.y)),
            p1: Point::new(self.p1.x.max(other.p1.x), self.p1.y.max(other.p1.y)),
        }
    }

    /// The rectangle covering a wire segment of the given width between two
    /// points that share an x or y coordinate.
    pub fn from_segment(a: Point, b: Point, width: Int) -> Rect {
        assert!(
            a.x == b.x || a.y == b.y,
            "wire segments must be axis-aligned"
        );
        let half = width / 2;
        if a.y == b.y {
            Rect::new(
                Point::new(a.x.min(b.x), a.y - half),
                Point::new(a.x.max(b.x), a.y + width - half),
            )
        } else {
            Rect::new(
                Point::new(a.x - half, a.y.min(b.y)),
                Point::new(a.x + width - half, a.y.max(b.y)),
            )
        }
    }
}

/// Rounds `a` to the nearest multiple of `b`.
#[inline]
pub fn round_to_grid(a: Int, b: Int) -> Int {
    assert!(b > 0);
    let min = (a / b) * b;
    let max = min + b;
    if a - min < max - a {
        min
    } else {
        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalizes_corners() {
        let r = Rect::new(Point::new(100, 200), Point::new(0, 50));
        assert_eq!(r.p0, Point::new(0, 50));
        assert_eq!(r.p1, Point::new(100, 200));
        assert_eq!(r.width(), 100);
        assert_eq!(r.height(), 150);
    }

    #[test]
    fn test_rect_expand_and_union() {
        let a = Rect::with_size(Point::zero(), 100, 100);
        let b = a.translate(Point::new(300, 0));
        let u = a.union(&b);
        assert_eq!(u.width(), 400);
        assert_eq!(a.expand(10).width(), 120);
    }

    #[test]
    fn test_segment_rect() {
        let r = Rect::from_segment(Point::new(0, 100), Point::new(500, 100), 40);
        assert_eq!(r, Rect::new(Point::new(0, 80), Point::new(500, 120)));
    }

    #[test]
    #[should_panic]
    fn test_segment_must_be_manhattan() {
        let _ = Rect::from_segment(Point::zero(), Point::new(10, 10), 40);
    }

    #[test]
    fn test_round_to_grid() {
        assert_eq!(round_to_grid(123, 5), 125);
        assert_eq!(round_to_grid(121, 5), 120);
        assert_eq!(round_to_grid(120, 5), 120);
    }
}
