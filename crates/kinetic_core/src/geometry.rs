//! Geometry primitives in logical pixels

use serde::{Deserialize, Serialize};

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Convert to a Rect at the origin (0, 0)
    pub const fn to_rect(self) -> Rect {
        Rect {
            origin: Point::ZERO,
            size: self,
        }
    }
}

/// Axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn area(&self) -> f32 {
        self.size.width.max(0.0) * self.size.height.max(0.0)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.right()
            && point.y >= self.origin.y
            && point.y <= self.bottom()
    }

    /// Offset the rect by a delta
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Rect {
            origin: Point::new(self.origin.x + dx, self.origin.y + dy),
            size: self.size,
        }
    }

    /// Grow the rect by `amount` on every side (negative shrinks)
    pub fn expand(&self, amount: f32) -> Self {
        Rect {
            origin: Point::new(self.origin.x - amount, self.origin.y - amount),
            size: Size::new(
                (self.size.width + 2.0 * amount).max(0.0),
                (self.size.height + 2.0 * amount).max(0.0),
            ),
        }
    }

    /// Scale the rect around its center
    pub fn scale_about_center(&self, sx: f32, sy: f32) -> Self {
        let c = self.center();
        let w = self.size.width * sx;
        let h = self.size.height * sy;
        Rect::new(c.x - w / 2.0, c.y - h / 2.0, w, h)
    }

    /// Overlapping region of two rects, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x().max(other.x());
        let top = self.y().max(other.y());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right > left && bottom > top {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 80.0, 100.0, 100.0);

        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 80.0, 50.0, 20.0)));
        assert_eq!(a.intersection(&Rect::new(100.0, 0.0, 10.0, 10.0)), None);
    }

    #[test]
    fn test_expand_and_scale() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(r.expand(5.0), Rect::new(5.0, 5.0, 30.0, 30.0));
        assert_eq!(r.scale_about_center(2.0, 0.5), Rect::new(0.0, 15.0, 40.0, 10.0));
    }
}
