//! Geometry primitives shared by contents, connectors and routers.

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
/// Axis-aligned box given by its `min` (left, top) and `max` (right, bottom) corners.
pub type Bounds = euclid::Box2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

pub fn bounds(left: f64, top: f64, right: f64, bottom: f64) -> Bounds {
    Bounds::new(point(left, top), point(right, bottom))
}

/// Side of a node an edge attaches to.
///
/// `In` and `Out` are the input/output faces of a directional node (a reaction), `Side1` and
/// `Side2` the two faces perpendicular to its flow. `Neutral` attaches to the centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionType {
    In,
    Out,
    Side1,
    Side2,
    #[default]
    Neutral,
}

/// The four sides of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sides {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Sides {
    pub fn around(center: Point, width: f64, height: f64) -> Self {
        Self {
            left: center.x - width / 2.0,
            right: center.x + width / 2.0,
            top: center.y - height / 2.0,
            bottom: center.y + height / 2.0,
        }
    }

    pub fn grow(self, by: f64) -> Self {
        Self {
            left: self.left - by,
            right: self.right + by,
            top: self.top - by,
            bottom: self.bottom + by,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        point(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    pub fn to_bounds(self) -> Bounds {
        bounds(self.left, self.top, self.right, self.bottom)
    }

    /// Strict containment: points on the border are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x > self.left && p.x < self.right && p.y > self.top && p.y < self.bottom
    }
}

/// Whether segment `a`-`b` passes through the interior of `rect`.
///
/// Liang–Barsky clipping against the open rectangle; touching the border does not count.
pub fn segment_crosses(a: Point, b: Point, rect: &Bounds) -> bool {
    const EPS: f64 = 1e-9;
    let (l, t, r, btm) = (
        rect.min.x + EPS,
        rect.min.y + EPS,
        rect.max.x - EPS,
        rect.max.y - EPS,
    );
    if l >= r || t >= btm {
        return false;
    }
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-dx, a.x - l),
        (dx, r - a.x),
        (-dy, a.y - t),
        (dy, btm - a.y),
    ] {
        if p.abs() < EPS {
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let ratio = q / p;
        if p < 0.0 {
            t0 = t0.max(ratio);
        } else {
            t1 = t1.min(ratio);
        }
        if t0 > t1 {
            return false;
        }
    }
    true
}
