/// Pure geometry shared by every entity: axis-aligned rectangles, the
/// line-of-sight blocking test and the screen-space point rotation.

use glam::DVec2;

/// Axis-aligned rectangle anchored at its top-left corner (screen
/// convention: y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    /// A `size` box centered on `center`.
    pub fn centered(center: DVec2, size: DVec2) -> Self {
        Rect {
            x: center.x - size.x / 2.0,
            y: center.y - size.y / 2.0,
            w: size.x,
            h: size.y,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Half-open overlap: rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Conservative segment/rectangle test used for line of sight.
///
/// Only rejects when the segment's bounding box lies entirely to one side of
/// the rectangle, so a segment whose bounding box touches the rectangle is
/// reported as intersecting even if the segment itself misses it.  Enemy
/// sight relies on this looser rule.
pub fn line_intersects_rect(from: DVec2, to: DVec2, rect: &Rect) -> bool {
    if from.x.max(to.x) < rect.left() || from.x.min(to.x) > rect.right() {
        return false;
    }
    if from.y.max(to.y) < rect.top() || from.y.min(to.y) > rect.bottom() {
        return false;
    }
    true
}

/// Rotate `point` about the origin by `angle_degrees` in screen space
/// (y axis pointing down):
///
/// ```text
/// x' =  x·cos θ + y·sin θ
/// y' = -x·sin θ + y·cos θ
/// ```
pub fn rotate_point(point: DVec2, angle_degrees: f64) -> DVec2 {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    DVec2::new(point.x * cos + point.y * sin, -point.x * sin + point.y * cos)
}

/// Unit vector a rotation of `angle_degrees` faces.  Zero degrees points
/// down the screen (+y).
pub fn facing(angle_degrees: f64) -> DVec2 {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    DVec2::new(sin, cos)
}

