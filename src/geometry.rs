use crate::config::CollisionProperty;

/// Axis-aligned rectangle given by its edges. `top` is the smaller `y`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn from_center(x: f64, y: f64, half_width: f64, half_height: f64) -> Self {
        Self {
            left: x - half_width,
            top: y - half_height,
            right: x + half_width,
            bottom: y + half_height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.left + self.right) * 0.5, (self.top + self.bottom) * 0.5)
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Inclusive test: rectangles sharing only an edge intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        other.left <= self.right
            && other.right >= self.left
            && other.top <= self.bottom
            && other.bottom >= self.top
    }

    /// Area of the intersection, 0 when disjoint or touching.
    pub fn overlap_area(&self, other: &Bounds) -> f64 {
        let w = self.right.min(other.right) - self.left.max(other.left);
        let h = self.bottom.min(other.bottom) - self.top.max(other.top);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }
}

/// Geometry snapshot of one object as seen by the overlap predicates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Shape {
    pub x: f64,
    pub y: f64,
    pub half_width: f64,
    pub half_height: f64,
    pub radius: f64,
}

impl Shape {
    pub fn circle(x: f64, y: f64, radius: f64) -> Self {
        Self {
            x,
            y,
            half_width: radius,
            half_height: radius,
            radius,
        }
    }

    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            half_width: width * 0.5,
            half_height: height * 0.5,
            radius: width.min(height) * 0.5,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_center(self.x, self.y, self.half_width, self.half_height)
    }

    /// Whether `self` and `other` collide under `property`.
    ///
    /// A positive `threshold` demands deeper overlap: for distance tests the
    /// centres must be within `(1 - threshold)` of the radius sum, for
    /// bounding boxes the shared area must cover `threshold` of the smaller
    /// box. Every outcome implies the bounding boxes intersect.
    pub fn collides(&self, other: &Shape, property: CollisionProperty, threshold: f64) -> bool {
        match property {
            CollisionProperty::Distance => {
                let dx = self.x - other.x;
                let dy = self.y - other.y;
                let reach = (self.radius + other.radius) * (1.0 - threshold);
                dx * dx + dy * dy <= reach * reach
            }
            CollisionProperty::BoundingBox => {
                let a = self.bounds();
                let b = other.bounds();
                if !a.intersects(&b) {
                    return false;
                }
                if threshold <= 0.0 {
                    return true;
                }
                a.overlap_area(&b) >= threshold * a.area().min(b.area())
            }
        }
    }
}
