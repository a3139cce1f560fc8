//! Bounding box operations and IoU calculations

use std::fmt;

/// Axis-aligned box in top-left corner plus size form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from corner bounds [xmin, ymin, xmax, ymax]
    pub fn from_bounds(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self::new(xmin, ymin, xmax - xmin, ymax - ymin)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Larger of width and height
    pub fn max_side(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Convert to bounds array [xmin, ymin, xmax, ymax]
    pub fn to_bounds(&self) -> [f64; 4] {
        [self.x, self.y, self.right(), self.bottom()]
    }

    /// Round every component to the given number of decimal places
    pub fn rounded(&self, decimals: i32) -> Self {
        let factor = 10f64.powi(decimals);
        let round = |v: f64| (v * factor).round() / factor;
        Self::new(
            round(self.x),
            round(self.y),
            round(self.width),
            round(self.height),
        )
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BoundingBox({}, {}, {}, {})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Euclidean distance between the centers of two boxes
pub fn center_distance(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    (ax - bx).hypot(ay - by)
}

/// Calculate IoU between two bounding boxes, 0 when they do not overlap
pub fn calculate_iou(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let w_intersection = a.right().min(b.right()) - a.x.max(b.x);
    let h_intersection = a.bottom().min(b.bottom()) - a.y.max(b.y);

    if w_intersection <= 0.0 || h_intersection <= 0.0 {
        return 0.0;
    }

    let intersection = w_intersection * h_intersection;
    let union = a.area() + b.area() - intersection;

    intersection / union
}

/// `1 - IoU`; exactly 1 for boxes without positive overlap
pub fn inverse_iou(a: &BoundingBox, b: &BoundingBox) -> f64 {
    1.0 - calculate_iou(a, b)
}
