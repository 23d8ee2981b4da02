use imageproc::point::Point;
use serde::{Deserialize, Serialize};

/// Outer boundary of one connected mask region
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    /// Enclosed area of the boundary polygon (shoelace formula)
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }

        let mut twice_area: i64 = 0;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            twice_area += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
        }

        (twice_area.abs() as f64) / 2.0
    }

    /// Axis-aligned bounding rectangle of the boundary points
    pub fn bounding_rect(&self) -> Option<BoundingRect> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

        for p in &self.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(BoundingRect {
            x: min_x.max(0) as u32,
            y: min_y.max(0) as u32,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        })
    }
}

/// Integer pixel rectangle, inclusive of its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingRect {
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f64 / self.height as f64
    }
}

/// Bounding box and heuristic confidence for a detected chop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
    pub confidence: f64,
    pub area_ratio: f64,
}

impl DetectionResult {
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }
}

/// Outcome of a single detection call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detection {
    Detected(DetectionResult),
    NotDetected,
}

impl Detection {
    pub fn is_detected(&self) -> bool {
        matches!(self, Detection::Detected(_))
    }

    pub fn result(&self) -> Option<&DetectionResult> {
        match self {
            Detection::Detected(result) => Some(result),
            Detection::NotDetected => None,
        }
    }
}

impl From<Option<DetectionResult>> for Detection {
    fn from(value: Option<DetectionResult>) -> Self {
        match value {
            Some(result) => Detection::Detected(result),
            None => Detection::NotDetected,
        }
    }
}
