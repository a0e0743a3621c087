use std::ops::{Add, Mul, Sub};
use crate::cartographic::Cartographic;
use crate::constants::PARALLEL_TOLERANCE;

/// Point in a unit-radius Mercator projection. Rhumb lines are straight lines here, which is what
/// makes line intersection on the globe tractable.
///
/// See https://mathworld.wolfram.com/MercatorProjection.html
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MercatorCoord {
    pub x: f64,
    pub y: f64,
}

impl MercatorCoord {
    pub fn new(x: f64, y: f64) -> Self{
        MercatorCoord { x, y }
    }

    pub fn project(point: Cartographic) -> Self{
        MercatorCoord {
            x: point.longitude,
            y: point.latitude.tan().asinh(),
        }
    }

    pub fn unproject(&self) -> Cartographic {
        Cartographic::new(self.x, self.y.sinh().atan())
    }

    /// 2d cross product (z component of the 3d one)
    pub fn cross(&self, other: MercatorCoord) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add for MercatorCoord {
    type Output = MercatorCoord;

    fn add(self, rhs: MercatorCoord) -> MercatorCoord {
        MercatorCoord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for MercatorCoord {
    type Output = MercatorCoord;

    fn sub(self, rhs: MercatorCoord) -> MercatorCoord {
        MercatorCoord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for MercatorCoord {
    type Output = MercatorCoord;

    fn mul(self, rhs: f64) -> MercatorCoord {
        MercatorCoord::new(self.x * rhs, self.y * rhs)
    }
}

impl From<Cartographic> for MercatorCoord {
    fn from(point: Cartographic) -> Self {
        MercatorCoord::project(point)
    }
}

/// A finite segment in Mercator space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MercatorSegment {
    pub start: MercatorCoord,
    pub end: MercatorCoord,
}

impl MercatorSegment {
    pub fn new(start: MercatorCoord, end: MercatorCoord) -> Self{
        MercatorSegment { start, end }
    }

    pub fn delta(&self) -> MercatorCoord {
        self.end - self.start
    }

    /// Intersection of two segments, solving `p + t r = q + u s` for `t` and `u`.
    ///
    /// Returns `None` if the segments are (close to) parallel or the crossing point of the
    /// infinite lines lies outside either segment.
    ///
    /// See https://stackoverflow.com/a/565282
    pub fn intersection(&self, other: &MercatorSegment) -> Option<MercatorCoord> {
        let p = self.start;
        let q = other.start;
        let r = self.delta();
        let s = other.delta();

        let rs = r.cross(s);
        if rs.abs() < PARALLEL_TOLERANCE {
            return None;
        }
        let qp = q - p;
        let t = qp.cross(s) / rs;
        let u = qp.cross(r) / rs;

        if (0f64..=1f64).contains(&t) && (0f64..=1f64).contains(&u) {
            Some(p + r * t)
        } else {
            None
        }
    }

    /// Crossing point of the two segments extended to infinite lines. `None` when parallel.
    pub fn line_intersection(&self, other: &MercatorSegment) -> Option<MercatorCoord> {
        let r = self.delta();
        let s = other.delta();
        let rs = r.cross(s);
        if rs.abs() < f64::EPSILON {
            return None;
        }
        let t = (other.start - self.start).cross(s) / rs;
        Some(self.start + r * t)
    }

    /// evenly spaced points from start to end, no further apart than `step`. Both ends included.
    pub fn sample(&self, step: f64) -> Vec<MercatorCoord> {
        let length = self.delta().length();
        let segments = ((length / step).ceil() as usize).max(1);
        (0..=segments)
            .map(|i| self.start + self.delta() * (i as f64 / segments as f64))
            .collect()
    }
}
