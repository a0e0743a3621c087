use std::f64::consts::FRAC_PI_2;
use crate::cartographic::Cartographic;
use crate::constants::EARTH_RADIUS;
use crate::mercator::{MercatorCoord, MercatorSegment};
use crate::utils::{negative_pi_to_pi, zero_to_two_pi};

/// below this the line is treated as running along a parallel (or a meridian)
const DEGENERATE: f64 = 1e-12;

/// Latitude changes below this use the midpoint stretch factor. Dividing two differences this
/// small loses most of their digits, while the midpoint is exact to about the square of it.
const SMALL_LATITUDE_CHANGE: f64 = 1e-6;

/// A loxodrome between two points on a sphere of radius `EARTH_RADIUS`: the path that keeps a
/// constant heading. Headings are clockwise from north in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RhumbLine {
    pub start: Cartographic,
    pub end: Cartographic,
}

/// isometric latitude
fn psi(latitude: f64) -> f64 {
    latitude.tan().asinh()
}

/// ratio of latitude change to isometric latitude change, falling back to the stretch factor of
/// the middle parallel when the line runs (nearly) east-west
fn stretch(start_latitude: f64, d_latitude: f64, d_psi: f64) -> f64 {
    if d_latitude.abs() > SMALL_LATITUDE_CHANGE {
        d_latitude / d_psi
    } else {
        (start_latitude + d_latitude / 2.0).cos()
    }
}

impl RhumbLine {
    pub fn new(start: Cartographic, end: Cartographic) -> Self{
        RhumbLine { start, end }
    }

    /// Travels `distance` meters from `start` at `heading`. Negative distances go backwards.
    pub fn from_start_heading_distance(start: Cartographic, heading: f64, distance: f64) -> Self{
        let angular = distance / EARTH_RADIUS;
        let d_latitude = angular * heading.cos();
        let latitude = (start.latitude + d_latitude).clamp(-FRAC_PI_2, FRAC_PI_2);
        let d_psi = psi(latitude) - psi(start.latitude);
        let q = stretch(start.latitude, d_latitude, d_psi);
        let d_longitude = angular * heading.sin() / q;

        RhumbLine {
            start,
            end: Cartographic::new(negative_pi_to_pi(start.longitude + d_longitude), latitude),
        }
    }

    fn d_longitude(&self) -> f64 {
        negative_pi_to_pi(self.end.longitude - self.start.longitude)
    }

    fn d_psi(&self) -> f64 {
        psi(self.end.latitude) - psi(self.start.latitude)
    }

    /// heading from start to end, in `[0, 2π)`
    pub fn heading(&self) -> f64 {
        zero_to_two_pi(self.d_longitude().atan2(self.d_psi()))
    }

    /// length of the loxodrome in meters
    pub fn surface_distance(&self) -> f64 {
        let d_latitude = self.end.latitude - self.start.latitude;
        let q = stretch(self.start.latitude, d_latitude, self.d_psi());
        EARTH_RADIUS * (d_latitude.powi(2) + (q * self.d_longitude()).powi(2)).sqrt()
    }

    /// Where the infinite rhumb line through `start` at this line's heading crosses `longitude`.
    /// `None` for lines running along a meridian.
    pub fn find_intersection_with_longitude(&self, longitude: f64) -> Option<Cartographic> {
        let heading = self.heading();
        if heading.sin().abs() < DEGENERATE {
            return None;
        }
        let d_longitude = negative_pi_to_pi(longitude - self.start.longitude);
        let target_psi = psi(self.start.latitude) + d_longitude / heading.tan();
        Some(Cartographic::new(longitude, target_psi.sinh().atan()))
    }

    /// Where the infinite rhumb line through `start` at this line's heading crosses `latitude`.
    /// `None` for lines running along a parallel.
    pub fn find_intersection_with_latitude(&self, latitude: f64) -> Option<Cartographic> {
        let heading = self.heading();
        if heading.cos().abs() < DEGENERATE {
            return None;
        }
        let d_psi = psi(latitude) - psi(self.start.latitude);
        let longitude = negative_pi_to_pi(self.start.longitude + d_psi * heading.tan());
        Some(Cartographic::new(longitude, latitude))
    }

    pub fn as_mercator(&self) -> MercatorSegment {
        MercatorSegment::new(MercatorCoord::project(self.start), MercatorCoord::project(self.end))
    }

    /// Points along the line no more than `step` apart in Mercator units, both ends included.
    /// Since the line is straight in Mercator space, the samples all lie on the loxodrome.
    pub fn plot(&self, step: f64) -> Vec<Cartographic> {
        self.as_mercator()
            .sample(step)
            .iter()
            .map(MercatorCoord::unproject)
            .collect()
    }
}
