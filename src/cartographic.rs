use geo::{Coord, Point};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// A position on the globe in radians. Height is always zero, everything here is clamped to the
/// ground.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cartographic {
    pub longitude: f64,
    pub latitude: f64,
}

impl Cartographic {
    pub fn new(longitude: f64, latitude: f64) -> Self{
        Cartographic {
            longitude,
            latitude,
        }
    }

    pub fn from_degrees(longitude: f64, latitude: f64) -> Self{
        Cartographic {
            longitude: longitude.to_radians(),
            latitude: latitude.to_radians(),
        }
    }

    pub fn longitude_degrees(&self) -> f64 {
        self.longitude.to_degrees()
    }

    pub fn latitude_degrees(&self) -> f64 {
        self.latitude.to_degrees()
    }
}

impl From<&Coord<f64>> for Cartographic {
    fn from(coord: &Coord<f64>) -> Self {
        Cartographic::from_degrees(coord.x, coord.y)
    }
}

impl From<&Point<f64>> for Cartographic {
    fn from(point: &Point<f64>) -> Self {
        Cartographic::from(&point.0)
    }
}

impl From<Cartographic> for Coord<f64> {
    fn from(cartographic: Cartographic) -> Self {
        Coord {
            x: cartographic.longitude_degrees(),
            y: cartographic.latitude_degrees(),
        }
    }
}

impl From<Cartographic> for Point<f64> {
    fn from(cartographic: Cartographic) -> Self {
        Point(Coord::from(cartographic))
    }
}

/// Serialized the way the globe viewer's own cartographic type serializes, height included
impl Serialize for Cartographic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Cartographic", 3)?;
        state.serialize_field("longitude", &self.longitude)?;
        state.serialize_field("latitude", &self.latitude)?;
        state.serialize_field("height", &0f64)?;
        state.end()
    }
}
