use std::f64::consts::PI;
use std::fmt::Debug;
use std::path::Path;
use csv::ReaderBuilder;
use log::debug;
use crate::cartographic::Cartographic;
use crate::constants::{BOUNDS_PADDING, DIRECTION_TOLERANCE, MIN_CANDIDATE_DISTANCE, PROBE_LINE_LENGTH};
use crate::errors::FieldLinesError;
use crate::kml_utils::{get_regions, load_kml_file};
use crate::mercator::MercatorCoord;
use crate::rhumb::RhumbLine;
use crate::utils::{angle_difference, f64_max, f64_min};

/// A closed ring of rhumb lines (the national border) and its slightly padded bounding box.
#[derive(Clone, Debug)]
pub struct Boundary {
    /// `[west, east]` in radians
    pub longitude: [f64; 2],
    /// `[south, north]` in radians
    pub latitude: [f64; 2],
    /// segment `i` runs from point `i` to point `i + 1`, the last one back to the first
    pub lines: Vec<RhumbLine>,
}

impl Boundary {
    /// builds the ring from its vertices. The ring is closed implicitly, repeating the first
    /// point at the end is allowed but not needed.
    pub fn new(points: Vec<Cartographic>) -> Option<Boundary> {
        let mut points = points;
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return None;
        }

        let (mut west, mut east) = (f64::MAX, f64::MIN);
        let (mut south, mut north) = (f64::MAX, f64::MIN);
        for point in &points {
            west = f64_min(west, point.longitude);
            east = f64_max(east, point.longitude);
            south = f64_min(south, point.latitude);
            north = f64_max(north, point.latitude);
        }

        let lines = points.iter().enumerate().map(|(index, point)| {
            RhumbLine::new(*point, points[(index + 1) % points.len()])
        }).collect();

        Some(Boundary {
            longitude: [west - BOUNDS_PADDING, east + BOUNDS_PADDING],
            latitude: [south - BOUNDS_PADDING, north + BOUNDS_PADDING],
            lines,
        })
    }

    /// Loads `longitude,latitude` rows (degrees, no header). Lines starting with `#` are comments,
    /// extra columns are ignored.
    pub fn load_csv<P: AsRef<Path> + Debug>(path: P) -> Result<Boundary, FieldLinesError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&path)?;

        let mut points: Vec<Cartographic> = Vec::new();
        for record in reader.records() {
            let record = record?;
            match (record.get(0), record.get(1)) {
                (Some(longitude), Some(latitude)) => {
                    points.push(Cartographic::from_degrees(longitude.parse()?, latitude.parse()?));
                }
                _ => {
                    return Err(FieldLinesError::BoundaryRowError {
                        path: path.as_ref().to_path_buf(),
                        line: record.position().map(|position| position.line()).unwrap_or_default(),
                    });
                }
            }
        }

        let count = points.len();
        Boundary::new(points).ok_or(FieldLinesError::BoundaryTooSmallError {
            path: path.as_ref().to_path_buf(),
            points: count,
        })
    }

    /// Uses the exterior ring of the first polygon in a KML file
    pub fn load_kml<P: AsRef<Path> + Debug>(path: P) -> Result<Boundary, FieldLinesError> {
        let region = get_regions(load_kml_file(&path)?)
            .into_iter()
            .next()
            .ok_or_else(|| FieldLinesError::NoBoundaryPolygonError(path.as_ref().to_path_buf()))?;

        let points: Vec<Cartographic> = region.exterior().coords().map(Cartographic::from).collect();
        let count = points.len();
        Boundary::new(points).ok_or(FieldLinesError::BoundaryTooSmallError {
            path: path.as_ref().to_path_buf(),
            points: count,
        })
    }

    /// picks the loader from the file extension, anything but `.kml` is read as CSV
    pub fn load<P: AsRef<Path> + Debug>(path: P) -> Result<Boundary, FieldLinesError> {
        let is_kml = path.as_ref()
            .extension()
            .map(|extension| extension.eq_ignore_ascii_case("kml"))
            .unwrap_or(false);
        if is_kml {
            Boundary::load_kml(path)
        } else {
            Boundary::load_csv(path)
        }
    }

    /// `true` for points inside or on the padded bounding box. A line crossing one edge of the
    /// box outside the box's span along that edge leaves through another edge first.
    pub fn box_contains(&self, point: Cartographic) -> bool {
        let slack = BOUNDS_PADDING * 1e-3;
        (self.longitude[0] - slack..=self.longitude[1] + slack).contains(&point.longitude)
            && (self.latitude[0] - slack..=self.latitude[1] + slack).contains(&point.latitude)
    }

    /// Extends a rhumb line through `field` at `heading` in both directions until it first meets
    /// the boundary ring on each side.
    ///
    /// The line is first stretched to the padded bounding box, which is guaranteed to be outside
    /// the ring, then that long line is intersected with every ring segment in Mercator space.
    pub fn limit(&self, field: Cartographic, heading: f64) -> Result<RhumbLine, FieldLinesError> {
        let probe = RhumbLine::from_start_heading_distance(field, heading, PROBE_LINE_LENGTH);

        let box_hits: Vec<Cartographic> = self.longitude.iter()
            .filter_map(|longitude| probe.find_intersection_with_longitude(*longitude))
            .chain(self.latitude.iter()
                .filter_map(|latitude| probe.find_intersection_with_latitude(*latitude)))
            .filter(|hit| self.box_contains(*hit))
            .collect();
        let big_line = shortest_rhumb(field, heading, &box_hits)?;

        let big_segment = big_line.as_mercator();
        let ring_hits: Vec<Cartographic> = self.lines.iter()
            .filter_map(|line| big_segment.intersection(&line.as_mercator()))
            .map(|hit| MercatorCoord::unproject(&hit))
            .collect();
        debug!("line at heading {heading} crosses the boundary {} times", ring_hits.len());

        shortest_rhumb(field, heading, &ring_hits)
    }
}

/// For both directions along `heading` (backwards first), finds the closest of `points` lying in
/// that direction from `start`, and returns the rhumb line between those two closest points.
pub fn shortest_rhumb(start: Cartographic, heading: f64, points: &[Cartographic]) -> Result<RhumbLine, FieldLinesError> {
    let backward = closest_in_direction(start, heading - PI, points)
        .ok_or(FieldLinesError::BoundaryLimitError { heading, direction: "backward" })?;
    let forward = closest_in_direction(start, heading, points)
        .ok_or(FieldLinesError::BoundaryLimitError { heading, direction: "forward" })?;

    Ok(RhumbLine::new(
        RhumbLine::from_start_heading_distance(start, heading - PI, backward).end,
        RhumbLine::from_start_heading_distance(start, heading, forward).end,
    ))
}

/// distance to the nearest of `points` whose heading from `start` is `direction`
fn closest_in_direction(start: Cartographic, direction: f64, points: &[Cartographic]) -> Option<f64> {
    points.iter()
        .map(|point| RhumbLine::new(start, *point))
        .filter(|line| line.surface_distance() > MIN_CANDIDATE_DISTANCE)
        .filter(|line| angle_difference(line.heading(), direction).abs() < DIRECTION_TOLERANCE)
        .map(|line| line.surface_distance())
        .reduce(f64_min)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;
    use std::io::Write;
    use super::*;

    /// a square from 10°W to 10°E and 10°S to 10°N
    fn square() -> Boundary {
        Boundary::new(vec![
            Cartographic::from_degrees(-10.0, -10.0),
            Cartographic::from_degrees(10.0, -10.0),
            Cartographic::from_degrees(10.0, 10.0),
            Cartographic::from_degrees(-10.0, 10.0),
        ]).unwrap()
    }

    #[test]
    fn test_ring_is_closed() {
        let boundary = square();
        assert_eq!(boundary.lines.len(), 4);
        assert_eq!(boundary.lines[3].end, boundary.lines[0].start);
        assert!(boundary.longitude[0] < (-10f64).to_radians());
        assert!(boundary.latitude[1] > 10f64.to_radians());
    }

    #[test]
    fn test_box_contains() {
        let boundary = square();
        assert!(boundary.box_contains(Cartographic::from_degrees(0.0, 0.0)));
        assert!(boundary.box_contains(Cartographic::new(boundary.longitude[1], 0.0)));
        assert!(!boundary.box_contains(Cartographic::from_degrees(11.0, 0.0)));
        assert!(!boundary.box_contains(Cartographic::from_degrees(0.0, -10.1)));
    }

    #[test]
    fn test_limit_almost_east_west() {
        // nearly parallel to the box's top and bottom, those crossings land far outside the box
        let line = square().limit(Cartographic::from_degrees(0.0, 1.0), FRAC_PI_2 + 1e-7).unwrap();
        assert!((line.start.longitude_degrees() + 10.0).abs() < 1e-4);
        assert!((line.end.longitude_degrees() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_limit_within_a_hair_of_east_west() {
        // away from the equator, where the latitude change along the line is all rounding
        let boundary = Boundary::new(vec![
            Cartographic::from_degrees(-10.0, 30.0),
            Cartographic::from_degrees(10.0, 30.0),
            Cartographic::from_degrees(10.0, 50.0),
            Cartographic::from_degrees(-10.0, 50.0),
        ]).unwrap();
        let field = Cartographic::from_degrees(0.0, 40.0);
        for offset in [1e-11, 3e-11, 1e-10] {
            let line = boundary.limit(field, FRAC_PI_2 + offset).unwrap();
            assert!((line.start.longitude_degrees() + 10.0).abs() < 1e-6, "{offset}: {:?}", line);
            assert!((line.end.longitude_degrees() - 10.0).abs() < 1e-6, "{offset}: {:?}", line);
            assert!((line.start.latitude_degrees() - 40.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_repeated_first_point_is_dropped() {
        let mut points = vec![
            Cartographic::from_degrees(0.0, 0.0),
            Cartographic::from_degrees(1.0, 0.0),
            Cartographic::from_degrees(1.0, 1.0),
        ];
        points.push(points[0]);
        assert_eq!(Boundary::new(points).unwrap().lines.len(), 3);
    }

    #[test]
    fn test_too_few_points() {
        assert!(Boundary::new(vec![
            Cartographic::from_degrees(0.0, 0.0),
            Cartographic::from_degrees(1.0, 0.0),
        ]).is_none());
    }

    #[test]
    fn test_limit_east_west() {
        let line = square().limit(Cartographic::from_degrees(2.0, 0.0), FRAC_PI_2).unwrap();
        assert!((line.start.longitude_degrees() + 10.0).abs() < 1e-6);
        assert!((line.end.longitude_degrees() - 10.0).abs() < 1e-6);
        assert!(line.start.latitude.abs() < 1e-9);
        assert!((line.heading() - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_limit_north_south() {
        let line = square().limit(Cartographic::from_degrees(3.0, 1.0), 0.0).unwrap();
        assert!((line.start.latitude_degrees() + 10.0).abs() < 1e-6);
        assert!((line.end.latitude_degrees() - 10.0).abs() < 1e-6);
        assert!((line.start.longitude_degrees() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_limit_diagonal_keeps_heading_and_field() {
        let field = Cartographic::from_degrees(1.0, 2.0);
        let heading = 0.6;
        let line = square().limit(field, heading).unwrap();
        assert!((line.heading() - heading).abs() < 1e-6);
        // the field sits on the line
        assert!((RhumbLine::new(line.start, field).heading() - heading).abs() < 1e-6);
        // and the ends sit on the square
        let on_edge = |point: Cartographic| {
            (point.longitude_degrees().abs() - 10.0).abs() < 1e-6
                || (point.latitude_degrees().abs() - 10.0).abs() < 1e-6
        };
        assert!(on_edge(line.start));
        assert!(on_edge(line.end));
    }

    #[test]
    fn test_limit_stops_at_nearest_crossing() {
        // a U shape: a line across the notch must stop at the inner walls
        let boundary = Boundary::new(vec![
            Cartographic::from_degrees(-10.0, -10.0),
            Cartographic::from_degrees(10.0, -10.0),
            Cartographic::from_degrees(10.0, 10.0),
            Cartographic::from_degrees(5.0, 10.0),
            Cartographic::from_degrees(5.0, 0.0),
            Cartographic::from_degrees(-5.0, 0.0),
            Cartographic::from_degrees(-5.0, 10.0),
            Cartographic::from_degrees(-10.0, 10.0),
        ]).unwrap();
        let line = boundary.limit(Cartographic::from_degrees(7.0, 5.0), 3.0 * FRAC_PI_2).unwrap();
        assert!((line.start.longitude_degrees() - 10.0).abs() < 1e-6);
        assert!((line.end.longitude_degrees() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_shortest_rhumb_needs_both_directions() {
        let start = Cartographic::from_degrees(0.0, 0.0);
        let ahead = vec![Cartographic::from_degrees(0.0, 1.0)];
        assert!(matches!(
            shortest_rhumb(start, 0.0, &ahead),
            Err(FieldLinesError::BoundaryLimitError { direction: "backward", .. })
        ));
    }

    #[test]
    fn test_load_csv_with_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# the square").unwrap();
        writeln!(file, "-10,-10").unwrap();
        writeln!(file, "10,-10,ignored").unwrap();
        writeln!(file, "10, 10").unwrap();
        writeln!(file, "-10,10").unwrap();

        let boundary = Boundary::load(file.path()).unwrap();
        assert_eq!(boundary.lines.len(), 4);
        assert!((boundary.lines[2].start.latitude_degrees() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_load_csv_too_small() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "-10,-10").unwrap();
        assert!(matches!(
            Boundary::load_csv(file.path()),
            Err(FieldLinesError::BoundaryTooSmallError { points: 1, .. })
        ));
    }

    #[test]
    fn test_load_csv_row_without_latitude() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "-10,-10").unwrap();
        writeln!(file, "10").unwrap();
        writeln!(file, "10,10").unwrap();
        assert!(matches!(
            Boundary::load_csv(file.path()),
            Err(FieldLinesError::BoundaryRowError { .. })
        ));
    }

    #[test]
    fn test_load_picks_kml_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".kml").tempfile().unwrap();
        write!(file, r#"<kml xmlns="http://www.opengis.net/kml/2.2"><Document><Placemark>
            <Polygon><outerBoundaryIs><LinearRing><coordinates>
                -10,-10,0 10,-10,0 10,10,0 -10,10,0 -10,-10,0
            </coordinates></LinearRing></outerBoundaryIs></Polygon>
        </Placemark></Document></kml>"#).unwrap();

        let boundary = Boundary::load(file.path()).unwrap();
        // the closing coordinate is not a fifth corner
        assert_eq!(boundary.lines.len(), 4);
        assert!((boundary.lines[1].start.longitude_degrees() - 10.0).abs() < 1e-12);
        let line = boundary.limit(Cartographic::from_degrees(2.0, 0.0), FRAC_PI_2).unwrap();
        assert!((line.end.longitude_degrees() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_load_kml_without_polygon() {
        let mut file = tempfile::Builder::new().suffix(".kml").tempfile().unwrap();
        write!(file, r#"<kml xmlns="http://www.opengis.net/kml/2.2"><Document>
            <Placemark><Point><coordinates>-10,-10,0</coordinates></Point></Placemark>
        </Document></kml>"#).unwrap();
        assert!(matches!(
            Boundary::load(file.path()),
            Err(FieldLinesError::NoBoundaryPolygonError(_))
        ));
    }

    #[test]
    fn test_start_point_is_never_a_candidate() {
        let start = Cartographic::from_degrees(0.0, 0.0);
        let points = vec![start, Cartographic::from_degrees(0.0, 1.0), Cartographic::from_degrees(0.0, -1.0)];
        let line = shortest_rhumb(start, 0.0, &points).unwrap();
        assert!((line.start.latitude_degrees() + 1.0).abs() < 1e-9);
        assert!((line.end.latitude_degrees() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_field_on_the_ring_does_not_stop_itself() {
        // the west edge crossing is the field itself, so there is nothing left behind it
        assert!(matches!(
            square().limit(Cartographic::from_degrees(-10.0, 0.0), FRAC_PI_2),
            Err(FieldLinesError::BoundaryLimitError { direction: "backward", .. })
        ));
    }
}
