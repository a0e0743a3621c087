pub mod errors;
pub mod constants;
pub mod utils;
pub mod cartographic;
pub mod mercator;
pub mod rhumb;
pub mod kml_utils;
pub mod boundary;
pub mod team;
pub mod survey;
pub mod output;
pub mod pipeline;

#[cfg(test)]
mod tests {
    use crate::boundary::Boundary;
    use crate::cartographic::Cartographic;
    use crate::rhumb::RhumbLine;

    /// a field in Indiana pointed north-east must reach both the Ohio and Illinois sides of a
    /// rough box around the lower 48
    #[test]
    fn test_line_across_a_country() {
        let boundary = Boundary::new(vec![
            Cartographic::from_degrees(-124.7, 48.4),
            Cartographic::from_degrees(-124.7, 32.5),
            Cartographic::from_degrees(-97.1, 25.8),
            Cartographic::from_degrees(-80.0, 25.1),
            Cartographic::from_degrees(-67.0, 44.8),
            Cartographic::from_degrees(-95.2, 49.0),
        ]).unwrap();
        let field = Cartographic::from_degrees(-86.9137, 40.4352);
        let heading = 0.9;

        let line = boundary.limit(field, heading).unwrap();
        assert!((line.heading() - heading).abs() < 1e-6);
        assert!(RhumbLine::new(line.start, field).surface_distance() > 100_000.0);
        assert!(RhumbLine::new(field, line.end).surface_distance() > 100_000.0);
        assert!(line.start.longitude_degrees() < -86.9137);
        assert!(line.end.longitude_degrees() > -86.9137);
    }
}
