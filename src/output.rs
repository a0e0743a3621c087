use std::fmt::Debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use geo::{HaversineDestination, LineString, Point, Polygon};
use log::info;
use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use crate::cartographic::Cartographic;
use crate::constants::{FIELD_WIDTH_HALF, PLOT_STEP};
use crate::errors::FieldLinesError;
use crate::kml_utils::{KmlFeature, save_kml_file, solid_style};
use crate::rhumb::RhumbLine;
use crate::survey::Survey;
use crate::team::{Color, Team};

/// One entry of the artifact the globe viewer loads
#[derive(Clone, Debug, Serialize)]
pub struct TeamField {
    pub team: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbr: Option<String>,
    pub color: Color,
    pub field: Cartographic,
    /// radians clockwise from north, in `[0, π)`
    pub heading: f64,
    #[serde(serialize_with = "serialize_line")]
    pub line: RhumbLine,
}

/// `[start longitude, start latitude, end longitude, end latitude]` in radians
fn serialize_line<S: Serializer>(line: &RhumbLine, serializer: S) -> Result<S::Ok, S::Error> {
    let mut tuple = serializer.serialize_tuple(4)?;
    tuple.serialize_element(&line.start.longitude)?;
    tuple.serialize_element(&line.start.latitude)?;
    tuple.serialize_element(&line.end.longitude)?;
    tuple.serialize_element(&line.end.latitude)?;
    tuple.end()
}

impl TeamField {
    pub fn new(team: Team, survey: Survey, line: RhumbLine) -> Self{
        TeamField {
            team: team.team,
            abbr: team.abbr,
            color: team.color,
            field: survey.field,
            heading: survey.heading,
            line,
        }
    }

    /// the team line as closely spaced points, for formats that draw straight segments
    pub fn plotted_line(&self) -> LineString {
        self.line.plot(PLOT_STEP).into_iter().map(geo::Coord::from).collect()
    }

    /// The team line widened by half a field's width to each side: one side out, the other
    /// back, so the ring goes around the ribbon.
    pub fn field_ribbon(&self) -> Polygon {
        let cross_bearing = (self.heading - std::f64::consts::FRAC_PI_2).to_degrees();
        let plotted: Vec<Point> = self.line.plot(PLOT_STEP).into_iter().map(Point::from).collect();

        let mut ring: Vec<Point> = Vec::with_capacity(plotted.len() * 2);
        ring.extend(plotted.iter().map(|point| point.haversine_destination(cross_bearing, FIELD_WIDTH_HALF)));
        ring.extend(plotted.iter().rev().map(|point| point.haversine_destination(cross_bearing, -FIELD_WIDTH_HALF)));

        Polygon::new(LineString::from(ring), Vec::new())
    }
}

/// Writes the artifact as a compact JSON array
pub fn save_json<P: AsRef<Path> + Debug>(path: P, fields: &[TeamField]) -> Result<(), FieldLinesError>{
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer(&mut writer, fields)?;
    writer.flush()?;

    info!("wrote {} teams to {:?}", fields.len(), path);
    Ok(())
}

/// width of the team lines in the KML export, in pixels
const KML_LINE_WIDTH: f64 = 2.0;

/// Writes every team's line and field ribbon as KML placemarks, both in the team colour
pub fn save_kml<P: AsRef<Path> + Debug>(path: P, fields: &[TeamField]) -> Result<(), FieldLinesError>{
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    // team names can hold anything, ids are positional
    let style_id = |index: usize| format!("team-{index}");

    let styles = fields.iter().enumerate()
        .map(|(index, field)| solid_style(&style_id(index), &field.color.kml_color(), KML_LINE_WIDTH))
        .collect();
    let features: Vec<KmlFeature> = fields.iter().enumerate().flat_map(|(index, field)| [
        KmlFeature::Line {
            name: field.team.clone(),
            line: field.plotted_line(),
            style: Some(style_id(index)),
        },
        KmlFeature::Region {
            name: format!("{} field", field.team),
            region: field.field_ribbon(),
            style: Some(style_id(index)),
        },
    ]).collect();

    save_kml_file(path, styles, features)
}
