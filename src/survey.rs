use std::f64::consts::FRAC_PI_2;
use std::fmt::Debug;
use std::path::Path;
use clap::ValueEnum;
use geo::{GeometryCollection, LineString};
use log::debug;
use serde::{Deserialize, Serialize};
use crate::cartographic::Cartographic;
use crate::constants::{HASH_MARK_COUNT, HASH_MARK_DISTANCE, SURVEY_TOLERANCE, TWENTY_YARDS};
use crate::errors::FieldLinesError;
use crate::kml_utils::{get_trails, get_waypoints, load_kml_file, load_kml_str};
use crate::mercator::{MercatorCoord, MercatorSegment};
use crate::rhumb::RhumbLine;
use crate::utils::{axial_mean, mean, zero_to_pi};

/// How a survey's points are turned into a field center and heading
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SurveyMethod {
    /// `Sidelines` when the survey has at least three line strings, `Regression` for more points
    /// than a hash-mark survey has, `HashMarks` otherwise
    #[default]
    Auto,
    /// Points on the hash marks; pairs forty feet apart run across the field, pairs twenty yards
    /// apart run along it.
    HashMarks,
    /// The fifty yard line followed by both sidelines, as line strings. Extra points along the
    /// field refine the heading.
    Sidelines,
    /// Any number of points along the length of the field, fitted with an orthogonal regression
    Regression,
}

/// Where a field is and which way it points
#[derive(Clone, Debug, PartialEq)]
pub struct Survey {
    pub team: String,
    pub field: Cartographic,
    /// in `[0, π)`, a field has no front or back
    pub heading: f64,
    /// the method that was actually used (never `Auto`)
    pub method: SurveyMethod,
}

impl Survey {
    /// Reads `<survey_dir>/<team>.kml`. A team that was never surveyed has no file and gets
    /// `Ok(None)`.
    pub fn load_for_team<P: AsRef<Path>>(survey_dir: P, team: &str, method: SurveyMethod)
        -> Result<Option<Survey>, FieldLinesError>
    {
        let path = survey_dir.as_ref().join(format!("{team}.kml"));
        if !path.exists() {
            return Ok(None);
        }
        Survey::load(path, team, method).map(Some)
    }

    pub fn load<P: AsRef<Path> + Debug>(path: P, team: &str, method: SurveyMethod) -> Result<Survey, FieldLinesError> {
        Survey::from_geometry(team, load_kml_file(path)?, method)
    }

    pub fn from_kml_str(team: &str, kml_text: &str, method: SurveyMethod) -> Result<Survey, FieldLinesError> {
        Survey::from_geometry(team, load_kml_str(kml_text)?, method)
    }

    pub fn from_geometry(team: &str, geometry: GeometryCollection<f64>, method: SurveyMethod)
        -> Result<Survey, FieldLinesError>
    {
        let points: Vec<Cartographic> = get_waypoints(geometry.clone()).iter().map(Cartographic::from).collect();
        let trails = get_trails(geometry);

        let method = match method {
            SurveyMethod::Auto if trails.len() >= 3 => SurveyMethod::Sidelines,
            SurveyMethod::Auto if points.len() > HASH_MARK_COUNT => SurveyMethod::Regression,
            SurveyMethod::Auto => SurveyMethod::HashMarks,
            other => other,
        };
        debug!("{team}: {} points, {} line strings, using {method:?}", points.len(), trails.len());

        let (field, heading) = match method {
            SurveyMethod::Sidelines => sidelines_and_fifty(team, &trails, &points)?,
            SurveyMethod::Regression => (centroid(team, &points)?, regression(team, &points)?),
            _ => (centroid(team, &points)?, hash_marks(team, &points)?),
        };

        Ok(Survey {
            team: team.to_string(),
            field,
            heading,
            method,
        })
    }

    /// The heading in degrees rounded to six places, in `[0, 180)`. A heading a hair under π
    /// reads as 0 rather than 180.
    pub fn bearing_degrees(&self) -> f64 {
        let degrees = (self.heading.to_degrees() * 1e6).round() / 1e6;
        if degrees >= 180.0 {
            0.0
        } else {
            degrees
        }
    }
}

/// mean longitude and mean latitude of the surveyed points
fn centroid(team: &str, points: &[Cartographic]) -> Result<Cartographic, FieldLinesError> {
    let empty = || FieldLinesError::EmptySurveyError { team: team.to_string() };
    Ok(Cartographic::new(
        mean(points.iter().map(|point| point.longitude)).ok_or_else(empty)?,
        mean(points.iter().map(|point| point.latitude)).ok_or_else(empty)?,
    ))
}

/// Every pair of points is a rhumb line. Pairs the width of the hash marks apart are across the
/// field, so they are turned a quarter; pairs twenty yards apart are along it. Everything else
/// (diagonals, far apart yard lines) is ignored.
fn hash_marks(team: &str, points: &[Cartographic]) -> Result<f64, FieldLinesError> {
    let mut headings: Vec<f64> = Vec::new();
    for (index, a) in points.iter().enumerate() {
        for b in &points[index + 1..] {
            let line = RhumbLine::new(*a, *b);
            let distance = line.surface_distance();
            if (distance - HASH_MARK_DISTANCE).abs() < SURVEY_TOLERANCE {
                headings.push(zero_to_pi(line.heading() + FRAC_PI_2));
            } else if (distance - TWENTY_YARDS).abs() < SURVEY_TOLERANCE {
                headings.push(zero_to_pi(line.heading()));
            }
        }
    }
    debug!("{team}: {} usable pairs", headings.len());

    axial_mean(headings).ok_or(FieldLinesError::NoHeadingError {
        team: team.to_string(),
        points: points.len(),
    })
}

fn trail_segment(trail: &LineString) -> Option<MercatorSegment> {
    let start = trail.0.first()?;
    let end = trail.0.last()?;
    Some(MercatorSegment::new(
        MercatorCoord::project(Cartographic::from(start)),
        MercatorCoord::project(Cartographic::from(end)),
    ))
}

/// The first line string is the fifty yard line, the next two are the sidelines. The field is
/// centered halfway between where the fifty crosses each sideline.
///
/// Without other points the heading is the mean of the sideline headings. Any points surveyed
/// along the field are fitted together with the sideline ends instead.
fn sidelines_and_fifty(team: &str, trails: &[LineString], points: &[Cartographic])
    -> Result<(Cartographic, f64), FieldLinesError>
{
    let error = || FieldLinesError::SidelinesError {
        team: team.to_string(),
        trails: trails.len(),
    };
    let segments: Vec<MercatorSegment> = trails.iter().take(3).filter_map(trail_segment).collect();
    let (fifty, left, right) = match segments.as_slice() {
        [fifty, left, right] => (fifty, left, right),
        _ => return Err(error()),
    };

    let a = fifty.line_intersection(left).ok_or_else(error)?;
    let b = fifty.line_intersection(right).ok_or_else(error)?;
    let field = ((a + b) * 0.5).unproject();

    let heading = if points.is_empty() {
        axial_mean([left, right].iter().map(|side| {
            RhumbLine::new(side.start.unproject(), side.end.unproject()).heading()
        })).ok_or_else(error)?
    } else {
        let fitted: Vec<Cartographic> = [left.start, left.end, right.start, right.end].iter()
            .map(MercatorCoord::unproject)
            .chain(points.iter().copied())
            .collect();
        regression(team, &fitted)?
    };

    Ok((field, heading))
}

/// Fits a line through the points in Mercator space by minimizing the perpendicular distances,
/// which works the same for fields running north-south as for ones running east-west.
fn regression(team: &str, points: &[Cartographic]) -> Result<f64, FieldLinesError> {
    let projected: Vec<MercatorCoord> = points.iter().map(|point| MercatorCoord::project(*point)).collect();
    let error = || FieldLinesError::RegressionError { team: team.to_string() };

    let mean_x = mean(projected.iter().map(|point| point.x)).ok_or_else(error)?;
    let mean_y = mean(projected.iter().map(|point| point.y)).ok_or_else(error)?;
    let (mut xx, mut yy, mut xy) = (0f64, 0f64, 0f64);
    for point in &projected {
        let (dx, dy) = (point.x - mean_x, point.y - mean_y);
        xx += dx * dx;
        yy += dy * dy;
        xy += dx * dy;
    }
    if xx + yy < f64::EPSILON.powi(2) {
        return Err(error());
    }

    // angle of the principal axis counterclockwise from east, headings go clockwise from north
    let axis = 0.5 * (2.0 * xy).atan2(xx - yy);
    Ok(zero_to_pi(FRAC_PI_2 - axis))
}
