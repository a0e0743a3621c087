use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldLinesError {
    #[error("IO error:\n\t{0}")]
    IoError(#[from] std::io::Error),
    #[error("No files matching pattern {0} could be found or none of the found files could be read.\
        Files that could not be read are logged as warnings.")]
    NoValidGlobReturnsError(String),
    #[error("Error deciphering glob pattern:\n\t{0}")]
    PatternError(#[from] glob::PatternError),
    #[error("Error in serde-json:\n\t{0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("Error reading csv data:\n\t{0}")]
    CsvError(#[from] csv::Error),
    #[error("Error in KML parsing library:\n\t{0}")]
    KmlError(#[from] kml::Error),
    #[error("Could not read a number:\n\t{0}")]
    ParseFloatError(#[from] std::num::ParseFloatError),

    #[error("A boundary needs at least 3 points to enclose anything, {points} were found in {path:?}")]
    BoundaryTooSmallError { path: PathBuf, points: usize },

    #[error("Line {line} of boundary file {path:?} needs a longitude and a latitude")]
    BoundaryRowError { path: PathBuf, line: u64 },

    #[error("The boundary file {0:?} holds no polygon")]
    NoBoundaryPolygonError(PathBuf),

    #[error("Survey for {team} holds no points")]
    EmptySurveyError { team: String },

    #[error("Survey for {team} has no pair of points forty feet or twenty yards apart, \
        so no heading could be found. {points} points were surveyed.")]
    NoHeadingError { team: String, points: usize },

    #[error("Survey for {team} needs the fifty yard line and both sidelines as line strings, \
        found {trails} line strings")]
    SidelinesError { team: String, trails: usize },

    #[error("Survey for {team} does not have enough distinct points to fit a line through")]
    RegressionError { team: String },

    #[error("A line through the field at heading {heading} rad has nothing to stop at \
        in the {direction} direction. Is the field inside the boundary?")]
    BoundaryLimitError { heading: f64, direction: &'static str },

    #[error("Could not understand color `{0}`. \
        Use #rgb, #rrggbb, rgb(r, g, b) or a css color name")]
    ColorParseError(String),
}
