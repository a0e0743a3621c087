//! Distances are in meters and angles in radians unless the name says otherwise.

pub const METERS_PER_FOOT: f64 = 0.3048;

/// Mean earth radius, the same one `geo`'s haversine algorithms use.
pub const EARTH_RADIUS: f64 = 6_371_008.8;

/// Distance between the two rows of hash marks (40 ft, college spacing)
pub const HASH_MARK_DISTANCE: f64 = 40.0 * METERS_PER_FOOT;

/// Distance between two surveyed yard lines, twenty yards apart
pub const TWENTY_YARDS: f64 = 60.0 * METERS_PER_FOOT;

/// A hash-mark survey covers both hashes at five yard lines. Point surveys with more marks than
/// this are treated as points along the field and fitted instead.
pub const HASH_MARK_COUNT: usize = 10;

/// How far a surveyed pair may be off the expected spacing and still count
pub const SURVEY_TOLERANCE: f64 = 2.0 * METERS_PER_FOOT;

/// Half the width of a field, used to widen the team line into a ribbon
pub const FIELD_WIDTH_HALF: f64 = 80.0 * METERS_PER_FOOT;

/// Length of the probe line cast from the field center before it is extended
pub const PROBE_LINE_LENGTH: f64 = 100.0;

/// Padding added around the boundary's bounding box so box intersections land outside the ring
pub const BOUNDS_PADDING: f64 = 1e-6;

/// Two headings closer than this are the same direction
pub const DIRECTION_TOLERANCE: f64 = 1e-2;

/// Cross products below this mean the two segments are parallel
pub const PARALLEL_TOLERANCE: f64 = 1e-6;

/// Candidate points closer than this to the field center have no usable heading
pub const MIN_CANDIDATE_DISTANCE: f64 = 1e-3;

/// Spacing of plotted points along a line, in Mercator units
pub const PLOT_STEP: f64 = 0.0005;
