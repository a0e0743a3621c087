use std::collections::HashMap;
use std::fmt::Debug;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use geo::{Geometry, GeometryCollection, LineString, Point, Polygon};
use kml::types::{Geometry as KmlGeometry, LineStyle, Placemark, PolyStyle, Style};
use kml::{Kml, KmlDocument, KmlReader, KmlWriter, quick_collection};
use log::info;
use crate::errors::FieldLinesError;

/// basically a wrapper for some functions from the kml library
/// given a path to a kml file, it returns a collection of geometry stuff
pub fn load_kml_file<P: AsRef<Path>>(path: P) -> Result<GeometryCollection<f64>, FieldLinesError>{
    let mut kml_reader = KmlReader::<_, f64>::from_path(path)?;

    let kml_data: Kml<f64> = kml_reader.read()?;

    Ok(quick_collection(kml_data)?)
}

/// same as `load_kml_file` for KML that is already in memory
pub fn load_kml_str(kml_text: &str) -> Result<GeometryCollection<f64>, FieldLinesError>{
    let kml_data: Kml<f64> = kml_text.parse()?;

    Ok(quick_collection(kml_data)?)
}

/// recursively gets all polygons in the collection. Vec may be empty
pub fn get_regions(geometry_collection: GeometryCollection<f64>) -> Vec<Polygon>{

    let mut out_vec: Vec<Polygon> = Vec::new();

    for geometry in geometry_collection{
        match geometry{
            Geometry::Polygon(poly) => {
                out_vec.push(poly);
            }
            Geometry::MultiPolygon(multi) => {
                out_vec.extend(multi.0);
            }
            Geometry::GeometryCollection(gc) => {
                out_vec.extend(get_regions(gc));
            }
            _ => {}
        }
    }

    out_vec
}

/// recursively gets all line strings in the collection. Vec may be empty
pub fn get_trails(geometry_collection: GeometryCollection<f64>) -> Vec<LineString>{

    let mut out_vec: Vec<LineString> = Vec::new();

    for geometry in geometry_collection{
        match geometry{
            Geometry::LineString(ls) => {
                out_vec.push(ls);
            }
            Geometry::MultiLineString(multi) => {
                out_vec.extend(multi.0);
            }
            Geometry::GeometryCollection(gc) => {
                out_vec.extend(get_trails(gc));
            }
            _ => {}
        }
    }

    out_vec
}

/// recursively gets all points in the collection. Vec may be empty
pub fn get_waypoints(geometry_collection: GeometryCollection<f64>) -> Vec<Point>{

    let mut out_vec: Vec<Point> = Vec::new();

    for geometry in geometry_collection{
        match geometry{
            Geometry::Point(pt) => {
                out_vec.push(pt);
            }
            Geometry::MultiPoint(multi) => {
                out_vec.extend(multi.0);
            }
            Geometry::GeometryCollection(gc) => {
                out_vec.extend(get_waypoints(gc));
            }
            _ => {}
        }
    }

    out_vec
}

/// A named line or polygon headed for a KML document. `style` is the id of a [`Style`] written
/// to the same document.
pub enum KmlFeature {
    Line { name: String, line: LineString, style: Option<String> },
    Region { name: String, region: Polygon, style: Option<String> },
}

impl KmlFeature {
    fn into_placemark(self) -> Placemark<f64> {
        let (name, geometry, style) = match self {
            KmlFeature::Line { name, line, style } => {
                (name, KmlGeometry::LineString(kml::types::LineString::from(line)), style)
            }
            KmlFeature::Region { name, region, style } => {
                (name, KmlGeometry::Polygon(kml::types::Polygon::from(region)), style)
            }
        };
        Placemark {
            name: Some(name),
            geometry: Some(geometry),
            style_url: style.map(|id| format!("#{id}")),
            ..Default::default()
        }
    }
}

/// One colour for lines and polygon fills. `color` is KML's `aabbggrr` hex.
pub fn solid_style(id: &str, color: &str, line_width: f64) -> Style {
    Style {
        id: Some(id.to_string()),
        line: Some(LineStyle {
            color: color.to_string(),
            width: line_width,
            ..Default::default()
        }),
        poly: Some(PolyStyle {
            color: color.to_string(),
            outline: false,
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// builds a KML 2.2 document holding the styles, then one placemark per feature
pub fn features_to_kml(styles: Vec<Style>, features: Vec<KmlFeature>) -> Kml<f64> {
    let elements: Vec<Kml<f64>> = styles.into_iter()
        .map(Kml::Style)
        .chain(features.into_iter().map(|feature| Kml::Placemark(feature.into_placemark())))
        .collect();

    Kml::KmlDocument(KmlDocument {
        attrs: HashMap::from([
            ("xmlns".to_string(), "http://www.opengis.net/kml/2.2".to_string())
        ]),
        elements: vec![Kml::Document {
            attrs: HashMap::new(),
            elements,
        }],
        ..Default::default()
    })
}

/// writes `features` to a KML file at `path`, replacing whatever was there
pub fn save_kml_file<P: AsRef<Path> + Debug>(path: P, styles: Vec<Style>, features: Vec<KmlFeature>)
    -> Result<(), FieldLinesError>
{
    let count = features.len();
    let kml_data = features_to_kml(styles, features);

    let mut writer = KmlWriter::from_writer(BufWriter::new(File::create(&path)?));
    writer.write(&kml_data)?;

    info!("wrote {count} features to {:?}", path);
    Ok(())
}
