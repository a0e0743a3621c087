use std::f64::consts::{FRAC_PI_2, PI};
use std::fs;
use std::path::Path;
use field_lines::cartographic::Cartographic;
use field_lines::errors::FieldLinesError;
use field_lines::kml_utils::{get_regions, get_trails, load_kml_file};
use field_lines::pipeline::{BuildConfig, derive_fields, inspect_surveys, orphaned_surveys, run_build};
use field_lines::rhumb::RhumbLine;
use field_lines::survey::SurveyMethod;

const YARD: f64 = 0.9144;
const FOOT: f64 = 0.3048;

fn offset(center: Cartographic, heading: f64, along: f64, across: f64) -> Cartographic {
    let along_point = RhumbLine::from_start_heading_distance(center, heading, along).end;
    RhumbLine::from_start_heading_distance(along_point, heading + FRAC_PI_2, across).end
}

/// hash marks at five yard lines, written as a KML survey
fn write_survey(dir: &Path, team: &str, center: Cartographic, heading: f64) {
    let mut placemarks = String::new();
    for yard_line in [-40.0, -20.0, 0.0, 20.0, 40.0] {
        for side in [-20.0, 20.0] {
            let point = offset(center, heading, yard_line * YARD, side * FOOT);
            placemarks.push_str(&format!(
                "<Placemark><name>{yard_line}</name><Point><coordinates>{},{},0</coordinates></Point></Placemark>\n",
                point.longitude_degrees(), point.latitude_degrees()
            ));
        }
    }
    fs::write(
        dir.join(format!("{team}.kml")),
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<kml xmlns=\"http://www.opengis.net/kml/2.2\"><Document>\n{placemarks}</Document></kml>\n"),
    ).unwrap();
}

/// a square from 10°W to 10°E and 10°S to 10°N with three teams, two of them surveyed
fn fixture(root: &Path) -> BuildConfig {
    let data = root.join("data");
    let survey = root.join("survey");
    fs::create_dir_all(&data).unwrap();
    fs::create_dir_all(&survey).unwrap();

    fs::write(data.join("boundary.csv"), "# lon,lat\n-10,-10\n10,-10\n10,10\n-10,10\n").unwrap();
    fs::write(
        data.join("teams.csv"),
        "team,abbr,color\nNorth,N,#ff0000\nUnsurveyed,U,#00ff00\nEast,,#0000ff\n",
    ).unwrap();
    write_survey(&survey, "North", Cartographic::from_degrees(2.0, 3.0), 0.0004);
    write_survey(&survey, "East", Cartographic::from_degrees(-1.0, 1.0), FRAC_PI_2);

    BuildConfig::in_dirs(&data, &survey)
}

#[test]
fn test_build_writes_teams_in_csv_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(dir.path());
    config.kml_output = Some(dir.path().join("site").join("fields.kml"));

    let fields = run_build(&config).unwrap();
    assert_eq!(fields.len(), 2);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&config.output).unwrap()).unwrap();
    let teams = json.as_array().unwrap();
    assert_eq!(teams.len(), 2);
    assert_eq!(teams[0]["team"], "North");
    assert_eq!(teams[0]["abbr"], "N");
    assert_eq!(teams[1]["team"], "East");
    assert!(teams[1].get("abbr").is_none());
    assert_eq!(teams[1]["color"], serde_json::json!([0.0, 0.0, 1.0, 1.0]));

    for team in teams {
        let heading = team["heading"].as_f64().unwrap();
        assert!((0.0..PI).contains(&heading));
        assert_eq!(team["line"].as_array().unwrap().len(), 4);
    }

    let trails = get_trails(load_kml_file(config.kml_output.as_ref().unwrap()).unwrap());
    assert_eq!(trails.len(), 2);
    let regions = get_regions(load_kml_file(config.kml_output.as_ref().unwrap()).unwrap());
    assert_eq!(regions.len(), 2);
}

#[test]
fn test_lines_run_edge_to_edge_through_the_field() {
    let dir = tempfile::tempdir().unwrap();
    let fields = derive_fields(&fixture(dir.path())).unwrap();

    // North runs (almost) due north from the southern edge to the northern one
    let north = &fields[0];
    assert!((north.line.start.latitude_degrees() + 10.0).abs() < 1e-3);
    assert!((north.line.end.latitude_degrees() - 10.0).abs() < 1e-3);
    assert!((north.line.start.longitude_degrees() - 2.0).abs() < 0.05);

    // East runs east-west between the side edges, through its field
    let east = &fields[1];
    assert!((east.heading - FRAC_PI_2).abs() < 1e-4);
    let west_end = east.line.start.longitude_degrees().min(east.line.end.longitude_degrees());
    let east_end = east.line.start.longitude_degrees().max(east.line.end.longitude_degrees());
    assert!((west_end + 10.0).abs() < 1e-3);
    assert!((east_end - 10.0).abs() < 1e-3);
    assert!((east.line.start.latitude_degrees() - 1.0).abs() < 1e-3);

    for field in &fields {
        let to_field = RhumbLine::new(field.line.start, field.field);
        assert!((to_field.heading() - field.line.heading()).abs() < 1e-4);
    }
}

#[test]
fn test_team_method_overrides_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(dir.path());
    fs::write(&config.teams, "team,color,method\nNorth,#ff0000,regression\n").unwrap();

    let fields = derive_fields(&config).unwrap();
    assert_eq!(fields.len(), 1);
    // the hash marks sit on two parallel rows, a fit through them still points north
    let heading = fields[0].heading;
    assert!(heading.min(PI - heading) < 1e-3);
}

#[test]
fn test_field_outside_the_boundary_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(dir.path());
    write_survey(&config.survey_dir, "East", Cartographic::from_degrees(20.0, 1.0), FRAC_PI_2);

    assert!(matches!(
        derive_fields(&config),
        Err(FieldLinesError::BoundaryLimitError { .. })
    ));
}

#[test]
fn test_inspect_and_orphans() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(dir.path());
    write_survey(&config.survey_dir, "Typo", Cartographic::from_degrees(0.0, 0.0), 1.0);

    let pattern = config.survey_dir.join("*.kml");
    let surveys = inspect_surveys(&pattern.to_string_lossy(), SurveyMethod::Auto).unwrap();
    assert_eq!(surveys.len(), 3);
    let typo = surveys.iter().find(|survey| survey.team == "Typo").unwrap();
    assert!((typo.heading - 1.0).abs() < 1e-4);

    let orphans = orphaned_surveys(&config).unwrap();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].file_stem().unwrap(), "Typo");
}
