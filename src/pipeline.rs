use std::collections::HashSet;
use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use crate::boundary::Boundary;
use crate::errors::FieldLinesError;
use crate::output::{TeamField, save_json, save_kml};
use crate::survey::{Survey, SurveyMethod};
use crate::team::Team;
use crate::utils::get_paths;

/// Where the build reads from and writes to
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// CSV of `longitude,latitude` rows, or a KML file with a polygon
    pub boundary: PathBuf,
    pub teams: PathBuf,
    /// holds one `<team>.kml` per surveyed team
    pub survey_dir: PathBuf,
    pub output: PathBuf,
    /// also write lines and field ribbons as KML here
    pub kml_output: Option<PathBuf>,
    /// used for teams that do not name a method in the teams CSV
    pub method: SurveyMethod,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig::in_dirs("data", "survey")
    }
}

impl BuildConfig {
    /// the usual layout: `boundary.csv`, `teams.csv` and the output `teams.json` all in `data_dir`
    pub fn in_dirs<P: AsRef<Path>, Q: AsRef<Path>>(data_dir: P, survey_dir: Q) -> Self{
        let data_dir = data_dir.as_ref();
        BuildConfig {
            boundary: data_dir.join("boundary.csv"),
            teams: data_dir.join("teams.csv"),
            survey_dir: survey_dir.as_ref().to_path_buf(),
            output: data_dir.join("teams.json"),
            kml_output: None,
            method: SurveyMethod::Auto,
        }
    }
}

/// Surveys every team, limits each field's line to the boundary and returns them in the order of
/// the teams CSV. Teams without a survey file are left out.
pub fn derive_fields(config: &BuildConfig) -> Result<Vec<TeamField>, FieldLinesError> {
    let boundary = Boundary::load(&config.boundary)?;
    info!("loaded boundary with {} segments", boundary.lines.len());

    let teams = Team::load_all(&config.teams)?;
    info!("loaded {} teams", teams.len());

    let mut fields: Vec<TeamField> = Vec::with_capacity(teams.len());
    for team in teams {
        let method = team.method.unwrap_or(config.method);
        let survey = match Survey::load_for_team(&config.survey_dir, &team.team, method)? {
            Some(survey) => survey,
            None => {
                info!("no survey for {}, skipping", team.team);
                continue;
            }
        };
        debug!("{}: field at {:?}, heading {}", team.team, survey.field, survey.heading);

        let line = boundary.limit(survey.field, survey.heading)?;
        info!("{}: line is {:.0} km long", team.team, line.surface_distance() / 1000.0);
        fields.push(TeamField::new(team, survey, line));
    }
    Ok(fields)
}

/// derives every field and writes the artifact(s)
pub fn run_build(config: &BuildConfig) -> Result<Vec<TeamField>, FieldLinesError> {
    let fields = derive_fields(config)?;

    save_json(&config.output, &fields)?;
    if let Some(kml_output) = &config.kml_output {
        save_kml(kml_output, &fields)?;
    }
    Ok(fields)
}

/// Surveys every file matching `glob_pattern` on its own, named after the file. Files that fail
/// are logged and skipped.
pub fn inspect_surveys(glob_pattern: &str, method: SurveyMethod) -> Result<Vec<Survey>, FieldLinesError> {
    let mut surveys: Vec<Survey> = Vec::new();
    for path in get_paths(glob_pattern)? {
        let name = path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        match Survey::load(&path, &name, method) {
            Ok(survey) => surveys.push(survey),
            Err(e) => warn!("could not survey {:?}:\n\t{e}\nskipping file.", path),
        }
    }
    Ok(surveys)
}

/// Survey files in the survey directory that no team row points at. These are never read by a
/// build, usually because of a typo in either the file name or the teams CSV.
pub fn orphaned_surveys(config: &BuildConfig) -> Result<Vec<PathBuf>, FieldLinesError> {
    let teams: HashSet<String> = Team::load_all(&config.teams)?
        .into_iter()
        .map(|team| team.team)
        .collect();

    let pattern = config.survey_dir.join("*.kml");
    let paths = match get_paths(&pattern.to_string_lossy()) {
        Ok(paths) => paths,
        Err(FieldLinesError::NoValidGlobReturnsError(_)) => Vec::new(),
        Err(e) => return Err(e),
    };

    let orphans: Vec<PathBuf> = paths.into_iter()
        .filter(|path| {
            path.file_stem()
                .map(|stem| !teams.contains(stem.to_string_lossy().as_ref()))
                .unwrap_or(true)
        })
        .collect();
    for orphan in &orphans {
        warn!("{:?} has no row in {:?}", orphan, config.teams);
    }
    Ok(orphans)
}
