use std::path::PathBuf;
use std::process::ExitCode;
use clap::{Parser, Subcommand};
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;
use field_lines::errors::FieldLinesError;
use field_lines::pipeline::{BuildConfig, inspect_surveys, orphaned_surveys, run_build};
use field_lines::survey::SurveyMethod;

#[derive(Parser, Debug)]
#[command(about = "Derive each team's field line, bounded by the country, for the globe viewer")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read the boundary, teams and surveys and write the JSON artifact
    Build {
        /// holds boundary.csv and teams.csv, and receives teams.json
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        #[arg(long, default_value = "survey")]
        survey_dir: PathBuf,

        /// boundary file, overrides <DATA_DIR>/boundary.csv (CSV or KML)
        #[arg(long)]
        boundary: Option<PathBuf>,

        /// output path, overrides <DATA_DIR>/teams.json
        #[arg(long)]
        out: Option<PathBuf>,

        /// also write lines and fields as KML
        #[arg(long)]
        kml: Option<PathBuf>,

        /// survey method for teams that do not name one
        #[arg(long, value_enum, default_value_t = SurveyMethod::Auto)]
        method: SurveyMethod,
    },
    /// Print the center and bearing of each matching survey file
    Inspect {
        /// glob pattern, e.g. "survey/*.kml"
        pattern: String,

        #[arg(long, value_enum, default_value_t = SurveyMethod::Auto)]
        method: SurveyMethod,
    },
    /// List survey files that no team row refers to
    CheckSurveys {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        #[arg(long, default_value = "survey")]
        survey_dir: PathBuf,
    },
}

fn run(args: Args) -> Result<(), FieldLinesError> {
    match args.command {
        Command::Build { data_dir, survey_dir, boundary, out, kml, method } => {
            let mut config = BuildConfig::in_dirs(&data_dir, &survey_dir);
            if let Some(boundary) = boundary {
                config.boundary = boundary;
            }
            if let Some(out) = out {
                config.output = out;
            }
            config.kml_output = kml;
            config.method = method;

            let fields = run_build(&config)?;
            info!("done, {} fields", fields.len());
        }
        Command::Inspect { pattern, method } => {
            for survey in inspect_surveys(&pattern, method)? {
                println!("{}", survey.team);
                println!("lat = {:.6}", survey.field.latitude_degrees());
                println!("lon = {:.6}", survey.field.longitude_degrees());
                println!("bearing = {:.6}", survey.bearing_degrees());
            }
        }
        Command::CheckSurveys { data_dir, survey_dir } => {
            let orphans = orphaned_surveys(&BuildConfig::in_dirs(&data_dir, &survey_dir))?;
            for orphan in &orphans {
                println!("{}", orphan.display());
            }
            info!("{} survey files without a team", orphans.len());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    if let Err(e) = SimpleLogger::new().with_level(LevelFilter::Info).env().init() {
        eprintln!("could not start logger: {e}");
    }

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
