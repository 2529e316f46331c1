use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use log::{error, info, warn, LevelFilter};
use postindex::build::{on_pre_build, on_serve, Report};
use postindex::config::Config;
use simple_logger::SimpleLogger;
use std::path::Path;
use std::process;

fn main() {
    let matches = App::new("postindex")
        .version(crate_version!())
        .about("Generates article, tag, and category indices for a markdown blog")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .global(true)
                .help("Logs debug output"),
        )
        .subcommand(
            SubCommand::with_name("build")
                .about("Regenerates the indices before a full site build")
                .args(&site_args()),
        )
        .subcommand(
            SubCommand::with_name("serve")
                .about("Regenerates the indices when the development server starts")
                .args(&site_args()),
        )
        .get_matches();

    // `-v` may be given before or after the subcommand.
    let verbosity = matches.occurrences_of("verbose").max(
        matches
            .subcommand()
            .1
            .map_or(0, |sub| sub.occurrences_of("verbose")),
    );
    if let Err(e) = SimpleLogger::new().with_level(log_level(verbosity)).init() {
        eprintln!("could not initialize logging: {}", e);
    }

    let result = match matches.subcommand() {
        ("build", Some(sub)) => load_config(sub).and_then(|config| {
            on_pre_build(&config).map_err(|e| e.to_string())
        }),
        ("serve", Some(sub)) => load_config(sub).and_then(|config| {
            on_serve(&config).map_err(|e| e.to_string())
        }),
        _ => unreachable!("a subcommand is required"),
    };

    match result {
        Ok(Some(report)) => report_done(&report),
        Ok(None) => info!("nothing to index"),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}

/// The run report is logged at `info`, so that is the quietest level.
fn log_level(verbosity: u64) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

fn site_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
    vec![
        Arg::with_name("project")
            .long("project")
            .value_name("DIR")
            .default_value(".")
            .help("Directory in which to start searching for mkdocs.yml"),
        Arg::with_name("docs-dir")
            .long("docs-dir")
            .value_name("DIR")
            .help("Content root to index; skips the project file lookup"),
    ]
}

fn load_config(matches: &ArgMatches) -> Result<Config, String> {
    if let Some(docs_dir) = matches.value_of("docs-dir") {
        return Ok(Config::new(docs_dir));
    }
    let project = matches.value_of("project").unwrap_or(".");
    Config::from_directory(Path::new(project)).map_err(|e| e.to_string())
}

fn report_done(report: &Report) {
    info!("indexed {}", report);
    if report.failures > 0 {
        warn!("{} documents were skipped; see the warnings above", report.failures);
    }
}
