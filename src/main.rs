mod cli;

use cli::{Args, Settings};
use hulud_scan::adapters::outbound::console::StderrProgressReporter;
use hulud_scan::adapters::outbound::filesystem::FileSystemReader;
use hulud_scan::application::dto::{OutputFormat, ScanRequest, ScanResponse};
use hulud_scan::application::factories::{BlocklistFactory, FormatterFactory, PresenterFactory};
use hulud_scan::application::use_cases::ScanProjectUseCase;
use hulud_scan::config::{discover_config, load_config_from_path};
use hulud_scan::ports::outbound::ProgressReporter;
use hulud_scan::shared::error::{ExitCode, ScanError};
use hulud_scan::shared::Result;
use std::io::IsTerminal;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // clap exits with code 2 on invalid arguments, 0 on --help/--version
    let args = Args::parse_args();
    init_tracing(args.verbose);

    match run(args) {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

/// Logs go to stderr. `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "hulud_scan=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    let project_path = args.project_path();
    validate_project_path(&project_path)?;

    let config = match args.config.as_deref() {
        Some(path) => Some(load_config_from_path(path)?),
        None => discover_config(&project_path)?,
    };
    let settings = args.resolve(config)?;

    let response = scan(&settings)?;

    StderrProgressReporter::new().report(FormatterFactory::progress_message(settings.format));

    let colored = use_colors(&settings);
    let formatter = FormatterFactory::create(settings.format, colored);
    let report = formatter.format(&response)?;

    let presenter = PresenterFactory::create(settings.presenter.clone());
    presenter.present(&report)?;

    Ok(if response.has_findings_at_or_above_threshold {
        ExitCode::CompromisedPackagesDetected
    } else {
        ExitCode::Success
    })
}

fn scan(settings: &Settings) -> Result<ScanResponse> {
    let blocklist_repository = BlocklistFactory::create(&settings.blocklist, settings.cache.clone())?;
    let use_case = ScanProjectUseCase::new(
        FileSystemReader::new(),
        blocklist_repository,
        StderrProgressReporter::new(),
    );

    let request = ScanRequest::new(
        settings.project_path.clone(),
        settings.blocklist.clone(),
        settings.ignore_packages.clone(),
        settings.fail_on,
    );
    use_case.execute(request)
}

/// Colours only for a table going straight to a terminal, and never with `NO_COLOR` set.
fn use_colors(settings: &Settings) -> bool {
    settings.format == OutputFormat::Table
        && settings.presenter.is_stdout()
        && std::env::var_os("NO_COLOR").is_none()
        && std::io::stdout().is_terminal()
}

fn validate_project_path(path: &Path) -> Result<()> {
    let invalid = |reason: String| -> anyhow::Error {
        ScanError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason,
        }
        .into()
    };

    if !path.exists() {
        return Err(invalid("Directory does not exist".to_string()));
    }

    let metadata = std::fs::symlink_metadata(path)
        .map_err(|e| invalid(format!("Failed to read path metadata: {}", e)))?;

    if metadata.is_symlink() {
        return Err(invalid(
            "Security: Project path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
        ));
    }

    if !metadata.is_dir() {
        return Err(invalid("Not a directory".to_string()));
    }

    Ok(())
}
