use clap::Parser;
use hulud_scan::application::dto::OutputFormat;
use hulud_scan::application::factories::{CacheSettings, PresenterType};
use hulud_scan::adapters::outbound::filesystem::DEFAULT_CACHE_TTL;
use hulud_scan::config::ConfigFile;
use hulud_scan::scanning::domain::Severity;
use hulud_scan::shared::error::ScanError;
use hulud_scan::shared::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Wiz Research list of packages compromised by the Shai-Hulud 2 worm
pub const DEFAULT_BLOCKLIST: &str =
    "https://github.com/wiz-sec-public/wiz-research-iocs/blob/main/reports/shai-hulud-2-packages.csv";

/// Scan a JavaScript/TypeScript project's lockfile for known-compromised npm packages
#[derive(Parser, Debug)]
#[command(name = "hulud-scan")]
#[command(version)]
#[command(
    about = "Scan npm, Yarn, pnpm and Bun lockfiles for known-compromised package versions",
    long_about = None
)]
pub struct Args {
    /// Project directory containing the lockfile (defaults to current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Output format: table or json
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Blocklist URL or local CSV path
    #[arg(long, value_name = "URL|PATH")]
    pub blocklist: Option<String>,

    /// Cache directory for downloaded blocklists
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Disable the blocklist cache (always download fresh)
    #[arg(long)]
    pub no_cache: bool,

    /// Lowest severity that makes the scan exit with code 1
    #[arg(long, value_name = "SEVERITY")]
    pub fail_on: Option<Severity>,

    /// Config file path (defaults to hulud-scan.config.yml in the project directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Effective settings after merging CLI flags over the config file
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub project_path: PathBuf,
    pub format: OutputFormat,
    pub presenter: PresenterType,
    pub blocklist: String,
    pub cache: Option<CacheSettings>,
    pub fail_on: Severity,
    pub ignore_packages: Vec<String>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn project_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Merges these flags over `config`; a flag always wins over the file.
    ///
    /// # Errors
    /// Returns [`ScanError::Validation`] when the config file holds a value
    /// that does not parse (format or severity).
    pub fn resolve(self, config: Option<ConfigFile>) -> Result<Settings> {
        let config = config.unwrap_or_default();
        let project_path = self.project_path();

        let format = match (self.format, config.format.as_deref()) {
            (Some(format), _) => format,
            (None, Some(raw)) => raw
                .parse::<OutputFormat>()
                .map_err(|message| ScanError::Validation { message })?,
            (None, None) => OutputFormat::default(),
        };

        let fail_on = match (self.fail_on, config.fail_on.as_deref()) {
            (Some(severity), _) => severity,
            (None, Some(raw)) => raw
                .parse::<Severity>()
                .map_err(|message| ScanError::Validation { message })?,
            (None, None) => Severity::Critical,
        };

        let no_cache = self.no_cache || config.no_cache.unwrap_or(false);
        let cache = (!no_cache).then(|| CacheSettings {
            dir: self
                .cache_dir
                .or_else(|| config.cache_dir.map(PathBuf::from))
                .unwrap_or_else(default_cache_dir),
            ttl: config
                .cache_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CACHE_TTL),
        });

        Ok(Settings {
            project_path,
            format,
            presenter: PresenterType::from_output(self.output),
            blocklist: self
                .blocklist
                .or(config.blocklist)
                .unwrap_or_else(|| DEFAULT_BLOCKLIST.to_string()),
            cache,
            fail_on,
            ignore_packages: config.ignore_packages.unwrap_or_default(),
        })
    }
}

/// `$HOME/.hulud-scan/cache`, or `.hulud-scan/cache` when no home directory is set
pub fn default_cache_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".hulud-scan")
        .join("cache")
}
