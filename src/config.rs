use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use tracing::debug;
use url::Url;

pub const DEFAULT_AUDITOR_PORT: u16 = 8080;

/// Run Tanaguru/Asqatasun accessibility audits and check their marks.
#[derive(Parser, Debug)]
#[command(name = "uat", version, about, long_about = None)]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a scenario to the audit server, save the transcript and check it
    Run(RunArgs),
    /// Parse a transcript already on disk and print it as JSON
    Parse(ParseArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Scenario file to upload
    #[arg(long)]
    pub scenario: Option<PathBuf>,

    /// Audit server flavour
    #[arg(long, value_enum)]
    pub auditor: Option<Auditor>,

    /// Audit server host
    #[arg(long, env = "AUDITOR_HOST")]
    pub auditor_host: Option<String>,

    /// Audit server port
    #[arg(long, env = "AUDITOR_PORT")]
    pub auditor_port: Option<u16>,

    /// Talk https to the audit server
    #[arg(long)]
    pub secure: bool,

    /// Folder the reports are written to
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Minimum RawMark (in percent) accepted as success
    #[arg(long)]
    pub check_min_mark: Option<f64>,

    /// JSON config file; command line flags and environment win over it
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Transcript file to parse
    pub transcript: PathBuf,

    /// Write the JSON result to this file instead of stdout
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Minimum RawMark (in percent) accepted as success
    #[arg(long)]
    pub check_min_mark: Option<f64>,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Auditor {
    #[default]
    #[value(name = "tanaguru")]
    Tanaguru,
    #[value(name = "asqatasun")]
    Asqatasun,
}

impl fmt::Display for Auditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auditor::Tanaguru => f.write_str("tanaguru"),
            Auditor::Asqatasun => f.write_str("asqatasun"),
        }
    }
}

/// Settings read from the `--config` file.
#[derive(Default, Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    #[serde(default)]
    pub scenario: Option<PathBuf>,
    #[serde(default)]
    pub auditor: Option<Auditor>,
    #[serde(default)]
    pub auditor_host: Option<String>,
    #[serde(default)]
    pub auditor_port: Option<u16>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub out: Option<PathBuf>,
    #[serde(default)]
    pub check_min_mark: Option<f64>,
}

impl UserConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        debug!("config {:?}", config);
        Ok(config)
    }
}

/// Everything `uat run` needs, after merging flags, environment and config file.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub auditor: Auditor,
    pub auditor_url: Url,
    pub scenario: PathBuf,
    pub out: PathBuf,
    pub check_min_mark: Option<f64>,
}

impl RunConfig {
    pub fn resolve(args: RunArgs, file: UserConfig) -> anyhow::Result<Self> {
        let scenario = args
            .scenario
            .or(file.scenario)
            .ok_or_else(|| anyhow!("no scenario given (use --scenario or `scenario` in the config file)"))?;
        let host = args.auditor_host.or(file.auditor_host).ok_or_else(|| {
            anyhow!("no auditor host given (use --auditor-host, AUDITOR_HOST or `auditorHost` in the config file)")
        })?;
        let port = args
            .auditor_port
            .or(file.auditor_port)
            .unwrap_or(DEFAULT_AUDITOR_PORT);
        let scheme = if args.secure || file.secure { "https" } else { "http" };
        let auditor_url = Url::parse(&format!("{scheme}://{host}:{port}/audit"))
            .with_context(|| format!("invalid auditor host {host:?}"))?;

        Ok(Self {
            auditor: args.auditor.or(file.auditor).unwrap_or_default(),
            auditor_url,
            scenario,
            out: args.out.or(file.out).unwrap_or_else(|| PathBuf::from(".")),
            check_min_mark: args.check_min_mark.or(file.check_min_mark),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args() -> RunArgs {
        RunArgs {
            scenario: Some(PathBuf::from("scenario.txt")),
            auditor_host: Some("audit.local".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::resolve(args(), UserConfig::default()).unwrap();
        assert_eq!(config.auditor, Auditor::Tanaguru);
        assert_eq!(config.auditor_url.as_str(), "http://audit.local:8080/audit");
        assert_eq!(config.out, PathBuf::from("."));
        assert_eq!(config.check_min_mark, None);
    }

    #[test]
    fn test_flags_win_over_config_file() {
        let args = RunArgs {
            auditor_port: Some(9000),
            check_min_mark: Some(80.0),
            ..args()
        };
        let file = UserConfig {
            auditor: Some(Auditor::Asqatasun),
            auditor_host: Some("ignored.local".to_string()),
            auditor_port: Some(1234),
            secure: true,
            out: Some(PathBuf::from("report")),
            check_min_mark: Some(50.0),
            ..Default::default()
        };
        let config = RunConfig::resolve(args, file).unwrap();
        assert_eq!(config.auditor, Auditor::Asqatasun);
        assert_eq!(config.auditor_url.as_str(), "https://audit.local:9000/audit");
        assert_eq!(config.out, PathBuf::from("report"));
        assert_eq!(config.check_min_mark, Some(80.0));
    }

    #[test]
    fn test_missing_host_or_scenario() {
        let err = RunConfig::resolve(
            RunArgs {
                auditor_host: None,
                ..args()
            },
            UserConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("auditor host"));

        let err = RunConfig::resolve(
            RunArgs {
                scenario: None,
                ..args()
            },
            UserConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("scenario"));
    }

    #[test]
    fn test_invalid_host() {
        let args = RunArgs {
            auditor_host: Some("bad host".to_string()),
            ..args()
        };
        assert!(RunConfig::resolve(args, UserConfig::default()).is_err());
    }

    #[test]
    fn test_load_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("uat.json");
        std::fs::write(
            &path,
            r#"{ "auditorHost": "audit.local", "auditorPort": 8443, "auditor": "asqatasun", "checkMinMark": 75.5 }"#,
        )
        .unwrap();

        let config = UserConfig::load(&path).unwrap();
        assert_eq!(config.auditor_host.as_deref(), Some("audit.local"));
        assert_eq!(config.auditor_port, Some(8443));
        assert_eq!(config.auditor, Some(Auditor::Asqatasun));
        assert_eq!(config.check_min_mark, Some(75.5));
        assert!(!config.secure);
    }

    #[test]
    fn test_load_invalid_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json at all {{{").unwrap();
        assert!(UserConfig::load(&path).is_err());
        assert!(UserConfig::load(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_parse_command_line() {
        let cli = Cli::try_parse_from([
            "uat",
            "run",
            "--scenario",
            "scenario.txt",
            "--auditor",
            "asqatasun",
            "--check-min-mark",
            "80",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.scenario, Some(PathBuf::from("scenario.txt")));
        assert_eq!(args.auditor, Some(Auditor::Asqatasun));
        assert_eq!(args.check_min_mark, Some(80.0));

        let cli = Cli::try_parse_from(["uat", "-v", "parse", "audit.txt"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Parse(ParseArgs { json: None, .. })));
    }
}
