mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cloudnorm::{filter_list, range_filter, Filters, FloatingIpSource, Normalizer, ResourceKind};
use config::{Config, Overrides};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Normalize and filter cloud API resource records
#[derive(Parser, Debug)]
#[command(name = "cloudnorm", version, about, long_about = None)]
struct Args {
    /// Cloud name to stamp into record locations
    #[arg(long, global = true)]
    cloud: Option<String>,

    /// Region name
    #[arg(long, global = true)]
    region: Option<String>,

    /// Default availability zone
    #[arg(long, global = true)]
    zone: Option<String>,

    /// Current project ID
    #[arg(long, global = true)]
    project: Option<String>,

    /// Emit only canonical fields plus `properties`
    #[arg(long, global = true)]
    strict: bool,

    /// Service that owns floating IPs (network or compute)
    #[arg(long, global = true)]
    floating_ip_source: Option<FloatingIpSource>,

    /// Persist the effective cloud/region/zone/project as defaults
    #[arg(long, global = true)]
    save_defaults: bool,

    /// Log level for debugging
    #[arg(long, global = true, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize raw records of one resource kind
    Normalize {
        /// flavor, image, server, security-group, security-group-rule, floating-ip
        kind: ResourceKind,
        /// JSON or YAML file with one record or a list (stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Filter a list of records
    Filter {
        /// JSON or YAML file with a list of records (stdin when omitted)
        file: Option<PathBuf>,
        /// Normalize the records as this kind before filtering
        #[arg(long)]
        kind: Option<ResourceKind>,
        /// Exact id or case-insensitive name substring
        #[arg(long)]
        name_or_id: Option<String>,
        /// JSON object every record must match (nested equality)
        #[arg(long = "match")]
        match_json: Option<String>,
        /// JMESPath expression a record must satisfy
        #[arg(long, conflicts_with = "match_json")]
        query: Option<String>,
        /// KEY=EXPR range filter, e.g. ram=>=2048 or vcpus=min (repeatable)
        #[arg(long = "range", value_parser = parse_range_arg)]
        ranges: Vec<(String, String)>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn parse_range_arg(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, expr)) if !key.is_empty() => Ok((key.to_string(), expr.to_string())),
        _ => Err(format!("expected KEY=EXPR, got '{}'", s)),
    }
}

/// Parse `--match`; only a JSON object is a mapping filter
fn parse_match(json: &str) -> Result<Option<Filters>> {
    match serde_json::from_str::<Value>(json).context("--match must be a JSON object")? {
        Value::Object(map) if map.is_empty() => Ok(None),
        Value::Object(map) => Ok(Some(Filters::Match(map))),
        other => anyhow::bail!("--match must be a JSON object, got {}", other),
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("cloudnorm started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("cloudnorm").join("cloudnorm.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".cloudnorm").join("cloudnorm.log");
    }
    PathBuf::from("cloudnorm.log")
}

/// Read records from a file (JSON, or YAML by extension) or stdin
fn read_records(file: Option<&Path>) -> Result<Vec<Value>> {
    let (content, is_yaml) = match file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            let is_yaml = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            );
            (content, is_yaml)
        }
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read stdin")?;
            (content, false)
        }
    };

    let value: Value = if is_yaml {
        serde_yaml::from_str(&content).context("Failed to parse YAML records")?
    } else {
        serde_json::from_str(&content).context("Failed to parse JSON records")?
    };

    Ok(match value {
        Value::Array(items) => items,
        single => vec![single],
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let mut config = Config::load();
    config.apply(&Overrides {
        cloud: args.cloud.clone(),
        region_name: args.region.clone(),
        zone: args.zone.clone(),
        project_id: args.project.clone(),
        strict_mode: args.strict,
        floating_ip_source: args.floating_ip_source,
    });
    if args.save_defaults {
        config.save()?;
    }

    let context = config.to_context();
    let normalizer = Normalizer::new(&context);
    tracing::info!(
        "Using cloud: {}, region: {:?}, strict: {}",
        context.cloud_name,
        context.region_name,
        context.strict_mode
    );

    let output = match args.command {
        Command::Normalize { kind, file } => {
            let raws = read_records(file.as_deref())?;
            normalizer.normalize_all(kind, &raws)?
        }
        Command::Filter {
            file,
            kind,
            name_or_id,
            match_json,
            query,
            ranges,
        } => {
            let mut records = read_records(file.as_deref())?;
            if let Some(kind) = kind {
                records = normalizer.normalize_all(kind, &records)?;
            }

            let filters = match (match_json, query) {
                (Some(json), _) => parse_match(&json)?,
                (None, Some(expr)) => Some(Filters::Query(expr)),
                (None, None) => None,
            };

            records = filter_list(&records, name_or_id.as_deref(), filters.as_ref())?;
            for (key, expr) in &ranges {
                records = range_filter(&records, key, expr)?;
            }
            records
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
