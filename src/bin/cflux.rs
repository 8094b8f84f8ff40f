//! cflux - Command-line interface for Content Flux
//!
//! Commands:
//! - normalize: Normalize raw platform records into scored output records
//! - classify: Run the story classifier over text bundles
//! - doctor: Diagnose configuration and input availability

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use content_flux::classifier::ContentClassifier;
use content_flux::pipeline::{ContentProcessor, ProcessorConfig, RawEnvelope};
use content_flux::{ComputeError, FLUX_VERSION, PRODUCER_NAME};

/// cflux - Cross-platform content metrics and story classification
#[derive(Parser)]
#[command(name = "cflux")]
#[command(author = "Synheart AI Inc")]
#[command(version = FLUX_VERSION)]
#[command(about = "Normalize content metrics and classify story content", long_about = None)]
struct Cli {
    /// Log level
    #[arg(long, global = true, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize raw platform records into output records
    Normalize {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Processor configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Attach a story classification to every record
        #[arg(long)]
        classify: bool,

        /// Keep only records classified as stories
        #[arg(long)]
        story_only: bool,

        /// Drop null and empty fields from the metrics blob
        #[arg(long)]
        compact: bool,

        /// Reference time for age-based metrics (RFC 3339, defaults to now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Classify text bundles as story or non-story content
    Classify {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Minimum confidence for a positive classification
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Diagnose configuration
    Doctor {
        /// Check processor configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one envelope per line)
    Ndjson,
    /// JSON array of envelopes
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// JSON array of records
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    None,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Text bundle accepted by `cflux classify`
#[derive(Deserialize)]
struct TextBundle {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    subtitle_text: Option<String>,
}

#[derive(Serialize)]
struct ClassifiedBundle {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(flatten)]
    result: content_flux::ClassificationResult,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .init();
}

fn run(cli: Cli) -> Result<(), CfluxCliError> {
    match cli.command {
        Commands::Normalize {
            input,
            output,
            input_format,
            output_format,
            config,
            classify,
            story_only,
            compact,
            now,
        } => {
            let mut processor_config = match config {
                Some(path) => ProcessorConfig::from_json(&fs::read_to_string(path)?)?,
                None => ProcessorConfig::default(),
            };
            processor_config.classify |= classify;
            processor_config.story_only |= story_only;
            processor_config.compact |= compact;

            cmd_normalize(
                &input,
                &output,
                input_format,
                output_format,
                processor_config,
                now.as_deref(),
            )
        }

        Commands::Classify {
            input,
            output_format,
            threshold,
        } => cmd_classify(&input, output_format, threshold),

        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),
    }
}

fn cmd_normalize(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    config: ProcessorConfig,
    now: Option<&str>,
) -> Result<(), CfluxCliError> {
    let input_data = read_input(input)?;

    let envelopes: Vec<RawEnvelope> = match input_format {
        InputFormat::Ndjson => ContentProcessor::parse_ndjson(&input_data)?,
        InputFormat::Json => serde_json::from_str(&input_data)?,
    };

    if envelopes.is_empty() {
        return Err(CfluxCliError::NoRecords);
    }

    let fetched_at = Utc::now();
    let now = match now {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map_err(|e| CfluxCliError::ParseError(format!("Invalid --now: {e}")))?
            .with_timezone(&Utc),
        None => fetched_at,
    };

    let processor = ContentProcessor::new(config);
    let report = processor.process_batch(&envelopes, fetched_at, now)?;

    log::info!(
        "{} records encoded, {} skipped, {} filtered",
        report.records.len(),
        report.skipped.len(),
        report.filtered
    );

    write_output(output, &format_output(&report.records, &output_format)?)
}

fn cmd_classify(
    input: &Path,
    output_format: OutputFormat,
    threshold: Option<f64>,
) -> Result<(), CfluxCliError> {
    let input_data = read_input(input)?;
    let classifier = threshold
        .map(ContentClassifier::with_threshold)
        .unwrap_or_default();

    let mut results = Vec::new();
    for (n, line) in input_data.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let bundle: TextBundle = serde_json::from_str(trimmed)
            .map_err(|e| CfluxCliError::ParseError(format!("line {}: {e}", n + 1)))?;

        let result = classifier.detect(
            &bundle.title,
            &bundle.description,
            bundle.tags.as_slice(),
            bundle.subtitle_text.as_deref(),
        );
        results.push(ClassifiedBundle {
            id: bundle.id,
            result,
        });
    }

    if results.is_empty() {
        return Err(CfluxCliError::NoRecords);
    }

    print!("{}", format_output(&results, &output_format)?);
    Ok(())
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), CfluxCliError> {
    let mut checks: Vec<DoctorCheck> = vec![DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("{PRODUCER_NAME} {FLUX_VERSION}"),
    }];

    if let Some(config_path) = config {
        let check = if !config_path.exists() {
            DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Warning,
                message: "Config file does not exist; defaults apply".to_string(),
            }
        } else {
            match fs::read_to_string(config_path) {
                Ok(content) => match ProcessorConfig::from_json(&content) {
                    Ok(parsed) => DoctorCheck {
                        name: "config".to_string(),
                        status: CheckStatus::Ok,
                        message: format!(
                            "Config valid (threshold {}, classify {}, story_only {})",
                            parsed.classifier.confidence_threshold,
                            parsed.classify,
                            parsed.story_only
                        ),
                    },
                    Err(e) => DoctorCheck {
                        name: "config".to_string(),
                        status: CheckStatus::Error,
                        message: format!("Invalid config: {e}"),
                    },
                },
                Err(e) => DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot read config file: {e}"),
                },
            }
        };
        checks.push(check);
    }

    checks.push(DoctorCheck {
        name: "stdin".to_string(),
        status: CheckStatus::Ok,
        message: if atty::is(atty::Stream::Stdin) {
            "stdin is a TTY (interactive mode)".to_string()
        } else {
            "stdin is a pipe (batch input ready)".to_string()
        },
    });

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: FLUX_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("cflux Doctor Report");
        println!("===================");
        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    if report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error))
    {
        Err(CfluxCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn read_input(input: &Path) -> Result<String, CfluxCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn write_output(output: &Path, data: &str) -> Result<(), CfluxCliError> {
    if output.to_string_lossy() == "-" {
        print!("{data}");
    } else {
        fs::write(output, data)?;
    }
    Ok(())
}

fn format_output<T: Serialize>(records: &[T], format: &OutputFormat) -> Result<String, CfluxCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for record in records {
                lines.push(serde_json::to_string(record)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(records)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(records)?),
    }
}

// Error handling

#[derive(Debug)]
enum CfluxCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    NoRecords,
    DoctorFailed,
    ParseError(String),
}

impl From<io::Error> for CfluxCliError {
    fn from(e: io::Error) -> Self {
        CfluxCliError::Io(e)
    }
}

impl From<ComputeError> for CfluxCliError {
    fn from(e: ComputeError) -> Self {
        CfluxCliError::Compute(e)
    }
}

impl From<serde_json::Error> for CfluxCliError {
    fn from(e: serde_json::Error) -> Self {
        CfluxCliError::Json(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CfluxCliError> for CliError {
    fn from(e: CfluxCliError) -> Self {
        match e {
            CfluxCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CfluxCliError::Compute(e) => CliError {
                code: "COMPUTE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some(
                    "Envelopes need a platform tag and a record object".to_string(),
                ),
            },
            CfluxCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            CfluxCliError::NoRecords => CliError {
                code: "NO_RECORDS".to_string(),
                message: "No records found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            CfluxCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
            CfluxCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Check input format".to_string()),
            },
        }
    }
}

// Report types

#[derive(Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
