//! trip-report: offline CLI over a JSON bundle.
//!
//! load bundle → validate | preview | export → files under --out.
//! Logs go to stderr; stdout carries only the --validate-only JSON.

mod args;

mod exitcodes {
    pub const OK: u8 = 0;
    pub const VALIDATION: u8 = 2;
    pub const NOT_FOUND: u8 = 3;
    pub const IO: u8 = 4;
    pub const RENDER: u8 = 5;
}

use std::fs;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use args::{parse_and_validate as parse_cli, Args, CliError};

use tr_io::bundle::read_bundle_file;
use tr_io::canonical_json::write_atomic;
use tr_io::hasher::sha256_file;
use tr_io::store::{MemoryStore, TripStore};
use tr_io::IoError;
use tr_pipeline::{generate_report, preview_report, validate_report, EngineMeta, ExportFormat, PipelineError, ReportOptions};
use tr_report::{suggested_file_name, DocumentRenderer, Renderer};

const PREVIEW_FILE: &str = "report.preview.json";

/// Buckets that decide the process exit code.
#[derive(Debug)]
enum MainError {
    /// Bad input data, or export attempted while the gate is closed.
    Validation(String),
    NotFound(String),
    Io(String),
    Render(String),
}

impl MainError {
    fn exit_code(&self) -> u8 {
        match self {
            MainError::Validation(_) => exitcodes::VALIDATION,
            MainError::NotFound(_) => exitcodes::NOT_FOUND,
            MainError::Io(_) => exitcodes::IO,
            MainError::Render(_) => exitcodes::RENDER,
        }
    }
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::NotFound(m) => write!(f, "not found: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Render(m) => write!(f, "render: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("trip-report: error: {e}");
            let rc = match e {
                CliError::NonLocalPath(_) => exitcodes::VALIDATION,
                CliError::NotFound(_) => exitcodes::IO,
            };
            return ExitCode::from(rc);
        }
    };

    init_tracing(args.quiet);
    let meta = EngineMeta::current();
    debug!(engine = %meta.name, version = %meta.version, trip = %args.trip, "starting");

    let outcome = if args.validate_only { validate_only(&args) } else { run_once(&args) };
    match outcome {
        Ok(rc) => ExitCode::from(rc),
        Err(e) => {
            error!(error = %e, "trip-report failed");
            eprintln!("trip-report: error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn load_store(args: &Args) -> Result<MemoryStore, MainError> {
    let store = read_bundle_file(&args.bundle).map_err(map_io_err)?;
    // Fail early with exit 3 when the trip is absent.
    store.trip(&args.trip).map_err(map_io_err)?;
    Ok(store)
}

fn report_options(args: &Args) -> ReportOptions {
    ReportOptions {
        date_format: args.resolved_date_format(),
        issue_place: args.place.clone(),
        issued_on: args.issued_on.or_else(|| Some(chrono::Local::now().date_naive())),
        ..ReportOptions::for_locale(args.locale)
    }
}

/// Print the checklist JSON on stdout; exit 0 only when export would be accepted.
fn validate_only(args: &Args) -> Result<u8, MainError> {
    let store = load_store(args)?;
    let v = validate_report(&store, &args.trip).map_err(map_pipeline_err)?;
    let text = serde_json::to_string_pretty(&v).map_err(|e| MainError::Render(format!("checklist to JSON: {e}")))?;
    println!("{text}");
    Ok(if v.can_generate { exitcodes::OK } else { exitcodes::VALIDATION })
}

fn run_once(args: &Args) -> Result<u8, MainError> {
    let store = load_store(args)?;
    let options = report_options(args);
    fs::create_dir_all(&args.out).map_err(|e| MainError::Io(format!("mkdir {}: {e}", args.out.display())))?;

    if args.preview {
        write_preview(&store, args, &options)?;
        return Ok(exitcodes::OK);
    }

    let title = store.trip(&args.trip).map_err(map_io_err)?.title;
    for name in &args.render {
        let format: ExportFormat = name.parse().map_err(MainError::Render)?;
        if !DocumentRenderer.supports(format) {
            return Err(MainError::Render(format!("{format} renderer not enabled in this build")));
        }
        let bytes = generate_report(&store, &args.trip, format, &DocumentRenderer, &options).map_err(map_pipeline_err)?;
        let path = args.out.join(suggested_file_name(&title, format));
        let sha256 = write_output(&path, &bytes)?;
        info!(%format, path = %path.display(), bytes = bytes.len(), %sha256, "report written");
    }
    Ok(exitcodes::OK)
}

fn write_preview(store: &MemoryStore, args: &Args, options: &ReportOptions) -> Result<(), MainError> {
    let model = preview_report(store, &args.trip, options).map_err(map_pipeline_err)?;
    if !model.can_generate() {
        warn!(missing = ?model.completeness.missing, "preview of incomplete report");
    }
    let bytes = DocumentRenderer
        .render(&model, ExportFormat::Json)
        .map_err(|e| MainError::Render(e.to_string()))?;
    let path = args.out.join(PREVIEW_FILE);
    let sha256 = write_output(&path, &bytes)?;
    info!(path = %path.display(), %sha256, "preview written");
    Ok(())
}

/// Write atomically, then digest what landed on disk.
fn write_output(path: &Path, bytes: &[u8]) -> Result<String, MainError> {
    write_atomic(path, bytes).map_err(|e| MainError::Io(format!("write {}: {e}", path.display())))?;
    sha256_file(path).map_err(|e| MainError::Io(format!("digest {}: {e}", path.display())))
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Json { pointer, msg } => MainError::Validation(format!("bundle json {pointer}: {msg}")),
        IoError::Path(m) => MainError::Io(format!("path: {m}")),
        other => map_pipeline_err(other.into()),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::IncompleteData { checklist } => {
            let detail = serde_json::to_string(&checklist).unwrap_or_else(|_| format!("{checklist:?}"));
            eprintln!("{detail}");
            MainError::Validation(format!("report data incomplete: {}", checklist.missing().join(", ")))
        }
        PipelineError::InvalidAmount(m) | PipelineError::InvalidDateRange(m) | PipelineError::Conflict(m) => {
            MainError::Validation(m)
        }
        PipelineError::NotFound { kind, id } => MainError::NotFound(format!("{kind} {id}")),
        PipelineError::Io(m) => MainError::Io(m),
        PipelineError::Render(m) => MainError::Render(m),
    }
}
