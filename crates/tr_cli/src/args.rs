//! Argument surface for `trip-report`.
//!
//! One bundle file in, one trip selected, zero or more documents out.
//! Everything is local: any path carrying a URL scheme is refused.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Parser;

use tr_core::calendar::{parse_date, DateFormat};
use tr_core::{Locale, TripId};
use tr_io::looks_like_url_strict;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "trip-report",
    disable_help_subcommand = true,
    about = "Validate, preview and export an official trip report from a local JSON bundle"
)]
pub struct Args {
    /// Bundle JSON holding the profile and its trips.
    #[arg(long)]
    pub bundle: PathBuf,

    /// Trip id inside the bundle.
    #[arg(long, value_parser = parse_trip_id)]
    pub trip: TripId,

    /// Print the completeness checklist as JSON and exit (0 when exportable, else 2).
    #[arg(long, conflicts_with = "preview")]
    pub validate_only: bool,

    /// Write `report.preview.json` even when data is incomplete.
    #[arg(long)]
    pub preview: bool,

    /// Format(s) to export (json, html). Defaults to json.
    #[arg(long, value_parser = ["json", "html"], num_args = 1..=2, action = clap::ArgAction::Append)]
    pub render: Vec<String>,

    /// Output directory (created if missing).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// id-ID or en-US; selects the amount preset and phrasebook.
    #[arg(long, default_value = "id-ID", value_parser = parse_locale)]
    pub locale: Locale,

    /// iso or long (long follows --locale).
    #[arg(long, value_parser = ["iso", "long"])]
    pub date_format: Option<String>,

    /// Place printed on the signature line.
    #[arg(long)]
    pub place: Option<String>,

    /// Issue date (YYYY-MM-DD); defaults to today.
    #[arg(long, value_parser = parse_issued_on)]
    pub issued_on: Option<NaiveDate>,

    /// Only warnings and errors on stderr.
    #[arg(long)]
    pub quiet: bool,
}

impl Args {
    /// Date style for the report: explicit flag, else the locale's long form.
    pub fn resolved_date_format(&self) -> DateFormat {
        match (self.date_format.as_deref(), self.locale) {
            (Some("iso"), _) => DateFormat::Iso,
            (_, Locale::EnUs) => DateFormat::LongEn,
            (_, Locale::IdId) => DateFormat::LongId,
        }
    }
}

#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            CliError::NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

pub fn parse_trip_id(s: &str) -> Result<TripId, String> {
    s.parse().map_err(|e| format!("{e}"))
}

pub fn parse_locale(s: &str) -> Result<Locale, String> {
    s.parse().map_err(|_| format!("unsupported locale {s:?} (expected id-ID or en-US)"))
}

pub fn parse_issued_on(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| format!("{e}"))
}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    let args = Args::parse();
    check(args)
}

fn check(mut args: Args) -> Result<Args, CliError> {
    ensure_local_path(&args.bundle)?;
    ensure_local_path(&args.out)?;
    ensure_local_exists(&args.bundle, "--bundle")?;

    args.bundle = normalize_path(&args.bundle);
    args.out = normalize_path(&args.out);
    if args.render.is_empty() {
        args.render.push("json".into());
    }
    let mut seen: Vec<String> = Vec::new();
    args.render.retain(|f| {
        let fresh = !seen.contains(f);
        if fresh {
            seen.push(f.clone());
        }
        fresh
    });
    Ok(args)
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    match p.to_str() {
        Some(s) if looks_like_url_strict(s) || s.trim().to_ascii_lowercase().starts_with("file:") => {
            Err(CliError::NonLocalPath(s.to_string()))
        }
        _ => Ok(()),
    }
}

fn ensure_local_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    let meta = fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("{label} {}", p.display())));
    }
    Ok(())
}

/// Absolute form of `p`; falls back to CWD-relative when it does not exist yet.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("trip-report").chain(argv.iter().copied()))
    }

    #[test]
    fn locale_and_date_flags() {
        let a = parse(&["--bundle", "b.json", "--trip", "t1", "--locale", "en-US"]).unwrap();
        assert_eq!(a.locale, Locale::EnUs);
        assert_eq!(a.resolved_date_format(), DateFormat::LongEn);

        let a = parse(&["--bundle", "b.json", "--trip", "t1", "--date-format", "iso"]).unwrap();
        assert_eq!(a.locale, Locale::IdId);
        assert_eq!(a.resolved_date_format(), DateFormat::Iso);

        assert!(parse(&["--bundle", "b.json", "--trip", "t1", "--locale", "fr-FR"]).is_err());
        assert!(parse(&["--bundle", "b.json", "--trip", "t1", "--issued-on", "2024-13-01"]).is_err());
    }

    #[test]
    fn bad_trip_id_and_mode_conflict() {
        assert!(parse(&["--bundle", "b.json", "--trip", "no spaces"]).is_err());
        assert!(parse(&["--bundle", "b.json", "--trip", "t1", "--validate-only", "--preview"]).is_err());
    }

    #[test]
    fn render_defaults_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("b.json");
        std::fs::write(&bundle, "{}").unwrap();
        let a = parse(&["--bundle", bundle.to_str().unwrap(), "--trip", "t1"]).unwrap();
        let a = check(a).unwrap();
        assert_eq!(a.render, vec!["json"]);
        assert!(a.out.is_absolute());
    }

    #[test]
    fn url_paths_are_refused() {
        assert!(ensure_local_path(Path::new("https://x/bundle.json")).is_err());
        assert!(ensure_local_path(Path::new("file:///tmp/b.json")).is_err());
        assert!(ensure_local_path(Path::new("/tmp/b.json")).is_ok());

        let a = parse(&["--bundle", "http://host/b.json", "--trip", "t1"]).unwrap();
        assert!(matches!(check(a), Err(CliError::NonLocalPath(_))));
    }

    #[test]
    fn missing_bundle_is_not_found() {
        let a = parse(&["--bundle", "definitely/missing.json", "--trip", "t1"]).unwrap();
        assert!(matches!(check(a), Err(CliError::NotFound(_))));
    }
}
