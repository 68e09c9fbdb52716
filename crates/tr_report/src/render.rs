//! Rendering collaborator seam.
//!
//! `Renderer` turns a finished `ReportModel` into document bytes. The built-in
//! `DocumentRenderer` covers JSON and HTML; PDF and XLSX come from outside.

use core::fmt;
use core::str::FromStr;

use crate::model::ReportModel;
use crate::ReportError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Xlsx,
    Json,
    Html,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "json" => Ok(ExportFormat::Json),
            "html" | "htm" => Ok(ExportFormat::Html),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

pub trait Renderer {
    fn render(&self, model: &ReportModel, format: ExportFormat) -> Result<Vec<u8>, ReportError>;

    fn supports(&self, format: ExportFormat) -> bool;
}

/// JSON and HTML output, both deterministic for a given model.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentRenderer;

impl Renderer for DocumentRenderer {
    fn render(&self, model: &ReportModel, format: ExportFormat) -> Result<Vec<u8>, ReportError> {
        match format {
            #[cfg(feature = "render_json")]
            ExportFormat::Json => crate::render_json::render_json_bytes(model),
            #[cfg(feature = "render_html")]
            ExportFormat::Html => Ok(crate::render_html::render_html(model).into_bytes()),
            other => Err(ReportError::UnsupportedFormat(other)),
        }
    }

    fn supports(&self, format: ExportFormat) -> bool {
        match format {
            ExportFormat::Json => cfg!(feature = "render_json"),
            ExportFormat::Html => cfg!(feature = "render_html"),
            ExportFormat::Pdf | ExportFormat::Xlsx => false,
        }
    }
}

/// `laporan_perjalanan_<title with spaces as underscores>.<ext>`.
///
/// Path separators and control characters are replaced too, so the result is
/// always a single file name.
pub fn suggested_file_name(trip_title: &str, format: ExportFormat) -> String {
    let stem: String = trip_title
        .trim()
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = if stem.is_empty() { "tanpa_judul".to_string() } else { stem };
    format!("laporan_perjalanan_{stem}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(
            suggested_file_name("Rapat Koordinasi Wilayah", ExportFormat::Pdf),
            "laporan_perjalanan_Rapat_Koordinasi_Wilayah.pdf"
        );
        assert_eq!(suggested_file_name("a/b", ExportFormat::Html), "laporan_perjalanan_a_b.html");
        assert_eq!(suggested_file_name("  ", ExportFormat::Xlsx), "laporan_perjalanan_tanpa_judul.xlsx");
    }

    #[test]
    fn format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("docx".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Pdf.to_string(), "pdf");
    }

    #[test]
    fn builtin_support() {
        let r = DocumentRenderer;
        assert!(!r.supports(ExportFormat::Pdf));
        assert!(!r.supports(ExportFormat::Xlsx));
    }
}
