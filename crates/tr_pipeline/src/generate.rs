//! preview_report / generate_report.

use tracing::{debug, warn};

use tr_core::TripId;
use tr_io::store::TripStore;
use tr_report::{build_model, ExportFormat, ReportInput, ReportMode, ReportModel, ReportOptions, Renderer};

use crate::PipelineError;

/// Build the model regardless of completeness; flags are carried inside.
pub fn preview_report<S>(store: &S, trip_id: &TripId, options: &ReportOptions) -> Result<ReportModel, PipelineError>
where
    S: TripStore + ?Sized,
{
    let snap = store.snapshot(trip_id)?;
    let model = build_model(&ReportInput::from_snapshot(&snap, options), ReportMode::Preview)?;
    debug!(trip = %trip_id, can_generate = model.can_generate(), "preview built");
    Ok(model)
}

/// Export path: the gate must be open, otherwise no bytes are produced.
pub fn generate_report<S, R>(
    store: &S,
    trip_id: &TripId,
    format: ExportFormat,
    renderer: &R,
    options: &ReportOptions,
) -> Result<Vec<u8>, PipelineError>
where
    S: TripStore + ?Sized,
    R: Renderer + ?Sized,
{
    let snap = store.snapshot(trip_id)?;
    let model = match build_model(&ReportInput::from_snapshot(&snap, options), ReportMode::Export) {
        Ok(m) => m,
        Err(e) => {
            warn!(trip = %trip_id, %format, error = %e, "export rejected");
            return Err(e.into());
        }
    };
    let bytes = renderer.render(&model, format)?;
    debug!(trip = %trip_id, %format, len = bytes.len(), "report rendered");
    Ok(bytes)
}
