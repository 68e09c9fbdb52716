//! render_json.rs
//! Document-shaped JSON: header → reporter → trip → itinerary → expenses →
//! signature. Carries both raw values and their display text. Keys come out
//! sorted (serde_json's default map), so output is byte-stable per model.

use serde_json::{json, Map as JsonMap, Value};
use tr_core::calendar::{format_date, format_time, weekday_name};

use crate::model::ReportModel;
use crate::ReportError;

pub fn render_report_json(m: &ReportModel) -> Value {
    let df = m.presentation.date_format;
    let mut root = JsonMap::new();

    root.insert(
        "header".into(),
        json!({ "title": m.header.title, "number": m.header.number }),
    );
    root.insert(
        "reporter".into(),
        json!({
            "full_name": m.reporter.full_name,
            "employee_id": m.reporter.employee_id,
            "title": m.reporter.title,
            "unit": m.reporter.unit,
        }),
    );

    let t = &m.trip.trip;
    root.insert(
        "trip".into(),
        json!({
            "id": t.id.as_str(),
            "title": t.title,
            "destination": t.destination,
            "start_date": t.start_date,
            "end_date": t.end_date,
            "period": m.trip.period_text,
            "day_count": m.trip.day_count,
            "legal_basis": t.legal_basis,
            "purpose": t.purpose,
            "status": t.status.as_str(),
        }),
    );

    let days: Vec<Value> = m
        .itinerary
        .iter()
        .map(|g| {
            let rows: Vec<Value> = g
                .rows
                .iter()
                .map(|r| {
                    json!({
                        "no": r.no,
                        "time": format_time(&r.entry.time_of_day),
                        "activity": r.entry.activity,
                        "location": r.entry.location,
                        "note": r.entry.note,
                    })
                })
                .collect();
            json!({
                "date": g.date,
                "date_text": format_date(&g.date, df),
                "weekday": weekday_name(&g.date, df),
                "rows": rows,
            })
        })
        .collect();
    root.insert("itinerary".into(), Value::Array(days));

    let rows: Vec<Value> = m
        .expenses
        .ledger
        .rows
        .iter()
        .zip(&m.expenses.amount_texts)
        .map(|(r, text)| {
            json!({
                "no": r.seq,
                "date": r.entry.date,
                "date_text": format_date(&r.entry.date, df),
                "description": r.entry.description,
                "amount": r.entry.amount.units(),
                "amount_text": text,
                "note": r.entry.note,
            })
        })
        .collect();
    root.insert(
        "expenses".into(),
        json!({
            "rows": rows,
            // u128 totals go out as decimal strings; JSON numbers stop at u64
            "total": m.expenses.ledger.total.to_string(),
            "total_text": m.expenses.total_text,
        }),
    );

    root.insert(
        "completeness".into(),
        json!({
            "can_generate": m.completeness.can_generate,
            "missing": m.completeness.missing,
        }),
    );

    root.insert(
        "signature".into(),
        json!({
            "place_date": m.signature.place_date_line,
            "reporter_name": m.signature.reporter_name,
            "reporter_employee_id": m.signature.reporter_employee_id,
        }),
    );

    Value::Object(root)
}

pub fn render_json_bytes(m: &ReportModel) -> Result<Vec<u8>, ReportError> {
    let mut bytes = serde_json::to_vec_pretty(&render_report_json(m))?;
    bytes.push(b'\n');
    Ok(bytes)
}
