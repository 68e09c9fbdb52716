// crates/tr_report/src/render_html.rs
//
// Deterministic, offline HTML renderer. Asset-free: one inline <style>.
// Section order: header → identity → I. activities → II. expenses → signature.
// All user text is escaped.

use std::fmt::Write as _;

use tr_core::calendar::{format_date, format_time, weekday_name};
use tr_core::Locale;

use crate::model::ReportModel;

// ------------------------- phrasebook -------------------------

#[derive(Copy, Clone)]
struct Phrase {
    key: &'static str,
    id: &'static str,
    en: &'static str,
}

const PHRASES: &[Phrase] = &[
    Phrase { key: "number",       id: "Nomor",                 en: "Number" },
    Phrase { key: "name",         id: "Nama",                  en: "Name" },
    Phrase { key: "employee_id",  id: "NIP",                   en: "Employee ID" },
    Phrase { key: "position",     id: "Jabatan",               en: "Position" },
    Phrase { key: "unit",         id: "Unit/Bagian",           en: "Unit" },
    Phrase { key: "trip_title",   id: "Judul Perjalanan",      en: "Trip" },
    Phrase { key: "destination",  id: "Tujuan",                en: "Destination" },
    Phrase { key: "period",       id: "Tanggal",               en: "Dates" },
    Phrase { key: "legal_basis",  id: "Dasar Perjalanan",      en: "Legal basis" },
    Phrase { key: "purpose",      id: "Maksud dan Tujuan",     en: "Purpose" },
    Phrase { key: "activities",   id: "I. URAIAN KEGIATAN",    en: "I. ACTIVITIES" },
    Phrase { key: "expenses",     id: "II. RINCIAN BIAYA",     en: "II. EXPENSES" },
    Phrase { key: "no",           id: "No",                    en: "No" },
    Phrase { key: "date",         id: "Tanggal",               en: "Date" },
    Phrase { key: "time",         id: "Waktu",                 en: "Time" },
    Phrase { key: "activity",     id: "Kegiatan",              en: "Activity" },
    Phrase { key: "location",     id: "Lokasi",                en: "Location" },
    Phrase { key: "description",  id: "Uraian",                en: "Description" },
    Phrase { key: "amount",       id: "Jumlah",                en: "Amount" },
    Phrase { key: "total",        id: "TOTAL",                 en: "TOTAL" },
    Phrase { key: "acknowledged", id: "Mengetahui,",           en: "Acknowledged by," },
    Phrase { key: "supervisor",   id: "Atasan Langsung",       en: "Direct supervisor" },
    Phrase { key: "reported_by",  id: "Yang Membuat Laporan,", en: "Reported by," },
    Phrase { key: "preview",      id: "PRATINJAU: data belum lengkap", en: "PREVIEW: data incomplete" },
    Phrase { key: "empty",        id: "Belum ada data",        en: "No entries yet" },
];

fn t(locale: Locale, key: &str) -> &'static str {
    for p in PHRASES {
        if p.key == key {
            return match locale {
                Locale::IdId => p.id,
                Locale::EnUs => p.en,
            };
        }
    }
    ""
}

fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

// ------------------------- HTML builder -------------------------

pub struct HtmlBuilder {
    locale: Locale,
    buf: String,
}

impl HtmlBuilder {
    pub fn new(locale: Locale) -> Self {
        Self { locale, buf: String::with_capacity(16 * 1024) }
    }

    fn tr(&self, key: &str) -> String {
        esc(t(self.locale, key))
    }

    pub fn start(&mut self, title: &str) {
        let _ = write!(
            self.buf,
            "<!doctype html><html lang=\"{}\"><head><meta charset=\"utf-8\">\
             <title>{}</title>\
             <style>\
             body{{font-family:Arial,Helvetica,sans-serif;font-size:10pt;margin:2cm}}\
             h1{{font-size:14pt;text-align:center;margin:0}}\
             .sub{{text-align:center;margin:0 0 24px}}\
             h2{{font-size:11pt;margin:16px 0 8px}}\
             table{{border-collapse:collapse;width:100%}}\
             .grid td,.grid th{{border:1px solid #000;padding:3px 6px;vertical-align:top}}\
             .grid th{{background:#e6e6e6}}\
             .c{{text-align:center}} .r{{text-align:right}}\
             .tot td{{background:#f2f2f2;font-weight:bold}}\
             .warn{{border:1px solid #b00;color:#b00;padding:4px 8px}}\
             .sig td{{text-align:center;padding:2px;border:0}}\
             </style></head><body>",
            esc(self.locale.as_tag()),
            esc(title)
        );
    }

    pub fn finish(mut self) -> String {
        self.buf.push_str("</body></html>\n");
        self.buf
    }

    pub fn section_header(&mut self, title: &str, number: &str) {
        let _ = write!(
            self.buf,
            "<h1>{}</h1><p class=\"sub\">{}: {}</p>",
            esc(title),
            self.tr("number"),
            esc(number)
        );
    }

    pub fn preview_banner(&mut self, missing: &[&str]) {
        let _ = write!(
            self.buf,
            "<p class=\"warn\">{} ({})</p>",
            self.tr("preview"),
            esc(&missing.join(", "))
        );
    }

    /// Label / colon / value table.
    pub fn section_identity<'a, I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = (&'static str, &'a str)>,
    {
        self.buf.push_str("<table class=\"kv\">");
        for (key, value) in rows {
            if key.is_empty() {
                self.buf.push_str("<tr><td colspan=\"3\">&nbsp;</td></tr>");
                continue;
            }
            let _ = write!(self.buf, "<tr><td>{}</td><td>:</td><td>{}</td></tr>", self.tr(key), esc(value));
        }
        self.buf.push_str("</table>");
    }

    pub fn section_itinerary(&mut self, m: &ReportModel) {
        let df = m.presentation.date_format;
        let _ = write!(
            self.buf,
            "<h2>{}</h2><table class=\"grid\"><tr><th>{}</th><th>{}</th><th>{}</th><th>{}</th><th>{}</th></tr>",
            self.tr("activities"),
            self.tr("no"),
            self.tr("date"),
            self.tr("time"),
            self.tr("activity"),
            self.tr("location"),
        );
        if m.itinerary.is_empty() {
            let _ = write!(self.buf, "<tr><td colspan=\"5\" class=\"c\">{}</td></tr>", self.tr("empty"));
        }
        for g in &m.itinerary {
            let day = format!("{}, {}", weekday_name(&g.date, df), format_date(&g.date, df));
            for r in &g.rows {
                let _ = write!(
                    self.buf,
                    "<tr><td class=\"c\">{}</td><td>{}</td><td>{}</td><td>{}",
                    r.no,
                    esc(&day),
                    format_time(&r.entry.time_of_day),
                    esc(&r.entry.activity)
                );
                if let Some(note) = r.entry.note.as_deref().filter(|n| !n.trim().is_empty()) {
                    let _ = write!(self.buf, "<br><i>{}</i>", esc(note));
                }
                let _ = write!(self.buf, "</td><td>{}</td></tr>", esc(&r.entry.location));
            }
        }
        self.buf.push_str("</table>");
    }

    pub fn section_expenses(&mut self, m: &ReportModel) {
        let df = m.presentation.date_format;
        let _ = write!(
            self.buf,
            "<h2>{}</h2><table class=\"grid\"><tr><th>{}</th><th>{}</th><th>{}</th><th>{}</th></tr>",
            self.tr("expenses"),
            self.tr("no"),
            self.tr("date"),
            self.tr("description"),
            self.tr("amount"),
        );
        for (r, amount) in m.expenses.ledger.rows.iter().zip(&m.expenses.amount_texts) {
            let _ = write!(
                self.buf,
                "<tr><td class=\"c\">{}</td><td>{}</td><td>{}</td><td class=\"r\">{}</td></tr>",
                r.seq,
                esc(&format_date(&r.entry.date, df)),
                esc(&r.entry.description),
                esc(amount)
            );
        }
        let _ = write!(
            self.buf,
            "<tr class=\"tot\"><td></td><td></td><td>{}</td><td class=\"r\">{}</td></tr></table>",
            self.tr("total"),
            esc(&m.expenses.total_text)
        );
    }

    pub fn section_signature(&mut self, m: &ReportModel) {
        let s = &m.signature;
        let _ = write!(
            self.buf,
            "<table class=\"sig\" style=\"margin-top:1.5cm\">\
             <tr><td></td><td>{}</td></tr>\
             <tr><td>{}</td><td>{}</td></tr>\
             <tr><td>{}</td><td></td></tr>\
             <tr><td style=\"height:2cm\"></td><td></td></tr>\
             <tr><td>(_________________)</td><td>({})</td></tr>\
             <tr><td>{}.</td><td>{}. {}</td></tr>\
             </table>",
            esc(&s.place_date_line),
            self.tr("acknowledged"),
            self.tr("reported_by"),
            self.tr("supervisor"),
            esc(&s.reporter_name),
            self.tr("employee_id"),
            self.tr("employee_id"),
            esc(&s.reporter_employee_id),
        );
    }
}

/// Full report page.
pub fn render_html(m: &ReportModel) -> String {
    let mut b = HtmlBuilder::new(m.presentation.locale);
    b.start(&format!("{} - {}", m.header.title, m.trip.trip.title));
    b.section_header(&m.header.title, &m.header.number);
    if !m.completeness.can_generate {
        b.preview_banner(&m.completeness.missing);
    }

    let p = &m.reporter;
    let tr = &m.trip.trip;
    b.section_identity([
        ("name", p.full_name.as_str()),
        ("employee_id", p.employee_id.as_str()),
        ("position", p.title.as_str()),
        ("unit", p.unit.as_str()),
        ("", ""),
        ("trip_title", tr.title.as_str()),
        ("destination", tr.destination.as_str()),
        ("period", m.trip.period_text.as_str()),
        ("legal_basis", tr.legal_basis.as_str()),
        ("purpose", tr.purpose.as_str()),
    ]);
    b.section_itinerary(m);
    b.section_expenses(m);
    b.section_signature(m);
    b.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping() {
        assert_eq!(esc("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }

    #[test]
    fn phrase_lookup() {
        assert_eq!(t(Locale::IdId, "expenses"), "II. RINCIAN BIAYA");
        assert_eq!(t(Locale::EnUs, "supervisor"), "Direct supervisor");
        assert_eq!(t(Locale::EnUs, "missing-key"), "");
    }
}
