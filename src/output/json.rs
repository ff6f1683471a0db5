use serde_json::{Value, json};

use crate::cli::SortOrder;
use crate::ledger::{LedgerView, ReloadReport, format_timestamp};
use crate::output::table::ordered_entries;
use crate::utils::DATE_FORMAT;

pub(crate) fn view_json(view: &LedgerView, worksheet: &str, order: SortOrder) -> Value {
    let entries: Vec<Value> = ordered_entries(view, order)
        .into_iter()
        .map(|entry| {
            json!({
                "name": entry.name,
                "completed_at": format_timestamp(entry.completed_at),
                "date": entry.date().format(DATE_FORMAT).to_string(),
                "today": (entry.date() == view.today_date),
            })
        })
        .collect();
    json!({
        "worksheet": worksheet,
        "today_date": view.today_date.format(DATE_FORMAT).to_string(),
        "total": view.total,
        "today": view.today,
        "last_sync": view.last_sync.map(format_timestamp),
        "entries": entries,
    })
}

pub(crate) fn reload_json(report: &ReloadReport) -> Value {
    let skipped: Vec<Value> = report
        .skipped
        .iter()
        .map(|s| {
            json!({
                "row": s.row_number,
                "reason": s.reason.to_string(),
            })
        })
        .collect();
    json!({
        "loaded": report.loaded,
        "skipped": skipped,
    })
}

pub(crate) fn output_view_json(view: &LedgerView, worksheet: &str, order: SortOrder) -> String {
    serde_json::to_string_pretty(&view_json(view, worksheet, order)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::CompletionEntry;
    use chrono::NaiveDate;

    #[test]
    fn view_json_shape() {
        let day = |d: u32| NaiveDate::from_ymd_opt(2025, 6, d).unwrap();
        let view = LedgerView {
            entries: vec![
                CompletionEntry::new("Bob", day(2).and_hms_opt(9, 0, 0).unwrap()),
                CompletionEntry::new("Alice", day(1).and_hms_opt(8, 0, 0).unwrap()),
            ],
            total: 2,
            today: 1,
            today_date: day(2),
            last_sync: None,
        };
        let value = view_json(&view, "Sheet1", SortOrder::Desc);
        assert_eq!(value["total"], 2);
        assert_eq!(value["today"], 1);
        assert_eq!(value["last_sync"], Value::Null);
        assert_eq!(value["entries"][0]["name"], "Bob");
        assert_eq!(value["entries"][0]["completed_at"], "2025-06-02 09:00:00");
        assert_eq!(value["entries"][0]["today"], true);
        assert_eq!(value["entries"][1]["date"], "2025-06-01");

        let asc = view_json(&view, "Sheet1", SortOrder::Asc);
        assert_eq!(asc["entries"][0]["name"], "Alice");
    }

    #[test]
    fn reload_json_lists_skips() {
        let report = ReloadReport {
            loaded: 3,
            skipped: Vec::new(),
        };
        let value = reload_json(&report);
        assert_eq!(value["loaded"], 3);
        assert_eq!(value["skipped"].as_array().unwrap().len(), 0);
    }
}
