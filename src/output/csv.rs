use std::fmt::Write;

use crate::cli::SortOrder;
use crate::ledger::LedgerView;
use crate::output::format::DisplayOptions;
use crate::output::table::ordered_entries;
use crate::utils::DATE_FORMAT;

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub(crate) fn output_view_csv(view: &LedgerView, order: SortOrder, opts: &DisplayOptions) -> String {
    let mut out = String::from("name,completed_at,date,today\n");
    for entry in ordered_entries(view, order) {
        let _ = writeln!(
            out,
            "{},{},{},{}",
            csv_escape(&entry.name),
            csv_escape(&opts.format_time(entry.completed_at)),
            entry.date().format(DATE_FORMAT),
            entry.date() == view.today_date,
        );
    }
    out
}
