use comfy_table::Color;

use crate::cli::SortOrder;
use crate::ledger::{CompletionEntry, LedgerView};
use crate::output::format::{
    DisplayOptions, create_styled_table, format_count, header_cell, right_cell, styled_cell,
};
use crate::output::notice::{EMPTY_BOARD, Notice, cheer_line};

pub(crate) fn ordered_entries(view: &LedgerView, order: SortOrder) -> Vec<&CompletionEntry> {
    match order {
        SortOrder::Desc => view.entries.iter().collect(),
        SortOrder::Asc => view.entries.iter().rev().collect(),
    }
}

/// Render the board: title, entry table, counts and the cheer line.
pub(crate) fn render_board(
    view: &LedgerView,
    worksheet: &str,
    order: SortOrder,
    opts: &DisplayOptions,
) -> String {
    let c = opts.use_color;
    let mut out = String::new();
    out.push_str(&format!("\n  ✨ Done Board · {worksheet} ✨\n\n"));

    if view.entries.is_empty() {
        out.push_str(&format!("  {}\n", Notice::info(EMPTY_BOARD).render(c)));
        out.push_str(&summary_line(view, opts));
        return out;
    }

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("#", c),
        header_cell("Name", c),
        header_cell("Completed", c),
    ]);

    for (index, entry) in ordered_entries(view, order).into_iter().enumerate() {
        let is_today = entry.date() == view.today_date;
        let highlight = if c && is_today { Some(Color::Green) } else { None };
        table.add_row(vec![
            right_cell(&(index + 1).to_string(), None, false),
            styled_cell(&entry.name, highlight, is_today),
            styled_cell(&opts.format_time(entry.completed_at), None, false),
        ]);
    }

    out.push_str(&table.to_string());
    out.push('\n');
    out.push_str(&summary_line(view, opts));
    if let Some(cheer) = cheer_line(view) {
        out.push_str(&format!("  {cheer}\n"));
    }
    out
}

fn summary_line(view: &LedgerView, opts: &DisplayOptions) -> String {
    let synced = view
        .last_sync
        .map(|ts| opts.format_time(ts))
        .unwrap_or_else(|| "never".to_string());
    let counts = format!(
        "Today {} | Total {}",
        format_count(view.today),
        format_count(view.total)
    );
    if opts.use_color {
        format!("\n  \x1b[1m{counts}\x1b[0m | synced \x1b[36m{synced}\x1b[0m\n")
    } else {
        format!("\n  {counts} | synced {synced}\n")
    }
}

pub(crate) fn print_board(view: &LedgerView, worksheet: &str, order: SortOrder, opts: &DisplayOptions) {
    println!("{}", render_board(view, worksheet, order, opts));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn view() -> LedgerView {
        let at = |d: u32, h: u32| {
            NaiveDate::from_ymd_opt(2025, 6, d)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap()
        };
        LedgerView {
            entries: vec![
                CompletionEntry::new("Cleo", at(2, 10)),
                CompletionEntry::new("Bob", at(2, 9)),
                CompletionEntry::new("Alice", at(1, 8)),
            ],
            total: 3,
            today: 2,
            today_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            last_sync: Some(at(2, 11)),
        }
    }

    #[test]
    fn board_lists_entries_newest_first() {
        let out = render_board(&view(), "Sheet1", SortOrder::Desc, &DisplayOptions::default());
        let cleo = out.find("Cleo").unwrap();
        let alice = out.find("Alice").unwrap();
        assert!(cleo < alice);
        assert!(out.contains("Today 2 | Total 3"));
        assert!(out.contains("synced 2025-06-02 11:00:00"));
        assert!(out.contains("Done Board · Sheet1"));
    }

    #[test]
    fn ascending_order_reverses_rows() {
        let v = view();
        let names: Vec<&str> = ordered_entries(&v, SortOrder::Asc)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alice", "Bob", "Cleo"]);
    }

    #[test]
    fn empty_board_shows_invitation() {
        let mut v = view();
        v.entries.clear();
        v.total = 0;
        v.today = 0;
        let out = render_board(&v, "Sheet1", SortOrder::Desc, &DisplayOptions::default());
        assert!(out.contains(EMPTY_BOARD));
        assert!(out.contains("Today 0 | Total 0"));
    }
}
