mod csv;
mod format;
mod json;
mod notice;
mod table;

pub(crate) use csv::output_view_csv;
pub(crate) use format::DisplayOptions;
pub(crate) use json::{output_view_json, reload_json, view_json};
pub(crate) use notice::{Notice, NoticeKind};
pub(crate) use table::print_board;
