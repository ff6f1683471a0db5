pub(crate) mod date;
pub(crate) mod debug;
pub(crate) mod timezone;

pub(crate) use date::{DATE_FORMAT, TIMESTAMP_FORMAT, is_valid_format, parse_date, parse_timestamp};
pub(crate) use debug::{debug_log, set_debug};
pub(crate) use timezone::Timezone;
