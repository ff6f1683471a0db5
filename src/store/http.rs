//! Remote spreadsheet over HTTP.
//!
//! `GET {base}/{worksheet}` returns `{"columns": [...], "rows": [{...}]}` or a
//! bare array of row objects; `PUT` with the object form overwrites the
//! worksheet. There is no retry: a failed call is reported and the user
//! decides when to reload.

use serde_json::Value;
use std::time::{Duration, Instant};

use super::{Row, Sheet, TabularStore};
use crate::error::StoreError;
use crate::utils::debug_log;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) struct HttpStore {
    base_url: String,
    token: Option<String>,
    agent: ureq::Agent,
}

impl HttpStore {
    pub(crate) fn new(base_url: &str, token: Option<String>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            agent,
        }
    }

    fn worksheet_url(&self, worksheet: &str) -> String {
        format!("{}/{}", self.base_url, encode_segment(worksheet))
    }

    fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }
}

impl TabularStore for HttpStore {
    fn name(&self) -> &'static str {
        "http"
    }

    fn read(&self, worksheet: &str) -> Result<Sheet, StoreError> {
        let start = Instant::now();
        let url = self.worksheet_url(worksheet);
        let mut request = self.agent.get(&url);
        if let Some(auth) = self.bearer() {
            request = request.header("Authorization", auth);
        }
        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(404)) => {
                return Err(StoreError::missing_worksheet(worksheet));
            }
            Err(e) => return Err(e.into()),
        };
        let mut body = response.into_body();
        let payload: Value = serde_json::from_reader(body.as_reader())?;
        let sheet = sheet_from_json(payload)?;
        debug_log(format!(
            "fetched {} rows from {} ({:.2}ms)",
            sheet.rows.len(),
            url,
            start.elapsed().as_secs_f64() * 1000.0
        ));
        Ok(sheet)
    }

    fn update(&self, worksheet: &str, sheet: &Sheet) -> Result<(), StoreError> {
        let url = self.worksheet_url(worksheet);
        let mut request = self.agent.put(&url);
        if let Some(auth) = self.bearer() {
            request = request.header("Authorization", auth);
        }
        request.send_json(sheet)?;
        debug_log(format!("pushed {} rows to {}", sheet.rows.len(), url));
        Ok(())
    }
}

/// Percent-encode everything outside the unreserved set.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn row_from_json(value: Value) -> Result<Row, StoreError> {
    let Value::Object(map) = value else {
        return Err(StoreError::Payload(format!(
            "expected a row object, got {value}"
        )));
    };
    Ok(map
        .into_iter()
        .filter_map(|(k, v)| cell_text(&v).map(|text| (k, text)))
        .collect())
}

pub(crate) fn sheet_from_json(payload: Value) -> Result<Sheet, StoreError> {
    let (columns, rows) = match payload {
        Value::Array(rows) => (Vec::new(), rows),
        Value::Object(mut map) => {
            let columns = match map.remove("columns") {
                Some(Value::Array(cols)) => cols
                    .iter()
                    .filter_map(|c| c.as_str().map(str::to_string))
                    .collect(),
                Some(Value::Null) | None => Vec::new(),
                Some(other) => {
                    return Err(StoreError::Payload(format!(
                        "\"columns\" must be an array, got {other}"
                    )));
                }
            };
            let rows = match map.remove("rows") {
                Some(Value::Array(rows)) => rows,
                Some(Value::Null) | None => Vec::new(),
                Some(other) => {
                    return Err(StoreError::Payload(format!(
                        "\"rows\" must be an array, got {other}"
                    )));
                }
            };
            (columns, rows)
        }
        other => {
            return Err(StoreError::Payload(format!(
                "expected an object or array, got {other}"
            )));
        }
    };

    let mut sheet = Sheet::with_columns(columns);
    sheet.rows = rows
        .into_iter()
        .map(row_from_json)
        .collect::<Result<Vec<_>, _>>()?;
    sheet.absorb_row_keys();
    Ok(sheet)
}
