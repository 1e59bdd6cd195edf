use std::io::{BufRead, Write};

use super::handlers;
use super::types::{AppState, Request};
use crate::ipc::error::{bad_json, err};

pub fn handle_request(state: &mut AppState, req: Request) -> serde_json::Value {
    if let Some(resp) = handlers::core::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::grading::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::results::try_handle(state, &req) {
        return resp;
    }

    tracing::debug!(method = %req.method, "unknown method");
    err(
        &req.id,
        "not_implemented",
        format!("unknown method: {}", req.method),
        None,
    )
}

/// One protocol line in, one response out. Blank lines yield `None`.
pub fn handle_line(state: &mut AppState, line: &str) -> Option<serde_json::Value> {
    if line.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Request>(line) {
        Ok(req) => Some(handle_request(state, req)),
        Err(e) => {
            // Can't reply without id.
            tracing::warn!(error = %e, "unparsable request line");
            Some(bad_json(e.to_string()))
        }
    }
}

/// Runs the JSON-lines loop until the input closes. A line that is not valid
/// UTF-8 gets a `bad_json` reply and the loop keeps going.
pub fn serve<R, W>(state: &mut AppState, input: R, mut output: W) -> std::io::Result<()>
where
    R: BufRead,
    W: Write,
{
    for raw in input.split(b'\n') {
        let mut raw = raw?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        let resp = match String::from_utf8(raw) {
            Ok(line) => handle_line(state, &line),
            Err(e) => {
                tracing::warn!(error = %e, "request line is not valid utf-8");
                Some(bad_json(format!("request line is not valid UTF-8: {}", e)))
            }
        };
        let Some(resp) = resp else {
            continue;
        };
        writeln!(output, "{}", resp)?;
        output.flush()?;
    }
    Ok(())
}
