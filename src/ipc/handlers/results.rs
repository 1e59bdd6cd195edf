use crate::ipc::error::ok;
use crate::ipc::helpers::{
    attach_item_errors, get_required_array, item_error, reject_over_limit, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::results::{self, AssessmentTestRecord};
use serde_json::json;

struct ParsedRecords {
    records: Vec<AssessmentTestRecord>,
    /// Input position of each entry in `records`.
    indices: Vec<usize>,
    errors: Vec<serde_json::Value>,
}

/// Parses `params.records`, collecting per-index errors for malformed entries.
fn parse_records(state: &AppState, req: &Request) -> Result<ParsedRecords, serde_json::Value> {
    let raw = get_required_array(&req.params, "records").map_err(|e| e.response(&req.id))?;
    if let Some(resp) = reject_over_limit(&req.id, raw.len(), state.config.max_batch_items) {
        return Err(resp);
    }

    let mut records = Vec::with_capacity(raw.len());
    let mut indices = Vec::with_capacity(raw.len());
    let mut errors = Vec::new();
    for (i, item) in raw.iter().enumerate() {
        match serde_json::from_value::<AssessmentTestRecord>(item.clone()) {
            Ok(r) => {
                records.push(r);
                indices.push(i);
            }
            Err(e) => errors.push(item_error(
                i,
                HandlerErr::bad_params(format!("record at index {}: {}", i, e)),
            )),
        }
    }
    Ok(ParsedRecords {
        records,
        indices,
        errors,
    })
}

fn handle_annotate(state: &mut AppState, req: &Request) -> serde_json::Value {
    let parsed = match parse_records(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let graded: Vec<serde_json::Value> = results::grade_records(&parsed.records)
        .into_iter()
        .zip(&parsed.indices)
        .map(|(g, &i)| {
            let mut v = json!(g);
            v["index"] = json!(i);
            v
        })
        .collect();
    let mut result = json!({ "records": graded });
    attach_item_errors(&mut result, parsed.errors);
    ok(&req.id, result)
}

fn handle_batch_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let batch_id = match req.params.get("batchId") {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(_) => {
            return HandlerErr::bad_params("batchId must be a string, number or null")
                .response(&req.id)
        }
    };
    let parsed = match parse_records(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let summary = results::summarize_batch(batch_id.as_deref(), &parsed.records);
    let mut result = json!(summary);
    attach_item_errors(&mut result, parsed.errors);
    ok(&req.id, result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "results.annotate" => Some(handle_annotate(state, req)),
        "batches.summary" => Some(handle_batch_summary(state, req)),
        _ => None,
    }
}
