use crate::grading::{self, thresholds};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{
    attach_item_errors, get_required_array, get_required_str, item_error, reject_over_limit,
    result_value_text, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn classify_params(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let code = get_required_str(params, "code")?;
    let result_value = result_value_text(params.get("resultValue"))?;
    let graded = grading::grade_detailed(code, result_value.as_deref());
    let mut out = json!({
        "code": code,
        "rank": graded.rank.code(),
        "result": graded.rank.label(),
    });
    if let Some(v) = graded.value {
        out["normalizedValue"] = json!(v);
    }
    Ok(out)
}

fn handle_thresholds_list(_state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "testTypes": thresholds::catalog(),
            "fingerprint": thresholds::fingerprint(),
        }),
    )
}

fn handle_thresholds_get(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let code = match get_required_str(&req.params, "code") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    match thresholds::test_type(code) {
        Some(t) => ok(&req.id, json!({ "testType": t })),
        None => err(
            &req.id,
            "not_found",
            "test type not found",
            Some(json!({ "code": code })),
        ),
    }
}

fn handle_classify(_state: &mut AppState, req: &Request) -> serde_json::Value {
    match classify_params(&req.params) {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}

fn handle_classify_many(state: &mut AppState, req: &Request) -> serde_json::Value {
    let items = match get_required_array(&req.params, "items") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    if let Some(resp) = reject_over_limit(&req.id, items.len(), state.config.max_batch_items) {
        return resp;
    }

    let mut results: Vec<serde_json::Value> = Vec::with_capacity(items.len());
    let mut errors: Vec<serde_json::Value> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if !item.is_object() {
            errors.push(item_error(
                i,
                HandlerErr::bad_params(format!("item at index {} must be an object", i)),
            ));
            continue;
        }
        match classify_params(item) {
            Ok(mut v) => {
                v["index"] = json!(i);
                results.push(v);
            }
            Err(e) => errors.push(item_error(i, e)),
        }
    }

    let mut result = json!({ "results": results });
    attach_item_errors(&mut result, errors);
    ok(&req.id, result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grading.thresholds.list" => Some(handle_thresholds_list(state, req)),
        "grading.thresholds.get" => Some(handle_thresholds_get(state, req)),
        "grading.classify" => Some(handle_classify(state, req)),
        "grading.classifyMany" => Some(handle_classify_many(state, req)),
        _ => None,
    }
}
