use axum::{extract::Query, Json};
use serde_json::{json, Value};
use tracing::debug;

use crate::models::ClassifyQuery;
use crate::services::classify;

/// Debug view of the classifier: intent, individual flags and department.
#[axum::debug_handler]
pub async fn classify_text(Query(query): Query<ClassifyQuery>) -> Json<Value> {
    let result = classify(&query.text);
    debug!("Classified text as {}", result.intent);

    let (dept_code, dept_name) = match &result.department {
        Some(department) => (Some(department.code.clone()), Some(department.name.clone())),
        None => (None, None),
    };

    Json(json!({
        "text": query.text,
        "intent": result.intent,
        "urgent": result.urgent,
        "lab": result.lab,
        "dept_code": dept_code,
        "dept_name": dept_name,
    }))
}
