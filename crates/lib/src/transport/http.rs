//! The one-shot request/response surface.
//!
//! HTTP methods map directly onto verbs: GET fetches, POST replaces,
//! PUT appends, DELETE removes. The URL path below `/api` is the
//! request path; the request body, when present, is the opaque payload.
//! Success returns the result payload as JSON; any engine error comes
//! back as a 500 with the error description, which is what the display
//! clients expect.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::value::RawValue;

use crate::{
    engine::EngineError,
    node::NodeError,
    protocol::{Request, Verb},
};

use super::AppState;

pub(super) async fn dispatch_root(
    State(app): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    dispatch(app, method, String::new(), body).await
}

pub(super) async fn dispatch_path(
    State(app): State<AppState>,
    Path(path): Path<String>,
    method: Method,
    body: Bytes,
) -> Response {
    dispatch(app, method, path, body).await
}

async fn dispatch(app: AppState, method: Method, path: String, body: Bytes) -> Response {
    let verb = match verb_for(&method) {
        Ok(verb) => verb,
        Err(e) => return failure(e.to_string()),
    };

    let segments: Vec<String> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    let mut request = Request::new(verb, segments);
    if !body.is_empty() {
        request.body = match parse_body(&body) {
            Ok(raw) => Some(raw),
            Err(e) => return failure(e.to_string()),
        };
    }

    match app.state.request(request).await {
        Ok(completed) => {
            if let Some(error) = &completed.error {
                return failure(error.clone());
            }
            match &completed.response {
                Some(payload) => (
                    [(header::CONTENT_TYPE, "application/json")],
                    payload.get().to_string(),
                )
                    .into_response(),
                // A successful Remove has no payload.
                None => StatusCode::OK.into_response(),
            }
        }
        Err(e) => failure(e.to_string()),
    }
}

fn verb_for(method: &Method) -> Result<Verb, EngineError> {
    match method.as_str() {
        "GET" => Ok(Verb::Fetch),
        "POST" => Ok(Verb::Replace),
        "PUT" => Ok(Verb::Append),
        "DELETE" => Ok(Verb::Remove),
        other => Err(EngineError::UnsupportedVerb {
            verb: other.to_string(),
        }),
    }
}

/// Bodies ride through the engine as raw JSON; reject byte soup here so
/// the rest of the pipeline can assume well-formed payloads.
fn parse_body(bytes: &Bytes) -> Result<Box<RawValue>, NodeError> {
    serde_json::from_slice(bytes).map_err(|e| NodeError::MalformedBody {
        reason: e.to_string(),
    })
}

fn failure(message: String) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}
