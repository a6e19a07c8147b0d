//! Structured query requests and responses spoken by the transports.
//!
//! A request is one JSON object tagged by `query`:
//!
//! ```text
//! {"query":"models","filter":{"nameContains":"qwen"},"limit":10,"offset":0}
//! {"query":"model","name":"llama3.1"}
//! {"query":"capabilities"}
//! {"query":"sizes"}
//! {"query":"reload"}
//! ```
//!
//! Each produces either `{"data": ...}` or `{"errors":[{"message": ...}]}`.
//! Streams are NDJSON; blank lines are skipped and a malformed line yields an
//! error response rather than ending the stream.

use crate::catalog::{ModelEntry, QueryError};
use crate::filter::FilterSpec;
use crate::query::{CatalogQuery, ModelsPage};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum Request {
    Models {
        #[serde(default)]
        filter: Option<FilterSpec>,
        #[serde(default)]
        limit: Option<i64>,
        #[serde(default)]
        offset: Option<i64>,
    },
    Model {
        name: String,
    },
    Capabilities,
    Sizes,
    Reload,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Data { data: Payload },
    Errors { errors: Vec<ErrorMessage> },
}

/// Successful result of a request. `Model(None)` serializes as `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Page(ModelsPage),
    Model(Option<ModelEntry>),
    Values(Vec<String>),
    Reloaded(ReloadSummary),
}

/// Metadata of the snapshot published by a `reload` request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadSummary {
    pub last_updated: String,
    pub total_pages: u64,
    pub total_models: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

/// Counters reported when a stream ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ServeStats {
    pub requests: usize,
    pub failures: usize,
}

impl Request {
    fn label(&self) -> &'static str {
        match self {
            Request::Models { .. } => "models",
            Request::Model { .. } => "model",
            Request::Capabilities => "capabilities",
            Request::Sizes => "sizes",
            Request::Reload => "reload",
        }
    }
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Errors {
            errors: vec![ErrorMessage {
                message: message.into(),
            }],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Errors { .. })
    }
}

/// Run one request against the facade.
pub fn dispatch(query: &CatalogQuery, request: &Request) -> Result<Payload, QueryError> {
    let payload = match request {
        Request::Models {
            filter,
            limit,
            offset,
        } => Payload::Page(query.list(filter.as_ref(), *limit, *offset)?),
        Request::Model { name } => Payload::Model(query.get_by_name(name)?),
        Request::Capabilities => Payload::Values(query.unique_capabilities()?),
        Request::Sizes => Payload::Values(query.unique_sizes()?),
        Request::Reload => {
            // Re-read right away so the operator sees a broken dataset now
            // rather than on the next query.
            query.reload();
            let snapshot = query.get_all()?;
            Payload::Reloaded(ReloadSummary {
                last_updated: snapshot.last_updated.clone(),
                total_pages: snapshot.total_pages,
                total_models: snapshot.len(),
            })
        }
    };
    Ok(payload)
}

/// Parse and answer a single request line.
pub fn handle_line(query: &CatalogQuery, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(err) => return Response::error(format!("invalid request: {err}")),
    };
    debug!(query = request.label(), "dispatching request");
    match dispatch(query, &request) {
        Ok(data) => Response::Data { data },
        Err(err) => {
            warn!(query = request.label(), error = %err, "request failed");
            Response::error(err.to_string())
        }
    }
}

/// Answer every NDJSON request from `reader`, one response line per request.
pub fn serve_lines<R: BufRead, W: Write>(
    query: &CatalogQuery,
    reader: R,
    mut writer: W,
) -> io::Result<ServeStats> {
    let mut stats = ServeStats::default();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let response = handle_line(query, trimmed);
        stats.requests += 1;
        if response.is_error() {
            stats.failures += 1;
        }
        serde_json::to_writer(&mut writer, &response)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    Ok(stats)
}
