//! Asynchronous batch strategy: build a request log, submit it as one unit
//! of work, poll the job, retrieve the response log.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    classify::{
        client::{http_client, ChatMessage, ChatRequest},
        join, prompt,
    },
    config::Settings,
    data::reviews::ReviewRecord,
};

/// Endpoint every request-log line targets.
const BATCH_ENDPOINT: &str = "/v1/chat/completions";
/// Completion window requested for batch jobs.
const COMPLETION_WINDOW: &str = "24h";

/// Terminal failures of a batch job. Fatal for the submission: the operator
/// resubmits, the client never does.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("batch {id} expired before completing")]
    Expired { id: String },
    #[error("batch {id} failed: {detail}")]
    Failed { id: String, detail: String },
    #[error("batch {id} was cancelled")]
    Cancelled { id: String },
    #[error("batch {id} still {status} after {waited_secs}s; treating the job as stuck")]
    TimedOut {
        id: String,
        status: String,
        waited_secs: u64,
    },
}

/// One line of the newline-delimited request log.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchRequestLine {
    pub custom_id: String,
    pub method: String,
    pub url: String,
    pub body: ChatRequest,
}

/// Batch job state as reported by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchJob {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub output_file_id: Option<String>,
    #[serde(default)]
    pub error_file_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileObject {
    id: String,
}

/// Build the JSONL request log, one line per review, each tagged with the
/// review's correlation identifier and requesting deterministic decoding.
pub fn build_request_log(reviews: &[ReviewRecord], model: &str) -> Result<String> {
    let mut log = String::new();
    for review in reviews {
        let line = BatchRequestLine {
            custom_id: join::correlation_id(review.index),
            method: "POST".to_string(),
            url: BATCH_ENDPOINT.to_string(),
            body: ChatRequest {
                model: model.to_string(),
                messages: vec![
                    ChatMessage::system(prompt::SYSTEM_PROMPT),
                    ChatMessage::user(prompt::build_prompt(&review.text)),
                ],
                temperature: 0.0,
            },
        };
        log.push_str(&serde_json::to_string(&line)?);
        log.push('\n');
    }
    Ok(log)
}

/// Upload the request log and create the batch job.
pub async fn submit(reviews: &[ReviewRecord], settings: &Settings) -> Result<BatchJob> {
    let api_key = settings.require_api_key()?.to_string();
    let client = http_client()?;
    let log = build_request_log(reviews, &settings.openai_model)?;

    let part = multipart::Part::text(log)
        .file_name("batch_input.jsonl")
        .mime_str("application/jsonl")?;
    let form = multipart::Form::new()
        .text("purpose", "batch")
        .part("file", part);
    let upload: FileObject = client
        .post(format!("{}/files", settings.openai_base_url))
        .bearer_auth(&api_key)
        .multipart(form)
        .send()
        .await
        .context("upload batch request log")?
        .error_for_status()
        .context("upload batch request log")?
        .json()
        .await
        .context("decode file upload response")?;
    info!(file_id = %upload.id, reviews = reviews.len(), "uploaded batch request log");

    let body = serde_json::json!({
        "input_file_id": upload.id,
        "endpoint": BATCH_ENDPOINT,
        "completion_window": COMPLETION_WINDOW,
        "metadata": {
            "description": format!(
                "MoT review classification batch submitted {}",
                Utc::now().to_rfc3339()
            ),
        },
    });
    let job: BatchJob = client
        .post(format!("{}/batches", settings.openai_base_url))
        .bearer_auth(&api_key)
        .json(&body)
        .send()
        .await
        .context("create batch job")?
        .error_for_status()
        .context("create batch job")?
        .json()
        .await
        .context("decode batch job response")?;
    info!(batch_id = %job.id, status = %job.status, "created batch job");
    Ok(job)
}

/// Fetch the current job state.
pub async fn job_status(batch_id: &str, settings: &Settings) -> Result<BatchJob> {
    let api_key = settings.require_api_key()?.to_string();
    let client = http_client()?;
    let job: BatchJob = client
        .get(format!("{}/batches/{batch_id}", settings.openai_base_url))
        .bearer_auth(&api_key)
        .send()
        .await
        .context("fetch batch status")?
        .error_for_status()
        .context("fetch batch status")?
        .json()
        .await
        .context("decode batch status")?;
    Ok(job)
}

/// Poll the job at a fixed interval until it completes, fails terminally or
/// exceeds the operator timeout. A stuck job is surfaced as an error, never
/// silently abandoned.
pub async fn wait_for_completion(batch_id: &str, settings: &Settings) -> Result<BatchJob> {
    let interval = settings.batch_poll_interval();
    let timeout = settings.batch_timeout();
    let mut waited = Duration::ZERO;
    loop {
        let job = job_status(batch_id, settings).await?;
        match job.status.as_str() {
            "completed" => return Ok(job),
            "expired" => return Err(BatchError::Expired { id: job.id }.into()),
            "failed" => {
                let detail = job
                    .error_file_id
                    .clone()
                    .map(|file| format!("see error file {file}"))
                    .unwrap_or_else(|| "see service dashboard".to_string());
                return Err(BatchError::Failed { id: job.id, detail }.into());
            }
            "cancelling" | "cancelled" => {
                return Err(BatchError::Cancelled { id: job.id }.into())
            }
            status => {
                if waited >= timeout {
                    return Err(BatchError::TimedOut {
                        id: job.id,
                        status: status.to_string(),
                        waited_secs: waited.as_secs(),
                    }
                    .into());
                }
                info!(
                    batch_id,
                    %status,
                    waited_secs = waited.as_secs(),
                    "batch not finished, polling again"
                );
                sleep(interval).await;
                waited += interval;
            }
        }
    }
}

/// Download the newline-delimited response log of a completed job.
pub async fn fetch_output(job: &BatchJob, settings: &Settings) -> Result<String> {
    let api_key = settings.require_api_key()?.to_string();
    let output_file_id = job
        .output_file_id
        .as_deref()
        .context("completed batch carries no output file id")?;
    let client = http_client()?;
    let text = client
        .get(format!(
            "{}/files/{output_file_id}/content",
            settings.openai_base_url
        ))
        .bearer_auth(&api_key)
        .send()
        .await
        .context("download batch output")?
        .error_for_status()
        .context("download batch output")?
        .text()
        .await
        .context("read batch output")?;
    info!(bytes = text.len(), "downloaded batch output");
    Ok(text)
}

/// Extract `(correlation id, completion content)` from every response line.
///
/// A line whose embedded completion cannot be located still surfaces its
/// correlation id with empty content, so validation degrades that review
/// instead of dropping it and table row counts stay predictable.
pub fn parse_response_log(log_text: &str) -> Vec<(String, String)> {
    let mut results = Vec::new();
    for line in log_text.lines().filter(|line| !line.trim().is_empty()) {
        let Ok(item) = serde_json::from_str::<Value>(line) else {
            warn!("skipping unparseable batch output line");
            continue;
        };
        let Some(custom_id) = item.get("custom_id").and_then(Value::as_str) else {
            warn!("batch output line carries no custom_id, skipping");
            continue;
        };
        let content = item
            .pointer("/response/body/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        results.push((custom_id.to_string(), content));
    }
    results
}

/// Persist the submitted batch id so `retrieve` can default to it.
pub fn remember_batch_id(batch_id: &str, settings: &Settings) -> Result<()> {
    let path = settings.join_data("batches/last_batch_id");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, batch_id).with_context(|| format!("write {path:?}"))?;
    Ok(())
}

/// Most recently submitted batch id, if any.
pub fn last_batch_id(settings: &Settings) -> Result<String> {
    let path = settings.join_data("batches/last_batch_id");
    let id = std::fs::read_to_string(&path).with_context(|| format!("read {path:?}"))?;
    Ok(id.trim().to_string())
}
