use std::sync::Arc;

use futures::StreamExt;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};
use uuid::Uuid;

use crate::content_schema::{recover_partial_content, validate_generated_content};
use crate::llm_handler::LlmClient;
use crate::llm_output::{parse_llm_json, JsonShape};

// Progress is reported once per this many streamed chunks
pub const PROGRESS_EVERY: usize = 50;
// Typical reply length in chunks, used to estimate progress
const EXPECTED_CHUNKS: usize = 800;

/// Event pushed to the browser while a library is being generated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GenerationEvent {
    Status {
        message: String,
    },
    Progress {
        progress: u32,
        message: String,
    },
    Chunk {
        text: String,
    },
    Complete {
        content: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        warnings: Option<Vec<String>>,
    },
    Error {
        error: String,
    },
}

impl GenerationEvent {
    pub fn status(message: impl Into<String>) -> Self {
        GenerationEvent::Status { message: message.into() }
    }

    pub fn error(error: impl Into<String>) -> Self {
        GenerationEvent::Error { error: error.into() }
    }

    /// Server-sent event frame: `data: <json>\n\n`.
    pub fn to_sse_frame(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => format!("data: {}\n\n", json),
            Err(e) => format!("data: {{\"type\":\"error\",\"error\":\"{}\"}}\n\n", e),
        }
    }
}

pub fn estimate_progress(chunks: usize) -> u32 {
    (chunks * 100 / EXPECTED_CHUNKS).min(90) as u32
}

/// Incremental decoder for an incoming `text/event-stream` body.
///
/// Bytes are buffered until a blank line completes an event; each completed
/// event yields the joined contents of its `data:` lines.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend(bytes.iter().filter(|&&b| b != b'\r'));

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let block: Vec<u8> = self.buffer.drain(..pos + 2).collect();
            let block = String::from_utf8_lossy(&block);

            let data: Vec<&str> = block
                .lines()
                .filter_map(|line| line.strip_prefix("data:"))
                .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
                .collect();
            if !data.is_empty() {
                events.push(data.join("\n"));
            }
        }
        events
    }
}

/// Run a library generation in the background and return the stream of
/// framed events for the HTTP response.
pub fn spawn_generation(
    llm: Arc<dyn LlmClient>,
    prompt: String,
    max_tokens: u32,
    company: String,
) -> ReceiverStream<String> {
    let (tx, rx) = mpsc::channel(100);

    tokio::spawn(async move {
        let generation_id = Uuid::new_v4();
        info!("Streaming generation {} started for {}", generation_id, company);
        run_generation(llm.as_ref(), &prompt, max_tokens, &tx).await;
        info!("Streaming generation {} finished", generation_id);
    });

    ReceiverStream::new(rx)
}

async fn send(tx: &mpsc::Sender<String>, event: GenerationEvent) -> bool {
    tx.send(event.to_sse_frame()).await.is_ok()
}

async fn run_generation(llm: &dyn LlmClient, prompt: &str, max_tokens: u32, tx: &mpsc::Sender<String>) {
    if !send(tx, GenerationEvent::status("Starting content generation...")).await {
        return;
    }

    let mut stream = match llm.complete_stream(prompt, max_tokens).await {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Failed to start generation stream: {}", e);
            send(tx, GenerationEvent::error(e.to_string())).await;
            return;
        }
    };

    let mut full_text = String::new();
    let mut chunks = 0usize;

    while let Some(item) = stream.next().await {
        let text = match item {
            Ok(text) => text,
            Err(e) => {
                warn!("Generation stream failed after {} chunks: {}", chunks, e);
                send(tx, GenerationEvent::error(e.to_string())).await;
                return;
            }
        };

        full_text.push_str(&text);
        chunks += 1;

        if chunks % PROGRESS_EVERY == 0 {
            let progress = GenerationEvent::Progress {
                progress: estimate_progress(chunks),
                message: format!("Generating content... ({} tokens)", chunks),
            };
            if !send(tx, progress).await {
                return;
            }
        }

        // Client went away
        if !send(tx, GenerationEvent::Chunk { text }).await {
            return;
        }
    }

    if !send(tx, GenerationEvent::status("Parsing generated content...")).await {
        return;
    }

    let parsed = match parse_llm_json(&full_text, JsonShape::Object) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Streamed content did not parse: {}", e);
            send(tx, GenerationEvent::error("Failed to parse generated content")).await;
            return;
        }
    };

    let complete = match validate_generated_content(&parsed) {
        Ok(content) => GenerationEvent::Complete {
            content: serde_json::to_value(content).unwrap_or(parsed),
            warnings: None,
        },
        Err(errors) => {
            warn!("Streamed content failed validation with {} errors", errors.len());
            let content = recover_partial_content(&parsed)
                .and_then(|recovered| serde_json::to_value(recovered).ok())
                .unwrap_or(parsed);
            GenerationEvent::Complete { content, warnings: Some(errors) }
        }
    };
    send(tx, complete).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LlmError;
    use crate::llm_handler::mock::ScriptedLlm;
    use serde_json::json;

    #[test]
    fn test_event_frames() {
        let frame = GenerationEvent::Chunk { text: "Hi".to_string() }.to_sse_frame();
        assert_eq!(frame, "data: {\"type\":\"chunk\",\"text\":\"Hi\"}\n\n");

        let complete = GenerationEvent::Complete { content: json!({}), warnings: None };
        assert_eq!(complete.to_sse_frame(), "data: {\"type\":\"complete\",\"content\":{}}\n\n");
    }

    #[test]
    fn test_estimate_progress_caps_at_ninety() {
        assert_eq!(estimate_progress(50), 6);
        assert_eq!(estimate_progress(400), 50);
        assert_eq!(estimate_progress(5000), 90);
    }

    #[test]
    fn test_decoder_handles_split_frames() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"event: ping\ndata: {\"a\"").is_empty());
        let events = decoder.push(b":1}\r\n\r\ndata: second\n\n: comment only\n\n");
        assert_eq!(events, vec!["{\"a\":1}".to_string(), "second".to_string()]);
    }

    fn decode(frames: &[String]) -> Vec<Value> {
        frames
            .iter()
            .map(|frame| {
                let json = frame.strip_prefix("data: ").unwrap().trim_end();
                serde_json::from_str(json).unwrap()
            })
            .collect()
    }

    #[actix_web::test]
    async fn test_generation_stream_reports_progress_and_completion() {
        let reply = json!({"linkedin": [{"id": 1, "title": "T", "pillar": "Engagement", "content": "Body"}]}).to_string();
        let pieces: Vec<String> = reply.chars().map(|c| c.to_string()).collect();
        let llm = Arc::new(ScriptedLlm::streaming(pieces.clone()));

        let frames: Vec<String> = spawn_generation(llm, "prompt".to_string(), 100, "Acme".to_string())
            .collect()
            .await;
        let events = decode(&frames);

        assert_eq!(events[0]["type"], "status");
        let chunk_count = events.iter().filter(|e| e["type"] == "chunk").count();
        assert_eq!(chunk_count, pieces.len());
        let progress = events.iter().filter(|e| e["type"] == "progress").count();
        assert_eq!(progress, pieces.len() / PROGRESS_EVERY);

        let last = events.last().unwrap();
        assert_eq!(last["type"], "complete");
        assert_eq!(last["content"]["linkedin"][0]["title"], "T");
        assert!(last["warnings"].as_array().is_some());
    }

    #[actix_web::test]
    async fn test_generation_stream_reports_start_failure() {
        let llm = Arc::new(ScriptedLlm::failing(LlmError::RateLimited));
        let frames: Vec<String> = spawn_generation(llm, "p".to_string(), 10, "Acme".to_string())
            .collect()
            .await;
        let events = decode(&frames);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["type"], "status");
        assert_eq!(events[1]["type"], "error");
        assert_eq!(events[1]["error"], "Rate limited by provider");
    }

    #[actix_web::test]
    async fn test_generation_stream_reports_mid_stream_failure() {
        let chunks = vec!["{\"linkedin\": [".to_string(), "{\"title\"".to_string()];
        let llm = Arc::new(ScriptedLlm::interrupted(
            chunks,
            LlmError::Stream("connection reset".to_string()),
        ));
        let frames: Vec<String> = spawn_generation(llm, "p".to_string(), 10, "Acme".to_string())
            .collect()
            .await;
        let events = decode(&frames);

        assert_eq!(events.iter().filter(|e| e["type"] == "chunk").count(), 2);
        assert!(events.iter().all(|e| e["type"] != "complete"));
        let last = events.last().unwrap();
        assert_eq!(last["type"], "error");
        assert_eq!(last["error"], "Stream error: connection reset");
    }

    #[actix_web::test]
    async fn test_generation_stream_reports_parse_failure() {
        let llm = Arc::new(ScriptedLlm::streaming(vec!["not json".to_string()]));
        let frames: Vec<String> = spawn_generation(llm, "p".to_string(), 10, "Acme".to_string())
            .collect()
            .await;
        let events = decode(&frames);

        let last = events.last().unwrap();
        assert_eq!(last["type"], "error");
        assert_eq!(last["error"], "Failed to parse generated content");
    }
}
