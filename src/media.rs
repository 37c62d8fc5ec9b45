//! Generative media service: text, image and video generation.
//!
//! The diagram never talks HTTP directly. It owns a [`MediaSession`] which
//! runs each request on a background thread, enforces single-flight per
//! request kind, and stamps every result with a generation counter so a
//! response settling after a simulation reset is discarded instead of
//! resurrecting old state.
//!
//! Video generation is a long-running operation on the wire: submit, poll
//! until done, then fetch the playable URL. [`generate_video`] wraps that
//! protocol behind one blocking call so the polling loop never leaks into UI
//! code.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// How often a pending video operation is re-polled.
pub const VIDEO_POLL_INTERVAL: Duration = Duration::from_secs(5);

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Failure of an external media-generation call. Always recovered locally:
/// surfaced as a console line and a "failed" slot state, never a crash.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Expired or invalid credential. Triggers a one-shot re-authentication
    /// prompt before surfacing as a hard failure.
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("quota exhausted: {0}")]
    Quota(String),
    #[error("request failed: {0}")]
    Http(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ServiceError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ServiceError::Auth(_))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Backend contract
// ────────────────────────────────────────────────────────────────────────────

/// Requested output resolution for image generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    K1,
    K2,
    K4,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::K1 => "1K",
            ImageSize::K2 => "2K",
            ImageSize::K4 => "4K",
        }
    }
}

/// Aspect ratio for video generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Wide16x9,
    Tall9x16,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Wide16x9 => "16:9",
            AspectRatio::Tall9x16 => "9:16",
        }
    }
}

/// Server-side handle for a long-running video generation operation.
#[derive(Debug, Clone)]
pub struct VideoOperation {
    /// Operation resource name used for polling.
    pub name: String,
    pub done: bool,
    /// Video URI, present once `done` is true and generation succeeded.
    pub uri: Option<String>,
}

/// The external generative backend. Implemented over HTTP in production
/// ([`GeminiClient`]) and by mocks in tests.
pub trait GenerativeBackend: Send + Sync {
    /// Generate a short text completion for `prompt`, grounded in `context`.
    fn generate_text(&self, prompt: &str, context: &str) -> Result<String, ServiceError>;

    /// Generate an image; returns a `data:` URL, or `None` when the model
    /// produced no image part.
    fn generate_image(&self, prompt: &str, size: ImageSize)
    -> Result<Option<String>, ServiceError>;

    /// Submit a video generation request, returning the operation handle.
    fn submit_video(
        &self,
        prompt: &str,
        source_image: Option<&str>,
        aspect: AspectRatio,
    ) -> Result<VideoOperation, ServiceError>;

    /// Refresh the state of a pending operation.
    fn poll_video(&self, op: &VideoOperation) -> Result<VideoOperation, ServiceError>;

    /// Resolve a completed operation to a playable URL, or `None` when the
    /// operation finished without output.
    fn fetch_video_url(&self, op: &VideoOperation) -> Result<Option<String>, ServiceError>;
}

/// Drive a video generation to completion: submit, poll every
/// `poll_interval` until done, then fetch the URL. Blocking; intended to run
/// on a worker thread.
pub fn generate_video(
    backend: &dyn GenerativeBackend,
    prompt: &str,
    source_image: Option<&str>,
    aspect: AspectRatio,
    poll_interval: Duration,
) -> Result<Option<String>, ServiceError> {
    let mut op = backend.submit_video(prompt, source_image, aspect)?;
    while !op.done {
        std::thread::sleep(poll_interval);
        op = backend.poll_video(&op)?;
    }
    backend.fetch_video_url(&op)
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini HTTP backend
// ────────────────────────────────────────────────────────────────────────────

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const TEXT_MODEL: &str = "gemini-2.5-flash";
const IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}

#[derive(Debug, Deserialize)]
struct OperationResponse {
    name: String,
    #[serde(default)]
    done: bool,
    response: Option<VideoResult>,
}

#[derive(Debug, Deserialize)]
struct VideoResult {
    #[serde(rename = "generatedVideos", default)]
    generated_videos: Vec<GeneratedVideo>,
}

#[derive(Debug, Deserialize)]
struct GeneratedVideo {
    video: Option<VideoRef>,
}

#[derive(Debug, Deserialize)]
struct VideoRef {
    uri: Option<String>,
}

/// Blocking HTTP client for the Gemini generative API.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Override the API host, mainly for tests against a local server.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    fn post(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value, ServiceError> {
        let url = format!("{}/{}", self.base_url, path);
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        Self::check_status(resp)
    }

    fn get(&self, path: &str) -> Result<serde_json::Value, ServiceError> {
        let url = format!("{}/{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        Self::check_status(resp)
    }

    fn check_status(resp: reqwest::blocking::Response) -> Result<serde_json::Value, ServiceError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ServiceError::Auth(format!("HTTP {status}")));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ServiceError::Quota(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(ServiceError::Http(format!("HTTP {status}")));
        }
        resp.json().map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

impl GenerativeBackend for GeminiClient {
    fn generate_text(&self, prompt: &str, context: &str) -> Result<String, ServiceError> {
        let full_prompt = format!(
            "You are an assistant narrating a data-platform walkthrough.\n\n\
             Context:\n{context}\n\n\
             Request: {prompt}\n\n\
             Answer concisely (max 2 sentences) based strictly on the context."
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": full_prompt }] }],
        });
        let value = self.post(&format!("models/{TEXT_MODEL}:generateContent"), body)?;
        let parsed: GenerateContentResponse =
            serde_json::from_value(value).map_err(|e| ServiceError::Decode(e.to_string()))?;
        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() {
            Err(ServiceError::Decode("no text in response".into()))
        } else {
            Ok(text)
        }
    }

    fn generate_image(
        &self,
        prompt: &str,
        size: ImageSize,
    ) -> Result<Option<String>, ServiceError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "imageConfig": { "aspectRatio": "1:1", "imageSize": size.as_str() },
            },
        });
        let value = self.post(&format!("models/{IMAGE_MODEL}:generateContent"), body)?;
        let parsed: GenerateContentResponse =
            serde_json::from_value(value).map_err(|e| ServiceError::Decode(e.to_string()))?;
        let image = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.inline_data)
            .map(|d| format!("data:image/png;base64,{}", d.data));
        Ok(image)
    }

    fn submit_video(
        &self,
        prompt: &str,
        source_image: Option<&str>,
        aspect: AspectRatio,
    ) -> Result<VideoOperation, ServiceError> {
        let mut instance = serde_json::json!({ "prompt": prompt });
        if let Some(img) = source_image {
            instance["image"] = serde_json::json!({
                "bytesBase64Encoded": img,
                "mimeType": "image/png",
            });
        }
        let body = serde_json::json!({
            "instances": [instance],
            "parameters": {
                "sampleCount": 1,
                "resolution": "720p",
                "aspectRatio": aspect.as_str(),
            },
        });
        let value = self.post(&format!("models/{VIDEO_MODEL}:predictLongRunning"), body)?;
        let op: OperationResponse =
            serde_json::from_value(value).map_err(|e| ServiceError::Decode(e.to_string()))?;
        Ok(Self::to_operation(op))
    }

    fn poll_video(&self, op: &VideoOperation) -> Result<VideoOperation, ServiceError> {
        let value = self.get(&op.name)?;
        let parsed: OperationResponse =
            serde_json::from_value(value).map_err(|e| ServiceError::Decode(e.to_string()))?;
        Ok(Self::to_operation(parsed))
    }

    fn fetch_video_url(&self, op: &VideoOperation) -> Result<Option<String>, ServiceError> {
        Ok(op
            .uri
            .as_ref()
            .map(|uri| format!("{uri}&key={}", self.api_key)))
    }
}

impl GeminiClient {
    fn to_operation(op: OperationResponse) -> VideoOperation {
        let uri = op
            .response
            .as_ref()
            .and_then(|r| r.generated_videos.first())
            .and_then(|v| v.video.as_ref())
            .and_then(|v| v.uri.clone());
        VideoOperation {
            name: op.name,
            done: op.done,
            uri,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Media session (single-flight, generation-stamped)
// ────────────────────────────────────────────────────────────────────────────

/// The kind of media a request produces. One slot exists per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Text,
    Image,
    Video,
}

/// A settled result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaArtifact {
    Text(String),
    /// `data:` URL, or `None` when the model produced nothing.
    Image(Option<String>),
    /// Playable URL, or `None` when the operation finished without output.
    Video(Option<String>),
}

/// Visible state of a request slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    Pending,
    Ready(MediaArtifact),
    Failed(String),
}

/// Event surfaced to the host when a poll settles a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    Ready(MediaKind),
    Failed(MediaKind, String),
    /// Credential rejected; the host should prompt for a new key once.
    AuthRequired(MediaKind),
}

struct Slot {
    state: SlotState,
    rx: Option<Receiver<(u64, Result<MediaArtifact, ServiceError>)>>,
}

/// Owns all outstanding media requests for the diagram.
///
/// Single-flight: a request for a kind whose slot is already pending is
/// suppressed, not queued. Stale protection: every worker result carries the
/// generation it was started under; [`MediaSession::invalidate`] bumps the
/// generation so late results are dropped on arrival.
pub struct MediaSession {
    backend: Arc<dyn GenerativeBackend>,
    generation: u64,
    slots: HashMap<MediaKind, Slot>,
    reauth_offered: bool,
}

impl MediaSession {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            backend,
            generation: 0,
            slots: HashMap::new(),
            reauth_offered: false,
        }
    }

    /// Swap the backend (e.g. after re-authentication) and re-arm the
    /// one-shot auth prompt.
    pub fn set_backend(&mut self, backend: Arc<dyn GenerativeBackend>) {
        self.backend = backend;
        self.reauth_offered = false;
    }

    pub fn state(&self, kind: MediaKind) -> SlotState {
        self.slots
            .get(&kind)
            .map(|s| s.state.clone())
            .unwrap_or(SlotState::Empty)
    }

    pub fn is_pending(&self, kind: MediaKind) -> bool {
        matches!(self.state(kind), SlotState::Pending)
    }

    /// Artifact for a kind, if one is ready.
    pub fn artifact(&self, kind: MediaKind) -> Option<MediaArtifact> {
        match self.state(kind) {
            SlotState::Ready(a) => Some(a),
            _ => None,
        }
    }

    /// Drop all results and suppress any outstanding ones. Pending worker
    /// threads keep running; their results arrive stamped with an older
    /// generation and are discarded by [`MediaSession::poll`].
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.slots.clear();
    }

    /// Request an AI text summary. Returns false when suppressed
    /// (single-flight).
    pub fn request_text(&mut self, prompt: String, context: String) -> bool {
        self.spawn(MediaKind::Text, move |backend| {
            backend.generate_text(&prompt, &context).map(MediaArtifact::Text)
        })
    }

    /// Request an illustrative image. Returns false when suppressed.
    pub fn request_image(&mut self, prompt: String, size: ImageSize) -> bool {
        self.spawn(MediaKind::Image, move |backend| {
            backend.generate_image(&prompt, size).map(MediaArtifact::Image)
        })
    }

    /// Request a video; drives the submit/poll/fetch protocol on the worker.
    /// Returns false when suppressed.
    pub fn request_video(
        &mut self,
        prompt: String,
        source_image: Option<String>,
        aspect: AspectRatio,
    ) -> bool {
        self.spawn(MediaKind::Video, move |backend| {
            generate_video(
                backend,
                &prompt,
                source_image.as_deref(),
                aspect,
                VIDEO_POLL_INTERVAL,
            )
            .map(MediaArtifact::Video)
        })
    }

    fn spawn<F>(&mut self, kind: MediaKind, work: F) -> bool
    where
        F: FnOnce(&dyn GenerativeBackend) -> Result<MediaArtifact, ServiceError>
            + Send
            + 'static,
    {
        if self.is_pending(kind) {
            debug!(?kind, "request suppressed: already in flight");
            return false;
        }
        let (tx, rx): (Sender<(u64, _)>, Receiver<(u64, _)>) = channel();
        let backend = Arc::clone(&self.backend);
        let generation = self.generation;
        std::thread::spawn(move || {
            let result = work(backend.as_ref());
            // Receiver may be gone after an invalidate; that is fine.
            let _ = tx.send((generation, result));
        });
        self.slots.insert(
            kind,
            Slot {
                state: SlotState::Pending,
                rx: Some(rx),
            },
        );
        true
    }

    /// Drain settled results. Call once per frame; returns events for
    /// results that just settled. Stale results (older generation) are
    /// silently dropped and their slot returns to `Empty`.
    pub fn poll(&mut self) -> Vec<MediaEvent> {
        let mut events = Vec::new();
        let current = self.generation;
        for (kind, slot) in self.slots.iter_mut() {
            let Some(rx) = slot.rx.as_ref() else { continue };
            match rx.try_recv() {
                Ok((generation, result)) => {
                    slot.rx = None;
                    if generation != current {
                        debug!(?kind, "discarding stale media result");
                        slot.state = SlotState::Empty;
                        continue;
                    }
                    match result {
                        Ok(artifact) => {
                            slot.state = SlotState::Ready(artifact);
                            events.push(MediaEvent::Ready(*kind));
                        }
                        Err(err) => {
                            warn!(?kind, %err, "media generation failed");
                            slot.state = SlotState::Failed(err.to_string());
                            if err.is_auth() && !self.reauth_offered {
                                self.reauth_offered = true;
                                events.push(MediaEvent::AuthRequired(*kind));
                            } else {
                                events.push(MediaEvent::Failed(*kind, err.to_string()));
                            }
                        }
                    }
                }
                Err(std::sync::mpsc::TryRecvError::Empty) => {}
                Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                    slot.rx = None;
                    slot.state = SlotState::Failed("worker disappeared".into());
                    events.push(MediaEvent::Failed(*kind, "worker disappeared".into()));
                }
            }
        }
        events
    }
}
