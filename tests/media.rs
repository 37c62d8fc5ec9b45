use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use flowdeck::media::{
    AspectRatio, GenerativeBackend, ImageSize, MediaArtifact, MediaEvent, MediaKind, MediaSession,
    ServiceError, SlotState, VideoOperation, generate_video,
};

/// Scriptable backend: each call takes `delay`, then returns the canned
/// result. Counts calls so suppression can be asserted.
struct MockBackend {
    delay: Duration,
    text_result: Mutex<Result<String, ServiceError>>,
    text_calls: AtomicUsize,
    /// Polls needed before a submitted video operation reports done.
    polls_until_done: usize,
    poll_calls: AtomicUsize,
}

impl MockBackend {
    fn ok(text: &str) -> Self {
        Self::with_result(Ok(text.to_string()))
    }

    fn with_result(result: Result<String, ServiceError>) -> Self {
        Self {
            delay: Duration::ZERO,
            text_result: Mutex::new(result),
            text_calls: AtomicUsize::new(0),
            polls_until_done: 0,
            poll_calls: AtomicUsize::new(0),
        }
    }

    fn slow(text: &str, delay: Duration) -> Self {
        let mut mock = Self::ok(text);
        mock.delay = delay;
        mock
    }
}

impl GenerativeBackend for MockBackend {
    fn generate_text(&self, _prompt: &str, _context: &str) -> Result<String, ServiceError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        self.text_result.lock().unwrap().clone()
    }

    fn generate_image(
        &self,
        _prompt: &str,
        _size: ImageSize,
    ) -> Result<Option<String>, ServiceError> {
        Ok(Some("data:image/png;base64,AAAA".to_string()))
    }

    fn submit_video(
        &self,
        _prompt: &str,
        _source_image: Option<&str>,
        _aspect: AspectRatio,
    ) -> Result<VideoOperation, ServiceError> {
        Ok(VideoOperation {
            name: "operations/mock".to_string(),
            done: self.polls_until_done == 0,
            uri: if self.polls_until_done == 0 {
                Some("https://videos.example/mock.mp4".to_string())
            } else {
                None
            },
        })
    }

    fn poll_video(&self, op: &VideoOperation) -> Result<VideoOperation, ServiceError> {
        let polls = self.poll_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let done = polls >= self.polls_until_done;
        Ok(VideoOperation {
            name: op.name.clone(),
            done,
            uri: done.then(|| "https://videos.example/mock.mp4".to_string()),
        })
    }

    fn fetch_video_url(&self, op: &VideoOperation) -> Result<Option<String>, ServiceError> {
        Ok(op.uri.clone())
    }
}

/// Poll until the session settles the slot or the deadline passes.
fn settle(session: &mut MediaSession, timeout: Duration) -> Vec<MediaEvent> {
    let deadline = Instant::now() + timeout;
    loop {
        let events = session.poll();
        if !events.is_empty() {
            return events;
        }
        if Instant::now() > deadline {
            return vec![];
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_text_request_settles_ready() {
    let backend = Arc::new(MockBackend::ok("resumo"));
    let mut session = MediaSession::new(backend);
    assert!(session.request_text("p".into(), "c".into()));
    assert!(session.is_pending(MediaKind::Text));
    let events = settle(&mut session, Duration::from_secs(2));
    assert_eq!(events, vec![MediaEvent::Ready(MediaKind::Text)]);
    assert_eq!(
        session.artifact(MediaKind::Text),
        Some(MediaArtifact::Text("resumo".into()))
    );
}

#[test]
fn test_second_request_is_suppressed_while_pending() {
    let backend = Arc::new(MockBackend::slow("ok", Duration::from_millis(100)));
    let mut session = MediaSession::new(Arc::clone(&backend) as Arc<dyn GenerativeBackend>);
    assert!(session.request_text("p".into(), "c".into()));
    assert!(!session.request_text("p".into(), "c".into()));
    settle(&mut session, Duration::from_secs(2));
    assert_eq!(backend.text_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_invalidate_discards_late_result() {
    let backend = Arc::new(MockBackend::slow("stale", Duration::from_millis(80)));
    let mut session = MediaSession::new(backend);
    session.request_text("p".into(), "c".into());
    session.invalidate();
    assert_eq!(session.state(MediaKind::Text), SlotState::Empty);
    // The worker finishes after the invalidate; its result must not
    // resurrect the slot.
    std::thread::sleep(Duration::from_millis(150));
    let events = session.poll();
    assert!(events.is_empty());
    assert_eq!(session.state(MediaKind::Text), SlotState::Empty);
}

#[test]
fn test_request_after_invalidate_uses_new_generation() {
    let backend = Arc::new(MockBackend::ok("fresh"));
    let mut session = MediaSession::new(backend);
    session.request_text("p".into(), "c".into());
    session.invalidate();
    assert!(session.request_text("p".into(), "c".into()));
    let events = settle(&mut session, Duration::from_secs(2));
    assert_eq!(events, vec![MediaEvent::Ready(MediaKind::Text)]);
    assert_eq!(
        session.artifact(MediaKind::Text),
        Some(MediaArtifact::Text("fresh".into()))
    );
}

#[test]
fn test_failure_surfaces_failed_event_and_state() {
    let backend = Arc::new(MockBackend::with_result(Err(ServiceError::Quota(
        "HTTP 429".into(),
    ))));
    let mut session = MediaSession::new(backend);
    session.request_text("p".into(), "c".into());
    let events = settle(&mut session, Duration::from_secs(2));
    assert!(matches!(
        events.as_slice(),
        [MediaEvent::Failed(MediaKind::Text, _)]
    ));
    assert!(matches!(
        session.state(MediaKind::Text),
        SlotState::Failed(_)
    ));
}

#[test]
fn test_auth_failure_prompts_once() {
    let auth_err = || ServiceError::Auth("HTTP 401".into());
    let backend = Arc::new(MockBackend::with_result(Err(auth_err())));
    let mut session = MediaSession::new(backend);

    session.request_text("p".into(), "c".into());
    let events = settle(&mut session, Duration::from_secs(2));
    assert_eq!(events, vec![MediaEvent::AuthRequired(MediaKind::Text)]);

    // A second auth failure downgrades to a plain failure.
    session.invalidate();
    session.request_text("p".into(), "c".into());
    let events = settle(&mut session, Duration::from_secs(2));
    assert!(matches!(
        events.as_slice(),
        [MediaEvent::Failed(MediaKind::Text, _)]
    ));

    // Swapping in a new backend re-arms the prompt.
    session.set_backend(Arc::new(MockBackend::with_result(Err(auth_err()))));
    session.invalidate();
    session.request_text("p".into(), "c".into());
    let events = settle(&mut session, Duration::from_secs(2));
    assert_eq!(events, vec![MediaEvent::AuthRequired(MediaKind::Text)]);
}

#[test]
fn test_generate_video_polls_until_done() {
    let mut backend = MockBackend::ok("unused");
    backend.polls_until_done = 3;
    let url = generate_video(
        &backend,
        "prompt",
        None,
        AspectRatio::Wide16x9,
        Duration::from_millis(1),
    )
    .unwrap();
    assert_eq!(url.as_deref(), Some("https://videos.example/mock.mp4"));
    assert_eq!(backend.poll_calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_generate_video_done_on_submit_skips_polling() {
    let backend = MockBackend::ok("unused");
    let url = generate_video(
        &backend,
        "prompt",
        None,
        AspectRatio::Wide16x9,
        Duration::from_millis(1),
    )
    .unwrap();
    assert!(url.is_some());
    assert_eq!(backend.poll_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_image_request_through_session() {
    let backend = Arc::new(MockBackend::ok("unused"));
    let mut session = MediaSession::new(backend);
    assert!(session.request_image("prompt".into(), ImageSize::K1));
    let events = settle(&mut session, Duration::from_secs(2));
    assert_eq!(events, vec![MediaEvent::Ready(MediaKind::Image)]);
    match session.artifact(MediaKind::Image) {
        Some(MediaArtifact::Image(Some(url))) => {
            assert!(url.starts_with("data:image/png;base64,"));
        }
        other => panic!("unexpected artifact: {other:?}"),
    }
}

#[test]
fn test_video_request_through_session() {
    let backend = Arc::new(MockBackend::ok("unused"));
    let mut session = MediaSession::new(backend);
    assert!(session.request_video("prompt".into(), None, AspectRatio::Wide16x9));
    let events = settle(&mut session, Duration::from_secs(10));
    assert_eq!(events, vec![MediaEvent::Ready(MediaKind::Video)]);
    assert!(matches!(
        session.artifact(MediaKind::Video),
        Some(MediaArtifact::Video(Some(_)))
    ));
}
