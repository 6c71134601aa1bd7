//! Integration tests: runner timers on a paused tokio clock.

use async_trait::async_trait;
use ink_client::{Recognizer, Runner};
use ink_core::{InkError, RecognitionItem, RecognitionRequest, Result, SessionConfig};
use ink_editor::{InputEvent, Session};
use pretty_assertions::assert_eq;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::LocalSet;
use tokio::time::sleep;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Returns a fixed batch after an optional delay and records requests.
struct Canned {
    items: Vec<RecognitionItem>,
    latency: Duration,
    requests: Mutex<Vec<RecognitionRequest>>,
}

impl Canned {
    fn new(items: Vec<RecognitionItem>) -> Self {
        Self {
            items,
            latency: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl Recognizer for Canned {
    async fn recognize(&self, request: &RecognitionRequest) -> Result<Vec<RecognitionItem>> {
        if let Ok(mut reqs) = self.requests.lock() {
            reqs.push(request.clone());
        }
        sleep(self.latency).await;
        Ok(self.items.clone())
    }
}

struct Offline;

#[async_trait]
impl Recognizer for Offline {
    async fn recognize(&self, _request: &RecognitionRequest) -> Result<Vec<RecognitionItem>> {
        Err(InkError::RecognitionUnavailable("connection refused".into()))
    }
}

fn batch() -> Vec<RecognitionItem> {
    vec![
        RecognitionItem::new("x", "5", true),
        RecognitionItem::new("2*x", "10", false),
    ]
}

fn session() -> Session {
    Session::new(SessionConfig::with_size(32, 32))
}

#[tokio::test(start_paused = true)]
async fn reveals_fire_after_fixed_delay() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let runner = Runner::new(session(), Canned::new(batch()));
            let scheduled = runner.run().await.unwrap();
            assert_eq!(scheduled.len(), 2);
            assert_eq!(runner.armed_timers(), 2);

            sleep(Duration::from_millis(999)).await;
            assert!(runner.session().log().is_empty());

            sleep(Duration::from_millis(2)).await;
            assert_eq!(runner.session().log(), ["x = 5", "2*x = 10"]);
            assert_eq!(runner.session().variables().get("x"), Some("5"));
            assert_eq!(runner.armed_timers(), 0);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn dictionary_threads_into_next_request() {
    LocalSet::new()
        .run_until(async {
            let runner = Runner::new(session(), Canned::new(batch()));
            runner.run().await.unwrap();
            runner.run().await.unwrap();

            let reqs = runner.recognizer().requests.lock().unwrap().clone();
            assert_eq!(reqs.len(), 2);
            assert!(reqs[0].variables.is_empty());
            assert_eq!(reqs[1].variables.get("x").map(String::as_str), Some("5"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn reset_cancels_armed_timers() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let runner = Runner::new(session(), Canned::new(batch()));
            runner.run().await.unwrap();
            sleep(Duration::from_millis(500)).await;

            runner.reset();
            assert_eq!(runner.armed_timers(), 0);
            assert_eq!(runner.session().pending_reveals(), 0);

            sleep(Duration::from_secs(5)).await;
            assert!(runner.session().log().is_empty());
            assert!(runner.session().variables().is_empty());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn response_after_reset_is_dropped() {
    LocalSet::new()
        .run_until(async {
            let runner = Runner::new(
                session(),
                Canned::new(batch()).with_latency(Duration::from_millis(300)),
            );
            let (result, ()) = tokio::join!(runner.run(), async {
                sleep(Duration::from_millis(100)).await;
                runner.reset();
            });
            assert_eq!(result.unwrap(), Vec::new());

            sleep(Duration::from_secs(5)).await;
            assert!(runner.session().log().is_empty());
            assert!(runner.session().variables().is_empty());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn drawing_accepted_while_in_flight() {
    LocalSet::new()
        .run_until(async {
            let runner = Runner::new(
                session(),
                Canned::new(batch()).with_latency(Duration::from_millis(300)),
            );
            let (result, drew) = tokio::join!(runner.run(), async {
                sleep(Duration::from_millis(50)).await;
                runner.handle_input(&InputEvent::down(4.0, 4.0));
                runner.handle_input(&InputEvent::moved(20.0, 20.0))
            });
            assert!(drew);
            assert_eq!(result.unwrap().len(), 2);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn failure_leaves_session_usable() {
    LocalSet::new()
        .run_until(async {
            let runner = Runner::new(session(), Offline);
            runner.handle_input(&InputEvent::down(4.0, 4.0));
            runner.handle_input(&InputEvent::moved(20.0, 20.0));

            let err = runner.run().await.unwrap_err();
            assert!(matches!(err, InkError::RecognitionUnavailable(_)));
            assert!(!runner.session().raster().is_blank());
            assert_eq!(runner.session().pending_reveals(), 0);
        })
        .await;
}
