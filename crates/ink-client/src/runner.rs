//! Cooperative single-threaded driver for a [`Session`].
//!
//! Everything runs on one thread inside a tokio `LocalSet`: pointer input,
//! the awaited recognition request, and one local timer task per staged
//! reveal. The session is never borrowed across an `.await`, so drawing
//! keeps working while a request is in flight.
//!
//! Must be used from within `LocalSet::run_until` (timers are spawned with
//! `spawn_local`).

use crate::client::Recognizer;
use ink_core::{OverlayPosition, Result};
use ink_editor::{InputEvent, ScheduledReveal, Session};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub struct Runner<R: Recognizer> {
    session: Rc<RefCell<Session>>,
    recognizer: R,
    /// Session-clock origin.
    epoch: Instant,
    timers: RefCell<Vec<JoinHandle<()>>>,
}

impl<R: Recognizer> Runner<R> {
    pub fn new(session: Session, recognizer: R) -> Self {
        Self {
            session: Rc::new(RefCell::new(session)),
            recognizer,
            epoch: Instant::now(),
            timers: RefCell::new(Vec::new()),
        }
    }

    /// Time elapsed on the session clock.
    pub fn now(&self) -> Duration {
        Instant::now().saturating_duration_since(self.epoch)
    }

    pub fn session(&self) -> Ref<'_, Session> {
        self.session.borrow()
    }

    pub fn session_mut(&self) -> RefMut<'_, Session> {
        self.session.borrow_mut()
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    pub fn handle_input(&self, event: &InputEvent) -> bool {
        self.session.borrow_mut().handle_input(event)
    }

    pub fn drag_overlay(&self, position: OverlayPosition) {
        self.session.borrow_mut().drag_overlay(position);
    }

    /// One recognition round-trip: submit the current sketch, stage the
    /// answer, and arm its reveal timers.
    ///
    /// A response that arrives after a [`reset`](Self::reset) belongs to
    /// the cleared session and is dropped.
    pub async fn run(&self) -> Result<Vec<ScheduledReveal>> {
        let (request, generation) = {
            let session = self.session.borrow();
            (session.build_request()?, session.generation())
        };

        let items = match self.recognizer.recognize(&request).await {
            Ok(items) => items,
            Err(e) => {
                log::warn!("recognition failed: {e}");
                return Err(e);
            }
        };

        let now = self.now();
        let scheduled = {
            let mut session = self.session.borrow_mut();
            if session.generation() != generation {
                log::info!("discarding response of {} item(s) from before reset", items.len());
                return Ok(Vec::new());
            }
            session.accept_response(&items, now)
        };
        self.arm(&scheduled);
        Ok(scheduled)
    }

    fn arm(&self, scheduled: &[ScheduledReveal]) {
        let mut timers = self.timers.borrow_mut();
        timers.retain(|t| !t.is_finished());
        for reveal in scheduled {
            let session = Rc::clone(&self.session);
            let deadline = self
                .epoch
                .checked_add(reveal.reveal_at)
                .unwrap_or_else(far_future);
            let ticket = reveal.ticket;
            timers.push(tokio::task::spawn_local(async move {
                tokio::time::sleep_until(deadline).await;
                let revealed = session.borrow_mut().on_timer(ticket);
                for r in &revealed {
                    log::debug!("revealed #{}: {}", r.index, r.markup);
                }
            }));
        }
    }

    /// Number of timer tasks that have not completed.
    pub fn armed_timers(&self) -> usize {
        self.timers.borrow().iter().filter(|t| !t.is_finished()).count()
    }

    /// Abort every armed timer and reset the session.
    pub fn reset(&self) {
        self.abort_timers();
        self.session.borrow_mut().reset();
    }

    fn abort_timers(&self) {
        for t in self.timers.borrow_mut().drain(..) {
            t.abort();
        }
    }
}

/// Stand-in deadline for reveals scheduled beyond `Instant`'s range.
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86_400 * 365 * 30)
}

impl<R: Recognizer> Drop for Runner<R> {
    fn drop(&mut self) {
        self.abort_timers();
    }
}
