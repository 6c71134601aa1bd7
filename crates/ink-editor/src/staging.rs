//! Reveal scheduling for recognition batches.
//!
//! A batch arrives all at once; its items are revealed after a delay so
//! they read one after another. Every item of a batch is due at the same
//! offset from arrival unless a per-index stagger is configured.
//!
//! Each staged item gets a [`RevealTicket`]. Timer callbacks hand the
//! ticket back through [`RevealScheduler::fire`]; reveals are always
//! released in staging order, so a timer that fires early is held until
//! every earlier item has fired too. Tickets carry the scheduler
//! generation: [`RevealScheduler::cancel_all`] bumps it, and tickets from
//! an older generation are ignored.

use ink_core::{OverlayPosition, RecognitionItem, StagedResult};
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;

/// Handle for one pending reveal, returned to whoever owns the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RevealTicket {
    pub generation: u64,
    pub seq: u64,
}

/// A reveal the caller must arm a timer for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduledReveal {
    pub ticket: RevealTicket,
    /// Session-clock time at which the timer should fire.
    pub reveal_at: Duration,
}

/// A staged result leaving the queue, with the anchor of its batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Released {
    pub result: StagedResult,
    pub anchor: OverlayPosition,
}

#[derive(Debug)]
struct Pending {
    ticket: RevealTicket,
    result: StagedResult,
    anchor: OverlayPosition,
    fired: bool,
}

#[derive(Debug)]
pub struct RevealScheduler {
    delay: Duration,
    stagger: Option<Duration>,
    generation: u64,
    next_seq: u64,
    /// Staging order. Only the fired prefix is ever released.
    pending: VecDeque<Pending>,
}

impl RevealScheduler {
    pub fn new(delay: Duration, stagger: Option<Duration>) -> Self {
        Self {
            delay,
            stagger,
            generation: 0,
            next_seq: 0,
            pending: VecDeque::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of staged items not yet released.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Stage a batch received at `now`. All items share `anchor`.
    pub fn stage(
        &mut self,
        items: &[RecognitionItem],
        anchor: OverlayPosition,
        now: Duration,
    ) -> Vec<ScheduledReveal> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                // Huge configured delays saturate instead of overflowing.
                let offset = match self.stagger {
                    Some(step) => {
                        let extra = u32::try_from(i)
                            .ok()
                            .and_then(|i| step.checked_mul(i))
                            .unwrap_or(Duration::MAX);
                        self.delay.saturating_add(extra)
                    }
                    None => self.delay,
                };
                let ticket = RevealTicket {
                    generation: self.generation,
                    seq: self.next_seq,
                };
                self.next_seq += 1;

                let reveal_at = now.saturating_add(offset);
                self.pending.push_back(Pending {
                    ticket,
                    result: StagedResult {
                        expression: item.expr.clone(),
                        answer: item.result.clone(),
                        reveal_at,
                    },
                    anchor,
                    fired: false,
                });
                ScheduledReveal { ticket, reveal_at }
            })
            .collect()
    }

    /// A timer for `ticket` fired. Returns whatever is now releasable.
    pub fn fire(&mut self, ticket: RevealTicket) -> Vec<Released> {
        if ticket.generation != self.generation {
            log::debug!(
                "ignoring stale reveal ticket {ticket:?} (generation {})",
                self.generation
            );
            return Vec::new();
        }
        match self.pending.iter_mut().find(|p| p.ticket == ticket) {
            Some(p) => p.fired = true,
            None => log::debug!("ignoring unknown reveal ticket {ticket:?}"),
        }
        self.drain_fired()
    }

    /// Fire every item due at or before `now`.
    pub fn poll(&mut self, now: Duration) -> Vec<Released> {
        for p in self.pending.iter_mut().filter(|p| p.result.reveal_at <= now) {
            p.fired = true;
        }
        self.drain_fired()
    }

    /// Earliest deadline among items whose timer has not fired.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending
            .iter()
            .filter(|p| !p.fired)
            .map(|p| p.result.reveal_at)
            .min()
    }

    /// Drop every pending reveal and invalidate outstanding tickets.
    /// Returns how many reveals were canceled.
    pub fn cancel_all(&mut self) -> usize {
        let canceled = self.pending.len();
        self.pending.clear();
        self.generation += 1;
        if canceled > 0 {
            log::info!("canceled {canceled} pending reveal(s)");
        }
        canceled
    }

    fn drain_fired(&mut self) -> Vec<Released> {
        let mut out = Vec::new();
        while self.pending.front().is_some_and(|p| p.fired) {
            if let Some(p) = self.pending.pop_front() {
                out.push(Released {
                    result: p.result,
                    anchor: p.anchor,
                });
            }
        }
        out
    }
}
