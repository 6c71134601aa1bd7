//! The sketch-to-overlay session.
//!
//! Owns every piece of mutable state for one canvas: the raster, the pen,
//! the variable dictionary, pending reveals, the overlay anchor, and the
//! log of revealed markup. The session performs no I/O and reads no clock;
//! callers pass the session-clock time (elapsed since the session started)
//! into the operations that need it.
//!
//! A run looks like this:
//!
//! 1. [`Session::build_request`] snapshots the raster and dictionary.
//! 2. The caller sends it and awaits the response; drawing may continue.
//! 3. [`Session::accept_response`] merges assignments, anchors the batch on
//!    the current ink, seeds the overlay, and stages the reveals.
//! 4. The caller arms one timer per returned [`ScheduledReveal`] and feeds
//!    each back via [`Session::on_timer`] (or calls [`Session::poll`]).

use crate::input::InputEvent;
use crate::overlay::OverlayManager;
use crate::staging::{Released, RevealScheduler, RevealTicket, ScheduledReveal};
use crate::tools::DrawingEngine;
use crate::typeset::{ExpressionLog, NullRenderer, TypesetRenderer};
use ink_core::{
    Color, DrawingState, OverlayPosition, RasterBuffer, RecognitionItem, RecognitionRequest, Result,
    SessionConfig, VariableStore,
};
use ink_render::{anchor_or, to_data_url};
use serde::Serialize;
use std::time::Duration;

/// One result that just became visible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reveal {
    /// Position in the overlay log.
    pub index: usize,
    pub markup: String,
    pub anchor: OverlayPosition,
}

pub struct Session {
    config: SessionConfig,
    raster: RasterBuffer,
    pen: DrawingEngine,
    variables: VariableStore,
    scheduler: RevealScheduler,
    overlay: OverlayManager,
    log: ExpressionLog,
    renderer: Box<dyn TypesetRenderer>,
}

impl Session {
    /// Create a headless session.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_renderer(config, Box::new(NullRenderer))
    }

    pub fn with_renderer(config: SessionConfig, renderer: Box<dyn TypesetRenderer>) -> Self {
        Self {
            raster: RasterBuffer::new(config.width, config.height),
            pen: DrawingEngine::new(config.default_color, config.stroke_width),
            variables: VariableStore::new(),
            scheduler: RevealScheduler::new(config.reveal_delay(), config.reveal_stagger()),
            overlay: OverlayManager::new(config.default_anchor),
            log: ExpressionLog::default(),
            renderer,
            config,
        }
    }

    /// Swap the typesetter, e.g. once the host's renderer has loaded.
    pub fn set_renderer(&mut self, renderer: Box<dyn TypesetRenderer>) {
        self.renderer = renderer;
    }

    // ─── Drawing ─────────────────────────────────────────────────────────

    /// Feed one pointer event to the pen. Returns true if pixels changed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        self.pen.apply(event, &mut self.raster)
    }

    /// Select the stroke color from a CSS color string. On error the
    /// current color is kept.
    pub fn set_color(&mut self, css: &str) -> Result<()> {
        let color = Color::parse_css(css)?;
        self.pen.set_color(color);
        Ok(())
    }

    // ─── Recognition round-trip ──────────────────────────────────────────

    /// Encode the current raster and dictionary snapshot.
    pub fn build_request(&self) -> Result<RecognitionRequest> {
        Ok(RecognitionRequest {
            image: to_data_url(&self.raster)?,
            variables: self.variables.snapshot(),
        })
    }

    /// Take a response batch received at `now`. Returns one timer request
    /// per item, in response order.
    pub fn accept_response(
        &mut self,
        items: &[RecognitionItem],
        now: Duration,
    ) -> Vec<ScheduledReveal> {
        let assigned = self.variables.apply_assignments(items);
        let anchor = anchor_or(&self.raster, self.config.default_anchor);
        self.overlay.seed(anchor);
        let scheduled = self.scheduler.stage(items, anchor, now);
        log::info!(
            "batch of {} item(s) accepted ({assigned} assignment(s)), anchor ({}, {})",
            items.len(),
            anchor.x,
            anchor.y
        );
        scheduled
    }

    /// A reveal timer fired.
    pub fn on_timer(&mut self, ticket: RevealTicket) -> Vec<Reveal> {
        let released = self.scheduler.fire(ticket);
        self.reveal(released)
    }

    /// Reveal everything due at `now`.
    pub fn poll(&mut self, now: Duration) -> Vec<Reveal> {
        let released = self.scheduler.poll(now);
        self.reveal(released)
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    fn reveal(&mut self, released: Vec<Released>) -> Vec<Reveal> {
        let mut out = Vec::with_capacity(released.len());
        for r in released {
            let markup = r.result.markup();
            self.log.push(markup.clone());
            self.overlay.seed(r.anchor);
            if self.config.clear_canvas_on_reveal {
                self.raster.clear();
            }
            self.renderer.render(self.log.entries(), self.overlay.position());
            out.push(Reveal {
                index: self.log.len() - 1,
                markup,
                anchor: self.overlay.position(),
            });
        }
        out
    }

    // ─── Overlay ─────────────────────────────────────────────────────────

    /// A drag on any overlay stopped at `position`; all overlays follow.
    pub fn drag_overlay(&mut self, position: OverlayPosition) {
        self.overlay.drag_to(position);
    }

    pub fn overlay_position(&self) -> OverlayPosition {
        self.overlay.position()
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Clear raster, log, dictionary, pending reveals, and overlay anchor
    /// in one step. Timers armed before the reset become no-ops. The pen
    /// keeps its selected color.
    pub fn reset(&mut self) {
        self.raster.clear();
        self.log.clear();
        self.variables.clear();
        self.scheduler.cancel_all();
        self.overlay.reset();
        self.pen.reset();
        log::info!("session reset (generation {})", self.scheduler.generation());
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }

    pub fn drawing_state(&self) -> &DrawingState {
        self.pen.state()
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn log(&self) -> &[String] {
        self.log.entries()
    }

    pub fn pending_reveals(&self) -> usize {
        self.scheduler.pending_len()
    }

    pub fn generation(&self) -> u64 {
        self.scheduler.generation()
    }
}
