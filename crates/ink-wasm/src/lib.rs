//! WASM bridge for inkcalc: exposes the sketch session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the network
//! call, the timers, and the typesetter; this crate owns all state:
//!
//! ```js
//! const canvas = new InkCanvas(width, height);
//! canvas.set_renderer((latex, x, y) => { /* place overlays, typeset */ });
//! // run:
//! const { generation, body } = JSON.parse(canvas.request_json());
//! const res = await fetch(`${API_URL}/calculate`, { method: "POST", body, headers });
//! const timers = JSON.parse(
//!     canvas.accept_response(await res.text(), performance.now() - t0, generation));
//! for (const t of timers) setTimeout(() => canvas.on_timer(t.generation, t.seq), t.delayMs);
//! ```

mod render2d;

use ink_core::protocol::CALCULATE_PATH;
use ink_core::{OverlayPosition, SessionConfig, decode_response};
use ink_editor::typeset::latex_from_markup;
use ink_editor::{InputEvent, Reveal, RevealTicket, Session, TypesetRenderer};
use std::time::Duration;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// Forwards every reveal to a JS callback `(latex: string[], x, y)`.
struct JsRenderer {
    callback: js_sys::Function,
}

impl TypesetRenderer for JsRenderer {
    fn render(&mut self, markup: &[String], anchor: OverlayPosition) {
        let latex: js_sys::Array = markup
            .iter()
            .map(|m| JsValue::from_str(&latex_from_markup(m)))
            .collect();
        if let Err(e) = self.callback.call3(
            &JsValue::NULL,
            &latex,
            &JsValue::from_f64(f64::from(anchor.x)),
            &JsValue::from_f64(f64::from(anchor.y)),
        ) {
            log::warn!("renderer callback failed: {e:?}");
            web_sys::console::error_2(&"inkcalc renderer callback failed:".into(), &e);
        }
    }
}

fn to_js(e: ink_core::InkError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Session-clock time from a JS timestamp. Negative, NaN, or infinite
/// values map to zero.
fn session_time(now_ms: f64) -> Duration {
    Duration::try_from_secs_f64(now_ms / 1000.0).unwrap_or_default()
}

fn reveals_json(reveals: &[Reveal]) -> String {
    serde_json::to_string(reveals).unwrap_or_else(|_| "[]".to_string())
}

/// The JS-facing canvas controller. All interaction goes through here.
#[wasm_bindgen]
pub struct InkCanvas {
    session: Session,
}

#[wasm_bindgen]
impl InkCanvas {
    /// Create a controller with default settings and the given raster size.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Self {
        console_error_panic_hook_setup();
        Self {
            session: Session::new(SessionConfig::with_size(width, height)),
        }
    }

    /// Create a controller from a JSON `SessionConfig`; omitted keys keep
    /// their defaults. Fails if the raster size is out of range.
    pub fn with_config(json: &str) -> Result<InkCanvas, JsValue> {
        console_error_panic_hook_setup();
        let config: SessionConfig =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        config.validate().map_err(to_js)?;
        Ok(Self {
            session: Session::new(config),
        })
    }

    /// Install the typesetting callback `(latex: string[], x: number, y: number)`.
    pub fn set_renderer(&mut self, callback: js_sys::Function) {
        self.session.set_renderer(Box::new(JsRenderer { callback }));
    }

    /// Select the pen color (`rgb(...)`, `rgba(...)`, or hex). Returns
    /// `false` and keeps the current color if the string is invalid.
    pub fn set_color(&mut self, css: &str) -> bool {
        self.session.set_color(css).is_ok()
    }

    /// Pointer events. Each returns true if the raster changed.
    pub fn handle_pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.session.handle_input(&InputEvent::down(x, y))
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.session.handle_input(&InputEvent::moved(x, y))
    }

    pub fn handle_pointer_up(&mut self, x: f32, y: f32) -> bool {
        self.session.handle_input(&InputEvent::up(x, y))
    }

    pub fn handle_pointer_leave(&mut self) -> bool {
        self.session.handle_input(&InputEvent::PointerLeave)
    }

    /// Draw the raster onto a Canvas2D context.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        render2d::render_raster(ctx, self.session.raster())
    }

    /// Path to POST the request body to, relative to the service base URL.
    pub fn calculate_path() -> String {
        CALCULATE_PATH.to_string()
    }

    /// The recognition request as JSON `{"generation":g,"body":"..."}`.
    /// POST `body` as is and hand `generation` back to
    /// [`accept_response`](Self::accept_response).
    pub fn request_json(&self) -> Result<String, JsValue> {
        let body = self.session.build_request().and_then(|r| r.to_json()).map_err(to_js)?;
        Ok(serde_json::json!({
            "generation": self.session.generation(),
            "body": body,
        })
        .to_string())
    }

    /// Feed the raw response body received at `now_ms` (session clock) for
    /// a request built in `generation`. Returns JSON
    /// `[{"generation":g,"seq":s,"delayMs":d}, ...]`, one timer to arm per
    /// item. A response to a request from before a reset is dropped and
    /// yields `[]`.
    pub fn accept_response(
        &mut self,
        body: &str,
        now_ms: f64,
        generation: f64,
    ) -> Result<String, JsValue> {
        let items = decode_response(body.as_bytes()).map_err(to_js)?;
        if generation as u64 != self.session.generation() {
            log::info!("discarding response of {} item(s) from before reset", items.len());
            return Ok("[]".to_string());
        }
        let now = session_time(now_ms);
        let timers: Vec<serde_json::Value> = self
            .session
            .accept_response(&items, now)
            .into_iter()
            .map(|s| {
                serde_json::json!({
                    "generation": s.ticket.generation,
                    "seq": s.ticket.seq,
                    "delayMs": s.reveal_at.saturating_sub(now).as_secs_f64() * 1000.0,
                })
            })
            .collect();
        Ok(serde_json::Value::Array(timers).to_string())
    }

    /// A reveal timer fired. Returns JSON array of reveals now visible.
    pub fn on_timer(&mut self, generation: f64, seq: f64) -> String {
        let ticket = RevealTicket {
            generation: generation as u64,
            seq: seq as u64,
        };
        reveals_json(&self.session.on_timer(ticket))
    }

    /// Reveal everything due at `now_ms`. Returns JSON array of reveals.
    pub fn poll(&mut self, now_ms: f64) -> String {
        reveals_json(&self.session.poll(session_time(now_ms)))
    }

    /// Next pending deadline on the session clock, if any.
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.session
            .next_deadline()
            .map(|d| d.as_secs_f64() * 1000.0)
    }

    /// Drag stop on any overlay.
    pub fn drag_overlay(&mut self, x: f32, y: f32) {
        self.session.drag_overlay(OverlayPosition::new(x, y));
    }

    /// Current overlay anchor as JSON `{"x":..,"y":..}`.
    pub fn overlay_position(&self) -> String {
        let p = self.session.overlay_position();
        serde_json::json!({ "x": p.x, "y": p.y }).to_string()
    }

    /// Revealed markup (`expr = answer`), oldest first, as a JSON array.
    pub fn log_json(&self) -> String {
        serde_json::to_string(self.session.log()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Revealed entries in TeX display form, as a JSON array.
    pub fn latex_json(&self) -> String {
        let latex: Vec<String> = self.session.log().iter().map(|m| latex_from_markup(m)).collect();
        serde_json::to_string(&latex).unwrap_or_else(|_| "[]".to_string())
    }

    /// Current dictionary as a JSON object.
    pub fn variables_json(&self) -> String {
        serde_json::to_string(&self.session.variables().snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Clear everything; timers armed earlier become no-ops.
    pub fn reset(&mut self) {
        self.session.reset();
    }
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("inkcalc WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BODY: &str = r#"{"data":[{"expr":"a","result":"2","assign":true},{"expr":"a*3","result":"6","assign":false}]}"#;

    #[test]
    fn response_produces_timer_plan() {
        let mut canvas = InkCanvas::new(32, 32);
        let plan: serde_json::Value =
            serde_json::from_str(&canvas.accept_response(BODY, 500.0, 0.0).unwrap()).unwrap();
        assert_eq!(plan.as_array().map(Vec::len), Some(2));
        assert_eq!(plan[0]["delayMs"], 1000.0);
        assert_eq!(plan[1]["seq"], 1);
        assert_eq!(canvas.next_deadline_ms(), Some(1500.0));
    }

    #[test]
    fn timers_reveal_and_reset_cancels() {
        let mut canvas = InkCanvas::new(32, 32);
        canvas.accept_response(BODY, 0.0, 0.0).unwrap();
        let revealed: serde_json::Value = serde_json::from_str(&canvas.on_timer(0.0, 0.0)).unwrap();
        assert_eq!(revealed[0]["markup"], "a = 2");
        assert_eq!(canvas.log_json(), r#"["a = 2"]"#);
        assert_eq!(canvas.variables_json(), r#"{"a":"2"}"#);

        canvas.reset();
        assert_eq!(canvas.on_timer(0.0, 1.0), "[]");
        assert_eq!(canvas.log_json(), "[]");
        assert_eq!(canvas.overlay_position(), r#"{"x":10.0,"y":200.0}"#);
    }

    #[test]
    fn latex_view_of_log() {
        let mut canvas = InkCanvas::new(16, 16);
        canvas.accept_response(BODY, 0.0, 0.0).unwrap();
        canvas.poll(1000.0);
        assert_eq!(
            canvas.latex_json(),
            serde_json::to_string(&[r"\(\LARGE{a = 2}\)", r"\(\LARGE{a*3 = 6}\)"]).unwrap()
        );
    }

    #[test]
    fn response_from_before_reset_is_dropped() {
        let mut canvas = InkCanvas::new(16, 16);
        let request: serde_json::Value =
            serde_json::from_str(&canvas.request_json().unwrap()).unwrap();
        assert_eq!(request["generation"], 0);
        assert!(request["body"].as_str().unwrap().contains("dict_of_vars"));

        canvas.reset();
        let generation = request["generation"].as_f64().unwrap();
        let plan = canvas.accept_response(BODY, 0.0, generation).unwrap();
        assert_eq!(plan, "[]");
        assert_eq!(canvas.poll(5000.0), "[]");
        assert_eq!(canvas.variables_json(), "{}");
        assert_eq!(canvas.log_json(), "[]");
        assert_eq!(canvas.next_deadline_ms(), None);

        let fresh: serde_json::Value =
            serde_json::from_str(&canvas.request_json().unwrap()).unwrap();
        assert_eq!(fresh["generation"], 1);
        canvas.accept_response(BODY, 0.0, 1.0).unwrap();
        assert_eq!(canvas.variables_json(), r#"{"a":"2"}"#);
    }

    #[test]
    fn bad_timestamps_clamp_to_zero() {
        assert_eq!(session_time(f64::INFINITY), Duration::ZERO);
        assert_eq!(session_time(f64::NAN), Duration::ZERO);
        assert_eq!(session_time(-5.0), Duration::ZERO);
        assert_eq!(session_time(1500.0), Duration::from_millis(1500));

        let mut canvas = InkCanvas::new(16, 16);
        canvas.accept_response(BODY, f64::INFINITY, 0.0).unwrap();
        assert_eq!(canvas.next_deadline_ms(), Some(1000.0));
    }

    #[test]
    fn pointer_events_draw() {
        let mut canvas = InkCanvas::new(16, 16);
        assert!(!canvas.handle_pointer_down(2.0, 2.0));
        assert!(canvas.handle_pointer_move(10.0, 10.0));
        assert!(!canvas.handle_pointer_up(10.0, 10.0));
        assert!(canvas.set_color("#00ff00"));
        assert!(!canvas.set_color("chartreuse-ish"));
    }
}
