pub mod input;
pub mod overlay;
pub mod session;
pub mod staging;
pub mod tools;
pub mod typeset;

pub use input::InputEvent;
pub use overlay::OverlayManager;
pub use session::{Reveal, Session};
pub use staging::{RevealScheduler, RevealTicket, ScheduledReveal};
pub use tools::DrawingEngine;
pub use typeset::{ExpressionLog, NullRenderer, TypesetRenderer, latex_display};
