pub mod encode;
pub mod scan;
pub mod stroke;

pub use encode::{encode_png, to_data_url};
pub use scan::{InkBounds, anchor_or, ink_bounds};
pub use stroke::{Segment, rasterize_segment};
