pub mod config;
pub mod error;
pub mod model;
pub mod protocol;
pub mod raster;
pub mod variables;

pub use config::SessionConfig;
pub use error::{InkError, Result};
pub use model::*;
pub use protocol::{Dictionary, RecognitionItem, RecognitionRequest, decode_response};
pub use raster::{MAX_DIMENSION, RasterBuffer};
pub use variables::VariableStore;
