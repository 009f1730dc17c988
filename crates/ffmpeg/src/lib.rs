mod error;
mod probe;
mod thumbnailer;

pub use error::ThumbnailerError;
pub use probe::{parse_duration, probe_duration};
pub use thumbnailer::{Thumbnailer, ThumbnailerBuilder};
