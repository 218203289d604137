mod pipeline;

pub use pipeline::{Assistant, MISSING_IMAGE_MESSAGE};
