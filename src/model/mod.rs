pub mod classifier;
pub mod metadata;

pub use classifier::Classifier;
pub use metadata::{InputShape, ModelMetadata};
