use serde::{Deserialize, Serialize};

/// How to prepare an image before feeding it to the network: resize to
/// `width` × `height`, split into `channels` planes interleaved per pixel,
/// normalize to [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputShape {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl InputShape {
    pub fn flat_len(&self) -> usize {
        (self.width * self.height * self.channels) as usize
    }
}

/// Annotations stored inside a saved classifier so clients (the evaluator,
/// the export bundle, the browser front end) can interpret its outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub description: Option<String>,
    pub input: InputShape,
    /// Class labels in output-index order.
    pub labels: Vec<String>,
}
