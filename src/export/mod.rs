pub mod bundle;
pub mod deploy;

pub use bundle::{export_bundle, ExportManifest};
pub use deploy::copy_to_web;
