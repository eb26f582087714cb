pub mod augment;
pub mod inventory;
pub mod loader;

pub use inventory::{class_counts, count_images, readiness, InventoryReport};
pub use loader::{load_dataset, Dataset, Sample};
