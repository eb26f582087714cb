//! Read-only accounting of the training data directories.
//!
//! Pure function of file-system state: counts regular files with a
//! recognized image extension directly inside each class directory.
//! Subdirectories are never descended into or counted.

use std::fs;
use std::path::Path;

use crate::config::{class_dir, CLASSES, IMAGE_EXTENSIONS, MIN_IMAGES_PER_CLASS};

/// Counts regular files under `dir` whose extension is jpg/jpeg/png,
/// case-insensitively. A missing or unreadable directory counts as 0.
pub fn count_images(dir: &Path) -> usize {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return 0,
    };

    entries
        .flatten()
        .filter(|entry| entry.path().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| {
                    let lower = ext.to_ascii_lowercase();
                    IMAGE_EXTENSIONS.iter().any(|&known| known == lower)
                })
                .unwrap_or(false)
        })
        .count()
}

/// (class name, image count) for every configured class, in class order.
pub fn class_counts() -> Vec<(String, usize)> {
    CLASSES
        .iter()
        .map(|&name| (name.to_string(), count_images(&class_dir(name))))
        .collect()
}

/// Snapshot of dataset readiness against the per-class minimum.
pub struct InventoryReport {
    pub counts: Vec<(String, usize)>,
    pub total: usize,
    pub required_total: usize,
}

impl InventoryReport {
    pub fn ready(&self) -> bool {
        self.total >= self.required_total
    }
}

pub fn readiness() -> InventoryReport {
    let counts = class_counts();
    let total = counts.iter().map(|(_, n)| n).sum();
    InventoryReport {
        counts,
        total,
        required_total: MIN_IMAGES_PER_CLASS * CLASSES.len(),
    }
}

/// Prints the progress report used by the `progress` binary and the
/// end-of-scrape summary.
pub fn print_report(report: &InventoryReport) {
    for (name, count) in &report.counts {
        let dir = class_dir(name);
        let status = if !dir.exists() {
            "[NO DIR]"
        } else if *count >= MIN_IMAGES_PER_CLASS {
            "[OK]"
        } else {
            "[NEEDS MORE]"
        };
        println!("{} {}: {} images", status, name, count);
    }
    println!("\nTotal: {} images", report.total);

    if report.ready() {
        println!("\n[READY] Enough images to start training!");
        println!("Next step: cargo run --bin train --release");
    } else {
        println!(
            "\n[WAIT] Need at least {} images total ({} per class)",
            report.required_total, MIN_IMAGES_PER_CLASS
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    fn touch(path: &Path) {
        File::create(path).unwrap();
    }

    #[test]
    fn counts_only_recognized_extensions() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.jpg"));
        touch(&dir.path().join("b.JPEG"));
        touch(&dir.path().join("c.Png"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("archive.zip"));
        touch(&dir.path().join("noextension"));

        assert_eq!(count_images(dir.path()), 3);
    }

    #[test]
    fn subdirectories_are_not_counted() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.jpg"));
        // A directory named like an image must not count, nor its contents.
        let sub = dir.path().join("b.jpg.d");
        fs::create_dir(&sub).unwrap();
        touch(&sub.join("nested.jpg"));
        let plain = dir.path().join("sub");
        fs::create_dir(&plain).unwrap();
        touch(&plain.join("deep.png"));

        assert_eq!(count_images(dir.path()), 1);
    }

    #[test]
    fn missing_directory_counts_zero() {
        assert_eq!(count_images(Path::new("definitely/not/here")), 0);
    }

    #[test]
    fn thirty_images_is_below_the_ninety_minimum() {
        // Three classes of 10 images each: total 30, requirement 90.
        let report = InventoryReport {
            counts: CLASSES.iter().map(|&c| (c.to_string(), 10)).collect(),
            total: 30,
            required_total: MIN_IMAGES_PER_CLASS * CLASSES.len(),
        };
        assert_eq!(report.required_total, 90);
        assert!(!report.ready());
    }
}
