//! Console rendering of evaluation metrics: per-class table, classification
//! report with macro/weighted averages, and the confusion matrix in raw
//! counts and row percentages.

use crate::eval::metrics::Metrics;

const LINE: &str = "------------------------------------------------------------";

pub fn print_report(metrics: &Metrics, class_names: &[String]) {
    println!("\n{}", "=".repeat(60));
    println!("DETAILED METRICS");
    println!("{}", "=".repeat(60));

    println!("\n{:<30} {:.2}%", "Overall Accuracy:", metrics.accuracy() * 100.0);
    println!(
        "{:<30} {:.2}%",
        "Overall Error Rate:",
        (1.0 - metrics.accuracy()) * 100.0
    );

    println!("\n{LINE}");
    println!("Per-Class Metrics:");
    println!("{LINE}");
    println!(
        "\n{:<20} {:>11} {:>11} {:>11} {:>11}",
        "Class", "Precision", "Recall", "F1-Score", "Support"
    );
    println!("{LINE}");
    for (i, name) in class_names.iter().enumerate() {
        println!(
            "{:<20} {:>10.2}% {:>10.2}% {:>10.2}% {:>11}",
            name,
            metrics.precision[i] * 100.0,
            metrics.recall[i] * 100.0,
            metrics.f1[i] * 100.0,
            metrics.support[i]
        );
    }

    println!("\n{LINE}");
    println!("Per-Class Accuracy:");
    println!("{LINE}");
    for (i, name) in class_names.iter().enumerate() {
        match metrics.per_class_accuracy(i) {
            Some(acc) => println!(
                "{:<20} {:>10.2}% ({}/{} correct)",
                name,
                acc * 100.0,
                metrics.confusion[i][i],
                metrics.support[i]
            ),
            None => println!("{:<20} {:>30}", name, "N/A (no samples)"),
        }
    }

    print_classification_report(metrics, class_names);
    print_confusion_matrices(metrics, class_names);

    println!("\n{}", "=".repeat(60));
    println!("EVALUATION SUMMARY");
    println!("{}", "=".repeat(60));
    println!("{:<22} {:.2}%", "Overall Accuracy:", metrics.accuracy() * 100.0);
    println!("{:<22} {}", "Samples Evaluated:", metrics.total);
    println!("{:<22} {}", "Correct Predictions:", metrics.correct);
    println!("{:<22} {}", "Incorrect Predictions:", metrics.total - metrics.correct);
}

fn print_classification_report(metrics: &Metrics, class_names: &[String]) {
    println!("\n{}", "=".repeat(60));
    println!("Classification Report:");
    println!("{}", "=".repeat(60));

    println!(
        "\n{:<20} {:>10} {:>10} {:>10} {:>10}",
        "", "precision", "recall", "f1-score", "support"
    );
    for (i, name) in class_names.iter().enumerate() {
        println!(
            "{:<20} {:>10.4} {:>10.4} {:>10.4} {:>10}",
            name, metrics.precision[i], metrics.recall[i], metrics.f1[i], metrics.support[i]
        );
    }
    println!();
    println!(
        "{:<20} {:>10} {:>10} {:>10.4} {:>10}",
        "accuracy", "", "", metrics.accuracy(), metrics.total
    );
    println!(
        "{:<20} {:>10.4} {:>10.4} {:>10.4} {:>10}",
        "macro avg",
        Metrics::macro_avg(&metrics.precision),
        Metrics::macro_avg(&metrics.recall),
        Metrics::macro_avg(&metrics.f1),
        metrics.total
    );
    println!(
        "{:<20} {:>10.4} {:>10.4} {:>10.4} {:>10}",
        "weighted avg",
        metrics.weighted_avg(&metrics.precision),
        metrics.weighted_avg(&metrics.recall),
        metrics.weighted_avg(&metrics.f1),
        metrics.total
    );
}

fn print_confusion_matrices(metrics: &Metrics, class_names: &[String]) {
    println!("\n{}", "=".repeat(60));
    println!("Confusion Matrix:");
    println!("{}", "=".repeat(60));

    println!("\nPredicted ->");
    print!("{:<20}", "");
    for name in class_names {
        print!("{:<15}", truncate(name, 15));
    }
    println!();
    for (i, name) in class_names.iter().enumerate() {
        print!("{:<20}", truncate(name, 15));
        for j in 0..metrics.n_classes {
            print!("{:<15}", metrics.confusion[i][j]);
        }
        println!(" (Actual: {})", name);
    }

    println!("\nConfusion Matrix (Percentages):");
    print!("{:<20}", "");
    for name in class_names {
        print!("{:<15}", truncate(name, 15));
    }
    println!();
    let rows = metrics.confusion_percentages();
    for (i, name) in class_names.iter().enumerate() {
        print!("{:<20}", truncate(name, 15));
        match &rows[i] {
            Some(row) => {
                for pct in row {
                    print!("{:>6.1}%{:<8}", pct, "");
                }
            }
            None => print!("{:^15}", "N/A"),
        }
        println!();
    }
}

/// First `max` characters of `s`, respecting char boundaries.
fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("VINTAGE_FILM", 15), "VINTAGE_FILM");
        assert_eq!(truncate("MODERN_DIGITAL_X", 15), "MODERN_DIGITAL_");
        assert_eq!(truncate(" größenwahn", 4), "größ");
        assert_eq!(truncate("", 5), "");
    }
}
