use std::io::{self, Write};

/// Asks a yes/no question on stdout and reads the answer from stdin.
///
/// Returns `true` only for an answer starting with `y` or `Y`. Used to gate
/// destructive or long-running steps (re-scraping, training on a thin
/// dataset, overwriting deployed model files).
pub fn confirm(question: &str) -> bool {
    print!("{} (y/n): ", question);
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().chars().next(), Some('y') | Some('Y'))
}
