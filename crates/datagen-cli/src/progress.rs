use std::io::{self, Write};

use datagen_generate::ProgressReporter;

/// Single-line progress on stderr, redrawn whenever the percentage moves.
#[derive(Debug, Default)]
pub struct StderrProgress {
    collection: String,
    total: u64,
    last_percent: Option<u64>,
}

impl StderrProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn progress_line(collection: &str, done: u64, total: u64) -> String {
    format!(
        ">>> ['{collection}'] Generated {done} documents of {total} ({}%)",
        percent(done, total)
    )
}

fn percent(done: u64, total: u64) -> u64 {
    if total == 0 {
        100
    } else {
        done.saturating_mul(100) / total
    }
}

impl ProgressReporter for StderrProgress {
    fn start(&mut self, collection: &str, total: u64) {
        self.collection = collection.to_string();
        self.total = total;
        self.last_percent = None;
        eprintln!("\n>>> Building '{collection}' collection, {total} documents to build.");
    }

    fn advance(&mut self, done: u64) {
        let current = percent(done, self.total);
        if self.last_percent == Some(current) {
            return;
        }
        self.last_percent = Some(current);
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "\r{}", progress_line(&self.collection, done, self.total));
        let _ = stderr.flush();
    }

    fn finish(&mut self) {
        if self.last_percent.is_some() {
            eprintln!();
        }
        eprintln!(">>> Completed '{}' collection.", self.collection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_progress_line() {
        assert_eq!(
            progress_line("posts", 5, 20),
            ">>> ['posts'] Generated 5 documents of 20 (25%)"
        );
    }

    #[test]
    fn empty_collection_is_complete() {
        assert_eq!(percent(0, 0), 100);
    }
}
