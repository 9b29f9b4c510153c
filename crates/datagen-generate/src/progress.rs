/// Receives per-document progress while a collection is generated.
pub trait ProgressReporter: Send {
    fn start(&mut self, collection: &str, total: u64);
    fn advance(&mut self, done: u64);
    fn finish(&mut self);
}

/// Reporter that discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&mut self, _collection: &str, _total: u64) {}

    fn advance(&mut self, _done: u64) {}

    fn finish(&mut self) {}
}
