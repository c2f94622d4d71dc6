/// Logging port injected into every store.
///
/// Remote failures are reported through this port instead of being
/// returned to callers.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
    fn debug(&self, message: &str);
}
