/// Order submission capability.
///
/// `PaperExecution` in `crates/paper` implements this for simulation.
/// Calls are fire-and-forget: callers never inspect an outcome, so any
/// failure handling belongs to the implementation.
pub trait ExecutionService: Send + Sync {
    /// Submit a buy of `size` units of `security` at the observed `price`.
    fn buy(&self, security: &str, price: f64, size: i64);

    /// Submit a sell of `size` units of `security` at the observed `price`.
    fn sell(&self, security: &str, price: f64, size: i64);
}
