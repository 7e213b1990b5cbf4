/// The single error type for all mimic operations.
///
/// Every fallible mimic API returns `mimic::Result<T>` (alias for
/// `Result<T, mimic::Error>`). Each violation is also delivered to the
/// Controller's [`Reporter`](crate::Reporter) before the typed error is
/// returned, so a harness that aborts inside the reporter never sees these
/// values, while a harness that records-and-continues can inspect them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An observed call matched no recorded expectation. `call` names the
    /// receiver, method, observed arguments, and call site; `reason` is the
    /// most specific failing dimension (wrong argument count, first
    /// mismatched argument, unmet prerequisite, exhausted, or never
    /// recorded).
    #[error("Unexpected call to {call} because: {reason}")]
    UnexpectedCall { call: String, reason: String },

    /// Verification found expectations that never reached their minimum
    /// call count. One rendered entry per deficient expectation.
    #[error("Aborting test due to {} missing call(s)", .missing.len())]
    MissingCalls { missing: Vec<String> },
}
