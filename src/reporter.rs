/// Failure-reporting capability consumed by the [`Controller`].
///
/// The engine never decides how a test dies; it hands every violation to a
/// `Reporter` and lets the host harness translate it. Implement this over
/// your harness's native failure primitive. All methods are called with the
/// Controller's lock released, so an implementation may unwind freely.
///
/// - [`report_non_fatal`] records a failure but lets execution continue
///   (used for per-expectation deficits during verification).
/// - [`report_fatal`] records a failure and is expected to abort the
///   current unit of work by whatever means the harness uses (panic,
///   early-return signal). If it returns, the engine surfaces the same
///   failure as a typed [`Error`](crate::Error) instead.
/// - [`mark_helper`] is invoked on entry to every engine API so a harness
///   can attribute the diagnostic to the caller's frame rather than the
///   engine's; the default is a no-op.
///
/// [`Controller`]: crate::Controller
/// [`report_non_fatal`]: Reporter::report_non_fatal
/// [`report_fatal`]: Reporter::report_fatal
/// [`mark_helper`]: Reporter::mark_helper
pub trait Reporter: Send + Sync {
    /// Record a failure and continue.
    fn report_non_fatal(&self, message: &str);

    /// Record a failure and abort the current unit of work.
    fn report_fatal(&self, message: &str);

    /// Attribute subsequent diagnostics to the caller's frame.
    fn mark_helper(&self) {}
}

/// Stock reporter for plain `#[test]` functions.
///
/// Fatal failures panic (failing the test through the normal unwind);
/// non-fatal failures are logged at `error` level and otherwise rely on
/// [`Controller::verify`](crate::Controller::verify) returning the typed
/// error.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicReporter;

impl Reporter for PanicReporter {
    fn report_non_fatal(&self, message: &str) {
        tracing::error!("{message}");
    }

    fn report_fatal(&self, message: &str) {
        panic!("{message}");
    }
}
