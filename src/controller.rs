use std::{
    fmt,
    panic::Location,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    call::Action, call_set::CallSet, Call, Error, Matcher, ReceiverId, Reporter, Result,
    Signature, Value,
};

/// Controller construction options.
///
/// # Example
///
/// ```rust
/// use mimic::{Controller, ControllerConfig, PanicReporter};
///
/// let config = ControllerConfig::new().with_overridable_expectations(true);
/// let ctrl = Controller::with_config(PanicReporter, config);
/// # let _ = ctrl;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerConfig {
    overridable_expectations: bool,
}

impl ControllerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store expectations in overridable mode: recording a call replaces
    /// any existing expectation for the same (receiver, method), modelling
    /// rebindable default stubs instead of a queue of one-shot
    /// expectations.
    pub fn with_overridable_expectations(mut self, overridable: bool) -> Self {
        self.overridable_expectations = overridable;
        self
    }

    pub fn overridable_expectations(&self) -> bool {
        self.overridable_expectations
    }
}

/// Orchestrates one test's expectations: recording, matching, and
/// end-of-test verification.
///
/// Create one `Controller` per test, record expectations against it, route
/// every mock invocation through [`observe`](Self::observe), and finish
/// with [`verify`](Self::verify). Dropping an unverified controller runs
/// verification as a backstop (skipped while the thread is panicking, so a
/// failing test reports its own failure rather than a pile-on).
///
/// All entry points serialize on an internal lock; the code under test may
/// call the mock from any number of threads.
///
/// # Example
///
/// ```rust
/// use mimic::matchers::eq;
/// use mimic::{ret, value, Controller, PanicReporter, ReceiverId, Signature};
///
/// let ctrl = Controller::new(PanicReporter);
/// let cache = ReceiverId::new("Cache");
///
/// let sig = Signature::new().arg::<String>().ret::<u64>();
/// ctrl.record(&cache, "len_of", sig, vec![eq(String::from("users"))])
///     .returns(vec![ret(42u64)]);
///
/// // ...inside the code under test:
/// let rets = ctrl
///     .observe(&cache, "len_of", vec![value(String::from("users"))])
///     .unwrap();
/// assert_eq!(rets[0].downcast_ref::<u64>(), Some(&42));
///
/// ctrl.verify().unwrap();
/// ```
pub struct Controller {
    reporter: Arc<dyn Reporter>,
    inner: Mutex<Inner>,
}

struct Inner {
    calls: CallSet,
    finished: bool,
}

impl Controller {
    /// Create a controller with default (queueing) expectation storage.
    pub fn new<R: Reporter + 'static>(reporter: R) -> Self {
        Self::with_config(reporter, ControllerConfig::default())
    }

    pub fn with_config<R: Reporter + 'static>(reporter: R, config: ControllerConfig) -> Self {
        let calls = if config.overridable_expectations() {
            CallSet::overridable()
        } else {
            CallSet::new()
        };
        Self {
            reporter: Arc::new(reporter),
            inner: Mutex::new(Inner {
                calls,
                finished: false,
            }),
        }
    }

    /// Record an expectation and return its handle for fluent
    /// configuration. An unconfigured expectation requires exactly one
    /// matching call.
    ///
    /// The matcher count is validated against the signature immediately: a
    /// non-variadic method needs one matcher per parameter; a variadic
    /// method needs at least one per fixed parameter (trailing matchers
    /// cover variadic elements individually, or one extra matcher covers
    /// the whole group).
    #[track_caller]
    pub fn record(
        &self,
        receiver: &ReceiverId,
        method: &str,
        signature: Signature,
        matchers: Vec<Box<dyn Matcher>>,
    ) -> Call {
        self.reporter.mark_helper();
        let origin = Location::caller();

        let fixed = signature.fixed_arity();
        if signature.is_variadic() {
            if matchers.len() < fixed {
                self.reporter.report_fatal(&format!(
                    "wrong number of argument matchers for {receiver}.{method}: got {}, want at least {fixed}",
                    matchers.len()
                ));
            }
        } else if matchers.len() != fixed {
            self.reporter.report_fatal(&format!(
                "wrong number of argument matchers for {receiver}.{method}: got {}, want {fixed}",
                matchers.len()
            ));
        }

        let call = Call::new(
            receiver.clone(),
            method,
            signature,
            matchers,
            Arc::clone(&self.reporter),
            origin,
        );
        tracing::trace!(call = %call, "recorded expectation");
        self.lock_inner().calls.add(call.clone());
        call
    }

    /// Route an observed invocation through the expectation engine.
    ///
    /// On a match the whole transaction (consumption, self-eviction when
    /// the maximum is reached, eviction of satisfied prerequisites)
    /// commits under the lock; argument writebacks, the attached action,
    /// and return-value production happen after it is released, so an
    /// action may reenter the mock. Returns the configured return values,
    /// the action's answer, or the signature's zero defaults, in that order
    /// of preference.
    ///
    /// On a mismatch the rendered diagnostic goes to
    /// [`Reporter::report_fatal`]; if the reporter returns, the same
    /// failure comes back as [`Error::UnexpectedCall`].
    ///
    /// [`Reporter::report_fatal`]: crate::Reporter::report_fatal
    #[track_caller]
    pub fn observe(
        &self,
        receiver: &ReceiverId,
        method: &str,
        mut args: Vec<Value>,
    ) -> Result<Vec<Value>> {
        self.reporter.mark_helper();
        let origin = Location::caller();

        let commit = {
            let mut inner = self.lock_inner();
            match inner.calls.find_match(receiver, method, &mut args) {
                Ok(call) => {
                    let commit = call.commit_match();
                    if commit.exhausted {
                        inner.calls.remove(&call);
                    }
                    for prereq in &commit.prereqs {
                        inner.calls.remove(prereq);
                    }
                    tracing::trace!(call = %call, "matched call");
                    commit
                }
                Err(reason) => {
                    drop(inner);
                    let call_desc = format!(
                        "{receiver}.{method}({args:?}) at {}:{}",
                        origin.file(),
                        origin.line()
                    );
                    self.reporter
                        .report_fatal(&format!("Unexpected call to {call_desc} because: {reason}"));
                    return Err(Error::UnexpectedCall {
                        call: call_desc,
                        reason,
                    });
                }
            }
        };

        for (index, mutation) in &commit.mutations {
            if let Some(arg) = args.get(*index) {
                if !(mutation)(arg.as_ref()) {
                    // The slot type was validated at record time; reaching
                    // this means the caller passed plain storage where the
                    // signature declares a slot, a defect in the mock
                    // itself.
                    panic!(
                        "set_arg: argument {index} of {receiver}.{method} is not the declared ArgSlot"
                    );
                }
            }
        }

        let answered = match &commit.action {
            Some(action) => {
                match &mut *action.lock().unwrap_or_else(PoisonError::into_inner) {
                    Action::Run(f) => {
                        f(&args);
                        None
                    }
                    Action::Answers(f) => Some(f(&args)),
                }
            }
            None => None,
        };

        Ok(answered.unwrap_or_else(|| commit.returns.iter().map(|thunk| thunk()).collect()))
    }

    /// Check that every remaining expectation reached its minimum call
    /// count.
    ///
    /// Each deficit is reported non-fatally, then one fatal report aborts;
    /// the typed error carries the rendered deficits. Once a verification
    /// has completed, later calls report nothing and return `Ok`.
    pub fn verify(&self) -> Result {
        self.reporter.mark_helper();
        let missing: Vec<String> = {
            let mut inner = self.lock_inner();
            if inner.finished {
                return Ok(());
            }
            inner.finished = true;
            inner
                .calls
                .unsatisfied()
                .iter()
                .map(|call| {
                    let deficit = call.deficit().unwrap_or(0);
                    format!("missing call(s) to {call}: {deficit} more call(s) required")
                })
                .collect()
        };
        tracing::debug!(missing = missing.len(), "verification sweep");
        if missing.is_empty() {
            return Ok(());
        }
        for entry in &missing {
            self.reporter.report_non_fatal(entry);
        }
        self.reporter
            .report_fatal("Aborting test due to missing call(s)");
        Err(Error::MissingCalls { missing })
    }

    /// True when every remaining expectation has reached its minimum,
    /// i.e. [`verify`](Self::verify) would pass right now.
    pub fn satisfied(&self) -> bool {
        self.lock_inner().calls.all_satisfied()
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        // A panic already in flight is the real failure; don't pile on.
        if std::thread::panicking() {
            return;
        }
        let _ = self.verify();
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock_inner();
        f.debug_struct("Controller")
            .field("finished", &inner.finished)
            .finish_non_exhaustive()
    }
}

/// Require the given calls to happen in the given order: sugar for
/// [`Call::after`] on each consecutive pair.
///
/// # Panics
///
/// Panics if any registered edge would close an ordering cycle.
pub fn in_order(calls: &[&Call]) {
    for pair in calls.windows(2) {
        pair[1].after(pair[0]);
    }
}
