use std::{
    any::TypeId,
    fmt,
    panic::Location,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    matcher::render_got,
    value::ReturnThunk,
    ArgSlot, CallId, CallValue, Matcher, ReceiverId, Reporter, Signature, Value,
};

/// Sentinel for "no upper bound on calls".
pub(crate) const UNBOUNDED: usize = usize::MAX;

/// One recorded expectation.
///
/// Created by [`Controller::record`](crate::Controller::record), which
/// returns a handle for fluent configuration:
///
/// ```ignore
/// let first = ctrl.record(&conn, "open", sig_open, vec![any()]);
/// ctrl.record(&conn, "query", sig_query, vec![eq(String::from("select 1"))])
///     .times(2)
///     .returns(vec![ret(Rows::default())])
///     .after(&first);
/// ```
///
/// Handles are cheap to clone and all refer to the same underlying
/// expectation; configure before the code under test starts calling the
/// mock. Configuring an expectation that has already begun matching is a
/// caller error and deliberately unguarded.
///
/// An expectation's bounds start at exactly one call (`min = max = 1`).
/// [`times`](Call::times), [`any_times`](Call::any_times),
/// [`min_times`](Call::min_times), and [`max_times`](Call::max_times)
/// adjust them; see each method for the widening rules.
#[derive(Clone)]
pub struct Call {
    inner: Arc<CallInner>,
}

struct CallInner {
    id: CallId,
    receiver: ReceiverId,
    method: String,
    origin: &'static Location<'static>,
    signature: Signature,
    matchers: Vec<Box<dyn Matcher>>,
    reporter: Arc<dyn Reporter>,
    state: Mutex<CallState>,
}

struct CallState {
    consumed: usize,
    min_calls: usize,
    max_calls: usize,
    prereqs: Vec<Call>,
    action: Option<Arc<Mutex<Action>>>,
    returns: Option<Vec<ReturnThunk>>,
    mutations: Vec<(usize, ArgMutation)>,
}

/// Side effect attached to an expectation, run on every match with the
/// observed arguments.
pub(crate) enum Action {
    /// Side effect only; returns come from `returns` or zero defaults.
    Run(Box<dyn FnMut(&[Value]) + Send>),
    /// Produces the return values itself.
    Answers(Box<dyn FnMut(&[Value]) -> Vec<Value> + Send>),
}

/// Writes a configured value into an [`ArgSlot`] argument; answers whether
/// the observed argument was a slot of the right type.
pub(crate) type ArgMutation = Arc<dyn Fn(&dyn CallValue) -> bool + Send + Sync>;

/// Everything the controller needs to finish an observed call after the
/// matching transaction has committed under its lock.
pub(crate) struct MatchCommit {
    pub(crate) exhausted: bool,
    pub(crate) prereqs: Vec<Call>,
    pub(crate) action: Option<Arc<Mutex<Action>>>,
    pub(crate) returns: Vec<ReturnThunk>,
    pub(crate) mutations: Vec<(usize, ArgMutation)>,
}

/// A typed return value for [`Call::returns`], produced by [`ret`].
pub struct ReturnValue {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) thunk: ReturnThunk,
}

/// Package a value for [`Call::returns`]. The value is cloned once per
/// matched call, so a repeated expectation yields it every time.
pub fn ret<T>(v: T) -> ReturnValue
where
    T: Clone + fmt::Debug + Send + Sync + 'static,
{
    ReturnValue {
        type_id: TypeId::of::<T>(),
        type_name: std::any::type_name::<T>(),
        thunk: Arc::new(move || Box::new(v.clone()) as Value),
    }
}

impl fmt::Debug for ReturnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReturnValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl Call {
    pub(crate) fn new(
        receiver: ReceiverId,
        method: &str,
        signature: Signature,
        matchers: Vec<Box<dyn Matcher>>,
        reporter: Arc<dyn Reporter>,
        origin: &'static Location<'static>,
    ) -> Self {
        Self {
            inner: Arc::new(CallInner {
                id: CallId::new(),
                receiver,
                method: method.to_string(),
                origin,
                signature,
                matchers,
                reporter,
                state: Mutex::new(CallState {
                    consumed: 0,
                    min_calls: 1,
                    max_calls: 1,
                    prereqs: Vec::new(),
                    action: None,
                    returns: None,
                    mutations: Vec::new(),
                }),
            }),
        }
    }

    /// Unique identity of this expectation.
    pub fn id(&self) -> CallId {
        self.inner.id
    }

    /// The stand-in this expectation was recorded against.
    pub fn receiver(&self) -> &ReceiverId {
        &self.inner.receiver
    }

    /// The method name this expectation was recorded against.
    pub fn method(&self) -> &str {
        &self.inner.method
    }

    // ==================== Bound configuration ====================

    /// Require exactly `n` calls.
    pub fn times(&self, n: usize) -> Call {
        let mut state = self.lock_state();
        state.min_calls = n;
        state.max_calls = n;
        drop(state);
        self.clone()
    }

    /// Allow any number of calls, including zero.
    pub fn any_times(&self) -> Call {
        let mut state = self.lock_state();
        state.min_calls = 0;
        state.max_calls = UNBOUNDED;
        drop(state);
        self.clone()
    }

    /// Require at least `n` calls.
    ///
    /// If the current maximum is the default `1`, the maximum widens to
    /// unbounded. The check is on the current value, not on whether it was
    /// set explicitly, so `times(1)` followed by `min_times(n)` widens the
    /// maximum as if the bounds had never been configured. Preserved for
    /// compatibility with existing suites.
    pub fn min_times(&self, n: usize) -> Call {
        let mut state = self.lock_state();
        state.min_calls = n;
        if state.max_calls == 1 {
            state.max_calls = UNBOUNDED;
        }
        drop(state);
        self.clone()
    }

    /// Allow at most `n` calls.
    ///
    /// If the current minimum is the default `1`, the minimum drops to
    /// zero. Value-based like [`min_times`](Call::min_times).
    pub fn max_times(&self, n: usize) -> Call {
        let mut state = self.lock_state();
        state.max_calls = n;
        if state.min_calls == 1 {
            state.min_calls = 0;
        }
        drop(state);
        self.clone()
    }

    // ==================== Effects ====================

    /// Set the return values yielded on every match.
    ///
    /// Values are type-checked against the signature's declared return
    /// slots immediately; a mismatch is reported fatally and the
    /// configuration is discarded. Unset returns fall back to the declared
    /// zero values.
    pub fn returns(&self, values: Vec<ReturnValue>) -> Call {
        let sig = &self.inner.signature;
        if values.len() != sig.return_arity() {
            self.inner.reporter.report_fatal(&format!(
                "wrong number of return values for {}: got {}, want {}",
                self,
                values.len(),
                sig.return_arity()
            ));
            return self.clone();
        }
        for (i, v) in values.iter().enumerate() {
            // Index is in range: lengths were just compared.
            let (want_id, want_name) = sig.return_slot(i).expect("return slot in range");
            if v.type_id != want_id {
                self.inner.reporter.report_fatal(&format!(
                    "wrong type of return value at index {} for {}: got {}, want {}",
                    i, self, v.type_name, want_name
                ));
                return self.clone();
            }
        }
        self.lock_state().returns = Some(values.into_iter().map(|v| v.thunk).collect());
        self.clone()
    }

    /// Attach a side effect, run on every match with the observed
    /// arguments. Returns still come from [`returns`](Call::returns) or the
    /// zero defaults. Replaces any previously attached action.
    pub fn run<F>(&self, f: F) -> Call
    where
        F: FnMut(&[Value]) + Send + 'static,
    {
        self.lock_state().action = Some(Arc::new(Mutex::new(Action::Run(Box::new(f)))));
        self.clone()
    }

    /// Attach an action that also produces the return values, overriding
    /// [`returns`](Call::returns) and the zero defaults. Replaces any
    /// previously attached action.
    pub fn answers<F>(&self, f: F) -> Call
    where
        F: FnMut(&[Value]) -> Vec<Value> + Send + 'static,
    {
        self.lock_state().action = Some(Arc::new(Mutex::new(Action::Answers(Box::new(f)))));
        self.clone()
    }

    /// On every match, write `value` into the [`ArgSlot`] argument at
    /// `index`.
    ///
    /// The argument must be declared via
    /// [`Signature::out_arg`](crate::Signature::out_arg) with a matching
    /// type; a mismatch is reported fatally at record time and the
    /// writeback is discarded.
    pub fn set_arg<T>(&self, index: usize, value: T) -> Call
    where
        T: Clone + fmt::Debug + Send + Sync + 'static,
    {
        match self.inner.signature.out_slot(index) {
            None => {
                self.inner.reporter.report_fatal(&format!(
                    "set_arg: argument {index} of {self} is not declared as a writable slot"
                ));
            }
            Some((want_id, want_name)) => {
                if TypeId::of::<T>() != want_id {
                    self.inner.reporter.report_fatal(&format!(
                        "set_arg: wrong type for argument {index} of {self}: got {}, want {want_name}",
                        std::any::type_name::<T>()
                    ));
                } else {
                    let mutation: ArgMutation =
                        Arc::new(move |actual| match actual.downcast_ref::<ArgSlot<T>>() {
                            Some(slot) => {
                                slot.set(value.clone());
                                true
                            }
                            None => false,
                        });
                    self.lock_state().mutations.push((index, mutation));
                }
            }
        }
        self.clone()
    }

    // ==================== Ordering ====================

    /// Require `prereq` to be satisfied before this expectation may match.
    ///
    /// Once this expectation matches, `prereq` is evicted from the expected
    /// pool even when its own maximum is unreached: calling it again
    /// afterwards fails. See also [`in_order`](crate::in_order).
    ///
    /// # Panics
    ///
    /// Panics if the new edge would close a cycle in the ordering graph.
    /// That is a defect in the test itself, never a soft failure.
    pub fn after(&self, prereq: &Call) -> Call {
        if prereq.depends_on(self) {
            panic!("Loop in call order between {self} and {prereq}");
        }
        self.lock_state().prereqs.push(prereq.clone());
        self.clone()
    }

    /// True if `target` is reachable from this call through prerequisite
    /// edges (including this call itself).
    fn depends_on(&self, target: &Call) -> bool {
        if self.inner.id == target.inner.id {
            return true;
        }
        let prereqs = self.lock_state().prereqs.clone();
        prereqs.iter().any(|p| p.depends_on(target))
    }

    // ==================== Engine internals ====================

    /// True once the minimum call count has been reached.
    pub(crate) fn satisfied(&self) -> bool {
        let state = self.lock_state();
        state.consumed >= state.min_calls
    }

    /// Check the observed arguments and ordering state against this
    /// expectation. `Err` carries the rendered reason for the first failing
    /// dimension: argument count, then first mismatched argument, then
    /// unmet prerequisite. `args` is unchanged on return.
    pub(crate) fn matches(&self, args: &mut Vec<Value>) -> Result<(), String> {
        let sig = &self.inner.signature;
        let matchers = &self.inner.matchers;
        let m = matchers.len();
        let fixed = sig.fixed_arity();

        if !sig.is_variadic() {
            if args.len() != m {
                return Err(self.wrong_count(args.len(), m));
            }
            for (i, matcher) in matchers.iter().enumerate() {
                if !matcher.matches(args[i].as_ref()) {
                    return Err(self.arg_mismatch(i, args));
                }
            }
        } else if args.len() == m {
            // One matcher per actual argument; trailing matchers cover the
            // variadic elements individually.
            for (i, matcher) in matchers.iter().enumerate() {
                if matcher.matches(args[i].as_ref()) {
                    continue;
                }
                // A whole-group matcher in the final position may still
                // accept the one-element group.
                if i == m - 1 && m == fixed + 1 && matcher.matches_group(&args[fixed..]) {
                    break;
                }
                return Err(self.arg_mismatch(i, args));
            }
        } else if m == fixed + 1 && args.len() >= fixed {
            // The final matcher covers the whole trailing group.
            for (i, matcher) in matchers.iter().take(fixed).enumerate() {
                if !matcher.matches(args[i].as_ref()) {
                    return Err(self.arg_mismatch(i, args));
                }
            }
            if !matchers[fixed].matches_group(&args[fixed..]) {
                return Err(self.group_mismatch(args, fixed));
            }
        } else {
            return Err(self.wrong_count(args.len(), m));
        }

        let state = self.lock_state();
        for prereq in &state.prereqs {
            if !prereq.satisfied() {
                return Err(format!(
                    "expected call at {} doesn't have a prerequisite call satisfied:\n{prereq} should be called before {self}",
                    self.origin()
                ));
            }
        }
        if state.consumed >= state.max_calls {
            return Err(format!(
                "expected call at {} has already been called the max number of times",
                self.origin()
            ));
        }
        Ok(())
    }

    /// Commit a successful match: bump consumption, drop the prerequisite
    /// set (returning it for eviction), and hand back everything needed to
    /// finish the call outside the controller's lock.
    pub(crate) fn commit_match(&self) -> MatchCommit {
        let mut state = self.lock_state();
        state.consumed += 1;
        let prereqs = std::mem::take(&mut state.prereqs);
        MatchCommit {
            exhausted: state.consumed >= state.max_calls,
            prereqs,
            action: state.action.clone(),
            returns: state
                .returns
                .clone()
                .unwrap_or_else(|| self.inner.signature.zero_returns()),
            mutations: state.mutations.clone(),
        }
    }

    /// Below-minimum deficit at verification time, if any.
    pub(crate) fn deficit(&self) -> Option<usize> {
        let state = self.lock_state();
        (state.consumed < state.min_calls).then(|| state.min_calls - state.consumed)
    }

    fn origin(&self) -> String {
        format!("{}:{}", self.inner.origin.file(), self.inner.origin.line())
    }

    fn wrong_count(&self, got: usize, want: usize) -> String {
        format!(
            "expected call at {} has the wrong number of arguments. Got: {got}, want: {want}",
            self.origin()
        )
    }

    fn arg_mismatch(&self, index: usize, args: &[Value]) -> String {
        let matcher = self.inner.matchers[index].as_ref();
        format!(
            "expected call at {} doesn't match the argument at index {index}.\nGot: {}\nWant: {}",
            self.origin(),
            render_got(matcher, args[index].as_ref()),
            matcher.describe()
        )
    }

    /// Mismatch diagnostic for a whole-group matcher. The trailing group is
    /// briefly re-assembled into one boxed value so a
    /// [`Matcher::format_got`] override sees the same shape it would match.
    fn group_mismatch(&self, args: &mut Vec<Value>, fixed: usize) -> String {
        let matcher = self.inner.matchers[fixed].as_ref();
        let tail = args.split_off(fixed);
        let grouped: Value = Box::new(tail);
        let got = matcher
            .format_got(grouped.as_ref())
            .unwrap_or_else(|| format!("{grouped:?}"));
        let tail = grouped
            .into_any()
            .downcast::<Vec<Value>>()
            .expect("variadic group round-trips");
        args.extend(*tail);
        format!(
            "expected call at {} doesn't match the argument at index {fixed}.\nGot: {got}\nWant: {}",
            self.origin(),
            matcher.describe()
        )
    }

    fn lock_state(&self) -> MutexGuard<'_, CallState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wants: Vec<String> = self.inner.matchers.iter().map(|m| m.describe()).collect();
        write!(
            f,
            "{}.{}([{}]) {}",
            self.inner.receiver,
            self.inner.method,
            wants.join(", "),
            self.origin()
        )
    }
}

impl fmt::Debug for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock_state();
        f.debug_struct("Call")
            .field("receiver", &self.inner.receiver)
            .field("method", &self.inner.method)
            .field("consumed", &state.consumed)
            .field("min_calls", &state.min_calls)
            .field("max_calls", &state.max_calls)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::{any, eq, group};
    use crate::{value, Reporter};

    /// Fatal reports panic so misconfiguration cannot pass silently.
    struct StrictReporter;

    impl Reporter for StrictReporter {
        fn report_non_fatal(&self, _message: &str) {}
        fn report_fatal(&self, message: &str) {
            panic!("{message}");
        }
    }

    #[track_caller]
    fn make_call(signature: Signature, matchers: Vec<Box<dyn Matcher>>) -> Call {
        Call::new(
            ReceiverId::new("Subject"),
            "foo_method",
            signature,
            matchers,
            Arc::new(StrictReporter),
            Location::caller(),
        )
    }

    fn bounds(call: &Call) -> (usize, usize) {
        let state = call.lock_state();
        (state.min_calls, state.max_calls)
    }

    #[test]
    fn bounds_default_to_exactly_one_call() {
        let call = make_call(Signature::new(), vec![]);
        assert_eq!(bounds(&call), (1, 1));
    }

    #[test]
    fn times_pins_both_bounds() {
        let call = make_call(Signature::new(), vec![]).times(3);
        assert_eq!(bounds(&call), (3, 3));
    }

    #[test]
    fn any_times_clears_the_minimum_and_unbounds_the_maximum() {
        let call = make_call(Signature::new(), vec![]).any_times();
        assert_eq!(bounds(&call), (0, UNBOUNDED));
    }

    #[test]
    fn min_times_widens_a_default_maximum() {
        let call = make_call(Signature::new(), vec![]).min_times(2);
        assert_eq!(bounds(&call), (2, UNBOUNDED));
    }

    #[test]
    fn min_times_keeps_an_adjusted_maximum() {
        let call = make_call(Signature::new(), vec![]).max_times(5).min_times(2);
        assert_eq!(bounds(&call), (2, 5));
    }

    #[test]
    fn min_times_widens_even_after_explicit_times_one() {
        // The widening rule is value-based, so an explicit times(1) is
        // indistinguishable from the default.
        let call = make_call(Signature::new(), vec![]).times(1).min_times(2);
        assert_eq!(bounds(&call), (2, UNBOUNDED));
    }

    #[test]
    fn max_times_drops_a_default_minimum_to_zero() {
        let call = make_call(Signature::new(), vec![]).max_times(4);
        assert_eq!(bounds(&call), (0, 4));
    }

    #[test]
    fn max_times_keeps_an_adjusted_minimum() {
        let call = make_call(Signature::new(), vec![]).times(3).max_times(5);
        assert_eq!(bounds(&call), (3, 5));
    }

    #[test]
    fn positional_matching_checks_each_argument() {
        let sig = Signature::new().arg::<i32>().arg::<&str>();
        let call = make_call(sig, vec![eq(1), eq("a")]);
        assert!(call.matches(&mut vec![value(1), value("a")]).is_ok());

        let err = call.matches(&mut vec![value(1), value("b")]).unwrap_err();
        assert!(err.contains("doesn't match the argument at index 1"), "{err}");
        assert!(err.contains("Got: \"b\""), "{err}");
    }

    #[test]
    fn wrong_argument_count_reports_got_and_want() {
        let call = make_call(Signature::new().arg::<i32>(), vec![eq(1)]);
        let err = call.matches(&mut vec![value(1), value(2)]).unwrap_err();
        assert!(err.contains("wrong number of arguments. Got: 2, want: 1"), "{err}");
    }

    #[test]
    fn variadic_positional_and_group_matchers_accept_the_same_call() {
        let sig = Signature::new().arg::<i32>().variadic();

        let positional = make_call(sig.clone(), vec![eq(0), eq("1"), eq("2")]);
        assert!(positional
            .matches(&mut vec![value(0), value("1"), value("2")])
            .is_ok());

        let grouped = make_call(
            sig,
            vec![
                eq(0),
                group("is [\"1\", \"2\"]", |vs| {
                    vs.len() == 2
                        && vs[0].downcast_ref::<&str>() == Some(&"1")
                        && vs[1].downcast_ref::<&str>() == Some(&"2")
                }),
            ],
        );
        assert!(grouped
            .matches(&mut vec![value(0), value("1"), value("2")])
            .is_ok());
    }

    #[test]
    fn variadic_group_matcher_accepts_a_single_element_group() {
        // Equal matcher and argument counts take the positional path first;
        // the final matcher still gets a crack at the one-element group.
        let sig = Signature::new().arg::<i32>().variadic();
        let call = make_call(
            sig,
            vec![eq(1), group("is [\"1\"]", |vs| vs.len() == 1)],
        );
        assert!(call.matches(&mut vec![value(1), value("1")]).is_ok());
    }

    #[test]
    fn variadic_group_matcher_accepts_an_empty_group() {
        let sig = Signature::new().arg::<i32>().variadic();
        let call = make_call(sig, vec![eq(1), group("is empty", |vs| vs.is_empty())]);
        assert!(call.matches(&mut vec![value(1)]).is_ok());
    }

    #[test]
    fn variadic_mismatch_leaves_arguments_intact() {
        let sig = Signature::new().arg::<i32>().variadic();
        let call = make_call(sig, vec![eq(1), group("never", |_| false)]);
        let mut args = vec![value(1), value("x"), value("y")];
        let err = call.matches(&mut args).unwrap_err();
        assert!(err.contains("doesn't match the argument at index 1"), "{err}");
        assert_eq!(args.len(), 3);
        assert_eq!(args[2].downcast_ref::<&str>(), Some(&"y"));
    }

    #[test]
    fn exhausted_call_reports_max_reached() {
        let call = make_call(Signature::new(), vec![]).times(0);
        let err = call.matches(&mut vec![]).unwrap_err();
        assert!(err.contains("has already been called the max number of times"), "{err}");
    }

    #[test]
    fn unmet_prerequisite_is_reported_after_argument_checks() {
        let first = make_call(Signature::new(), vec![]);
        let second = make_call(Signature::new(), vec![]).after(&first);
        let err = second.matches(&mut vec![]).unwrap_err();
        assert!(err.contains("doesn't have a prerequisite call satisfied"), "{err}");
        assert!(err.contains("should be called before"), "{err}");
    }

    #[test]
    fn prerequisite_at_its_minimum_is_satisfied() {
        let first = make_call(Signature::new(), vec![]).any_times();
        let second = make_call(Signature::new(), vec![]).after(&first);
        // min_calls is zero, so the prerequisite is satisfied untouched.
        assert!(second.matches(&mut vec![]).is_ok());
    }

    #[test]
    #[should_panic(expected = "Loop in call order")]
    fn closing_an_ordering_cycle_panics() {
        let a = make_call(Signature::new(), vec![]);
        let b = make_call(Signature::new(), vec![]);
        let c = make_call(Signature::new(), vec![]);
        a.after(&b);
        b.after(&c);
        c.after(&a);
    }

    #[test]
    #[should_panic(expected = "Loop in call order")]
    fn a_call_cannot_depend_on_itself() {
        let a = make_call(Signature::new(), vec![]);
        a.after(&a);
    }

    #[test]
    fn commit_drops_prerequisites_and_reports_exhaustion() {
        let first = make_call(Signature::new(), vec![]).any_times();
        let second = make_call(Signature::new(), vec![]).after(&first);

        let commit = second.commit_match();
        assert!(commit.exhausted);
        assert_eq!(commit.prereqs.len(), 1);
        assert_eq!(commit.prereqs[0].id(), first.id());
        // The prerequisite set is consumed by the commit.
        assert!(second.lock_state().prereqs.is_empty());
    }

    #[test]
    #[should_panic(expected = "wrong type of return value")]
    fn returns_rejects_a_mismatched_type() {
        let call = make_call(Signature::new().ret::<u64>(), vec![]);
        call.returns(vec![ret("not a u64")]);
    }

    #[test]
    #[should_panic(expected = "wrong number of return values")]
    fn returns_rejects_a_mismatched_count() {
        let call = make_call(Signature::new().ret::<u64>(), vec![]);
        call.returns(vec![ret(1u64), ret(2u64)]);
    }

    #[test]
    #[should_panic(expected = "not declared as a writable slot")]
    fn set_arg_rejects_a_plain_argument() {
        let call = make_call(Signature::new().arg::<i32>(), vec![any()]);
        call.set_arg(0, 5);
    }

    #[test]
    #[should_panic(expected = "wrong type for argument")]
    fn set_arg_rejects_a_mismatched_slot_type() {
        let call = make_call(Signature::new().out_arg::<Vec<u8>>(), vec![any()]);
        call.set_arg(0, "blah");
    }

    #[test]
    fn deficit_counts_remaining_required_calls() {
        let call = make_call(Signature::new(), vec![]).times(2);
        assert_eq!(call.deficit(), Some(2));
        call.commit_match();
        assert_eq!(call.deficit(), Some(1));
        call.commit_match();
        assert_eq!(call.deficit(), None);
    }
}
