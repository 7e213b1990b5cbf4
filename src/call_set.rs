use std::collections::HashMap;

use crate::{Call, ReceiverId, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CallSetKey {
    receiver: ReceiverId,
    method: String,
}

/// Storage for recorded expectations, keyed by (receiver, method).
///
/// Two pools per key: `expected` holds calls still eligible to match, in
/// insertion order (oldest matches first among equals); `exhausted` holds
/// calls that reached their maximum or were evicted as satisfied
/// prerequisites, kept only so diagnostics can distinguish "called too
/// often" from "never recorded".
///
/// A set built with [`overridable`](CallSet::overridable) replaces instead
/// of appending: adding a call first clears both pools for its key, so at
/// most one expectation per key exists at a time. This models rebindable
/// default stubs rather than a queue of one-shot expectations.
pub(crate) struct CallSet {
    overridable: bool,
    expected: HashMap<CallSetKey, Vec<Call>>,
    exhausted: HashMap<CallSetKey, Vec<Call>>,
}

impl CallSet {
    pub(crate) fn new() -> Self {
        Self {
            overridable: false,
            expected: HashMap::new(),
            exhausted: HashMap::new(),
        }
    }

    pub(crate) fn overridable() -> Self {
        Self {
            overridable: true,
            ..Self::new()
        }
    }

    fn key_of(call: &Call) -> CallSetKey {
        CallSetKey {
            receiver: call.receiver().clone(),
            method: call.method().to_string(),
        }
    }

    pub(crate) fn add(&mut self, call: Call) {
        let key = Self::key_of(&call);
        if self.overridable {
            self.expected.remove(&key);
            self.exhausted.remove(&key);
        }
        self.expected.entry(key).or_default().push(call);
    }

    /// Evict a call from the expected pool into the exhausted pool,
    /// preserving the relative order of the calls left behind. A call that
    /// is no longer expected is left where it is.
    pub(crate) fn remove(&mut self, call: &Call) {
        let key = Self::key_of(call);
        let Some(seq) = self.expected.get_mut(&key) else {
            return;
        };
        if let Some(pos) = seq.iter().position(|c| c.id() == call.id()) {
            let evicted = seq.remove(pos);
            tracing::debug!(call = %evicted, "expectation exhausted");
            self.exhausted.entry(key).or_default().push(evicted);
        }
    }

    /// Find the first expectation in insertion order that accepts the
    /// observed call. `Err` carries the rendered failure reason: built from
    /// the nearest candidate when one exists, otherwise distinguishing an
    /// exhausted method from one that was never recorded.
    pub(crate) fn find_match(
        &self,
        receiver: &ReceiverId,
        method: &str,
        args: &mut Vec<Value>,
    ) -> Result<Call, String> {
        let key = CallSetKey {
            receiver: receiver.clone(),
            method: method.to_string(),
        };
        let expected = self.expected.get(&key).map(Vec::as_slice).unwrap_or(&[]);
        if expected.is_empty() {
            let was_recorded = self
                .exhausted
                .get(&key)
                .is_some_and(|seq| !seq.is_empty());
            return Err(if was_recorded {
                format!("all expected calls for the method {method:?} have been exhausted")
            } else {
                format!("there are no expected calls of the method {method:?} for that receiver")
            });
        }

        let mut nearest_failure = None;
        for call in expected {
            match call.matches(args) {
                Ok(()) => return Ok(call.clone()),
                Err(reason) => {
                    if nearest_failure.is_none() {
                        nearest_failure = Some(reason);
                    }
                }
            }
        }
        Err(nearest_failure.expect("at least one candidate was scanned"))
    }

    /// Expectations still below their minimum call count.
    pub(crate) fn unsatisfied(&self) -> Vec<Call> {
        self.expected
            .values()
            .flatten()
            .filter(|call| !call.satisfied())
            .cloned()
            .collect()
    }

    /// True when every remaining expectation has reached its minimum.
    pub(crate) fn all_satisfied(&self) -> bool {
        self.expected
            .values()
            .flatten()
            .all(|call| call.satisfied())
    }

    #[cfg(test)]
    fn expected_len(&self, receiver: &ReceiverId, method: &str) -> usize {
        self.expected
            .get(&CallSetKey {
                receiver: receiver.clone(),
                method: method.to_string(),
            })
            .map_or(0, Vec::len)
    }

    #[cfg(test)]
    fn exhausted_len(&self, receiver: &ReceiverId, method: &str) -> usize {
        self.exhausted
            .get(&CallSetKey {
                receiver: receiver.clone(),
                method: method.to_string(),
            })
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use std::panic::Location;
    use std::sync::Arc;

    use super::*;
    use crate::matchers::eq;
    use crate::{value, Matcher, Reporter, Signature};

    struct StrictReporter;

    impl Reporter for StrictReporter {
        fn report_non_fatal(&self, _message: &str) {}
        fn report_fatal(&self, message: &str) {
            panic!("{message}");
        }
    }

    #[track_caller]
    fn make_call(receiver: &ReceiverId, matchers: Vec<Box<dyn Matcher>>) -> Call {
        let mut sig = Signature::new();
        for _ in 0..matchers.len() {
            sig = sig.arg::<i32>();
        }
        Call::new(
            receiver.clone(),
            "test_method",
            sig,
            matchers,
            Arc::new(StrictReporter),
            Location::caller(),
        )
    }

    #[test]
    fn add_then_find_match_returns_a_call() {
        let receiver = ReceiverId::new("TestReceiver");
        let mut cs = CallSet::new();
        for _ in 0..10 {
            cs.add(make_call(&receiver, vec![]));
        }
        cs.find_match(&receiver, "test_method", &mut vec![])
            .expect("a recorded call should match");
    }

    #[test]
    fn overridable_add_clears_previous_expected_and_exhausted() {
        let receiver = ReceiverId::new("TestReceiver");
        let mut cs = CallSet::overridable();

        cs.add(make_call(&receiver, vec![]));
        assert_eq!(cs.expected_len(&receiver, "test_method"), 1);

        let first = cs
            .find_match(&receiver, "test_method", &mut vec![])
            .unwrap();
        first.commit_match();
        cs.remove(&first);
        assert_eq!(cs.exhausted_len(&receiver, "test_method"), 1);

        cs.add(make_call(&receiver, vec![]));
        assert_eq!(cs.expected_len(&receiver, "test_method"), 1);
        assert_eq!(cs.exhausted_len(&receiver, "test_method"), 0);
    }

    #[test]
    fn remove_preserves_relative_order_of_the_rest() {
        let receiver = ReceiverId::new("TestReceiver");
        let mut cs = CallSet::new();

        let calls: Vec<Call> = (0..10).map(|_| make_call(&receiver, vec![])).collect();
        for call in &calls {
            cs.add(call.clone());
        }

        // Remove from the front, verifying the survivors keep their
        // insertion order each time.
        for (removed, call) in calls.iter().enumerate() {
            let key = CallSet::key_of(call);
            let remaining: Vec<_> = cs.expected[&key].iter().map(Call::id).collect();
            let want: Vec<_> = calls[removed..].iter().map(Call::id).collect();
            assert_eq!(remaining, want);
            cs.remove(call);
        }
    }

    #[test]
    fn first_matching_call_in_insertion_order_wins() {
        let receiver = ReceiverId::new("TestReceiver");
        let mut cs = CallSet::new();
        let first = make_call(&receiver, vec![eq(1)]);
        let second = make_call(&receiver, vec![eq(1)]);
        cs.add(first.clone());
        cs.add(second.clone());

        let found = cs
            .find_match(&receiver, "test_method", &mut vec![value(1)])
            .unwrap();
        assert_eq!(found.id(), first.id());

        // Once the first is evicted, the second becomes eligible.
        first.commit_match();
        cs.remove(&first);
        let found = cs
            .find_match(&receiver, "test_method", &mut vec![value(1)])
            .unwrap();
        assert_eq!(found.id(), second.id());
    }

    #[test]
    fn exhausted_key_reports_a_distinct_reason() {
        let receiver = ReceiverId::new("TestReceiver");
        let mut cs = CallSet::new();
        let call = make_call(&receiver, vec![]);
        cs.add(call.clone());
        call.commit_match();
        cs.remove(&call);

        let err = cs
            .find_match(&receiver, "test_method", &mut vec![])
            .unwrap_err();
        assert!(err.contains("have been exhausted"), "{err}");
    }

    #[test]
    fn unknown_key_reports_never_recorded() {
        let receiver = ReceiverId::new("TestReceiver");
        let cs = CallSet::new();
        let err = cs
            .find_match(&receiver, "test_method", &mut vec![])
            .unwrap_err();
        assert!(
            err.contains("there are no expected calls of the method"),
            "{err}"
        );
    }

    #[test]
    fn diagnostic_comes_from_the_nearest_candidate() {
        let receiver = ReceiverId::new("TestReceiver");
        let mut cs = CallSet::new();
        cs.add(make_call(&receiver, vec![eq(1)]));
        cs.add(make_call(&receiver, vec![eq(2)]));

        let err = cs
            .find_match(&receiver, "test_method", &mut vec![value(3)])
            .unwrap_err();
        // The first candidate's mismatch is reported, not the second's.
        assert!(err.contains("Want: is equal to 1 (i32)"), "{err}");
    }

    #[test]
    fn receivers_with_the_same_name_keep_separate_queues() {
        let one = ReceiverId::new("TestReceiver");
        let two = ReceiverId::new("TestReceiver");
        let mut cs = CallSet::new();
        cs.add(make_call(&one, vec![]));

        assert!(cs.find_match(&two, "test_method", &mut vec![]).is_err());
        assert!(cs.find_match(&one, "test_method", &mut vec![]).is_ok());
    }
}
