//! Built-in argument matchers.
//!
//! Each constructor returns a boxed [`Matcher`] ready to pass to
//! [`Controller::record`](crate::Controller::record):
//!
//! ```rust
//! use mimic::matchers::{any, eq};
//! use mimic::{Controller, PanicReporter, ReceiverId, Signature};
//!
//! let ctrl = Controller::new(PanicReporter);
//! let store = ReceiverId::new("Store");
//! let sig = Signature::new().arg::<String>().arg::<u32>();
//! ctrl.record(&store, "put", sig, vec![eq(String::from("key")), any()]);
//! # ctrl.observe(&store, "put", vec![mimic::value(String::from("key")), mimic::value(9u32)]).unwrap();
//! ```
//!
//! Anything else a test needs (length checks, structural comparison with
//! ignored fields, custom diffs) is written against the [`Matcher`] trait
//! directly or via [`pred`]/[`group`].

use std::fmt;

use crate::{CallValue, Matcher, Value};

struct EqMatcher<T> {
    expected: T,
}

impl<T> Matcher for EqMatcher<T>
where
    T: PartialEq + fmt::Debug + Send + Sync + 'static,
{
    fn matches(&self, actual: &dyn CallValue) -> bool {
        actual.downcast_ref::<T>() == Some(&self.expected)
    }

    fn describe(&self) -> String {
        format!(
            "is equal to {:?} ({})",
            self.expected,
            std::any::type_name::<T>()
        )
    }
}

/// Matches a value equal to `expected`, compared after downcasting to `T`.
///
/// A value of any other concrete type does not match, even when it would
/// compare equal after a conversion; the engine never coerces.
pub fn eq<T>(expected: T) -> Box<dyn Matcher>
where
    T: PartialEq + fmt::Debug + Send + Sync + 'static,
{
    Box::new(EqMatcher { expected })
}

struct AnyMatcher;

impl Matcher for AnyMatcher {
    fn matches(&self, _actual: &dyn CallValue) -> bool {
        true
    }

    fn matches_group(&self, _actuals: &[Value]) -> bool {
        true
    }

    fn describe(&self) -> String {
        "is anything".to_string()
    }
}

/// Matches any value, including an entire variadic group.
pub fn any() -> Box<dyn Matcher> {
    Box::new(AnyMatcher)
}

struct PredMatcher<F> {
    description: String,
    predicate: F,
}

impl<F> Matcher for PredMatcher<F>
where
    F: Fn(&dyn CallValue) -> bool + Send + Sync,
{
    fn matches(&self, actual: &dyn CallValue) -> bool {
        (self.predicate)(actual)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

/// Matches via a custom predicate over the type-erased value.
///
/// `description` becomes the "want" side of a mismatch diagnostic.
pub fn pred<F>(description: impl Into<String>, predicate: F) -> Box<dyn Matcher>
where
    F: Fn(&dyn CallValue) -> bool + Send + Sync + 'static,
{
    Box::new(PredMatcher {
        description: description.into(),
        predicate,
    })
}

struct GroupMatcher<F> {
    description: String,
    predicate: F,
}

impl<F> Matcher for GroupMatcher<F>
where
    F: Fn(&[Value]) -> bool + Send + Sync,
{
    fn matches(&self, _actual: &dyn CallValue) -> bool {
        false
    }

    fn matches_group(&self, actuals: &[Value]) -> bool {
        (self.predicate)(actuals)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

/// Matches an entire trailing variadic group at once.
///
/// Record it as the single matcher after a variadic method's fixed
/// arguments; the predicate receives the ordered elements of the group.
pub fn group<F>(description: impl Into<String>, predicate: F) -> Box<dyn Matcher>
where
    F: Fn(&[Value]) -> bool + Send + Sync + 'static,
{
    Box::new(GroupMatcher {
        description: description.into(),
        predicate,
    })
}

struct WantAdapter {
    description: String,
    inner: Box<dyn Matcher>,
}

impl Matcher for WantAdapter {
    fn matches(&self, actual: &dyn CallValue) -> bool {
        self.inner.matches(actual)
    }

    fn matches_group(&self, actuals: &[Value]) -> bool {
        self.inner.matches_group(actuals)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }

    fn format_got(&self, actual: &dyn CallValue) -> Option<String> {
        self.inner.format_got(actual)
    }
}

/// Wraps a matcher, replacing its "want" description in diagnostics.
pub fn want(description: impl Into<String>, inner: Box<dyn Matcher>) -> Box<dyn Matcher> {
    Box::new(WantAdapter {
        description: description.into(),
        inner,
    })
}

struct GotAdapter<F> {
    format: F,
    inner: Box<dyn Matcher>,
}

impl<F> Matcher for GotAdapter<F>
where
    F: Fn(&dyn CallValue) -> String + Send + Sync,
{
    fn matches(&self, actual: &dyn CallValue) -> bool {
        self.inner.matches(actual)
    }

    fn matches_group(&self, actuals: &[Value]) -> bool {
        self.inner.matches_group(actuals)
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }

    fn format_got(&self, actual: &dyn CallValue) -> Option<String> {
        Some((self.format)(actual))
    }
}

/// Wraps a matcher, replacing how a mismatched observed value is rendered.
///
/// For a variadic group mismatch the formatter receives the re-assembled
/// group, downcastable to `Vec<Value>`.
pub fn got_format<F>(format: F, inner: Box<dyn Matcher>) -> Box<dyn Matcher>
where
    F: Fn(&dyn CallValue) -> String + Send + Sync + 'static,
{
    Box::new(GotAdapter { format, inner })
}
