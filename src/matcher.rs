use std::fmt;

use crate::{CallValue, Value};

/// Judges one actual argument against an expected pattern.
///
/// The engine consumes matchers through this capability: [`matches`] answers
/// whether an observed value is acceptable, [`describe`] renders the "want"
/// side of a failure diagnostic. The two remaining methods have default
/// implementations and exist as override points:
///
/// - [`matches_group`] lets a single matcher cover an entire trailing
///   variadic group, delivered as the ordered slice of its elements.
/// - [`format_got`] lets a matcher customize how the "got" side of a
///   mismatch is rendered (see [`got_format`](crate::matchers::got_format)).
///
/// Built-in matchers live in the [`matchers`](crate::matchers) module;
/// anything implementing this trait plugs in the same way.
///
/// [`matches`]: Matcher::matches
/// [`describe`]: Matcher::describe
/// [`matches_group`]: Matcher::matches_group
/// [`format_got`]: Matcher::format_got
pub trait Matcher: Send + Sync {
    /// Returns true if the observed value satisfies this matcher.
    fn matches(&self, actual: &dyn CallValue) -> bool;

    /// Human rendering of what this matcher accepts, e.g.
    /// `is equal to 15 (i32)`.
    fn describe(&self) -> String;

    /// Match an entire trailing variadic group at once.
    ///
    /// Called when this matcher is recorded in the `fixed_arity + 1`
    /// position of a variadic method. The default declines; matchers that
    /// understand groups override it.
    fn matches_group(&self, actuals: &[Value]) -> bool {
        let _ = actuals;
        false
    }

    /// Override how a mismatched observed value is rendered.
    ///
    /// Returning `None` selects the default rendering
    /// (`{value:?} ({type_name})`).
    fn format_got(&self, actual: &dyn CallValue) -> Option<String> {
        let _ = actual;
        None
    }
}

impl fmt::Debug for dyn Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Default rendering of an observed value: `{value:?} ({type_name})`,
/// honoring the matcher's [`Matcher::format_got`] override when present.
pub(crate) fn render_got(matcher: &dyn Matcher, actual: &dyn CallValue) -> String {
    matcher
        .format_got(actual)
        .unwrap_or_else(|| format!("{:?} ({})", actual, actual.type_name()))
}
