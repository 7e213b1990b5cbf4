use std::{fmt, hash};

use uuid::Uuid;

/// Unique identifier for one recorded expectation.
///
/// Assigned when a [`Call`](crate::Call) is recorded; used by the engine to
/// track a call through the expected and exhausted pools and through the
/// ordering graph. Identity, not value: two expectations recorded with
/// identical matchers still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, hash::Hash)]
pub struct CallId(u128);

impl CallId {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4().as_u128())
    }

    pub fn value(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Uuid::from_u128(self.0))
    }
}
