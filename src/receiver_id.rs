use std::{fmt, hash::Hash, sync::Arc};

use uuid::Uuid;

/// Opaque identity handle for one stand-in instance.
///
/// Every mock object holds a `ReceiverId` created at construction time and
/// passes it to [`Controller::record`](crate::Controller::record) and
/// [`Controller::observe`](crate::Controller::observe). Equality is object
/// identity: two handles compare equal only when one was cloned from the
/// other, never because their display names coincide. Two mocks of the same
/// type therefore keep separate expectation queues.
///
/// `ReceiverId` is cheap to clone.
///
/// # Example
///
/// ```rust
/// use mimic::ReceiverId;
///
/// let a = ReceiverId::new("Subject");
/// let b = ReceiverId::new("Subject");
/// assert_ne!(a, b);          // distinct instances
/// assert_eq!(a, a.clone());  // same instance
/// assert_eq!(a.name(), "Subject");
/// ```
#[derive(Debug, Clone)]
pub struct ReceiverId {
    id: u128,
    name: Arc<str>,
}

impl ReceiverId {
    /// Create a fresh identity. `name` is used only for diagnostics,
    /// conventionally the mocked type's name.
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4().as_u128(),
            name: Arc::from(name),
        }
    }

    /// The display name this handle was created with.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for ReceiverId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ReceiverId {}

impl Hash for ReceiverId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ReceiverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
