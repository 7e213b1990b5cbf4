//! # Mimic
//!
//! A call-expectation engine for mock objects.
//!
//! Mimic is the core a mocking framework is built around: it stores the
//! calls a test expects a stand-in object to receive, matches each observed
//! invocation against them (arguments, repetition bounds, relative order),
//! and fails the test with a precise diagnostic when reality diverges.
//! Generating the stand-ins themselves, fancy matcher predicates, and
//! harness integration are left to the layers above; mimic supplies the
//! deterministic engine underneath.
//!
//! ## Quick Start
//!
//! ```rust
//! use mimic::matchers::eq;
//! use mimic::{ret, value, Controller, PanicReporter, ReceiverId, Signature};
//!
//! // One controller per test. PanicReporter fails the test by panicking.
//! let ctrl = Controller::new(PanicReporter);
//! let cache = ReceiverId::new("Cache");
//!
//! // Expect exactly one call to Cache::len_of("users"), returning 42.
//! let sig = Signature::new().arg::<String>().ret::<u64>();
//! ctrl.record(&cache, "len_of", sig, vec![eq(String::from("users"))])
//!     .returns(vec![ret(42u64)]);
//!
//! // The generated mock routes every invocation through observe().
//! let rets = ctrl
//!     .observe(&cache, "len_of", vec![value(String::from("users"))])
//!     .unwrap();
//! assert_eq!(rets[0].downcast_ref::<u64>(), Some(&42));
//!
//! // Every expectation must have reached its minimum by the end.
//! ctrl.verify().unwrap();
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Controller`] | Records, matches, and verifies expectations for one test |
//! | [`Call`] | One recorded expectation; fluent handle for bounds, returns, effects, ordering |
//! | [`Matcher`] | Judges one observed argument against an expected pattern |
//! | [`Signature`] | Declared shape of a mocked method (arity, variadic flag, return slots) |
//! | [`ReceiverId`] | Opaque identity of one stand-in instance |
//! | [`Reporter`] | How failures reach the host test harness |
//! | [`ArgSlot`] | Writable cell for output / in-out parameters |
//!
//! ## Repetition Bounds
//!
//! An unconfigured expectation requires exactly one call. [`Call::times`],
//! [`Call::any_times`], [`Call::min_times`], and [`Call::max_times`] adjust
//! the window. The min/max setters merge with the *current* values: a bound
//! still at the default `1` widens when only the other side is pinned. See
//! the method docs for the exact rules.
//!
//! ## Ordering
//!
//! [`Call::after`] and [`in_order`] build a prerequisite graph (cycles are
//! rejected at registration). Matching a dependent call evicts its
//! prerequisites from the expected pool: even an unbounded prerequisite
//! becomes illegal to invoke afterwards, which is what makes "B never
//! happens after A" assertable.
//!
//! ## Threads
//!
//! A [`Controller`] is `Send + Sync`; the code under test may invoke the
//! mock from any number of threads. Matching is serialized on one internal
//! lock, and expectation actions run outside it, so an action may reenter
//! the mock.

mod call;
mod call_id;
mod call_set;
mod controller;
mod error;
mod matcher;
pub mod matchers;
mod receiver_id;
mod reporter;
mod signature;
mod value;

pub use call::{ret, Call, ReturnValue};
pub use call_id::CallId;
pub use controller::{in_order, Controller, ControllerConfig};
pub use error::Error;
pub use matcher::Matcher;
pub use receiver_id::ReceiverId;
pub use reporter::{PanicReporter, Reporter};
pub use signature::Signature;
pub use value::{value, ArgSlot, CallValue, Value};

/// Convenience alias for `Result<T, mimic::Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;
