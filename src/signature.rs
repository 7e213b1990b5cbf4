use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use crate::value::ReturnThunk;
use crate::{ArgSlot, Value};

/// The declared shape of a mocked method.
///
/// Built by the mock-generation layer (or by hand in tests) and handed to
/// [`Controller::record`](crate::Controller::record). The engine uses it to
/// validate matcher counts, to type-check `set_arg` writebacks and
/// `returns` values at record time, and to produce zero-valued defaults
/// when an expectation never configured its return values.
///
/// # Example
///
/// ```rust
/// use mimic::Signature;
///
/// // fn lookup(key: String, out: ArgSlot<Vec<u8>>, tags: ...&str) -> u64
/// let sig = Signature::new()
///     .arg::<String>()
///     .out_arg::<Vec<u8>>()
///     .variadic()
///     .ret::<u64>();
///
/// assert_eq!(sig.fixed_arity(), 2);
/// assert!(sig.is_variadic());
/// assert_eq!(sig.return_arity(), 1);
/// ```
#[derive(Clone, Default)]
pub struct Signature {
    params: Vec<ParamSpec>,
    variadic: bool,
    returns: Vec<ReturnSpec>,
}

#[derive(Clone)]
struct ParamSpec {
    type_name: &'static str,
    // For out-params, the inner type the slot wraps.
    slot_of: Option<(TypeId, &'static str)>,
}

#[derive(Clone)]
struct ReturnSpec {
    type_id: TypeId,
    type_name: &'static str,
    zero: ReturnThunk,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the next fixed parameter, passed by value.
    pub fn arg<T: 'static>(mut self) -> Self {
        self.params.push(ParamSpec {
            type_name: std::any::type_name::<T>(),
            slot_of: None,
        });
        self
    }

    /// Declare the next fixed parameter as a writable [`ArgSlot<T>`],
    /// eligible for [`set_arg`](crate::Call::set_arg) writebacks.
    pub fn out_arg<T: 'static>(mut self) -> Self {
        self.params.push(ParamSpec {
            type_name: std::any::type_name::<ArgSlot<T>>(),
            slot_of: Some((TypeId::of::<T>(), std::any::type_name::<T>())),
        });
        self
    }

    /// Declare that the method ends in a trailing variadic group.
    ///
    /// The group's elements arrive appended after the fixed arguments; see
    /// the variadic matching rules on
    /// [`Controller::observe`](crate::Controller::observe).
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Declare the next return slot. `T::default()` supplies the value when
    /// an expectation leaves its returns unconfigured.
    pub fn ret<T>(mut self) -> Self
    where
        T: Default + fmt::Debug + Send + 'static,
    {
        self.returns.push(ReturnSpec {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            zero: Arc::new(|| Box::new(T::default()) as Value),
        });
        self
    }

    /// Number of fixed (non-variadic) parameters.
    pub fn fixed_arity(&self) -> usize {
        self.params.len()
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// Number of declared return slots.
    pub fn return_arity(&self) -> usize {
        self.returns.len()
    }

    pub(crate) fn out_slot(&self, index: usize) -> Option<(TypeId, &'static str)> {
        self.params.get(index).and_then(|p| p.slot_of)
    }

    pub(crate) fn return_slot(&self, index: usize) -> Option<(TypeId, &'static str)> {
        self.returns.get(index).map(|r| (r.type_id, r.type_name))
    }

    /// Zero-value producers for every declared return slot.
    pub(crate) fn zero_returns(&self) -> Vec<ReturnThunk> {
        self.returns.iter().map(|r| Arc::clone(&r.zero)).collect()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&'static str> = self.params.iter().map(|p| p.type_name).collect();
        let returns: Vec<&'static str> = self.returns.iter().map(|r| r.type_name).collect();
        f.debug_struct("Signature")
            .field("params", &params)
            .field("variadic", &self.variadic)
            .field("returns", &returns)
            .finish_non_exhaustive()
    }
}
