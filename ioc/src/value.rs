//! Type-erased values and named argument maps.

use crate::error::{Error, Result};
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A shared, type-erased instance produced or consumed by the container.
///
/// Internally this is an `Arc<dyn Any>` holding an `Arc<T>`, so both concrete
/// types and trait objects (`Arc<dyn Trait>`) can be stored and recovered.
/// Cloning a `Value` is cheap and preserves identity.
#[derive(Clone)]
pub struct Value {
  inner: Arc<dyn Any + Send + Sync>,
  type_name: &'static str,
}

impl Value {
  /// Wraps an owned value.
  pub fn new<T: Any + Send + Sync>(value: T) -> Self {
    Self::from_arc(Arc::new(value))
  }

  /// Wraps an existing `Arc`, including trait objects such as `Arc<dyn Logger>`.
  ///
  /// The value can later be recovered with [`Value::get::<T>`](Value::get)
  /// using the same `T`.
  pub fn from_arc<T: ?Sized + Any + Send + Sync>(value: Arc<T>) -> Self {
    Self {
      inner: Arc::new(value),
      type_name: type_name::<T>(),
    }
  }

  /// Returns the stored `Arc<T>` if this value was created with that `T`.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self.inner.downcast_ref::<Arc<T>>().cloned()
  }

  pub fn is<T: ?Sized + Any + Send + Sync>(&self) -> bool {
    self.inner.is::<Arc<T>>()
  }

  /// Name of the type this value was created with.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  /// Identity comparison: true if both values share the same allocation.
  pub fn ptr_eq(a: &Value, b: &Value) -> bool {
    Arc::ptr_eq(&a.inner, &b.inner)
  }
}

impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Value({})", self.type_name)
  }
}

/// Named arguments passed to constructors, factories and callables.
///
/// Arguments fill builtin or untyped parameters by name and override
/// automatically resolved dependencies that share a name.
#[derive(Clone, Default)]
pub struct Arguments {
  values: HashMap<String, Value>,
}

impl Arguments {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds an owned value under `name`, consuming and returning `self`.
  pub fn with<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
    self.insert(name, Value::new(value));
    self
  }

  /// Adds an already wrapped value under `name`, consuming and returning `self`.
  pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
    self.insert(name, value);
    self
  }

  pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
    self.values.insert(name.into(), value)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.values.contains_key(name)
  }

  pub fn value(&self, name: &str) -> Option<&Value> {
    self.values.get(name)
  }

  /// Typed access to an argument.
  ///
  /// Fails with [`Error::MissingArgument`] when absent and
  /// [`Error::ArgumentType`] when present with a different type.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
    let value = self.values.get(name).ok_or_else(|| Error::MissingArgument {
      target: "arguments".to_string(),
      parameter: name.to_string(),
    })?;
    value.get::<T>().ok_or_else(|| Error::ArgumentType {
      parameter: name.to_string(),
      expected: type_name::<T>(),
    })
  }

  /// Like [`Arguments::get`] but clones the inner value out of the `Arc`.
  pub fn cloned<T: Any + Send + Sync + Clone>(&self, name: &str) -> Result<T> {
    self.get::<T>(name).map(|arc| (*arc).clone())
  }

  /// Layers `overrides` on top of `self`. Entries in `overrides` win on
  /// key collision.
  pub fn merge(mut self, overrides: &Arguments) -> Self {
    for (name, value) in &overrides.values {
      self.values.insert(name.clone(), value.clone());
    }
    self
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.values.keys().map(String::as_str)
  }
}

impl fmt::Debug for Arguments {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.values.iter()).finish()
  }
}
