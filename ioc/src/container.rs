//! The main `Container` struct and its associated methods.

use crate::config::{ContainerConfig, RebindPolicy};
use crate::contextual::{ContextualBindingBuilder, IntoConsumers};
use crate::core::{Binding, Concrete, InFlight};
use crate::error::{Error, Result};
use crate::reflect::{Callable, Reflector, TypeRegistry};
use crate::resolver::Resolver;
use crate::value::{Arguments, Value};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// The dependency-injection container.
///
/// Holds bindings, cached singleton instances and contextual rules. It is
/// thread-safe: registration and resolution only need `&self`, and each
/// resolution request carries its own build stack (see [`Resolver`]).
/// Singletons that depend on each other across threads, or through a fresh
/// resolver, fail with [`Error::CircularDependency`] rather than blocking.
///
/// Types the container can construct on its own are described by a
/// [`Reflector`], by default a [`TypeRegistry`].
pub struct Container {
  reflector: Arc<dyn Reflector>,
  config: ContainerConfig,
  bindings: DashMap<String, Binding>,
  instances: DashMap<String, Arc<OnceCell<Value>>>,
  contextual: DashMap<String, HashMap<String, String>>,
  in_flight: InFlight,
}

impl Default for Container {
  fn default() -> Self {
    Self::with_reflector(TypeRegistry::new())
  }
}

impl Container {
  /// Creates a new, empty `Container` with an empty [`TypeRegistry`].
  ///
  /// Only closure bindings and instances can be resolved until types are
  /// described; use [`Container::with_reflector`] to supply descriptors.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_reflector(reflector: impl Reflector + 'static) -> Self {
    Self {
      reflector: Arc::new(reflector),
      config: ContainerConfig::default(),
      bindings: DashMap::new(),
      instances: DashMap::new(),
      contextual: DashMap::new(),
      in_flight: InFlight::default(),
    }
  }

  pub fn with_config(mut self, config: ContainerConfig) -> Self {
    self.config = config;
    self
  }

  pub fn config(&self) -> &ContainerConfig {
    &self.config
  }

  pub fn reflector(&self) -> &dyn Reflector {
    &*self.reflector
  }

  // --- PRIVATE HELPERS ---

  fn bind_internal(&self, abstraction: &str, concrete: Option<Concrete>, shared: bool) {
    let concrete = concrete.unwrap_or_else(|| Concrete::Class(abstraction.to_owned()));
    debug!(abstraction, ?concrete, shared, "registering binding");

    self
      .bindings
      .insert(abstraction.to_owned(), Binding { concrete, shared });

    if self.config.rebind == RebindPolicy::Invalidate {
      if let Some((_, cell)) = self.instances.remove(abstraction) {
        if cell.get().is_some() {
          warn!(abstraction, "rebinding dropped a cached instance");
        }
      }
    }
  }

  pub(crate) fn binding(&self, abstraction: &str) -> Option<Binding> {
    self
      .bindings
      .get(abstraction)
      .map(|entry| entry.value().clone())
  }

  /// The lazily initialised slot for a shared binding. The map guard is
  /// released before the caller initialises the cell.
  pub(crate) fn instance_cell(&self, abstraction: &str) -> Arc<OnceCell<Value>> {
    self
      .instances
      .entry(abstraction.to_owned())
      .or_default()
      .value()
      .clone()
  }

  pub(crate) fn in_flight(&self) -> &InFlight {
    &self.in_flight
  }

  pub(crate) fn cached_instance(&self, abstraction: &str) -> Option<Value> {
    self
      .instances
      .get(abstraction)
      .and_then(|cell| cell.get().cloned())
  }

  pub(crate) fn contextual_implementation(
    &self,
    consumer: &str,
    abstraction: &str,
  ) -> Option<String> {
    self
      .contextual
      .get(consumer)
      .and_then(|needs| needs.get(abstraction).cloned())
  }

  // --- PUBLIC API ---

  // --- Transient Registration ---

  /// Binds `abstraction` to a class name or [`Concrete::factory`]. Every
  /// resolution produces a new value. Replaces any previous binding.
  pub fn bind(&self, abstraction: &str, concrete: impl Into<Concrete>) {
    self.bind_internal(abstraction, Some(concrete.into()), false);
  }

  /// Binds `abstraction` to itself as a concrete class.
  pub fn bind_self(&self, abstraction: &str) {
    self.bind_internal(abstraction, None, false);
  }

  pub fn bind_factory<F>(&self, abstraction: &str, factory: F)
  where
    F: for<'c> Fn(&mut Resolver<'c>, &Arguments) -> Result<Value> + Send + Sync + 'static,
  {
    self.bind_internal(abstraction, Some(Concrete::factory(factory)), false);
  }

  // --- Singleton Registration ---

  /// Like [`Container::bind`], but the first resolved value is cached and
  /// returned for every later resolution.
  pub fn singleton(&self, abstraction: &str, concrete: impl Into<Concrete>) {
    self.bind_internal(abstraction, Some(concrete.into()), true);
  }

  pub fn singleton_self(&self, abstraction: &str) {
    self.bind_internal(abstraction, None, true);
  }

  pub fn singleton_factory<F>(&self, abstraction: &str, factory: F)
  where
    F: for<'c> Fn(&mut Resolver<'c>, &Arguments) -> Result<Value> + Send + Sync + 'static,
  {
    self.bind_internal(abstraction, Some(Concrete::factory(factory)), true);
  }

  // --- Instance Registration ---

  /// Registers an already constructed value. Any binding for `abstraction`
  /// is removed so the instance is what resolves.
  pub fn instance(&self, abstraction: &str, value: Value) {
    debug!(abstraction, value_type = value.type_name(), "registering instance");
    self.bindings.remove(abstraction);
    self.instances.insert(
      abstraction.to_owned(),
      Arc::new(OnceCell::with_value(value)),
    );
  }

  // --- Contextual Registration ---

  /// Starts a contextual binding for one or more consumer classes:
  /// `when("ReportService").needs("Logger").give("FileLogger")`.
  pub fn when(&self, consumers: impl IntoConsumers) -> ContextualBindingBuilder<'_> {
    ContextualBindingBuilder::new(self, consumers.into_consumers())
  }

  /// When building `concrete`, resolve `abstraction` by building
  /// `implementation` instead.
  pub fn add_contextual_binding(&self, concrete: &str, abstraction: &str, implementation: &str) {
    debug!(concrete, abstraction, implementation, "registering contextual binding");
    self
      .contextual
      .entry(concrete.to_owned())
      .or_default()
      .insert(abstraction.to_owned(), implementation.to_owned());
  }

  // --- Resolution ---

  /// Starts an explicit resolution context. Useful when several related
  /// resolutions should share one build stack, or to inspect it.
  pub fn resolver(&self) -> Resolver<'_> {
    Resolver::new(self)
  }

  pub fn make(&self, abstraction: &str) -> Result<Value> {
    self.resolver().make(abstraction)
  }

  pub fn make_with(&self, abstraction: &str, arguments: &Arguments) -> Result<Value> {
    self.resolver().make_with(abstraction, arguments)
  }

  pub fn make_as<T: ?Sized + Any + Send + Sync>(&self, abstraction: &str) -> Result<Arc<T>> {
    self.resolver().make_as::<T>(abstraction)
  }

  pub fn build(&self, concrete: &str) -> Result<Value> {
    self.resolver().build(concrete)
  }

  pub fn build_with(&self, concrete: &str, arguments: &Arguments) -> Result<Value> {
    self.resolver().build_with(concrete, arguments)
  }

  pub fn call(&self, callable: &Callable) -> Result<Value> {
    self.resolver().call(callable)
  }

  pub fn call_with(&self, callable: &Callable, arguments: &Arguments) -> Result<Value> {
    self.resolver().call_with(callable, arguments)
  }

  /// Resolves `id` for generic container consumers.
  ///
  /// Failures that mean "found but could not be built" propagate as is;
  /// anything else becomes [`Error::EntryNotFound`].
  pub fn get(&self, id: &str) -> Result<Value> {
    self.make(id).map_err(|err| {
      if err.is_resolution_failure() {
        err
      } else {
        Error::EntryNotFound {
          id: id.to_owned(),
          source: Some(Box::new(err)),
        }
      }
    })
  }

  // --- Introspection ---

  /// Whether `id` has a registration: an explicit binding or a cached
  /// instance.
  ///
  /// This does not report classes that would resolve through the reflector
  /// without ever being registered, so `has` can be false where `get`
  /// succeeds.
  pub fn has(&self, id: &str) -> bool {
    self.bindings.contains_key(id) || self.resolved(id)
  }

  /// Whether `abstraction` has a cached instance.
  pub fn resolved(&self, abstraction: &str) -> bool {
    self
      .instances
      .get(abstraction)
      .map_or(false, |cell| cell.get().is_some())
  }

  pub fn is_shared(&self, abstraction: &str) -> bool {
    match self.bindings.get(abstraction) {
      Some(binding) => binding.shared,
      None => self.resolved(abstraction),
    }
  }

  // --- Teardown ---

  /// Drops the cached instance for `abstraction`. A shared binding builds a
  /// fresh one on its next resolution.
  pub fn forget_instance(&self, abstraction: &str) -> Option<Value> {
    self
      .instances
      .remove(abstraction)
      .and_then(|(_, cell)| cell.get().cloned())
  }

  /// Removes every binding, instance and contextual rule.
  pub fn flush(&self) {
    debug!("flushing container");
    self.bindings.clear();
    self.instances.clear();
    self.contextual.clear();
  }
}
