//! The type-descriptor capability the resolver builds on.
//!
//! Rust has no runtime reflection, so constructible types describe themselves:
//! a [`TypeDescriptor`] reports whether a type is instantiable, the parameters
//! of its constructor, and how to invoke it. A [`Reflector`] answers descriptor
//! lookups by name; [`TypeRegistry`] is the in-memory implementation used by
//! default.

use crate::error::Result;
use crate::value::{Arguments, Value};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

pub(crate) type Constructor = Arc<dyn Fn(&Arguments) -> Result<Value> + Send + Sync>;

/// Looks up type descriptors by identifier.
pub trait Reflector: Send + Sync {
  /// Returns the descriptor for `name`, or `None` if the type is unknown.
  fn reflect(&self, name: &str) -> Option<Arc<TypeDescriptor>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
  Class,
  Abstract,
  Interface,
}

/// The declared type of a constructor or callable parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
  /// A class or interface, resolved through the container.
  Named(String),
  /// A language builtin (`u16`, `String`, ...). Filled from arguments.
  Builtin(String),
  Untyped,
}

#[derive(Clone)]
pub struct Parameter {
  name: String,
  ty: ParamType,
  default: Option<Value>,
}

impl Parameter {
  /// A parameter whose value the container resolves from `type_name`.
  pub fn named(name: impl Into<String>, type_name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ty: ParamType::Named(type_name.into()),
      default: None,
    }
  }

  pub fn builtin(name: impl Into<String>, type_name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ty: ParamType::Builtin(type_name.into()),
      default: None,
    }
  }

  pub fn untyped(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ty: ParamType::Untyped,
      default: None,
    }
  }

  /// Value used when no argument is supplied, or when a named dependency
  /// fails to resolve.
  pub fn with_default(mut self, default: Value) -> Self {
    self.default = Some(default);
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn ty(&self) -> &ParamType {
    &self.ty
  }

  pub fn default(&self) -> Option<&Value> {
    self.default.as_ref()
  }

  /// The class or interface this parameter depends on, if any.
  pub fn dependency(&self) -> Option<&str> {
    match &self.ty {
      ParamType::Named(type_name) => Some(type_name),
      _ => None,
    }
  }
}

impl fmt::Debug for Parameter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Parameter")
      .field("name", &self.name)
      .field("ty", &self.ty)
      .field("has_default", &self.default.is_some())
      .finish()
  }
}

/// Describes how to construct one named type.
pub struct TypeDescriptor {
  name: String,
  kind: TypeKind,
  parameters: Vec<Parameter>,
  constructor: Option<Constructor>,
}

impl TypeDescriptor {
  /// An instantiable class. `constructor` receives the merged arguments,
  /// keyed by parameter name.
  pub fn class(
    name: impl Into<String>,
    constructor: impl Fn(&Arguments) -> Result<Value> + Send + Sync + 'static,
  ) -> Self {
    Self {
      name: name.into(),
      kind: TypeKind::Class,
      parameters: Vec::new(),
      constructor: Some(Arc::new(constructor)),
    }
  }

  pub fn interface(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      kind: TypeKind::Interface,
      parameters: Vec::new(),
      constructor: None,
    }
  }

  pub fn abstract_class(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      kind: TypeKind::Abstract,
      parameters: Vec::new(),
      constructor: None,
    }
  }

  pub fn with_parameter(mut self, parameter: Parameter) -> Self {
    self.parameters.push(parameter);
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn kind(&self) -> TypeKind {
    self.kind
  }

  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }

  pub fn is_instantiable(&self) -> bool {
    self.kind == TypeKind::Class && self.constructor.is_some()
  }

  pub(crate) fn constructor(&self) -> Option<&Constructor> {
    self.constructor.as_ref()
  }
}

impl fmt::Debug for TypeDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TypeDescriptor")
      .field("name", &self.name)
      .field("kind", &self.kind)
      .field("parameters", &self.parameters)
      .finish()
  }
}

/// The default [`Reflector`]: descriptors registered up front, looked up by name.
#[derive(Default)]
pub struct TypeRegistry {
  descriptors: DashMap<String, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a descriptor, replacing any previous one with the same name.
  pub fn register(&self, descriptor: TypeDescriptor) {
    self
      .descriptors
      .insert(descriptor.name.clone(), Arc::new(descriptor));
  }

  /// Builder-style [`TypeRegistry::register`].
  pub fn with(self, descriptor: TypeDescriptor) -> Self {
    self.register(descriptor);
    self
  }

  pub fn contains(&self, name: &str) -> bool {
    self.descriptors.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.descriptors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.descriptors.is_empty()
  }
}

impl Reflector for TypeRegistry {
  fn reflect(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
    self.descriptors.get(name).map(|entry| entry.value().clone())
  }
}

impl<R: Reflector + ?Sized> Reflector for Arc<R> {
  fn reflect(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
    (**self).reflect(name)
  }
}

/// A function or bound method whose parameters the container resolves.
///
/// Free functions and methods are treated the same way: a method simply
/// captures its receiver.
#[derive(Clone)]
pub struct Callable {
  name: String,
  parameters: Vec<Parameter>,
  body: Constructor,
}

impl Callable {
  pub fn function(
    name: impl Into<String>,
    body: impl Fn(&Arguments) -> Result<Value> + Send + Sync + 'static,
  ) -> Self {
    Self {
      name: name.into(),
      parameters: Vec::new(),
      body: Arc::new(body),
    }
  }

  /// A method bound to `receiver`.
  pub fn method<R: Send + Sync + 'static>(
    receiver: Arc<R>,
    name: impl Into<String>,
    body: impl Fn(&R, &Arguments) -> Result<Value> + Send + Sync + 'static,
  ) -> Self {
    Self {
      name: name.into(),
      parameters: Vec::new(),
      body: Arc::new(move |args| body(&receiver, args)),
    }
  }

  pub fn with_parameter(mut self, parameter: Parameter) -> Self {
    self.parameters.push(parameter);
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }

  pub(crate) fn invoke(&self, arguments: &Arguments) -> Result<Value> {
    (self.body)(arguments)
  }
}

impl fmt::Debug for Callable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Callable")
      .field("name", &self.name)
      .field("parameters", &self.parameters)
      .finish()
  }
}
