//! The recursive resolution algorithm.
//!
//! A [`Resolver`] is the context of one resolution request. It owns the build
//! stack, so "who is asking for this dependency" is answered by the request
//! itself rather than by shared container state. Every frame is pushed and
//! popped by [`Resolver::scoped`], which leaves the stack as it found it on
//! success and on error.

use crate::container::Container;
use crate::core::{cell_key, Binding, Concrete, Frame};
use crate::error::{Error, Result};
use crate::reflect::{Callable, Parameter, TypeDescriptor};
use crate::value::{Arguments, Value};
use std::any::{type_name, Any};
use std::sync::Arc;
use tracing::trace;

pub struct Resolver<'c> {
  container: &'c Container,
  stack: Vec<Frame>,
}

impl<'c> Resolver<'c> {
  pub(crate) fn new(container: &'c Container) -> Self {
    Self {
      container,
      stack: Vec::new(),
    }
  }

  pub fn container(&self) -> &'c Container {
    self.container
  }

  // --- PUBLIC API ---

  pub fn make(&mut self, abstraction: &str) -> Result<Value> {
    self.resolve(abstraction, &Arguments::new())
  }

  pub fn make_with(&mut self, abstraction: &str, arguments: &Arguments) -> Result<Value> {
    self.resolve(abstraction, arguments)
  }

  /// Resolves `abstraction` and downcasts it to `Arc<T>`.
  pub fn make_as<T: ?Sized + Any + Send + Sync>(&mut self, abstraction: &str) -> Result<Arc<T>> {
    let value = self.make(abstraction)?;
    value.get::<T>().ok_or_else(|| Error::TypeMismatch {
      id: abstraction.to_owned(),
      expected: type_name::<T>(),
    })
  }

  pub fn build(&mut self, concrete: &str) -> Result<Value> {
    self.build_with(concrete, &Arguments::new())
  }

  /// Constructs `concrete` directly through the reflector, ignoring bindings
  /// for `concrete` itself. Its dependencies still go through [`Resolver::make`].
  pub fn build_with(&mut self, concrete: &str, arguments: &Arguments) -> Result<Value> {
    let descriptor = self
      .container
      .reflector()
      .reflect(concrete)
      .ok_or_else(|| Error::UnknownType(concrete.to_owned()))?;

    self.scoped(Frame::Build(concrete.to_owned()), |resolver| {
      resolver.construct(&descriptor, arguments)
    })
  }

  pub fn call(&mut self, callable: &Callable) -> Result<Value> {
    self.call_with(callable, &Arguments::new())
  }

  /// Resolves the callable's parameters like a constructor's and invokes it.
  pub fn call_with(&mut self, callable: &Callable, arguments: &Arguments) -> Result<Value> {
    trace!(callable = callable.name(), "calling");
    let arguments = self.get_dependencies(callable.name(), callable.parameters(), arguments)?;
    callable.invoke(&arguments)
  }

  /// The concrete classes currently under construction, outermost first.
  pub fn build_stack(&self) -> Vec<&str> {
    self
      .stack
      .iter()
      .filter_map(|frame| match frame {
        Frame::Build(concrete) => Some(concrete.as_str()),
        Frame::Binding(_) => None,
      })
      .collect()
  }

  /// The nearest enclosing concrete class under construction.
  pub fn current_concrete(&self) -> Option<&str> {
    self.stack.iter().rev().find_map(|frame| match frame {
      Frame::Build(concrete) => Some(concrete.as_str()),
      Frame::Binding(_) => None,
    })
  }

  pub fn depth(&self) -> usize {
    self.stack.len()
  }

  // --- RESOLUTION ---

  /// Contextual binding, then explicit binding, then a registered instance,
  /// then direct construction. First match wins.
  fn resolve(&mut self, abstraction: &str, arguments: &Arguments) -> Result<Value> {
    if let Some(implementation) = self.find_contextual_binding(abstraction) {
      trace!(
        abstraction,
        implementation = implementation.as_str(),
        consumer = self.current_concrete(),
        "contextual binding"
      );
      return self.build_with(&implementation, arguments);
    }

    if let Some(binding) = self.container.binding(abstraction) {
      return self.resolve_binding(abstraction, &binding, arguments);
    }

    if let Some(instance) = self.container.cached_instance(abstraction) {
      trace!(abstraction, "registered instance");
      return Ok(instance);
    }

    trace!(abstraction, "no binding, building directly");
    self.build_with(abstraction, arguments)
  }

  fn resolve_binding(
    &mut self,
    abstraction: &str,
    binding: &Binding,
    arguments: &Arguments,
  ) -> Result<Value> {
    if !binding.shared {
      trace!(abstraction, "transient binding");
      return self.scoped(Frame::Binding(abstraction.to_owned()), |resolver| {
        resolver.invoke(&binding.concrete, arguments)
      });
    }

    let cell = self.container.instance_cell(abstraction);
    if let Some(instance) = cell.get() {
      trace!(abstraction, "singleton cache hit");
      return Ok(instance.clone());
    }

    trace!(abstraction, "materialising singleton");
    let in_flight = self.container.in_flight();
    let key = cell_key(&cell);
    self.scoped(Frame::Binding(abstraction.to_owned()), |resolver| {
      let _waiting = in_flight
        .wait(key, abstraction)
        .map_err(|chain| resolver.deadlock(chain))?;
      cell
        .get_or_try_init(|| {
          let _owner = in_flight.own(key);
          resolver.invoke(&binding.concrete, arguments)
        })
        .cloned()
    })
  }

  fn invoke(&mut self, concrete: &Concrete, arguments: &Arguments) -> Result<Value> {
    match concrete {
      Concrete::Class(name) => self.build_with(name, arguments),
      Concrete::Factory(factory) => factory(self, arguments),
    }
  }

  fn find_contextual_binding(&self, abstraction: &str) -> Option<String> {
    let consumer = self.current_concrete()?;
    self.container.contextual_implementation(consumer, abstraction)
  }

  fn construct(&mut self, descriptor: &TypeDescriptor, arguments: &Arguments) -> Result<Value> {
    let constructor = match descriptor.constructor() {
      Some(constructor) if descriptor.is_instantiable() => constructor.clone(),
      _ => {
        return Err(Error::NotInstantiable {
          concrete: descriptor.name().to_owned(),
          stack: self.build_stack().into_iter().map(str::to_owned).collect(),
        })
      }
    };

    if descriptor.parameters().is_empty() {
      return constructor(&Arguments::new());
    }

    let arguments = self.get_dependencies(descriptor.name(), descriptor.parameters(), arguments)?;
    constructor(&arguments)
  }

  /// Resolves every named-type parameter the caller did not supply, fills
  /// the rest from defaults, then layers `arguments` on top so explicit
  /// values always win.
  fn get_dependencies(
    &mut self,
    owner: &str,
    parameters: &[Parameter],
    arguments: &Arguments,
  ) -> Result<Arguments> {
    let mut resolved = Arguments::new();

    for parameter in parameters {
      if arguments.contains(parameter.name()) {
        continue;
      }

      match parameter.dependency() {
        Some(dependency) => match self.make(dependency) {
          Ok(value) => {
            resolved.insert(parameter.name(), value);
          }
          Err(err) => match parameter.default() {
            Some(default) if !is_structural(&err) => {
              trace!(owner, parameter = parameter.name(), error = %err, "using default");
              resolved.insert(parameter.name(), default.clone());
            }
            _ => return Err(nested(owner, parameter, err)),
          },
        },
        None => match parameter.default() {
          Some(default) => {
            resolved.insert(parameter.name(), default.clone());
          }
          None => {
            return Err(Error::MissingArgument {
              target: owner.to_owned(),
              parameter: parameter.name().to_owned(),
            })
          }
        },
      }
    }

    Ok(resolved.merge(arguments))
  }

  // --- BUILD STACK ---

  fn scoped<T>(&mut self, frame: Frame, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
    self.enter(frame)?;
    let result = body(self);
    self.stack.pop();
    result
  }

  fn enter(&mut self, frame: Frame) -> Result<()> {
    if self.stack.contains(&frame) {
      let mut frames = self.stack.clone();
      frames.push(frame);
      return Err(Error::CircularDependency {
        path: Frame::describe(&frames),
      });
    }

    let limit = self.container.config().max_depth;
    if self.stack.len() >= limit {
      let mut path: Vec<String> = self.stack.iter().map(|f| f.id().to_owned()).collect();
      path.push(frame.id().to_owned());
      return Err(Error::DepthExceeded { limit, path });
    }

    self.stack.push(frame);
    Ok(())
  }

  /// The cycle error for a singleton wait that would never return. `chain`
  /// runs from the abstraction being waited on to one this thread is already
  /// building, possibly in an outer resolver or behind another thread.
  fn deadlock(&self, chain: Vec<String>) -> Error {
    let mut frames = self.stack.clone();
    frames.extend(chain.into_iter().skip(1).map(Frame::Binding));
    if let Some(closing) = frames.last().cloned() {
      if frames.iter().filter(|frame| **frame == closing).count() == 1 {
        frames.insert(0, closing);
      }
    }
    Error::CircularDependency {
      path: Frame::describe(&frames),
    }
  }
}

/// Failures a parameter default must not paper over.
fn is_structural(err: &Error) -> bool {
  matches!(
    err,
    Error::CircularDependency { .. } | Error::DepthExceeded { .. }
  )
}

/// Resolution failures propagate unchanged; anything else gains the context
/// of the parameter that could not be filled.
fn nested(owner: &str, parameter: &Parameter, err: Error) -> Error {
  if err.is_resolution_failure() {
    err
  } else {
    Error::Unresolvable {
      concrete: owner.to_owned(),
      parameter: parameter.name().to_owned(),
      source: Box::new(err),
    }
  }
}
