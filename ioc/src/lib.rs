//! # Weft IoC
//!
//! A reflective, thread-safe dependency-injection resolver for Rust.
//!
//! Given an abstraction identifier, the container produces a fully constructed
//! object graph. Constructor dependencies are discovered through type
//! descriptors and resolved recursively, while callers can steer resolution
//! with explicit bindings, singletons, pre-built instances and contextual
//! bindings.
//!
//! ## Core Concepts
//!
//! - **Container**: owns bindings, cached instances and contextual rules.
//! - **Reflector**: describes how to construct named types. [`TypeRegistry`]
//!   is the default, in-memory implementation.
//! - **Resolution order**: a contextual binding for the class currently being
//!   built, then an explicit binding, then a registered instance, then direct
//!   construction of the identifier itself.
//! - **Lifetimes**: transient (a new value per resolution) or singleton (the
//!   first value is cached).
//!
//! ## Quick Start
//!
//! ```
//! use weft_ioc::{Container, Parameter, TypeDescriptor, TypeRegistry, Value};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!   fn log(&self, message: &str) -> String;
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!   fn log(&self, message: &str) -> String {
//!     format!("console: {}", message)
//!   }
//! }
//!
//! struct Mailer {
//!   logger: Arc<dyn Logger>,
//! }
//!
//! let types = TypeRegistry::new()
//!   .with(TypeDescriptor::interface("Logger"))
//!   .with(TypeDescriptor::class("ConsoleLogger", |_| {
//!     Ok(Value::from_arc::<dyn Logger>(Arc::new(ConsoleLogger)))
//!   }))
//!   .with(
//!     TypeDescriptor::class("Mailer", |args| {
//!       Ok(Value::new(Mailer { logger: args.get::<dyn Logger>("logger")? }))
//!     })
//!     .with_parameter(Parameter::named("logger", "Logger")),
//!   );
//!
//! let container = Container::with_reflector(types);
//! container.singleton("Logger", "ConsoleLogger");
//!
//! let mailer = container.make_as::<Mailer>("Mailer").unwrap();
//! assert_eq!(mailer.logger.log("sent"), "console: sent");
//! ```

mod config;
mod container;
mod contextual;
mod core;
mod error;
mod macros;
mod reflect;
mod resolver;
mod value;

pub use config::{ContainerConfig, RebindPolicy};
pub use container::Container;
pub use contextual::{ContextualBindingBuilder, IntoConsumers};
pub use crate::core::Concrete;
pub use error::{Error, Result};
pub use reflect::{Callable, ParamType, Parameter, Reflector, TypeDescriptor, TypeKind, TypeRegistry};
pub use resolver::Resolver;
pub use value::{Arguments, Value};
