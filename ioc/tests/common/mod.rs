// ioc/tests/common/mod.rs

//! Shared fixtures: a small application graph described through a
//! `TypeRegistry`.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use weft_ioc::{Container, Error, Parameter, TypeDescriptor, TypeRegistry, Value};

// --- Services ---

pub trait Logger: Send + Sync {
  fn name(&self) -> &'static str;
}

pub struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn name(&self) -> &'static str {
    "console"
  }
}

pub struct FileLogger {
  pub path: String,
}
impl Logger for FileLogger {
  fn name(&self) -> &'static str {
    "file"
  }
}

#[derive(Debug)]
pub struct Database {
  pub dsn: String,
}

pub struct UserRepository {
  pub db: Arc<Database>,
  pub logger: Arc<dyn Logger>,
}

pub struct ReportService {
  pub logger: Arc<dyn Logger>,
}

pub struct AuditService {
  pub logger: Arc<dyn Logger>,
}

pub struct Mailer {
  pub logger: Arc<dyn Logger>,
  pub from: String,
}

#[derive(Debug)]
pub struct Clock {
  pub serial: usize,
}

pub struct CycleA;
pub struct CycleB;

pub struct Broken;

/// Counts every `Clock` ever constructed across the test binary.
pub static CLOCKS_BUILT: AtomicUsize = AtomicUsize::new(0);

pub const DEFAULT_SENDER: &str = "noreply@example.com";

pub fn logger(value: &Value) -> Arc<dyn Logger> {
  value.get::<dyn Logger>().expect("value is not a Logger")
}

// --- Registry ---

pub fn types() -> TypeRegistry {
  TypeRegistry::new()
    .with(TypeDescriptor::interface("Logger"))
    .with(TypeDescriptor::abstract_class("Model"))
    .with(TypeDescriptor::class("ConsoleLogger", |_| {
      Ok(Value::from_arc::<dyn Logger>(Arc::new(ConsoleLogger)))
    }))
    .with(
      TypeDescriptor::class("FileLogger", |args| {
        let path = args.cloned::<String>("path")?;
        Ok(Value::from_arc::<dyn Logger>(Arc::new(FileLogger { path })))
      })
      .with_parameter(
        Parameter::builtin("path", "String").with_default(Value::new("/var/log/app.log".to_string())),
      ),
    )
    .with(
      TypeDescriptor::class("Database", |args| {
        Ok(Value::new(Database {
          dsn: args.cloned::<String>("dsn")?,
        }))
      })
      .with_parameter(Parameter::builtin("dsn", "String")),
    )
    .with(
      TypeDescriptor::class("UserRepository", |args| {
        Ok(Value::new(UserRepository {
          db: args.get::<Database>("db")?,
          logger: args.get::<dyn Logger>("logger")?,
        }))
      })
      .with_parameter(Parameter::named("db", "Database"))
      .with_parameter(Parameter::named("logger", "Logger")),
    )
    .with(
      TypeDescriptor::class("ReportService", |args| {
        Ok(Value::new(ReportService {
          logger: args.get::<dyn Logger>("logger")?,
        }))
      })
      .with_parameter(Parameter::named("logger", "Logger")),
    )
    .with(
      TypeDescriptor::class("AuditService", |args| {
        Ok(Value::new(AuditService {
          logger: args.get::<dyn Logger>("logger")?,
        }))
      })
      .with_parameter(Parameter::named("logger", "Logger")),
    )
    .with(
      TypeDescriptor::class("Mailer", |args| {
        Ok(Value::new(Mailer {
          logger: args.get::<dyn Logger>("logger")?,
          from: args.cloned::<String>("from")?,
        }))
      })
      .with_parameter(Parameter::named("logger", "Logger"))
      .with_parameter(Parameter::builtin("from", "String").with_default(Value::new(DEFAULT_SENDER.to_string()))),
    )
    .with(TypeDescriptor::class("Clock", |_| {
      let serial = CLOCKS_BUILT.fetch_add(1, Ordering::SeqCst);
      Ok(Value::new(Clock { serial }))
    }))
    .with(
      TypeDescriptor::class("CycleA", |_| Ok(Value::new(CycleA)))
        .with_parameter(Parameter::named("b", "CycleB")),
    )
    .with(
      TypeDescriptor::class("CycleB", |_| Ok(Value::new(CycleB)))
        .with_parameter(Parameter::named("a", "CycleA")),
    )
    .with(
      TypeDescriptor::class("Broken", |_| Err(Error::construction("Broken", "unreachable")))
        .with_parameter(Parameter::named("missing", "Missing")),
    )
}

pub fn container() -> Container {
  Container::with_reflector(types())
}
