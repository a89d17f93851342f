mod common;

use common::*;
use std::sync::{Arc, Mutex};
use weft_ioc::{Container, Error, Parameter, TypeDescriptor, Value};

struct Newsletter {
  mailer: Arc<Mailer>,
}

/// The shared fixtures plus a class that only depends on `Logger` indirectly.
fn container_with_newsletter() -> Container {
  let types = types();
  types.register(
    TypeDescriptor::class("Newsletter", |args| {
      Ok(Value::new(Newsletter {
        mailer: args.get::<Mailer>("mailer")?,
      }))
    })
    .with_parameter(Parameter::named("mailer", "Mailer")),
  );
  Container::with_reflector(types)
}

#[test]
fn test_contextual_binding_takes_precedence_for_its_consumer_only() {
  // Arrange
  let container = container();
  container.bind("Logger", "ConsoleLogger");
  container.when("ReportService").needs("Logger").give("FileLogger").unwrap();

  // Act
  let report = container.make_as::<ReportService>("ReportService").unwrap();
  let audit = container.make_as::<AuditService>("AuditService").unwrap();

  // Assert
  assert_eq!(report.logger.name(), "file");
  assert_eq!(audit.logger.name(), "console");
  // Outside of any build, the ordinary binding applies.
  assert_eq!(logger(&container.make("Logger").unwrap()).name(), "console");
}

#[test]
fn test_contextual_binding_fans_out_to_every_consumer() {
  let container = container();
  container.bind("Logger", "ConsoleLogger");
  container
    .when(["ReportService", "AuditService"])
    .needs("Logger")
    .give("FileLogger")
    .unwrap();

  let report = container.make_as::<ReportService>("ReportService").unwrap();
  let audit = container.make_as::<AuditService>("AuditService").unwrap();
  let mailer = container.make_as::<Mailer>("Mailer").unwrap();

  assert_eq!(report.logger.name(), "file");
  assert_eq!(audit.logger.name(), "file");
  assert_eq!(mailer.logger.name(), "console");
}

#[test]
fn test_contextual_binding_works_without_an_ordinary_binding() {
  let container = container();
  container.add_contextual_binding("ReportService", "Logger", "ConsoleLogger");

  assert!(container.make("ReportService").is_ok());
  assert!(container.make("AuditService").is_err());
}

#[test]
fn test_contextual_binding_applies_to_nearest_consumer_only() {
  // Newsletter -> Mailer -> Logger: the rule for Newsletter does not reach
  // into Mailer's own dependencies.
  let container = container_with_newsletter();
  container.bind("Logger", "ConsoleLogger");
  container.when("Newsletter").needs("Logger").give("FileLogger").unwrap();

  let newsletter = container.make_as::<Newsletter>("Newsletter").unwrap();

  assert_eq!(newsletter.mailer.logger.name(), "console");
}

#[test]
fn test_contextual_binding_bypasses_singleton_cache() {
  let container = container();
  container.singleton("Logger", "ConsoleLogger");
  container.when("ReportService").needs("Logger").give("ConsoleLogger").unwrap();

  let first = container.make_as::<ReportService>("ReportService").unwrap();
  let second = container.make_as::<ReportService>("ReportService").unwrap();
  let audit = container.make_as::<AuditService>("AuditService").unwrap();
  let shared = container.make_as::<AuditService>("AuditService").unwrap();

  assert!(!Arc::ptr_eq(&first.logger, &second.logger));
  assert!(Arc::ptr_eq(&audit.logger, &shared.logger));
}

#[test]
fn test_factory_sees_the_requesting_consumer() {
  // Arrange
  let container = container();
  let consumers = Arc::new(Mutex::new(Vec::new()));
  let seen = consumers.clone();
  container.bind_factory("Logger", move |resolver, _| {
    seen
      .lock()
      .unwrap()
      .push(resolver.current_concrete().map(str::to_owned));
    resolver.build("ConsoleLogger")
  });

  // Act
  container.make("ReportService").unwrap();
  container.make("AuditService").unwrap();
  container.make("Logger").unwrap();

  // Assert
  assert_eq!(
    *consumers.lock().unwrap(),
    vec![Some("ReportService".to_string()), Some("AuditService".to_string()), None]
  );
}

#[test]
fn test_give_without_needs_is_rejected() {
  let container = container();

  let err = container.when(vec!["ReportService", "AuditService"]).give("FileLogger").unwrap_err();

  match err {
    Error::IncompleteContextualBinding { consumers } => {
      assert_eq!(consumers, vec!["ReportService", "AuditService"]);
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn test_contextual_implementation_failures_propagate() {
  let container = container();
  container.when("ReportService").needs("Logger").give("Model").unwrap();

  let err = container.get("ReportService").unwrap_err();

  assert!(matches!(err, Error::NotInstantiable { ref concrete, .. } if concrete == "Model"));
}
