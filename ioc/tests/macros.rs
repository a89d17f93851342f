// ioc/tests/macros.rs

//! Tests for the resolution macros:
//! - `make!`
//! - `maybe_make!`

mod common;

use common::*;
use weft_ioc::{make, maybe_make, Value};

#[test]
fn test_make_resolves_concrete_and_trait_types() {
  // Arrange
  let container = container();
  container.singleton("Logger", "ConsoleLogger");
  container.instance("retries", Value::new(3_u8));

  // Act
  let report = make!(container, "ReportService" => ReportService);
  let logger = make!(container, "Logger" => dyn Logger);
  let retries = make!(container, "retries");

  // Assert
  assert_eq!(report.logger.name(), "console");
  assert_eq!(logger.name(), "console");
  assert_eq!(*retries.get::<u8>().unwrap(), 3);
}

#[test]
fn test_maybe_make_returns_none_on_failure() {
  let container = container();
  container.bind("Logger", "FileLogger");

  assert_eq!(maybe_make!(container, "Logger" => dyn Logger).unwrap().name(), "file");
  assert!(maybe_make!(container, "Logger" => Database).is_none());
  assert!(maybe_make!(container, "Model").is_none());
  assert!(maybe_make!(container, "NoSuchService").is_none());
}

#[test]
#[should_panic(expected = "Failed to resolve required service `Model`")]
fn test_make_panics_on_missing() {
  let container = container();
  make!(container, "Model");
}

#[test]
#[should_panic(expected = "Failed to resolve required service `Clock` as")]
fn test_make_panics_on_type_mismatch() {
  let container = container();
  make!(container, "Clock" => Database);
}
