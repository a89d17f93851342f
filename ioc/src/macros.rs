//! Public macros for ergonomic, typed resolution.

/// Resolves a service from a container and downcasts it.
///
/// # Panics
///
/// Panics if the service cannot be resolved or has a different type. For a
/// non-panicking version, use [`maybe_make!`] or `Container::make_as`.
///
/// # Examples
///
/// ```
/// use weft_ioc::{make, Container, Value};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// let container = Container::new();
/// container.singleton_factory("Greeter", |_, _| {
///   Ok(Value::from_arc::<dyn Greeter>(Arc::new(EnglishGreeter)))
/// });
///
/// let greeter = make!(container, "Greeter" => dyn Greeter);
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! make {
  // Arm for an untyped value: make!(container, "Logger")
  ($container:expr, $id:expr) => {
    match $container.make($id) {
      Ok(value) => value,
      Err(err) => panic!("Failed to resolve required service `{}`: {}", $id, err),
    }
  };

  // Arm for a concrete type or trait object: make!(container, "Logger" => dyn Logger)
  ($container:expr, $id:expr => $type:ty) => {
    match $container.make_as::<$type>($id) {
      Ok(service) => service,
      Err(err) => panic!(
        "Failed to resolve required service `{}` as {}: {}",
        $id,
        std::any::type_name::<$type>(),
        err
      ),
    }
  };
}

/// Like [`make!`] but returns an `Option` instead of panicking.
#[macro_export]
macro_rules! maybe_make {
  ($container:expr, $id:expr) => {
    $container.make($id).ok()
  };

  ($container:expr, $id:expr => $type:ty) => {
    $container.make_as::<$type>($id).ok()
  };
}
