//! Fluent registration of contextual bindings.

use crate::container::Container;
use crate::error::{Error, Result};

/// One consumer class name or several.
pub trait IntoConsumers {
  fn into_consumers(self) -> Vec<String>;
}

impl IntoConsumers for &str {
  fn into_consumers(self) -> Vec<String> {
    vec![self.to_owned()]
  }
}

impl IntoConsumers for String {
  fn into_consumers(self) -> Vec<String> {
    vec![self]
  }
}

impl IntoConsumers for &String {
  fn into_consumers(self) -> Vec<String> {
    vec![self.clone()]
  }
}

impl IntoConsumers for Vec<String> {
  fn into_consumers(self) -> Vec<String> {
    self
  }
}

impl IntoConsumers for Vec<&str> {
  fn into_consumers(self) -> Vec<String> {
    self.into_iter().map(str::to_owned).collect()
  }
}

impl IntoConsumers for &[&str] {
  fn into_consumers(self) -> Vec<String> {
    self.iter().map(|s| (*s).to_owned()).collect()
  }
}

impl<const N: usize> IntoConsumers for [&str; N] {
  fn into_consumers(self) -> Vec<String> {
    self.iter().map(|s| (*s).to_owned()).collect()
  }
}

/// Captures "when building X, resolve Y with Z".
///
/// Created by [`Container::when`].
#[must_use = "a contextual binding is only registered by `give`"]
pub struct ContextualBindingBuilder<'c> {
  container: &'c Container,
  consumers: Vec<String>,
  needs: Option<String>,
}

impl<'c> ContextualBindingBuilder<'c> {
  pub(crate) fn new(container: &'c Container, consumers: Vec<String>) -> Self {
    Self {
      container,
      consumers,
      needs: None,
    }
  }

  /// The abstraction the consumers depend on.
  pub fn needs(mut self, abstraction: impl Into<String>) -> Self {
    self.needs = Some(abstraction.into());
    self
  }

  /// The class to build for that abstraction, registered once per consumer.
  pub fn give(self, implementation: &str) -> Result<()> {
    let abstraction = self.needs.ok_or_else(|| Error::IncompleteContextualBinding {
      consumers: self.consumers.clone(),
    })?;

    for consumer in &self.consumers {
      self
        .container
        .add_contextual_binding(consumer, &abstraction, implementation);
    }
    Ok(())
  }
}
