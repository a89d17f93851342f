//! Container configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const DEFAULT_MAX_DEPTH: usize = 128;

/// What happens to a materialised singleton when its abstraction is bound again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RebindPolicy {
  /// Drop the cached instance so the next resolution uses the new binding.
  #[default]
  Invalidate,
  /// Keep serving the previously cached instance.
  Preserve,
}

/// Tunables for a [`Container`](crate::Container).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContainerConfig {
  /// Maximum number of nested frames (builds plus bindings) in a single
  /// resolution request.
  pub max_depth: usize,
  pub rebind: RebindPolicy,
}

impl Default for ContainerConfig {
  fn default() -> Self {
    Self {
      max_depth: DEFAULT_MAX_DEPTH,
      rebind: RebindPolicy::default(),
    }
  }
}

impl ContainerConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = max_depth;
    self
  }

  pub fn rebind(mut self, policy: RebindPolicy) -> Self {
    self.rebind = policy;
    self
  }
}
