use thiserror::Error;

/// Errors produced while registering or resolving services.
///
/// Variants fall into two classes. Resolution failures (see
/// [`Error::is_resolution_failure`]) mean a target was found but could not be
/// constructed. Everything else means the requested entry has no known way to
/// be produced, and [`Container::get`](crate::Container::get) reports those as
/// [`Error::EntryNotFound`].
#[derive(Debug, Error)]
pub enum Error {
  #[error("type `{0}` is not known to the reflector")]
  UnknownType(String),

  #[error("no entry was found for identifier `{id}`")]
  EntryNotFound {
    id: String,
    #[source]
    source: Option<Box<Error>>,
  },

  #[error("target `{concrete}` is not instantiable (build stack: [{}])", .stack.join(", "))]
  NotInstantiable { concrete: String, stack: Vec<String> },

  #[error("unresolvable dependency `{parameter}` while building `{concrete}`")]
  Unresolvable {
    concrete: String,
    parameter: String,
    #[source]
    source: Box<Error>,
  },

  #[error("missing argument `{parameter}` for `{target}`")]
  MissingArgument { target: String, parameter: String },

  #[error("circular dependency detected: {}", .path.join(" -> "))]
  CircularDependency { path: Vec<String> },

  #[error("resolution depth limit of {limit} exceeded: {}", .path.join(" -> "))]
  DepthExceeded { limit: usize, path: Vec<String> },

  #[error("argument `{parameter}` is not a `{expected}`")]
  ArgumentType {
    parameter: String,
    expected: &'static str,
  },

  #[error("`{id}` did not resolve to a `{expected}`")]
  TypeMismatch { id: String, expected: &'static str },

  #[error("constructor of `{concrete}` failed: {message}")]
  Construction { concrete: String, message: String },

  #[error("contextual binding for [{}] was given an implementation before `needs` was called", .consumers.join(", "))]
  IncompleteContextualBinding { consumers: Vec<String> },
}

impl Error {
  /// Builds a [`Error::Construction`] for use inside constructors and factories.
  pub fn construction(concrete: impl Into<String>, message: impl Into<String>) -> Self {
    Error::Construction {
      concrete: concrete.into(),
      message: message.into(),
    }
  }

  /// Whether this error means "the entry exists but failed to build".
  ///
  /// These propagate unchanged through nested resolution and through
  /// `Container::get`.
  pub fn is_resolution_failure(&self) -> bool {
    matches!(
      self,
      Error::NotInstantiable { .. }
        | Error::Unresolvable { .. }
        | Error::MissingArgument { .. }
        | Error::CircularDependency { .. }
        | Error::DepthExceeded { .. }
    )
  }

  /// Whether this error means "no such entry".
  pub fn is_not_found(&self) -> bool {
    matches!(self, Error::UnknownType(_) | Error::EntryNotFound { .. })
  }
}

/// A specialized `Result` type for container operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
