//! Core binding data structures shared by the container and the resolver.

use crate::error::Result;
use crate::resolver::Resolver;
use crate::value::{Arguments, Value};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};

pub(crate) type Factory =
  Arc<dyn for<'c> Fn(&mut Resolver<'c>, &Arguments) -> Result<Value> + Send + Sync>;

/// What an abstraction is bound to.
///
/// Class names and closures are stored side by side and dispatched through
/// one place when a binding is resolved.
#[derive(Clone)]
pub enum Concrete {
  /// Build this class through the reflector.
  Class(String),
  /// Invoke this closure. It receives the active [`Resolver`] so nested
  /// resolutions share the current build context.
  Factory(Factory),
}

impl Concrete {
  pub fn class(name: impl Into<String>) -> Self {
    Concrete::Class(name.into())
  }

  pub fn factory<F>(factory: F) -> Self
  where
    F: for<'c> Fn(&mut Resolver<'c>, &Arguments) -> Result<Value> + Send + Sync + 'static,
  {
    Concrete::Factory(Arc::new(factory))
  }
}

impl From<&str> for Concrete {
  fn from(name: &str) -> Self {
    Concrete::Class(name.to_owned())
  }
}

impl From<String> for Concrete {
  fn from(name: String) -> Self {
    Concrete::Class(name)
  }
}

impl From<&String> for Concrete {
  fn from(name: &String) -> Self {
    Concrete::Class(name.clone())
  }
}

impl fmt::Debug for Concrete {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Concrete::Class(name) => write!(f, "Class({})", name),
      Concrete::Factory(_) => write!(f, "Factory(..)"),
    }
  }
}

#[derive(Debug, Clone)]
pub(crate) struct Binding {
  pub(crate) concrete: Concrete,
  pub(crate) shared: bool,
}

/// One entry of a resolver's build stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Frame {
  /// A concrete class under construction.
  Build(String),
  /// An explicit binding whose factory is running.
  Binding(String),
}

impl Frame {
  pub(crate) fn id(&self) -> &str {
    match self {
      Frame::Build(id) | Frame::Binding(id) => id,
    }
  }

  /// Renders frames for error paths. A binding that resolves to a class of
  /// the same name is marked so both hops stay visible.
  pub(crate) fn describe(frames: &[Frame]) -> Vec<String> {
    frames
      .iter()
      .map(|frame| match frame {
        Frame::Binding(id) if frames.contains(&Frame::Build(id.clone())) => {
          format!("{} (binding)", id)
        }
        frame => frame.id().to_owned(),
      })
      .collect()
  }
}

// --- IN-FLIGHT SINGLETONS ---

/// Identity of a singleton slot, stable while any resolver holds the cell.
pub(crate) fn cell_key(cell: &Arc<OnceCell<Value>>) -> usize {
  Arc::as_ptr(cell) as usize
}

/// The singleton cells being materialised right now, across all threads.
///
/// A thread records the cell it is about to block on before entering
/// `OnceCell::get_or_try_init`, and the cell it owns before running the
/// factory. Together these form a wait-for graph; a wait that would close a
/// loop back to the calling thread is refused instead of blocking forever.
#[derive(Default)]
pub(crate) struct InFlight {
  state: Mutex<InFlightState>,
}

#[derive(Default)]
struct InFlightState {
  owners: HashMap<usize, ThreadId>,
  waiting: HashMap<ThreadId, (usize, String)>,
}

impl InFlight {
  /// Registers the current thread as waiting on `key`.
  ///
  /// On deadlock returns the abstractions along the wait-for chain, starting
  /// with `abstraction` and ending with one the current thread is building.
  pub(crate) fn wait(&self, key: usize, abstraction: &str) -> Result<WaitGuard<'_>, Vec<String>> {
    let me = thread::current().id();
    let mut state = self.state.lock();

    let mut chain = vec![abstraction.to_owned()];
    let mut next = key;
    while let Some(&owner) = state.owners.get(&next) {
      if owner == me {
        return Err(chain);
      }
      match state.waiting.get(&owner) {
        Some((waited, name)) if chain.len() <= state.owners.len() => {
          chain.push(name.clone());
          next = *waited;
        }
        _ => break,
      }
    }

    state.waiting.insert(me, (key, abstraction.to_owned()));
    Ok(WaitGuard {
      in_flight: self,
      thread: me,
      key,
    })
  }

  /// Marks the current thread as the initialiser of `key`.
  pub(crate) fn own(&self, key: usize) -> OwnGuard<'_> {
    let me = thread::current().id();
    let mut state = self.state.lock();
    state.waiting.remove(&me);
    state.owners.insert(key, me);
    OwnGuard { in_flight: self, key }
  }
}

pub(crate) struct WaitGuard<'a> {
  in_flight: &'a InFlight,
  thread: ThreadId,
  key: usize,
}

impl Drop for WaitGuard<'_> {
  fn drop(&mut self) {
    let mut state = self.in_flight.state.lock();
    if matches!(state.waiting.get(&self.thread), Some((key, _)) if *key == self.key) {
      state.waiting.remove(&self.thread);
    }
  }
}

pub(crate) struct OwnGuard<'a> {
  in_flight: &'a InFlight,
  key: usize,
}

impl Drop for OwnGuard<'_> {
  fn drop(&mut self) {
    self.in_flight.state.lock().owners.remove(&self.key);
  }
}
