// orderflow/src/core/context_data.rs
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared, lockable state handed to every handler of a pipeline run.
///
/// All clones point at the same state. The caller keeps one clone and reads
/// the outputs back once `run` returns.
///
/// Guards are blocking locks and must be dropped before any `.await`.
pub struct ContextData<T: Send + Sync + 'static> {
  shared: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> ContextData<T> {
  pub fn new(data: T) -> Self {
    Self {
      shared: Arc::new(RwLock::new(data)),
    }
  }

  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.shared.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.shared.write()
  }

  pub fn try_read(&self) -> Option<RwLockReadGuard<'_, T>> {
    self.shared.try_read()
  }

  pub fn try_write(&self) -> Option<RwLockWriteGuard<'_, T>> {
    self.shared.try_write()
  }

  /// Read guard over one field, e.g. `ctx.map_read(|d| &d.total)`.
  pub fn map_read<U: ?Sized>(&self, f: impl FnOnce(&T) -> &U) -> MappedRwLockReadGuard<'_, U> {
    RwLockReadGuard::map(self.shared.read(), f)
  }

  /// Copies values out under a read guard that is released on return.
  pub fn extract<R>(&self, f: impl FnOnce(&T) -> R) -> R {
    f(&self.shared.read())
  }

  /// Mutates under a write guard that is released on return.
  pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
    f(&mut self.shared.write())
  }

  pub fn handle_count(&self) -> usize {
    Arc::strong_count(&self.shared)
  }
}

impl<T: Send + Sync + 'static> Clone for ContextData<T> {
  fn clone(&self) -> Self {
    Self {
      shared: Arc::clone(&self.shared),
    }
  }
}

impl<T: Send + Sync + 'static + std::fmt::Debug> std::fmt::Debug for ContextData<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self.shared.try_read() {
      Some(data) => f.debug_tuple("ContextData").field(&*data).finish(),
      None => f.write_str("ContextData(<locked>)"),
    }
  }
}

impl<T: Send + Sync + 'static + Default> Default for ContextData<T> {
  fn default() -> Self {
    Self::new(T::default())
  }
}
