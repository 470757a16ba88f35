// flexstep/src/core/context.rs

//! The per-run execution context: running build status plus host data.

use crate::core::status::BuildStatus;
use parking_lot::{MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

struct ContextInner<TData> {
  status: RwLock<BuildStatus>,
  data: RwLock<TData>,
}

/// Shared handle to the state of one sequence run.
///
/// Exactly one context exists per run. Cloning yields another handle to the same run, which is
/// how conditions and actions see "status so far". Conditions and actions can read the status
/// but only the executor folds stage results into it, so it never decreases during a run.
///
/// IMPORTANT: Lock guards obtained from this struct are blocking and MUST NOT
/// be held across `.await` suspension points in asynchronous code.
pub struct ExecutionContext<TData: Send + Sync + 'static>(Arc<ContextInner<TData>>);

impl<TData: Send + Sync + 'static> ExecutionContext<TData> {
  /// Starts a run at `BuildStatus::Success`.
  pub fn new(data: TData) -> Self {
    Self::with_status(data, BuildStatus::Success)
  }

  /// Starts a run whose status was already degraded by the host (e.g. by earlier build phases).
  pub fn with_status(data: TData, initial: BuildStatus) -> Self {
    ExecutionContext(Arc::new(ContextInner {
      status: RwLock::new(initial),
      data: RwLock::new(data),
    }))
  }

  /// The aggregated status so far.
  pub fn status(&self) -> BuildStatus {
    *self.0.status.read()
  }

  /// Folds `observed` into the running status and returns the new value.
  pub(crate) fn record_status(&self, observed: BuildStatus) -> BuildStatus {
    let mut status = self.0.status.write();
    *status = status.combine(observed);
    *status
  }

  /// Acquires a read lock on the host data.
  /// The returned guard MUST be dropped before any `.await` point.
  pub fn read(&self) -> RwLockReadGuard<'_, TData> {
    self.0.data.read()
  }

  /// Acquires a write lock on the host data.
  /// The returned guard MUST be dropped before any `.await` point.
  pub fn write(&self) -> RwLockWriteGuard<'_, TData> {
    self.0.data.write()
  }

  pub fn try_read(&self) -> Option<RwLockReadGuard<'_, TData>> {
    self.0.data.try_read()
  }

  pub fn try_write(&self) -> Option<RwLockWriteGuard<'_, TData>> {
    self.0.data.try_write()
  }

  // Example: ctx.map_read(|data| &data.workspace)
  pub fn map_read<F, U: ?Sized>(&self, f: F) -> MappedRwLockReadGuard<'_, U>
  where
    F: FnOnce(&TData) -> &U,
  {
    RwLockReadGuard::map(self.read(), f)
  }

  pub fn map_write<F, U: ?Sized>(&self, f: F) -> MappedRwLockWriteGuard<'_, U>
  where
    F: FnOnce(&mut TData) -> &mut U,
  {
    RwLockWriteGuard::map(self.write(), f)
  }
}

impl<TData: Send + Sync + 'static> Clone for ExecutionContext<TData> {
  fn clone(&self) -> Self {
    ExecutionContext(Arc::clone(&self.0))
  }
}

impl<TData: Send + Sync + 'static + Default> Default for ExecutionContext<TData> {
  fn default() -> Self {
    Self::new(Default::default())
  }
}

impl<TData: Send + Sync + 'static + std::fmt::Debug> std::fmt::Debug for ExecutionContext<TData> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ExecutionContext")
      .field("status", &self.status())
      .field("data", &*self.read())
      .finish()
  }
}
