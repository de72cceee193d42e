// core/src/pipeline/context_data.rs

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;
use tracing::warn;

/// Shared, lock-protected state that every step of a workflow pipeline reads
/// from and writes into.
///
/// Guards returned by `read`/`write` are blocking and MUST be dropped before
/// any `.await` inside a step handler.
#[derive(Debug)]
pub struct ContextData<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> ContextData<T> {
  pub fn new(data: T) -> Self {
    ContextData(Arc::new(RwLock::new(data)))
  }

  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  /// Takes the state back out once the pipeline has finished with it.
  ///
  /// Every handler has been awaited by then, so a second owner means a
  /// handler leaked its clone. That is logged, and the state is cloned out.
  pub fn into_inner(self) -> T
  where
    T: Clone,
  {
    match Arc::try_unwrap(self.0) {
      Ok(lock) => lock.into_inner(),
      Err(shared) => {
        warn!(
          owners = Arc::strong_count(&shared),
          context = std::any::type_name::<T>(),
          "Pipeline context still shared after the run; cloning it out."
        );
        let data = shared.read().clone();
        data
      }
    }
  }
}

impl<T: Send + Sync + 'static> Clone for ContextData<T> {
  fn clone(&self) -> Self {
    ContextData(Arc::clone(&self.0))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn into_inner_moves_out_a_sole_owner() {
    let ctx = ContextData::new(vec![1, 2]);
    ctx.write().push(3);

    assert_eq!(ctx.into_inner(), vec![1, 2, 3]);
  }

  #[test]
  fn into_inner_with_a_leaked_clone_returns_the_current_state() {
    let ctx = ContextData::new(String::from("placed"));
    let leaked = ctx.clone();

    let data = ctx.into_inner();
    leaked.write().push_str(" later");

    assert_eq!(data, "placed");
    assert_eq!(*leaked.read(), "placed later");
  }
}
