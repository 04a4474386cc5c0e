//! Forcing pending computations to settle inside a synchronous traversal.
//!
//! Traversal is plain recursive code, but a component's pre-render hook may
//! hand back a future. [`SyncBridge::await_sync`] blocks the rendering thread
//! on that future: the thread parks until the future is woken, and while it
//! waits the bridge also drives every task components spawned onto the pass
//! (see [`Scope::spawner`](pour_core::Scope::spawner)). No second thread is
//! involved.
//!
//! There is no timeout and no cancellation. A computation that never settles
//! stalls the render pass forever.

use core::{
    cell::{Cell, RefCell},
    fmt,
    future::Future,
};
use std::time::Instant;

use futures::executor::{LocalPool, LocalSpawner, enter};
use pour_core::{ComponentError, Lifecycle};

/// Blocks on pending computations for one render pass.
pub struct SyncBridge {
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
    waits: Cell<usize>,
}

impl fmt::Debug for SyncBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncBridge")
            .field("waits", &self.waits.get())
            .finish_non_exhaustive()
    }
}

impl Default for SyncBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncBridge {
    /// Creates a bridge with its own task pool.
    #[must_use]
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            pool: RefCell::new(pool),
            spawner,
            waits: Cell::new(0),
        }
    }

    /// Spawner for cooperative tasks driven while the bridge waits.
    #[must_use]
    pub const fn spawner(&self) -> &LocalSpawner {
        &self.spawner
    }

    /// Number of pending computations waited for so far.
    #[must_use]
    pub fn waits(&self) -> usize {
        self.waits.get()
    }

    /// Returns once `lifecycle` has settled.
    ///
    /// [`Lifecycle::Ready`] returns once spawned tasks have stalled.
    ///
    /// # Errors
    ///
    /// Returns the error the pending computation settled with, or an error if
    /// the bridge is used from inside a running executor.
    pub fn await_sync(&self, lifecycle: Lifecycle) -> Result<(), ComponentError> {
        match lifecycle {
            Lifecycle::Ready => {
                self.run_until_stalled();
                Ok(())
            }
            Lifecycle::Pending(future) => self.block_on(future)?,
        }
    }

    /// Polls spawned tasks until none of them can make progress.
    ///
    /// Does nothing when called from inside a running executor.
    pub fn run_until_stalled(&self) {
        let Ok(mut pool) = self.pool.try_borrow_mut() else {
            return;
        };
        if enter().is_err() {
            return;
        }
        pool.run_until_stalled();
    }

    /// Blocks the current thread until `future` completes.
    ///
    /// # Errors
    ///
    /// Fails instead of deadlocking when called from inside a running
    /// executor, including from a task this bridge is driving.
    pub fn block_on<F: Future>(&self, future: F) -> Result<F::Output, ComponentError> {
        let Ok(mut pool) = self.pool.try_borrow_mut() else {
            return Err(ComponentError::msg(
                "cannot wait for a pending computation from inside another one",
            ));
        };
        if enter().is_err() {
            return Err(ComponentError::msg(
                "cannot wait for a pending computation from inside a running executor",
            ));
        }

        let started = Instant::now();
        self.waits.set(self.waits.get() + 1);
        tracing::debug!("waiting for pending computation");

        let output = pool.run_until(future);

        tracing::debug!(elapsed = ?started.elapsed(), "pending computation settled");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::task::LocalSpawnExt;
    use std::{rc::Rc, thread, time::Duration};

    #[test]
    fn test_ready_returns_immediately() {
        let bridge = SyncBridge::new();
        bridge.await_sync(Lifecycle::Ready).unwrap();
        assert_eq!(bridge.waits(), 0);
    }

    #[test]
    fn test_waits_for_another_thread() {
        let (sender, receiver) = async_channel::bounded::<u32>(1);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            sender.send_blocking(42).unwrap();
        });

        let bridge = SyncBridge::new();
        let value = bridge.block_on(async move { receiver.recv().await }).unwrap();
        assert_eq!(value.unwrap(), 42);
        assert_eq!(bridge.waits(), 1);
    }

    #[test]
    fn test_drives_spawned_tasks() {
        let bridge = SyncBridge::new();
        let (sender, receiver) = async_channel::unbounded::<&str>();
        bridge
            .spawner()
            .spawn_local(async move {
                sender.send("from task").await.unwrap();
            })
            .unwrap();

        bridge
            .await_sync(Lifecycle::pending(async move {
                let message = receiver.recv().await?;
                assert_eq!(message, "from task");
                Ok::<_, ComponentError>(())
            }))
            .unwrap();
    }

    #[test]
    fn test_ready_polls_spawned_tasks() {
        let bridge = SyncBridge::new();
        let done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&done);
        bridge
            .spawner()
            .spawn_local(async move { flag.set(true) })
            .unwrap();

        bridge.await_sync(Lifecycle::Ready).unwrap();
        assert!(done.get());
        assert_eq!(bridge.waits(), 0);
    }

    #[test]
    fn test_rejection_propagates() {
        let bridge = SyncBridge::new();
        let error = bridge
            .await_sync(Lifecycle::pending(async { Err(ComponentError::msg("rejected")) }))
            .unwrap_err();
        assert_eq!(error.to_string(), "rejected");
    }

    #[test]
    fn test_reentrant_wait_fails() {
        let bridge = Rc::new(SyncBridge::new());
        let inner = Rc::clone(&bridge);
        let nested = bridge
            .block_on(async move { inner.block_on(async {}) })
            .unwrap();
        assert!(nested.is_err());
    }
}
