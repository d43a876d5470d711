//! Lock hooks bracketing dispatch in threaded mode.
//!
//! The logger never owns a dispatch-wide lock of its own. A threaded logger is
//! given a [`LockHooks`] implementation and calls `lock` on entry to every
//! dispatch and `unlock` on every way out of it.

use parking_lot::{Condvar, Mutex};

pub trait LockHooks: Send + Sync {
    fn lock(&self);
    fn unlock(&self);
}

/// Lock hooks made from two closures. Any context the hooks need is captured
/// by the closures themselves.
pub struct HookPair<L, U> {
    lock: L,
    unlock: U,
}

pub fn hooks<L, U>(lock: L, unlock: U) -> HookPair<L, U>
where
    L: Fn() + Send + Sync,
    U: Fn() + Send + Sync,
{
    HookPair { lock, unlock }
}

impl<L, U> LockHooks for HookPair<L, U>
where
    L: Fn() + Send + Sync,
    U: Fn() + Send + Sync,
{
    fn lock(&self) {
        (self.lock)()
    }

    fn unlock(&self) {
        (self.unlock)()
    }
}

/// A blocking lock usable as hooks directly.
///
/// `lock` waits until no other dispatch holds it; `unlock` releases it and
/// wakes one waiter.
#[derive(Default)]
pub struct MutexHooks {
    held: Mutex<bool>,
    released: Condvar,
}

impl MutexHooks {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LockHooks for MutexHooks {
    fn lock(&self) {
        let mut held = self.held.lock();
        while *held {
            self.released.wait(&mut held);
        }
        *held = true;
    }

    fn unlock(&self) {
        *self.held.lock() = false;
        self.released.notify_one();
    }
}

/// Holds the hooks' lock for its lifetime. Without hooks it does nothing.
pub(crate) struct DispatchGuard<'a> {
    hooks: Option<&'a dyn LockHooks>,
}

impl<'a> DispatchGuard<'a> {
    pub(crate) fn acquire(hooks: Option<&'a dyn LockHooks>) -> Self {
        if let Some(hooks) = hooks {
            hooks.lock();
        }
        Self { hooks }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if let Some(hooks) = self.hooks {
            hooks.unlock();
        }
    }
}
