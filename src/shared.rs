//! A panel parked in a `static` so an interrupt handler can draw while the
//! main loop redraws, or the other way round.
//!
//! The codec and drivers do no locking of their own. Every access here runs
//! inside `critical_section::with`, which is the whole synchronization story.

use core::cell::RefCell;
use critical_section::Mutex;

pub struct SharedPanel<P> {
    slot: Mutex<RefCell<Option<P>>>,
}

impl<P> SharedPanel<P> {
    pub const fn new() -> Self {
        Self { slot: Mutex::new(RefCell::new(None)) }
    }

    /// Store `panel`, handing back whatever was installed before.
    pub fn install(&self, panel: P) -> Option<P> {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).replace(panel))
    }

    /// Run `f` on the panel. `None` if nothing is installed.
    pub fn with<R>(&self, f: impl FnOnce(&mut P) -> R) -> Option<R> {
        critical_section::with(|cs| {
            let mut slot = self.slot.borrow_ref_mut(cs);
            slot.as_mut().map(f)
        })
    }

    pub fn take(&self) -> Option<P> {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).take())
    }

    pub fn is_installed(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow_ref(cs).is_some())
    }
}

impl<P> Default for SharedPanel<P> {
    fn default() -> Self {
        Self::new()
    }
}
