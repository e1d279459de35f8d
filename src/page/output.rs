//! Output sink with a toggleable silent mode

use std::cell::{Cell, RefCell};

/// Buffered page output
///
/// While silent, writes are dropped but evaluation continues normally.
#[derive(Debug, Default)]
pub struct Output {
    buf: RefCell<String>,
    silent: Cell<bool>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text unless the sink is silent
    pub fn write(&self, s: &str) {
        if !self.silent.get() {
            self.buf.borrow_mut().push_str(s);
        }
    }

    pub fn is_silent(&self) -> bool {
        self.silent.get()
    }

    /// Applies to every subsequent write
    pub fn set_silent(&self, silent: bool) {
        self.silent.set(silent);
    }

    /// Set the silent flag until the returned guard is dropped
    pub fn silence(&self, silent: bool) -> SilentGuard<'_> {
        let previous = self.silent.replace(silent);
        SilentGuard {
            out: self,
            previous,
        }
    }

    /// Copy of everything written so far
    pub fn contents(&self) -> String {
        self.buf.borrow().clone()
    }

    pub fn into_string(self) -> String {
        self.buf.into_inner()
    }
}

/// Restores the previous silent flag on drop
#[derive(Debug)]
pub struct SilentGuard<'a> {
    out: &'a Output,
    previous: bool,
}

impl Drop for SilentGuard<'_> {
    fn drop(&mut self) {
        self.out.silent.set(self.previous);
    }
}
