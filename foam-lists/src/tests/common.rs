//! Instrumented element type shared by the cross-container tests.

use std::cell::Cell;
use tracing::Level;

thread_local! {
    static CLONES: Cell<usize> = const { Cell::new(0) };
}

/// Element that counts how often it is cloned on the current thread.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Tracked(pub u32);

impl Clone for Tracked {
    fn clone(&self) -> Self {
        CLONES.with(|clones| clones.set(clones.get() + 1));
        Tracked(self.0)
    }
}

pub fn reset_clones() {
    CLONES.with(|clones| clones.set(0));
}

pub fn clones() -> usize {
    CLONES.with(Cell::get)
}

pub fn tracked(count: u32) -> Vec<Tracked> {
    (0..count).map(Tracked).collect()
}

/// Routes `tracing` output to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_test_writer()
        .try_init();
}
