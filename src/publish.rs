//! Process-wide slot for the resolved configuration.
//!
//! Resolution happens once, near startup; later call sites read the published
//! config through [`current`] instead of threading it through every function
//! signature. The slot swaps atomically, so re-resolving and re-publishing is
//! safe while readers hold the previous value.

use crate::resolver::Config;
use arc_swap::ArcSwapOption;
use std::sync::Arc;

static CURRENT: ArcSwapOption<Config> = ArcSwapOption::const_empty();

/// Store a resolved config in the process-wide slot, replacing any
/// previous one. Returns the shared handle.
pub fn publish(config: Config) -> Arc<Config> {
    let config = Arc::new(config);
    CURRENT.store(Some(Arc::clone(&config)));
    config
}

/// The most recently published config, if any.
pub fn current() -> Option<Arc<Config>> {
    CURRENT.load_full()
}

/// Empty the slot. Mainly useful in tests.
pub fn clear() {
    CURRENT.store(None);
}
