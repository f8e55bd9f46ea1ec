use std::{num::NonZeroUsize, thread};

use crate::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// What the tracer prints, and whether it waits between steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceConfig {
    pub coords: bool,
    pub stack: bool,
    pub grid: bool,
    pub pause: bool,
}

impl TraceConfig {
    /// Everything on.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            coords: true,
            stack: true,
            grid: true,
            pause: true,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.coords || self.stack || self.grid || self.pause
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub dataflow: bool,
    pub workers: NonZeroUsize,
    pub trace: TraceConfig,
    pub width: usize,
    pub height: usize,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataflow: false,
            workers: default_workers(),
            trace: TraceConfig::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: None,
        }
    }
}

#[must_use]
pub fn default_workers() -> NonZeroUsize {
    thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}
