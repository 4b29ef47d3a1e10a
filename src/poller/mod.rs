mod options;
mod wait;

pub use options::{
    DEFAULT_INTERVAL, DEFAULT_TIMEOUT, FINISHED, INTERRUPTED, PASSED, REVIEW, WaitOptions,
};
pub use wait::{ModuleInfoSource, ModuleOutcome, wait_for_modules, wait_for_state};
