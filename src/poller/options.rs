use std::collections::BTreeSet;
use std::time::Duration;

/// Status reported once a module has run to completion.
pub const FINISHED: &str = "FINISHED";
/// Status reported when the remote side aborted the module.
pub const INTERRUPTED: &str = "INTERRUPTED";
/// Result tag: finished, but a human has to look at it.
pub const REVIEW: &str = "REVIEW";
/// Result tag: finished cleanly.
pub const PASSED: &str = "PASSED";

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4 * 60);

/// Parameters of one wait session.
///
/// An empty `results` set means a terminal status is enough on its own and
/// the result tag is not checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOptions {
    pub interval: Duration,
    pub timeout: Duration,
    pub states: BTreeSet<String>,
    pub results: BTreeSet<String>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            states: tags([FINISHED]),
            results: tags([REVIEW, PASSED]),
        }
    }
}

impl WaitOptions {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = tags(states);
        self
    }

    pub fn with_results<I, S>(mut self, results: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.results = tags(results);
        self
    }

    pub fn is_terminal(&self, status: &str) -> bool {
        self.states.contains(status)
    }

    pub fn accepts(&self, result: &str) -> bool {
        self.results.contains(result)
    }
}

fn tags<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}
