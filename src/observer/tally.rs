use std::ops::AddAssign;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Outcome counters of one run, or of several runs added together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Tests whose comparison held.
    pub passes: u32,
    /// Tests whose comparison was false.
    pub failures: u32,
    /// Tests whose evaluation raised.
    pub exceptions: u32,
    /// Errors outside tests: a raising print statement, or a crashed program.
    pub other_exceptions: u32,
}

impl Tally {
    /// Tests seen. Other exceptions are not tests.
    pub fn total(&self) -> u32 {
        self.passes + self.failures + self.exceptions
    }

    /// Rounded share of passing tests, or `None` when there were no tests.
    pub fn percent_passing(&self) -> Option<u32> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let passing = f64::from(total - self.failures - self.exceptions);
        Some((100.0 * passing / f64::from(total)).round() as u32)
    }

    /// Whether any test failed or raised.
    pub fn has_failures(&self) -> bool {
        self.failures + self.exceptions > 0
    }

    /// Whether anything at all went wrong.
    pub fn has_problems(&self) -> bool {
        self.has_failures() || self.other_exceptions > 0
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Tally) {
        self.passes += other.passes;
        self.failures += other.failures;
        self.exceptions += other.exceptions;
        self.other_exceptions += other.other_exceptions;
    }
}

/// Accumulating wall-clock timer.
#[derive(Debug, Default, Clone)]
pub struct Stopwatch {
    started: Option<Instant>,
    elapsed: Duration,
}

impl Stopwatch {
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Stop and add the interval since [`Stopwatch::start`]; a no-op when not running.
    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed += started.elapsed();
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_the_passing_share() {
        let tally = Tally {
            passes: 9,
            failures: 4,
            exceptions: 5,
            other_exceptions: 3,
        };
        assert_eq!(tally.total(), 18);
        assert_eq!(tally.percent_passing(), Some(50));
        let tally = Tally {
            passes: 2,
            failures: 1,
            ..Tally::default()
        };
        assert_eq!(tally.percent_passing(), Some(67));
    }

    #[test]
    fn no_tests_means_no_percentage() {
        let tally = Tally {
            other_exceptions: 1,
            ..Tally::default()
        };
        assert_eq!(tally.percent_passing(), None);
        assert!(tally.has_problems());
        assert!(!tally.has_failures());
    }

    #[test]
    fn tallies_add_fieldwise() {
        let mut total = Tally {
            passes: 1,
            ..Tally::default()
        };
        total += Tally {
            passes: 2,
            failures: 1,
            exceptions: 1,
            other_exceptions: 1,
        };
        assert_eq!(
            total,
            Tally {
                passes: 3,
                failures: 1,
                exceptions: 1,
                other_exceptions: 1
            }
        );
    }

    #[test]
    fn tally_serializes_with_field_names() {
        let json = serde_json::to_string(&Tally::default()).unwrap();
        assert_eq!(json, r#"{"passes":0,"failures":0,"exceptions":0,"other_exceptions":0}"#);
    }

    #[test]
    fn stopwatch_accumulates() {
        let mut watch = Stopwatch::default();
        watch.stop();
        assert_eq!(watch.elapsed(), Duration::ZERO);
        watch.start();
        watch.stop();
        let first = watch.elapsed();
        watch.start();
        watch.stop();
        assert!(watch.elapsed() >= first);
    }
}
