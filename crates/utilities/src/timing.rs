use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use std::time::Instant;

use log::debug;

/// Collects the durations of named phases, to be printed at the end of a tool.
#[derive(Default)]
pub struct Timing {
    results: Rc<RefCell<Vec<(String, Duration)>>>,
}

/// Measures a single phase, registering the result in its [Timing] when
/// finished or dropped.
pub struct Timer {
    name: String,
    start: Instant,
    results: Rc<RefCell<Vec<(String, Duration)>>>,
    registered: bool,
}

impl Timing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts measuring the phase with the given name.
    pub fn start(&mut self, name: &str) -> Timer {
        Timer {
            name: name.to_string(),
            start: Instant::now(),
            results: self.results.clone(),
            registered: false,
        }
    }

    /// Returns the measured phases in the order in which they finished.
    pub fn results(&self) -> Vec<(String, Duration)> {
        self.results.borrow().clone()
    }

    /// Prints all the measured phases to stderr.
    pub fn print(&self) {
        for (name, duration) in self.results.borrow().iter() {
            eprintln!("Time {}: {:.3}s", name, duration.as_secs_f64());
        }
    }
}

impl Timer {
    /// Stops the timer and registers the duration, only the first call has an effect.
    pub fn finish(&mut self) -> Duration {
        let duration = self.start.elapsed();

        if !self.registered {
            debug!("Time {}: {:.3}s", self.name, duration.as_secs_f64());
            self.results.borrow_mut().push((self.name.clone(), duration));
            self.registered = true;
        }

        duration
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.finish();
    }
}
