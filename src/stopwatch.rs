//! Wall-clock timing for the bench runner.
//!
//! A direct replacement for the source's `clock_gettime`-based `Watch`:
//! same start/stop/reset/elapsed_* shape, backed by `std::time::Instant`
//! instead of a raw monotonic clock handle.

use std::time::{Duration, Instant};

pub struct Stopwatch {
    start: Option<Instant>,
    elapsed: Duration,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self { start: None, elapsed: Duration::ZERO }
    }

    pub fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        if let Some(start) = self.start.take() {
            self.elapsed += start.elapsed();
        }
    }

    pub fn reset(&mut self) {
        self.start = None;
        self.elapsed = Duration::ZERO;
    }

    fn elapsed(&self) -> Duration {
        match self.start {
            Some(start) => self.elapsed + start.elapsed(),
            None => self.elapsed,
        }
    }

    pub fn elapsed_nanoseconds(&self) -> u128 {
        self.elapsed().as_nanos()
    }

    pub fn elapsed_microseconds(&self) -> u128 {
        self.elapsed().as_micros()
    }

    pub fn elapsed_milliseconds(&self) -> u128 {
        self.elapsed().as_millis()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Run `f`, measuring only the time spent inside it, and return its result.
    pub fn time<T>(&mut self, f: impl FnOnce() -> T) -> T {
        self.start();
        let result = f();
        self.stop();
        result
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_zero_before_starting() {
        let watch = Stopwatch::new();
        assert_eq!(watch.elapsed_nanoseconds(), 0);
    }

    #[test]
    fn time_accumulates_across_runs() {
        let mut watch = Stopwatch::new();
        watch.time(|| {
            let mut x = 0u64;
            for i in 0..100_000 {
                x = x.wrapping_add(i);
            }
            std::hint::black_box(x);
        });
        let first = watch.elapsed_nanoseconds();
        watch.time(|| {});
        assert!(watch.elapsed_nanoseconds() >= first);
    }

    #[test]
    fn reset_clears_accumulated_time() {
        let mut watch = Stopwatch::new();
        watch.time(|| {});
        watch.reset();
        assert_eq!(watch.elapsed_nanoseconds(), 0);
    }
}
