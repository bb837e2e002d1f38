use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Enforces a minimum gap between consecutive calls to a remote service.
///
/// The gap runs from the end of one call to the start of the next, so a
/// slow response never eats into it. The first call never waits.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// A pacer that never sleeps.
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run `call` once the interval since the previous call has elapsed.
    pub fn call<T>(&self, call: impl FnOnce() -> T) -> T {
        self.wait();
        let out = call();
        self.finish();
        out
    }

    /// Block until the interval since the last [`finish`](Pacer::finish)
    /// has elapsed. Returns how long this call slept.
    pub fn wait(&self) -> Duration {
        let last = *self.last.lock().unwrap_or_else(|e| e.into_inner());
        let Some(prev) = last else {
            return Duration::ZERO;
        };
        let elapsed = prev.elapsed();
        if elapsed >= self.interval {
            return Duration::ZERO;
        }
        let slept = self.interval - elapsed;
        std::thread::sleep(slept);
        slept
    }

    /// Mark the end of a call.
    pub fn finish(&self) {
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_does_not_sleep() {
        let pacer = Pacer::new(Duration::from_secs(60));
        assert_eq!(pacer.wait(), Duration::ZERO);
    }

    #[test]
    fn second_call_waits_out_the_interval() {
        let pacer = Pacer::new(Duration::from_millis(40));
        let start = Instant::now();
        pacer.call(|| ());
        pacer.call(|| ());
        pacer.call(|| ());
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[test]
    fn gap_is_measured_from_the_end_of_a_slow_call() {
        let pacer = Pacer::new(Duration::from_millis(50));
        let ended = pacer.call(|| {
            std::thread::sleep(Duration::from_millis(80));
            Instant::now()
        });
        let started = pacer.call(Instant::now);
        assert!(started.duration_since(ended) >= Duration::from_millis(50));
    }

    #[test]
    fn unlimited_never_sleeps() {
        let pacer = Pacer::unlimited();
        for _ in 0..5 {
            assert_eq!(pacer.wait(), Duration::ZERO);
            pacer.finish();
        }
    }
}
