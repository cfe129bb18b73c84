//! Wall-clock timing of the frame stages

use std::time::Instant;
use tracing::trace;

/// Times a pipeline stage until it goes out of scope, then logs the duration
/// at `trace` level
pub struct ProfilerScope {
    start: Instant,
    stage: &'static str,
}

impl ProfilerScope {
    pub fn new(stage: &'static str) -> Self {
        Self {
            start: Instant::now(),
            stage,
        }
    }

    /// Milliseconds since the scope was opened
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ProfilerScope {
    fn drop(&mut self) {
        trace!("{} stage: {:.3}ms", self.stage, self.elapsed_ms());
    }
}

/// Running statistics over produced frames
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTimer {
    last_ms: f64,
    total_ms: f64,
    frames: u64,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account one finished frame
    pub fn record(&mut self, frame_ms: f64) {
        self.last_ms = frame_ms;
        self.total_ms += frame_ms;
        self.frames += 1;
    }

    pub fn last_frame_time_ms(&self) -> f64 {
        self.last_ms
    }

    /// 0 until a frame is recorded
    pub fn mean_frame_time_ms(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.total_ms / self.frames as f64
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_scope_sees_sleep() {
        let scope = ProfilerScope::new("sleep");
        thread::sleep(Duration::from_millis(5));
        let elapsed = scope.elapsed_ms();
        assert!(elapsed >= 5.0, "Expected at least 5ms, got {elapsed}");
    }

    #[test]
    fn test_mean_over_frames() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.mean_frame_time_ms(), 0.0);

        for ms in [10.0, 20.0, 45.0] {
            timer.record(ms);
        }
        assert_eq!(timer.frames(), 3);
        assert_eq!(timer.last_frame_time_ms(), 45.0);
        assert_eq!(timer.mean_frame_time_ms(), 25.0);
    }
}
