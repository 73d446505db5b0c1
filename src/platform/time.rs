//! Frame timing from host timestamps
//!
//! The browser hands `requestAnimationFrame` a millisecond timestamp. The clock
//! turns consecutive timestamps into a clamped delta in seconds so a tab that
//! was hidden for a while does not drop the player through the floor.

use crate::consts::{FIRST_FRAME_DT, MAX_FRAME_DT};

const FPS_SAMPLE_COUNT: usize = 60;

pub struct FrameClock {
    last_ms: Option<f64>,
    pub max_dt: f32,
    pub frame_count: u64,
    fps_samples: [f32; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_ms: None,
            max_dt: MAX_FRAME_DT,
            frame_count: 0,
            fps_samples: [FIRST_FRAME_DT; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
        }
    }

    /// Seconds since the previous timestamp, clamped to `max_dt`
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            None => FIRST_FRAME_DT,
            Some(last) => {
                let raw = ((now_ms - last) / 1000.0).max(0.0) as f32;
                if raw > self.max_dt {
                    log::debug!("Frame took {:.1}ms, clamping", raw * 1000.0);
                    self.max_dt
                } else {
                    raw
                }
            }
        };
        self.last_ms = Some(now_ms);
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt = self.fps_samples.iter().sum::<f32>() / FPS_SAMPLE_COUNT as f32;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        dt
    }

    /// Forget the last timestamp (tab hidden, focus lost)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_uses_nominal_dt() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(12_345.0), FIRST_FRAME_DT);
        assert_eq!(clock.frame_count, 1);
    }

    #[test]
    fn test_delta_in_seconds() {
        let mut clock = FrameClock::new();
        clock.tick(1000.0);
        let dt = clock.tick(1020.0);
        assert!((dt - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        assert_eq!(clock.tick(5000.0), MAX_FRAME_DT);
    }

    #[test]
    fn test_backwards_timestamp_is_zero() {
        let mut clock = FrameClock::new();
        clock.tick(100.0);
        assert_eq!(clock.tick(90.0), 0.0);
    }

    #[test]
    fn test_smoothed_fps_follows_frame_rate() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.smoothed_fps, 60.0);
        let mut now = 0.0;
        for _ in 0..120 {
            clock.tick(now);
            now += 1000.0 / 30.0;
        }
        assert!((clock.smoothed_fps - 30.0).abs() < 0.1, "{}", clock.smoothed_fps);
    }

    #[test]
    fn test_reset_restarts_from_nominal() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        clock.reset();
        assert_eq!(clock.tick(10_000.0), FIRST_FRAME_DT);
    }
}
