//! Fixed-timestep frame clock
//!
//! Render frames arrive at whatever rate the host manages; the simulation
//! always steps by `SIM_DT`. Leftover time carries into the next frame.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's elapsed time and return how many fixed steps to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        // Tab switches and debugger pauses produce huge deltas
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    /// Time carried over to the next frame
    pub fn leftover(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixty_hz_frames_step_once() {
        let mut clock = FrameClock::new();
        let mut total = 0;
        for _ in 0..60 {
            total += clock.advance(SIM_DT + 1e-6);
        }
        assert_eq!(total, 60);
    }

    #[test]
    fn test_slow_frames_accumulate() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(SIM_DT * 0.5), 0);
        assert_eq!(clock.advance(SIM_DT * 0.6), 1);
        assert!(clock.leftover() < SIM_DT);
    }

    #[test]
    fn test_huge_delta_is_clamped() {
        let mut clock = FrameClock::new();
        let steps = clock.advance(5.0);
        assert!(steps <= MAX_SUBSTEPS);
        assert!(clock.leftover() <= SIM_DT);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.leftover(), 0.0);
    }
}
