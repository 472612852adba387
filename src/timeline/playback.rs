//! Automatic playback: a fixed-interval loop advancing the cursor.

use super::TimelineState;
use serde::{Deserialize, Serialize};

/// Wall-clock seconds between playback steps.
const STEP_INTERVAL: f64 = 0.1;
/// Steps to sweep the whole timeline at 1x speed.
const STEPS_PER_SWEEP: f64 = 100.0;

/// What playback does when the cursor reaches the end of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EndPolicy {
    /// Jump back to zero and keep playing.
    #[default]
    Wrap,
    /// Pause at the end.
    Stop,
}

impl EndPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            EndPolicy::Wrap => "Loop",
            EndPolicy::Stop => "Stop at end",
        }
    }
}

/// Playback state, fed wall-clock deltas by the frame loop.
///
/// Advancement happens in whole 100 ms steps of `max_time / 100` each,
/// routed through [`TimelineState::increment_time`] so the cursor can
/// never overshoot the bound.
#[derive(Debug, Clone)]
pub struct Playback {
    playing: bool,
    speed: f32,
    policy: EndPolicy,
    accumulator: f64,
}

impl Playback {
    pub fn new(policy: EndPolicy) -> Self {
        Self {
            playing: false,
            speed: 1.0,
            policy,
            accumulator: 0.0,
        }
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn policy(&self) -> EndPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: EndPolicy) {
        self.policy = policy;
    }

    pub fn play(&mut self) {
        self.playing = true;
        self.accumulator = 0.0;
    }

    /// Pause, dropping any partially accumulated step. Also the entry
    /// point for the scrubber: manual control always pauses playback.
    pub fn pause(&mut self) {
        self.playing = false;
        self.accumulator = 0.0;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Feed elapsed wall-clock seconds and advance the timeline by the
    /// steps that elapsed. Returns true when the cursor reached the end
    /// of the timeline during this call (after the end policy applied).
    pub fn advance(&mut self, dt: f64, timeline: &mut TimelineState) -> bool {
        if !self.playing {
            return false;
        }

        self.accumulator += dt * self.speed as f64;
        let step = timeline.max_time() / STEPS_PER_SWEEP;
        let mut reached_end = false;

        while self.accumulator >= STEP_INTERVAL {
            self.accumulator -= STEP_INTERVAL;
            timeline.increment_time(step);
            if timeline.time() >= timeline.max_time() {
                reached_end = true;
                match self.policy {
                    EndPolicy::Wrap => timeline.set_time(0.0),
                    EndPolicy::Stop => {
                        self.pause();
                        break;
                    }
                }
            }
        }

        reached_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline() -> TimelineState {
        TimelineState::new(180.0, 10.0)
    }

    #[test]
    fn advance_is_inert_while_paused() {
        let mut tl = timeline();
        let mut pb = Playback::new(EndPolicy::Wrap);

        assert!(!pb.advance(10.0, &mut tl));
        assert_eq!(tl.time(), 0.0);
    }

    #[test]
    fn one_interval_advances_one_step() {
        let mut tl = timeline();
        let mut pb = Playback::new(EndPolicy::Wrap);
        pb.play();

        pb.advance(0.1, &mut tl);
        assert!((tl.time() - 1.8).abs() < 1e-9, "one step of max/100: {}", tl.time());
    }

    #[test]
    fn sub_interval_deltas_accumulate() {
        let mut tl = timeline();
        let mut pb = Playback::new(EndPolicy::Wrap);
        pb.play();

        pb.advance(0.04, &mut tl);
        assert_eq!(tl.time(), 0.0);
        pb.advance(0.04, &mut tl);
        assert_eq!(tl.time(), 0.0);
        pb.advance(0.04, &mut tl);
        assert!(tl.time() > 0.0);
    }

    #[test]
    fn speed_scales_the_step_rate() {
        let mut tl = timeline();
        let mut pb = Playback::new(EndPolicy::Wrap);
        pb.play();
        pb.set_speed(2.0);

        pb.advance(0.1, &mut tl);
        assert!((tl.time() - 3.6).abs() < 1e-9, "two steps at 2x: {}", tl.time());
    }

    #[test]
    fn time_never_exceeds_the_bound() {
        let mut tl = timeline();
        let mut pb = Playback::new(EndPolicy::Wrap);
        tl.set_time(179.0);
        pb.play();

        for _ in 0..500 {
            pb.advance(0.1, &mut tl);
            assert!(tl.time() <= tl.max_time());
        }
    }

    #[test]
    fn wrap_policy_loops_and_keeps_playing() {
        let mut tl = timeline();
        let mut pb = Playback::new(EndPolicy::Wrap);
        tl.set_time(179.0);
        pb.play();

        let reached = pb.advance(0.1, &mut tl);
        assert!(reached);
        assert_eq!(tl.time(), 0.0);
        assert!(pb.playing());
    }

    #[test]
    fn stop_policy_pauses_at_the_end() {
        let mut tl = timeline();
        let mut pb = Playback::new(EndPolicy::Stop);
        tl.set_time(179.0);
        pb.play();

        let reached = pb.advance(0.5, &mut tl);
        assert!(reached);
        assert_eq!(tl.time(), tl.max_time());
        assert!(!pb.playing());

        // Further advances are no-ops once paused
        pb.advance(1.0, &mut tl);
        assert_eq!(tl.time(), tl.max_time());
    }

    #[test]
    fn pause_discards_partial_steps() {
        let mut tl = timeline();
        let mut pb = Playback::new(EndPolicy::Wrap);
        pb.play();

        pb.advance(0.09, &mut tl);
        pb.pause();
        pb.play();
        pb.advance(0.09, &mut tl);
        assert_eq!(tl.time(), 0.0, "partial step must not survive a pause");
    }
}
