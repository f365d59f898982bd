//! Game clock - elapsed time, auto-drop counter and tick tickets
//!
//! The host schedules ticks however it likes and passes the current wall time
//! in milliseconds. Each scheduled tick carries the [`TickTicket`] handed out
//! when the clock was (re)started. Pausing, stopping and ending the game bump
//! the ticket generation, so ticks scheduled before that are ignored and two
//! loops can never run at once.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClockState {
    #[default]
    Stopped,
    Running,
    Paused,
    GameOver,
}

/// Proof that a tick was scheduled by the current run of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickTicket(u64);

impl TickTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// What a successful tick did to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockStep {
    pub delta_ms: u64,
    /// The drop counter passed the interval and was reset.
    pub auto_drop: bool,
}

#[derive(Debug, Clone)]
pub struct GameClock {
    state: ClockState,
    generation: u64,
    last_update_ms: u64,
    elapsed_ms: u64,
    drop_counter_ms: u64,
    drop_interval_ms: u32,
}

impl GameClock {
    pub fn new(drop_interval_ms: u32) -> Self {
        Self {
            state: ClockState::Stopped,
            generation: 0,
            last_update_ms: 0,
            elapsed_ms: 0,
            drop_counter_ms: 0,
            drop_interval_ms,
        }
    }

    /// Begin a fresh run anchored at `now_ms`. Elapsed time starts at zero.
    pub fn start(&mut self, now_ms: u64) -> TickTicket {
        self.state = ClockState::Running;
        self.elapsed_ms = 0;
        self.drop_counter_ms = 0;
        self.last_update_ms = now_ms;
        self.bump()
    }

    /// Freeze time. Returns false unless the clock was running.
    pub fn pause(&mut self) -> bool {
        if self.state != ClockState::Running {
            return false;
        }
        self.state = ClockState::Paused;
        self.bump();
        true
    }

    /// Continue a paused run; time spent paused is not counted.
    pub fn resume(&mut self, now_ms: u64) -> Option<TickTicket> {
        if self.state != ClockState::Paused {
            return None;
        }
        self.state = ClockState::Running;
        self.last_update_ms = now_ms;
        Some(self.bump())
    }

    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
        self.bump();
    }

    pub fn finish(&mut self) {
        self.state = ClockState::GameOver;
        self.bump();
    }

    fn bump(&mut self) -> TickTicket {
        self.generation += 1;
        TickTicket(self.generation)
    }

    /// True if `ticket` belongs to the current run and the clock is running.
    pub fn is_current(&self, ticket: TickTicket) -> bool {
        self.state == ClockState::Running && ticket.0 == self.generation
    }

    /// Ticket for the current run, if running.
    pub fn ticket(&self) -> Option<TickTicket> {
        (self.state == ClockState::Running).then_some(TickTicket(self.generation))
    }

    /// Advance to `now_ms`. Stale tickets and non-running clocks do nothing.
    pub fn advance(&mut self, ticket: TickTicket, now_ms: u64) -> Option<ClockStep> {
        if !self.is_current(ticket) {
            return None;
        }
        let delta_ms = now_ms.saturating_sub(self.last_update_ms);
        self.last_update_ms = now_ms;
        self.elapsed_ms += delta_ms;
        self.drop_counter_ms += delta_ms;

        let auto_drop = self.drop_counter_ms > u64::from(self.drop_interval_ms);
        if auto_drop {
            self.drop_counter_ms = 0;
        }
        Some(ClockStep {
            delta_ms,
            auto_drop,
        })
    }

    /// Manual down moves restart the auto-drop countdown.
    pub fn reset_drop_counter(&mut self) {
        self.drop_counter_ms = 0;
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn drop_counter_ms(&self) -> u64 {
        self.drop_counter_ms
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }
}

/// Format elapsed milliseconds as `HH:MM:SS`.
pub fn format_elapsed(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_accumulates_deltas() {
        let mut clock = GameClock::new(1000);
        let t = clock.start(5_000);
        assert_eq!(clock.advance(t, 5_016).map(|s| s.delta_ms), Some(16));
        assert_eq!(clock.advance(t, 5_100).map(|s| s.delta_ms), Some(84));
        assert_eq!(clock.elapsed_ms(), 100);
    }

    #[test]
    fn test_auto_drop_fires_after_interval() {
        let mut clock = GameClock::new(1000);
        let t = clock.start(0);
        assert!(!clock.advance(t, 1000).unwrap().auto_drop);
        let step = clock.advance(t, 1001).unwrap();
        assert!(step.auto_drop);
        assert_eq!(clock.drop_counter_ms(), 0);
    }

    #[test]
    fn test_pause_excludes_paused_time() {
        let mut clock = GameClock::new(1000);
        let t = clock.start(0);
        clock.advance(t, 400);
        assert!(clock.pause());
        assert_eq!(clock.advance(t, 10_000), None);

        let t2 = clock.resume(60_000).unwrap();
        clock.advance(t2, 60_250);
        assert_eq!(clock.elapsed_ms(), 650);
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut clock = GameClock::new(1000);
        let old = clock.start(0);
        clock.pause();
        let fresh = clock.resume(100).unwrap();

        assert_ne!(old, fresh);
        assert_eq!(clock.advance(old, 200), None);
        assert!(clock.advance(fresh, 200).is_some());
        assert_eq!(clock.elapsed_ms(), 100);
    }

    #[test]
    fn test_stop_and_finish_invalidate() {
        let mut clock = GameClock::new(1000);
        let t = clock.start(0);
        clock.stop();
        assert_eq!(clock.state(), ClockState::Stopped);
        assert_eq!(clock.advance(t, 10), None);
        assert_eq!(clock.resume(10), None);

        let t = clock.start(0);
        clock.finish();
        assert_eq!(clock.ticket(), None);
        assert_eq!(clock.advance(t, 10), None);
        assert!(!clock.pause());
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00:00");
        assert_eq!(format_elapsed(59_999), "00:00:59");
        assert_eq!(format_elapsed(61_000), "00:01:01");
        assert_eq!(format_elapsed(3_723_000), "01:02:03");
    }
}
