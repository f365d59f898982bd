//! Audio notifier interface
//!
//! The engine never loads or plays sounds itself. It emits [`SoundCue`]s and
//! toggles the background loop through an [`AudioNotifier`] supplied by the
//! host. [`Silent`] drops everything; [`Recorder`] keeps a shared log that
//! tests and headless hosts can inspect.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::types::LINE_CLEAR_CUES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Move,
    Rotate,
    SpeedDown,
    Collision,
    /// Line clear cue index: 0 for one line up to 4 for five or more.
    LineClear(u8),
    BonusStart,
    BonusEnd,
    GameOver,
}

/// Cue for clearing `line_count` rows at once, if any were cleared.
pub fn line_clear_cue(line_count: usize) -> Option<SoundCue> {
    if line_count == 0 {
        return None;
    }
    let idx = line_count.min(LINE_CLEAR_CUES) - 1;
    Some(SoundCue::LineClear(idx as u8))
}

pub trait AudioNotifier {
    fn play(&mut self, cue: SoundCue);
    fn start_background_loop(&mut self);
    fn pause_background_loop(&mut self);
}

/// Discards every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl AudioNotifier for Silent {
    fn play(&mut self, _cue: SoundCue) {}
    fn start_background_loop(&mut self) {}
    fn pause_background_loop(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioEvent {
    Cue(SoundCue),
    BackgroundStarted,
    BackgroundPaused,
}

/// Records every notification into a log shared by all clones.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    log: Rc<RefCell<Vec<AudioEvent>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AudioEvent> {
        self.log.borrow().clone()
    }

    /// Played cues only, in order.
    pub fn cues(&self) -> Vec<SoundCue> {
        self.log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                AudioEvent::Cue(cue) => Some(*cue),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, cue: SoundCue) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|e| **e == AudioEvent::Cue(cue))
            .count()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl AudioNotifier for Recorder {
    fn play(&mut self, cue: SoundCue) {
        self.log.borrow_mut().push(AudioEvent::Cue(cue));
    }

    fn start_background_loop(&mut self) {
        self.log.borrow_mut().push(AudioEvent::BackgroundStarted);
    }

    fn pause_background_loop(&mut self) {
        self.log.borrow_mut().push(AudioEvent::BackgroundPaused);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_cue_index() {
        assert_eq!(line_clear_cue(0), None);
        assert_eq!(line_clear_cue(1), Some(SoundCue::LineClear(0)));
        assert_eq!(line_clear_cue(4), Some(SoundCue::LineClear(3)));
        assert_eq!(line_clear_cue(5), Some(SoundCue::LineClear(4)));
        assert_eq!(line_clear_cue(9), Some(SoundCue::LineClear(4)));
    }

    #[test]
    fn test_recorder_clones_share_log() {
        let recorder = Recorder::new();
        let mut handle = recorder.clone();
        handle.play(SoundCue::Move);
        handle.start_background_loop();
        handle.play(SoundCue::Move);

        assert_eq!(recorder.count(SoundCue::Move), 2);
        assert_eq!(recorder.cues(), vec![SoundCue::Move, SoundCue::Move]);
        assert_eq!(recorder.events()[1], AudioEvent::BackgroundStarted);

        recorder.clear();
        assert!(handle.events().is_empty());
    }
}
