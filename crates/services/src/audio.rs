use tracing::{debug, trace};

use crate::core::{AudioNotifier, SoundCue};

/// Logs cues instead of playing them. Useful in terminals without sound.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAudio {
    background: bool,
}

impl TracingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background_playing(&self) -> bool {
        self.background
    }
}

impl AudioNotifier for TracingAudio {
    fn play(&mut self, cue: SoundCue) {
        match cue {
            SoundCue::Move | SoundCue::Rotate => trace!(?cue, "sound"),
            _ => debug!(?cue, "sound"),
        }
    }

    fn start_background_loop(&mut self) {
        if !self.background {
            self.background = true;
            debug!("background music started");
        }
    }

    fn pause_background_loop(&mut self) {
        if self.background {
            self.background = false;
            debug!("background music paused");
        }
    }
}
