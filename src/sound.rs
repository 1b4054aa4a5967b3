use bevy_ecs::system::Resource;
use log::trace;

// Sound cues the simulation asks an external player to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Lock,
    HardDrop,
    RowClear,
    FourRowClear,
    LevelUp,
    Hold,
    GameOver,
}

// Queue of sound cues raised during a frame. The frame driver drains it.
#[derive(Resource, Debug, Clone)]
pub struct AudioState {
    queue: Vec<SoundCue>,
    sound_enabled: bool,
}

impl Default for AudioState {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioState {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            sound_enabled: true,
        }
    }

    pub fn play_sound(&mut self, cue: SoundCue) -> bool {
        if self.sound_enabled {
            trace!("Sound cue {cue:?}");
            self.queue.push(cue);
            true
        } else {
            false
        }
    }

    pub fn is_sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
        if !enabled {
            self.queue.clear();
        }
    }

    pub fn drain(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.queue)
    }

    pub fn pending(&self) -> &[SoundCue] {
        &self.queue
    }
}
