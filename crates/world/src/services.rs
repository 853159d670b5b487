//! Services injected into the simulation instead of process-wide singletons.

use std::cell::RefCell;
use std::rc::Rc;

/// Surface material, selects the hit/break sound variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Material {
    /// Trees, wooden buildings
    Wood,
    /// Rock and coal
    Stone,
    /// Ores and buildings
    Metal,
    /// Bushes, animals, enemies
    Organic,
}

/// Sound the simulation asks the host to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Item picked up or bed used
    Pickup,
    /// Tool hit on a target
    Mine(Material),
    /// Target destroyed
    Break(Material),
    /// Firearm discharged
    Shoot,
    /// Player took damage
    Hit,
    /// Food eaten
    Eat,
    /// Bomb detonated
    Explosion,
    /// Magazine or shell loaded
    Reload,
    /// Building placed
    Place,
}

/// Audio backend seam.
pub trait SoundSink {
    /// Queue a cue for playback.
    fn play(&mut self, cue: SoundCue);
}

/// Headless sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSound;

impl SoundSink for NullSound {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Sink that records cues; clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct SoundLog {
    cues: Rc<RefCell<Vec<SoundCue>>>,
}

impl SoundLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues recorded so far.
    pub fn cues(&self) -> Vec<SoundCue> {
        self.cues.borrow().clone()
    }

    /// Number of times `cue` was played.
    pub fn count(&self, cue: SoundCue) -> usize {
        self.cues.borrow().iter().filter(|c| **c == cue).count()
    }
}

impl SoundSink for SoundLog {
    fn play(&mut self, cue: SoundCue) {
        self.cues.borrow_mut().push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_clones_share_storage() {
        let log = SoundLog::new();
        let mut sink: Box<dyn SoundSink> = Box::new(log.clone());
        sink.play(SoundCue::Shoot);
        sink.play(SoundCue::Mine(Material::Wood));
        sink.play(SoundCue::Shoot);
        assert_eq!(log.count(SoundCue::Shoot), 2);
        assert_eq!(log.cues().len(), 3);
    }
}
