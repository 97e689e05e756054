pub mod celebration;
pub mod sounds;

pub use celebration::*;
pub use sounds::*;

use crate::domain::TaskEvent;
use std::time::Instant;

/// Consumes task events and turns them into sounds and on-screen celebrations.
pub struct EffectsEngine {
    sounds: SoundBoard,
    celebrations: Celebrations,
    celebrations_enabled: bool,
}

impl EffectsEngine {
    pub fn new(sounds: SoundBoard, celebrations: Celebrations, celebrations_enabled: bool) -> Self {
        Self {
            sounds,
            celebrations,
            celebrations_enabled,
        }
    }

    pub fn handle(&mut self, event: &TaskEvent, now: Instant) {
        if let Some(cue) = cue_for(event) {
            self.sounds.play(cue);
        }

        if !self.celebrations_enabled {
            return;
        }
        match event {
            TaskEvent::Completed(_) => {
                if !self.celebrations.trigger_full(now) {
                    tracing::debug!("Celebration already running, skipping");
                }
            }
            TaskEvent::ClearedCompleted { count } if *count > 0 => self.celebrations.fireworks(now),
            _ => {}
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.celebrations.prune(now);
    }

    pub fn toggle_sounds(&mut self) -> bool {
        self.sounds.toggle()
    }

    pub fn sounds_enabled(&self) -> bool {
        self.sounds.is_enabled()
    }

    pub fn is_animating(&self) -> bool {
        !self.celebrations.is_idle()
    }

    pub fn overlay(&self, now: Instant) -> CelebrationOverlay<'_> {
        self.celebrations.overlay(now)
    }
}

fn cue_for(event: &TaskEvent) -> Option<SoundCue> {
    match event {
        TaskEvent::Created(_) => Some(SoundCue::Create),
        TaskEvent::Completed(_) => Some(SoundCue::Complete),
        TaskEvent::Deleted(_) => Some(SoundCue::Delete),
        TaskEvent::ClearedCompleted { count: 0 } => None,
        TaskEvent::ClearedCompleted { .. } => Some(SoundCue::Celebrate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Task, TaskId};
    use std::sync::Arc;

    fn muted_engine(celebrations_enabled: bool) -> EffectsEngine {
        EffectsEngine::new(
            SoundBoard::new(Arc::new(TerminalBell), false),
            Celebrations::with_seed(42),
            celebrations_enabled,
        )
    }

    #[test]
    fn test_cue_mapping() {
        let task = Task::new("1", "a", true);
        assert_eq!(cue_for(&TaskEvent::Created(task.clone())), Some(SoundCue::Create));
        assert_eq!(cue_for(&TaskEvent::Completed(task)), Some(SoundCue::Complete));
        assert_eq!(cue_for(&TaskEvent::Deleted(TaskId::from("1"))), Some(SoundCue::Delete));
        assert_eq!(cue_for(&TaskEvent::ClearedCompleted { count: 3 }), Some(SoundCue::Celebrate));
        assert_eq!(cue_for(&TaskEvent::ClearedCompleted { count: 0 }), None);
    }

    #[test]
    fn test_completion_celebrates_and_expires() {
        let now = Instant::now();
        let mut engine = muted_engine(true);

        engine.handle(&TaskEvent::Created(Task::new("1", "a", false)), now);
        assert!(!engine.is_animating());

        engine.handle(&TaskEvent::Completed(Task::new("1", "a", true)), now);
        assert!(engine.is_animating());

        engine.tick(now + std::time::Duration::from_secs(4));
        assert!(!engine.is_animating());
    }

    #[test]
    fn test_disabled_celebrations_stay_idle() {
        let now = Instant::now();
        let mut engine = muted_engine(false);

        engine.handle(&TaskEvent::Completed(Task::new("1", "a", true)), now);
        engine.handle(&TaskEvent::ClearedCompleted { count: 2 }, now);
        assert!(!engine.is_animating());
    }

    #[test]
    fn test_toggle_sounds() {
        let mut engine = muted_engine(true);
        assert!(!engine.sounds_enabled());
        assert!(engine.toggle_sounds());
        assert!(engine.sounds_enabled());
    }
}
