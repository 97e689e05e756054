use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
}

/// One scheduled note of a cue. Times are seconds from the cue start.
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub frequency: f32,
    /// Exponential frequency ramps as (seconds into the tone, target Hz)
    pub sweep: Vec<(f32, f32)>,
    pub start: f32,
    pub duration: f32,
    /// Linear attack time before the exponential decay to silence
    pub attack: f32,
    pub peak_gain: f32,
}

impl Tone {
    fn note(waveform: Waveform, frequency: f32, start: f32, duration: f32, attack: f32, peak_gain: f32) -> Self {
        Self {
            waveform,
            frequency,
            sweep: Vec::new(),
            start,
            duration,
            attack,
            peak_gain,
        }
    }

    fn sweeping(mut self, sweep: &[(f32, f32)]) -> Self {
        self.sweep = sweep.to_vec();
        self
    }

    pub fn end(&self) -> f32 {
        self.start + self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Create,
    Complete,
    Delete,
    Celebrate,
}

impl SoundCue {
    pub fn tones(&self) -> Vec<Tone> {
        match self {
            // rising blip
            SoundCue::Create => vec![Tone::note(Waveform::Sine, 800.0, 0.0, 0.3, 0.05, 0.3)
                .sweeping(&[(0.1, 1200.0), (0.3, 1000.0)])],
            // C5 E5 G5 C6 arpeggio
            SoundCue::Complete => [523.25, 659.25, 783.99, 1046.5]
                .iter()
                .enumerate()
                .map(|(i, &freq)| Tone::note(Waveform::Sine, freq, i as f32 * 0.1, 0.4, 0.02, 0.2))
                .collect(),
            SoundCue::Delete => vec![Tone::note(Waveform::Square, 400.0, 0.0, 0.4, 0.02, 0.2)
                .sweeping(&[(0.4, 200.0)])],
            // C5 E5 G5 C6 E6 fanfare
            SoundCue::Celebrate => [
                (523.25, 0.0),
                (659.25, 0.15),
                (783.99, 0.3),
                (1046.5, 0.45),
                (1318.5, 0.6),
            ]
            .iter()
            .map(|&(freq, start)| Tone::note(Waveform::Triangle, freq, start, 0.3, 0.05, 0.3))
            .collect(),
        }
    }

    pub fn duration(&self) -> f32 {
        self.tones().iter().map(Tone::end).fold(0.0, f32::max)
    }
}

/// Renders a single tone. Called at the tone's onset.
pub trait TonePlayer: Send + Sync {
    fn play(&self, tone: &Tone);
}

/// A terminal can't synthesize tones; it rings the bell at each onset.
pub struct TerminalBell;

impl TonePlayer for TerminalBell {
    fn play(&self, tone: &Tone) {
        tracing::trace!("Bell for {:?} {} Hz", tone.waveform, tone.frequency);
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
            tracing::debug!("Bell failed: {}", e);
        }
    }
}

pub struct SoundBoard {
    player: Arc<dyn TonePlayer>,
    enabled: bool,
}

impl SoundBoard {
    pub fn new(player: Arc<dyn TonePlayer>, enabled: bool) -> Self {
        Self { player, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Schedule a cue in the background. Returns `None` when muted.
    pub fn play(&self, cue: SoundCue) -> Option<JoinHandle<()>> {
        if !self.enabled {
            return None;
        }

        tracing::debug!("Playing {:?} ({:.2}s)", cue, cue.duration());
        let player = self.player.clone();
        let tones = cue.tones();
        Some(tokio::spawn(async move {
            let started = Instant::now();
            for tone in tones {
                tokio::time::sleep_until(started + Duration::from_secs_f32(tone.start)).await;
                player.play(&tone);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPlayer {
        played: Mutex<Vec<f32>>,
    }

    impl TonePlayer for RecordingPlayer {
        fn play(&self, tone: &Tone) {
            self.played.lock().unwrap().push(tone.frequency);
        }
    }

    #[test]
    fn test_cue_schedules() {
        let create = SoundCue::Create.tones();
        assert_eq!(create.len(), 1);
        assert_eq!(create[0].frequency, 800.0);
        assert_eq!(create[0].sweep, vec![(0.1, 1200.0), (0.3, 1000.0)]);

        let complete = SoundCue::Complete.tones();
        let starts: Vec<f32> = complete.iter().map(|t| t.start).collect();
        assert_eq!(starts.len(), 4);
        assert!((starts[3] - 0.3).abs() < 1e-6);
        assert!(complete.iter().all(|t| t.waveform == Waveform::Sine && t.duration == 0.4));

        let delete = SoundCue::Delete.tones();
        assert_eq!(delete[0].waveform, Waveform::Square);
        assert_eq!(delete[0].sweep.last(), Some(&(0.4, 200.0)));

        let fanfare = SoundCue::Celebrate.tones();
        assert_eq!(fanfare.len(), 5);
        assert_eq!(fanfare[4].frequency, 1318.5);
        assert!((SoundCue::Celebrate.duration() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_toggle_and_muted_board_schedules_nothing() {
        let mut board = SoundBoard::new(Arc::new(RecordingPlayer::default()), true);
        assert!(!board.toggle());
        assert!(board.play(SoundCue::Create).is_none());
        assert!(board.toggle());
    }

    #[tokio::test]
    async fn test_play_hits_every_tone_in_order() {
        let player = Arc::new(RecordingPlayer::default());
        let board = SoundBoard::new(player.clone(), true);

        board.play(SoundCue::Complete).unwrap().await.unwrap();
        assert_eq!(
            *player.played.lock().unwrap(),
            vec![523.25, 659.25, 783.99, 1046.5]
        );
    }
}
