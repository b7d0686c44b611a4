//! Synthesised sound cues.
//!
//! Every [`SoundCue`] maps to a short recipe of sine tones played through
//! Bevy's [`Pitch`] audio source; no sound files are shipped.  Notes with a
//! start delay wait in [`ToneSchedule`] until their due time.
//!
//! | System                 | Schedule | Purpose                                  |
//! |------------------------|----------|------------------------------------------|
//! | `schedule_cue_system`  | Update   | Expand incoming cues into timed tones    |
//! | `play_due_tones_system`| Update   | Spawn `AudioPlayer`s for tones now due   |

use std::time::Duration;

use crate::constants::CUE_VOLUME;
use crate::events::SoundCue;
use bevy::audio::{Pitch, PlaybackSettings, Volume};
use bevy::prelude::*;

/// One tone in a cue recipe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub duration: Duration,
    /// Offset from the cue's arrival.
    pub delay: Duration,
    /// Linear gain relative to [`CUE_VOLUME`].
    pub gain: f32,
}

impl Tone {
    fn now(frequency: f32, millis: u64, gain: f32) -> Self {
        Self {
            frequency,
            duration: Duration::from_millis(millis),
            delay: Duration::ZERO,
            gain,
        }
    }

    fn after(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }
}

/// Tone recipe for a cue.
pub fn tones_for(cue: SoundCue) -> Vec<Tone> {
    match cue {
        SoundCue::Drop => vec![Tone::now(200.0, 150, 0.6)],
        SoundCue::Merge(rank) => {
            let base = 300.0 + 80.0 * rank as f32;
            vec![Tone::now(base, 250, 0.8), Tone::now(base * 2.0, 200, 0.3)]
        }
        SoundCue::Combo(count) => {
            let base = 400.0 + 50.0 * count as f32;
            (0..3u64)
                .map(|i| Tone::now(base * (1.0 + 0.25 * i as f32), 150, 0.5).after(i * 60))
                .collect()
        }
        SoundCue::TerminalRank => vec![Tone::now(100.0, 1000, 1.0), Tone::now(800.0, 800, 0.3)],
        SoundCue::GameOver => [400.0, 350.0, 300.0, 200.0]
            .iter()
            .enumerate()
            .map(|(i, f)| Tone::now(*f, 300, 0.6).after(i as u64 * 200))
            .collect(),
        SoundCue::UiClick => vec![Tone::now(600.0, 80, 0.4)],
    }
}

/// Tones waiting for their start time, keyed by `Time<Real>::elapsed()`.
#[derive(Resource, Debug, Default)]
pub struct ToneSchedule {
    pending: Vec<(Duration, Tone)>,
}

impl ToneSchedule {
    pub fn push(&mut self, now: Duration, tone: Tone) {
        self.pending.push((now + tone.delay, tone));
    }

    /// Remove and return every tone due at or before `now`.
    pub fn take_due(&mut self, now: Duration) -> Vec<Tone> {
        let mut due = Vec::new();
        self.pending.retain(|(at, tone)| {
            if *at <= now {
                due.push(*tone);
                false
            } else {
                true
            }
        });
        due
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

pub struct CueAudioPlugin;

impl Plugin for CueAudioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ToneSchedule>().add_systems(
            Update,
            (schedule_cue_system, play_due_tones_system).chain(),
        );
    }
}

pub fn schedule_cue_system(
    time: Res<Time<Real>>,
    mut cues: MessageReader<SoundCue>,
    mut schedule: ResMut<ToneSchedule>,
) {
    let now = time.elapsed();
    for cue in cues.read() {
        for tone in tones_for(*cue) {
            schedule.push(now, tone);
        }
    }
}

pub fn play_due_tones_system(
    mut commands: Commands,
    time: Res<Time<Real>>,
    mut schedule: ResMut<ToneSchedule>,
    mut pitches: ResMut<Assets<Pitch>>,
) {
    for tone in schedule.take_due(time.elapsed()) {
        commands.spawn((
            AudioPlayer(pitches.add(Pitch::new(tone.frequency, tone.duration))),
            PlaybackSettings::DESPAWN.with_volume(Volume::Linear(CUE_VOLUME * tone.gain)),
        ));
    }
}
