//! Combo tracking: a rolling window of merge-active frames.
//!
//! Each frame with at least one accepted merge extends the combo by one step
//! and refills the window.  From the second step on, a bonus of
//! `count * combo_bonus_per_step` is added to the score.  The window drains by
//! one every frame; when it empties the combo resets.

use crate::config::GameConfig;
use crate::events::{ComboAwarded, SoundCue};
use crate::merge::MergeTally;
use crate::session::Score;
use bevy::prelude::*;

/// Current combo streak.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ComboTracker {
    /// Consecutive merge-active frames inside the window.
    pub count: u32,
    /// Frames left before the combo resets.
    pub timer: u32,
}

impl ComboTracker {
    /// Advance by one frame.  Returns the bonus earned this frame, if any.
    pub fn record_tick(&mut self, merged: bool, window: u32, bonus_per_step: u64) -> Option<u64> {
        let mut bonus = None;

        if merged {
            self.count += 1;
            self.timer = window;
            if self.count > 1 {
                bonus = Some(u64::from(self.count) * bonus_per_step);
            }
        }

        if self.timer > 0 {
            self.timer -= 1;
            if self.timer == 0 {
                self.count = 0;
            }
        }

        bonus
    }

    /// Whether the combo counter is worth displaying.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.count > 1
    }
}

/// Update the combo from this frame's merge tally and pay out bonuses.
pub fn combo_tracker_system(
    tally: Res<MergeTally>,
    config: Res<GameConfig>,
    mut combo: ResMut<ComboTracker>,
    mut score: ResMut<Score>,
    mut awarded: MessageWriter<ComboAwarded>,
    mut cues: MessageWriter<SoundCue>,
) {
    let merged = tally.accepted > 0;
    if let Some(bonus) =
        combo.record_tick(merged, config.combo_window_ticks, config.combo_bonus_per_step)
    {
        score.add(bonus);
        awarded.write(ComboAwarded {
            count: combo.count,
            bonus,
        });
        cues.write(SoundCue::Combo(combo.count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_merge_starts_combo_without_bonus() {
        let mut c = ComboTracker::default();
        assert_eq!(c.record_tick(true, 60, 50), None);
        assert_eq!(c.count, 1);
        assert_eq!(c.timer, 59);
    }

    #[test]
    fn four_consecutive_merge_frames_pay_two_hundred() {
        let mut c = ComboTracker::default();
        let bonuses: Vec<_> = (0..4).map(|_| c.record_tick(true, 60, 50)).collect();
        assert_eq!(bonuses, vec![None, Some(100), Some(150), Some(200)]);
        assert_eq!(c.count, 4);
    }

    #[test]
    fn merge_refills_window_regardless_of_remaining_time() {
        let mut c = ComboTracker::default();
        c.record_tick(true, 60, 50);
        for _ in 0..30 {
            c.record_tick(false, 60, 50);
        }
        assert_eq!(c.timer, 29);
        c.record_tick(true, 60, 50);
        assert_eq!(c.timer, 59);
        assert_eq!(c.count, 2);
    }

    #[test]
    fn combo_resets_exactly_when_window_empties() {
        let mut c = ComboTracker::default();
        c.record_tick(true, 60, 50);
        c.record_tick(true, 60, 50);
        for _ in 0..58 {
            c.record_tick(false, 60, 50);
        }
        assert_eq!(c.timer, 1);
        assert_eq!(c.count, 2);

        c.record_tick(false, 60, 50);
        assert_eq!(c.timer, 0);
        assert_eq!(c.count, 0);
    }

    #[test]
    fn idle_tracker_stays_idle() {
        let mut c = ComboTracker::default();
        for _ in 0..10 {
            assert_eq!(c.record_tick(false, 60, 50), None);
        }
        assert_eq!(c, ComboTracker::default());
    }
}
