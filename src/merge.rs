//! Two-phase merge pipeline: detection, then resolution.
//!
//! ## Systems
//!
//! | System                    | Schedule                          | Purpose                                   |
//! |---------------------------|-----------------------------------|-------------------------------------------|
//! | `merge_detection_system`  | `PostUpdate` / `FusionSet::Detect`  | Turn `CollisionEvent::Started` into queued candidates |
//! | `merge_resolution_system` | `PostUpdate` / `FusionSet::Resolve` | Drain the queue, despawn pairs, spawn next ranks |
//!
//! Detection never touches the world or the registry; it only appends to
//! [`MergeQueue`].  Both systems run after Rapier's writeback, so by the time
//! resolution despawns anything the physics step has fully returned.
//!
//! Collision events for one pair can arrive more than once per step, and one
//! planet can touch several equal-rank neighbours at once.  Resolution keeps a
//! per-frame consumed set so each planet merges at most once; later candidates
//! that reference a consumed or unregistered planet are dropped as stale.

use std::collections::HashSet;

use crate::config::GameConfig;
use crate::error::FusionError;
use crate::events::{PlanetsMerged, SoundCue, TerminalRankReached};
use crate::planet::spawn_planet;
use crate::rank::RankTable;
use crate::registry::BodyRegistry;
use crate::session::Score;
use bevy::prelude::*;
use bevy_rapier2d::prelude::CollisionEvent;

/// A proposed merge between two planets of equal, non-terminal `rank`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeCandidate {
    pub a: Entity,
    pub b: Entity,
    pub rank: usize,
}

/// Candidates collected this frame, in arrival order.
#[derive(Resource, Debug, Default)]
pub struct MergeQueue {
    candidates: Vec<MergeCandidate>,
}

impl MergeQueue {
    pub fn push(&mut self, candidate: MergeCandidate) {
        self.candidates.push(candidate);
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, MergeCandidate> {
        self.candidates.drain(..)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
    }
}

/// Number of merges accepted by the most recent resolution pass.
///
/// Overwritten every frame; the combo tracker reads it right after resolution.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeTally {
    pub accepted: u32,
}

/// Decide whether a collision between `a` and `b` is a merge candidate.
///
/// Both must be registered, of equal rank, and not terminal.
pub fn candidate_for(
    registry: &BodyRegistry,
    ranks: &RankTable,
    a: Entity,
    b: Entity,
) -> Option<MergeCandidate> {
    if a == b {
        return None;
    }
    let rank_a = registry.rank_of(a)?;
    let rank_b = registry.rank_of(b)?;
    (rank_a == rank_b && !ranks.is_terminal(rank_a)).then_some(MergeCandidate {
        a,
        b,
        rank: rank_a,
    })
}

/// Filter queued candidates down to the merges that actually happen.
///
/// Walks candidates in order and accepts one only if both planets are still
/// registered at the proposed rank and neither was consumed by an earlier
/// accepted candidate this frame.
pub fn accept_candidates(
    candidates: impl IntoIterator<Item = MergeCandidate>,
    registry: &BodyRegistry,
) -> Vec<MergeCandidate> {
    let mut consumed: HashSet<Entity> = HashSet::new();
    let mut accepted = Vec::new();

    for c in candidates {
        if consumed.contains(&c.a) || consumed.contains(&c.b) {
            continue;
        }
        if registry.rank_of(c.a) != Some(c.rank) || registry.rank_of(c.b) != Some(c.rank) {
            continue;
        }
        consumed.insert(c.a);
        consumed.insert(c.b);
        accepted.push(c);
    }

    accepted
}

/// Queue a candidate for every started collision between equal-rank planets.
pub fn merge_detection_system(
    mut collisions: MessageReader<CollisionEvent>,
    registry: Res<BodyRegistry>,
    ranks: Res<RankTable>,
    mut queue: ResMut<MergeQueue>,
) {
    for event in collisions.read() {
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };
        if let Some(candidate) = candidate_for(&registry, &ranks, *a, *b) {
            queue.push(candidate);
        }
    }
}

/// Resolve this frame's candidates.
///
/// Each accepted pair is despawned and unregistered, and a planet of the next
/// rank is spawned at rest at their midpoint.  Score grows by the new rank's
/// value.  A registered planet without a `Transform` means the registry no
/// longer matches the world; that is returned as an error rather than skipped.
#[allow(clippy::too_many_arguments)]
pub fn merge_resolution_system(
    mut commands: Commands,
    mut queue: ResMut<MergeQueue>,
    mut registry: ResMut<BodyRegistry>,
    ranks: Res<RankTable>,
    config: Res<GameConfig>,
    transforms: Query<&Transform>,
    mut score: ResMut<Score>,
    mut tally: ResMut<MergeTally>,
    mut merged: MessageWriter<PlanetsMerged>,
    mut terminal: MessageWriter<TerminalRankReached>,
    mut cues: MessageWriter<SoundCue>,
) -> Result {
    let accepted = accept_candidates(queue.drain(), &registry);
    tally.accepted = 0;

    for c in accepted {
        let Some(next) = ranks.next(c.rank) else {
            continue;
        };
        let lookup = |e: Entity| {
            transforms
                .get(e)
                .map(|t| t.translation.truncate())
                .map_err(|_| FusionError::EntityNotFound {
                    context: "merge resolution",
                })
        };
        let midpoint = (lookup(c.a)? + lookup(c.b)?) * 0.5;

        registry.unregister(c.a);
        registry.unregister(c.b);
        commands.entity(c.a).despawn();
        commands.entity(c.b).despawn();

        spawn_planet(&mut commands, &mut registry, &ranks, &config, next, midpoint)?;

        let produced = ranks.get(next)?;
        score.add(produced.score);

        merged.write(PlanetsMerged {
            rank: next,
            position: midpoint,
            points: produced.score,
        });
        cues.write(SoundCue::Merge(next));
        debug!("Merged rank {} pair into {}", c.rank, produced.name);

        tally.accepted += 1;

        if produced.terminal {
            terminal.write(TerminalRankReached { position: midpoint });
            cues.write(SoundCue::TerminalRank);
            info!("Terminal rank {} reached", produced.name);
        }
    }

    Ok(())
}
