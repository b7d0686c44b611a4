//! The rank table: the ordered list of planet sizes.
//!
//! Ranks are pure data.  Index order is the merge order; the highest index is
//! terminal and never merges further.  The table length is whatever
//! `assets/game.toml` supplies (eight ranks by default), so nothing else in the
//! crate hard-codes a rank count.

use crate::constants::DEFAULT_RANKS;
use crate::error::{FusionError, FusionResult};
use bevy::prelude::*;
use serde::Deserialize;

/// One rank entry as written in configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RankSpec {
    pub name: String,
    pub radius: f32,
    pub score: u64,
    /// sRGB colour, each channel in `[0, 1]`.
    pub color: [f32; 3],
}

/// Default rank specs built from [`DEFAULT_RANKS`].
pub fn default_rank_specs() -> Vec<RankSpec> {
    DEFAULT_RANKS
        .iter()
        .map(|(name, radius, score, color)| RankSpec {
            name: (*name).to_string(),
            radius: *radius,
            score: *score,
            color: *color,
        })
        .collect()
}

/// Immutable rank record.
#[derive(Debug, Clone, PartialEq)]
pub struct Rank {
    pub index: usize,
    pub name: String,
    pub radius: f32,
    /// Points awarded when a merge produces this rank.
    pub score: u64,
    pub color: Color,
    /// The last rank; collisions between terminal planets are ignored.
    pub terminal: bool,
}

/// Ordered rank table shared by every system that needs radius, score or colour.
#[derive(Resource, Debug, Clone)]
pub struct RankTable {
    ranks: Vec<Rank>,
}

impl Default for RankTable {
    fn default() -> Self {
        let ranks = default_rank_specs()
            .iter()
            .enumerate()
            .map(|(index, spec)| build_rank(index, spec, DEFAULT_RANKS.len()))
            .collect();
        Self { ranks }
    }
}

fn build_rank(index: usize, spec: &RankSpec, len: usize) -> Rank {
    let [r, g, b] = spec.color;
    Rank {
        index,
        name: spec.name.clone(),
        radius: spec.radius,
        score: spec.score,
        color: Color::srgb(r, g, b),
        terminal: index + 1 == len,
    }
}

impl RankTable {
    /// Build a table from configuration, rejecting empty tables, non-positive
    /// radii and radii that do not strictly increase.
    pub fn from_specs(specs: &[RankSpec]) -> FusionResult<Self> {
        if specs.is_empty() {
            return Err(FusionError::EmptyRankTable);
        }
        for (index, spec) in specs.iter().enumerate() {
            crate::error::validate_positive("rank radius", spec.radius)?;
            if index > 0 && spec.radius <= specs[index - 1].radius {
                return Err(FusionError::RankOrder { rank: index });
            }
        }
        let ranks = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| build_rank(index, spec, specs.len()))
            .collect();
        Ok(Self { ranks })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Look up a rank, failing for indices outside the table.
    pub fn get(&self, rank: usize) -> FusionResult<&Rank> {
        self.ranks.get(rank).ok_or(FusionError::RankOutOfRange {
            rank,
            len: self.ranks.len(),
        })
    }

    /// Index of the terminal rank.
    #[inline]
    pub fn terminal_index(&self) -> usize {
        self.ranks.len().saturating_sub(1)
    }

    #[inline]
    pub fn is_terminal(&self, rank: usize) -> bool {
        rank >= self.terminal_index()
    }

    /// The rank a merge of two `rank` planets produces, or `None` for terminal.
    pub fn next(&self, rank: usize) -> Option<usize> {
        (rank < self.terminal_index()).then_some(rank + 1)
    }

    /// Collider density for a rank: proportional to `rank + 1`.
    #[inline]
    pub fn density(&self, rank: usize, density_scale: f32) -> f32 {
        density_scale * (rank as f32 + 1.0)
    }

    /// Mass of a planet of this rank, matching what the physics engine derives
    /// from [`RankTable::density`] and a ball collider.
    ///
    /// Returns 0.0 for out-of-range ranks.
    pub fn mass(&self, rank: usize, density_scale: f32) -> f32 {
        self.ranks.get(rank).map_or(0.0, |r| {
            self.density(rank, density_scale) * std::f32::consts::PI * r.radius * r.radius
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rank> {
        self.ranks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, radius: f32) -> RankSpec {
        RankSpec {
            name: name.into(),
            radius,
            score: 1,
            color: [1.0, 1.0, 1.0],
        }
    }

    #[test]
    fn default_table_has_single_terminal_rank() {
        let table = RankTable::default();
        assert_eq!(table.len(), 8);
        let terminals: Vec<_> = table.iter().filter(|r| r.terminal).collect();
        assert_eq!(terminals.len(), 1);
        assert_eq!(terminals[0].index, 7);
        assert_eq!(table.get(1).map(|r| r.score).ok(), Some(30));
    }

    #[test]
    fn next_rank_stops_at_terminal() {
        let table = RankTable::default();
        assert_eq!(table.next(0), Some(1));
        assert_eq!(table.next(6), Some(7));
        assert_eq!(table.next(7), None);
    }

    #[test]
    fn rank_count_is_configurable() {
        let table = RankTable::from_specs(&[spec("a", 5.0), spec("b", 9.0), spec("c", 12.0)])
            .expect("valid table");
        assert_eq!(table.len(), 3);
        assert!(table.is_terminal(2));
        assert!(!table.is_terminal(1));
        assert_eq!(table.next(2), None);
    }

    #[test]
    fn invalid_tables_are_rejected() {
        assert!(matches!(
            RankTable::from_specs(&[]),
            Err(FusionError::EmptyRankTable)
        ));
        assert!(matches!(
            RankTable::from_specs(&[spec("a", 10.0), spec("b", 10.0)]),
            Err(FusionError::RankOrder { rank: 1 })
        ));
        assert!(RankTable::from_specs(&[spec("a", -1.0)]).is_err());
    }

    #[test]
    fn out_of_range_lookup_is_an_error() {
        let table = RankTable::default();
        assert!(matches!(
            table.get(8),
            Err(FusionError::RankOutOfRange { rank: 8, len: 8 })
        ));
        assert_eq!(table.mass(42, 1.0), 0.0);
    }

    #[test]
    fn mass_grows_with_rank() {
        let table = RankTable::default();
        let masses: Vec<f32> = (0..table.len()).map(|r| table.mass(r, 1.0)).collect();
        assert!(masses.windows(2).all(|w| w[1] > w[0]));
    }
}
