//! Centralised gameplay and physics constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place.  [`crate::config::GameConfig::default`] is built
//! from these values; `assets/game.toml` can override any of them at startup.
//!
//! ## Coordinate frame
//!
//! World space is y-up with the origin at the centre of the well floor.
//! The well spans `x ∈ [-WELL_WIDTH/2, WELL_WIDTH/2]` and `y ∈ [0, WELL_HEIGHT]`.
//! Camera framing in [`crate::graphics`] centres on the middle of the well.

// ── Well Geometry ─────────────────────────────────────────────────────────────

/// Interior width of the well (world units).
pub const WELL_WIDTH: f32 = 380.0;

/// Interior height of the well (world units), floor to top opening.
pub const WELL_HEIGHT: f32 = 650.0;

/// Distance from the top of the well down to the limit line.
///
/// A settled planet whose top edge pokes above `WELL_HEIGHT - LIMIT_LINE_OFFSET`
/// accumulates danger.  Larger values leave less stacking room.
pub const LIMIT_LINE_OFFSET: f32 = 90.0;

/// Height above the limit line at which dropped planets appear.
pub const SPAWN_ABOVE_LIMIT: f32 = 45.0;

/// Thickness of the static floor and side-wall colliders.
pub const WALL_THICKNESS: f32 = 60.0;

// ── Physics: World ────────────────────────────────────────────────────────────

/// Downward world gravity (units/s²).
///
/// 1500 u/s² gives the brisk fall of a phone-sized puzzle well; values below
/// ~800 make drops feel floaty, above ~2500 tunnelling through small planets
/// becomes visible.
pub const WORLD_GRAVITY: f32 = 1500.0;

/// Restitution coefficient for planets.
/// 0.0 = perfectly inelastic; 1.0 = perfectly elastic.
pub const PLANET_RESTITUTION: f32 = 0.2;

/// Friction coefficient for planet–planet and planet–wall contacts.
pub const PLANET_FRICTION: f32 = 0.3;

/// Friction coefficient for the static walls.
pub const WALL_FRICTION: f32 = 0.3;

/// Collider density multiplier.  A planet of rank `r` gets density
/// `DENSITY_SCALE * (r + 1)`, so heavier ranks sink through lighter ones.
pub const DENSITY_SCALE: f32 = 1.0;

// ── Physics: Attraction Field ─────────────────────────────────────────────────

/// Pairwise attraction constant (F = G·m_a·m_b/d²).
///
/// Deliberately tiny: the field only nudges nearby planets toward each other
/// so equal ranks find contact; it must never overpower world gravity.
/// Tested range: 0.1–1.0.
pub const ATTRACTION_CONST: f32 = 0.4;

/// Pairs at or beyond this centre-to-centre distance feel no attraction.
pub const ATTRACTION_RANGE: f32 = 200.0;

/// Pairs at or below this distance are skipped to avoid the 1/d² singularity.
pub const MIN_ATTRACTION_DIST: f32 = 1.0;

// ── Timing ────────────────────────────────────────────────────────────────────

/// Minimum wall-clock interval between two accepted drops (ms).
pub const DROP_COOLDOWN_MS: u64 = 500;

/// Wall-clock window after spawn during which a dropped planet is exempt from
/// the limit-line check (ms).
pub const GRACE_PERIOD_MS: u64 = 1500;

/// Frames a combo stays alive after the last merging frame.
/// 60 frames ≈ 1 s at 60 Hz.
pub const COMBO_WINDOW_TICKS: u32 = 60;

/// Bonus points per combo step: a combo of `n > 1` awards `n * COMBO_BONUS_PER_STEP`.
pub const COMBO_BONUS_PER_STEP: u64 = 50;

/// Danger frames tolerated before the run ends.
/// The run ends on the first frame the accumulated count would exceed this.
pub const DANGER_THRESHOLD_TICKS: u32 = 120;

/// Danger frames removed on every safe frame.
///
/// Decaying twice as fast as it accumulates makes brief overshoots forgiving;
/// changing this materially changes game-over timing.
pub const DANGER_DECAY_PER_TICK: u32 = 2;

/// Speed (u/s) below which a planet counts as settled rather than falling.
/// Equivalent to 2 units per frame at 60 Hz.
pub const SETTLE_SPEED: f32 = 120.0;

// ── Drops ─────────────────────────────────────────────────────────────────────

/// Number of lowest ranks eligible as the next dropped planet.
pub const DROP_RANK_COUNT: usize = 3;

/// Horizontal aim nudge speed for keyboard input (u/s).
pub const KEYBOARD_AIM_SPEED: f32 = 320.0;

// ── Rank Table ────────────────────────────────────────────────────────────────

/// Default rank table: `(name, radius, score, rgb)`, ordered by rank index.
///
/// The final entry is terminal and never merges.  Radii must be strictly
/// increasing; see [`crate::config::GameConfig::validate`].
pub const DEFAULT_RANKS: [(&str, f32, u64, [f32; 3]); 8] = [
    ("Dust", 14.0, 10, [0.60, 0.67, 0.80]),
    ("Asteroid", 20.0, 30, [0.80, 0.53, 0.27]),
    ("Moon", 28.0, 60, [0.87, 0.89, 0.94]),
    ("Mars", 38.0, 100, [1.00, 0.27, 0.20]),
    ("Earth", 50.0, 200, [0.20, 0.67, 1.00]),
    ("Jupiter", 64.0, 400, [1.00, 0.60, 0.20]),
    ("Sun", 80.0, 800, [1.00, 0.87, 0.00]),
    ("Black Hole", 98.0, 2000, [0.67, 0.20, 1.00]),
];

// ── Cosmetics ─────────────────────────────────────────────────────────────────

/// Particles emitted per merge burst.
pub const MERGE_PARTICLE_COUNT: u32 = 12;

/// Lifetime of floating "+points" / combo labels (s).
pub const FLOATING_TEXT_LIFETIME: f32 = 1.0;

/// Rise speed of floating labels (u/s).
pub const FLOATING_TEXT_RISE: f32 = 45.0;

/// HUD font size.
pub const HUD_FONT_SIZE: f32 = 20.0;

/// Linear volume for synthesised sound cues.
pub const CUE_VOLUME: f32 = 0.25;
