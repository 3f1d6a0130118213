//! Procedural level pipeline: tiers, seeds, retries, fallback and caching.
//!
//! The main entry point is [`LevelCatalog::get_or_generate`]. For a given
//! `(level id, mode)` it always produces the same level: the seed is derived
//! from the id, every attempt draws from that one seeded stream, and the
//! fallbacks are seeded the same way.

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::board::{folded_serpentine, serpentine, MazeLayout, Strategy};
use crate::connectivity::validate_connectivity;
use crate::error::MazeError;
use crate::quality::assess;
use crate::rng::LevelRng;
use crate::settings::{GeneratorSettings, LEVELS_PER_MODE};
use crate::solver::{solve, SolverLimits};
use crate::types::{color_index, level_name, DifficultyConfig, DifficultyTier, Direction, LevelData, Mode};

// ─── Tier tables ────────────────────────────────────────────────────────────

struct TierRow {
    start_level: u32,
    end_level: u32,
    config: DifficultyConfig,
}

const fn tier(start_level: u32, end_level: u32, name: &'static str, grid_size: usize, min_moves: usize, max_moves: usize) -> TierRow {
    TierRow {
        start_level,
        end_level,
        config: DifficultyConfig {
            name,
            grid_size,
            min_moves,
            max_moves,
        },
    }
}

const THINKING_TIERS: [TierRow; 7] = [
    tier(1, 200, "Easy", 7, 4, 7),
    tier(201, 600, "Medium", 9, 6, 10),
    tier(601, 1200, "Hard", 11, 8, 14),
    tier(1201, 2200, "Expert", 13, 10, 18),
    tier(2201, 3000, "Master", 13, 14, 22),
    tier(3001, 3600, "Legendary", 15, 16, 26),
    tier(3601, 4000, "Impossible", 15, 20, 30),
];

const RELAXING_TIERS: [TierRow; 6] = [
    tier(1, 300, "Easy", 7, 3, 6),
    tier(301, 800, "Medium", 9, 5, 9),
    tier(801, 1500, "Hard", 11, 6, 12),
    tier(1501, 2500, "Expert", 13, 8, 15),
    tier(2501, 3200, "Master", 13, 10, 18),
    tier(3201, 4000, "Legendary", 15, 12, 22),
];

fn tier_rows(mode: Mode) -> &'static [TierRow] {
    match mode {
        Mode::Thinking => &THINKING_TIERS,
        Mode::Relaxing => &RELAXING_TIERS,
    }
}

/// The tier table for a mode, for level-select screens.
pub fn difficulty_tiers(mode: Mode) -> Vec<DifficultyTier> {
    tier_rows(mode)
        .iter()
        .map(|row| DifficultyTier {
            name: row.config.name.to_string(),
            start_level: row.start_level,
            end_level: row.end_level,
        })
        .collect()
}

/// Difficulty of a level. Ids past the last tier use the last tier.
pub fn difficulty_for_level(level_id: u32, mode: Mode) -> &'static DifficultyConfig {
    let rows = tier_rows(mode);
    let row = rows
        .iter()
        .find(|row| level_id <= row.end_level)
        .unwrap_or(&rows[rows.len() - 1]);
    &row.config
}

/// Check that `tiers` covers `1..=max_level` in order, with no gap or overlap.
pub fn validate_tiers(tiers: &[DifficultyTier], max_level: u32) -> Result<(), MazeError> {
    let mut expected = 1;
    for t in tiers {
        if t.start_level != expected || t.end_level < t.start_level {
            return Err(MazeError::TierGap {
                name: t.name.clone(),
                start: t.start_level,
                expected,
            });
        }
        expected = t.end_level + 1;
    }
    let end = expected - 1;
    if end != max_level {
        return Err(MazeError::TierCoverage {
            end,
            expected: max_level,
        });
    }
    Ok(())
}

// ─── Player-facing derived values ───────────────────────────────────────────

/// Number of levels in each mode.
pub fn total_levels() -> u32 {
    LEVELS_PER_MODE
}

/// Star rating for finishing a level in `moves` moves.
pub fn stars_for(moves: usize, target_moves: usize) -> u8 {
    if target_moves == 0 {
        return 3;
    }
    let ratio = moves as f64 / target_moves as f64;
    if ratio <= 1.0 {
        3
    } else if ratio <= 1.5 {
        2
    } else {
        1
    }
}

/// Undos the player gets on a level. Relaxing mode is effectively unlimited.
pub fn undo_allowance(level_id: u32, mode: Mode) -> u32 {
    if mode == Mode::Relaxing {
        return 99;
    }
    match difficulty_for_level(level_id, mode).name {
        "Easy" | "Medium" => 5,
        "Hard" | "Expert" => 4,
        _ => 3,
    }
}

// ─── Generation ─────────────────────────────────────────────────────────────

/// Seed for a level. The modes use distinct constants so they never collide.
pub fn level_seed(level_id: u32, mode: Mode) -> u32 {
    match mode {
        Mode::Thinking => level_id.wrapping_mul(7919).wrapping_add(1337),
        Mode::Relaxing => level_id.wrapping_mul(6577).wrapping_add(4241),
    }
}

fn level_from_layout(
    level_id: u32,
    layout: MazeLayout,
    solution: Vec<Direction>,
    config: &DifficultyConfig,
) -> LevelData {
    LevelData {
        id: level_id,
        name: level_name(level_id),
        board: layout.grid,
        start_x: layout.start_x,
        start_y: layout.start_y,
        target_moves: solution.len(),
        color_index: color_index(level_id),
        solution: Some(solution),
        difficulty: Some(config.name.to_string()),
    }
}

/// Run the attempt loop on one seed.
///
/// Each attempt rolls a strategy, carves a board, checks connectivity, solves
/// it and applies the quality filters. The first accepted board wins.
pub fn generate_from_seed(
    seed: u32,
    level_id: u32,
    config: &DifficultyConfig,
    mode: Mode,
    settings: &GeneratorSettings,
) -> Option<LevelData> {
    let mut rng = LevelRng::new(seed);
    let size = config.grid_size;
    let limits = SolverLimits {
        max_depth: config.max_moves + settings.depth_slack,
        max_nodes: settings.max_solver_nodes,
    };
    let junction_ratio = settings.junction_ratio(mode);

    for attempt in 0..settings.max_attempts {
        let strategy = Strategy::roll(mode, &mut rng);
        let Some(layout) = strategy.attempt(&mut rng, size, size, config, settings) else {
            continue;
        };
        if !validate_connectivity(&layout.grid, layout.start_x, layout.start_y) {
            debug!("level {level_id} attempt {attempt}: {} board not connected", strategy.name());
            continue;
        }
        let Some(solution) = solve(&layout.grid, layout.start_x, layout.start_y, limits) else {
            debug!("level {level_id} attempt {attempt}: {} board has no solution", strategy.name());
            continue;
        };
        if let Err(reason) = assess(&layout.grid, &solution, config, junction_ratio) {
            debug!("level {level_id} attempt {attempt}: {} rejected, {reason}", strategy.name());
            continue;
        }

        debug!(
            "level {level_id} ({mode}) accepted on attempt {attempt}: {} with {} moves",
            strategy.name(),
            solution.len()
        );
        return Some(level_from_layout(level_id, layout, solution, config));
    }

    None
}

/// Generate a level from its own seed only, without fallbacks.
pub fn generate_maze(
    level_id: u32,
    config: &DifficultyConfig,
    mode: Mode,
    settings: &GeneratorSettings,
) -> Option<LevelData> {
    generate_from_seed(level_seed(level_id, mode), level_id, config, mode, settings)
}

/// Serpentine level of the configured size, relabelled to `level_id`.
///
/// Tiers whose minimum exceeds a plain serpentine get the folded one.
fn last_resort(level_id: u32, config: &DifficultyConfig) -> Option<LevelData> {
    let size = config.grid_size;
    let plain = serpentine(size, size)?;
    let (layout, solution) = if plain.1.len() >= config.min_moves {
        plain
    } else {
        folded_serpentine(size, size).unwrap_or(plain)
    };
    Some(level_from_layout(level_id, layout, solution, config))
}

/// Generate a level, falling back to shifted seeds and finally to a
/// serpentine corridor. `None` only for ids outside `1..=max_level`.
///
/// Fallback levels keep the requested level's difficulty config; only the
/// seed changes before the result is relabelled.
pub fn generate_level(level_id: u32, mode: Mode, settings: &GeneratorSettings) -> Option<LevelData> {
    if level_id == 0 || level_id > settings.max_level {
        return None;
    }

    let config = difficulty_for_level(level_id, mode);
    if let Some(level) = generate_maze(level_id, config, mode, settings) {
        return Some(level);
    }

    for offset in 1..=settings.fallback_offsets {
        let shifted = level_id.wrapping_add(offset.wrapping_mul(settings.fallback_stride));
        if let Some(mut level) = generate_maze(shifted, config, mode, settings) {
            info!("level {level_id} ({mode}) generated from fallback seed offset {offset}");
            level.relabel(level_id);
            return Some(level);
        }
    }

    let level = last_resort(level_id, config)?;
    warn!(
        "level {level_id} ({mode}) exhausted all seeds, using serpentine layout with {} moves",
        level.target_moves
    );
    Some(level)
}

/// Free-play level from an arbitrary seed, at the difficulty of `level_id`.
pub fn generate_seeded_level(
    seed: u32,
    level_id: u32,
    mode: Mode,
    settings: &GeneratorSettings,
) -> Option<LevelData> {
    let config = difficulty_for_level(level_id, mode);
    generate_from_seed(seed, level_id, config, mode, settings).or_else(|| last_resort(level_id, config))
}

// ─── Cache ──────────────────────────────────────────────────────────────────

/// Memoized levels, keyed by mode and id.
///
/// Owned by whoever composes the game; there is no global cache. Entries are
/// immutable once generated.
#[derive(Debug, Default)]
pub struct LevelCatalog {
    settings: GeneratorSettings,
    cache: HashMap<(Mode, u32), LevelData>,
    generated: usize,
}

impl LevelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with custom settings, validated first.
    pub fn with_settings(settings: GeneratorSettings) -> Result<Self, MazeError> {
        settings.validate()?;
        Ok(Self {
            settings,
            ..Self::default()
        })
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Cached level, generating it on first request.
    pub fn get_or_generate(&mut self, level_id: u32, mode: Mode) -> Option<&LevelData> {
        let key = (mode, level_id);
        if !self.cache.contains_key(&key) {
            let level = generate_level(level_id, mode, &self.settings)?;
            self.generated += 1;
            self.cache.insert(key, level);
        }
        self.cache.get(&key)
    }

    /// How many levels this catalog has generated (cache misses).
    pub fn generation_count(&self) -> usize {
        self.generated
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
