//! WebAssembly maze generator and solver for the Paint Slide puzzle game.
//!
//! A ball slides until it hits a wall, painting every tile it crosses; a level
//! is solved once every path tile is painted. This crate generates levels
//! deterministically from a level id and mode, proves each one solvable and
//! reports the solution's move count.
//!
//! Grids are flat row-major arrays: `grid[y * width + x]`, `0` = wall,
//! `1` = path, `2` = painted.

pub mod board;
pub mod connectivity;
pub mod error;
pub mod play;
pub mod procedural;
pub mod quality;
pub mod rng;
pub mod settings;
pub mod slide;
pub mod solver;
pub mod types;

pub use error::MazeError;
pub use play::PlaySession;
pub use procedural::{generate_level, LevelCatalog};
pub use settings::GeneratorSettings;
pub use types::{Cell, DifficultyConfig, Direction, Grid, LevelData, Mode};

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use serde::Serialize;
    use wasm_bindgen::prelude::*;

    use crate::procedural::{self, LevelCatalog};
    use crate::settings::GeneratorSettings;
    use crate::types::{Direction, Grid, Mode};
    use crate::{rng, solver};

    fn to_js_error(err: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    /// Plain JS objects rather than `Map`s, which flattened structs would
    /// otherwise become.
    fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
        Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
    }

    fn parse_mode(mode: &str) -> Result<Mode, JsValue> {
        mode.parse::<Mode>().map_err(to_js_error)
    }

    /// Level cache owned by the JavaScript side.
    #[wasm_bindgen(js_name = "LevelCatalog")]
    pub struct WasmLevelCatalog {
        inner: LevelCatalog,
    }

    #[wasm_bindgen(js_class = "LevelCatalog")]
    impl WasmLevelCatalog {
        /// Create a catalog. `settings` is an optional partial settings object.
        #[wasm_bindgen(constructor)]
        pub fn new(settings: JsValue) -> Result<WasmLevelCatalog, JsValue> {
            let settings: GeneratorSettings = if settings.is_undefined() || settings.is_null() {
                GeneratorSettings::default()
            } else {
                serde_wasm_bindgen::from_value(settings)?
            };
            let inner = LevelCatalog::with_settings(settings).map_err(to_js_error)?;
            Ok(Self { inner })
        }

        /// Returns the LevelData object, or `undefined` for out-of-range ids.
        #[wasm_bindgen(js_name = "getLevel")]
        pub fn get_level(&mut self, level_id: u32, mode: &str) -> Result<JsValue, JsValue> {
            let mode = parse_mode(mode)?;
            match self.inner.get_or_generate(level_id, mode) {
                Some(level) => to_js(level),
                None => Ok(JsValue::UNDEFINED),
            }
        }

        #[wasm_bindgen(js_name = "generationCount")]
        pub fn generation_count(&self) -> u32 {
            self.inner.generation_count() as u32
        }
    }

    /// Free-play level from system entropy at the difficulty of `levelId`.
    #[wasm_bindgen(js_name = "generateRandomLevel")]
    pub fn wasm_generate_random_level(mode: &str, level_id: u32) -> Result<JsValue, JsValue> {
        let mode = parse_mode(mode)?;
        let settings = GeneratorSettings::default();
        match procedural::generate_seeded_level(rng::random_seed(), level_id, mode, &settings) {
            Some(level) => to_js(&level),
            None => Ok(JsValue::NULL),
        }
    }

    /// Replay a move list (`["UP", "LEFT", ...]`).
    /// Returns JS object: `{ complete: bool, painted: Uint8Array }`.
    #[wasm_bindgen(js_name = "replaySolution")]
    pub fn wasm_replay_solution(
        width: usize,
        height: usize,
        grid_flat: &[u8],
        start_x: usize,
        start_y: usize,
        moves: JsValue,
    ) -> Result<JsValue, JsValue> {
        let grid = Grid::from_codes(width, height, grid_flat).map_err(to_js_error)?;
        let moves: Vec<Direction> = serde_wasm_bindgen::from_value(moves)?;
        let visited = solver::replay_solution(&grid, start_x, start_y, &moves).map_err(to_js_error)?;
        let complete = solver::is_solution(&grid, start_x, start_y, &moves);

        let painted: Vec<u8> = visited.iter().map(|&v| v as u8).collect();
        let arr = js_sys::Uint8Array::new_with_length(painted.len() as u32);
        arr.copy_from(&painted);

        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"complete".into(), &complete.into())?;
        js_sys::Reflect::set(&obj, &"painted".into(), &arr.into())?;
        Ok(obj.into())
    }

    /// Stars for finishing in `moves` with the given target.
    #[wasm_bindgen(js_name = "starsFor")]
    pub fn wasm_stars_for(moves: u32, target_moves: u32) -> u8 {
        procedural::stars_for(moves as usize, target_moves as usize)
    }

    #[wasm_bindgen(js_name = "undoAllowance")]
    pub fn wasm_undo_allowance(level_id: u32, mode: &str) -> Result<u32, JsValue> {
        Ok(procedural::undo_allowance(level_id, parse_mode(mode)?))
    }

    /// Tier table for the level-select screen.
    #[wasm_bindgen(js_name = "difficultyTiers")]
    pub fn wasm_difficulty_tiers(mode: &str) -> Result<JsValue, JsValue> {
        let tiers = procedural::difficulty_tiers(parse_mode(mode)?);
        to_js(&tiers)
    }

    #[wasm_bindgen(js_name = "totalLevels")]
    pub fn wasm_total_levels() -> u32 {
        procedural::total_levels()
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM maze generator ready".to_string()
    }
}
