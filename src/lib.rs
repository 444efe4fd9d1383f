//! Mashadeau - entity physics and collision core
//!
//! Core modules:
//! - `sim`: Entities, motion integration, collision shapes and queries
//! - `settings`: World parameters and simulation settings

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError, WorldParams};

use glam::Vec2;

/// Simulation constants and entity defaults
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default ambient gravity
    pub const DEFAULT_GRAVITY: f32 = 1.0;

    /// Entity motion defaults
    pub const DEFAULT_MASS: f32 = 1.0;
    pub const DEFAULT_MAX_VELOCITY: Vec2 = Vec2::splat(999.0);
    /// Velocity multiplier per tick while no force is applied
    pub const DEFAULT_DECELERATE: Vec2 = Vec2::splat(0.85);
    /// Per-tick displacement below which a coasting entity stops
    pub const DEFAULT_FORCE_STOP: Vec2 = Vec2::splat(0.001);
}

/// Rotate `v` counter-clockwise by `degrees`
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}
