//! Arena Vis - live state reconstruction for a car-soccar simulation
//!
//! Core modules:
//! - `sim`: Snapshot decoding, per-entity state buffering, merge and interpolation
//! - `renderer`: GPU-ready vertex data built from an interpolated frame
//! - `net`: Non-blocking UDP datagram receiver
//! - `settings`: Runtime configuration

pub mod net;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};
pub use sim::{Frame, MergeError, Snapshot, WorldState};

use glam::Vec3;

/// Engine configuration constants
pub mod consts {
    /// Position jump (uu) at which interpolation is suppressed (6000 * 0.15)
    pub const TELEPORT_DIST: f32 = 900.0;
    /// Position jump (uu) above which a new episode is assumed
    pub const EPISODE_RESET_DIST: f32 = 3000.0;

    /// Maximum debug lines accepted per snapshot
    pub const MAX_DEBUG_LINES: usize = 0x2000;

    /// Angular step below which orientation is left untouched
    pub const ANG_EPSILON: f32 = 1e-8;

    /// Gamemode assumed when a snapshot names none
    pub const DEFAULT_GAMEMODE: &str = "soccar";

    /// Default UDP port snapshots are sent to
    pub const DEFAULT_UDP_PORT: u16 = 9273;
    /// Largest datagram the receiver accepts
    pub const MAX_DATAGRAM: usize = 65_536;
}

/// Linear blend between two vectors
#[inline]
pub fn lerp_vec3(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    from + (to - from) * t
}

/// Render-time position between two receives, clamped to [0, 1].
///
/// Returns 1.0 when the receive interval is not yet known.
#[inline]
pub fn interp_ratio(now: f64, recv_time: f64, recv_interval: f64) -> f32 {
    if recv_interval <= 0.0 || recv_time < 0.0 {
        return 1.0;
    }
    ((now - recv_time) / recv_interval).clamp(0.0, 1.0) as f32
}
