//! Double-buffered kinematic state for the ball and cars
//!
//! Every ingest shifts `next_*` into `prev_*` and overwrites `next_*`, so a
//! renderer can blend between the last two samples with a ratio in [0, 1].

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::orient;
use super::snapshot::PhysSample;
use crate::consts::TELEPORT_DIST;
use crate::lerp_vec3;

/// Previous/next kinematic samples bracketing the interpolation window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysState {
    pub prev_pos: Vec3,
    pub next_pos: Vec3,

    pub prev_forward: Vec3,
    pub next_forward: Vec3,
    pub prev_up: Vec3,
    pub next_up: Vec3,

    /// Whether the last sample carried an orientation
    pub has_rotation: bool,

    pub prev_vel: Vec3,
    pub next_vel: Vec3,
    pub ang_vel: Vec3,
}

impl Default for PhysState {
    fn default() -> Self {
        Self {
            prev_pos: Vec3::ZERO,
            next_pos: Vec3::ZERO,
            prev_forward: Vec3::X,
            next_forward: Vec3::X,
            prev_up: Vec3::Z,
            next_up: Vec3::Z,
            has_rotation: false,
            prev_vel: Vec3::ZERO,
            next_vel: Vec3::ZERO,
            ang_vel: Vec3::ZERO,
        }
    }
}

impl PhysState {
    /// Shift the latest sample into `prev_*` and take `sample` as `next_*`
    pub fn ingest(&mut self, sample: &PhysSample) {
        self.prev_pos = self.next_pos;
        self.next_pos = sample.pos;

        match sample.rotation {
            Some((forward, up)) => {
                self.prev_forward = self.next_forward;
                self.prev_up = self.next_up;
                self.next_forward = forward;
                self.next_up = up;
                self.has_rotation = true;
            }
            None => self.has_rotation = false,
        }

        self.prev_vel = self.next_vel;
        self.next_vel = sample.vel;
        self.ang_vel = sample.ang_vel;
    }

    /// Whether the last position jump is too large to interpolate across
    #[inline]
    pub fn is_teleporting(&self) -> bool {
        self.prev_pos.distance_squared(self.next_pos) >= TELEPORT_DIST * TELEPORT_DIST
    }

    pub fn interpolated_position(&self, ratio: f32) -> Vec3 {
        if self.is_teleporting() {
            self.prev_pos
        } else {
            lerp_vec3(self.prev_pos, self.next_pos, ratio)
        }
    }

    pub fn interpolated_velocity(&self, ratio: f32) -> Vec3 {
        if self.is_teleporting() {
            self.prev_vel
        } else {
            lerp_vec3(self.prev_vel, self.next_vel, ratio)
        }
    }

    /// Unit forward vector at `ratio`.
    ///
    /// Without a rotation in the last sample there is nothing to blend and
    /// `next_forward` is returned as-is.
    pub fn interpolated_forward(&self, ratio: f32) -> Vec3 {
        if !self.has_rotation {
            self.next_forward
        } else if self.is_teleporting() {
            self.prev_forward
        } else {
            orient::blend_unit(self.prev_forward, self.next_forward, ratio, Vec3::X)
        }
    }

    /// Unit up vector at `ratio`
    pub fn interpolated_up(&self, ratio: f32) -> Vec3 {
        if !self.has_rotation {
            self.next_up
        } else if self.is_teleporting() {
            self.prev_up
        } else {
            orient::blend_unit(self.prev_up, self.next_up, ratio, Vec3::Z)
        }
    }

    /// Spin `next_forward`/`next_up` by the angular velocity over `dt`
    pub fn advance_rotation(&mut self, dt: f32) {
        let (forward, up) =
            orient::integrate_orientation(self.next_forward, self.next_up, self.ang_vel, dt);
        self.next_forward = forward;
        self.next_up = up;
    }
}
