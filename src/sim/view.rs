//! Read-only interpolated frame handed to renderers and panels

use glam::Vec3;
use serde::Serialize;

use super::boost::is_big_pad;
use super::car::{CarState, Controls, Team};
use super::orient::right_of;
use super::overlay::DebugLine;
use super::phys::PhysState;
use super::rewards::RewardRow;
use super::world::WorldState;
use crate::consts::DEFAULT_GAMEMODE;

/// Interpolated pose of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyFrame {
    pub pos: Vec3,
    pub vel: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub right: Vec3,
}

impl BodyFrame {
    pub fn from_phys(phys: &PhysState, ratio: f32) -> Self {
        let forward = phys.interpolated_forward(ratio);
        let up = phys.interpolated_up(ratio);
        Self {
            pos: phys.interpolated_position(ratio),
            vel: phys.interpolated_velocity(ratio),
            forward,
            up,
            right: right_of(forward, up),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarFrame {
    pub id: i64,
    pub team: Team,
    pub body: BodyFrame,
    pub controls: Controls,
    pub boost_amount: f32,
    pub is_boosting: bool,
    pub on_ground: bool,
    pub has_flipped_or_double_jumped: bool,
    pub is_demoed: bool,
    pub rewards: Vec<RewardRow>,
    pub instant_total: f32,
    pub cumulative_total: f32,
    /// (max |instant|, max |cumulative|) for scaling reward bars
    pub bar_scale: (f32, f32),
}

impl CarFrame {
    pub fn from_car(car: &CarState, ratio: f32) -> Self {
        Self {
            id: car.id,
            team: car.team,
            body: BodyFrame::from_phys(&car.phys, ratio),
            controls: car.controls,
            boost_amount: car.boost_amount,
            is_boosting: car.is_boosting,
            on_ground: car.on_ground,
            has_flipped_or_double_jumped: car.has_flipped_or_double_jumped,
            is_demoed: car.is_demoed,
            rewards: car.rewards.breakdown(),
            instant_total: car.rewards.instant_total,
            cumulative_total: car.rewards.cumulative_total,
            bar_scale: car.rewards.bar_scale(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PadFrame {
    pub position: Vec3,
    pub active: bool,
    pub big: bool,
    pub index: Option<i64>,
}

/// Everything a renderer needs for one drawn frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub ratio: f32,
    pub gamemode: String,
    pub ball: BodyFrame,
    pub cars: Vec<CarFrame>,
    pub pads: Vec<PadFrame>,
    pub debug_lines: Vec<DebugLine>,
    pub display_rows: Vec<(String, String)>,
}

impl WorldState {
    /// Build the frame at interpolation `ratio` (clamped to [0, 1])
    pub fn frame(&self, ratio: f32) -> Frame {
        let ratio = ratio.clamp(0.0, 1.0);
        let gamemode = self.gamemode.as_deref();
        Frame {
            ratio,
            gamemode: gamemode.unwrap_or(DEFAULT_GAMEMODE).to_string(),
            ball: BodyFrame::from_phys(&self.ball, ratio),
            cars: self.cars.iter().map(|c| CarFrame::from_car(c, ratio)).collect(),
            pads: self
                .boost
                .pads
                .iter()
                .map(|pad| PadFrame {
                    position: pad.position,
                    active: pad.is_active(),
                    big: is_big_pad(pad.position, gamemode),
                    index: pad.index,
                })
                .collect(),
            debug_lines: self.debug_lines.clone(),
            display_rows: self.display_rows.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Snapshot;
    use serde_json::json;

    fn world_after_two_merges() -> WorldState {
        let mut world = WorldState::new();
        for (x, yaw_fwd) in [(0.0f32, [1, 0, 0]), (100.0, [0, 1, 0])] {
            let snap = Snapshot::from_value(json!({
                "ball_phys": { "pos": [x, 0, 93], "vel": [x, 0, 0], "ang_vel": [0, 0, 0] },
                "cars": [{
                    "car_id": 4,
                    "team_num": 1,
                    "phys": {
                        "pos": [x, 50, 17], "vel": [0, 0, 0], "ang_vel": [0, 0, 0],
                        "forward": yaw_fwd, "up": [0, 0, 1]
                    },
                    "boost_amount": 50.0 - x / 10.0,
                    "on_ground": true,
                    "is_demoed": false,
                    "rewards": [{ "name": "touch", "value": 0.5 }],
                    "total_reward": 0.5
                }],
                "gamemode": "soccar",
                "custom_info": [{ "key": "Episode", "value": "1" }]
            }))
            .unwrap();
            world.merge(&snap).unwrap();
        }
        world
    }

    #[test]
    fn test_frame_interpolates_bodies() {
        let world = world_after_two_merges();
        let frame = world.frame(0.5);
        assert_eq!(frame.ball.pos, Vec3::new(50.0, 0.0, 93.0));
        assert_eq!(frame.ball.vel, Vec3::new(50.0, 0.0, 0.0));

        let car = &frame.cars[0];
        assert_eq!(car.id, 4);
        assert_eq!(car.team, Team::Orange);
        assert_eq!(car.body.pos, Vec3::new(50.0, 50.0, 17.0));
        assert!((car.body.forward.length() - 1.0).abs() < 1e-5);
        assert!(car.is_boosting);
        assert_eq!(car.cumulative_total, 1.0);
        assert_eq!(car.rewards[0].cumulative, 1.0);
    }

    #[test]
    fn test_frame_ratio_is_clamped() {
        let world = world_after_two_merges();
        assert_eq!(world.frame(4.0).ball.pos, Vec3::new(100.0, 0.0, 93.0));
        assert_eq!(world.frame(-1.0).ball.pos, Vec3::new(0.0, 0.0, 93.0));
    }

    #[test]
    fn test_frame_pads_and_rows() {
        let world = world_after_two_merges();
        let frame = world.frame(1.0);
        assert_eq!(frame.gamemode, "soccar");
        assert_eq!(frame.pads.len(), 34);
        assert!(frame.pads.iter().all(|p| p.active));
        assert_eq!(frame.pads.iter().filter(|p| p.big).count(), 6);
        assert_eq!(frame.display_rows, vec![("Episode".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_frame_before_any_merge() {
        let frame = WorldState::new().frame(0.5);
        assert_eq!(frame.gamemode, "soccar");
        assert!(frame.cars.is_empty());
        assert_eq!(frame.ball.forward, Vec3::X);
        assert_eq!(frame.ball.right, Vec3::Y);
    }
}
