//! Car state: physics plus gameplay flags and reward bookkeeping

use serde::{Deserialize, Serialize};

use super::phys::PhysState;
use super::rewards::RewardLedger;
use super::snapshot::CarSample;
use crate::consts::EPISODE_RESET_DIST;

/// Id reported for cars whose producer never sent one
pub const UNKNOWN_CAR_ID: i64 = -1;

/// Team side, sent on the wire as 0 (blue) or 1 (orange)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Team {
    #[default]
    Blue,
    Orange,
}

impl TryFrom<u8> for Team {
    type Error = String;

    fn try_from(num: u8) -> Result<Self, Self::Error> {
        match num {
            0 => Ok(Team::Blue),
            1 => Ok(Team::Orange),
            other => Err(format!("invalid team_num {other}, expected 0 or 1")),
        }
    }
}

impl From<Team> for u8 {
    fn from(team: Team) -> Self {
        match team {
            Team::Blue => 0,
            Team::Orange => 1,
        }
    }
}

/// Controller inputs last applied by the car
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub throttle: f32,
    pub steer: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    pub boost: bool,
    pub jump: bool,
    pub handbrake: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarState {
    pub id: i64,
    pub team: Team,
    pub phys: PhysState,
    pub controls: Controls,
    /// Boost charge, 0 to 100
    pub boost_amount: f32,
    pub is_boosting: bool,
    pub on_ground: bool,
    pub has_flipped_or_double_jumped: bool,
    pub is_demoed: bool,
    pub rewards: RewardLedger,
}

impl Default for CarState {
    fn default() -> Self {
        Self {
            id: UNKNOWN_CAR_ID,
            team: Team::Blue,
            phys: PhysState::default(),
            controls: Controls::default(),
            boost_amount: 0.0,
            is_boosting: false,
            on_ground: false,
            has_flipped_or_double_jumped: false,
            is_demoed: false,
            rewards: RewardLedger::default(),
        }
    }
}

impl CarState {
    /// Fresh car built from its first sample
    pub fn from_sample(sample: &CarSample) -> Self {
        let mut car = Self::default();
        car.ingest(sample);
        car
    }

    /// Apply a sample in place.
    ///
    /// Returns true when the position jump marked an episode reset and the
    /// cumulative rewards were cleared.
    pub fn ingest(&mut self, sample: &CarSample) -> bool {
        if let Some(id) = sample.car_id {
            self.id = id;
        }
        self.team = sample.team_num;

        let old_pos = self.phys.next_pos;
        self.phys.ingest(&sample.phys);
        let episode_reset = self.phys.next_pos.distance(old_pos) > EPISODE_RESET_DIST;
        if episode_reset {
            self.rewards.reset();
        }

        if let Some(controls) = sample.controls {
            self.controls = controls;
        }

        // Some modes never drain boost, so a held button counts too
        self.is_boosting = sample.boost_amount < self.boost_amount || self.controls.boost;
        self.boost_amount = sample.boost_amount;
        self.on_ground = sample.on_ground;
        if let Some(flipped) = sample.has_flipped_or_double_jumped {
            self.has_flipped_or_double_jumped = flipped;
        }
        self.is_demoed = sample.is_demoed;

        let entries = sample.rewards.iter().flatten().map(|r| {
            (
                r.name.clone().unwrap_or_else(|| "Unknown".to_string()),
                r.value.unwrap_or(0.0),
            )
        });
        self.rewards.ingest(entries, sample.total_reward.unwrap_or(0.0));

        episode_reset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::snapshot::PhysSample;
    use crate::sim::snapshot::RewardSample;
    use glam::Vec3;

    fn car_sample(pos: Vec3, boost: f32) -> CarSample {
        CarSample {
            car_id: None,
            team_num: Team::Blue,
            phys: PhysSample {
                pos,
                vel: Vec3::ZERO,
                ang_vel: Vec3::ZERO,
                rotation: None,
            },
            controls: None,
            boost_amount: boost,
            on_ground: true,
            has_flipped_or_double_jumped: None,
            is_demoed: false,
            rewards: Some(vec![RewardSample {
                name: Some("touch".to_string()),
                value: Some(1.0),
            }]),
            total_reward: Some(1.0),
        }
    }

    #[test]
    fn test_sticky_optional_fields() {
        let mut s = car_sample(Vec3::ZERO, 50.0);
        s.car_id = Some(7);
        s.has_flipped_or_double_jumped = Some(true);
        let mut car = CarState::from_sample(&s);
        assert_eq!(car.id, 7);

        let s = car_sample(Vec3::X, 50.0);
        car.ingest(&s);
        assert_eq!(car.id, 7);
        assert!(car.has_flipped_or_double_jumped);
    }

    #[test]
    fn test_default_id_is_sentinel() {
        let car = CarState::from_sample(&car_sample(Vec3::ZERO, 0.0));
        assert_eq!(car.id, UNKNOWN_CAR_ID);
    }

    #[test]
    fn test_boosting_from_drain() {
        let mut car = CarState::from_sample(&car_sample(Vec3::ZERO, 50.0));
        assert!(!car.is_boosting);
        car.ingest(&car_sample(Vec3::ZERO, 48.0));
        assert!(car.is_boosting);
        car.ingest(&car_sample(Vec3::ZERO, 48.0));
        assert!(!car.is_boosting);
    }

    #[test]
    fn test_boosting_from_held_input() {
        let mut car = CarState::from_sample(&car_sample(Vec3::ZERO, 100.0));
        let mut s = car_sample(Vec3::ZERO, 100.0);
        s.controls = Some(Controls { boost: true, ..Default::default() });
        car.ingest(&s);
        assert!(car.is_boosting);

        // Controls stick when a later sample omits them
        car.ingest(&car_sample(Vec3::ZERO, 100.0));
        assert!(car.is_boosting);
    }

    #[test]
    fn test_episode_reset_clears_cumulative() {
        let mut car = CarState::from_sample(&car_sample(Vec3::new(0.0, 0.0, 17.0), 33.0));
        assert!(!car.ingest(&car_sample(Vec3::new(500.0, 0.0, 17.0), 33.0)));
        assert_eq!(car.rewards.cumulative_total, 2.0);

        // A teleport inside an episode keeps the history
        assert!(!car.ingest(&car_sample(Vec3::new(2000.0, 0.0, 17.0), 33.0)));
        assert!(car.phys.is_teleporting());
        assert_eq!(car.rewards.cumulative_total, 3.0);

        assert!(car.ingest(&car_sample(Vec3::new(-2000.0, -2560.0, 17.0), 33.0)));
        // Reset happens before this frame's rewards are added
        assert_eq!(car.rewards.cumulative_total, 1.0);
        assert_eq!(car.rewards.cumulative_of("touch"), 1.0);
    }

    #[test]
    fn test_missing_reward_fields_default() {
        let mut s = car_sample(Vec3::ZERO, 0.0);
        s.rewards = Some(vec![RewardSample { name: None, value: None }]);
        s.total_reward = None;
        let car = CarState::from_sample(&s);
        assert_eq!(car.rewards.instant, vec![("Unknown".to_string(), 0.0)]);
        assert_eq!(car.rewards.instant_total, 0.0);
    }

    #[test]
    fn test_team_wire_values() {
        assert_eq!(Team::try_from(0), Ok(Team::Blue));
        assert_eq!(Team::try_from(1), Ok(Team::Orange));
        assert!(Team::try_from(2).is_err());
        assert_eq!(u8::from(Team::Orange), 1);
    }
}
