//! Wire schema for incoming snapshots
//!
//! One JSON object per datagram. Required fields are plain fields, optional
//! ones are `Option`s, so a missing required field fails the decode once at
//! the boundary instead of deep inside the merge.

use glam::Vec3;
use serde::Deserialize;
use thiserror::Error;

use super::car::{Controls, Team};

/// Errors produced while decoding a datagram into a [`Snapshot`]
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("empty datagram")]
    Empty,
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// A full received update
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    pub ball_phys: PhysSample,
    pub cars: Vec<CarSample>,
    pub gamemode: Option<String>,
    /// Explicit pad objects (newest producers)
    pub boost_pads: Option<Vec<Option<PadSample>>>,
    /// Legacy pad positions
    pub boost_pad_locations: Option<Vec<Vec3>>,
    /// Legacy pad activation, parallel to the current pad list
    pub boost_pad_states: Option<Vec<bool>>,
    pub render: Option<RenderSample>,
    pub custom_info: Option<Vec<DisplayEntry>>,
    /// Optional producer sequence number
    pub seq: Option<u64>,
}

impl Snapshot {
    /// Decode a snapshot from raw datagram bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SnapshotError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(SnapshotError::Empty);
        }
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Decode a snapshot from an already-parsed JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Kinematic sample for the ball or a car
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawPhysSample")]
pub struct PhysSample {
    pub pos: Vec3,
    pub vel: Vec3,
    pub ang_vel: Vec3,
    /// Forward/up basis, when the producer sent one
    pub rotation: Option<(Vec3, Vec3)>,
}

#[derive(Deserialize)]
struct RawPhysSample {
    pos: Vec3,
    vel: Vec3,
    ang_vel: Vec3,
    forward: Option<Vec3>,
    up: Option<Vec3>,
}

impl TryFrom<RawPhysSample> for PhysSample {
    type Error = String;

    fn try_from(raw: RawPhysSample) -> Result<Self, Self::Error> {
        let rotation = match (raw.forward, raw.up) {
            (Some(forward), Some(up)) => Some((forward, up)),
            (None, None) => None,
            (Some(_), None) => return Err("`forward` given without `up`".to_string()),
            (None, Some(_)) => return Err("`up` given without `forward`".to_string()),
        };
        Ok(Self {
            pos: raw.pos,
            vel: raw.vel,
            ang_vel: raw.ang_vel,
            rotation,
        })
    }
}

/// Per-car sample
#[derive(Debug, Clone, Deserialize)]
pub struct CarSample {
    pub car_id: Option<i64>,
    pub team_num: Team,
    pub phys: PhysSample,
    pub controls: Option<Controls>,
    pub boost_amount: f32,
    pub on_ground: bool,
    pub has_flipped_or_double_jumped: Option<bool>,
    pub is_demoed: bool,
    pub rewards: Option<Vec<RewardSample>>,
    pub total_reward: Option<f32>,
}

/// One named reward contribution
#[derive(Debug, Clone, Deserialize)]
pub struct RewardSample {
    pub name: Option<String>,
    pub value: Option<f32>,
}

/// Explicit boost pad object
#[derive(Debug, Clone, Deserialize)]
pub struct PadSample {
    pub pos: Option<Vec3>,
    pub index: Option<i64>,
    /// Missing means active; an explicit `null` means inactive
    #[serde(default = "pad_active_by_default", deserialize_with = "null_as_inactive")]
    pub is_active: bool,
    pub prev_locked_car_id: Option<i64>,
}

fn pad_active_by_default() -> bool {
    true
}

fn null_as_inactive<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Debug render payload.
///
/// Lines stay untyped here so a bad overlay can be rejected without failing
/// the whole snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderSample {
    pub lines: Option<serde_json::Value>,
}

/// A custom display row, as `{key, value}` or `[key, value]`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DisplayEntry {
    Pair { key: String, value: serde_json::Value },
    Tuple(String, serde_json::Value),
}

impl DisplayEntry {
    /// Key and display text of the row
    pub fn to_row(&self) -> (String, String) {
        let (key, value) = match self {
            DisplayEntry::Pair { key, value } => (key, value),
            DisplayEntry::Tuple(key, value) => (key, value),
        };
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        (key.clone(), text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> serde_json::Value {
        json!({
            "ball_phys": { "pos": [0, 0, 93], "vel": [0, 0, 0], "ang_vel": [0, 0, 0] },
            "cars": []
        })
    }

    #[test]
    fn test_minimal_snapshot_decodes() {
        let snap = Snapshot::from_value(minimal()).unwrap();
        assert_eq!(snap.ball_phys.pos, Vec3::new(0.0, 0.0, 93.0));
        assert!(snap.ball_phys.rotation.is_none());
        assert!(snap.cars.is_empty());
        assert!(snap.gamemode.is_none());
        assert!(snap.boost_pads.is_none());
    }

    #[test]
    fn test_missing_ball_is_malformed() {
        let err = Snapshot::from_value(json!({ "cars": [] })).unwrap_err();
        assert!(matches!(err, SnapshotError::Json(_)));
    }

    #[test]
    fn test_half_orientation_is_malformed() {
        let mut v = minimal();
        v["ball_phys"]["forward"] = json!([1, 0, 0]);
        assert!(Snapshot::from_value(v).is_err());
    }

    #[test]
    fn test_car_required_fields() {
        let mut v = minimal();
        v["cars"] = json!([{
            "team_num": 1,
            "phys": { "pos": [0, 0, 17], "vel": [0, 0, 0], "ang_vel": [0, 0, 0] },
            "boost_amount": 33.0,
            "on_ground": true
        }]);
        // is_demoed missing
        assert!(Snapshot::from_value(v.clone()).is_err());

        v["cars"][0]["is_demoed"] = json!(false);
        let snap = Snapshot::from_value(v).unwrap();
        assert_eq!(snap.cars[0].team_num, Team::Orange);
        assert!(snap.cars[0].car_id.is_none());
    }

    #[test]
    fn test_bad_team_is_malformed() {
        let mut v = minimal();
        v["cars"] = json!([{
            "team_num": 2,
            "phys": { "pos": [0, 0, 17], "vel": [0, 0, 0], "ang_vel": [0, 0, 0] },
            "boost_amount": 33.0, "on_ground": true, "is_demoed": false
        }]);
        assert!(Snapshot::from_value(v).is_err());
    }

    #[test]
    fn test_display_entry_shapes() {
        let mut v = minimal();
        v["custom_info"] = json!([
            { "key": "Episode", "value": "42" },
            ["Step", "7"],
            { "key": "Reward", "value": 1.5 }
        ]);
        let snap = Snapshot::from_value(v).unwrap();
        let rows: Vec<_> = snap.custom_info.unwrap().iter().map(DisplayEntry::to_row).collect();
        assert_eq!(rows[0], ("Episode".to_string(), "42".to_string()));
        assert_eq!(rows[1], ("Step".to_string(), "7".to_string()));
        assert_eq!(rows[2], ("Reward".to_string(), "1.5".to_string()));
    }

    #[test]
    fn test_empty_datagram() {
        assert!(matches!(Snapshot::from_slice(b"  \n"), Err(SnapshotError::Empty)));
        assert!(matches!(Snapshot::from_slice(b"{"), Err(SnapshotError::Json(_))));
    }
}
