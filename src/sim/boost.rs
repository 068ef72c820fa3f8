//! Boost pad layout and activation
//!
//! Producers describe pads in one of two ways: an explicit list of pad
//! objects, or the legacy parallel `boost_pad_locations`/`boost_pad_states`
//! arrays. Once an explicit list has been seen the registry never falls back
//! to the legacy fields for the rest of the session.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::snapshot::{PadSample, Snapshot};

/// Standard soccar arena pad layout
pub const STANDARD_PAD_LOCATIONS: [[f32; 3]; 34] = [
    [0.0, -4240.0, 70.0],
    [-1792.0, -4184.0, 70.0],
    [1792.0, -4184.0, 70.0],
    [-3072.0, -4096.0, 73.0],
    [3072.0, -4096.0, 73.0],
    [-940.0, -3308.0, 70.0],
    [940.0, -3308.0, 70.0],
    [0.0, -2816.0, 70.0],
    [-3584.0, -2484.0, 70.0],
    [3584.0, -2484.0, 70.0],
    [-1788.0, -2300.0, 70.0],
    [1788.0, -2300.0, 70.0],
    [-2048.0, -1036.0, 70.0],
    [0.0, -1024.0, 70.0],
    [2048.0, -1036.0, 70.0],
    [-3584.0, 0.0, 73.0],
    [-1024.0, 0.0, 70.0],
    [1024.0, 0.0, 70.0],
    [3584.0, 0.0, 73.0],
    [-2048.0, 1036.0, 70.0],
    [0.0, 1024.0, 70.0],
    [2048.0, 1036.0, 70.0],
    [-1788.0, 2300.0, 70.0],
    [1788.0, 2300.0, 70.0],
    [-3584.0, 2484.0, 70.0],
    [3584.0, 2484.0, 70.0],
    [0.0, 2816.0, 70.0],
    [-940.0, 3310.0, 70.0],
    [940.0, 3308.0, 70.0],
    [-3072.0, 4096.0, 73.0],
    [3072.0, 4096.0, 73.0],
    [-1792.0, 4184.0, 70.0],
    [1792.0, 4184.0, 70.0],
    [0.0, 4240.0, 70.0],
];

/// A single boost pad
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostPad {
    pub position: Vec3,
    /// Activation, `None` when the producer did not say
    pub active: Option<bool>,
    pub index: Option<i64>,
    pub prev_locked_car_id: Option<i64>,
}

impl BoostPad {
    /// Pad at `position` with unknown activation and no metadata
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            active: None,
            index: None,
            prev_locked_car_id: None,
        }
    }

    /// Activation for display; unknown counts as active
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }
}

/// Which representation last updated the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadUpdate {
    /// Explicit pad object list
    Explicit,
    /// Legacy location/state arrays or the built-in layout
    Legacy,
    /// Left untouched because an explicit list was seen earlier
    Held,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostPadRegistry {
    pub pads: Vec<BoostPad>,
    /// Sticky: set once an explicit pad list has been received
    pub has_seen_explicit_list: bool,
}

impl Default for BoostPadRegistry {
    fn default() -> Self {
        Self {
            pads: standard_layout(),
            has_seen_explicit_list: false,
        }
    }
}

/// Pads of the standard layout, activation unknown
pub fn standard_layout() -> Vec<BoostPad> {
    STANDARD_PAD_LOCATIONS
        .iter()
        .map(|&p| BoostPad::at(Vec3::from_array(p)))
        .collect()
}

impl BoostPadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }

    /// Reconcile the pad list with a snapshot. `gamemode` is already lower-cased.
    pub fn reconcile(&mut self, snapshot: &Snapshot, gamemode: &str) -> PadUpdate {
        if let Some(list) = &snapshot.boost_pads {
            self.apply_explicit(list);
            return PadUpdate::Explicit;
        }
        if self.has_seen_explicit_list {
            return PadUpdate::Held;
        }
        self.apply_legacy(
            snapshot.boost_pad_locations.as_deref(),
            snapshot.boost_pad_states.as_deref(),
            gamemode,
        );
        PadUpdate::Legacy
    }

    /// Take an explicit pad list as the new authoritative layout.
    ///
    /// Pads without a position are dropped. Indexed pads come first in index
    /// order; unindexed pads keep their received order after them.
    pub fn apply_explicit(&mut self, list: &[Option<PadSample>]) {
        if !self.has_seen_explicit_list {
            log::info!("explicit boost pad list received; ignoring legacy pad fields from now on");
        }

        let mut pads: Vec<BoostPad> = list
            .iter()
            .flatten()
            .filter_map(|pad| {
                Some(BoostPad {
                    position: pad.pos?,
                    active: Some(pad.is_active),
                    index: pad.index,
                    prev_locked_car_id: pad.prev_locked_car_id,
                })
            })
            .collect();
        // Stable sort keeps appearance order among unindexed pads
        pads.sort_by_key(|p| (p.index.is_none(), p.index));

        self.pads = pads;
        self.has_seen_explicit_list = true;
    }

    /// Apply the legacy location/state arrays
    pub fn apply_legacy(&mut self, locations: Option<&[Vec3]>, states: Option<&[bool]>, gamemode: &str) {
        match locations {
            Some(locations) => {
                self.pads = locations.iter().map(|&p| BoostPad::at(p)).collect();
            }
            None if gamemode == "soccar" => {
                if self.pads.len() != STANDARD_PAD_LOCATIONS.len() {
                    self.pads = standard_layout();
                }
            }
            None => self.pads.clear(),
        }

        // Legacy producers carry no per-pad metadata
        for pad in &mut self.pads {
            pad.index = None;
            pad.prev_locked_car_id = None;
        }

        match states {
            Some(states) if states.len() == self.pads.len() => {
                for (pad, &active) in self.pads.iter_mut().zip(states) {
                    pad.active = Some(active);
                }
            }
            other => {
                if let Some(states) = other {
                    log::debug!(
                        "boost pad state count {} does not match {} pads; activation unknown",
                        states.len(),
                        self.pads.len()
                    );
                }
                for pad in &mut self.pads {
                    pad.active = None;
                }
            }
        }
    }

    /// Whether pad `idx` is a large (100 boost) pad in `gamemode`
    pub fn is_big(&self, idx: usize, gamemode: Option<&str>) -> bool {
        let Some(pad) = self.pads.get(idx) else {
            return false;
        };
        is_big_pad(pad.position, gamemode)
    }
}

/// Large pads sit slightly higher than small ones; hoops uses a lower cutoff
pub fn is_big_pad(position: Vec3, gamemode: Option<&str>) -> bool {
    // heatseeker shares the soccar arena
    let hoops = gamemode.is_some_and(|m| m.eq_ignore_ascii_case("hoops"));
    if hoops {
        position.z >= 70.0
    } else {
        position.z >= 73.0
    }
}
