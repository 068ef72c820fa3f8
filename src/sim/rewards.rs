//! Per-car reward bookkeeping
//!
//! `instant` mirrors the last received frame, `cumulative` accumulates over
//! the episode until a reset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Smallest scale a reward bar is drawn against
pub const MIN_BAR_SCALE: f32 = 0.1;

/// One row of the reward panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardRow {
    pub name: String,
    pub instant: f32,
    pub cumulative: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardLedger {
    /// This frame's named contributions, in received order
    pub instant: Vec<(String, f32)>,
    pub instant_total: f32,
    /// Episode totals per reward name
    pub cumulative: BTreeMap<String, f32>,
    pub cumulative_total: f32,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the instant frame and add it into the episode totals
    pub fn ingest<I>(&mut self, entries: I, total: f32)
    where
        I: IntoIterator<Item = (String, f32)>,
    {
        self.instant.clear();
        for (name, value) in entries {
            *self.cumulative.entry(name.clone()).or_insert(0.0) += value;
            self.instant.push((name, value));
        }
        self.instant_total = total;
        self.cumulative_total += total;
    }

    /// Clear episode totals; the instant frame is kept
    pub fn reset(&mut self) {
        self.cumulative.clear();
        self.cumulative_total = 0.0;
    }

    /// Episode total for a single reward name
    pub fn cumulative_of(&self, name: &str) -> f32 {
        self.cumulative.get(name).copied().unwrap_or(0.0)
    }

    /// Instant and cumulative value per reward, in instant order
    pub fn breakdown(&self) -> Vec<RewardRow> {
        self.instant
            .iter()
            .map(|(name, value)| RewardRow {
                name: name.clone(),
                instant: *value,
                cumulative: self.cumulative_of(name),
            })
            .collect()
    }

    /// Bar scales (max |instant|, max |cumulative|), never below `MIN_BAR_SCALE`
    pub fn bar_scale(&self) -> (f32, f32) {
        let instant = self
            .instant
            .iter()
            .map(|(_, v)| v.abs())
            .fold(MIN_BAR_SCALE, f32::max);
        let cumulative = self
            .cumulative
            .values()
            .map(|v| v.abs())
            .fold(MIN_BAR_SCALE, f32::max);
        (instant, cumulative)
    }
}
