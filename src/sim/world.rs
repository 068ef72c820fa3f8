//! Top-level reconstructed world and the snapshot merge
//!
//! `merge` takes `&mut self` and runs to completion, so a renderer holding
//! `&WorldState` (or a [`Frame`](super::Frame) built from it) can never see a
//! half-applied update.

use serde::Serialize;
use thiserror::Error;

use super::boost::{BoostPadRegistry, PadUpdate};
use super::car::CarState;
use super::overlay::{DebugLine, OverlayError, parse_lines};
use super::phys::PhysState;
use super::snapshot::{CarSample, DisplayEntry, Snapshot, SnapshotError};
use crate::consts::DEFAULT_GAMEMODE;

#[derive(Debug, Error)]
pub enum MergeError {
    /// Nothing was applied
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    /// Everything but the overlay was applied; the overlay was cleared
    #[error("debug overlay rejected: {0}")]
    Overlay(#[from] OverlayError),
    /// Nothing was applied
    #[error("stale snapshot seq {seq}, last accepted {last}")]
    Stale { seq: u64, last: u64 },
}

impl MergeError {
    /// Whether ball, car and pad data from the snapshot were still applied
    pub fn state_applied(&self) -> bool {
        matches!(self, MergeError::Overlay(_))
    }
}

/// How the car list was brought in line with a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterSync {
    /// Same car count: every car updated in place by list position
    InPlace,
    /// Car count changed: every car rebuilt, losing interpolation and reward history
    Rebuilt { from: usize, to: usize },
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldState {
    pub ball: PhysState,
    pub cars: Vec<CarState>,
    pub boost: BoostPadRegistry,
    /// Lower-cased gamemode of the last merge; `None` before the first one
    pub gamemode: Option<String>,
    pub debug_lines: Vec<DebugLine>,
    pub display_rows: Vec<(String, String)>,

    /// Time of the last receive in seconds, -1 before any
    pub recv_time: f64,
    /// Seconds between the last two receives, -1 until known
    pub recv_interval: f64,

    #[serde(skip)]
    reject_stale: bool,
    #[serde(skip)]
    last_seq: Option<u64>,
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            ball: PhysState::default(),
            cars: Vec::new(),
            boost: BoostPadRegistry::default(),
            gamemode: None,
            debug_lines: Vec::new(),
            display_rows: Vec::new(),
            recv_time: -1.0,
            recv_interval: -1.0,
            reject_stale: false,
            last_seq: None,
        }
    }
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip snapshots whose `seq` is not newer than the last accepted one.
    ///
    /// Off by default: the last packet received always wins.
    pub fn with_stale_rejection(mut self, reject: bool) -> Self {
        self.reject_stale = reject;
        self
    }

    /// Decode a datagram and merge it
    pub fn ingest_bytes(&mut self, bytes: &[u8]) -> Result<(), MergeError> {
        let snapshot = Snapshot::from_slice(bytes)?;
        self.merge(&snapshot)
    }

    /// Decode and merge a datagram received at `now` seconds.
    ///
    /// Receive timing only advances when the snapshot's state was applied, so
    /// a rejected packet leaves the rendered interpolation untouched.
    pub fn receive(&mut self, bytes: &[u8], now: f64) -> Result<(), MergeError> {
        let result = self.ingest_bytes(bytes);
        let applied = match &result {
            Ok(()) => true,
            Err(e) => e.state_applied(),
        };
        if applied {
            self.note_received(now);
        }
        result
    }

    /// Merge a decoded snapshot into the world.
    ///
    /// An overlay that fails validation is cleared and reported as
    /// [`MergeError::Overlay`] after the rest of the snapshot has been applied.
    pub fn merge(&mut self, snapshot: &Snapshot) -> Result<(), MergeError> {
        if let (true, Some(seq), Some(last)) = (self.reject_stale, snapshot.seq, self.last_seq) {
            if seq <= last {
                return Err(MergeError::Stale { seq, last });
            }
        }

        // Validate before touching anything
        let overlay = parse_lines(snapshot.render.as_ref());

        self.ball.ingest(&snapshot.ball_phys);

        if let RosterSync::Rebuilt { from, to } = self.sync_roster(&snapshot.cars) {
            log::info!("car count changed {from} -> {to}; rebuilt all cars");
        }

        let gamemode = snapshot
            .gamemode
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_else(|| DEFAULT_GAMEMODE.to_string());
        if self.boost.reconcile(snapshot, &gamemode) == PadUpdate::Held
            && (snapshot.boost_pad_locations.is_some() || snapshot.boost_pad_states.is_some())
        {
            log::trace!("explicit pad list already seen; legacy pad fields ignored");
        }
        self.gamemode = Some(gamemode);

        self.display_rows = snapshot
            .custom_info
            .iter()
            .flatten()
            .map(DisplayEntry::to_row)
            .collect();

        if snapshot.seq.is_some() {
            self.last_seq = snapshot.seq;
        }

        match overlay {
            Ok(lines) => {
                self.debug_lines = lines;
                Ok(())
            }
            Err(e) => {
                self.debug_lines.clear();
                Err(e.into())
            }
        }
    }

    /// Bring the car list in line with the snapshot.
    ///
    /// Cars are matched by list position only. When the count changes the
    /// whole list is rebuilt from the snapshot; rosters almost never change
    /// mid-episode, so continuity is not tracked across that boundary.
    pub fn sync_roster(&mut self, samples: &[CarSample]) -> RosterSync {
        if self.cars.len() != samples.len() {
            let from = self.cars.len();
            self.cars = samples.iter().map(CarState::from_sample).collect();
            return RosterSync::Rebuilt { from, to: samples.len() };
        }

        for (idx, (car, sample)) in self.cars.iter_mut().zip(samples).enumerate() {
            if car.ingest(sample) {
                log::debug!("car {idx} (id {}) jumped; episode rewards reset", car.id);
            }
        }
        RosterSync::InPlace
    }

    /// Record a receive at `now` seconds
    pub fn note_received(&mut self, now: f64) {
        if self.recv_time >= 0.0 {
            self.recv_interval = now - self.recv_time;
        }
        self.recv_time = now;
    }

    /// Interpolation ratio for a render at `now` seconds
    pub fn interp_ratio(&self, now: f64) -> f32 {
        crate::interp_ratio(now, self.recv_time, self.recv_interval)
    }

    /// Spin every body whose last sample had no orientation by its angular
    /// velocity over `dt`
    pub fn advance_rotation(&mut self, dt: f32) {
        if !self.ball.has_rotation {
            self.ball.advance_rotation(dt);
        }
        for car in &mut self.cars {
            if !car.phys.has_rotation {
                car.phys.advance_rotation(dt);
            }
        }
    }

    pub fn last_seq(&self) -> Option<u64> {
        self.last_seq
    }
}
