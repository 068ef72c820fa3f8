//! State synchronization module
//!
//! Turns a stream of discrete snapshots into render-time state:
//! - Snapshots are decoded and validated once at the boundary
//! - Each body keeps its last two samples for interpolation
//! - Position discontinuities suppress interpolation instead of smearing
//! - No rendering, windowing or socket dependencies

pub mod boost;
pub mod car;
pub mod orient;
pub mod overlay;
pub mod phys;
pub mod rewards;
pub mod snapshot;
pub mod view;
pub mod world;

pub use boost::{BoostPad, BoostPadRegistry, PadUpdate, STANDARD_PAD_LOCATIONS};
pub use car::{CarState, Controls, Team, UNKNOWN_CAR_ID};
pub use overlay::{DebugLine, OverlayError};
pub use phys::PhysState;
pub use rewards::{RewardLedger, RewardRow};
pub use snapshot::{Snapshot, SnapshotError};
pub use view::{BodyFrame, CarFrame, Frame, PadFrame};
pub use world::{MergeError, RosterSync, WorldState};
