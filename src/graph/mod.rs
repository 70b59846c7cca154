//! Incremental exploration graph: storage, expansion, collapse and layout.
//!
//! [`GraphController`] owns the [`GraphState`] and is the only thing that
//! mutates it; rendering code reads snapshots through
//! [`GraphController::state`].

pub mod collapse;
pub mod controller;
pub mod driver;
pub mod expansion;
pub mod layout;
pub mod store;
pub mod types;

pub use controller::{GraphController, PendingFetch, PlayerRequest, RequestKey, TeamSeasonRequest};
pub use layout::{LayoutConfig, LayoutEngine};
pub use store::{GraphState, PathTrail};
pub use types::{Endpoint, Link, LinkKey, Node, NodeId, NodeKind, PlayerId, Point, TeamId, TeamSeasonKey};
