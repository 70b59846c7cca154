//! Static data resources consumed by the explorer.

mod client;
#[cfg(test)]
pub(crate) mod memory;
mod records;

pub use client::{
	DataSource, FetchError, FetchResult, PLAYER_NAMES_RESOURCE, StaticDataClient, player_resource,
	roster_resource,
};
pub use records::{CareerRecord, PlayerNameIndex, RosterRecord};
