//! Async glue between the controller and a [`DataSource`].
//!
//! The controller is borrowed only around the synchronous request and
//! completion steps, never across an `.await`, so other clicks can be
//! handled while a fetch is outstanding.

use std::cell::RefCell;

use log::warn;

use super::controller::{GraphController, PendingFetch};
use super::types::{NodeId, PlayerId, TeamSeasonKey};
use crate::data::DataSource;

/// Runs a fetch the controller asked for and applies the result.
pub async fn fulfil<S: DataSource>(
	controller: &RefCell<GraphController>,
	source: &S,
	pending: PendingFetch,
) -> bool {
	match pending {
		PendingFetch::Player(request) => {
			let result = source.player_career(request.player_id).await;
			controller.borrow_mut().complete_player(request, result)
		}
		PendingFetch::TeamSeason(request) => {
			let result = source.team_roster(&request.key).await;
			controller.borrow_mut().complete_team_season(request, result)
		}
	}
}

/// Dispatches a node click and runs whatever expansion it triggers.
pub async fn click<S: DataSource>(
	controller: &RefCell<GraphController>,
	source: &S,
	id: &NodeId,
) -> bool {
	let pending = controller.borrow_mut().click(id);
	match pending {
		Some(pending) => fulfil(controller, source, pending).await,
		None => false,
	}
}

/// Expands a player unless it is done or in flight.
pub async fn expand_player<S: DataSource>(
	controller: &RefCell<GraphController>,
	source: &S,
	player_id: PlayerId,
) -> bool {
	let request = controller.borrow_mut().request_player(player_id);
	match request {
		Some(request) => fulfil(controller, source, PendingFetch::Player(request)).await,
		None => false,
	}
}

/// Loads a roster unless it is done or in flight.
pub async fn expand_team_season<S: DataSource>(
	controller: &RefCell<GraphController>,
	source: &S,
	key: TeamSeasonKey,
	team_abbr: &str,
) -> bool {
	let request = controller.borrow_mut().request_team_season(key, team_abbr);
	match request {
		Some(request) => fulfil(controller, source, PendingFetch::TeamSeason(request)).await,
		None => false,
	}
}

/// Loads the name index. Failure only costs labels.
pub async fn load_player_names<S: DataSource>(
	controller: &RefCell<GraphController>,
	source: &S,
) -> bool {
	match source.player_names().await {
		Ok(names) => {
			controller.borrow_mut().merge_names(names);
			true
		}
		Err(err) => {
			warn!("player names unavailable: {err}");
			false
		}
	}
}
