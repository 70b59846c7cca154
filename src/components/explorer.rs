//! Wires canvas clicks to the graph controller and fetches on demand.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::info;

use super::force_graph::{CanvasSnapshot, ForceGraphCanvas};
use crate::config::{ExplorationMode, ExplorerConfig, LayoutBackend};
use crate::data::StaticDataClient;
use crate::graph::{GraphController, NodeId, driver};

fn publish(controller: &RefCell<GraphController>, snapshot: RwSignal<CanvasSnapshot>) {
	let next = CanvasSnapshot::from_controller(&controller.borrow());
	// The explorer may have been unmounted while a fetch was in flight.
	let _ = snapshot.try_set(next);
}

/// Loads names and the root player's seasons into a freshly reset graph.
fn bootstrap(
	controller: Rc<RefCell<GraphController>>,
	client: Rc<StaticDataClient>,
	snapshot: RwSignal<CanvasSnapshot>,
) {
	spawn_local(async move {
		let root = controller.borrow().config().root_player_id;
		if controller.borrow().names().is_empty() {
			driver::load_player_names(&controller, &*client).await;
		}
		driver::expand_player(&controller, &*client, root).await;
		publish(&controller, snapshot);
	});
}

#[component]
pub fn Explorer(config: ExplorerConfig) -> impl IntoView {
	info!(
		"exploring from player {} ({:?} mode)",
		config.root_player_id, config.mode
	);
	let live = config.layout_backend == LayoutBackend::Live;
	let mode_label = match config.mode {
		ExplorationMode::Normal => "Click a team to open its roster, click it again to close it.",
		ExplorationMode::Path => "Each click narrows the graph to the branch you followed.",
	};
	let client = Rc::new(StaticDataClient::new(&config.data_base_url));
	let controller = Rc::new(RefCell::new(GraphController::new(config)));
	let snapshot = RwSignal::new(CanvasSnapshot::from_controller(&controller.borrow()));

	bootstrap(controller.clone(), client.clone(), snapshot);

	let (click_ctrl, click_client) = (controller.clone(), client.clone());
	let on_node_click: Rc<dyn Fn(String)> = Rc::new(move |raw: String| {
		let id = NodeId::from_raw(raw);
		let pending = click_ctrl.borrow_mut().click(&id);
		publish(&click_ctrl, snapshot);
		if let Some(pending) = pending {
			let (controller, client) = (click_ctrl.clone(), click_client.clone());
			spawn_local(async move {
				driver::fulfil(&controller, &*client, pending).await;
				publish(&controller, snapshot);
			});
		}
	});

	let (reset_ctrl, reset_client) = (controller.clone(), client.clone());
	let on_reset = move |_| {
		reset_ctrl.borrow_mut().reset();
		publish(&reset_ctrl, snapshot);
		bootstrap(reset_ctrl.clone(), reset_client.clone(), snapshot);
	};

	let selected = move || {
		snapshot.with(|s| s.selected_label.clone().unwrap_or_else(|| "Nothing selected".into()))
	};

	view! {
		<div class="fullscreen-graph">
			<ForceGraphCanvas snapshot=snapshot on_node_click=on_node_click live=live fullscreen=true />
			<div class="graph-overlay">
				<h1>"Roster Graph"</h1>
				<p class="subtitle">{mode_label}</p>
				<p class="selection">{selected}</p>
				<button on:click=on_reset>"Reset"</button>
			</div>
		</div>
	}
}
