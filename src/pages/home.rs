use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::explorer::Explorer;
use crate::config::ExplorerConfig;

/// Default Home Page
///
/// The explorer is configured from the URL query, e.g.
/// `/?player=2544&mode=path&limit=all&layout=live&pin=off`.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_query_map()
		.with_untracked(|q| ExplorerConfig::default().apply_query(|key| q.get(key)));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<Explorer config=config />
		</ErrorBoundary>
	}
}
