//! Island root descriptors.
//!
//! Hydrated and client-only islands are returned to the template engine as an
//! [`IslandRoot`] rather than a marker. The root is both a structured value
//! (consumed by the hydration bootstrap generator) and the mount-point markup
//! the template embeds in the page.
//!
//! ```text
//! <reinhardt-island data-rh-island="i3fa91c02-4" data-rh-component="_islands/Counter.jsx"
//!     data-rh-page="src/index.md" data-rh-props="[&quot;p3fa91c02-3&quot;]"
//!     data-rh-load="[&quot;visible&quot;]" data-rh-renderer="react"></reinhardt-island>
//! ```
//!
//! List attributes hold JSON arrays so that tokens containing whitespace, such
//! as media queries, decode back to the exact list the caller passed.

use crate::ids::{IslandId, PropId};
use crate::renderer::RendererAdapter;
use crate::resolver::IslandPath;
use crate::session::PageKey;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::sync::Arc;

/// Attribute carrying the island id.
pub const ISLAND_ATTR_ID: &str = "data-rh-island";

/// Attribute carrying the resolved component path.
pub const ISLAND_ATTR_COMPONENT: &str = "data-rh-component";

/// Attribute carrying the page key.
pub const ISLAND_ATTR_PAGE: &str = "data-rh-page";

/// Attribute carrying the prop ids as a JSON array.
pub const ISLAND_ATTR_PROPS: &str = "data-rh-props";

/// Attribute carrying the load conditions as a JSON array.
pub const ISLAND_ATTR_LOAD: &str = "data-rh-load";

/// Attribute carrying the renderer name.
pub const ISLAND_ATTR_RENDERER: &str = "data-rh-renderer";

/// Boolean attribute present on client-only islands.
pub const ISLAND_ATTR_CLIENT_ONLY: &str = "data-rh-client-only";

/// Inputs of [`build_island_root`].
#[derive(Debug, Clone)]
pub struct IslandRootParams {
	pub island_id: IslandId,
	pub island_path: IslandPath,
	pub load_conditions: Vec<String>,
	pub page_key: PageKey,
	pub prop_ids: Vec<PropId>,
	pub is_client_only: bool,
	pub renderer: Option<Arc<dyn RendererAdapter>>,
}

/// Mount point of a hydrated or client-only island.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IslandRoot {
	pub island_id: IslandId,
	pub island_path: IslandPath,
	/// Trigger strategies in caller order.
	pub load_conditions: Vec<String>,
	pub page_key: PageKey,
	pub prop_ids: Vec<PropId>,
	pub is_client_only: bool,
	/// `None` when no renderer handles the island's extension.
	#[serde(serialize_with = "serialize_renderer_name")]
	pub renderer: Option<Arc<dyn RendererAdapter>>,
}

/// Packages the given fields into an [`IslandRoot`], preserving list order.
pub fn build_island_root(params: IslandRootParams) -> IslandRoot {
	let IslandRootParams {
		island_id,
		island_path,
		load_conditions,
		page_key,
		prop_ids,
		is_client_only,
		renderer,
	} = params;

	IslandRoot {
		island_id,
		island_path,
		load_conditions,
		page_key,
		prop_ids,
		is_client_only,
		renderer,
	}
}

impl IslandRoot {
	/// Name of the renderer, if one was found.
	pub fn renderer_name(&self) -> Option<&str> {
		self.renderer.as_deref().map(|renderer| renderer.name())
	}

	/// Generates the mount point attributes in a stable order.
	pub fn to_attrs(&self) -> Vec<(String, String)> {
		let mut attrs = vec![
			(ISLAND_ATTR_ID.to_string(), self.island_id.to_string()),
			(ISLAND_ATTR_COMPONENT.to_string(), self.island_path.to_string()),
			(ISLAND_ATTR_PAGE.to_string(), self.page_key.to_string()),
		];

		if !self.prop_ids.is_empty() {
			let ids = self.prop_ids.iter().map(PropId::as_str);
			attrs.push((ISLAND_ATTR_PROPS.to_string(), json_list(ids)));
		}

		if !self.load_conditions.is_empty() {
			let conditions = self.load_conditions.iter().map(String::as_str);
			attrs.push((ISLAND_ATTR_LOAD.to_string(), json_list(conditions)));
		}

		if let Some(name) = self.renderer_name() {
			attrs.push((ISLAND_ATTR_RENDERER.to_string(), name.to_string()));
		}

		if self.is_client_only {
			attrs.push((ISLAND_ATTR_CLIENT_ONLY.to_string(), String::new()));
		}

		attrs
	}

	/// Generates the HTML attribute string for this root.
	pub fn to_attr_string(&self) -> String {
		self.to_attrs()
			.iter()
			.map(|(k, v)| format!("{}=\"{}\"", k, html_escape_attr(v)))
			.collect::<Vec<_>>()
			.join(" ")
	}

	/// Renders the empty mount point element.
	pub fn to_html(&self, host_element: &str) -> String {
		format!(
			"<{host} {attrs}></{host}>",
			host = host_element,
			attrs = self.to_attr_string()
		)
	}
}

fn serialize_renderer_name<S>(
	renderer: &Option<Arc<dyn RendererAdapter>>,
	serializer: S,
) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	match renderer {
		Some(renderer) => serializer.serialize_some(renderer.name()),
		None => serializer.serialize_none(),
	}
}

fn json_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
	Value::Array(items.map(Value::from).collect()).to_string()
}

/// Escapes a string for use in an HTML attribute value.
fn html_escape_attr(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('"', "&quot;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}
