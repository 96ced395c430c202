//! Reinhardt Islands - island registration and prop passing for static builds
//!
//! While a page template is evaluated, authors mark regions of the generated
//! markup as *islands* (independently hydratable component mounts) and declare
//! named *props* those islands need. Template output is plain text produced
//! bottom-up, so this crate carries that metadata through inline markers and
//! records everything in page-keyed registries that a later rendering and
//! hydration pass reads.
//!
//! ## Architecture
//!
//! - [`markers`]: encode/decode of the inline island and prop markers
//! - [`resolver`]: island reference → canonical path and renderer lookup key
//! - [`props`]: per-page prop store and client prop marking
//! - [`registry`]: server-only, hydrated and client-only island registration
//! - [`root`]: island root descriptors and mount-point markup
//! - [`session`]: the [`BuildSession`] owning all registries of one build
//! - [`shortcodes`]: Tera hooks exposing the operations to templates
//!
//! ## Example
//!
//! ```
//! use reinhardt_islands::{BuildSession, IslandsConfig, PageKey, PropValue, RendererRegistry};
//! use reinhardt_islands::markers::encode_prop_marker;
//!
//! let session = BuildSession::new(IslandsConfig::new("components"), RendererRegistry::new());
//! let page = PageKey::new("src/index.md");
//!
//! let count = session.add_prop(&page, "count", PropValue::new(3));
//! let inner = format!("{} clicks", encode_prop_marker(&count.id));
//!
//! let root = session
//!     .register_hydrated_island(&page, &inner, "Counter.jsx", ["visible"])
//!     .unwrap();
//! assert_eq!(root.island_path.as_str(), "components/Counter.jsx");
//! assert_eq!(root.prop_ids, vec![count.id.clone()]);
//! assert!(session.prop_store(&page).unwrap().is_used_on_client(&count.id));
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod markers;
pub mod props;
pub mod registry;
pub mod renderer;
pub mod resolver;
pub mod root;
pub mod session;
pub mod shortcodes;

pub use config::IslandsConfig;
pub use error::{IslandError, IslandResult};
pub use ids::{IdGenerator, IslandId, PropId};
pub use props::{PropRecord, PropStore, PropValue};
pub use registry::{IslandKind, IslandOutput, IslandRecord, IslandRequest, IslandSet, StoredIslandKind};
pub use renderer::{RendererAdapter, RendererRegistry};
pub use resolver::{IslandPath, extension_of, resolve_island_path};
pub use root::{IslandRoot, IslandRootParams, build_island_root};
pub use session::{BuildSession, PageIslands, PageKey};
pub use shortcodes::PageShortcodes;
