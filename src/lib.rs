//! C4 architecture diagram rendering.
//!
//! The pipeline resolves a view of a Structurizr-style workspace, collects
//! the visible elements and relationships under the active filters, places
//! them on a tiered grid, routes edges between box boundaries and produces a
//! [`scene::Scene`] that serializes to SVG. [`session::DiagramSession`] wraps
//! the pipeline with the interactive state a viewer keeps between renders.

#[cfg(feature = "cli")]
pub mod cli;
pub mod collect;
pub mod config;
pub mod filter;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod parser;
pub mod render;
pub mod scene;
pub mod session;
pub mod style;
pub mod summary;
pub mod text_metrics;
pub mod theme;
pub mod view;
pub mod viewport;

pub use collect::{collect_elements, collect_relationships, collect_view, retain_connected};
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use filter::{FilterKey, FilterPatch, Filters};
pub use layout::{compute_layout, fill_missing, translate};
pub use model::Workspace;
pub use parser::{ParseError, parse_workspace};
pub use render::render_svg;
pub use scene::{Scene, build_scene};
pub use session::DiagramSession;
pub use theme::Theme;
pub use view::{ViewType, resolve_view};
