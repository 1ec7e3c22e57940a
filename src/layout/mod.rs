//! Tiered grid layout.
//!
//! Elements are banded by kind: people on the first row, software systems on
//! the next, then containers and components as grids that share one baseline.
//! Placement is a single deterministic pass with no refinement.

pub mod routing;
pub mod text;
pub(crate) mod types;

pub use routing::{EdgeRoute, connection_point, route_edge};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{Element, ElementKind};
use log::{debug, trace};
use std::collections::HashSet;

/// Raw grid positions for every element, keyed by id. The result depends only
/// on the element order and the config.
pub fn compute_layout(elements: &[Element], config: &LayoutConfig) -> LayoutMap {
    let mut layout = LayoutMap::new();
    let column_step = config.node_width + config.horizontal_gap;

    let tier = |kind: ElementKind| -> Vec<&Element> {
        elements.iter().filter(|e| e.kind == kind).collect()
    };
    let people = tier(ElementKind::Person);
    let systems = tier(ElementKind::SoftwareSystem);
    let containers = tier(ElementKind::Container);
    let components = tier(ElementKind::Component);

    let mut cursor_y = 0.0f32;

    for (idx, person) in people.iter().enumerate() {
        layout.insert(
            person.id.clone(),
            LayoutEntry::new(
                idx as f32 * column_step,
                cursor_y,
                config.node_width,
                config.person_height,
            ),
        );
    }
    if !people.is_empty() {
        cursor_y += config.person_row_advance;
    }

    for (idx, system) in systems.iter().enumerate() {
        layout.insert(
            system.id.clone(),
            LayoutEntry::new(
                idx as f32 * column_step,
                cursor_y,
                config.node_width,
                config.node_height,
            ),
        );
    }
    if !systems.is_empty() {
        cursor_y += config.vertical_gap + config.node_height;
    }

    // Containers and components both start at `cursor_y`; neither band moves it.
    place_grid(
        &mut layout,
        &containers,
        GridSpec {
            max_columns: config.container_columns,
            baseline: cursor_y,
            column_step,
            row_step: config.node_height + config.vertical_gap,
            width: config.node_width,
            height: config.node_height,
        },
    );
    place_grid(
        &mut layout,
        &components,
        GridSpec {
            max_columns: config.component_columns,
            baseline: cursor_y,
            column_step,
            row_step: config.node_height + config.component_row_gap,
            width: config.node_width,
            height: config.component_height,
        },
    );

    debug!(
        people = people.len(),
        systems = systems.len(),
        containers = containers.len(),
        components = components.len();
        "Computed grid layout"
    );
    layout
}

struct GridSpec {
    max_columns: usize,
    baseline: f32,
    column_step: f32,
    row_step: f32,
    width: f32,
    height: f32,
}

/// Number of columns a tier of `count` elements uses under `max_columns`.
pub fn grid_columns(count: usize, max_columns: usize) -> usize {
    count.min(max_columns).max(1)
}

fn place_grid(layout: &mut LayoutMap, elements: &[&Element], spec: GridSpec) {
    let columns = grid_columns(elements.len(), spec.max_columns);
    for (idx, element) in elements.iter().enumerate() {
        let row = idx / columns;
        let col = idx % columns;
        layout.insert(
            element.id.clone(),
            LayoutEntry::new(
                col as f32 * spec.column_step,
                spec.baseline + row as f32 * spec.row_step,
                spec.width,
                spec.height,
            ),
        );
    }
}

/// Reconciles a stored layout with the current visible set: entries for
/// elements no longer visible are dropped, and elements without an entry get
/// their fresh grid position. Existing entries (dragged ones included) are
/// kept as they are. Returns the number of entries added.
pub fn fill_missing(layout: &mut LayoutMap, elements: &[Element], config: &LayoutConfig) -> usize {
    let visible: HashSet<&str> = elements.iter().map(|e| e.id.as_str()).collect();
    layout.retain(|id, _| visible.contains(id.as_str()));

    if layout.len() == visible.len() {
        return 0;
    }
    let fresh = compute_layout(elements, config);
    let mut added = 0;
    for (id, entry) in fresh {
        if !layout.contains_key(&id) {
            trace!(element = id.as_str(); "Placing newly visible element");
            layout.insert(id, entry);
            added += 1;
        }
    }
    added
}

/// Translates raw positions so the bounding box starts at `(padding, padding)`
/// and sizes the viewBox to include the padding on every side.
pub fn translate(entries: &LayoutMap, config: &LayoutConfig) -> Layout {
    let padding = config.padding;
    let bounds = Bounds::of(entries);
    let dx = padding - bounds.min_x;
    let dy = padding - bounds.min_y;
    Layout {
        entries: entries
            .iter()
            .map(|(id, entry)| (id.clone(), entry.translated(dx, dy)))
            .collect(),
        width: bounds.width() + 2.0 * padding,
        height: bounds.height() + 2.0 * padding,
    }
}
