//! Host-facing command surface.
//!
//! A [`DiagramSession`] owns one workspace plus everything an interactive
//! viewer mutates: the selected view, filters, the stored layout and the
//! camera. Every command takes `&mut self` and runs synchronously.

use crate::collect::{ViewContents, collect_view};
use crate::config::Config;
use crate::filter::{FilterPatch, Filters};
use crate::layout::{LayoutMap, compute_layout, fill_missing, translate};
use crate::model::Workspace;
use crate::render::{ViewTransform, render_svg, render_svg_with_transform};
use crate::scene::{Scene, SceneOptions, build_scene};
use crate::style::StyleResolver;
use crate::view::{
    ViewType, ViewTypeSummary, available_view_types, resolve_view, view_description,
    views_in_category,
};
use crate::viewport::{FitPhase, LayoutState, Size, Vec2, ViewportState};
use log::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct DiagramSession {
    workspace: Workspace,
    config: Config,
    styles: StyleResolver,
    view_type: ViewType,
    view_key: Option<String>,
    filters: Filters,
    layout: LayoutState,
    viewport: ViewportState,
    /// ViewBox of the last render, used by `fit_to_screen`.
    diagram_size: Size,
}

impl DiagramSession {
    pub fn new(workspace: Workspace, config: Config) -> Self {
        let styles = StyleResolver::new(&workspace.views.configuration, &config.styles)
            .with_element_stroke(&config.theme.element_stroke);
        let view_type = available_view_types(&workspace)
            .first()
            .map(|summary| summary.view_type)
            .unwrap_or(ViewType::Landscape);
        let mut viewport = ViewportState::new();
        viewport.set_container(Size::new(config.render.width, config.render.height));
        Self {
            workspace,
            config,
            styles,
            view_type,
            view_key: None,
            filters: Filters::default(),
            layout: LayoutState::default(),
            viewport,
            diagram_size: Size::default(),
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Swaps in an updated model. The stored layout is kept and reconciled
    /// against the new visible set on the next render; it is dropped when the
    /// active view no longer exists.
    pub fn replace_workspace(&mut self, workspace: Workspace) {
        self.styles = StyleResolver::new(&workspace.views.configuration, &self.config.styles)
            .with_element_stroke(&self.config.theme.element_stroke);
        self.workspace = workspace;
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    pub fn view_key(&self) -> Option<&str> {
        self.view_key.as_deref()
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn layout(&self) -> &LayoutMap {
        self.layout.entries()
    }

    pub fn phase(&self) -> FitPhase {
        self.layout.phase()
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn zoom_percent(&self) -> u32 {
        self.viewport.zoom_percent()
    }

    pub fn selected(&self) -> Option<&str> {
        self.viewport.selected()
    }

    pub fn view_description(&self) -> String {
        view_description(&self.workspace, self.view_type, self.view_key.as_deref())
    }

    pub fn available_view_types(&self) -> Vec<ViewTypeSummary> {
        available_view_types(&self.workspace)
    }

    pub fn views_in_category(&self) -> Vec<(String, String)> {
        views_in_category(&self.workspace, self.view_type)
    }

    /// Switches the active view. Any change of type or key discards the stored
    /// layout, the selection and the fit state.
    pub fn select_view(&mut self, view_type: ViewType, key: Option<&str>) {
        if self.view_type == view_type && self.view_key.as_deref() == key {
            return;
        }
        info!(view_type = view_type.token(), key = key.unwrap_or(""); "Selecting view");
        self.view_type = view_type;
        self.view_key = key.map(str::to_string);
        self.layout.clear();
        self.viewport.select(None);
        self.viewport.end_gesture();
    }

    /// Merges a partial filter map. The layout survives; hidden entries are
    /// dropped and new ones placed on the next render.
    pub fn set_filters(&mut self, patch: &FilterPatch) {
        self.filters.apply(patch);
        debug!(filters:? = self.filters; "Updated filters");
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset_view();
    }

    pub fn reset_layout(&mut self) {
        self.layout.clear();
        self.viewport.select(None);
    }

    /// Fits the last rendered diagram into the frame. No-op before the first
    /// render or while the frame size is unknown.
    pub fn fit_to_screen(&mut self) -> bool {
        match self.viewport.container() {
            Some(container) => self.viewport.fit_to_screen(container, self.diagram_size),
            None => false,
        }
    }

    pub fn set_container_size(&mut self, width: f32, height: f32) {
        self.viewport.set_container(Size::new(width, height));
    }

    pub fn set_frame_origin(&mut self, x: f32, y: f32) {
        self.viewport.set_origin(Vec2::new(x, y));
    }

    /// Selects a visible element, or clears the selection for `None` and for
    /// ids that are not part of the current view.
    pub fn select_element(&mut self, id: Option<&str>) {
        let selection = id.filter(|id| {
            self.current_contents()
                .is_some_and(|contents| contents.element(id).is_some())
        });
        self.viewport.select(selection.map(str::to_string));
    }

    /// Places an element's stored entry at `(x, y)` in layout coordinates.
    pub fn move_element(&mut self, id: &str, x: f32, y: f32) -> bool {
        self.layout.move_entry(id, x, y)
    }

    pub fn begin_pan(&mut self, x: f32, y: f32) {
        self.viewport.begin_pan(Vec2::new(x, y));
    }

    pub fn begin_element_drag(&mut self, id: &str, x: f32, y: f32) -> bool {
        self.viewport
            .begin_element_drag(id, Vec2::new(x, y), self.layout.entries())
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.viewport
            .pointer_move(Vec2::new(x, y), self.layout.entries_mut())
    }

    pub fn end_gesture(&mut self) {
        self.viewport.end_gesture();
    }

    fn current_contents(&self) -> Option<ViewContents> {
        let view = resolve_view(&self.workspace, self.view_type, self.view_key.as_deref())?;
        Some(collect_view(&self.workspace, view, &self.filters))
    }

    /// Runs the pipeline for the active view and returns the scene.
    pub fn render(&mut self) -> Scene {
        let layout_config = &self.config.layout;
        let Some(view) = resolve_view(&self.workspace, self.view_type, self.view_key.as_deref())
        else {
            warn!(
                view_type = self.view_type.token(),
                key = self.view_key.as_deref().unwrap_or("");
                "View not found, rendering empty diagram"
            );
            self.layout.clear();
            self.viewport.select(None);
            self.viewport.end_gesture();
            let scene = Scene::empty(layout_config.padding);
            self.diagram_size = Size::new(scene.width, scene.height);
            return scene;
        };

        let contents = collect_view(&self.workspace, view, &self.filters);
        let selection_hidden = self
            .viewport
            .selected()
            .is_some_and(|id| contents.element(id).is_none());
        if selection_hidden {
            self.viewport.select(None);
        }
        if self.layout.is_empty() {
            self.layout
                .install(compute_layout(&contents.elements, layout_config));
        } else {
            let added = fill_missing(self.layout.entries_mut(), &contents.elements, layout_config);
            if added > 0 {
                debug!(added = added; "Placed newly visible elements");
            }
        }

        let translated = translate(self.layout.entries(), layout_config);
        self.diagram_size = Size::new(translated.width, translated.height);

        if self.layout.phase() == FitPhase::LaidOut && !translated.is_empty() {
            if let Some(container) = self.viewport.container() {
                self.viewport.fit_to_screen(container, self.diagram_size);
                self.layout.mark_fitted();
            }
        }

        build_scene(
            &contents,
            &translated,
            &SceneOptions {
                view_key: Some(view.key.as_str()),
                selected: self.viewport.selected(),
                styles: &self.styles,
                theme: &self.config.theme,
                config: layout_config,
            },
        )
    }

    /// Renders the active view as SVG. With a known frame size the camera is
    /// applied; otherwise the SVG is sized to the diagram.
    pub fn render_svg(&mut self) -> String {
        let scene = self.render();
        match self.viewport.container() {
            Some(frame) => {
                let pan = self.viewport.pan();
                let transform = ViewTransform {
                    translate_x: pan.x,
                    translate_y: pan.y,
                    scale: self.viewport.zoom(),
                    width: frame.width,
                    height: frame.height,
                };
                render_svg_with_transform(&scene, &self.config.theme, &transform)
            }
            None => render_svg(&scene, &self.config.theme),
        }
    }
}
