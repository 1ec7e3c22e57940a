//! Camera, selection and pointer-gesture state for an interactive host.
//!
//! Coordinates come in three spaces: screen (host pixels relative to the page),
//! frame (screen minus the frame origin) and diagram (the translated layout's
//! user units). A diagram point `d` is drawn at `pan + d * zoom` in the frame.

use crate::layout::LayoutMap;
use log::{debug, trace};
use serde::Serialize;
use std::ops::{Add, Div, Mul, Sub};

pub const MIN_ZOOM: f32 = 0.3;
pub const MAX_ZOOM: f32 = 3.0;
pub const ZOOM_STEP: f32 = 0.1;
/// Share of the frame a fitted diagram may occupy.
pub const FIT_MARGIN: f32 = 0.95;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;

    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Auto-fit lifecycle of the current view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum FitPhase {
    /// No layout computed yet for this view.
    #[default]
    Uninitialized,
    /// Layout exists but the camera has not been fitted to it.
    LaidOut,
    Fitted,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    /// Background pan; `start` is the pointer position minus the pan at press time.
    Panning { start: Vec2 },
    /// Element drag; `grab` is the pointer's diagram position minus the entry origin.
    Dragging { id: String, grab: Vec2 },
}

pub fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    zoom: f32,
    pan: Vec2,
    selected: Option<String>,
    gesture: Gesture,
    /// Host frame size; auto-fit waits until it is known.
    container: Option<Size>,
    /// Frame top-left in screen coordinates.
    origin: Vec2,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            selected: None,
            gesture: Gesture::Idle,
            container: None,
            origin: Vec2::ZERO,
        }
    }
}

impl ViewportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn container(&self) -> Option<Size> {
        self.container
    }

    pub fn set_container(&mut self, size: Size) {
        self.container = (!size.is_empty()).then_some(size);
    }

    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = clamp_zoom(zoom);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.pan = pan;
    }

    pub fn select(&mut self, id: Option<String>) {
        self.selected = id;
    }

    pub fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan = Vec2::ZERO;
        self.selected = None;
    }

    /// Scales the diagram to fit the frame with a small margin and centers it.
    /// Returns false (and changes nothing) when either size is empty.
    pub fn fit_to_screen(&mut self, container: Size, diagram: Size) -> bool {
        if container.is_empty() || diagram.is_empty() {
            return false;
        }
        let fit = (container.width / diagram.width).min(container.height / diagram.height);
        self.zoom = clamp_zoom(fit * FIT_MARGIN);
        self.pan = Vec2::new(
            (container.width - diagram.width * self.zoom) / 2.0,
            (container.height - diagram.height * self.zoom) / 2.0,
        );
        self.selected = None;
        debug!(zoom = self.zoom, pan_x = self.pan.x, pan_y = self.pan.y; "Fitted viewport");
        true
    }

    pub fn screen_to_diagram(&self, screen: Vec2) -> Vec2 {
        (screen - self.origin - self.pan) / self.zoom
    }

    pub fn diagram_to_screen(&self, diagram: Vec2) -> Vec2 {
        self.origin + self.pan + diagram * self.zoom
    }

    pub fn begin_pan(&mut self, pointer: Vec2) {
        self.gesture = Gesture::Panning {
            start: pointer - self.pan,
        };
        self.selected = None;
    }

    /// Starts dragging `id` if it has an entry. The element becomes selected.
    pub fn begin_element_drag(&mut self, id: &str, pointer: Vec2, layout: &LayoutMap) -> bool {
        let Some(entry) = layout.get(id) else {
            return false;
        };
        let grab = self.screen_to_diagram(pointer) - Vec2::new(entry.x, entry.y);
        self.gesture = Gesture::Dragging {
            id: id.to_string(),
            grab,
        };
        self.selected = Some(id.to_string());
        true
    }

    /// Applies pointer motion to the active gesture. Returns true when the
    /// layout was modified.
    pub fn pointer_move(&mut self, pointer: Vec2, layout: &mut LayoutMap) -> bool {
        match &self.gesture {
            Gesture::Idle => false,
            Gesture::Panning { start } => {
                self.pan = pointer - *start;
                false
            }
            Gesture::Dragging { id, grab } => {
                let target = self.screen_to_diagram(pointer) - *grab;
                match layout.get_mut(id) {
                    Some(entry) => {
                        entry.x = target.x;
                        entry.y = target.y;
                        trace!(element = id.as_str(), x = target.x, y = target.y; "Dragged element");
                        true
                    }
                    None => false,
                }
            }
        }
    }

    pub fn end_gesture(&mut self) {
        self.gesture = Gesture::Idle;
    }
}

/// Stored (untranslated) layout and the fit phase of the active view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutState {
    entries: LayoutMap,
    phase: FitPhase,
}

impl LayoutState {
    pub fn entries(&self) -> &LayoutMap {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut LayoutMap {
        &mut self.entries
    }

    pub fn phase(&self) -> FitPhase {
        self.phase
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Installs a freshly computed layout. Moves an uninitialized view to `LaidOut`.
    pub fn install(&mut self, entries: LayoutMap) {
        self.entries = entries;
        if self.phase == FitPhase::Uninitialized {
            self.phase = FitPhase::LaidOut;
        }
    }

    pub fn mark_fitted(&mut self) {
        self.phase = FitPhase::Fitted;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.phase = FitPhase::Uninitialized;
    }

    pub fn move_entry(&mut self, id: &str, x: f32, y: f32) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.x = x;
                entry.y = y;
                true
            }
            None => false,
        }
    }
}
