//! # Session
//!
//! The single owner of all shared mutable drawing state: the layer stack,
//! the history, the active tool and colors, the in-progress stroke, and the
//! viewport. Constructed on start; no teardown beyond process exit. All
//! mutation flows through `&mut self` on the single UI thread - a
//! multi-threaded embedding must serialize calls through one owner.
//!
//! Pointer events are processed strictly in arrival order: every move fully
//! re-renders the scratch and the display composite before returning, so
//! there is no reentrancy hazard and no suspension mid-render.

use crate::brush::{self, ThreadUnitRandom};
use crate::config::SessionConfig;
use crate::export::{self, ExportError};
use crate::raster::Raster;
use crate::renderer::{self, StrokeOverlay};
use crate::viewport::{PanTrigger, Viewport};
use sketchpad_core::blend::CompositeMode;
use sketchpad_core::color::Color;
use sketchpad_core::history::{History, Snapshot};
use sketchpad_core::input::{self, PointerInput, SurfaceRect};
use sketchpad_core::layer::{Layer, LayerId, LayerStack, StackShift};
use sketchpad_core::stroke::StrokeBuffer;
use sketchpad_core::tool::Tool;
use sketchpad_core::util::UnitRandom;
use sketchpad_core::workspace;

pub struct Session {
    stack: LayerStack<Raster>,
    history: History<Raster>,
    background: Color,
    tool: Tool,
    stroke_color: Color,
    width: f32,
    opacity: f32,
    erasing: bool,
    stroke: StrokeBuffer,
    /// Isolated surface the live stroke is replayed onto.
    scratch: Raster,
    drawing: bool,
    /// Cached workspace-extent composite the viewport presents from.
    composite: Raster,
    viewport: Viewport,
    rng: Box<dyn UnitRandom>,
}

impl Session {
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_random(config, Box::new(ThreadUnitRandom))
    }
    /// Construct with an explicit random source; tests inject a
    /// deterministic one.
    #[must_use]
    pub fn with_random(config: &SessionConfig, rng: Box<dyn UnitRandom>) -> Self {
        let extent = workspace::clamp_extent(config.workspace_extent);
        let tool = Tool::from_key(&config.tool).unwrap_or_else(|| {
            log::warn!("unknown configured tool {:?}; using brush", config.tool);
            Tool::Brush
        });
        let mut session = Self {
            stack: LayerStack::new(extent),
            history: History::new(),
            background: Color::from_hex_or(&config.background, Color::WHITE),
            tool,
            stroke_color: Color::from_hex_or(&config.stroke_color, Color::BLACK),
            width: config.stroke_width.max(0.1),
            opacity: config.opacity.clamp(0.0, 1.0),
            erasing: false,
            stroke: StrokeBuffer::default(),
            scratch: Raster::new(extent),
            drawing: false,
            composite: Raster::new(extent),
            viewport: Viewport::new(config.display_width, config.display_height),
            rng,
        };
        // The initial state is itself the first history entry, so undo from
        // here is a no-op rather than an empty canvas edge case.
        session.commit_snapshot(true);
        session.refresh_display();
        session
    }

    // --- Pointer lifecycle ---

    /// Begin a stroke. Suppressed while the viewport pans, or when the event
    /// carries no usable position.
    pub fn pointer_down(&mut self, event: &PointerInput, rect: SurfaceRect) {
        if self.viewport.is_panning() {
            return;
        }
        let Some(point) = input::sample(event, rect, self.stack.extent()) else {
            return;
        };
        self.drawing = true;
        self.stroke.begin(point);
        self.replay_scratch();
        self.refresh_display();
    }
    /// Extend the stroke. The whole accumulated point list is replayed and
    /// the composite refreshed before this returns.
    pub fn pointer_move(&mut self, event: &PointerInput, rect: SurfaceRect) {
        if !self.drawing {
            return;
        }
        let Some(point) = input::sample(event, rect, self.stack.extent()) else {
            return;
        };
        self.stroke.push(point);
        self.replay_scratch();
        self.refresh_display();
    }
    /// End the stroke: apply the mark to the active layer and commit one
    /// snapshot. Releasing the pointer outside the surface takes this same
    /// path - it is a normal stroke end, not an abort.
    pub fn pointer_up(&mut self) {
        if !self.drawing {
            return;
        }
        self.replay_scratch();
        let (opacity, composite) = self.application();
        self.stack
            .active_mut()
            .surface
            .draw_over(&self.scratch, opacity, composite);
        self.stroke.finish();
        self.drawing = false;
        self.commit_snapshot(false);
        self.refresh_display();
    }
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    // --- Panning ---

    /// Engage a pan trigger. Suppressed while a stroke is active - panning
    /// and drawing are mutually exclusive, in both directions.
    pub fn pan_press(&mut self, trigger: PanTrigger, client: (f32, f32)) {
        if self.drawing {
            return;
        }
        self.viewport.press_pan(trigger, client);
    }
    pub fn pan_move(&mut self, client: (f32, f32)) {
        if !self.viewport.is_panning() {
            return;
        }
        let extent = self.stack.extent();
        self.viewport.drag_pan(client, extent);
        self.viewport.present(&self.composite);
    }
    pub fn pan_release(&mut self, trigger: PanTrigger) {
        self.viewport.release_pan(trigger);
    }
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.viewport.is_panning()
    }
    /// Zoom the viewport window; layer content is untouched.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.viewport.set_zoom(zoom);
        self.viewport.present(&self.composite);
    }

    // --- Undo ---

    /// Restore the previous snapshot wholesale. No-op at the history origin.
    pub fn undo(&mut self) {
        // Restores are synchronous full-buffer copies; no partial layer
        // state is ever observable.
        let Some(snapshot) = self.history.undo().cloned() else {
            return;
        };
        let old_extent = self.stack.extent();
        self.background = snapshot.background;
        self.stack
            .restore(snapshot.layers, snapshot.active, snapshot.extent);
        if snapshot.extent != old_extent {
            self.scratch = Raster::new(snapshot.extent);
            self.viewport
                .rescale_for_workspace(old_extent, snapshot.extent);
        }
        self.refresh_display();
    }

    // --- Canvas-wide edits ---

    /// Wipe every layer's content. The background is a separate input and
    /// survives.
    pub fn clear(&mut self) {
        for layer in self.stack.iter_mut() {
            layer.surface.clear();
        }
        self.commit_snapshot(false);
        self.refresh_display();
    }
    /// Set the background fill from a `#rrggbb` string. A malformed string
    /// falls back to the current value, which is then a no-op.
    pub fn set_background(&mut self, hex: &str) {
        let color = Color::from_hex_or(hex, self.background);
        if color == self.background {
            return;
        }
        self.background = color;
        self.commit_snapshot(false);
        self.refresh_display();
    }

    // --- Tool inputs ---

    /// Select a tool by its external key. Unknown keys leave the current
    /// tool unchanged.
    pub fn set_tool(&mut self, key: &str) {
        match Tool::from_key(key) {
            Some(tool) => self.tool = tool,
            None => log::debug!("unknown tool key {key:?}; keeping {:?}", self.tool),
        }
    }
    pub fn set_stroke_color(&mut self, hex: &str) {
        self.stroke_color = Color::from_hex_or(hex, self.stroke_color);
    }
    /// Width is a positive number by contract; anything else is ignored.
    pub fn set_width(&mut self, width: f32) {
        if width > 0.0 && width.is_finite() {
            self.width = width;
        } else {
            log::warn!("ignoring non-positive stroke width {width}");
        }
    }
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }
    pub fn set_eraser(&mut self, erasing: bool) {
        self.erasing = erasing;
    }

    // --- Layer operations ---

    pub fn add_layer(&mut self) -> LayerId {
        let id = self.stack.add();
        self.commit_snapshot(false);
        self.refresh_display();
        id
    }
    /// Delete the active layer; refused when it is the last one.
    pub fn delete_layer(&mut self) {
        if self.stack.delete_active() {
            self.commit_snapshot(false);
            self.refresh_display();
        }
    }
    /// Reorder the active layer by one position; no-op at the boundary.
    pub fn shift_layer(&mut self, direction: StackShift) {
        if self.stack.shift_active(direction) {
            self.commit_snapshot(false);
            self.refresh_display();
        }
    }
    pub fn toggle_layer(&mut self, id: LayerId) {
        if self.stack.toggle_visible(id) {
            self.commit_snapshot(false);
            self.refresh_display();
        }
    }
    /// Change the active layer. Selection is not a canvas mutation and does
    /// not snapshot.
    pub fn select_layer(&mut self, id: LayerId) -> bool {
        self.stack.set_active(id)
    }

    // --- Workspace / display sizing ---

    /// Resize the square workspace, clamped to the permitted range. Layer
    /// content is preserved at the origin; the viewport keeps its focal
    /// point.
    pub fn resize_workspace(&mut self, target: u32) {
        let extent = workspace::clamp_extent(target);
        let old = self.stack.extent();
        if extent == old {
            return;
        }
        self.stack.resize(extent);
        self.scratch = Raster::new(extent);
        self.viewport.rescale_for_workspace(old, extent);
        self.commit_snapshot(false);
        self.refresh_display();
    }
    /// Resize the on-screen display surface. Unchanged dimensions are
    /// skipped; otherwise the old content stands in as a placeholder until
    /// the immediate recomposite below replaces it.
    pub fn resize_display(&mut self, width: u32, height: u32) {
        if self.viewport.resize_display(width, height) {
            self.refresh_display();
        }
    }

    // --- Outputs ---

    /// The on-screen image.
    #[must_use]
    pub fn display(&self) -> &Raster {
        self.viewport.display()
    }
    /// The full workspace composite.
    #[must_use]
    pub fn composite(&self) -> &Raster {
        &self.composite
    }
    /// Flatten and encode the visible image as PNG.
    pub fn export_png<W: std::io::Write + std::io::Seek>(
        &self,
        out: &mut W,
    ) -> Result<(), ExportError> {
        export::export_png(self.background, &self.stack, out)
    }

    // --- Introspection ---

    pub fn layers(&self) -> impl Iterator<Item = &Layer<Raster>> + '_ {
        self.stack.iter()
    }
    #[must_use]
    pub fn active_layer(&self) -> LayerId {
        self.stack.active_id()
    }
    #[must_use]
    pub fn extent(&self) -> u32 {
        self.stack.extent()
    }
    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
    #[must_use]
    pub fn history_cursor(&self) -> usize {
        self.history.cursor()
    }

    // --- Internals ---

    /// Final application opacity and composite for the current mark.
    fn application(&self) -> (f32, CompositeMode) {
        if self.erasing {
            (1.0, CompositeMode::Erase)
        } else {
            let profile = self.tool.profile();
            (self.opacity * profile.opacity_scale, profile.composite)
        }
    }
    fn replay_scratch(&mut self) {
        brush::render_mark(
            &mut self.scratch,
            self.stroke.points(),
            self.tool.profile(),
            self.width,
            self.stroke_color,
            self.erasing,
            self.rng.as_mut(),
        );
    }
    fn commit_snapshot(&mut self, skip_truncate: bool) {
        let snapshot = Snapshot {
            background: self.background,
            active: self.stack.active_id(),
            extent: self.stack.extent(),
            layers: self.stack.iter().cloned().collect(),
        };
        self.history.commit(snapshot, skip_truncate);
    }
    fn refresh_display(&mut self) {
        let overlay = if self.drawing {
            let (opacity, composite) = self.application();
            Some(StrokeOverlay {
                scratch: &self.scratch,
                opacity,
                composite,
            })
        } else {
            None
        };
        renderer::composite_into(&mut self.composite, self.background, &self.stack, overlay);
        self.viewport.present(&self.composite);
    }
}
