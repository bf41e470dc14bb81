//! # Viewport
//!
//! The workspace is larger than the screen; the viewport is the window onto
//! it - a scroll offset, a zoom factor, and the on-screen display surface.
//! Panning and drawing are mutually exclusive; the session enforces the
//! drawing side, this module tracks which triggers currently hold the
//! viewport in pan mode.

use crate::raster::Raster;
use sketchpad_core::workspace;

bitflags::bitflags! {
    /// Sources that can hold the viewport in pan mode. Pan stays engaged
    /// until every trigger is released.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct PanTrigger: u8 {
        /// Keyboard modifier held.
        const MODIFIER = 1;
        /// Middle pointer button held.
        const MIDDLE_BUTTON = 1 << 1;
    }
}

pub struct Viewport {
    display: Raster,
    /// Workspace-pixel offset of the display's top-left corner.
    scroll: [f32; 2],
    zoom: f32,
    pan: PanTrigger,
    /// Client position of the last pan sample while engaged.
    anchor: Option<(f32, f32)>,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            display: Raster::with_size(width, height),
            scroll: [0.0, 0.0],
            zoom: 1.0,
            pan: PanTrigger::empty(),
            anchor: None,
        }
    }
    #[must_use]
    pub fn display(&self) -> &Raster {
        &self.display
    }
    #[must_use]
    pub fn scroll(&self) -> [f32; 2] {
        self.scroll
    }
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }
    #[must_use]
    pub fn is_panning(&self) -> bool {
        !self.pan.is_empty()
    }
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(0.25, 8.0);
    }

    /// Engage a pan trigger at the given client position.
    pub fn press_pan(&mut self, trigger: PanTrigger, client: (f32, f32)) {
        self.pan.insert(trigger);
        self.anchor = Some(client);
    }
    /// Follow a pan drag; no-op unless engaged. The scroll offset is clamped
    /// so the window never leaves the workspace.
    pub fn drag_pan(&mut self, client: (f32, f32), extent: u32) {
        let Some(anchor) = self.anchor else {
            return;
        };
        if !self.is_panning() {
            return;
        }
        self.scroll[0] -= (client.0 - anchor.0) / self.zoom;
        self.scroll[1] -= (client.1 - anchor.1) / self.zoom;
        self.anchor = Some(client);
        self.clamp_scroll(extent);
    }
    /// Release one trigger; pan stays engaged while any other is held.
    pub fn release_pan(&mut self, trigger: PanTrigger) {
        self.pan.remove(trigger);
        if self.pan.is_empty() {
            self.anchor = None;
        }
    }

    /// Keep the visual focal point across a workspace resize by scaling the
    /// scroll offsets with the size ratio.
    pub fn rescale_for_workspace(&mut self, old_extent: u32, new_extent: u32) {
        for offset in &mut self.scroll {
            *offset = workspace::rescale_scroll(*offset, old_extent, new_extent);
        }
        self.clamp_scroll(new_extent);
    }

    /// Resize the display surface itself - a narrower operation than a
    /// workspace resize, bounded to the on-screen element. Unchanged
    /// dimensions are skipped entirely. Previously rendered content is
    /// restretched as a placeholder; the caller must follow up with a full
    /// recomposite.
    pub fn resize_display(&mut self, width: u32, height: u32) -> bool {
        if width == self.display.width() && height == self.display.height() {
            return false;
        }
        let mut next = Raster::with_size(width, height);
        next.draw_scaled(&self.display);
        self.display = next;
        log::debug!("display resized to {width}x{height}");
        true
    }

    /// Draw the workspace composite through the scroll/zoom window.
    pub fn present(&mut self, composite: &Raster) {
        self.display.clear();
        self.display.draw_view(composite, self.scroll, self.zoom);
    }

    fn clamp_scroll(&mut self, extent: u32) {
        let visible = [
            self.display.width() as f32 / self.zoom,
            self.display.height() as f32 / self.zoom,
        ];
        for axis in 0..2 {
            let max = (extent as f32 - visible[axis]).max(0.0);
            self.scroll[axis] = self.scroll[axis].clamp(0.0, max);
        }
    }
}

#[cfg(test)]
mod test {
    use super::{PanTrigger, Viewport};
    use crate::raster::Raster;
    use sketchpad_core::color::Color;

    #[test]
    fn drag_moves_scroll_against_pointer() {
        let mut viewport = Viewport::new(400, 300);
        viewport.press_pan(PanTrigger::MODIFIER, (200.0, 200.0));
        assert!(viewport.is_panning());
        viewport.drag_pan((150.0, 180.0), 2400);
        assert_eq!(viewport.scroll(), [50.0, 20.0]);

        viewport.release_pan(PanTrigger::MODIFIER);
        assert!(!viewport.is_panning());
        // Further drags are ignored.
        viewport.drag_pan((0.0, 0.0), 2400);
        assert_eq!(viewport.scroll(), [50.0, 20.0]);
    }
    #[test]
    fn pan_holds_until_all_triggers_release() {
        let mut viewport = Viewport::new(400, 300);
        viewport.press_pan(PanTrigger::MODIFIER, (0.0, 0.0));
        viewport.press_pan(PanTrigger::MIDDLE_BUTTON, (0.0, 0.0));
        viewport.release_pan(PanTrigger::MODIFIER);
        assert!(viewport.is_panning());
        viewport.release_pan(PanTrigger::MIDDLE_BUTTON);
        assert!(!viewport.is_panning());
    }
    #[test]
    fn scroll_clamps_to_workspace() {
        let mut viewport = Viewport::new(400, 300);
        viewport.press_pan(PanTrigger::MIDDLE_BUTTON, (0.0, 0.0));
        viewport.drag_pan((10_000.0, 10_000.0), 1200);
        assert_eq!(viewport.scroll(), [0.0, 0.0]);
        viewport.drag_pan((-10_000.0, -10_000.0), 1200);
        assert_eq!(viewport.scroll(), [800.0, 900.0]);
    }
    #[test]
    fn workspace_resize_keeps_focal_ratio() {
        let mut viewport = Viewport::new(400, 300);
        viewport.press_pan(PanTrigger::MODIFIER, (500.0, 500.0));
        viewport.drag_pan((200.0, 300.0), 2400);
        assert_eq!(viewport.scroll(), [300.0, 200.0]);
        viewport.rescale_for_workspace(2400, 4800);
        assert_eq!(viewport.scroll(), [600.0, 400.0]);
    }
    #[test]
    fn display_resize_skips_unchanged_and_keeps_content() {
        let mut viewport = Viewport::new(100, 100);
        assert!(!viewport.resize_display(100, 100));

        let mut composite = Raster::new(1200);
        composite.fill(Color::opaque(0xFF, 0, 0));
        viewport.present(&composite);
        assert!(viewport.resize_display(200, 200));
        // Placeholder restretch: old content still visible before the
        // caller recomposites.
        assert_eq!(viewport.display().pixel(150, 150).unwrap().r, 0xFF);
    }
}
