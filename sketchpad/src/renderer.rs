//! # Compositing
//!
//! Flattens the layer stack into a single image: background fill first, then
//! every visible layer in index order, so a higher index lands visually on
//! top. During a drag the in-progress scratch is folded into the active
//! layer non-destructively, producing exactly the pixels a commit would.

use crate::raster::Raster;
use sketchpad_core::blend::CompositeMode;
use sketchpad_core::color::Color;
use sketchpad_core::layer::LayerStack;

/// The live, uncommitted stroke to preview on the active layer.
#[derive(Clone, Copy)]
pub struct StrokeOverlay<'a> {
    pub scratch: &'a Raster,
    /// Final application opacity: session opacity x profile opacity scale.
    pub opacity: f32,
    pub composite: CompositeMode,
}

/// Composite the stack into `target`, which is reallocated if its extent has
/// fallen out of lock-step (snapshot restores can change the extent).
pub fn composite_into(
    target: &mut Raster,
    background: Color,
    stack: &LayerStack<Raster>,
    overlay: Option<StrokeOverlay<'_>>,
) {
    if target.extent() != stack.extent() {
        *target = Raster::new(stack.extent());
    }
    target.fill(background);
    for layer in stack.iter() {
        if !layer.visible {
            continue;
        }
        match overlay {
            Some(overlay) if layer.id == stack.active_id() => {
                // Non-destructive preview: apply the scratch to a copy so
                // the committed result and the preview are pixel-identical.
                let mut staged = layer.surface.clone();
                staged.draw_over(overlay.scratch, overlay.opacity, overlay.composite);
                target.draw_over(&staged, 1.0, CompositeMode::SourceOver);
            }
            _ => target.draw_over(&layer.surface, 1.0, CompositeMode::SourceOver),
        }
    }
}

/// Flatten to a fresh workspace-extent image, hidden layers ignored. This is
/// the export path.
#[must_use]
pub fn flatten(background: Color, stack: &LayerStack<Raster>) -> Raster {
    let mut flat = Raster::new(stack.extent());
    composite_into(&mut flat, background, stack, None);
    flat
}

#[cfg(test)]
mod test {
    use super::{composite_into, flatten, StrokeOverlay};
    use crate::raster::Raster;
    use sketchpad_core::blend::CompositeMode;
    use sketchpad_core::color::Color;
    use sketchpad_core::layer::LayerStack;
    use sketchpad_core::stroke::Point;

    const RED: Color = Color::opaque(0xFF, 0, 0);
    const BLUE: Color = Color::opaque(0, 0, 0xFF);

    fn stack_with_overlap() -> LayerStack<Raster> {
        let mut stack = LayerStack::<Raster>::new(1200);
        stack
            .active_mut()
            .surface
            .fill_circle(Point::new(20.0, 20.0), 8.0, RED, 1.0);
        stack.add();
        stack
            .active_mut()
            .surface
            .fill_circle(Point::new(20.0, 20.0), 8.0, BLUE, 1.0);
        stack
    }

    #[test]
    fn top_layer_wins_at_overlap() {
        let stack = stack_with_overlap();
        let flat = flatten(Color::WHITE, &stack);
        assert_eq!(flat.pixel(20, 20).unwrap(), BLUE);
    }
    #[test]
    fn hidden_top_reveals_bottom() {
        let mut stack = stack_with_overlap();
        let top = stack.active_id();
        stack.toggle_visible(top);
        let flat = flatten(Color::WHITE, &stack);
        assert_eq!(flat.pixel(20, 20).unwrap(), RED);
        // Away from both marks: the background.
        assert_eq!(flat.pixel(600, 600).unwrap(), Color::WHITE);
    }
    #[test]
    fn preview_matches_committed_result() {
        let mut stack = LayerStack::<Raster>::new(1200);
        stack
            .active_mut()
            .surface
            .fill_circle(Point::new(30.0, 30.0), 10.0, RED, 1.0);

        let mut scratch = Raster::new(1200);
        scratch.fill_circle(Point::new(34.0, 30.0), 6.0, BLUE, 1.0);
        let overlay = StrokeOverlay {
            scratch: &scratch,
            opacity: 0.7,
            composite: CompositeMode::SourceOver,
        };

        let mut preview = Raster::new(1200);
        composite_into(&mut preview, Color::WHITE, &stack, Some(overlay));

        // Commit the same scratch for real and compare a few pixels.
        stack
            .active_mut()
            .surface
            .draw_over(&scratch, 0.7, CompositeMode::SourceOver);
        let committed = flatten(Color::WHITE, &stack);
        for probe in [(30, 30), (34, 30), (40, 30), (25, 25)] {
            assert_eq!(
                preview.pixel(probe.0, probe.1),
                committed.pixel(probe.0, probe.1),
                "diverged at {probe:?}"
            );
        }
    }
    #[test]
    fn preview_does_not_touch_the_layer() {
        let stack = {
            let mut stack = LayerStack::<Raster>::new(1200);
            stack
                .active_mut()
                .surface
                .fill_circle(Point::new(30.0, 30.0), 10.0, RED, 1.0);
            stack
        };
        let mut scratch = Raster::new(1200);
        scratch.fill_circle(Point::new(30.0, 30.0), 10.0, BLUE, 1.0);

        let mut preview = Raster::new(1200);
        composite_into(
            &mut preview,
            Color::WHITE,
            &stack,
            Some(StrokeOverlay {
                scratch: &scratch,
                opacity: 1.0,
                composite: CompositeMode::SourceOver,
            }),
        );
        assert_eq!(preview.pixel(30, 30).unwrap(), BLUE);
        // The layer itself still holds the red mark.
        assert_eq!(stack.active().surface.pixel(30, 30).unwrap(), RED);
    }
}
