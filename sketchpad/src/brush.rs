//! # Brush rendering
//!
//! Turns the accumulated points of one drag into a rendered, tool-specific
//! mark on an isolated scratch surface. The renderer is stateless and
//! replays the whole stroke from scratch on every point addition - replay is
//! intentional for correctness at moderate point counts; an incremental
//! append would be a documented extension, not a silent change.
//!
//! Jitter and scatter draw from an injected [`UnitRandom`] source. The
//! production source is unseeded, so the exact grain of a mark is not
//! reproducible across runs.

use crate::raster::{Raster, StrokeStyle};
use sketchpad_core::blend::CompositeMode;
use sketchpad_core::color::Color;
use sketchpad_core::stroke::Point;
use sketchpad_core::tool::{RenderMode, ToolProfile};
use sketchpad_core::util::UnitRandom;

// Watercolor pass constants, kept as fixed stylistic values for visual
// parity with the reference rendering.
const WASH_WIDTH: f32 = 1.12;
const WASH_OPACITY: f32 = 0.65;
const WASH_BLUR: f32 = 0.3;
const CORE_WIDTH: f32 = 0.9;
const CORE_OPACITY: f32 = 0.95;
const CORE_JITTER: f32 = 0.08;
const BRISTLE_WIDTH: f32 = 0.5;
const BRISTLE_OPACITY: f32 = 0.6;
const BRISTLE_JITTER: f32 = 0.15;
const BRISTLE_DASH_ON: f32 = 0.45;
const BRISTLE_DASH_OFF: f32 = 0.55;
const SCATTER_STRIDE: usize = 4;
const SCATTER_SPREAD: f32 = 0.6;
const SCATTER_OPACITY: f32 = 0.4;
const THIN_CORE_WIDTH: f32 = 0.25;

// Graphite grain: base stroke plus two fading, wandering copies.
const GRAIN_PASSES: [(f32, f32); 2] = [(0.35, 0.45), (0.7, 0.22)];

const MARKER_SHADOW_BLUR: f32 = 0.25;
const MARKER_SHADOW_OPACITY: f32 = 0.35;
const MARKER_SHADOW_OFFSET: f32 = 0.15;

const HIGHLIGHT_DASH_ON: f32 = 0.8;
const HIGHLIGHT_DASH_OFF: f32 = 0.4;

const INK_OVERLAY_WIDTH: f32 = 0.4;
const INK_OVERLAY_OPACITY: f32 = 0.5;
const INK_DASH_ON: f32 = 1.6;
const INK_DASH_OFF: f32 = 0.8;

/// Unseeded production source backed by `rand`'s thread-local RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadUnitRandom;
impl UnitRandom for ThreadUnitRandom {
    fn next_unit(&mut self) -> f32 {
        use rand::Rng;
        rand::thread_rng().gen()
    }
}

/// Render the stroke onto `scratch`, clearing it first.
///
/// A single point renders a filled circle of radius `width / 2`; two or more
/// points render a straight-segment polyline styled by the profile's render
/// mode. `erase` bypasses the mode switch entirely: the mark becomes a plain
/// round-capped solid - only its coverage matters, since the session applies
/// it alpha-subtractively.
pub fn render_mark(
    scratch: &mut Raster,
    points: &[Point],
    profile: &ToolProfile,
    width: f32,
    color: Color,
    erase: bool,
    rng: &mut dyn UnitRandom,
) {
    scratch.clear();
    let Some(&origin) = points.first() else {
        return;
    };
    let width = (width * profile.width_scale).max(0.5);

    if erase {
        // Coverage-only mark; color is irrelevant to destination-out.
        if points.len() == 1 {
            scratch.fill_circle(origin, width / 2.0, Color::BLACK, 1.0);
        } else {
            scratch.stroke_polyline(points, &StrokeStyle::solid(width, Color::BLACK));
        }
        return;
    }

    if points.len() == 1 {
        scratch.fill_circle(origin, width / 2.0, color, 1.0);
        return;
    }

    match profile.mode {
        RenderMode::Wash => wash(scratch, points, profile, width, color, rng),
        RenderMode::Grain => grain(scratch, points, profile, width, color, rng),
        RenderMode::Marker => marker(scratch, points, profile, width, color),
        RenderMode::Highlight => {
            scratch.stroke_polyline(
                points,
                &StrokeStyle {
                    dash: Some(smallvec::smallvec![
                        HIGHLIGHT_DASH_ON * width,
                        HIGHLIGHT_DASH_OFF * width,
                    ]),
                    ..pass_style(profile, width, color, 1.0)
                },
            );
        }
        RenderMode::Ink => {
            scratch.stroke_polyline(points, &pass_style(profile, width, color, 1.0));
            scratch.stroke_polyline(
                points,
                &StrokeStyle {
                    width: INK_OVERLAY_WIDTH * width,
                    opacity: INK_OVERLAY_OPACITY,
                    dash: Some(smallvec::smallvec![
                        INK_DASH_ON * width,
                        INK_DASH_OFF * width,
                    ]),
                    ..pass_style(profile, width, color, 1.0)
                },
            );
        }
        RenderMode::Smooth => {
            scratch.stroke_polyline(points, &pass_style(profile, width, color, 1.0));
        }
    }
}

fn pass_style(profile: &ToolProfile, width: f32, color: Color, opacity: f32) -> StrokeStyle {
    StrokeStyle {
        width,
        cap: profile.cap,
        join: profile.join,
        color,
        opacity,
        dash: None,
    }
}

/// Five layered watercolor passes, later passes visually on top.
fn wash(
    scratch: &mut Raster,
    points: &[Point],
    profile: &ToolProfile,
    width: f32,
    color: Color,
    rng: &mut dyn UnitRandom,
) {
    // 1: wide wash, blurred on its own surface so later passes stay crisp.
    let mut wash_pass = Raster::new(scratch.extent());
    wash_pass.stroke_polyline(points, &pass_style(profile, WASH_WIDTH * width, color, 1.0));
    wash_pass.box_blur((WASH_BLUR * width).ceil() as u32);
    scratch.draw_over(&wash_pass, WASH_OPACITY, CompositeMode::SourceOver);

    // 2: near-opaque core, wandering slightly off the sampled path.
    let core = jittered(points, CORE_JITTER * width, rng);
    scratch.stroke_polyline(
        &core,
        &StrokeStyle {
            width: CORE_WIDTH * width,
            opacity: CORE_OPACITY,
            ..pass_style(profile, width, color, 1.0)
        },
    );

    // 3: dashed bristle edge.
    let bristle = jittered(points, BRISTLE_JITTER * width, rng);
    scratch.stroke_polyline(
        &bristle,
        &StrokeStyle {
            width: BRISTLE_WIDTH * width,
            opacity: BRISTLE_OPACITY,
            dash: Some(smallvec::smallvec![
                BRISTLE_DASH_ON * width,
                BRISTLE_DASH_OFF * width,
            ]),
            ..pass_style(profile, width, color, 1.0)
        },
    );

    // 4: sparse dot texture along the path.
    for point in points.iter().step_by(SCATTER_STRIDE) {
        let dot = Point::new(
            point.x + rng.jitter(SCATTER_SPREAD * width),
            point.y + rng.jitter(SCATTER_SPREAD * width),
        );
        let radius = (0.08 + 0.07 * rng.next_unit()) * width;
        scratch.fill_circle(dot, radius, color, SCATTER_OPACITY);
    }

    // 5: crisp thin core line.
    scratch.stroke_polyline(
        points,
        &pass_style(profile, THIN_CORE_WIDTH * width, color, 1.0),
    );
}

fn grain(
    scratch: &mut Raster,
    points: &[Point],
    profile: &ToolProfile,
    width: f32,
    color: Color,
    rng: &mut dyn UnitRandom,
) {
    scratch.stroke_polyline(points, &pass_style(profile, width, color, 1.0));
    for (spread, opacity) in GRAIN_PASSES {
        let wander = jittered(points, spread * width, rng);
        scratch.stroke_polyline(
            &wander,
            &StrokeStyle {
                opacity,
                ..pass_style(profile, width, color, 1.0)
            },
        );
    }
}

fn marker(scratch: &mut Raster, points: &[Point], profile: &ToolProfile, width: f32, color: Color) {
    // Soft drop shadow matched to the stroke color, offset down-right.
    let mut shadow = Raster::new(scratch.extent());
    shadow.stroke_polyline(points, &pass_style(profile, width, color, 1.0));
    shadow.box_blur((MARKER_SHADOW_BLUR * width).ceil() as u32);
    let offset = (MARKER_SHADOW_OFFSET * width).round() as i32;
    scratch.draw_over_at(
        &shadow,
        offset,
        offset,
        MARKER_SHADOW_OPACITY,
        CompositeMode::SourceOver,
    );

    scratch.stroke_polyline(points, &pass_style(profile, width, color, 1.0));
}

fn jittered(points: &[Point], spread: f32, rng: &mut dyn UnitRandom) -> Vec<Point> {
    points
        .iter()
        .map(|point| Point::new(point.x + rng.jitter(spread), point.y + rng.jitter(spread)))
        .collect()
}

#[cfg(test)]
mod test {
    use super::render_mark;
    use crate::raster::Raster;
    use sketchpad_core::color::Color;
    use sketchpad_core::stroke::{Bounds, Point};
    use sketchpad_core::tool::Tool;
    use sketchpad_core::util::UnitRandom;
    use strum::IntoEnumIterator;

    /// Deterministic source: walks a short fixed cycle.
    struct Cycle(usize);
    impl UnitRandom for Cycle {
        fn next_unit(&mut self) -> f32 {
            const STEPS: [f32; 5] = [0.05, 0.33, 0.5, 0.71, 0.94];
            self.0 = (self.0 + 1) % STEPS.len();
            STEPS[self.0]
        }
    }

    const INK: Color = Color::opaque(0x20, 0x20, 0x20);

    fn mark_bounds(raster: &Raster) -> Option<Bounds> {
        let mut covered = Vec::new();
        for y in 0..raster.extent() {
            for x in 0..raster.extent() {
                if raster.pixel(x, y).unwrap().a > 0 {
                    covered.push(Point::new(x as f32, y as f32));
                }
            }
        }
        Bounds::of(&covered)
    }

    #[test]
    fn every_tool_marks_within_inflated_bounds() {
        let points = [
            Point::new(40.0, 40.0),
            Point::new(60.0, 48.0),
            Point::new(75.0, 70.0),
        ];
        let width = 8.0;
        for tool in Tool::iter() {
            let profile = tool.profile();
            let mut scratch = Raster::new(128);
            render_mark(
                &mut scratch,
                &points,
                profile,
                width,
                INK,
                false,
                &mut Cycle(0),
            );
            let bounds = mark_bounds(&scratch)
                .unwrap_or_else(|| panic!("{tool:?} rendered an empty mark"));

            // Half the scaled width, plus jitter/scatter/blur/shadow spread,
            // plus the antialiased rim.
            let scaled = width * profile.width_scale;
            let margin = scaled / 2.0 + scaled + 2.0;
            let allowed = Bounds::of(&points).unwrap().inflate(margin);
            assert!(
                allowed.contains(Point::new(bounds.min_x, bounds.min_y))
                    && allowed.contains(Point::new(bounds.max_x, bounds.max_y)),
                "{tool:?} mark {bounds:?} exceeds {allowed:?}"
            );
        }
    }
    #[test]
    fn single_point_renders_a_dot() {
        let mut scratch = Raster::new(64);
        render_mark(
            &mut scratch,
            &[Point::new(32.0, 32.0)],
            Tool::Ink.profile(),
            10.0,
            INK,
            false,
            &mut Cycle(0),
        );
        // Ink scales width by 0.55: radius 2.75.
        assert!(scratch.pixel(32, 32).unwrap().a > 0);
        assert_eq!(scratch.pixel(32, 40).unwrap().a, 0);
    }
    #[test]
    fn replay_is_cumulative_not_incremental() {
        // Rendering [a, b] then replaying [a, b, c] must cover c's
        // neighborhood even though the renderer keeps no state.
        let mut scratch = Raster::new(128);
        let a = Point::new(20.0, 20.0);
        let b = Point::new(50.0, 20.0);
        let c = Point::new(50.0, 60.0);
        let profile = Tool::Ink.profile();
        render_mark(&mut scratch, &[a, b], profile, 8.0, INK, false, &mut Cycle(0));
        render_mark(
            &mut scratch,
            &[a, b, c],
            profile,
            8.0,
            INK,
            false,
            &mut Cycle(0),
        );
        assert!(scratch.pixel(50, 55).unwrap().a > 0);
        assert!(scratch.pixel(35, 20).unwrap().a > 0);
    }
    #[test]
    fn erase_mark_ignores_render_mode() {
        let points = [Point::new(20.0, 32.0), Point::new(44.0, 32.0)];
        let mut plain = Raster::new(64);
        // Watercolor would normally blur and scatter; erase must not.
        render_mark(
            &mut plain,
            &points,
            Tool::Brush.profile(),
            6.0,
            INK,
            true,
            &mut Cycle(0),
        );
        let bounds = mark_bounds(&plain).unwrap();
        assert!(bounds.min_y >= 32.0 - 6.0 && bounds.max_y <= 32.0 + 6.0);
    }
}
