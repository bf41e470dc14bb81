//! # Raster surfaces
//!
//! CPU raster surface over a tiny-skia pixmap. This is the only module that
//! touches pixel memory; everything above it speaks in terms of the drawing
//! operations here and the [`Surface`] trait from the core crate.
//!
//! Pixmap data is premultiplied RGBA. Conversions to and from straight alpha
//! happen only at the boundaries (solid paint colors in, exported or sampled
//! pixels out).

use sketchpad_core::blend::CompositeMode;
use sketchpad_core::color::Color;
use sketchpad_core::stroke::Point;
use sketchpad_core::surface::Surface;
use sketchpad_core::tool::{LineCap, LineJoin};

/// Parameters of one stroked polyline pass.
#[derive(Clone, Debug)]
pub struct StrokeStyle {
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub color: Color,
    /// Modulates the color's alpha; `1.0` paints the color as-is.
    pub opacity: f32,
    /// On/off run lengths in pixels. Dash arrays are tiny, they live inline.
    pub dash: Option<smallvec::SmallVec<[f32; 2]>>,
}

impl StrokeStyle {
    /// Solid stroke with round caps and joins.
    #[must_use]
    pub fn solid(width: f32, color: Color) -> Self {
        Self {
            width,
            cap: LineCap::Round,
            join: LineJoin::Round,
            color,
            opacity: 1.0,
            dash: None,
        }
    }
}

/// An owned square pixel buffer with the 2D drawing operations the engine
/// needs: path stroking, fills, blits with blend modes, and a box blur.
#[derive(Clone)]
pub struct Raster {
    pixmap: tiny_skia::Pixmap,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Raster({0}x{0})", self.pixmap.width())
    }
}

impl Raster {
    /// Square surface, the shape of every workspace buffer.
    #[must_use]
    pub fn new(extent: u32) -> Self {
        Self::with_size(extent, extent)
    }
    /// Rectangular surface; only the on-screen display needs one.
    #[must_use]
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            // Zero-sized surfaces are rejected upstream by the workspace
            // clamp; a failure here is allocator exhaustion.
            pixmap: tiny_skia::Pixmap::new(width.max(1), height.max(1))
                .expect("raster allocation"),
        }
    }
    /// Side length in pixels of a square surface. For the rare rectangular
    /// surface this is the width.
    #[must_use]
    pub fn extent(&self) -> u32 {
        self.pixmap.width()
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }
    /// Everything transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }
    /// Flood the whole surface with `color`, replacing prior content.
    pub fn fill(&mut self, color: Color) {
        self.pixmap.fill(to_skia_color(color, 1.0));
    }
    /// Filled circle, the degenerate single-point mark.
    pub fn fill_circle(&mut self, center: Point, radius: f32, color: Color, opacity: f32) {
        let mut builder = tiny_skia::PathBuilder::new();
        builder.push_circle(center.x, center.y, radius.max(0.1));
        let Some(path) = builder.finish() else {
            return;
        };
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(to_skia_color(color, opacity));
        paint.anti_alias = true;
        self.pixmap.fill_path(
            &path,
            &paint,
            tiny_skia::FillRule::Winding,
            tiny_skia::Transform::identity(),
            None,
        );
    }
    /// Stroke a polyline through `points` with straight segments. Fewer than
    /// two points draws nothing - single-point marks are the caller's job.
    pub fn stroke_polyline(&mut self, points: &[Point], style: &StrokeStyle) {
        let (first, rest) = match points {
            [first, rest @ ..] if !rest.is_empty() => (first, rest),
            _ => return,
        };
        let mut builder = tiny_skia::PathBuilder::new();
        builder.move_to(first.x, first.y);
        for point in rest {
            builder.line_to(point.x, point.y);
        }
        let Some(path) = builder.finish() else {
            return;
        };

        let mut paint = tiny_skia::Paint::default();
        paint.set_color(to_skia_color(style.color, style.opacity));
        paint.anti_alias = true;

        let stroke = tiny_skia::Stroke {
            width: style.width.max(0.1),
            miter_limit: 10.0,
            line_cap: to_skia_cap(style.cap),
            line_join: to_skia_join(style.join),
            // `StrokeDash::new` rejects degenerate patterns; fall back to
            // solid rather than skip the pass.
            dash: style
                .dash
                .as_ref()
                .and_then(|dash| tiny_skia::StrokeDash::new(dash.to_vec(), 0.0)),
        };
        self.pixmap.stroke_path(
            &path,
            &paint,
            &stroke,
            tiny_skia::Transform::identity(),
            None,
        );
    }
    /// Blit `src` onto self at the origin.
    pub fn draw_over(&mut self, src: &Self, opacity: f32, mode: CompositeMode) {
        self.draw_over_at(src, 0, 0, opacity, mode);
    }
    /// Blit `src` onto self with an integer pixel offset.
    pub fn draw_over_at(&mut self, src: &Self, dx: i32, dy: i32, opacity: f32, mode: CompositeMode) {
        let paint = tiny_skia::PixmapPaint {
            opacity: opacity.clamp(0.0, 1.0),
            blend_mode: to_skia_blend(mode),
            quality: tiny_skia::FilterQuality::Nearest,
        };
        self.pixmap.draw_pixmap(
            dx,
            dy,
            src.pixmap.as_ref(),
            &paint,
            tiny_skia::Transform::identity(),
            None,
        );
    }
    /// Stretch `src` over the whole of self. Used only as the placeholder
    /// restretch when the display surface changes size.
    pub fn draw_scaled(&mut self, src: &Self) {
        let scale_x = self.pixmap.width() as f32 / src.pixmap.width() as f32;
        let scale_y = self.pixmap.height() as f32 / src.pixmap.height() as f32;
        let paint = tiny_skia::PixmapPaint {
            opacity: 1.0,
            blend_mode: tiny_skia::BlendMode::SourceOver,
            quality: tiny_skia::FilterQuality::Bilinear,
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            src.pixmap.as_ref(),
            &paint,
            tiny_skia::Transform::from_scale(scale_x, scale_y),
            None,
        );
    }
    /// Draw `src` through a viewport window: shifted by `-offset` workspace
    /// pixels, scaled by `zoom`.
    pub fn draw_view(&mut self, src: &Self, offset: [f32; 2], zoom: f32) {
        let paint = tiny_skia::PixmapPaint {
            opacity: 1.0,
            blend_mode: tiny_skia::BlendMode::SourceOver,
            quality: tiny_skia::FilterQuality::Bilinear,
        };
        let transform =
            tiny_skia::Transform::from_translate(-offset[0], -offset[1]).post_scale(zoom, zoom);
        self.pixmap
            .draw_pixmap(0, 0, src.pixmap.as_ref(), &paint, transform, None);
    }
    /// Separable box blur, sliding window, edges clamped. Operates on the
    /// premultiplied channels directly so blurred edges stay fringe-free.
    pub fn box_blur(&mut self, radius: u32) {
        if radius == 0 {
            return;
        }
        let w = self.pixmap.width() as i32;
        let h = self.pixmap.height() as i32;
        let r = radius as i32;
        let div = (2 * r + 1) as u32;

        let src: &mut [[u8; 4]] = bytemuck::cast_slice_mut(self.pixmap.data_mut());
        let mut temp = vec![[0_u8; 4]; src.len()];

        // Horizontal: src -> temp.
        for y in 0..h {
            let row = (y * w) as usize;
            let mut sum = [0_u32; 4];
            for i in -r..=r {
                let x = i.clamp(0, w - 1) as usize;
                for c in 0..4 {
                    sum[c] += u32::from(src[row + x][c]);
                }
            }
            for x in 0..w {
                for c in 0..4 {
                    temp[row + x as usize][c] = (sum[c] / div) as u8;
                }
                let leave = row + (x - r).clamp(0, w - 1) as usize;
                let enter = row + (x + 1 + r).clamp(0, w - 1) as usize;
                for c in 0..4 {
                    sum[c] = sum[c] - u32::from(src[leave][c]) + u32::from(src[enter][c]);
                }
            }
        }
        // Vertical: temp -> src.
        for x in 0..w as usize {
            let mut sum = [0_u32; 4];
            for i in -r..=r {
                let y = i.clamp(0, h - 1) as usize;
                for c in 0..4 {
                    sum[c] += u32::from(temp[y * w as usize + x][c]);
                }
            }
            for y in 0..h {
                for c in 0..4 {
                    src[(y * w) as usize + x][c] = (sum[c] / div) as u8;
                }
                let leave = (y - r).clamp(0, h - 1) as usize * w as usize + x;
                let enter = (y + 1 + r).clamp(0, h - 1) as usize * w as usize + x;
                for c in 0..4 {
                    sum[c] = sum[c] - u32::from(temp[leave][c]) + u32::from(temp[enter][c]);
                }
            }
        }
    }
    /// Straight-alpha readback of one pixel. `None` out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let px = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::new(px.red(), px.green(), px.blue(), px.alpha()))
    }
    /// The full buffer as straight-alpha RGBA bytes, row-major.
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<u8> {
        let pixels: Vec<[u8; 4]> = self
            .pixmap
            .pixels()
            .iter()
            .map(|px| {
                let px = px.demultiply();
                [px.red(), px.green(), px.blue(), px.alpha()]
            })
            .collect();
        bytemuck::cast_vec(pixels)
    }
}

impl Surface for Raster {
    fn blank(extent: u32) -> Self {
        Self::new(extent)
    }
    fn extent(&self) -> u32 {
        Self::extent(self)
    }
    fn resize_preserving(&mut self, extent: u32) {
        if extent == self.extent() {
            return;
        }
        let mut next = Self::new(extent);
        // Copy-at-origin semantics: no scaling, clipping on shrink, blank
        // reveal on grow.
        next.draw_over(self, 1.0, CompositeMode::SourceOver);
        *self = next;
    }
}

fn to_skia_color(color: Color, opacity: f32) -> tiny_skia::Color {
    let alpha = (f32::from(color.a) * opacity.clamp(0.0, 1.0)).round() as u8;
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, alpha)
}
fn to_skia_cap(cap: LineCap) -> tiny_skia::LineCap {
    match cap {
        LineCap::Butt => tiny_skia::LineCap::Butt,
        LineCap::Round => tiny_skia::LineCap::Round,
        LineCap::Square => tiny_skia::LineCap::Square,
    }
}
fn to_skia_join(join: LineJoin) -> tiny_skia::LineJoin {
    match join {
        LineJoin::Miter => tiny_skia::LineJoin::Miter,
        LineJoin::Round => tiny_skia::LineJoin::Round,
        LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
    }
}
fn to_skia_blend(mode: CompositeMode) -> tiny_skia::BlendMode {
    match mode {
        CompositeMode::SourceOver => tiny_skia::BlendMode::SourceOver,
        CompositeMode::Multiply => tiny_skia::BlendMode::Multiply,
        CompositeMode::Erase => tiny_skia::BlendMode::DestinationOut,
    }
}

#[cfg(test)]
mod test {
    use super::{Raster, StrokeStyle};
    use sketchpad_core::blend::CompositeMode;
    use sketchpad_core::color::Color;
    use sketchpad_core::stroke::Point;
    use sketchpad_core::surface::Surface;

    const RED: Color = Color::opaque(0xFF, 0, 0);

    #[test]
    fn resize_preserves_origin_content() {
        let mut raster = Raster::new(64);
        raster.fill_circle(Point::new(10.0, 10.0), 4.0, RED, 1.0);
        let before = raster.pixel(10, 10).unwrap();
        assert_eq!(before.a, 0xFF);

        raster.resize_preserving(128);
        assert_eq!(raster.extent(), 128);
        assert_eq!(raster.pixel(10, 10).unwrap(), before);
        // Newly revealed area is transparent.
        assert_eq!(raster.pixel(100, 100).unwrap().a, 0);

        raster.resize_preserving(8);
        assert_eq!(raster.extent(), 8);
        assert!(raster.pixel(10, 10).is_none());
    }
    #[test]
    fn erase_blend_removes_coverage() {
        let mut base = Raster::new(32);
        base.fill(RED);

        let mut hole = Raster::new(32);
        hole.fill_circle(Point::new(16.0, 16.0), 6.0, Color::BLACK, 1.0);

        base.draw_over(&hole, 1.0, CompositeMode::Erase);
        assert_eq!(base.pixel(16, 16).unwrap().a, 0);
        assert_eq!(base.pixel(2, 2).unwrap(), RED);
    }
    #[test]
    fn polyline_needs_two_points() {
        let mut raster = Raster::new(32);
        raster.stroke_polyline(&[Point::new(16.0, 16.0)], &StrokeStyle::solid(8.0, RED));
        assert!(raster.pixel(16, 16).unwrap().a == 0);

        raster.stroke_polyline(
            &[Point::new(4.0, 16.0), Point::new(28.0, 16.0)],
            &StrokeStyle::solid(8.0, RED),
        );
        assert!(raster.pixel(16, 16).unwrap().a > 0);
    }
    #[test]
    fn blur_spreads_coverage() {
        let mut raster = Raster::new(64);
        raster.fill_circle(Point::new(32.0, 32.0), 3.0, RED, 1.0);
        assert_eq!(raster.pixel(32, 44).unwrap().a, 0);

        raster.box_blur(10);
        assert!(raster.pixel(32, 44).unwrap().a > 0);
        // Center keeps some coverage too.
        assert!(raster.pixel(32, 32).unwrap().a > 0);
    }
    #[test]
    fn multiply_darkens() {
        let mut base = Raster::new(8);
        base.fill(Color::opaque(0x80, 0x80, 0x80));
        let mut band = Raster::new(8);
        band.fill(Color::opaque(0x80, 0x80, 0x80));

        base.draw_over(&band, 1.0, CompositeMode::Multiply);
        let px = base.pixel(4, 4).unwrap();
        assert!(px.r < 0x80);
    }
}
