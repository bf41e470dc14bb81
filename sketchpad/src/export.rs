//! # Export
//!
//! The single artifact the engine ever persists: a flattened PNG of the
//! background and all visible layers. No other state leaves memory.

use crate::raster::Raster;
use crate::renderer;
use sketchpad_core::color::Color;
use sketchpad_core::layer::LayerStack;

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("png encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Encode a flattened raster as PNG into `out`.
pub fn write_png<W: std::io::Write + std::io::Seek>(
    flat: &Raster,
    out: &mut W,
) -> Result<(), ExportError> {
    let (width, height) = (flat.width(), flat.height());
    let image: image::RgbaImage =
        // Infallible: `to_rgba8` is sized width * height * 4 by construction.
        image::ImageBuffer::from_raw(width, height, flat.to_rgba8())
            .expect("raster buffer matches its dimensions");
    image.write_to(out, image::ImageFormat::Png)?;
    Ok(())
}

/// Flatten the stack and encode it. Hidden layers are ignored; the
/// background sits beneath everything.
pub fn export_png<W: std::io::Write + std::io::Seek>(
    background: Color,
    stack: &LayerStack<Raster>,
    out: &mut W,
) -> Result<(), ExportError> {
    write_png(&renderer::flatten(background, stack), out)
}

#[cfg(test)]
mod test {
    use super::export_png;
    use crate::raster::Raster;
    use sketchpad_core::color::Color;
    use sketchpad_core::layer::LayerStack;
    use sketchpad_core::stroke::Point;

    #[test]
    fn png_round_trips_through_image() {
        let mut stack = LayerStack::<Raster>::new(1200);
        stack
            .active_mut()
            .surface
            .fill_circle(Point::new(50.0, 50.0), 5.0, Color::opaque(0xFF, 0, 0), 1.0);

        let mut bytes = std::io::Cursor::new(Vec::new());
        export_png(Color::WHITE, &stack, &mut bytes).unwrap();

        let decoded = image::load_from_memory(bytes.get_ref()).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (1200, 1200));
        assert_eq!(decoded.get_pixel(50, 50).0, [0xFF, 0, 0, 0xFF]);
        assert_eq!(decoded.get_pixel(600, 600).0, [0xFF, 0xFF, 0xFF, 0xFF]);
    }
}
