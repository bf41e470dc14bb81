//! # Compositing modes
//!
//! The handful of canvas composite operations the engine actually uses. The
//! raster backend maps these onto its own blend enum at the surface seam.

#[derive(strum::AsRefStr, strum::EnumIter, PartialEq, Eq, Copy, Clone, Hash, Debug)]
#[repr(u8)]
pub enum CompositeMode {
    /// Source pixels over destination, the ordinary paint behavior.
    SourceOver,
    /// Darkens the destination by the source. Applying a highlighter mark
    /// with this mode is what produces highlighter-over-ink darkening rather
    /// than a plain overlay.
    Multiply,
    /// Removes destination coverage wherever the source has any. The eraser
    /// applies its mark with this mode; no color is contributed.
    Erase,
}
impl Default for CompositeMode {
    fn default() -> Self {
        Self::SourceOver
    }
}
