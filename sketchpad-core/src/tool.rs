//! # Tools
//!
//! Static registry mapping the external tool key onto rendering parameters.
//! Profiles are immutable, process-wide, and never mutated at runtime. The
//! eraser is *not* a tool - it is a session flag that overrides rendering to
//! destructive alpha removal regardless of the selected tool.

use crate::blend::CompositeMode;

/// The five built-in tools, keyed externally by their lowercase name.
#[derive(
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumString,
    PartialEq,
    Eq,
    Copy,
    Clone,
    Hash,
    Debug,
)]
#[strum(serialize_all = "lowercase")]
pub enum Tool {
    /// Soft multi-pass watercolor wash.
    Brush,
    /// Ink pen - solid line with a dashed overlay.
    Ink,
    /// Graphite pencil - jittered grain.
    Pencil,
    /// Broad marker with a color-matched shadow.
    Marker,
    /// Translucent multiply highlighter.
    Highlighter,
}

impl Tool {
    /// Parse the external string key. An unknown key yields `None`; the
    /// caller leaves the current tool unchanged.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        key.parse().ok()
    }
    #[must_use]
    pub const fn profile(self) -> &'static ToolProfile {
        match self {
            Self::Brush => &ToolProfile {
                width_scale: 1.0,
                opacity_scale: 1.0,
                composite: CompositeMode::SourceOver,
                cap: LineCap::Round,
                join: LineJoin::Round,
                mode: RenderMode::Wash,
            },
            Self::Ink => &ToolProfile {
                width_scale: 0.55,
                opacity_scale: 1.0,
                composite: CompositeMode::SourceOver,
                cap: LineCap::Round,
                join: LineJoin::Round,
                mode: RenderMode::Ink,
            },
            Self::Pencil => &ToolProfile {
                width_scale: 0.8,
                opacity_scale: 0.85,
                composite: CompositeMode::SourceOver,
                cap: LineCap::Round,
                join: LineJoin::Round,
                mode: RenderMode::Grain,
            },
            Self::Marker => &ToolProfile {
                width_scale: 1.6,
                opacity_scale: 0.9,
                composite: CompositeMode::SourceOver,
                cap: LineCap::Square,
                join: LineJoin::Bevel,
                mode: RenderMode::Marker,
            },
            Self::Highlighter => &ToolProfile {
                width_scale: 2.2,
                opacity_scale: 0.35,
                composite: CompositeMode::Multiply,
                cap: LineCap::Butt,
                join: LineJoin::Miter,
                mode: RenderMode::Highlight,
            },
        }
    }
}

/// Line cap shapes, mirroring the canvas model.
#[derive(strum::AsRefStr, PartialEq, Eq, Copy, Clone, Hash, Debug, Default)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// Line join shapes, mirroring the canvas model.
#[derive(strum::AsRefStr, PartialEq, Eq, Copy, Clone, Hash, Debug, Default)]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

/// Stylistic tag consumed by the stroke renderer's mode dispatch.
#[derive(strum::AsRefStr, strum::EnumIter, PartialEq, Eq, Copy, Clone, Hash, Debug, Default)]
pub enum RenderMode {
    /// Single solid stroke. The fallback when no richer style applies.
    #[default]
    Smooth,
    /// Layered blurred wash, jittered core, bristle edge, scatter, thin core.
    Wash,
    /// Solid line plus a thin dashed semi-transparent overlay.
    Ink,
    /// Base stroke plus progressively jittered, fading copies.
    Grain,
    /// Solid stroke over a soft color-matched drop shadow.
    Marker,
    /// Dashed translucent band; darkening comes from the profile's
    /// `Multiply` composite when the mark is applied to the stack.
    Highlight,
}

/// Immutable rendering parameters for one tool.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct ToolProfile {
    /// Multiplier on the session stroke width.
    pub width_scale: f32,
    /// Multiplier on the session opacity, applied when the finished mark is
    /// composited onto a layer.
    pub opacity_scale: f32,
    /// How the finished mark combines with layer content.
    pub composite: CompositeMode,
    pub cap: LineCap,
    pub join: LineJoin,
    pub mode: RenderMode,
}
