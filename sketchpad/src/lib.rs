//! # sketchpad
//!
//! A raster drawing engine: freehand strokes with five tool styles, an
//! eraser, a multi-layer compositing stack over an oversized square
//! workspace, viewport pan/zoom, whole-raster snapshot undo, and PNG export.
//! [`session::Session`] is the single owner of all mutable drawing state;
//! everything else hangs off it.

pub mod brush;
pub mod config;
pub mod export;
pub mod raster;
pub mod renderer;
pub mod session;
pub mod viewport;
