//! # Layer stack
//!
//! Ordered collection of independently-rendered raster surfaces. Index is
//! z-order: higher index is drawn later and sits visually on top. At least
//! one layer always exists - deletion is refused when exactly one remains.

use crate::surface::Surface;

/// Layer IDs share one namespace regardless of the surface parameter.
pub type LayerId = crate::RuntimeID<Layer<()>>;

/// One raster layer. The surface is owned; it is destroyed by explicit
/// deletion or when a snapshot restore replaces the stack wholesale.
#[derive(Clone, Debug)]
pub struct Layer<S> {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub surface: S,
}

impl<S: Surface> Layer<S> {
    fn blank(name: String, extent: u32) -> Self {
        Self {
            id: LayerId::default(),
            name,
            visible: true,
            surface: S::blank(extent),
        }
    }
}

/// Direction of a one-position reorder.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StackShift {
    /// Toward the top of the stack (drawn later).
    Up,
    /// Toward the bottom.
    Down,
}

pub struct LayerStack<S> {
    layers: Vec<Layer<S>>,
    active: usize,
    extent: u32,
    /// Running count for generated names; survives deletions so names don't
    /// repeat within a session.
    named: usize,
}

impl<S: Surface> LayerStack<S> {
    /// A stack starts with a single blank base layer, active.
    #[must_use]
    pub fn new(extent: u32) -> Self {
        Self {
            layers: vec![Layer::blank("Layer 1".into(), extent)],
            active: 0,
            extent,
            named: 1,
        }
    }
    #[must_use]
    pub fn extent(&self) -> u32 {
        self.extent
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        // The one-layer invariant makes this always false; provided for the
        // conventional pair with `len`.
        self.layers.is_empty()
    }
    /// Bottom-to-top, compositing order.
    pub fn iter(&self) -> impl Iterator<Item = &Layer<S>> + '_ {
        self.layers.iter()
    }
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Layer<S>> + '_ {
        self.layers.iter_mut()
    }
    #[must_use]
    pub fn get(&self, id: LayerId) -> Option<&Layer<S>> {
        self.layers.iter().find(|layer| layer.id == id)
    }
    #[must_use]
    pub fn active(&self) -> &Layer<S> {
        // Index kept in-bounds by every mutation below.
        &self.layers[self.active]
    }
    pub fn active_mut(&mut self) -> &mut Layer<S> {
        &mut self.layers[self.active]
    }
    #[must_use]
    pub fn active_id(&self) -> LayerId {
        self.active().id
    }
    /// Make `id` active. False (and no change) for an unknown id.
    pub fn set_active(&mut self, id: LayerId) -> bool {
        match self.layers.iter().position(|layer| layer.id == id) {
            Some(index) => {
                self.active = index;
                true
            }
            None => {
                log::debug!("set_active: no layer {id}");
                false
            }
        }
    }
    /// Insert a blank layer immediately above the active layer; it becomes
    /// active.
    pub fn add(&mut self) -> LayerId {
        self.named += 1;
        let layer = Layer::blank(format!("Layer {}", self.named), self.extent);
        let id = layer.id;
        self.active += 1;
        self.layers.insert(self.active, layer);
        log::debug!("added {id} at z {}", self.active);
        id
    }
    /// Delete the active layer. Refused (false) when it is the last one;
    /// otherwise the previous index becomes active, clamped to the first.
    pub fn delete_active(&mut self) -> bool {
        if self.layers.len() == 1 {
            log::debug!("refusing to delete the last layer");
            return false;
        }
        let removed = self.layers.remove(self.active);
        log::debug!("deleted {}", removed.id);
        self.active = self.active.saturating_sub(1);
        true
    }
    /// Swap the active layer with its neighbor. No-op (false) at the stack
    /// boundary. The moved layer stays active.
    pub fn shift_active(&mut self, direction: StackShift) -> bool {
        let neighbor = match direction {
            StackShift::Up if self.active + 1 < self.layers.len() => self.active + 1,
            StackShift::Down if self.active > 0 => self.active - 1,
            _ => return false,
        };
        self.layers.swap(self.active, neighbor);
        self.active = neighbor;
        true
    }
    /// Toggle visibility. False for an unknown id.
    pub fn toggle_visible(&mut self, id: LayerId) -> bool {
        match self.layers.iter_mut().find(|layer| layer.id == id) {
            Some(layer) => {
                layer.visible = !layer.visible;
                true
            }
            None => false,
        }
    }
    /// Resize every surface in lock-step, content anchored at the origin.
    pub fn resize(&mut self, extent: u32) {
        self.extent = extent;
        for layer in &mut self.layers {
            layer.surface.resize_preserving(extent);
        }
    }
    /// Replace the stack wholesale from a snapshot. An unknown active id
    /// falls back to the base layer. A snapshot with zero layers would break
    /// the stack invariant and is refused outright - unreachable from any
    /// committed state, since commits happen only with a layer present.
    pub fn restore(&mut self, layers: Vec<Layer<S>>, active: LayerId, extent: u32) {
        if layers.is_empty() {
            log::warn!("refusing to restore a snapshot with zero layers");
            return;
        }
        self.layers = layers;
        self.extent = extent;
        self.active = self
            .layers
            .iter()
            .position(|layer| layer.id == active)
            .unwrap_or(0);
    }
}
