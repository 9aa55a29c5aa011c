//! The minimal per-draw and per-light data the Pass layer consumes. Scene
//! traversal and ECS integration are out of scope for this crate (see the
//! Scope section of the crate's module docs); callers hand the core a flat
//! list of these per frame.

use crate::handle::{IndexBufferHandle, VertexBufferHandle};
use ultraviolet::{Mat4, Vec3};

/// One opaque or transparent draw, already resolved to GPU-ready data: a
/// world transform, the vertex/index payload, and the default shader
/// contract's material constants (see the G-Buffer/default-pipeline layout
/// in the crate's module docs).
pub struct DrawCommand {
  pub world: Mat4,
  pub base_color: [f32; 4],
  /// metallic, roughness, emissive, normal_scale
  pub material_params: [f32; 4],
  pub vertices: Vec<u8>,
  pub vertex_stride: u32,
  pub indices: Option<Vec<u8>>,
  pub index_count: u32,
  /// Persistent handles, when the geometry was uploaded once via
  /// `RenderBackend::create_vertex_buffer`/`create_index_buffer` rather than
  /// supplied as raw bytes for this frame's transient arenas.
  pub vertex_buffer: Option<VertexBufferHandle>,
  pub index_buffer: Option<IndexBufferHandle>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LightKind {
  Directional,
  Point,
  Spot,
}

/// A single light contributing to the lighting pass's full-screen
/// accumulation. `range` and the cone angles are ignored by directional
/// lights.
pub struct Light {
  pub kind: LightKind,
  pub direction: Vec3,
  pub position: Vec3,
  pub color: [f32; 3],
  pub intensity: f32,
  pub range: f32,
  pub inner_cone_radians: f32,
  pub outer_cone_radians: f32,
}

impl Light {
  pub fn directional(direction: Vec3, color: [f32; 3], intensity: f32) -> Self {
    Self {
      kind: LightKind::Directional,
      direction,
      position: Vec3::zero(),
      color,
      intensity,
      range: 0.0,
      inner_cone_radians: 0.0,
      outer_cone_radians: 0.0,
    }
  }

  pub fn point(position: Vec3, color: [f32; 3], intensity: f32, range: f32) -> Self {
    Self {
      kind: LightKind::Point,
      direction: Vec3::zero(),
      position,
      color,
      intensity,
      range,
      inner_cone_radians: 0.0,
      outer_cone_radians: 0.0,
    }
  }
}
