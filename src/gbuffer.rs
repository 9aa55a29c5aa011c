//! The deferred pipeline's G-Buffer: four color targets plus depth, owned by
//! the pipeline that requires them and resized alongside its viewport. Since
//! this crate's backends don't allocate real GPU images, a target is
//! represented as a plain CPU-side buffer the geometry pass writes encoded
//! texels into and the lighting pass reads back; a real driver backend would
//! swap this for render-target views over actual images behind the same
//! indices.

use ultraviolet::Vec3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GBufferTarget {
  /// RT0: world-space position (xyz) + roughness (w).
  Position,
  /// RT1: encoded normal (xyz) + metallic (w).
  Normal,
  /// RT2: albedo (rgb) + ambient occlusion (a).
  Albedo,
  /// RT3: emissive (rgb) + material id (a).
  Emissive,
  Depth,
}

/// Encodes a unit normal into the `[0, 1]` range the Normal target stores,
/// per the G-Buffer layout: `encoded = normal * 0.5 + 0.5`.
pub fn encode_normal(normal: Vec3) -> Vec3 {
  normal * 0.5 + Vec3::broadcast(0.5)
}

/// Inverse of [`encode_normal`], used when a later pass needs to recover the
/// world-space normal from the stored texel.
pub fn decode_normal(encoded: Vec3) -> Vec3 {
  (encoded - Vec3::broadcast(0.5)) * 2.0
}

pub struct GBuffer {
  pub width: u32,
  pub height: u32,
  pub position_roughness: Vec<[f32; 4]>,
  pub normal_metallic: Vec<[f32; 4]>,
  pub albedo_ao: Vec<[f32; 4]>,
  pub emissive_material_id: Vec<[f32; 4]>,
  pub depth: Vec<f32>,
}

impl GBuffer {
  pub fn new(width: u32, height: u32) -> Self {
    let pixel_count = (width as usize) * (height as usize);
    Self {
      width,
      height,
      position_roughness: vec![[0.0; 4]; pixel_count],
      normal_metallic: vec![[0.0; 4]; pixel_count],
      albedo_ao: vec![[0.0; 4]; pixel_count],
      emissive_material_id: vec![[0.0; 4]; pixel_count],
      depth: vec![1.0; pixel_count],
    }
  }

  /// Resizes every target to match a new viewport, clearing their contents
  /// (same clear values `clear` would apply: zero color, depth 1.0).
  pub fn resize(&mut self, width: u32, height: u32) {
    *self = GBuffer::new(width, height);
  }

  /// Clears every color target to (0,0,0,0) and depth to 1.0, mirroring the
  /// geometry pass's per-frame MRT clear.
  pub fn clear(&mut self) {
    for target in [
      &mut self.position_roughness,
      &mut self.normal_metallic,
      &mut self.albedo_ao,
      &mut self.emissive_material_id,
    ] {
      for texel in target.iter_mut() {
        *texel = [0.0; 4];
      }
    }
    for depth in self.depth.iter_mut() {
      *depth = 1.0;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normal_encoding_round_trips() {
    let normal = Vec3::new(0.3, -0.6, 0.75);
    let encoded = encode_normal(normal);
    let decoded = decode_normal(encoded);
    assert!((decoded - normal).mag() < 1e-5);
  }

  #[test]
  fn resize_replaces_all_targets_with_new_extent() {
    let mut gbuffer = GBuffer::new(4, 4);
    gbuffer.resize(8, 2);
    assert_eq!(gbuffer.width, 8);
    assert_eq!(gbuffer.height, 2);
    assert_eq!(gbuffer.albedo_ao.len(), 16);
  }
}
