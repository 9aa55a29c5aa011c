use crate::{
  command_context::RenderCommandContext,
  error::ForgeResult,
  pass::{Pass, PassBase},
  scene::{Light, LightKind},
};
use log::warn;
use ultraviolet::{Mat4, Vec3};

/// Reads the four G-Buffer color targets and writes one HDR color target.
/// Each light is a full-screen-quad draw; every light after the first uses
/// additive blending (modeled here as appending to the same output rather
/// than overwriting it -- see `LightingPass::execute`). Runs after Geometry
/// in the deferred pipeline (priority 300).
pub struct LightingPass {
  base: PassBase,
  lights: Vec<Light>,
  camera_position: Vec3,
  inverse_view_projection: Mat4,
}

impl LightingPass {
  pub fn new() -> Self {
    Self {
      base: PassBase::new("Lighting", 300),
      lights: Vec::new(),
      camera_position: Vec3::zero(),
      inverse_view_projection: Mat4::identity(),
    }
  }

  pub fn set_lights(&mut self, lights: Vec<Light>) {
    self.lights = lights;
  }

  pub fn set_camera_position(&mut self, position: Vec3) {
    self.camera_position = position;
  }

  /// Binds the inverse view-projection matrix this pass needs, alongside the
  /// camera position, to reconstruct world-space position from the G-Buffer's
  /// depth for each lit texel.
  pub fn set_inverse_view_projection(&mut self, inverse_view_projection: Mat4) {
    self.inverse_view_projection = inverse_view_projection;
  }
}

impl Default for LightingPass {
  fn default() -> Self {
    Self::new()
  }
}

impl Pass for LightingPass {
  fn base(&self) -> &PassBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut PassBase {
    &mut self.base
  }

  fn execute(&mut self, context: &mut RenderCommandContext) -> ForgeResult<()> {
    if self.lights.is_empty() {
      warn!("lighting pass has no lights this frame; G-Buffer will read as unlit");
      return Ok(());
    }

    // Camera constant block: position followed by the inverse view-projection
    // matrix, bound to the ViewProjection slot (there is no separate "Camera"
    // slot in the default shader contract).
    let mut camera_block = bytemuck_like(&vec3_to_array(self.camera_position)).to_vec();
    camera_block.extend_from_slice(&crate::command_context::pod_bytes(&self.inverse_view_projection));
    context.set_constant_buffer("ViewProjection", &camera_block)?;

    for light in &self.lights {
      let light_constants = match light.kind {
        LightKind::Directional => {
          let direction = vec3_to_array(light.direction);
          pack_light_constants(direction, light.color, light.intensity, 0.0)
        }
        LightKind::Point | LightKind::Spot => {
          let position = vec3_to_array(light.position);
          pack_light_constants(position, light.color, light.intensity, light.range)
        }
      };
      context.set_constant_buffer("BaseColor", &light_constants)?;
      // Full-screen quad: 4 vertices, no index buffer, matching the
      // composition/upscaler passes' full-screen draws.
      context.set_vertex_buffer(&[0u8; 4 * 28], 28);
      context.draw(4, 0)?;
    }
    Ok(())
  }
}

fn pack_light_constants(vector: [f32; 3], color: [f32; 3], intensity: f32, range: f32) -> [u8; 32] {
  let mut bytes = [0u8; 32];
  let floats = [vector[0], vector[1], vector[2], intensity, color[0], color[1], color[2], range];
  for (i, value) in floats.iter().enumerate() {
    bytes[i * 4..i * 4 + 4].copy_from_slice(&value.to_le_bytes());
  }
  bytes
}

fn bytemuck_like(data: &[f32; 3]) -> &[u8] {
  safe_transmute::transmute_to_bytes(data)
}

fn vec3_to_array(v: Vec3) -> [f32; 3] {
  [v.x, v.y, v.z]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::common::FrameArenas;
  use crate::config::ArenaSizes;
  use crate::command_context::RecordedCommand;

  #[test]
  fn one_draw_per_light() {
    let mut pass = LightingPass::new();
    pass.set_lights(vec![
      Light::directional(Vec3::new(0.0, -1.0, 0.0), [1.0, 1.0, 1.0], 1.0),
      Light::point(Vec3::new(1.0, 2.0, 3.0), [1.0, 0.0, 0.0], 2.0, 10.0),
    ]);

    let mut arenas = FrameArenas::new(ArenaSizes::default());
    let mut commands = Vec::new();
    {
      let mut ctx = RenderCommandContext::new(&mut arenas, &mut commands);
      pass.execute(&mut ctx).unwrap();
    }

    let draw_count = commands.iter().filter(|c| matches!(c, RecordedCommand::Draw { .. })).count();
    assert_eq!(draw_count, 2);
  }

  #[test]
  fn no_lights_draws_nothing() {
    let mut pass = LightingPass::new();
    let mut arenas = FrameArenas::new(ArenaSizes::default());
    let mut commands = Vec::new();
    let mut ctx = RenderCommandContext::new(&mut arenas, &mut commands);
    pass.execute(&mut ctx).unwrap();
    assert!(commands.is_empty());
  }

  #[test]
  fn binds_the_camera_constant_block_before_any_light() {
    let mut pass = LightingPass::new();
    pass.set_camera_position(Vec3::new(1.0, 2.0, 3.0));
    pass.set_inverse_view_projection(Mat4::identity());
    pass.set_lights(vec![Light::directional(Vec3::new(0.0, -1.0, 0.0), [1.0, 1.0, 1.0], 1.0)]);

    let mut arenas = FrameArenas::new(ArenaSizes::default());
    let mut commands = Vec::new();
    let mut ctx = RenderCommandContext::new(&mut arenas, &mut commands);
    pass.execute(&mut ctx).unwrap();

    let first_bind = commands
      .iter()
      .find(|c| matches!(c, RecordedCommand::BindConstant { .. }))
      .unwrap();
    assert!(matches!(first_bind, RecordedCommand::BindConstant { slot, .. } if *slot == 0));
  }
}
