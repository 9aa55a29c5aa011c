use crate::{
  command_context::RenderCommandContext,
  error::ForgeResult,
  handle::TextureHandle,
  pass::{Pass, PassBase},
};
use log::warn;
use ultraviolet::Mat4;

/// Writes a 2-channel screen-space velocity target by reconstructing
/// world-space position from current depth and reprojecting it through the
/// previous frame's view-projection matrix. Requires both view-projections
/// and both depth targets to be set before `execute`; runs after Lighting and
/// before Composition (priority 500).
pub struct MotionVectorPass {
  base: PassBase,
  current_view_projection: Mat4,
  previous_view_projection: Mat4,
  current_depth: Option<TextureHandle>,
  previous_depth: Option<TextureHandle>,
}

impl MotionVectorPass {
  pub fn new() -> Self {
    Self {
      base: PassBase::new("MotionVector", 500),
      current_view_projection: Mat4::identity(),
      previous_view_projection: Mat4::identity(),
      current_depth: None,
      previous_depth: None,
    }
  }

  pub fn set_view_projections(&mut self, current: Mat4, previous: Mat4) {
    self.current_view_projection = current;
    self.previous_view_projection = previous;
  }

  /// Binds the current and previous frame's depth targets this pass samples
  /// to reconstruct world-space position before reprojecting it.
  pub fn set_depth_targets(&mut self, current: TextureHandle, previous: TextureHandle) {
    self.current_depth = Some(current);
    self.previous_depth = Some(previous);
  }

  /// Screen-space velocity for a point given its current and reprojected
  /// clip-space positions (both already perspective-divided to NDC).
  pub fn velocity(current_ndc: [f32; 2], previous_ndc: [f32; 2]) -> [f32; 2] {
    [current_ndc[0] - previous_ndc[0], current_ndc[1] - previous_ndc[1]]
  }
}

impl Default for MotionVectorPass {
  fn default() -> Self {
    Self::new()
  }
}

impl Pass for MotionVectorPass {
  fn base(&self) -> &PassBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut PassBase {
    &mut self.base
  }

  fn execute(&mut self, context: &mut RenderCommandContext) -> ForgeResult<()> {
    context.set_constant_buffer("ViewProjection", &crate::command_context::pod_bytes(&self.current_view_projection))?;
    context.set_constant_buffer("World", &crate::command_context::pod_bytes(&self.previous_view_projection))?;
    match (self.current_depth, self.previous_depth) {
      (Some(current), Some(previous)) => {
        context.set_shader_resource(&format!("CurrentDepth:{:?}", current));
        context.set_shader_resource(&format!("PreviousDepth:{:?}", previous));
      }
      _ => warn!("motion vector pass executing without both depth targets bound"),
    }
    context.set_vertex_buffer(&[0u8; 4 * 28], 28);
    context.draw(4, 0)
  }
}
