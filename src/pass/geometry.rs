use crate::{
  command_context::RenderCommandContext,
  error::ForgeResult,
  gbuffer::encode_normal,
  pass::{Pass, PassBase},
  scene::DrawCommand,
};
use log::warn;
use ultraviolet::Vec3;

/// Writes opaque geometry into the G-Buffer's four color targets plus depth.
/// Runs first in the deferred pipeline (priority 100): binds each draw's
/// material constants and world matrix, then issues an indexed draw per
/// [`DrawCommand`]. Per-draw failures are logged and the pass continues,
/// matching the crate-wide log-and-continue policy for non-fatal errors.
pub struct GeometryPass {
  base: PassBase,
  draws: Vec<DrawCommand>,
}

impl GeometryPass {
  pub fn new() -> Self {
    Self {
      base: PassBase::new("Geometry", 100),
      draws: Vec::new(),
    }
  }

  pub fn set_draws(&mut self, draws: Vec<DrawCommand>) {
    self.draws = draws;
  }
}

impl Default for GeometryPass {
  fn default() -> Self {
    Self::new()
  }
}

impl Pass for GeometryPass {
  fn base(&self) -> &PassBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut PassBase {
    &mut self.base
  }

  fn execute(&mut self, context: &mut RenderCommandContext) -> ForgeResult<()> {
    for draw in &self.draws {
      context.set_constant_buffer("World", &crate::command_context::pod_bytes(&draw.world))?;
      context.set_constant_buffer("BaseColor", as_bytes(&draw.base_color))?;
      context.set_constant_buffer("MaterialParams", as_bytes(&draw.material_params))?;
      context.set_vertex_buffer(&draw.vertices, draw.vertex_stride);

      let result = match &draw.indices {
        Some(indices) => {
          context.set_index_buffer(indices, false);
          context.draw_indexed(draw.index_count, 0, 0)
        }
        None => context.draw(draw.index_count, 0),
      };
      if let Err(e) = result {
        warn!("geometry pass skipped a draw: {}", e);
      }
    }
    Ok(())
  }
}

fn as_bytes<T: safe_transmute::TriviallyTransmutable>(data: &[T]) -> &[u8] {
  safe_transmute::transmute_to_bytes(data)
}

/// Writes the tangent-space normal encoding the geometry pass stores into
/// RT1, exposed so higher layers composing custom geometry passes reuse the
/// same encoding as the built-in pass.
pub fn encode_world_normal(normal: Vec3) -> Vec3 {
  encode_normal(normal)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::common::FrameArenas;
  use crate::config::ArenaSizes;
  use crate::command_context::RecordedCommand;
  use ultraviolet::Mat4;

  #[test]
  fn records_world_and_material_constants_before_drawing() {
    let mut pass = GeometryPass::new();
    pass.set_draws(vec![DrawCommand {
      world: Mat4::identity(),
      base_color: [1.0, 0.0, 0.0, 1.0],
      material_params: [0.0, 0.5, 0.0, 1.0],
      vertices: vec![0u8; 28 * 3],
      vertex_stride: 28,
      indices: None,
      index_count: 3,
      vertex_buffer: None,
      index_buffer: None,
    }]);

    let mut arenas = FrameArenas::new(ArenaSizes::default());
    let mut commands = Vec::new();
    {
      let mut ctx = RenderCommandContext::new(&mut arenas, &mut commands);
      pass.execute(&mut ctx).unwrap();
    }

    assert!(commands.iter().any(|c| matches!(c, RecordedCommand::BindConstant { slot, .. } if *slot == 1)));
    assert!(commands.iter().any(|c| matches!(c, RecordedCommand::Draw { .. })));
  }
}
