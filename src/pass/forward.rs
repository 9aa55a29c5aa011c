use crate::{
  command_context::RenderCommandContext,
  error::ForgeResult,
  pass::{Pass, PassBase},
  scene::DrawCommand,
};
use log::warn;

/// Single-pass forward draw straight to the main color target, for the
/// forward pipeline. Priority 100, mirroring where Geometry sits in the
/// deferred pipeline.
pub struct ForwardPass {
  base: PassBase,
  draws: Vec<DrawCommand>,
}

impl ForwardPass {
  pub fn new() -> Self {
    Self {
      base: PassBase::new("Forward", 100),
      draws: Vec::new(),
    }
  }

  pub fn set_draws(&mut self, draws: Vec<DrawCommand>) {
    self.draws = draws;
  }
}

impl Default for ForwardPass {
  fn default() -> Self {
    Self::new()
  }
}

impl Pass for ForwardPass {
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
      context.set_vertex_buffer(&draw.vertices, draw.vertex_stride);
      let result = match &draw.indices {
        Some(indices) => {
          context.set_index_buffer(indices, false);
          context.draw_indexed(draw.index_count, 0, 0)
        }
        None => context.draw(draw.index_count, 0),
      };
      if let Err(e) = result {
        warn!("forward pass skipped a draw: {}", e);
      }
    }
    Ok(())
  }
}

fn as_bytes<T: safe_transmute::TriviallyTransmutable>(data: &[T]) -> &[u8] {
  safe_transmute::transmute_to_bytes(data)
}
