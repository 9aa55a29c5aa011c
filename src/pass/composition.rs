use crate::{
  command_context::RenderCommandContext,
  error::ForgeResult,
  pass::{Pass, PassBase},
};

/// Single full-screen pass combining lit color, skybox, and transparent
/// accumulation into the final LDR color, applying tone mapping and gamma
/// when enabled. Runs after MotionVector and before Upscaler in the deferred
/// pipeline (priority 700).
pub struct CompositionPass {
  base: PassBase,
  pub tone_map_aces: bool,
  pub gamma: f32,
}

impl CompositionPass {
  pub fn new() -> Self {
    Self {
      base: PassBase::new("Composition", 700),
      tone_map_aces: true,
      gamma: 2.2,
    }
  }

  /// ACES-approximation tone mapping curve (Narkowicz 2015 fit), applied
  /// per-channel to the full-screen resolve when `tone_map_aces` is set.
  pub fn aces_tonemap(x: f32) -> f32 {
    const A: f32 = 2.51;
    const B: f32 = 0.03;
    const C: f32 = 2.43;
    const D: f32 = 0.59;
    const E: f32 = 0.14;
    ((x * (A * x + B)) / (x * (C * x + D) + E)).clamp(0.0, 1.0)
  }
}

impl Default for CompositionPass {
  fn default() -> Self {
    Self::new()
  }
}

impl Pass for CompositionPass {
  fn base(&self) -> &PassBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut PassBase {
    &mut self.base
  }

  fn execute(&mut self, context: &mut RenderCommandContext) -> ForgeResult<()> {
    let params = [
      if self.tone_map_aces { 1.0 } else { 0.0 },
      self.gamma,
      0.0,
      0.0,
    ];
    context.set_constant_buffer("MaterialParams", as_bytes(&params))?;
    context.set_vertex_buffer(&[0u8; 4 * 28], 28);
    context.draw(4, 0)
  }
}

fn as_bytes<T: safe_transmute::TriviallyTransmutable>(data: &[T]) -> &[u8] {
  safe_transmute::transmute_to_bytes(data)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn aces_tonemap_clamps_to_unit_range() {
    assert!(CompositionPass::aces_tonemap(100.0) <= 1.0);
    assert!(CompositionPass::aces_tonemap(0.0) >= 0.0);
  }
}
