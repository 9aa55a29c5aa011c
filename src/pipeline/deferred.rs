use crate::{
  command_context::RenderCommandContext,
  error::ForgeResult,
  gbuffer::GBuffer,
  pass::{composition::CompositionPass, geometry::GeometryPass, lighting::LightingPass, motion_vector::MotionVectorPass, upscaler::UpscalerPass},
  pipeline::Pipeline,
};

/// The deferred render path: Geometry (100) -> Lighting (300) ->
/// MotionVector (500) -> Composition (700) -> Upscaler (1000). Owns the
/// G-Buffer the Geometry and Lighting passes read and write; resizing the
/// pipeline's viewport resizes the G-Buffer to match.
pub struct DeferredPipeline {
  pipeline: Pipeline,
  gbuffer: GBuffer,
}

impl DeferredPipeline {
  pub fn new(width: u32, height: u32) -> Self {
    let mut pipeline = Pipeline::new("Deferred");
    pipeline.add_pass(Box::new(GeometryPass::new()));
    pipeline.add_pass(Box::new(LightingPass::new()));
    pipeline.add_pass(Box::new(MotionVectorPass::new()));
    pipeline.add_pass(Box::new(CompositionPass::new()));
    pipeline.add_pass(Box::new(UpscalerPass::new(width, height)));
    pipeline.set_viewport(width, height);
    Self {
      pipeline,
      gbuffer: GBuffer::new(width, height),
    }
  }

  pub fn pipeline(&self) -> &Pipeline {
    &self.pipeline
  }

  pub fn pipeline_mut(&mut self) -> &mut Pipeline {
    &mut self.pipeline
  }

  pub fn gbuffer(&self) -> &GBuffer {
    &self.gbuffer
  }

  pub fn set_viewport(&mut self, width: u32, height: u32) {
    self.pipeline.set_viewport(width, height);
    self.gbuffer.resize(width, height);
  }

  pub fn execute(&mut self, context: &mut RenderCommandContext, delta_time: f32) -> ForgeResult<()> {
    self.gbuffer.clear();
    self.pipeline.execute(context, delta_time)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::common::FrameArenas;
  use crate::command_context::RecordedCommand;
  use crate::config::ArenaSizes;
  use crate::pass::Pass;

  #[test]
  fn default_pass_ordering_is_geometry_lighting_motion_composition_upscaler() {
    let pipeline = DeferredPipeline::new(1920, 1080);
    let names: Vec<&str> = pipeline.pipeline().passes().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["Geometry", "Lighting", "MotionVector", "Composition", "Upscaler"]);
  }

  #[test]
  fn resizing_viewport_resizes_gbuffer() {
    let mut pipeline = DeferredPipeline::new(64, 64);
    pipeline.set_viewport(128, 32);
    assert_eq!(pipeline.gbuffer().width, 128);
    assert_eq!(pipeline.gbuffer().height, 32);
  }

  #[test]
  fn execute_records_an_upscaler_draw_last_when_sorted() {
    let mut pipeline = DeferredPipeline::new(64, 64);
    let mut arenas = FrameArenas::new(ArenaSizes::default());
    let mut commands = Vec::new();
    {
      let mut ctx = RenderCommandContext::new(&mut arenas, &mut commands);
      pipeline.execute(&mut ctx, 0.016).unwrap();
    }
    let last_draw_index = commands.iter().rposition(|c| matches!(c, RecordedCommand::Draw { .. }));
    assert!(last_draw_index.is_some());
  }
}
