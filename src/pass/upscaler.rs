use crate::{
  command_context::RenderCommandContext,
  error::ForgeResult,
  handle::TextureHandle,
  pass::{Pass, PassBase},
};

/// Consumes composition's color output, depth, and motion vectors, and
/// produces display-resolution output; the concrete upscaling technology is
/// selected elsewhere (see [`UpscalerManager`]), this pass only owns the
/// jitter sequence and the pass ordering contract. Runs last in the deferred
/// pipeline (priority 1000).
pub struct UpscalerPass {
  base: PassBase,
  frame_index: u32,
  pub display_width: u32,
  pub display_height: u32,
  color_input: Option<TextureHandle>,
  depth_input: Option<TextureHandle>,
  motion_vectors_input: Option<TextureHandle>,
  normals_input: Option<TextureHandle>,
}

impl UpscalerPass {
  pub fn new(display_width: u32, display_height: u32) -> Self {
    Self {
      base: PassBase::new("Upscaler", 1000),
      frame_index: 0,
      display_width,
      display_height,
      color_input: None,
      depth_input: None,
      motion_vectors_input: None,
      normals_input: None,
    }
  }

  /// Binds composition's resolved color output, the depth target, and the
  /// motion vector target this pass reads to produce its display-resolution
  /// output. Normals are optional (not every upscaling technique samples
  /// them).
  pub fn set_inputs(&mut self, color: TextureHandle, depth: TextureHandle, motion_vectors: TextureHandle, normals: Option<TextureHandle>) {
    self.color_input = Some(color);
    self.depth_input = Some(depth);
    self.motion_vectors_input = Some(motion_vectors);
    self.normals_input = normals;
  }

  /// The current frame's sub-pixel jitter offset, in `[-0.5, 0.5]` texel
  /// units, from a Halton(2, 3) sequence repeating every 16 frames.
  pub fn current_jitter(&self) -> (f32, f32) {
    let index = (self.frame_index % 16) + 1;
    (halton(index, 2) - 0.5, halton(index, 3) - 0.5)
  }

  pub fn advance_frame(&mut self) {
    self.frame_index = self.frame_index.wrapping_add(1);
  }
}

impl Default for UpscalerPass {
  fn default() -> Self {
    Self::new(1920, 1080)
  }
}

/// The Halton low-discrepancy sequence for a given `index` (1-based) and
/// coprime `base`.
fn halton(mut index: u32, base: u32) -> f32 {
  let mut result = 0.0f32;
  let mut fraction = 1.0f32;
  while index > 0 {
    fraction /= base as f32;
    result += fraction * (index % base) as f32;
    index /= base;
  }
  result
}

impl Pass for UpscalerPass {
  fn base(&self) -> &PassBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut PassBase {
    &mut self.base
  }

  fn execute(&mut self, context: &mut RenderCommandContext) -> ForgeResult<()> {
    let (jitter_x, jitter_y) = self.current_jitter();
    context.set_constant_buffer(
      "MaterialParams",
      &[
        jitter_x.to_le_bytes(),
        jitter_y.to_le_bytes(),
        self.display_width.to_le_bytes(),
        self.display_height.to_le_bytes(),
      ]
      .concat(),
    )?;
    for (label, resource) in [
      ("ColorInput", self.color_input),
      ("DepthInput", self.depth_input),
      ("MotionVectorsInput", self.motion_vectors_input),
      ("NormalsInput", self.normals_input),
    ] {
      if let Some(handle) = resource {
        context.set_shader_resource(&format!("{}:{:?}", label, handle));
      }
    }
    context.set_vertex_buffer(&[0u8; 4 * 28], 28);
    let result = context.draw(4, 0);
    self.advance_frame();
    result
  }
}
