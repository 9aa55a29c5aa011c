//! The API-neutral recording surface Passes record draws through. Grounded
//! on the shape of a Vulkan-like command-buffer + bound-descriptor-set
//! recording pass: copy caller data into a per-frame arena, bind the
//! resulting range, draw.

use crate::{
  backend::common::{slot_for_name, FrameArenas},
  error::{ForgeError, ForgeResult},
};
use log::warn;

/// Reinterprets a `Copy` POD value (a matrix, a fixed-size color) as bytes
/// for upload into a constant arena. `T` must have no padding and no
/// pointers, the same requirement `Arena::alloc_slice` places on its
/// elements; used where the value's type (e.g. `ultraviolet::Mat4`) can't
/// implement `safe_transmute::TriviallyTransmutable` itself.
pub fn pod_bytes<T: Copy>(value: &T) -> Vec<u8> {
  let bytes: &[u8] = unsafe { std::slice::from_raw_parts(value as *const T as *const u8, std::mem::size_of::<T>()) };
  bytes.to_vec()
}

/// One recorded step of a frame's command list. The software backends
/// collect these instead of issuing real GPU calls; tests assert against
/// this trace directly (see the deferred-pipeline-ordering scenario).
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
  /// The render target's load-clear, recorded once per `begin_frame` with
  /// the color the caller (or [`crate::camera::clear_color_from_camera`])
  /// supplied.
  Clear { color: [f32; 4] },
  SetViewport { x: f32, y: f32, width: f32, height: f32 },
  SetScissor { left: i32, top: i32, right: i32, bottom: i32 },
  BindVertexBuffer { gpu_address: u64, stride: u32 },
  BindIndexBuffer { gpu_address: u64, is_16_bit: bool },
  BindConstant { slot: u32, gpu_address: u64 },
  Draw { vertex_count: u32, start_vertex: u32 },
  DrawIndexed { index_count: u32, start_index: u32, base_vertex: i32 },
}

/// A per-frame, non-owning recording surface. Borrows the backend's arenas
/// and command list for exactly as long as the caller is recording; it must
/// not outlive the enclosing `begin_frame`...`end_frame` pair, which the
/// borrow checker enforces via the lifetime tying it to the backend.
pub struct RenderCommandContext<'a> {
  arenas: &'a mut FrameArenas,
  commands: &'a mut Vec<RecordedCommand>,
  vertex_bound: bool,
  index_bound: bool,
}

impl<'a> RenderCommandContext<'a> {
  pub fn new(arenas: &'a mut FrameArenas, commands: &'a mut Vec<RecordedCommand>) -> Self {
    Self {
      arenas,
      commands,
      vertex_bound: false,
      index_bound: false,
    }
  }

  pub fn set_viewport(&mut self, x: f32, y: f32, width: f32, height: f32) -> ForgeResult<()> {
    if width <= 0.0 || height <= 0.0 {
      warn!("rejected degenerate viewport {}x{}", width, height);
      return Err(ForgeError::InvalidViewport);
    }
    self.commands.push(RecordedCommand::SetViewport { x, y, width, height });
    Ok(())
  }

  pub fn set_scissor_rect(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> ForgeResult<()> {
    if right <= left || bottom <= top {
      warn!("rejected degenerate scissor rect ({},{})-({},{})", left, top, right, bottom);
      return Err(ForgeError::InvalidScissor);
    }
    self.commands.push(RecordedCommand::SetScissor { left, top, right, bottom });
    Ok(())
  }

  /// Copies `data` into the constant arena, aligned to 256 bytes, and binds
  /// the resulting address to `name`'s fixed slot. Unknown names are logged
  /// and rejected with [`ForgeError::UnknownConstantName`], leaving arena
  /// offsets and bindings unchanged.
  pub fn set_constant_buffer(&mut self, name: &str, data: &[u8]) -> ForgeResult<()> {
    let slot = match slot_for_name(name) {
      Some(slot) => slot,
      None => {
        warn!("unrecognized constant buffer name '{}', skipping bind", name);
        return Err(ForgeError::UnknownConstantName(name.to_string()));
      }
    };
    let (_, gpu_address) = self
      .arenas
      .constant
      .alloc_fixed_block(data, crate::backend::common::CONSTANT_ARENA_ALIGNMENT);
    self.commands.push(RecordedCommand::BindConstant {
      slot: slot as u32,
      gpu_address,
    });
    Ok(())
  }

  /// Copies `data` into the vertex arena (16-byte aligned) and binds it with
  /// the given stride.
  pub fn set_vertex_buffer(&mut self, data: &[u8], stride: u32) {
    let (_, gpu_address) = self.arenas.vertex.alloc_bytes(data);
    self.commands.push(RecordedCommand::BindVertexBuffer { gpu_address, stride });
    self.vertex_bound = true;
  }

  /// Copies `data` into the index arena (4-byte aligned) and binds it.
  pub fn set_index_buffer(&mut self, data: &[u8], is_16_bit: bool) {
    let (_, gpu_address) = self.arenas.index.alloc_bytes(data);
    self.commands.push(RecordedCommand::BindIndexBuffer { gpu_address, is_16_bit });
    self.index_bound = true;
  }

  /// Placeholder hook: shader resource views aren't modeled beyond the
  /// G-Buffer wiring the Passes perform directly, so this logs and no-ops.
  pub fn set_shader_resource(&mut self, name: &str) {
    warn!("set_shader_resource('{}') is unimplemented in this backend", name);
  }

  pub fn set_sampler(&mut self, name: &str) {
    warn!("set_sampler('{}') is unimplemented in this backend", name);
  }

  pub fn draw(&mut self, vertex_count: u32, start_vertex: u32) -> ForgeResult<()> {
    if !self.vertex_bound {
      warn!("draw issued with no vertex buffer bound");
      return Err(ForgeError::ResourceNotBound);
    }
    self.commands.push(RecordedCommand::Draw { vertex_count, start_vertex });
    Ok(())
  }

  pub fn draw_indexed(&mut self, index_count: u32, start_index: u32, base_vertex: i32) -> ForgeResult<()> {
    if !self.vertex_bound || !self.index_bound {
      warn!("draw_indexed issued without both a vertex and index buffer bound");
      return Err(ForgeError::ResourceNotBound);
    }
    self.commands.push(RecordedCommand::DrawIndexed {
      index_count,
      start_index,
      base_vertex,
    });
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ArenaSizes;

  fn fresh() -> (FrameArenas, Vec<RecordedCommand>) {
    (FrameArenas::new(ArenaSizes::default()), Vec::new())
  }

  #[test]
  fn draw_without_vertex_buffer_is_rejected() {
    let (mut arenas, mut commands) = fresh();
    let mut ctx = RenderCommandContext::new(&mut arenas, &mut commands);
    assert!(matches!(ctx.draw(3, 0), Err(ForgeError::ResourceNotBound)));
  }

  #[test]
  fn triangle_advances_vertex_arena_by_aligned_size() {
    let (mut arenas, mut commands) = fresh();
    let mut ctx = RenderCommandContext::new(&mut arenas, &mut commands);
    let vertices: [u8; 84] = [0; 84]; // 3 vertices * 28-byte stride
    ctx.set_vertex_buffer(&vertices, 28);
    ctx.draw(3, 0).unwrap();
    assert_eq!(arenas.vertex.current_offset(), 96); // 84 aligned up to 16
  }

  #[test]
  fn unknown_constant_name_leaves_offsets_and_bindings_unchanged() {
    let (mut arenas, mut commands) = fresh();
    let before = arenas.constant.current_offset();
    let mut ctx = RenderCommandContext::new(&mut arenas, &mut commands);
    assert!(matches!(
      ctx.set_constant_buffer("NotARealSlot", &[0u8; 16]),
      Err(ForgeError::UnknownConstantName(name)) if name == "NotARealSlot"
    ));
    assert_eq!(arenas.constant.current_offset(), before);
    assert!(commands.is_empty());
  }

  #[test]
  fn constant_buffer_alignment_sequence() {
    let (mut arenas, mut commands) = fresh();
    arenas.constant.alloc_bytes(&[0u8; 17]); // push offset to 17
    let mut ctx = RenderCommandContext::new(&mut arenas, &mut commands);
    // 17 aligns up to 256, then the whole 256-byte block is reserved: 256+256=512.
    ctx.set_constant_buffer("ViewProjection", &[0u8; 64]).unwrap();
    assert_eq!(arenas.constant.current_offset(), 512);
    // 512 is already block-aligned, so the next block runs 512..768.
    ctx.set_constant_buffer("World", &[0u8; 64]).unwrap();
    assert_eq!(arenas.constant.current_offset(), 768);
  }
}
