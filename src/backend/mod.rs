//! The Render Backend contract and its two implementations.
//!
//! Both [`vulkan_like`] and [`d3d12_like`] are deterministic, host-testable
//! software models of their respective GPU API's frame bookkeeping --
//! acquire/fence/semaphore tracking, per-frame arena resets, pass ordering --
//! rather than bindings to a real driver. A real driver backend slots in
//! behind the same [`RenderBackend`] trait without any change above this
//! module: the Pass/Pipeline layer only ever sees
//! [`crate::command_context::RenderCommandContext`].
//!
//! The two backends share the bookkeeping in [`common`] (arena lifecycle,
//! fence/semaphore simulation, frame-state tracking) and differ only in the
//! shape of their resource tables and constant-buffer binding model, mirroring
//! how a real Vulkan-like and D3D12-like backend would genuinely duplicate
//! device/queue/command-list code but share nothing structurally reusable
//! across APIs.

pub mod common;
pub mod d3d12_like;
pub mod vulkan_like;

use crate::{
  command_context::RenderCommandContext,
  error::ForgeResult,
  handle::{IndexBufferHandle, TextureHandle, VertexBufferHandle},
};

/// Capability query surface; concrete backends answer truthfully for what
/// their software model supports.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Feature {
  MultiThreadedRecording,
  BindlessTextures,
  ComputeShaders,
}

/// The state machine from the frame-lifecycle design: a backend is either
/// between frames or in the middle of recording one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameState {
  Idle,
  FrameActive,
}

/// Shape every concrete backend presents to the Pass/Pipeline layer. See the
/// per-operation contract table this trait is grounded on for the exact
/// guarantees of each method.
pub trait RenderBackend {
  /// Uploads persistent (non-transient) geometry once and returns a handle
  /// into the backend's resource tables, for meshes that outlive a single
  /// frame. The per-frame command context's `set_vertex_buffer` is a
  /// separate, arena-backed path for dynamic data (see its docs).
  fn create_vertex_buffer(&self, data: &[u8]) -> VertexBufferHandle;
  fn create_index_buffer(&self, data: &[u8]) -> IndexBufferHandle;
  fn create_texture(&self, width: u32, height: u32, bytes: Vec<u8>) -> TextureHandle;

  fn begin_frame(&mut self, clear_color: [f32; 4]) -> ForgeResult<()>;

  /// Valid only between `begin_frame` and `end_frame`; returns `FrameNotActive`
  /// otherwise.
  fn create_command_context(&mut self) -> ForgeResult<RenderCommandContext<'_>>;

  fn end_frame(&mut self) -> ForgeResult<()>;

  /// No-op on backends where presentation happens inside `end_frame`. Kept
  /// for API symmetry with backends that separate the two.
  fn present(&mut self) -> ForgeResult<()> {
    Ok(())
  }

  /// Must only be called from `Idle`; returns `ResizeDuringFrame` otherwise.
  fn resize(&mut self, width: u32, height: u32) -> ForgeResult<()>;

  fn supports(&self, feature: Feature) -> bool;

  fn frame_state(&self) -> FrameState;
}
