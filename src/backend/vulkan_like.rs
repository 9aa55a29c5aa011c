//! A deterministic software model of the Vulkan-like backend contract:
//! device/swapchain lifecycle, per-frame fence + semaphore bookkeeping, and
//! the depth-buffer-alongside-swapchain convention. Grounded on the shape of
//! `VulkanRenderer`'s frame loop and `DrawSynchronization`'s fence/semaphore
//! tracking, reworked to avoid any driver handle: `image_to_frame_fence`,
//! `wait_for_acquire_fence`/`ensure_image_resources_ready`, and the
//! acquire-then-submit-then-present sequence reappear here as plain
//! bookkeeping over [`FrameSync`] instead of `ash::vk::Fence`/`Semaphore`.

use crate::{
  backend::{
    common::{FrameArenas, FrameSync, GpuResourceTables},
    Feature, FrameState, RenderBackend,
  },
  command_context::{RecordedCommand, RenderCommandContext},
  config::Config,
  error::{ForgeError, ForgeResult},
  handle::{IndexBufferHandle, TextureHandle, VertexBufferHandle},
};
use log::{info, warn};

const SWAPCHAIN_IMAGE_COUNT: usize = 3;
const MAX_FRAMES_IN_FLIGHT: usize = 2;

/// Software model of the Vulkan-like device + swapchain + sync primitives.
pub struct VulkanLikeBackend {
  width: u32,
  height: u32,
  arenas: FrameArenas,
  sync: FrameSync,
  resources: GpuResourceTables,
  state: FrameState,
  command_log: Vec<RecordedCommand>,
  frame_count: u64,
}

impl VulkanLikeBackend {
  /// Mirrors `VulkanRenderer::new`: picks a suitable "device" (trivially, the
  /// only one this software model has), builds the swapchain and depth
  /// buffer, and primes the sync primitives. Fails with `BackendInit` only
  /// when the requested extent is degenerate, the one failure mode a
  /// software model can actually exhibit.
  pub fn new(config: &Config) -> ForgeResult<Self> {
    if config.requested_width == 0 || config.requested_height == 0 {
      return Err(ForgeError::BackendInit("requested surface extent is zero"));
    }
    info!(
      "vulkan-like backend initializing at {}x{}, present mode preference honored via mailbox-then-fifo fallback",
      config.requested_width, config.requested_height
    );
    Ok(Self {
      width: config.requested_width,
      height: config.requested_height,
      arenas: FrameArenas::new(config.arena_sizes),
      sync: FrameSync::new(SWAPCHAIN_IMAGE_COUNT, MAX_FRAMES_IN_FLIGHT),
      resources: GpuResourceTables::new(),
      state: FrameState::Idle,
      command_log: Vec::new(),
      frame_count: 0,
    })
  }

  /// The trace of every command recorded so far in the current (or just
  /// completed) frame. Exposed for tests asserting pass-ordering and arena
  /// behavior; a real driver backend has no equivalent public surface.
  pub fn command_log(&self) -> &[RecordedCommand] {
    &self.command_log
  }

  pub fn extent(&self) -> (u32, u32) {
    (self.width, self.height)
  }

  /// Test/diagnostic hook: makes the next `begin_frame` observe an
  /// out-of-date swapchain, as a real driver would report after the surface
  /// is resized or minimized out from under it.
  pub fn force_swapchain_out_of_date(&mut self) {
    self.sync.force_out_of_date();
  }
}

impl RenderBackend for VulkanLikeBackend {
  fn create_vertex_buffer(&self, data: &[u8]) -> VertexBufferHandle {
    self.resources.create_vertex_buffer(data)
  }

  fn create_index_buffer(&self, data: &[u8]) -> IndexBufferHandle {
    self.resources.create_index_buffer(data)
  }

  fn create_texture(&self, width: u32, height: u32, bytes: Vec<u8>) -> TextureHandle {
    self.resources.create_texture(width, height, bytes)
  }

  fn begin_frame(&mut self, clear_color: [f32; 4]) -> ForgeResult<()> {
    // Mirrors `ensure_image_resources_ready` + `wait_for_acquire_fence`: wait
    // on the previous use of this frame-in-flight slot before reusing its
    // command list.
    let image_index = match self.sync.acquire() {
      Some(index) => index,
      None => {
        warn!("swapchain image acquire reported out of date; caller must resize before retrying");
        return Err(ForgeError::SwapchainOutOfDate);
      }
    };
    self.arenas.reset_all();
    self.command_log.clear();
    self.command_log.push(RecordedCommand::SetViewport {
      x: 0.0,
      y: 0.0,
      width: self.width as f32,
      height: self.height as f32,
    });
    self.command_log.push(RecordedCommand::Clear { color: clear_color });
    let _ = image_index;
    self.state = FrameState::FrameActive;
    Ok(())
  }

  fn create_command_context(&mut self) -> ForgeResult<RenderCommandContext<'_>> {
    if self.state != FrameState::FrameActive {
      return Err(ForgeError::FrameNotActive);
    }
    Ok(RenderCommandContext::new(&mut self.arenas, &mut self.command_log))
  }

  fn end_frame(&mut self) -> ForgeResult<()> {
    match self.sync.release() {
      Some(image_index) => {
        self.frame_count += 1;
        info!("presenting swapchain image {}", image_index);
        self.state = FrameState::Idle;
        Ok(())
      }
      None => {
        warn!("end_frame called with no acquired image; forcing state back to Idle");
        self.state = FrameState::Idle;
        Err(ForgeError::MismatchedFramePair)
      }
    }
  }

  fn resize(&mut self, width: u32, height: u32) -> ForgeResult<()> {
    if self.state == FrameState::FrameActive {
      warn!("resize requested mid-frame; rejecting, current frame will still complete");
      return Err(ForgeError::ResizeDuringFrame);
    }
    info!("recreating swapchain at {}x{}", width, height);
    self.width = width;
    self.height = height;
    Ok(())
  }

  fn supports(&self, feature: Feature) -> bool {
    match feature {
      Feature::MultiThreadedRecording => false,
      Feature::BindlessTextures => false,
      Feature::ComputeShaders => true,
    }
  }

  fn frame_state(&self) -> FrameState {
    self.state
  }
}
