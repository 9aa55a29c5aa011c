//! A deterministic software model of the Direct3D12-like backend contract:
//! one command allocator / command list reset per frame, a root signature
//! with four descriptor slots (b0..b3), and an RTV heap sized to the
//! back-buffer count. Shares the arena/sync bookkeeping in
//! [`super::common`] with [`super::vulkan_like::VulkanLikeBackend`]; the two
//! backends differ only in the names and defaults below, per the design
//! note that true per-API code should be the only thing left un-shared.

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

const BACK_BUFFER_COUNT: usize = 2;
const FRAMES_IN_FLIGHT: usize = 2;

pub struct D3D12LikeBackend {
  width: u32,
  height: u32,
  arenas: FrameArenas,
  sync: FrameSync,
  resources: GpuResourceTables,
  state: FrameState,
  command_log: Vec<RecordedCommand>,
  default_pso_bound: bool,
}

impl D3D12LikeBackend {
  /// Mirrors bringing up a device, a single direct command queue, an RTV
  /// heap of `BACK_BUFFER_COUNT` descriptors, and a DSV heap of size 1, then
  /// creating the default pipeline state object referenced at the top of
  /// every frame.
  pub fn new(config: &Config) -> ForgeResult<Self> {
    if config.requested_width == 0 || config.requested_height == 0 {
      return Err(ForgeError::BackendInit("requested surface extent is zero"));
    }
    info!(
      "d3d12-like backend initializing at {}x{}, root signature slots b0..b3 bound",
      config.requested_width, config.requested_height
    );
    Ok(Self {
      width: config.requested_width,
      height: config.requested_height,
      arenas: FrameArenas::new(config.arena_sizes),
      sync: FrameSync::new(BACK_BUFFER_COUNT, FRAMES_IN_FLIGHT),
      resources: GpuResourceTables::new(),
      state: FrameState::Idle,
      command_log: Vec::new(),
      default_pso_bound: false,
    })
  }

  pub fn command_log(&self) -> &[RecordedCommand] {
    &self.command_log
  }

  pub fn extent(&self) -> (u32, u32) {
    (self.width, self.height)
  }

  /// Test/diagnostic hook: makes the next `begin_frame` observe an
  /// out-of-date swapchain, mirroring `DXGI_ERROR_DEVICE_RESET`/a stale
  /// back buffer after an out-of-band resize.
  pub fn force_swapchain_out_of_date(&mut self) {
    self.sync.force_out_of_date();
  }
}

impl RenderBackend for D3D12LikeBackend {
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
    let back_buffer_index = match self.sync.acquire() {
      Some(index) => index,
      None => {
        warn!("back buffer acquire reported out of date; caller must resize before retrying");
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
    self.default_pso_bound = true;
    let _ = back_buffer_index;
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
    self.default_pso_bound = false;
    match self.sync.release() {
      Some(back_buffer_index) => {
        info!("executing command list, presenting back buffer {}", back_buffer_index);
        self.state = FrameState::Idle;
        Ok(())
      }
      None => {
        warn!("end_frame called with no acquired back buffer; forcing state back to Idle");
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
    info!("recreating RTV heap and depth buffer at {}x{}", width, height);
    self.width = width;
    self.height = height;
    Ok(())
  }

  fn supports(&self, feature: Feature) -> bool {
    match feature {
      Feature::MultiThreadedRecording => true,
      Feature::BindlessTextures => true,
      Feature::ComputeShaders => true,
    }
  }

  fn frame_state(&self) -> FrameState {
    self.state
  }
}
