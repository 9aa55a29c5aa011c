use std::{error::Error, fmt};

pub type ForgeResult<T> = Result<T, ForgeError>;

/// Every error the render backend core can produce. None of these cross the
/// public surface as a panic; fatal variants are returned from `Initialize`,
/// recoverable ones are logged and handled in place (see each variant's use
/// site).
#[derive(Debug)]
pub enum ForgeError {
  /// Device, surface, swapchain, or sync primitive creation failed during
  /// `Initialize`.
  BackendInit(&'static str),
  /// Acquire or present reported the swapchain is stale; caller must `Resize`
  /// before the next `BeginFrame`.
  SwapchainOutOfDate,
  /// A command-list begin/reset/end call failed.
  CommandRecord(&'static str),
  /// `CreateCommandContext` or `EndFrame` called without a matching
  /// `BeginFrame`.
  FrameNotActive,
  /// `EndFrame` found no saved acquire index for the current frame.
  MismatchedFramePair,
  /// `Draw`/`DrawIndexed` issued without a bound vertex (or index) buffer.
  ResourceNotBound,
  /// `SetConstantBuffer` was given a name absent from the slot table.
  UnknownConstantName(String),
  /// Degenerate viewport extent.
  InvalidViewport,
  /// Degenerate or inverted scissor rectangle.
  InvalidScissor,
  /// A handle did not refer to a live resource in the backend's tables.
  InvalidHandle,
  /// `Resize` was invoked while a frame was active.
  ResizeDuringFrame,
}

impl fmt::Display for ForgeError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      ForgeError::BackendInit(s) => write!(f, "backend initialization failed: {}", s),
      ForgeError::SwapchainOutOfDate => write!(
        f,
        "swapchain is out of date, resize before the next BeginFrame"
      ),
      ForgeError::CommandRecord(s) => write!(f, "command recording failed: {}", s),
      ForgeError::FrameNotActive => write!(f, "no frame is currently active"),
      ForgeError::MismatchedFramePair => write!(
        f,
        "EndFrame called with no matching acquired image from BeginFrame"
      ),
      ForgeError::ResourceNotBound => write!(f, "draw issued with no buffer bound"),
      ForgeError::UnknownConstantName(name) => {
        write!(f, "unrecognized constant buffer name: {}", name)
      }
      ForgeError::InvalidViewport => write!(f, "viewport extent must be positive"),
      ForgeError::InvalidScissor => write!(f, "scissor rectangle is degenerate or inverted"),
      ForgeError::InvalidHandle => write!(f, "handle does not refer to a live resource"),
      ForgeError::ResizeDuringFrame => write!(f, "Resize may only be called from Idle"),
    }
  }
}

impl Error for ForgeError {}
