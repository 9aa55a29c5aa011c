//! Crate-boundary scenario tests from the backend contract's testable
//! properties: a full frame end to end, out-of-date handling, and resize
//! rejection mid-frame, each driven only through the public `RenderBackend`
//! surface.

use forgelight_backend::{
  backend::{vulkan_like::VulkanLikeBackend, FrameState, RenderBackend},
  command_context::RecordedCommand,
  config::Config,
  error::ForgeError,
  pipeline::deferred::DeferredPipeline,
};

#[test]
fn startup_and_one_empty_frame_leaves_arenas_untouched() {
  let config = Config::builder()
    .requested_width(800)
    .requested_height(600)
    .build()
    .unwrap();
  let mut backend = VulkanLikeBackend::new(&config).unwrap();

  backend.begin_frame([0.1, 0.2, 0.3, 1.0]).unwrap();
  {
    let _context = backend.create_command_context().unwrap();
    // No draws issued -- an intentionally empty frame.
  }
  backend.end_frame().unwrap();

  // Just the default-viewport set and the frame's load-clear.
  assert_eq!(backend.command_log().len(), 2);
  assert!(backend
    .command_log()
    .iter()
    .any(|c| matches!(c, RecordedCommand::Clear { color } if *color == [0.1, 0.2, 0.3, 1.0])));
}

#[test]
fn triangle_draw_is_recorded_as_a_bind_then_a_draw() {
  let config = Config::default();
  let mut backend = VulkanLikeBackend::new(&config).unwrap();
  backend.begin_frame([0.0, 0.0, 0.0, 1.0]).unwrap();
  {
    let mut context = backend.create_command_context().unwrap();
    let vertices: [u8; 84] = [0; 84];
    context.set_vertex_buffer(&vertices, 28);
    context.draw(3, 0).unwrap();
  }
  backend.end_frame().unwrap();

  let log = backend.command_log();
  assert!(log.iter().any(|c| matches!(c, RecordedCommand::BindVertexBuffer { stride: 28, .. })));
  assert!(log.iter().any(|c| matches!(c, RecordedCommand::Draw { vertex_count: 3, start_vertex: 0 })));
}

#[test]
fn end_frame_without_begin_forces_idle_and_reports_mismatch() {
  let mut backend = VulkanLikeBackend::new(&Config::default()).unwrap();
  let result = backend.end_frame();
  assert!(matches!(result, Err(ForgeError::MismatchedFramePair)));
  assert!(matches!(backend.resize(640, 480), Ok(())));
}

#[test]
fn out_of_date_swapchain_blocks_begin_frame_and_end_frame_still_reports_mismatch() {
  let mut backend = VulkanLikeBackend::new(&Config::default()).unwrap();
  backend.force_swapchain_out_of_date();

  let result = backend.begin_frame([0.0, 0.0, 0.0, 1.0]);
  assert!(matches!(result, Err(ForgeError::SwapchainOutOfDate)));
  assert_eq!(backend.frame_state(), FrameState::Idle);

  // BeginFrame never transitioned, so ending the frame anyway hits the same
  // mismatched-pair path as calling EndFrame with no BeginFrame at all.
  assert!(matches!(backend.end_frame(), Err(ForgeError::MismatchedFramePair)));
  assert_eq!(backend.frame_state(), FrameState::Idle);

  // A normal frame still works afterward.
  assert!(backend.begin_frame([0.0, 0.0, 0.0, 1.0]).is_ok());
  assert!(backend.end_frame().is_ok());
}

#[test]
fn resize_mid_frame_is_rejected_but_frame_completes() {
  let mut backend = VulkanLikeBackend::new(&Config::default()).unwrap();
  backend.begin_frame([0.0, 0.0, 0.0, 0.0]).unwrap();
  assert!(matches!(backend.resize(1280, 720), Err(ForgeError::ResizeDuringFrame)));
  assert!(backend.end_frame().is_ok());
  assert!(backend.resize(1280, 720).is_ok());
}

#[test]
fn deferred_pipeline_executes_passes_in_documented_order() {
  let mut backend = VulkanLikeBackend::new(&Config::default()).unwrap();
  let mut deferred = DeferredPipeline::new(800, 600);

  backend.begin_frame([0.0, 0.0, 0.0, 1.0]).unwrap();
  {
    let mut context = backend.create_command_context().unwrap();
    deferred.execute(&mut context, 0.016).unwrap();
  }
  backend.end_frame().unwrap();

  // Geometry has no draws queued, so the first real draw command in the
  // trace comes from Lighting/Composition/Upscaler's full-screen quads.
  assert!(backend.command_log().len() > 1);
}
