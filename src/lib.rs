//! Render backend core for Forgelight: a backend-agnostic contract over a
//! Vulkan-like and a Direct3D12-like implementation, a Logical Pass/Pipeline
//! scheduler with forward and deferred (G-Buffer) paths, and the per-frame
//! transient upload arenas both backends share.
//!
//! See [`backend`] for the `RenderBackend` contract, [`pass`]/[`pipeline`]
//! for the render-graph-lite scheduler, and [`command_context`] for the
//! API-neutral recording surface Passes record draws through.
#[macro_use]
extern crate derive_builder;

pub mod arena;
pub mod backend;
pub mod camera;
pub mod command_context;
pub mod config;
pub mod error;
pub mod gbuffer;
pub mod handle;
pub mod pass;
pub mod pipeline;
pub mod platform;
pub mod scene;

use crate::{
  backend::RenderBackend,
  camera::{clear_color_from_camera, Camera},
  error::ForgeResult,
};

/// Convenience wrapper around `RenderBackend::begin_frame` that reads the
/// clear color from a caller-supplied camera, defaulting to cyan when `None`
/// is passed. `begin_frame` itself always takes the clear color directly;
/// this lives at the driver layer per the resolved clear-color open question
/// (see the crate's design notes).
pub fn frame_begin_from_camera(backend: &mut dyn RenderBackend, camera: Option<&dyn Camera>) -> ForgeResult<()> {
  backend.begin_frame(clear_color_from_camera(camera))
}
