//! Platform surface abstraction: the thin seam between a native window and
//! the render backend, grounded on the `raw-window-handle`-based
//! `HasRawWindowHandle` bound the Vulkan-like backend used for `new`/
//! `new_detailed` in the teacher lineage. Everything past "here is an opaque
//! window handle and, for the Vulkan-like backend, the instance extensions it
//! needs" belongs to the windowing layer, not this crate.

use raw_window_handle::HasRawWindowHandle;

/// Vulkan-like instance extensions required to create a surface for a given
/// platform. A real windowing integration enumerates these with something
/// like `ash_window::enumerate_required_extensions`; this crate only defines
/// the seam the Vulkan-like backend calls through.
pub trait VulkanSurfaceExtensions {
  fn required_instance_extensions(&self) -> Vec<&'static str>;
}

/// Anything that can hand the backend a native window to present into.
/// `W: HasRawWindowHandle` is the same bound the backend's constructors take;
/// this trait additionally carries the size the backend should initialize
/// its swapchain at.
pub trait PlatformWindow: HasRawWindowHandle {
  fn framebuffer_size(&self) -> (u32, u32);
}

/// A minimal platform window usable in tests and headless demos: no real
/// handle, a fixed reported size. `raw_window_handle`'s `RawWindowHandle` has
/// no safe "none" variant across all platforms it supports, so this stub
/// reports a web handle, which carries no OS resource and is always safe to
/// construct.
pub struct HeadlessWindow {
  width: u32,
  height: u32,
}

impl HeadlessWindow {
  pub fn new(width: u32, height: u32) -> Self {
    Self { width, height }
  }
}

unsafe impl HasRawWindowHandle for HeadlessWindow {
  fn raw_window_handle(&self) -> raw_window_handle::RawWindowHandle {
    raw_window_handle::RawWindowHandle::Web(raw_window_handle::web::WebHandle { id: 0 })
  }
}

impl PlatformWindow for HeadlessWindow {
  fn framebuffer_size(&self) -> (u32, u32) {
    (self.width, self.height)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn headless_window_reports_requested_size() {
    let window = HeadlessWindow::new(1920, 1080);
    assert_eq!(window.framebuffer_size(), (1920, 1080));
  }
}
