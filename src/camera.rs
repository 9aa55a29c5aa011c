use ultraviolet::Mat4;

/// The clear color Passes use when they don't otherwise seed the main render
/// target -- cyan, matching the fallback used when no camera is supplied to
/// [`frame_begin_from_camera`].
pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [0.0, 1.0, 1.0, 1.0];

/// A read-only view the frame loop consumes each frame; owned and updated by
/// whatever scene layer sits above this crate.
pub trait Camera {
  fn view_projection(&self) -> Mat4;
  fn clear_color(&self) -> [f32; 4];
  fn position(&self) -> ultraviolet::Vec3;
}

/// Picks a clear color the way `BeginFrame` expects one: read from the
/// supplied camera, or the default cyan if none is designated as "main" this
/// frame. This is a convenience the driver layer uses; `BeginFrame` itself
/// always takes the clear color directly as an argument (see the Design
/// Notes on the resolved clear-color open question).
pub fn clear_color_from_camera(camera: Option<&dyn Camera>) -> [f32; 4] {
  camera.map(Camera::clear_color).unwrap_or(DEFAULT_CLEAR_COLOR)
}

#[cfg(test)]
mod tests {
  use super::*;

  struct StubCamera;
  impl Camera for StubCamera {
    fn view_projection(&self) -> Mat4 {
      Mat4::identity()
    }
    fn clear_color(&self) -> [f32; 4] {
      [0.5, 0.5, 0.5, 1.0]
    }
    fn position(&self) -> ultraviolet::Vec3 {
      ultraviolet::Vec3::zero()
    }
  }

  #[test]
  fn falls_back_to_default_cyan_without_camera() {
    assert_eq!(clear_color_from_camera(None), DEFAULT_CLEAR_COLOR);
  }

  #[test]
  fn reads_clear_color_from_camera() {
    let cam = StubCamera;
    assert_eq!(clear_color_from_camera(Some(&cam)), [0.5, 0.5, 0.5, 1.0]);
  }
}
