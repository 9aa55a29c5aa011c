//! The Logical Pipeline: an ordered container of Passes, with shared
//! viewport/render-target propagation and priority-based scheduling.

pub mod deferred;
pub mod forward;

use crate::{command_context::RenderCommandContext, error::ForgeResult, pass::Pass};
use log::warn;

/// An ordered list of Passes plus the viewport they all share. `auto_sort`
/// controls whether `execute` stable-sorts by ascending priority before each
/// run; ties keep their relative insertion order (`sort_by_key` on a stable
/// sort, matching the ordering invariant in the testable properties).
pub struct Pipeline {
  name: String,
  passes: Vec<Box<dyn Pass>>,
  viewport_width: u32,
  viewport_height: u32,
  pub auto_sort: bool,
}

impl Pipeline {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      passes: Vec::new(),
      viewport_width: 0,
      viewport_height: 0,
      auto_sort: true,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Rejects duplicates by name, returning `false` without modifying the
  /// pipeline if a pass with the same name is already present.
  pub fn add_pass(&mut self, pass: Box<dyn Pass>) -> bool {
    if self.find_pass(pass.name()).is_some() {
      warn!("pass '{}' already present in pipeline '{}'", pass.name(), self.name);
      return false;
    }
    self.passes.push(pass);
    true
  }

  pub fn remove_pass(&mut self, name: &str) -> bool {
    let before = self.passes.len();
    self.passes.retain(|p| p.name() != name);
    self.passes.len() != before
  }

  pub fn find_pass(&self, name: &str) -> Option<&dyn Pass> {
    self.passes.iter().find(|p| p.name() == name).map(|p| p.as_ref())
  }

  pub fn find_pass_mut(&mut self, name: &str) -> Option<&mut Box<dyn Pass>> {
    self.passes.iter_mut().find(|p| p.name() == name)
  }

  pub fn passes(&self) -> &[Box<dyn Pass>] {
    &self.passes
  }

  pub fn set_viewport(&mut self, width: u32, height: u32) {
    self.viewport_width = width;
    self.viewport_height = height;
    for pass in &mut self.passes {
      pass.set_viewport(width, height);
    }
  }

  pub fn viewport(&self) -> (u32, u32) {
    (self.viewport_width, self.viewport_height)
  }

  /// Sorts (if `auto_sort`), propagates the current viewport, then runs
  /// every enabled pass in order. Disabled passes are skipped silently.
  pub fn execute(&mut self, context: &mut RenderCommandContext, delta_time: f32) -> ForgeResult<()> {
    if self.auto_sort {
      self.passes.sort_by_key(|p| p.priority());
    }
    for pass in &mut self.passes {
      if !pass.enabled() {
        continue;
      }
      pass.set_viewport(self.viewport_width, self.viewport_height);
      pass.update(delta_time);
      pass.execute(context)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::common::FrameArenas;
  use crate::config::ArenaSizes;
  use crate::pass::PassBase;

  struct RecordingPass {
    base: PassBase,
    log: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
  }
  impl Pass for RecordingPass {
    fn base(&self) -> &PassBase {
      &self.base
    }
    fn base_mut(&mut self) -> &mut PassBase {
      &mut self.base
    }
    fn execute(&mut self, _context: &mut RenderCommandContext) -> ForgeResult<()> {
      self.log.borrow_mut().push(self.base.name.clone());
      Ok(())
    }
  }

  #[test]
  fn auto_sort_runs_passes_in_priority_order() {
    let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let mut pipeline = Pipeline::new("test");
    pipeline.add_pass(Box::new(RecordingPass {
      base: PassBase::new("Late", 700),
      log: log.clone(),
    }));
    pipeline.add_pass(Box::new(RecordingPass {
      base: PassBase::new("Early", 100),
      log: log.clone(),
    }));

    let mut arenas = FrameArenas::new(ArenaSizes::default());
    let mut commands = Vec::new();
    let mut ctx = RenderCommandContext::new(&mut arenas, &mut commands);
    pipeline.execute(&mut ctx, 0.016).unwrap();

    assert_eq!(*log.borrow(), vec!["Early".to_string(), "Late".to_string()]);
  }

  #[test]
  fn duplicate_pass_name_is_rejected() {
    let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let mut pipeline = Pipeline::new("test");
    assert!(pipeline.add_pass(Box::new(RecordingPass {
      base: PassBase::new("Dup", 100),
      log: log.clone(),
    })));
    assert!(!pipeline.add_pass(Box::new(RecordingPass {
      base: PassBase::new("Dup", 200),
      log,
    })));
    assert_eq!(pipeline.passes().len(), 1);
  }

  #[test]
  fn add_then_remove_restores_prior_state() {
    let mut pipeline = Pipeline::new("test");
    let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    pipeline.add_pass(Box::new(RecordingPass {
      base: PassBase::new("Temp", 100),
      log,
    }));
    assert_eq!(pipeline.passes().len(), 1);
    pipeline.remove_pass("Temp");
    assert_eq!(pipeline.passes().len(), 0);
  }
}
