use crate::{
  pass::forward::ForwardPass,
  pipeline::Pipeline,
};

/// Builds the default forward pipeline: Forward (priority 100). A UI pass
/// (priority 500) is expected to be appended by the caller once the UI layer
/// is available; this crate doesn't define UI rendering itself (out of
/// scope, see the crate's module docs).
pub fn build_forward_pipeline() -> Pipeline {
  let mut pipeline = Pipeline::new("Forward");
  pipeline.add_pass(Box::new(ForwardPass::new()));
  pipeline
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pass::Pass;

  #[test]
  fn default_forward_pipeline_has_one_pass() {
    let pipeline = build_forward_pipeline();
    assert_eq!(pipeline.passes().len(), 1);
    assert_eq!(pipeline.passes()[0].name(), "Forward");
  }
}
