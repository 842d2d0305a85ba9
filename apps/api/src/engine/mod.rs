// Model engine: feature encoding, label space, per-title classifier,
// hold-out evaluation, and the shared fitted-state bundle.

pub mod classifier;
pub mod encoder;
pub mod fitted;
pub mod handlers;
pub mod holdout;
pub mod labels;

#[cfg(test)]
pub mod fixtures;
