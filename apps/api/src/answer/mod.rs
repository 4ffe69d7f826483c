// Answer generation and the naive-vs-refined comparison.

pub mod generator;
pub mod handlers;
pub mod prompts;
