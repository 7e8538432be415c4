pub mod build;
pub mod check;
pub mod dump;
pub mod model_loader;
pub mod pipeline;

#[cfg(test)]
mod build_tests;
#[cfg(test)]
mod pipeline_tests;
