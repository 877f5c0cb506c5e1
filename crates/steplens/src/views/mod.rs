//! View rendering modules

mod connectors;
mod ministrip;
mod steps;

pub use ministrip::render_ministrip;
pub use steps::render_steps;

#[cfg(test)]
mod tests;
