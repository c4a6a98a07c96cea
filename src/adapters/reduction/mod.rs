//! Dependency kind reduction strategies

mod direct;
mod standard;
mod transitive;

pub use direct::DirectReduction;
pub use standard::StandardReduction;
pub use transitive::TransitiveReduction;
