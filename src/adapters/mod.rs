pub mod memory;
pub mod reduction;
pub mod snapshot;
