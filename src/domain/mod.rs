pub mod bridge;
pub mod edge;
pub mod identity;
pub mod ports;
pub mod result;
pub mod session;
