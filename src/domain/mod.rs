// Domain layer: value types and ports (interfaces). Adapters live in crate::adapters.

pub mod model;
pub mod ports;
