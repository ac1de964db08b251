// Domain layer: core models and ports (interfaces). No network or CLI code here.

pub mod model;
pub mod ports;
