// Domain layer: catalog models and the ports the catalog depends on.

pub mod model;
pub mod ports;
