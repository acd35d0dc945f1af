// Domain layer: booking models and the ports the workflow depends on.

pub mod model;
pub mod ports;
