// Domain layer: bundle options, build report and the ports the engine depends on.

pub mod model;
pub mod ports;
