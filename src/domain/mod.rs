// Domain layer: client/prediction models and ports (interfaces).

pub mod model;
pub mod ports;
