// Domain layer: cart models and the ports its collaborators implement.

pub mod model;
pub mod ports;
