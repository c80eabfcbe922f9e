pub mod curve;
pub mod entropy;
pub mod merlin;
