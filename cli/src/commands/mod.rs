pub mod layers;
pub mod refresh;
