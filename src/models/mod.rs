pub mod base_model;
pub mod reference;
pub mod zdc;
