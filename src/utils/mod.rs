pub mod evaluation;
pub mod ss;
pub mod validation;
