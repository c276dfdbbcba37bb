pub mod generate;
pub mod substitution;
