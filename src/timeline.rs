pub mod builder;
pub mod bumper;
pub mod segment;
pub mod trim;
