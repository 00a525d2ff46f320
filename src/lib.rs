pub mod arguments;
pub mod bumper;
pub mod parsers;
