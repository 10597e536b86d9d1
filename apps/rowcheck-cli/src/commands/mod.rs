pub mod generate_fixtures;
pub mod validate;
