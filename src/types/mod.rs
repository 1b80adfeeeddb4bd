pub mod profile;
pub mod token;
