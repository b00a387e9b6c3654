pub mod migrate;
pub mod reset;
