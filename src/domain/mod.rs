pub mod actor;
pub mod grid;
