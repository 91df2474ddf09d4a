pub mod digits;
pub mod effects;
pub mod grid;
