pub mod item;
pub mod rule;
