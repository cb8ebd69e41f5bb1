pub mod invoke;
pub mod meta;
