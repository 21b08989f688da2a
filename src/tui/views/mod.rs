pub mod idea;
pub mod questions;
pub mod result;
