pub mod errors;
pub mod db;
pub mod hero;

pub use hero::{Hero, HeroPatch};
