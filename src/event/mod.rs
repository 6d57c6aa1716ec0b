//! Event eligibility and selection module

mod filter;
pub mod selector;


pub use filter::*;
pub use selector::*;
