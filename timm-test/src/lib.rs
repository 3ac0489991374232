#![deny(missing_docs)]

//! A collection of helpers for testing the timm crates.
//!
//! -   `Arena`: aligned backing memory for a heap, so that tests may write to what they allocate.
//! -   `Pattern`: a textual description of a status table, such as `"##..#..."`.
//! -   `Lockstep`: a runner starting a closure on multiple threads as simultaneously as possible.
//! -   `number_iterations` and `number_threads`: test knobs, read from the environment.

mod arena;
mod environment;
mod lockstep;
mod pattern;

pub use arena::Arena;
pub use environment::{number_iterations, number_threads, read_number_from_environment};
pub use lockstep::Lockstep;
pub use pattern::Pattern;
