//! Track model and library scanning.
//!
//! Turns the paths a user hands the player (files or whole directories) into
//! `Track` values with display names built from tags or file names.

mod display;
mod model;
mod scan;

pub use model::Track;
pub use scan::collect;

#[cfg(test)]
mod tests;
