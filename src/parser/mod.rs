//! Layout inference over converter tokens.
//!
//! The stages run in order: [`normalize`] merges fragments into lines,
//! [`classify`] separates body text from the header pool, and
//! [`paragraph`] inserts paragraph breaks into the body.

pub mod classify;
pub mod freq;
pub mod normalize;
mod options;
pub mod paragraph;

pub use classify::{classify, split_body, BodySplit};
pub use freq::FrequencyTable;
pub use normalize::{normalize, Normalized};
pub use options::ParseOptions;
pub use paragraph::{join_contents, segment};
