//! Domain types for the anima curator.
//!
//! This module contains the core data structures:
//! - Item: Library entries and their categories
//! - Mood: Mood categories and their tag affinities
//! - Edition: The daily selection with layout assignment

pub mod edition;
pub mod item;
pub mod mood;

// Re-export commonly used types
pub use edition::{Edition, EditionEntry, Layout, EDITION_SIZE};
pub use item::{Category, LibraryItem};
pub use mood::Mood;
