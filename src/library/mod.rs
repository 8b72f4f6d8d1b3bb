//! Master library of curated works.
//!
//! # Storage Layout
//!
//! ```text
//! master_library.json
//! {
//!   "movies": [ { "id": "m1", "title": ..., "tags": [...] }, ... ],
//!   "music":  [ ... ],
//!   "books":  [ ... ]
//! }
//! ```

pub mod store;

pub use store::{Library, LibraryError};
