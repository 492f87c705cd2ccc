//! Database query modules.
//!
//! - images: Image record lifecycle (insert, path attach, prediction) and reads
//!
//! The audit tables (`role`, `worker`, `data`, `request` and their link
//! tables) have no query surface.

pub mod images;
