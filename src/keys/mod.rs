//! Key directory subsystem.
//!
//! # Data Flow
//! ```text
//! (chain name, key id)
//!     → cache.rs (optional TTL memoization)
//!     → directory backend (memory.rs, or an external registry client)
//!     → Some(PublishedKey) | None | infrastructure error
//! ```

pub mod cache;
pub mod directory;
pub mod memory;

pub use cache::CachedKeyDirectory;
pub use directory::{KeyDirectory, KeySource, PublishedKey};
pub use memory::MemoryKeyDirectory;
