//! Chain registry subsystem.
//!
//! # Data Flow
//! ```text
//! [[chains]] config entries
//!     → descriptor.rs (build EVM / TVM descriptors)
//!     → registry.rs (ordered, atomically swappable list)
//!     → resolver asks: which chains accept this address?
//! ```
//!
//! # Design Decisions
//! - Address validation is a pure format check, never a network call
//! - Registry order is the preference order for chain selection
//! - The registry is an injected object, not a global

pub mod descriptor;
pub mod evm;
pub mod registry;
pub mod tvm;
pub mod types;

pub use descriptor::ChainDescriptor;
pub use registry::ChainRegistry;
pub use types::{ChainKind, KeyId};
