//! Store seams for tokensync
//!
//! tokensync talks to two external systems, both through async traits:
//!
//! - [`VariableStore`]: the host tool's variable graph (groups, modes,
//!   variables and their values).
//! - [`DocumentRemote`]: the repository holding the token document
//!   (content at a path/ref, branches, pull requests).
//!
//! In-memory implementations of both are provided. [`MemoryVariableStore`]
//! can also be persisted as a JSON snapshot, which is what the CLI uses as
//! its backing store.

pub mod error;
pub mod memory;
pub mod memory_remote;
pub mod remote;
pub mod variables;

pub use error::{Error, Result};
pub use memory::{MemoryVariableStore, StoreSnapshot};
pub use memory_remote::MemoryRemote;
pub use remote::{DocumentRemote, PullRequest, PullRequestRequest, RemoteContent, WriteRequest};
pub use variables::VariableStore;
