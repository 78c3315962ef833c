//! Design token synchronization
//!
//! Imports token documents into a variable store, exports the store back
//! to a token document, and moves documents to and from a remote
//! repository through a change-detecting diff gate.
//!
//! # Example
//!
//! ```
//! use tokensync_core::SyncEngine;
//! use tokensync_model::TokenDocument;
//! use tokensync_store::MemoryVariableStore;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let store = MemoryVariableStore::new();
//! let engine = SyncEngine::new(&store);
//!
//! let document = TokenDocument::from_json_str(r##"{
//!     "Primitives": { "red": { "$type": "color", "$value": "#ff0000" } },
//!     "Semantic": { "danger": { "$type": "color", "$value": "{Primitives.red}" } }
//! }"##).unwrap();
//! let report = engine.import(&document).await.unwrap();
//! assert_eq!(report.aliases_linked(), 1);
//!
//! let export = engine.export().await.unwrap();
//! assert!(export.content.contains("{Primitives.red}"));
//! # });
//! ```

pub mod collections;
pub mod context;
pub mod diagnostics;
pub mod diff_gate;
pub mod engine;
pub mod error;
pub mod export;
pub mod materializer;
pub mod progress;
pub mod report;
pub mod resolver;
pub mod settings;
pub mod walker;

pub use diagnostics::Diagnostic;
pub use diff_gate::{ContentChange, DiffGate, GateDecision, SemanticChange, compute_checksum};
pub use engine::SyncEngine;
pub use error::{Error, Result};
pub use export::{Export, ExportedDocument, Exporter};
pub use progress::{CollectProgress, NullProgress, Progress, ProgressSink};
pub use report::{GroupReport, ImportReport, PushOutcome};
pub use settings::RemoteSettings;
