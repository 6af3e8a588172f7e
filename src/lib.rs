//! # Syncfold: reactive record-list synchronization
//!
//! Syncfold keeps an in-memory list of text records synchronized with a
//! remote backend through a single dataflow pipeline: heterogeneous
//! request sources are multiplexed into one typed stream, each request is
//! executed as exactly one concurrent remote call, and the tagged
//! responses are folded, strictly in emission order, into an evolving
//! immutable snapshot history that drives a pure view projection.
//!
//! ## Core Concepts
//!
//! - **Requests / Responses**: closed tagged unions over
//!   `{list, create, toggle, delete}`; no runtime category strings
//! - **Multiplexer**: merges independent producers into one ordered
//!   stream and stamps sequence numbers
//! - **Effect executor**: one concurrent remote call per request,
//!   responses forwarded in completion order
//! - **Fold**: the single total order; sequential transition
//!   application with versioned snapshots
//! - **Deferred state proxy**: a last-value-cached channel created
//!   before the pipeline and bound to the fold output afterwards, so
//!   request builders can read state that their own request will update
//!
//! The proxy is what makes `toggle` work: computing the new flag needs
//! the record's *current* flag, but the current state is itself an output
//! of the pipeline the toggle request is about to enter. Declaring the
//! placeholder channel first, building the dependent logic against it,
//! and binding it to the real output last breaks the cycle.
//!
//! ## Quick Start
//!
//! ```no_run
//! use syncfold::engine::SyncEngine;
//! use syncfold::store::MemoryStore;
//! use syncfold::view::View;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     syncfold::telemetry::init();
//!
//!     let engine = SyncEngine::new(MemoryStore::new())?;
//!     engine.create("learn dataflow")?;
//!
//!     let mut views = engine.views();
//!     while views.changed().await.is_ok() {
//!         match &*views.borrow_and_update() {
//!             View::List(rows) if !rows.is_empty() => break,
//!             _ => continue,
//!         }
//!     }
//!
//!     engine.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Guide
//!
//! - [`item`] - The synchronized record type
//! - [`request`] - Tagged request/response unions and sort specs
//! - [`remote`] - The asynchronous backend boundary
//! - [`store`] - In-memory backend with search and sort
//! - [`mux`] - Request multiplexing and sequence stamping
//! - [`proxy`] - The deferred, last-value-cached state proxy
//! - [`reducers`] - Pure response-to-transition mapping
//! - [`fold`] - Sequential state folding and raced-list repair
//! - [`executor`] - Concurrent effect execution
//! - [`state`] - Versioned snapshots
//! - [`view`] - Pure view projection
//! - [`engine`] - Pipeline assembly and lifecycle
//! - [`diagnostics`] - Out-of-band failure and lifecycle events
//! - [`config`] - Environment-driven engine options
//! - [`telemetry`] - Tracing setup

pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod executor;
pub mod fold;
pub mod item;
pub mod mux;
pub mod proxy;
pub mod reducers;
pub mod remote;
pub mod request;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod view;
