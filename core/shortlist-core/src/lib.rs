//! # shortlist-core
//!
//! Comparison-list state engine shared by every Shortlist surface.
//!
//! ## Design Principles
//!
//! - **Async**: store and network calls are `async`; callers bring a tokio runtime.
//! - **No shared mirror**: every read goes to the injected store. Surfaces
//!   call `reload()` to see writes made elsewhere.
//! - **Whole-list writes**: mutations read, modify and write the entire list
//!   without locking. Concurrent writers can lose updates.
//! - **Graceful degradation**: read accessors fall back to an empty list,
//!   refresh keeps the local list when the service is unreachable.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shortlist_core::{CandidateItem, ShortlistEngine};
//!
//! let engine = ShortlistEngine::new()?;
//! engine.add(candidate, Some(page_url)).await?;
//! let active = engine.get_active().await;
//! ```

pub mod badge;
pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod list;
pub mod reconcile;
pub mod remote;
pub mod session;
pub mod storage;
pub mod store;
pub mod types;

pub use badge::{project, Badge, BadgeSink, RecordingBadgeSink, TracingBadgeSink, BADGE_COLOR};
pub use config::{Mode, ReactivationPolicy, ShortlistConfig};
pub use engine::ShortlistEngine;
pub use error::{Failure, Result, ShortlistError};
pub use list::{AddOutcome, ListManager, Mutation, RemoveOutcome};
pub use reconcile::{reconcile, Reconciler, RefreshOutcome};
pub use remote::{HttpRemoteService, RemoteService};
pub use session::{deep_link, SessionInitiator};
pub use storage::StorageConfig;
pub use store::{IdentityStore, ItemStore, JsonFileStore, MemoryStore, SessionCache};
pub use types::*;
