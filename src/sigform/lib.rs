//! # Sigform Architecture
//!
//! Sigform is a **UI-agnostic editing library** for the two XML-backed
//! lists a mail profile carries: signatures and reusable fixed-form texts.
//! This is not a CLI application that happens to have some library code—it's
//! a library that happens to have a CLI client.
//!
//! Both documents are the same machine with different record shapes, so one
//! generic core serves both.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (args.rs, wired by main.rs)                      │
//! │  - Parses arguments, prompts, prints, exits                  │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session Layer (api.rs)                                     │
//! │  - EditorSession: one open document + gateway + renderer    │
//! │  - Every mutation returns the next view to display          │
//! │  - Save/reload gated on a caller-supplied confirm closure   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (store.rs, model.rs, xml.rs)                          │
//! │  - RecordStore: ordered records + draft/commit editing      │
//! │  - Pure logic over Rust types, no I/O assumptions           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Gateway Layer (gateway/)                                   │
//! │  - Abstract PersistenceGateway trait                        │
//! │  - FsGateway (production), MemoryGateway (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Positions, Drafts, Persistence
//!
//! Records are addressed by **1-based display position**—the number the
//! list shows—not by any stable id. Editing is transactional: a session
//! holds at most one open draft, `commit` folds it in after validation,
//! `cancel` leaves no trace. The working copy only reaches disk through an
//! explicit, confirmed `save`; `reload` is the matching confirmed discard.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust arguments, returns regular
//! Rust types, **never** writes to stdout/stderr, and **never** assumes a
//! terminal. The same core could sit behind a GUI form or a test harness.
//!
//! ## Module Overview
//!
//! - [`api`]: Editing sessions—entry point for all operations
//! - [`store`]: The ordered record store with draft/commit semantics
//! - [`model`]: Record types (`Signature`, `FixedText`) and account filters
//! - [`xml`]: The strict wire codec for both documents
//! - [`gateway`]: Persistence abstraction and implementations
//! - [`render`]: View building for frontends
//! - [`config`]: Profile configuration (known accounts)
//! - [`editor`]: External editor integration
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod editor;
pub mod error;
pub mod gateway;
pub mod model;
pub mod render;
pub mod store;
pub mod xml;
