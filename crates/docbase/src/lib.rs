//! # Docbase
//!
//! **A documentation portal: structured content, instant search, and an
//! admin editor, backed by SQLite.**
//!
//! The pure logic (content model, renderer, search, editor workflow)
//! lives in [`docbase_core`]. This crate adds storage, configuration,
//! logging, the `docs` CLI, and the HTTP API.
//!
//! ```text
//!  ┌──────────┐   ┌──────────────┐   ┌──────────┐
//!  │   CLI    │──▶│ docbase-core │──▶│  SQLite  │
//!  │  (docs)  │   │ editor/search│   │ sections │
//!  └──────────┘   └──────────────┘   └──────────┘
//!       │                ▲
//!       ▼                │
//!  ┌──────────┐          │
//!  │   HTTP   │──────────┘
//!  │  (axum)  │
//!  └──────────┘
//! ```
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`events`] | Domain events as structured log records |
//! | [`auth`] | Bearer-token → `Actor` resolution |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`migrate`] | Idempotent schema setup |
//! | [`sqlite_store`] | `SectionRepository` over SQLite |
//! | [`sections`] | Listing and rendering sections |
//! | [`search`] | Per-call search over stored sections |
//! | [`import`] / [`export`] | JSON bulk import and export |
//! | [`delete`] | Confirmed section deletion |
//! | [`server`] | JSON HTTP API (Axum) with CORS |

pub mod auth;
pub mod config;
pub mod db;
pub mod delete;
pub mod events;
pub mod export;
pub mod import;
pub mod logging;
pub mod migrate;
pub mod search;
pub mod sections;
pub mod server;
pub mod sqlite_store;

pub use docbase_core::store;
