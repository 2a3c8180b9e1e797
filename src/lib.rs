//! release-drafter: keeps a draft GitHub release whose body is the changelog
//! of every pull request merged since the last release.
//!
//! A run goes through the same stages every time:
//!
//! 1. Gate - resolve config and check the pushed branch is eligible
//! 2. Gather - list releases, page through branch history ([`history`])
//! 3. Build - categorize, sort and render the body ([`changelog`])
//! 4. Reconcile - plan create-vs-update and perform one write ([`release`])
//!
//! [`pipeline::run`] wires the stages together; every stage is also usable
//! on its own.

pub mod auth;
pub mod changelog;
pub mod config;
pub mod error;
pub mod event;
pub mod history;
pub mod pipeline;
pub mod platform;
pub mod release;
pub mod types;
