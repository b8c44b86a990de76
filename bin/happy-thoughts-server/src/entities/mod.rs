//! Domain records and the store interface.
//!
//! [`ThoughtStore`] is the only seam between HTTP handlers and persistence.
//! Backends live in [`crate::db`]; handlers talk to the [`crate::db::Store`]
//! dispatcher held in [`crate::state::AppState`].
//!
//! All trait methods use `impl Future` in their signatures so no extra
//! `async-trait` crate is required.

pub mod dao;
pub mod thought;

pub use dao::{NewThought, ThoughtRecord, UpdateAck};
pub use thought::{ThoughtStore, RECENT_THOUGHTS_LIMIT};
