//! sqb-api
//!
//! Backend client for the squad builder REST service.
//!
//! This crate owns the backend trait and its HTTP implementation. It holds no
//! application state; the session crate decides what to call and when.

mod backend;
mod http;

pub use backend::{filtered_players_query, ApiError, SquadBackend};
pub use http::HttpBackend;
