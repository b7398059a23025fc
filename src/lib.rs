//! # canvas-relay
//!
//! Room-scoped WebSocket relay for collaborative drawing surfaces.
//!
//! Clients connect to `/ws`, send a join descriptor naming a room, and from
//! then on every JSON payload they send is forwarded verbatim to every other
//! connection in the same room. The relay never interprets drawing data
//! beyond its `type` field, keeps no history, and forgets a room as soon as
//! its last member leaves.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler + Session (ws/)       one task per connection
//!     ├── REST Handlers (api/)             read-only introspection
//!     │
//!     ├── BroadcastRelay (service/)        fan-out, never blocks on a peer
//!     │
//!     └── RoomRegistry (domain/)           rooms → members, per-room locks
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod server;
pub mod service;
pub mod ws;
