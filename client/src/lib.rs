//! Synchronization client for the collaborative whiteboard.
//!
//! Bridges the drawing engine to the relay: one persistent websocket
//! connection per open room, local engine actions translated into wire
//! messages, and peer messages applied back to the local shape list.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Two-phase room session (loading, then ready) over [`canvas::engine::EngineCore`] |
//! | [`net`] | Websocket connect + the event loop merging local and remote events |
//! | [`history`] | Room history fetch that seeds the shape list on entry |

pub mod history;
pub mod net;
pub mod session;

pub use net::SyncError;
pub use session::{Event, HostNotice, Output, Phase, Session};
