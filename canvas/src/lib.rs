//! Drawing engine for the collaborative whiteboard.
//!
//! This crate is compiled to WebAssembly and runs in the browser, but the
//! engine itself is browser-free: it owns the room's shape list, interprets
//! pointer input according to the active tool, and emits [`engine::Action`]s
//! describing what changed. The host layer wires DOM events in and forwards
//! the resulting actions to the synchronization client; remote edits come
//! back through the `apply_*` methods on [`engine::EngineCore`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`shape`] | Shape model: tagged union of drawable primitives + style |
//! | [`geometry`] | Pure hit-testing, bounding boxes, resize handles |
//! | [`engine`] | Interaction state machine ([`engine::EngineCore`]) |
//! | [`input`] | Tools, pointer events, and gesture state |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`render`] | Full-scene rendering to a 2D context |
//! | [`export`] | SVG fragment export for a selected shape |
//! | [`consts`] | Shared numeric constants (tolerances, minimum sizes) |

pub mod camera;
pub mod consts;
pub mod engine;
pub mod export;
pub mod geometry;
pub mod input;
pub mod render;
pub mod shape;
