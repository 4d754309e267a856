//! Canvas interaction core for the casting board.
//!
//! This crate is compiled to WebAssembly and runs in the browser next to the
//! casting application's view layer. It owns the freeform actor canvas: the
//! pan/zoom viewport, pointer and touch gestures over actor cards and group
//! headers, the selection set, group membership with derived bounds, and the
//! stack of open dialogs. The host is responsible only for wiring DOM events
//! into [`engine::EngineCore`] and carrying out the returned
//! [`engine::Action`]s (rendering, timers, haptics, modal content, vote
//! intents, persistence).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Canvas session ([`engine::EngineCore`]) and the actions it emits |
//! | [`camera`] | Screen/canvas point types and coordinate conversions |
//! | [`viewport`] | Cursor-centred zoom, button zoom, fit-to-content, fit-to-selection |
//! | [`doc`] | Actor placements, groups, and the store that keeps group bounds derived |
//! | [`selection`] | The selected-placement set |
//! | [`sort`] | Presentation-only group orderings |
//! | [`input`] | Pointer, touch, and key event types plus hit targets |
//! | [`drag`] | Press / drag / long-press gesture state machine |
//! | [`timers`] | Cancellable host-driven timer tokens |
//! | [`modal`] | LIFO modal stack with z-index and backdrop layering |
//! | [`actors`] | Read-only view of the external actor records |
//! | [`persist`] | Snapshot format and the storage adapter seam |
//! | [`bindings`] | `wasm-bindgen` surface exchanging JSON with the browser |
//! | [`config`] | Tunable sizes, limits, and durations |
//! | [`consts`] | Default values backing [`config::CanvasConfig`] |
//! | [`error`] | Errors raised at decode and storage boundaries |

pub mod actors;
pub mod bindings;
pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod drag;
pub mod engine;
pub mod error;
pub mod input;
pub mod modal;
pub mod persist;
pub mod selection;
pub mod sort;
pub mod timers;
pub mod viewport;
