// Library root
// -----------
// The binary (`main.rs`) only loads configuration and hands over to the
// menu loop in `ui`. Everything the menu does lives here so it can be
// tested without a terminal or a network.
//
// Module responsibilities:
// - `api`: blocking HTTP client for the hosted Assistants API and the
//   `AssistantService` trait the rest of the crate is written against.
// - `types`: wire types (runs, messages, statuses).
// - `poll`: waits for a run to reach a terminal status.
// - `session`: the chat turn loop.
// - `registry`: local JSON list of created assistants.
// - `actions`: upload and thread creation.
// - `menu` / `ui`: the menu and the terminal flows.
// - `config` / `error`: environment configuration and error types.
pub mod actions;
pub mod api;
pub mod config;
pub mod error;
pub mod menu;
pub mod poll;
pub mod registry;
pub mod session;
pub mod types;
pub mod ui;
