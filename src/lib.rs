// Unity bridge call adaptation
//
// Outbound: typed calls into a dynamically loaded bridge library through
// entry points known only by address (caller). Inbound: a C callback
// trampoline that turns (pointer, length) payloads into views and hands
// them to host handlers (callback, payload, handlers).

pub mod bridge;
pub mod callback;
pub mod caller;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod ffi_types;
pub mod handlers;
pub mod loader;
pub mod logging;
pub mod payload;

pub use bridge::{NativeBridge, UnityBridge};
pub use caller::BridgeFunctions;
pub use cli::Cli;
pub use config::BridgeOptions;
pub use error::BridgeError;
pub use event::{UnityEvent, UnityEventType};
pub use ffi_types::{EventCallback, FunctionHandle, FunctionHandles};
pub use handlers::{handler_fn, EventCallbackHandler};
pub use logging::LogLevel;
pub use payload::EventPayload;
