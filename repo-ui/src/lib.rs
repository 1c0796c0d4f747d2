pub mod api;
pub mod app;
pub mod components;
pub mod interop;
pub mod styles;
pub mod ws;

pub use api::*;
pub use app::*;
pub use components::*;
pub use interop::*;
