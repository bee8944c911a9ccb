pub mod context;
pub mod module;
pub mod registry;
pub mod settings;

pub use context::{CallCtx, CancelToken, Interrupt};
pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
