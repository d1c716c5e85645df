//! rope-edit: scripted edits over persistent ropes

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod config;
pub mod history;
pub mod io;
pub mod script;

// Re-export core types
pub use config::{EditScript, Op, ScriptError};
pub use history::History;
pub use script::{run, Session, Stats};
pub use tiny_rope::{conc, Leaf, Node, Rope, WriteError};
