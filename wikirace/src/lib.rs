// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    OutputFormat, SolveOptions, execute_solve, generate_text_report, resolve_config,
};
