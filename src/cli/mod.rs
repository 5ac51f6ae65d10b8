// CLI module
// Public interface for the interactive question loop

mod repl;

pub use repl::{Input, Repl, PROMPT};
