//! Core library for a Turing machine language: parses `.tur` source into a
//! finalized [`program::Program`] and interprets it one step at a time
//! against a doubly-infinite byte [`tape::Tape`].

pub mod demos;
pub mod error;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod program;
pub mod sym;
pub mod tape;

pub use demos::DemoRegistry;
pub use error::TurError;
pub use loader::ProgramLoader;
pub use machine::{halted, step, Machine};
pub use parser::parse;
pub use program::{Action, Clause, ClauseAction, Program, ProgramBuilder};
pub use sym::{StateName, Symbol};
pub use tape::{Tape, BLANK};
