//! A small Brainfuck interpreter library.
//!
//! Programs run on a tape of signed 64-bit cells (30,000 to start) with a
//! single data pointer.
//!
//! Features and behaviors:
//! - Tape initialized to 0; it grows one cell at a time when the pointer
//!   moves past its end and never shrinks.
//! - Moving left of cell 0 leaves the pointer at 0.
//! - Input `,` reads a single raw byte; end of input is an error.
//! - Output `.` writes the current cell as a character (no newline); a single
//!   newline follows when the program ends.
//! - Nested loops `[]` are resolved before execution; unbalanced brackets are
//!   reported before anything runs.
//! - Any non-Brainfuck character is ignored.
//!
//! Quick start:
//!
//! ```no_run
//! use bfrun::Interpreter;
//!
//! // Classic "Hello World!" in Brainfuck
//! let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
//! let mut bf = Interpreter::new(code).expect("balanced program");
//! let stdout = std::io::stdout();
//! bf.run(&mut std::io::empty(), &mut stdout.lock()).expect("program should run");
//! ```

pub mod cli_util;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod logging;
pub mod loops;
pub mod tape;
pub mod terminal;

pub use error::{BfError, BracketKind};
pub use interpreter::{Interpreter, OutputMode, StepControl};
pub use loops::{LoopMap, resolve};
pub use tape::Tape;
pub use terminal::RawStdin;
