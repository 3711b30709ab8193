//! The fetch-execute cycle.
//!
//! An [`Interpreter`] owns one program, its loop map and a fresh [`Tape`].
//! Loops are resolved when the interpreter is built, so an unbalanced
//! program is rejected before a single instruction runs.
//!
//! Behaviors:
//! - `>` moves right, growing the tape by one zero cell when needed.
//! - `<` moves left, clamping at cell 0.
//! - `+` / `-` use wrapping 64-bit arithmetic.
//! - `.` writes the current cell according to the [`OutputMode`].
//! - `,` reads exactly one byte; end of input or a failed read is fatal.
//! - `[` / `]` jump to the matching bracket; the uniform `ip += 1` after
//!   every cycle then lands just past it.
//! - Every other character is ignored.
//!
//! A single `\n` is written when the program runs off its end.

use std::io::{Read, Write};
use std::str::FromStr;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use serde::Deserialize;

use crate::error::BfError;
use crate::loops::{self, LoopMap};
use crate::tape::Tape;

/// How `.` turns a cell value into output bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Cell value is a Unicode code point, written as UTF-8. Values that are
    /// not a valid scalar value come out as U+FFFD.
    #[default]
    Unicode,
    /// Low 8 bits of the cell, written as one raw byte.
    Byte,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unicode" => Ok(OutputMode::Unicode),
            "byte" => Ok(OutputMode::Byte),
            other => Err(format!("invalid output mode: {other}, must be 'unicode' or 'byte'")),
        }
    }
}

/// Controls for cooperative cancellation and step limiting.
#[derive(Clone, Debug)]
pub struct StepControl {
    pub max_steps: Option<u64>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<u64>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self { max_steps, cancel_flag }
    }
}

/// A Brainfuck interpreter over a growable tape of signed cells.
pub struct Interpreter {
    code: Vec<char>,
    loops: LoopMap,
    tape: Tape,
    ip: usize,
    steps: u64,
    output_mode: OutputMode,
}

impl Interpreter {
    /// Load `code`, resolving its loops.
    ///
    /// Returns [`BfError::MalformedLoop`] when brackets are unbalanced.
    pub fn new(code: &str) -> Result<Self, BfError> {
        let code: Vec<char> = code.chars().collect();
        let loops = loops::resolve(&code)?;
        Ok(Self {
            code,
            loops,
            tape: Tape::new(),
            ip: 0,
            steps: 0,
            output_mode: OutputMode::default(),
        })
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    /// Start over with a fresh tape, keeping the program and its loop map.
    pub fn reset(&mut self) {
        self.tape = Tape::new();
        self.ip = 0;
        self.steps = 0;
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn data_pointer(&self) -> usize {
        self.tape.pointer()
    }

    pub fn instruction_pointer(&self) -> usize {
        self.ip
    }

    /// Instructions executed so far, non-commands included.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn loops(&self) -> &LoopMap {
        &self.loops
    }

    /// Execute the program until the instruction pointer runs off the end.
    pub fn run<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<(), BfError>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        self.execute(input, output, None)
    }

    /// Execute with cooperative cancellation and optional step limit.
    pub fn run_with_control<R, W>(
        &mut self,
        input: &mut R,
        output: &mut W,
        step_control: &StepControl,
    ) -> Result<(), BfError>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        self.execute(input, output, Some(step_control))
    }

    fn execute<R, W>(
        &mut self,
        input: &mut R,
        output: &mut W,
        step_control: Option<&StepControl>,
    ) -> Result<(), BfError>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let code_len = self.code.len();

        while self.ip < code_len {
            if let Some(ctrl) = step_control {
                if ctrl.cancel_flag.load(Ordering::Relaxed) {
                    let _ = output.flush();
                    return Err(BfError::Canceled);
                }
                if let Some(max) = ctrl.max_steps {
                    if self.steps >= max {
                        let _ = output.flush();
                        return Err(BfError::StepLimitExceeded { limit: max });
                    }
                }
            }

            let instr = self.code[self.ip];
            tracing::trace!(
                step = self.steps,
                ip = self.ip,
                ptr = self.tape.pointer(),
                cell = self.tape.get(),
                op = %instr,
                "step"
            );

            match instr {
                '>' => self.tape.move_right(),
                '<' => self.tape.move_left(),
                '+' => self.tape.increment(),
                '-' => self.tape.decrement(),
                '.' => {
                    let ip = self.ip;
                    self.write_cell(output)
                        .map_err(|source| BfError::OutputWrite { ip, source })?;
                }
                ',' => {
                    let ip = self.ip;
                    // Prompts written so far must be visible before blocking.
                    output
                        .flush()
                        .map_err(|source| BfError::OutputWrite { ip, source })?;
                    let mut buf = [0u8; 1];
                    input
                        .read_exact(&mut buf)
                        .map_err(|source| BfError::InputRead { ip, source })?;
                    self.tape.set(i64::from(buf[0]));
                }
                '[' => {
                    if self.tape.get() == 0 {
                        self.ip = self.jump_target();
                    }
                }
                ']' => {
                    if self.tape.get() != 0 {
                        self.ip = self.jump_target();
                    }
                }
                _ => {}
            }

            self.steps += 1;
            // Move to the next instruction
            self.ip += 1;
        }

        let ip = self.ip;
        output
            .write_all(b"\n")
            .and_then(|_| output.flush())
            .map_err(|source| BfError::OutputWrite { ip, source })?;

        tracing::debug!(
            steps = self.steps,
            tape_len = self.tape.len(),
            ptr = self.tape.pointer(),
            "program finished"
        );
        Ok(())
    }

    fn jump_target(&self) -> usize {
        // Every bracket was paired by `loops::resolve` at construction.
        self.loops.get(self.ip).unwrap_or(self.ip)
    }

    fn write_cell<W: Write + ?Sized>(&self, output: &mut W) -> std::io::Result<()> {
        let value = self.tape.get();
        match self.output_mode {
            OutputMode::Unicode => {
                let ch = u32::try_from(value)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                let mut buf = [0u8; 4];
                output.write_all(ch.encode_utf8(&mut buf).as_bytes())
            }
            OutputMode::Byte => output.write_all(&[value as u8]),
        }
    }
}
