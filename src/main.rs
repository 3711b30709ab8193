use bfrun::cli_util::print_error;
use bfrun::config::{Overrides, RunConfig};
use bfrun::terminal::{self, RawStdin};
use bfrun::{BfError, Interpreter, OutputMode, StepControl, logging};
use clap::Parser;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

/// How long a cancelled run gets to unwind before we stop waiting for it.
const CANCEL_GRACE: Duration = Duration::from_millis(200);

const EXIT_INTERRUPTED: i32 = 130;

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} [OPTIONS] <FILE.b>   # Run the Brainfuck program stored in FILE.b

Options:
  --timeout <MS>              Abort after MS milliseconds (fallback BFRUN_TIMEOUT_MS; default none)
  --max-steps <N>             Abort after N instructions (fallback BFRUN_MAX_STEPS; default unlimited)
  --output-mode <MODE>        unicode | byte (fallback BFRUN_OUTPUT_MODE; default unicode)
  --help, -h                  Show this help

Notes:
- Input (`,`) reads one raw byte from stdin; a terminal is switched to raw mode
  for the rest of the run. End of input is an error.
- Characters outside of Brainfuck's ><+-.,[] are ignored.
- Defaults may also be set in $XDG_CONFIG_HOME/bfrun.toml under [run].
- Set BFRUN_LOG (e.g. BFRUN_LOG=debug) to see diagnostics on stderr.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "bfrun", disable_help_flag = true)]
struct Cli {
    /// Wall-clock timeout in milliseconds
    #[arg(long = "timeout", value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Maximum interpreter steps before abort
    #[arg(long = "max-steps", value_name = "N")]
    max_steps: Option<u64>,

    /// How `.` encodes cell values
    #[arg(long = "output-mode", value_name = "MODE", value_enum)]
    output_mode: Option<OutputMode>,

    /// Brainfuck source file (`.b`)
    #[arg(value_name = "FILE")]
    file: Option<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,
}

const WORKER_LOST: &str = "Execution aborted: interpreter stopped unexpectedly";

enum Outcome {
    Finished(Result<(), BfError>),
    Interrupted,
    WorkerLost,
}

/// Run `work`, turning a panic into [`Outcome::WorkerLost`] so the main
/// thread always hears back.
fn run_worker<F>(work: F) -> Outcome
where
    F: FnOnce() -> Result<(), BfError>,
{
    match panic::catch_unwind(AssertUnwindSafe(work)) {
        Ok(res) => Outcome::Finished(res),
        Err(_) => Outcome::WorkerLost,
    }
}

fn has_b_extension(path: &str) -> bool {
    Path::new(path).extension().is_some_and(|ext| ext == "b")
}

fn run_file(program: &str, path: &str, overrides: Overrides) -> i32 {
    if !has_b_extension(path) {
        eprintln!(
            "{program}: error: improper filename '{path}'. Ensure that the input file is of the type <filename.b>"
        );
        let _ = io::stderr().flush();
        return 2;
    }

    // Non-UTF-8 bytes become U+FFFD, which runs as a no-op like any comment
    let code = match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            eprintln!("{program}: error: could not read file - {path}: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    let config = RunConfig::resolve(overrides);
    tracing::debug!(?config, file = path, "starting run");

    // Fail fast on unbalanced loops, before any output is produced
    let mut bf = match Interpreter::new(&code) {
        Ok(bf) => bf.with_output_mode(config.output_mode),
        Err(err) => {
            print_error(Some(program), &code, &err);
            return 1;
        }
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel::<Outcome>();

    let interrupt_tx = tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = interrupt_tx.send(Outcome::Interrupted);
    }) {
        tracing::warn!("failed to set ctrl+c handler: {e}");
    }

    // Execute on a worker thread with cooperative cancellation
    let ctrl = StepControl::new(config.max_steps, cancel.clone());
    thread::spawn(move || {
        let outcome = run_worker(|| {
            let mut input = RawStdin::new();
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let res = bf.run_with_control(&mut input, &mut out, &ctrl);
            // Restore the terminal before the main thread reports anything.
            drop(input);
            res
        });
        let _ = tx.send(outcome);
    });

    let received = match config.timeout_ms {
        Some(ms) => rx.recv_timeout(Duration::from_millis(ms)),
        None => rx.recv().map_err(|_| mpsc::RecvTimeoutError::Disconnected),
    };

    let exit_code = match received {
        Ok(Outcome::Finished(Ok(()))) => 0,
        Ok(Outcome::Finished(Err(BfError::StepLimitExceeded { limit }))) => {
            eprintln!("Execution aborted: step limit exceeded ({limit})");
            1
        }
        Ok(Outcome::Finished(Err(other))) => {
            print_error(Some(program), &code, &other);
            1
        }
        Ok(Outcome::Interrupted) => {
            stop_worker(&cancel, &rx);
            eprintln!("Execution aborted: interrupted");
            EXIT_INTERRUPTED
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            stop_worker(&cancel, &rx);
            eprintln!(
                "Execution aborted: wall-clock timeout exceeded ({} ms)",
                config.timeout_ms.unwrap_or_default()
            );
            1
        }
        Ok(Outcome::WorkerLost) | Err(mpsc::RecvTimeoutError::Disconnected) => {
            terminal::restore_terminal();
            eprintln!("{WORKER_LOST}");
            1
        }
    };

    let _ = io::stderr().flush();
    exit_code
}

/// Raise the cancel flag and give the worker a moment to unwind. A worker
/// blocked on input never returns, so the terminal is restored from here too.
fn stop_worker(cancel: &AtomicBool, rx: &mpsc::Receiver<Outcome>) {
    cancel.store(true, Ordering::Relaxed);
    let _ = rx.recv_timeout(CANCEL_GRACE);
    // No stdout flush here: a worker blocked on `,` still holds the stdout
    // lock. `process::exit` flushes what it can without waiting on it.
    terminal::restore_terminal();
}

fn main() {
    logging::init();

    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bfrun"));

    let cli = Cli::parse();

    if cli.help {
        usage_and_exit(&program, 0);
    }

    let Some(path) = cli.file else {
        usage_and_exit(&program, 2);
    };

    let overrides = Overrides {
        timeout_ms: cli.timeout_ms,
        max_steps: cli.max_steps,
        output_mode: cli.output_mode,
    };

    let code = run_file(&program, &path, overrides);
    std::process::exit(code);
}
