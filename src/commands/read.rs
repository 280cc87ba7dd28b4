use clap::Args;
use std::path::Path;
use std::{fs, thread};
use std::io::{self, IsTerminal, Write};
use std::sync::{mpsc, Arc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use strict_bf::cli_util::print_error;
use strict_bf::io::{ByteSink, ByteSource, ReaderSource, WriterSink};
use strict_bf::terminal::KeySource;
use strict_bf::{build, BfError, Config, Engine, JumpTable, Program, StepControl};

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct ReadArgs {
    /// Print a step-by-step table of operations instead of program output
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Read Brainfuck code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Concatenated Brainfuck code parts
    #[arg(value_name = "code", trailing_var_arg = true)]
    pub code: Vec<String>,

    /// Number of tape cells (fallback BF_TAPE_SIZE; default 30000)
    #[arg(long = "tape-size", value_name = "N")]
    pub tape_size: Option<usize>,

    /// Wall-clock timeout in milliseconds (fallback BF_TIMEOUT_MS; default none)
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Maximum interpreter steps before abort (fallback BF_MAX_STEPS; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<usize>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: ReadArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let ReadArgs {
        debug,
        file,
        code,
        tape_size,
        timeout_ms,
        max_steps,
        ..
    } = args;

    if file.is_none() && code.is_empty() {
        usage_and_exit(program, 2);
    }

    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        usage_and_exit(program, 2);
    }

    if tape_size == Some(0) {
        eprintln!("{program}: --tape-size must be at least 1");
        usage_and_exit(program, 2);
    }

    // A lone `name.bf` argument that exists on disk is a program file
    let file = file.or_else(|| match code.as_slice() {
        [only] if only.ends_with(".bf") && Path::new(only).is_file() => Some(only.clone()),
        _ => None,
    });

    let code_str = if let Some(path) = file {
        match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{program}: failed to read code file as UTF-8: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
        }
    } else {
        code.join("")
    };

    // Resolve limits: flags -> env -> config file -> defaults
    let mut config = Config::load();
    if let Some(n) = tape_size { config.tape_size = n; }
    if let Some(n) = max_steps { config.max_steps = Some(n); }
    if let Some(ms) = timeout_ms { config.timeout_ms = Some(ms); }
    let debug_mode = debug;
    tracing::debug!(?config, debug_mode, "resolved settings");

    // Validate everything before a single instruction runs
    let (bf_program, jumps) = match build(&code_str) {
        Ok(built) => built,
        Err(err) => {
            print_error(Some(program), &code_str, &err);
            return 1;
        }
    };

    // ctrl+c outside raw mode: flush what we have and leave
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(130);
    }) {
        tracing::warn!("failed to set ctrl+c handler: {e}");
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let ctrl = StepControl::new(config.max_steps, cancel.clone());
    let tape_size = config.tape_size;

    let result = match config.timeout_ms {
        None => Some(execute(&bf_program, &jumps, tape_size, debug, &ctrl)),
        Some(timeout_ms) => {
            // Execute on a worker thread with cooperative cancellation
            let (tx, rx) = mpsc::channel::<Result<(), BfError>>();
            thread::spawn(move || {
                let res = execute(&bf_program, &jumps, tape_size, debug, &ctrl);
                let _ = tx.send(res);
            });

            match rx.recv_timeout(Duration::from_millis(timeout_ms)) {
                Ok(res) => Some(res),
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    cancel.store(true, Ordering::Relaxed);
                    if io::stdin().is_terminal() {
                        let _ = crossterm::terminal::disable_raw_mode();
                    }
                    eprintln!("Execution aborted: wall-clock timeout exceeded ({timeout_ms} ms)");
                    None
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => None,
            }
        }
    };

    let exit_code = match result {
        Some(Ok(())) => 0,
        Some(Err(BfError::Io { ref source, .. })) if source.kind() == io::ErrorKind::Interrupted => {
            eprintln!("Execution aborted: interrupted");
            130
        }
        Some(Err(err)) => {
            print_error(Some(program), &code_str, &err);
            1
        }
        None => 1,
    };
    let _ = io::stderr().flush();

    // For readability, ensure output ends with a newline
    println!();
    let _ = io::stdout().flush();
    exit_code
}

/// Run once with stdin/stdout wired up the way the terminal calls for.
fn execute(
    program: &Program,
    jumps: &JumpTable,
    tape_size: usize,
    debug: bool,
    ctrl: &StepControl,
) -> Result<(), BfError> {
    let input: Box<dyn ByteSource> = if io::stdin().is_terminal() {
        Box::new(KeySource::new())
    } else {
        Box::new(ReaderSource::new(io::stdin()))
    };

    let mut engine = Engine::new(tape_size);
    if debug {
        let sink: Box<dyn ByteSink> = Box::new(WriterSink::new(io::sink()));
        let mut stdout = io::stdout();
        engine.run_traced(program, jumps, input, sink, &mut stdout, Some(ctrl))
    } else {
        let sink = WriterSink::new(io::stdout());
        engine.run_with_control(program, jumps, input, sink, ctrl)
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} read [OPTIONS] "<code>"
  {0} read [OPTIONS] --file <PATH>
  {0} read [OPTIONS] <PATH.bf>

Options:
  --file,  -f <PATH>  Read Brainfuck code from PATH instead of positional "<code>"
  --debug, -d         Print a step-by-step table of operations instead of program output
  --tape-size <N>     Number of tape cells (default 30000)
  --max-steps <N>     Abort after N executed instructions
  --timeout <MS>      Abort after MS milliseconds of wall-clock time
  --help,  -h         Show this help

Notes:
- Characters outside of Brainfuck's ><+-.,[] are comments and are ignored.
- Loops are validated before anything runs; an unmatched '[' or ']' is an error.
- Cells never wrap: '+' on 255 and '-' on 0 are errors, as is moving off the tape.
- Input (`,`) reads one key (terminal) or one byte (pipe); end of input is an error.
- Code starting with '-' must follow a `--` separator.

Examples:
- Load Brainfuck code from a file:
    {0} read --file ./program.bf
- Read bytes from a file as stdin (`,` will consume file input):
    {0} read ",.,.,." < input.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
