use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::{self, Command};

use anyhow::Context;
use structopt::clap::AppSettings;
use structopt::StructOpt;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use strace::{EventCallback, FaultInjector, Printer, Session, TraceOptions};

/// Exit code when tracing itself failed, as opposed to the traced command.
const TRACING_FAILED: i32 = 125;

/// Trace the syscalls and signals of a command and all of its descendants.
#[derive(Debug, StructOpt)]
#[structopt(setting = AppSettings::TrailingVarArg)]
struct Opts {
    /// Write the trace to a file instead of stdout.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Maximum number of bytes to dump from any one buffer argument. With 0, buffers are
    /// elided.
    #[structopt(short = "s", long, default_value = "1024")]
    max_size: usize,

    /// Resume tracees with PTRACE_CONT, only observing syscalls reported by seccomp.
    #[structopt(long)]
    seccomp: bool,

    /// Fault injection rule, `<event-regex>,<error|log>,<value>`. May be repeated, and the
    /// first matching rule wins. Event names look like `Eopenat`, `Xwrite`, or `NewChild`.
    #[structopt(short, long = "rule", number_of_values = 1)]
    rules: Vec<String>,

    /// Print records undecoded.
    #[structopt(long)]
    raw: bool,

    /// Command to trace.
    command: String,

    /// Arguments of the command.
    args: Vec<String>,
}

fn main() {
    let opts = Opts::from_args();

    init_tracing();

    match run(opts) {
        Ok(code) => process::exit(code),
        Err(err) => {
            debug!("{err:?}");
            eprintln!("strace: {err:#}");
            process::exit(TRACING_FAILED);
        },
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
}

fn run(opts: Opts) -> anyhow::Result<i32> {
    let out: Box<dyn Write + Send> = match &opts.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("could not create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        },
        None => Box::new(io::stdout()),
    };

    let mut printer = Printer::new(out).with_max_size(opts.max_size).with_raw(opts.raw);
    let mut injector = FaultInjector::from_rules(&opts.rules).context("invalid rule")?;

    let mut options = TraceOptions::new();
    options.set_seccomp(opts.seccomp);

    let mut cmd = Command::new(&opts.command);
    cmd.args(&opts.args);

    let session = Session::new();

    // Print first, so the record that trips a fault is still shown.
    let outcome = {
        let mut callbacks: [&mut dyn EventCallback; 2] = [&mut printer, &mut injector];
        session.trace(cmd, &options, &mut callbacks)
    };

    printer.into_inner().flush().context("could not flush trace output")?;

    let outcome = outcome.with_context(|| format!("tracing `{}` failed", opts.command))?;

    Ok(outcome.exit_code())
}
