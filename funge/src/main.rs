use clap::Parser as ClapParser;
use std::{
    fs,
    io,
    num::NonZeroUsize,
    path::PathBuf,
    process,
};

use env_logger::Env;
use log::{debug, error};

use funge::{
    Config, Dataflow, Fault, Grid, InstructionPointer, Interpreter, Machine, Silent,
    Synchronous, TraceConfig, Tracer, default_workers, run,
};

#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(help = "The Befunge-93 source file")]
    file: PathBuf,

    #[arg(long, visible_alias = "async", help = "Transparently execute instructions concurrently")]
    dataflow: bool,

    #[arg(long, help = "Print current instruction and coordinates to stderr")]
    coords: bool,

    #[arg(long, help = "Print stack contents to stderr")]
    stack: bool,

    #[arg(long, help = "Print instruction pointer superimposed over code to stderr")]
    trace: bool,

    #[arg(long, help = "Pause for return keypress between instructions")]
    pause: bool,

    #[arg(long, help = "Synonym for --coords --pause --stack --trace")]
    debug: bool,

    #[arg(long, help = "Worker threads used by --dataflow")]
    workers: Option<NonZeroUsize>,

    #[arg(long, help = "Seed for the `?` instruction")]
    seed: Option<u64>,

    #[arg(long, default_value = "80", help = "Grid width")]
    width: NonZeroUsize,

    #[arg(long, default_value = "25", help = "Grid height")]
    height: NonZeroUsize,
}

impl Cli {
    fn config(&self) -> Config {
        let trace = if self.debug {
            TraceConfig::debug()
        } else {
            TraceConfig {
                coords: self.coords,
                stack: self.stack,
                grid: self.trace,
                pause: self.pause,
            }
        };
        Config {
            dataflow: self.dataflow,
            workers: self.workers.unwrap_or_else(default_workers),
            trace,
            width: self.width.get(),
            height: self.height.get(),
            seed: self.seed,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = cli.config();
    debug!("{config:?}");

    let source = match fs::read(&cli.file) {
        Ok(source) => source,
        Err(err) => {
            error!("could not load {}: {err}", cli.file.display());
            eprintln!("Error reading file '{}': {}", cli.file.display(), Fault::ProgramLoad(err));
            process::exit(1);
        }
    };

    let grid = Grid::parse(&source, config.width, config.height);
    if let Err(fault) = execute(&config, grid) {
        error!("{fault}");
        eprintln!("Error executing {}: {}", cli.file.display(), fault);
        process::exit(1);
    }
}

fn execute(config: &Config, grid: Grid) -> Result<(), Fault> {
    let machine = Machine::new(grid, io::stdin().lock(), io::stdout().lock(), config.seed);
    let mut ip = InstructionPointer::new(config.width, config.height);
    if config.dataflow {
        drive(&mut Dataflow::new(machine, config.workers), &mut ip, config.trace)
    } else {
        drive(&mut Synchronous::new(machine), &mut ip, config.trace)
    }
}

fn drive<I: Interpreter>(
    interpreter: &mut I,
    ip: &mut InstructionPointer,
    trace: TraceConfig,
) -> Result<(), Fault> {
    if trace.is_enabled() {
        run(interpreter, ip, &mut Tracer::new(trace, io::stderr().lock()))
    } else {
        run(interpreter, ip, &mut Silent)
    }
}
