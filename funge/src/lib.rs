mod config;
mod dataflow;
mod driver;
mod error;
mod future;
mod grid;
mod instruction;
mod interpreter;
mod machine;
mod pointer;
mod scheduler;
mod stack;
mod trace;

pub use config::{Config, TraceConfig, default_workers};
pub use dataflow::Dataflow;
pub use driver::{Observer, Silent, run};
pub use error::{ArithmeticFault, Fault};
pub use future::{Future, Promise, Resolution, pending};
pub use grid::{DEFAULT_HEIGHT, DEFAULT_WIDTH, Grid};
pub use instruction::{BinaryOp, Instruction};
pub use interpreter::{Flow, Interpreter, Synchronous};
pub use machine::Machine;
pub use pointer::{Axis, Direction, InstructionPointer};
pub use scheduler::{Scheduler, Task, WorkerId};
pub use stack::{FutureStack, Stack, Underflow, ValueStack};
pub use trace::Tracer;
