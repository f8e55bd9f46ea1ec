use log::debug;

use crate::{Fault, Flow, InstructionPointer, Interpreter};

/// Called once before every dispatched instruction.
pub trait Observer {
    fn observe<I: Interpreter>(
        &mut self,
        ip: &InstructionPointer,
        interpreter: &mut I,
    ) -> Result<(), Fault>;
}

/// Observes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Observer for Silent {
    fn observe<I: Interpreter>(&mut self, _: &InstructionPointer, _: &mut I) -> Result<(), Fault> {
        Ok(())
    }
}

/// Steps `interpreter` until `@`. A fault ends the run early and is returned
/// after the output has been flushed.
pub fn run<I: Interpreter, O: Observer>(
    interpreter: &mut I,
    ip: &mut InstructionPointer,
    observer: &mut O,
) -> Result<(), Fault> {
    debug!("run started at ({}, {})", ip.x(), ip.y());
    let mut steps: u64 = 0;
    let result = loop {
        if let Err(fault) = observer.observe(ip, interpreter) {
            break Err(fault);
        }
        steps += 1;
        match interpreter.execute(ip) {
            Ok(Flow::Continue) => ip.advance(),
            Ok(Flow::Halt) => break Ok(()),
            Err(fault) => break Err(fault),
        }
    };

    match &result {
        Ok(()) => debug!("halted after {steps} steps"),
        Err(fault) => debug!("aborted after {steps} steps: {fault}"),
    }
    let flushed = interpreter.flush();
    result.and(flushed)
}
