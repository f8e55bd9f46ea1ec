use std::{
    io::{BufRead, Write},
    num::NonZeroUsize,
};

use log::{debug, trace};

use crate::{
    ArithmeticFault, Fault, Flow, Future, FutureStack, Grid, Instruction, InstructionPointer,
    Interpreter, Machine, Resolution, Scheduler,
    future::pending,
    instruction::{branch_sign, not},
    interpreter::render,
};

/// Interpreter whose stack slots are futures.
///
/// Arithmetic, `!` and `:` allocate their result slots on the dispatch thread
/// and hand the computation to the scheduler, so dispatch runs ahead of
/// evaluation. Conditional turns wait for their operand. Instructions with an
/// outside effect or a fault of their own (output, input, `g`, `p`, `@`) wait
/// for every outstanding task first, so a division by zero is reported before
/// anything the synchronous interpreter would never have reached.
pub struct Dataflow<R, W> {
    machine: Machine<R, W>,
    stack: FutureStack,
    scheduler: Scheduler,
}

impl<R: BufRead, W: Write> Dataflow<R, W> {
    pub fn new(machine: Machine<R, W>, workers: NonZeroUsize) -> Self {
        debug!("dataflow interpreter with {workers} workers");
        Self {
            machine,
            stack: FutureStack::new(),
            scheduler: Scheduler::new(workers),
        }
    }

    #[must_use]
    pub fn stack(&self) -> &FutureStack {
        &self.stack
    }

    /// Waits for all outstanding work before handing the grid and output back.
    pub fn into_parts(self) -> (Grid, W) {
        self.scheduler.quiesce();
        self.machine.into_parts()
    }

    /// Pushes an unresolved slot now and computes it on the pool.
    fn spawn<const N: usize, F>(&mut self, inputs: [Future; N], compute: F)
    where
        F: FnOnce([i64; N]) -> Resolution + Send + 'static,
    {
        let (promise, output) = pending();
        self.stack.push(output);
        self.scheduler.submit(Box::new(move || {
            let result = await_all(&inputs).and_then(compute);
            promise.resolve(result);
            result.map(drop)
        }));
    }

    /// One read of the original feeds both copies.
    fn duplicate(&mut self) {
        let original = self.stack.pop();
        let (lower, lower_future) = pending();
        let (upper, upper_future) = pending();
        self.stack.push(lower_future);
        self.stack.push(upper_future);
        self.scheduler.submit(Box::new(move || {
            let value = original.wait();
            lower.resolve(value);
            upper.resolve(value);
            value.map(drop)
        }));
    }

    /// Reports a fault some finished task recorded, without waiting.
    fn check(&self) -> Result<(), Fault> {
        match self.scheduler.fault() {
            Some(fault) => Err(fault.into()),
            None => Ok(()),
        }
    }

    /// Waits for all outstanding tasks, then reports their first fault.
    fn barrier(&self) -> Result<(), Fault> {
        self.scheduler.quiesce();
        self.check()
    }

    fn await_pop<const N: usize>(&mut self) -> Result<[i64; N], Fault> {
        let futures: [Future; N] = self.stack.pop_n();
        Ok(await_all(&futures)?)
    }
}

fn await_all<const N: usize>(inputs: &[Future; N]) -> Result<[i64; N], ArithmeticFault> {
    let mut values = [0; N];
    for (value, future) in values.iter_mut().zip(inputs) {
        *value = future.wait()?;
    }
    Ok(values)
}

impl<R: BufRead, W: Write> Interpreter for Dataflow<R, W> {
    fn execute(&mut self, ip: &mut InstructionPointer) -> Result<Flow, Fault> {
        self.check()?;
        let instruction = self.machine.fetch(ip);
        trace!("{:?} at ({}, {})", instruction, ip.x(), ip.y());

        match instruction {
            Instruction::Quote | Instruction::Nop => {}
            Instruction::Literal(byte) => self.stack.push(Future::ready(i64::from(byte))),
            Instruction::Digit(digit) => self.stack.push(Future::ready(i64::from(digit))),
            Instruction::Move(direction) => ip.turn(direction),
            Instruction::Random => ip.turn(self.machine.random_direction()),
            Instruction::Binary(op) => {
                let [right, left] = self.stack.pop_n();
                self.spawn([left, right], move |[left, right]| op.apply(left, right));
            }
            Instruction::Not => {
                let operand = self.stack.pop_n::<1>();
                self.spawn(operand, |[value]| Ok(not(value)));
            }
            Instruction::If(axis) => {
                let [value] = self.await_pop()?;
                ip.go(axis, branch_sign(value));
            }
            Instruction::Duplicate => self.duplicate(),
            Instruction::Swap => {
                let [top, below] = self.stack.pop_n();
                self.stack.push(top);
                self.stack.push(below);
            }
            Instruction::Discard => {
                self.stack.pop();
            }
            Instruction::OutputNumber => {
                self.barrier()?;
                let [value] = self.await_pop()?;
                self.machine.write_number(value)?;
            }
            Instruction::OutputChar => {
                self.barrier()?;
                let [value] = self.await_pop()?;
                self.machine.write_char(value)?;
            }
            Instruction::Bridge => ip.advance(),
            Instruction::Get => {
                self.barrier()?;
                let [y, x] = self.await_pop()?;
                let cell = self.machine.grid.get(x, y)?;
                self.stack.push(Future::ready(i64::from(cell)));
            }
            Instruction::Put => {
                self.barrier()?;
                let [y, x, value] = self.await_pop()?;
                self.machine.grid.put(x, y, value as u8)?;
            }
            Instruction::InputNumber => {
                self.barrier()?;
                let value = self.machine.read_number()?;
                self.stack.push(Future::ready(value));
            }
            Instruction::InputChar => {
                self.barrier()?;
                let value = self.machine.read_char()?;
                self.stack.push(Future::ready(value));
            }
            Instruction::Halt => {
                self.barrier()?;
                return Ok(Flow::Halt);
            }
        }
        Ok(Flow::Continue)
    }

    fn grid(&self) -> &Grid {
        &self.machine.grid
    }

    fn render_stack(&self) -> String {
        render(self.stack.as_slice())
    }

    fn pause(&mut self) -> Result<(), Fault> {
        self.machine.pause()
    }

    fn flush(&mut self) -> Result<(), Fault> {
        self.machine.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Axis;

    fn interpreter(source: &str, workers: usize) -> Dataflow<&'static [u8], Vec<u8>> {
        let grid = Grid::parse(source.as_bytes(), 80, 25);
        let machine = Machine::new(grid, &b""[..], Vec::new(), Some(1));
        Dataflow::new(machine, NonZeroUsize::new(workers).unwrap())
    }

    fn steps(interp: &mut Dataflow<&'static [u8], Vec<u8>>, ip: &mut InstructionPointer, n: usize) {
        for _ in 0..n {
            assert_eq!(interp.execute(ip).unwrap(), Flow::Continue);
            ip.advance();
        }
    }

    fn values(interp: &Dataflow<&'static [u8], Vec<u8>>) -> Vec<Resolution> {
        interp.stack().as_slice().iter().map(Future::wait).collect()
    }

    #[test]
    fn arithmetic_slots_are_allocated_synchronously() {
        let mut interp = interpreter("52-3*", 2);
        let mut ip = InstructionPointer::new(80, 25);
        steps(&mut interp, &mut ip, 5);
        assert_eq!(interp.stack().depth(), 1);
        assert_eq!(values(&interp), vec![Ok(9)]);
    }

    #[test]
    fn duplicate_resolves_both_copies() {
        let mut interp = interpreter("34+:", 1);
        let mut ip = InstructionPointer::new(80, 25);
        steps(&mut interp, &mut ip, 4);
        assert_eq!(values(&interp), vec![Ok(7), Ok(7)]);
    }

    #[test]
    fn swap_moves_unresolved_handles() {
        let mut interp = interpreter("12+5\\", 3);
        let mut ip = InstructionPointer::new(80, 25);
        steps(&mut interp, &mut ip, 5);
        assert_eq!(values(&interp), vec![Ok(5), Ok(3)]);
    }

    #[test]
    fn greater_than_keeps_operand_order() {
        let mut interp = interpreter("52`25`", 2);
        let mut ip = InstructionPointer::new(80, 25);
        steps(&mut interp, &mut ip, 6);
        assert_eq!(values(&interp), vec![Ok(1), Ok(0)]);
    }

    #[test]
    fn conditional_turn_waits_for_computed_value() {
        let mut interp = interpreter("11-|", 2);
        let mut ip = InstructionPointer::new(80, 25);
        steps(&mut interp, &mut ip, 3);
        interp.execute(&mut ip).unwrap();
        assert_eq!(ip.direction(Axis::Y), 1);
    }

    #[test]
    fn fault_surfaces_when_value_is_observed() {
        let mut interp = interpreter("10/.", 2);
        let mut ip = InstructionPointer::new(80, 25);
        steps(&mut interp, &mut ip, 3);
        assert!(matches!(
            interp.execute(&mut ip),
            Err(Fault::Arithmetic(ArithmeticFault::DivisionByZero))
        ));
    }

    #[test]
    fn unobserved_fault_surfaces_at_halt() {
        let mut interp = interpreter("10/$@", 2);
        let mut ip = InstructionPointer::new(80, 25);
        steps(&mut interp, &mut ip, 4);
        assert!(matches!(
            interp.execute(&mut ip),
            Err(Fault::Arithmetic(ArithmeticFault::DivisionByZero))
        ));
    }

    #[test]
    fn output_waits_for_an_unread_fault() {
        let mut interp = interpreter("10/$1.", 2);
        let mut ip = InstructionPointer::new(80, 25);
        steps(&mut interp, &mut ip, 5);
        assert!(matches!(
            interp.execute(&mut ip),
            Err(Fault::Arithmetic(ArithmeticFault::DivisionByZero))
        ));
        let (_, out) = interp.into_parts();
        assert!(out.is_empty());
    }

    #[test]
    fn looping_program_stops_on_an_unread_fault() {
        // never reaches `@` and never reads the quotient
        let mut interp = interpreter("10/$", 1);
        let mut ip = InstructionPointer::new(80, 25);
        let fault = (0..1_000_000).find_map(|_| match interp.execute(&mut ip) {
            Ok(_) => {
                ip.advance();
                None
            }
            Err(fault) => Some(fault),
        });
        assert!(matches!(
            fault,
            Some(Fault::Arithmetic(ArithmeticFault::DivisionByZero))
        ));
    }

    #[test]
    fn faults_propagate_through_dependent_tasks() {
        let mut interp = interpreter("10/1+", 1);
        let mut ip = InstructionPointer::new(80, 25);
        steps(&mut interp, &mut ip, 5);
        assert_eq!(values(&interp), vec![Err(ArithmeticFault::DivisionByZero)]);
    }
}
