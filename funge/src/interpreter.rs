use std::io::{BufRead, Write};

use log::trace;

use crate::{
    Fault, Grid, Instruction, InstructionPointer, Machine, ValueStack,
    instruction::{branch_sign, not},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// One instruction per call, reading the cell under `ip`.
pub trait Interpreter {
    fn execute(&mut self, ip: &mut InstructionPointer) -> Result<Flow, Fault>;

    fn grid(&self) -> &Grid;

    /// Stack contents bottom to top, as `[a b c]`.
    fn render_stack(&self) -> String;

    /// Waits for one byte of input.
    fn pause(&mut self) -> Result<(), Fault>;

    fn flush(&mut self) -> Result<(), Fault>;
}

pub(crate) fn render<T: std::fmt::Display>(items: &[T]) -> String {
    let items: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(" "))
}

/// Computes every instruction inline on a stack of plain integers.
pub struct Synchronous<R, W> {
    machine: Machine<R, W>,
    stack: ValueStack,
}

impl<R: BufRead, W: Write> Synchronous<R, W> {
    pub fn new(machine: Machine<R, W>) -> Self {
        Self {
            machine,
            stack: ValueStack::new(),
        }
    }

    #[must_use]
    pub fn stack(&self) -> &ValueStack {
        &self.stack
    }

    pub fn into_parts(self) -> (Grid, W) {
        self.machine.into_parts()
    }
}

impl<R: BufRead, W: Write> Interpreter for Synchronous<R, W> {
    fn execute(&mut self, ip: &mut InstructionPointer) -> Result<Flow, Fault> {
        let instruction = self.machine.fetch(ip);
        trace!("{:?} at ({}, {})", instruction, ip.x(), ip.y());

        match instruction {
            Instruction::Quote | Instruction::Nop => {}
            Instruction::Literal(byte) => self.stack.push(i64::from(byte)),
            Instruction::Digit(digit) => self.stack.push(i64::from(digit)),
            Instruction::Move(direction) => ip.turn(direction),
            Instruction::Random => ip.turn(self.machine.random_direction()),
            Instruction::Binary(op) => {
                let [right, left] = self.stack.pop_n();
                self.stack.push(op.apply(left, right)?);
            }
            Instruction::Not => {
                let value = self.stack.pop();
                self.stack.push(not(value));
            }
            Instruction::If(axis) => ip.go(axis, branch_sign(self.stack.pop())),
            Instruction::Duplicate => {
                let value = self.stack.pop();
                self.stack.push(value);
                self.stack.push(value);
            }
            Instruction::Swap => {
                let [top, below] = self.stack.pop_n();
                self.stack.push(top);
                self.stack.push(below);
            }
            Instruction::Discard => {
                self.stack.pop();
            }
            Instruction::OutputNumber => self.machine.write_number(self.stack.pop())?,
            Instruction::OutputChar => self.machine.write_char(self.stack.pop())?,
            Instruction::Bridge => ip.advance(),
            Instruction::Get => {
                let [y, x] = self.stack.pop_n();
                let cell = self.machine.grid.get(x, y)?;
                self.stack.push(i64::from(cell));
            }
            Instruction::Put => {
                let [y, x, value] = self.stack.pop_n();
                self.machine.grid.put(x, y, value as u8)?;
            }
            Instruction::InputNumber => {
                let value = self.machine.read_number()?;
                self.stack.push(value);
            }
            Instruction::InputChar => {
                let value = self.machine.read_char()?;
                self.stack.push(value);
            }
            Instruction::Halt => return Ok(Flow::Halt),
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
