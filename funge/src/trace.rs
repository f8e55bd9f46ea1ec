use std::io::{self, Write};

use crate::{Fault, InstructionPointer, Interpreter, Observer, TraceConfig};

const CURSOR: &str = "█";

/// Debugger view printed before every step.
pub struct Tracer<W> {
    config: TraceConfig,
    out: W,
}

impl<W: Write> Tracer<W> {
    pub fn new(config: TraceConfig, out: W) -> Self {
        Self { config, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render<I: Interpreter>(&mut self, ip: &InstructionPointer, interpreter: &I) -> io::Result<()> {
        let grid = interpreter.grid();
        if self.config.coords {
            let cell = char::from(grid.cell(ip.x(), ip.y()));
            write!(self.out, "\n{cell} ({}, {})", ip.x(), ip.y())?;
        }
        if self.config.stack {
            write!(self.out, "\n{}", interpreter.render_stack())?;
        }
        if self.config.grid {
            writeln!(self.out)?;
            for (y, row) in grid.rows().enumerate() {
                if y == ip.y() {
                    self.out.write_all(&row[..ip.x()])?;
                    self.out.write_all(CURSOR.as_bytes())?;
                    self.out.write_all(&row[ip.x() + 1..])?;
                } else {
                    self.out.write_all(row)?;
                }
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> Observer for Tracer<W> {
    fn observe<I: Interpreter>(
        &mut self,
        ip: &InstructionPointer,
        interpreter: &mut I,
    ) -> Result<(), Fault> {
        self.render(ip, interpreter).map_err(Fault::Output)?;
        if self.config.pause {
            interpreter.pause()?;
        }
        Ok(())
    }
}
