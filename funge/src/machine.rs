use std::io::{self, BufRead, Write};

use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Direction, Fault, Grid, Instruction, InstructionPointer};

/// State both interpreters share: the grid, the I/O collaborators, the random
/// source and the string-mode flag.
pub struct Machine<R, W> {
    pub grid: Grid,
    input: R,
    output: W,
    rng: StdRng,
    string_mode: bool,
}

impl<R: BufRead, W: Write> Machine<R, W> {
    /// A `seed` makes `?` reproducible.
    pub fn new(grid: Grid, input: R, output: W, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            grid,
            input,
            output,
            rng,
            string_mode: false,
        }
    }

    /// Decodes the cell under the pointer. `"` flips string mode here.
    pub fn fetch(&mut self, ip: &InstructionPointer) -> Instruction {
        let instruction = Instruction::decode(self.grid.cell(ip.x(), ip.y()), self.string_mode);
        if instruction == Instruction::Quote {
            self.string_mode = !self.string_mode;
        }
        instruction
    }

    #[must_use]
    pub fn string_mode(&self) -> bool {
        self.string_mode
    }

    pub fn random_direction(&mut self) -> Direction {
        match (self.rng.gen_range(0..2), self.rng.gen_range(0..2)) {
            (0, 0) => Direction::Left,
            (0, _) => Direction::Right,
            (_, 0) => Direction::Up,
            _ => Direction::Down,
        }
    }

    /// `&`: one line, parsed as a signed decimal.
    pub fn read_number(&mut self) -> Result<i64, Fault> {
        self.flush()?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(Fault::InputRead)?;
        if read == 0 {
            return Err(closed_input());
        }
        let text = line.trim();
        text.parse::<i64>()
            .map_err(|_| Fault::NumericParse(text.to_string()))
    }

    /// `~`: one raw byte.
    pub fn read_char(&mut self) -> Result<i64, Fault> {
        self.flush()?;
        let byte = self.read_byte().map_err(Fault::InputRead)?;
        byte.map(i64::from).ok_or_else(closed_input)
    }

    /// Blocks for one byte of input between steps. End of input is ignored.
    pub fn pause(&mut self) -> Result<(), Fault> {
        self.flush()?;
        if self.read_byte().map_err(Fault::InputRead)?.is_none() {
            debug!("pause reached end of input");
        }
        Ok(())
    }

    pub fn write_number(&mut self, value: i64) -> Result<(), Fault> {
        write!(self.output, "{value}").map_err(Fault::Output)
    }

    pub fn write_char(&mut self, value: i64) -> Result<(), Fault> {
        let c = u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        let mut buf = [0; 4];
        self.output
            .write_all(c.encode_utf8(&mut buf).as_bytes())
            .map_err(Fault::Output)
    }

    pub fn flush(&mut self) -> Result<(), Fault> {
        self.output.flush().map_err(Fault::Output)
    }

    pub fn into_parts(self) -> (Grid, W) {
        (self.grid, self.output)
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = self.input.fill_buf()?.first().copied();
        if byte.is_some() {
            self.input.consume(1);
        }
        Ok(byte)
    }
}

fn closed_input() -> Fault {
    Fault::InputRead(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "input closed",
    ))
}
