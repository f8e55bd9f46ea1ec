use crate::{ArithmeticFault, Axis, Direction};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Greater,
}

impl BinaryOp {
    /// Computes `left OP right`, where `right` is the first value popped.
    pub fn apply(self, left: i64, right: i64) -> Result<i64, ArithmeticFault> {
        match self {
            BinaryOp::Add => Ok(left.wrapping_add(right)),
            BinaryOp::Sub => Ok(left.wrapping_sub(right)),
            BinaryOp::Mul => Ok(left.wrapping_mul(right)),
            BinaryOp::Div if right == 0 => Err(ArithmeticFault::DivisionByZero),
            BinaryOp::Div => Ok(left.wrapping_div(right)),
            BinaryOp::Rem if right == 0 => Err(ArithmeticFault::DivisionByZero),
            BinaryOp::Rem => Ok(left.wrapping_rem(right)),
            BinaryOp::Greater => Ok(i64::from(left > right)),
        }
    }
}

#[must_use]
pub fn not(value: i64) -> i64 {
    i64::from(value == 0)
}

/// A grid byte, decoded against the current string-mode flag.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Instruction {
    Quote,
    Literal(u8),
    Digit(u8),
    Move(Direction),
    Random,
    Binary(BinaryOp),
    Not,
    /// `_` on the x axis, `|` on the y axis.
    If(Axis),
    Duplicate,
    Swap,
    Discard,
    OutputNumber,
    OutputChar,
    Bridge,
    Get,
    Put,
    InputNumber,
    InputChar,
    Halt,
    Nop,
}

impl Instruction {
    #[must_use]
    pub fn decode(byte: u8, string_mode: bool) -> Self {
        match byte {
            b'"' => Instruction::Quote,
            _ if string_mode => Instruction::Literal(byte),
            b'0'..=b'9' => Instruction::Digit(byte - b'0'),
            b'>' => Instruction::Move(Direction::Right),
            b'<' => Instruction::Move(Direction::Left),
            b'^' => Instruction::Move(Direction::Up),
            b'v' => Instruction::Move(Direction::Down),
            b'?' => Instruction::Random,
            b'+' => Instruction::Binary(BinaryOp::Add),
            b'-' => Instruction::Binary(BinaryOp::Sub),
            b'*' => Instruction::Binary(BinaryOp::Mul),
            b'/' => Instruction::Binary(BinaryOp::Div),
            b'%' => Instruction::Binary(BinaryOp::Rem),
            b'`' => Instruction::Binary(BinaryOp::Greater),
            b'!' => Instruction::Not,
            b'_' => Instruction::If(Axis::X),
            b'|' => Instruction::If(Axis::Y),
            b':' => Instruction::Duplicate,
            b'\\' => Instruction::Swap,
            b'$' => Instruction::Discard,
            b'.' => Instruction::OutputNumber,
            b',' => Instruction::OutputChar,
            b'#' => Instruction::Bridge,
            b'g' => Instruction::Get,
            b'p' => Instruction::Put,
            b'&' => Instruction::InputNumber,
            b'~' => Instruction::InputChar,
            b'@' => Instruction::Halt,
            _ => Instruction::Nop,
        }
    }
}

/// Sign a conditional turn takes along its axis: negative on non-zero.
#[must_use]
pub fn branch_sign(value: i64) -> i8 {
    if value != 0 { -1 } else { 1 }
}
