use std::{error, fmt, io};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArithmeticFault {
    DivisionByZero,
}

impl fmt::Display for ArithmeticFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticFault::DivisionByZero => write!(f, "division by zero"),
        }
    }
}

/// Everything that ends a run without reaching `@`.
#[derive(Debug)]
pub enum Fault {
    ProgramLoad(io::Error),
    InputRead(io::Error),
    NumericParse(String),
    GridBounds { x: i64, y: i64 },
    Arithmetic(ArithmeticFault),
    Output(io::Error),
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::ProgramLoad(err) => write!(f, "could not load program: {err}"),
            Fault::InputRead(err) => {
                write!(f, "could not read from standard input: {err}")
            }
            Fault::NumericParse(text) => write!(f, "bad int conversion: {text:?}"),
            Fault::GridBounds { x, y } => {
                write!(f, "cell ({x}, {y}) is outside the grid")
            }
            Fault::Arithmetic(fault) => write!(f, "arithmetic fault: {fault}"),
            Fault::Output(err) => write!(f, "could not write output: {err}"),
        }
    }
}

impl error::Error for Fault {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Fault::ProgramLoad(err) | Fault::InputRead(err) | Fault::Output(err) => {
                Some(err)
            }
            _ => None,
        }
    }
}

impl From<ArithmeticFault> for Fault {
    fn from(fault: ArithmeticFault) -> Self {
        Fault::Arithmetic(fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn io_faults_expose_their_source() {
        let fault = Fault::InputRead(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(fault.source().is_some());
        assert!(Fault::NumericParse("x".into()).source().is_none());
    }

    #[test]
    fn arithmetic_fault_converts() {
        let fault: Fault = ArithmeticFault::DivisionByZero.into();
        assert!(matches!(
            fault,
            Fault::Arithmetic(ArithmeticFault::DivisionByZero)
        ));
        assert_eq!(fault.to_string(), "arithmetic fault: division by zero");
    }
}
