//! Operation module - the arithmetic operations the service exposes

use std::fmt;

/// An arithmetic operation the service can evaluate
///
/// The full set lives in [`Operation::ALL`], which the HTTP layer iterates
/// once at router construction to register one route per operation. Adding a
/// variant here is the whole story: the compiler forces every match below to
/// handle it, and the route table picks it up automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Addition (`num1 + num2`)
    Add,
    /// Subtraction (`num1 - num2`)
    Subtract,
    /// Multiplication (`num1 * num2`)
    Multiply,
    /// Division (`num1 / num2`), rejects a zero divisor
    Divide,
    /// Exponentiation (`num1 ^ num2`)
    Power,
    /// Floating-point remainder (`num1 % num2`), rejects a zero divisor
    Modulo,
    /// Square root of `num1`, rejects a negative operand
    Sqrt,
}

impl Operation {
    /// Every operation, in route-registration order
    pub const ALL: [Operation; 7] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::Power,
        Operation::Modulo,
        Operation::Sqrt,
    ];

    /// Route-facing name of the operation (e.g. `"add"`)
    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Power => "power",
            Operation::Modulo => "modulo",
            Operation::Sqrt => "sqrt",
        }
    }

    /// Display symbol used in log lines (e.g. `"+"`)
    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
            Operation::Power => "^",
            Operation::Modulo => "%",
            Operation::Sqrt => "sqrt",
        }
    }

    /// Whether the operation takes a single operand
    pub fn is_unary(self) -> bool {
        matches!(self, Operation::Sqrt)
    }

    /// Evaluate the operation with standard IEEE-754 semantics
    ///
    /// Unary operations read only `num1`. Domain-rule violations (zero
    /// divisor, negative square root) are returned as [`OperationError`]
    /// rather than producing non-finite results.
    ///
    /// # Examples
    ///
    /// ```
    /// use abacus_domain::Operation;
    ///
    /// assert_eq!(Operation::Power.apply(2.0, 10.0).unwrap(), 1024.0);
    /// assert!(Operation::Divide.apply(5.0, 0.0).is_err());
    /// ```
    pub fn apply(self, num1: f64, num2: f64) -> Result<f64, OperationError> {
        match self {
            Operation::Add => Ok(num1 + num2),
            Operation::Subtract => Ok(num1 - num2),
            Operation::Multiply => Ok(num1 * num2),
            Operation::Divide => {
                if num2 == 0.0 {
                    Err(OperationError::DivisionByZero)
                } else {
                    Ok(num1 / num2)
                }
            }
            Operation::Power => Ok(num1.powf(num2)),
            Operation::Modulo => {
                if num2 == 0.0 {
                    Err(OperationError::ModuloByZero)
                } else {
                    Ok(num1 % num2)
                }
            }
            Operation::Sqrt => {
                if num1 < 0.0 {
                    Err(OperationError::NegativeSquareRoot)
                } else {
                    Ok(num1.sqrt())
                }
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Domain-rule violation raised during evaluation
///
/// The `Display` text is the user-facing message returned by the HTTP layer,
/// so the wording here is part of the service contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationError {
    /// Division with a zero divisor
    DivisionByZero,
    /// Modulo with a zero divisor
    ModuloByZero,
    /// Square root of a negative operand
    NegativeSquareRoot,
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationError::DivisionByZero => write!(f, "Cannot divide by zero."),
            OperationError::ModuloByZero => {
                write!(f, "Cannot divide by zero in modulo operation.")
            }
            OperationError::NegativeSquareRoot => {
                write!(f, "Cannot take square root of a negative number.")
            }
        }
    }
}

impl std::error::Error for OperationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(Operation::Add.apply(2.0, 3.0).unwrap(), 5.0);
        assert_eq!(Operation::Subtract.apply(2.0, 3.0).unwrap(), -1.0);
        assert_eq!(Operation::Multiply.apply(4.0, 2.5).unwrap(), 10.0);
        assert_eq!(Operation::Divide.apply(9.0, 3.0).unwrap(), 3.0);
        assert_eq!(Operation::Power.apply(2.0, 10.0).unwrap(), 1024.0);
        assert_eq!(Operation::Modulo.apply(7.0, 4.0).unwrap(), 3.0);
        assert_eq!(Operation::Sqrt.apply(4.0, 0.0).unwrap(), 2.0);
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(
            Operation::Divide.apply(5.0, 0.0),
            Err(OperationError::DivisionByZero)
        );
        // Negative zero compares equal to zero in IEEE-754
        assert_eq!(
            Operation::Divide.apply(5.0, -0.0),
            Err(OperationError::DivisionByZero)
        );
    }

    #[test]
    fn test_modulo_by_zero() {
        assert_eq!(
            Operation::Modulo.apply(7.0, 0.0),
            Err(OperationError::ModuloByZero)
        );
    }

    #[test]
    fn test_negative_square_root() {
        assert_eq!(
            Operation::Sqrt.apply(-1.0, 0.0),
            Err(OperationError::NegativeSquareRoot)
        );
        assert_eq!(Operation::Sqrt.apply(0.0, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_modulo_follows_ieee_remainder() {
        // Rust's % on floats keeps the sign of the dividend
        assert_eq!(Operation::Modulo.apply(-7.0, 4.0).unwrap(), -3.0);
        assert_eq!(Operation::Modulo.apply(7.5, 2.0).unwrap(), 1.5);
    }

    #[test]
    fn test_error_messages_are_contractual() {
        assert_eq!(
            OperationError::DivisionByZero.to_string(),
            "Cannot divide by zero."
        );
        assert_eq!(
            OperationError::ModuloByZero.to_string(),
            "Cannot divide by zero in modulo operation."
        );
        assert_eq!(
            OperationError::NegativeSquareRoot.to_string(),
            "Cannot take square root of a negative number."
        );
    }

    #[test]
    fn test_all_table_is_complete() {
        assert_eq!(Operation::ALL.len(), 7);
        // Names are unique, so the route table cannot collide
        let mut names: Vec<_> = Operation::ALL.iter().map(|op| op.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 7);
    }

    #[test]
    fn test_unary_flag() {
        for op in Operation::ALL {
            assert_eq!(op.is_unary(), op == Operation::Sqrt);
        }
    }
}
