//! Operators of the value graph.
//!
//! Syntax-level operator tokens are mapped onto [`Op`] while lowering. The
//! same enum serves unary nodes, binary nodes and bounds; which operators are
//! valid where is decided by the builder.

use std::fmt;

/// An operator in the value graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    // Lattice operators
    /// `&`
    Unify,
    /// `|`, only used when a disjunction is printed as an operator.
    Disjoin,

    // Logical operators
    /// `&&`
    And,
    /// `||`
    Or,
    /// `!`
    Not,

    // Comparison operators
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `=~`
    Match,
    /// `!~`
    NotMatch,

    // Arithmetic operators
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `div`
    IntDiv,
    /// `mod`
    IntMod,
    /// `quo`
    IntQuo,
    /// `rem`
    IntRem,
}

impl Op {
    /// Whether this operator can constrain a value as a bound (`>=1`, `=~"x"`).
    pub fn is_relational(&self) -> bool {
        use Op::*;
        matches!(
            self,
            NotEqual | Less | LessEqual | Greater | GreaterEqual | Match | NotMatch
        )
    }

    /// The source symbol of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Unify => "&",
            Op::Disjoin => "|",
            Op::And => "&&",
            Op::Or => "||",
            Op::Not => "!",
            Op::Equal => "==",
            Op::NotEqual => "!=",
            Op::Less => "<",
            Op::LessEqual => "<=",
            Op::Greater => ">",
            Op::GreaterEqual => ">=",
            Op::Match => "=~",
            Op::NotMatch => "!~",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Rem => "%",
            Op::IntDiv => "div",
            Op::IntMod => "mod",
            Op::IntQuo => "quo",
            Op::IntRem => "rem",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
