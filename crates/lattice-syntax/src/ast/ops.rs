//! Operator tokens as they appear in the syntax tree.

use std::fmt;

/// An operator token of a unary or binary expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    // Lattice operators
    /// `&`
    And,
    /// `|`
    Or,

    // Logical operators
    /// `&&`
    LAnd,
    /// `||`
    LOr,
    /// `!`
    Not,

    // Comparison operators
    /// `==`
    Eql,
    /// `!=`
    Neq,
    /// `<`
    Lss,
    /// `<=`
    Leq,
    /// `>`
    Gtr,
    /// `>=`
    Geq,
    /// `=~`
    Mat,
    /// `!~`
    NMat,

    // Arithmetic operators
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`, also the default marker in disjunctions
    Mul,
    /// `/`
    Quo,
    /// `%`
    Rem,
    /// `div`
    IDiv,
    /// `mod`
    IMod,
    /// `quo`
    IQuo,
    /// `rem`
    IRem,
}

impl Token {
    /// The source text of the token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Token::And => "&",
            Token::Or => "|",
            Token::LAnd => "&&",
            Token::LOr => "||",
            Token::Not => "!",
            Token::Eql => "==",
            Token::Neq => "!=",
            Token::Lss => "<",
            Token::Leq => "<=",
            Token::Gtr => ">",
            Token::Geq => ">=",
            Token::Mat => "=~",
            Token::NMat => "!~",
            Token::Add => "+",
            Token::Sub => "-",
            Token::Mul => "*",
            Token::Quo => "/",
            Token::Rem => "%",
            Token::IDiv => "div",
            Token::IMod => "mod",
            Token::IQuo => "quo",
            Token::IRem => "rem",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
