//! Value kinds.
//!
//! A [`Kind`] is a set of bits describing which concrete kinds a value may
//! still take. Basic-type markers (`string`, `int`, ...) are lowered to a
//! single kind; `number` is the union of `int` and `float`, and top is the
//! union of everything.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// The set of kinds a value may have.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Kind: u16 {
        const NULL = 1 << 0;
        const BOOL = 1 << 1;
        const INT = 1 << 2;
        const FLOAT = 1 << 3;
        const STRING = 1 << 4;
        const BYTES = 1 << 5;
        const DURATION = 1 << 6;
        const LIST = 1 << 7;
        const STRUCT = 1 << 8;
        const LAMBDA = 1 << 9;

        /// Set on bounds whose operand is not yet known to be concrete.
        const NON_GROUND = 1 << 15;

        const NUMBER = Self::INT.bits() | Self::FLOAT.bits();
        const TOP = Self::NULL.bits()
            | Self::BOOL.bits()
            | Self::NUMBER.bits()
            | Self::STRING.bits()
            | Self::BYTES.bits()
            | Self::DURATION.bits()
            | Self::LIST.bits()
            | Self::STRUCT.bits()
            | Self::LAMBDA.bits();
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = *self - Kind::NON_GROUND;
        if kind == Kind::TOP {
            return f.write_str("_");
        }
        if kind == Kind::NUMBER {
            return f.write_str("number");
        }
        let names = [
            (Kind::NULL, "null"),
            (Kind::BOOL, "bool"),
            (Kind::INT, "int"),
            (Kind::FLOAT, "float"),
            (Kind::STRING, "string"),
            (Kind::BYTES, "bytes"),
            (Kind::DURATION, "duration"),
            (Kind::LIST, "list"),
            (Kind::STRUCT, "struct"),
            (Kind::LAMBDA, "lambda"),
        ];
        let mut first = true;
        for (bit, name) in names {
            if kind.contains(bit) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("_|_")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_basic_kinds() {
        assert_eq!(Kind::STRING.to_string(), "string");
        assert_eq!(Kind::NUMBER.to_string(), "number");
        assert_eq!((Kind::STRING | Kind::INT).to_string(), "int|string");
        assert_eq!((Kind::TOP | Kind::NON_GROUND).to_string(), "_");
        assert_eq!(Kind::empty().to_string(), "_|_");
    }
}
