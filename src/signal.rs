//! Complemented edges of an XOR-AND graph.

use std::fmt::{self, Debug, Display, Formatter};
use std::ops::Not;

/// What a [`Signal`] points to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Node {
    Constant,
    Input(u32),
    Gate(u32),
}

/// A possibly complemented edge into an [`Xag`][crate::network::Xag] node.
///
/// Bit 0 is the complement flag. The remaining bits are zero for the constant,
/// `gate + 1` for gates, and the bit-inverted input number for primary inputs,
/// which therefore always have the top bit set.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Signal(u32);

const INPUT_FLAG: u32 = 1 << 31;

impl Signal {
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn one() -> Self {
        Self(1)
    }

    pub const fn from_input(input: u32) -> Self {
        assert!(input < INPUT_FLAG >> 1, "Input number out of range");
        Self(!input << 1)
    }

    pub const fn from_gate(gate: u32) -> Self {
        assert!(gate < INPUT_FLAG >> 1, "Gate number out of range");
        Self((gate + 1) << 1)
    }

    pub(crate) const fn raw(self) -> u32 {
        self.0
    }

    pub const fn node(self) -> Node {
        let index = self.0 >> 1;
        if index == 0 {
            Node::Constant
        } else if self.0 & INPUT_FLAG != 0 {
            Node::Input(!index & !INPUT_FLAG)
        } else {
            Node::Gate(index - 1)
        }
    }

    /// True for the complemented edges, including constant one.
    pub const fn is_negated(self) -> bool {
        self.0 & 1 != 0
    }

    pub const fn regular(self) -> Self {
        Self(self.0 & !1)
    }

    pub const fn complement_if(self, cond: bool) -> Self {
        Self(self.0 ^ cond as u32)
    }
}

impl From<bool> for Signal {
    fn from(value: bool) -> Self {
        Signal::zero().complement_if(value)
    }
}

impl Not for Signal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.complement_if(true)
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negated() { "!" } else { "" };
        match self.node() {
            Node::Constant => write!(f, "{}", self.0 & 1),
            Node::Input(i) => write!(f, "{}i{}", sign, i),
            Node::Gate(g) => write!(f, "{}g{}", sign, g),
        }
    }
}

impl Debug for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_constants() {
        let zero = Signal::zero();
        let one = Signal::one();
        assert_eq!(zero.node(), Node::Constant);
        assert_eq!(one.node(), Node::Constant);
        assert_eq!(!zero, one);
        assert!(one.is_negated());
        assert_eq!(one.regular(), zero);
        assert_eq!(Signal::from(true), one);
        assert_eq!(Signal::from(false), zero);
        assert_eq!(format!("{} {}", zero, one), "0 1");
    }

    #[test]
    fn test_inputs() {
        for i in [0, 1, 7, 1000] {
            let s = Signal::from_input(i);
            assert_eq!(s.node(), Node::Input(i));
            assert_eq!((!s).node(), Node::Input(i));
            assert!(!s.is_negated());
            assert!((!s).is_negated());
        }
        assert_eq!(format!("{}", !Signal::from_input(2)), "!i2");
    }

    #[test]
    fn test_gates() {
        let g = Signal::from_gate(3);
        assert_eq!(g.node(), Node::Gate(3));
        assert_eq!(g.complement_if(false), g);
        assert_eq!(g.complement_if(true), !g);
        assert_eq!((!g).regular(), g);
        assert_eq!(format!("{} {}", g, !g), "g3 !g3");
        assert_ne!(Signal::from_gate(0), Signal::from_input(0));
    }
}
