//! Decomposability tests.
//!
//! A function f is **top decomposable** on xᵥ if f = op(xᵥ, g) for some g that
//! does not depend on xᵥ. It is **bottom decomposable** on (xᵢ, xⱼ) if xᵢ and xⱼ
//! only appear in f through a single term op(xᵢ, xⱼ).
//!
//! ```text
//! op   | a b = 00 01 10 11
//! -----+------------------
//! And  |        0  0  0  1
//! Or   |        0  1  1  1
//! Xor  |        0  1  1  0
//! Lt   |        0  1  0  0     ¬a ∧ b
//! Le   |        1  1  0  1     ¬a ∨ b
//! ```

use std::fmt;

use log::trace;

use crate::network::Network;
use crate::truth_table::TruthTable;

/// The binary operators a decomposition can factor out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Conjunction: a ∧ b
    And,
    /// Disjunction: a ∨ b
    Or,
    /// Exclusive-or: a ⊕ b
    Xor,
    /// Less-than: ¬a ∧ b
    Lt,
    /// Less-or-equal: ¬a ∨ b
    Le,
}

impl Operator {
    /// Apply the operator to two Boolean values.
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            Operator::And => a && b,
            Operator::Or => a || b,
            Operator::Xor => a ^ b,
            Operator::Lt => !a && b,
            Operator::Le => !a || b,
        }
    }

    /// Create the corresponding node in `ntk`.
    pub fn build<N: Network>(self, ntk: &mut N, a: N::Signal, b: N::Signal) -> N::Signal {
        match self {
            Operator::And => ntk.create_and(a, b),
            Operator::Or => ntk.create_or(a, b),
            Operator::Xor => ntk.create_xor(a, b),
            Operator::Lt => ntk.create_lt(a, b),
            Operator::Le => ntk.create_le(a, b),
        }
    }

    /// Get the symbol for this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::And => "∧",
            Operator::Or => "∨",
            Operator::Xor => "⊕",
            Operator::Lt => "<",
            Operator::Le => "≤",
        }
    }

    /// All operators.
    pub fn all() -> [Operator; 5] {
        [Operator::And, Operator::Or, Operator::Xor, Operator::Lt, Operator::Le]
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Result of a successful decomposability test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    /// The factored operator.
    pub op: Operator,
    /// What is left to decompose.
    ///
    /// For a top decomposition on xᵥ this is g, independent of xᵥ.
    /// For a bottom decomposition on (xᵢ, xⱼ) this is f with xᵢ standing for
    /// op(xᵢ, xⱼ); it no longer depends on xⱼ.
    pub residual: TruthTable,
}

/// Decomposability tests consumed by the [`Decomposer`][crate::decompose::Decomposer].
///
/// Both tests must be pure: the same input always gives the same answer.
/// `None` means no operator applies.
pub trait DecompositionOracle {
    fn top_decomposition(&self, f: &TruthTable, var: u32, with_xor: bool) -> Option<Decomposition>;

    fn bottom_decomposition(&self, f: &TruthTable, i: u32, j: u32, with_xor: bool) -> Option<Decomposition>;
}

/// Decomposability tests computed directly on truth tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct TruthTableOracle;

impl DecompositionOracle for TruthTableOracle {
    fn top_decomposition(&self, f: &TruthTable, var: u32, with_xor: bool) -> Option<Decomposition> {
        let x = TruthTable::nth_var(f.num_vars(), var);
        let not_x = x.complement();

        let (op, residual) = if f.implies(&x) {
            (Operator::And, f.cofactor(var, true))
        } else if x.implies(f) {
            (Operator::Or, f.cofactor(var, false))
        } else if f.implies(&not_x) {
            (Operator::Lt, f.cofactor(var, false))
        } else if not_x.implies(f) {
            (Operator::Le, f.cofactor(var, true))
        } else if with_xor {
            let f0 = f.cofactor(var, false);
            let f1 = f.cofactor(var, true);
            if f0 != f1.complement() {
                return None;
            }
            (Operator::Xor, f0)
        } else {
            return None;
        };

        trace!("top_decomposition(x{}) = {:?}", var, op);
        Some(Decomposition { op, residual })
    }

    fn bottom_decomposition(&self, f: &TruthTable, i: u32, j: u32, with_xor: bool) -> Option<Decomposition> {
        assert_ne!(i, j, "Bottom decomposition needs two distinct variables");

        let f0 = f.cofactor(i, false);
        let f1 = f.cofactor(i, true);
        let f00 = f0.cofactor(j, false);
        let f01 = f0.cofactor(j, true);
        let f10 = f1.cofactor(j, false);
        let f11 = f1.cofactor(j, true);

        // `on` is the cofactor selected when op(xᵢ, xⱼ) = 1, `off` when it is 0.
        let (op, on, off) = if f00 == f01 && f01 == f10 && f10 != f11 {
            (Operator::And, f11, f00)
        } else if f01 == f10 && f10 == f11 && f00 != f01 {
            (Operator::Or, f11, f00)
        } else if f00 == f10 && f10 == f11 && f01 != f00 {
            (Operator::Lt, f01, f00)
        } else if f00 == f01 && f01 == f11 && f10 != f00 {
            (Operator::Le, f00, f10)
        } else if with_xor && f00 == f11 && f01 == f10 && f00 != f01 {
            (Operator::Xor, f01, f00)
        } else {
            return None;
        };

        trace!("bottom_decomposition(x{}, x{}) = {:?}", i, j, op);
        Some(Decomposition {
            op,
            residual: TruthTable::mux_var(i, &on, &off),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::truth_table::named;

    use test_log::test;

    /// Check `f = op(xᵥ, g)` pointwise.
    fn check_top(f: &TruthTable, var: u32, d: &Decomposition) {
        assert!(!d.residual.has_var(var));
        for i in 0..f.size() {
            let x = (i >> var) & 1 == 1;
            assert_eq!(f.eval_index(i), d.op.apply(x, d.residual.eval_index(i)));
        }
    }

    /// Check that substituting op(xᵢ, xⱼ) for xᵢ in the residual gives back `f`.
    fn check_bottom(f: &TruthTable, i: u32, j: u32, d: &Decomposition) {
        assert!(!d.residual.has_var(j));
        for index in 0..f.size() {
            let a = (index >> i) & 1 == 1;
            let b = (index >> j) & 1 == 1;
            let y = d.op.apply(a, b);
            let substituted = if y { index | (1 << i) } else { index & !(1 << i) };
            assert_eq!(f.eval_index(index), d.residual.eval_index(substituted));
        }
    }

    #[test]
    fn test_operator_truth_tables() {
        let table: Vec<[bool; 4]> = Operator::all()
            .iter()
            .map(|op| [op.apply(false, false), op.apply(false, true), op.apply(true, false), op.apply(true, true)])
            .collect();
        assert_eq!(table[0], [false, false, false, true]);
        assert_eq!(table[1], [false, true, true, true]);
        assert_eq!(table[2], [false, true, true, false]);
        assert_eq!(table[3], [false, true, false, false]);
        assert_eq!(table[4], [true, true, false, true]);
    }

    #[test]
    fn test_top_each_operator() {
        let oracle = TruthTableOracle;
        let cases = [
            (TruthTable::from_expr(3, |x| x[0] && (x[1] ^ x[2])), Operator::And),
            (TruthTable::from_expr(3, |x| x[0] || (x[1] && x[2])), Operator::Or),
            (TruthTable::from_expr(3, |x| !x[0] && (x[1] || x[2])), Operator::Lt),
            (TruthTable::from_expr(3, |x| !x[0] || (x[1] && x[2])), Operator::Le),
        ];
        for (f, expected) in cases {
            let d = oracle.top_decomposition(&f, 0, false).unwrap();
            assert_eq!(d.op, expected, "f = {}", f);
            check_top(&f, 0, &d);
        }
    }

    #[test]
    fn test_top_xor_requires_flag() {
        let oracle = TruthTableOracle;
        let f = TruthTable::from_expr(3, |x| x[0] ^ (x[1] && x[2]));
        assert_eq!(oracle.top_decomposition(&f, 0, false), None);
        let d = oracle.top_decomposition(&f, 0, true).unwrap();
        assert_eq!(d.op, Operator::Xor);
        check_top(&f, 0, &d);
    }

    #[test]
    fn test_top_fails_on_majority() {
        let oracle = TruthTableOracle;
        let maj = named::majority3();
        for v in 0..3 {
            assert_eq!(oracle.top_decomposition(&maj, v, true), None);
        }
    }

    #[test]
    fn test_bottom_each_operator() {
        let oracle = TruthTableOracle;
        // MUX with the select driven by op(x1, x2), data inputs x0 and x3.
        for op in Operator::all() {
            let f = TruthTable::from_expr(4, |x| if op.apply(x[1], x[2]) { x[0] } else { x[3] });
            let d = oracle.bottom_decomposition(&f, 1, 2, true).unwrap();
            check_bottom(&f, 1, 2, &d);
            assert_eq!(d.residual.support(), vec![0, 1, 3]);
        }
    }

    #[test]
    fn test_bottom_xor_requires_flag() {
        let oracle = TruthTableOracle;
        let f = TruthTable::from_expr(3, |x| if x[0] ^ x[1] { x[2] } else { !x[2] });
        assert_eq!(oracle.bottom_decomposition(&f, 0, 1, false), None);
        let d = oracle.bottom_decomposition(&f, 0, 1, true).unwrap();
        assert_eq!(d.op, Operator::Xor);
        check_bottom(&f, 0, 1, &d);
    }

    #[test]
    fn test_bottom_rejects_interacting_pair() {
        let oracle = TruthTableOracle;
        // In MUX(s, x, y) the select interacts with both data inputs.
        let mux = named::mux();
        assert_eq!(oracle.bottom_decomposition(&mux, 0, 1, true), None);
        assert_eq!(oracle.bottom_decomposition(&mux, 0, 2, true), None);
    }

    #[test]
    fn test_oracle_is_deterministic() {
        let oracle = TruthTableOracle;
        let f = TruthTable::from_expr(4, |x| (x[0] && x[1]) || (x[2] ^ x[3]));
        for v in 0..4 {
            assert_eq!(oracle.top_decomposition(&f, v, true), oracle.top_decomposition(&f, v, true));
        }
        assert_eq!(
            oracle.bottom_decomposition(&f, 0, 1, true),
            oracle.bottom_decomposition(&f, 0, 1, true)
        );
    }
}
