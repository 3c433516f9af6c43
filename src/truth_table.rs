//! Truth table representation for Boolean functions.
//!
//! A Boolean function f: {0,1}ⁿ → {0,1} is represented by its truth table,
//! a vector of 2ⁿ bits indexed by input assignments.

use std::fmt;
use std::ops::Not;

use bitvec::prelude::*;

/// A truth table for a Boolean function on n variables.
///
/// The truth table stores 2ⁿ bits where bit i corresponds to the function
/// value at input assignment i (interpreted as an n-bit binary number).
///
/// # Variable Ordering
///
/// Variables are numbered 0 to n-1. For input index i, variable xⱼ has value
/// (i >> j) & 1. This means x₀ is the least significant bit.
///
/// # Example
///
/// For n=2:
/// - Index 0 (binary 00): x₀=0, x₁=0
/// - Index 1 (binary 01): x₀=1, x₁=0
/// - Index 2 (binary 10): x₀=0, x₁=1
/// - Index 3 (binary 11): x₀=1, x₁=1
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TruthTable {
    /// Number of variables.
    n: u32,
    /// The truth table bits: 2ⁿ bits.
    bits: BitVec<u64, Lsb0>,
}

impl TruthTable {
    /// Create a truth table from an expression function.
    ///
    /// The function receives a slice of n Booleans [x₀, x₁, ..., xₙ₋₁].
    ///
    /// # Example
    ///
    /// ```
    /// use dsd_rs::truth_table::TruthTable;
    ///
    /// // f = x₀ ∧ x₁
    /// let f = TruthTable::from_expr(2, |x| x[0] && x[1]);
    /// assert!(f.eval(&[true, true]));
    /// assert!(!f.eval(&[true, false]));
    /// ```
    pub fn from_expr(n: u32, f: impl Fn(&[bool]) -> bool) -> Self {
        let size = 1usize << n;
        let mut bits = BitVec::with_capacity(size);
        let mut assignment = vec![false; n as usize];

        for i in 0..size {
            for (j, val) in assignment.iter_mut().enumerate() {
                *val = (i >> j) & 1 == 1;
            }
            bits.push(f(&assignment));
        }

        TruthTable { n, bits }
    }

    /// Create a truth table from raw bits.
    ///
    /// # Panics
    ///
    /// Panics if `bits.len() != 2^n`.
    pub fn from_bits(n: u32, bits: BitVec<u64, Lsb0>) -> Self {
        let expected = 1usize << n;
        assert_eq!(
            bits.len(),
            expected,
            "Expected {} bits for {} variables, got {}",
            expected,
            n,
            bits.len()
        );
        TruthTable { n, bits }
    }

    /// Create a truth table on at most 6 variables from the low 2ⁿ bits of a word.
    pub fn from_word(n: u32, word: u64) -> Self {
        assert!(n <= 6, "A single word holds at most 6 variables, got {}", n);
        let bits = (0..1usize << n).map(|i| (word >> i) & 1 == 1).collect();
        TruthTable { n, bits }
    }

    /// Parse a binary string, most significant bit (highest assignment) first.
    ///
    /// Returns `None` if the string is not made of `0`/`1` or its length is not a power of two.
    ///
    /// ```
    /// use dsd_rs::truth_table::TruthTable;
    ///
    /// let f = TruthTable::from_binary("1000").unwrap();
    /// assert_eq!(f, TruthTable::from_expr(2, |x| x[0] && x[1]));
    /// ```
    pub fn from_binary(s: &str) -> Option<Self> {
        let len = s.len();
        if len == 0 || !len.is_power_of_two() {
            return None;
        }
        let n = len.trailing_zeros();
        let mut bits = BitVec::with_capacity(len);
        for c in s.chars().rev() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                _ => return None,
            }
        }
        Some(TruthTable { n, bits })
    }

    /// Create the constant zero function.
    pub fn zero(n: u32) -> Self {
        let size = 1usize << n;
        TruthTable {
            n,
            bits: bitvec![u64, Lsb0; 0; size],
        }
    }

    /// Create the constant one function.
    pub fn one(n: u32) -> Self {
        let size = 1usize << n;
        TruthTable {
            n,
            bits: bitvec![u64, Lsb0; 1; size],
        }
    }

    /// Create the projection function for variable xᵢ.
    pub fn nth_var(n: u32, var: u32) -> Self {
        assert!(var < n, "Variable x{} out of range for {}-variable function", var, n);
        let bits = (0..1usize << n).map(|i| (i >> var) & 1 == 1).collect();
        TruthTable { n, bits }
    }

    /// Build `(xᵥ ∧ then) ∨ (¬xᵥ ∧ otherwise)`.
    pub fn mux_var(var: u32, then: &TruthTable, otherwise: &TruthTable) -> Self {
        assert_eq!(then.n, otherwise.n, "Variable count mismatch");
        assert!(var < then.n, "Variable x{} out of range", var);
        let bits = (0..then.size())
            .map(|i| {
                if (i >> var) & 1 == 1 {
                    then.bits[i]
                } else {
                    otherwise.bits[i]
                }
            })
            .collect();
        TruthTable { n: then.n, bits }
    }

    /// Get the number of variables.
    pub fn num_vars(&self) -> u32 {
        self.n
    }

    /// Get the size of the truth table (2ⁿ).
    pub fn size(&self) -> usize {
        self.bits.len()
    }

    /// Evaluate the function at a given input [x₀, x₁, ..., xₙ₋₁].
    pub fn eval(&self, input: &[bool]) -> bool {
        assert_eq!(input.len(), self.n as usize, "Expected {} inputs, got {}", self.n, input.len());
        let index = input.iter().enumerate().fold(0usize, |acc, (i, &b)| acc | ((b as usize) << i));
        self.bits[index]
    }

    /// Evaluate the function at a given index.
    pub fn eval_index(&self, index: usize) -> bool {
        assert!(index < self.bits.len(), "Index out of range");
        self.bits[index]
    }

    /// Check if this is the constant zero function.
    pub fn is_zero(&self) -> bool {
        !self.bits.any()
    }

    /// Check if this is the constant one function.
    pub fn is_one(&self) -> bool {
        self.bits.all()
    }

    /// Check if this is a constant function.
    pub fn is_constant(&self) -> bool {
        self.is_zero() || self.is_one()
    }

    /// Count the number of satisfying assignments.
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Compute the complement (negation) of this function.
    pub fn complement(&self) -> Self {
        TruthTable {
            n: self.n,
            bits: !self.bits.clone(),
        }
    }

    fn zip_with(&self, other: &Self, op: impl Fn(bool, bool) -> bool) -> Self {
        assert_eq!(self.n, other.n, "Variable count mismatch");
        let bits = self
            .bits
            .iter()
            .by_vals()
            .zip(other.bits.iter().by_vals())
            .map(|(a, b)| op(a, b))
            .collect();
        TruthTable { n: self.n, bits }
    }

    /// Compute the conjunction (AND) of two functions.
    pub fn and(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a && b)
    }

    /// Compute the disjunction (OR) of two functions.
    pub fn or(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a || b)
    }

    /// Compute the exclusive-or (XOR) of two functions.
    pub fn xor(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a ^ b)
    }

    /// Check whether `self → other` holds for every assignment.
    pub fn implies(&self, other: &Self) -> bool {
        assert_eq!(self.n, other.n, "Variable count mismatch");
        self.bits
            .iter()
            .by_vals()
            .zip(other.bits.iter().by_vals())
            .all(|(a, b)| !a || b)
    }

    /// Compute the Shannon cofactor f|_{xᵥ=b}.
    ///
    /// The arity is preserved: the result is a function on the same n variables
    /// that simply no longer depends on xᵥ.
    pub fn cofactor(&self, var: u32, value: bool) -> Self {
        assert!(var < self.n, "Variable x{} out of range", var);
        let step = 1usize << var;
        let bits = (0..self.size())
            .map(|i| {
                let j = if value { i | step } else { i & !step };
                self.bits[j]
            })
            .collect();
        TruthTable { n: self.n, bits }
    }

    /// Check if variable xᵥ is essential (influential) for this function.
    pub fn has_var(&self, var: u32) -> bool {
        assert!(var < self.n, "Variable x{} out of range", var);
        let step = 1usize << var;
        (0..self.size()).filter(|i| i & step == 0).any(|i| self.bits[i] != self.bits[i | step])
    }

    /// All essential variables in increasing order.
    pub fn support(&self) -> Vec<u32> {
        (0..self.n).filter(|&v| self.has_var(v)).collect()
    }

    /// Project the function onto the variables `vars`.
    ///
    /// Variable j of the result stands for variable `vars[j]` of `self`.
    /// Variables outside `vars` are fixed to 0, so the result is only
    /// meaningful when `self` does not depend on them.
    pub fn shrink_to(&self, vars: &[u32]) -> Self {
        assert!(vars.iter().all(|&v| v < self.n), "Variable out of range in {:?}", vars);
        let k = vars.len() as u32;
        let bits = (0..1usize << k)
            .map(|y| {
                let x = vars
                    .iter()
                    .enumerate()
                    .fold(0usize, |acc, (j, &v)| acc | (((y >> j) & 1) << v));
                self.bits[x]
            })
            .collect();
        TruthTable { n: k, bits }
    }

    /// Pack the truth table of a function on at most 6 variables into a word.
    pub fn as_word(&self) -> u64 {
        assert!(self.n <= 6, "A single word holds at most 6 variables, got {}", self.n);
        self.bits
            .iter()
            .by_vals()
            .enumerate()
            .fold(0u64, |acc, (i, b)| acc | ((b as u64) << i))
    }
}

impl Not for TruthTable {
    type Output = TruthTable;

    fn not(self) -> Self::Output {
        TruthTable {
            n: self.n,
            bits: !self.bits,
        }
    }
}

impl Not for &TruthTable {
    type Output = TruthTable;

    fn not(self) -> Self::Output {
        self.complement()
    }
}

impl fmt::Debug for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TruthTable({}, {})", self.n, self)
    }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Highest assignment first, as in the usual hexadecimal/binary notation.
        for bit in self.bits.iter().by_vals().rev() {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Named Boolean functions for testing and examples.
pub mod named {
    use super::*;

    /// AND of all variables: x₀ ∧ x₁ ∧ ... ∧ xₙ₋₁
    pub fn and_all(n: u32) -> TruthTable {
        TruthTable::from_expr(n, |x| x.iter().all(|&b| b))
    }

    /// OR of all variables: x₀ ∨ x₁ ∨ ... ∨ xₙ₋₁
    pub fn or_all(n: u32) -> TruthTable {
        TruthTable::from_expr(n, |x| x.iter().any(|&b| b))
    }

    /// XOR (parity) of all variables: x₀ ⊕ x₁ ⊕ ... ⊕ xₙ₋₁
    pub fn xor_all(n: u32) -> TruthTable {
        TruthTable::from_expr(n, |x| x.iter().filter(|&&b| b).count() % 2 == 1)
    }

    /// Majority function on 3 variables.
    pub fn majority3() -> TruthTable {
        TruthTable::from_expr(3, |x| x.iter().filter(|&&b| b).count() >= 2)
    }

    /// Multiplexer: MUX(s, x, y) = (¬s ∧ x) ∨ (s ∧ y)
    /// Variables: s=x₀, x=x₁, y=x₂
    pub fn mux() -> TruthTable {
        TruthTable::from_expr(3, |v| if v[0] { v[2] } else { v[1] })
    }
}
