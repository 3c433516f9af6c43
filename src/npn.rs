//! Canonical-class (NPN) synthesis for small prime functions.
//!
//! Two functions are NPN-equivalent if one can be turned into the other by
//! permuting inputs, negating inputs, and negating the output. Functions on up
//! to [`MAX_LIBRARY_VARS`] variables are mapped to the representative of their
//! class, synthesized from a library entry for that representative, and the
//! transformation is undone on the way back.
//!
//! Functions are handled as single words here: bit `i` of the word is the value
//! at assignment `i`, exactly as in [`TruthTable::as_word`][crate::truth_table::TruthTable::as_word].

use std::collections::HashMap;

use log::debug;

use crate::error::DecompositionError;
use crate::network::Network;

/// Largest arity covered by the [`NpnLibrary`].
pub const MAX_LIBRARY_VARS: usize = 4;

const VAR_MASKS: [u64; 6] = [
    0xAAAA_AAAA_AAAA_AAAA,
    0xCCCC_CCCC_CCCC_CCCC,
    0xF0F0_F0F0_F0F0_F0F0,
    0xFF00_FF00_FF00_FF00,
    0xFFFF_0000_FFFF_0000,
    0xFFFF_FFFF_0000_0000,
];

/// Mask of the `2^k` meaningful bits of a `k`-variable word.
pub fn length_mask(k: usize) -> u64 {
    assert!(k <= 6, "A single word holds at most 6 variables, got {}", k);
    if k == 6 {
        u64::MAX
    } else {
        (1u64 << (1u64 << k)) - 1
    }
}

fn cofactor0(t: u64, v: usize) -> u64 {
    let low = t & !VAR_MASKS[v];
    low | (low << (1 << v))
}

fn cofactor1(t: u64, v: usize) -> u64 {
    let high = t & VAR_MASKS[v];
    high | (high >> (1 << v))
}

fn has_var(t: u64, v: usize) -> bool {
    cofactor0(t, v) != cofactor1(t, v)
}

/// Negate input `v`: r(x) = t(x ⊕ eᵥ).
fn flip(t: u64, v: usize, full: u64) -> u64 {
    let s = 1 << v;
    let m = VAR_MASKS[v];
    (((t & m) >> s) | (t << s) & m) & full
}

/// Rearrange `perm` into the next permutation in lexicographic order.
fn next_permutation(perm: &mut [usize]) -> bool {
    let Some(i) = (1..perm.len()).rev().find(|&i| perm[i - 1] < perm[i]) else {
        return false;
    };
    let pivot = i - 1;
    let j = (i..perm.len()).rev().find(|&j| perm[j] > perm[pivot]).unwrap_or(i);
    perm.swap(pivot, j);
    perm[i..].reverse();
    true
}

/// Maps a function to its class representative.
///
/// With `perm`, `input_negations` and `output_negation` as stored here, the
/// canonized function satisfies
///
/// ```text
/// f(x) = output_negation ⊕ r(y),    yⱼ = x_perm[j] ⊕ input_negations[j]
/// ```
///
/// where r is the representative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpnTransform {
    pub perm: Vec<usize>,
    /// Bit j set means yⱼ is a negated input.
    pub input_negations: u32,
    pub output_negation: bool,
}

impl NpnTransform {
    pub fn identity(k: usize) -> Self {
        Self {
            perm: (0..k).collect(),
            input_negations: 0,
            output_negation: false,
        }
    }

    pub fn is_input_negated(&self, j: usize) -> bool {
        (self.input_negations >> j) & 1 == 1
    }

    /// Compute r from f (the word of a `k`-variable function).
    pub fn apply(&self, word: u64, k: usize) -> u64 {
        let full = length_mask(k);
        let mut result = 0u64;
        for y in 0..1usize << k {
            let x = (0..k).fold(0usize, |acc, j| {
                let bit = ((y >> j) & 1) ^ ((self.input_negations as usize >> j) & 1);
                acc | (bit << self.perm[j])
            });
            let value = ((word >> x) & 1 == 1) ^ self.output_negation;
            if value {
                result |= 1 << y;
            }
        }
        result & full
    }
}

/// Permute the inputs: g(y) = f(x) with x_perm[j] = yⱼ.
fn permute(word: u64, k: usize, perm: &[usize]) -> u64 {
    let mut result = 0u64;
    for y in 0..1usize << k {
        let x = (0..k).fold(0usize, |acc, j| acc | (((y >> j) & 1) << perm[j]));
        if (word >> x) & 1 == 1 {
            result |= 1 << y;
        }
    }
    result
}

/// Exact NPN canonization by exhaustive enumeration.
///
/// The representative is the numerically smallest word over all `k!·2ᵏ·2`
/// transformations; the first transformation reaching it is returned.
/// Intended for `k ≤ MAX_LIBRARY_VARS`, works up to 6 variables.
pub fn exact_npn_canonization(word: u64, k: usize) -> (u64, NpnTransform) {
    let full = length_mask(k);
    let word = word & full;

    let mut best = word;
    let mut best_transform = NpnTransform::identity(k);

    let mut perm: Vec<usize> = (0..k).collect();
    loop {
        let mut t = permute(word, k, &perm);
        let mut negations = 0u32;
        for g in 0..1u32 << k {
            if g > 0 {
                let v = g.trailing_zeros() as usize;
                t = flip(t, v, full);
                negations ^= 1 << v;
            }
            for (candidate, output_negation) in [(t, false), (!t & full, true)] {
                if candidate < best {
                    best = candidate;
                    best_transform = NpnTransform {
                        perm: perm.clone(),
                        input_negations: negations,
                        output_negation,
                    };
                }
            }
        }
        if !next_permutation(&mut perm) {
            break;
        }
    }

    (best, best_transform)
}

/// A product term: variables in `mask`, positive literals in `polarity`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cube {
    pub mask: u32,
    pub polarity: u32,
}

impl Cube {
    pub fn num_literals(&self) -> u32 {
        self.mask.count_ones()
    }
}

fn isop_rec(lower: u64, upper: u64, k: usize, full: u64, cubes: &mut Vec<Cube>) -> u64 {
    if lower == 0 {
        return 0;
    }
    if upper == full {
        cubes.push(Cube { mask: 0, polarity: 0 });
        return full;
    }

    // Both bounds are non-constant somewhere, so some variable is essential.
    let Some(v) = (0..k).rev().find(|&v| has_var(lower, v) || has_var(upper, v)) else {
        return lower;
    };

    let (l0, l1) = (cofactor0(lower, v), cofactor1(lower, v));
    let (u0, u1) = (cofactor0(upper, v), cofactor1(upper, v));

    let start0 = cubes.len();
    let f0 = isop_rec(l0 & !u1 & full, u0, k, full, cubes);
    for cube in &mut cubes[start0..] {
        cube.mask |= 1 << v;
    }

    let start1 = cubes.len();
    let f1 = isop_rec(l1 & !u0 & full, u1, k, full, cubes);
    for cube in &mut cubes[start1..] {
        cube.mask |= 1 << v;
        cube.polarity |= 1 << v;
    }

    let rest = ((l0 & !f0) | (l1 & !f1)) & full;
    let f2 = isop_rec(rest, u0 & u1, k, full, cubes);

    let m = VAR_MASKS[v] & full;
    ((f0 & !m) | (f1 & m) | f2) & full
}

/// Irredundant sum-of-products cover of a `k`-variable function (Minato–Morreale).
pub fn isop(word: u64, k: usize) -> Vec<Cube> {
    let full = length_mask(k);
    let word = word & full;
    let mut cubes = Vec::new();
    let covered = isop_rec(word, word, k, full, &mut cubes);
    debug_assert_eq!(covered, word);
    cubes
}

/// A two-level implementation of a class representative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    cubes: Vec<Cube>,
    negated_output: bool,
}

impl Recipe {
    /// Build from the cheaper of the covers of `word` and of its complement.
    pub fn from_word(word: u64, k: usize) -> Self {
        let full = length_mask(k);
        let on = isop(word, k);
        let off = isop(!word & full, k);
        let cost = |cubes: &[Cube]| cubes.iter().map(|c| c.num_literals()).sum::<u32>();
        if cost(off.as_slice()) < cost(on.as_slice()) {
            Recipe {
                cubes: off,
                negated_output: true,
            }
        } else {
            Recipe {
                cubes: on,
                negated_output: false,
            }
        }
    }

    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }

    pub fn is_output_negated(&self) -> bool {
        self.negated_output
    }

    pub fn num_literals(&self) -> u32 {
        self.cubes.iter().map(|c| c.num_literals()).sum()
    }

    /// Evaluate the recipe on a `k`-variable assignment index.
    pub fn eval(&self, assignment: usize) -> bool {
        let sum = self.cubes.iter().any(|c| {
            let a = assignment as u32;
            (a ^ c.polarity) & c.mask == 0
        });
        sum ^ self.negated_output
    }

    /// Build the recipe in `ntk`, with local variable j driven by `leaves[j]`.
    pub fn instantiate<N: Network>(&self, ntk: &mut N, leaves: &[N::Signal]) -> N::Signal {
        let mut sum: Option<N::Signal> = None;
        for cube in &self.cubes {
            let mut product: Option<N::Signal> = None;
            for (j, &leaf) in leaves.iter().enumerate() {
                if (cube.mask >> j) & 1 == 0 {
                    continue;
                }
                let literal = if (cube.polarity >> j) & 1 == 1 {
                    leaf
                } else {
                    ntk.create_not(leaf)
                };
                product = Some(match product {
                    None => literal,
                    Some(p) => ntk.create_and(p, literal),
                });
            }
            let product = match product {
                Some(p) => p,
                None => ntk.get_constant(true),
            };
            sum = Some(match sum {
                None => product,
                Some(s) => ntk.create_or(s, product),
            });
        }
        let sum = match sum {
            Some(s) => s,
            None => ntk.get_constant(false),
        };
        if self.negated_output {
            ntk.create_not(sum)
        } else {
            sum
        }
    }
}

/// Library of recipes keyed by `(arity, representative)`.
///
/// Entries are created on first request and kept for later runs.
#[derive(Debug, Default, Clone)]
pub struct NpnLibrary {
    entries: HashMap<(usize, u64), Recipe>,
    hits: usize,
    misses: usize,
}

impl NpnLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored classes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the number of lookups answered from stored entries.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Get the number of lookups that created an entry.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Get the recipe for a class representative on `k` variables.
    pub fn recipe(&mut self, k: usize, representative: u64) -> Result<&Recipe, DecompositionError> {
        if k > MAX_LIBRARY_VARS {
            return Err(DecompositionError::UnsupportedPrimeResidual {
                support_size: k,
                reason: "no canonical-class library for this many variables",
            });
        }
        if self.entries.contains_key(&(k, representative)) {
            self.hits += 1;
        } else {
            self.misses += 1;
            debug!("npn library: new class {:#x} on {} variables", representative, k);
        }
        let recipe = self
            .entries
            .entry((k, representative))
            .or_insert_with(|| Recipe::from_word(representative, k));
        Ok(&*recipe)
    }

    /// Fill the library with every class whose functions depend on exactly `k` variables.
    ///
    /// Enumerates all `2^(2^k)` functions, which is slow for `k = 4`.
    pub fn precompute(&mut self, k: usize) {
        assert!(k <= MAX_LIBRARY_VARS, "Library covers at most {} variables", MAX_LIBRARY_VARS);
        for word in 0..1u64 << (1 << k) {
            if (0..k).all(|v| has_var(word, v)) {
                let (representative, _) = exact_npn_canonization(word, k);
                self.entries
                    .entry((k, representative))
                    .or_insert_with(|| Recipe::from_word(representative, k));
            }
        }
    }

    /// Count the stored classes on exactly `k` variables.
    pub fn num_classes(&self, k: usize) -> usize {
        self.entries.keys().filter(|(arity, _)| *arity == k).count()
    }
}
