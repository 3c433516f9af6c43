//! # dsd-rs: Disjoint-Support Decomposition into Logic Networks
//!
//! **`dsd-rs`** turns a fully-specified Boolean function, given as a truth table,
//! into an equivalent signal of a logic network.
//! It repeatedly factors the function with **disjoint-support decomposition** (DSD)
//! and, when the function is prime, falls back to **Shannon expansion** or to a
//! **canonical-class (NPN)** library.
//!
//! ## How it works
//!
//! The [`Decomposer`][crate::decompose::Decomposer] keeps a *support* (variables still
//! live in the current sub-problem) and a *binding* (the network signal standing for each
//! variable slot). On each call it tries, in order:
//!
//! 1. **Constants**: `0` and `1` map to network constants.
//! 2. **Single variable**: `x` or `¬x` map to the bound signal or its complement.
//! 3. **Top decomposition**: `f = op(x_v, g)`, recurse on `g`.
//! 4. **Bottom decomposition**: `f` sees `x_i` and `x_j` only through `op(x_i, x_j)`;
//!    the pair is merged behind a new signal and the cascade restarts.
//! 5. **Prime residual**: Shannon expansion above a support threshold, NPN synthesis below.
//!
//! The operators are `AND`, `OR`, `XOR`, `LT` (`¬a ∧ b`) and `LE` (`¬a ∨ b`).
//!
//! ## Basic Usage
//!
//! ```rust
//! use dsd_rs::decompose::{dsd_decompose, DecompositionParams};
//! use dsd_rs::network::{Network, Xag};
//! use dsd_rs::truth_table::TruthTable;
//!
//! // f = x0 AND (x1 OR x2)
//! let f = TruthTable::from_expr(3, |x| x[0] && (x[1] || x[2]));
//!
//! let mut xag = Xag::new();
//! let inputs: Vec<_> = (0..3).map(|_| xag.add_input()).collect();
//! let out = dsd_decompose(&mut xag, &f, &inputs, &DecompositionParams::default()).unwrap();
//!
//! // The network computes exactly `f`:
//! assert_eq!(xag.simulate_function(out), f);
//!
//! // ...and has the expected structure AND(x0, OR(x1, x2)):
//! let or = xag.create_or(inputs[1], inputs[2]);
//! let expected = xag.create_and(inputs[0], or);
//! assert_eq!(out, expected);
//! ```
//!
//! ## Core Components
//!
//! - **[`truth_table`]**: the Boolean function value type.
//! - **[`oracle`]**: top/bottom decomposability tests.
//! - **[`network`]**: the network builder contract and the [`Xag`][crate::network::Xag] network.
//! - **[`npn`]**: exact NPN canonization and the canonical-class library.
//! - **[`decompose`]**: the recursive decomposition engine.

pub mod decompose;
pub mod error;
pub mod gate;
pub mod network;
pub mod npn;
pub mod oracle;
pub mod signal;
pub mod table;
pub mod truth_table;
pub mod utils;
