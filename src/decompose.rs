//! Recursive disjoint-support decomposition of truth tables into network signals.
//!
//! ## The cascade
//!
//! Each call of the engine receives a *residual* function whose essential
//! variables are exactly the current support, and tries (first match wins):
//!
//! 1. constant 0 / 1,
//! 2. a single remaining variable (the bound signal or its complement),
//! 3. a top decomposition `f = op(xᵥ, g)` for the first `v` in support order,
//! 4. a bottom decomposition on the first pair `(i, j)`, `i` before `j`,
//!    after which `xᵢ` is rebound to `op(xᵢ, xⱼ)`, `xⱼ` leaves the support
//!    and the cascade restarts on the rewritten residual,
//! 5. a prime residual: Shannon expansion when the support is larger than
//!    [`DecompositionParams::shannon_threshold`], NPN synthesis otherwise.
//!
//! Steps 3 and 4 remove one variable from the support; Shannon cofactors
//! depend on strictly fewer variables. The recursion depth is therefore bounded
//! by the number of variables, which is enforced as a guard.

use log::{debug, trace};

use crate::error::DecompositionError;
use crate::network::Network;
use crate::npn::{exact_npn_canonization, NpnLibrary, MAX_LIBRARY_VARS};
use crate::oracle::{DecompositionOracle, Operator, TruthTableOracle};
use crate::truth_table::TruthTable;

/// Configuration of the decomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompositionParams {
    /// Also test XOR decompositions.
    pub with_xor: bool,
    /// Prime residuals with more live variables than this are Shannon-expanded,
    /// the others go through the NPN library.
    pub shannon_threshold: usize,
    /// When disabled, a prime residual above the threshold is an error.
    pub allow_shannon: bool,
}

impl Default for DecompositionParams {
    fn default() -> Self {
        Self {
            with_xor: false,
            shannon_threshold: 4,
            allow_shannon: true,
        }
    }
}

/// Live variables and the signal standing for each variable slot.
///
/// Exactly one recursive call owns the state at a time; it is handed down by
/// `&mut`, and Shannon branches work on restricted copies.
#[derive(Debug, Clone)]
pub struct DecompositionState<S> {
    support: Vec<u32>,
    bindings: Vec<S>,
}

impl<S: Copy> DecompositionState<S> {
    /// Start from the essential variables of `func` and one signal per variable.
    pub fn new(func: &TruthTable, inputs: &[S]) -> Self {
        assert_eq!(inputs.len(), func.num_vars() as usize, "Expected one input per variable");
        Self {
            support: func.support(),
            bindings: inputs.to_vec(),
        }
    }

    pub fn support(&self) -> &[u32] {
        &self.support
    }

    pub fn binding(&self, var: u32) -> S {
        self.bindings[var as usize]
    }

    /// A copy whose support is narrowed to the variables `residual` depends on.
    fn restricted(&self, residual: &TruthTable) -> Self {
        Self {
            support: self.support.iter().copied().filter(|&v| residual.has_var(v)).collect(),
            bindings: self.bindings.clone(),
        }
    }
}

/// One decision of the cascade, with the support size before it was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Constant(bool),
    Literal { var: u32, negated: bool },
    Top { var: u32, op: Operator, support_size: usize },
    Bottom { lower: u32, upper: u32, op: Operator, support_size: usize },
    Shannon { var: u32, support_size: usize },
    Npn { support_size: usize, representative: u64 },
}

/// Counters accumulated over all runs of a [`Decomposer`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecompositionStats {
    pub calls: usize,
    pub constants: usize,
    pub literals: usize,
    pub top: usize,
    pub bottom: usize,
    pub shannon: usize,
    pub npn: usize,
}

/// The decomposition engine.
///
/// A decomposer borrows the target network for its whole lifetime and can be
/// run on many functions; the NPN library and the statistics are shared
/// between runs, the [`trace`][Decomposer::trace] is reset by each run.
pub struct Decomposer<'a, N, O = TruthTableOracle> {
    ntk: &'a mut N,
    oracle: O,
    params: DecompositionParams,
    library: NpnLibrary,
    stats: DecompositionStats,
    trace: Vec<Step>,
    depth_limit: usize,
}

impl<'a, N: Network> Decomposer<'a, N, TruthTableOracle> {
    pub fn new(ntk: &'a mut N, params: DecompositionParams) -> Self {
        Self::with_oracle(ntk, TruthTableOracle, params)
    }
}

impl<'a, N: Network, O: DecompositionOracle> Decomposer<'a, N, O> {
    pub fn with_oracle(ntk: &'a mut N, oracle: O, params: DecompositionParams) -> Self {
        Self {
            ntk,
            oracle,
            params,
            library: NpnLibrary::new(),
            stats: DecompositionStats::default(),
            trace: Vec::new(),
            depth_limit: 0,
        }
    }

    pub fn params(&self) -> &DecompositionParams {
        &self.params
    }

    pub fn stats(&self) -> &DecompositionStats {
        &self.stats
    }

    /// Decisions taken by the last run, in the order they were taken.
    pub fn trace(&self) -> &[Step] {
        &self.trace
    }

    pub fn library(&self) -> &NpnLibrary {
        &self.library
    }

    /// Decompose `func`, with variable i driven by `inputs[i]`.
    ///
    /// On error, nodes already added to the network are not part of any result.
    pub fn run(&mut self, func: &TruthTable, inputs: &[N::Signal]) -> Result<N::Signal, DecompositionError> {
        if inputs.len() != func.num_vars() as usize {
            return Err(DecompositionError::InputCountMismatch {
                expected: func.num_vars() as usize,
                actual: inputs.len(),
            });
        }

        self.trace.clear();
        self.depth_limit = func.num_vars() as usize;

        let mut state = DecompositionState::new(func, inputs);
        debug!("run: f = {} on support {:?}", func, state.support());
        self.decompose(&mut state, func.clone(), 0)
    }

    fn decompose(
        &mut self,
        state: &mut DecompositionState<N::Signal>,
        residual: TruthTable,
        depth: usize,
    ) -> Result<N::Signal, DecompositionError> {
        // Unreachable while the stray-variable check below holds, since every step shrinks the support.
        if depth > self.depth_limit {
            return Err(DecompositionError::DepthExceeded {
                limit: self.depth_limit,
            });
        }
        self.stats.calls += 1;
        trace!("decompose(f = {}, depth = {}, support = {:?})", residual, depth, state.support);

        // Step 1: constants
        if residual.is_constant() {
            let value = residual.is_one();
            self.stats.constants += 1;
            self.trace.push(Step::Constant(value));
            return Ok(self.ntk.get_constant(value));
        }

        if let Some(var) = (0..residual.num_vars()).find(|v| !state.support.contains(v) && residual.has_var(*v)) {
            return Err(DecompositionError::StrayVariable { var, residual });
        }

        // Step 2: single variable, necessarily xᵥ or ¬xᵥ past the stray check
        if state.support.len() == 1 {
            let var = state.support[0];
            let signal = state.binding(var);
            let negated = residual != TruthTable::nth_var(residual.num_vars(), var);
            self.stats.literals += 1;
            self.trace.push(Step::Literal { var, negated });
            return Ok(if negated { self.ntk.create_not(signal) } else { signal });
        }

        // Step 3: top decomposition
        for position in 0..state.support.len() {
            let var = state.support[position];
            if let Some(d) = self.oracle.top_decomposition(&residual, var, self.params.with_xor) {
                debug!("top decomposition on x{} with {:?}", var, d.op);
                self.stats.top += 1;
                self.trace.push(Step::Top {
                    var,
                    op: d.op,
                    support_size: state.support.len(),
                });

                state.support.remove(position);
                let left = state.binding(var);
                let right = self.decompose(state, d.residual, depth + 1)?;
                return Ok(d.op.build(&mut *self.ntk, left, right));
            }
        }

        // Step 4: bottom decomposition
        for a in 0..state.support.len() {
            for b in (a + 1)..state.support.len() {
                let (i, j) = (state.support[a], state.support[b]);
                if let Some(d) = self.oracle.bottom_decomposition(&residual, i, j, self.params.with_xor) {
                    debug!("bottom decomposition on x{} and x{} with {:?}", i, j, d.op);
                    self.stats.bottom += 1;
                    self.trace.push(Step::Bottom {
                        lower: i,
                        upper: j,
                        op: d.op,
                        support_size: state.support.len(),
                    });

                    let merged = d.op.build(&mut *self.ntk, state.binding(i), state.binding(j));
                    state.bindings[i as usize] = merged;
                    state.support.remove(b);
                    return self.decompose(state, d.residual, depth + 1);
                }
            }
        }

        // Step 5: prime residual
        let support_size = state.support.len();
        if support_size > self.params.shannon_threshold {
            if !self.params.allow_shannon {
                return Err(DecompositionError::UnsupportedPrimeResidual {
                    support_size,
                    reason: "Shannon expansion is disabled",
                });
            }
            self.shannon(state, &residual, depth)
        } else {
            self.npn(state, &residual)
        }
    }

    /// Pick the variable whose cofactors depend on the fewest variables in total.
    fn select_shannon_var(state: &DecompositionState<N::Signal>, residual: &TruthTable) -> u32 {
        let cost = |t: &TruthTable| state.support.iter().filter(|&&v| t.has_var(v)).count();

        let mut best = state.support[0];
        let mut best_cost = usize::MAX;
        for &var in &state.support {
            let c = cost(&residual.cofactor(var, false)) + cost(&residual.cofactor(var, true));
            if c < best_cost {
                best = var;
                best_cost = c;
            }
        }
        best
    }

    fn shannon(
        &mut self,
        state: &DecompositionState<N::Signal>,
        residual: &TruthTable,
        depth: usize,
    ) -> Result<N::Signal, DecompositionError> {
        let var = Self::select_shannon_var(state, residual);
        debug!("shannon expansion on x{} ({} live variables)", var, state.support.len());
        self.stats.shannon += 1;
        self.trace.push(Step::Shannon {
            var,
            support_size: state.support.len(),
        });

        let f0 = residual.cofactor(var, false);
        let f1 = residual.cofactor(var, true);

        let mut state0 = state.restricted(&f0);
        let s0 = self.decompose(&mut state0, f0, depth + 1)?;
        let mut state1 = state.restricted(&f1);
        let s1 = self.decompose(&mut state1, f1, depth + 1)?;

        // (x ∧ f1) ∨ (¬x ∧ f0)
        let x = state.binding(var);
        let then = self.ntk.create_and(x, s1);
        let otherwise = self.ntk.create_lt(x, s0);
        Ok(self.ntk.create_or(then, otherwise))
    }

    fn npn(
        &mut self,
        state: &DecompositionState<N::Signal>,
        residual: &TruthTable,
    ) -> Result<N::Signal, DecompositionError> {
        let k = state.support.len();
        if k > MAX_LIBRARY_VARS {
            return Err(DecompositionError::UnsupportedPrimeResidual {
                support_size: k,
                reason: "no canonical-class library for this many variables",
            });
        }

        let local = residual.shrink_to(&state.support);
        let (representative, transform) = exact_npn_canonization(local.as_word(), k);
        debug!("npn synthesis of {} as class {:#x}", local, representative);
        self.stats.npn += 1;
        self.trace.push(Step::Npn {
            support_size: k,
            representative,
        });

        let mut leaves = Vec::with_capacity(k);
        for j in 0..k {
            let signal = state.binding(state.support[transform.perm[j]]);
            leaves.push(if transform.is_input_negated(j) {
                self.ntk.create_not(signal)
            } else {
                signal
            });
        }

        let recipe = self.library.recipe(k, representative)?;
        let out = recipe.instantiate(&mut *self.ntk, &leaves);
        Ok(if transform.output_negation {
            self.ntk.create_not(out)
        } else {
            out
        })
    }
}

/// Decompose `func` into `ntk` in one go, with variable i driven by `inputs[i]`.
pub fn dsd_decompose<N: Network>(
    ntk: &mut N,
    func: &TruthTable,
    inputs: &[N::Signal],
    params: &DecompositionParams,
) -> Result<N::Signal, DecompositionError> {
    Decomposer::new(ntk, params.clone()).run(func, inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Xag;
    use crate::oracle::Decomposition;
    use crate::signal::Signal;
    use crate::truth_table::named;

    use test_log::test;

    fn setup(n: u32) -> (Xag, Vec<Signal>) {
        let mut xag = Xag::new();
        let inputs = (0..n).map(|_| xag.add_input()).collect();
        (xag, inputs)
    }

    fn decompose_with(f: &TruthTable, params: DecompositionParams) -> (Xag, Signal, Vec<Step>) {
        let (mut xag, inputs) = setup(f.num_vars());
        let (out, steps) = {
            let mut dec = Decomposer::new(&mut xag, params);
            let out = dec.run(f, &inputs).unwrap();
            (out, dec.trace().to_vec())
        };
        assert_eq!(xag.simulate_function(out), *f, "wrong function for {}", f);
        (xag, out, steps)
    }

    #[test]
    fn test_constants() {
        let (mut xag, inputs) = setup(3);
        let params = DecompositionParams::default();
        let zero = dsd_decompose(&mut xag, &TruthTable::zero(3), &inputs, &params).unwrap();
        let one = dsd_decompose(&mut xag, &TruthTable::one(3), &inputs, &params).unwrap();
        assert_eq!(zero, Signal::zero());
        assert_eq!(one, Signal::one());
        assert_eq!(xag.num_gates(), 0);

        let (_, _, steps) = decompose_with(&TruthTable::one(0), params);
        assert_eq!(steps, vec![Step::Constant(true)]);
    }

    #[test]
    fn test_literals() {
        let (mut xag, inputs) = setup(3);
        let params = DecompositionParams::default();

        let x1 = TruthTable::nth_var(3, 1);
        assert_eq!(dsd_decompose(&mut xag, &x1, &inputs, &params).unwrap(), inputs[1]);

        let not_x2 = !TruthTable::nth_var(3, 2);
        assert_eq!(dsd_decompose(&mut xag, &not_x2, &inputs, &params).unwrap(), !inputs[2]);
        assert_eq!(xag.num_gates(), 0);

        let (_, _, steps) = decompose_with(&not_x2, params);
        assert_eq!(steps, vec![Step::Literal { var: 2, negated: true }]);
    }

    #[test]
    fn test_nested_top_decompositions() {
        // x0 ∧ (x1 ∨ x2)
        let f = TruthTable::from_expr(3, |x| x[0] && (x[1] || x[2]));
        let (mut xag, out, steps) = decompose_with(&f, DecompositionParams::default());
        assert_eq!(
            steps,
            vec![
                Step::Top { var: 0, op: Operator::And, support_size: 3 },
                Step::Top { var: 1, op: Operator::Or, support_size: 2 },
                Step::Literal { var: 2, negated: false },
            ]
        );

        let inputs = [Signal::from_input(0), Signal::from_input(1), Signal::from_input(2)];
        let or = xag.create_or(inputs[1], inputs[2]);
        assert_eq!(out, xag.create_and(inputs[0], or));
        assert_eq!(xag.num_gates(), 2);
    }

    #[test]
    fn test_xor_disabled_falls_back_to_npn() {
        let f = named::xor_all(2);
        let (_, _, steps) = decompose_with(&f, DecompositionParams::default());
        assert_eq!(steps.len(), 1);
        assert!(matches!(steps[0], Step::Npn { support_size: 2, .. }));
    }

    #[test]
    fn test_xor_enabled() {
        let f = named::xor_all(2);
        let params = DecompositionParams {
            with_xor: true,
            ..DecompositionParams::default()
        };
        let (xag, _, steps) = decompose_with(&f, params);
        assert_eq!(
            steps,
            vec![
                Step::Top { var: 0, op: Operator::Xor, support_size: 2 },
                Step::Literal { var: 1, negated: false },
            ]
        );
        assert_eq!(xag.num_xor_gates(), 1);
        assert_eq!(xag.num_and_gates(), 0);
    }

    #[test]
    fn test_bottom_then_top() {
        // (x0 ∧ x1) ∨ (x2 ∧ x3)
        let f = TruthTable::from_expr(4, |x| (x[0] && x[1]) || (x[2] && x[3]));
        let (mut xag, out, steps) = decompose_with(&f, DecompositionParams::default());
        assert_eq!(
            steps,
            vec![
                Step::Bottom { lower: 0, upper: 1, op: Operator::And, support_size: 4 },
                Step::Top { var: 0, op: Operator::Or, support_size: 3 },
                Step::Top { var: 2, op: Operator::And, support_size: 2 },
                Step::Literal { var: 3, negated: false },
            ]
        );

        let x: Vec<Signal> = (0..4).map(Signal::from_input).collect();
        let left = xag.create_and(x[0], x[1]);
        let right = xag.create_and(x[2], x[3]);
        assert_eq!(out, xag.create_or(left, right));
        assert_eq!(xag.num_gates(), 3);
    }

    #[test]
    fn test_bottom_then_prime() {
        // (x0 ∧ x1) ? x2 : x3
        let f = TruthTable::from_expr(4, |x| if x[0] && x[1] { x[2] } else { x[3] });
        let (_, _, steps) = decompose_with(&f, DecompositionParams::default());
        assert_eq!(steps.len(), 2);
        assert_eq!(
            steps[0],
            Step::Bottom { lower: 0, upper: 1, op: Operator::And, support_size: 4 }
        );
        assert!(matches!(steps[1], Step::Npn { support_size: 3, .. }));
    }

    #[test]
    fn test_support_shrinks_along_the_cascade() {
        for word in 0..256u64 {
            let f = TruthTable::from_word(3, word);
            let (_, _, steps) = decompose_with(&f, DecompositionParams::default());
            let sizes: Vec<usize> = steps
                .iter()
                .filter_map(|step| match *step {
                    Step::Top { support_size, .. } => Some(support_size),
                    Step::Bottom { support_size, .. } => Some(support_size),
                    Step::Npn { support_size, .. } => Some(support_size),
                    _ => None,
                })
                .collect();
            assert!(sizes.windows(2).all(|w| w[0] > w[1]), "{}: {:?}", f, steps);
        }
    }

    #[test]
    fn test_deterministic() {
        for &word in &[0x6A5C, 0x1E87, 0x8001, 0xCAFE] {
            let f = TruthTable::from_word(4, word);
            let (xag1, out1, steps1) = decompose_with(&f, DecompositionParams::default());
            let (xag2, out2, steps2) = decompose_with(&f, DecompositionParams::default());
            assert_eq!(out1, out2);
            assert_eq!(steps1, steps2);
            assert!(xag1.gates().eq(xag2.gates()));
        }
    }

    #[test]
    fn test_shannon_on_large_prime() {
        let f = TruthTable::from_expr(5, |x| x.iter().filter(|&&b| b).count() >= 3);
        let (_, _, steps) = decompose_with(&f, DecompositionParams::default());
        assert_eq!(steps[0], Step::Shannon { var: 0, support_size: 5 });
        assert!(steps[1..].iter().all(|step| !matches!(step, Step::Shannon { .. })));
    }

    #[test]
    fn test_shannon_disabled() {
        let f = TruthTable::from_expr(5, |x| x.iter().filter(|&&b| b).count() >= 3);
        let (mut xag, inputs) = setup(5);
        let params = DecompositionParams {
            allow_shannon: false,
            ..DecompositionParams::default()
        };
        let err = dsd_decompose(&mut xag, &f, &inputs, &params).unwrap_err();
        assert!(matches!(err, DecompositionError::UnsupportedPrimeResidual { support_size: 5, .. }));
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn test_threshold_above_library() {
        let f = TruthTable::from_expr(5, |x| x.iter().filter(|&&b| b).count() >= 3);
        let (mut xag, inputs) = setup(5);
        let params = DecompositionParams {
            shannon_threshold: 5,
            ..DecompositionParams::default()
        };
        let err = dsd_decompose(&mut xag, &f, &inputs, &params).unwrap_err();
        assert!(matches!(err, DecompositionError::UnsupportedPrimeResidual { support_size: 5, .. }));
    }

    #[test]
    fn test_input_count_mismatch() {
        let (mut xag, inputs) = setup(2);
        let f = named::and_all(3);
        let err = dsd_decompose(&mut xag, &f, &inputs, &DecompositionParams::default()).unwrap_err();
        assert_eq!(err, DecompositionError::InputCountMismatch { expected: 3, actual: 2 });
    }

    /// Claims every function is `x ∧ f` without removing x from the residual.
    struct LyingOracle;

    impl DecompositionOracle for LyingOracle {
        fn top_decomposition(&self, f: &TruthTable, _var: u32, _with_xor: bool) -> Option<Decomposition> {
            Some(Decomposition {
                op: Operator::And,
                residual: f.clone(),
            })
        }

        fn bottom_decomposition(&self, _f: &TruthTable, _i: u32, _j: u32, _with_xor: bool) -> Option<Decomposition> {
            None
        }
    }

    #[test]
    fn test_stray_variable_is_reported() {
        let (mut xag, inputs) = setup(2);
        let f = named::and_all(2);
        let mut dec = Decomposer::with_oracle(&mut xag, LyingOracle, DecompositionParams::default());
        let err = dec.run(&f, &inputs).unwrap_err();
        assert_eq!(err, DecompositionError::StrayVariable { var: 0, residual: f });
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_library_shared_between_runs() {
        let (mut xag, inputs) = setup(2);
        let mut dec = Decomposer::new(&mut xag, DecompositionParams::default());
        let f = named::xor_all(2);
        dec.run(&f, &inputs).unwrap();
        dec.run(&!&f, &inputs).unwrap();
        assert_eq!(dec.stats().npn, 2);
        assert_eq!(dec.library().misses(), 1);
        assert_eq!(dec.library().hits(), 1);
        assert_eq!(dec.trace().len(), 1);
    }
}
