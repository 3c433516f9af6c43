//! Logic network builders.
//!
//! The [`Network`] trait is everything the decomposition engine needs from a
//! target network: constants, complement, and the five binary constructors.
//! [`Xag`] is a structurally hashed XOR-AND graph implementing it.

use std::fmt::Debug;

use log::trace;

use crate::gate::Gate;
use crate::signal::{Node, Signal};
use crate::table::StrashTable;
use crate::truth_table::TruthTable;

/// Signal constructors of a logic network.
///
/// Signals are opaque handles; the engine never inspects them.
/// `create_or`, `create_lt` and `create_le` default to AND with complemented
/// operands, which is how an AND-based network expresses them.
pub trait Network {
    type Signal: Copy + Eq + Debug;

    fn get_constant(&mut self, value: bool) -> Self::Signal;

    fn create_not(&mut self, a: Self::Signal) -> Self::Signal;

    fn create_and(&mut self, a: Self::Signal, b: Self::Signal) -> Self::Signal;

    fn create_xor(&mut self, a: Self::Signal, b: Self::Signal) -> Self::Signal;

    /// `a ∨ b`
    fn create_or(&mut self, a: Self::Signal, b: Self::Signal) -> Self::Signal {
        let na = self.create_not(a);
        let nb = self.create_not(b);
        let nor = self.create_and(na, nb);
        self.create_not(nor)
    }

    /// `¬a ∧ b`
    fn create_lt(&mut self, a: Self::Signal, b: Self::Signal) -> Self::Signal {
        let na = self.create_not(a);
        self.create_and(na, b)
    }

    /// `¬a ∨ b`
    fn create_le(&mut self, a: Self::Signal, b: Self::Signal) -> Self::Signal {
        let na = self.create_not(a);
        self.create_or(na, b)
    }
}

/// XOR-AND graph with complemented edges and structural hashing.
#[derive(Debug, Clone)]
pub struct Xag {
    num_inputs: u32,
    outputs: Vec<Signal>,
    gates: StrashTable<Gate>,
}

impl Default for Xag {
    fn default() -> Self {
        Self::new()
    }
}

impl Xag {
    pub fn new() -> Self {
        Self::with_bucket_bits(10)
    }

    /// Create a network whose structural hash has `2^bits` buckets.
    pub fn with_bucket_bits(bits: u32) -> Self {
        Self {
            num_inputs: 0,
            outputs: Vec::new(),
            gates: StrashTable::with_bucket_bits(bits),
        }
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs as usize
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    pub fn num_and_gates(&self) -> usize {
        self.gates.iter().filter(|g| g.is_and()).count()
    }

    pub fn num_xor_gates(&self) -> usize {
        self.gates.iter().filter(|g| g.is_xor()).count()
    }

    pub fn gate(&self, gate: u32) -> Option<&Gate> {
        self.gates.get(gate)
    }

    /// All gates in creation (hence topological) order.
    pub fn gates(&self) -> impl Iterator<Item = &Gate> + '_ {
        self.gates.iter()
    }

    pub fn outputs(&self) -> &[Signal] {
        &self.outputs
    }

    pub fn add_input(&mut self) -> Signal {
        let input = Signal::from_input(self.num_inputs);
        self.num_inputs += 1;
        input
    }

    pub fn add_output(&mut self, output: Signal) {
        self.outputs.push(output);
    }

    fn add_gate(&mut self, gate: Gate) -> Signal {
        let (id, fresh) = self.gates.insert(gate);
        if fresh {
            trace!("g{} = {:?}", id, gate);
        }
        Signal::from_gate(id)
    }
}

impl Network for Xag {
    type Signal = Signal;

    fn get_constant(&mut self, value: bool) -> Signal {
        Signal::from(value)
    }

    fn create_not(&mut self, a: Signal) -> Signal {
        !a
    }

    fn create_and(&mut self, a: Signal, b: Signal) -> Signal {
        if a == Signal::zero() || b == Signal::zero() || a == !b {
            trace!("and({}, {}) => 0", a, b);
            return Signal::zero();
        }
        if a == Signal::one() || a == b {
            return b;
        }
        if b == Signal::one() {
            return a;
        }
        self.add_gate(Gate::and(a, b))
    }

    fn create_xor(&mut self, a: Signal, b: Signal) -> Signal {
        // Complements are pulled out of the operands: x ⊕ ¬y = ¬(x ⊕ y).
        let negated = a.is_negated() ^ b.is_negated();
        let (a, b) = (a.regular(), b.regular());

        let result = if a == b {
            Signal::zero()
        } else if a == Signal::zero() {
            b
        } else if b == Signal::zero() {
            a
        } else {
            self.add_gate(Gate::xor(a, b))
        };

        result.complement_if(negated)
    }
}

// Simulation
impl Xag {
    fn value_of<T: Clone>(signal: Signal, constant: &T, inputs: &[T], gates: &[T], not: impl Fn(&T) -> T) -> T {
        let value = match signal.node() {
            Node::Constant => constant.clone(),
            Node::Input(i) => inputs[i as usize].clone(),
            Node::Gate(g) => gates[g as usize].clone(),
        };
        if signal.is_negated() {
            not(&value)
        } else {
            value
        }
    }

    /// Evaluate `signal` under an assignment of the primary inputs.
    pub fn eval(&self, signal: Signal, inputs: &[bool]) -> bool {
        assert_eq!(inputs.len(), self.num_inputs(), "Expected {} inputs", self.num_inputs());

        let not = |b: &bool| !*b;
        let mut values = Vec::with_capacity(self.num_gates());
        for gate in self.gates.iter() {
            let [a, b] = *gate.inputs();
            let va = Self::value_of(a, &false, inputs, &values, not);
            let vb = Self::value_of(b, &false, inputs, &values, not);
            values.push(gate.apply(va, vb));
        }
        Self::value_of(signal, &false, inputs, &values, not)
    }

    /// Compute the function of `signal` given the functions of the primary inputs.
    pub fn simulate(&self, signal: Signal, inputs: &[TruthTable]) -> TruthTable {
        assert_eq!(inputs.len(), self.num_inputs(), "Expected {} inputs", self.num_inputs());
        let n = inputs.first().map_or(0, |t| t.num_vars());
        let zero = TruthTable::zero(n);

        let not = |t: &TruthTable| t.complement();
        let mut values: Vec<TruthTable> = Vec::with_capacity(self.num_gates());
        for gate in self.gates.iter() {
            let [a, b] = *gate.inputs();
            let ta = Self::value_of(a, &zero, inputs, &values, not);
            let tb = Self::value_of(b, &zero, inputs, &values, not);
            let t = if gate.is_and() { ta.and(&tb) } else { ta.xor(&tb) };
            values.push(t);
        }
        Self::value_of(signal, &zero, inputs, &values, not)
    }

    /// Compute the function of `signal` with primary input i standing for variable xᵢ.
    pub fn simulate_function(&self, signal: Signal) -> TruthTable {
        let n = self.num_inputs;
        let inputs: Vec<TruthTable> = (0..n).map(|i| TruthTable::nth_var(n, i)).collect();
        self.simulate(signal, &inputs)
    }
}
