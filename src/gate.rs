use crate::signal::Signal;
use crate::utils::{pairing3, NodeHash};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GateKind {
    And,
    Xor,
}

/// A two-input node of an [`Xag`][crate::network::Xag].
///
/// Fanins are sorted, so structurally equal gates compare equal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Gate {
    kind: GateKind,
    inputs: [Signal; 2],
}

// Constructors
impl Gate {
    fn binary(kind: GateKind, a: Signal, b: Signal) -> Gate {
        let inputs = if a <= b { [a, b] } else { [b, a] };
        Gate { kind, inputs }
    }

    pub fn and(a: Signal, b: Signal) -> Gate {
        Gate::binary(GateKind::And, a, b)
    }

    pub fn xor(a: Signal, b: Signal) -> Gate {
        Gate::binary(GateKind::Xor, a, b)
    }
}

// Getters
impl Gate {
    pub fn inputs(&self) -> &[Signal; 2] {
        &self.inputs
    }

    pub fn is_and(&self) -> bool {
        self.kind == GateKind::And
    }

    pub fn is_xor(&self) -> bool {
        self.kind == GateKind::Xor
    }

    /// Evaluate the gate given the values of its (regular) fanins.
    pub fn apply(&self, a: bool, b: bool) -> bool {
        match self.kind {
            GateKind::And => a && b,
            GateKind::Xor => a ^ b,
        }
    }
}

impl NodeHash for Gate {
    fn node_hash(&self) -> u64 {
        let kind = match self.kind {
            GateKind::And => 0,
            GateKind::Xor => 1,
        };
        pairing3(kind, self.inputs[0].raw() as u64, self.inputs[1].raw() as u64)
    }
}
