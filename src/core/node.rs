//! Module implementing the nodes of a network.
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use rand_distr::{Bernoulli, Distribution};
use serde::{Deserialize, Serialize};

use crate::error::SNNError;

/// Parameters of a leaky integrate-and-fire neuron.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Lif {
    /// Membrane potential required for the neuron to fire
    pub threshold: f64,
    /// Potential after a spike
    pub reset: f64,
    /// Multiplicative leak of the potential per time step
    pub leak: f64,
    /// Constant input current
    pub bias: f64,
}

/// A node that fires at each time step with a fixed probability.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct RandomSpiker {
    probability: f64,
    amplitude: f64,
    seed: u64,
}

impl RandomSpiker {
    /// Create a new random spiker.
    /// Returns an error if the probability is not in [0, 1].
    pub fn build(probability: f64, amplitude: f64, seed: u64) -> Result<Self, SNNError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(SNNError::InvalidParameter(format!(
                "Spiking probability must be in [0, 1], found {}",
                probability
            )));
        }
        Ok(RandomSpiker {
            probability,
            amplitude,
            seed,
        })
    }

    /// Returns the firing probability per time step.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Returns the voltage amplitude of an emitted spike (not the weight of the outgoing synapses).
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Returns the seed of the spike stream.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The spikes emitted during the first `duration` time steps.
    /// The stream only depends on the seed and the probability.
    pub fn spike_train(&self, duration: usize) -> Vec<bool> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        match Bernoulli::new(self.probability) {
            Ok(dist) => (0..duration).map(|_| dist.sample(&mut rng)).collect(),
            Err(_) => vec![false; duration],
        }
    }
}

/// A node replaying a fixed spike train.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct InputTrain {
    pub train: Vec<bool>,
    pub looping: bool,
}

/// The behaviour of a node.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Lif(Lif),
    RandomSpiker(RandomSpiker),
    InputTrain(InputTrain),
}

/// A named node of a network.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Node {
    name: String,
    kind: NodeKind,
    /// Whether the node has been marked as killed by radiation
    #[serde(default)]
    rad_death: bool,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Node {
            name: name.into(),
            kind,
            rad_death: false,
        }
    }

    /// Create a new LIF neuron.
    pub fn lif(name: impl Into<String>, threshold: f64, reset: f64, leak: f64, bias: f64) -> Self {
        Node::new(
            name,
            NodeKind::Lif(Lif {
                threshold,
                reset,
                leak,
                bias,
            }),
        )
    }

    pub fn random_spiker(name: impl Into<String>, spiker: RandomSpiker) -> Self {
        Node::new(name, NodeKind::RandomSpiker(spiker))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns the firing threshold, if the node is a LIF neuron.
    pub fn threshold(&self) -> Option<f64> {
        match &self.kind {
            NodeKind::Lif(lif) => Some(lif.threshold),
            _ => None,
        }
    }

    /// Set the firing threshold.
    /// Returns an error if the node is not a LIF neuron.
    pub fn set_threshold(&mut self, threshold: f64) -> Result<(), SNNError> {
        match &mut self.kind {
            NodeKind::Lif(lif) => {
                lif.threshold = threshold;
                Ok(())
            }
            _ => Err(SNNError::InvalidParameter(format!(
                "Node {} has no firing threshold",
                self.name
            ))),
        }
    }

    pub fn is_lif(&self) -> bool {
        matches!(self.kind, NodeKind::Lif(_))
    }

    /// Random spikers are spike sources, never targets of a radiation effect.
    pub fn is_random_spiker(&self) -> bool {
        matches!(self.kind, NodeKind::RandomSpiker(_))
    }

    pub fn rad_death(&self) -> bool {
        self.rad_death
    }

    pub fn set_rad_death(&mut self, dead: bool) {
        self.rad_death = dead;
    }
}
