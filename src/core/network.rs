//! Network-related structures and traits.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::node::{InputTrain, Node, NodeKind};
use crate::core::synapse::Synapse;
use crate::error::SNNError;

/// The surface of a simulated network that fault injection relies on.
///
/// Nodes and synapses are ordered; positions and names of existing elements are stable under
/// every operation of the trait.
pub trait Network {
    /// The nodes of the network, in insertion order.
    fn nodes(&self) -> &[Node];

    /// The synapses of the network, in insertion order.
    fn synapses(&self) -> &[Synapse];

    /// A mutable reference to a specific node in the network.
    /// Returns `None` if the node is not found.
    fn node_mut(&mut self, name: &str) -> Option<&mut Node>;

    /// Append a node to the network.
    /// Returns an error if a node with the same name already exists.
    fn add_node(&mut self, node: Node) -> Result<(), SNNError>;

    /// Append a synapse to the network.
    /// Returns an error if one of its endpoints is not in the network.
    fn add_synapse(&mut self, synapse: Synapse) -> Result<(), SNNError>;

    /// Overwrite the synapse at the given position and return the previous one.
    fn replace_synapse(&mut self, index: usize, synapse: Synapse) -> Result<Synapse, SNNError>;

    /// Swap the whole synapse list for a replacement of the same length.
    fn replace_synapses(&mut self, synapses: Vec<Synapse>) -> Result<(), SNNError>;

    /// The number of nodes in the network.
    fn num_nodes(&self) -> usize {
        self.nodes().len()
    }

    /// The number of synapses in the network.
    fn num_synapses(&self) -> usize {
        self.synapses().len()
    }

    /// The position of a node in the network.
    fn node_index(&self, name: &str) -> Option<usize> {
        self.nodes().iter().position(|node| node.name() == name)
    }

    /// A reference to a specific node in the network.
    fn node_ref(&self, name: &str) -> Option<&Node> {
        self.node_index(name).map(|index| &self.nodes()[index])
    }

    /// The synapses leaving the given node.
    fn outgoing<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Synapse> + 'a {
        self.synapses().iter().filter(move |synapse| synapse.pre() == name)
    }

    /// The firing threshold of a node, if it is a neuron with a threshold.
    fn threshold(&self, name: &str) -> Option<f64> {
        self.node_ref(name).and_then(|node| node.threshold())
    }

    /// Set the firing threshold of a neuron.
    fn set_threshold(&mut self, name: &str, threshold: f64) -> Result<(), SNNError> {
        self.node_mut(name)
            .ok_or_else(|| {
                SNNError::OutOfBounds(format!("Node {} not found in the network", name))
            })?
            .set_threshold(threshold)
    }
}

/// An in-memory network, as described before simulation.
#[derive(Debug, Default, Serialize, PartialEq, Clone)]
pub struct SimNetwork {
    nodes: Vec<Node>,
    synapses: Vec<Synapse>,
    /// Position of each node, by name.
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl<'de> Deserialize<'de> for SimNetwork {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct SimNetworkData {
            nodes: Vec<Node>,
            synapses: Vec<Synapse>,
        }

        let data = SimNetworkData::deserialize(deserializer)?;
        let mut network = SimNetwork::new();
        for node in data.nodes {
            network.add_node(node).map_err(serde::de::Error::custom)?;
        }
        for synapse in data.synapses {
            network.add_synapse(synapse).map_err(serde::de::Error::custom)?;
        }
        Ok(network)
    }
}

impl SimNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        SimNetwork::default()
    }

    /// Add a LIF neuron to the network.
    pub fn create_lif(
        &mut self,
        name: &str,
        threshold: f64,
        reset: f64,
        leak: f64,
        bias: f64,
    ) -> Result<(), SNNError> {
        self.add_node(Node::lif(name, threshold, reset, leak, bias))
    }

    /// Add a node replaying the provided spike train.
    pub fn create_input_train(
        &mut self,
        name: &str,
        train: Vec<bool>,
        looping: bool,
    ) -> Result<(), SNNError> {
        self.add_node(Node::new(name, NodeKind::InputTrain(InputTrain { train, looping })))
    }

    /// Add a synapse between two nodes of the network.
    pub fn create_synapse(
        &mut self,
        pre: &str,
        post: &str,
        weight: f64,
        delay: usize,
    ) -> Result<(), SNNError> {
        self.add_synapse(Synapse::build(pre, post, weight, delay)?)
    }

    /// Save the network to a file in JSON format.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SNNError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| SNNError::IOError(e.to_string()))?;
        writer.flush()?;
        Ok(())
    }

    /// Load a network from a file in JSON format.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SNNError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| SNNError::IOError(e.to_string()))
    }

    fn check_endpoints(&self, synapse: &Synapse) -> Result<(), SNNError> {
        for name in [synapse.pre(), synapse.post()] {
            if !self.index.contains_key(name) {
                return Err(SNNError::OutOfBounds(format!(
                    "Synapse endpoint {} not found in the network",
                    name
                )));
            }
        }
        Ok(())
    }
}

impl Network for SimNetwork {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn synapses(&self) -> &[Synapse] {
        &self.synapses
    }

    fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        let index = *self.index.get(name)?;
        self.nodes.get_mut(index)
    }

    fn node_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn add_node(&mut self, node: Node) -> Result<(), SNNError> {
        if self.index.contains_key(node.name()) {
            return Err(SNNError::InvalidParameter(format!(
                "Node {} already exists in the network",
                node.name()
            )));
        }
        self.index.insert(node.name().to_string(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    fn add_synapse(&mut self, synapse: Synapse) -> Result<(), SNNError> {
        self.check_endpoints(&synapse)?;
        self.synapses.push(synapse);
        Ok(())
    }

    fn replace_synapse(&mut self, index: usize, synapse: Synapse) -> Result<Synapse, SNNError> {
        self.check_endpoints(&synapse)?;
        let slot = self.synapses.get_mut(index).ok_or_else(|| {
            SNNError::OutOfBounds(format!("Synapse {} not found in the network", index))
        })?;
        Ok(std::mem::replace(slot, synapse))
    }

    fn replace_synapses(&mut self, synapses: Vec<Synapse>) -> Result<(), SNNError> {
        if synapses.len() != self.synapses.len() {
            return Err(SNNError::InvalidParameter(format!(
                "Replacement has {} synapses, the network has {}",
                synapses.len(),
                self.synapses.len()
            )));
        }
        synapses
            .iter()
            .try_for_each(|synapse| self.check_endpoints(synapse))?;
        self.synapses = synapses;
        Ok(())
    }
}
