//! Module implementing the synapses of a network.
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SNNError;
use crate::radiation::synaptic::SynapticFault;

/// A synaptic fault attached to a synapse, together with the position of the synapse in the
/// schedule of the (shared) fault.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct FaultBinding {
    behaviour: Arc<SynapticFault>,
    index: usize,
}

impl FaultBinding {
    pub fn behaviour(&self) -> &SynapticFault {
        &self.behaviour
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Represents a directed connection between two named nodes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Synapse {
    /// Name of the presynaptic node
    pre: String,
    /// Name of the postsynaptic node
    post: String,
    /// Synapse weight
    weight: f64,
    /// Synapse delay in time steps (must be positive)
    delay: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fault: Option<FaultBinding>,
}

impl Synapse {
    /// Create a new synapse with the specified parameters.
    /// Returns an error if the delay is zero.
    pub fn build(
        pre: impl Into<String>,
        post: impl Into<String>,
        weight: f64,
        delay: usize,
    ) -> Result<Self, SNNError> {
        if delay == 0 {
            return Err(SNNError::InvalidParameter(
                "Synapse delay must be at least one time step".to_string(),
            ));
        }

        Ok(Synapse {
            pre: pre.into(),
            post: post.into(),
            weight,
            delay,
            fault: None,
        })
    }

    /// Returns the same synapse carrying a reference to a shared synaptic fault.
    pub fn with_fault(self, behaviour: Arc<SynapticFault>, index: usize) -> Self {
        Synapse {
            fault: Some(FaultBinding { behaviour, index }),
            ..self
        }
    }

    /// Returns the name of the presynaptic node.
    pub fn pre(&self) -> &str {
        &self.pre
    }

    /// Returns the name of the postsynaptic node.
    pub fn post(&self) -> &str {
        &self.post
    }

    /// Returns the nominal weight of the synapse.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn delay(&self) -> usize {
        self.delay
    }

    pub fn fault(&self) -> Option<&FaultBinding> {
        self.fault.as_ref()
    }

    /// Returns the weight of the synapse at time step `t`, including the increases of an
    /// attached synaptic fault.
    pub fn effective_weight(&self, t: usize) -> f64 {
        match &self.fault {
            Some(binding) => binding.behaviour.weight_at(binding.index, self.weight, t),
            None => self.weight,
        }
    }
}
