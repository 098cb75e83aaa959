//! Core module defining the network model that radiation faults are injected into.
//!
//! The simulation engine itself lives elsewhere; this module only holds the pre-simulation
//! description of a network. It consists of the following components:
//!
//! - [`node`]: LIF neurons, random spike sources and input trains
//! - [`synapse`]: directed weighted connections with an integer delay
//! - [`network`]: the [`network::Network`] mutation surface and the in-memory
//!   [`network::SimNetwork`]
//!
//! # Examples
//!
//! ```
//! use snn_radiation::core::network::{Network, SimNetwork};
//!
//! let mut network = SimNetwork::new();
//! network.create_lif("A", 1.0, 0.0, 1.0, 0.0).unwrap();
//! network.create_lif("B", 1.0, 0.0, 1.0, 0.0).unwrap();
//! network.create_synapse("A", "B", 2.0, 1).unwrap();
//!
//! assert_eq!(network.num_nodes(), 2);
//! assert_eq!(network.num_synapses(), 1);
//! assert_eq!(network.node_index("B"), Some(1));
//! ```
pub mod network;
pub mod node;
pub mod synapse;

/// The nominal threshold for a neuron to fire.
pub const FIRING_THRESHOLD: f64 = 1.0;
/// The threshold assigned to a neuron killed by radiation; it is never reached in practice.
pub const DEATH_THRESHOLD: f64 = 9999.0;
/// The delay (in time steps) of every synapse created by fault injection.
pub const SYNAPTIC_DELAY: usize = 1;
