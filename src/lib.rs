//! This crate provides tools for simulating radiation damage in spiking neural networks (SNNs).
//!
//! A fault model ([`radiation::spec::FaultSpec`]) is applied to a network with a seed. The
//! affected elements and the synthetic spike sources realizing the fault only depend on the
//! network, the fault model and the seed, so that every experiment run can be reproduced and
//! identified by a fingerprint.
//!
//! # Injecting Faults
//!
//! ```rust
//! use snn_radiation::core::network::{Network, SimNetwork};
//! use snn_radiation::radiation::injector::apply_radiation;
//! use snn_radiation::radiation::spec::{EffectKind, EffectRate, FaultSpec};
//!
//! // Three neurons and a single synapse
//! let mut network = SimNetwork::new();
//! network.create_lif("A", 1.0, 0.0, 1.0, 0.0).unwrap();
//! network.create_lif("B", 1.0, 0.0, 1.0, 0.0).unwrap();
//! network.create_lif("C", 1.0, 0.0, 1.0, 0.0).unwrap();
//! network.create_synapse("A", "B", 2.0, 1).unwrap();
//!
//! // Every neuron randomly echoes its outgoing spikes
//! let rate = EffectRate::Probability(1.0);
//! let spec = FaultSpec::build(1.0, EffectKind::RandomNeuronSpike, true, false, rate).unwrap();
//! let report = apply_radiation(&spec, 7, &mut network, &[]).unwrap();
//!
//! assert_eq!(report.sources_added, 3);
//! assert_eq!(report.synapses_added, 1);
//! assert_eq!(network.num_nodes(), 6);
//! ```
//!
//! # Identifying Experiments
//!
//! ```rust
//! use snn_radiation::radiation::spec::{EffectKind, EffectRate, FaultSpec};
//!
//! let rate = EffectRate::Probability(0.01);
//! let spec = FaultSpec::build(-100.0, EffectKind::NeuronDeath, false, true, rate).unwrap();
//! let fingerprint = spec.fingerprint(&["n2", "n0"], 42);
//!
//! assert_eq!(fingerprint, spec.fingerprint(&["n0", "n2"], 42));
//! assert_eq!(fingerprint.len(), 64);
//! ```

pub mod core;
pub mod error;
pub mod radiation;
