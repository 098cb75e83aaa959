//! Radiation damage: fault specifications, deterministic element selection and the injection
//! engine that rewires a network so that a fault manifests during simulation.
//!
//! - [`spec`]: the validated description of a fault model ([`spec::FaultSpec`])
//! - [`hasher`]: the content-addressable digest used for fault and experiment identities
//! - [`sampler`]: deterministic selection of affected elements
//! - [`injector`]: network mutation, one routine per effect kind
//! - [`synaptic`]: the shared behaviour object of synaptic weight increases
//! - [`death`]: threshold-based neuron death and its verification
pub mod death;
pub mod hasher;
pub mod injector;
pub mod sampler;
pub mod spec;
pub mod synaptic;
