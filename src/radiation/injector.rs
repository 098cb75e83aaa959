//! Injection of radiation faults into a network.
//!
//! Every routine works in two phases: the synthetic sources and synapses are first computed
//! from the network as it was when the routine was called, and only then appended. Synthetic
//! sources created by a call are therefore never affected by that same call. Random spikers,
//! including the synthetic sources of earlier calls, are never the target of an effect, and
//! the names of synthetic sources carry the seed, so that passes with different seeds can be
//! applied one after the other to the same network.
//!
//! - Change in current is realised by adding one random spiker per neuron that feeds into
//!   that neuron with a weight equal to the radiation amplitude.
//! - Neuron death is realised the same way, with a large negative amplitude.
//! - Random spiking neurons are realised by adding one random spiker per neuron that feeds into
//!   the neighbours of that neuron, with the weights of the original synapses.
//! - Random spiking synapses are realised by adding one random spiker per synapse that feeds
//!   into the target of that synapse, with the weight of that synapse.
//! - Synaptic weight increases replace every synapse by one carrying a shared [`SynapticFault`].
//!
//! Synapse death is not supported.
use std::collections::HashSet;
use std::sync::Arc;

use crate::core::network::Network;
use crate::core::node::{Node, RandomSpiker};
use crate::core::synapse::Synapse;
use crate::core::SYNAPTIC_DELAY;
use crate::error::SNNError;
use crate::radiation::spec::{EffectKind, EffectRate, FaultSpec};
use crate::radiation::synaptic::SynapticFault;

/// Amplitude of the spikes of every injected random spiker. The effect of a spike on its
/// targets is set by the synapse weights.
pub const SOURCE_AMPLITUDE: f64 = 1.0;

/// What an injection added to or changed in a network.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InjectionReport {
    pub sources_added: usize,
    pub synapses_added: usize,
    pub synapses_replaced: usize,
    /// Weight-increase events realized on the bound synapses
    pub events_scheduled: usize,
}

/// A synthetic source together with its outgoing synapses, waiting to be appended.
struct Addition {
    source: Node,
    synapses: Vec<Synapse>,
}

/// Apply a radiation effect to a network, leaving the excluded nodes untouched.
///
/// Synaptic weight increases need a simulation horizon and go through
/// [`apply_weight_increase`] instead.
pub fn apply_radiation<N: Network>(
    spec: &FaultSpec,
    seed: u64,
    network: &mut N,
    excluded: &[String],
) -> Result<InjectionReport, SNNError> {
    match spec.effect_kind() {
        EffectKind::ChangeCurrent | EffectKind::NeuronDeath => {
            apply_delta_u(spec, seed, network, excluded)
        }
        EffectKind::RandomNeuronSpike => apply_rand_spiking_neuron(spec, seed, network, excluded),
        EffectKind::RandomSynapseSpike => {
            apply_rand_spiking_synapse(spec, seed, network, excluded)
        }
        EffectKind::SynapticWeightIncrease => Err(SNNError::UnsupportedEffect(format!(
            "{} needs a simulation horizon, use apply_weight_increase",
            spec.effect_kind()
        ))),
    }
}

/// Add one random spiker per neuron, feeding into that neuron with the radiation amplitude.
pub fn apply_delta_u<N: Network>(
    spec: &FaultSpec,
    seed: u64,
    network: &mut N,
    excluded: &[String],
) -> Result<InjectionReport, SNNError> {
    let probability = injection_probability(spec)?;
    let excluded = excluded_set(excluded);

    let additions = network
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| is_target(node, &excluded))
        .map(|(index, node)| {
            let source = synthetic_source(spec, node.name(), probability, seed, index)?;
            let synapse = Synapse::build(
                source.name(),
                node.name(),
                spec.amplitude(),
                SYNAPTIC_DELAY,
            )?;
            Ok(Addition {
                source,
                synapses: vec![synapse],
            })
        })
        .collect::<Result<Vec<Addition>, SNNError>>()?;

    commit(spec, network, additions)
}

/// Add one random spiker per neuron, echoing the outgoing synapses of that neuron.
pub fn apply_rand_spiking_neuron<N: Network>(
    spec: &FaultSpec,
    seed: u64,
    network: &mut N,
    excluded: &[String],
) -> Result<InjectionReport, SNNError> {
    let probability = injection_probability(spec)?;
    let excluded = excluded_set(excluded);

    let additions = network
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| is_target(node, &excluded))
        .map(|(index, node)| {
            let source = synthetic_source(spec, node.name(), probability, seed, index)?;
            let synapses = network
                .outgoing(node.name())
                .map(|synapse| {
                    Synapse::build(
                        source.name(),
                        synapse.post(),
                        synapse.weight(),
                        SYNAPTIC_DELAY,
                    )
                })
                .collect::<Result<Vec<Synapse>, SNNError>>()?;
            Ok(Addition { source, synapses })
        })
        .collect::<Result<Vec<Addition>, SNNError>>()?;

    commit(spec, network, additions)
}

/// Add one random spiker per synapse, feeding into the target of that synapse.
pub fn apply_rand_spiking_synapse<N: Network>(
    spec: &FaultSpec,
    seed: u64,
    network: &mut N,
    excluded: &[String],
) -> Result<InjectionReport, SNNError> {
    let probability = injection_probability(spec)?;
    let excluded = excluded_set(excluded);

    let additions = network
        .synapses()
        .iter()
        .enumerate()
        .filter(|(_, synapse)| {
            network
                .node_ref(synapse.pre())
                .is_some_and(|pre| is_target(pre, &excluded))
        })
        .map(|(index, synapse)| {
            let label = format!("{}_{}_{}", index, synapse.pre(), synapse.post());
            let source = synthetic_source(spec, &label, probability, seed, index)?;
            let synapse = Synapse::build(
                source.name(),
                synapse.post(),
                synapse.weight(),
                SYNAPTIC_DELAY,
            )?;
            Ok(Addition {
                source,
                synapses: vec![synapse],
            })
        })
        .collect::<Result<Vec<Addition>, SNNError>>()?;

    commit(spec, network, additions)
}

/// Attach a shared synaptic fault to every synapse between two non-excluded nodes.
///
/// The events of the fault are only drawn for those bound synapses. The synapse list is
/// snapshot, a replacement list is built, and the replacement is swapped in at once;
/// positions and endpoints of all synapses are preserved.
pub fn apply_weight_increase<N: Network>(
    spec: &FaultSpec,
    seed: u64,
    network: &mut N,
    excluded: &[String],
    horizon: usize,
) -> Result<InjectionReport, SNNError> {
    let excluded = excluded_set(excluded);
    let bound: Vec<bool> = network
        .synapses()
        .iter()
        .map(|synapse| !excluded.contains(synapse.pre()) && !excluded.contains(synapse.post()))
        .collect();
    let neuron_names = network
        .nodes()
        .iter()
        .map(|node| node.name().to_string())
        .collect();
    let fault = Arc::new(SynapticFault::build(
        spec.amplitude(),
        spec.effect_kind(),
        horizon,
        &bound,
        neuron_names,
        spec.rate(),
        seed,
    )?);

    let snapshot: Vec<Synapse> = network.synapses().to_vec();
    let mut report = InjectionReport {
        events_scheduled: fault.num_events(),
        ..InjectionReport::default()
    };
    let replacement = snapshot
        .into_iter()
        .zip(&bound)
        .enumerate()
        .map(|(index, (synapse, &is_bound))| {
            if is_bound {
                report.synapses_replaced += 1;
                synapse.with_fault(Arc::clone(&fault), index)
            } else {
                synapse
            }
        })
        .collect();
    network.replace_synapses(replacement)?;

    log::info!(
        "Applied {} radiation: {} of {} synapses share a fault with {} events",
        spec.effect_kind(),
        report.synapses_replaced,
        network.num_synapses(),
        report.events_scheduled
    );
    Ok(report)
}

fn injection_probability(spec: &FaultSpec) -> Result<f64, SNNError> {
    match spec.rate() {
        EffectRate::Probability(p) => Ok(p),
        EffectRate::Count(n) => Err(SNNError::ConfigError(format!(
            "{} needs probability_per_step, found weight_increase_count={}",
            spec.effect_kind(),
            n
        ))),
    }
}

fn excluded_set(excluded: &[String]) -> HashSet<&str> {
    excluded.iter().map(String::as_str).collect()
}

fn is_target(node: &Node, excluded: &HashSet<&str>) -> bool {
    !node.is_random_spiker() && !excluded.contains(node.name())
}

/// A random spiker dedicated to one element, seeded with the radiation seed shifted by the
/// position of that element, and named after the effect, the seed and the element.
fn synthetic_source(
    spec: &FaultSpec,
    label: &str,
    probability: f64,
    seed: u64,
    index: usize,
) -> Result<Node, SNNError> {
    let spiker = RandomSpiker::build(
        probability,
        SOURCE_AMPLITUDE,
        seed.wrapping_add(index as u64),
    )?;
    Ok(Node::random_spiker(
        format!("rad_{}_{}_{}", spec.effect_kind(), seed, label),
        spiker,
    ))
}

fn check_names<N: Network>(network: &N, additions: &[Addition]) -> Result<(), SNNError> {
    let mut new_names = HashSet::new();
    for addition in additions {
        let name = addition.source.name();
        if network.node_index(name).is_some() || !new_names.insert(name) {
            return Err(SNNError::InvalidParameter(format!(
                "Synthetic source {} clashes with an existing node",
                name
            )));
        }
    }
    Ok(())
}

/// Append the additions to the network. Name clashes are checked before anything is appended.
fn commit<N: Network>(
    spec: &FaultSpec,
    network: &mut N,
    additions: Vec<Addition>,
) -> Result<InjectionReport, SNNError> {
    check_names(network, &additions)?;

    let mut report = InjectionReport::default();
    let mut synapses = Vec::new();
    for addition in additions {
        network.add_node(addition.source)?;
        report.sources_added += 1;
        synapses.extend(addition.synapses);
    }
    for synapse in synapses {
        network.add_synapse(synapse)?;
        report.synapses_added += 1;
    }

    log::info!(
        "Applied {} radiation: {} synthetic sources and {} synapses added",
        spec.effect_kind(),
        report.sources_added,
        report.synapses_added
    );
    Ok(report)
}
