use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use snn_radiation::core::network::{Network, SimNetwork};
use snn_radiation::core::node::NodeKind;
use snn_radiation::radiation::injector::{apply_radiation, apply_weight_increase};
use snn_radiation::radiation::sampler::AffectedSet;
use snn_radiation::radiation::spec::{EffectKind, EffectRate, FaultSpec};

/// A random network of LIF neurons named `n0`, `n1`, ...
fn rand_network(num_neurons: usize, num_synapses: usize, seed: u64) -> SimNetwork {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut network = SimNetwork::new();
    for i in 0..num_neurons {
        network
            .create_lif(&format!("n{}", i), 1.0, 0.0, 1.0, 0.0)
            .unwrap();
    }
    for _ in 0..num_synapses {
        let pre = rng.gen_range(0..num_neurons);
        let post = rng.gen_range(0..num_neurons);
        network
            .create_synapse(
                &format!("n{}", pre),
                &format!("n{}", post),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(1..5),
            )
            .unwrap();
    }
    network
}

fn probability_spec(
    amplitude: f64,
    effect_kind: EffectKind,
    excitatory: bool,
    inhibitory: bool,
    p: f64,
) -> FaultSpec {
    FaultSpec::build(
        amplitude,
        effect_kind,
        excitatory,
        inhibitory,
        EffectRate::Probability(p),
    )
    .unwrap()
}

fn spike_trains(network: &SimNetwork, duration: usize) -> Vec<Vec<bool>> {
    network
        .nodes()
        .iter()
        .filter_map(|node| match node.kind() {
            NodeKind::RandomSpiker(spiker) => Some(spiker.spike_train(duration)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_injection_is_deterministic() {
    let excluded = vec!["n3".to_string(), "n17".to_string()];
    for effect_kind in [
        EffectKind::ChangeCurrent,
        EffectKind::NeuronDeath,
        EffectKind::RandomNeuronSpike,
        EffectKind::RandomSynapseSpike,
    ] {
        let spec = probability_spec(-3.0, effect_kind, false, true, 0.05);

        let mut first = rand_network(30, 120, 42);
        let mut second = rand_network(30, 120, 42);
        let report_first = apply_radiation(&spec, 1234, &mut first, &excluded).unwrap();
        let report_second = apply_radiation(&spec, 1234, &mut second, &excluded).unwrap();

        assert_eq!(report_first, report_second);
        assert_eq!(first, second);
        assert_eq!(spike_trains(&first, 1000), spike_trains(&second, 1000));
    }
}

#[test]
fn test_excluded_neurons_are_never_sources_targets() {
    let excluded = vec!["n0".to_string(), "n5".to_string()];
    let spec = probability_spec(-1000.0, EffectKind::NeuronDeath, false, true, 0.01);
    let mut network = rand_network(10, 30, 3);
    let original = network.num_synapses();

    let report = apply_radiation(&spec, 0, &mut network, &excluded).unwrap();
    assert_eq!(report.sources_added, 8);
    for synapse in &network.synapses()[original..] {
        assert!(!excluded.iter().any(|e| e == synapse.post()));
        assert_eq!(synapse.weight(), -1000.0);
    }
}

#[test]
fn test_synapse_spike_skips_excluded_presynaptic_neurons() {
    let excluded = vec!["n1".to_string()];
    let spec = probability_spec(1.0, EffectKind::RandomSynapseSpike, true, false, 0.2);
    let mut network = rand_network(8, 40, 9);
    let expected = network
        .synapses()
        .iter()
        .filter(|synapse| synapse.pre() != "n1")
        .count();

    let report = apply_radiation(&spec, 5, &mut network, &excluded).unwrap();
    assert_eq!(report.sources_added, expected);
    assert_eq!(report.synapses_added, expected);
}

#[test]
fn test_original_elements_keep_their_order() {
    let spec = probability_spec(1.0, EffectKind::RandomNeuronSpike, true, false, 0.5);
    let mut network = rand_network(12, 50, 8);
    let before = network.clone();

    apply_radiation(&spec, 77, &mut network, &[]).unwrap();
    assert_eq!(&network.nodes()[..before.num_nodes()], before.nodes());
    assert_eq!(&network.synapses()[..before.num_synapses()], before.synapses());
}

#[test]
fn test_sources_have_independent_streams() {
    let spec = probability_spec(1.0, EffectKind::ChangeCurrent, true, false, 0.5);
    let mut network = rand_network(5, 0, 0);
    apply_radiation(&spec, 99, &mut network, &[]).unwrap();

    let trains = spike_trains(&network, 256);
    assert_eq!(trains.len(), 5);
    for (i, a) in trains.iter().enumerate() {
        for b in trains.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_sequential_passes_are_deterministic() {
    let passes = [
        (probability_spec(0.5, EffectKind::ChangeCurrent, true, false, 0.1), 1),
        (probability_spec(0.5, EffectKind::ChangeCurrent, true, false, 0.1), 2),
        (probability_spec(1.0, EffectKind::RandomSynapseSpike, true, false, 0.3), 1),
    ];
    let irradiate = || {
        let mut network = rand_network(15, 40, 6);
        for (spec, seed) in &passes {
            apply_radiation(spec, *seed, &mut network, &[]).unwrap();
        }
        network
    };

    let network = irradiate();
    assert_eq!(network, irradiate());
    // two change_u passes, then one source per original synapse
    assert_eq!(network.num_nodes(), 15 + 15 + 15 + 40);
}

#[test]
fn test_fingerprint_identifies_the_run() {
    let spec = probability_spec(-100.0, EffectKind::NeuronDeath, false, true, 0.1);
    let network = rand_network(40, 0, 1);

    let a = AffectedSet::select(&network, &spec, 0.25, 17, &[]).unwrap();
    let b = AffectedSet::select(&network.clone(), &spec, 0.25, 17, &[]).unwrap();
    let c = AffectedSet::select(&network, &spec, 0.25, 18, &[]).unwrap();

    assert_eq!(a.len(), 10);
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
}

#[test]
fn test_irradiated_network_save_load() {
    let spec = FaultSpec::build(
        0.2,
        EffectKind::SynapticWeightIncrease,
        true,
        false,
        EffectRate::Count(10),
    )
    .unwrap();
    let mut network = rand_network(6, 12, 4);
    apply_weight_increase(&spec, 3, &mut network, &[], 40).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("irradiated.json");
    network.save_to(&path).unwrap();
    let loaded = SimNetwork::load_from(&path).unwrap();

    assert_eq!(loaded, network);
    let total_events: usize = loaded
        .synapses()
        .iter()
        .enumerate()
        .map(|(i, synapse)| {
            let binding = synapse.fault().unwrap();
            assert_eq!(binding.index(), i);
            binding.behaviour().events(i).len()
        })
        .sum();
    assert_eq!(total_events, 10);
}
