//! Neuron death by threshold: dead neurons get a firing threshold they never reach.
use crate::core::network::Network;
use crate::core::DEATH_THRESHOLD;
use crate::error::SNNError;
use crate::radiation::sampler::AffectedSet;
use crate::radiation::spec::{EffectKind, FaultSpec};

/// Kill a fraction of the LIF neurons of a network, ignoring the excluded ones.
///
/// Every selected neuron is marked as dead and its threshold is set to [`DEATH_THRESHOLD`];
/// every other neuron is marked as alive. Returns the selected neurons.
pub fn inject_neuron_death<N: Network>(
    network: &mut N,
    spec: &FaultSpec,
    fraction: f64,
    seed: u64,
    excluded: &[String],
) -> Result<AffectedSet, SNNError> {
    if spec.effect_kind() != EffectKind::NeuronDeath {
        return Err(SNNError::UnsupportedEffect(format!(
            "threshold-based death can not realize {}",
            spec.effect_kind()
        )));
    }

    let candidates: Vec<String> = network
        .nodes()
        .iter()
        .filter(|node| node.is_lif() && !excluded.iter().any(|e| e == node.name()))
        .map(|node| node.name().to_string())
        .collect();
    let affected = AffectedSet::sample_names(&candidates, spec, fraction, seed)?;

    let names: Vec<String> = network.nodes().iter().map(|node| node.name().to_string()).collect();
    for name in names {
        let dead = affected.contains(&name);
        if let Some(node) = network.node_mut(&name) {
            node.set_rad_death(dead);
        }
    }
    kill_neurons(network, affected.names())?;

    log::info!(
        "Killed {} of {} candidate neurons (fingerprint {})",
        affected.len(),
        candidates.len(),
        affected.fingerprint()
    );
    Ok(affected)
}

/// Set the threshold of the named neurons to [`DEATH_THRESHOLD`] and mark them as dead.
pub fn kill_neurons<N: Network>(network: &mut N, names: &[String]) -> Result<(), SNNError> {
    for name in names {
        let node = network.node_mut(name).ok_or_else(|| {
            SNNError::OutOfBounds(format!("Neuron {} not found in the network", name))
        })?;
        node.set_threshold(DEATH_THRESHOLD)?;
        node.set_rad_death(true);
        log::debug!("Neuron {} killed", name);
    }
    Ok(())
}

/// Check that the radiation effect was applied to every listed neuron.
pub fn verify_radiation_applied<N: Network>(
    network: &N,
    dead_names: &[String],
    effect_kind: EffectKind,
) -> Result<(), SNNError> {
    if effect_kind != EffectKind::NeuronDeath {
        return Err(SNNError::UnsupportedEffect(format!(
            "verification of {} is not supported",
            effect_kind
        )));
    }

    for name in dead_names {
        let node = network.node_ref(name).ok_or_else(|| {
            SNNError::PostconditionError(format!("dead neuron {} is not in the network", name))
        })?;
        if !node.rad_death() {
            return Err(SNNError::PostconditionError(format!(
                "neuron {} is listed as dead but not marked as such",
                name
            )));
        }
        if node.threshold() != Some(DEATH_THRESHOLD) {
            return Err(SNNError::PostconditionError(format!(
                "neuron {} is listed as dead but has threshold {:?}",
                name,
                node.threshold()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::network::SimNetwork;
    use crate::radiation::spec::EffectRate;

    fn network() -> SimNetwork {
        let mut network = SimNetwork::new();
        network.create_input_train("input", vec![true, false, true], false).unwrap();
        for i in 0..8 {
            network.create_lif(&format!("n{}", i), 1.0, 0.0, 1.0, 0.0).unwrap();
        }
        network
    }

    fn death_spec() -> FaultSpec {
        FaultSpec::build(
            -100.0,
            EffectKind::NeuronDeath,
            false,
            true,
            EffectRate::Probability(0.5),
        )
        .unwrap()
    }

    #[test]
    fn test_inject_neuron_death() {
        let mut network = network();
        let excluded = vec!["n0".to_string()];
        let affected = inject_neuron_death(&mut network, &death_spec(), 0.5, 4, &excluded).unwrap();

        assert_eq!(affected.len(), 3);
        assert!(!affected.contains("n0"));
        assert!(!affected.contains("input"));
        verify_radiation_applied(&network, affected.names(), EffectKind::NeuronDeath).unwrap();

        for node in network.nodes() {
            assert_eq!(node.rad_death(), affected.contains(node.name()));
            if !node.rad_death() && node.is_lif() {
                assert_eq!(node.threshold(), Some(1.0));
            }
        }
    }

    #[test]
    fn test_inject_neuron_death_is_deterministic() {
        let mut first = network();
        let mut second = network();
        let a = inject_neuron_death(&mut first, &death_spec(), 0.25, 12, &[]).unwrap();
        let b = inject_neuron_death(&mut second, &death_spec(), 0.25, 12, &[]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(first, second);
    }

    #[test]
    fn test_inject_neuron_death_requires_death_spec() {
        let spec = FaultSpec::build(
            1.0,
            EffectKind::ChangeCurrent,
            true,
            false,
            EffectRate::Probability(0.5),
        )
        .unwrap();
        assert!(matches!(
            inject_neuron_death(&mut network(), &spec, 0.5, 0, &[]),
            Err(SNNError::UnsupportedEffect(_))
        ));
    }

    #[test]
    fn test_verify_detects_missing_kill() {
        let mut network = network();
        kill_neurons(&mut network, &["n1".to_string()]).unwrap();
        let claimed = vec!["n1".to_string(), "n2".to_string()];
        assert!(matches!(
            verify_radiation_applied(&network, &claimed, EffectKind::NeuronDeath),
            Err(SNNError::PostconditionError(_))
        ));

        network.node_mut("n1").unwrap().set_threshold(2.0).unwrap();
        assert!(matches!(
            verify_radiation_applied(&network, &claimed[..1], EffectKind::NeuronDeath),
            Err(SNNError::PostconditionError(_))
        ));
    }

    #[test]
    fn test_verify_unsupported_effect() {
        assert!(matches!(
            verify_radiation_applied(&network(), &[], EffectKind::RandomSynapseSpike),
            Err(SNNError::UnsupportedEffect(_))
        ));
    }

    #[test]
    fn test_kill_unknown_neuron() {
        assert!(matches!(
            kill_neurons(&mut network(), &["ghost".to_string()]),
            Err(SNNError::OutOfBounds(_))
        ));
    }
}
