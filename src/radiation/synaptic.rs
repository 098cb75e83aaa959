//! Synaptic weight increases caused by radiation.
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use rand_distr::{Bernoulli, Distribution};
use serde::{Deserialize, Serialize};

use crate::error::SNNError;
use crate::radiation::hasher::digest;
use crate::radiation::sampler::sample_count;
use crate::radiation::spec::{EffectKind, EffectRate};

/// A schedule of weight-increase events shared by all the synapses of a network.
///
/// The schedule covers `horizon` time steps for each of `num_synapses` synapses. Each event
/// increases the weight of its synapse by `amplitude` from its time step onwards. Only the
/// synapses bound to the fault hold events.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SynapticFault {
    amplitude: f64,
    effect_kind: EffectKind,
    horizon: usize,
    num_synapses: usize,
    neuron_names: Vec<String>,
    rate: EffectRate,
    seed: u64,
    /// Time steps of the events, per synapse, in increasing order
    events: Vec<Vec<usize>>,
}

impl SynapticFault {
    /// Create the fault and draw its event schedule over the synapses flagged in `bound`.
    ///
    /// With a count, exactly that many (time step, bound synapse) slots are drawn without
    /// replacement. With a probability, every slot of a bound synapse holds an event
    /// independently, the stream of synapse `i` being seeded with `seed + i`.
    pub fn build(
        amplitude: f64,
        effect_kind: EffectKind,
        horizon: usize,
        bound: &[bool],
        neuron_names: Vec<String>,
        rate: EffectRate,
        seed: u64,
    ) -> Result<Self, SNNError> {
        if horizon == 0 {
            return Err(SNNError::ConfigError(format!(
                "{} needs a positive simulation horizon",
                effect_kind
            )));
        }

        let num_synapses = bound.len();
        let positions: Vec<usize> = (0..num_synapses).filter(|&i| bound[i]).collect();
        let mut events = vec![Vec::new(); num_synapses];
        match rate {
            EffectRate::Count(count) => {
                let num_slots = horizon.checked_mul(positions.len()).ok_or_else(|| {
                    SNNError::ConfigError(format!(
                        "{} time steps for {} synapses is too many slots",
                        horizon,
                        positions.len()
                    ))
                })?;
                let count = usize::try_from(count).map_err(|_| {
                    SNNError::ConfigError(format!("weight_increase_count={} is too large", count))
                })?;
                let slots = sample_count(num_slots, count, seed).map_err(|_| {
                    SNNError::ConfigError(format!(
                        "weight_increase_count={} exceeds the {} slots of {} bound synapses",
                        count,
                        num_slots,
                        positions.len()
                    ))
                })?;
                // slots are sorted, so the time steps of each synapse come in increasing order
                for slot in slots {
                    events[positions[slot / horizon]].push(slot % horizon);
                }
            }
            EffectRate::Probability(p) => {
                let bernoulli = Bernoulli::new(p).map_err(|e| {
                    SNNError::ConfigError(format!("probability_per_step={}: {}", p, e))
                })?;
                for &i in &positions {
                    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(i as u64));
                    events[i].extend((0..horizon).filter(|_| bernoulli.sample(&mut rng)));
                }
            }
        }

        log::debug!(
            "Synaptic fault scheduled {} weight increases over {} of {} synapses",
            events.iter().map(Vec::len).sum::<usize>(),
            positions.len(),
            num_synapses
        );

        Ok(SynapticFault {
            amplitude,
            effect_kind,
            horizon,
            num_synapses,
            neuron_names,
            rate,
            seed,
            events,
        })
    }

    /// Average weight increase per event.
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn effect_kind(&self) -> EffectKind {
        self.effect_kind
    }

    /// Number of simulated time steps covered by the schedule.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn num_synapses(&self) -> usize {
        self.num_synapses
    }

    pub fn neuron_names(&self) -> &[String] {
        &self.neuron_names
    }

    pub fn rate(&self) -> EffectRate {
        self.rate
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The time steps at which the weight of a synapse increases.
    pub fn events(&self, synapse_index: usize) -> &[usize] {
        self.events
            .get(synapse_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The total number of scheduled events.
    pub fn num_events(&self) -> usize {
        self.events.iter().map(Vec::len).sum()
    }

    /// The weight of a synapse at time step `t`, given its nominal weight.
    pub fn weight_at(&self, synapse_index: usize, base_weight: f64, t: usize) -> f64 {
        let num_increases = self
            .events(synapse_index)
            .partition_point(|&step| step <= t);
        base_weight + self.amplitude * num_increases as f64
    }

    /// Digest of the network and schedule parameters the fault was drawn for.
    pub fn fingerprint(&self) -> String {
        let mut values = self.neuron_names.clone();
        values.push(self.effect_kind.to_string());
        values.push(format!("horizon:{}", self.horizon));
        values.push(format!("synapses:{}", self.num_synapses));
        values.push(self.seed.to_string());
        digest(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn names() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    fn build(horizon: usize, bound: &[bool], rate: EffectRate, seed: u64) -> SynapticFault {
        SynapticFault::build(
            0.5,
            EffectKind::SynapticWeightIncrease,
            horizon,
            bound,
            names(),
            rate,
            seed,
        )
        .unwrap()
    }

    #[test]
    fn test_count_schedule() {
        let fault = build(100, &[true; 4], EffectRate::Count(25), 3);
        assert_eq!(fault.num_events(), 25);
        assert_eq!(fault.num_synapses(), 4);
        for i in 0..4 {
            assert!(fault.events(i).windows(2).all(|w| w[0] < w[1]));
            assert!(fault.events(i).iter().all(|&t| t < 100));
        }
        assert!(fault.events(4).is_empty());
    }

    #[test]
    fn test_count_lands_on_bound_synapses_only() {
        let fault = build(10, &[false, true, false], EffectRate::Count(7), 3);
        assert_eq!(fault.num_events(), 7);
        assert_eq!(fault.events(1).len(), 7);
        assert!(fault.events(0).is_empty());
        assert!(fault.events(2).is_empty());

        // a single bound synapse only offers `horizon` slots
        let fault = SynapticFault::build(
            0.5,
            EffectKind::SynapticWeightIncrease,
            10,
            &[false, true, false],
            names(),
            EffectRate::Count(11),
            3,
        );
        assert!(matches!(fault, Err(SNNError::ConfigError(_))));
    }

    #[test]
    fn test_count_exceeding_slots() {
        let fault = SynapticFault::build(
            0.5,
            EffectKind::SynapticWeightIncrease,
            10,
            &[true, true],
            names(),
            EffectRate::Count(21),
            3,
        );
        assert!(matches!(fault, Err(SNNError::ConfigError(_))));
    }

    #[test]
    fn test_zero_horizon() {
        let fault = SynapticFault::build(
            0.5,
            EffectKind::SynapticWeightIncrease,
            0,
            &[true, true],
            names(),
            EffectRate::Probability(0.5),
            3,
        );
        assert!(matches!(fault, Err(SNNError::ConfigError(_))));
    }

    #[test]
    fn test_probability_schedule_is_reproducible() {
        let draw = |seed| build(500, &[true; 3], EffectRate::Probability(0.1), seed);
        assert_eq!(draw(1), draw(1));
        assert_ne!(draw(1).events(0), draw(2).events(0));
        // synapse i of seed s shares its stream with synapse i - 1 of seed s + 1
        assert_eq!(draw(1).events(1), draw(2).events(0));
    }

    #[test]
    fn test_probability_streams_ignore_unbound_synapses() {
        let all = build(200, &[true; 3], EffectRate::Probability(0.3), 8);
        let some = build(200, &[true, false, true], EffectRate::Probability(0.3), 8);
        assert_eq!(some.events(0), all.events(0));
        assert!(some.events(1).is_empty());
        assert_eq!(some.events(2), all.events(2));
    }

    #[test]
    fn test_probability_extremes() {
        let always = build(20, &[true, true], EffectRate::Probability(1.0), 0);
        assert_eq!(always.num_events(), 40);

        let never = build(20, &[true, true], EffectRate::Probability(0.0), 0);
        assert_eq!(never.num_events(), 0);
    }

    #[test]
    fn test_weight_at_accumulates_increases() {
        let fault = SynapticFault::build(
            0.25,
            EffectKind::SynapticWeightIncrease,
            10,
            &[true],
            names(),
            EffectRate::Probability(1.0),
            0,
        )
        .unwrap();
        assert_relative_eq!(fault.weight_at(0, 2.0, 0), 2.25);
        assert_relative_eq!(fault.weight_at(0, 2.0, 3), 3.0);
        assert_relative_eq!(fault.weight_at(0, 2.0, 500), 4.5);
        assert_relative_eq!(fault.weight_at(7, 2.0, 500), 2.0);
    }

    #[test]
    fn test_fingerprint() {
        let draw = |seed| build(10, &[true], EffectRate::Count(2), seed);
        assert_eq!(draw(4).fingerprint(), draw(4).fingerprint());
        assert_ne!(draw(4).fingerprint(), draw(5).fingerprint());
    }
}
