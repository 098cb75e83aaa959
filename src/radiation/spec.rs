//! Fault specifications: which radiation effect to simulate, and how strongly.
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::SNNError;
use crate::radiation::hasher::{digest, sha256_hex};

/// The radiation effects that can be simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Random perturbation of the membrane current of neurons.
    #[serde(rename = "change_u")]
    ChangeCurrent,
    /// Neurons stop spiking after a (random) strongly inhibiting event.
    #[serde(rename = "neuron_death")]
    NeuronDeath,
    /// Neurons randomly emit spikes to their neighbours.
    #[serde(rename = "rand_neuron_spike")]
    RandomNeuronSpike,
    /// Synapses randomly transmit spikes.
    #[serde(rename = "rand_synapse_spike")]
    RandomSynapseSpike,
    /// Synaptic weights randomly increase.
    #[serde(rename = "change_synaptic_weight")]
    SynapticWeightIncrease,
}

impl EffectKind {
    pub const ALL: [EffectKind; 5] = [
        EffectKind::ChangeCurrent,
        EffectKind::NeuronDeath,
        EffectKind::RandomNeuronSpike,
        EffectKind::RandomSynapseSpike,
        EffectKind::SynapticWeightIncrease,
    ];

    /// The configuration name of the effect.
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::ChangeCurrent => "change_u",
            EffectKind::NeuronDeath => "neuron_death",
            EffectKind::RandomNeuronSpike => "rand_neuron_spike",
            EffectKind::RandomSynapseSpike => "rand_synapse_spike",
            EffectKind::SynapticWeightIncrease => "change_synaptic_weight",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EffectKind {
    type Err = SNNError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                SNNError::ConfigError(format!(
                    "effect_kind {} is not implemented, expected one of: {}",
                    s,
                    EffectKind::ALL.iter().join(", ")
                ))
            })
    }
}

/// How often a radiation effect occurs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectRate {
    /// Probability, per time step, that each injected source fires.
    Probability(f64),
    /// Number of discrete weight-increase events over the simulation horizon.
    Count(u64),
}

/// The configuration surface of a fault, as written in experiment files.
///
/// Exactly one of `probability_per_step` and `weight_increase_count` must be set; the check
/// happens when converting into a [`FaultSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaultConfig {
    pub amplitude: f64,
    pub effect_kind: String,
    pub excitatory: bool,
    pub inhibitory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability_per_step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_increase_count: Option<u64>,
}

/// A validated, immutable radiation fault model.
#[derive(Debug, Clone, PartialEq)]
pub struct FaultSpec {
    amplitude: f64,
    effect_kind: EffectKind,
    excitatory: bool,
    inhibitory: bool,
    rate: EffectRate,
}

impl FaultSpec {
    /// Create a new fault specification.
    ///
    /// Returns an error if the amplitude is not finite, if the probability is not in [0, 1] or
    /// if a weight-increase count is given for another effect than synaptic weight increase.
    ///
    /// # Examples
    ///
    /// ```
    /// use snn_radiation::radiation::spec::{EffectKind, EffectRate, FaultSpec};
    ///
    /// let kind = EffectKind::NeuronDeath;
    /// let spec = FaultSpec::build(5.0, kind, true, false, EffectRate::Probability(0.5)).unwrap();
    /// assert_eq!(spec.identity_digest(), spec.identity_digest());
    ///
    /// assert!(FaultSpec::build(5.0, kind, true, false, EffectRate::Probability(1.5)).is_err());
    /// ```
    pub fn build(
        amplitude: f64,
        effect_kind: EffectKind,
        excitatory: bool,
        inhibitory: bool,
        rate: EffectRate,
    ) -> Result<Self, SNNError> {
        if !amplitude.is_finite() {
            return Err(SNNError::ConfigError(format!(
                "amplitude of {} must be finite, found {}",
                effect_kind, amplitude
            )));
        }

        match rate {
            EffectRate::Probability(p) if !(0.0..=1.0).contains(&p) => {
                return Err(SNNError::ConfigError(format!(
                    "probability_per_step of {} must be in [0, 1], found {}",
                    effect_kind, p
                )));
            }
            EffectRate::Count(n) if effect_kind != EffectKind::SynapticWeightIncrease => {
                return Err(SNNError::ConfigError(format!(
                    "weight_increase_count={} is only valid for {}, found {}",
                    n,
                    EffectKind::SynapticWeightIncrease,
                    effect_kind
                )));
            }
            _ => {}
        }

        Ok(FaultSpec {
            amplitude,
            effect_kind,
            excitatory,
            inhibitory,
            rate,
        })
    }

    /// Load and validate a fault configuration from a JSON file.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, SNNError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: FaultConfig = serde_json::from_reader(reader)
            .map_err(|e| SNNError::ConfigError(format!("unreadable fault configuration: {}", e)))?;
        FaultSpec::try_from(config)
    }

    /// Magnitude of the effect, e.g., the weight of the synapses of the injected sources.
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn effect_kind(&self) -> EffectKind {
        self.effect_kind
    }

    pub fn excitatory(&self) -> bool {
        self.excitatory
    }

    pub fn inhibitory(&self) -> bool {
        self.inhibitory
    }

    pub fn rate(&self) -> EffectRate {
        self.rate
    }

    /// The probability per time step, if the fault is parametrized by a probability.
    pub fn probability(&self) -> Option<f64> {
        match self.rate {
            EffectRate::Probability(p) => Some(p),
            EffectRate::Count(_) => None,
        }
    }

    /// The number of weight-increase events, if the fault is parametrized by a count.
    pub fn weight_increase_count(&self) -> Option<u64> {
        match self.rate {
            EffectRate::Probability(_) => None,
            EffectRate::Count(n) => Some(n),
        }
    }

    /// Returns the configuration the specification can be rebuilt from.
    pub fn config(&self) -> FaultConfig {
        FaultConfig {
            amplitude: self.amplitude,
            effect_kind: self.effect_kind.as_str().to_string(),
            excitatory: self.excitatory,
            inhibitory: self.inhibitory,
            probability_per_step: self.probability(),
            weight_increase_count: self.weight_increase_count(),
        }
    }

    /// Returns the digest of the field values of the specification.
    ///
    /// The `(field, value)` pairs are sorted by field name and serialized as a JSON array before
    /// hashing. The rate field that is not in use is serialized as `null`.
    pub fn identity_digest(&self) -> String {
        let fields: Vec<(&str, Value)> = vec![
            ("amplitude", json!(self.amplitude)),
            ("effect_kind", json!(self.effect_kind.as_str())),
            ("excitatory", json!(self.excitatory)),
            ("inhibitory", json!(self.inhibitory)),
            ("probability_per_step", json!(self.probability())),
            ("weight_increase_count", json!(self.weight_increase_count())),
        ];
        let sorted = fields
            .into_iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .collect::<Vec<_>>();
        let json = serde_json::to_string(&sorted).expect("Fault fields always serialize to JSON");
        sha256_hex(json.as_bytes())
    }

    /// Returns the fingerprint of an experiment run: the digest of the affected element names,
    /// the specification digest and the seed, independently of the order of the names.
    pub fn fingerprint<S: AsRef<str>>(&self, element_names: &[S], seed: u64) -> String {
        let mut values: Vec<String> = element_names
            .iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        values.push(self.identity_digest());
        values.push(seed.to_string());
        digest(&values)
    }

    /// A human-readable prefix for the files produced by an experiment run.
    pub fn file_stem(&self) -> String {
        let rate = match self.rate {
            EffectRate::Probability(p) => format!("prob:{}", p),
            EffectRate::Count(n) => format!("count:{}", n),
        };
        format!(
            "{}_ex:{}_in_h:{}_{}_",
            self.effect_kind, self.excitatory, self.amplitude, rate
        )
    }
}

impl TryFrom<FaultConfig> for FaultSpec {
    type Error = SNNError;

    fn try_from(config: FaultConfig) -> Result<Self, Self::Error> {
        let effect_kind = EffectKind::from_str(&config.effect_kind)?;
        let rate = match (config.probability_per_step, config.weight_increase_count) {
            (Some(p), None) => EffectRate::Probability(p),
            (None, Some(n)) => EffectRate::Count(n),
            (None, None) => {
                return Err(SNNError::ConfigError(format!(
                    "{} needs either probability_per_step or weight_increase_count",
                    effect_kind
                )))
            }
            (Some(p), Some(n)) => {
                return Err(SNNError::ConfigError(format!(
                    "{} can not use both probability_per_step={} and weight_increase_count={}",
                    effect_kind, p, n
                )))
            }
        };
        FaultSpec::build(
            config.amplitude,
            effect_kind,
            config.excitatory,
            config.inhibitory,
            rate,
        )
    }
}
