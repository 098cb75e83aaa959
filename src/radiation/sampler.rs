//! Deterministic selection of the elements affected by radiation.
use rand::seq::index;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use serde::{Deserialize, Serialize};

use crate::core::network::Network;
use crate::error::SNNError;
use crate::radiation::hasher::digest;
use crate::radiation::spec::FaultSpec;

/// Returns `floor(total_count * fraction)` distinct positions in `[0, total_count)`, drawn
/// uniformly without replacement and sorted in increasing order.
///
/// The same arguments always yield the same positions.
///
/// # Examples
///
/// ```
/// use snn_radiation::radiation::sampler::sample;
///
/// let positions = sample(10, 0.3, 42).unwrap();
/// assert_eq!(positions.len(), 3);
/// assert_eq!(positions, sample(10, 0.3, 42).unwrap());
/// ```
pub fn sample(total_count: usize, fraction: f64, seed: u64) -> Result<Vec<usize>, SNNError> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(SNNError::ConfigError(format!(
            "Fraction of affected elements must be in [0, 1], found {}",
            fraction
        )));
    }
    let target = (total_count as f64 * fraction).floor() as usize;
    sample_count(total_count, target.min(total_count), seed)
}

/// Returns `count` distinct positions in `[0, total_count)`, drawn uniformly without replacement
/// and sorted in increasing order.
pub fn sample_count(total_count: usize, count: usize, seed: u64) -> Result<Vec<usize>, SNNError> {
    if count > total_count {
        return Err(SNNError::ConfigError(format!(
            "Can not select {} distinct elements out of {}",
            count, total_count
        )));
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut positions = index::sample(&mut rng, total_count, count).into_vec();
    positions.sort_unstable();
    Ok(positions)
}

/// The elements selected for a fault, with what is needed to reproduce the selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectedSet {
    names: Vec<String>,
    seed: u64,
    spec_digest: String,
}

impl AffectedSet {
    pub fn new(names: Vec<String>, spec: &FaultSpec, seed: u64) -> Self {
        AffectedSet {
            names,
            seed,
            spec_digest: spec.identity_digest(),
        }
    }

    /// Select a fraction of the candidates. The selected names keep the candidate order.
    pub fn sample_names<S: AsRef<str>>(
        candidates: &[S],
        spec: &FaultSpec,
        fraction: f64,
        seed: u64,
    ) -> Result<Self, SNNError> {
        let names = sample(candidates.len(), fraction, seed)?
            .into_iter()
            .map(|position| candidates[position].as_ref().to_string())
            .collect();
        Ok(AffectedSet::new(names, spec, seed))
    }

    /// Select a fraction of the nodes of a network, ignoring the excluded ones.
    pub fn select<N: Network>(
        network: &N,
        spec: &FaultSpec,
        fraction: f64,
        seed: u64,
        excluded: &[String],
    ) -> Result<Self, SNNError> {
        let candidates: Vec<&str> = network
            .nodes()
            .iter()
            .map(|node| node.name())
            .filter(|name| !excluded.iter().any(|e| e == name))
            .collect();
        AffectedSet::sample_names(&candidates, spec, fraction, seed)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn spec_digest(&self) -> &str {
        &self.spec_digest
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// The experiment fingerprint: the digest of the affected names, the specification digest
    /// and the seed.
    pub fn fingerprint(&self) -> String {
        let mut values = self.names.clone();
        values.push(self.spec_digest.clone());
        values.push(self.seed.to_string());
        digest(&values)
    }
}
