//! Recovery probability and infection lookup table.

use sirnet_types::{Result, SimulationError};

/// Per-step transition probabilities.
///
/// The infection table is an opaque lookup: entry `k` is the probability that
/// a susceptible node with exactly `k` infectious neighbours becomes infectious
/// during one step. It must cover every `k` up to the graph's maximum degree.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTables {
    recovery_probability: f64,
    infection_probability: Vec<f64>,
    max_degree: usize,
}

impl ProbabilityTables {
    /// Validate and build the tables for a graph of the given maximum degree.
    ///
    /// Fails with `InvalidProbability` if any value lies outside `[0, 1]`
    /// (NaN included) or if the infection table has fewer than
    /// `max_degree + 1` entries. Extra trailing entries are kept but can never
    /// be looked up.
    pub fn validate(
        recovery_probability: f64,
        infection_probability: Vec<f64>,
        max_degree: usize,
    ) -> Result<Self> {
        check_probability("recovery probability", recovery_probability)?;

        for (k, &p) in infection_probability.iter().enumerate() {
            check_probability(&format!("infection probability[{k}]"), p)?;
        }

        if infection_probability.len() < max_degree + 1 {
            return Err(SimulationError::InvalidProbability(format!(
                "infection table has {} entries, graph needs {} (max degree {max_degree})",
                infection_probability.len(),
                max_degree + 1
            )));
        }

        Ok(Self {
            recovery_probability,
            infection_probability,
            max_degree,
        })
    }

    /// Probability that an infectious node recovers in one step.
    pub fn recovery_probability(&self) -> f64 {
        self.recovery_probability
    }

    /// Probability that a susceptible node with `infected_degree` infectious
    /// neighbours becomes infectious in one step.
    ///
    /// Fails with `OutOfRange` if `infected_degree` exceeds the maximum degree
    /// the tables were validated against.
    pub fn infection_chance(&self, infected_degree: usize) -> Result<f64> {
        if infected_degree > self.max_degree {
            return Err(SimulationError::OutOfRange {
                infected_degree,
                max_degree: self.max_degree,
            });
        }
        self.infection_probability
            .get(infected_degree)
            .copied()
            .ok_or(SimulationError::OutOfRange {
                infected_degree,
                max_degree: self.max_degree,
            })
    }

    /// Check if a node with no infectious neighbour can still be infected.
    ///
    /// When this is false an epidemic with no infectious node is frozen.
    pub fn allows_spontaneous_infection(&self) -> bool {
        self.infection_probability
            .first()
            .is_some_and(|&p| p > 0.0)
    }

    /// The raw infection table.
    pub fn infection_probability(&self) -> &[f64] {
        &self.infection_probability
    }

    /// Maximum degree the tables were validated against.
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }
}

fn check_probability(what: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(SimulationError::InvalidProbability(format!(
            "{what} = {p} is not in [0, 1]"
        )))
    }
}
