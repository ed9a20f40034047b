//! GA run configuration.
//!
//! All constants of both evolution variants live here so a broker can load
//! them from any serde format. Defaults reproduce the reference heuristic:
//! 100 generations, 0.5 crossover and mutation probabilities for the flat
//! variant; 100 chromosome-sets of 20 chromosomes, 10% elitism and a 0.45
//! mate threshold for the hierarchical variant.
//!
//! # Example
//!
//! ```
//! use ga_placement::config::{GaConfig, Representation};
//!
//! let config = GaConfig::default()
//!     .with_representation(Representation::Flat)
//!     .with_max_generations(50)
//!     .with_seed(42);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Chromosome encoding, which also selects the evolution variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// One gene per job. Rotation initializer + generational loop.
    #[default]
    Flat,
    /// One gene per worker. Shuffled block initializer + two-level loop.
    Grouped,
}

/// Configuration for a placement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Encoding / variant selector.
    pub representation: Representation,
    /// Generation cap of the flat loop.
    pub max_generations: usize,
    /// Per-trial probability of a worker swap between two parents.
    pub crossover_probability: f64,
    /// Per-generation probability of the fixed-worker mutation.
    pub mutation_probability: f64,
    /// Chromosomes carried unchanged into the next flat generation (0 = off).
    pub elite_count: usize,
    /// Seed for the run's random source. `None` = seeded from the OS.
    pub seed: Option<u64>,
    /// Evaluate population fitness on the rayon pool.
    pub parallel: bool,
    /// Settings of the two-level grouped variant.
    pub hierarchical: HierarchicalConfig,
}

/// Settings of the hierarchical (grouped) variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchicalConfig {
    /// Chromosome-sets in the outer population.
    pub set_count: usize,
    /// Grouped chromosomes per chromosome-set.
    pub chromosomes_per_set: usize,
    /// Cap on recorded running averages per level.
    pub max_generations: usize,
    /// Share of each sorted generation kept by elitism, in percent.
    pub elite_percent: usize,
    /// Draws below this keep parent A's entry, others parent B's.
    pub mate_threshold: f64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            representation: Representation::Flat,
            max_generations: 100,
            crossover_probability: 0.5,
            mutation_probability: 0.5,
            elite_count: 0,
            seed: None,
            parallel: false,
            hierarchical: HierarchicalConfig::default(),
        }
    }
}

impl Default for HierarchicalConfig {
    fn default() -> Self {
        Self {
            set_count: 100,
            chromosomes_per_set: 20,
            max_generations: 500,
            elite_percent: 10,
            mate_threshold: 0.45,
        }
    }
}

impl GaConfig {
    /// Sets the encoding.
    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    /// Sets the flat generation cap.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p;
        self
    }

    /// Sets the number of elite chromosomes kept per flat generation.
    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = count;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables parallel fitness evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Replaces the hierarchical settings.
    pub fn with_hierarchical(mut self, hierarchical: HierarchicalConfig) -> Self {
        self.hierarchical = hierarchical;
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_generations == 0 {
            return Err(SchedulerError::InvalidConfig(
                "max_generations must be at least 1".into(),
            ));
        }
        check_probability("crossover_probability", self.crossover_probability)?;
        check_probability("mutation_probability", self.mutation_probability)?;
        self.hierarchical.validate()
    }
}

impl HierarchicalConfig {
    /// Sets the outer population size.
    pub fn with_set_count(mut self, count: usize) -> Self {
        self.set_count = count;
        self
    }

    /// Sets the chromosome count per set.
    pub fn with_chromosomes_per_set(mut self, count: usize) -> Self {
        self.chromosomes_per_set = count;
        self
    }

    /// Sets the recorded-average cap.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.set_count == 0 || self.chromosomes_per_set == 0 {
            return Err(SchedulerError::InvalidConfig(
                "hierarchical population dimensions must be non-zero".into(),
            ));
        }
        if self.max_generations == 0 {
            return Err(SchedulerError::InvalidConfig(
                "hierarchical max_generations must be at least 1".into(),
            ));
        }
        if self.elite_percent > 100 {
            return Err(SchedulerError::InvalidConfig(format!(
                "elite_percent {} exceeds 100",
                self.elite_percent
            )));
        }
        check_probability("mate_threshold", self.mate_threshold)
    }
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(SchedulerError::InvalidConfig(format!(
            "{name} must lie in [0, 1], got {p}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = GaConfig::default();
        assert_eq!(c.representation, Representation::Flat);
        assert_eq!(c.max_generations, 100);
        assert!((c.crossover_probability - 0.5).abs() < 1e-10);
        assert!((c.mutation_probability - 0.5).abs() < 1e-10);
        assert_eq!(c.elite_count, 0);
        assert_eq!(c.hierarchical.set_count, 100);
        assert_eq!(c.hierarchical.chromosomes_per_set, 20);
        assert_eq!(c.hierarchical.max_generations, 500);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_invalid_probability() {
        let c = GaConfig::default().with_crossover_probability(1.5);
        assert!(matches!(c.validate(), Err(SchedulerError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_dimensions() {
        let c = GaConfig::default().with_max_generations(0);
        assert!(c.validate().is_err());

        let c = GaConfig::default()
            .with_hierarchical(HierarchicalConfig::default().with_set_count(0));
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let c: GaConfig = serde_json::from_str(
            r#"{"representation": "grouped", "seed": 7, "hierarchical": {"set_count": 10}}"#,
        )
        .unwrap();
        assert_eq!(c.representation, Representation::Grouped);
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.hierarchical.set_count, 10);
        assert_eq!(c.hierarchical.chromosomes_per_set, 20);
        assert_eq!(c.max_generations, 100);
    }
}
