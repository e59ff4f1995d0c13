//! Classical optimizer seam.
//!
//! General-purpose optimizers (COBYLA, Nelder-Mead, SPSA, ...) come from
//! external numerical libraries; implement [`Optimizer`] to plug one in.
//! [`GridSearch`] is bundled because a two-parameter QAOA landscape is
//! small enough to scan directly, and the scan doubles as a data set.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{PaintshopError, PaintshopResult};

/// Outcome of a minimization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Best parameters found.
    pub optimal_params: Vec<f64>,
    /// Objective value at `optimal_params`.
    pub optimal_value: f64,
    /// Number of objective evaluations.
    pub num_evaluations: usize,
    /// Every evaluated point with its objective value, in evaluation order.
    pub history: Vec<(Vec<f64>, f64)>,
}

/// Minimizes a fallible objective.
pub trait Optimizer {
    /// Minimize `objective` starting from `initial_params`.
    fn minimize<F>(
        &self,
        objective: F,
        initial_params: Vec<f64>,
    ) -> PaintshopResult<OptimizationResult>
    where
        F: FnMut(&[f64]) -> PaintshopResult<f64>;
}

/// Box constraints on `(γ, β)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterBounds {
    /// Minimum γ.
    pub gamma_min: f64,
    /// Maximum γ.
    pub gamma_max: f64,
    /// Minimum β.
    pub beta_min: f64,
    /// Maximum β.
    pub beta_max: f64,
}

impl Default for ParameterBounds {
    /// One period of the single-block landscape for integer couplings.
    fn default() -> Self {
        Self {
            gamma_min: 0.0,
            gamma_max: PI,
            beta_min: 0.0,
            beta_max: PI / 2.0,
        }
    }
}

impl ParameterBounds {
    /// Clip a `[γ, β]` pair into the box.
    pub fn clip(&self, params: &mut [f64]) {
        if let [gamma, beta, ..] = params {
            *gamma = gamma.clamp(self.gamma_min, self.gamma_max);
            *beta = beta.clamp(self.beta_min, self.beta_max);
        }
    }

    fn validate(&self) -> PaintshopResult<()> {
        if self.gamma_min > self.gamma_max || self.beta_min > self.beta_max {
            return Err(PaintshopError::Optimizer(format!(
                "empty bounds: gamma [{}, {}], beta [{}, {}]",
                self.gamma_min, self.gamma_max, self.beta_min, self.beta_max
            )));
        }
        Ok(())
    }
}

/// Rectangular scan over `(γ, β)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSearch {
    /// Box to scan.
    pub bounds: ParameterBounds,
    /// Number of γ values (endpoints included).
    pub gamma_steps: usize,
    /// Number of β values (endpoints included).
    pub beta_steps: usize,
}

impl Default for GridSearch {
    fn default() -> Self {
        Self {
            bounds: ParameterBounds::default(),
            gamma_steps: 12,
            beta_steps: 8,
        }
    }
}

impl GridSearch {
    /// Create a grid scan with default bounds.
    pub fn new(gamma_steps: usize, beta_steps: usize) -> Self {
        Self {
            gamma_steps,
            beta_steps,
            ..Self::default()
        }
    }

    /// Set the bounds.
    pub fn with_bounds(mut self, bounds: ParameterBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// All grid points, γ-major.
    pub fn points(&self) -> Vec<[f64; 2]> {
        let gammas = linspace(self.bounds.gamma_min, self.bounds.gamma_max, self.gamma_steps);
        let betas = linspace(self.bounds.beta_min, self.bounds.beta_max, self.beta_steps);
        gammas
            .iter()
            .flat_map(|&g| betas.iter().map(move |&b| [g, b]))
            .collect()
    }
}

fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        n => (0..n)
            .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

impl Optimizer for GridSearch {
    /// Evaluates `initial_params` (if non-empty) and then every grid point.
    ///
    /// Ties keep the earliest point.
    fn minimize<F>(
        &self,
        mut objective: F,
        initial_params: Vec<f64>,
    ) -> PaintshopResult<OptimizationResult>
    where
        F: FnMut(&[f64]) -> PaintshopResult<f64>,
    {
        self.bounds.validate()?;
        if self.gamma_steps == 0 || self.beta_steps == 0 {
            return Err(PaintshopError::Optimizer(
                "grid needs at least one step per axis".into(),
            ));
        }
        if !initial_params.is_empty() && initial_params.len() != 2 {
            return Err(PaintshopError::Optimizer(format!(
                "grid search optimizes (gamma, beta), got {} initial parameters",
                initial_params.len()
            )));
        }

        let candidates = (!initial_params.is_empty())
            .then_some(initial_params)
            .into_iter()
            .chain(self.points().into_iter().map(|p| p.to_vec()));

        let mut history: Vec<(Vec<f64>, f64)> = Vec::new();
        let mut best: Option<usize> = None;

        for params in candidates {
            let value = objective(&params)?;
            tracing::trace!(?params, value, "grid point evaluated");
            if best.is_none_or(|i| value < history[i].1) {
                best = Some(history.len());
            }
            history.push((params, value));
        }

        let best = best.ok_or_else(|| PaintshopError::Optimizer("nothing evaluated".into()))?;
        let (optimal_params, optimal_value) = history[best].clone();

        Ok(OptimizationResult {
            optimal_params,
            optimal_value,
            num_evaluations: history.len(),
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_grid_points_gamma_major() {
        let grid = GridSearch::new(2, 3).with_bounds(ParameterBounds {
            gamma_min: 0.0,
            gamma_max: 1.0,
            beta_min: 0.0,
            beta_max: 2.0,
        });
        let points = grid.points();
        assert_eq!(points.len(), 6);
        assert_eq!(points[0], [0.0, 0.0]);
        assert_eq!(points[2], [0.0, 2.0]);
        assert_eq!(points[3], [1.0, 0.0]);
    }

    #[test]
    fn test_grid_finds_quadratic_minimum() {
        let grid = GridSearch::new(11, 11).with_bounds(ParameterBounds {
            gamma_min: 0.0,
            gamma_max: 1.0,
            beta_min: 0.0,
            beta_max: 1.0,
        });
        let result = grid
            .minimize(
                |p| Ok((p[0] - 0.3).powi(2) + (p[1] - 0.7).powi(2)),
                vec![],
            )
            .unwrap();
        assert_eq!(result.num_evaluations, 121);
        assert!((result.optimal_params[0] - 0.3).abs() < 1e-9);
        assert!((result.optimal_params[1] - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_initial_point_evaluated_first() {
        let grid = GridSearch::new(2, 2);
        let result = grid.minimize(|_| Ok(1.0), vec![0.1, 0.2]).unwrap();
        assert_eq!(result.num_evaluations, 5);
        assert_eq!(result.history[0].0, vec![0.1, 0.2]);
        // Constant objective: the first point wins.
        assert_eq!(result.optimal_params, vec![0.1, 0.2]);
    }

    #[test]
    fn test_objective_error_propagates() {
        let grid = GridSearch::new(2, 2);
        let err = grid
            .minimize(|_| Err(PaintshopError::Sampler("offline".into())), vec![])
            .unwrap_err();
        assert!(matches!(err, PaintshopError::Sampler(_)));
    }

    #[test]
    fn test_rejects_bad_configuration() {
        assert!(GridSearch::new(0, 3).minimize(|_| Ok(0.0), vec![]).is_err());
        assert!(GridSearch::new(2, 2).minimize(|_| Ok(0.0), vec![1.0]).is_err());
        let inverted = GridSearch::new(2, 2).with_bounds(ParameterBounds {
            gamma_min: 1.0,
            gamma_max: 0.0,
            ..ParameterBounds::default()
        });
        assert!(inverted.minimize(|_| Ok(0.0), vec![]).is_err());
    }

    #[test]
    fn test_clip() {
        let bounds = ParameterBounds::default();
        let mut params = vec![-1.0, 10.0];
        bounds.clip(&mut params);
        assert_eq!(params, vec![0.0, PI / 2.0]);
    }
}
