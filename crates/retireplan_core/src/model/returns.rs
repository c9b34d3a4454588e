//! Return models and their samplers
//!
//! Annual models convert to a per-period scale for accumulation runs.

use rand::{Rng, distr::Distribution};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Distribution of per-period portfolio returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReturnModel {
    /// Every period returns exactly `rate`
    Fixed { rate: f64 },
    /// Independent normal draws
    Normal { mean: f64, std_dev: f64 },
}

impl Default for ReturnModel {
    fn default() -> Self {
        ReturnModel::Normal {
            mean: 0.08,
            std_dev: 0.15,
        }
    }
}

impl ReturnModel {
    #[must_use]
    pub fn mean(&self) -> f64 {
        match self {
            ReturnModel::Fixed { rate } => *rate,
            ReturnModel::Normal { mean, .. } => *mean,
        }
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        match self {
            ReturnModel::Fixed { .. } => 0.0,
            ReturnModel::Normal { std_dev, .. } => *std_dev,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            ReturnModel::Fixed { rate } => {
                if !rate.is_finite() {
                    return Err(ConfigError::NonFinite("return"));
                }
                if *rate <= -1.0 {
                    return Err(ConfigError::OutOfRange {
                        field: "return",
                        value: *rate,
                        reason: "a fixed return must be greater than -100%",
                    });
                }
            }
            ReturnModel::Normal { mean, std_dev } => {
                if !mean.is_finite() {
                    return Err(ConfigError::NonFinite("mean return"));
                }
                if !std_dev.is_finite() {
                    return Err(ConfigError::NonFinite("return volatility"));
                }
                if *std_dev < 0.0 {
                    return Err(ConfigError::NegativeVolatility(*std_dev));
                }
            }
        }
        Ok(())
    }

    /// Rescale annual parameters to a sub-annual period.
    ///
    /// The mean is geometrically de-compounded, `(1 + mean)^(1/n) - 1`, and
    /// the volatility follows the square-root-of-time rule, `std_dev / sqrt(n)`.
    #[must_use]
    pub fn per_period(&self, periods_per_year: u32) -> ReturnModel {
        let n = f64::from(periods_per_year.max(1));
        match self {
            ReturnModel::Fixed { rate } => ReturnModel::Fixed {
                rate: (1.0 + rate).powf(1.0 / n) - 1.0,
            },
            ReturnModel::Normal { mean, std_dev } => ReturnModel::Normal {
                mean: (1.0 + mean).powf(1.0 / n) - 1.0,
                std_dev: std_dev / n.sqrt(),
            },
        }
    }

    /// Build a sampler for this model. Parameters must already be validated.
    pub fn sampler(&self) -> Result<ReturnSampler, ConfigError> {
        self.validate()?;
        let inner = match self {
            ReturnModel::Fixed { rate } => SamplerKind::Fixed(*rate),
            ReturnModel::Normal { mean, std_dev } => SamplerKind::Normal(
                rand_distr::Normal::new(*mean, *std_dev)
                    .map_err(|_| ConfigError::NegativeVolatility(*std_dev))?,
            ),
        };
        Ok(ReturnSampler { inner })
    }
}

#[derive(Debug, Clone, Copy)]
enum SamplerKind {
    Fixed(f64),
    Normal(rand_distr::Normal<f64>),
}

/// Draws one return per call from a validated [`ReturnModel`].
#[derive(Debug, Clone, Copy)]
pub struct ReturnSampler {
    inner: SamplerKind,
}

impl ReturnSampler {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match &self.inner {
            SamplerKind::Fixed(rate) => *rate,
            SamplerKind::Normal(dist) => dist.sample(rng),
        }
    }
}

/// Convert a nominal return into a real one: `(1 + nominal) / (1 + inflation) - 1`
#[must_use]
#[inline]
pub fn real_return(nominal: f64, inflation: f64) -> f64 {
    (1.0 + nominal) / (1.0 + inflation) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_per_period_conversion() {
        let monthly = ReturnModel::Normal {
            mean: 0.08,
            std_dev: 0.12,
        }
        .per_period(12);

        let expected_mean = 1.08_f64.powf(1.0 / 12.0) - 1.0;
        assert!((monthly.mean() - expected_mean).abs() < 1e-15);
        assert!((monthly.std_dev() - 0.12 / 12.0_f64.sqrt()).abs() < 1e-15);

        // compounding the monthly mean back recovers the annual figure
        assert!(((1.0 + monthly.mean()).powi(12) - 1.08).abs() < 1e-12);
    }

    #[test]
    fn test_zero_volatility_returns_mean() {
        let sampler = ReturnModel::Normal {
            mean: 0.05,
            std_dev: 0.0,
        }
        .sampler()
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(sampler.sample(&mut rng), 0.05);
        }
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let sampler = ReturnModel::default().sampler().unwrap();
        let mut a = SmallRng::seed_from_u64(42);
        let mut b = SmallRng::seed_from_u64(42);
        let xs: Vec<f64> = (0..16).map(|_| sampler.sample(&mut a)).collect();
        let ys: Vec<f64> = (0..16).map(|_| sampler.sample(&mut b)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_sample_mean_close_to_parameter() {
        let sampler = ReturnModel::Normal {
            mean: 0.07,
            std_dev: 0.2,
        }
        .sampler()
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let n = 200_000;
        let mean = (0..n).map(|_| sampler.sample(&mut rng)).sum::<f64>() / n as f64;
        assert!((mean - 0.07).abs() < 0.003, "sample mean {mean}");
    }

    #[test]
    fn test_negative_volatility_rejected() {
        let model = ReturnModel::Normal {
            mean: 0.05,
            std_dev: -0.1,
        };
        assert_eq!(model.validate(), Err(ConfigError::NegativeVolatility(-0.1)));
        assert!(model.sampler().is_err());
    }

    #[test]
    fn test_real_return() {
        assert!((real_return(0.05, 0.0) - 0.05).abs() < 1e-15);
        assert!((real_return(0.0612, 0.02) - 0.04).abs() < 1e-12);
        assert!(real_return(0.02, 0.02).abs() < 1e-15);
    }
}
