//! Distance-based trip cost.

use serde::{Deserialize, Serialize};

/// Per-kilometer rate in currency units.
pub const PER_KM_RATE: f64 = 2.50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub cost_per_km: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            cost_per_km: PER_KM_RATE,
        }
    }
}

impl PricingConfig {
    /// Formula: `cost = distance_km * cost_per_km`
    pub fn cost_for(&self, distance_km: f64) -> f64 {
        distance_km * self.cost_per_km
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_scales_linearly_with_distance() {
        let pricing = PricingConfig::default();
        assert_eq!(pricing.cost_for(0.0), 0.0);
        assert!((pricing.cost_for(4.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn custom_rate_is_used() {
        let pricing = PricingConfig { cost_per_km: 1.2 };
        assert!((pricing.cost_for(10.0) - 12.0).abs() < 1e-12);
    }
}
