//! Periodic-review inventory control with random demand.
//!
//! Each period the manager observes the stock `s`, orders `a` units with
//! `s + a <= capacity`, and demand `d` is then drawn. Sales are
//! `min(s + a, d)`, unmet demand is lost, and the next stock is
//! `max(0, s + a - d)`.

use orkit_stats::expectation;
use tracing::debug;

use crate::error::MdpError;
use crate::model::{FiniteMdp, MdpBuilder, ROW_TOLERANCE, StateAction};

/// Parameters of the inventory model.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use orkit_mdp::InventoryConfig;
///
/// let config = InventoryConfig::new()
///     .with_capacity(6)
///     .with_demand(vec![0.1, 0.2, 0.4, 0.2, 0.1])
///     .with_discount(0.95);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct InventoryConfig {
    capacity: usize,
    demand: Vec<f64>,
    unit_revenue: f64,
    fixed_order_cost: f64,
    unit_cost: f64,
    extra_unit_cost: f64,
    shortage_cost: f64,
    holding_cost: f64,
    discount: f64,
}

impl InventoryConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: capacity 4, demand uniform over 0..=3, revenue 300 000 per
    /// unit sold, fixed order cost 100 000, unit cost 25 000, extra cost
    /// 75 000 per unit beyond the first, shortage 60 000 per unit, holding
    /// 40 000 per unit left over, discount 0.9.
    pub fn new() -> Self {
        Self {
            capacity: 4,
            demand: vec![0.25; 4],
            unit_revenue: 300_000.0,
            fixed_order_cost: 100_000.0,
            unit_cost: 25_000.0,
            extra_unit_cost: 75_000.0,
            shortage_cost: 60_000.0,
            holding_cost: 40_000.0,
            discount: 0.9,
        }
    }

    /// Sets the maximum stock level.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the demand distribution; `demand[d]` is the probability of `d` units.
    pub fn with_demand(mut self, demand: Vec<f64>) -> Self {
        self.demand = demand;
        self
    }

    /// Sets the revenue per unit sold.
    pub fn with_unit_revenue(mut self, value: f64) -> Self {
        self.unit_revenue = value;
        self
    }

    /// Sets the fixed cost charged whenever something is ordered.
    pub fn with_fixed_order_cost(mut self, value: f64) -> Self {
        self.fixed_order_cost = value;
        self
    }

    /// Sets the variable cost per unit ordered.
    pub fn with_unit_cost(mut self, value: f64) -> Self {
        self.unit_cost = value;
        self
    }

    /// Sets the extra cost per unit ordered beyond the first.
    pub fn with_extra_unit_cost(mut self, value: f64) -> Self {
        self.extra_unit_cost = value;
        self
    }

    /// Sets the penalty per unit of unmet demand.
    pub fn with_shortage_cost(mut self, value: f64) -> Self {
        self.shortage_cost = value;
        self
    }

    /// Sets the cost per unit carried into the next period.
    pub fn with_holding_cost(mut self, value: f64) -> Self {
        self.holding_cost = value;
        self
    }

    /// Sets the discount factor.
    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    /// Returns the maximum stock level.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the demand distribution.
    pub fn demand(&self) -> &[f64] {
        &self.demand
    }

    /// Returns the discount factor.
    pub fn discount(&self) -> f64 {
        self.discount
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MdpError::InvalidDiscount`], [`MdpError::EmptyDemand`],
    /// [`MdpError::InvalidProbability`] or [`MdpError::DemandNotNormalised`].
    pub fn validate(&self) -> Result<(), MdpError> {
        if !(0.0..1.0).contains(&self.discount) {
            return Err(MdpError::InvalidDiscount {
                value: self.discount,
            });
        }
        if self.demand.is_empty() {
            return Err(MdpError::EmptyDemand);
        }
        if let Some(&bad) = self.demand.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(MdpError::InvalidProbability { value: bad });
        }
        let sum: f64 = self.demand.iter().sum();
        if (sum - 1.0).abs() > ROW_TOLERANCE {
            return Err(MdpError::DemandNotNormalised { sum });
        }
        Ok(())
    }

    /// Profit of one period: order `order` with `available = s + order` on
    /// hand when `demand` units are requested.
    pub fn profit(&self, available: usize, order: usize, demand: usize) -> f64 {
        let sold = available.min(demand);
        let short = demand.saturating_sub(available);
        let left = available.saturating_sub(demand);
        let fixed = if order > 0 { self.fixed_order_cost } else { 0.0 };
        let cost = fixed
            + self.unit_cost * order as f64
            + self.extra_unit_cost * order.saturating_sub(1) as f64
            + self.shortage_cost * short as f64
            + self.holding_cost * left as f64;
        self.unit_revenue * sold as f64 - cost
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the inventory MDP.
///
/// States are stock levels `0..=capacity`; the action is the order size.
/// Pairs are indexed state-major, actions ascending.
///
/// # Errors
///
/// Returns the [`InventoryConfig::validate`] errors.
#[tracing::instrument(skip_all, fields(capacity = config.capacity))]
pub fn build_inventory_mdp(config: &InventoryConfig) -> Result<FiniteMdp, MdpError> {
    config.validate()?;
    let n_states = config.capacity + 1;
    let mut builder = MdpBuilder::new(n_states, config.discount)?;

    for stock in 0..n_states {
        for order in 0..n_states - stock {
            let pair = StateAction::new(stock, order);
            let available = stock + order;
            let profits: Vec<f64> = (0..config.demand.len())
                .map(|d| config.profit(available, order, d))
                .collect();
            builder.add_reward(pair, expectation(&profits, &config.demand))?;
            for (d, &p) in config.demand.iter().enumerate() {
                builder.add_transition(pair, available.saturating_sub(d), p)?;
            }
        }
    }

    let mdp = builder.build()?;
    debug!(n_pairs = mdp.pairs().len(), "inventory MDP built");
    Ok(mdp)
}
