use crate::common::{KnapsackConfig, KnapsackError, KnapsackItem, KnapsackResult, KnapsackSolution, ScaleInfo};
use ndarray::Array2;
use tracing::debug;

/// 0/1 knapsack over real-valued costs.
///
/// The budget axis is rescaled so the table never exceeds
/// `max_capacity_slots + 1` columns, and only the `max_candidates` densest
/// items are considered. Both are deliberate approximations: the result is
/// optimal for the scaled, truncated instance, not for the original one.
/// Rounding can make a scaled-feasible selection overshoot the real budget;
/// the lowest-value items are then evicted one at a time until the real sum
/// of the selection fits.
pub struct ScaledKnapsackSolver {
    pub config: KnapsackConfig,
}

impl ScaledKnapsackSolver {
    pub fn new(config: KnapsackConfig) -> Self {
        Self { config }
    }

    pub fn solve(&self, items: &[KnapsackItem], budget: f64) -> KnapsackResult<KnapsackSolution> {
        if !budget.is_finite() || budget <= 0.0 {
            return Err(KnapsackError::InvalidBudget(budget));
        }
        if self.config.max_capacity_slots == 0 {
            return Err(KnapsackError::InvalidConfig("max_capacity_slots must be at least 1".to_string()));
        }

        // 1. Feasible pool: positive cost that fits the whole budget on its own
        let mut pool: Vec<usize> = (0..items.len())
            .filter(|&i| {
                let cost = items[i].cost;
                cost.is_finite() && cost > 0.0 && cost <= budget
            })
            .collect();
        let feasible = pool.len();

        // 2. Greedy pre-filter by value density
        pool.sort_by(|&a, &b| items[b].density().total_cmp(&items[a].density()));
        pool.truncate(self.config.max_candidates);

        // 3. Dynamic scale
        let factor = (budget / self.config.max_capacity_slots as f64).max(1.0);
        let capacity = (budget / factor).floor() as usize;
        let scale = ScaleInfo {
            factor,
            capacity,
            feasible,
            candidates: pool.len(),
        };

        debug!(
            budget,
            factor,
            capacity,
            feasible,
            candidates = pool.len(),
            "knapsack table configured"
        );

        if pool.is_empty() {
            return Ok(KnapsackSolution::empty(scale));
        }

        // Nothing is free: every candidate occupies at least one slot
        let scaled_costs: Vec<usize> = pool
            .iter()
            .map(|&i| ((items[i].cost / factor).floor() as usize).max(1))
            .collect();

        // 4. DP with rolling value rows and a full choice table
        let n = pool.len();
        let mut take = Array2::<bool>::from_elem((n, capacity + 1), false);
        let mut prev = vec![0u64; capacity + 1];
        let mut curr = vec![0u64; capacity + 1];

        for (row, &item_idx) in pool.iter().enumerate() {
            let cost = scaled_costs[row];
            let value = items[item_idx].value;

            for w in 0..=capacity {
                curr[w] = prev[w];
                if cost <= w {
                    let with_item = prev[w - cost] + value;
                    if with_item > prev[w] {
                        curr[w] = with_item;
                        take[[row, w]] = true;
                    }
                }
            }
            std::mem::swap(&mut prev, &mut curr);
        }

        // 5. Reconstruction
        let mut chosen: Vec<usize> = Vec::new();
        let mut w = capacity;
        for row in (0..n).rev() {
            if take[[row, w]] {
                chosen.push(pool[row]);
                w -= scaled_costs[row];
            }
        }

        // 6. Repair against real costs. The total is re-summed over `selected`
        // in its final order after every eviction, so it is exactly what a
        // caller summing the selection gets.
        chosen.sort_by(|&a, &b| items[b].value.cmp(&items[a].value));
        let real_cost = |chosen: &[usize]| chosen.iter().map(|&i| items[i].cost).sum::<f64>();
        let mut total_cost = real_cost(&chosen);
        let mut evicted = 0;
        while total_cost > budget && chosen.pop().is_some() {
            total_cost = real_cost(&chosen);
            evicted += 1;
        }
        if evicted > 0 {
            debug!(evicted, total_cost, budget, "selection repaired to fit real budget");
        }

        let total_value = chosen.iter().map(|&i| items[i].value).sum();

        Ok(KnapsackSolution {
            selected: chosen,
            total_cost,
            total_value,
            scale,
            evicted,
        })
    }
}
