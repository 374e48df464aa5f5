use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Quota value conventionally meaning "no posting limit".
pub const UNLIMITED_POSTS: u32 = 9999;

/// Identifier wrapper for subscription plans.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlanId(pub String);

impl PlanId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// One subscription tier. Plans are defined at deploy time and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub display_name: String,
    pub monthly_post_limit: u32,
    pub price_usd: u32,
}

impl Plan {
    pub fn is_unlimited(&self) -> bool {
        self.monthly_post_limit >= UNLIMITED_POSTS
    }
}

/// Static table mapping plan identifiers to posting quotas.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: BTreeMap<PlanId, Plan>,
}

impl PlanCatalog {
    /// Catalog shipped with the service: a free tier plus two paid tiers.
    pub fn standard() -> Self {
        Self::with_plans(vec![
            Plan {
                id: PlanId::new("buzz"),
                display_name: "Buzz Plan (Free)".to_string(),
                monthly_post_limit: 2,
                price_usd: 0,
            },
            Plan {
                id: PlanId::new("sting"),
                display_name: "Sting Plan".to_string(),
                monthly_post_limit: 10,
                price_usd: 49,
            },
            Plan {
                id: PlanId::new("swarm"),
                display_name: "Swarm Plan".to_string(),
                monthly_post_limit: UNLIMITED_POSTS,
                price_usd: 199,
            },
        ])
    }

    pub fn with_plans(plans: Vec<Plan>) -> Self {
        let plans = plans.into_iter().map(|plan| (plan.id.clone(), plan));
        Self {
            plans: plans.collect(),
        }
    }

    pub fn get(&self, id: &PlanId) -> Option<&Plan> {
        self.plans.get(id)
    }

    /// The cheapest tier, assigned to new employer accounts by default.
    pub fn free_tier(&self) -> &Plan {
        self.plans
            .values()
            .min_by_key(|plan| plan.price_usd)
            .expect("catalog contains at least one plan")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plan> {
        self.plans.values()
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
