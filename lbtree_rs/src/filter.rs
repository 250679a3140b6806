//! Display filter: prunes the fetched hierarchy according to the display mode.
//!
//! Pure functions only; the tree is consumed and the pruned tree returned in
//! input order.

use crate::types::{DisplayMode, Fetch, LoadBalancer, Member, OperatingStatus, Pool};

/// In filter+collapse mode only load balancers that are not ONLINE pass.
/// Every other mode lets all load balancers through at this stage.
pub fn passes_load_balancer_gate(mode: DisplayMode, operating_status: &OperatingStatus) -> bool {
    mode != DisplayMode::FilterCollapse || !operating_status.is_healthy()
}

/// Apply `mode` to a freshly built tree.
pub fn apply(tree: Vec<LoadBalancer>, mode: DisplayMode) -> Vec<LoadBalancer> {
    match mode {
        DisplayMode::Normal | DisplayMode::Collapse => tree,
        DisplayMode::FilterCollapse => tree
            .into_iter()
            .filter(|lb| passes_load_balancer_gate(mode, &lb.operating_status))
            .collect(),
        DisplayMode::Filter => tree.into_iter().filter_map(filter_load_balancer).collect(),
    }
}

/// Keep a load balancer if any pool survives, or if its pools could not be
/// listed (the error is itself worth showing).
fn filter_load_balancer(mut lb: LoadBalancer) -> Option<LoadBalancer> {
    match lb.pools {
        Fetch::Loaded(pools) => {
            let pools: Vec<Pool> = pools.into_iter().filter_map(filter_pool).collect();
            if pools.is_empty() {
                return None;
            }
            lb.pools = Fetch::Loaded(pools);
            Some(lb)
        }
        Fetch::Failed(_) => Some(lb),
        Fetch::Skipped => None,
    }
}

/// A pool is show-worthy when it is empty, has an unhealthy member, or its
/// members could not be listed. Healthy members are dropped.
fn filter_pool(mut pool: Pool) -> Option<Pool> {
    match pool.members {
        Fetch::Loaded(members) if members.is_empty() => {
            pool.members = Fetch::Loaded(members);
            Some(pool)
        }
        Fetch::Loaded(members) => {
            let unhealthy: Vec<Member> = members.into_iter().filter(|m| !m.is_healthy()).collect();
            if unhealthy.is_empty() {
                return None;
            }
            pool.members = Fetch::Loaded(unhealthy);
            Some(pool)
        }
        Fetch::Failed(_) => Some(pool),
        Fetch::Skipped => None,
    }
}
