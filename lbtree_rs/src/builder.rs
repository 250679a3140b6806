//! Tree builder: walks the cloud listings into a load balancer → pool →
//! member hierarchy.
//!
//! Traversal is sequential and depth-first, so children keep the order the
//! service returned. Pool and member listing failures stay local to their
//! node; only the initial load balancer listing can fail the whole build.

use tracing::{debug, warn};

use crate::cloud::{CloudClient, CloudResult, LoadBalancerStub, PoolStub, describe};
use crate::filter;
use crate::types::{DisplayMode, Fetch, LoadBalancer, Pool};

/// Receives fetch progress; used for the CLI spinner.
pub trait FetchObserver {
    fn load_balancers_listed(&self, _count: usize) {}
    fn fetching_pools(&self, _load_balancer: &LoadBalancerStub) {}
    fn fetching_members(&self, _pool: &PoolStub) {}
}

impl FetchObserver for () {}

/// Build the hierarchy for `mode`.
///
/// Members are never requested in collapse modes, and in filter+collapse
/// mode a load balancer that is ONLINE is not expanded at all.
pub fn build_tree<C: CloudClient + ?Sized>(
    client: &C,
    project_id: Option<&str>,
    mode: DisplayMode,
    observer: &dyn FetchObserver,
) -> CloudResult<Vec<LoadBalancer>> {
    let stubs = client.list_load_balancers(project_id)?;
    debug!(
        count = stubs.len(),
        project = project_id.unwrap_or("-"),
        "listed load balancers"
    );
    observer.load_balancers_listed(stubs.len());

    Ok(stubs
        .into_iter()
        .map(|stub| {
            let pools = if filter::passes_load_balancer_gate(mode, &stub.operating_status) {
                observer.fetching_pools(&stub);
                fetch_pools(client, &stub, mode, observer)
            } else {
                debug!(load_balancer = %stub.id, "ONLINE in filter+collapse mode, not expanded");
                Fetch::Skipped
            };
            LoadBalancer {
                id: stub.id,
                name: stub.name,
                operating_status: stub.operating_status,
                pools,
            }
        })
        .collect())
}

fn fetch_pools<C: CloudClient + ?Sized>(
    client: &C,
    load_balancer: &LoadBalancerStub,
    mode: DisplayMode,
    observer: &dyn FetchObserver,
) -> Fetch<Pool> {
    let stubs = match client.list_pools(&load_balancer.id) {
        Ok(stubs) => stubs,
        Err(err) => {
            let message = describe(&err);
            warn!(load_balancer = %load_balancer.id, error = %message, "failed to list pools");
            return Fetch::Failed(message);
        }
    };
    debug!(load_balancer = %load_balancer.id, count = stubs.len(), "listed pools");

    let pools = stubs
        .into_iter()
        .map(|stub| {
            let members = if mode.fetches_members() {
                observer.fetching_members(&stub);
                match client.list_members(&stub.id) {
                    Ok(members) => {
                        debug!(pool = %stub.id, count = members.len(), "listed members");
                        Fetch::Loaded(members)
                    }
                    Err(err) => {
                        let message = describe(&err);
                        warn!(pool = %stub.id, error = %message, "failed to list members");
                        Fetch::Failed(message)
                    }
                }
            } else {
                Fetch::Skipped
            };
            Pool {
                id: stub.id,
                name: stub.name,
                members,
            }
        })
        .collect();
    Fetch::Loaded(pools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::memory::{Call, MemoryCloud};
    use std::cell::Cell;

    fn cloud() -> MemoryCloud {
        MemoryCloud::new()
            .load_balancer("lb1", "ONLINE")
            .pool("lb1", "p1")
            .member("p1", "m1", "ACTIVE", "ONLINE")
            .member("p1", "m2", "PENDING_CREATE", "OFFLINE")
            .pool("lb1", "p2")
            .load_balancer("lb2", "OFFLINE")
            .pool("lb2", "p3")
    }

    #[test]
    fn normal_mode_fetches_everything_in_order() {
        let cloud = cloud();
        let tree = build_tree(&cloud, None, DisplayMode::Normal, &()).expect("tree");

        assert_eq!(tree.len(), 2);
        let pools = tree[0].pools.loaded().expect("pools");
        assert_eq!(pools.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), ["p1", "p2"]);
        let members = pools[0].members.loaded().expect("members");
        assert_eq!(members.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(), ["m1", "m2"]);
        assert_eq!(pools[1].members, Fetch::Loaded(vec![]));

        assert_eq!(
            cloud.calls(),
            vec![
                Call::LoadBalancers(None),
                Call::Pools("lb1".into()),
                Call::Members("p1".into()),
                Call::Members("p2".into()),
                Call::Pools("lb2".into()),
                Call::Members("p3".into()),
            ]
        );
    }

    #[test]
    fn collapse_mode_never_lists_members() {
        for mode in [DisplayMode::Collapse, DisplayMode::FilterCollapse] {
            let cloud = cloud();
            let tree = build_tree(&cloud, None, mode, &()).expect("tree");
            assert_eq!(cloud.member_calls(), 0, "{mode:?}");
            for lb in &tree {
                for pool in lb.pools.loaded().unwrap_or_default() {
                    assert_eq!(pool.members, Fetch::Skipped);
                }
            }
        }
    }

    #[test]
    fn filter_collapse_does_not_expand_online_load_balancers() {
        let cloud = cloud();
        let tree = build_tree(&cloud, None, DisplayMode::FilterCollapse, &()).expect("tree");

        assert_eq!(tree[0].pools, Fetch::Skipped);
        assert!(tree[1].pools.loaded().is_some());
        assert!(!cloud.calls().contains(&Call::Pools("lb1".into())));
    }

    #[test]
    fn pool_listing_failure_is_node_local() {
        let cloud = cloud().failing("lb1");
        let tree = build_tree(&cloud, None, DisplayMode::Normal, &()).expect("tree");

        assert!(matches!(&tree[0].pools, Fetch::Failed(msg) if msg.contains("503")));
        assert!(tree[1].pools.loaded().is_some());
    }

    #[test]
    fn member_listing_failure_is_node_local() {
        let cloud = cloud().failing("p1");
        let tree = build_tree(&cloud, None, DisplayMode::Filter, &()).expect("tree");

        let pools = tree[0].pools.loaded().expect("pools");
        assert!(matches!(pools[0].members, Fetch::Failed(_)));
        assert_eq!(pools[1].members, Fetch::Loaded(vec![]));
    }

    #[test]
    fn listing_failure_is_fatal() {
        let cloud = cloud().failing_listing();
        assert!(build_tree(&cloud, None, DisplayMode::Normal, &()).is_err());
    }

    #[test]
    fn project_scope_is_forwarded() {
        let cloud = MemoryCloud::new()
            .project_load_balancer("alpha", "lb-a", "ONLINE")
            .project_load_balancer("beta", "lb-b", "ONLINE");
        let tree = build_tree(&cloud, Some("beta"), DisplayMode::Collapse, &()).expect("tree");

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, "lb-b");
        assert_eq!(cloud.calls()[0], Call::LoadBalancers(Some("beta".into())));
    }

    #[test]
    fn observer_sees_every_fetch() {
        #[derive(Default)]
        struct Counting {
            listed: Cell<usize>,
            pools: Cell<usize>,
            members: Cell<usize>,
        }
        impl FetchObserver for Counting {
            fn load_balancers_listed(&self, count: usize) {
                self.listed.set(count);
            }
            fn fetching_pools(&self, _: &LoadBalancerStub) {
                self.pools.set(self.pools.get() + 1);
            }
            fn fetching_members(&self, _: &PoolStub) {
                self.members.set(self.members.get() + 1);
            }
        }

        let observer = Counting::default();
        build_tree(&cloud(), None, DisplayMode::Normal, &observer).expect("tree");
        assert_eq!(observer.listed.get(), 2);
        assert_eq!(observer.pools.get(), 2);
        assert_eq!(observer.members.get(), 3);
    }
}
