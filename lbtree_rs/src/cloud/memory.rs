//! In-memory [`CloudClient`] with call accounting and injectable failures.
//!
//! Backs the unit and integration tests of the builder/filter/renderer
//! pipeline without any network.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::error::{CloudError, CloudResult};
use super::{CloudClient, LoadBalancerStub, PoolStub};
use crate::types::{Member, OperatingStatus, ProvisioningStatus};

/// Which listing call was made, with its argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    LoadBalancers(Option<String>),
    Pools(String),
    Members(String),
}

#[derive(Default)]
pub struct MemoryCloud {
    load_balancers: Vec<(Option<String>, LoadBalancerStub)>,
    pools: HashMap<String, Vec<PoolStub>>,
    members: HashMap<String, Vec<Member>>,
    failing: HashSet<String>,
    fail_listing: bool,
    calls: RefCell<Vec<Call>>,
}

impl MemoryCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_balancer(mut self, id: &str, operating_status: &str) -> Self {
        self.load_balancers.push((
            None,
            LoadBalancerStub {
                id: id.to_string(),
                name: id.to_string(),
                operating_status: OperatingStatus::parse(Some(operating_status)),
            },
        ));
        self.pools.entry(id.to_string()).or_default();
        self
    }

    /// Same as [`MemoryCloud::load_balancer`] but owned by `project_id`.
    pub fn project_load_balancer(
        mut self,
        project_id: &str,
        id: &str,
        operating_status: &str,
    ) -> Self {
        self = self.load_balancer(id, operating_status);
        if let Some(last) = self.load_balancers.last_mut() {
            last.0 = Some(project_id.to_string());
        }
        self
    }

    pub fn pool(mut self, load_balancer_id: &str, pool_id: &str) -> Self {
        self.pools
            .entry(load_balancer_id.to_string())
            .or_default()
            .push(PoolStub {
                id: pool_id.to_string(),
                name: pool_id.to_string(),
            });
        self.members.entry(pool_id.to_string()).or_default();
        self
    }

    pub fn member(
        mut self,
        pool_id: &str,
        member_id: &str,
        provisioning: &str,
        operating: &str,
    ) -> Self {
        self.members
            .entry(pool_id.to_string())
            .or_default()
            .push(Member {
                id: member_id.to_string(),
                name: member_id.to_string(),
                provisioning_status: ProvisioningStatus::parse(Some(provisioning)),
                operating_status: OperatingStatus::parse(Some(operating)),
            });
        self
    }

    /// Make the pool listing (for a load balancer id) or member listing
    /// (for a pool id) fail.
    pub fn failing(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn member_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Members(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn unavailable(id: &str) -> CloudError {
        CloudError::Api {
            status: 503,
            url: format!("memory://{id}"),
            body: "service unavailable".to_string(),
        }
    }
}

impl CloudClient for MemoryCloud {
    fn list_load_balancers(&self, project_id: Option<&str>) -> CloudResult<Vec<LoadBalancerStub>> {
        self.record(Call::LoadBalancers(project_id.map(str::to_string)));
        if self.fail_listing {
            return Err(CloudError::Auth("token expired".to_string()));
        }
        Ok(self
            .load_balancers
            .iter()
            .filter(|(owner, _)| match project_id {
                Some(wanted) => owner.as_deref() == Some(wanted),
                None => true,
            })
            .map(|(_, lb)| lb.clone())
            .collect())
    }

    fn list_pools(&self, load_balancer_id: &str) -> CloudResult<Vec<PoolStub>> {
        self.record(Call::Pools(load_balancer_id.to_string()));
        if self.failing.contains(load_balancer_id) {
            return Err(Self::unavailable(load_balancer_id));
        }
        self.pools
            .get(load_balancer_id)
            .cloned()
            .ok_or_else(|| CloudError::Api {
                status: 404,
                url: format!("memory://{load_balancer_id}"),
                body: "load balancer not found".to_string(),
            })
    }

    fn list_members(&self, pool_id: &str) -> CloudResult<Vec<Member>> {
        self.record(Call::Members(pool_id.to_string()));
        if self.failing.contains(pool_id) {
            return Err(Self::unavailable(pool_id));
        }
        self.members
            .get(pool_id)
            .cloned()
            .ok_or_else(|| CloudError::Api {
                status: 404,
                url: format!("memory://{pool_id}"),
                body: "pool not found".to_string(),
            })
    }
}
