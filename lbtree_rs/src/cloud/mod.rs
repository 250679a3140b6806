//! Cloud client adapter.
//!
//! The tree builder only talks to [`CloudClient`]; [`OctaviaClient`] is the
//! production implementation, authenticated through Keystone with a
//! [`CloudProfile`] resolved from `OS_*` variables or `clouds.yaml`.

pub mod error;
pub mod keystone;
#[doc(hidden)]
pub mod memory;
pub mod octavia;
pub mod profile;

pub use error::{CloudError, CloudResult, describe};
#[doc(hidden)]
pub use memory::MemoryCloud;
pub use octavia::OctaviaClient;
pub use profile::{CloudProfile, Interface};

use crate::types::{Member, OperatingStatus};

/// A load balancer as listed, before its pools are fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadBalancerStub {
    pub id: String,
    pub name: String,
    pub operating_status: OperatingStatus,
}

/// A pool as listed, before its members are fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolStub {
    pub id: String,
    pub name: String,
}

/// Read-only listing operations against the load-balancing service.
///
/// Results keep the order the service returned them in.
pub trait CloudClient {
    /// Load balancers in `project_id`, or in the client's token scope when `None`.
    fn list_load_balancers(&self, project_id: Option<&str>) -> CloudResult<Vec<LoadBalancerStub>>;

    fn list_pools(&self, load_balancer_id: &str) -> CloudResult<Vec<PoolStub>>;

    fn list_members(&self, pool_id: &str) -> CloudResult<Vec<Member>>;
}

impl<C: CloudClient + ?Sized> CloudClient for &C {
    fn list_load_balancers(&self, project_id: Option<&str>) -> CloudResult<Vec<LoadBalancerStub>> {
        (**self).list_load_balancers(project_id)
    }

    fn list_pools(&self, load_balancer_id: &str) -> CloudResult<Vec<PoolStub>> {
        (**self).list_pools(load_balancer_id)
    }

    fn list_members(&self, pool_id: &str) -> CloudResult<Vec<Member>> {
        (**self).list_members(pool_id)
    }
}
