//! Octavia (load-balancer v2 API) client over blocking HTTP.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use super::error::{CloudError, CloudResult};
use super::keystone::{self, Session};
use super::profile::CloudProfile;
use super::{CloudClient, LoadBalancerStub, PoolStub};
use crate::types::{Member, OperatingStatus, ProvisioningStatus, display_name};

pub const SERVICE_TYPE: &str = "load-balancer";

/// Upper bound on pages followed for a single listing.
const MAX_PAGES: usize = 1000;
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Deserialize)]
struct RawLoadBalancer {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    operating_status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPool {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMember {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    provisioning_status: Option<String>,
    #[serde(default)]
    operating_status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
    rel: String,
}

/// Authenticated client bound to one load-balancer endpoint.
pub struct OctaviaClient {
    http: Client,
    endpoint: String,
    token: String,
}

/// Octavia serves its API under `/v2`; catalogs usually list the bare root.
pub fn api_root(catalog_url: &str) -> String {
    let base = catalog_url.trim_end_matches('/');
    if base.ends_with("/v2") || base.ends_with("/v2.0") {
        base.to_string()
    } else {
        format!("{base}/v2")
    }
}

pub fn http_client(profile: &CloudProfile, timeout: Duration) -> CloudResult<Client> {
    let mut builder = Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!("lbtree/", env!("CARGO_PKG_VERSION")));

    if let Some(path) = &profile.cacert {
        let pem = std::fs::read(path).map_err(|e| {
            CloudError::config(format!("failed to read CA bundle {}: {e}", path.display()))
        })?;
        let cert = reqwest::Certificate::from_pem(&pem)?;
        builder = builder.add_root_certificate(cert);
    }
    if profile.insecure {
        builder = builder.danger_accept_invalid_certs(true);
    }
    Ok(builder.build()?)
}

impl OctaviaClient {
    pub fn new(http: Client, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: api_root(&endpoint.into()),
            token: token.into(),
        }
    }

    /// Authenticate against Keystone and bind to the catalog's load-balancer
    /// endpoint for the profile's region and interface.
    pub fn connect(profile: &CloudProfile, timeout: Duration) -> CloudResult<Self> {
        let http = http_client(profile, timeout)?;
        let Session { token, catalog } = keystone::authenticate(&http, profile)?;
        let endpoint = keystone::find_endpoint(
            &catalog,
            SERVICE_TYPE,
            profile.interface,
            profile.region_name.as_deref(),
        )?;
        debug!(%endpoint, "using load-balancer endpoint");
        Ok(Self::new(http, endpoint, token))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn get_json(&self, url: &str) -> CloudResult<Value> {
        trace!(%url, "GET");
        let response = self
            .http
            .get(url)
            .header("X-Auth-Token", &self.token)
            .header("Accept", "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().unwrap_or_default().trim().to_string();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
                body.push('…');
            }
            return Err(CloudError::Api {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }
        response.json().map_err(|e| CloudError::decode(url, e))
    }

    /// GET `url` and every `<key>_links` "next" page after it.
    fn list_all<T: DeserializeOwned>(&self, url: String, key: &str) -> CloudResult<Vec<T>> {
        let links_key = format!("{key}_links");
        let mut items = Vec::new();
        let mut next = Some(url);
        let mut pages = 0;

        while let Some(url) = next.take() {
            pages += 1;
            if pages > MAX_PAGES {
                return Err(CloudError::decode(&url, "pagination did not terminate"));
            }
            let mut body = self.get_json(&url)?;
            let page = body
                .get_mut(key)
                .map(Value::take)
                .ok_or_else(|| CloudError::decode(&url, format!("missing '{key}' field")))?;
            let page: Vec<T> =
                serde_json::from_value(page).map_err(|e| CloudError::decode(&url, e))?;
            let fetched = page.len();
            items.extend(page);

            let links: Vec<Link> = body
                .get_mut(&links_key)
                .map(Value::take)
                .map(serde_json::from_value)
                .transpose()
                .map_err(|e| CloudError::decode(&url, e))?
                .unwrap_or_default();
            next = links
                .into_iter()
                .find(|link| link.rel == "next")
                .map(|link| link.href)
                .filter(|href| *href != url && fetched > 0);
        }
        Ok(items)
    }
}

impl CloudClient for OctaviaClient {
    fn list_load_balancers(&self, project_id: Option<&str>) -> CloudResult<Vec<LoadBalancerStub>> {
        let mut url = format!("{}/lbaas/loadbalancers", self.endpoint);
        if let Some(project_id) = project_id {
            url.push_str("?project_id=");
            url.push_str(&urlencoding::encode(project_id));
        }
        let raw: Vec<RawLoadBalancer> = self.list_all(url, "loadbalancers")?;
        Ok(raw
            .into_iter()
            .map(|lb| LoadBalancerStub {
                name: display_name(lb.name.as_deref(), &lb.id),
                operating_status: OperatingStatus::parse(lb.operating_status.as_deref()),
                id: lb.id,
            })
            .collect())
    }

    fn list_pools(&self, load_balancer_id: &str) -> CloudResult<Vec<PoolStub>> {
        let url = format!(
            "{}/lbaas/pools?loadbalancer_id={}",
            self.endpoint,
            urlencoding::encode(load_balancer_id)
        );
        let raw: Vec<RawPool> = self.list_all(url, "pools")?;
        Ok(raw
            .into_iter()
            .map(|pool| PoolStub {
                name: display_name(pool.name.as_deref(), &pool.id),
                id: pool.id,
            })
            .collect())
    }

    fn list_members(&self, pool_id: &str) -> CloudResult<Vec<Member>> {
        let url = format!(
            "{}/lbaas/pools/{}/members",
            self.endpoint,
            urlencoding::encode(pool_id)
        );
        let raw: Vec<RawMember> = self.list_all(url, "members")?;
        Ok(raw
            .into_iter()
            .map(|member| Member {
                name: display_name(member.name.as_deref(), &member.id),
                provisioning_status: ProvisioningStatus::parse(
                    member.provisioning_status.as_deref(),
                ),
                operating_status: OperatingStatus::parse(member.operating_status.as_deref()),
                id: member.id,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_root_appends_version_once() {
        assert_eq!(api_root("https://lb:9876"), "https://lb:9876/v2");
        assert_eq!(api_root("https://lb:9876/"), "https://lb:9876/v2");
        assert_eq!(api_root("https://lb:9876/v2"), "https://lb:9876/v2");
        assert_eq!(
            api_root("https://lb/load-balancer/v2.0/"),
            "https://lb/load-balancer/v2.0"
        );
    }
}
