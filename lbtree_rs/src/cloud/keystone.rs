//! Keystone v3 token issue and service-catalog lookup.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::error::{CloudError, CloudResult};
use super::profile::{AuthMethod, CloudProfile, DomainRef, Interface, ProjectScope, UserRef};

const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// An issued token plus the catalog that came with it.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub catalog: Vec<CatalogService>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogService {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEndpoint {
    pub interface: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub region_id: Option<String>,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct TokenEnvelope {
    token: TokenBody,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    catalog: Vec<CatalogService>,
    #[serde(default)]
    project: Option<ProjectInfo>,
}

#[derive(Debug, Deserialize)]
struct ProjectInfo {
    id: String,
}

/// `https://host:5000`, `https://host:5000/` and `https://host:5000/v3` all
/// yield the `/v3/auth/tokens` URL.
pub fn tokens_url(auth_url: &str) -> String {
    let base = auth_url.trim_end_matches('/');
    if base.ends_with("/v3") {
        format!("{base}/auth/tokens")
    } else {
        format!("{base}/v3/auth/tokens")
    }
}

fn domain_json(domain: &DomainRef) -> Value {
    match domain {
        DomainRef::Id(id) => json!({ "id": id }),
        DomainRef::Name(name) => json!({ "name": name }),
    }
}

/// The `POST /v3/auth/tokens` request body for a profile.
pub fn auth_request_body(auth: &AuthMethod) -> Value {
    match auth {
        AuthMethod::Password {
            user,
            password,
            project,
        } => {
            let user = match user {
                UserRef::Id(id) => json!({ "id": id, "password": password }),
                UserRef::Name { name, domain } => json!({
                    "name": name,
                    "domain": domain_json(domain),
                    "password": password,
                }),
            };
            let mut auth = json!({
                "identity": {
                    "methods": ["password"],
                    "password": { "user": user },
                }
            });
            if let Some(project) = project {
                let project = match project {
                    ProjectScope::Id(id) => json!({ "id": id }),
                    ProjectScope::Name { name, domain } => {
                        json!({ "name": name, "domain": domain_json(domain) })
                    }
                };
                auth["scope"] = json!({ "project": project });
            }
            json!({ "auth": auth })
        }
        AuthMethod::ApplicationCredential { id, secret } => json!({
            "auth": {
                "identity": {
                    "methods": ["application_credential"],
                    "application_credential": { "id": id, "secret": secret },
                }
            }
        }),
    }
}

/// Request a scoped token for the profile.
pub fn authenticate(http: &Client, profile: &CloudProfile) -> CloudResult<Session> {
    let url = tokens_url(&profile.auth_url);
    debug!(%url, cloud = %profile.name, "requesting keystone token");

    let response = http
        .post(&url)
        .json(&auth_request_body(&profile.auth))
        .send()
        .map_err(|e| CloudError::Auth(format!("cannot reach {url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(CloudError::Auth(format!(
            "{url} returned HTTP {}: {}",
            status.as_u16(),
            body.trim()
        )));
    }

    let token = response
        .headers()
        .get(SUBJECT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| {
            CloudError::Auth(format!("{url} did not return {SUBJECT_TOKEN_HEADER}"))
        })?;

    let envelope: TokenEnvelope = response.json().map_err(|e| CloudError::decode(&url, e))?;

    let project_id = envelope.token.project.map(|p| p.id);
    info!(
        cloud = %profile.name,
        project = project_id.as_deref().unwrap_or("unscoped"),
        services = envelope.token.catalog.len(),
        "authenticated"
    );

    Ok(Session {
        token,
        catalog: envelope.token.catalog,
    })
}

/// Find the URL of `service_type` in the catalog for the given interface and
/// (optional) region.
pub fn find_endpoint(
    catalog: &[CatalogService],
    service_type: &str,
    interface: Interface,
    region: Option<&str>,
) -> CloudResult<String> {
    catalog
        .iter()
        .filter(|service| service.service_type == service_type)
        .flat_map(|service| service.endpoints.iter())
        .find(|endpoint| {
            let interface_matches = Interface::parse(&endpoint.interface)
                .map(|parsed| parsed == interface)
                .unwrap_or(false);
            let region_matches = region.is_none_or(|wanted| {
                endpoint.region.as_deref() == Some(wanted)
                    || endpoint.region_id.as_deref() == Some(wanted)
            });
            interface_matches && region_matches
        })
        .map(|endpoint| endpoint.url.trim_end_matches('/').to_string())
        .ok_or_else(|| CloudError::EndpointNotFound {
            service_type: service_type.to_string(),
            interface: interface.as_str().to_string(),
            region: region.unwrap_or("any").to_string(),
        })
}
