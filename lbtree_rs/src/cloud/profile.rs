//! Cloud credentials: `OS_*` environment variables or a named `clouds.yaml`
//! profile, both resolved into a single [`CloudProfile`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::error::{CloudError, CloudResult};

/// Profile name that means "read credentials from the environment".
pub const ENVVARS_CLOUD: &str = "envvars";

const DEFAULT_DOMAIN_ID: &str = "default";

/// Catalog interface used to pick the service endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Interface {
    #[default]
    Public,
    Internal,
    Admin,
}

impl Interface {
    /// Accepts both `public` and the legacy `publicURL` spelling.
    pub fn parse(raw: &str) -> CloudResult<Self> {
        let trimmed = raw.trim();
        let base = trimmed.strip_suffix("URL").unwrap_or(trimmed);
        match base.to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "internal" => Ok(Self::Internal),
            "admin" => Ok(Self::Admin),
            _ => Err(CloudError::config(format!("unknown interface '{raw}'"))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Admin => "admin",
        }
    }
}

/// A Keystone domain reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainRef {
    Id(String),
    Name(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserRef {
    Id(String),
    Name { name: String, domain: DomainRef },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProjectScope {
    Id(String),
    Name { name: String, domain: DomainRef },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthMethod {
    Password {
        user: UserRef,
        password: String,
        project: Option<ProjectScope>,
    },
    /// Application credentials carry their own project scope.
    ApplicationCredential { id: String, secret: String },
}

/// Everything needed to authenticate and find the load-balancer endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloudProfile {
    /// Profile name (`envvars` for environment credentials).
    pub name: String,
    pub auth_url: String,
    pub auth: AuthMethod,
    pub region_name: Option<String>,
    pub interface: Interface,
    pub cacert: Option<PathBuf>,
    pub insecure: bool,
}

// ============================================================================
// Raw (unvalidated) credentials
// ============================================================================

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct AuthSection {
    auth_url: Option<String>,
    username: Option<String>,
    user_id: Option<String>,
    password: Option<String>,
    project_name: Option<String>,
    project_id: Option<String>,
    user_domain_name: Option<String>,
    user_domain_id: Option<String>,
    project_domain_name: Option<String>,
    project_domain_id: Option<String>,
    domain_name: Option<String>,
    domain_id: Option<String>,
    application_credential_id: Option<String>,
    application_credential_secret: Option<String>,
}

/// One entry under `clouds:`; environment variables fill the same shape.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct RawCloud {
    auth: AuthSection,
    auth_type: Option<String>,
    region_name: Option<String>,
    interface: Option<String>,
    cacert: Option<String>,
    verify: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct CloudsFile {
    #[serde(default)]
    clouds: HashMap<String, RawCloud>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_truthy(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

fn domain(id: Option<String>, name: Option<String>, fallback: &DomainFallback) -> DomainRef {
    match (non_empty(id), non_empty(name)) {
        (Some(id), _) => DomainRef::Id(id),
        (None, Some(name)) => DomainRef::Name(name),
        (None, None) => fallback.resolve(),
    }
}

/// `domain_id` / `domain_name` apply to both user and project when the
/// specific keys are absent.
struct DomainFallback {
    id: Option<String>,
    name: Option<String>,
}

impl DomainFallback {
    fn resolve(&self) -> DomainRef {
        match (&self.id, &self.name) {
            (Some(id), _) => DomainRef::Id(id.clone()),
            (None, Some(name)) => DomainRef::Name(name.clone()),
            (None, None) => DomainRef::Id(DEFAULT_DOMAIN_ID.to_string()),
        }
    }
}

impl RawCloud {
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| non_empty(lookup(key));
        Self {
            auth: AuthSection {
                auth_url: get("OS_AUTH_URL"),
                username: get("OS_USERNAME"),
                user_id: get("OS_USER_ID"),
                password: get("OS_PASSWORD"),
                project_name: get("OS_PROJECT_NAME").or_else(|| get("OS_TENANT_NAME")),
                project_id: get("OS_PROJECT_ID").or_else(|| get("OS_TENANT_ID")),
                user_domain_name: get("OS_USER_DOMAIN_NAME"),
                user_domain_id: get("OS_USER_DOMAIN_ID"),
                project_domain_name: get("OS_PROJECT_DOMAIN_NAME"),
                project_domain_id: get("OS_PROJECT_DOMAIN_ID"),
                domain_name: get("OS_DOMAIN_NAME"),
                domain_id: get("OS_DOMAIN_ID"),
                application_credential_id: get("OS_APPLICATION_CREDENTIAL_ID"),
                application_credential_secret: get("OS_APPLICATION_CREDENTIAL_SECRET"),
            },
            auth_type: get("OS_AUTH_TYPE"),
            region_name: get("OS_REGION_NAME"),
            interface: get("OS_INTERFACE").or_else(|| get("OS_ENDPOINT_TYPE")),
            cacert: get("OS_CACERT"),
            verify: get("OS_INSECURE").map(|v| !is_truthy(&v)),
        }
    }

    fn into_profile(self, name: &str) -> CloudResult<CloudProfile> {
        let auth = self.auth;
        let auth_url = non_empty(auth.auth_url)
            .ok_or_else(|| CloudError::config(format!("cloud '{name}' has no auth_url")))?;

        let auth_type = self
            .auth_type
            .unwrap_or_default()
            .to_ascii_lowercase()
            .replace(['-', '_'], "");
        let app_cred = non_empty(auth.application_credential_id);
        let use_app_cred = auth_type.contains("applicationcredential")
            || (auth_type.is_empty() && app_cred.is_some());

        let method = if use_app_cred {
            let id = app_cred.ok_or_else(|| {
                CloudError::config(format!("cloud '{name}' has no application_credential_id"))
            })?;
            let secret = non_empty(auth.application_credential_secret).ok_or_else(|| {
                CloudError::config(format!(
                    "cloud '{name}' has no application_credential_secret"
                ))
            })?;
            AuthMethod::ApplicationCredential { id, secret }
        } else {
            let fallback = DomainFallback {
                id: non_empty(auth.domain_id),
                name: non_empty(auth.domain_name),
            };
            let user = match (non_empty(auth.user_id), non_empty(auth.username)) {
                (Some(id), _) => UserRef::Id(id),
                (None, Some(name)) => UserRef::Name {
                    name,
                    domain: domain(auth.user_domain_id, auth.user_domain_name, &fallback),
                },
                (None, None) => {
                    return Err(CloudError::config(format!(
                        "cloud '{name}' has neither username nor user_id"
                    )));
                }
            };
            let password = non_empty(auth.password)
                .ok_or_else(|| CloudError::config(format!("cloud '{name}' has no password")))?;
            let project = match (non_empty(auth.project_id), non_empty(auth.project_name)) {
                (Some(id), _) => Some(ProjectScope::Id(id)),
                (None, Some(project_name)) => Some(ProjectScope::Name {
                    name: project_name,
                    domain: domain(
                        auth.project_domain_id,
                        auth.project_domain_name,
                        &fallback,
                    ),
                }),
                (None, None) => None,
            };
            AuthMethod::Password {
                user,
                password,
                project,
            }
        };

        let interface = match self.interface {
            Some(raw) => Interface::parse(&raw)?,
            None => Interface::default(),
        };

        Ok(CloudProfile {
            name: name.to_string(),
            auth_url,
            auth: method,
            region_name: non_empty(self.region_name),
            interface,
            cacert: non_empty(self.cacert).map(PathBuf::from),
            insecure: self.verify == Some(false),
        })
    }
}

// ============================================================================
// Resolution
// ============================================================================

impl CloudProfile {
    /// Build a profile from `OS_*` environment variables.
    pub fn from_env() -> CloudResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CloudProfile::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CloudResult<Self> {
        RawCloud::from_lookup(lookup).into_profile(ENVVARS_CLOUD)
    }

    /// Load the named profile from a `clouds.yaml` file.
    pub fn from_clouds_file(path: &Path, cloud: &str) -> CloudResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CloudError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_clouds_yaml(&content, cloud).map_err(|e| match e {
            CloudError::Config(msg) => CloudError::Config(format!("{msg} (in {})", path.display())),
            other => other,
        })
    }

    pub fn from_clouds_yaml(content: &str, cloud: &str) -> CloudResult<Self> {
        let file: CloudsFile = serde_yaml::from_str(content)
            .map_err(|e| CloudError::config(format!("invalid clouds.yaml: {e}")))?;
        let raw = file
            .clouds
            .get(cloud)
            .cloned()
            .ok_or_else(|| {
                CloudError::config(format!("cloud '{cloud}' not found in clouds.yaml"))
            })?;
        raw.into_profile(cloud)
    }

    /// Resolve `--cloud`: no name (or `envvars`) reads the environment,
    /// anything else is looked up in the first `clouds.yaml` found.
    pub fn resolve(cloud: Option<&str>) -> CloudResult<Self> {
        match cloud {
            None | Some(ENVVARS_CLOUD) => {
                debug!("reading credentials from OS_* environment variables");
                Self::from_env()
            }
            Some(name) => {
                let path = find_clouds_file().ok_or_else(|| {
                    CloudError::config(format!(
                        "cloud '{name}' requested but no clouds.yaml was found"
                    ))
                })?;
                debug!(cloud = name, path = %path.display(), "loading cloud profile");
                Self::from_clouds_file(&path, name)
            }
        }
    }
}

/// Candidate `clouds.yaml` locations, most specific first.
pub fn clouds_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(explicit) = std::env::var_os("OS_CLIENT_CONFIG_FILE") {
        candidates.push(PathBuf::from(explicit));
    }
    candidates.push(PathBuf::from("clouds.yaml"));
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("openstack").join("clouds.yaml"));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".config").join("openstack").join("clouds.yaml"));
    }
    candidates.push(PathBuf::from("/etc/openstack/clouds.yaml"));
    candidates.dedup();
    candidates
}

pub fn find_clouds_file() -> Option<PathBuf> {
    clouds_file_candidates().into_iter().find(|p| p.is_file())
}
