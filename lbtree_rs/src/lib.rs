//! # lbtree
//!
//! Tree view of an OpenStack cloud's load balancers, their pools and their
//! members, with unhealthy members highlighted.
//!
//! ```text
//! 📦 web-lb (ID: 5c1b2e8a-...)
//!   └─ 🏊 http (ID: 91aa04d1-...)
//!      ├─ 👤 web-1 (provisioning: ACTIVE | operating: ONLINE)
//!      └─ 👤 web-2 (provisioning: PENDING_CREATE | operating: OFFLINE)
//! ```
//!
//! ## Pipeline
//!
//! 1. [`builder`] walks a [`cloud::CloudClient`] into a hierarchy
//! 2. [`filter`] prunes it for the active [`DisplayMode`]
//! 3. [`render`] prints it with box-drawing connectors
//!
//! [`report::generate`] runs all three.
//!
//! ## Library Usage
//!
//! `cloud::MemoryCloud` is an in-memory adapter for examples and tests; it is
//! left out of the rendered docs.
//!
//! ```rust
//! use lbtree::cloud::MemoryCloud;
//! use lbtree::colors::Painter;
//! use lbtree::render::Renderer;
//! use lbtree::report::{self, ReportRequest};
//! use lbtree::DisplayMode;
//!
//! let cloud = MemoryCloud::new()
//!     .load_balancer("lb1", "ONLINE")
//!     .pool("lb1", "p1")
//!     .member("p1", "m1", "ACTIVE", "OFFLINE");
//!
//! let request = ReportRequest { project_id: None, mode: DisplayMode::Filter };
//! let renderer = Renderer::new(Painter::plain(), false);
//! let mut out = Vec::new();
//! report::generate(&cloud, &request, &renderer, &(), &mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().contains("m1"));
//! ```

// ============================================================================
// Core Modules
// ============================================================================

/// Hierarchy assembly from cloud listings.
pub mod builder;

/// Command-line interface (clap arguments, settings, entry point).
pub mod cli;

/// Cloud client adapter.
///
/// - [`CloudClient`](cloud::CloudClient) - listing operations the builder uses
/// - [`OctaviaClient`](cloud::OctaviaClient) - Keystone-authenticated HTTP client
/// - [`CloudProfile`](cloud::CloudProfile) - credentials from env or `clouds.yaml`
pub mod cloud;

/// ANSI colors.
pub mod colors;

/// Optional `config.toml` support.
pub mod config;

/// Display filter (normal / filter / collapse / filter+collapse).
pub mod filter;

/// Fetch spinner.
pub mod progress;

/// Text tree renderer.
pub mod render;

/// Build → filter → render pipeline.
pub mod report;

/// Data model and status enums.
pub mod types;

// ============================================================================
// Re-exports for convenience
// ============================================================================

/// Color mode (Auto, Always, Never).
pub use types::ColorMode;

/// Display mode derived from `--filter` / `--collapse`.
pub use types::DisplayMode;

/// Hierarchy nodes.
pub use types::{Fetch, LoadBalancer, Member, Pool};

/// Listing operations.
pub use cloud::CloudClient;
