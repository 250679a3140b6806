//! Report pipeline: build → filter → render.

use std::io::{self, Write};

use thiserror::Error;
use tracing::info;

use crate::builder::{FetchObserver, build_tree};
use crate::cloud::{CloudClient, CloudError};
use crate::filter;
use crate::render::{NO_LOAD_BALANCERS, Renderer};
use crate::types::{DisplayMode, Fetch, LoadBalancer};

#[derive(Debug, Error)]
pub enum ReportError {
    /// The load balancer listing itself failed.
    #[error("failed to list load balancers")]
    Listing(#[from] CloudError),

    #[error("failed to write output")]
    Output(#[from] io::Error),
}

/// What one run asks for.
#[derive(Clone, Debug, Default)]
pub struct ReportRequest {
    pub project_id: Option<String>,
    pub mode: DisplayMode,
}

/// Counts logged after a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub listed: usize,
    pub shown: usize,
    /// Pool or member listings that failed and were rendered inline.
    pub node_errors: usize,
}

fn count_node_errors(tree: &[LoadBalancer]) -> usize {
    tree.iter()
        .map(|lb| match &lb.pools {
            Fetch::Failed(_) => 1,
            Fetch::Loaded(pools) => pools
                .iter()
                .filter(|pool| matches!(pool.members, Fetch::Failed(_)))
                .count(),
            Fetch::Skipped => 0,
        })
        .sum()
}

/// Fetch, prune and print one report.
pub fn generate<C: CloudClient + ?Sized, W: Write>(
    client: &C,
    request: &ReportRequest,
    renderer: &Renderer,
    observer: &dyn FetchObserver,
    out: &mut W,
) -> Result<ReportSummary, ReportError> {
    let tree = build_tree(client, request.project_id.as_deref(), request.mode, observer)?;
    let listed = tree.len();
    let node_errors = count_node_errors(&tree);

    if tree.is_empty() {
        writeln!(out, "{NO_LOAD_BALANCERS}")?;
        return Ok(ReportSummary::default());
    }

    let shown = filter::apply(tree, request.mode);
    renderer.render(&shown, out)?;
    out.flush()?;

    let summary = ReportSummary {
        listed,
        shown: shown.len(),
        node_errors,
    };
    info!(
        listed = summary.listed,
        shown = summary.shown,
        node_errors = summary.node_errors,
        mode = ?request.mode,
        "report complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::MemoryCloud;
    use crate::colors::Painter;

    fn run(cloud: &MemoryCloud, mode: DisplayMode) -> (Result<ReportSummary, ReportError>, String) {
        let mut out = Vec::new();
        let request = ReportRequest {
            project_id: None,
            mode,
        };
        let renderer = Renderer::new(Painter::plain(), false);
        let result = generate(cloud, &request, &renderer, &(), &mut out);
        (result, String::from_utf8(out).expect("utf-8"))
    }

    #[test]
    fn empty_listing_prints_notice() {
        let (result, out) = run(&MemoryCloud::new(), DisplayMode::Normal);
        assert_eq!(result.expect("report"), ReportSummary::default());
        assert_eq!(out, format!("{NO_LOAD_BALANCERS}\n"));
    }

    #[test]
    fn everything_filtered_prints_nothing() {
        let cloud = MemoryCloud::new()
            .load_balancer("lb1", "ONLINE")
            .pool("lb1", "p1")
            .member("p1", "m1", "ACTIVE", "ONLINE");
        let (result, out) = run(&cloud, DisplayMode::Filter);
        let summary = result.expect("report");
        assert_eq!(summary.listed, 1);
        assert_eq!(summary.shown, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn node_errors_are_counted_not_fatal() {
        let cloud = MemoryCloud::new()
            .load_balancer("lb1", "ONLINE")
            .load_balancer("lb2", "ONLINE")
            .pool("lb2", "p1")
            .failing("lb1")
            .failing("p1");
        let (result, out) = run(&cloud, DisplayMode::Normal);
        assert_eq!(result.expect("report").node_errors, 2);
        assert!(out.contains("Error fetching pools"));
        assert!(out.contains("Error fetching members"));
    }

    #[test]
    fn fatal_message_names_the_cause_once() {
        let cloud = MemoryCloud::new().failing_listing();
        let (result, _) = run(&cloud, DisplayMode::Normal);
        let err = anyhow::Error::from(result.unwrap_err());
        let message = format!("Error: {err:#}");
        assert_eq!(
            message,
            "Error: failed to list load balancers: authentication failed: token expired"
        );
        assert_eq!(message.matches("token expired").count(), 1);
    }

    #[test]
    fn listing_failure_is_reported_as_listing_error() {
        let cloud = MemoryCloud::new().failing_listing();
        let (result, out) = run(&cloud, DisplayMode::Normal);
        assert!(matches!(result, Err(ReportError::Listing(_))));
        assert!(out.is_empty());
    }
}
