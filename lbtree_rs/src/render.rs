//! Tree renderer.
//!
//! One depth-first, pre-order pass over the (already filtered) hierarchy:
//!
//! ```text
//! 📦 web-lb (ID: 5c1b…)
//!   ├─ 🏊 http (ID: 91aa…)
//!   │  ├─ 👤 web-1 (provisioning: ACTIVE | operating: ONLINE)
//!   │  └─ 👤 web-2 (provisioning: PENDING_CREATE | operating: OFFLINE)
//!   └─ 🏊 https (ID: 02fe…)
//!      └─ No members
//! ```

use std::io::{self, Write};

use crate::colors::Painter;
use crate::types::{Fetch, LoadBalancer, Member, Pool};

const BRANCH: &str = "├─";
const LAST_BRANCH: &str = "└─";
const INDENT: &str = "  ";
const CONTINUATION: &str = "  │  ";
const BLANK: &str = "     ";

const LOAD_BALANCER_MARKER: &str = "📦";
const POOL_MARKER: &str = "🏊";
const MEMBER_MARKER: &str = "👤";

/// Length of identifiers printed with `--short-ids`.
pub const SHORT_ID_LEN: usize = 8;

/// Message printed when the listing itself came back empty.
pub const NO_LOAD_BALANCERS: &str = "No loadbalancers found in the project.";

/// Abstract styling decision for a member, mapped to colors by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleTag {
    Normal,
    Warning,
    Error,
}

/// Error when the member is not ONLINE, Warning when only provisioning is
/// not ACTIVE. Operating status wins when both are off.
pub fn style_for(member: &Member) -> StyleTag {
    if !member.operating_status.is_healthy() {
        StyleTag::Error
    } else if !member.provisioning_status.is_healthy() {
        StyleTag::Warning
    } else {
        StyleTag::Normal
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Renderer {
    painter: Painter,
    short_ids: bool,
}

impl Renderer {
    pub fn new(painter: Painter, short_ids: bool) -> Self {
        Self { painter, short_ids }
    }

    pub fn render<W: Write>(&self, tree: &[LoadBalancer], out: &mut W) -> io::Result<()> {
        for lb in tree {
            self.render_load_balancer(lb, out)?;
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn render_to_string(&self, tree: &[LoadBalancer]) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.render(tree, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn id<'a>(&self, id: &'a str) -> &'a str {
        if self.short_ids {
            match id.char_indices().nth(SHORT_ID_LEN) {
                Some((cut, _)) => &id[..cut],
                None => id,
            }
        } else {
            id
        }
    }

    fn paint(&self, tag: StyleTag, s: &str) -> String {
        match tag {
            StyleTag::Normal => s.to_string(),
            StyleTag::Warning => self.painter.pending(s),
            StyleTag::Error => self.painter.failure(s),
        }
    }

    fn render_load_balancer<W: Write>(&self, lb: &LoadBalancer, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "{} (ID: {})",
            self.painter.header(&format!("{LOAD_BALANCER_MARKER} {}", lb.name)),
            self.id(&lb.id)
        )?;

        match &lb.pools {
            Fetch::Loaded(pools) if pools.is_empty() => {
                writeln!(out, "{INDENT}{LAST_BRANCH} {}", self.painter.placeholder("No pools"))
            }
            Fetch::Loaded(pools) => {
                for (idx, pool) in pools.iter().enumerate() {
                    self.render_pool(pool, idx + 1 == pools.len(), out)?;
                }
                Ok(())
            }
            Fetch::Failed(err) => writeln!(
                out,
                "{INDENT}{LAST_BRANCH} {}",
                self.painter.failure(&format!("Error fetching pools: {err}"))
            ),
            Fetch::Skipped => Ok(()),
        }
    }

    fn render_pool<W: Write>(&self, pool: &Pool, is_last: bool, out: &mut W) -> io::Result<()> {
        let branch = if is_last { LAST_BRANCH } else { BRANCH };
        let child_prefix = if is_last { BLANK } else { CONTINUATION };

        writeln!(
            out,
            "{INDENT}{branch} {} (ID: {})",
            self.painter.pool(&format!("{POOL_MARKER} {}", pool.name)),
            self.id(&pool.id)
        )?;

        match &pool.members {
            Fetch::Loaded(members) if members.is_empty() => writeln!(
                out,
                "{child_prefix}{LAST_BRANCH} {}",
                self.painter.placeholder("No members")
            ),
            Fetch::Loaded(members) => {
                for (idx, member) in members.iter().enumerate() {
                    let branch = if idx + 1 == members.len() {
                        LAST_BRANCH
                    } else {
                        BRANCH
                    };
                    writeln!(
                        out,
                        "{child_prefix}{branch} {} {}",
                        self.painter.marker(MEMBER_MARKER),
                        self.format_member(member)
                    )?;
                }
                Ok(())
            }
            Fetch::Failed(err) => writeln!(
                out,
                "{child_prefix}{LAST_BRANCH} {}",
                self.painter.failure(&format!("Error fetching members: {err}"))
            ),
            Fetch::Skipped => Ok(()),
        }
    }

    fn format_member(&self, member: &Member) -> String {
        let provisioning = member.provisioning_status.as_str();
        let provisioning = if member.provisioning_status.is_healthy() {
            provisioning.to_string()
        } else {
            self.painter.pending(provisioning)
        };
        let operating = member.operating_status.as_str();
        let operating = if member.operating_status.is_healthy() {
            operating.to_string()
        } else {
            self.painter.failure(operating)
        };
        format!(
            "{} (provisioning: {provisioning} | operating: {operating})",
            self.paint(style_for(member), &member.name)
        )
    }
}
