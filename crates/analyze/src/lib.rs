//! keyshift-analyze: deprecation audits between two metadata snapshots.
//!
//! Each audit is a separate module producing a serializable result. The
//! `analyze()` function diffs the snapshots, runs every audit and aggregates
//! the results into a `DeprecationReport`.

pub mod deprecations;
pub mod error_level;
pub mod removals;
pub mod report;
pub mod sentence;

pub use deprecations::{
    audit_deprecations, DeprecationAudit, InvalidDeprecation, ResolvedDeprecation,
    UnreplacedDeprecation,
};
pub use error_level::{audit_error_level, ErrorLevelAudit, ErrorLevelEntry};
pub use removals::{removal_candidates, RemovalCandidate, RemovalDeprecation};
pub use report::{DeprecationReport, Finding, FindingSeverity};
pub use sentence::first_sentence;

use keyshift_core::diff_repositories;
use keyshift_metadata::MetadataRepository;

/// Run every deprecation audit from `previous` to `current`.
///
/// Removal candidates whose id starts with one of `excludes` are dropped.
pub fn analyze<P, C>(previous: &P, current: &C, excludes: &[String]) -> DeprecationReport
where
    P: MetadataRepository + ?Sized,
    C: MetadataRepository + ?Sized,
{
    let diff = diff_repositories(previous, current);

    let mut report = DeprecationReport::new(previous.version(), current.version());
    report.deprecations = audit_deprecations(&diff, current);
    report.error_level = audit_error_level(current, previous);
    report.removals = removal_candidates(&diff, current, excludes);
    report.extract_findings();

    tracing::debug!(
        "audited {} -> {}: {} finding(s)",
        previous.version(),
        current.version(),
        report.findings.len()
    );
    report
}
