//! Outline validation and health checking.
//!
//! Verifies the structural guarantees a built outline is supposed to keep:
//! - Headings have at least one child
//! - Heading levels start at 1 and step by exactly 1
//! - No heading deeper than `max_depth`
//! - Every input document appears as exactly one leaf
//! - Originality scores are finite and within `[0, 1]`
//!
//! Issues point at nodes by their position path, e.g. `1/0/2` is the third
//! child of the first child of the second top-level node.
//!
//! # Example
//!
//! ```rust
//! use ideatree::hierarchy::{validate_outline, TreeNode};
//!
//! let nodes = vec![TreeNode::leaf("a", "text", 0.5)];
//! let report = validate_outline(&nodes, &["a".to_string()], 3);
//! assert!(report.is_clean());
//! ```

use std::collections::{HashMap, HashSet};

use super::builder::Outline;
use super::node::TreeNode;

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational, not a problem.
    Info,
    /// Something unusual but not necessarily wrong.
    Warning,
    /// A broken guarantee.
    Error,
    /// The outline cannot be used.
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A single validation issue.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity of the issue.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Position path of the node involved.
    pub node: Option<String>,
    /// Optional additional context.
    pub context: Option<String>,
}

impl ValidationIssue {
    /// Create a new validation issue.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            node: None,
            context: None,
        }
    }

    /// Attach the node's position path.
    pub fn with_node(mut self, path: impl Into<String>) -> Self {
        self.node = Some(path.into());
        self
    }

    /// Add context to this issue.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context = Some(ctx.into());
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)?;
        if let Some(path) = &self.node {
            write!(f, " (node {})", path)?;
        }
        if let Some(ctx) = &self.context {
            write!(f, " - {}", ctx)?;
        }
        Ok(())
    }
}

/// Report from a validation/health check.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// All issues found.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Add an issue to the report.
    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Check if the report contains no errors or critical issues.
    pub fn is_healthy(&self) -> bool {
        self.issues_at_level(Severity::Error).is_empty()
    }

    /// Check if there are any issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Get issues of a specific severity or higher.
    pub fn issues_at_level(&self, min_severity: Severity) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity >= min_severity)
            .collect()
    }

    /// Count issues by severity.
    pub fn counts(&self) -> HashMap<Severity, usize> {
        let mut counts = HashMap::new();
        for issue in &self.issues {
            *counts.entry(issue.severity).or_default() += 1;
        }
        counts
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_clean() {
            return write!(f, "Validation passed: no issues found");
        }

        let counts = self.counts();
        write!(f, "Validation report: ")?;

        let parts: Vec<String> = [
            (Severity::Critical, "critical"),
            (Severity::Error, "errors"),
            (Severity::Warning, "warnings"),
            (Severity::Info, "info"),
        ]
        .iter()
        .filter_map(|(sev, name)| counts.get(sev).map(|c| format!("{} {}", c, name)))
        .collect();

        writeln!(f, "{}", parts.join(", "))?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// Health report with outline statistics.
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Validation issues.
    pub validation: ValidationReport,
    /// Total number of nodes.
    pub node_count: usize,
    /// Number of leaves.
    pub leaf_count: usize,
    /// Number of headings.
    pub heading_count: usize,
    /// Deepest heading level.
    pub max_depth: usize,
    /// Mean number of children per heading.
    pub avg_branching_factor: f64,
}

impl HealthReport {
    /// Check if the outline is healthy (no errors or critical issues).
    pub fn is_healthy(&self) -> bool {
        self.validation.is_healthy()
    }
}

impl std::fmt::Display for HealthReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Outline Health Report")?;
        writeln!(f, "=====================")?;
        writeln!(
            f,
            "Nodes: {} ({} headings, {} leaves)",
            self.node_count, self.heading_count, self.leaf_count
        )?;
        writeln!(f, "Max depth: {}", self.max_depth)?;
        writeln!(f, "Avg branching factor: {:.2}", self.avg_branching_factor)?;
        writeln!(f)?;
        write!(f, "{}", self.validation)
    }
}

/// Trait for types that can be health-checked.
pub trait HealthCheck {
    /// Perform a health check and return a report.
    fn health_check(&self) -> HealthReport;

    /// Quick check: returns true if healthy.
    fn is_healthy(&self) -> bool {
        self.health_check().is_healthy()
    }
}

impl HealthCheck for Outline {
    fn health_check(&self) -> HealthReport {
        let validation = validate_outline(&self.nodes, &self.ids, self.stats.max_depth);

        let mut heading_count = 0;
        let mut total_children = 0;
        let mut stack: Vec<&TreeNode> = self.nodes.iter().collect();
        let mut node_count = 0;
        while let Some(node) = stack.pop() {
            node_count += 1;
            if let TreeNode::Heading { children, .. } = node {
                heading_count += 1;
                total_children += children.len();
                stack.extend(children.iter());
            }
        }

        let avg_branching_factor = if heading_count == 0 {
            0.0
        } else {
            total_children as f64 / heading_count as f64
        };

        HealthReport {
            validation,
            node_count,
            leaf_count: node_count - heading_count,
            heading_count,
            max_depth: self.nodes.iter().map(TreeNode::max_level).max().unwrap_or(0),
            avg_branching_factor,
        }
    }
}

/// Validate an outline against the documents it was built from.
pub fn validate_outline(nodes: &[TreeNode], ids: &[String], max_depth: usize) -> ValidationReport {
    let mut report = ValidationReport::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (i, node) in nodes.iter().enumerate() {
        check_node(node, i.to_string(), 1, max_depth, &mut seen, &mut report);
    }

    let expected: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let mut duplicated: Vec<&str> = seen
        .iter()
        .filter(|(_, n)| **n > 1)
        .map(|(id, _)| *id)
        .collect();
    duplicated.sort_unstable();
    for id in duplicated {
        report.add(
            ValidationIssue::new(Severity::Error, "document appears more than once")
                .with_context(format!("id {id}")),
        );
    }

    let mut missing: Vec<&str> = expected
        .iter()
        .filter(|id| !seen.contains_key(*id))
        .copied()
        .collect();
    missing.sort_unstable();
    if !missing.is_empty() {
        report.add(
            ValidationIssue::new(
                Severity::Error,
                format!("{} documents missing from outline", missing.len()),
            )
            .with_context(format!("first few: {:?}", &missing[..missing.len().min(5)])),
        );
    }

    let mut unexpected: Vec<&str> = seen
        .keys()
        .filter(|id| !expected.contains(*id))
        .copied()
        .collect();
    unexpected.sort_unstable();
    if !unexpected.is_empty() {
        report.add(
            ValidationIssue::new(
                Severity::Error,
                format!("{} leaves do not match any document", unexpected.len()),
            )
            .with_context(format!("first few: {:?}", &unexpected[..unexpected.len().min(5)])),
        );
    }

    report
}

fn check_node<'a>(
    node: &'a TreeNode,
    path: String,
    expected_level: usize,
    max_depth: usize,
    seen: &mut HashMap<&'a str, usize>,
    report: &mut ValidationReport,
) {
    let score = node.originality();
    if !score.is_finite() || !(0.0..=1.0).contains(&score) {
        report.add(
            ValidationIssue::new(Severity::Error, "originality outside [0, 1]")
                .with_node(path.clone())
                .with_context(format!("score {score}")),
        );
    }

    match node {
        TreeNode::Leaf { id, title, .. } => {
            *seen.entry(id.as_str()).or_insert(0) += 1;
            if title != id {
                report.add(
                    ValidationIssue::new(Severity::Warning, "leaf title differs from its id")
                        .with_node(path),
                );
            }
        }
        TreeNode::Heading {
            title,
            level,
            children,
            ..
        } => {
            if *level != expected_level {
                report.add(
                    ValidationIssue::new(Severity::Error, "heading level does not step by 1")
                        .with_node(path.clone())
                        .with_context(format!("expected {expected_level}, found {level}")),
                );
            }
            if *level > max_depth {
                report.add(
                    ValidationIssue::new(Severity::Error, "heading deeper than max_depth")
                        .with_node(path.clone())
                        .with_context(format!("level {level}, max_depth {max_depth}")),
                );
            }
            if children.is_empty() {
                report.add(
                    ValidationIssue::new(Severity::Error, "heading has no children")
                        .with_node(path.clone()),
                );
            }
            if title.trim().is_empty() {
                report.add(
                    ValidationIssue::new(Severity::Warning, "heading has an empty title")
                        .with_node(path.clone()),
                );
            }
            for (i, child) in children.iter().enumerate() {
                check_node(
                    child,
                    format!("{path}/{i}"),
                    level + 1,
                    max_depth,
                    seen,
                    report,
                );
            }
        }
    }
}
