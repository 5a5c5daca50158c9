use crate::{EditorError, GraphStore};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Validation severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValidationSeverity {
    Info,    // informational
    Warning, // suspicious but renderable
    Error,   // cannot be drawn as stored
}

/// Validation issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: ValidationSeverity,
    pub message: String,
    pub affected_nodes: Vec<String>,
    pub affected_edges: Vec<String>,
    pub issue_type: ValidationIssueType,
}

/// Types of validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationIssueType {
    DanglingEdge,
    DuplicateEdgeId,
    InvalidHandle,
    SelfLoop,
    IsolatedNode,
}

/// Complete validation result
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn add_issue(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    fn with_severity(&self, severity: ValidationSeverity) -> Vec<&ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == severity).collect()
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Warning)
    }

    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.with_severity(ValidationSeverity::Error)
    }

    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.with_severity(ValidationSeverity::Warning)
    }

    pub fn info(&self) -> Vec<&ValidationIssue> {
        self.with_severity(ValidationSeverity::Info)
    }

    /// Check if validation passed (no errors)
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }
}

/// Structural lint for the flow graph
pub struct Validator;

impl Validator {
    /// Run all validations on a store
    pub fn validate(store: &GraphStore) -> ValidationResult {
        let mut result = ValidationResult::new();

        for err in Self::dangling_references(store) {
            if let EditorError::DanglingReference { edge, missing } = &err {
                result.add_issue(ValidationIssue {
                    severity: ValidationSeverity::Error,
                    message: err.to_string(),
                    affected_nodes: vec![missing.clone()],
                    affected_edges: vec![edge.clone()],
                    issue_type: ValidationIssueType::DanglingEdge,
                });
            }
        }

        let mut seen = HashSet::new();
        for edge in store.edges() {
            if !seen.insert(edge.id.as_str()) {
                result.add_issue(ValidationIssue {
                    severity: ValidationSeverity::Error,
                    message: format!("Edge id {} is used more than once", edge.id),
                    affected_nodes: vec![],
                    affected_edges: vec![edge.id.clone()],
                    issue_type: ValidationIssueType::DuplicateEdgeId,
                });
            }

            if edge.source == edge.target {
                result.add_issue(ValidationIssue {
                    severity: ValidationSeverity::Warning,
                    message: format!("Edge {} connects {} to itself", edge.id, edge.source),
                    affected_nodes: vec![edge.source.clone()],
                    affected_edges: vec![edge.id.clone()],
                    issue_type: ValidationIssueType::SelfLoop,
                });
            }

            if let Some(source) = store.get_node(&edge.source) {
                if !source.accepts_source_handle(edge.source_handle.as_deref()) {
                    let handle = edge.source_handle.as_deref().unwrap_or("default");
                    result.add_issue(ValidationIssue {
                        severity: ValidationSeverity::Warning,
                        message: format!(
                            "Edge {} leaves {} node {} from handle '{}', which it does not expose",
                            edge.id, source.kind, source.id, handle
                        ),
                        affected_nodes: vec![source.id.clone()],
                        affected_edges: vec![edge.id.clone()],
                        issue_type: ValidationIssueType::InvalidHandle,
                    });
                }
            }
        }

        let isolated = Self::isolated_nodes(store);
        if !isolated.is_empty() {
            result.add_issue(ValidationIssue {
                severity: ValidationSeverity::Info,
                message: format!("{} node(s) are not connected to anything.", isolated.len()),
                affected_nodes: isolated,
                affected_edges: vec![],
                issue_type: ValidationIssueType::IsolatedNode,
            });
        }

        result
    }

    /// One `DanglingReference` per missing endpoint
    pub fn dangling_references(store: &GraphStore) -> Vec<EditorError> {
        let mut errors = Vec::new();
        for edge in store.dangling_edges() {
            for endpoint in [&edge.source, &edge.target] {
                if !store.contains_node(endpoint) {
                    errors.push(EditorError::DanglingReference {
                        edge: edge.id.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
        }
        errors
    }

    /// Nodes without any incident edge
    fn isolated_nodes(store: &GraphStore) -> Vec<String> {
        let connected: HashSet<&str> = store
            .edges()
            .iter()
            .flat_map(|e| [e.source.as_str(), e.target.as_str()])
            .collect();

        store
            .nodes()
            .iter()
            .filter(|n| !connected.contains(n.id.as_str()))
            .map(|n| n.id.clone())
            .collect()
    }
}

/// Extension trait for GraphStore to add validation
pub trait ValidatedGraph {
    /// Validate the graph
    fn validate(&self) -> ValidationResult;

    /// Get nodes with validation issues
    fn nodes_with_issues(&self, result: &ValidationResult) -> HashMap<String, ValidationSeverity>;
}

impl ValidatedGraph for GraphStore {
    fn validate(&self) -> ValidationResult {
        Validator::validate(self)
    }

    fn nodes_with_issues(&self, result: &ValidationResult) -> HashMap<String, ValidationSeverity> {
        let mut nodes: HashMap<String, ValidationSeverity> = HashMap::new();

        for issue in &result.issues {
            for node_id in &issue.affected_nodes {
                nodes
                    .entry(node_id.clone())
                    .and_modify(|severity| {
                        // Keep the highest severity
                        if issue.severity > *severity {
                            *severity = issue.severity;
                        }
                    })
                    .or_insert(issue.severity);
            }
        }

        nodes
    }
}
