//! Differ: pure comparison of the collected usage against the dependency list
//! and the declared shape.

use crate::collect::UsageReport;
use crate::finding::{Finding, FindingKind};
use crate::options::AnalysisOptions;
use crate::path::PropPath;
use crate::shape::{Lookup, ShapeTree};
use crate::syntax::NodeLocation;

/// One entry of the explicit dependency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub path: String,
    pub location: NodeLocation,
}

/// Findings in a fixed order: dependency-list findings (all primary, then all
/// legacy), declared-shape findings, unused dependencies.
pub fn diff(
    report: &UsageReport,
    shape: &ShapeTree<'_>,
    dependencies: Option<&[Dependency]>,
    options: &AnalysisOptions,
) -> Vec<Finding> {
    let used: Vec<_> = report
        .used
        .iter()
        .filter(|(_, used)| {
            used.path
                .root_key()
                .map_or(true, |root| !options.is_ignored(root))
        })
        .collect();

    let mut findings = Vec::new();

    if let Some(dependencies) = dependencies {
        let missing: Vec<_> = used
            .iter()
            .filter(|(path, _)| !dependencies.iter().any(|dep| dep.path == **path))
            .collect();
        for (path, used) in &missing {
            findings.push(Finding::new(
                FindingKind::MissingFromDependencyList,
                path,
                used.location,
            ));
        }
        for (path, used) in &missing {
            findings.push(Finding::new(
                FindingKind::MissingFromDependencyListLegacy,
                path,
                used.location,
            ));
        }
    }

    if shape.is_declared() || !options.skip_undeclared {
        for (path, used) in &used {
            let missing = !shape.is_declared() || shape.lookup(&used.path) == Lookup::Missing;
            if missing {
                findings.push(Finding::new(
                    FindingKind::MissingFromDeclaredShape,
                    path,
                    used.location,
                ));
            }
        }
    }

    if options.check_unused_declared_dependency {
        for dependency in dependencies.unwrap_or_default() {
            if is_dependency_used(report, dependency, options) {
                continue;
            }
            findings.push(Finding::new(
                FindingKind::UnusedDependency,
                &dependency.path,
                dependency.location,
            ));
        }
    }

    findings
}

fn is_dependency_used(
    report: &UsageReport,
    dependency: &Dependency,
    options: &AnalysisOptions,
) -> bool {
    if report.contains(&dependency.path) || report.exempt.contains(&dependency.path) {
        return true;
    }
    match dependency.path.parse::<PropPath>() {
        Ok(path) => {
            path.root_key().is_some_and(|root| options.is_ignored(root))
                || report.is_consumed(&path)
        }
        Err(_) => false,
    }
}
