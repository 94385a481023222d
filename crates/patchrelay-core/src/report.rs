//! Accumulates a run's annotations into a single report document.

use std::collections::BTreeMap;
use std::mem;

use patchrelay_types::{Annotation, CatalogRule, ReportDocument, RuleInfo, ToolMeta};

/// Collects annotations over a run and assembles the final document.
///
/// The rule catalog and provenance are fixed up front; annotations arrive
/// change by change and keep their arrival order in the finished report.
#[derive(Debug)]
pub struct ReportBuilder {
    tool: ToolMeta,
    rules: Vec<RuleInfo>,
    provenance: Vec<String>,
    annotations: Vec<Annotation>,
}

impl ReportBuilder {
    pub fn new(tool: ToolMeta, rules: Vec<RuleInfo>, provenance: Vec<String>) -> Self {
        Self {
            tool,
            rules,
            provenance,
            annotations: Vec::new(),
        }
    }

    pub fn push_annotations(&mut self, annotations: Vec<Annotation>) {
        self.annotations.extend(annotations);
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    pub fn finish(&mut self) -> ReportDocument {
        ReportDocument {
            tool: self.tool.clone(),
            rules: flatten_rule_catalog(&self.rules),
            provenance: self.provenance.clone(),
            annotations: mem::take(&mut self.annotations),
        }
    }
}

/// Flattens a rule tree into a catalog sorted by id.
///
/// Composite rules nest arbitrarily deep and may share sub-rules; every
/// descendant appears exactly once. First descriptor for an id wins.
pub fn flatten_rule_catalog(rules: &[RuleInfo]) -> Vec<CatalogRule> {
    let mut catalog = BTreeMap::new();
    for rule in rules {
        collect_rule(rule, &mut catalog);
    }
    catalog.into_values().collect()
}

fn collect_rule(rule: &RuleInfo, catalog: &mut BTreeMap<String, CatalogRule>) {
    if !catalog.contains_key(&rule.id) {
        catalog.insert(
            rule.id.clone(),
            CatalogRule {
                id: rule.id.clone(),
                display_name: rule.display_name.clone(),
                description: rule.description.clone(),
            },
        );
    }
    for child in &rule.rules {
        collect_rule(child, catalog);
    }
}
