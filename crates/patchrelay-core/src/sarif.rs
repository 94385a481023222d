//! SARIF (Static Analysis Results Interchange Format) output renderer.
//!
//! Converts a ReportDocument to SARIF 2.1.0 format for integration with
//! code scanning tools and review frontends that ingest SARIF.

use serde::Serialize;

use patchrelay_types::{Annotation, CatalogRule, Region, ReportDocument};

/// SARIF schema URL
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";

/// SARIF version
const SARIF_VERSION: &str = "2.1.0";

/// GitHub repository URL for patchrelay
const PATCHRELAY_INFO_URI: &str = "https://github.com/EffortlessMetrics/patchrelay";

/// Root SARIF document structure.
#[derive(Debug, Clone, Serialize)]
pub struct SarifReport {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub runs: Vec<SarifRun>,
}

/// A single SARIF run (one translation pass).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRun {
    pub tool: SarifTool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<SarifArtifact>,
    pub results: Vec<SarifResult>,
}

/// Tool information (driver).
#[derive(Debug, Clone, Serialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

/// Tool driver with the rule catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    pub information_uri: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<SarifRule>,
}

/// Rule definition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    pub full_description: SarifMessage,
}

/// SARIF result (one annotation).
///
/// No level is emitted: a source transformation carries no severity, so
/// consumers fall back to their own default.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub rule_id: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fixes: Vec<SarifFix>,
}

/// Message with text.
#[derive(Debug, Clone, Serialize)]
pub struct SarifMessage {
    pub text: String,
}

/// Location of a result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    pub physical_location: SarifPhysicalLocation,
}

/// Physical location with file and region.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifPhysicalLocation {
    pub artifact_location: SarifArtifactLocation,
    pub region: SarifRegion,
}

/// Artifact (file) location.
#[derive(Debug, Clone, Serialize)]
pub struct SarifArtifactLocation {
    pub uri: String,
}

/// Region within a file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRegion {
    pub start_line: u32,
    pub end_line: u32,
}

/// Repository-level artifact listed on the run.
#[derive(Debug, Clone, Serialize)]
pub struct SarifArtifact {
    pub location: SarifArtifactLocation,
}

/// Suggested fix for a result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifFix {
    pub artifact_changes: Vec<SarifArtifactChange>,
}

/// File-level change within a fix.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifArtifactChange {
    pub artifact_location: SarifArtifactLocation,
    pub replacements: Vec<SarifReplacement>,
}

/// Region replacement within an artifact change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifReplacement {
    pub deleted_region: SarifRegion,
    pub inserted_content: SarifContent,
}

/// Replacement content.
#[derive(Debug, Clone, Serialize)]
pub struct SarifContent {
    pub text: String,
}

/// Renders a ReportDocument as a SARIF 2.1.0 report.
pub fn render_sarif_for_document(document: &ReportDocument) -> SarifReport {
    let results: Vec<SarifResult> = document
        .annotations
        .iter()
        .map(annotation_to_sarif_result)
        .collect();

    SarifReport {
        schema: SARIF_SCHEMA.to_string(),
        version: SARIF_VERSION.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: document.tool.name.clone(),
                    version: document.tool.version.clone(),
                    information_uri: PATCHRELAY_INFO_URI.to_string(),
                    rules: document.rules.iter().map(catalog_rule_to_sarif).collect(),
                },
            },
            artifacts: document
                .provenance
                .iter()
                .map(|uri| SarifArtifact {
                    location: SarifArtifactLocation { uri: uri.clone() },
                })
                .collect(),
            results,
        }],
    }
}

/// Renders a SARIF report as a JSON string.
pub fn render_sarif_json(document: &ReportDocument) -> Result<String, serde_json::Error> {
    let report = render_sarif_for_document(document);
    serde_json::to_string_pretty(&report)
}

fn catalog_rule_to_sarif(rule: &CatalogRule) -> SarifRule {
    SarifRule {
        id: rule.id.clone(),
        name: rule.display_name.clone(),
        full_description: SarifMessage {
            text: rule.description.clone(),
        },
    }
}

/// Converts an annotation to a SARIF Result.
///
/// A replacement becomes a fix proposing the same region swap, so review
/// frontends can render the change as a suggestion.
fn annotation_to_sarif_result(annotation: &Annotation) -> SarifResult {
    let artifact_location = SarifArtifactLocation {
        uri: annotation.path.clone(),
    };

    let fixes = match &annotation.replacement {
        Some(replacement) => vec![SarifFix {
            artifact_changes: vec![SarifArtifactChange {
                artifact_location: artifact_location.clone(),
                replacements: vec![SarifReplacement {
                    deleted_region: sarif_region(annotation.region),
                    inserted_content: SarifContent {
                        text: replacement.clone(),
                    },
                }],
            }],
        }],
        None => vec![],
    };

    SarifResult {
        rule_id: annotation.rule_id.clone(),
        message: SarifMessage {
            text: annotation.message.clone(),
        },
        locations: vec![SarifLocation {
            physical_location: SarifPhysicalLocation {
                artifact_location,
                region: sarif_region(annotation.region),
            },
        }],
        fixes,
    }
}

fn sarif_region(region: Region) -> SarifRegion {
    SarifRegion {
        start_line: region.start_line,
        end_line: region.end_line,
    }
}
