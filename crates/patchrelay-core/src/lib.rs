//! Core engine: translates change results into annotations and report sinks.

mod output;
mod report;
mod sarif;
mod sink;
mod translate;

pub use output::OutputFile;
pub use report::{ReportBuilder, flatten_rule_catalog};
pub use sarif::{SarifReport, render_sarif_for_document, render_sarif_json};
pub use sink::{
    LogSink, PATCH_FILE_NAME, PatchSink, ReportFormat, ReportSink, RunContext, SARIF_FILE_NAME,
    SarifSink, create_sink, dispatch,
};
pub use translate::{TranslateError, translate_change};
