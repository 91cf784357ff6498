//! Output formatting utilities

use console::style;
use esmap_index::mapping::PropertyDescriptor;
use esmap_index::profiling::EntityDiagnostic;
use esmap_index::{
    MappingCatalog, NoOpReason, Outcome, OutcomeStatus, ProfileSnapshot, ReconcileAction,
    ReconcileReport,
};
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("[OK]").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("[ERROR]").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("[WARN]").yellow().bold(), message);
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Index name")]
    index: String,
    #[tabled(rename = "Result")]
    result: String,
}

/// Result cell text for one outcome.
pub fn result_label(outcome: &Outcome) -> String {
    match &outcome.status {
        OutcomeStatus::Applied => match outcome.action {
            ReconcileAction::Create => "created ✔".to_string(),
            ReconcileAction::Recreate => "re-created ✔".to_string(),
            ReconcileAction::Delete => "deleted ✔".to_string(),
            ReconcileAction::Skip(_) => "skipped".to_string(),
        },
        OutcomeStatus::NoOp(NoOpReason::AlreadyExists) => "exists".to_string(),
        OutcomeStatus::NoOp(NoOpReason::AlreadyAbsent) => "no exists".to_string(),
        OutcomeStatus::Failed(e) => format!("failed: {}", e.kind()),
    }
}

/// Renders a reconcile report as a `Class | Index name | Result` table.
pub fn report_table(report: &ReconcileReport) -> String {
    let rows: Vec<OutcomeRow> = report
        .iter()
        .map(|outcome| OutcomeRow {
            class: outcome.entity.clone(),
            index: outcome.index.clone(),
            result: result_label(outcome),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .modify(Columns::single(2), Alignment::center());
    table.to_string()
}

/// One-line summary of a report.
pub fn report_summary(report: &ReconcileReport) -> String {
    let failed = report.failures().count();
    format!(
        "{} applied, {} unchanged, {} failed",
        report.applied(),
        report.no_ops(),
        failed
    )
}

/// Type column text; containers list their children as `name[type]`.
pub fn type_label(property: &PropertyDescriptor) -> String {
    if property.properties.is_empty() {
        return property.field_type.clone();
    }
    let children: Vec<String> = property
        .properties
        .iter()
        .map(|child| format!("{}[{}]", child.name, type_label(child)))
        .collect();
    format!("{} ({})", property.field_type, children.join(", "))
}

/// Renders one table per descriptor: entity and index, then its properties.
pub fn info_tables(catalog: &MappingCatalog) -> Vec<String> {
    catalog
        .iter()
        .map(|descriptor| {
            let mut builder = Builder::default();
            builder.push_record(["Class".to_string(), "Index name".to_string()]);
            builder.push_record([descriptor.entity.clone(), descriptor.index.clone()]);
            builder.push_record(["Property name".to_string(), "Type".to_string()]);
            for property in &descriptor.properties {
                builder.push_record([property.name.clone(), type_label(property)]);
            }

            let mut table = builder.build();
            table.with(Style::modern());
            table.to_string()
        })
        .collect()
}

#[derive(Tabled)]
struct QueryRow {
    #[tabled(rename = "Operation")]
    operation: String,
    #[tabled(rename = "Index")]
    index: String,
    #[tabled(rename = "Time (ms)")]
    millis: String,
    #[tabled(rename = "Result")]
    result: String,
}

/// Renders a profile snapshot.
pub fn profile_report(snapshot: &ProfileSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", style("Elasticsearch profile").bold()));
    out.push_str(&format!(
        "Queries: {} in {:.2} ms\n",
        snapshot.query_count(),
        snapshot.total_time.as_secs_f64() * 1000.0
    ));

    if !snapshot.queries.is_empty() {
        let rows: Vec<QueryRow> = snapshot
            .queries
            .iter()
            .map(|q| QueryRow {
                operation: q.operation.to_string(),
                index: q.index.clone(),
                millis: format!("{:.2}", q.duration.as_secs_f64() * 1000.0),
                result: q.error.clone().unwrap_or_else(|| "ok".to_string()),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::modern());
        out.push_str(&format!("{}\n", table));
    }

    out.push_str(&format!(
        "Mapped entities: {} ({} invalid)\n",
        snapshot.entities.entries.len(),
        snapshot.entities.invalid_count()
    ));
    for entry in snapshot.entities.invalid() {
        if let EntityDiagnostic::Invalid { error, .. } = entry {
            out.push_str(&format!("  {}\n", error));
        }
    }

    match &snapshot.server {
        Some(info) => {
            let compatibility = if info.is_compatible() {
                style("compatible").green()
            } else {
                style("not compatible").red()
            };
            out.push_str(&format!(
                "Elasticsearch: {} on cluster {} ({})\n",
                info.version, info.cluster_name, compatibility
            ));
        }
        None => out.push_str(&format!("Elasticsearch: {}\n", style("unreachable").red())),
    }
    out.push_str(&format!("Kibana: {}\n", snapshot.kibana));
    out
}
