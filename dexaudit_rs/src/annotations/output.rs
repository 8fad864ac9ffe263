use std::io::{self, Write};

use super::group::AnnotationReport;

/// Text report:
///
/// ```text
/// status burn:
///   1: damage, cure on fire
///   10: residual
/// ```
pub fn write_human(report: &AnnotationReport, out: &mut impl Write) -> io::Result<()> {
    for group in &report.groups {
        writeln!(out, "{}:", group.key)?;
        for entry in &group.entries {
            writeln!(out, "  {}: {}", entry.order, entry.payloads.join(", "))?;
        }
        if report.separate_groups {
            writeln!(out)?;
        }
    }
    Ok(())
}

pub fn write_json(report: &AnnotationReport, out: &mut impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}
