//! Import of historical findings from CSV.
//!
//! Expected layout, one header line then one finding per line:
//!
//! ```text
//! auditRef,checklistItemId,finding,observation,year
//! 2024AUD007,c-4,"Hangar lighting below spec, bay 2",,2024
//! ```
//!
//! Fields may be wrapped in double quotes; inside quotes a doubled quote is a
//! literal quote and commas do not split. Blank lines are skipped. Any bad
//! line aborts the whole import.

use crate::domain::{error::AuditError, finding::Finding, id::AuditRef, store::AuditStore};

pub const COLUMN_COUNT: usize = 5;

/// Split one CSV line into trimmed fields.
pub fn split_record(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if !quoted && field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
                quoted = true;
            }
            ',' if !in_quotes => {
                fields.push(finish_field(std::mem::take(&mut field), quoted));
                quoted = false;
            }
            c if quoted && !in_quotes && c.is_whitespace() => {}
            c => field.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".into());
    }
    fields.push(finish_field(field, quoted));
    Ok(fields)
}

fn finish_field(field: String, quoted: bool) -> String {
    if quoted {
        field
    } else {
        field.trim().to_string()
    }
}

/// Parse the whole file into historical findings.
///
/// Line numbers in errors are 1-based and count the header, so the first
/// data row is line 2.
pub fn parse_findings_csv(text: &str) -> Result<Vec<Finding>, AuditError> {
    let mut findings = Vec::new();

    for (index, raw) in text.split('\n').enumerate().skip(1) {
        let line = index + 1;
        let record = raw.trim_end_matches('\r');
        if record.trim().is_empty() {
            continue;
        }

        let parse_error = |reason: String| AuditError::Parse { line, reason };
        let fields = split_record(record).map_err(parse_error)?;
        if fields.len() < COLUMN_COUNT {
            return Err(parse_error(format!(
                "expected {COLUMN_COUNT} columns, found {}",
                fields.len()
            )));
        }

        let audit_ref = AuditRef::new(fields[0].as_str()).map_err(|e| parse_error(e.to_string()))?;
        if fields[1].is_empty() {
            return Err(parse_error("checklistItemId is required".into()));
        }
        let year: i32 = fields[4]
            .parse()
            .map_err(|_| parse_error(format!("invalid year: {}", fields[4])))?;

        findings.push(Finding::historical(
            audit_ref,
            fields[1].as_str(),
            fields[2].as_str(),
            fields[3].as_str(),
            year,
        ));
    }

    Ok(findings)
}

/// Parse and store a CSV file of historical findings. Nothing is stored
/// unless every line parses.
pub async fn import_historical(store: &dyn AuditStore, text: &str) -> Result<usize, AuditError> {
    let findings = match parse_findings_csv(text) {
        Ok(findings) => findings,
        Err(e) => {
            tracing::warn!(error = %e, "historical findings import rejected");
            return Err(e);
        }
    };

    store.insert_findings(&findings).await?;
    tracing::info!(count = findings.len(), "historical findings imported");
    Ok(findings.len())
}
