//! Round-trip check - parses files and verifies they write back unchanged.

use std::path::Path;

use seria::format;
use tracing::warn;

use crate::cli::CheckArgs;
use crate::output::{OutputFormat, print_table};

/// Outcome of checking one file.
#[derive(Debug, serde::Serialize)]
struct Report {
    file: String,
    ok: bool,
    nodes: usize,
    detail: Option<String>,
}

fn check_file(path: &Path) -> Report {
    let file = path.display().to_string();
    let failed = |detail: String| Report {
        file: file.clone(),
        ok: false,
        nodes: 0,
        detail: Some(detail),
    };

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => return failed(e.to_string()),
    };
    let root = match format::parse(&text) {
        Ok(root) => root,
        Err(e) => return failed(e.to_string()),
    };

    let mut nodes = 0;
    root.walk(&mut |_, _| nodes += 1);

    let written = format::write(&root);
    let detail = first_difference(&text, &written)
        .map(|offset| format!("output differs from input at byte {offset}"));
    Report {
        ok: detail.is_none(),
        file,
        nodes,
        detail,
    }
}

/// Byte offset of the first difference, if any.
fn first_difference(a: &str, b: &str) -> Option<usize> {
    let common = a
        .bytes()
        .zip(b.bytes())
        .position(|(x, y)| x != y)
        .unwrap_or(a.len().min(b.len()));
    (a.len() != b.len() || common < a.len()).then_some(common)
}

/// Run the check command
pub fn run(args: &CheckArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let reports: Vec<Report> = args.files.iter().map(|path| check_file(path)).collect();
    let failures = reports.iter().filter(|report| !report.ok).count();

    match format {
        OutputFormat::Human => {
            let rows: Vec<Vec<String>> = reports
                .iter()
                .map(|report| {
                    vec![
                        report.file.clone(),
                        if report.ok { "ok" } else { "FAIL" }.to_string(),
                        report.nodes.to_string(),
                        report.detail.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            print_table(&["FILE", "STATUS", "NODES", "DETAIL"], &rows);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&reports)?),
    }

    if failures > 0 {
        warn!(failures, checked = reports.len(), "round trip check failed");
        return Err(format!("{failures} of {} files failed the check", reports.len()).into());
    }
    Ok(())
}
