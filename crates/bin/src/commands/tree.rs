//! Tree command - prints the node outline of a file.

use seria::{Node, format};

use crate::cli::TreeArgs;
use crate::output::OutputFormat;

/// One line of the outline.
#[derive(Debug, serde::Serialize)]
struct Line {
    depth: usize,
    slot: Option<String>,
    classname: String,
    code: i64,
    id: Option<i64>,
    attributes: usize,
}

fn outline(node: &Node, slot: Option<&str>, depth: usize, max: Option<usize>, out: &mut Vec<Line>) {
    out.push(Line {
        depth,
        slot: slot.map(str::to_string),
        classname: node.classname().to_string(),
        code: node.code(),
        // a non-integer m_id is shown as absent rather than failing the outline
        id: node.id().ok().flatten(),
        attributes: node.attributes().count(),
    });

    if max.is_some_and(|max| depth >= max) {
        return;
    }
    for child in node.children() {
        outline(child.node(), Some(child.slot()), depth + 1, max, out);
    }
}

/// Run the tree command
pub fn run(args: &TreeArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let root = format::read_file(&args.file)?;
    let mut lines = Vec::new();
    outline(&root, None, 0, args.depth, &mut lines);

    match format {
        OutputFormat::Human => {
            for line in &lines {
                let indent = "  ".repeat(line.depth);
                let slot = line.slot.as_deref().map(|s| format!("{s} ")).unwrap_or_default();
                let id = line.id.map(|id| format!("  #{id}")).unwrap_or_default();
                println!(
                    "{indent}{slot}{} {}{id}  ({} attributes)",
                    line.classname, line.code, line.attributes
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&lines)?),
    }
    Ok(())
}
