//! Attribute commands - read and write single attributes.

use seria::{
    Node, format,
    node::Value,
    transform::{ChildSelector, first_child, first_child_mut},
};
use tracing::info;

use crate::cli::{GetArgs, SetArgs};
use crate::output::OutputFormat;

/// Follows `under` from `root`, taking the first matching child at each step.
fn descend<'a>(root: &'a Node, under: &[ChildSelector]) -> seria::Result<&'a Node> {
    under
        .iter()
        .try_fold(root, |node, selector| first_child(node, selector))
}

fn descend_mut<'a>(root: &'a mut Node, under: &[ChildSelector]) -> seria::Result<&'a mut Node> {
    let mut node = root;
    for selector in under {
        node = first_child_mut(node, selector)?;
    }
    Ok(node)
}

/// Run the get command
pub fn get(args: &GetArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let root = format::read_file(&args.file)?;
    let node = descend(&root, &args.under)?;
    let value = node.get(args.key.as_str())?;

    match format {
        OutputFormat::Human => match value {
            Some(value) => println!("{value}"),
            None => return Err(format!("'{}' is not set on {}", args.key, node.classname()).into()),
        },
        OutputFormat::Json => {
            let json = serde_json::json!({
                "key": args.key,
                "node": node.classname(),
                "type": value.map(Value::type_name),
                "value": value,
            });
            println!("{}", serde_json::to_string(&json)?);
        }
    }
    Ok(())
}

/// Run the set command
pub fn set(args: &SetArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let mut root = format::read_file(&args.file)?;
    let node = descend_mut(&mut root, &args.under)?;
    let classname = node.classname().to_string();
    let value = Value::parse(&args.value);
    let old = node.set(args.key.as_str(), value.clone())?;

    let target = args.output.as_ref().unwrap_or(&args.file);
    format::write_file(target, &root)?;
    info!(key = args.key.as_str(), node = classname.as_str(), file = %target.display(), "attribute written");

    match format {
        OutputFormat::Human => match &old {
            Some(old) => println!("{}: {old} -> {value}", args.key),
            None => println!("{}: (new) {value}", args.key),
        },
        OutputFormat::Json => {
            let json = serde_json::json!({
                "key": args.key,
                "node": classname,
                "old": old,
                "new": value,
                "file": target.display().to_string(),
            });
            println!("{}", serde_json::to_string(&json)?);
        }
    }
    Ok(())
}
