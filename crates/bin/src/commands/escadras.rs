//! Escadras command - lists the fleets of a world save.

use seria::{
    format,
    roster::{self, EscadraSummary, Point},
};

use crate::cli::EscadrasArgs;
use crate::output::{OutputFormat, print_table};

/// Run the escadras command
pub fn run(args: &EscadrasArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let save = format::read_file(&args.save)?;
    let escadras = match args.near.as_deref() {
        Some(&[x, y, radius]) => roster::escadras_near(&save, Point::new(x, y), radius)?,
        Some(_) => return Err("--near takes exactly three numbers: X Y R".into()),
        None => roster::escadras(&save)?,
    };

    let summaries = escadras
        .into_iter()
        .map(EscadraSummary::from_escadra)
        .collect::<seria::Result<Vec<_>>>()?;

    match format {
        OutputFormat::Human => {
            if summaries.is_empty() {
                println!("No escadras found.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = summaries
                .iter()
                .map(|summary| {
                    vec![
                        summary.id.map(|id| id.to_string()).unwrap_or_default(),
                        summary.name.clone(),
                        summary
                            .role
                            .map(|role| role.to_string())
                            .unwrap_or_else(|| "None".to_string()),
                        summary.ships.len().to_string(),
                        summary.position.to_string(),
                        summary.target.to_string(),
                    ]
                })
                .collect();
            print_table(&["ID", "NAME", "ROLE", "SHIPS", "POSITION", "TARGET"], &rows);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&summaries)?),
    }
    Ok(())
}
