//! The `korrektur validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(rubric_path: PathBuf) -> Result<()> {
    let rubric = korrektur_core::parser::parse_rubric(&rubric_path)?;

    println!(
        "Rubric: {} ({} criteria, {} points)",
        rubric.title(),
        rubric.criteria().len(),
        rubric.max_points()
    );

    let warnings = korrektur_core::parser::lint_rubric(&rubric);
    for w in &warnings {
        let prefix = w
            .criterion_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Rubric valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
