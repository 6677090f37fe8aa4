//! The `korrektur init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("rubric.toml").exists() {
        println!("rubric.toml already exists, skipping.");
    } else {
        std::fs::write("rubric.toml", SAMPLE_RUBRIC)?;
        println!("Created rubric.toml");
    }

    if std::path::Path::new("solutions.toml").exists() {
        println!("solutions.toml already exists, skipping.");
    } else {
        std::fs::write("solutions.toml", SAMPLE_SOLUTIONS)?;
        println!("Created solutions.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit rubric.toml with your criteria");
    println!("  2. Run: korrektur validate --rubric rubric.toml");
    println!("  3. Run: korrektur grade --rubric rubric.toml --solutions solutions.toml");

    Ok(())
}

const SAMPLE_RUBRIC: &str = r#"# korrektur rubric
#
# Each criterion carries a declarative check rule; required criteria
# register an error tag when unsatisfied.

[rubric]
id = "flaeche-rechteck"
title = "Flächenberechnung Rechteck"
max_points = 10
expected_answer = 12.0
expected_unit = "cm²"

[[criteria]]
id = "ansatz"
description = "Formel A = b*h angesetzt"
points = 6
required = true
check = { type = "keyword", any_of = ["b*h", "b·h", "b * h"] }

[[criteria]]
id = "ergebnis"
description = "Ergebnis korrekt berechnet"
points = 4
required = false
check = { type = "final-answer", expected = 12.0, tolerance = 0.001 }
"#;

const SAMPLE_SOLUTIONS: &str = r#"# korrektur solutions
#
# Normally produced by an extraction adapter from scanned submissions;
# this file uses the same normalized step format.

[[solutions]]
submission_id = "abgabe-01"
student = "Anna Schmidt"
steps = ["A = b*h", "A = 3 cm * 4 cm", "A = 12 cm²"]

[[solutions]]
submission_id = "abgabe-02"
student = "Ben Weber"
steps = ["A = b*h", "A = 3 * 4", "A = 12"]

[[solutions]]
submission_id = "abgabe-03"
student = "Clara Fischer"
steps = ["Umfang? u = 2*(b+h)", "u = 14 cm"]
"#;
