//! The `interview questions` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use interview_core::model::Question;

pub fn execute(
    role: Option<String>,
    experience: Option<String>,
    random: bool,
    catalog_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, catalog) = super::load_catalog(catalog_path, config_path.as_deref())?;

    if random {
        match catalog.random(experience.as_deref()) {
            Some(q) => print_table(&[q]),
            None => println!("Catalog is empty."),
        }
        return Ok(());
    }

    let matching = catalog.filter(role.as_deref(), experience.as_deref());
    if matching.is_empty() {
        println!("No questions match.");
    } else {
        print_table(&matching);
        println!("{} of {} questions", matching.len(), catalog.len());
    }
    Ok(())
}

fn print_table(questions: &[&Question]) {
    let mut table = Table::new();
    table.set_header(vec!["Id", "Role", "Experience", "Difficulty", "Question"]);
    for q in questions {
        table.add_row(vec![
            Cell::new(q.id),
            Cell::new(&q.role),
            Cell::new(&q.experience),
            Cell::new(&q.difficulty),
            Cell::new(&q.question),
        ]);
    }
    println!("{table}");
}
