//! Rendering a push report.

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use gitsvnpush_core::merge_log::commit_instructions;
use gitsvnpush_core::{Action, PushReport, ReconcilePlan};

use crate::style;

fn action_cell(action: &Action) -> Cell {
    let cell = Cell::new(action.label());
    match action {
        Action::Copy { .. } => cell.fg(Color::Blue),
        Action::Add { .. } => cell.fg(Color::Green),
        Action::Delete { .. } => cell.fg(Color::Red),
        Action::Update { .. } => cell.fg(Color::Yellow),
    }
}

pub fn plan_table(plan: &ReconcilePlan) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Action", "Path", "Copied from"]);

    for action in &plan.actions {
        let from = match action {
            Action::Copy { from, .. } => from.as_str(),
            _ => "",
        };
        table.add_row(vec![
            action_cell(action),
            Cell::new(action.path()),
            Cell::new(from),
        ]);
    }
    table
}

pub fn summary(plan: &ReconcilePlan) -> String {
    format!(
        "{} copied, {} added, {} deleted, {} updated",
        plan.count("copy"),
        plan.count("add"),
        plan.count("delete"),
        plan.count("update")
    )
}

pub fn print(report: &PushReport, log_file: &str) {
    println!();
    println!(
        "{}",
        style::header(&format!("Push to {}", report.branch.svn_path))
    );
    println!(
        "{}",
        style::dim(&format!("git {} .. {}", report.start_hash, report.end_hash))
    );
    println!();

    if report.plan.is_empty() {
        println!("{}", style::success("svn working copy already matches git"));
    } else {
        println!("{}", plan_table(&report.plan));
        println!("{}", summary(&report.plan));
    }
    println!();

    match &report.log_path {
        Some(path) => {
            println!("{}", style::success(&format!("merge log written to {}", path.display())));
            println!();
            let [cd, commit] = commit_instructions(&report.svn_dir, log_file);
            println!("Change into the svn directory with the command");
            println!("    {}", style::command(&cd));
            println!("If these changes are OK, execute the command:");
            println!("    {}", style::command(&commit));
            println!("You may want to edit the log {log_file} first.");
        }
        None => println!("{}", style::warn("dry run: no changes applied to the svn working copy")),
    }
}
