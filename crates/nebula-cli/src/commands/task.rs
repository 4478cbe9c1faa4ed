//! Task list commands for CLI.

use clap::Subcommand;
use nebula_core::{Category, Nebula, Task};

use crate::output::Styler;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the top of the list
    Add {
        /// Task text
        text: String,
        /// Category: work, personal, urgent or other
        #[arg(long, short, default_value = "work", value_parser = parse_category)]
        category: Category,
    },
    /// List tasks, newest first
    List {
        /// Print the stored JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Flip a task between open and done
    Toggle {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Remove every completed task
    ClearCompleted,
    /// Move a task to another task's position
    Move {
        /// ID of the task to move
        source: String,
        /// ID of the task whose position it takes
        target: String,
    },
}

/// Strict parsing for user input; unknown names are an error here.
fn parse_category(s: &str) -> Result<Category, String> {
    s.parse()
}

fn render_task(styler: &Styler, task: &Task) -> String {
    let check = if task.completed { "[x]" } else { "[ ]" };
    let text = if task.completed {
        styler.done(&task.text).to_string()
    } else {
        task.text.clone()
    };
    format!(
        "{} {}  {}  {}",
        styler.accent(check),
        styler.dim(&task.id),
        text,
        styler.hex(&task.category.as_str().to_uppercase(), task.category.color()),
    )
}

fn not_found(id: &str) {
    eprintln!("no task with id {id}");
}

pub fn run(app: &mut Nebula, styler: &Styler, action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TaskAction::Add { text, category } => match app.tasks_mut().add_task(&text, category) {
            Some(id) => println!("Task added: {id}"),
            None => eprintln!("task text is empty, nothing added"),
        },
        TaskAction::List { json } => {
            let tasks = app.tasks().tasks();
            if json {
                println!("{}", serde_json::to_string_pretty(tasks)?);
            } else if tasks.is_empty() {
                println!("{}", styler.dim("No tasks yet. Add one to get started."));
            } else {
                for task in tasks {
                    println!("{}", render_task(styler, task));
                }
                let list = app.tasks().list();
                if list.has_completed() {
                    let hint = format!(
                        "{} done; `nebula task clear-completed` removes them",
                        list.completed_count()
                    );
                    println!("{}", styler.dim(&hint));
                }
            }
        }
        TaskAction::Toggle { id } => {
            if app.tasks_mut().toggle_task(&id) {
                let done = app.tasks().list().get(&id).is_some_and(|t| t.completed);
                println!("Task {id} marked {}", if done { "done" } else { "open" });
            } else {
                not_found(&id);
            }
        }
        TaskAction::Delete { id } => {
            if app.tasks_mut().delete_task(&id) {
                println!("Task deleted: {id}");
            } else {
                not_found(&id);
            }
        }
        TaskAction::ClearCompleted => {
            let cleared = app.tasks().list().completed_count();
            app.tasks_mut().clear_completed();
            println!("Cleared {cleared} completed task(s)");
        }
        TaskAction::Move { source, target } => {
            if app.tasks_mut().reorder(&source, &target) {
                println!("Moved {source} to the position of {target}");
            } else {
                eprintln!("nothing to move: ids must differ and both exist");
            }
        }
    }
    Ok(())
}
