//! Interactive CLI demo for the task list.
//!
//! The binary is the view layer: it validates input before calling the
//! store, addresses tasks by list position, and keeps the header count line
//! live through a selector binding that re-renders only when the count
//! changes.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use tasklist::commands::{Command, header_line};
use tasklist::{AppState, TaskEnvironment, TaskId, TaskStore};
use taskstore_core::Binding;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let store = TaskStore::new(TaskEnvironment::system());

    // Header count line, re-rendered only when the task count changes.
    let header = Binding::with_observer(
        store.engine(),
        |state: &AppState| state.todos.len(),
        |count: &usize| println!("{}", header_line(*count)),
    );

    println!("=== Task List ===");
    println!("{}", header_line(header.get()));
    print_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };

        match Command::parse(&line?) {
            Ok(Command::Quit) => break,
            Ok(command) => run_command(&store, command),
            Err(error) => println!("error: {error}"),
        }
    }

    drop(header);
    Ok(())
}

fn run_command(store: &TaskStore, command: Command) {
    match command {
        Command::Add(title) => {
            store.add_todo(title, None);
        }
        Command::Toggle(position) => with_task_at(store, position, TaskStore::toggle_todo_done),
        Command::Remove(position) => with_task_at(store, position, TaskStore::remove_todo),
        Command::Login => {
            store.login();
            if let Some(name) = store.state(|s| s.user.as_ref().map(|u| u.name.clone())) {
                println!("logged in as {name}");
            }
        }
        Command::Logout => {
            store.logout();
            println!("logged out");
        }
        Command::List => print_tasks(store),
        Command::Help => print_help(),
        Command::Quit => {}
    }
}

/// Resolve a 1-based list position to a task id, then run `operation`.
fn with_task_at(store: &TaskStore, position: usize, operation: impl FnOnce(&TaskStore, &TaskId)) {
    let id = store.state(|state| {
        position
            .checked_sub(1)
            .and_then(|index| state.todos.get(index))
            .map(|task| task.id.clone())
    });

    match id {
        Some(id) => operation(store, &id),
        None => println!("no task #{position}"),
    }
}

fn print_tasks(store: &TaskStore) {
    let state = store.snapshot();
    if state.todos.is_empty() {
        println!("No tasks created!");
        return;
    }

    for (index, task) in state.todos.iter().enumerate() {
        let status = if task.completed { "✓" } else { " " };
        println!(
            "  {}. [{}] {} (invited by {})",
            index + 1,
            status,
            task.title,
            task.created_by
        );
    }
    println!("Completed: {}/{}", state.completed_count(), state.count());
}

fn print_help() {
    println!("commands:");
    println!("  add <title>    create a task");
    println!("  toggle <n>     flip completion of task n");
    println!("  rm <n>         remove task n");
    println!("  login / logout stub session");
    println!("  list           show tasks");
    println!("  quit           exit");
}
