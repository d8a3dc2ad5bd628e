use crate::cli::{Command, SessionCommand, SessionLine};
use crate::render::{ConsoleView, draft_line, render_state, task_json, tasks_json, toggled_line};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::BufRead;
use tasklist_core::config::Palette;
use tasklist_core::controller::TaskListController;
use tasklist_core::error::AppError;
use tasklist_core::model::{DraftTask, TaskId};
use tasklist_core::service::TaskService;

#[derive(Debug, Clone)]
pub struct Output {
    pub palette: Palette,
    pub json: bool,
}

impl Output {
    pub fn new(palette: Palette, json: bool) -> Self {
        Self { palette, json }
    }
}

/// One-shot mode: fetch the list, then perform a single command.
pub fn run_once<S: TaskService>(
    mut controller: TaskListController<S>,
    command: Command,
    output: &Output,
) -> Result<(), AppError> {
    controller.start()?;
    run_task_command(&mut controller, command, output)
}

/// Interactive mode. The list is fetched on startup and redrawn after every
/// change; errors are printed and the session carries on.
pub fn run_interactive<S: TaskService, R: BufRead>(
    mut controller: TaskListController<S>,
    mut input: R,
    output: &Output,
) -> Result<(), AppError> {
    controller.subscribe(Box::new(ConsoleView::new(
        output.palette.clone(),
        output.json,
    )));

    if let Err(err) = controller.start() {
        eprintln!("ERROR: {}", err);
    }

    let mut line = String::new();
    loop {
        line.clear();
        let bytes = input
            .read_line(&mut line)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }

        if trimmed == "help" || trimmed == "?" {
            print_session_help();
            continue;
        }

        let args = match split_command_line(trimmed) {
            Ok(args) if args.is_empty() => continue,
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tasklist".to_string());
        argv.extend(args);

        let parsed = match SessionLine::try_parse_from(argv) {
            Ok(parsed) => parsed,
            Err(err) if is_informational(&err) => {
                print!("{}", err.render());
                continue;
            }
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_session_command(&mut controller, parsed.command, output) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn run_session_command<S: TaskService>(
    controller: &mut TaskListController<S>,
    command: SessionCommand,
    output: &Output,
) -> Result<(), AppError> {
    match command {
        SessionCommand::Task(command) => run_task_command(controller, command, output)?,
        SessionCommand::Reload => controller.load()?,
        SessionCommand::Title { text } => {
            controller.set_draft_title(text);
            println!("{}", draft_line(controller.draft()));
        }
        SessionCommand::Description { text } => {
            controller.set_draft_description(text);
            println!("{}", draft_line(controller.draft()));
        }
        SessionCommand::Draft => println!("{}", draft_line(controller.draft())),
        SessionCommand::Submit => {
            let task = controller.create()?;
            if output.json {
                println!("{}", task_json(&task));
            } else {
                println!("Added task: {} ({})", task.title, task.id);
            }
        }
    }

    Ok(())
}

pub fn run_task_command<S: TaskService>(
    controller: &mut TaskListController<S>,
    command: Command,
    output: &Output,
) -> Result<(), AppError> {
    match command {
        Command::List => {
            if output.json {
                println!("{}", tasks_json(controller.tasks()));
            } else {
                print!("{}", render_state(controller.state(), &output.palette));
            }
        }
        Command::Add { title, description } => {
            let draft = DraftTask::new(title.unwrap_or_default(), description.unwrap_or_default());
            let task = controller.create_from(&draft)?;
            if output.json {
                println!("{}", task_json(&task));
            } else {
                println!("Added task: {} ({})", task.title, task.id);
            }
        }
        Command::Toggle { id } => {
            let task = controller
                .state()
                .find(&id)
                .cloned()
                .ok_or_else(|| AppError::invalid_input(format!("task not found: {}", id.trim())))?;
            let updated = controller.toggle_completion(&task)?;
            if output.json {
                println!("{}", task_json(&updated));
            } else {
                println!("{}", toggled_line(&updated));
            }
        }
        Command::Delete { id } => {
            let known = controller.state().find(&id).cloned();
            let task_id = match known.as_ref() {
                Some(task) => task.id.clone(),
                None => {
                    TaskId::parse(&id).ok_or_else(|| AppError::invalid_input("id is required"))?
                }
            };
            controller.remove(&task_id)?;
            if output.json {
                println!("{}", serde_json::json!({ "deleted": task_id }));
            } else {
                match known {
                    Some(task) => println!("Deleted task: {} ({})", task.title, task.id),
                    None => println!("Deleted task: {}", task_id),
                }
            }
        }
    }

    Ok(())
}

pub fn is_informational(err: &clap::Error) -> bool {
    matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

pub fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn print_session_help() {
    let mut cmd = SessionLine::command();
    let help = cmd.render_help();
    println!("{help}");
    println!("Also: help, ?, exit, quit");
}

/// Splits a session line into arguments. Double quotes group words and `\"`
/// escapes a quote inside them.
pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}
