use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use taskdeck_app::{
    CategoryPatch, CreateCategoryInput, CreateTaskInput, DueDatePatch, RecordStore,
    TaskFilterBuilder, TaskPatch, TaskService, parse_due_date, parse_priority_token,
};
use taskdeck_core::id::{CategoryId, TaskId};
use taskdeck_core::stats::weekly_activity;
use taskdeck_core::{Category, DayActivity, Task, TaskFilter, UserStats};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::{CategoryCommand, Command, OutputFormat};

/// Weekly bars are drawn against this many completions per day.
const WEEKLY_BAR_SCALE: usize = 5;

#[allow(clippy::too_many_lines)]
pub fn run<S: RecordStore>(command: Command, service: &TaskService<S>) -> Result<()> {
    match command {
        Command::Add {
            title,
            description,
            category,
            priority,
            due,
        } => {
            let category = category
                .as_deref()
                .map(|raw| resolve_category(service, raw))
                .transpose()?;
            let priority = priority.as_deref().map(parse_priority_token).transpose()?;
            let due_date = due.as_deref().map(parse_due_date).transpose()?;

            let task = service.create_task(CreateTaskInput {
                title,
                description,
                category,
                priority,
                due_date,
            })?;
            refresh_counts_best_effort(service);
            println!("created task: {} ({})", task.title, task.id);
        }

        Command::Ls {
            category,
            priority,
            due,
            status,
            text,
            format,
        } => {
            let category = category
                .as_deref()
                .map(|raw| resolve_category(service, raw))
                .transpose()?;
            let filter = build_filter(
                category,
                priority.as_deref(),
                due.as_deref(),
                status.as_deref(),
                text,
            )?;
            let filter_empty = filter.is_empty();

            let today = OffsetDateTime::now_utc().date();
            let mut tasks = service.list_filtered(&filter, today)?;
            sort_newest_first(&mut tasks);

            if tasks.is_empty() {
                if filter_empty {
                    println!("No tasks found");
                } else {
                    println!("No tasks matched the provided filters");
                }
                return Ok(());
            }

            match format {
                OutputFormat::Table => {
                    let categories = service.list_categories()?;
                    render_task_table(&tasks, &categories);
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tasks)?),
            }
        }

        Command::Show { id } => {
            let task = service.get_task(parse_task_id(&id)?)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }

        Command::Edit {
            id,
            title,
            description,
            category,
            priority,
            due,
            clear_due,
        } => {
            let task_id = parse_task_id(&id)?;
            let category = category
                .as_deref()
                .map(|raw| resolve_category(service, raw))
                .transpose()?;
            let priority = priority.as_deref().map(parse_priority_token).transpose()?;
            let due_date = if clear_due {
                Some(DueDatePatch::Clear)
            } else {
                due.as_deref()
                    .map(parse_due_date)
                    .transpose()?
                    .map(DueDatePatch::Set)
            };

            let patch = TaskPatch {
                title,
                description,
                category,
                priority,
                due_date,
            };
            if patch.is_empty() {
                bail!("Nothing to update; pass at least one field flag");
            }

            let task = service.update_task(task_id, patch)?;
            refresh_counts_best_effort(service);
            println!("updated task: {} ({})", task.title, task.id);
        }

        Command::Done { id } => {
            let task = service.toggle_complete(parse_task_id(&id)?)?;
            if task.completed {
                println!("completed task: {} ({})", task.title, task.id);
            } else {
                println!("reopened task: {} ({})", task.title, task.id);
            }
        }

        Command::Rm { ids } => {
            let ids = parse_task_ids(ids)?;
            if let [single] = ids.as_slice() {
                service.delete_task(*single)?;
                println!("deleted task: {single}");
            } else {
                let deleted = service.delete_tasks(&ids)?;
                println!("deleted {deleted} of {} tasks", ids.len());
            }
            refresh_counts_best_effort(service);
        }

        Command::Search { query, format } => {
            let mut tasks = service.search_tasks(&query)?;
            sort_newest_first(&mut tasks);

            if tasks.is_empty() {
                println!("No tasks matched '{query}'");
                return Ok(());
            }

            match format {
                OutputFormat::Table => {
                    let categories = service.list_categories()?;
                    render_task_table(&tasks, &categories);
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tasks)?),
            }
        }

        Command::Stats { format } => {
            let tasks = service.list_tasks()?;
            let today = OffsetDateTime::now_utc().date();
            let stats = UserStats::from_tasks(&tasks, today);
            let weekly = weekly_activity(&tasks, today);

            match format {
                OutputFormat::Table => render_stats(&stats, &weekly),
                OutputFormat::Json => {
                    let payload = serde_json::json!({
                        "summary": stats,
                        "weeklyActivity": weekly,
                    });
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
            }
        }

        Command::Category(command) => run_category(command, service)?,

        Command::Tui => unreachable!("Tui command routed to the dashboard"),
    }

    Ok(())
}

fn run_category<S: RecordStore>(command: CategoryCommand, service: &TaskService<S>) -> Result<()> {
    match command {
        CategoryCommand::Ls { format } => {
            let categories = service.list_categories()?;
            if categories.is_empty() {
                println!("No categories found");
                return Ok(());
            }
            match format {
                OutputFormat::Table => render_category_table(&categories),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&categories)?),
            }
        }

        CategoryCommand::Add { name, color, icon } => {
            let category = service.create_category(CreateCategoryInput { name, color, icon })?;
            println!("created category: {} ({})", category.name, category.id);
        }

        CategoryCommand::Edit {
            id,
            name,
            color,
            icon,
        } => {
            let patch = CategoryPatch { name, color, icon };
            if patch.is_empty() {
                bail!("Nothing to update; pass at least one field flag");
            }
            let category = service.update_category(parse_category_id(&id)?, patch)?;
            println!("updated category: {} ({})", category.name, category.id);
        }

        CategoryCommand::Rm { id } => {
            let id = parse_category_id(&id)?;
            service.delete_category(id)?;
            println!("deleted category: {id}");
        }
    }

    Ok(())
}

fn build_filter(
    category: Option<CategoryId>,
    priority: Option<&str>,
    due: Option<&str>,
    status: Option<&str>,
    text: Option<String>,
) -> Result<TaskFilter> {
    let mut filter = TaskFilterBuilder::new()
        .with_priority(priority)?
        .with_due(due)?
        .with_status(status)?
        .with_text(text)
        .build();
    filter.category = category;
    Ok(filter)
}

/// Resolve a category argument given either as an id or as a name.
fn resolve_category<S: RecordStore>(service: &TaskService<S>, raw: &str) -> Result<CategoryId> {
    if let Ok(id) = CategoryId::from_str(raw) {
        return Ok(id);
    }
    service
        .list_categories()?
        .into_iter()
        .find(|category| category.name.eq_ignore_ascii_case(raw))
        .map(|category| category.id)
        .ok_or_else(|| anyhow!("Unknown category: {raw}"))
}

fn refresh_counts_best_effort<S: RecordStore>(service: &TaskService<S>) {
    if let Err(err) = service.refresh_category_counts() {
        tracing::warn!("Failed to refresh category counts: {err}");
    }
}

fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

fn render_task_table(tasks: &[Task], categories: &[Category]) {
    let names: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|category| (category.id, category.name.as_str()))
        .collect();

    println!("ID | Done | Priority | Due | Category | Title | Updated");
    println!("-- | ---- | -------- | --- | -------- | ----- | -------");

    for task in tasks {
        let done = if task.completed { "x" } else { "-" };
        let due = task
            .due_date
            .map_or_else(|| "-".to_owned(), |date| date.to_string());
        let category = names.get(&task.category_id).copied().unwrap_or("-");

        println!(
            "{} | {} | {} | {} | {} | {} | {}",
            task.id,
            done,
            task.priority,
            due,
            category,
            task.title,
            format_timestamp(task.updated_at)
        );
    }
}

fn render_category_table(categories: &[Category]) {
    println!("ID | Name | Color | Icon | Tasks");
    println!("-- | ---- | ----- | ---- | -----");

    for category in categories {
        println!(
            "{} | {} | {} | {} | {}",
            category.id, category.name, category.color, category.icon, category.task_count
        );
    }
}

fn render_stats(stats: &UserStats, weekly: &[DayActivity]) {
    println!("Total tasks:     {}", stats.total_tasks);
    println!("Completed:       {}", stats.completed_tasks);
    println!("Completed today: {}", stats.today_completed);
    println!("Completion rate: {}%", stats.completion_rate);
    println!("Streak:          {} day(s)", stats.streak);
    println!();
    println!("Last 7 days:");

    for day in weekly {
        let bar = "#".repeat(day.completed.min(WEEKLY_BAR_SCALE));
        println!("  {} {:<5} {}", day.weekday, bar, day.completed);
    }
}

fn format_timestamp(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_else(|_| ts.to_string())
}

fn parse_task_ids(inputs: Vec<String>) -> Result<Vec<TaskId>> {
    inputs.into_iter().map(|raw| parse_task_id(&raw)).collect()
}

fn parse_task_id(raw: &str) -> Result<TaskId> {
    TaskId::from_str(raw).with_context(|| format!("Invalid task id: {raw}"))
}

fn parse_category_id(raw: &str) -> Result<CategoryId> {
    CategoryId::from_str(raw).with_context(|| format!("Invalid category id: {raw}"))
}
