mod render;

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::Local;
use clap::Parser;
use serde::Serialize;
use tasklens_core::time::format_date;
use tasklens_core::{
    parse_human_date, DateRange, DateRangeType, FileSmartListRepository, FileTaskRepository,
    FilterEngine, ListFilter, Priority, SmartList, SmartListService, SortCriteria, TodoStatus,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tasklens")]
#[command(about = "Smart lists over your task collection", long_about = None)]
struct Cli {
    /// Directory holding tasks.json and smart_lists.json (default: ~/.tasklens)
    #[arg(long, global = true, env = "TASKLENS_DIR")]
    data_dir: Option<PathBuf>,

    /// Evaluate relative ranges as if today were this date (e.g. 2025-06-01, tom, +3d)
    #[arg(long, global = true)]
    today: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show every smart list with its task count
    Lists,
    /// Show the tasks of one smart list
    Show {
        /// List ID (e.g. system_today)
        id: String,
    },
    /// Search titles, descriptions, notes and tags
    Search {
        query: String,
    },
    /// Run an ad-hoc filter
    Filter {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, value_parser = parse_sort, default_value = "due")]
        sort: SortCriteria,
    },
    /// Save a filter as a custom smart list
    Save {
        name: String,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long, default_value_t = 0)]
        order: i32,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, value_parser = parse_sort, default_value = "due")]
        sort: SortCriteria,
    },
    /// Change a custom smart list; filter flags, when given, replace its filter
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        order: Option<i32>,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, value_parser = parse_sort)]
        sort: Option<SortCriteria>,
    },
    /// Delete a custom smart list
    Remove {
        id: String,
    },
}

#[derive(clap::Args, Debug, Default, PartialEq)]
struct FilterArgs {
    /// none, low, medium, high (repeatable)
    #[arg(long = "priority", value_parser = parse_priority)]
    priorities: Vec<Priority>,
    /// Match tasks carrying any of these tags (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// today, tomorrow, this-week, next-week, this-month, overdue, custom
    #[arg(long, value_parser = parse_range_type)]
    range: Option<DateRangeType>,
    /// Lower bound of a custom range
    #[arg(long)]
    from: Option<String>,
    /// Upper bound of a custom range
    #[arg(long)]
    to: Option<String>,
    /// active, completed, overdue (repeatable)
    #[arg(long = "status", value_parser = parse_status)]
    statuses: Vec<TodoStatus>,
    /// Goal IDs (repeatable)
    #[arg(long = "goal")]
    goal_ids: Vec<String>,
    #[arg(long, value_name = "BOOL", action = clap::ArgAction::Set)]
    has_subtasks: Option<bool>,
    #[arg(long, value_name = "BOOL", action = clap::ArgAction::Set)]
    has_due_date: Option<bool>,
    #[arg(long, value_name = "BOOL", action = clap::ArgAction::Set)]
    recurring: Option<bool>,
}

impl FilterArgs {
    fn is_empty(&self) -> bool {
        *self == FilterArgs::default()
    }

    /// Custom bounds are resolved to absolute dates so a saved list keeps
    /// its meaning.
    fn into_filter(self, engine: &FilterEngine) -> Result<ListFilter> {
        let has_bounds = self.from.is_some() || self.to.is_some();
        let date_range = match self.range {
            Some(range_type) if range_type != DateRangeType::Custom => {
                if has_bounds {
                    bail!("--from/--to only apply to a custom range");
                }
                Some(DateRange::of(range_type))
            }
            Some(_) => Some(custom_range(self.from, self.to, engine)?),
            None if has_bounds => Some(custom_range(self.from, self.to, engine)?),
            None => None,
        };

        Ok(ListFilter {
            priorities: self.priorities,
            tags: self.tags,
            date_range,
            status: self.statuses,
            goal_ids: self.goal_ids,
            has_subtasks: self.has_subtasks,
            has_due_date: self.has_due_date,
            is_recurring: self.recurring,
        })
    }
}

fn custom_range(from: Option<String>, to: Option<String>, engine: &FilterEngine) -> Result<DateRange> {
    let resolve = |input: Option<String>| -> Result<Option<String>> {
        input
            .map(|d| parse_human_date(&d, engine.today()).map(format_date))
            .transpose()
    };
    Ok(DateRange::custom(resolve(from)?, resolve(to)?))
}

fn parse_priority(pri_str: &str) -> Result<Priority, String> {
    match pri_str.to_lowercase().as_str() {
        "n" | "none" => Ok(Priority::None),
        "l" | "low" => Ok(Priority::Low),
        "m" | "medium" | "med" => Ok(Priority::Medium),
        "h" | "high" => Ok(Priority::High),
        other => Err(format!("unknown priority '{}'", other)),
    }
}

fn parse_status(status_str: &str) -> Result<TodoStatus, String> {
    match status_str.to_lowercase().as_str() {
        "active" => Ok(TodoStatus::Active),
        "completed" | "done" => Ok(TodoStatus::Completed),
        "overdue" => Ok(TodoStatus::Overdue),
        other => Err(format!("unknown status '{}'", other)),
    }
}

fn parse_range_type(range_str: &str) -> Result<DateRangeType, String> {
    match range_str.to_lowercase().replace('_', "-").as_str() {
        "today" => Ok(DateRangeType::Today),
        "tomorrow" => Ok(DateRangeType::Tomorrow),
        "this-week" | "week" => Ok(DateRangeType::ThisWeek),
        "next-week" => Ok(DateRangeType::NextWeek),
        "this-month" | "month" => Ok(DateRangeType::ThisMonth),
        "overdue" => Ok(DateRangeType::Overdue),
        "custom" => Ok(DateRangeType::Custom),
        other => Err(format!("unknown date range '{}'", other)),
    }
}

fn parse_sort(sort_str: &str) -> Result<SortCriteria, String> {
    match sort_str.to_lowercase().as_str() {
        "due" | "due-date" => Ok(SortCriteria::DueDate),
        "priority" | "pri" => Ok(SortCriteria::Priority),
        "created" | "created-date" => Ok(SortCriteria::CreatedDate),
        "title" => Ok(SortCriteria::Title),
        "order" | "custom" => Ok(SortCriteria::CustomOrder),
        other => Err(format!("unknown sort '{}'", other)),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let engine = match &cli.today {
        Some(d) => FilterEngine::at(parse_human_date(d, Local::now().date_naive())?),
        None => FilterEngine::new(),
    };
    let tasks = FileTaskRepository::new(cli.data_dir.clone())?;
    let lists = FileSmartListRepository::new(cli.data_dir.clone())?;
    let service = SmartListService::new(tasks, lists, engine);

    match cli.command {
        Commands::Lists => {
            let summaries = service.list_summaries()?;
            if cli.json {
                print_json(&summaries)?;
            } else {
                render::show_lists(&summaries);
            }
        }
        Commands::Show { id } => {
            let list = service.find_list(&id)?;
            let tasks = service.list_tasks(&id)?;
            if cli.json {
                print_json(&tasks)?;
            } else {
                println!("{} {} ({})", list.icon, list.name, format_date(engine.today()));
                render::show_tasks(&tasks);
            }
        }
        Commands::Search { query } => {
            let tasks = service.search(&query)?;
            if cli.json {
                print_json(&tasks)?;
            } else {
                render::show_tasks(&tasks);
            }
        }
        Commands::Filter { filter, sort } => {
            let filter = filter.into_filter(&engine)?;
            let tasks = service.query(&filter, sort)?;
            if cli.json {
                print_json(&tasks)?;
            } else {
                render::show_tasks(&tasks);
            }
        }
        Commands::Save { name, icon, color, order, filter, sort } => {
            let mut list = SmartList {
                name,
                filters: filter.into_filter(&engine)?,
                sort_by: sort,
                order,
                ..Default::default()
            };
            if let Some(icon) = icon {
                list.icon = icon;
            }
            if let Some(color) = color {
                list.color = color;
            }
            let created = service.create_list(list)?;
            if cli.json {
                print_json(&created)?;
            } else {
                println!("Smart list saved: {} (ID: {})", created.name, created.id);
            }
        }
        Commands::Edit { id, name, icon, color, order, filter, sort } => {
            let mut list = service.find_list(&id)?;
            if let Some(name) = name {
                list.name = name;
            }
            if let Some(icon) = icon {
                list.icon = icon;
            }
            if let Some(color) = color {
                list.color = color;
            }
            if let Some(order) = order {
                list.order = order;
            }
            if !filter.is_empty() {
                list.filters = filter.into_filter(&engine)?;
            }
            if let Some(sort) = sort {
                list.sort_by = sort;
            }
            service.update_list(&list)?;
            if cli.json {
                print_json(&list)?;
            } else {
                println!("Smart list updated: {} (ID: {})", list.name, list.id);
            }
        }
        Commands::Remove { id } => {
            service.delete_list(&id)?;
            println!("Smart list removed: {}", id);
        }
    }
    Ok(())
}
