use tabled::{Table, Tabled};
use tabled::settings::{Style, Color, Modify};
use tabled::settings::object::Rows;
use tasklens_core::{ListSummary, TaskDto};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TITLE_WIDTH: usize = 40;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

#[derive(Tabled)]
struct ListRow {
    #[tabled(rename = "")]
    icon: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Tasks")]
    count: usize,
    #[tabled(rename = "Kind")]
    kind: String,
}

pub fn show_tasks(tasks: &[TaskDto]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let rows: Vec<TaskRow> = tasks.iter().map(task_row).collect();
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color

    println!("{}", table);
    println!("{} task(s)", tasks.len());
}

pub fn show_lists(lists: &[ListSummary]) {
    let rows: Vec<ListRow> = lists
        .iter()
        .map(|l| ListRow {
            icon: l.icon.clone(),
            id: l.id.clone(),
            name: l.name.clone(),
            count: l.count,
            kind: if l.is_system { "system" } else { "custom" }.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));

    println!("{}", table);
}

fn task_row(task: &TaskDto) -> TaskRow {
    let short_id: String = task.id.chars().take(8).collect();
    let status = if task.is_completed {
        "done"
    } else if task.overdue {
        "overdue"
    } else {
        "active"
    };
    let progress = if task.subtasks_total > 0 {
        format!("{}/{}", task.subtasks_done, task.subtasks_total)
    } else {
        "-".to_string()
    };
    let mut title = truncate(&task.title, TITLE_WIDTH);
    if task.is_recurring {
        title.push_str(" ↻");
    }

    TaskRow {
        id: short_id,
        title,
        priority: format!("{:?}", task.priority),
        due: task.due_date.clone().unwrap_or_else(|| "-".to_string()),
        tags: if task.tags.is_empty() { "-".to_string() } else { task.tags.join(", ") },
        status: status.to_string(),
        progress,
    }
}

/// Cuts `text` to at most `max` terminal columns, marking the cut with `…`.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
