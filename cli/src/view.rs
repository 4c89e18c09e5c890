use chrono::NaiveDateTime;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use upnext_core::{Priority, TaskView};

#[derive(Tabled)]
struct UpcomingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Description")]
    desc: String,
}

#[derive(Tabled)]
struct CompletedRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Description")]
    desc: String,
    #[tabled(rename = "Done")]
    done: String,
    #[tabled(rename = "Purged")]
    purge: String,
}

pub fn render_upcoming(views: &[TaskView]) -> String {
    if views.is_empty() {
        return "No upcoming tasks.".to_string();
    }

    let rows = views.iter().map(|v| UpcomingRow {
        id: v.id.to_string(),
        due: v.due.clone(),
        priority: priority_label(v.priority).to_string(),
        desc: v.description.clone(),
    });
    styled(Table::new(rows))
}

pub fn render_completed(views: &[TaskView]) -> String {
    if views.is_empty() {
        return "No completed tasks.".to_string();
    }

    let rows = views.iter().map(|v| CompletedRow {
        id: v.id.to_string(),
        desc: v.description.clone(),
        done: timestamp_label(v.completed_at),
        purge: timestamp_label(v.purge_at),
    });
    styled(Table::new(rows))
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::None => "-",
        Priority::Low => "low",
        Priority::Medium => "medium",
        Priority::High => "high",
    }
}

fn timestamp_label(at: Option<NaiveDateTime>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
