/// CLI argument parsing and command handling.
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;

use crate::config::JournalConfig;
use crate::entry::{Entry, EntryField, ticket_url};
use crate::error::{JournalError, parse_date};
use crate::report::{ReportView, bar};
use crate::tickets::TicketSource;
use crate::types::{CatalogId, CatalogItem, CatalogKind, LinkField};
use crate::db;

#[derive(Parser)]
#[command(
    name = "devjournal",
    version,
    about = "DevJournal - A terminal-based developer journal and time tracker"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Entry {
        #[command(subcommand)]
        command: EntryCommand,
    },
    Project {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    Tag {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    Tickets {
        #[command(subcommand)]
        command: TicketsCommand,
    },
    /// Activity report for a date range (defaults to the current month).
    Report {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
pub struct DateArg {
    /// Day as YYYY-MM-DD, today when omitted.
    #[arg(short = 'd', long = "date")]
    pub date: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum EntryCommand {
    Add {
        #[command(flatten)]
        date: DateArg,
        /// Time range, digits only are kept ("0900-1030" or "09:00-10:30").
        #[arg(short = 't', long = "time")]
        time: Option<String>,
        #[arg(short = 'p', long = "project")]
        project: Option<String>,
        #[arg(long = "type")]
        entry_type: Option<String>,
        #[arg(short = 'm', long = "description")]
        description: Option<String>,
        /// Free-form duration such as "2h", "1.5h" or "2h30".
        #[arg(long)]
        duration: Option<String>,
        #[arg(long)]
        results: Option<String>,
        #[arg(long)]
        blockers: Option<String>,
        #[arg(long)]
        reflections: Option<String>,
        /// Space separated tags, a leading '#' is dropped.
        #[arg(long)]
        tags: Option<String>,
        /// Link as "text=url"; repeatable.
        #[arg(short = 'l', long = "link")]
        links: Vec<String>,
        /// Ticket key; repeatable.
        #[arg(short = 'k', long = "ticket")]
        tickets: Vec<String>,
    },
    List {
        #[command(flatten)]
        date: DateArg,
    },
    Delete {
        index: usize,
        #[command(flatten)]
        date: DateArg,
    },
    /// Replace one field, e.g. `entry set 0 duration 2h`.
    Set {
        index: usize,
        field: String,
        value: String,
        #[command(flatten)]
        date: DateArg,
    },
    /// Edit the text or url of a link, appending a link when `link` is one past the end.
    SetLink {
        index: usize,
        link: usize,
        field: String,
        value: String,
        #[command(flatten)]
        date: DateArg,
    },
    ToggleTicket {
        index: usize,
        key: String,
        #[command(flatten)]
        date: DateArg,
    },
    /// Add the tag when missing, remove it otherwise.
    ToggleTag {
        index: usize,
        name: String,
        #[command(flatten)]
        date: DateArg,
    },
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommand {
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Hex color like #RRGGBB, random when omitted.
        #[arg(long)]
        color: Option<String>,
    },
    List {
        /// Include inactive items.
        #[arg(short = 'a', long)]
        all: bool,
    },
    Edit {
        id: CatalogId,
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: String,
    },
    Toggle {
        id: CatalogId,
    },
    Delete {
        id: CatalogId,
    },
}

#[derive(Subcommand, Debug)]
pub enum TicketsCommand {
    Search { query: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration.
    Show,
    /// Write a default config file if none exists.
    Init,
}

/// Execute a one-shot CLI command.
pub fn run(command: Command, config: &JournalConfig, source: &dyn TicketSource, conn: &Connection) -> Result<()> {
    match command {
        Command::Entry { command } => run_entry(command, config, source, conn),
        Command::Project { command } => run_catalog(CatalogKind::Project, command, conn),
        Command::Tag { command } => run_catalog(CatalogKind::Tag, command, conn),
        Command::Tickets {
            command: TicketsCommand::Search { query },
        } => handle_tickets_search(&query, source, conn),
        Command::Report { from, to } => handle_report(from, to, conn),
        Command::Config { command } => handle_config(command, config),
    }
}

fn resolve_date(arg: &DateArg) -> Result<NaiveDate> {
    match &arg.date {
        Some(raw) => Ok(parse_date(raw)?),
        None => Ok(Local::now().date_naive()),
    }
}

fn run_entry(command: EntryCommand, config: &JournalConfig, source: &dyn TicketSource, conn: &Connection) -> Result<()> {
    match command {
        EntryCommand::Add {
            date,
            time,
            project,
            entry_type,
            description,
            duration,
            results,
            blockers,
            reflections,
            tags,
            links,
            tickets,
        } => {
            let date = resolve_date(&date)?;
            let mut entry = Entry::new(
                date,
                entry_type.as_deref().unwrap_or(&config.default_entry_type),
            );
            let fields = [
                (EntryField::TimeRange, time),
                (EntryField::Project, project),
                (EntryField::Description, description),
                (EntryField::Duration, duration),
                (EntryField::Results, results),
                (EntryField::Blockers, blockers),
                (EntryField::Reflections, reflections),
            ];
            for (field, value) in fields {
                if let Some(value) = value {
                    entry.set_field(field, value);
                }
            }
            if let Some(tags) = tags {
                entry.set_tags(&tags);
            }
            for (index, raw) in links.iter().enumerate() {
                let (text, url) = raw
                    .split_once('=')
                    .with_context(|| format!("link '{raw}' must look like text=url"))?;
                entry.add_link();
                entry.set_link(index, LinkField::Text, text.trim());
                entry.set_link(index, LinkField::Url, url.trim());
            }
            if !tickets.is_empty() {
                let pool = source.fetch_candidates("", &tickets)?;
                for key in &tickets {
                    if entry.tickets().iter().any(|t| &t.key == key) {
                        continue;
                    }
                    entry.toggle_ticket(key, &pool);
                    if !entry.tickets().iter().any(|t| &t.key == key) {
                        println!("Ticket '{key}' is unknown to the ticket source, skipped.");
                    }
                }
            }
            db::save_entry(date, &entry, conn)?;
            println!("Entry added to {date}.");
        }
        EntryCommand::List { date } => {
            let date = resolve_date(&date)?;
            let entries = db::load_entries_for_date(date, conn)?;
            if entries.is_empty() {
                println!("No entries on {date}.");
            }
            for (index, entry) in entries.iter().enumerate() {
                print_entry(index, entry, config);
            }
        }
        EntryCommand::Delete { index, date } => {
            let date = resolve_date(&date)?;
            if !db::delete_entry(date, index, conn)? {
                return Err(JournalError::EntryNotFound { date, index }.into());
            }
            println!("Entry #{index} on {date} deleted.");
        }
        EntryCommand::Set {
            index,
            field,
            value,
            date,
        } => {
            let field: EntryField = field.parse()?;
            let date = resolve_date(&date)?;
            let mut entries = db::load_entries_for_date(date, conn)?;
            let entry = entries
                .get_mut(index)
                .ok_or(JournalError::EntryNotFound { date, index })?;
            entry.set_field(field, value);
            db::update_entry(date, index, entry, conn)?;
            println!("{} of entry #{index} on {date} is now '{}'.", field.label(), entry.field(field));
        }
        EntryCommand::SetLink {
            index,
            link,
            field,
            value,
            date,
        } => {
            let field: LinkField = field.parse()?;
            let date = resolve_date(&date)?;
            let mut entries = db::load_entries_for_date(date, conn)?;
            let entry = entries
                .get_mut(index)
                .ok_or(JournalError::EntryNotFound { date, index })?;
            if link == entry.links().len() {
                entry.add_link();
            }
            if !entry.set_link(link, field, value) {
                println!("Entry #{index} has no link #{link}.");
                return Ok(());
            }
            db::update_entry(date, index, entry, conn)?;
            println!("Link #{link} of entry #{index} on {date} updated.");
        }
        EntryCommand::ToggleTicket { index, key, date } => {
            let date = resolve_date(&date)?;
            let mut entries = db::load_entries_for_date(date, conn)?;
            let entry = entries
                .get_mut(index)
                .ok_or(JournalError::EntryNotFound { date, index })?;
            let selected: Vec<String> = entry.tickets().iter().map(|t| t.key.clone()).collect();
            let pool = source.fetch_candidates(&key, &selected)?;
            let was_selected = selected.contains(&key);
            let now_selected = entry.toggle_ticket(&key, &pool).iter().any(|t| t.key == key);
            if was_selected == now_selected {
                println!("Ticket '{key}' is unknown to the ticket source, nothing changed.");
                return Ok(());
            }
            db::update_entry(date, index, entry, conn)?;
            let verb = if now_selected { "attached to" } else { "detached from" };
            println!("Ticket '{key}' {verb} entry #{index} on {date}.");
        }
        EntryCommand::ToggleTag { index, name, date } => {
            let date = resolve_date(&date)?;
            let mut entries = db::load_entries_for_date(date, conn)?;
            let entry = entries
                .get_mut(index)
                .ok_or(JournalError::EntryNotFound { date, index })?;
            let name = name.trim().trim_start_matches('#').to_string();
            let present = !entry.tags().contains(&name);
            entry.toggle_tag(&name, present);
            db::update_entry(date, index, entry, conn)?;
            let verb = if present { "added to" } else { "removed from" };
            println!("Tag '{name}' {verb} entry #{index} on {date}.");
        }
    }
    Ok(())
}

fn print_entry(index: usize, entry: &Entry, config: &JournalConfig) {
    let time = if entry.time_range().is_empty() { "--:--" } else { entry.time_range() };
    println!("#{index} [{time}] {} ({})", entry.project, entry.entry_type);
    for field in [
        EntryField::Description,
        EntryField::Duration,
        EntryField::Results,
        EntryField::Blockers,
        EntryField::Reflections,
    ] {
        let value = entry.field(field);
        if !value.is_empty() {
            println!("    {}: {value}", field.label());
        }
    }
    if !entry.tags().is_empty() {
        println!("    Tags: {}", entry.tags().iter().map(|t| format!("#{t}")).collect::<Vec<_>>().join(" "));
    }
    for link in entry.complete_links() {
        println!("    Link: {} <{}>", link.text, link.url);
    }
    for ticket in entry.tickets() {
        let summary = ticket.summary.as_deref().unwrap_or("");
        match &config.tracker_base_url {
            Some(base) => println!("    Ticket: {} {summary} <{}>", ticket.key, ticket_url(&ticket.key, base)),
            None => println!("    Ticket: {} {summary}", ticket.key),
        }
    }
}

fn run_catalog(target: CatalogKind, command: CatalogCommand, conn: &Connection) -> Result<()> {
    match command {
        CatalogCommand::Add {
            name,
            description,
            color,
        } => {
            if let Some(c) = &color {
                if !crate::color::is_valid_hex(c) {
                    println!("Invalid color format. Please provide a hex code like #RRGGBB.");
                    return Ok(());
                }
            }
            if db::query_item_by_name(target, &name, conn)?.is_some() {
                println!("{} '{name}' already exists.", target.label());
                return Ok(());
            }
            let id = match target {
                CatalogKind::Project => {
                    db::create_project(&name, description.as_deref(), color.as_deref(), conn)?
                }
                CatalogKind::Tag => db::create_tag(&name, description.as_deref(), color.as_deref(), conn)?,
            };
            println!("Created '{name}' with id {id}.");
        }
        CatalogCommand::List { all } => {
            let items = match target {
                CatalogKind::Project => db::list_projects(all, conn)?,
                CatalogKind::Tag => db::list_tags(all, conn)?,
            };
            for item in &items {
                print_catalog_item(item);
            }
        }
        CatalogCommand::Edit {
            id,
            name,
            description,
            color,
        } => {
            if !crate::color::is_valid_hex(&color) {
                println!("Invalid color format. Please provide a hex code like #RRGGBB.");
                return Ok(());
            }
            match target {
                CatalogKind::Project => {
                    db::update_project(id, &name, description.as_deref(), &color, conn)?
                }
                CatalogKind::Tag => db::update_tag(id, &name, description.as_deref(), &color, conn)?,
            }
            println!("#{id} updated.");
        }
        CatalogCommand::Toggle { id } => {
            let active = match target {
                CatalogKind::Project => db::toggle_project_status(id, conn)?,
                CatalogKind::Tag => db::toggle_tag_status(id, conn)?,
            };
            println!("#{id} is now {}.", if active { "active" } else { "inactive" });
        }
        CatalogCommand::Delete { id } => {
            match target {
                CatalogKind::Project => db::delete_project(id, conn)?,
                CatalogKind::Tag => db::delete_tag(id, conn)?,
            }
            println!("#{id} deleted.");
        }
    }
    Ok(())
}

fn print_catalog_item(item: &CatalogItem) {
    let status = if item.active { "" } else { " (inactive)" };
    let description = item.description.as_deref().unwrap_or("");
    println!("{:>4}  {}  {:<16}{status}  {description}", item.id, item.color, item.name);
}

fn handle_tickets_search(query: &str, source: &dyn TicketSource, conn: &Connection) -> Result<()> {
    let tickets = source.fetch_candidates(query, &[])?;
    db::set_preference(db::TICKET_QUERY, query, conn)?;
    if tickets.is_empty() {
        println!("No tickets match '{query}'.");
    }
    for ticket in tickets {
        println!("{:<10} {:<12} {}", ticket.key, ticket.status, ticket.summary);
    }
    Ok(())
}

fn handle_report(from: Option<String>, to: Option<String>, conn: &Connection) -> Result<()> {
    let today = Local::now().date_naive();
    let start = match from {
        Some(raw) => parse_date(&raw)?,
        None => crate::report::month_start(today),
    };
    let end = match to {
        Some(raw) => parse_date(&raw)?,
        None => today,
    };
    let report = db::generate_activity_report(start, end, conn)?;
    let view = ReportView::from_aggregate(&report);

    println!("Report {} .. {}", view.period_start, view.period_end);
    println!(
        "{} entries, {:.1}h total, {:.1}h per active day",
        view.total_entries, view.total_hours, view.average_hours_per_day
    );
    println!("\nProjects");
    for project in &view.project_bars {
        println!(
            "  {:<16} {} {:>5.1}h {:>3} entries",
            project.name,
            bar(project.fraction, 20),
            project.hours,
            project.entries
        );
    }
    println!("\nActivity types");
    for (name, count) in &view.activity_types {
        println!("  {name:<16} {count}");
    }
    println!("\nTags");
    for tag in &view.tag_cloud {
        println!("  #{:<15} {}", tag.name, tag.count);
    }
    println!("\nMonths");
    for month in &view.monthly {
        println!("  {} {} {:>5.1}h", month.month, bar(month.fraction, 20), month.hours);
    }
    Ok(())
}

fn handle_config(command: ConfigCommand, config: &JournalConfig) -> Result<()> {
    let path = JournalConfig::config_path()?;
    match command {
        ConfigCommand::Show => {
            println!("# {}", path.display());
            print!("{}", toml::to_string_pretty(config)?);
            println!("# database: {}", config.db_path());
        }
        ConfigCommand::Init => {
            if path.exists() {
                println!("Config already exists at {}.", path.display());
                return Ok(());
            }
            JournalConfig::default().save()?;
            println!("Config written to {}.", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{CatalogCommand, Cli, Command, EntryCommand};

    #[test]
    fn parses_entry_add() {
        let cli = Cli::try_parse_from([
            "devjournal", "entry", "add", "-d", "2026-10-01", "-t", "0900", "--tags", "#bug",
            "-k", "DEMO-1", "-k", "DEMO-2",
        ])
        .expect("valid arguments");

        match cli.command {
            Some(Command::Entry {
                command: EntryCommand::Add { date, time, tags, tickets, .. },
            }) => {
                assert_eq!(date.date.as_deref(), Some("2026-10-01"));
                assert_eq!(time.as_deref(), Some("0900"));
                assert_eq!(tags.as_deref(), Some("#bug"));
                assert_eq!(tickets, vec!["DEMO-1", "DEMO-2"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_entry_toggle_tag() {
        let cli = Cli::try_parse_from(["devjournal", "entry", "toggle-tag", "1", "#bug"]).expect("valid arguments");
        match cli.command {
            Some(Command::Entry {
                command: EntryCommand::ToggleTag { index, name, date },
            }) => {
                assert_eq!(index, 1);
                assert_eq!(name, "#bug");
                assert!(date.date.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_catalog_and_defaults_to_tui() {
        let cli = Cli::try_parse_from(["devjournal", "tag", "list", "--all"]).expect("valid arguments");
        assert!(matches!(
            cli.command,
            Some(Command::Tag { command: CatalogCommand::List { all: true } })
        ));

        let cli = Cli::try_parse_from(["devjournal"]).expect("no arguments");
        assert!(cli.command.is_none());
    }
}
