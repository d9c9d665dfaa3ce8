//! `kindergarten` command-line entry point.
//!
//! Loads config, starts file logging, opens the database and dispatches one
//! subcommand per invocation.

mod commands;
mod output;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use commands::{
    AttendanceCommand, ChildCommand, Cli, Commands, GroupCommand, JournalCommand, NameArgs,
    ParentCommand, TeacherCommand,
};
use kindergarten_core::db::migrations::schema_version;
use kindergarten_core::{
    init_logging, AppConfig, ChildListQuery, ChildRepository, GroupFilter, GroupRepository,
    Guardianship, Kindergarten, NewChild, NewGroup, ParentProfile, ParentRepository, PersonName,
    TeacherProfile, TeacherRepository,
};
use log::error;
use serde::Serialize;

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            error!("event=cli_command module=cli status=error");
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(&cli.config)?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_logging(&config.log_level, &config.log_dir).context("failed to start logging")?;

    let kg = Kindergarten::open(&config.database_path).with_context(|| {
        format!(
            "failed to open database `{}`",
            config.database_path.display()
        )
    })?;

    let out = Output { json: cli.json };
    match cli.command {
        Commands::Init => println!(
            "Initialized {} (schema version {})",
            config.database_path.display(),
            schema_version(kg.connection())?
        ),
        Commands::Group(command) => run_group(&kg, command, out)?,
        Commands::Teacher(command) => run_teacher(&kg, command, out)?,
        Commands::Child(command) => run_child(&kg, command, out)?,
        Commands::Parent(command) => run_parent(&kg, command)?,
        Commands::Attendance(command) => run_attendance(&kg, command, out)?,
        Commands::Journal(command) => run_journal(&kg, command, out)?,
        Commands::Summary { date } => {
            let summary = kg.summary().summary(date.unwrap_or_else(today))?;
            out.print(&summary, output::format_summary)?;
        }
    }

    kg.close().context("failed to close database")?;
    Ok(())
}

/// Chooses between JSON and plain text for read commands.
#[derive(Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    fn print<T>(self, value: &T, text: impl FnOnce(&T) -> String) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", ensure_newline(text(value)));
        }
        Ok(())
    }
}

fn ensure_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn run_group(kg: &Kindergarten, command: GroupCommand, out: Output) -> Result<()> {
    let groups = kg.groups();
    match command {
        GroupCommand::Add {
            name,
            age_category,
            teacher,
        } => {
            let id = groups.create_group(&NewGroup {
                group_name: name,
                age_category,
                teacher_id: teacher,
            })?;
            println!("Created group {id}");
        }
        GroupCommand::List => {
            out.print(groups.list_groups()?.as_slice(), output::format_group_list)?;
        }
        GroupCommand::AssignTeacher {
            group_id,
            teacher_id,
        } => {
            groups.assign_teacher(group_id, teacher_id)?;
            println!("Assigned teacher {teacher_id} to group {group_id}");
        }
    }
    Ok(())
}

fn person_name(name: &NameArgs) -> PersonName {
    PersonName {
        last_name: name.last_name.clone(),
        first_name: name.first_name.clone(),
        middle_name: name.middle_name.clone(),
    }
}

fn run_teacher(kg: &Kindergarten, command: TeacherCommand, out: Output) -> Result<()> {
    let teachers = kg.teachers();
    match command {
        TeacherCommand::Add {
            name,
            experience,
            education,
        } => {
            let id = teachers.create_teacher(&TeacherProfile {
                name: person_name(&name),
                phone: name.phone,
                email: name.email,
                education,
                experience,
                ..TeacherProfile::default()
            })?;
            println!("Created teacher {id}");
        }
        TeacherCommand::List { search } => {
            let found = match search {
                Some(term) => teachers.search_teachers(&term)?,
                None => teachers.list_teachers()?,
            };
            out.print(found.as_slice(), output::format_teacher_list)?;
        }
    }
    Ok(())
}

fn run_child(kg: &Kindergarten, command: ChildCommand, out: Output) -> Result<()> {
    let children = kg.children();
    match command {
        ChildCommand::Add {
            last_name,
            first_name,
            middle_name,
            birth_date,
            gender,
            group,
            enrolled,
            locker,
        } => {
            let id = children.create_child(&NewChild {
                last_name,
                first_name,
                middle_name,
                birth_date,
                gender,
                group_id: group,
                enrollment_date: enrolled.unwrap_or_else(today),
                locker_symbol: locker,
            })?;
            println!("Enrolled child {id}");
        }
        ChildCommand::List {
            group,
            unassigned,
            search,
        } => {
            let group = match (group, unassigned) {
                (Some(id), _) => GroupFilter::Only(id),
                (None, true) => GroupFilter::Unassigned,
                (None, false) => GroupFilter::Any,
            };
            let found = children.list_children(&ChildListQuery { group, search })?;
            out.print(found.as_slice(), output::format_child_list)?;
        }
        ChildCommand::Transfer { child_ids, group } => {
            let moved = children.bulk_transfer(&child_ids, group)?;
            match group {
                Some(group_id) => println!("Moved {moved} child(ren) to group {group_id}"),
                None => println!("Detached {moved} child(ren) from their group"),
            }
        }
        ChildCommand::Delete { child_id } => {
            children.delete_child(child_id)?;
            println!("Deleted child {child_id}");
        }
    }
    Ok(())
}

fn run_parent(kg: &Kindergarten, command: ParentCommand) -> Result<()> {
    let parents = kg.parents();
    match command {
        ParentCommand::Add { name, address } => {
            let id = parents.create_parent(&ParentProfile {
                name: person_name(&name),
                phone: name.phone,
                email: name.email,
                address,
            })?;
            println!("Created parent {id}");
        }
        ParentCommand::Link {
            parent_id,
            child_id,
            relationship,
        } => {
            parents.link_child(&Guardianship {
                parent_id,
                child_id,
                relationship,
            })?;
            println!("Linked parent {parent_id} to child {child_id}");
        }
    }
    Ok(())
}

fn run_attendance(kg: &Kindergarten, command: AttendanceCommand, out: Output) -> Result<()> {
    let attendance = kg.attendance();
    match command {
        AttendanceCommand::Set {
            child_id,
            date,
            status,
            notes,
        } => {
            let record = attendance.mark(child_id, date, status, notes.as_deref())?;
            println!(
                "Child {} on {}: {}",
                record.child_id,
                record.date.format("%Y-%m-%d"),
                record.status
            );
        }
        AttendanceCommand::Sheet { group_id, date } => {
            let rows = attendance.daily_sheet(group_id, date.unwrap_or_else(today))?;
            out.print(rows.as_slice(), output::format_daily_sheet)?;
        }
    }
    Ok(())
}

fn run_journal(kg: &Kindergarten, command: JournalCommand, out: Output) -> Result<()> {
    let journal = kg.journal();
    match command {
        JournalCommand::Show {
            group_id,
            year,
            month,
        } => {
            let grid = journal.build_month(group_id, year, month)?;
            if out.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output::journal_json(&grid))?
                );
            } else {
                print!("{}", ensure_newline(output::format_journal(&grid)));
            }
        }
        JournalCommand::Toggle { child_id, date } => {
            let status = journal.toggle_cell(child_id, date)?;
            println!(
                "Child {child_id} on {}: {status}",
                date.format("%Y-%m-%d")
            );
        }
    }
    Ok(())
}
