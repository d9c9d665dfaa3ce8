//! CLI command definitions

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use kindergarten_core::{AgeCategory, AttendanceStatus, Gender};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kindergarten")]
#[command(about = "Kindergarten registry and attendance journal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (missing file means defaults)
    #[arg(long, global = true, default_value = "kindergarten.toml")]
    pub config: PathBuf,

    /// Database file, overrides the config value
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log level, overrides the config value
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Print read results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or migrate the database
    Init,

    /// Manage groups
    #[command(subcommand)]
    Group(GroupCommand),

    /// Manage teachers
    #[command(subcommand)]
    Teacher(TeacherCommand),

    /// Manage children
    #[command(subcommand)]
    Child(ChildCommand),

    /// Manage parents and guardianship links
    #[command(subcommand)]
    Parent(ParentCommand),

    /// Daily attendance
    #[command(subcommand)]
    Attendance(AttendanceCommand),

    /// Monthly attendance journal
    #[command(subcommand)]
    Journal(JournalCommand),

    /// Headcounts and attendance across all groups for one day
    Summary {
        /// YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    /// Create a group
    Add {
        name: String,

        /// nursery, junior, middle, senior or preparatory
        #[arg(short, long)]
        age_category: AgeCategory,

        /// Primary teacher id
        #[arg(short, long)]
        teacher: Option<i64>,
    },

    /// List groups by name
    List,

    /// Link an additional teacher to a group
    AssignTeacher { group_id: i64, teacher_id: i64 },
}

#[derive(Args, Debug)]
pub struct NameArgs {
    pub last_name: String,
    pub first_name: String,

    #[arg(long)]
    pub middle_name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TeacherCommand {
    /// Register a teacher
    Add {
        #[command(flatten)]
        name: NameArgs,

        /// Years of work experience
        #[arg(long)]
        experience: Option<i64>,

        #[arg(long)]
        education: Option<String>,
    },

    /// List teachers, optionally filtered by name or contact
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ChildCommand {
    /// Enroll a child
    Add {
        last_name: String,
        first_name: String,

        #[arg(long)]
        middle_name: Option<String>,

        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: NaiveDate,

        /// M or F
        #[arg(long)]
        gender: Gender,

        #[arg(short, long)]
        group: Option<i64>,

        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        enrolled: Option<NaiveDate>,

        #[arg(long)]
        locker: Option<String>,
    },

    /// List children
    List {
        #[arg(short, long, conflicts_with = "unassigned")]
        group: Option<i64>,

        /// Only children without a group
        #[arg(long)]
        unassigned: bool,

        #[arg(short, long)]
        search: Option<String>,
    },

    /// Move children to a group, or detach them when no group is given
    Transfer {
        #[arg(required = true)]
        child_ids: Vec<i64>,

        #[arg(short, long)]
        group: Option<i64>,
    },

    /// Delete a child with its links, medical card and attendance
    Delete { child_id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum ParentCommand {
    /// Register a parent
    Add {
        #[command(flatten)]
        name: NameArgs,

        #[arg(long)]
        address: Option<String>,
    },

    /// Link a parent to a child
    Link {
        parent_id: i64,
        child_id: i64,

        /// mother, father, guardian, ...
        #[arg(short, long, default_value = "guardian")]
        relationship: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AttendanceCommand {
    /// Record a status for one child on one day
    Set {
        child_id: i64,
        date: NaiveDate,

        /// present, absent or sick
        status: AttendanceStatus,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Show a group's sheet for one day
    Sheet {
        group_id: i64,

        /// YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
pub enum JournalCommand {
    /// Print a group's month grid
    Show {
        group_id: i64,
        year: i32,
        month: u32,
    },

    /// Advance one cell: present, absent, sick, present
    Toggle { child_id: i64, date: NaiveDate },
}
