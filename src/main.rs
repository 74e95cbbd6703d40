use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use u_roster::allocator::{DutyAllocator, RosterSummary};
use u_roster::config::Config;
use u_roster::grouping::GroupedRoster;
use u_roster::registry::Registry;
use u_roster::store::DataStore;
use u_roster::validation::{check_title, validate_records};
use u_roster::{Result, RosterError};

#[derive(Parser)]
#[command(name = "u-roster")]
#[command(version)]
#[command(
    about = "Generate exam duty rosters from stored members, rooms and timing slots",
    long_about = None
)]
struct Cli {
    /// Config file (defaults to ./u-roster.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory, overriding the config
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create missing data files, copying defaults when available
    Init {
        /// Directory with default members.json / rooms.json / timings.json
        #[arg(long)]
        defaults: Option<PathBuf>,
    },
    /// Manage members
    #[command(subcommand)]
    Member(MemberCommand),
    /// Manage rooms
    #[command(subcommand)]
    Room(RoomCommand),
    /// Manage timing slots
    #[command(subcommand)]
    Slot(SlotCommand),
    /// Allocate duties and print the roster
    Assign {
        /// Roster title, e.g. "SSC Exam"
        #[arg(short, long)]
        title: String,

        /// Persons per room, special member included
        #[arg(short, long)]
        per_room: Option<usize>,

        /// Shuffle seed for a reproducible roster
        #[arg(long)]
        seed: Option<u64>,

        /// Print the flat assignment list as JSON
        #[arg(long)]
        json: bool,

        /// Print fill statistics after the roster
        #[arg(long)]
        summary: bool,
    },
}

#[derive(Subcommand)]
enum MemberCommand {
    /// Add a general member
    Add { name: String, id: String },
    /// Remove a member
    Remove { id: String },
    /// Toggle the special flag
    Special { id: String },
    /// List members by name
    List,
}

#[derive(Subcommand)]
enum RoomCommand {
    /// Add a room
    Add { block: String, room_no: String },
    /// Remove a room by its listed index
    Remove { index: usize },
    /// List rooms by block
    List,
}

#[derive(Subcommand)]
enum SlotCommand {
    /// Add a slot on DATE (YYYY-MM-DD) from FROM to TO (HH:MM, local time)
    Add {
        date: NaiveDate,
        #[arg(value_parser = parse_clock)]
        from: NaiveTime,
        #[arg(value_parser = parse_clock)]
        to: NaiveTime,
    },
    /// Remove a slot by its listed index
    Remove { index: usize },
    /// List slots by start time
    List,
}

fn parse_clock(s: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("expected HH:MM: {e}"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            if let RosterError::Rejected(errors) = &e {
                for v in errors {
                    eprintln!("  - {v}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &Config) -> Result<()> {
    let store = DataStore::open(&config.data_dir)?;

    match command {
        Commands::Init { defaults } => {
            let defaults = defaults.or_else(|| config.defaults_dir.clone());
            store.ensure_defaults(defaults.as_deref())?;
            info!(dir = %store.dir().display(), "data directory ready");
        }
        Commands::Member(cmd) => member(cmd, Registry::open(store))?,
        Commands::Room(cmd) => room(cmd, Registry::open(store))?,
        Commands::Slot(cmd) => slot(cmd, Registry::open(store))?,
        Commands::Assign {
            title,
            per_room,
            seed,
            json,
            summary,
        } => {
            check_title(&title)?;
            let per_room = per_room.or(config.per_room).unwrap_or(0);
            let registry = Registry::open(store);
            assign(&registry, &title, per_room, seed.or(config.seed), json, summary)?;
        }
    }
    Ok(())
}

fn member(cmd: MemberCommand, mut registry: Registry) -> Result<()> {
    match cmd {
        MemberCommand::Add { name, id } => {
            let m = registry.add_member(&name, &id)?;
            println!("Member added: {} ({})", m.name, m.id);
        }
        MemberCommand::Remove { id } => {
            let m = registry.remove_member(&id)?;
            println!("Member deleted: {} ({})", m.name, m.id);
        }
        MemberCommand::Special { id } => {
            let special = registry.toggle_special(&id)?;
            println!(
                "Member marked as {}",
                if special { "Special" } else { "Normal" }
            );
        }
        MemberCommand::List => {
            for (n, m) in registry.members_by_name().iter().enumerate() {
                let star = if m.special { "*" } else { "" };
                println!("{:>3}. {:<50} {:<20} {star}", n + 1, m.name, m.id);
            }
            println!("Total members: {}", registry.members().len());
        }
    }
    Ok(())
}

fn room(cmd: RoomCommand, mut registry: Registry) -> Result<()> {
    match cmd {
        RoomCommand::Add { block, room_no } => {
            let r = registry.add_room(&block, &room_no)?;
            println!("Room added: block {} room {}", r.block, r.room_no);
        }
        RoomCommand::Remove { index } => {
            let r = registry.remove_room(index)?;
            println!("Room deleted: block {} room {}", r.block, r.room_no);
        }
        RoomCommand::List => {
            for (block, rooms) in registry.rooms_by_block() {
                let plural = if rooms.len() > 1 { "s" } else { "" };
                println!("Block {block} ({} Room{plural})", rooms.len());
                for (idx, r) in rooms {
                    println!("  [{idx}] Room No: {}", r.room_no);
                }
            }
            println!("Grand Total Rooms: {}", registry.rooms().len());
        }
    }
    Ok(())
}

fn slot(cmd: SlotCommand, mut registry: Registry) -> Result<()> {
    match cmd {
        SlotCommand::Add { date, from, to } => {
            let s = registry.add_timing_on(date, from, to, &Local, Utc::now())?;
            println!(
                "Slot added: {} {}",
                s.date_label(&Local),
                s.time_label(&Local)
            );
        }
        SlotCommand::Remove { index } => {
            let s = registry.remove_timing(index)?;
            println!(
                "Slot deleted: {} {}",
                s.date_label(&Local),
                s.time_label(&Local)
            );
        }
        SlotCommand::List => {
            for (idx, s) in registry.timings_by_start() {
                println!("[{idx}] {} {}", s.date_label(&Local), s.time_label(&Local));
            }
            println!("Total slots: {}", registry.timings().len());
        }
    }
    Ok(())
}

fn assign(
    registry: &Registry,
    title: &str,
    per_room: usize,
    seed: Option<u64>,
    json: bool,
    summary: bool,
) -> Result<()> {
    if let Err(problems) =
        validate_records(registry.members(), registry.rooms(), registry.timings())
    {
        for p in problems {
            tracing::warn!(kind = ?p.kind, "{p}");
        }
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let roster = DutyAllocator::new().allocate(
        registry.members(),
        registry.rooms(),
        registry.timings(),
        per_room,
        &mut rng,
    )?;
    info!(assignments = roster.assignment_count(), "duties assigned");

    if json {
        let text = serde_json::to_string_pretty(&roster).map_err(|source| RosterError::Encode {
            path: PathBuf::from("<stdout>"),
            source,
        })?;
        println!("{text}");
    } else {
        print_roster(title, &GroupedRoster::group_by_timing(&roster.assignments));
    }

    if summary {
        let s = RosterSummary::calculate(
            &roster,
            registry.members(),
            registry.rooms(),
            registry.timings(),
            per_room,
        );
        println!();
        println!(
            "Members: {}  Rooms: {}  Slots: {}",
            s.total_members, s.total_rooms, s.total_slots
        );
        println!(
            "Assignments: {} ({} special, {} general)",
            s.assignments, s.special_assignments, s.general_assignments
        );
        println!("Under-filled rooms: {} of {}", s.underfilled_pairs, s.pairs);
        let seats = per_room * registry.timings().len();
        for room in registry.rooms() {
            let seated = roster.assignments_for_room(room).len();
            println!("  {room}: {seated} of {seats} seats");
        }
        if !s.unused_members.is_empty() {
            println!("Not assigned: {}", s.unused_members.join(", "));
        }
    }
    Ok(())
}

fn print_roster(title: &str, grouped: &GroupedRoster) {
    for day in &grouped.dates {
        for slot in &day.slots {
            println!("{title}");
            println!("Date: {}    Time: {}", day.date, slot.time);
            println!("{:<6} {:<8} {:<20} Name", "Block", "Room No.", "ID");
            for block in &slot.blocks {
                for (room_no, entries) in block.by_room() {
                    for a in entries {
                        let star = if a.is_special() { " *" } else { "" };
                        println!(
                            "{:<6} {:<8} {:<20} {}{star}",
                            block.block, room_no, a.member.id, a.member.name
                        );
                    }
                }
            }
            println!();
        }
    }
}
