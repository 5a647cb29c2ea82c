//! Dungeon generator command line
//!
//! Prints the generated map as ASCII, or the whole dungeon as JSON.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use log::info;

use delve_core::{DungeonGenerator, GeneratorConfig};

/// Generate a room-and-corridor dungeon
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(author, version, about = "Delve - generate a dungeon", long_about = None)]
struct Args {
    /// Number of rooms to scatter
    #[arg(short = 'n', long = "rooms")]
    rooms: Option<u32>,

    /// Radius of the placement disk
    #[arg(short = 'r', long = "radius")]
    radius: Option<u32>,

    /// Main-room threshold scaling (0-2)
    #[arg(long = "main-room-frequency")]
    main_room_frequency: Option<f32>,

    /// Fraction of leftover triangulation edges to keep as loops (0-1)
    #[arg(long = "connection-frequency")]
    connection_frequency: Option<f32>,

    /// RNG seed
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Options file (rc format, or JSON if it ends in .json)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Step cap for room separation
    #[arg(long = "max-settle-steps")]
    max_settle_steps: Option<u32>,

    /// Seeds to try before giving up
    #[arg(short = 'a', long = "attempts", default_value_t = 10)]
    attempts: u32,

    /// Print the dungeon as JSON instead of a map
    #[arg(long = "json")]
    json: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    /// Start from the options file (or defaults) and apply flag overrides
    fn to_config(&self) -> anyhow::Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load_from_file(path)
                .with_context(|| format!("reading {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        if let Some(rooms) = self.rooms {
            config.room_count = rooms;
        }
        if let Some(radius) = self.radius {
            config.radius = radius;
        }
        if let Some(f) = self.main_room_frequency {
            config.main_room_frequency = f;
        }
        if let Some(c) = self.connection_frequency {
            config.room_connection_frequency = c;
        }
        if let Some(steps) = self.max_settle_steps {
            config.max_settle_steps = steps;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    use simplelog::LevelFilter::{Debug, Info, Off};
    simplelog::TermLogger::init(
        if args.verbose { Debug } else { Info },
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let config = args.to_config()?;
    let generator = DungeonGenerator::new(config).context("invalid configuration")?;
    let dungeon = generator
        .generate_until_valid(args.attempts)
        .with_context(|| format!("no valid dungeon after {} attempts", args.attempts.max(1)))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dungeon)?);
    } else {
        print!("{}", dungeon.render_ascii());
    }

    info!(
        "seed {}: start room {}, end room {}",
        dungeon.seed, dungeon.start, dungeon.end
    );
    Ok(())
}
