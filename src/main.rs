//! Tilt Arcade - headless host
//!
//! Drives the game core from the command line with a wandering tilt pilot in
//! place of the accelerometer.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use tilt_arcade::campaign::{Campaign, Stage};
use tilt_arcade::highscores::PlayerName;
use tilt_arcade::modes::{Collaborators, run_boss, run_mode, run_normal, run_tutorial};
use tilt_arcade::persistence::{JsonFileStore, SaveStore};
use tilt_arcade::platform::{
    DisplayList, InputSource, LoggedLights, NoPacer, Pacer, ThreadPacer,
};
use tilt_arcade::sim::state::ENDLESS_RUN_INDEX;
use tilt_arcade::sim::{Difficulty, ModeConfig};
use tilt_arcade::{BossOutcome, Settings};

#[derive(Parser, Debug)]
#[command(name = "tilt-arcade")]
#[command(about = "Tilt-controlled tile arcade game, played by a wandering pilot")]
struct Cli {
    /// Settings file (JSON); defaults are used when missing
    #[arg(long, default_value = "tilt-arcade.json")]
    settings: PathBuf,
    /// RNG seed, overrides the settings file
    #[arg(long)]
    seed: Option<u64>,
    /// Run ticks back to back instead of in real time
    #[arg(long, default_value_t = false)]
    headless: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play the tutorial once
    Tutorial,
    /// Play one timed normal run
    Normal {
        #[arg(long, value_enum, default_value_t = CliDifficulty::Easy)]
        difficulty: CliDifficulty,
        #[arg(long, default_value_t = 1)]
        run: u32,
    },
    /// Face the boss
    Boss,
    /// Continue the saved campaign
    Campaign {
        /// Difficulty to spend attempts on; first one with attempts left if unset
        #[arg(long, value_enum)]
        difficulty: Option<CliDifficulty>,
        /// Mode runs to play before saving and exiting
        #[arg(long, default_value_t = 1)]
        runs: u32,
        /// Two-letter name for a leaderboard entry
        #[arg(long)]
        name: Option<String>,
    },
    /// Print the endless-run leaderboard
    Scores,
    /// Write the effective settings to the settings file
    InitSettings,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliDifficulty {
    Easy,
    Medium,
    Hard,
}

impl From<CliDifficulty> for Difficulty {
    fn from(value: CliDifficulty) -> Self {
        match value {
            CliDifficulty::Easy => Difficulty::Easy,
            CliDifficulty::Medium => Difficulty::Medium,
            CliDifficulty::Hard => Difficulty::Hard,
        }
    }
}

/// Stand-in for the accelerometer: holds a random tilt for a while, then
/// picks another one
struct WanderPilot {
    rng: Pcg32,
    accel: Vec3,
    hold: u32,
}

impl WanderPilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            accel: Vec3::ZERO,
            hold: 0,
        }
    }
}

impl InputSource for WanderPilot {
    fn acceleration(&mut self) -> Vec3 {
        if self.hold == 0 {
            self.accel = Vec3::new(
                self.rng.random_range(-2.0..=2.0),
                self.rng.random_range(-2.0..=2.0),
                9.8,
            );
            self.hold = self.rng.random_range(30..=120);
        }
        self.hold -= 1;
        self.accel
    }

    fn rotary_step(&mut self) -> i8 {
        if self.rng.random_bool(0.01) { 1 } else { 0 }
    }
}

/// Everything one mode run needs from the host
struct Host {
    pilot: WanderPilot,
    display: DisplayList,
    lights: LoggedLights,
    pacer: Box<dyn Pacer>,
    tick_period_ms: u64,
    seed: u64,
    runs: u64,
}

impl Host {
    fn new(settings: &Settings, seed: u64, headless: bool) -> Self {
        let pacer: Box<dyn Pacer> = if headless || !settings.realtime {
            Box::new(NoPacer)
        } else {
            Box::new(ThreadPacer::default())
        };
        Self {
            pilot: WanderPilot::new(seed ^ 0x5eed),
            display: DisplayList::new(),
            lights: LoggedLights::new(settings.effective_brightness()),
            pacer,
            tick_period_ms: settings.tick_period_ms,
            seed,
            runs: 0,
        }
    }

    /// Fresh display and seed for the next mode run
    fn next_run(&mut self) -> (Collaborators<'_>, u64) {
        self.display = DisplayList::new();
        let seed = self.seed.wrapping_add(self.runs);
        self.runs += 1;
        (
            Collaborators {
                input: &mut self.pilot,
                render: &mut self.display,
                lights: &mut self.lights,
                pacer: self.pacer.as_mut(),
                tick_period_ms: self.tick_period_ms,
            },
            seed,
        )
    }
}

fn default_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn play_campaign(
    host: &mut Host,
    store: &mut dyn SaveStore,
    difficulty: Option<Difficulty>,
    runs: u32,
    name: Option<PlayerName>,
) -> Result<()> {
    let mut campaign = Campaign::load(store).context("loading campaign")?;

    for _ in 0..runs {
        match campaign.next_stage() {
            Stage::Tutorial => {
                let (mut io, seed) = host.next_run();
                run_tutorial(&mut io, seed);
                campaign.complete_tutorial();
                println!("Tutorial complete");
            }
            Stage::Normal { .. } | Stage::Rematch => {
                let difficulty = match difficulty {
                    Some(d) => d,
                    None => Difficulty::ALL
                        .into_iter()
                        .find(|d| campaign.attempts_left(*d) > 0)
                        .context("no attempts left")?,
                };
                campaign.spend_attempt(difficulty)?;
                let run_index = campaign.run_index();
                let (mut io, seed) = host.next_run();
                let passed = run_normal(&mut io, difficulty, run_index, seed);
                campaign.record_normal(difficulty, passed);
                println!(
                    "{} run {}: {}",
                    difficulty.as_str(),
                    run_index,
                    if passed { "passed" } else { "failed" }
                );
            }
            Stage::Boss => {
                let (mut io, seed) = host.next_run();
                let outcome = run_boss(&mut io, seed);
                campaign.record_boss(outcome);
                println!(
                    "Boss: {}",
                    match outcome {
                        BossOutcome::PlayerEscaped => "escaped",
                        BossOutcome::PlayerDefeated => "defeated",
                    }
                );
            }
            Stage::Endless => {
                let (mut io, seed) = host.next_run();
                let report = run_mode(
                    &mut io,
                    ModeConfig::normal(Difficulty::Hard, ENDLESS_RUN_INDEX),
                    seed,
                );
                let time = report.survived_secs();
                println!("Endless run: survived {time:.1}s");

                let mut board = store.load_leaderboard().context("loading leaderboard")?;
                if board.qualifies(time) {
                    match &name {
                        Some(name) => {
                            if let Some(rank) = board.add_score(name.clone(), time) {
                                println!("New high score, rank {rank}");
                            }
                            store.save_leaderboard(&board).context("saving leaderboard")?;
                        }
                        None => println!("High score! Pass --name to record it"),
                    }
                }
            }
            Stage::Exhausted => {
                println!("No attempts left");
                break;
            }
        }

        campaign.save(store).context("saving campaign")?;
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = Settings::load(&cli.settings);
    let seed = cli.seed.or(settings.seed).unwrap_or_else(default_seed);
    log::info!("Tilt Arcade starting (seed {seed})");

    let mut host = Host::new(&settings, seed, cli.headless);
    let mut store = JsonFileStore::new(&settings.save_dir);

    match cli.command {
        Commands::Tutorial => {
            let (mut io, seed) = host.next_run();
            run_tutorial(&mut io, seed);
        }
        Commands::Normal { difficulty, run } => {
            if run == 0 {
                bail!("run index starts at 1");
            }
            let (mut io, seed) = host.next_run();
            let passed = run_normal(&mut io, difficulty.into(), run, seed);
            println!("{}", if passed { "Passed" } else { "Failed" });
        }
        Commands::Boss => {
            let (mut io, seed) = host.next_run();
            println!("{:?}", run_boss(&mut io, seed));
        }
        Commands::Campaign {
            difficulty,
            runs,
            name,
        } => {
            let name = name
                .as_deref()
                .map(PlayerName::new)
                .transpose()
                .context("invalid leaderboard name")?;
            play_campaign(&mut host, &mut store, difficulty.map(Into::into), runs, name)?;
        }
        Commands::Scores => {
            let board = store.load_leaderboard().context("loading leaderboard")?;
            if board.is_empty() {
                println!("No high scores yet");
            }
            for (rank, entry) in board.entries.iter().enumerate() {
                println!("{}. {}  {:.1}s", rank + 1, entry.name, entry.time);
            }
        }
        Commands::InitSettings => {
            settings
                .save(&cli.settings)
                .with_context(|| format!("writing {}", cli.settings.display()))?;
        }
    }

    Ok(())
}
