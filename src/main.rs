//! Stage Strike entry point
//!
//! Natively this is a headless runner: it drives the simulation at a fixed
//! 60 Hz with a simple autopilot, records the run on a JSON leaderboard and
//! prints the table. The browser build starts from `stage_strike::web`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use glam::Vec2;

    use stage_strike::consts::SIM_DT;
    use stage_strike::highscores::{SaveOutcome, SortState};
    use stage_strike::platform::input::{InputAdapter, Key};
    use stage_strike::platform::storage::{JsonFileStore, LeaderboardStore};
    use stage_strike::session::Session;
    use stage_strike::sim::{GameEvent, World};
    use stage_strike::{Leaderboard, Tuning, platform};

    /// Play one autopiloted run of Stage Strike and record it.
    #[derive(Debug, Parser)]
    #[command(author, version, about, long_about = None)]
    pub struct Options {
        /// Run seed; a random one is picked when omitted.
        #[arg(long)]
        pub seed: Option<u64>,

        /// Balance overrides as a JSON file.
        #[arg(long, value_name = "PATH")]
        pub tuning: Option<PathBuf>,

        /// Leaderboard file.
        #[arg(long, value_name = "PATH", default_value = "stage-strike-scores.json")]
        pub scores: PathBuf,

        /// Name recorded on the leaderboard; blank skips the save.
        #[arg(long, default_value = "autopilot")]
        pub name: String,

        /// Stop after this many ticks if the run is still going.
        #[arg(
            long,
            default_value_t = 60 * 60 * 5,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        pub max_ticks: u64,

        /// Play-area width.
        #[arg(long, value_name = "UNITS", default_value_t = 800.0, value_parser = positive_extent)]
        pub width: f32,

        /// Play-area height.
        #[arg(long, value_name = "UNITS", default_value_t = 600.0, value_parser = positive_extent)]
        pub height: f32,
    }

    fn positive_extent(value: &str) -> Result<f32, String> {
        let extent: f32 = value.parse().map_err(|err| format!("{err}"))?;
        if extent.is_finite() && extent > 0.0 {
            Ok(extent)
        } else {
            Err(format!("{value} is not a positive size"))
        }
    }

    /// Plays by holding arrow keys and tapping fire keys through the same
    /// adapter a keyboard host would use
    pub struct Autopilot {
        tapped: Option<Key>,
        cooldown: u32,
    }

    impl Autopilot {
        /// Ticks between shots
        const FIRE_INTERVAL: u32 = 10;
        /// Enemies closer than this are dodged
        const DANGER_RADIUS: f32 = 140.0;
        /// Half-width of the lane a shot can hit
        const AIM_BAND: f32 = 30.0;

        pub fn new() -> Self {
            Self {
                tapped: None,
                cooldown: 0,
            }
        }

        /// Press and release keys for the coming tick
        pub fn drive(&mut self, input: &mut InputAdapter, world: &World) {
            self.aim(input, world);
            Self::steer(input, world);
        }

        fn steer(input: &mut InputAdapter, world: &World) {
            let ship = world.player.rect().center();

            let threat = world
                .enemies
                .iter()
                .map(|e| e.rect().center())
                .filter(|c| c.distance(ship) < Self::DANGER_RADIUS)
                .min_by(|a, b| a.distance(ship).total_cmp(&b.distance(ship)));

            let goal = match (threat, world.power_up.as_ref()) {
                (Some(enemy), _) => ship + (ship - enemy),
                (None, Some(power_up)) => power_up.rect().center(),
                (None, None) => Vec2::new(world.width / 2.0, world.height * 0.75),
            };
            let delta = goal - ship;

            let mut hold = |key: Key, on: bool| {
                if on {
                    input.key_down(key);
                } else {
                    input.key_up(key);
                }
            };
            hold(Key::ArrowLeft, delta.x < -4.0);
            hold(Key::ArrowRight, delta.x > 4.0);
            hold(Key::ArrowUp, delta.y < -4.0);
            hold(Key::ArrowDown, delta.y > 4.0);
        }

        fn aim(&mut self, input: &mut InputAdapter, world: &World) {
            if let Some(key) = self.tapped.take() {
                input.key_up(key);
            }
            if self.cooldown > 0 {
                self.cooldown -= 1;
                return;
            }

            let ship = world.player.rect().center();
            let target = world.enemies.iter().map(|e| e.rect().center()).find_map(|c| {
                let d = c - ship;
                if d.x.abs() < Self::AIM_BAND {
                    Some(if d.y < 0.0 { Key::W } else { Key::S })
                } else if d.y.abs() < Self::AIM_BAND {
                    Some(if d.x < 0.0 { Key::A } else { Key::D })
                } else {
                    None
                }
            });

            if let Some(key) = target {
                input.key_down(key);
                self.tapped = Some(key);
                self.cooldown = Self::FIRE_INTERVAL;
            }
        }
    }

    /// Counters gathered from the event stream
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct RunLog {
        pub shots: u64,
        pub hits: u64,
        pub stage_ups: u32,
    }

    /// Autopilot the session until game over or `max_ticks`
    pub fn play<S: LeaderboardStore>(session: &mut Session<S>, max_ticks: u64) -> RunLog {
        let mut pilot = Autopilot::new();
        let mut counters = RunLog::default();

        while session.world.time_ticks < max_ticks {
            pilot.drive(&mut session.input, &session.world);
            let result = session.frame(SIM_DT);
            for event in &result.events {
                match event {
                    GameEvent::BulletFired { .. } => counters.shots += 1,
                    GameEvent::PlayerHit { lives_left, .. } => {
                        counters.hits += 1;
                        log::debug!("Hit! {lives_left} lives left");
                    }
                    GameEvent::StageUp { .. } => counters.stage_ups += 1,
                    _ => {}
                }
            }
            if result.terminal {
                break;
            }
        }

        if !session.world.is_game_over() {
            log::info!("Tick limit reached after {:.0}s", session.world.elapsed);
        }
        counters
    }

    fn load_tuning(path: Option<&Path>) -> Tuning {
        match path {
            Some(path) => Tuning::load(path).unwrap_or_else(|err| {
                log::warn!(
                    "Could not load tuning from {}: {err}, using defaults",
                    path.display()
                );
                Tuning::default()
            }),
            None => Tuning::default(),
        }
    }

    fn print_leaderboard(board: &Leaderboard) {
        if board.is_empty() {
            println!("No scores yet. Be the first to play!");
            return;
        }

        println!(
            "\n{:>4}  {:<16} {:>8} {:>6} {:>6}",
            "Rank", "Name", "Score", "Stage", "Kills"
        );
        for row in board.rows(SortState::default()) {
            println!(
                "{:>4}  {:<16} {:>8} {:>6} {:>6}{}",
                row.rank,
                row.entry.name,
                row.entry.score,
                row.entry.stage,
                row.entry.enemies_killed,
                if row.is_top { "  *" } else { "" }
            );
        }
    }

    pub fn run() {
        platform::init_logging();
        let opts = Options::parse();

        let seed = opts.seed.unwrap_or_else(platform::entropy_seed);
        let tuning = load_tuning(opts.tuning.as_deref());
        log::info!("Stage Strike (headless) starting, seed {seed}");

        let world = World::with_tuning(opts.width, opts.height, seed, tuning);
        let mut session = Session::new(world, JsonFileStore::new(&opts.scores));
        let counters = play(&mut session, opts.max_ticks);

        let summary = session.finish(&opts.name);
        println!(
            "Score {}  Stage {}  Enemies killed {}  Shots {}  Hits taken {}",
            summary.stats.score,
            summary.stats.stage,
            summary.stats.enemies_killed,
            counters.shots,
            counters.hits
        );
        match summary.save {
            SaveOutcome::Saved { rank: Some(rank) } => println!("New leaderboard rank: #{rank}"),
            SaveOutcome::Saved { rank: None } => println!("Not in the top scores this time"),
            SaveOutcome::Skipped => {}
            SaveOutcome::Failed(err) => println!("Score not saved: {err}"),
        }
        print_leaderboard(&session.leaderboard());
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}
