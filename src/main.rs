//! Lane Runner entry point
//!
//! Native builds run a headless autopilot session; the browser entry point
//! lives in `platform::web`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use lane_runner::consts::SIM_DT;
    use lane_runner::highscores::{HighScores, now_ms};
    use lane_runner::persistence::{
        DailyMarker, FileMarker, JsonLinesSink, submit_session, today_key,
    };
    use lane_runner::sim::{GameEvent, TickInput, World, tick};
    use lane_runner::tuning::Tuning;

    /// Default cap on simulated seconds
    const DEFAULT_MAX_SECONDS: f32 = 300.0;

    struct Args {
        seed: u64,
        max_seconds: f32,
    }

    fn parse_args() -> Result<Args, String> {
        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(s) => s.parse().map_err(|_| format!("invalid seed: {}", s))?,
            None => now_ms() as u64,
        };
        let max_seconds = match args.next() {
            Some(s) => s
                .parse::<f32>()
                .ok()
                .filter(|v| *v > 0.0)
                .ok_or_else(|| format!("invalid max_seconds: {}", s))?,
            None => DEFAULT_MAX_SECONDS,
        };
        Ok(Args { seed, max_seconds })
    }

    /// Where tuning, sessions and scores live
    fn data_dir() -> PathBuf {
        std::env::var_os("LANE_RUNNER_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn run() -> ExitCode {
        let args = match parse_args() {
            Ok(args) => args,
            Err(msg) => {
                log::error!("{}", msg);
                eprintln!("usage: lane-runner [seed] [max_seconds]");
                return ExitCode::FAILURE;
            }
        };

        let dir = data_dir();
        let tuning = Tuning::load_from(&dir.join("tuning.json"));
        let mut world = match World::new(args.seed, tuning) {
            Ok(world) => world,
            Err(err) => {
                log::error!("Invalid tuning: {}", err);
                return ExitCode::FAILURE;
            }
        };

        let today = today_key();
        let mut marker = FileMarker::new(dir.join("last_played"));
        world.state.played_today = marker.played_today(today);
        if world.state.played_today {
            log::info!("Already played today, running anyway");
        }

        log::info!("Lane Runner (headless) seed {}", args.seed);
        world.start_game();
        if let Err(err) = marker.mark_played(today) {
            log::warn!("Could not write daily marker: {}", err);
        }

        let input = TickInput {
            intents: Vec::new(),
            idle_mode: true,
        };
        let max_ticks = (args.max_seconds / SIM_DT).ceil() as u64;
        while world.state.is_playing() && world.time_ticks < max_ticks {
            for event in tick(&mut world, &input, SIM_DT) {
                match event {
                    GameEvent::LetterCollected { index } => log::info!(
                        "Letter {} collected at {:.0}",
                        world.tuning.target_word[index],
                        world.spawner.distance_traveled
                    ),
                    GameEvent::Damaged { lives } => log::debug!("Hit, {} lives left", lives),
                    GameEvent::GameOver => log::info!("Game over"),
                    GameEvent::Victory => log::info!("Victory"),
                    _ => {}
                }
            }
        }

        let Some(record) = world.session_record() else {
            log::info!(
                "Stopped after {:.0}s: score {} distance {:.0} lives {}",
                world.clock,
                world.state.score,
                world.spawner.distance_traveled,
                world.state.lives
            );
            return ExitCode::SUCCESS;
        };

        let mut sink = JsonLinesSink::new(dir.join("sessions.jsonl"));
        if submit_session(&mut sink, &record) {
            log::debug!("Appended to {}", sink.path().display());
        }

        let scores_path = dir.join("highscores.json");
        let mut scores = HighScores::load_from(&scores_path);
        if let Some(rank) = scores.add_session(&record, now_ms()) {
            log::info!("New high score, rank {}", rank);
            if let Err(err) = scores.save_to(&scores_path) {
                log::warn!("Could not save high scores: {}", err);
            }
        }

        println!(
            "score {} distance {:.0} time {:.1}s letters {} {}",
            record.score,
            record.distance,
            record.elapsed_secs,
            record.collected_letters.iter().collect::<String>(),
            if record.completed { "(complete)" } else { "" }
        );
        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_main, this is just to satisfy the compiler
}
