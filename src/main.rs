//! Preloader entry point
//!
//! Native builds play a headless session on a virtual 60 Hz clock and log
//! everything the engines report. The browser build is driven through the
//! `host` bindings instead.
//!
//! Usage: `preloader [settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use preloader::Settings;
    use preloader::sim::PcgSource;
    use std::path::Path;

    env_logger::init();
    log::info!("Preloader (native) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(Path::new(&path)),
        None => Settings::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| PcgSource::from_entropy().seed());
    log::info!("Session seed: {}", seed);

    demo::shooting_session(&settings, seed);
    demo::egg_session(&settings, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is host::wasm_start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use preloader::sim::{EggAnimator, GameEvent, ShootingGame};
    use preloader::view::{EggView, ShootingView};
    use preloader::{Bounds, Settings, TriggerMode};

    const FRAME: f64 = 1.0 / 60.0;
    const SCREEN: Bounds = Bounds {
        width: 400.0,
        height: 800.0,
    };

    fn log_events(events: Vec<GameEvent>) {
        for event in events {
            log::info!("event: {:?}", event);
        }
    }

    fn run_for(game: &mut ShootingGame, now: &mut f64, seconds: f64) {
        let until = *now + seconds;
        while *now < until {
            *now += FRAME;
            game.update(*now);
            log_events(game.take_events());
        }
    }

    fn run_eggs_for(eggs: &mut EggAnimator, now: &mut f64, seconds: f64) {
        let until = *now + seconds;
        while *now < until {
            *now += FRAME;
            eggs.tick(*now, SCREEN);
            log_events(eggs.take_events());
        }
    }

    /// Three rounds: an aimed shot, an idle timeout, a trigger shot
    pub fn shooting_session(settings: &Settings, seed: u64) {
        let mut game = ShootingGame::with_seed(settings.clone(), SCREEN, seed, 0.0);
        let mut now = 0.0;

        game.start_round(now);
        run_for(&mut game, &mut now, 1.0);
        game.tap_target(1, now);
        run_for(&mut game, &mut now, settings.resolution_delay() + FRAME);
        summary(&game, now);

        game.reset(now);
        run_for(&mut game, &mut now, settings.idle_timeout + FRAME);
        summary(&game, now);

        game.reset(now);
        run_for(&mut game, &mut now, 0.5);
        game.press_trigger(now);
        run_for(&mut game, &mut now, settings.resolution_delay() + FRAME);
        summary(&game, now);

        // Leaving the loading screen
        game.press_trigger(now);
        if settings.trigger_mode == TriggerMode::Reset {
            log::info!("Trigger started round {}", game.round_number());
        }
        log_events(game.take_events());
    }

    fn summary(game: &ShootingGame, now: f64) {
        let view = ShootingView::capture(game, now);
        println!(
            "round {}: {} (scores {:?})",
            view.round,
            view.banner_text,
            game.round().scores
        );
    }

    /// Pick an egg, collect the reward, watch the new eggs float
    pub fn egg_session(settings: &Settings, seed: u64) {
        let mut eggs = EggAnimator::with_seed(settings.clone(), seed, 0.0);
        let mut now = 0.0;
        eggs.start(SCREEN, now);

        run_eggs_for(&mut eggs, &mut now, 1.0);
        eggs.select(0, now);
        let view = EggView::capture(&eggs);
        for (i, egg) in view.eggs.iter().enumerate() {
            println!(
                "egg {}: at ({:.0}, {:.0}) size {}x{}",
                i, egg.position.x, egg.position.y, egg.size.x, egg.size.y
            );
        }

        run_eggs_for(&mut eggs, &mut now, 1.0);
        eggs.restart(now);
        run_eggs_for(&mut eggs, &mut now, settings.restart_delay + 0.5);
        println!(
            "eggs floating again: {} (correct egg {})",
            eggs.is_active(),
            eggs.correct_egg()
        );
    }
}
