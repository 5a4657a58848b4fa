use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;

use chog_core::combat::CombatEvent;
use chog_core::engine::{ArenaConfig, ArenaPlugin, ArenaResource, CombatEventMessage, IntentEvent, RawInputEvent};
use chog_core::logging::{LoggingPlugin, TracingConfig};
use chog_core::sparring::SparringBot;

/// Headless session length at 60 Hz
const FRAMES: u32 = 60 * 30;

#[derive(Resource)]
struct Sparring {
    bot: SparringBot,
    frames: u32,
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next().map(PathBuf::from) {
        Some(path) => ArenaConfig::load(&path).with_context(|| format!("loading {}", path.display()))?,
        None => ArenaConfig::default(),
    };
    let seed = match args.next() {
        Some(s) => s.parse().with_context(|| format!("bad seed {s:?}"))?,
        None => 0xC40C,
    };

    App::new()
        .add_plugins(LoggingPlugin {
            config: TracingConfig::default(),
        })
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))))
        .add_plugins(ArenaPlugin { config })
        .insert_resource(Sparring {
            bot: SparringBot::new(seed),
            frames: 0,
        })
        .add_systems(Update, (drive_bot, log_combat, finish))
        .run();

    Ok(())
}

fn drive_bot(
    time: Res<Time>,
    mut sparring: ResMut<Sparring>,
    arena: Option<Res<ArenaResource>>,
    mut intents: EventWriter<IntentEvent>,
    mut raw: EventWriter<RawInputEvent>,
) {
    sparring.frames += 1;
    let Some(arena) = arena else {
        return;
    };
    if let Some(intent) = sparring.bot.step(time.delta_secs() * 1000.0) {
        intents.send(IntentEvent(intent));
    }
    // Every few seconds route a gesture through the recognizer instead
    if sparring.frames % 180 == 0 {
        let viewport = arena.0.config().input.viewport;
        for event in sparring.bot.gesture(Vec2::from(viewport)) {
            raw.send(RawInputEvent(event));
        }
    }
}

fn log_combat(mut events: EventReader<CombatEventMessage>) {
    for CombatEventMessage(event) in events.read() {
        match event {
            CombatEvent::Hit { move_id, damage, combo_count, .. } => {
                info!(%move_id, damage, combo_count, "hit");
            }
            CombatEvent::ComboBroken { combo_count } => info!(combo_count, "combo broken"),
            other => debug!(kind = other.kind(), "combat event"),
        }
    }
}

fn finish(sparring: Res<Sparring>, arena: Option<ResMut<ArenaResource>>, mut exit: EventWriter<AppExit>) {
    if sparring.frames < FRAMES {
        return;
    }
    if let Some(mut arena) = arena {
        let stats = arena.0.stats().clone();
        info!(
            hits = stats.hits,
            score = stats.score,
            max_combo = stats.max_combo,
            "sparring session over"
        );
        arena.0.shutdown();
    }
    exit.send(AppExit::Success);
}
