use bevy::prelude::*;

use crate::combat::CombatEvent;
use crate::engine::arena::Arena;
use crate::engine::config::ArenaConfig;
use crate::input::{InputEvent, Intent};

/// Runs one [`Arena`] inside a Bevy app.
#[derive(Default)]
pub struct ArenaPlugin {
    pub config: ArenaConfig,
}

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RawInputEvent>()
            .add_event::<IntentEvent>()
            .add_event::<CombatEventMessage>()
            .add_systems(Update, (ingest_input, arena_tick, publish_events).chain());

        match Arena::new(self.config.clone()) {
            Ok(arena) => {
                app.insert_resource(ArenaResource(arena));
            }
            Err(e) => error!("Failed to build arena: {}", e),
        }
    }
}

#[derive(Resource)]
pub struct ArenaResource(pub Arena);

/// Host pointer/keyboard event for the recognizer
#[derive(Event, Debug, Clone)]
pub struct RawInputEvent(pub InputEvent);

/// Already-recognized intent, e.g. from a bot
#[derive(Event, Debug, Clone, Copy)]
pub struct IntentEvent(pub Intent);

#[derive(Event, Debug, Clone)]
pub struct CombatEventMessage(pub CombatEvent);

fn ingest_input(
    arena: Option<ResMut<ArenaResource>>,
    mut raw: EventReader<RawInputEvent>,
    mut intents: EventReader<IntentEvent>,
) {
    let Some(mut arena) = arena else {
        return;
    };
    for RawInputEvent(event) in raw.read() {
        arena.0.handle_input(event);
    }
    for IntentEvent(intent) in intents.read() {
        arena.0.submit_intent(*intent);
    }
}

fn arena_tick(time: Res<Time>, arena: Option<ResMut<ArenaResource>>) {
    if let Some(mut arena) = arena {
        arena.0.tick(time.delta_secs() * 1000.0);
    }
}

fn publish_events(arena: Option<ResMut<ArenaResource>>, mut out: EventWriter<CombatEventMessage>) {
    let Some(mut arena) = arena else {
        return;
    };
    for event in arena.0.drain_events() {
        out.send(CombatEventMessage(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::MoveId;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(ArenaPlugin {
            config: ArenaConfig::weightless(),
        });
        app
    }

    #[test]
    fn test_plugin_inserts_arena() {
        let app = app();
        assert!(app.world().get_resource::<ArenaResource>().is_some());
    }

    #[test]
    fn test_intent_event_reaches_arena() {
        let mut app = app();
        app.world_mut()
            .send_event(IntentEvent(Intent::attack(MoveId::PunchLight)));
        app.update();

        let arena = &app.world().resource::<ArenaResource>().0;
        // Debited on submit; the first frame may regenerate a sliver
        assert!(arena.stats().energy < 96.0);
        assert_eq!(arena.director().current_move(), Some(MoveId::PunchLight));
    }

    #[test]
    fn test_raw_key_event_recognized() {
        let mut app = app();
        app.world_mut().send_event(RawInputEvent(InputEvent::Key { key: "l".into() }));
        app.update();
        assert!(app.world().resource::<ArenaResource>().0.director().is_blocking());
    }

    #[test]
    fn test_combat_events_published() {
        let mut app = app();
        app.world_mut().resource_mut::<ArenaResource>().0.stats_mut().energy = 1.0;
        app.world_mut()
            .send_event(IntentEvent(Intent::attack(MoveId::Roundhouse)));
        app.update();

        let events = app.world().resource::<Events<CombatEventMessage>>();
        let mut reader = events.get_cursor();
        let published: Vec<_> = reader.read(events).map(|m| m.0.clone()).collect();
        assert!(published.iter().any(|e| e.kind() == "miss"));
    }

    #[test]
    fn test_invalid_config_leaves_app_running() {
        let mut config = ArenaConfig::default();
        config.physics.substeps = 0;
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(ArenaPlugin { config });
        app.update();
        assert!(app.world().get_resource::<ArenaResource>().is_none());
    }
}
