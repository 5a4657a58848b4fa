use bevy::math::Vec2;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use chog_core::animation::{AnimationLibrary, MoveId};
use chog_core::engine::config::{InputConfig, PhysicsConfig};
use chog_core::engine::{Arena, ArenaConfig};
use chog_core::input::{classify, Intent};
use chog_core::physics::RigidBodySimulator;
use chog_core::rig::{create_fighter, create_punching_bag};
use chog_core::sparring::SparringBot;

fn bench_physics(c: &mut Criterion) {
    let mut sim = RigidBodySimulator::new(&PhysicsConfig::default());
    create_fighter(&mut sim, 300.0, 504.0, 1.0).unwrap();
    create_punching_bag(&mut sim, 350.0, 300.0, 4, 30.0, 1.0).unwrap();

    c.bench_function("simulator_update_16ms", |b| {
        b.iter(|| sim.update(black_box(16.0)))
    });
}

fn bench_arena_tick(c: &mut Criterion) {
    c.bench_function("arena_tick_idle", |b| {
        let mut arena = Arena::new(ArenaConfig::default()).unwrap();
        b.iter(|| arena.tick(black_box(16.0)))
    });

    c.bench_function("arena_second_of_sparring", |b| {
        b.iter_batched(
            || (Arena::new(ArenaConfig::default()).unwrap(), SparringBot::new(42)),
            |(mut arena, mut bot)| {
                for _ in 0..60 {
                    if let Some(intent) = bot.step(16.0) {
                        arena.submit_intent(intent);
                    }
                    arena.tick(16.0);
                }
                arena.drain_events()
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_setup(c: &mut Criterion) {
    c.bench_function("arena_new", |b| {
        b.iter(|| Arena::new(black_box(ArenaConfig::default())).unwrap())
    });

    c.bench_function("animation_library_builtin", |b| {
        b.iter(|| AnimationLibrary::builtin().unwrap())
    });
}

fn bench_input(c: &mut Criterion) {
    let config = InputConfig::default();
    c.bench_function("classify_swipe", |b| {
        b.iter(|| {
            classify(
                black_box(Vec2::new(100.0, 300.0)),
                black_box(Vec2::new(260.0, 290.0)),
                black_box(120.0),
                &config,
            )
        })
    });

    c.bench_function("submit_light_punch", |b| {
        b.iter_batched(
            || Arena::new(ArenaConfig::weightless()).unwrap(),
            |mut arena| arena.submit_intent(Intent::attack(MoveId::PunchLight)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut arena = Arena::new(ArenaConfig::default()).unwrap();
    arena.tick(16.0);
    c.bench_function("arena_snapshot_json", |b| {
        b.iter(|| arena.snapshot().to_json().unwrap())
    });
}

criterion_group!(
    benches,
    bench_physics,
    bench_arena_tick,
    bench_setup,
    bench_input,
    bench_snapshot,
);
criterion_main!(benches);
