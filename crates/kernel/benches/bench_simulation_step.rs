use std::hint::black_box;
use std::time::Instant;

use blitz_common::HalfExtents;
use blitz_input::InputState;
use blitz_kernel::{GameConfig, Simulation, Zombie};
use glam::Vec3;

fn crowded_session(zombies: usize) -> Simulation {
    let mut sim = Simulation::new(GameConfig::default());
    let half = HalfExtents::new(0.15, 0.15);
    for i in 0..zombies {
        let angle = i as f32 * 0.37;
        let radius = 5.0 + (i % 3) as f32;
        let position = Vec3::new(angle.sin() * radius, 0.0, angle.cos() * radius);
        sim.state_mut().zombies.push(Zombie::spawn(position, 0.0, half));
    }
    sim
}

fn bench_step(zombies: usize, iterations: usize) {
    let mut sim = crowded_session(zombies);
    let mut camera = sim.camera();
    camera.set_input(InputState {
        move_left: true,
        primary_fire: true,
        ..InputState::default()
    });

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(sim.step(black_box(&mut camera), false, black_box(1.0 / 120.0)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  step ({zombies} zombies, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_draw_list(zombies: usize, iterations: usize) {
    let sim = crowded_session(zombies);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(sim.draw_list());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  draw list ({zombies} zombies, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Simulation Step Benchmarks ===\n");

    println!("Step:");
    bench_step(16, 10000);
    bench_step(256, 1000);
    bench_step(4096, 100);

    println!("\nDraw list:");
    bench_draw_list(16, 10000);
    bench_draw_list(4096, 100);

    println!("\n=== Done ===");
}
