// src/main.rs
//! Headless playground run: builds the demo scene (two dynamic spheres over
//! a static ground plane, a tilted platform, a corrugated custom ground and
//! a box), steps it at a fixed 60 Hz, exercises pause/resume and reset, and
//! dumps a final JSON snapshot of every object's transform.

use anyhow::Result;
use glam::Vec3;
use log::{info, warn, LevelFilter};
use serde::Serialize;

use tumble::{
    CustomGeometry, ObjectDescriptor, PhysicsParams, SceneBuilder, ShapeKind, SimConfig,
    Simulation,
};

const FRAME_DT: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .format_timestamp_millis()
        .format_target(false)
        .parse_default_env()
        .init();

    let mut sim = SceneBuilder::new(SimConfig {
        gravity: [0.0, -100.0, 0.0],
    })
    .object(
        ObjectDescriptor::new("sphere", ShapeKind::Sphere)
            .params(&[20.0, 20.0, 10.0])
            .position(Vec3::new(0.0, 250.0, -100.0))
            .physics(PhysicsParams::with_mass(1.0).friction(0.8)),
    )
    .object(
        ObjectDescriptor::new("sphere2", ShapeKind::Sphere)
            .params(&[10.0, 10.0, 10.0])
            .position(Vec3::new(50.0, 130.0, -70.0))
            .physics(PhysicsParams::with_mass(1.0).friction(0.8)),
    )
    .object(
        ObjectDescriptor::new("ground_plane", ShapeKind::Plane)
            .params(&[1000.0, 1000.0, 1.0, 1.0])
            .rotation(Vec3::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0))
            .physics(PhysicsParams::default().friction(0.8).restitution(0.5)),
    )
    .object(
        ObjectDescriptor::new("tilted_plane", ShapeKind::Box)
            .params(&[150.0, 1.0, 150.0])
            .position(Vec3::new(-70.0, 120.0, -50.0))
            .rotation(Vec3::new(0.0, 0.0, -0.5))
            .physics(PhysicsParams::default().friction(0.8).restitution(0.5)),
    )
    .object(
        ObjectDescriptor::new("ridge", ShapeKind::Concave)
            .custom_geometry(CustomGeometry::new(
                Box::new(ridge_vertices),
                Box::new(ridge_faces),
            ))
            .position(Vec3::new(0.0, 30.0, 20.0))
            .rotation(Vec3::new(0.05, 0.0, 0.2))
            .physics(PhysicsParams::default().friction(0.8).restitution(0.5)),
    )
    .object(
        ObjectDescriptor::new("box", ShapeKind::Box)
            .params(&[30.0, 30.0, 30.0])
            .position(Vec3::new(50.0, 50.0, -70.0))
            .scale(Vec3::splat(2.0))
            .physics(PhysicsParams::default().friction(0.8).restitution(0.5)),
    )
    .build();

    for failure in sim.failures() {
        warn!("object '{}' degraded: {}", failure.name, failure.error);
    }

    info!(
        "scene ready: {} objects, {} simulated",
        sim.registry.len(),
        sim.registry.body_count()
    );

    run_frames(&mut sim, 300);

    info!("pausing for 60 frames");
    sim.pause();
    run_frames(&mut sim, 60);
    sim.resume();

    run_frames(&mut sim, 300);

    println!("{}", serde_json::to_string_pretty(&snapshot(&sim))?);

    info!("resetting scene to authored state");
    sim.reset();
    report_heights(&sim);

    Ok(())
}

fn run_frames(sim: &mut Simulation, frames: u32) {
    for _ in 0..frames {
        sim.step_fixed(FRAME_DT);
        if sim.stepper.frame() % 60 == 0 {
            report_heights(sim);
        }
    }
}

fn report_heights(sim: &Simulation) {
    for object in sim.registry.iter().filter(|o| o.body.is_some()) {
        let node = sim.scene.node(object.mesh);
        info!(
            "frame {:>4} | {:<12} y = {:>8.2}",
            sim.stepper.frame(),
            node.name,
            node.position.y
        );
    }
}

#[derive(Serialize)]
struct ObjectState {
    name: String,
    position: [f32; 3],
    rotation: [f32; 4],
    simulated: bool,
}

fn snapshot(sim: &Simulation) -> Vec<ObjectState> {
    sim.registry
        .iter()
        .map(|object| {
            let node = sim.scene.node(object.mesh);
            ObjectState {
                name: node.name.clone(),
                position: node.position.to_array(),
                rotation: node.rotation.to_array(),
                simulated: object.body.is_some(),
            }
        })
        .collect()
}

// Corrugated ground slab: an 11x11 vertex grid spanning 100x100 units with
// sine ridges along x, the playground's stand-in for arbitrary concave
// authored geometry.
fn ridge_vertices() -> Vec<Vec3> {
    let mut vertices = Vec::with_capacity(11 * 11);
    for i in 0..=10 {
        for j in 0..=10 {
            let x = (i as f32 - 5.0) * 10.0;
            let z = (j as f32 - 5.0) * 10.0;
            let y = (x * 0.2).sin() * 4.0;
            vertices.push(Vec3::new(x, y, z));
        }
    }
    vertices
}

fn ridge_faces() -> Vec<[u32; 3]> {
    let mut faces = Vec::with_capacity(10 * 10 * 2);
    for i in 0..10u32 {
        for j in 0..10u32 {
            let a = i * 11 + j;
            let b = a + 1;
            let c = a + 11;
            let d = c + 1;
            faces.push([a, b, c]);
            faces.push([b, d, c]);
        }
    }
    faces
}
