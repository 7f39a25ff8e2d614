// Scripted descent on a bumpy slope: carve, brake, boost, jump and trick with an optional
// chaser behind. Prints a run summary at the end.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use glam::{UVec2, Vec2};
use tracing::info;
use tracing_subscriber::EnvFilter;

use powder_core::{iso, vec3, InputIntent, Quat, XorShift64};
use powder_geom::Shape;
use powder_terrain::{Category, Course, HeightField};
use powder_viz::DebugSettings;
use powder_world::*;

// ---------- tiny env helpers ----------
fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key).ok().and_then(|s| s.parse::<u32>().ok()).unwrap_or(default)
}
fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).ok().and_then(|s| s.parse::<u64>().ok()).unwrap_or(default)
}

#[derive(Parser, Debug)]
#[command(name = "powder-bench", about = "Headless snowboard descent")]
struct Args {
    /// Rider descriptor (JSON). Defaults apply to missing fields.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Render frames to simulate (60 Hz).
    #[arg(long, default_value_t = env_u32("POWDER_FRAMES", 3600))]
    frames: u32,
    #[arg(long, default_value_t = env_u64("POWDER_SEED", 0xC0FFEE))]
    seed: u64,
    #[arg(long, default_value_t = env_u32("POWDER_OBSTACLES", 24))]
    obstacles: u32,
    /// Put an avalanche uphill of the rider.
    #[arg(long)]
    chase: bool,
    #[arg(long, default_value_t = env_u32("POWDER_PRINT_EVERY", 0))]
    print_every: u32,
    /// Dump the last frame's ledger as JSONL into this directory.
    #[arg(long)]
    dump: Option<PathBuf>,
}

/* ====================== COURSE ====================== */
const SLOPE_W: u32 = 96;
const SLOPE_L: u32 = 1024;

fn build_course(seed: u64, obstacles: u32) -> Course {
    let hf = HeightField::bumpy_incline(UVec2::new(SLOPE_W, SLOPE_L), Vec2::ONE, 0.3, 0.08, seed);
    let mut course = Course::with_terrain(hf, vec3(-(SLOPE_W as f32) * 0.5, 0.0, 0.0));

    let mut rng = XorShift64::new(seed ^ 0x5EED);
    for _ in 0..obstacles {
        let x = rng.range_f32(-30.0, 30.0);
        let z = rng.range_f32(60.0, SLOPE_L as f32 - 40.0);
        let Some((y, _)) = course.terrain_height_normal(x, z) else { continue };
        let shape = Shape::Box { hx: rng.range_f32(0.5, 1.5), hy: 0.6, hz: 0.5 };
        course.add_collider(shape, iso(vec3(x, y + 0.5, z), Quat::IDENTITY), None, Category::Obstacle);
    }
    course
}

/* ====================== INPUT SCRIPT ====================== */
fn scripted_input(frame: u32, t: f32) -> InputIntent {
    let mut i = InputIntent::default();
    match frame % 900 {
        0..=239 => i.steering = (t * 1.7).sin(),
        240..=299 => i.throttle = -1.0,
        300..=419 => i.boost = true,
        420 => i.jump_pressed = true,
        // flip forward while airborne, then let go for the landing
        430..=520 => { i.trick_held = true; i.throttle = 1.0; }
        600 => i.jump_pressed = true,
        610..=700 => { i.trick_held = true; i.steering = 1.0; }
        _ => i.steering = 0.4 * (t * 0.9).sin(),
    }
    i
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let (rider_cfg, mut session_cfg) = match &args.config {
        Some(p) => powder_bridge::load(p)?,
        None => (RiderConfig::default(), SessionConfig::default()),
    };
    if args.print_every > 0 {
        session_cfg.debug = DebugSettings { print_every: args.print_every, ..session_cfg.debug };
    }

    let course = build_course(args.seed, args.obstacles);
    let (y0, _) = course.terrain_height_normal(0.0, 8.0).context("spawn point is off the slope")?;
    let spawn = vec3(0.0, y0 + 0.05, 8.0);

    let mut builder = SessionBuilder::new(course)
        .config(session_cfg)
        .rider(rider_cfg)
        .spawn(iso(spawn, Quat::IDENTITY));
    if args.chase {
        builder = builder.pursuer(Box::new(Chaser::new(ChaserParams::default(), spawn)));
    }
    let mut s = builder.build().context("session config")?;
    info!(obstacles = s.course().obstacle_count(), seed = args.seed, "course ready");

    let dt = 1.0 / 60.0;
    let wall = Instant::now();
    let mut points = 0u32;
    let mut hits = 0usize;
    for frame in 0..args.frames {
        let t = frame as f32 * dt;
        s.set_input(scripted_input(frame, t));

        let rep = s.frame(dt);
        points += rep.points();
        hits += rep.hits.len();
        for ev in &rep.scores {
            info!(frame, kind = ?ev.kind, points = ev.points, "score");
        }
        if rep.caught {
            info!(frame, "caught by the avalanche");
            break;
        }
        if s.rider().position().z > SLOPE_L as f32 - 20.0 {
            info!(frame, "reached the bottom");
            break;
        }
    }

    if let Some(dir) = &args.dump {
        let path = s.ledger().write_jsonl(dir, s.tick_index()).context("ledger dump")?;
        info!(path = %path.display(), "ledger written");
    }

    let sum = s.summary();
    let p = s.rider().position();
    println!("distance    = {:.1} m", p.z - spawn.z);
    println!("top speed   = {:.2} m/s", sum.top_speed);
    println!("airtime     = {:.2} s", sum.airtime);
    println!("score       = {} (tricks {} / speed {}), frame sum {}", sum.trick_points + sum.speed_points, sum.trick_points, sum.speed_points, points);
    println!("obstacles   = {} hit, {} left", hits, s.course().obstacle_count());
    println!("ticks       = {} in {:.1} ms", sum.stats.physics_ticks, wall.elapsed().as_secs_f64() * 1e3);
    Ok(())
}
