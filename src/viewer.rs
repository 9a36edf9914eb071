//! Interactive viewer for the terrain.
//!
//! A plain CPU pixel-buffer window standing in for a real renderer; it
//! reads heights and normals through the terrain's query interface and
//! drives erosion and regeneration through its commands.

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::terrain::Terrain;

/// Relief exaggeration for the normal view.
const NORMAL_VIEW_AMPLIFICATION: f64 = 20.0;

/// Droplets per erosion burst (the D key).
const BURST_DROPS: u32 = 100;

/// View modes for the interactive viewer
#[derive(Clone, Copy, Debug, PartialEq)]
enum ViewMode {
    Height,  // Grayscale heights
    Normals, // RGB-encoded surface normals
}

impl ViewMode {
    fn label(&self) -> &'static str {
        match self {
            ViewMode::Height => "Height",
            ViewMode::Normals => "Normals",
        }
    }

    fn toggled(&self) -> ViewMode {
        match self {
            ViewMode::Height => ViewMode::Normals,
            ViewMode::Normals => ViewMode::Height,
        }
    }
}

/// Run the interactive terrain viewer.
/// M toggles the view, S drops a droplet, D drops a burst, R regenerates,
/// Q or Escape exits.
pub fn run_viewer(terrain: &mut Terrain) {
    let width = terrain.width();
    let height = terrain.height();

    // Scale small grids up to a comfortable window size
    let target_size = 900;
    let scale = (target_size / width.max(height)).max(1);
    let window_width = width * scale;
    let window_height = height * scale;

    let mut window = Window::new(
        "Terrain Generator - M: View, S: Drop, D: Burst, R: Regenerate, Esc: Exit",
        window_width,
        window_height,
        WindowOptions::default(),
    )
    .expect("Failed to create window");

    // Limit to ~60fps
    window.set_target_fps(60);

    let mut view_mode = ViewMode::Height;
    let mut buffer = render_view(terrain, view_mode, scale);

    println!("Viewer started. Controls:");
    println!("  M: Toggle height/normal view");
    println!("  S: Simulate one droplet");
    println!("  D: Simulate a {BURST_DROPS}-droplet burst");
    println!("  R: Regenerate with a fresh seed");
    println!("  Q / Esc: Exit");

    while window.is_open() && !window.is_key_down(Key::Escape) && !window.is_key_down(Key::Q) {
        let mut needs_redraw = false;

        if window.is_key_pressed(Key::M, KeyRepeat::No) {
            view_mode = view_mode.toggled();
            println!("View: {}", view_mode.label());
            needs_redraw = true;
        }

        if window.is_key_pressed(Key::S, KeyRepeat::No) {
            let stats = terrain.simulate_random_drop();
            println!(
                "  Droplet: {} steps, {}",
                stats.steps,
                if stats.exited { "left the field" } else { "drained" }
            );
            needs_redraw = true;
        }

        if window.is_key_pressed(Key::D, KeyRepeat::No) {
            terrain.erode(BURST_DROPS);
            needs_redraw = true;
        }

        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            let seed = rand::random();
            println!("Regenerating with seed: {}", seed);
            terrain.regenerate(seed);
            needs_redraw = true;
        }

        if needs_redraw {
            buffer = render_view(terrain, view_mode, scale);
        }

        window
            .update_with_buffer(&buffer, window_width, window_height)
            .expect("Failed to update window");
    }
}

fn render_view(terrain: &Terrain, mode: ViewMode, scale: usize) -> Vec<u32> {
    match mode {
        ViewMode::Height => render_height(terrain, scale),
        ViewMode::Normals => render_normals(terrain, scale),
    }
}

/// Grayscale heights, normalized over the field's current range.
fn render_height(terrain: &Terrain, scale: usize) -> Vec<u32> {
    let window_width = terrain.width() * scale;
    let window_height = terrain.height() * scale;
    let range = terrain.max_height() - terrain.min_height();

    let mut buffer = vec![0u32; window_width * window_height];
    for py in 0..window_height {
        for px in 0..window_width {
            let shade = if range > 0.0 {
                let h = terrain.height_at(px / scale, py / scale);
                ((h - terrain.min_height()) / range * 255.0) as u32
            } else {
                128
            };
            buffer[py * window_width + px] = (shade << 16) | (shade << 8) | shade;
        }
    }
    buffer
}

/// Normals encoded as color: x and y mapped from [-1, 1], raw z in blue.
fn render_normals(terrain: &Terrain, scale: usize) -> Vec<u32> {
    let window_width = terrain.width() * scale;
    let window_height = terrain.height() * scale;

    let mut buffer = vec![0u32; window_width * window_height];
    for py in 0..window_height {
        for px in 0..window_width {
            let normal = terrain.normal_at(px / scale, py / scale, NORMAL_VIEW_AMPLIFICATION);
            let normal = if normal.is_nan() { glam::DVec3::Z } else { normal };

            let r = ((1.0 + normal.x) / 2.0 * 255.0) as u32;
            let g = ((1.0 + normal.y) / 2.0 * 255.0) as u32;
            let b = (normal.z * 255.0) as u32;
            buffer[py * window_width + px] = (r << 16) | (g << 8) | b;
        }
    }
    buffer
}
