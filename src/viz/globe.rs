//! Rotating 3D globe with per-country threat activity
//!
//! Braille-rastered sphere: continent outlines, pulsing blips at country
//! centroids sized by observation count, and animated source->destination
//! arcs. Falls back to synthetic demo traffic when both feeds are down.

use crate::colors::scheme_color;
use crate::feed::FeedClient;
use crate::intel::geo::CoordinateTable;
use crate::intel::severity::{self, ATTACK_VOLUME};
use crate::scene::{self, Scene, SceneSource};
use crate::terminal::Terminal;
use crate::viz::worldmap::{normalize_longitude, shortest_angular_delta, CONTINENTS};
use crate::viz::VizState;
use crossterm::event::KeyCode;
use crossterm::style::Color;
use rand::prelude::*;
use std::io;
use std::time::{Duration, Instant};

const HELP: &str = "\
THREAT GLOBE
─────────────────
↑/k    Tilt up
↓/j    Tilt down
+/-    Zoom in/out
z      Reset zoom
r      Refresh feeds
space  Pause";

/// Auto-refresh interval for the feeds.
const REFRESH_INTERVAL: Duration = Duration::from_secs(300);

pub struct GlobeOptions {
    pub time_step: f32,
    pub seed: Option<u64>,
}

struct Blip {
    lat: f32,
    lon: f32,
    age: f32,
    max_age: f32,
}

/// Lookup-table sine/cosine; plenty for character-cell resolution.
struct TrigTable {
    sin: Vec<f32>,
    cos: Vec<f32>,
}

impl TrigTable {
    const SIZE: usize = 360;

    fn new() -> Self {
        let sin = (0..Self::SIZE)
            .map(|i| ((i as f32 / Self::SIZE as f32) * std::f32::consts::TAU).sin())
            .collect();
        let cos = (0..Self::SIZE)
            .map(|i| ((i as f32 / Self::SIZE as f32) * std::f32::consts::TAU).cos())
            .collect();
        Self { sin, cos }
    }

    fn sin(&self, x: f32) -> f32 {
        let normalized = x.rem_euclid(std::f32::consts::TAU) / std::f32::consts::TAU;
        let idx = (normalized * Self::SIZE as f32) as usize;
        self.sin[idx.min(Self::SIZE - 1)]
    }

    fn cos(&self, x: f32) -> f32 {
        let normalized = x.rem_euclid(std::f32::consts::TAU) / std::f32::consts::TAU;
        let idx = (normalized * Self::SIZE as f32) as usize;
        self.cos[idx.min(Self::SIZE - 1)]
    }
}

/// Blip footprint in braille dots, by observation count.
fn blip_size(count: u32) -> i32 {
    match count {
        0..=4 => 1,
        5..=19 => 2,
        20..=49 => 3,
        _ => 4,
    }
}

/// Run the globe view
pub fn run(
    term: &mut Terminal,
    client: &FeedClient,
    coords: &CoordinateTable,
    opts: &GlobeOptions,
) -> io::Result<()> {
    let mut state = VizState::new(opts.time_step, HELP);
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut current = scene::build(client, coords);
    let mut last_refresh = Instant::now();

    let demo_possible = !coords.is_empty();
    let mut rotation: f32 = 0.0;
    let mut tilt: f32 = -0.35;
    let mut zoom_override: Option<f32> = None;
    let mut current_zoom: f32 = 1.0;

    let mut blips: Vec<Blip> = Vec::new();
    let mut arc_progress: Vec<f32> = stagger_progress(current.arcs.len());
    let mut pulse: f32 = 0.0;

    let (init_w, init_h) = term.size();
    let mut prev_w = init_w;
    let mut prev_h = init_h;
    let mut braille_w = init_w as usize * 2;
    let mut braille_h = init_h as usize * 4;
    let mut braille_dots: Vec<Vec<u8>> = vec![vec![0; braille_w]; braille_h];

    let trig = TrigTable::new();

    loop {
        let (width, height) = crossterm::terminal::size().unwrap_or(term.size());

        if width != prev_w || height != prev_h {
            term.resize(width, height);
            term.clear_screen()?;
            prev_w = width;
            prev_h = height;
            braille_w = width as usize * 2;
            braille_h = height as usize * 4;
            braille_dots = vec![vec![0; braille_w]; braille_h];
        }

        if let Some((code, mods)) = term.check_key()? {
            if state.handle_key(code, mods) {
                break;
            }
            match code {
                KeyCode::Up | KeyCode::Char('k') => {
                    tilt = (tilt + 0.05).min(std::f32::consts::FRAC_PI_2);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    tilt = (tilt - 0.05).max(-std::f32::consts::FRAC_PI_2);
                }
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    let cur = zoom_override.unwrap_or(1.0);
                    zoom_override = Some((cur * 1.2).min(3.0));
                }
                KeyCode::Char('-') | KeyCode::Char('_') => {
                    let cur = zoom_override.unwrap_or(1.0);
                    zoom_override = Some((cur / 1.2).max(0.3));
                }
                // Digits are speed keys handled by the shared state; zoom
                // reset gets its own letter.
                KeyCode::Char('z') => {
                    zoom_override = None;
                }
                KeyCode::Char('r') => {
                    current = scene::build(client, coords);
                    arc_progress = stagger_progress(current.arcs.len());
                    blips.clear();
                    last_refresh = Instant::now();
                }
                _ => {}
            }
        }

        if state.paused {
            term.sleep(0.1);
            continue;
        }

        if last_refresh.elapsed() >= REFRESH_INTERVAL {
            current = scene::build(client, coords);
            arc_progress = stagger_progress(current.arcs.len());
            blips.clear();
            last_refresh = Instant::now();
        }

        for row in &mut braille_dots {
            for cell in row {
                *cell = 0;
            }
        }

        rotation += state.speed * 0.25;
        pulse += state.speed * 2.0;

        let w = width as f32;
        let h = height as f32;
        let half_w = w / 2.0;
        let half_h = h / 2.0;
        let base_radius = (h * 1.8).min(w * 0.8) * 0.4;
        if let Some(override_zoom) = zoom_override {
            current_zoom = current_zoom * 0.9 + override_zoom * 0.1;
        } else {
            current_zoom = current_zoom * 0.9 + 0.1;
        }
        let radius = base_radius * current_zoom;

        let (cos_tilt, sin_tilt) = (trig.cos(tilt), trig.sin(tilt));

        let lat_lon_to_screen = |lat: f32, lon: f32| -> Option<(i32, i32)> {
            let cos_lat = trig.cos(lat);
            let sin_lat = trig.sin(lat);
            let cos_lon = trig.cos(lon + rotation);
            let sin_lon = trig.sin(lon + rotation);

            let x = cos_lat * sin_lon;
            let y = cos_lat * cos_lon;
            let z = sin_lat;

            let y2 = y * cos_tilt - z * sin_tilt;
            let z2 = y * sin_tilt + z * cos_tilt;

            // Back-face cull with a small tolerance so outlines do not pop
            if y2 < -0.1 {
                return None;
            }

            let screen_x = half_w + x * radius;
            let screen_y = half_h - z2 * radius * 0.5;

            Some(((screen_x * 2.0) as i32, (screen_y * 4.0) as i32))
        };

        let plot = |bx: i32, by: i32, intensity: u8, dots: &mut Vec<Vec<u8>>| {
            if bx >= 0 && bx < braille_w as i32 && by >= 0 && by < braille_h as i32 {
                let cell = &mut dots[by as usize][bx as usize];
                *cell = (*cell).max(intensity);
            }
        };

        // Latitude grid
        for lat_deg in (-60..=60).step_by(30) {
            let lat = (lat_deg as f32).to_radians();
            for lon_deg in 0..360 {
                let lon = (lon_deg as f32).to_radians() - std::f32::consts::PI;
                if let Some((bx, by)) = lat_lon_to_screen(lat, lon) {
                    if bx >= 0
                        && bx < braille_w as i32
                        && by >= 0
                        && by < braille_h as i32
                        && braille_dots[by as usize][bx as usize] == 0
                    {
                        braille_dots[by as usize][bx as usize] = 1;
                    }
                }
            }
        }

        // Longitude grid
        for lon_deg in (0..360).step_by(30) {
            let lon = (lon_deg as f32).to_radians() - std::f32::consts::PI;
            for lat_deg in -90..=90 {
                let lat = (lat_deg as f32).to_radians();
                if let Some((bx, by)) = lat_lon_to_screen(lat, lon) {
                    if bx >= 0
                        && bx < braille_w as i32
                        && by >= 0
                        && by < braille_h as i32
                        && braille_dots[by as usize][bx as usize] == 0
                    {
                        braille_dots[by as usize][bx as usize] = 1;
                    }
                }
            }
        }

        // Continent outlines
        for continent in CONTINENTS.iter() {
            for i in 0..continent.len() {
                let (lat1, lon1) = continent[i];
                let (lat2, lon2) = continent[(i + 1) % continent.len()];

                for t in 0..20 {
                    let frac = t as f32 / 20.0;
                    let lat = lat1 + (lat2 - lat1) * frac;
                    let lon = lon1 + (lon2 - lon1) * frac;

                    if let Some((bx, by)) = lat_lon_to_screen(lat, lon) {
                        plot(bx, by, 2, &mut braille_dots);
                    }
                }
            }
        }

        // Threat markers: persistent pulsing blips at country centroids
        for (i, marker) in current.markers.iter().enumerate() {
            let phase = pulse + i as f32 * 0.7;
            let breathe = (trig.sin(phase) + 1.0) / 2.0;
            let size = blip_size(marker.count) + (breathe * 1.5) as i32;
            let critical = severity::classify(marker.count as f32, ATTACK_VOLUME).label == "High";
            let intensity = if critical { 4 } else { 3 };

            if let Some((bx, by)) = lat_lon_to_screen(marker.lat, marker.lon) {
                for dy in -size..=size {
                    for dx in -size..=size {
                        if dx.abs() + dy.abs() <= size {
                            plot(bx + dx, by + dy, intensity, &mut braille_dots);
                        }
                    }
                }
            }
        }

        // Demo traffic when both feeds are down but centroids are known
        if current.source == SceneSource::NoData && demo_possible {
            let centroids: Vec<_> = coords.coordinates().collect();
            if rng.gen_bool(0.15) && !centroids.is_empty() {
                let c = centroids[rng.gen_range(0..centroids.len())];
                blips.push(Blip {
                    lat: c.lat.to_radians(),
                    lon: c.lon.to_radians(),
                    age: 0.0,
                    max_age: rng.gen_range(0.5..2.0),
                });
            }
            if rng.gen_bool(0.03) && blips.len() >= 2 && current.arcs.len() < 40 {
                let i1 = rng.gen_range(0..blips.len());
                let i2 = rng.gen_range(0..blips.len());
                if i1 != i2 {
                    arc_progress.push(0.0);
                    // Demo arcs reuse the animation list with synthetic endpoints
                    current.arcs.push(crate::scene::SceneArc {
                        from: (blips[i1].lat, blips[i1].lon),
                        to: (blips[i2].lat, blips[i2].lon),
                    });
                }
            }
        }

        // Transient demo blips
        let mut kept = Vec::new();
        for mut blip in blips {
            blip.age += state.speed * 2.0;
            if blip.age < blip.max_age {
                let flash = (blip.age / blip.max_age * std::f32::consts::PI).sin();
                let size = (flash * 3.0) as i32;
                if let Some((bx, by)) = lat_lon_to_screen(blip.lat, blip.lon) {
                    for dy in -size..=size {
                        for dx in -size..=size {
                            plot(bx + dx, by + dy, 3, &mut braille_dots);
                        }
                    }
                }
                kept.push(blip);
            }
        }
        blips = kept;

        // Relation arcs: replay cyclically, staggered
        for (i, arc) in current.arcs.iter().enumerate() {
            let progress = &mut arc_progress[i];
            *progress += state.speed * 1.2;
            if *progress >= 1.4 {
                // Brief gap between replays
                *progress = 0.0;
            }
            if *progress >= 1.0 {
                continue;
            }

            let (lat1, lon1) = arc.from;
            let (lat2, lon2) = arc.to;
            let steps = (*progress * 30.0) as i32;
            for t in 0..=steps {
                let frac = t as f32 / 30.0;
                let lat = lat1 + (lat2 - lat1) * frac;
                let lon = normalize_longitude(lon1 + shortest_angular_delta(lon1, lon2) * frac);
                let arc_height = (frac * std::f32::consts::PI).sin() * 0.1;

                if let Some((bx, by)) = lat_lon_to_screen(lat + arc_height, lon) {
                    plot(bx, by, 3, &mut braille_dots);
                }
            }
        }

        // Rasterize braille cells
        term.clear();
        for cy in 0..height as usize {
            let by = cy * 4;
            if by + 3 >= braille_h {
                continue;
            }
            for cx in 0..width as usize {
                let bx = cx * 2;
                if bx + 1 >= braille_w {
                    continue;
                }

                let mut dots: u8 = 0;
                let mut max_intensity: u8 = 0;

                let positions = [
                    (by, bx), (by + 1, bx), (by + 2, bx),
                    (by, bx + 1), (by + 1, bx + 1), (by + 2, bx + 1),
                    (by + 3, bx), (by + 3, bx + 1),
                ];
                let dot_bits = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80];

                for (i, &(py, px)) in positions.iter().enumerate() {
                    let val = braille_dots[py][px];
                    if val > 0 {
                        dots |= dot_bits[i];
                        max_intensity = max_intensity.max(val);
                    }
                }

                if dots > 0 {
                    let ch = char::from_u32(0x2800 + dots as u32).unwrap_or(' ');
                    let (color, bold) = if max_intensity == 4 {
                        (Color::Red, true)
                    } else {
                        let intensity = match max_intensity {
                            1 => 0,
                            2 => 1,
                            _ => 3,
                        };
                        scheme_color(state.scheme(), intensity, max_intensity >= 3)
                    };
                    term.set(cx as i32, cy as i32, ch, Some(color), bold);
                }
            }
        }

        draw_sidebar(term, width, height, &current, demo_possible);
        state.render_help(term, width, height);
        term.present()?;
        term.sleep(state.speed);
    }

    Ok(())
}

fn stagger_progress(n: usize) -> Vec<f32> {
    (0..n).map(|i| (i as f32 * 0.37).fract() * -1.0).collect()
}

/// Stats sidebar on the right edge; skipped on narrow terminals.
fn draw_sidebar(term: &mut Terminal, width: u16, height: u16, scene: &Scene, demo: bool) {
    if width < 64 || height < 14 {
        return;
    }

    let x = width as i32 - 26;
    let muted = Some(Color::DarkGrey);
    let mut y = 1;

    term.set_str(x, y, "THREAT ACTIVITY", Some(Color::White), true);
    y += 2;
    term.set_str(x, y, &format!("Observations {:>8}", scene.total), Some(Color::Grey), false);
    y += 1;
    term.set_str(x, y, &format!("Countries    {:>8}", scene.countries), Some(Color::Grey), false);
    y += 1;
    term.set_str(x, y, &format!("Arcs         {:>8}", scene.arcs.len()), Some(Color::Grey), false);
    y += 2;

    if !scene.top.is_empty() {
        term.set_str(x, y, "TOP COUNTRIES", Some(Color::White), true);
        y += 1;
        for (code, count) in &scene.top {
            let band = severity::classify(*count as f32, ATTACK_VOLUME);
            term.set_str(x, y, &format!("{:<4} {:>6}", code, count), Some(band.color), false);
            term.set_str(x + 12, y, band.label, muted, false);
            y += 1;
        }
        y += 1;
    }

    let status = match scene.source {
        SceneSource::Live => ("LIVE", Color::Green),
        SceneSource::NoData if demo => ("DEMO", Color::Yellow),
        SceneSource::NoData => ("NO DATA", Color::DarkGrey),
    };
    term.set_str(x, y, status.0, Some(status.1), true);
    y += 1;
    term.set_str(
        x,
        y,
        &format!("Updated {}", scene.updated.format("%H:%M:%S")),
        muted,
        false,
    );
}
