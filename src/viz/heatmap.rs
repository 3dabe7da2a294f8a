//! 2D world heatmap
//!
//! Equirectangular character-grid map: continent outlines, severity-colored
//! markers at country centroids, and a bottom stat panel with the top
//! countries as meters. The companion flat view to the globe.

use crate::colors::scheme_color;
use crate::feed::FeedClient;
use crate::intel::geo::CoordinateTable;
use crate::intel::severity::{self, ATTACK_VOLUME};
use crate::scene::{self, Scene, SceneSource};
use crate::terminal::Terminal;
use crate::viz::layout::{draw_meter_smooth, Box};
use crate::viz::worldmap::CONTINENTS;
use crate::viz::VizState;
use crossterm::event::KeyCode;
use crossterm::style::Color;
use std::io;
use std::time::{Duration, Instant};

const HELP: &str = "\
THREAT HEATMAP
─────────────────
r      Refresh feeds
space  Pause
?      Toggle help";

const REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Rows reserved for the stat panel below the map.
const PANEL_HEIGHT: u16 = 10;

pub struct HeatmapOptions {
    pub time_step: f32,
}

/// Run the heatmap view
pub fn run(
    term: &mut Terminal,
    client: &FeedClient,
    coords: &CoordinateTable,
    opts: &HeatmapOptions,
) -> io::Result<()> {
    let mut state = VizState::new(opts.time_step, HELP);
    let mut current = scene::build(client, coords);
    let mut last_refresh = Instant::now();
    let mut frame: usize = 0;

    let (init_w, init_h) = term.size();
    let mut prev_w = init_w;
    let mut prev_h = init_h;

    loop {
        let (width, height) = crossterm::terminal::size().unwrap_or(term.size());
        if width != prev_w || height != prev_h {
            term.resize(width, height);
            term.clear_screen()?;
            prev_w = width;
            prev_h = height;
        }

        if let Some((code, mods)) = term.check_key()? {
            if state.handle_key(code, mods) {
                break;
            }
            if code == KeyCode::Char('r') {
                current = scene::build(client, coords);
                last_refresh = Instant::now();
            }
        }

        if state.paused {
            term.sleep(0.1);
            continue;
        }

        if last_refresh.elapsed() >= REFRESH_INTERVAL {
            current = scene::build(client, coords);
            last_refresh = Instant::now();
        }

        frame = frame.wrapping_add(1);

        term.clear();
        let map_h = height.saturating_sub(PANEL_HEIGHT);
        draw_map(term, width, map_h, &current, &state, frame);
        draw_panel(term, width, height, map_h, &current);
        state.render_help(term, width, height);
        term.present()?;
        term.sleep(state.speed);
    }

    Ok(())
}

/// Equirectangular projection into the map area.
fn project(lat: f32, lon: f32, map_w: u16, map_h: u16) -> (i32, i32) {
    let x = (lon / std::f32::consts::PI + 1.0) / 2.0 * (map_w.saturating_sub(1)) as f32;
    let y = (0.5 - lat / std::f32::consts::PI) * (map_h.saturating_sub(1)) as f32;
    (x as i32, y as i32)
}

fn draw_map(
    term: &mut Terminal,
    width: u16,
    map_h: u16,
    scene: &Scene,
    state: &VizState,
    frame: usize,
) {
    if map_h < 4 {
        return;
    }

    // Continent outlines
    let (outline_color, _) = scheme_color(state.scheme(), 0, false);
    for continent in CONTINENTS.iter() {
        for segment in continent.windows(2) {
            let (lat1, lon1) = segment[0];
            let (lat2, lon2) = segment[1];
            // Antimeridian-spanning segments would smear across the whole
            // map; skip them (Antarctica's closing edge).
            if (lon1 - lon2).abs() > std::f32::consts::PI {
                continue;
            }
            for t in 0..=12 {
                let frac = t as f32 / 12.0;
                let lat = lat1 + (lat2 - lat1) * frac;
                let lon = lon1 + (lon2 - lon1) * frac;
                let (x, y) = project(lat, lon, width, map_h);
                term.set(x, y, '·', Some(outline_color), false);
            }
        }
    }

    // Country markers, low counts first so hotter ones draw on top
    let mut markers: Vec<_> = scene.markers.iter().collect();
    markers.sort_by_key(|m| m.count);
    for marker in markers {
        let band = severity::classify(marker.count as f32, ATTACK_VOLUME);
        let (x, y) = project(marker.lat, marker.lon, width, map_h);
        let ch = match band.label {
            "High" => '█',
            "Medium" => '▓',
            _ => '▒',
        };
        // High-severity markers blink slowly
        let bold = band.label == "High" && (frame / 8) % 2 == 0;
        term.set(x, y, ch, Some(band.color), bold);
    }

    if scene.source == SceneSource::NoData {
        let msg = "NO DATA - feeds unreachable (press r to retry)";
        let cx = (width as usize).saturating_sub(msg.len()) / 2;
        term.set_str(cx as i32, (map_h / 2) as i32, msg, Some(Color::DarkGrey), false);
    }
}

fn draw_panel(
    term: &mut Terminal,
    width: u16,
    height: u16,
    map_h: u16,
    scene: &Scene,
) {
    if height < map_h + PANEL_HEIGHT {
        return;
    }

    let panel = Box::new(0, map_h as i32, width, PANEL_HEIGHT, "THREAT HEATMAP");
    panel.draw(term);

    let x = panel.inner_x() + 1;
    let mut y = panel.inner_y();
    let muted = Some(Color::DarkGrey);

    let critical = scene
        .markers
        .iter()
        .filter(|m| severity::classify(m.count as f32, ATTACK_VOLUME).label == "High")
        .count();
    term.set_str(
        x,
        y,
        &format!(
            "Observations: {}   Countries: {}   Critical: {}   Arcs: {}",
            scene.total,
            scene.countries,
            critical,
            scene.arcs.len()
        ),
        Some(Color::Grey),
        false,
    );
    y += 2;

    // Top countries as meters against the leader
    let max_count = scene.top.first().map(|&(_, c)| c).unwrap_or(1).max(1);
    let meter_width = ((width as usize).saturating_sub(30)).min(40);
    for (code, count) in &scene.top {
        let band = severity::classify(*count as f32, ATTACK_VOLUME);
        term.set_str(x, y, &format!("{:<4} {:>6} ", code, count), Some(band.color), false);
        draw_meter_smooth(
            term,
            x + 12,
            y,
            meter_width,
            *count as f32 / max_count as f32 * 100.0,
            band.color,
        );
        y += 1;
    }

    // Severity legend and freshness on the bottom row
    let legend_y = map_h as i32 + PANEL_HEIGHT as i32 - 2;
    let mut lx = x;
    for band in ATTACK_VOLUME {
        term.set_str(lx, legend_y, "■", Some(band.color), false);
        term.set_str(lx + 2, legend_y, band.label, muted, false);
        lx += band.label.len() as i32 + 5;
    }
    let stamp = format!("Updated {}", scene.updated.format("%H:%M:%S"));
    term.set_str(
        width as i32 - stamp.len() as i32 - 3,
        legend_y,
        &stamp,
        muted,
        false,
    );
}
