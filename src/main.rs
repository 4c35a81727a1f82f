use std::env;
use std::io::BufRead;
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

mod ambience;
mod catalog;
mod config;
mod transport;

use ambience::AmbienceEngine;
use catalog::Catalog;
use transport::{Levels, LevelsHandle, RodioDeck, TransportController};

fn main() {
    env_logger::init();

    let settings = config::load_or_default();

    let catalog_path = env::args().nth(1).unwrap_or_else(|| "catalog.json".to_string());
    let catalog = match Catalog::load(Path::new(&catalog_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("platter: cannot load catalog {catalog_path}: {e}");
            std::process::exit(1);
        }
    };

    let tracks: Vec<Arc<catalog::Track>> =
        catalog.tracks.iter().cloned().map(Arc::new).collect();

    // The shared levels object ties transport and ambience together: the
    // controller writes it, the noise engine follows it.
    let levels: LevelsHandle = Arc::new(Mutex::new(Levels::default()));

    let (deck, deck_events) = RodioDeck::spawn();
    let mut controller = TransportController::new(
        Box::new(deck),
        deck_events,
        levels.clone(),
        &settings.playback,
    );
    controller.set_playlist(tracks);

    let _ambience = settings
        .ambience
        .enabled
        .then(|| AmbienceEngine::spawn(levels.clone(), settings.ambience.clone()));

    println!(
        "platter: {} tracks loaded. Commands: play pause toggle next prev seek <s> vol <v> mute list info quit",
        controller.playlist().len()
    );

    // Stdin lines arrive over a channel so the main loop can keep pumping
    // deck events (auto-advance needs it) while nobody types anything.
    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(l) => {
                    if line_tx.send(l).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    loop {
        controller.process_events();

        let line = match line_rx.recv_timeout(Duration::from_millis(200)) {
            Ok(l) => l,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("play") => controller.play(),
            Some("pause") => controller.pause(),
            Some("toggle") => controller.toggle_play(),
            Some("next") => controller.play_next(),
            Some("prev") => controller.play_prev(),
            Some("seek") => match parts.next().and_then(|s| s.parse::<u64>().ok()) {
                Some(secs) => controller.seek(Duration::from_secs(secs)),
                None => println!("usage: seek <seconds>"),
            },
            Some("vol") => match parts.next().and_then(|s| s.parse::<f32>().ok()) {
                Some(v) if (0.0..=1.0).contains(&v) => controller.set_volume(v),
                _ => println!("usage: vol <0.0..1.0>"),
            },
            Some("mute") => controller.toggle_mute(),
            Some("list") => print_list(&controller, &catalog),
            Some("info") => print_info(&controller, &catalog),
            Some("quit") | Some("q") => break,
            Some(other) => println!("unknown command: {other}"),
            None => {}
        }

        controller.process_events();
        print_status(&controller);
    }
}

fn print_status(controller: &TransportController) {
    let state = controller.state();
    let mark = if state.is_playing { ">" } else { "#" };
    let title = controller
        .current_track()
        .map(|t| t.title.en.as_str())
        .unwrap_or("-");
    println!(
        "{mark} {title}  {}/{}  vol {:.2}{}",
        fmt_time(state.current_time),
        fmt_time(state.duration),
        state.volume,
        if state.is_muted { " (muted)" } else { "" },
    );
}

fn print_list(controller: &TransportController, catalog: &Catalog) {
    for (i, track) in controller.playlist().iter().enumerate() {
        let here = if controller.playlist_index() == Some(i) {
            "*"
        } else {
            " "
        };
        let composer = catalog
            .composer_for(track)
            .map(|c| c.name.en.as_str())
            .unwrap_or("?");
        println!("{here} {i:>3}  {} — {composer}", track.title.en);
    }
}

fn print_info(controller: &TransportController, catalog: &Catalog) {
    let Some(track) = controller.current_track() else {
        println!("nothing selected");
        return;
    };
    println!("{} / {}", track.title.en, track.title.zh);
    if let Some(op) = &track.opus {
        println!("  {op}");
    }
    if let Some(c) = catalog.composer_for(track) {
        let death = c
            .death_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "".to_string());
        println!("  {} ({}-{death}), {}", c.name.en, c.birth_year, c.nationality);
    }
    println!(
        "  {:?}, {}",
        track.category,
        track.category.period_label()
    );
    println!("  {}", track.history.background);
}

fn fmt_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
