//! The frame loop: NDJSON lines from the tracking source in, effects out.
//! Replay feeds a recorded file through one session; live mode reads stdin
//! until EOF or a signal, hot-reloading the game's profile on change.

use anyhow::{Context, Result};
use log::{error, info, warn};
use notify::{RecursiveMode, Watcher};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;

use crate::actions::{EffectSink, LogSink};
use crate::config::{ConfigStore, Profile};
use crate::games::{self, GameKind};
use crate::hand::Frame;
use crate::session::Phase;

#[derive(Debug)]
pub struct ReplaySummary {
    pub frames: u64,
    pub skipped_lines: u64,
    pub effects: u64,
    pub final_phase: Phase,
}

pub fn run_replay(
    kind: GameKind,
    profile: Profile,
    path: &Path,
    screen: (f32, f32),
    seed: u64,
    sink: &mut dyn EffectSink,
) -> Result<ReplaySummary> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut game = games::build(kind, profile, screen, seed);
    let mut frames = 0u64;
    let mut skipped = 0u64;
    let mut effects = 0u64;

    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let frame = match Frame::from_json(&line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("skipping frame: {e}");
                skipped += 1;
                continue;
            }
        };
        for effect in game.update(&frame) {
            effects += 1;
            sink.emit(effect);
        }
        frames += 1;
    }

    Ok(ReplaySummary {
        frames,
        skipped_lines: skipped,
        effects,
        final_phase: game.phase(),
    })
}

pub fn run_live(kind: GameKind, store: &ConfigStore, screen: (f32, f32), seed: u64) -> Result<()> {
    let stop = Arc::new(AtomicBool::new(false));
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    {
        let stop = stop.clone();
        thread::spawn(move || {
            if let Some(sig) = signals.forever().next() {
                info!("received signal {sig}, shutting down");
                stop.store(true, Ordering::SeqCst);
            }
        });
    }

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })?;
    watcher.watch(&store.profiles_dir, RecursiveMode::NonRecursive)?;
    let profile_path = store.profile_path(kind);

    let mut profile = store.load(kind)?;
    let mut game = games::build(kind, profile.clone(), screen, seed);
    let mut sink = LogSink;
    info!(
        "session started: game '{}', profile '{}'",
        kind.as_str(),
        profile.meta.name
    );

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        if stop.load(Ordering::SeqCst) {
            break;
        }

        let mut reload = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                Ok(evt) if evt.paths.iter().any(|p| p == &profile_path) => reload = true,
                Ok(_) => {}
                Err(e) => warn!("profile watch error: {e}"),
            }
        }
        if reload {
            // Keep the last good profile on error, like any reload.
            match store.load(kind) {
                Ok(fresh) => {
                    info!("profile changed; restarting session");
                    profile = fresh;
                    game = games::build(kind, profile.clone(), screen, seed);
                }
                Err(e) => error!("profile reload failed, keeping previous: {e}"),
            }
        }

        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match Frame::from_json(&line) {
            Ok(frame) => {
                for effect in game.update(&frame) {
                    sink.emit(effect);
                }
            }
            Err(e) => warn!("skipping frame: {e}"),
        }
    }

    info!("session ended in phase '{}'", game.phase().as_str());
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Effect, Page, RecordingSink};
    use crate::gestures::PointerAnchor;
    use std::io::Write;

    /// A menu-game frame: one hand fisted over the "colors" tile. The
    /// default menu layout on 1000x800 puts the first tile at x 80..260,
    /// y 280..520; raw x 0.77 mirrors to screen x 230.
    fn fist_frame_json() -> String {
        let mut landmarks = Vec::new();
        for i in 0..21 {
            let (x, y) = match i {
                8 | 12 | 16 | 20 => (0.77, 0.75),
                9 => (0.77, 0.5),
                _ => (0.77, 0.5),
            };
            landmarks.push(format!(r#"{{"x":{x},"y":{y},"z":0.0}}"#));
        }
        format!(
            r#"{{"timestamp_ms":16,"hands":[{{"handedness":"Right","landmarks":[{}]}}]}}"#,
            landmarks.join(",")
        )
    }

    #[test]
    fn replay_drives_a_menu_selection() {
        let dir = std::env::temp_dir().join("handctl-replay-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("frames.jsonl");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "{}", fist_frame_json()).unwrap();
        writeln!(f, "not json").unwrap();
        writeln!(f, "{}", fist_frame_json()).unwrap();
        drop(f);

        let mut sink = RecordingSink::default();
        let summary = run_replay(
            GameKind::Menu,
            Profile::test(1, PointerAnchor::MiddleMcp),
            &path,
            (1000.0, 800.0),
            1,
            &mut sink,
        )
        .unwrap();

        assert_eq!(summary.frames, 2);
        assert_eq!(summary.skipped_lines, 1);
        assert_eq!(summary.final_phase, Phase::Navigating);
        assert!(sink.effects.contains(&Effect::Navigate(Page::Colors)));
        // The second fist frame lands after the latch: no duplicate.
        let navs = sink
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::Navigate(_)))
            .count();
        assert_eq!(navs, 1);
    }

    #[test]
    fn replay_reports_missing_files() {
        let mut sink = RecordingSink::default();
        let err = run_replay(
            GameKind::Menu,
            Profile::test(1, PointerAnchor::MiddleMcp),
            Path::new("/nonexistent/frames.jsonl"),
            (800.0, 600.0),
            1,
            &mut sink,
        );
        assert!(err.is_err());
    }
}
