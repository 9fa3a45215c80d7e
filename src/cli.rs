use anyhow::{Result, anyhow};
use pico_args::Arguments;
use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::actions::LogSink;
use crate::config::ConfigStore;
use crate::games::GameKind;
use crate::gestures::{GestureState, PointerAnchor};
use crate::hand::Frame;
use crate::pipeline;

const DEFAULT_SCREEN: (f32, f32) = (1280.0, 720.0);
const DEFAULT_SEED: u64 = 0x5EED;

fn parse_screen(s: &str) -> Result<(f32, f32), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let w: f32 = w.parse().map_err(|_| format!("bad width in '{s}'"))?;
    let h: f32 = h.parse().map_err(|_| format!("bad height in '{s}'"))?;
    if w <= 0.0 || h <= 0.0 {
        return Err(format!("screen must be positive, got '{s}'"));
    }
    Ok((w, h))
}

pub fn run() -> Result<()> {
    let mut pargs = Arguments::from_env();

    // No args -> general help
    if env::args().len() == 1 {
        print_help();
        return Ok(());
    }

    // Flags-based help (-h/--help)
    if pargs.contains("-h") || pargs.contains("--help") {
        print_help();
        return Ok(());
    }

    let seed: u64 = pargs.opt_value_from_str("--seed")?.unwrap_or(DEFAULT_SEED);
    let screen = pargs
        .opt_value_from_fn("--screen", parse_screen)?
        .unwrap_or(DEFAULT_SCREEN);

    // First free arg is the subcommand
    let subcmd: Option<String> = pargs.free_from_str().ok();

    match subcmd.as_deref() {
        Some("help") => {
            let topic: Option<String> = pargs.free_from_str().ok();
            if let Some(t) = topic {
                print_subcmd_help(&t);
            } else {
                print_help();
            }
            Ok(())
        }

        Some("run") => {
            let game: String = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: handctl run <game>"))?;
            let kind = GameKind::parse(&game)?;
            let store = ConfigStore::open()?;
            pipeline::run_live(kind, &store, screen, seed)
        }

        Some("replay") => {
            let game: String = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: handctl replay <game> <frames.jsonl>"))?;
            let path: PathBuf = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: handctl replay <game> <frames.jsonl>"))?;
            let kind = GameKind::parse(&game)?;
            let store = ConfigStore::open()?;
            let profile = store.load(kind)?;
            let mut sink = LogSink;
            let summary = pipeline::run_replay(kind, profile, &path, screen, seed, &mut sink)?;
            print_response(&serde_json::json!({
                "frames": summary.frames,
                "skipped_lines": summary.skipped_lines,
                "effects": summary.effects,
                "final_phase": summary.final_phase.as_str(),
            }));
            Ok(())
        }

        Some("classify") => {
            let path: PathBuf = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: handctl classify <frames.jsonl>"))?;
            classify_file(&path)
        }

        Some("profiles") => {
            let store = ConfigStore::open()?;
            for name in store.list_profiles() {
                println!("{name}");
            }
            Ok(())
        }

        Some("doctor") => {
            let store = ConfigStore::open()?;
            print_response(&store.doctor_report());
            Ok(())
        }

        Some(other) => {
            eprintln!("unknown subcommand: {other}\n");
            print_help();
            Ok(())
        }

        None => {
            print_help();
            Ok(())
        }
    }
}

/// Dump per-hand classification for every frame in a recording, one json
/// object per line. Coordinates stay unmirrored: this inspects the raw
/// tracking stream.
fn classify_file(path: &PathBuf) -> Result<()> {
    let file = File::open(path).map_err(|e| anyhow!("failed to open {}: {e}", path.display()))?;
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let frame = match Frame::from_json(&line) {
            Ok(frame) => frame,
            Err(e) => {
                eprintln!("skipping line: {e}");
                continue;
            }
        };
        let hands: Vec<serde_json::Value> = frame
            .hands
            .iter()
            .map(|hand| {
                let state = GestureState::classify(hand, PointerAnchor::PalmCenter);
                serde_json::json!({
                    "handedness": hand.handedness.as_str(),
                    "fist": state.is_fist,
                    "dislike": state.is_dislike,
                    "fingers": state.finger_count,
                    "pinch": state.pinch_distance,
                    "palm": {"x": state.palm_center.x, "y": state.palm_center.y},
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({"timestamp_ms": frame.timestamp_ms, "hands": hands})
        );
    }
    Ok(())
}

fn print_help() {
    println!(
        r#"handctl — hand-gesture game core

USAGE:
  handctl help [command]                  Show general or command-specific help
  handctl run <game>                      Run a live session on NDJSON frames from stdin
  handctl replay <game> <frames.jsonl>    Replay recorded frames through a game
  handctl classify <frames.jsonl>         Dump per-frame gesture classification
  handctl profiles                        List installed game profiles
  handctl doctor                          Check config dir and profile health

OPTIONS:
  --screen WxH                            Screen size in pixels (default 1280x720)
  --seed N                                Seed for round/color/serve picks

GAMES: menu, colors, draw, pong, shapes

TIPS:
  - Profiles: ~/.config/handctl/profiles/<game>.toml
  - Editing a profile while 'run' is live restarts the session
"#
    );
}

fn print_subcmd_help(cmd: &str) {
    match cmd {
        "run" => println!(
            "usage: handctl run <game>\nReads NDJSON frames from stdin until EOF or SIGINT;\nemits effects to the log."
        ),
        "replay" => println!(
            "usage: handctl replay <game> <frames.jsonl>\nFeeds a recording through one game session and prints a summary."
        ),
        "classify" => println!(
            "usage: handctl classify <frames.jsonl>\nPrints fist/dislike/finger-count/pinch per hand per frame."
        ),
        "profiles" => println!("usage: handctl profiles\nLists profile files found in the config dir."),
        "doctor" => println!(
            "usage: handctl doctor\nReports the config dir, installed profiles and whether each validates."
        ),
        _ => {
            eprintln!("unknown command: {cmd}\n");
            print_help();
        }
    }
}

fn print_response(v: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(v).unwrap_or_default());
}

// ── Tests ──────────────────────────────────────────────────
