use anyhow::{Context, Result, anyhow};
use directories::UserDirs;
use log::info;
use serde::Deserialize;
use std::{fs, path::PathBuf};

use crate::games::GameKind;
use crate::gestures::{DEFAULT_PINCH_THRESHOLD, EdgePolarity, PointerAnchor};

#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub name: String,
}

/// Options forwarded to the tracking source. Recorded per game because the
/// games configure the tracker differently (pong wants tighter tracking,
/// shapes tolerates looser detection).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Tracking {
    pub max_hands: usize,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
    pub model_complexity: u8,
}

impl Default for Tracking {
    fn default() -> Self {
        Self {
            max_hands: 1,
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.5,
            model_complexity: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Pointer {
    pub anchor: PointerAnchor,
    /// Selfie view: flip x once per rendering context, before hit-testing.
    pub mirror: bool,
}

impl Default for Pointer {
    fn default() -> Self {
        Self {
            anchor: PointerAnchor::MiddleMcp,
            mirror: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Normalized thumb-to-index distance below which a pinch grabs.
    pub pinch: f32,
    /// Pickup reach for draggables, in screen pixels.
    pub grab_radius_px: f32,
    /// Quiz feedback pause, measured against frame timestamps.
    pub feedback_pause_ms: u64,
    pub brush_gain: f32,
    pub brush_min: f32,
    pub brush_max: f32,
    /// Hands that must show the dislike sign simultaneously to leave.
    pub dislike_hands: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            pinch: DEFAULT_PINCH_THRESHOLD,
            grab_radius_px: 80.0,
            feedback_pause_ms: 1000,
            brush_gain: 10.0,
            brush_min: 0.5,
            brush_max: 5.0,
            dislike_hands: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Debounce {
    pub polarity: EdgePolarity,
}

impl Default for Debounce {
    fn default() -> Self {
        Self {
            polarity: EdgePolarity::Rising,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub meta: Meta,
    #[serde(default)]
    pub tracking: Tracking,
    #[serde(default)]
    pub pointer: Pointer,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub debounce: Debounce,
}

/// Where profiles live and how they get there. Embedded defaults are
/// installed on first use; a hand-edited file always wins afterwards.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    pub config_dir: PathBuf,
    pub profiles_dir: PathBuf,
}

fn embedded_profile(game: GameKind) -> &'static str {
    match game {
        GameKind::Menu => include_str!("../profiles/menu.toml"),
        GameKind::Colors => include_str!("../profiles/colors.toml"),
        GameKind::Draw => include_str!("../profiles/draw.toml"),
        GameKind::Pong => include_str!("../profiles/pong.toml"),
        GameKind::Shapes => include_str!("../profiles/shapes.toml"),
    }
}

impl ConfigStore {
    pub fn open() -> Result<Self> {
        let home = UserDirs::new()
            .ok_or_else(|| anyhow!("cannot locate home directory"))?
            .home_dir()
            .to_path_buf();
        let config_dir = home.join(".config").join("handctl");
        let profiles_dir = config_dir.join("profiles");
        fs::create_dir_all(&profiles_dir)?;

        let store = Self {
            config_dir,
            profiles_dir,
        };
        store.install_defaults()?;
        Ok(store)
    }

    fn install_defaults(&self) -> Result<()> {
        for game in GameKind::ALL {
            let path = self.profile_path(game);
            if !path.exists() {
                fs::write(&path, embedded_profile(game))?;
                info!("installed default profile at {}", path.display());
            }
        }
        Ok(())
    }

    pub fn profile_path(&self, game: GameKind) -> PathBuf {
        self.profiles_dir.join(format!("{}.toml", game.as_str()))
    }

    pub fn load(&self, game: GameKind) -> Result<Profile> {
        let path = self.profile_path(game);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let profile: Profile = toml::from_str(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        validate_profile(&profile)?;
        Ok(profile)
    }

    pub fn list_profiles(&self) -> Vec<String> {
        let mut v = Vec::new();
        if let Ok(rd) = fs::read_dir(&self.profiles_dir) {
            for e in rd.flatten() {
                if let Some(ext) = e.path().extension() {
                    if ext == "toml" {
                        if let Some(stem) = e.path().file_stem().and_then(|s| s.to_str()) {
                            v.push(stem.to_string());
                        }
                    }
                }
            }
        }
        v.sort();
        v
    }

    pub fn doctor_report(&self) -> serde_json::Value {
        let mut profiles = serde_json::Map::new();
        for game in GameKind::ALL {
            let status = match self.load(game) {
                Ok(p) => serde_json::json!({"ok": true, "name": p.meta.name}),
                Err(e) => serde_json::json!({"ok": false, "error": e.to_string()}),
            };
            profiles.insert(game.as_str().to_string(), status);
        }
        serde_json::json!({
            "config_dir": self.config_dir,
            "profiles_dir": self.profiles_dir,
            "installed": self.list_profiles(),
            "profiles": profiles,
            "hints": {
                "frame_input": "pipe NDJSON frames into 'handctl run <game>'",
                "profile_reload": "editing a profile mid-run restarts the session"
            }
        })
    }
}

fn validate_profile(p: &Profile) -> Result<()> {
    if !(1..=2).contains(&p.tracking.max_hands) {
        return Err(anyhow!("tracking.max_hands must be 1 or 2"));
    }
    for (key, v) in [
        ("min_detection_confidence", p.tracking.min_detection_confidence),
        ("min_tracking_confidence", p.tracking.min_tracking_confidence),
    ] {
        if !(0.0..=1.0).contains(&v) {
            return Err(anyhow!("tracking.{key} must be in [0,1]"));
        }
    }
    if p.tracking.model_complexity > 2 {
        return Err(anyhow!("tracking.model_complexity must be 0, 1 or 2"));
    }
    if !(0.0..1.0).contains(&p.thresholds.pinch) || p.thresholds.pinch == 0.0 {
        return Err(anyhow!("thresholds.pinch must be in (0,1) normalized units"));
    }
    if p.thresholds.grab_radius_px <= 0.0 {
        return Err(anyhow!("thresholds.grab_radius_px must be positive"));
    }
    if p.thresholds.brush_gain <= 0.0 || p.thresholds.brush_min > p.thresholds.brush_max {
        return Err(anyhow!("brush thresholds must satisfy gain > 0 and min <= max"));
    }
    if !(1..=2).contains(&p.thresholds.dislike_hands) {
        return Err(anyhow!("thresholds.dislike_hands must be 1 or 2"));
    }
    if p.thresholds.dislike_hands > p.tracking.max_hands {
        return Err(anyhow!(
            "thresholds.dislike_hands cannot exceed tracking.max_hands"
        ));
    }
    Ok(())
}

#[cfg(test)]
impl Profile {
    pub(crate) fn test(max_hands: usize, anchor: PointerAnchor) -> Profile {
        Profile {
            meta: Meta {
                name: "test".into(),
            },
            tracking: Tracking {
                max_hands,
                ..Tracking::default()
            },
            pointer: Pointer {
                anchor,
                mirror: true,
            },
            thresholds: Thresholds::default(),
            debounce: Debounce::default(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────
