//! Preset loader.
//!
//! Reads environments, projectiles and stages from YAML so new planets, balls
//! and target layouts can be added without recompiling.
//!
//! ## Directory Structure
//!
//! ```text
//! presets/
//! ├── environments/
//! │   ├── earth.yaml
//! │   └── moon.yaml
//! ├── projectiles/
//! │   ├── basketball.yaml
//! │   └── ...
//! └── stages/
//!     ├── beginner.yaml
//!     └── ...
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::launch::LaunchParams;
use crate::motion::{AnimatedTargets, TargetMotion};
use crate::targets::TargetSpec;
use crate::types::{constants, Vec3};

/// Error type for preset loading.
#[derive(Debug)]
pub enum PresetError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    NotFound(String),
}

impl std::fmt::Display for PresetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetError::Io(e) => write!(f, "IO error: {}", e),
            PresetError::Parse(e) => write!(f, "YAML parse error: {}", e),
            PresetError::NotFound(name) => write!(f, "Preset not found: {}", name),
        }
    }
}

impl std::error::Error for PresetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PresetError::Io(e) => Some(e),
            PresetError::Parse(e) => Some(e),
            PresetError::NotFound(_) => None,
        }
    }
}

impl From<std::io::Error> for PresetError {
    fn from(err: std::io::Error) -> Self {
        PresetError::Io(err)
    }
}

impl From<serde_yaml::Error> for PresetError {
    fn from(err: serde_yaml::Error) -> Self {
        PresetError::Parse(err)
    }
}

// =============================================================================
// Preset Types
// =============================================================================

/// Where the shot is fired: planet gravity, wind and air.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentPreset {
    pub name: String,
    /// Gravity magnitude, pointing down (m/s²)
    pub gravity: f64,
    /// Ambient air velocity (m/s)
    #[serde(default)]
    pub wind: Vec3,
    /// Air density (kg/m³); 0 for vacuum
    pub air_density: f64,
}

impl Default for EnvironmentPreset {
    fn default() -> Self {
        Self {
            name: "Earth".to_string(),
            gravity: constants::GRAVITY,
            wind: Vec3::ZERO,
            air_density: constants::AIR_DENSITY,
        }
    }
}

/// What is being fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileProperties {
    pub name: String,
    /// Mass in kg
    pub mass: f64,
    /// Cross-sectional area in m²
    pub area: f64,
    /// Drag coefficient (~0.47 for a sphere)
    pub drag_coefficient: f64,
    /// Replay speed multiplier for visual playback
    #[serde(default = "default_playback_speed")]
    pub playback_speed: f64,
}

fn default_playback_speed() -> f64 {
    1.0
}

impl ProjectileProperties {
    /// Samples advanced per playback frame.
    pub fn playback_stride(&self) -> usize {
        (self.playback_speed.floor() as usize).max(1)
    }
}

/// A target layout to play on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// Environment preset name
    #[serde(default)]
    pub environment: Option<String>,
    /// Recommended projectile preset name
    #[serde(default)]
    pub projectile: Option<String>,
    /// Suggested opening shot
    #[serde(default)]
    pub default_launch: Option<LaunchParams>,
    pub targets: Vec<TargetSpec>,
    /// Moving targets by id; everything else is static
    #[serde(default)]
    pub motions: HashMap<String, TargetMotion>,
}

impl Stage {
    pub fn target(&self, id: &str) -> Option<&TargetSpec> {
        self.targets.iter().find(|t| t.id() == id)
    }

    /// Position lookup for this stage's moving targets.
    pub fn animated_targets(&self, clock_at_launch: f64) -> AnimatedTargets {
        let mut animated = AnimatedTargets::new(clock_at_launch);
        for target in &self.targets {
            if let Some(motion) = self.motions.get(target.id()) {
                animated.insert(target.id(), target.position(), motion.clone());
            }
        }
        animated
    }
}

// =============================================================================
// Loader
// =============================================================================

/// Preset loader with configurable base directory.
pub struct PresetLoader {
    base_path: PathBuf,
}

impl PresetLoader {
    /// The base path should contain `environments/`, `projectiles/` and `stages/`.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load an environment by name (without .yaml extension).
    ///
    /// # Example
    /// ```ignore
    /// let loader = PresetLoader::new("presets");
    /// let moon = loader.load_environment("moon")?;
    /// ```
    pub fn load_environment(&self, name: &str) -> Result<EnvironmentPreset, PresetError> {
        self.load("environments", name)
    }

    pub fn load_projectile(&self, name: &str) -> Result<ProjectileProperties, PresetError> {
        self.load("projectiles", name)
    }

    pub fn load_stage(&self, name: &str) -> Result<Stage, PresetError> {
        self.load("stages", name)
    }

    pub fn list_environments(&self) -> Result<Vec<String>, PresetError> {
        self.list("environments")
    }

    pub fn list_projectiles(&self) -> Result<Vec<String>, PresetError> {
        self.list("projectiles")
    }

    pub fn list_stages(&self) -> Result<Vec<String>, PresetError> {
        self.list("stages")
    }

    fn load<T: DeserializeOwned>(&self, subdir: &str, name: &str) -> Result<T, PresetError> {
        let path = self.base_path.join(subdir).join(format!("{}.yaml", name));
        if !path.exists() {
            return Err(PresetError::NotFound(name.to_string()));
        }
        let contents = fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    fn list(&self, subdir: &str) -> Result<Vec<String>, PresetError> {
        let path = self.base_path.join(subdir);
        if !path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".yaml") {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Tests
// =============================================================================
