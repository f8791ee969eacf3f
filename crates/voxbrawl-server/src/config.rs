use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use voxbrawl_world::anticheat::{MAX_BUILD_DISTANCE, RAPID_WINDOW, RAPID_WINDOW_ENTRIES};

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub world: WorldSection,
    pub logging: LoggingSection,
    #[serde(default)]
    pub gameplay: GameplaySection,
    #[serde(default)]
    pub anticheat: AnticheatSection,
    #[serde(default)]
    pub permissions: PermissionsSection,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    pub name: String,
    /// Milliseconds between game ticks. Default: 50.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_tick_rate_ms() -> u64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct WorldSection {
    /// `flat` or `hills`.
    pub generator: String,
    pub seed: u64,
    /// Surface depth of the generated terrain (z grows downward).
    #[serde(default = "default_ground_z")]
    pub ground_z: i32,
}

fn default_ground_z() -> i32 {
    32
}

#[derive(Debug, Deserialize)]
pub struct GameplaySection {
    #[serde(default)]
    pub grenade_self_damage: bool,
    /// Block allowance granted on spawn.
    #[serde(default = "default_max_blocks")]
    pub max_blocks: u32,
}

fn default_max_blocks() -> u32 {
    voxbrawl_game::player::DEFAULT_BLOCKS
}

impl Default for GameplaySection {
    fn default() -> Self {
        Self {
            grenade_self_damage: false,
            max_blocks: default_max_blocks(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnticheatSection {
    #[serde(default = "default_true")]
    pub rapid_hack_detect: bool,
    #[serde(default = "default_rapid_window_entries")]
    pub rapid_window_entries: usize,
    #[serde(default = "default_rapid_window_secs")]
    pub rapid_window_secs: f64,
    #[serde(default = "default_max_build_distance")]
    pub max_build_distance: f32,
}

fn default_true() -> bool {
    true
}

fn default_rapid_window_entries() -> usize {
    RAPID_WINDOW_ENTRIES
}

fn default_rapid_window_secs() -> f64 {
    RAPID_WINDOW.as_secs_f64()
}

fn default_max_build_distance() -> f32 {
    MAX_BUILD_DISTANCE
}

impl AnticheatSection {
    /// The rapid-hack window, falling back to the default for negative or
    /// non-finite values.
    pub fn rapid_window(&self) -> Duration {
        Duration::try_from_secs_f64(self.rapid_window_secs).unwrap_or(RAPID_WINDOW)
    }
}

impl Default for AnticheatSection {
    fn default() -> Self {
        Self {
            rapid_hack_detect: true,
            rapid_window_entries: default_rapid_window_entries(),
            rapid_window_secs: default_rapid_window_secs(),
            max_build_distance: default_max_build_distance(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    pub level: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PermissionsSection {
    /// Names of players who join as admins.
    #[serde(default)]
    pub admins: Vec<String>,
    #[serde(default)]
    pub groups: Vec<GroupSection>,
}

/// Named set of rights granted to the listed members.
#[derive(Debug, Deserialize)]
pub struct GroupSection {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub rights: Vec<String>,
}

impl ServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config() {
        let toml_str = r#"
            [server]
            name = "Test Server"

            [world]
            generator = "flat"
            seed = 12345

            [logging]
            level = "debug"
        "#;
        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.name, "Test Server");
        assert_eq!(config.server.tick_rate_ms, 50); // default
        assert_eq!(config.world.generator, "flat");
        assert_eq!(config.world.seed, 12345);
        assert_eq!(config.world.ground_z, 32); // default
        assert_eq!(config.logging.level, "debug");
        // gameplay section defaults when absent
        assert!(!config.gameplay.grenade_self_damage);
        assert_eq!(config.gameplay.max_blocks, 50);
        // anticheat section defaults when absent
        assert!(config.anticheat.rapid_hack_detect);
        assert_eq!(config.anticheat.rapid_window_entries, 10);
        assert_eq!(config.anticheat.rapid_window(), Duration::from_secs(1));
        assert_eq!(config.anticheat.max_build_distance, 6.0);
        // permissions section defaults when absent
        assert!(config.permissions.admins.is_empty());
        assert!(config.permissions.groups.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
            [server]
            name = "Test"
            tick_rate_ms = 100

            [world]
            generator = "hills"
            seed = 7
            ground_z = 40

            [gameplay]
            grenade_self_damage = true
            max_blocks = 30

            [anticheat]
            rapid_hack_detect = false
            rapid_window_entries = 4
            rapid_window_secs = 0.5

            [logging]
            level = "info"

            [permissions]
            admins = ["alice"]

            [[permissions.groups]]
            name = "moderator"
            members = ["bob", "carol"]
            rights = ["move_others", "teleport_other"]
        "#;
        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.tick_rate_ms, 100);
        assert_eq!(config.world.ground_z, 40);
        assert!(config.gameplay.grenade_self_damage);
        assert_eq!(config.gameplay.max_blocks, 30);
        assert!(!config.anticheat.rapid_hack_detect);
        assert_eq!(config.anticheat.rapid_window(), Duration::from_millis(500));
        assert_eq!(config.anticheat.max_build_distance, 6.0);
        assert_eq!(config.permissions.admins, vec!["alice"]);
        assert_eq!(config.permissions.groups.len(), 1);
        assert_eq!(config.permissions.groups[0].members.len(), 2);
    }

    #[test]
    fn bad_window_falls_back() {
        let section = AnticheatSection {
            rapid_window_secs: -1.0,
            ..AnticheatSection::default()
        };
        assert_eq!(section.rapid_window(), RAPID_WINDOW);
    }
}
