use super::game::GameConfig;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Settings from `MapQuest Settings.yaml`, overridable through
/// `MAPQUEST__*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub catalog: CatalogPaths,

    /// Configuration used when a game is started without choosing one.
    #[serde(default)]
    pub game: GameConfig,

    #[serde(default)]
    pub debug_mode: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: Utf8PathBuf,
}

/// Locations of the two catalog resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPaths {
    #[serde(default = "default_countries_path")]
    pub countries: Utf8PathBuf,

    #[serde(default = "default_map_list_path")]
    pub map_list: Utf8PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: CatalogPaths::default(),
            game: GameConfig::default(),
            debug_mode: false,
            log_dir: default_log_dir(),
        }
    }
}

impl Default for CatalogPaths {
    fn default() -> Self {
        Self {
            countries: default_countries_path(),
            map_list: default_map_list_path(),
        }
    }
}

fn default_log_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("logs")
}

fn default_countries_path() -> Utf8PathBuf {
    Utf8PathBuf::from("data/countries.json")
}

fn default_map_list_path() -> Utf8PathBuf {
    Utf8PathBuf::from("data/mapList.json")
}
