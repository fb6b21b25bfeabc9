use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(PartialEq, Clone, Copy, Serialize, Deserialize, Debug)]
pub enum Theme {
    System,
    Dark,
    Light,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[Theme::System, Theme::Dark, Theme::Light]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::System => "System",
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Settings {
    pub theme: Theme,
    pub font_size: f32,
    pub row_height: f32,
    #[serde(default)]
    pub recent_files: Vec<String>,
    #[serde(default = "default_max_recent")]
    pub max_recent_files: usize,
}

fn default_max_recent() -> usize {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            font_size: 14.0,
            row_height: 24.0,
            recent_files: Vec::new(),
            max_recent_files: 10,
        }
    }
}

impl Settings {
    /// Load from the platform config dir; any failure falls back to
    /// defaults so a corrupt config file never blocks startup.
    pub fn load() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "csvdesk") {
            let config_path = proj_dirs.config_dir().join("config.json");
            if config_path.exists() {
                if let Ok(content) = fs::read_to_string(&config_path) {
                    if let Ok(settings) = serde_json::from_str(&content) {
                        return settings;
                    }
                }
            }
        }
        Self::default()
    }

    pub fn add_recent_file(&mut self, path: &str) {
        push_recent(&mut self.recent_files, path, self.max_recent_files);
        self.save();
    }

    /// Best-effort persist; a read-only config dir is not worth an
    /// error dialog.
    pub fn save(&self) {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "csvdesk") {
            let config_dir = proj_dirs.config_dir();
            if !config_dir.exists() {
                let _ = fs::create_dir_all(config_dir);
            }
            if let Ok(content) = serde_json::to_string_pretty(self) {
                let _ = fs::write(config_dir.join("config.json"), content);
            }
        }
    }
}

/// Most-recently-opened first, no duplicates, capped at `max`.
fn push_recent(list: &mut Vec<String>, path: &str, max: usize) {
    list.retain(|p| p != path);
    list.insert(0, path.to_string());
    list.truncate(max);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_files_dedupe_and_truncate() {
        let mut list = vec!["a.csv".to_string(), "b.csv".into(), "c.csv".into()];

        push_recent(&mut list, "b.csv", 3);
        assert_eq!(list, vec!["b.csv", "a.csv", "c.csv"]);

        push_recent(&mut list, "d.csv", 3);
        assert_eq!(list, vec!["d.csv", "b.csv", "a.csv"]);
    }

    #[test]
    fn settings_round_trip_as_json() {
        let settings = Settings {
            theme: Theme::Dark,
            font_size: 16.0,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.theme, Theme::Dark);
        assert_eq!(back.font_size, 16.0);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let back: Settings =
            serde_json::from_str(r#"{"theme":"Light","font_size":12.0,"row_height":20.0}"#).unwrap();
        assert_eq!(back.theme, Theme::Light);
        assert!(back.recent_files.is_empty());
        assert_eq!(back.max_recent_files, 10);
    }
}
