//! Contains everything related to configuration.
//!
//! All default values for configurable aspects of the editor are defined in this
//! module, including *settings*, *theme colors*, and *token colors*.
//!
//! At a minimum, [`Configuration::default()`] is sufficient for initializing the
//! editor. However, the normal process is to overlay an optional configuration file
//! whose values replace the corresponding defaults.
//!
//! External configuration files are expected to be formatted according to the
//! [TOML specification](https://toml.io).
//!
//! The default method of loading an external configuration file via
//! [`Configuration::load()`] will try to locate files in the following locations in
//! order of precedence:
//!
//! * `./.vitrine/config.toml`
//! * `$HOME/.vitrine/config.toml`
//! * `$HOME/.config/vitrine/config.toml`

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::sys::{self, AsString};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A configuration representing all aspects of the editing experience.
#[derive(Clone, Debug)]
pub struct Configuration {
    pub settings: Settings,
    pub theme: Theme,

    /// A map of highlight classes to colors.
    pub tokens: IndexMap<String, Rgb>,

    /// The file from which the configuration was loaded, if any.
    source: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Preferred width of the editing surface in columns.
    pub width: u32,

    /// Preferred height of the editing surface in rows.
    pub height: u32,

    /// Upper bound on the number of frames drawn per second.
    pub fps: u32,

    /// Number of columns occupied by a tab character when drawn.
    pub tab_width: usize,

    /// Font size for hosts that render with fonts, adjusted by zooming.
    pub font_size: u32,

    pub font_family: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub background_primary: Rgb,
    pub background_secondary: Rgb,
    pub text_plain: Rgb,
    pub text_primary: Rgb,
    pub text_dim: Rgb,
}

#[derive(Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
struct ExternalConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<ExternalSettings>,

    #[serde(skip_serializing_if = "Option::is_none")]
    theme: Option<ExternalTheme>,

    #[serde(skip_serializing_if = "Option::is_none")]
    tokens: Option<IndexMap<String, Rgb>>,
}

#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct ExternalSettings {
    width: Option<u32>,
    height: Option<u32>,
    fps: Option<u32>,
    tab_width: Option<usize>,
    font_size: Option<u32>,
    font_family: Option<String>,
}

#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct ExternalTheme {
    background_primary: Option<Rgb>,
    background_secondary: Option<Rgb>,
    text_plain: Option<Rgb>,
    text_primary: Option<Rgb>,
    text_dim: Option<Rgb>,
}

impl Settings {
    pub const MIN_FONT_SIZE: u32 = 8;
    pub const MAX_FONT_SIZE: u32 = 72;

    /// Adjusts the font size by `delta`, keeping it within
    /// [`MIN_FONT_SIZE`](Self::MIN_FONT_SIZE) and
    /// [`MAX_FONT_SIZE`](Self::MAX_FONT_SIZE), and returns the new size.
    pub fn zoom(&mut self, delta: i32) -> u32 {
        self.font_size = self
            .font_size
            .saturating_add_signed(delta)
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);
        self.font_size
    }

    /// Returns the number of milliseconds between frames.
    pub fn frame_millis(&self) -> u64 {
        1000 / self.fps.max(1) as u64
    }

    fn apply(&mut self, ext: Option<ExternalSettings>) {
        if let Some(ext) = ext {
            self.width = ext.width.unwrap_or(self.width);
            self.height = ext.height.unwrap_or(self.height);
            self.fps = ext.fps.unwrap_or(self.fps);
            self.tab_width = ext.tab_width.unwrap_or(self.tab_width);
            self.font_size = ext.font_size.unwrap_or(self.font_size);
            self.font_family = ext.font_family.unwrap_or_else(|| self.font_family.clone());
        }
    }

    fn to_external(&self) -> ExternalSettings {
        ExternalSettings {
            width: Some(self.width),
            height: Some(self.height),
            fps: Some(self.fps),
            tab_width: Some(self.tab_width),
            font_size: Some(self.font_size),
            font_family: Some(self.font_family.clone()),
        }
    }
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            width: 640,
            height: 480,
            fps: 30,
            tab_width: 2,
            font_size: 16,
            font_family: "monospace".to_string(),
        }
    }
}

impl Theme {
    const BACKGROUND_PRIMARY: Rgb = Rgb::new(0x14, 0x14, 0x14);
    const BACKGROUND_SECONDARY: Rgb = Rgb::new(0x63, 0x5f, 0x5f);
    const TEXT_PLAIN: Rgb = Rgb::new(0xc9, 0xc9, 0xc9);
    const TEXT_PRIMARY: Rgb = Rgb::new(0x9e, 0xdf, 0x9c);
    const TEXT_DIM: Rgb = Rgb::new(0x80, 0x80, 0x80);

    fn apply(&mut self, ext: Option<ExternalTheme>) {
        if let Some(ext) = ext {
            self.background_primary = ext.background_primary.unwrap_or(self.background_primary);
            self.background_secondary =
                ext.background_secondary.unwrap_or(self.background_secondary);
            self.text_plain = ext.text_plain.unwrap_or(self.text_plain);
            self.text_primary = ext.text_primary.unwrap_or(self.text_primary);
            self.text_dim = ext.text_dim.unwrap_or(self.text_dim);
        }
    }

    fn to_external(&self) -> ExternalTheme {
        ExternalTheme {
            background_primary: Some(self.background_primary),
            background_secondary: Some(self.background_secondary),
            text_plain: Some(self.text_plain),
            text_primary: Some(self.text_primary),
            text_dim: Some(self.text_dim),
        }
    }
}

impl Default for Theme {
    fn default() -> Theme {
        Theme {
            background_primary: Self::BACKGROUND_PRIMARY,
            background_secondary: Self::BACKGROUND_SECONDARY,
            text_plain: Self::TEXT_PLAIN,
            text_primary: Self::TEXT_PRIMARY,
            text_dim: Self::TEXT_DIM,
        }
    }
}

impl Configuration {
    /// A collection of configuration files to try loading in order of precedence,
    /// each paired with a flag indicating whether it is relative to the home
    /// directory rather than the working directory.
    const TRY_FILES: [(&str, bool); 3] = [
        (".vitrine/config.toml", false),
        (".vitrine/config.toml", true),
        (".config/vitrine/config.toml", true),
    ];

    /// The file to which a configuration not loaded from a file is stored.
    const DEFAULT_FILE: &str = ".vitrine/config.toml";

    /// Returns a configuration that is formed by attempting to load a configuration
    /// file from well-known locations.
    pub fn load() -> Result<Configuration> {
        for (try_path, in_home) in Self::TRY_FILES {
            let root_path = if in_home {
                sys::home_dir()
            } else {
                sys::working_dir()
            };
            let path = root_path.join(try_path);
            if path.exists() {
                return Self::load_file(&path);
            }
        }
        info!("no configuration file found, using defaults");
        Ok(Configuration::default())
    }

    /// Returns a configuration loaded from the file at `path`.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Configuration> {
        let path = path.as_ref();
        let mut config = Configuration::default();
        config.apply(Self::read_file(path)?);
        config.source = Some(path.to_path_buf());
        info!(path = %path.as_string(), "configuration loaded");
        Ok(config)
    }

    /// Returns the file from which the configuration was loaded, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Returns the color associated with the highlight `class`, or the plain text
    /// color if `class` is unknown.
    pub fn token_color(&self, class: &str) -> Rgb {
        self.tokens
            .get(class)
            .copied()
            .unwrap_or(self.theme.text_plain)
    }

    /// Writes the configuration to the file from which it was loaded, or to
    /// `./.vitrine/config.toml` if it was not loaded from a file. The latter becomes
    /// the source of the configuration thereafter.
    pub fn store(&mut self) -> Result<()> {
        let path = match self.source {
            Some(ref path) => path.clone(),
            None => sys::working_dir().join(Self::DEFAULT_FILE),
        };
        self.store_file(&path)?;
        self.source = Some(path);
        Ok(())
    }

    fn store_file(&self, path: &Path) -> Result<()> {
        let ext = ExternalConfiguration {
            settings: Some(self.settings.to_external()),
            theme: Some(self.theme.to_external()),
            tokens: Some(self.tokens.clone()),
        };
        let content = toml::to_string_pretty(&ext)
            .map_err(|e| Error::configuration_output(&path.as_string(), &e))?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| Error::io(&dir.as_string(), e))?;
        }
        fs::write(path, content).map_err(|e| Error::io(&path.as_string(), e))?;
        info!(path = %path.as_string(), "configuration stored");
        Ok(())
    }

    fn apply(&mut self, ext: ExternalConfiguration) {
        self.settings.apply(ext.settings);
        self.theme.apply(ext.theme);
        if let Some(tokens) = ext.tokens {
            self.tokens.extend(tokens);
        }
    }

    fn read_file(path: &Path) -> Result<ExternalConfiguration> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(&path.as_string(), e))?;
        toml::from_str::<ExternalConfiguration>(&content)
            .map_err(|e| Error::configuration(&path.as_string(), &e))
    }

    fn init_tokens() -> IndexMap<String, Rgb> {
        Self::DEFAULT_TOKENS
            .iter()
            .map(|(class, rgb)| (class.to_string(), *rgb))
            .collect()
    }

    const DEFAULT_TOKENS: [(&'static str, Rgb); 20] = [
        ("comment", Rgb::new(0x5c, 0x63, 0x70)),
        ("doc", Rgb::new(0xc6, 0x78, 0xdd)),
        ("keyword", Rgb::new(0xc6, 0x78, 0xdd)),
        ("tag", Rgb::new(0xe0, 0x6c, 0x75)),
        ("selector", Rgb::new(0xe0, 0x6c, 0x75)),
        ("literal", Rgb::new(0x56, 0xb6, 0xc2)),
        ("string", Rgb::new(0x98, 0xc3, 0x79)),
        ("regexp", Rgb::new(0x98, 0xc3, 0x79)),
        ("attr", Rgb::new(0xd1, 0x9a, 0x66)),
        ("variable", Rgb::new(0xd1, 0x9a, 0x66)),
        ("type", Rgb::new(0xd1, 0x9a, 0x66)),
        ("number", Rgb::new(0xd1, 0x9a, 0x66)),
        ("symbol", Rgb::new(0x61, 0xae, 0xee)),
        ("bullet", Rgb::new(0x61, 0xae, 0xee)),
        ("link", Rgb::new(0x61, 0xae, 0xee)),
        ("meta", Rgb::new(0x61, 0xae, 0xee)),
        ("title", Rgb::new(0x61, 0xae, 0xee)),
        ("function", Rgb::new(0x61, 0xae, 0xee)),
        ("builtin", Rgb::new(0xe5, 0xc0, 0x7b)),
        ("section", Rgb::new(0xe0, 0x6c, 0x75)),
    ];
}

impl Default for Configuration {
    fn default() -> Configuration {
        Configuration {
            settings: Settings::default(),
            theme: Theme::default(),
            tokens: Self::init_tokens(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn zoom_is_bounded() {
        let mut settings = Settings::default();
        assert_eq!(settings.zoom(2), 18);
        assert_eq!(settings.zoom(-100), Settings::MIN_FONT_SIZE);
        assert_eq!(settings.zoom(1000), Settings::MAX_FONT_SIZE);
    }

    #[test]
    fn frame_millis_from_fps() {
        let mut settings = Settings::default();
        assert_eq!(settings.frame_millis(), 33);
        settings.fps = 0;
        assert_eq!(settings.frame_millis(), 1000);
    }

    #[test]
    fn load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r##"
[settings]
fps = 60
tab-width = 4

[theme]
text-plain = "#ffffff"

[tokens]
keyword = "#010203"
custom = "#aabbcc"
"##,
        )
        .unwrap();

        let config = Configuration::load_file(&path).unwrap();
        assert_eq!(config.settings.fps, 60);
        assert_eq!(config.settings.tab_width, 4);
        assert_eq!(config.settings.font_size, 16);
        assert_eq!(config.theme.text_plain, Rgb::WHITE);
        assert_eq!(config.theme.text_dim, Theme::TEXT_DIM);
        assert_eq!(config.token_color("keyword"), Rgb::new(1, 2, 3));
        assert_eq!(config.token_color("custom"), Rgb::new(0xaa, 0xbb, 0xcc));
        assert_eq!(config.token_color("string"), Rgb::new(0x98, 0xc3, 0x79));
        assert_eq!(config.token_color("unknown"), Rgb::WHITE);
        assert_eq!(config.source(), Some(path.as_path()));
    }

    #[test]
    fn load_rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[settings]\nspeed = 3\n").unwrap();
        assert!(matches!(
            Configuration::load_file(&path),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn load_rejects_invalid_color() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[theme]\ntext-dim = \"#12\"\n").unwrap();
        assert!(matches!(
            Configuration::load_file(&path),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let e = Configuration::load_file(dir.path().join("nope.toml")).unwrap_err();
        assert!(e.is_not_found());
    }

    #[test]
    fn store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[settings]\nfont-size = 20\n").unwrap();

        let mut config = Configuration::load_file(&path).unwrap();
        config.settings.zoom(-2);
        config.store().unwrap();

        let config = Configuration::load_file(&path).unwrap();
        assert_eq!(config.settings.font_size, 18);
        assert_eq!(config.settings, Settings {
            font_size: 18,
            ..Settings::default()
        });
        assert_eq!(config.theme, Theme::default());
        assert_eq!(config.tokens, Configuration::default().tokens);
    }
}
