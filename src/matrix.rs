use std::{
    collections::BTreeMap,
    fmt,
    path::{Component, Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::pixel::Pixel;

/// Sizes packed into a Windows `.ico`, capped by the target's size.
pub const ICO_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    Macos,
    Web,
    Windows,
    Linux,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Macos => "macos",
            Platform::Web => "web",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
        })
    }
}

/// How the pixels of an icon are produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fill {
    /// Flat RGB color, written through the truecolor encoder path.
    Solid {
        #[serde(default = "brand")]
        color: Pixel,
    },
    /// Flat color with a border and centered bitmap text.
    Badge {
        #[serde(default = "brand")]
        color: Pixel,
        #[serde(default = "white")]
        border: Pixel,
        #[serde(default = "badge_text")]
        text: String,
    },
    /// The source logo scaled into the padded content box and centered.
    /// No background means a transparent canvas.
    Logo {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        background: Option<Pixel>,
    },
}

fn brand() -> Pixel {
    Pixel::BRAND
}

fn white() -> Pixel {
    Pixel::WHITE
}

fn badge_text() -> String {
    "R".to_owned()
}

impl Default for Fill {
    fn default() -> Self {
        Fill::Solid { color: brand() }
    }
}

impl Fill {
    pub fn needs_logo(&self) -> bool {
        matches!(self, Fill::Logo { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FillKind {
    Solid,
    Badge,
    Logo,
}

/// Command-line adjustments layered on top of a matrix's default fill.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FillOverrides {
    #[clap(long = "fill", value_enum)]
    pub kind: Option<FillKind>,
    /// Fill color for solid and badge icons
    #[clap(long)]
    pub color: Option<Pixel>,
    /// Canvas color behind the logo
    #[clap(long, conflicts_with = "transparent")]
    pub background: Option<Pixel>,
    /// Leave the canvas behind the logo transparent
    #[clap(long)]
    pub transparent: bool,
    /// Badge text
    #[clap(long)]
    pub text: Option<String>,
}

impl FillOverrides {
    /// Switches `base` to the requested kind, keeping it when the kind
    /// already matches, then applies the individual overrides.
    pub fn apply(&self, base: Fill) -> Fill {
        let fill = match (self.kind, base) {
            (None, base) => base,
            (Some(FillKind::Solid), base @ Fill::Solid { .. }) => base,
            (Some(FillKind::Badge), base @ Fill::Badge { .. }) => base,
            (Some(FillKind::Logo), base @ Fill::Logo { .. }) => base,
            (Some(FillKind::Solid), _) => Fill::default(),
            (Some(FillKind::Badge), _) => Fill::Badge {
                color: brand(),
                border: white(),
                text: badge_text(),
            },
            (Some(FillKind::Logo), _) => Fill::Logo {
                background: Some(brand()),
            },
        };
        match fill {
            Fill::Solid { color } => Fill::Solid {
                color: self.color.unwrap_or(color),
            },
            Fill::Badge {
                color,
                border,
                text,
            } => Fill::Badge {
                color: self.color.unwrap_or(color),
                border,
                text: self.text.clone().unwrap_or(text),
            },
            Fill::Logo { .. } if self.transparent => Fill::Logo { background: None },
            Fill::Logo { background } => Fill::Logo {
                background: self.background.or(background),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Png,
    Ico,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconTarget {
    /// Output path relative to the output root.
    pub path: PathBuf,
    pub size: u32,
    /// Overrides the matrix-wide fill for this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
}

impl IconTarget {
    pub fn new(path: impl Into<PathBuf>, size: u32) -> Self {
        Self {
            path: path.into(),
            size,
            fill: None,
        }
    }

    pub fn format(&self) -> Format {
        match self.path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ico") => Format::Ico,
            _ => Format::Png,
        }
    }

    /// Pixel sizes rendered for this target: one for PNG, the ladder for ICO.
    pub fn sizes(&self) -> Vec<u32> {
        match self.format() {
            Format::Png => vec![self.size],
            Format::Ico => {
                let sizes: Vec<_> = ICO_SIZES.into_iter().filter(|&s| s <= self.size).collect();
                if sizes.is_empty() {
                    vec![self.size]
                } else {
                    sizes
                }
            }
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.size == 0 {
            anyhow::bail!("{}: size must be positive", self.path.display());
        }
        if self.format() == Format::Ico && self.size > 256 {
            anyhow::bail!("{}: ico images are at most 256 px", self.path.display());
        }
        let escapes = self
            .path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || self.path.as_os_str().is_empty() {
            anyhow::bail!(
                "{}: path must be relative and stay inside the output root",
                self.path.display()
            );
        }
        Ok(())
    }
}

/// A target with its effective fill resolved.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedTarget<'a> {
    pub platform: Platform,
    pub target: &'a IconTarget,
    pub fill: &'a Fill,
}

/// Platform to icon list table consumed by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconMatrix {
    #[serde(default)]
    pub fill: Fill,
    pub platforms: BTreeMap<Platform, Vec<IconTarget>>,
}

const STANDARD: &[(Platform, &[(&str, u32)])] = &[
    (
        Platform::Android,
        &[
            ("android/app/src/main/res/mipmap-mdpi/ic_launcher.png", 48),
            ("android/app/src/main/res/mipmap-hdpi/ic_launcher.png", 72),
            ("android/app/src/main/res/mipmap-xhdpi/ic_launcher.png", 96),
            ("android/app/src/main/res/mipmap-xxhdpi/ic_launcher.png", 144),
            ("android/app/src/main/res/mipmap-xxxhdpi/ic_launcher.png", 192),
        ],
    ),
    (
        Platform::Ios,
        &[
            ("ios/Runner/Assets.xcassets/AppIcon.appiconset/icon-20.png", 20),
            ("ios/Runner/Assets.xcassets/AppIcon.appiconset/icon-29.png", 29),
            ("ios/Runner/Assets.xcassets/AppIcon.appiconset/icon-40.png", 40),
            ("ios/Runner/Assets.xcassets/AppIcon.appiconset/icon-60.png", 60),
            ("ios/Runner/Assets.xcassets/AppIcon.appiconset/icon-76.png", 76),
            ("ios/Runner/Assets.xcassets/AppIcon.appiconset/icon-120.png", 120),
            ("ios/Runner/Assets.xcassets/AppIcon.appiconset/icon-180.png", 180),
            ("ios/Runner/Assets.xcassets/AppIcon.appiconset/icon-1024.png", 1024),
        ],
    ),
    (
        Platform::Macos,
        &[
            ("macos/Runner/Assets.xcassets/AppIcon.appiconset/icon_16x16.png", 16),
            ("macos/Runner/Assets.xcassets/AppIcon.appiconset/icon_32x32.png", 32),
            ("macos/Runner/Assets.xcassets/AppIcon.appiconset/icon_128x128.png", 128),
            ("macos/Runner/Assets.xcassets/AppIcon.appiconset/icon_256x256.png", 256),
            ("macos/Runner/Assets.xcassets/AppIcon.appiconset/icon_512x512.png", 512),
            ("macos/Runner/Assets.xcassets/AppIcon.appiconset/icon_1024x1024.png", 1024),
        ],
    ),
    (
        Platform::Web,
        &[
            ("web/favicon.png", 32),
            ("web/icons/Icon-192.png", 192),
            ("web/icons/Icon-512.png", 512),
            ("web/icons/Icon-maskable-192.png", 192),
            ("web/icons/Icon-maskable-512.png", 512),
        ],
    ),
    (
        Platform::Windows,
        &[
            ("windows/runner/app_icon.png", 256),
            ("windows/runner/app_icon.ico", 256),
        ],
    ),
    (
        Platform::Linux,
        &[
            ("linux/icon_16x16.png", 16),
            ("linux/icon_32x32.png", 32),
            ("linux/icon_48x48.png", 48),
            ("linux/icon_64x64.png", 64),
            ("linux/icon_128x128.png", 128),
            ("linux/icon_256x256.png", 256),
        ],
    ),
];

impl IconMatrix {
    /// The built-in table for every platform, all entries using `fill`.
    pub fn standard(fill: Fill) -> Self {
        let platforms = STANDARD
            .iter()
            .map(|(platform, entries)| {
                let targets = entries
                    .iter()
                    .map(|&(path, size)| IconTarget::new(path, size))
                    .collect();
                (*platform, targets)
            })
            .collect();
        Self { fill, platforms }
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let matrix: Self = serde_json::from_str(json).context("Failed to parse icon manifest")?;
        matrix.validate()?;
        Ok(matrix)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid manifest {}", path.display()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for target in self.platforms.values().flatten() {
            target.validate()?;
        }
        Ok(())
    }

    /// Drops every platform not in `keep`. An empty list keeps everything.
    pub fn retain_platforms(&mut self, keep: &[Platform]) {
        if !keep.is_empty() {
            self.platforms.retain(|platform, _| keep.contains(platform));
        }
    }

    pub fn targets(&self) -> impl Iterator<Item = ResolvedTarget<'_>> {
        self.platforms.iter().flat_map(move |(&platform, targets)| {
            targets.iter().map(move |target| ResolvedTarget {
                platform,
                target,
                fill: target.fill.as_ref().unwrap_or(&self.fill),
            })
        })
    }

    pub fn len(&self) -> usize {
        self.platforms.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn needs_logo(&self) -> bool {
        self.targets().any(|t| t.fill.needs_logo())
    }

    /// Largest pixel size any logo-filled target renders at.
    pub fn largest_logo_size(&self) -> Option<u32> {
        self.targets()
            .filter(|t| t.fill.needs_logo())
            .flat_map(|t| t.target.sizes())
            .max()
    }

    /// One `platform size path` line per target.
    pub fn listing(&self) -> String {
        self.targets()
            .map(|t| format!("{} {} {}", t.platform, t.target.size, t.target.path.display()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
