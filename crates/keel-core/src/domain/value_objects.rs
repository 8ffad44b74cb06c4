//! Domain value objects: Platform, Destination, PlatformFilter, Product,
//! Version, DeploymentTargets, CompatibleXcodeVersions, BuildConfiguration.
//!
//! # Design
//!
//! These are pure value types: equality-by-value, no identity. Linking
//! rules between products live in `links.rs`; this file defines the types,
//! their string representations, and their `FromStr` parsers.
//!
//! Every enum derives `Ord` so it can key the `BTreeMap`/`BTreeSet`
//! collections that give lint output a stable order.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ── Platform ─────────────────────────────────────────────────────────────────

/// An Apple platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "iOS")]
    IOS,
    #[serde(rename = "macOS")]
    MacOS,
    #[serde(rename = "tvOS")]
    TvOS,
    #[serde(rename = "watchOS")]
    WatchOS,
    #[serde(rename = "visionOS")]
    VisionOS,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Self::IOS,
        Self::MacOS,
        Self::TvOS,
        Self::WatchOS,
        Self::VisionOS,
    ];

    /// The canonical spelling used in diagnostics ("iOS", "macOS", ...).
    pub const fn case_value(&self) -> &'static str {
        match self {
            Self::IOS => "iOS",
            Self::MacOS => "macOS",
            Self::TvOS => "tvOS",
            Self::WatchOS => "watchOS",
            Self::VisionOS => "visionOS",
        }
    }

    pub const fn platform_filter(&self) -> PlatformFilter {
        match self {
            Self::IOS => PlatformFilter::Ios,
            Self::MacOS => PlatformFilter::Macos,
            Self::TvOS => PlatformFilter::Tvos,
            Self::WatchOS => PlatformFilter::Watchos,
            Self::VisionOS => PlatformFilter::Visionos,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.case_value())
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::IOS),
            "macos" | "osx" => Ok(Self::MacOS),
            "tvos" => Ok(Self::TvOS),
            "watchos" => Ok(Self::WatchOS),
            "visionos" => Ok(Self::VisionOS),
            other => Err(DomainError::UnknownPlatform(other.to_string())),
        }
    }
}

// ── Destination ──────────────────────────────────────────────────────────────

/// A concrete device surface a target can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Destination {
    #[serde(rename = "iPhone")]
    IPhone,
    #[serde(rename = "iPad")]
    IPad,
    #[serde(rename = "mac")]
    Mac,
    #[serde(rename = "macWithiPadDesign")]
    MacWithIPadDesign,
    #[serde(rename = "macCatalyst")]
    MacCatalyst,
    #[serde(rename = "appleWatch")]
    AppleWatch,
    #[serde(rename = "appleTv")]
    AppleTv,
    #[serde(rename = "appleVision")]
    AppleVision,
    #[serde(rename = "appleVisionWithiPadDesign")]
    AppleVisionWithIPadDesign,
}

/// The destinations of a target.
pub type Destinations = BTreeSet<Destination>;

impl Destination {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IPhone => "iPhone",
            Self::IPad => "iPad",
            Self::Mac => "mac",
            Self::MacWithIPadDesign => "macWithiPadDesign",
            Self::MacCatalyst => "macCatalyst",
            Self::AppleWatch => "appleWatch",
            Self::AppleTv => "appleTv",
            Self::AppleVision => "appleVision",
            Self::AppleVisionWithIPadDesign => "appleVisionWithiPadDesign",
        }
    }

    /// The platform family whose SDK builds this destination.
    ///
    /// Designed-for-iPad destinations run the iOS binary.
    pub const fn platform(&self) -> Platform {
        match self {
            Self::IPhone | Self::IPad | Self::MacWithIPadDesign | Self::AppleVisionWithIPadDesign => {
                Platform::IOS
            }
            Self::Mac | Self::MacCatalyst => Platform::MacOS,
            Self::AppleWatch => Platform::WatchOS,
            Self::AppleTv => Platform::TvOS,
            Self::AppleVision => Platform::VisionOS,
        }
    }

    pub const fn platform_filter(&self) -> PlatformFilter {
        match self {
            Self::IPhone | Self::IPad | Self::MacWithIPadDesign | Self::AppleVisionWithIPadDesign => {
                PlatformFilter::Ios
            }
            Self::Mac => PlatformFilter::Macos,
            Self::MacCatalyst => PlatformFilter::Catalyst,
            Self::AppleWatch => PlatformFilter::Watchos,
            Self::AppleTv => PlatformFilter::Tvos,
            Self::AppleVision => PlatformFilter::Visionos,
        }
    }

    pub fn ios() -> Destinations {
        [Self::IPhone, Self::IPad].into_iter().collect()
    }

    pub fn macos() -> Destinations {
        [Self::Mac].into_iter().collect()
    }

    pub fn tvos() -> Destinations {
        [Self::AppleTv].into_iter().collect()
    }

    pub fn watchos() -> Destinations {
        [Self::AppleWatch].into_iter().collect()
    }

    pub fn visionos() -> Destinations {
        [Self::AppleVision].into_iter().collect()
    }

    /// Default destinations for a single-platform target.
    pub fn for_platform(platform: Platform) -> Destinations {
        match platform {
            Platform::IOS => Self::ios(),
            Platform::MacOS => Self::macos(),
            Platform::TvOS => Self::tvos(),
            Platform::WatchOS => Self::watchos(),
            Platform::VisionOS => Self::visionos(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Destination {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iphone" => Ok(Self::IPhone),
            "ipad" => Ok(Self::IPad),
            "mac" => Ok(Self::Mac),
            "macwithipaddesign" => Ok(Self::MacWithIPadDesign),
            "maccatalyst" => Ok(Self::MacCatalyst),
            "applewatch" => Ok(Self::AppleWatch),
            "appletv" => Ok(Self::AppleTv),
            "applevision" => Ok(Self::AppleVision),
            "applevisionwithipaddesign" => Ok(Self::AppleVisionWithIPadDesign),
            other => Err(DomainError::UnknownDestination(other.to_string())),
        }
    }
}

// ── PlatformFilter ───────────────────────────────────────────────────────────

/// The granularity at which a dependency edge can be conditioned.
///
/// Variants are declared alphabetically so the derived `Ord` matches the
/// sorted order used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFilter {
    Catalyst,
    Driverkit,
    Ios,
    Macos,
    Tvos,
    Visionos,
    Watchos,
}

impl PlatformFilter {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Catalyst => "catalyst",
            Self::Driverkit => "driverkit",
            Self::Ios => "ios",
            Self::Macos => "macos",
            Self::Tvos => "tvos",
            Self::Visionos => "visionos",
            Self::Watchos => "watchos",
        }
    }
}

impl fmt::Display for PlatformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "catalyst" => Ok(Self::Catalyst),
            "driverkit" => Ok(Self::Driverkit),
            "ios" => Ok(Self::Ios),
            "macos" => Ok(Self::Macos),
            "tvos" => Ok(Self::Tvos),
            "visionos" => Ok(Self::Visionos),
            "watchos" => Ok(Self::Watchos),
            other => Err(DomainError::UnknownPlatformFilter(other.to_string())),
        }
    }
}

/// A set of platform filters.
pub type PlatformFilters = BTreeSet<PlatformFilter>;

/// Renders filters sorted and comma-joined: `ios, macos`.
pub fn join_filters(filters: &PlatformFilters) -> String {
    filters
        .iter()
        .map(PlatformFilter::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Platform restriction attached to a dependency edge.
///
/// Always non-empty: an edge without restriction carries no condition at
/// all rather than an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "PlatformFilters", into = "PlatformFilters")]
pub struct PlatformCondition(PlatformFilters);

impl TryFrom<PlatformFilters> for PlatformCondition {
    type Error = DomainError;

    fn try_from(filters: PlatformFilters) -> Result<Self, Self::Error> {
        Self::when(filters).ok_or(DomainError::EmptyPlatformCondition)
    }
}

impl From<PlatformCondition> for PlatformFilters {
    fn from(condition: PlatformCondition) -> Self {
        condition.0
    }
}

impl PlatformCondition {
    /// Returns `None` for an empty filter set.
    pub fn when(filters: impl IntoIterator<Item = PlatformFilter>) -> Option<Self> {
        let filters: PlatformFilters = filters.into_iter().collect();
        if filters.is_empty() {
            None
        } else {
            Some(Self(filters))
        }
    }

    /// Reads an optional condition where an empty list means unrestricted.
    pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Self>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let filters = Option::<PlatformFilters>::deserialize(deserializer)?;
        Ok(filters.and_then(|filters| Self::when(filters)))
    }

    pub fn filters(&self) -> &PlatformFilters {
        &self.0
    }

    pub fn contains(&self, filter: PlatformFilter) -> bool {
        self.0.contains(&filter)
    }
}

// ── Product ──────────────────────────────────────────────────────────────────

/// The kind of build output a target produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Product {
    App,
    StaticLibrary,
    DynamicLibrary,
    Framework,
    StaticFramework,
    UnitTests,
    UiTests,
    Bundle,
    CommandLineTool,
    AppExtension,
    Watch2App,
    Watch2Extension,
    TvTopShelfExtension,
    MessagesExtension,
    StickerPackExtension,
    AppClip,
    Xpc,
    SystemExtension,
    ExtensionKitExtension,
    Macro,
}

impl Product {
    pub const ALL: [Product; 20] = [
        Self::App,
        Self::StaticLibrary,
        Self::DynamicLibrary,
        Self::Framework,
        Self::StaticFramework,
        Self::UnitTests,
        Self::UiTests,
        Self::Bundle,
        Self::CommandLineTool,
        Self::AppExtension,
        Self::Watch2App,
        Self::Watch2Extension,
        Self::TvTopShelfExtension,
        Self::MessagesExtension,
        Self::StickerPackExtension,
        Self::AppClip,
        Self::Xpc,
        Self::SystemExtension,
        Self::ExtensionKitExtension,
        Self::Macro,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::App => "app",
            Self::StaticLibrary => "staticLibrary",
            Self::DynamicLibrary => "dynamicLibrary",
            Self::Framework => "framework",
            Self::StaticFramework => "staticFramework",
            Self::UnitTests => "unitTests",
            Self::UiTests => "uiTests",
            Self::Bundle => "bundle",
            Self::CommandLineTool => "commandLineTool",
            Self::AppExtension => "appExtension",
            Self::Watch2App => "watch2App",
            Self::Watch2Extension => "watch2Extension",
            Self::TvTopShelfExtension => "tvTopShelfExtension",
            Self::MessagesExtension => "messagesExtension",
            Self::StickerPackExtension => "stickerPackExtension",
            Self::AppClip => "appClip",
            Self::Xpc => "xpc",
            Self::SystemExtension => "systemExtension",
            Self::ExtensionKitExtension => "extensionKitExtension",
            Self::Macro => "macro",
        }
    }

    /// Human-readable name used in diagnostics.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::App => "application",
            Self::StaticLibrary => "static library",
            Self::DynamicLibrary => "dynamic library",
            Self::Framework => "dynamic framework",
            Self::StaticFramework => "static framework",
            Self::UnitTests => "unit tests",
            Self::UiTests => "ui tests",
            Self::Bundle => "bundle",
            Self::CommandLineTool => "command line tool",
            Self::AppExtension => "app extension",
            Self::Watch2App => "watch 2 application",
            Self::Watch2Extension => "watch 2 extension",
            Self::TvTopShelfExtension => "tvOS top shelf extension",
            Self::MessagesExtension => "iMessage extension",
            Self::StickerPackExtension => "sticker pack extension",
            Self::AppClip => "appClip",
            Self::Xpc => "xpc",
            Self::SystemExtension => "system extension",
            Self::ExtensionKitExtension => "extensionKit extension",
            Self::Macro => "macro",
        }
    }

    pub const fn is_static(&self) -> bool {
        matches!(self, Self::StaticLibrary | Self::StaticFramework)
    }

    pub const fn is_framework(&self) -> bool {
        matches!(self, Self::Framework | Self::StaticFramework)
    }

    pub const fn is_library(&self) -> bool {
        matches!(self, Self::StaticLibrary | Self::DynamicLibrary)
    }

    pub const fn is_test(&self) -> bool {
        matches!(self, Self::UnitTests | Self::UiTests)
    }

    /// File extension of the built product, without the leading dot.
    ///
    /// Libraries are handled by [`Product::file_name`] because they add a
    /// `lib` prefix as well.
    pub const fn extension(&self) -> Option<&'static str> {
        match self {
            Self::App | Self::AppClip | Self::Watch2App => Some("app"),
            Self::StaticLibrary => Some("a"),
            Self::DynamicLibrary => Some("dylib"),
            Self::Framework | Self::StaticFramework => Some("framework"),
            Self::UnitTests | Self::UiTests => Some("xctest"),
            Self::Bundle => Some("bundle"),
            Self::AppExtension
            | Self::Watch2Extension
            | Self::TvTopShelfExtension
            | Self::MessagesExtension
            | Self::StickerPackExtension
            | Self::ExtensionKitExtension => Some("appex"),
            Self::Xpc => Some("xpc"),
            Self::SystemExtension => Some("systemextension"),
            Self::CommandLineTool | Self::Macro => None,
        }
    }

    /// The on-disk name of a product called `name`: `App.app`, `libCore.a`.
    pub fn file_name(&self, name: &str) -> String {
        match (self.is_library(), self.extension()) {
            (true, Some(ext)) => format!("lib{name}.{ext}"),
            (false, Some(ext)) => format!("{name}.{ext}"),
            (_, None) => name.to_string(),
        }
    }

    /// Platforms this product type can be built for.
    pub const fn valid_platforms(&self) -> &'static [Platform] {
        match self {
            Self::Watch2App | Self::Watch2Extension => &[Platform::WatchOS],
            Self::TvTopShelfExtension => &[Platform::TvOS],
            Self::MessagesExtension | Self::StickerPackExtension | Self::AppClip => {
                &[Platform::IOS]
            }
            Self::Xpc | Self::SystemExtension | Self::CommandLineTool | Self::Macro => {
                &[Platform::MacOS]
            }
            Self::ExtensionKitExtension => &[Platform::IOS, Platform::MacOS],
            _ => &Platform::ALL,
        }
    }

    pub fn supports_platform(&self, platform: Platform) -> bool {
        self.valid_platforms().contains(&platform)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Product {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::UnknownProduct(s.to_string()))
    }
}

// ── Version ──────────────────────────────────────────────────────────────────

/// A `major.minor.patch` toolchain version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = DomainError;

    /// Accepts `15`, `15.2` and `15.2.1`; missing components are zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DomainError::InvalidVersion {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(invalid("expected one to three components"));
        }

        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| invalid("components must be numeric"))?;
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }
}

impl TryFrom<String> for Version {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.to_string()
    }
}

// ── DeploymentTargets ────────────────────────────────────────────────────────

/// Minimum OS versions per platform, as declared in the manifest.
///
/// Versions are kept as raw strings: validating their syntax is a lint
/// concern, not a construction error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentTargets {
    #[serde(rename = "iOS", skip_serializing_if = "Option::is_none")]
    pub ios: Option<String>,
    #[serde(rename = "macOS", skip_serializing_if = "Option::is_none")]
    pub macos: Option<String>,
    #[serde(rename = "tvOS", skip_serializing_if = "Option::is_none")]
    pub tvos: Option<String>,
    #[serde(rename = "watchOS", skip_serializing_if = "Option::is_none")]
    pub watchos: Option<String>,
    #[serde(rename = "visionOS", skip_serializing_if = "Option::is_none")]
    pub visionos: Option<String>,
}

impl DeploymentTargets {
    /// Deployment targets with a single platform configured.
    pub fn only(platform: Platform, version: impl Into<String>) -> Self {
        Self::default().with(platform, version)
    }

    pub fn with(mut self, platform: Platform, version: impl Into<String>) -> Self {
        *self.slot_mut(platform) = Some(version.into());
        self
    }

    pub fn version(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::IOS => self.ios.as_deref(),
            Platform::MacOS => self.macos.as_deref(),
            Platform::TvOS => self.tvos.as_deref(),
            Platform::WatchOS => self.watchos.as_deref(),
            Platform::VisionOS => self.visionos.as_deref(),
        }
    }

    /// Configured `(platform, version)` pairs in platform order.
    pub fn configured_versions(&self) -> Vec<(Platform, &str)> {
        Platform::ALL
            .iter()
            .filter_map(|p| self.version(*p).map(|v| (*p, v)))
            .collect()
    }

    fn slot_mut(&mut self, platform: Platform) -> &mut Option<String> {
        match platform {
            Platform::IOS => &mut self.ios,
            Platform::MacOS => &mut self.macos,
            Platform::TvOS => &mut self.tvos,
            Platform::WatchOS => &mut self.watchos,
            Platform::VisionOS => &mut self.visionos,
        }
    }
}

// ── CompatibleXcodeVersions ──────────────────────────────────────────────────

/// The toolchain versions a project declares itself compatible with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompatibleXcodeVersions {
    #[default]
    All,
    Exact(Version),
    UpToNextMajor(Version),
    UpToNextMinor(Version),
    List(Vec<CompatibleXcodeVersions>),
}

impl CompatibleXcodeVersions {
    pub fn is_compatible(&self, version: &Version) -> bool {
        match self {
            Self::All => true,
            Self::Exact(v) => v == version,
            Self::UpToNextMajor(v) => version >= v && version.major == v.major,
            Self::UpToNextMinor(v) => {
                version >= v && version.major == v.major && version.minor == v.minor
            }
            Self::List(versions) => versions.iter().any(|c| c.is_compatible(version)),
        }
    }
}

impl fmt::Display for CompatibleXcodeVersions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Exact(v) => write!(f, "{v}"),
            Self::UpToNextMajor(v) => write!(f, "{v}..<{}.0.0", v.major.saturating_add(1)),
            Self::UpToNextMinor(v) => {
                write!(f, "{v}..<{}.{}.0", v.major, v.minor.saturating_add(1))
            }
            Self::List(versions) => {
                let rendered: Vec<String> = versions.iter().map(ToString::to_string).collect();
                f.write_str(&rendered.join(" or "))
            }
        }
    }
}

// ── BuildConfiguration ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Debug,
    Release,
}

impl Variant {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }
}

/// A named build configuration such as `Debug (debug)`.
///
/// Ordered by name, then variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildConfiguration {
    pub name: String,
    pub variant: Variant,
}

impl BuildConfiguration {
    pub fn debug(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variant: Variant::Debug,
        }
    }

    pub fn release(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variant: Variant::Release,
        }
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.variant.as_str())
    }
}
