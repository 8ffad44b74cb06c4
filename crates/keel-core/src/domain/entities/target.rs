//! Target entity: one buildable unit inside a project.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::settings::Settings;
use crate::domain::value_objects::{
    DeploymentTargets, Destination, Destinations, Platform, PlatformCondition, PlatformFilter,
    PlatformFilters, Product,
};

/// A buildable unit. Constructed once from the manifest and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub destinations: Destinations,
    pub product: Product,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub bundle_id: String,
    #[serde(default)]
    pub deployment_targets: DeploymentTargets,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_plist: Option<InfoPlist>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entitlements: Option<Entitlements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(default)]
    pub sources: Vec<SourceFile>,
    #[serde(default)]
    pub resources: Vec<ResourceFileElement>,
    #[serde(default)]
    pub copy_files: Vec<CopyFilesAction>,
    #[serde(default)]
    pub core_data_models: Vec<CoreDataModel>,
    #[serde(default)]
    pub scripts: Vec<TargetScript>,
    #[serde(default)]
    pub dependencies: Vec<TargetDependency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_demand_resources_tags: Option<OnDemandResourcesTags>,
    #[serde(default)]
    pub kind: TargetKind,
    #[serde(default)]
    pub additional_files: Vec<FileElement>,
}

impl Target {
    /// A local target with nothing but the required fields set.
    pub fn new(
        name: impl Into<String>,
        destinations: Destinations,
        product: Product,
        bundle_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            destinations,
            product,
            product_name: None,
            bundle_id: bundle_id.into(),
            deployment_targets: DeploymentTargets::default(),
            info_plist: None,
            entitlements: None,
            settings: None,
            sources: Vec::new(),
            resources: Vec::new(),
            copy_files: Vec::new(),
            core_data_models: Vec::new(),
            scripts: Vec::new(),
            dependencies: Vec::new(),
            on_demand_resources_tags: None,
            kind: TargetKind::Local,
            additional_files: Vec::new(),
        }
    }

    /// Distinct platform families, in platform order.
    pub fn platforms(&self) -> BTreeSet<Platform> {
        self.destinations.iter().map(Destination::platform).collect()
    }

    /// The first platform. Single-platform manifests only ever have one.
    pub fn legacy_platform(&self) -> Option<Platform> {
        self.platforms().into_iter().next()
    }

    pub fn supported_platform_filters(&self) -> PlatformFilters {
        self.destinations
            .iter()
            .map(Destination::platform_filter)
            .collect()
    }

    pub fn supports(&self, platform: Platform) -> bool {
        self.destinations.iter().any(|d| d.platform() == platform)
    }

    /// `product_name` when set, the target name otherwise.
    pub fn canonical_product_name(&self) -> &str {
        self.product_name.as_deref().unwrap_or(&self.name)
    }

    /// `Framework.framework`, `libCore.a`, `App.app`, ...
    pub fn product_name_with_extension(&self) -> String {
        self.product.file_name(self.canonical_product_name())
    }

    pub fn is_remote(&self) -> bool {
        self.kind == TargetKind::Remote
    }

    /// Path of the Info.plist file, when it is a file on disk.
    pub fn info_plist_path(&self) -> Option<&Path> {
        match &self.info_plist {
            Some(InfoPlist::File { path }) => Some(path),
            _ => None,
        }
    }

    /// Path of the entitlements file, when it is a file on disk.
    pub fn entitlements_path(&self) -> Option<&Path> {
        match &self.entitlements {
            Some(Entitlements::File { path }) => Some(path),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    #[default]
    Local,
    /// Sources live outside the project (e.g. a prebuilt package target).
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InfoPlist {
    File { path: PathBuf },
    Generated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Entitlements {
    File { path: PathBuf },
    /// A build-setting reference such as `$(CODE_SIGN_ENTITLEMENTS)`.
    Variable { value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeGen {
    Public,
    Private,
    Project,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_gen: Option<CodeGen>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            code_gen: None,
        }
    }
}

/// A file or folder reference declared on a project, workspace or target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FileElement {
    File { path: PathBuf },
    FolderReference { path: PathBuf },
}

impl FileElement {
    pub fn path(&self) -> &Path {
        match self {
            Self::File { path } | Self::FolderReference { path } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ResourceFileElement {
    File {
        path: PathBuf,
        #[serde(default)]
        tags: Vec<String>,
    },
    FolderReference {
        path: PathBuf,
        #[serde(default)]
        tags: Vec<String>,
    },
}

impl ResourceFileElement {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File {
            path: path.into(),
            tags: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::File { path, .. } | Self::FolderReference { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyFilesAction {
    pub name: String,
    #[serde(default)]
    pub files: Vec<FileElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreDataModel {
    pub path: PathBuf,
    #[serde(default)]
    pub versions: Vec<PathBuf>,
    pub current_version: String,
    /// The manifest named `current_version` itself instead of leaving it to
    /// be inferred from the model bundle.
    #[serde(default)]
    pub current_version_declared: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetScript {
    pub name: String,
    #[serde(default)]
    pub script: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnDemandResourcesTags {
    pub initial_install: Vec<String>,
    pub prefetch_order: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdkStatus {
    #[default]
    Required,
    Optional,
}

/// A dependency as declared in the manifest, before graph resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TargetDependency {
    Target {
        name: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "PlatformCondition::deserialize_optional"
        )]
        condition: Option<PlatformCondition>,
    },
    Project {
        target: String,
        path: PathBuf,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "PlatformCondition::deserialize_optional"
        )]
        condition: Option<PlatformCondition>,
    },
    Framework {
        path: PathBuf,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "PlatformCondition::deserialize_optional"
        )]
        condition: Option<PlatformCondition>,
    },
    Library {
        path: PathBuf,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "PlatformCondition::deserialize_optional"
        )]
        condition: Option<PlatformCondition>,
    },
    Xcframework {
        path: PathBuf,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "PlatformCondition::deserialize_optional"
        )]
        condition: Option<PlatformCondition>,
    },
    Sdk {
        name: String,
        #[serde(default)]
        status: SdkStatus,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "PlatformCondition::deserialize_optional"
        )]
        condition: Option<PlatformCondition>,
    },
    Package {
        product: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "PlatformCondition::deserialize_optional"
        )]
        condition: Option<PlatformCondition>,
    },
}

impl TargetDependency {
    pub fn target(name: impl Into<String>) -> Self {
        Self::Target {
            name: name.into(),
            condition: None,
        }
    }

    pub fn sdk(name: impl Into<String>, status: SdkStatus) -> Self {
        Self::Sdk {
            name: name.into(),
            status,
            condition: None,
        }
    }

    /// Word naming the dependency kind in diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Target { .. } => "target",
            Self::Project { .. } => "project",
            Self::Framework { .. } => "framework",
            Self::Library { .. } => "library",
            Self::Xcframework { .. } => "xcframework",
            Self::Sdk { .. } => "sdk",
            Self::Package { .. } => "package",
        }
    }

    /// The string that identifies the dependency within its kind.
    pub fn name(&self) -> String {
        match self {
            Self::Target { name, .. } | Self::Sdk { name, .. } => name.clone(),
            Self::Project { target, .. } => target.clone(),
            Self::Package { product, .. } => product.clone(),
            Self::Framework { path, .. }
            | Self::Library { path, .. }
            | Self::Xcframework { path, .. } => path.display().to_string(),
        }
    }

    pub fn condition(&self) -> Option<&PlatformCondition> {
        match self {
            Self::Target { condition, .. }
            | Self::Project { condition, .. }
            | Self::Framework { condition, .. }
            | Self::Library { condition, .. }
            | Self::Xcframework { condition, .. }
            | Self::Sdk { condition, .. }
            | Self::Package { condition, .. } => condition.as_ref(),
        }
    }

    pub fn applies_to(&self, filter: PlatformFilter) -> bool {
        self.condition().is_none_or(|c| c.contains(filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Destination;

    fn target(destinations: Destinations, product: Product) -> Target {
        Target::new("Core", destinations, product, "dev.keel.core")
    }

    #[test]
    fn platforms_collapse_ipad_designed_destinations() {
        let t = target(
            [Destination::IPhone, Destination::MacWithIPadDesign]
                .into_iter()
                .collect(),
            Product::App,
        );
        assert_eq!(t.platforms().len(), 1);
        assert_eq!(t.legacy_platform(), Some(Platform::IOS));
        assert!(t.supports(Platform::IOS));
        assert!(!t.supports(Platform::MacOS));
    }

    #[test]
    fn product_name_defaults_to_target_name() {
        let mut t = target(Destination::ios(), Product::StaticLibrary);
        assert_eq!(t.product_name_with_extension(), "libCore.a");
        t.product_name = Some("CoreKit".into());
        assert_eq!(t.product_name_with_extension(), "libCoreKit.a");
    }

    #[test]
    fn dependency_kind_and_name() {
        let dep = TargetDependency::sdk("libc++.tbd", SdkStatus::Optional);
        assert_eq!(dep.kind(), "sdk");
        assert_eq!(dep.name(), "libc++.tbd");
        assert!(dep.applies_to(PlatformFilter::Macos));
    }

    #[test]
    fn conditioned_dependency_applies_only_to_its_filters() {
        let dep = TargetDependency::Target {
            name: "Shared".into(),
            condition: PlatformCondition::when([PlatformFilter::Ios]),
        };
        assert!(dep.applies_to(PlatformFilter::Ios));
        assert!(!dep.applies_to(PlatformFilter::Macos));
    }

    #[test]
    fn empty_declared_condition_applies_everywhere() {
        let dep: TargetDependency =
            serde_json::from_str(r#"{ "type": "target", "name": "Shared", "condition": [] }"#)
                .unwrap();
        assert_eq!(dep, TargetDependency::target("Shared"));
        assert!(dep.applies_to(PlatformFilter::Macos));
    }
}
