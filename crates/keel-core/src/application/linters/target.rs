//! Per-target checks.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{instrument, trace};

use crate::application::ports::Filesystem;
use crate::domain::{
    Destination, GenerationOptions, LintingIssue, Platform, Product, SettingValue, Target,
    TargetDependency,
};

static BUNDLE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9.\-]+$").expect("bundle id pattern is valid"));

static BUILD_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[^}]*\}").expect("variable pattern is valid"));

static DEPLOYMENT_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+){0,2}$").expect("version pattern is valid"));

/// Source extensions Xcode can generate code from.
const CODE_GEN_EXTENSIONS: &[&str] = &["intentdefinition", "mlmodel"];

/// Lints a single target in isolation.
///
/// Every check runs regardless of earlier findings, and issues come back in
/// check order. Nothing here is fatal.
pub struct TargetLinter<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> TargetLinter<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    #[instrument(skip_all, fields(target = %target.name))]
    pub fn lint(&self, target: &Target, options: &GenerationOptions) -> Vec<LintingIssue> {
        let mut issues = Vec::new();
        issues.extend(lint_product_name(target));
        issues.extend(lint_bundle_identifier(target));
        issues.extend(lint_product_name_setting(target));
        issues.extend(lint_has_sources(target));
        issues.extend(lint_copied_files(target));
        issues.extend(self.lint_plist_and_entitlements_exist(target));
        issues.extend(lint_library_resources(target, options));
        issues.extend(lint_deployment_target_versions(target));
        issues.extend(lint_deployment_platforms(target));
        issues.extend(lint_product_platforms(target));
        issues.extend(lint_duplicate_dependencies(target));
        issues.extend(self.lint_core_data_models(target));
        issues.extend(lint_code_gen(target));
        issues.extend(lint_on_demand_resources_tags(target));
        trace!(count = issues.len(), "Target linted");
        issues
    }

    fn lint_plist_and_entitlements_exist(&self, target: &Target) -> Vec<LintingIssue> {
        let mut issues = Vec::new();
        if let Some(path) = target.info_plist_path() {
            if !self.fs.exists(path) {
                issues.push(LintingIssue::error(format!(
                    "Info.plist file not found at path {}",
                    path.display()
                )));
            }
        }
        if let Some(path) = target.entitlements_path() {
            if !self.fs.exists(path) {
                issues.push(LintingIssue::error(format!(
                    "Entitlements file not found at path {}",
                    path.display()
                )));
            }
        }
        issues
    }

    fn lint_core_data_models(&self, target: &Target) -> Vec<LintingIssue> {
        let mut issues = Vec::new();
        for model in &target.core_data_models {
            if !self.fs.exists(&model.path) {
                issues.push(LintingIssue::error(format!(
                    "The Core Data model at path {} does not exist",
                    model.path.display()
                )));
                continue;
            }
            let current = model
                .path
                .join(format!("{}.xcdatamodel", model.current_version));
            if !self.fs.exists(&current) {
                issues.push(LintingIssue::error(format!(
                    "The default version of the Core Data model at path {path}, {version}, does not exist. There should be a file at {path}/{version}.xcdatamodel",
                    path = model.path.display(),
                    version = model.current_version,
                )));
            }
        }
        issues
    }
}

fn lint_product_name(target: &Target) -> Option<LintingIssue> {
    let name = target.canonical_product_name();
    let framework = matches!(target.product, Product::Framework | Product::StaticFramework);
    let valid = name.chars().all(|c| {
        c.is_ascii_alphanumeric() || c == '_' || (!framework && (c == '.' || c == '-'))
    });
    if valid {
        return None;
    }
    let allowed = if framework {
        "alphanumeric (A-Z,a-z,0-9), and underscore (_)"
    } else {
        "alphanumeric (A-Z,a-z,0-9), period (.), hyphen (-), and underscore (_)"
    };
    Some(LintingIssue::warning(format!(
        "Invalid product name '{name}'. This string must contain only {allowed} characters."
    )))
}

fn lint_bundle_identifier(target: &Target) -> Option<LintingIssue> {
    let elided = BUILD_VARIABLE.replace_all(&target.bundle_id, "");
    if elided.is_empty() || BUNDLE_ID.is_match(&elided) {
        return None;
    }
    Some(LintingIssue::error(format!(
        "Invalid bundle identifier '{}'. This string must be a uniform type identifier (UTI) that contains only alphanumeric (A-Z,a-z,0-9), hyphen (-), and period (.) characters.",
        target.bundle_id
    )))
}

fn lint_product_name_setting(target: &Target) -> Vec<LintingIssue> {
    let Some(settings) = &target.settings else {
        return Vec::new();
    };
    let values: BTreeSet<&str> = settings
        .values_of("PRODUCT_NAME")
        .filter_map(SettingValue::as_string)
        .collect();

    let mut issues = Vec::new();
    if values.len() > 1 {
        issues.push(LintingIssue::warning(format!(
            "The target '{}' has a PRODUCT_NAME build setting that is different across configurations and might cause unpredictable behaviours.",
            target.name
        )));
    }
    if values.iter().any(|v| v.contains('$')) {
        issues.push(LintingIssue::warning(format!(
            "The target '{}' has a PRODUCT_NAME build setting containing variables that are resolved at build time, and might cause unpredictable behaviours.",
            target.name
        )));
    }
    issues
}

fn lint_has_sources(target: &Target) -> Option<LintingIssue> {
    if target.is_remote()
        || !target.sources.is_empty()
        || !target.dependencies.is_empty()
        || !target.scripts.is_empty()
        || target.product == Product::Bundle
    {
        return None;
    }
    Some(LintingIssue::warning(format!(
        "The target {} doesn't contain source files.",
        target.name
    )))
}

fn lint_copied_files(target: &Target) -> Vec<LintingIssue> {
    let mut issues = Vec::new();
    let resources: Vec<_> = target.resources.iter().map(|r| r.path()).collect();

    if let Some(plist) = target.info_plist_path() {
        if resources.contains(&plist) {
            issues.push(LintingIssue::warning(format!(
                "Info.plist at path {} being copied into the target {} product.",
                plist.display(),
                target.name
            )));
        }
    }

    for path in resources
        .iter()
        .filter(|p| p.extension().is_some_and(|e| e == "entitlements"))
    {
        issues.push(LintingIssue::warning(format!(
            "Entitlements file at path {} being copied into the target {} product.",
            path.display(),
            target.name
        )));
    }
    issues
}

fn lint_library_resources(target: &Target, options: &GenerationOptions) -> Option<LintingIssue> {
    let library = matches!(
        target.product,
        Product::StaticLibrary | Product::DynamicLibrary
    );
    if !options.disable_bundle_accessors || !library || target.resources.is_empty() {
        return None;
    }
    Some(LintingIssue::error(format!(
        "Target {} cannot contain resources. For {} targets to support resources, 'Bundle Accessors' feature should be enabled.",
        target.name,
        target.product.description()
    )))
}

fn lint_deployment_target_versions(target: &Target) -> Vec<LintingIssue> {
    target
        .deployment_targets
        .configured_versions()
        .into_iter()
        .filter(|(_, version)| !DEPLOYMENT_VERSION.is_match(version))
        .map(|_| LintingIssue::error("The version of deployment target is incorrect"))
        .collect()
}

fn lint_deployment_platforms(target: &Target) -> Vec<LintingIssue> {
    let destinations = &target.destinations;
    let ios_configured = target.deployment_targets.version(Platform::IOS).is_some();
    let mut issues = Vec::new();

    for (platform, _) in target.deployment_targets.configured_versions() {
        if platform == Platform::VisionOS {
            let native = destinations.contains(&Destination::AppleVision);
            let designed_for_ipad = destinations.contains(&Destination::AppleVisionWithIPadDesign);
            if native || (designed_for_ipad && ios_configured) {
                continue;
            }
            if designed_for_ipad {
                let listed: Vec<_> = destinations.iter().map(Destination::as_str).collect();
                issues.push(LintingIssue::error(format!(
                    "Found an inconsistency between target destinations `[{}]` and deployment target `visionOS`",
                    listed.join(", ")
                )));
                continue;
            }
        } else if target.supports(platform) {
            continue;
        }
        issues.push(LintingIssue::error(format!(
            "Found deployment platforms ({}) missing corresponding destination",
            platform.case_value()
        )));
    }
    issues
}

fn lint_product_platforms(target: &Target) -> Vec<LintingIssue> {
    target
        .platforms()
        .into_iter()
        .filter(|p| !target.product.supports_platform(*p))
        .map(|platform| {
            LintingIssue::error(format!(
                "'{}' for platform '{platform}' can't have a product type '{}'",
                target.name,
                target.product.description()
            ))
        })
        .collect()
}

fn lint_duplicate_dependencies(target: &Target) -> Vec<LintingIssue> {
    let mut seen: Vec<&TargetDependency> = Vec::new();
    let mut reported: Vec<&TargetDependency> = Vec::new();
    for dependency in &target.dependencies {
        if seen.contains(&dependency) {
            if !reported.contains(&dependency) {
                reported.push(dependency);
            }
        } else {
            seen.push(dependency);
        }
    }
    reported
        .into_iter()
        .map(|d| {
            LintingIssue::warning(format!(
                "Target '{}' has duplicate {} dependency specified: '{}'",
                target.name,
                d.kind(),
                d.name()
            ))
        })
        .collect()
}

fn lint_code_gen(target: &Target) -> Vec<LintingIssue> {
    target
        .sources
        .iter()
        .filter(|s| s.code_gen.is_some())
        .filter(|s| {
            !s.path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| CODE_GEN_EXTENSIONS.contains(&e))
        })
        .map(|s| {
            LintingIssue::warning(format!(
                "Target '{}' has a source file at path {} with unsupported `codeGen` attributes. Only intentdefinition and mlmodel are known to support this.",
                target.name,
                s.path.display()
            ))
        })
        .collect()
}

fn lint_on_demand_resources_tags(target: &Target) -> Vec<LintingIssue> {
    let Some(tags) = &target.on_demand_resources_tags else {
        return Vec::new();
    };
    tags.prefetch_order
        .iter()
        .filter(|tag| tags.initial_install.contains(tag))
        .map(|tag| {
            LintingIssue::warning(format!(
                "Prefetched Order Tag \"{tag}\" is already assigned to Initial Install Tags category for the target {} and will be ignored by Xcode",
                target.name
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::FakeFilesystem;
    use crate::domain::{
        CodeGen, CoreDataModel, DeploymentTargets, Entitlements, InfoPlist, OnDemandResourcesTags,
        ResourceFileElement, Settings, SourceFile,
    };
    use pretty_assertions::assert_eq;

    fn app() -> Target {
        let mut target = Target::new("App", Destination::ios(), Product::App, "dev.keel.app");
        target.sources = vec![SourceFile::new("/app/Sources/App.swift")];
        target
    }

    fn lint(target: &Target) -> Vec<LintingIssue> {
        let fs = FakeFilesystem::everything();
        TargetLinter::new(&fs).lint(target, &GenerationOptions::default())
    }

    fn reasons(issues: &[LintingIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.reason.as_str()).collect()
    }

    #[test]
    fn clean_target_has_no_issues() {
        assert!(lint(&app()).is_empty());
    }

    #[test]
    fn framework_product_names_reject_hyphens() {
        let mut target = app();
        target.product = Product::Framework;
        target.product_name = Some("My-Kit".into());
        assert_eq!(
            lint(&target),
            vec![LintingIssue::warning(
                "Invalid product name 'My-Kit'. This string must contain only alphanumeric (A-Z,a-z,0-9), and underscore (_) characters."
            )]
        );

        target.product = Product::App;
        assert!(lint(&target).is_empty());
    }

    #[test]
    fn bundle_identifier_variables_are_ignored() {
        let mut target = app();
        target.bundle_id = "dev.keel.${PRODUCT_NAME}".into();
        assert!(lint(&target).is_empty());

        target.bundle_id = "dev.keel.app_1".into();
        let issues = lint(&target);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert!(issues[0].reason.starts_with("Invalid bundle identifier 'dev.keel.app_1'"));
    }

    #[test]
    fn product_name_setting_inconsistencies_warn() {
        let mut settings = Settings::default_configurations();
        settings.base.insert("PRODUCT_NAME".into(), "App".into());
        let mut release = crate::domain::Configuration::default();
        release
            .settings
            .insert("PRODUCT_NAME".into(), SettingValue::from("$(TARGET_NAME)"));
        settings.configurations[1].configuration = Some(release);

        let mut target = app();
        target.settings = Some(settings);
        assert_eq!(
            reasons(&lint(&target)),
            vec![
                "The target 'App' has a PRODUCT_NAME build setting that is different across configurations and might cause unpredictable behaviours.",
                "The target 'App' has a PRODUCT_NAME build setting containing variables that are resolved at build time, and might cause unpredictable behaviours.",
            ]
        );
    }

    #[test]
    fn targets_without_sources_warn_unless_exempt() {
        let mut target = app();
        target.sources.clear();
        assert_eq!(
            reasons(&lint(&target)),
            vec!["The target App doesn't contain source files."]
        );

        target.dependencies.push(TargetDependency::target("Core"));
        assert!(lint(&target).is_empty());

        let mut bundle = Target::new(
            "Assets",
            Destination::ios(),
            Product::Bundle,
            "dev.keel.assets",
        );
        assert!(lint(&bundle).is_empty());
        bundle.kind = crate::domain::TargetKind::Remote;
        assert!(lint(&bundle).is_empty());
    }

    #[test]
    fn plist_and_entitlements_copied_as_resources_warn() {
        let mut target = app();
        target.info_plist = Some(InfoPlist::File {
            path: "/app/Info.plist".into(),
        });
        target.resources = vec![
            ResourceFileElement::file("/app/Info.plist"),
            ResourceFileElement::file("/app/App.entitlements"),
        ];
        assert_eq!(
            reasons(&lint(&target)),
            vec![
                "Info.plist at path /app/Info.plist being copied into the target App product.",
                "Entitlements file at path /app/App.entitlements being copied into the target App product.",
            ]
        );
    }

    #[test]
    fn missing_plist_and_entitlements_are_errors() {
        let mut target = app();
        target.info_plist = Some(InfoPlist::File {
            path: "/app/Info.plist".into(),
        });
        target.entitlements = Some(Entitlements::File {
            path: "/app/App.entitlements".into(),
        });
        let fs = FakeFilesystem::empty();
        let issues = TargetLinter::new(&fs).lint(&target, &GenerationOptions::default());
        assert_eq!(
            issues,
            vec![
                LintingIssue::error("Info.plist file not found at path /app/Info.plist"),
                LintingIssue::error("Entitlements file not found at path /app/App.entitlements"),
            ]
        );
    }

    #[test]
    fn library_resources_need_bundle_accessors() {
        let mut target = app();
        target.product = Product::StaticLibrary;
        target.resources = vec![ResourceFileElement::file("/app/image.png")];
        let fs = FakeFilesystem::everything();
        let options = GenerationOptions {
            disable_bundle_accessors: true,
            ..GenerationOptions::default()
        };
        assert_eq!(
            TargetLinter::new(&fs).lint(&target, &options),
            vec![LintingIssue::error(
                "Target App cannot contain resources. For static library targets to support resources, 'Bundle Accessors' feature should be enabled."
            )]
        );
        assert!(lint(&target).is_empty());
    }

    #[test]
    fn malformed_deployment_versions_are_errors() {
        let mut target = app();
        target.deployment_targets = DeploymentTargets::only(Platform::IOS, "13.0.1.4");
        assert_eq!(
            lint(&target),
            vec![LintingIssue::error("The version of deployment target is incorrect")]
        );
    }

    #[test]
    fn deployment_platform_without_destination_is_an_error() {
        let mut target = app();
        target.deployment_targets = DeploymentTargets::only(Platform::IOS, "16.0")
            .with(Platform::MacOS, "13.0");
        assert_eq!(
            lint(&target),
            vec![LintingIssue::error(
                "Found deployment platforms (macOS) missing corresponding destination"
            )]
        );
    }

    #[test]
    fn vision_designed_for_ipad_needs_an_ios_deployment_target() {
        let mut target = app();
        target.destinations = [Destination::IPhone, Destination::AppleVisionWithIPadDesign]
            .into_iter()
            .collect();
        target.deployment_targets = DeploymentTargets::only(Platform::VisionOS, "1.0");
        assert_eq!(
            lint(&target),
            vec![LintingIssue::error(
                "Found an inconsistency between target destinations `[iPhone, appleVisionWithiPadDesign]` and deployment target `visionOS`"
            )]
        );

        target.deployment_targets = target.deployment_targets.with(Platform::IOS, "17.0");
        assert!(lint(&target).is_empty());
    }

    #[test]
    fn products_invalid_for_platform_are_errors() {
        let mut target = app();
        target.product = Product::Watch2App;
        assert_eq!(
            lint(&target),
            vec![LintingIssue::error(
                "'App' for platform 'iOS' can't have a product type 'watch 2 application'"
            )]
        );
    }

    #[test]
    fn duplicate_dependencies_are_reported_once() {
        let mut target = app();
        target.dependencies = vec![
            TargetDependency::target("Core"),
            TargetDependency::sdk("ARKit.framework", crate::domain::SdkStatus::Required),
            TargetDependency::target("Core"),
            TargetDependency::target("Core"),
        ];
        assert_eq!(
            lint(&target),
            vec![LintingIssue::warning(
                "Target 'App' has duplicate target dependency specified: 'Core'"
            )]
        );
    }

    #[test]
    fn core_data_models_must_exist_with_their_current_version() {
        let mut target = app();
        target.core_data_models = vec![CoreDataModel {
            path: "/app/Model.xcdatamodeld".into(),
            versions: Vec::new(),
            current_version: "Model".into(),
            current_version_declared: false,
        }];

        let fs = FakeFilesystem::empty().with_path("/app/Model.xcdatamodeld");
        assert_eq!(
            TargetLinter::new(&fs).lint(&target, &GenerationOptions::default()),
            vec![LintingIssue::error(
                "The default version of the Core Data model at path /app/Model.xcdatamodeld, Model, does not exist. There should be a file at /app/Model.xcdatamodeld/Model.xcdatamodel"
            )]
        );

        let fs = FakeFilesystem::empty();
        assert_eq!(
            reasons(&TargetLinter::new(&fs).lint(&target, &GenerationOptions::default())),
            vec!["The Core Data model at path /app/Model.xcdatamodeld does not exist"]
        );
    }

    #[test]
    fn code_gen_on_unsupported_files_warns() {
        let mut target = app();
        target.sources = vec![
            SourceFile {
                path: "/app/Intents.intentdefinition".into(),
                code_gen: Some(CodeGen::Public),
            },
            SourceFile {
                path: "/app/View.swift".into(),
                code_gen: Some(CodeGen::Private),
            },
        ];
        assert_eq!(
            reasons(&lint(&target)),
            vec![
                "Target 'App' has a source file at path /app/View.swift with unsupported `codeGen` attributes. Only intentdefinition and mlmodel are known to support this."
            ]
        );
    }

    #[test]
    fn prefetched_tags_already_installed_warn() {
        let mut target = app();
        target.on_demand_resources_tags = Some(OnDemandResourcesTags {
            initial_install: vec!["intro".into()],
            prefetch_order: vec!["intro".into(), "level1".into()],
        });
        assert_eq!(
            reasons(&lint(&target)),
            vec![
                "Prefetched Order Tag \"intro\" is already assigned to Initial Install Tags category for the target App and will be ignored by Xcode"
            ]
        );
    }
}
