//! Product linking registry.
//!
//! # Design Rationale
//!
//! Which product types a target may depend on is described once per source
//! product by a [`LinkRule`]. The graph linter asks [`is_link_allowed`] for
//! every target edge; nothing else encodes linking knowledge.
//!
//! A rule has a base allowance valid on every platform the source supports,
//! plus per-platform extras (an iOS app embeds app clips, a macOS app embeds
//! XPC services, ...). The dependency side is platform-agnostic; platform
//! agreement between the two ends is checked separately.
//!
//! # Adding a New Product
//!
//! 1. Add the variant to `Product` in `value_objects.rs`
//! 2. Add one [`LinkRule`] entry to [`LINK_REGISTRY`]
//! 3. `assert_registry_integrity` tells you if anything is inconsistent

use crate::domain::value_objects::{Platform, Product};

/// Products every code-bearing target may link or embed.
pub const LINKABLE: &[Product] = &[
    Product::StaticLibrary,
    Product::DynamicLibrary,
    Product::Framework,
    Product::StaticFramework,
    Product::Macro,
];

const LINKABLE_AND_BUNDLE: &[Product] = &[
    Product::StaticLibrary,
    Product::DynamicLibrary,
    Product::Framework,
    Product::StaticFramework,
    Product::Macro,
    Product::Bundle,
];

const TESTABLE: &[Product] = &[
    Product::StaticLibrary,
    Product::DynamicLibrary,
    Product::Framework,
    Product::StaticFramework,
    Product::Macro,
    Product::Bundle,
    Product::App,
    Product::AppClip,
    Product::Watch2App,
];

/// What one source product may depend on.
#[derive(Debug, Clone, Copy)]
pub struct LinkRule {
    /// The source product this rule describes.
    pub product: Product,

    /// Platforms on which the source product is linted. Edges from any
    /// other platform are reported as unsupported.
    pub platforms: &'static [Platform],

    /// Dependency products allowed on every platform in `platforms`.
    pub allowed: &'static [Product],

    /// Additional dependency products allowed on one platform only.
    pub platform_extras: &'static [(Platform, &'static [Product])],
}

/// Single source of truth for product linking.
pub static LINK_REGISTRY: &[LinkRule] = &[
    // ── Applications ─────────────────────────────────────────────────────
    LinkRule {
        product: Product::App,
        platforms: &Platform::ALL,
        allowed: LINKABLE_AND_BUNDLE,
        platform_extras: &[
            (
                Platform::IOS,
                &[
                    Product::AppExtension,
                    Product::MessagesExtension,
                    Product::StickerPackExtension,
                    Product::Watch2App,
                    Product::App,
                    Product::AppClip,
                    Product::ExtensionKitExtension,
                ],
            ),
            (
                Platform::MacOS,
                &[
                    Product::AppExtension,
                    Product::Xpc,
                    Product::SystemExtension,
                    Product::CommandLineTool,
                    Product::ExtensionKitExtension,
                ],
            ),
            (
                Platform::TvOS,
                &[Product::AppExtension, Product::TvTopShelfExtension],
            ),
            (Platform::WatchOS, &[Product::AppExtension]),
            (Platform::VisionOS, &[Product::AppExtension]),
        ],
    },
    LinkRule {
        product: Product::AppClip,
        platforms: &[Platform::IOS],
        allowed: LINKABLE_AND_BUNDLE,
        platform_extras: &[(Platform::IOS, &[Product::AppExtension])],
    },
    LinkRule {
        product: Product::Watch2App,
        platforms: &[Platform::WatchOS],
        allowed: &[Product::Watch2Extension],
        platform_extras: &[],
    },
    // ── Libraries and frameworks ─────────────────────────────────────────
    LinkRule {
        product: Product::StaticLibrary,
        platforms: &Platform::ALL,
        allowed: LINKABLE_AND_BUNDLE,
        platform_extras: &[],
    },
    LinkRule {
        product: Product::StaticFramework,
        platforms: &Platform::ALL,
        allowed: LINKABLE_AND_BUNDLE,
        platform_extras: &[],
    },
    LinkRule {
        product: Product::DynamicLibrary,
        platforms: &Platform::ALL,
        allowed: LINKABLE_AND_BUNDLE,
        platform_extras: &[],
    },
    LinkRule {
        product: Product::Framework,
        platforms: &Platform::ALL,
        allowed: LINKABLE_AND_BUNDLE,
        platform_extras: &[],
    },
    LinkRule {
        product: Product::Bundle,
        platforms: &Platform::ALL,
        allowed: LINKABLE_AND_BUNDLE,
        platform_extras: &[],
    },
    LinkRule {
        product: Product::Macro,
        platforms: &[Platform::MacOS],
        allowed: LINKABLE,
        platform_extras: &[],
    },
    // ── Tests ────────────────────────────────────────────────────────────
    LinkRule {
        product: Product::UnitTests,
        platforms: &Platform::ALL,
        allowed: TESTABLE,
        platform_extras: &[],
    },
    LinkRule {
        product: Product::UiTests,
        platforms: &Platform::ALL,
        allowed: TESTABLE,
        platform_extras: &[],
    },
    // ── Extensions ───────────────────────────────────────────────────────
    LinkRule {
        product: Product::AppExtension,
        platforms: &Platform::ALL,
        allowed: LINKABLE_AND_BUNDLE,
        platform_extras: &[],
    },
    LinkRule {
        product: Product::MessagesExtension,
        platforms: &[Platform::IOS],
        allowed: LINKABLE_AND_BUNDLE,
        platform_extras: &[],
    },
    LinkRule {
        product: Product::StickerPackExtension,
        platforms: &[Platform::IOS],
        allowed: LINKABLE_AND_BUNDLE,
        platform_extras: &[],
    },
    LinkRule {
        product: Product::TvTopShelfExtension,
        platforms: &[Platform::TvOS],
        allowed: LINKABLE_AND_BUNDLE,
        platform_extras: &[],
    },
    LinkRule {
        product: Product::Watch2Extension,
        platforms: &[Platform::WatchOS],
        allowed: LINKABLE_AND_BUNDLE,
        platform_extras: &[],
    },
    LinkRule {
        product: Product::ExtensionKitExtension,
        platforms: &[Platform::IOS, Platform::MacOS],
        allowed: LINKABLE_AND_BUNDLE,
        platform_extras: &[(Platform::MacOS, &[Product::Xpc])],
    },
    // ── macOS system products ────────────────────────────────────────────
    LinkRule {
        product: Product::CommandLineTool,
        platforms: &[Platform::MacOS],
        allowed: LINKABLE,
        platform_extras: &[],
    },
    LinkRule {
        product: Product::Xpc,
        platforms: &[Platform::MacOS],
        allowed: LINKABLE,
        platform_extras: &[],
    },
    LinkRule {
        product: Product::SystemExtension,
        platforms: &[Platform::MacOS],
        allowed: LINKABLE,
        platform_extras: &[],
    },
];

// ── Lookups ──────────────────────────────────────────────────────────────────

/// The rule for `product`, if it is registered.
pub fn rule_for(product: Product) -> Option<&'static LinkRule> {
    LINK_REGISTRY.iter().find(|r| r.product == product)
}

/// Whether `product` built for `platform` is a known link source.
pub fn is_supported_source(product: Product, platform: Platform) -> bool {
    rule_for(product).is_some_and(|r| r.platforms.contains(&platform))
}

/// All dependency products `product` may use on `platform`.
pub fn allowed_dependencies(product: Product, platform: Platform) -> Vec<Product> {
    let Some(rule) = rule_for(product).filter(|r| r.platforms.contains(&platform)) else {
        return Vec::new();
    };
    let extras = rule
        .platform_extras
        .iter()
        .filter(|(p, _)| *p == platform)
        .flat_map(|(_, products)| products.iter());
    rule.allowed.iter().chain(extras).copied().collect()
}

/// Whether a `from` product on `platform` may depend on a `to` product.
///
/// Bundles are exempt on both ends: resource bundles are routinely shared
/// across platform families (a macOS bundle used by iOS UI tests).
pub fn is_link_allowed(from: Product, platform: Platform, to: Product) -> bool {
    if from == Product::Bundle || to == Product::Bundle {
        return true;
    }
    allowed_dependencies(from, platform).contains(&to)
}

// ── Registry integrity (checked in tests) ────────────────────────────────────

/// Assert that the registry is internally consistent.
///
/// Call this in a test; it panics with a clear message on any violation.
#[doc(hidden)]
pub fn assert_registry_integrity() {
    for product in Product::ALL {
        let count = LINK_REGISTRY.iter().filter(|r| r.product == product).count();
        assert_eq!(count, 1, "{product} must have exactly one LinkRule, found {count}");
    }

    for rule in LINK_REGISTRY {
        for platform in rule.platforms {
            assert!(
                rule.product.supports_platform(*platform),
                "{} is linted on {platform} but cannot be built for it",
                rule.product
            );
        }
        for (platform, _) in rule.platform_extras {
            assert!(
                rule.platforms.contains(platform),
                "{} has extras for {platform}, which it does not support",
                rule.product
            );
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_internally_consistent() {
        assert_registry_integrity();
    }

    #[test]
    fn static_products_link_static_and_dynamic() {
        for from in [Product::StaticFramework, Product::StaticLibrary] {
            for to in [
                Product::StaticFramework,
                Product::StaticLibrary,
                Product::Framework,
                Product::DynamicLibrary,
            ] {
                assert!(is_link_allowed(from, Platform::IOS, to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn watch_app_only_embeds_watch_extension() {
        assert!(is_link_allowed(
            Product::Watch2App,
            Platform::WatchOS,
            Product::Watch2Extension
        ));
        assert!(!is_link_allowed(
            Product::Watch2App,
            Platform::WatchOS,
            Product::Framework
        ));
    }

    #[test]
    fn watchos_ui_tests_reach_watch_app_and_linkables() {
        for to in [
            Product::Watch2App,
            Product::StaticLibrary,
            Product::Framework,
            Product::StaticFramework,
        ] {
            assert!(is_link_allowed(Product::UiTests, Platform::WatchOS, to));
        }
    }

    #[test]
    fn extension_kit_embeds_xpc_only_on_macos() {
        assert!(is_link_allowed(
            Product::ExtensionKitExtension,
            Platform::MacOS,
            Product::Xpc
        ));
        assert!(!is_link_allowed(
            Product::ExtensionKitExtension,
            Platform::IOS,
            Product::Xpc
        ));
        for to in LINKABLE {
            assert!(is_link_allowed(
                Product::ExtensionKitExtension,
                Platform::IOS,
                *to
            ));
        }
    }

    #[test]
    fn command_line_tool_links_everything_linkable() {
        for to in LINKABLE {
            assert!(is_link_allowed(
                Product::CommandLineTool,
                Platform::MacOS,
                *to
            ));
        }
        assert!(!is_link_allowed(
            Product::CommandLineTool,
            Platform::MacOS,
            Product::App
        ));
    }

    #[test]
    fn app_clip_may_depend_on_frameworks() {
        assert!(is_link_allowed(
            Product::AppClip,
            Platform::IOS,
            Product::Framework
        ));
        assert!(is_link_allowed(Product::App, Platform::IOS, Product::AppClip));
        assert!(!is_link_allowed(
            Product::App,
            Platform::MacOS,
            Product::AppClip
        ));
    }

    #[test]
    fn bundles_are_allowed_across_everything() {
        assert!(is_link_allowed(
            Product::UiTests,
            Platform::IOS,
            Product::Bundle
        ));
        assert!(is_link_allowed(
            Product::Bundle,
            Platform::MacOS,
            Product::App
        ));
        assert!(is_link_allowed(
            Product::Watch2App,
            Platform::WatchOS,
            Product::Bundle
        ));
    }

    #[test]
    fn unsupported_sources_are_reported() {
        assert!(is_supported_source(Product::App, Platform::VisionOS));
        assert!(!is_supported_source(Product::Watch2App, Platform::IOS));
        assert!(allowed_dependencies(Product::Watch2App, Platform::IOS).is_empty());
    }
}
