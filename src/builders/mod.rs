//! Graph builders for provider repositories.
//!
//! Each builder is a pure function from a [`ProviderConfig`] to a
//! [`Makefile`]. Shared steps are declared once and wired into their
//! dependents by handle.

mod bridged;
mod bridged_v2;
pub mod targets;

pub use bridged::bridged_provider;
pub use bridged_v2::bridged_provider_v2;

use crate::config::{MakeTemplate, ProviderConfig};
use crate::ir::Makefile;

/// Build the Makefile for the template selected in `config`.
#[must_use]
pub fn build_makefile(config: &ProviderConfig) -> Makefile {
    tracing::debug!(
        provider = %config.provider,
        template = ?config.make_template,
        "building provider Makefile"
    );
    match config.make_template {
        MakeTemplate::Bridged => bridged_provider(config),
        MakeTemplate::BridgedV2 => bridged_provider_v2(config),
    }
}

/// `-ldflags` value stamping the provider version into the binary.
fn ldflags(config: &ProviderConfig) -> String {
    let mut flags = String::from("-X $(PROJECT)/$(VERSION_PATH)=$(VERSION)");
    if !config.provider_version.is_empty() {
        flags.push_str(&format!(" -X {}=$(VERSION)", config.provider_version));
    }
    flags
}

/// `pulumi plugin install` lines for the configured plugins.
fn plugin_installs(config: &ProviderConfig) -> impl Iterator<Item = String> + '_ {
    config
        .plugins
        .iter()
        .map(|p| format!("pulumi plugin install resource {} {}", p.name, p.version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Plugin;

    #[test]
    fn ldflags_adds_provider_version_symbol() {
        let mut config = ProviderConfig::new("x");
        assert_eq!(ldflags(&config), "-X $(PROJECT)/$(VERSION_PATH)=$(VERSION)");
        config.provider_version = "github.com/x/version.Version".into();
        assert_eq!(
            ldflags(&config),
            "-X $(PROJECT)/$(VERSION_PATH)=$(VERSION) -X github.com/x/version.Version=$(VERSION)"
        );
    }

    #[test]
    fn plugin_installs_follow_config_order() {
        let mut config = ProviderConfig::new("x");
        config.plugins = vec![
            Plugin {
                name: "random".into(),
                version: "4.8.0".into(),
            },
            Plugin {
                name: "tls".into(),
                version: "4.0.0".into(),
            },
        ];
        let lines: Vec<_> = plugin_installs(&config).collect();
        assert_eq!(
            lines,
            [
                "pulumi plugin install resource random 4.8.0",
                "pulumi plugin install resource tls 4.0.0",
            ]
        );
    }

    #[test]
    fn template_selects_builder() {
        let mut config = ProviderConfig::new("x");
        let v1 = build_makefile(&config);
        config.make_template = MakeTemplate::BridgedV2;
        let v2 = build_makefile(&config);
        assert!(v1.targets().any(|t| t.name == "install_plugins"));
        assert!(v2.targets().any(|t| t.name == "install_plugins.sentinel"));
    }
}
