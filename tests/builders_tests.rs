//! Provider builder tests.
//!
//! Load provider configuration the way the CLI does and check the generated
//! Makefiles for both templates.

use provider_make::builders::{bridged_provider, bridged_provider_v2, build_makefile};
use provider_make::config::{MakeTemplate, ProviderConfig};
use provider_make::make_gen::render;
use rstest::rstest;

const CONFIG: &str = concat!(
    "provider: aws\n",
    "major-version: 5\n",
    "providerVersion: github.com/pulumi/pulumi-aws/provider/v5/pkg/version.Version\n",
    "makeTemplate: bridged-v2\n",
    "plugins:\n",
    "  - name: random\n",
    "    version: 4.8.2\n",
    "  - name: tls\n",
    "    version: 4\n",
    "env:\n",
    "  AWS_REGION: us-west-2\n",
);

fn config() -> ProviderConfig {
    ProviderConfig::from_yaml(CONFIG).expect("parse config")
}

#[test]
fn config_reads_camel_case_and_ignores_workflow_keys() {
    let config = config();
    assert_eq!(config.provider, "aws");
    assert_eq!(config.major_version, 5);
    assert_eq!(config.make_template, MakeTemplate::BridgedV2);
    assert_eq!(config.plugins.len(), 2);
    assert_eq!(config.plugins.get(1).map(|p| p.version.as_str()), Some("4"));
}

#[rstest]
#[case(1, "PROVIDER_PATH := provider\n")]
#[case(2, "PROVIDER_PATH := provider/v2\n")]
#[case(5, "PROVIDER_PATH := provider/v5\n")]
fn provider_path_tracks_major_version(#[case] major: u32, #[case] line: &str) {
    let mut config = ProviderConfig::new("aws");
    config.major_version = major;
    for template in [MakeTemplate::Bridged, MakeTemplate::BridgedV2] {
        config.make_template = template;
        assert!(render(&build_makefile(&config)).contains(line));
    }
}

#[test]
fn plugins_install_in_config_order() {
    let text = render(&bridged_provider(&config()));
    assert!(text.contains(concat!(
        "\tpulumi plugin install resource random 4.8.2\n",
        "\tpulumi plugin install resource tls 4\n",
    )));
}

#[test]
fn provider_version_is_stamped_into_ldflags() {
    let text = render(&bridged_provider_v2(&config()));
    assert!(text.contains(
        "-ldflags \"-X $(PROJECT)/$(VERSION_PATH)=$(VERSION) -X github.com/pulumi/pulumi-aws/provider/v5/pkg/version.Version=$(VERSION)\""
    ));
}

#[rstest]
#[case(MakeTemplate::Bridged)]
#[case(MakeTemplate::BridgedV2)]
fn builders_are_deterministic_and_valid(#[case] template: MakeTemplate) {
    let mut config = config();
    config.make_template = template;
    let makefile = build_makefile(&config);
    assert_eq!(makefile.validate(), Ok(()));
    assert_eq!(render(&makefile), render(&build_makefile(&config)));
}

#[test]
fn bridged_v1_has_no_default_goal() {
    let text = render(&bridged_provider(&config()));
    assert!(!text.contains(".DEFAULT_GOAL"));
    assert!(text.contains("\n\ndevelopment:: install_plugins provider build_sdks install_sdks\n"));
}

#[test]
fn bridged_v2_aliases_point_at_sentinels() {
    let text = render(&bridged_provider_v2(&config()));
    assert!(text.contains("\nbuild_python:: sdk/python/.build.sentinel\n"));
    assert!(text.contains("\ninstall_plugins:: install_plugins.sentinel\n"));
    assert!(text.contains("\nprovider:: bin/$(PROVIDER)\n"));
}
