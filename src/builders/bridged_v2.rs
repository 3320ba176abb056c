//! Second-generation bridged provider Makefile.
//!
//! Real files and `.sentinel` stamps replace most phony steps so make can
//! skip work whose inputs have not changed. Phony aliases (`provider`,
//! `build_nodejs`, ...) point at the stamped targets.

use crate::config::ProviderConfig;
use crate::ir::{Assignment, Makefile, Target, TargetId};

use super::targets::{fake_go_module, help};
use super::{ldflags, plugin_installs};

const GO_VERSION: &str = "1.17";

fn set_variables(makefile: &mut Makefile, config: &ProviderConfig) {
    for (name, value) in [
        ("PACK", config.provider.clone()),
        ("ORG", String::from("pulumi")),
        ("PROJECT", String::from("github.com/$(ORG)/pulumi-$(PACK)")),
        ("PROVIDER_PATH", config.provider_path()),
        ("VERSION_PATH", String::from("$(PROVIDER_PATH)/pkg/version.Version")),
        ("TFGEN", String::from("pulumi-tfgen-$(PACK)")),
        ("PROVIDER", String::from("pulumi-resource-$(PACK)")),
        ("TESTPARALLELISM", String::from("10")),
        ("WORKING_DIR", String::from("$(shell pwd)")),
        ("PROVIDER_MODS", String::from("provider/go.mod provider/go.sum")),
    ] {
        makefile.set_variable(name, value);
    }

    let sources = [
        ("PROVIDER_PKG_SRC", "provider/pkg"),
        ("TFGEN_CMD_SRC", "provider/cmd/$(TFGEN)"),
        ("PROVIDER_CMD_SRC", "provider/cmd/$(PROVIDER)"),
    ];
    for (name, dir) in sources {
        makefile.set_variable(
            name,
            Assignment::recursive(format!(r#"$(shell find {dir} -type f -name "*.go")"#)),
        );
    }
    for language in ["go", "nodejs", "python", "dotnet"] {
        makefile.set_variable(
            format!("OVERLAYS_{}", language.to_uppercase()),
            Assignment::recursive(format!(
                r#"$(shell [ -d "provider/overlays/{language}" ] && find provider/overlays/{language} -type f)"#
            )),
        );
    }

    // Recursive variables are expanded lazily, so pulumictl only runs when a
    // recipe needs the version.
    makefile.set_variable(
        "VERSION",
        Assignment::recursive("$(shell bin/pulumictl get version --language generic)"),
    );
    for language in ["dotnet", "javascript", "python"] {
        makefile.set_variable(
            format!("VERSION_{}", language.to_uppercase()),
            Assignment::recursive(format!(
                "$(shell bin/pulumictl get version --language {language})"
            )),
        );
    }
}

/// Generated and built SDK sentinels for one language.
struct Sdk {
    gen_target: TargetId,
    build_target: TargetId,
}

/// Build the `bridged-v2` template.
#[must_use]
pub fn bridged_provider_v2(config: &ProviderConfig) -> Makefile {
    let mut makefile = Makefile::new();
    set_variables(&mut makefile, config);

    let bin_pulumictl = makefile.add(
        Target::new("bin/pulumictl")
            .depends_on(".version.pulumictl.txt")
            .variable("PULUMICTL_VERSION", "$(shell cat .version.pulumictl.txt)")
            .variable(
                "PLAT",
                r#"$(shell go version | sed -En "s/go version go.* (.*)\/(.*)/\1-\2/p")"#,
            )
            .variable(
                "PULUMICTL_URL",
                "https://github.com/pulumi/pulumictl/releases/download/$(PULUMICTL_VERSION)/pulumictl-$(PULUMICTL_VERSION)-$(PLAT).tar.gz",
            )
            .commands([
                r#"@echo "Installing pulumictl""#,
                "@mkdir -p bin",
                r#"wget -q -O - "$(PULUMICTL_URL)" | tar -xzf - -C $(WORKING_DIR)/bin pulumictl"#,
                "@touch bin/pulumictl",
                r#"@echo "pulumictl" $$(./bin/pulumictl version)"#,
            ]),
    );
    let plugins_sentinel = makefile.add(
        Target::new("install_plugins.sentinel")
            .auto_touch()
            .depends_on(bin_pulumictl)
            .command(
                r#"[ -x "$(shell command -v pulumi 2>/dev/null)" ] || curl -fsSL https://get.pulumi.com | sh"#,
            )
            .commands(plugin_installs(config)),
    );
    let install_plugins = makefile.add(
        Target::new("install_plugins")
            .phony()
            .depends_on(plugins_sentinel),
    );

    let bin_tfgen = makefile.add(
        Target::new("bin/$(TFGEN)")
            .depends_on(plugins_sentinel)
            .depends_on_all(["$(PROVIDER_MODS)", "$(PROVIDER_PKG_SRC)", "$(TFGEN_CMD_SRC)"])
            .chain([
                "cd provider",
                r#"go build -p 1 -o $(WORKING_DIR)/bin/$(TFGEN) -ldflags "-X $(PROJECT)/$(VERSION_PATH)=$(VERSION)" $(PROJECT)/$(PROVIDER_PATH)/cmd/$(TFGEN)"#,
            ]),
    );
    let schema = makefile.add(
        Target::new("provider/cmd/$(PROVIDER)/schema.json")
            .depends_on_all([bin_tfgen, plugins_sentinel])
            .command("bin/$(TFGEN) schema --out provider/cmd/$(PROVIDER)"),
    );
    let schema_embed = makefile.add(
        Target::new("provider/cmd/$(PROVIDER)/schema-embed.json")
            .depends_on(schema)
            .chain([
                "cd provider",
                "VERSION=$(VERSION) go generate cmd/$(PROVIDER)/main.go",
            ]),
    );
    let tfgen = makefile.add(Target::new("tfgen").phony().depends_on_all([
        plugins_sentinel,
        bin_tfgen,
        schema,
    ]));
    let bin_provider = makefile.add(
        Target::new("bin/$(PROVIDER)")
            .depends_on_all([plugins_sentinel, schema_embed])
            .depends_on_all([
                "$(PROVIDER_MODS)",
                "$(PROVIDER_PKG_SRC)",
                "$(PROVIDER_CMD_SRC)",
            ])
            .command(format!(
                r#"(cd provider && go build -p 1 -o $(WORKING_DIR)/bin/$(PROVIDER) -ldflags "{}" $(PROJECT)/$(PROVIDER_PATH)/cmd/$(PROVIDER))"#,
                ldflags(config)
            )),
    );
    let provider = makefile.add(Target::new("provider").phony().depends_on(bin_provider));

    let nodejs = sdk(
        &mut makefile,
        bin_tfgen,
        "nodejs",
        vec![String::from("bin/$(TFGEN) nodejs --out sdk/nodejs/")],
        [
            String::from("cd sdk/nodejs/"),
            fake_go_module("nodejs", GO_VERSION, "go.mod"),
            String::from("yarn install"),
            String::from("yarn run tsc"),
            String::from("cp ../../README.md ../../LICENSE* package.json yarn.lock ./bin/"),
            String::from(
                r#"sed -i.bak -e "s/\$${VERSION}/$(VERSION_JAVASCRIPT)/g" ./bin/package.json"#,
            ),
        ],
    );
    let build_nodejs = makefile.add(
        Target::new("build_nodejs")
            .phony()
            .depends_on(nodejs.build_target),
    );

    let python = sdk(
        &mut makefile,
        bin_tfgen,
        "python",
        vec![String::from("bin/$(TFGEN) python --out sdk/python/")],
        [
            String::from("cd sdk/python/"),
            fake_go_module("python", GO_VERSION, "go.mod"),
            String::from("cp ../../README.md ."),
            String::from("python3 setup.py clean --all 2>/dev/null"),
            String::from(
                "rm -rf ./bin/ ../python.bin/ && cp -R . ../python.bin && mv ../python.bin ./bin",
            ),
            String::from(
                r#"sed -i.bak -e 's/^VERSION = .*/VERSION = "$(VERSION_PYTHON)"/g' -e 's/^PLUGIN_VERSION = .*/PLUGIN_VERSION = "$(VERSION_PYTHON)"/g' ./bin/setup.py"#,
            ),
            String::from("rm ./bin/setup.py.bak && rm ./bin/go.mod"),
            String::from("cd ./bin && python3 setup.py build sdist"),
        ],
    );
    let build_python = makefile.add(
        Target::new("build_python")
            .phony()
            .depends_on(python.build_target),
    );

    let go_gen = makefile.add(
        Target::new("sdk/go/.gen.sentinel")
            .auto_touch()
            .depends_on(bin_tfgen)
            .depends_on("$(OVERLAYS_GO)")
            .command("bin/$(TFGEN) go --out sdk/go/"),
    );
    // Build every package below the module path declared in sdk/go.mod.
    let build_go = makefile.add(
        Target::new("build_go")
            .phony()
            .depends_on(go_gen)
            .command(
                r#"cd sdk && go list `grep -e "^module" go.mod | cut -d ' ' -f 2`/go/... | xargs go build"#,
            ),
    );

    let dotnet = sdk(
        &mut makefile,
        bin_tfgen,
        "dotnet",
        vec![
            String::from("bin/$(TFGEN) dotnet --out sdk/dotnet/"),
            fake_go_module("dotnet", GO_VERSION, "sdk/dotnet/go.mod"),
            String::from(r#"echo "$(VERSION_DOTNET)" > sdk/dotnet/version.txt"#),
        ],
        [
            String::from("cd sdk/dotnet/"),
            String::from("dotnet build /p:Version=$(VERSION_DOTNET)"),
        ],
    );
    let build_dotnet = makefile.add(
        Target::new("build_dotnet")
            .phony()
            .depends_on(dotnet.build_target),
    );

    let bin_java_gen = makefile.add(
        Target::new("bin/pulumi-java-gen")
            .depends_on(bin_pulumictl)
            .depends_on(".version.javagen.txt")
            .command(
                "$(shell bin/pulumictl download-binary -n pulumi-language-java -v $(shell cat .version.javagen.txt) -r pulumi/pulumi-java)",
            ),
    );
    let java_gen = makefile.add(
        Target::new("sdk/java/.gen.sentinel")
            .auto_touch()
            .depends_on(bin_java_gen)
            .command(
                "bin/pulumi-java-gen generate --schema provider/cmd/$(PROVIDER)/schema.json --out sdk/java  --build gradle-nexus",
            )
            .chain([
                String::from("cd sdk/java"),
                fake_go_module("java", GO_VERSION, "go.mod"),
            ]),
    );
    let java_build = makefile.add(
        Target::new("sdk/java/.build.sentinel")
            .auto_touch()
            .depends_on(java_gen)
            .chain(["cd sdk/java", "gradle --console=plain build"]),
    );
    let build_java = makefile.add(Target::new("build_java").phony().depends_on(java_build));

    let build_sdks = makefile.add(Target::new("build_sdks").phony().depends_on_all([
        build_nodejs,
        build_python,
        build_go,
        build_dotnet,
        build_java,
    ]));
    let lint_provider = makefile.add(
        Target::new("lint_provider")
            .phony()
            .depends_on(bin_provider)
            .command("cd provider && golangci-lint run -c ../.golangci.yml"),
    );
    let cleanup = makefile.add(Target::new("cleanup").phony().commands([
        "rm -r bin",
        "rm -f provider/cmd/$(PROVIDER)/schema.go",
    ]));
    let help = makefile.add(help());
    let clean = makefile.add(
        Target::new("clean")
            .phony()
            .command("rm -rf sdk/{dotnet,nodejs,go,python}"),
    );

    let dotnet_install = makefile.add(
        Target::new("sdk/dotnet/.install.sentinel")
            .auto_touch()
            .commands([
                "mkdir -p nuget",
                r"find sdk/dotnet -name '*.nupkg' -print -exec cp -p {} nuget \;",
            ]),
    );
    let install_dotnet_sdk = makefile.add(
        Target::new("install_dotnet_sdk")
            .phony()
            .depends_on(dotnet_install),
    );
    let install_python_sdk = makefile.add(Target::new("install_python_sdk").phony());
    let install_java_sdk = makefile.add(Target::new("install_java_sdk").phony());
    let install_go_sdk = makefile.add(Target::new("install_go_sdk").phony());
    let nodejs_install = makefile.add(
        Target::new("sdk/nodejs/.install.sentinel")
            .auto_touch()
            .command("yarn link --cwd sdk/nodejs/bin"),
    );
    let install_nodejs_sdk = makefile.add(
        Target::new("install_nodejs_sdk")
            .phony()
            .depends_on(nodejs_install),
    );
    let install_sdks = makefile.add(Target::new("install_sdks").phony().depends_on_all([
        install_dotnet_sdk,
        install_python_sdk,
        install_nodejs_sdk,
        install_java_sdk,
        install_go_sdk,
    ]));

    let everything = [install_plugins, provider, build_sdks, install_sdks];
    let development =
        makefile.add(Target::new("development").phony().depends_on_all(everything));
    let build = makefile.add(Target::new("build").phony().depends_on_all(everything));
    let only_build = makefile.add(Target::new("only_build").depends_on(build));
    let test = makefile.add(Target::new("test").phony().command(
        "cd examples && go test -v -tags=all -parallel $(TESTPARALLELISM) -timeout 2h",
    ));

    makefile.set_default_target(development);
    for id in [
        development,
        build,
        only_build,
        lint_provider,
        cleanup,
        help,
        clean,
        test,
        tfgen,
        bin_pulumictl,
        plugins_sentinel,
        install_plugins,
        bin_tfgen,
        schema,
        schema_embed,
        bin_provider,
        provider,
        nodejs.gen_target,
        nodejs.build_target,
        build_nodejs,
        python.gen_target,
        python.build_target,
        build_python,
        go_gen,
        build_go,
        dotnet.gen_target,
        dotnet.build_target,
        build_dotnet,
        bin_java_gen,
        java_gen,
        java_build,
        build_java,
        build_sdks,
        dotnet_install,
        install_dotnet_sdk,
        install_python_sdk,
        install_java_sdk,
        install_go_sdk,
        nodejs_install,
        install_nodejs_sdk,
        install_sdks,
    ] {
        makefile.list(id);
    }
    makefile
}

/// Add the `.gen` and `.build` sentinels for a tfgen-generated SDK.
fn sdk<I>(
    makefile: &mut Makefile,
    bin_tfgen: TargetId,
    language: &str,
    generate: Vec<String>,
    build: I,
) -> Sdk
where
    I: IntoIterator<Item = String>,
{
    let gen_target = makefile.add(
        Target::new(format!("sdk/{language}/.gen.sentinel"))
            .auto_touch()
            .depends_on(bin_tfgen)
            .depends_on(format!("$(OVERLAYS_{})", language.to_uppercase()))
            .commands(generate),
    );
    let build_target = makefile.add(
        Target::new(format!("sdk/{language}/.build.sentinel"))
            .auto_touch()
            .depends_on(gen_target)
            .chain(build),
    );
    Sdk {
        gen_target,
        build_target,
    }
}
