//! First-generation bridged provider Makefile.
//!
//! Every target is phony, so each invocation rebuilds from scratch.

use crate::config::ProviderConfig;
use crate::ir::{Makefile, Target};

use super::targets::{cwd, fake_go_module, help};
use super::{ldflags, plugin_installs};

const JAVA_GEN_VERSION: &str = "v0.4.1";

/// Build the `bridged` template.
#[must_use]
pub fn bridged_provider(config: &ProviderConfig) -> Makefile {
    let mut makefile = Makefile::new();
    for (name, value) in [
        ("PACK", config.provider.clone()),
        ("ORG", String::from("pulumi")),
        ("PROJECT", String::from("github.com/$(ORG)/pulumi-$(PACK)")),
        ("PROVIDER_PATH", config.provider_path()),
        ("VERSION_PATH", String::from("$(PROVIDER_PATH)/pkg/version.Version")),
        ("TFGEN", String::from("pulumi-tfgen-$(PACK)")),
        ("PROVIDER", String::from("pulumi-resource-$(PACK)")),
        ("VERSION", String::from("$(shell pulumictl get version)")),
        ("JAVA_GEN", String::from("pulumi-java-gen")),
        ("JAVA_GEN_VERSION", String::from(JAVA_GEN_VERSION)),
        ("TESTPARALLELISM", String::from("10")),
        ("WORKING_DIR", String::from("$(shell pwd)")),
    ] {
        makefile.set_variable(name, value);
    }

    let install_plugins = makefile.add(
        Target::new("install_plugins")
            .phony()
            .command("[ -x $(shell which pulumi) ] || curl -fsSL https://get.pulumi.com | sh")
            .commands(plugin_installs(config)),
    );
    let tfgen = makefile.add(
        Target::new("tfgen")
            .phony()
            .depends_on(install_plugins)
            .commands([
                r#"(cd provider && go build -p 1 -o $(WORKING_DIR)/bin/$(TFGEN) -ldflags "-X $(PROJECT)/$(VERSION_PATH)=$(VERSION)" $(PROJECT)/$(PROVIDER_PATH)/cmd/$(TFGEN))"#,
                "$(WORKING_DIR)/bin/$(TFGEN) schema --out provider/cmd/$(PROVIDER)",
                "(cd provider && VERSION=$(VERSION) go generate cmd/$(PROVIDER)/main.go)",
            ]),
    );
    let provider = makefile.add(
        Target::new("provider")
            .phony()
            .depends_on(tfgen)
            .depends_on(install_plugins)
            .command(format!(
                r#"(cd provider && go build -p 1 -o $(WORKING_DIR)/bin/$(PROVIDER) -ldflags "{}" $(PROJECT)/$(PROVIDER_PATH)/cmd/$(PROVIDER))"#,
                ldflags(config)
            )),
    );

    let build_nodejs = makefile.add(
        Target::new("build_nodejs")
            .phony()
            .variable(
                "VERSION",
                "$(shell pulumictl get version --language javascript)",
            )
            .command(
                "$(WORKING_DIR)/bin/$(TFGEN) nodejs --overlays provider/overlays/nodejs --out sdk/nodejs/",
            )
            .chain([
                String::from("cd sdk/nodejs/"),
                fake_go_module("nodejs", "1.16", "go.mod"),
                String::from("yarn install"),
                String::from("yarn run tsc"),
                String::from("cp ../../README.md ../../LICENSE* package.json yarn.lock ./bin/"),
                String::from(r#"sed -i.bak -e "s/\$${VERSION}/$(VERSION)/g" ./bin/package.json"#),
            ]),
    );
    let build_python = makefile.add(
        Target::new("build_python")
            .phony()
            .variable(
                "PYPI_VERSION",
                "$(shell pulumictl get version --language python)",
            )
            .command(
                "$(WORKING_DIR)/bin/$(TFGEN) python --overlays provider/overlays/python --out sdk/python/",
            )
            .chain([
                String::from("cd sdk/python/"),
                fake_go_module("python", "1.16", "go.mod"),
                String::from("cp ../../README.md ."),
                String::from("python3 setup.py clean --all 2>/dev/null"),
                String::from(
                    "rm -rf ./bin/ ../python.bin/ && cp -R . ../python.bin && mv ../python.bin ./bin",
                ),
                String::from(
                    r#"sed -i.bak -e 's/^VERSION = .*/VERSION = "$(PYPI_VERSION)"/g' -e 's/^PLUGIN_VERSION = .*/PLUGIN_VERSION = "$(VERSION)"/g' ./bin/setup.py"#,
                ),
                String::from("rm ./bin/setup.py.bak && rm ./bin/go.mod"),
                String::from("cd ./bin && python3 setup.py build sdist"),
            ]),
    );
    let build_go = makefile.add(Target::new("build_go").phony().command(
        "$(WORKING_DIR)/bin/$(TFGEN) go --overlays provider/overlays/go --out sdk/go/",
    ));
    let build_dotnet = makefile.add(
        Target::new("build_dotnet")
            .phony()
            .variable(
                "DOTNET_VERSION",
                "$(shell pulumictl get version --language dotnet)",
            )
            .commands([
                "pulumictl get version --language dotnet",
                "$(WORKING_DIR)/bin/$(TFGEN) dotnet --overlays provider/overlays/dotnet --out sdk/dotnet/",
            ])
            .chain([
                String::from("cd sdk/dotnet/"),
                fake_go_module("dotnet", "1.16", "go.mod"),
                String::from(r#"echo "$(DOTNET_VERSION)" >version.txt"#),
                String::from("dotnet build /p:Version=$(DOTNET_VERSION)"),
            ]),
    );
    let bin_java_gen = makefile.add(Target::new("bin/pulumi-java-gen").command(
        "$(shell pulumictl download-binary -n pulumi-language-java -v $(JAVA_GEN_VERSION) -r pulumi/pulumi-java)",
    ));
    let build_java = makefile.add(
        Target::new("build_java")
            .phony()
            .depends_on(bin_java_gen)
            .variable(
                "PACKAGE_VERSION",
                "$(shell pulumictl get version --language generic)",
            )
            .command(
                "$(WORKING_DIR)/bin/$(JAVA_GEN) generate --schema provider/cmd/$(PROVIDER)/schema.json --out sdk/java",
            )
            .chain([
                String::from("cd sdk/java/"),
                fake_go_module("java", "1.16", "go.mod"),
                String::from("gradle --console=plain build"),
            ]),
    );
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
            .depends_on(provider)
            .command(cwd("provider", &["golangci-lint run -c ../.golangci.yml"])),
    );
    let cleanup = makefile.add(Target::new("cleanup").phony().commands([
        "rm -r $(WORKING_DIR)/bin",
        "rm -f provider/cmd/$(PROVIDER)/schema.go",
    ]));
    let help = makefile.add(help());
    let clean = makefile.add(
        Target::new("clean")
            .phony()
            .command("rm -rf sdk/{dotnet,nodejs,go,python}"),
    );

    let install_dotnet_sdk = makefile.add(Target::new("install_dotnet_sdk").phony().commands([
        "mkdir -p $(WORKING_DIR)/nuget",
        r"find . -name '*.nupkg' -print -exec cp -p {} $(WORKING_DIR)/nuget \;",
    ]));
    let install_python_sdk = makefile.add(Target::new("install_python_sdk").phony());
    let install_go_sdk = makefile.add(Target::new("install_go_sdk").phony());
    let install_java_sdk = makefile.add(Target::new("install_java_sdk").phony());
    let install_nodejs_sdk = makefile.add(
        Target::new("install_nodejs_sdk")
            .phony()
            .command("yarn link --cwd $(WORKING_DIR)/sdk/nodejs/bin"),
    );
    let install_sdks = makefile.add(Target::new("install_sdks").phony().depends_on_all([
        install_dotnet_sdk,
        install_python_sdk,
        install_nodejs_sdk,
        install_java_sdk,
    ]));

    let everything = [install_plugins, provider, build_sdks, install_sdks];
    let development =
        makefile.add(Target::new("development").phony().depends_on_all(everything));
    let build = makefile.add(Target::new("build").phony().depends_on_all(everything));
    let only_build = makefile.add(Target::new("only_build").depends_on(build));
    let test = makefile.add(Target::new("test").phony().command(
        "cd examples && go test -v -tags=all -parallel $(TESTPARALLELISM) -timeout 2h",
    ));

    for id in [
        development,
        build,
        only_build,
        tfgen,
        provider,
        build_sdks,
        build_nodejs,
        build_python,
        build_go,
        build_dotnet,
        build_java,
        bin_java_gen,
        lint_provider,
        cleanup,
        help,
        clean,
        install_plugins,
        install_dotnet_sdk,
        install_python_sdk,
        install_go_sdk,
        install_java_sdk,
        install_nodejs_sdk,
        install_sdks,
        test,
    ] {
        makefile.list(id);
    }
    makefile
}
