//! Unit tests for the runner module's path resolution and dispatch.

use super::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;

fn cli_with(args: &[&str]) -> Cli {
    let argv = std::iter::once("provider-make").chain(args.iter().copied());
    Cli::try_parse_from_with_default(argv).expect("valid arguments")
}

#[rstest]
#[case(None, "Makefile", "Makefile")]
#[case(Some("work"), "Makefile", "work/Makefile")]
#[case(Some("work"), "/tmp/Makefile", "/tmp/Makefile")]
fn resolve_cli_path_respects_directory(
    #[case] directory: Option<&str>,
    #[case] input: &str,
    #[case] expected: &str,
) {
    let cli = match directory {
        Some(dir) => cli_with(&["-C", dir]),
        None => cli_with(&[]),
    };
    let resolved = resolve_cli_path(&cli, Path::new(input));
    assert_eq!(resolved.as_ref(), Path::new(expected));
}

#[test]
fn manifest_path_joins_directory() {
    let cli = cli_with(&["-C", "work", "-f", "make.yml"]);
    let path = resolve_manifest_path(&cli).expect("resolve");
    assert_eq!(path.as_std_path(), PathBuf::from("work/make.yml"));
}

#[test]
fn missing_manifest_reports_not_found() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path().to_str().expect("utf-8 temp dir");
    let cli = cli_with(&["-C", dir, "check"]);
    let err = run(&cli).expect_err("manifest is absent");
    let runner_err = err.downcast_ref::<RunnerError>().expect("runner error");
    assert!(matches!(
        runner_err,
        RunnerError::ManifestNotFound { manifest_name, .. } if manifest_name == "makefile.yml"
    ));
}

#[test]
fn render_writes_output_relative_to_directory() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(
        temp.path().join("makefile.yml"),
        "targets:\n  - name: all\n    commands: [echo hi]\n",
    )
    .expect("write manifest");
    let dir = temp.path().to_str().expect("utf-8 temp dir");
    run(&cli_with(&["-C", dir, "render", "out/Makefile"])).expect("render");
    let text = fs::read_to_string(temp.path().join("out/Makefile")).expect("read output");
    assert_eq!(text, "\n\nall::\n\techo hi\n");
}

#[test]
fn check_rejects_cycles() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(
        temp.path().join("makefile.yml"),
        concat!(
            "targets:\n",
            "  - name: a\n",
            "    dependencies: b\n",
            "  - name: b\n",
            "    dependencies: a\n",
        ),
    )
    .expect("write manifest");
    let dir = temp.path().to_str().expect("utf-8 temp dir");
    let err = run(&cli_with(&["-C", dir, "check"])).expect_err("cycle");
    assert!(format!("{err:#}").contains("circular dependency"));
}

#[test]
fn provider_template_flag_overrides_config() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("config.yaml"), "provider: random\n").expect("write config");
    let dir = temp.path().to_str().expect("utf-8 temp dir");
    run(&cli_with(&[
        "-C",
        dir,
        "provider",
        "--config",
        "config.yaml",
        "--template",
        "bridged-v2",
    ]))
    .expect("provider");
    let text = fs::read_to_string(temp.path().join("Makefile")).expect("read output");
    assert!(text.contains(".DEFAULT_GOAL := development"));
}
