//! The client binaries run end to end against the bundled demo document.

use std::path::PathBuf;
use std::process::{Command, Output};

use anyhow::{bail, Result};

fn demos() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("demos")
}

fn run(bin: &str, args: &[&str]) -> Result<Output> {
    let registry = demos().join("people.json");
    let output = Command::new(bin)
        .arg("--registry")
        .arg(&registry)
        .args(args)
        .env_remove("RUST_LOG")
        .output()?;
    if !output.status.success() {
        bail!(
            "{bin} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}

#[test]
fn inspect_prints_flattened_signatures_as_json() -> Result<()> {
    let output = run(
        env!("CARGO_BIN_EXE_unfurl-inspect"),
        &["--function", "get_hero", "--format", "json"],
    )?;
    let signatures: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let names: Vec<_> = signatures[0]["params"]
        .as_array()
        .map(|params| params.iter().filter_map(|p| p["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, ["hero__name", "hero__pet__name"]);
    assert_eq!(signatures[0]["name"], "get_hero");
    Ok(())
}

#[test]
fn inspect_text_shows_option_metadata() -> Result<()> {
    let config = demos().join("unfurl.toml");
    let config = config.to_string_lossy();
    let output = run(
        env!("CARGO_BIN_EXE_unfurl-inspect"),
        &["--config", &config, "--function", "get_hero"],
    )?;
    let text = String::from_utf8(output.stdout)?;
    assert!(text.starts_with("get_hero(hero__name: str, hero__pet__name: str)\n"));
    assert!(text.contains("[Hero.Pet] (prompt)"));
    Ok(())
}

#[test]
fn run_prints_condensed_arguments() -> Result<()> {
    let output = run(
        env!("CARGO_BIN_EXE_unfurl-run"),
        &[
            "--function",
            "get_person",
            "--bare",
            "--",
            "--name",
            "Ada",
            "--age",
            "36",
            "--r",
            "1",
            "--g",
            "2",
            "--b",
            "3",
            "--a",
            "4",
            "--length",
            "5",
            "--email",
            "None",
        ],
    )?;
    let condensed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let person = &condensed["person"];
    assert_eq!(person["schema"], "Person");
    assert_eq!(person["fields"]["age"], 36);
    assert_eq!(person["fields"]["email"], serde_json::Value::Null);
    assert_eq!(person["fields"]["pet"], "dog");
    assert_eq!(person["fields"]["hair"]["fields"]["color"]["fields"]["alpha"]["fields"]["a"], 4);
    assert_eq!(condensed["thing"], serde_json::Value::Null);
    Ok(())
}

#[test]
fn run_rejects_missing_options() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_unfurl-run"))
        .arg("--registry")
        .arg(demos().join("people.json"))
        .args(["--function", "get_hero", "--", "--hero__name", "Ada"])
        .output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--hero__pet__name"));
    Ok(())
}

#[test]
fn codegen_writes_adapter_modules() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("adapters");
    let out_arg = out.to_string_lossy();
    let output = run(
        env!("CARGO_BIN_EXE_unfurl-codegen"),
        &["--interactive", "--out", &out_arg],
    )?;
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Generated 2 adapters"));

    let mod_rs = std::fs::read_to_string(out.join("mod.rs"))?;
    assert!(mod_rs.contains("pub mod get_hero;\npub mod get_person;\n"));
    let person = std::fs::read_to_string(out.join("get_person.rs"))?;
    assert!(person.contains("pub struct GetPersonArgs {"));
    assert!(person.contains("pub person_email: Option<unfurl::Value>,"));
    Ok(())
}
