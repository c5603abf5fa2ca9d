#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cf() -> Command {
    let mut cmd = Command::cargo_bin("cf").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

/// A temp directory holding a small catalog.
fn custom_catalog() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("catalog.json"),
        r#"{
    "species": [
        { "id": 1, "name": "Mossling", "element": "grass", "grade": "common" },
        { "id": 2, "name": "Thornback", "element": "grass", "grade": "uncommon" }
    ],
    "default_species": 1
}"#,
    )
    .unwrap();
    dir
}

// ---------------------------------------------------------------------------
// catalog
// ---------------------------------------------------------------------------

#[test]
fn catalog_lists_builtin_species() {
    cf().arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("Puddlet"))
        .stdout(predicate::str::contains("61 species"));
}

#[test]
fn catalog_filters_by_grade() {
    cf().args(["catalog", "--grade", "mythic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Primordia"))
        .stdout(predicate::str::contains("Puddlet").not());
}

#[test]
fn catalog_filters_by_element() {
    cf().args(["catalog", "--element", "water", "--grade", "rare"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Coralisk"))
        .stdout(predicate::str::contains("1 species"));
}

#[test]
fn catalog_rejects_unknown_grade() {
    cf().args(["catalog", "--grade", "shiny"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown grade 'shiny'"));
}

#[test]
fn catalog_lists_materials() {
    cf().args(["catalog", "--materials"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chaos Prism"))
        .stdout(predicate::str::contains("great success"));
}

#[test]
fn catalog_loads_custom_file() {
    let dir = custom_catalog();
    cf().args(["catalog", "--catalog"])
        .arg(dir.path().join("catalog.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Thornback"))
        .stdout(predicate::str::contains("2 species"));
}

#[test]
fn catalog_rejects_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"{ "species": [], "default_species": 1 }"#).unwrap();
    cf().args(["catalog", "--catalog"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid catalog"));
}

// ---------------------------------------------------------------------------
// pools
// ---------------------------------------------------------------------------

#[test]
fn pools_lists_builtin_pools() {
    cf().arg("pools")
        .assert()
        .success()
        .stdout(predicate::str::contains("premium"))
        .stdout(predicate::str::contains("element:fire"))
        .stdout(predicate::str::contains("14 pools"));
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_legendary_pool_never_yields_common() {
    let output = cf()
        .args(["simulate", "--pool", "legendary", "-n", "200", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["pool"], "legendary");
    assert_eq!(doc["draws"], 200);
    assert_eq!(doc["grades"]["common"], 0);
    let legendary = doc["grades"]["legendary"].as_u64().unwrap();
    let mythic = doc["grades"]["mythic"].as_u64().unwrap();
    assert_eq!(legendary + mythic, 200);
}

#[test]
fn simulate_is_reproducible_with_a_seed() {
    let run = || {
        cf().args(["simulate", "-n", "500", "--seed", "7", "--json"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn simulate_prints_distribution_table() {
    cf().args(["simulate", "--pool", "premium", "-n", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Simulation"))
        .stdout(predicate::str::contains("Configured"))
        .stdout(predicate::str::contains("uncommon"));
}

#[test]
fn simulate_unknown_pool_fails() {
    cf().args(["simulate", "--pool", "golden"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown pool 'golden'"));
}

// ---------------------------------------------------------------------------
// hatch
// ---------------------------------------------------------------------------

#[test]
fn hatch_opens_requested_eggs() {
    cf().args(["hatch", "-n", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hatched 5 from 'normal'"))
        .stdout(predicate::str::contains("500 gold"));
}

#[test]
fn hatch_rejects_oversized_batch() {
    cf().args(["hatch", "-n", "11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid quantity 11"));
}

#[test]
fn hatch_reports_pity_reset() {
    cf().args(["hatch", "--pity", "14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hatched 1"));
}

// ---------------------------------------------------------------------------
// merge
// ---------------------------------------------------------------------------

#[test]
fn merge_same_species_upgrades() {
    cf().args(["merge", "1", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tidefin"))
        .stdout(predicate::str::contains("grade upgrade"))
        .stdout(predicate::str::contains("New species discovered"));
}

#[test]
fn merge_uses_recipe() {
    cf().args(["merge", "1", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Glimmit"))
        .stdout(predicate::str::contains("combination"));
}

#[test]
fn merge_with_forcing_material_mutates() {
    cf().args(["merge", "1", "1", "--material", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Coralisk"))
        .stdout(predicate::str::contains("MUTATION"));
}

#[test]
fn merge_with_feather_is_great_success() {
    cf().args(["merge", "1", "1", "-m", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GREAT SUCCESS"))
        .stdout(predicate::str::contains("level 3"));
}

#[test]
fn merge_legendary_pair_fails() {
    cf().args(["merge", "6", "6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_grade"));
}

#[test]
fn merge_unknown_species_fails() {
    cf().args(["merge", "1", "999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown species #999"));
}
