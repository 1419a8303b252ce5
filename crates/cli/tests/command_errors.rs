use std::fs;

use predicates::str::contains;
use tempfile::tempdir;

#[test]
fn scan_fails_for_a_missing_image() {
    let dir = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("fdtcarve")
        .current_dir(dir.path())
        .args(["scan", "--image", "missing.bin"])
        .assert()
        .failure()
        .stderr(contains("Failed to load image"));
}

#[test]
fn scan_rejects_a_region_past_the_end_of_the_image() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("small.bin"), vec![0u8; 64]).expect("write firmware");

    assert_cmd::cargo::cargo_bin_cmd!("fdtcarve")
        .current_dir(dir.path())
        .args(["scan", "--image", "small.bin", "--start", "0x20", "--length", "0x100"])
        .assert()
        .failure()
        .stderr(contains("region out of bounds"));
}

#[test]
fn scan_rejects_malformed_offsets() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("small.bin"), vec![0u8; 64]).expect("write firmware");

    assert_cmd::cargo::cargo_bin_cmd!("fdtcarve")
        .current_dir(dir.path())
        .args(["scan", "--image", "small.bin", "--start", "12g"])
        .assert()
        .failure()
        .stderr(contains("Invalid offset"));
}

#[test]
fn extract_requires_exactly_one_offset_source() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("fw.bin"), vec![0u8; 64]).expect("write firmware");

    assert_cmd::cargo::cargo_bin_cmd!("fdtcarve")
        .current_dir(dir.path())
        .args(["extract", "--image", "fw.bin", "--out", "out.dtb"])
        .assert()
        .failure()
        .stderr(contains("--offset or --from-catalog"));

    assert_cmd::cargo::cargo_bin_cmd!("fdtcarve")
        .current_dir(dir.path())
        .args([
            "extract",
            "--image",
            "fw.bin",
            "--offset",
            "0",
            "--from-catalog",
            "X",
            "--out",
            "out.dtb",
        ])
        .assert()
        .failure()
        .stderr(contains("mutually exclusive"));
}

#[test]
fn extract_reports_unknown_catalog_entries() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("fw.bin"), vec![0u8; 64]).expect("write firmware");
    fs::write(dir.path().join("offsets.env"), "OTHER=0x10\n").expect("write catalog");

    assert_cmd::cargo::cargo_bin_cmd!("fdtcarve")
        .current_dir(dir.path())
        .args(["extract", "--image", "fw.bin", "--from-catalog", "KERNEL", "--out", "out.dtb"])
        .assert()
        .failure()
        .stderr(contains("No catalog entry named \"KERNEL\""));
}

#[test]
fn decompile_fails_for_a_missing_blob() {
    let dir = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("fdtcarve")
        .current_dir(dir.path())
        .args(["decompile", "--blob", "missing.dtb", "--out", "out.dts"])
        .assert()
        .failure()
        .stderr(contains("Blob file does not exist"));
}

#[test]
fn decompile_propagates_a_two_tier_failure() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("blob.dtb"), b"junk").expect("write blob");

    assert_cmd::cargo::cargo_bin_cmd!("fdtcarve")
        .current_dir(dir.path())
        .env("FDTCARVE_DTC_FAKE", "fail")
        .args(["decompile", "--blob", "blob.dtb", "--out", "out.dts"])
        .assert()
        .failure()
        .stderr(contains("strict mode"))
        .stderr(contains("forced mode"));
}

#[test]
fn offsets_fails_on_a_malformed_catalog() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("offsets.env"), "not an assignment\n").expect("write catalog");

    assert_cmd::cargo::cargo_bin_cmd!("fdtcarve")
        .current_dir(dir.path())
        .arg("offsets")
        .assert()
        .failure()
        .stderr(contains("malformed catalog line 1"));
}
