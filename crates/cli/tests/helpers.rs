use std::path::{Path, PathBuf};

use fdtcarve::{canonicalize_or_current, infer_workspace_name, parse_cli_offset, resolve_against_root};

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let result = canonicalize_or_current(".").expect("canonicalize");
    let expected = std::env::current_dir().expect("cwd");
    assert_eq!(result, expected);
}

#[test]
fn canonicalize_or_current_absolutizes_missing_paths() {
    let result = canonicalize_or_current("definitely-missing-dir").expect("canonicalize");
    assert!(result.is_absolute());
    assert!(result.ends_with("definitely-missing-dir"));
}

#[test]
fn infer_workspace_name_uses_last_path_component() {
    assert_eq!(infer_workspace_name(Path::new("/work/router-fw")), "router-fw");
    assert_eq!(infer_workspace_name(Path::new("relative/fw-dump")), "fw-dump");
}

#[test]
fn infer_workspace_name_falls_back_when_missing() {
    assert_eq!(infer_workspace_name(Path::new("/")), "unnamed-workspace");
}

#[test]
fn parse_cli_offset_accepts_both_radixes() {
    assert_eq!(parse_cli_offset("0x480000").expect("hex"), 0x480000);
    assert_eq!(parse_cli_offset("512").expect("decimal"), 512);
    assert!(parse_cli_offset("bogus").is_err());
    assert!(parse_cli_offset("").is_err());
}

#[test]
fn resolve_against_root_keeps_absolute_paths() {
    let root = Path::new("/work/router-fw");
    assert_eq!(resolve_against_root(root, "/tmp/firmware.bin"), PathBuf::from("/tmp/firmware.bin"));
    assert_eq!(
        resolve_against_root(root, "images/firmware.bin"),
        PathBuf::from("/work/router-fw/images/firmware.bin")
    );
}
