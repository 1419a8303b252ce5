use std::fs;
use std::path::PathBuf;

use carve_core::extract::ExtractedBlob;
use carve_core::pipeline::{CarveOutcome, DecompileStatus};
use carve_core::report::{render_report, write_report};
use carve_core::workspace::{load_config, save_config, WorkspaceConfig, WorkspaceLayout};
use chrono::{TimeZone, Utc};
use tempfile::tempdir;

#[test]
fn layout_is_pure_path_computation() {
    let layout = WorkspaceLayout::new("/work/router-fw");
    assert_eq!(layout.root, PathBuf::from("/work/router-fw"));
    assert_eq!(layout.meta_dir, PathBuf::from("/work/router-fw/.fdtcarve"));
    assert_eq!(layout.config_path, PathBuf::from("/work/router-fw/.fdtcarve/config.json"));
    assert_eq!(layout.blobs_dir, PathBuf::from("/work/router-fw/blobs"));
    assert_eq!(layout.dts_dir, PathBuf::from("/work/router-fw/dts"));
    assert_eq!(layout.reports_dir, PathBuf::from("/work/router-fw/reports"));
    assert_eq!(layout.catalog_path, PathBuf::from("/work/router-fw/offsets.env"));

    assert_eq!(layout.blob_path("kernel_fit"), PathBuf::from("/work/router-fw/blobs/kernel_fit.dtb"));
    assert_eq!(layout.dts_path("kernel_fit"), PathBuf::from("/work/router-fw/dts/kernel_fit.dts"));
    assert_eq!(
        layout.report_path("kernel_fit"),
        PathBuf::from("/work/router-fw/reports/kernel_fit.md")
    );
}

#[test]
fn config_round_trips_through_json() {
    let dir = tempdir().expect("tempdir");
    let layout = WorkspaceLayout::new(dir.path());

    let mut config = WorkspaceConfig::new("router-fw");
    config.dtc_path = Some("/usr/bin/dtc".to_string());
    save_config(&layout, &config).expect("save");

    let loaded = load_config(&layout).expect("load");
    assert_eq!(loaded.name, "router-fw");
    assert_eq!(loaded.config_version, "0.1.0");
    assert_eq!(loaded.dtc_path.as_deref(), Some("/usr/bin/dtc"));
}

#[test]
fn config_omits_absent_dtc_path() {
    let dir = tempdir().expect("tempdir");
    let layout = WorkspaceLayout::new(dir.path());
    save_config(&layout, &WorkspaceConfig::new("bare")).expect("save");

    let json = fs::read_to_string(&layout.config_path).expect("read");
    assert!(!json.contains("dtc_path"));
}

#[test]
fn load_config_fails_when_missing() {
    let dir = tempdir().expect("tempdir");
    let layout = WorkspaceLayout::new(dir.path());
    assert!(load_config(&layout).is_err());
}

fn sample_outcome(decompile: DecompileStatus, dts_path: Option<PathBuf>) -> CarveOutcome {
    CarveOutcome {
        image: PathBuf::from("firmware.bin"),
        image_sha256: "ab".repeat(32),
        found_offset: 0x480000,
        total_size: 256,
        blob: ExtractedBlob {
            path: PathBuf::from("blobs/kernel_fit.dtb"),
            offset: 0x480000,
            size: 256,
            sha256: "cd".repeat(32),
        },
        dts_path,
        decompile,
    }
}

#[test]
fn report_covers_offsets_sizes_and_decompile_tier() {
    let generated = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
    let strict = sample_outcome(DecompileStatus::Strict, Some(PathBuf::from("dts/kernel_fit.dts")));
    let failed = sample_outcome(
        DecompileStatus::Failed { reason: "both tiers failed".to_string() },
        None,
    );

    let report = render_report(
        &PathBuf::from("firmware.bin"),
        &"ab".repeat(32),
        &[strict, failed],
        generated,
    );

    assert!(report.starts_with("# Device-tree extraction report"));
    assert!(report.contains("`firmware.bin`"));
    assert!(report.contains(&"ab".repeat(32)));
    assert!(report.contains("2026-08-30 12:00:00 UTC"));
    assert!(report.contains("Blobs extracted: 2"));
    assert!(report.contains("## Blob at 0x480000"));
    assert!(report.contains("Total size: 256 bytes"));
    assert!(report.contains("Magic verification: passed"));
    assert!(report.contains("Decompiled (strict): `dts/kernel_fit.dts`"));
    assert!(report.contains("Decompilation failed; raw blob preserved (both tiers failed)"));
}

#[test]
fn forced_tier_is_reported_distinctly() {
    let generated = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
    let forced = sample_outcome(DecompileStatus::Forced, Some(PathBuf::from("dts/fit.dts")));
    let report =
        render_report(&PathBuf::from("firmware.bin"), &"ab".repeat(32), &[forced], generated);
    assert!(report.contains("Decompiled (forced): `dts/fit.dts`"));
}

#[test]
fn write_report_creates_the_reports_dir() {
    let dir = tempdir().expect("tempdir");
    let layout = WorkspaceLayout::new(dir.path());

    let path = write_report(&layout, "kernel_fit", "# report body\n").expect("write");
    assert_eq!(path, layout.report_path("kernel_fit"));
    assert_eq!(fs::read_to_string(&path).expect("read"), "# report body\n");
}
