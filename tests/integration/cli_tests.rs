//! End-to-end tests for the command line interface
//!
//! Every command runs inside a temporary directory so config discovery
//! and the restriction cache never touch the developer's own files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn lintconstraints(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lintconstraints").unwrap();
    cmd.current_dir(dir.path()).env("NO_COLOR", "1");
    cmd
}

/// Writes a config pointing at the fixture restrictions, with the cache
/// kept inside `dir`
fn write_config(dir: &TempDir) -> PathBuf {
    let source = fixtures_path().join("private-apis.txt");
    let path = dir.path().join("lintconstraints.toml");
    fs::write(
        &path,
        format!(
            "target_sdk = 33\n\n[restrictions]\nsource = {:?}\ncache_dir = \"cache\"\ndata_version = \"fixture\"\n",
            source.display().to_string()
        ),
    )
    .unwrap();
    path
}

// ============================================================================
// API Level Commands
// ============================================================================

mod api_tests {
    use super::*;

    #[test]
    fn test_describe_combined_checks() {
        let dir = TempDir::new().unwrap();
        lintconstraints(&dir)
            .args(["api", "describe", ">= 21", "SDK_INT < 26"])
            .assert()
            .success()
            .stdout(predicate::str::contains("API level ≥ 21 and API level < 26"));
    }

    #[test]
    fn test_describe_inverted() {
        let dir = TempDir::new().unwrap();
        lintconstraints(&dir)
            .args(["api", "describe", "--invert", "SDK_INT >= 21"])
            .assert()
            .success()
            .stdout(predicate::str::contains("API level < 21"));
    }

    #[test]
    fn test_decode() {
        let dir = TempDir::new().unwrap();
        lintconstraints(&dir)
            .args(["api", "decode", "7fff0015"])
            .assert()
            .success()
            .stdout(predicate::str::contains("API level ≥ 21"));
    }

    #[test]
    fn test_decode_inverted_range() {
        let dir = TempDir::new().unwrap();
        lintconstraints(&dir)
            .args(["api", "decode", "5000a"])
            .assert()
            .success()
            .stdout(predicate::str::contains("API level ≥ 10 and API level < 5"));
    }

    #[test]
    fn test_json_output() {
        let dir = TempDir::new().unwrap();
        let output = lintconstraints(&dir)
            .args(["--format", "json", "api", "describe", ">= 21"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["serialized"], "7fff0015");
        assert_eq!(value["from"], 21);
        assert_eq!(value["empty"], false);
    }

    #[test]
    fn test_invalid_expression_fails() {
        let dir = TempDir::new().unwrap();
        lintconstraints(&dir)
            .args(["api", "describe", "SDK_INT != 21"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("cannot parse expression"));
    }

    #[test]
    fn test_empty_level_range_fails() {
        let dir = TempDir::new().unwrap();
        lintconstraints(&dir)
            .args(["api", "describe", "in 0 until 0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("cannot parse expression"));
    }
}

// ============================================================================
// Range Commands
// ============================================================================

mod range_tests {
    use super::*;

    #[test]
    fn test_value_outside_range() {
        let dir = TempDir::new().unwrap();
        lintconstraints(&dir)
            .args(["range", "check", "--from", "4", "--to", "7", "3"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Value must be ≥ 4 (was 3)"))
            .stdout(predicate::str::contains("Range"));
    }

    #[test]
    fn test_quiet_drops_summary() {
        let dir = TempDir::new().unwrap();
        lintconstraints(&dir)
            .args(["-q", "range", "check", "--from", "4", "--to", "7", "3"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Value must be ≥ 4 (was 3)"))
            .stdout(predicate::str::contains("1 error").not());
    }

    #[test]
    fn test_value_inside_range() {
        let dir = TempDir::new().unwrap();
        lintconstraints(&dir)
            .args(["range", "check", "--from", "4", "--to", "7", "5", "7"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No issues found!"));
    }

    #[test]
    fn test_negative_float_value() {
        let dir = TempDir::new().unwrap();
        lintconstraints(&dir)
            .args(["range", "check", "--float", "--from", "-90", "--to", "90", "-150.0"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Value must be ≥ -90.0 (was -150.0)"));
    }

    #[test]
    fn test_integer_against_float_range() {
        let dir = TempDir::new().unwrap();
        lintconstraints(&dir)
            .args(["range", "check", "--float", "--from", "10", "5"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Value must be ≥ 10.0 (was 5)"));
    }

    #[test]
    fn test_size_check() {
        let dir = TempDir::new().unwrap();
        lintconstraints(&dir)
            .args(["range", "size", "--exact", "5", "--unit", "length", "4"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Expected length 5 (was 4)"));
    }

    #[test]
    fn test_non_positive_multiple_is_rejected() {
        let dir = TempDir::new().unwrap();
        lintconstraints(&dir)
            .args(["range", "size", "--multiple", "0", "4"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--multiple must be positive"));
    }

    #[test]
    fn test_json_report_to_file() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("report.json");
        lintconstraints(&dir)
            .args(["--format", "json", "--output"])
            .arg(&report)
            .args(["range", "check", "--from", "0", "--to", "10", "11"])
            .assert()
            .code(1);

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["errors"], 1);
        assert_eq!(value["findings"][0]["code"], "LC001");
        assert_eq!(value["findings"][0]["issue"], "Range");
        assert_eq!(value["findings"][0]["message"], "Value must be ≤ 10 (was 11)");
    }
}

// ============================================================================
// Restriction Commands
// ============================================================================

mod restriction_tests {
    use super::*;

    #[test]
    fn test_build_writes_cache() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);
        lintconstraints(&dir)
            .arg("-c")
            .arg(&config)
            .args(["restrictions", "build"])
            .assert()
            .success()
            .stdout(predicate::str::contains("7 containers"))
            .stdout(predicate::str::contains("data version fixture"));

        assert!(dir.path().join("cache/private-apis-v1-fixture.bin").exists());
    }

    #[test]
    fn test_lookup_discouraged_member() {
        let dir = TempDir::new().unwrap();
        write_config(&dir);
        lintconstraints(&dir)
            .args(["restrictions", "lookup", "android.app.Activity", "mCalled"])
            .assert()
            .success()
            .stdout(predicate::str::contains("android.app.Activity#mCalled: GREY"))
            .stdout(predicate::str::contains("DiscouragedPrivateApi"));
    }

    #[test]
    fn test_lookup_blocked_method_fails() {
        let dir = TempDir::new().unwrap();
        write_config(&dir);
        lintconstraints(&dir)
            .args([
                "restrictions",
                "lookup",
                "dalvik.system.VMRuntime",
                "setHiddenApiExemptions",
                "([Ljava/lang/String;)V",
            ])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("BLACK"))
            .stdout(predicate::str::contains("forbidden when targeting API 28 and above"));
    }

    #[test]
    fn test_lookup_target_sdk_override() {
        let dir = TempDir::new().unwrap();
        write_config(&dir);
        let output = lintconstraints(&dir)
            .args(["--format", "json", "restrictions", "lookup", "android.app.Activity", "mResultCode"])
            .args(["--target-sdk", "27"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["findings"][0]["issue"], "DiscouragedPrivateApi");

        let output = lintconstraints(&dir)
            .args(["--format", "json", "restrictions", "lookup", "android.app.Activity", "mResultCode"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));
        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["findings"][0]["issue"], "SoonBlockedPrivateApi");
        assert_eq!(value["findings"][0]["severity"], "error");
    }

    #[test]
    fn test_lookup_source_flag_without_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".lintconstraints.yml"), "restrictions:\n  cache_dir: cache\n").unwrap();
        lintconstraints(&dir)
            .args(["restrictions", "lookup", "android.view.View", "mListenerInfo", "--source"])
            .arg(fixtures_path().join("private-apis.txt"))
            .assert()
            .success()
            .stdout(predicate::str::contains("GREY"));
    }

    #[test]
    fn test_lookup_internal_class() {
        let dir = TempDir::new().unwrap();
        write_config(&dir);
        lintconstraints(&dir)
            .args(["restrictions", "lookup", "com.android.internal.R$styleable", "Window"])
            .assert()
            .success()
            .stdout(predicate::str::contains("PrivateApi"))
            .stdout(predicate::str::contains("DiscouragedPrivateApi"));
    }

    #[test]
    fn test_missing_source_is_reported() {
        let dir = TempDir::new().unwrap();
        lintconstraints(&dir)
            .args(["restrictions", "build"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no restriction source configured"));
    }
}

mod completion_tests {
    use super::*;

    #[test]
    fn test_bash_completions() {
        let dir = TempDir::new().unwrap();
        lintconstraints(&dir)
            .args(["--completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("lintconstraints"));
    }
}
