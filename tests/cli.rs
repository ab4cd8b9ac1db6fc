//! Integration test suite for `jpp` CLI
use assert_cmd::Command;

const CLINICS: &str = "tests/data/clinics.json";

/// Helper function to run the `jpp` binary with the given arguments and
/// return a [`assert_cmd::assert::Assert`].
fn run_main(args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd =
        Command::cargo_bin("jpp").expect("Failed to find main binary");
    cmd.arg("--no-color").args(args);
    cmd.assert()
}

/// Stdout of a successful run.
fn stdout_of(args: &[&str]) -> String {
    let assert = run_main(args).success().code(0);
    String::from_utf8(assert.get_output().stdout.clone())
        .expect("Invalid UTF-8 output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn parent_key() {
        let out = stdout_of(&[
            "$.*[@.name='Kendall Yards Medical Office'].@parent",
            CLINICS,
        ]);
        assert_eq!(out, "\"innerClinic\"\n");
    }

    #[test]
    fn parent_key_through_array() {
        let out = stdout_of(&[
            "$.*[@.name='Riverfront Medical Center'].innerClinic.*[@.name='Northpointe Medical Office'].@parent",
            CLINICS,
        ]);
        assert_eq!(out.trim(), "\"innerClinics\"");
    }

    #[test]
    fn object_result_is_json() {
        let out = stdout_of(&[
            "$.*[@.name='Puyallup Medical Center']",
            CLINICS,
        ]);
        let clinic: Value =
            serde_json::from_str(&out).expect("Failed to parse output JSON");
        assert_eq!(clinic["city"], "Puyallup");
        assert_eq!(clinic["zip"], "99991");
    }

    #[test]
    fn compact_output() {
        let out = stdout_of(&[
            "--compact",
            "$.*[@.name='Riverfront Medical Center'].innerClinic",
            CLINICS,
        ]);
        assert_eq!(out.lines().count(), 1);
        let inner: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(inner["name"], "Kendall Yards Medical Office");
    }

    #[test]
    fn reads_stdin() {
        let mut cmd = Command::cargo_bin("jpp").unwrap();
        let assert = cmd
            .args(["--no-color", "$.*[@.id='b'].@parent"])
            .write_stdin(r#"{"list": [{"id": "a"}], "named": {"id": "b"}}"#)
            .assert()
            .success();
        let out =
            String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        assert_eq!(out.trim(), "\"named\"");
    }

    #[test]
    fn literal_key_condition_is_not_evaluated() {
        let out = stdout_of(&[
            "$.*[@.name='Riverfront Medical Center'].innerClinic[@.name='Nowhere'].city",
            CLINICS,
        ]);
        assert_eq!(out.trim(), "\"Spokane\"");
    }

    #[test]
    fn no_match_prints_nothing() {
        let out = stdout_of(&["$.*[@.name='Nowhere Clinic'].city", CLINICS]);
        assert!(
            out.trim().is_empty(),
            "Expected no output for missing value, got: {out:?}"
        );
    }

    #[test]
    fn all_matches() {
        let out = stdout_of(&["--all", "--count", "$.clinics.*.city", CLINICS]);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("Found matches: 10"));
        let cities: Vec<&str> = lines.collect();
        assert_eq!(cities.len(), 10);
        assert_eq!(cities[0], "\"Tacoma\"");
    }

    #[test]
    fn kind_accepts_matching_result() {
        let out = stdout_of(&[
            "--kind",
            "string",
            "$.*[@.name='Tacoma Medical Center'].zip",
            CLINICS,
        ]);
        assert_eq!(out.trim(), "\"92848\"");
    }

    #[test]
    fn kind_mismatch_fails() {
        let assert = run_main(&["--kind", "object", "$.clinics", CLINICS]);
        let output = assert.failure().code(1).get_output().stderr.clone();
        let stderr = String::from_utf8(output).unwrap();
        assert!(stderr.contains("expected object, found array"), "{stderr}");
    }

    #[test]
    fn malformed_path() {
        for path in [
            "$*[@.name='x']",
            "$.*.",
            "$.*[]",
            "$.@parent",
            "$.a.@parent.b",
        ] {
            run_main(&[path, CLINICS]).failure().code(1);
        }
    }

    #[test]
    fn invalid_regex_condition() {
        run_main(&["$.*[@.name='(']", CLINICS]).failure().code(1);
    }

    #[test]
    fn nonexistent_file() {
        run_main(&["$.a", "tests/data/missing.json"]).failure().code(1);
    }

    #[test]
    fn invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.json");
        std::fs::write(&file, "{\"a\": [1, 2,]}").unwrap();
        run_main(&["$.a", file.to_str().unwrap()]).failure().code(1);
    }

    #[test]
    fn generate_man_pages() {
        let dir = tempfile::tempdir().unwrap();
        let out = stdout_of(&[
            "generate",
            "man",
            "--output-dir",
            dir.path().to_str().unwrap(),
        ]);
        assert!(out.contains("Generated:"));
        assert!(dir.path().join("jpp.1").exists());
        assert!(dir.path().join("jpp-generate.1").exists());
    }

    #[test]
    fn generate_completions() {
        let out = stdout_of(&["generate", "shell", "bash"]);
        assert!(out.contains("jpp"));
    }
}
