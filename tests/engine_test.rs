// tests/engine_test.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use verbump::domain::{BumpMode, UpdateOutcome};
use verbump::engine::{BumpEngine, BumpOutcome, BumpRequest};
use verbump::error::BumpError;
use verbump::reporter::{Level, RecordingReporter};
use verbump::workspace::Workspace;

struct Project {
    dir: TempDir,
}

impl Project {
    fn new(version: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            format!("{{\n  \"name\": \"app\",\n  \"version\": \"{}\"\n}}\n", version),
        )
        .unwrap();
        Project { dir }
    }

    fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.dir.path().join(rel)).unwrap()
    }

    fn engine(&self, dry_run: bool) -> (BumpEngine, Arc<RecordingReporter>) {
        let reporter = Arc::new(RecordingReporter::new());
        let workspace = Workspace::new(self.dir.path())
            .with_concurrency(2)
            .with_dry_run(dry_run);
        let engine = BumpEngine::new(workspace, reporter.clone()).unwrap();
        (engine, reporter)
    }
}

fn request(mode: BumpMode, filters: &[&str]) -> BumpRequest {
    BumpRequest {
        mode,
        filters: filters.iter().map(|f| f.to_string()).collect(),
        ..BumpRequest::default()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

fn bumped(outcome: BumpOutcome) -> verbump::domain::BumpReport {
    match outcome {
        BumpOutcome::Bumped(report) => report,
        other => panic!("expected a bump, got {:?}", other),
    }
}

#[test]
fn test_patch_bump_updates_manifest_and_source() {
    let project = Project::new("1.2.3");
    project.write(
        "src/version.ts",
        "export default {\n  name: \"app\",\n  version: \"1.2.3\",\n};\n",
    );
    let (engine, _) = project.engine(false);

    let report = bumped(
        engine
            .bump(&request(BumpMode::Patch, &["package.json", "src/version.ts"]))
            .unwrap(),
    );

    assert_eq!(report.from, "1.2.3");
    assert_eq!(report.to, "1.2.4");
    assert_eq!(report.modified_files().len(), 2);
    assert!(project.read("package.json").contains("\"version\": \"1.2.4\""));
    assert_eq!(
        project.read("src/version.ts"),
        "export default {\n  name: \"app\",\n  version: \"1.2.4\",\n};\n"
    );
}

#[test]
fn test_default_filters_select_manifest_only() {
    let project = Project::new("0.1.0");
    project.write("version.ts", "export const version = \"0.1.0\";\n");
    let (engine, _) = project.engine(false);

    let report = bumped(engine.bump(&request(BumpMode::Minor, &[])).unwrap());

    assert_eq!(report.results.len(), 1);
    assert_eq!(file_name(&report.results[0].file), "package.json");
    assert!(project.read("package.json").contains("\"0.2.0\""));
    assert_eq!(project.read("version.ts"), "export const version = \"0.1.0\";\n");
}

#[test]
fn test_manual_without_target_touches_nothing() {
    let project = Project::new("1.2.3");
    project.write("src/version.ts", "export const version = \"1.2.3\";\n");
    let (engine, _) = project.engine(false);

    let err = engine
        .bump(&request(BumpMode::Manual, &["src/version.ts"]))
        .unwrap_err();

    assert!(matches!(err, BumpError::InvalidCustomVersion(_)));
    assert!(err.is_version_resolution());
    assert!(project.read("package.json").contains("1.2.3"));
    assert_eq!(project.read("src/version.ts"), "export const version = \"1.2.3\";\n");
}

#[test]
fn test_invalid_existing_version_aborts() {
    let project = Project::new("not-a-version");
    let (engine, _) = project.engine(false);

    let err = engine.bump(&request(BumpMode::Patch, &[])).unwrap_err();
    assert!(matches!(err, BumpError::InvalidExistingVersion(_)));
}

#[test]
fn test_missing_version_field() {
    let project = Project::new("1.0.0");
    project.write("package.json", "{\"name\": \"app\"}\n");
    let (engine, _) = project.engine(false);

    let err = engine.bump(&request(BumpMode::Patch, &[])).unwrap_err();
    assert!(matches!(err, BumpError::NoVersionField(_)));
}

#[test]
fn test_major_bump_leaves_file_already_at_target() {
    let project = Project::new("2.0.0");
    project.write("a.ts", "export const version = \"2.0.0\";\n");
    project.write("b.ts", "export const version = \"3.0.0\";\n");
    let (engine, _) = project.engine(false);

    let report = bumped(
        engine
            .bump(&request(BumpMode::Major, &["package.json", "*.ts"]))
            .unwrap(),
    );

    assert_eq!(report.to, "3.0.0");
    let modified: Vec<String> = report.modified_files().into_iter().map(file_name).collect();
    assert_eq!(modified, vec!["a.ts", "package.json"]);

    let b = report
        .results
        .iter()
        .find(|r| file_name(&r.file) == "b.ts")
        .unwrap();
    assert_eq!(b.outcome, UpdateOutcome::Unchanged);
    assert_eq!(project.read("a.ts"), "export const version = \"3.0.0\";\n");
}

#[test]
fn test_stem_filter_skips_build_output() {
    let project = Project::new("1.0.0");
    project.write("src/version.ts", "export const version = \"1.0.0\";\n");
    project.write("dist/version.js", "exports.version = \"1.0.0\";\n");
    let (engine, _) = project.engine(false);

    let report = bumped(engine.bump(&request(BumpMode::Patch, &["version"])).unwrap());

    assert_eq!(report.results.len(), 1);
    assert!(report.results[0].file.ends_with("src/version.ts"));
    assert_eq!(project.read("src/version.ts"), "export const version = \"1.0.1\";\n");
    assert_eq!(project.read("dist/version.js"), "exports.version = \"1.0.0\";\n");
}

#[test]
fn test_gitignore_rules_are_honored() {
    let project = Project::new("1.0.0");
    project.write(".gitignore", "generated/\n");
    project.write("src/version.ts", "export const version = \"1.0.0\";\n");
    project.write("generated/version.ts", "export const version = \"1.0.0\";\n");
    let (engine, _) = project.engine(false);

    let report = bumped(engine.bump(&request(BumpMode::Patch, &["version"])).unwrap());

    assert_eq!(report.results.len(), 1);
    assert_eq!(
        project.read("generated/version.ts"),
        "export const version = \"1.0.0\";\n"
    );
}

#[test]
fn test_reapplying_plan_is_noop() {
    let project = Project::new("1.4.0");
    project.write("src/meta.py", "__version__ = '1.4.0'\n");
    let (engine, _) = project.engine(false);
    let req = request(BumpMode::Minor, &["package.json", "src/meta.py"]);

    let plan = engine.plan(&req).unwrap();
    let first = engine.apply(&plan).unwrap();
    assert_eq!(first.modified_files().len(), 2);
    let after_first = project.read("src/meta.py");
    assert_eq!(after_first, "__version__ = '1.5.0'\n");

    let second = engine.apply(&plan).unwrap();
    assert!(second.modified_files().is_empty());
    assert_eq!(project.read("src/meta.py"), after_first);
}

#[test]
fn test_target_equal_to_current_is_noop() {
    let project = Project::new("2.0.0");
    project.write("a.ts", "export const version = \"1.0.0\";\n");
    let (engine, _) = project.engine(false);

    let req = BumpRequest {
        custom_version: Some("2.0.0".to_string()),
        ..request(BumpMode::Manual, &["a.ts"])
    };
    let outcome = engine.bump(&req).unwrap();

    assert_eq!(
        outcome,
        BumpOutcome::Unchanged {
            version: "2.0.0".to_string()
        }
    );
    assert_eq!(project.read("a.ts"), "export const version = \"1.0.0\";\n");
}

#[test]
fn test_partial_failure_keeps_other_writes() {
    let project = Project::new("1.0.0");
    project.write("a.ts", "export const version = \"1.0.0\";\n");
    let locked = project.write("k.ts", "export const version = \"1.0.0\";\n");
    project.write("z.ts", "export const version = \"1.0.0\";\n");
    let mut perms = fs::metadata(&locked).unwrap().permissions();
    perms.set_readonly(true);
    fs::set_permissions(&locked, perms).unwrap();

    let (engine, reporter) = project.engine(false);
    let err = engine.bump(&request(BumpMode::Patch, &["*.ts"])).unwrap_err();

    match err {
        BumpError::AggregateUpdateFailure { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(file_name(&failures[0].file), "k.ts");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(project.read("a.ts"), "export const version = \"1.0.1\";\n");
    assert_eq!(project.read("z.ts"), "export const version = \"1.0.1\";\n");
    assert_eq!(project.read("k.ts"), "export const version = \"1.0.0\";\n");
    assert_eq!(reporter.at(Level::Error).len(), 1);
}

#[test]
fn test_dry_run_writes_nothing() {
    let project = Project::new("1.0.0");
    let source = project.write("src/version.ts", "export const version = \"1.0.0\";\n");
    let mtime = fs::metadata(&source).unwrap().modified().unwrap();
    let (engine, reporter) = project.engine(true);

    let report = bumped(
        engine
            .bump(&request(BumpMode::Patch, &["package.json", "src/version.ts"]))
            .unwrap(),
    );

    assert!(report.dry_run);
    assert!(report
        .results
        .iter()
        .all(|r| r.outcome == UpdateOutcome::WouldUpdate));
    assert_eq!(project.read("src/version.ts"), "export const version = \"1.0.0\";\n");
    assert!(project.read("package.json").contains("1.0.0"));
    assert_eq!(fs::metadata(&source).unwrap().modified().unwrap(), mtime);
    assert!(reporter
        .at(Level::Info)
        .iter()
        .any(|m| m.contains("[dry-run]")));
}

#[test]
fn test_disabled_does_nothing() {
    let project = Project::new("1.0.0");
    let (engine, _) = project.engine(false);

    let req = BumpRequest {
        disabled: true,
        ..request(BumpMode::Major, &[])
    };
    assert_eq!(engine.bump(&req).unwrap(), BumpOutcome::Disabled);
    assert!(project.read("package.json").contains("1.0.0"));
}

#[test]
fn test_alternate_version_source() {
    let project = Project::new("0.0.1");
    project.write("version.go", "const Version = \"4.1.0\"\n");
    let (engine, _) = project.engine(false);

    let req = BumpRequest {
        source: Some(PathBuf::from("version.go")),
        ..request(BumpMode::Patch, &["version.go"])
    };
    let report = bumped(engine.bump(&req).unwrap());

    assert_eq!(report.from, "4.1.0");
    assert_eq!(project.read("version.go"), "const Version = \"4.1.1\"\n");
    assert!(project.read("package.json").contains("0.0.1"));
}

#[test]
fn test_analyzed_bump_cancelled() {
    let project = Project::new("1.0.0");
    project.write("src/version.ts", "export const version = \"1.0.0\";\n");
    project.write("README.md", "version 1.0.0\n");
    let (engine, reporter) = project.engine(false);

    let mut seen = 0;
    let outcome = engine
        .bump_analyzed(
            &request(BumpMode::Patch, &["src/version.ts", "README.md"]),
            |analysis| {
                seen = analysis.len();
                false
            },
        )
        .unwrap();

    assert!(matches!(outcome, BumpOutcome::Cancelled { .. }));
    assert_eq!(seen, 2);
    assert_eq!(project.read("src/version.ts"), "export const version = \"1.0.0\";\n");
    assert_eq!(reporter.at(Level::Warn).len(), 1);
}

#[test]
fn test_analyzed_bump_updates_supported_files_only() {
    let project = Project::new("1.0.0");
    project.write("src/version.ts", "export const version = \"0.9.0\";\n");
    project.write("README.md", "version 1.0.0\n");
    let (engine, reporter) = project.engine(false);

    let report = bumped(
        engine
            .bump_analyzed(
                &request(BumpMode::Patch, &["src/version.ts", "README.md"]),
                |_| true,
            )
            .unwrap(),
    );

    assert_eq!(report.results.len(), 1);
    assert_eq!(project.read("src/version.ts"), "export const version = \"1.0.1\";\n");
    assert_eq!(project.read("README.md"), "version 1.0.0\n");
    // one unsupported file, one mismatch
    assert_eq!(reporter.at(Level::Warn).len(), 2);
}

#[test]
fn test_analyzed_bump_skips_prompt_when_clean() {
    let project = Project::new("1.0.0");
    project.write("src/version.ts", "export const version = \"1.0.0\";\n");
    let (engine, _) = project.engine(false);

    let outcome = engine
        .bump_analyzed(&request(BumpMode::Patch, &["src/version.ts"]), |_| {
            panic!("confirmation should not be requested")
        })
        .unwrap();

    assert!(matches!(outcome, BumpOutcome::Bumped(_)));
}

#[test]
fn test_check_reports_mismatch_without_writing() {
    let project = Project::new("1.0.0");
    project.write("a.ts", "export const version = \"1.0.0\";\n");
    project.write("b.ts", "export const version = \"0.9.0\";\n");
    let (engine, _) = project.engine(false);

    let (current, analysis) = engine.check(&request(BumpMode::Patch, &["*.ts"])).unwrap();

    assert_eq!(current, "1.0.0");
    assert_eq!(analysis.len(), 2);
    let mismatched: Vec<String> = analysis
        .iter()
        .filter(|r| r.version_mismatch)
        .map(|r| file_name(&r.file))
        .collect();
    assert_eq!(mismatched, vec!["b.ts"]);
    assert_eq!(project.read("b.ts"), "export const version = \"0.9.0\";\n");
}

#[test]
fn test_nested_manifest_version_is_not_the_authority() {
    let project = Project::new("1.2.3");
    project.write(
        "package.json",
        "{\n  \"publishConfig\": { \"version\": \"0.0.1\" },\n  \"version\": \"1.2.3\"\n}\n",
    );
    let (engine, _) = project.engine(false);

    let report = bumped(engine.bump(&request(BumpMode::Patch, &[])).unwrap());

    assert_eq!(report.modified_files().len(), 1);
    assert_eq!(
        project.read("package.json"),
        "{\n  \"publishConfig\": { \"version\": \"0.0.1\" },\n  \"version\": \"1.2.4\"\n}\n"
    );

    let next = bumped(engine.bump(&request(BumpMode::Patch, &[])).unwrap());
    assert_eq!(next.from, "1.2.4");
    assert_eq!(next.to, "1.2.5");
}

#[test]
fn test_unrelated_version_property_is_preserved() {
    let project = Project::new("1.2.3");
    project.write(
        "src/meta.ts",
        "export const version = \"1.2.3\";\nexport const peer = { name: \"react\", version: \"18.2.0\" };\n",
    );
    let (engine, _) = project.engine(false);

    bumped(engine.bump(&request(BumpMode::Patch, &["src/meta.ts"])).unwrap());

    assert_eq!(
        project.read("src/meta.ts"),
        "export const version = \"1.2.4\";\nexport const peer = { name: \"react\", version: \"18.2.0\" };\n"
    );
}

#[test]
fn test_stale_file_untouched_without_confirmation() {
    let project = Project::new("1.0.0");
    project.write("src/version.ts", "export const version = \"0.9.0\";\n");
    let (engine, _) = project.engine(false);

    let report = bumped(engine.bump(&request(BumpMode::Patch, &["src/version.ts"])).unwrap());

    assert_eq!(report.results[0].outcome, UpdateOutcome::Unchanged);
    assert_eq!(project.read("src/version.ts"), "export const version = \"0.9.0\";\n");
}
