//! Developer tasks (schema generation, fixture conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    match manifest_dir.parent() {
        Some(parent) => parent.to_path_buf(),
        None => manifest_dir,
    }
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_org_policy_schema() -> schemars::Schema {
    schema_for!(provguard_settings::OrgPolicyV1)
}

fn generate_repo_policy_schema() -> schemars::Schema {
    schema_for!(provguard_settings::RepoPolicyV1)
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(provguard_types::ProvguardReport)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "provguard.org-policy.v1.json",
            generate: generate_org_policy_schema,
        },
        SchemaSpec {
            filename: "provguard.repo-policy.v1.json",
            generate: generate_repo_policy_schema,
        },
        SchemaSpec {
            filename: "provguard.report.v1.json",
            generate: generate_report_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that schemas/ matches what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Validate every fixture pair against the generated document schemas, then
/// load it; fixtures that declare `load_error` must fail with that rule.
fn conform() -> anyhow::Result<()> {
    let org_schema = serde_json::to_value(generate_org_policy_schema())?;
    let repo_schema = serde_json::to_value(generate_repo_policy_schema())?;
    let org_validator = jsonschema::validator_for(&org_schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile org policy schema: {e}"))?;
    let repo_validator = jsonschema::validator_for(&repo_schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile repo policy schema: {e}"))?;

    let mut dirs: Vec<PathBuf> = fs::read_dir(fixtures_dir())
        .context("Failed to read tests/fixtures/")?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.join("org.json").exists())
        .collect();
    dirs.sort();

    let mut errors = Vec::new();
    for dir in &dirs {
        let name = dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let org = read_json(&dir.join("org.json"))?;
        let repo = read_json(&dir.join("repo.json"))?;
        for err in org_validator.iter_errors(&org) {
            errors.push(format!("{name}/org.json: schema validation: {err}"));
        }
        for err in repo_validator.iter_errors(&repo) {
            errors.push(format!("{name}/repo.json: schema validation: {err}"));
        }

        let expected = read_json(&dir.join("expected.json"))?;
        let expected_rule = expected.get("load_error").and_then(|v| v.as_str());
        let docs = [
            fs::read(dir.join("org.json"))?,
            fs::read(dir.join("repo.json"))?,
        ];
        match (provguard_settings::load(&docs), expected_rule) {
            (Ok(_), None) => println!("  ✓ {name} loads"),
            (Err(err), Some(rule)) if err.rule() == Some(rule) => {
                println!("  ✓ {name} is rejected with {rule}")
            }
            (Ok(_), Some(rule)) => errors.push(format!("{name}: expected load error {rule}")),
            (Err(err), _) => errors.push(format!("{name}: {err}")),
        }
    }

    if dirs.is_empty() {
        bail!("No fixtures found in {}", fixtures_dir().display());
    }
    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {} fixtures pass conformance checks!", dirs.len());
    Ok(())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate tests/fixtures policies against schemas and the loader");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
