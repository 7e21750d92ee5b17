use std::fmt::Write as _;
use std::path::Path;

/// Generates one test per `tests/fixtures/*.md` file. Every fixture must
/// have a `.trace` file next to it holding the expected compiler events,
/// one per line; both files are embedded into the generated test.
fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let fixtures_dir = Path::new(&manifest_dir).join("tests/fixtures");

    let mut inputs: Vec<_> = std::fs::read_dir(&fixtures_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|path| path.extension().is_some_and(|e| e == "md"))
        .collect();
    inputs.sort();

    let mut code = String::from("mod fixtures {\n    use super::fixture_test;\n");
    for input in inputs {
        let trace = input.with_extension("trace");
        assert!(
            trace.exists(),
            "fixture {} has no matching .trace file",
            input.display()
        );

        let name = input.file_stem().unwrap().to_str().unwrap().replace('-', "_");
        write!(
            code,
            r#"
    #[test]
    fn {name}() {{
        fixture_test(
            "{name}",
            include_str!({input:?}),
            include_str!({trace:?}),
        );
    }}
"#
        )
        .unwrap();
    }
    code.push_str("}\n");

    std::fs::write(Path::new(&out_dir).join("fixture_tests.rs"), code).unwrap();
    println!("cargo::rerun-if-changed=tests/fixtures");
}
