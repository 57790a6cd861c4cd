//! End-to-end tests for the amalgamation pipeline over scratch header trees

use std::fs;
use std::path::Path;

use header_amalgam_core::{amalgamate, AmalgamConfig, AmalgamError, AmalgamOptions, Amalgamator};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write_unit(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn guarded(symbol: &str, body: &str) -> String {
    format!("#ifndef {symbol}\n#define {symbol}\n\n{body}\n\n#endif // {symbol}\n")
}

/// A depends on B, B depends on C, and only C pulls in <vector>
fn chain_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("include/CLArgs");
    write_unit(
        &root,
        "a.hpp",
        &guarded(
            "CLARGS_A_HPP",
            "#include <CLArgs/b.hpp>\n\nstruct A : B {};",
        ),
    );
    write_unit(
        &root,
        "b.hpp",
        &guarded("CLARGS_B_HPP", "#include <CLArgs/c.hpp>\n\nstruct B : C {};"),
    );
    write_unit(
        &root,
        "detail/c.hpp",
        &guarded("CLARGS_C_HPP", "#include <vector>\n\nstruct C { std::vector<int> v; };"),
    );
    dir
}

#[test]
fn test_chain_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let dir = chain_tree();
    let output = dir.path().join("clargs.hpp");

    let summary = amalgamate(
        &dir.path().join("include/CLArgs"),
        "MIT",
        false,
        &output,
        false,
        None,
    )?;

    assert_eq!(summary.order, vec!["c.hpp", "b.hpp", "a.hpp"]);
    assert_eq!(summary.external, vec!["vector"]);

    let text = fs::read_to_string(&output)?;
    assert_eq!(summary.bytes, text.len());
    assert_eq!(text.matches("#include <vector>").count(), 1);

    let include = text.find("#include <vector>").unwrap();
    let c = text.find("struct C").unwrap();
    let b = text.find("struct B").unwrap();
    let a = text.find("struct A").unwrap();
    assert!(include < c && c < b && b < a);
    Ok(())
}

#[test]
fn test_output_has_single_guard_and_no_unit_guards() -> Result<(), Box<dyn std::error::Error>> {
    let dir = chain_tree();
    let output = dir.path().join("clargs.hpp");
    amalgamate(&dir.path().join("include/CLArgs"), "MIT", true, &output, true, Some("1.0.0"))?;

    let text = fs::read_to_string(&output)?;
    for symbol in ["CLARGS_A_HPP", "CLARGS_B_HPP", "CLARGS_C_HPP"] {
        assert!(!text.contains(symbol), "{symbol} survived amalgamation");
    }
    assert!(!text.contains("#include <CLArgs/"));
    assert_eq!(text.matches("#ifndef ").count(), 1);
    assert_eq!(text.matches("#define CLARGS_CLARGS_HPP").count(), 1);
    assert_eq!(text.matches("#endif // CLARGS_CLARGS_HPP").count(), 1);
    assert!(text.ends_with("#endif // CLARGS_CLARGS_HPP\n"));
    assert!(!text.contains("\n\n\n"));
    assert!(!text.contains('\r'));
    assert!(text.contains(" *  Version: 1.0.0\n"));
    assert!(text.contains(" *  Generated: "));
    Ok(())
}

#[test]
fn test_runs_are_byte_identical_without_timestamp() -> Result<(), Box<dyn std::error::Error>> {
    let dir = chain_tree();
    let root = dir.path().join("include/CLArgs");
    let first = dir.path().join("first.hpp");
    let second = dir.path().join("second/first.hpp");
    fs::create_dir_all(second.parent().unwrap())?;

    amalgamate(&root, "MIT", true, &first, false, Some("2.0.1"))?;
    amalgamate(&root, "MIT", true, &second, false, Some("2.0.1"))?;

    assert_eq!(fs::read(&first)?, fs::read(&second)?);
    Ok(())
}

#[test]
fn test_cycle_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("units");
    write_unit(&root, "a.hpp", "#include <CLArgs/b.hpp>\nint a;\n");
    write_unit(&root, "b.hpp", "#include <CLArgs/a.hpp>\nint b;\n");
    let output = dir.path().join("out.hpp");
    fs::write(&output, "previous artifact\n").unwrap();

    let err = amalgamate(&root, "MIT", false, &output, false, None).unwrap_err();

    match err {
        AmalgamError::CyclicDependency { cycle } => {
            assert_eq!(cycle, vec!["a.hpp", "b.hpp", "a.hpp"]);
        }
        other => panic!("expected a cycle, got {other}"),
    }
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous artifact\n");
}

#[test]
fn test_missing_root_is_not_found() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.hpp");

    let err = amalgamate(&dir.path().join("missing"), "", false, &output, false, None).unwrap_err();

    assert!(matches!(err, AmalgamError::NotFound(_)));
    assert!(!output.exists());
}

#[test]
fn test_external_includes_sorted() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("units");
    write_unit(&root, "one.hpp", "#include <z.h>\n#include <a.h>\nint one;\n");
    write_unit(&root, "two.hpp", "#include <m.h>\n#include <a.h>\nint two;\n");

    let artifact = Amalgamator::new(AmalgamConfig::default())?.render(
        &root,
        "",
        "out.hpp",
        &AmalgamOptions::default(),
        None,
    )?;

    assert_eq!(artifact.external, vec!["a.h", "m.h", "z.h"]);
    let a = artifact.text.find("#include <a.h>").unwrap();
    let m = artifact.text.find("#include <m.h>").unwrap();
    let z = artifact.text.find("#include <z.h>").unwrap();
    assert!(a < m && m < z);
    Ok(())
}

#[test]
fn test_unknown_internal_include_survives_as_external() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("units");
    write_unit(&root, "a.hpp", "#include <CLArgs/generated.hpp>\nint a;\n");

    let artifact = Amalgamator::new(AmalgamConfig::default())?.render(
        &root,
        "",
        "out.hpp",
        &AmalgamOptions::default(),
        None,
    )?;

    assert_eq!(artifact.external, vec!["CLArgs/generated.hpp"]);
    assert_eq!(artifact.text.matches("#include <CLArgs/generated.hpp>").count(), 1);
    Ok(())
}

#[test]
fn test_custom_conventions() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("include/widgets");
    write_unit(
        &root,
        "button.h",
        "#ifndef WIDGETS_BUTTON_H\n#define WIDGETS_BUTTON_H\n#include <widgets/base.h>\nstruct Button : Base {};\n#endif\n",
    );
    write_unit(
        &root,
        "base.h",
        "#ifndef WIDGETS_BASE_H\n#define WIDGETS_BASE_H\n#include <stdint.h>\nstruct Base {};\n#endif\n",
    );
    write_unit(&root, "ignored.hpp", "struct Ignored {};\n");

    let config = AmalgamConfig::parse(
        r#"
namespace = "widgets"
guard_prefix = "WIDGETS"
extension = "h"
banner = "Widgets"
"#,
    )?;
    let output = dir.path().join("widgets.h");
    let summary = Amalgamator::new(config)?.run(&root, "", &output, &AmalgamOptions::default())?;

    assert_eq!(summary.order, vec!["base.h", "button.h"]);
    let text = fs::read_to_string(&output)?;
    assert!(text.starts_with("#ifndef WIDGETS_WIDGETS_H\n"));
    assert!(!text.contains("WIDGETS_BASE_H"));
    assert!(!text.contains("Ignored"));
    assert!(text.contains("#include <stdint.h>"));
    Ok(())
}
