//! End-to-end tests for `mkdep update` against a realistic source tree.

use predicates::prelude::*;

mod common;
use common::{MAKEFILE_SKELETON, TestProject};

/// Build the fixture tree used by the full-scenario tests: a utility
/// library, a client library with an implementation override, a binary,
/// and a test binary.
fn full_project() -> TestProject {
    let project = TestProject::new();
    project.write(
        "mkdep.toml",
        r#"
[[libraries]]
path = "wikiutil/libwikiutil.a"
sort-key = 1
roots = ["wikiutil/"]
recursive = false

[[libraries]]
path = "mwclient/libmwclient.a"
sort-key = 2
roots = ["mwclient/"]
exclude = ["mwclient/tests/"]
"#,
    );
    project.write("Makefile", MAKEFILE_SKELETON);

    project.write("wikiutil/date.h", "");
    project.write("wikiutil/date.cpp", "#include \"date.h\"\n");
    project.write(
        "wikiutil/date_test.cpp",
        "#include \"date.h\"\nint main() {\n  return 0;\n}\n",
    );

    project.write("mwclient/wiki.h", "#include <curl/curl.h>\n");
    project.write("mwclient/wiki.cpp", "#include \"wiki.h\"\n");
    project.write(
        "mwclient/wiki_read_api.cpp",
        "// IMPLEMENTS: mwclient/wiki.h\n#include \"wiki.h\"\n",
    );

    project.write(
        "orlodrimbot/bot.cpp",
        "#include \"mwclient/wiki.h\"\n#include \"wikiutil/date.h\"\nint main() {\n  return 0;\n}\n",
    );
    project
}

#[test]
fn test_update_generates_rules_and_lists() {
    let project = full_project();
    project.mkdep(&["update"]).assert().success().stdout(predicate::str::contains("Updated"));

    let makefile = project.read("Makefile");

    // Hand-maintained text survives.
    assert!(makefile.starts_with("CXX=g++\nCXXFLAGS=-std=c++17 -Wall\n"));
    assert!(makefile.contains("all: $(BINARIES)\n"));
    assert!(makefile.ends_with(".PHONY: all test\n"));

    // Target lists.
    assert!(makefile.contains("BINARIES= \\\n\torlodrimbot/bot\n"));
    assert!(makefile.contains("TESTS= \\\n\twikiutil/date_test\n"));

    // Compile rule with the transitive header closure.
    assert!(makefile.contains(
        "orlodrimbot/bot.o: orlodrimbot/bot.cpp mwclient/wiki.h wikiutil/date.h\n\
         \t$(CXX) $(CXXFLAGS) -c -o $@ $<\n"
    ));

    // Link rule: own object first, then archives by sort key, then the
    // external library flag accumulated from mwclient/wiki.h.
    assert!(makefile.contains(
        "orlodrimbot/bot: orlodrimbot/bot.o wikiutil/libwikiutil.a mwclient/libmwclient.a\n\
         \t$(CXX) -o $@ $^ -lcurl\n"
    ));

    // The test binary links against the utility archive.
    assert!(makefile.contains(
        "wikiutil/date_test: wikiutil/date_test.o wikiutil/libwikiutil.a\n\
         \t$(CXX) -o $@ $^\n"
    ));

    // Archive rules: both implementing sources of wiki.h are bundled;
    // the test source is not archived.
    assert!(makefile.contains(
        "mwclient/libmwclient.a: mwclient/wiki.o mwclient/wiki_read_api.o\n\tar rcs $@ $^\n"
    ));
    assert!(makefile.contains("wikiutil/libwikiutil.a: wikiutil/date.o\n\tar rcs $@ $^\n"));
    assert!(!makefile.contains("libwikiutil.a: wikiutil/date.o wikiutil/date_test.o"));
}

#[test]
fn test_update_is_idempotent() {
    let project = full_project();
    project.mkdep(&["update"]).assert().success();
    let first = project.read("Makefile");

    project
        .mkdep(&["update"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already up to date"));
    let second = project.read("Makefile");

    assert_eq!(first, second);
}

#[test]
fn test_update_two_units_splice_scenario() {
    // Two source units with no includes between them: exactly two compile
    // rules land between the rule markers, everything else byte-identical.
    let project = TestProject::with_skeleton();
    project.write("alpha.cpp", "");
    project.write("beta.cpp", "");

    project.mkdep(&["update"]).assert().success();

    let makefile = project.read("Makefile");
    let expected_rules = "# autogenerated-rules-begin\n\
                          alpha.o: alpha.cpp\n\t$(CXX) $(CXXFLAGS) -c -o $@ $<\n\
                          beta.o: beta.cpp\n\t$(CXX) $(CXXFLAGS) -c -o $@ $<\n\
                          # autogenerated-rules-end\n";
    assert!(makefile.contains(expected_rules));
    assert!(makefile.contains("all: $(BINARIES)\n"));
    assert!(makefile.ends_with(".PHONY: all test\n"));
}

#[test]
fn test_update_refreshes_stale_regions() {
    let project = TestProject::with_skeleton();
    project.write("tool.cpp", "int main() {\n  return 0;\n}\n");

    project.mkdep(&["update"]).assert().success();

    // A newly added file must show up on the next run.
    project.write("extra.cpp", "");
    project.mkdep(&["update"]).assert().success().stdout(predicate::str::contains("Updated"));

    let makefile = project.read("Makefile");
    assert!(makefile.contains("extra.o: extra.cpp\n"));
}
