// tests/path_filter.rs

mod common;

use proptest::prelude::*;

use devwatch::watch::path_utils::{clean_path, parent_dir};
use devwatch::watch::{PathFilter, DEFAULT_IGNORED};

#[test]
fn default_filter_ignores_vcs_packages_and_output() {
    let filter = PathFilter::default();

    assert!(filter.is_ignored(".git"));
    assert!(filter.is_ignored(".git/objects/ab"));
    assert!(filter.is_ignored("node_modules/react/index.js"));
    assert!(filter.is_ignored("public/app.js"));

    assert!(!filter.is_ignored("src/main.go"));
    assert!(!filter.is_ignored("assets/javascripts/app.js"));
}

#[test]
fn matching_is_case_insensitive() {
    let filter = PathFilter::default();
    assert!(filter.is_ignored("NODE_MODULES/x.js"));
    assert!(filter.is_ignored("Public/Index.html"));
}

#[test]
fn paths_are_cleaned_before_matching() {
    let filter = PathFilter::default();
    assert!(filter.is_ignored("./node_modules/x.js"));
    assert!(filter.is_ignored("src/../node_modules/x.js"));
    assert!(filter.is_ignored("node_modules//x.js"));
}

#[test]
fn prefix_match_is_plain_string_prefix() {
    // "public" also covers siblings that merely start with it.
    let filter = PathFilter::default();
    assert!(filter.is_ignored("publications/draft.md"));
}

#[test]
fn custom_prefixes_are_normalized() {
    let filter = PathFilter::new(["./Vendor/", "build\\out", "."]);
    assert_eq!(filter.prefixes(), ["vendor", "build/out"]);
    assert!(filter.is_ignored("vendor/github.com/x/y.go"));
    assert!(filter.is_ignored("build/out/app"));
    assert!(!filter.is_ignored("src/app.go"));
}

#[test]
fn default_ignored_list() {
    assert_eq!(DEFAULT_IGNORED, [".git", "node_modules", "public"]);
}

#[test]
fn clean_path_cases() {
    assert_eq!(clean_path(""), ".");
    assert_eq!(clean_path("./"), ".");
    assert_eq!(clean_path("a//b/./c/"), "a/b/c");
    assert_eq!(clean_path("a/b/../c"), "a/c");
    assert_eq!(clean_path("../a"), "../a");
    assert_eq!(clean_path("/../a"), "/a");
}

#[test]
fn parent_dir_cases() {
    assert_eq!(parent_dir("main.go"), ".");
    assert_eq!(parent_dir("foo/bar.go"), "foo");
    assert_eq!(parent_dir("./foo/baz/qux.go"), "foo/baz");
    assert_eq!(parent_dir("/main.go"), "/");
}

proptest! {
    #[test]
    fn anything_below_an_ignored_prefix_is_ignored(
        prefix in prop::sample::select(DEFAULT_IGNORED.to_vec()),
        rest in "[a-zA-Z0-9_]{1,8}(/[a-zA-Z0-9_]{1,8}(\\.[a-z]{1,3})?){0,3}",
    ) {
        let filter = PathFilter::default();
        let path = format!("{prefix}/{rest}");
        prop_assert!(filter.is_ignored(&path));
        prop_assert!(filter.is_ignored(&path.to_uppercase()));
    }

    #[test]
    fn clean_path_is_idempotent(path in "[a-z./]{0,20}") {
        let once = clean_path(&path);
        prop_assert_eq!(clean_path(&once), once.clone());
    }
}
