//! End-to-end tests for config synthesis (`--create-config`).

mod common;
use common::prelude::*;

use edm_tools::manifest::{load, DependencyEntry, DependencyTable};

#[test]
fn test_repository_on_main_with_allowed_remote() {
    let fixture = TestFixture::new();
    let remote = fixture.remote("foo");
    let checkout = fixture.clone_into(&remote, "checkout", "foo");
    git(
        &checkout,
        &["remote", "set-url", "origin", "git@github.com:EVerest/foo.git"],
    );

    fixture
        .edm()
        .args(["--working_dir", "checkout", "--create-config", "config.yaml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Successfully saved config"));

    let mut expected = DependencyTable::new();
    expected.insert(
        "foo".to_string(),
        DependencyEntry::new("git@github.com:EVerest/foo.git", Some("main")),
    );
    assert_eq!(load(&fixture.path().join("config.yaml")).unwrap(), expected);
}

#[test]
fn test_external_remote_needs_flag() {
    let fixture = TestFixture::new();
    let remote = fixture.remote("ext");
    fixture.clone_into(&remote, "checkout", "ext");

    fixture
        .edm()
        .args(["--working_dir", "checkout", "--create-config", "config.yaml"])
        .assert()
        .success();
    assert!(load(&fixture.path().join("config.yaml")).unwrap().is_empty());

    fixture
        .edm()
        .args([
            "--working_dir",
            "checkout",
            "--create-config",
            "config.yaml",
            "--external-in-config",
        ])
        .assert()
        .success();
    let config = load(&fixture.path().join("config.yaml")).unwrap();
    assert_eq!(config["ext"].git, remote.display().to_string());
}

#[test]
fn test_detached_checkout_records_tag_and_custom_pattern() {
    let fixture = TestFixture::new();
    let remote = fixture.remote("foo");
    let checkout = fixture.clone_into(&remote, "checkout", "foo");
    git(&checkout, &["checkout", "-q", "v1.0"]);
    fixture.child("checkout/not-a-repo").create_dir_all().unwrap();

    fixture
        .edm()
        .args([
            "--working_dir",
            "checkout",
            "--create-config",
            "config.yaml",
            "--include-remotes",
            "remotes/*",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Skipping not-a-repo because remote could not be determined",
        ));

    let config = load(&fixture.path().join("config.yaml")).unwrap();
    assert_eq!(config.len(), 1);
    assert_eq!(config["foo"].git_tag.as_deref(), Some("v1.0"));
}
