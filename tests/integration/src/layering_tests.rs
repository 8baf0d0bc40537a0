//! End-to-end layering scenarios
//!
//! Exercises the complete flow: INI file on disk -> sources -> layered configs
//! -> item access and snapshots.

use pretty_assertions::assert_eq;
use strata_core::transform::parse_int;
use strata_core::{Config, ConfigOption, EnvironmentSource, Error, FileSectionSource, Value};
use strata_test_utils::ini::{HOSTS_SECTIONS, IniFixture};
use strata_test_utils::tracing::init_test_tracing;

fn environment() -> EnvironmentSource {
    EnvironmentSource::from_vars("", [("OPTION2", "33"), ("OPTION3", "spam")])
}

fn hosts(fixture: &IniFixture) -> FileSectionSource {
    FileSectionSource::open(fixture.path(), HOSTS_SECTIONS).unwrap()
}

/// Defaults and the environment.
fn environment_layer() -> Config {
    Config::builder()
        .name("environment")
        // Found nowhere else: the default is used.
        .option(ConfigOption::with_default("option1", 1))
        // Explicit value wins over the environment's "33".
        .option(ConfigOption::builder("option2").value(2).transform(parse_int).build())
        // Environment beats the default.
        .option(ConfigOption::with_default("option3", 3))
        .source(environment())
        .build()
        .unwrap()
}

#[test]
fn test_single_layer_precedence() {
    init_test_tracing();
    let config = environment_layer();

    assert_eq!(config.value("option1").unwrap(), Value::Int(1));
    assert_eq!(config.value("option2").unwrap(), Value::Int(2));
    assert_eq!(config.value("option3").unwrap(), "spam");
}

#[test]
fn test_file_layer_overrides_environment_layer() {
    init_test_tracing();
    let fixture = IniFixture::with_hosts();
    let config1 = environment_layer();
    let config2 = Config::builder()
        .name("file")
        .option(ConfigOption::builder("option3").value("cat").build())
        .option(ConfigOption::with_default("option4", 4))
        .source(hosts(&fixture))
        .build()
        .unwrap();

    let config3 = &config1 + &config2;

    assert_eq!(config3.value("option3").unwrap(), "cat");
    assert_eq!(config3.value("option4").unwrap(), Value::Int(4));
    assert_eq!(config3.value("option1").unwrap(), Value::Int(1));
    // Present in the file, but no layer defines an option for it.
    assert!(matches!(
        config3.value("User"),
        Err(Error::UndefinedOption { .. })
    ));
}

#[test]
fn test_anonymous_file_layer_on_top_of_environment_layer() {
    init_test_tracing();
    let fixture = IniFixture::with_hosts();
    let file_layer = Config::builder()
        .option(ConfigOption::new("ForwardX11"))
        .option(ConfigOption::new("Port"))
        .option(ConfigOption::new("Undefined"))
        .source(hosts(&fixture))
        .build()
        .unwrap();
    let config4 = &environment_layer() + &file_layer;

    // bitbucket.org lacks ForwardX11, so DEFAULT answers before the second section.
    assert_eq!(config4.value("ForwardX11").unwrap(), "yes");
    assert_eq!(config4.value("Port").unwrap(), "50022");

    let err = config4.value("Undefined").unwrap_err();
    assert!(matches!(err, Error::UnassignedOption { .. }));
    assert_eq!(err.attempts().len(), 1);
}

#[test]
fn test_live_override_then_snapshot() {
    init_test_tracing();
    let fixture = IniFixture::with_hosts();
    let defaults = Config::builder()
        .name("defaults")
        .option(ConfigOption::with_default("Port", "22"))
        .option(ConfigOption::with_default("User", "nobody"))
        .build()
        .unwrap();
    let site = Config::builder()
        .name("site")
        .option(ConfigOption::builder("Port").transform(parse_int).build())
        .source(hosts(&fixture))
        .build()
        .unwrap();
    let effective = &defaults + &site;

    let before = effective.cache().unwrap();
    defaults
        .set_option(ConfigOption::with_default("User", "admin"))
        .unwrap();
    let after = effective.cache().unwrap();

    assert_eq!(before.get("Port"), Some(&Value::Int(50022)));
    assert_eq!(before.get("User"), Some(&Value::from("nobody")));
    assert_eq!(after.get("User"), Some(&Value::from("admin")));

    let json: serde_json::Value = serde_json::from_str(&after.to_json().unwrap()).unwrap();
    assert_eq!(json["default"]["Port"], 50022);
    assert_eq!(json["default"]["User"], "admin");
}

#[test]
fn test_sectioned_options_across_layers() {
    init_test_tracing();
    let fixture = IniFixture::with_hosts();
    let base = Config::builder()
        .name("base")
        .section("server")
        .option(ConfigOption::with_default("port", 80))
        .build()
        .unwrap();
    let ssh = Config::builder()
        .name("ssh")
        .section("ssh")
        .option(ConfigOption::new("Port"))
        .source(hosts(&fixture))
        .build()
        .unwrap();

    let merged = &base + &ssh;

    assert_eq!(merged.value_in("port", Some("server")).unwrap(), Value::Int(80));
    assert_eq!(merged.value_in("Port", Some("ssh")).unwrap(), "50022");
    assert!(merged.value("port").is_err());

    let snapshot = merged.cache().unwrap();
    assert_eq!(snapshot.get_in("port", Some("server")), Some(&Value::Int(80)));
    assert_eq!(snapshot.section(Some("ssh")).unwrap().len(), 1);
}
