use pretty_assertions::assert_eq;
use strata_core::{Config, ConfigOption, EnvironmentSource, Error, FileSectionSource, Value};
use strata_test_utils::ini::{HOSTS_SECTIONS, IniFixture};

fn hosts_config(fixture: &IniFixture) -> Config {
    let config = Config::builder()
        .name("hosts")
        .option(ConfigOption::with_default("option1", 1))
        .option(ConfigOption::new("User"))
        .option(ConfigOption::new("ForwardX11"))
        .option(ConfigOption::new("Port"))
        .source(EnvironmentSource::from_vars("", [("OPTION2", "33"), ("OPTION3", "spam")]))
        .source(FileSectionSource::open(fixture.path(), HOSTS_SECTIONS).unwrap())
        .build()
        .unwrap();
    config.set_section(Some("OTHER"));
    config.add_option(ConfigOption::with_default("option4", "yes")).unwrap();
    config
}

#[test]
fn test_cache_resolves_every_option_by_section() {
    let fixture = IniFixture::with_hosts();
    let snapshot = hosts_config(&fixture).cache().unwrap();

    assert_eq!(snapshot.get("option1"), Some(&Value::Int(1)));
    assert_eq!(snapshot.get("User"), Some(&Value::from("hg")));
    assert_eq!(snapshot.get("ForwardX11"), Some(&Value::from("yes")));
    assert_eq!(snapshot.get("Port"), Some(&Value::from("50022")));
    assert_eq!(snapshot.get_in("option4", Some("OTHER")), Some(&Value::from("yes")));
    assert_eq!(snapshot.len(), 5);
}

#[test]
fn test_cache_serializes_to_json() {
    let fixture = IniFixture::with_hosts();
    let snapshot = hosts_config(&fixture).cache().unwrap();

    insta::assert_snapshot!(snapshot.to_json().unwrap(), @r#"
    {
      "default": {
        "ForwardX11": "yes",
        "Port": "50022",
        "User": "hg",
        "option1": 1
      },
      "sections": {
        "OTHER": {
          "option4": "yes"
        }
      }
    }
    "#);
}

#[test]
fn test_cache_matches_item_access_for_every_option() {
    let fixture = IniFixture::with_hosts();
    let config = hosts_config(&fixture);
    let snapshot = config.cache().unwrap();

    for option in config.reachable_options() {
        let section = option.section();
        assert_eq!(
            snapshot.get_in(option.name(), section.as_deref()),
            Some(&config.value_in(option.name(), section.as_deref()).unwrap()),
            "mismatch for {option}"
        );
    }
}

#[test]
fn test_cache_covers_merged_layers_once_per_key() {
    let base = Config::named("base");
    base.add_option(ConfigOption::with_default("shared", "base")).unwrap();
    base.add_option(ConfigOption::with_default("only_base", 1)).unwrap();
    let top = Config::named("top");
    top.add_option(ConfigOption::with_default("shared", "top")).unwrap();

    let snapshot = (&base + &top).cache().unwrap();

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.get("shared"), Some(&Value::from("top")));
    assert_eq!(snapshot.get("only_base"), Some(&Value::Int(1)));
}

#[test]
fn test_cache_does_not_modify_the_config() {
    let base = Config::named("base");
    base.add_option(ConfigOption::with_default("x", 1)).unwrap();
    let merged = &base + &Config::named("top");

    merged.cache().unwrap();

    assert!(merged.options().is_empty());
    assert_eq!(merged.resolvers().len(), 2);
}

#[test]
fn test_snapshot_is_independent_of_later_changes() {
    let config = Config::new();
    config.add_option(ConfigOption::with_default("x", 1)).unwrap();
    let snapshot = config.cache().unwrap();

    config.set_option(ConfigOption::with_default("x", 2)).unwrap();

    assert_eq!(snapshot.get("x"), Some(&Value::Int(1)));
    assert_eq!(config.cache().unwrap().get("x"), Some(&Value::Int(2)));
}

#[test]
fn test_one_unresolvable_option_fails_the_whole_snapshot() {
    let config = Config::new();
    config.add_option(ConfigOption::with_default("fine", 1)).unwrap();
    config.add_option(ConfigOption::new("broken")).unwrap();

    assert!(matches!(
        config.cache(),
        Err(Error::UnassignedOption { ref name, .. }) if name == "broken"
    ));
}

#[test]
fn test_null_defaults_are_cached() {
    let config = Config::new();
    config.add_option(ConfigOption::with_default("option1", Value::Null)).unwrap();
    assert_eq!(config.value("option1").unwrap(), Value::Null);
    assert_eq!(config.cache().unwrap().get("option1"), Some(&Value::Null));
}
