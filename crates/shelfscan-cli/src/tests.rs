use shelfscan_core::{AppConfig, CategoryId, RetrySettings};

use super::*;

fn config_with_category(category_id: Option<&str>) -> AppConfig {
    AppConfig {
        town: "Москва".to_owned(),
        region: "77".to_owned(),
        categories_url: "https://api.example.com/categories".to_owned(),
        items_url: "https://api.example.com/items".to_owned(),
        user_agent: "shelfscan-test/0.1".to_owned(),
        proxy_url: None,
        category_id: category_id.map(str::to_owned),
        category_limit: None,
        output_path: "catalog.csv".into(),
        log_level: "info".to_owned(),
        request_timeout_secs: 30,
        max_concurrent_requests: 10,
        page_size: 200,
        retry: RetrySettings::default(),
    }
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["shelfscan"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_scrape_defaults() {
    let cli = Cli::try_parse_from(["shelfscan", "scrape"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            category: None,
            output: None,
            dry_run: false
        })
    ));
}

#[test]
fn parses_scrape_with_category_and_output() {
    let cli = Cli::try_parse_from([
        "shelfscan",
        "scrape",
        "--category",
        "1042",
        "--output",
        "out/moscow.csv",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            category: Some(ref c),
            output: Some(ref o),
            dry_run: false
        }) if c == "1042" && o.as_path() == std::path::Path::new("out/moscow.csv")
    ));
}

#[test]
fn parses_scrape_dry_run() {
    let cli = Cli::try_parse_from(["shelfscan", "scrape", "--dry-run"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape { dry_run: true, .. })
    ));
}

#[test]
fn parses_categories_command() {
    let cli = Cli::try_parse_from(["shelfscan", "categories"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Categories)));
}

#[test]
fn rejects_unknown_command() {
    assert!(Cli::try_parse_from(["shelfscan", "export"]).is_err());
}

#[test]
fn category_requires_a_value() {
    assert!(Cli::try_parse_from(["shelfscan", "scrape", "--category"]).is_err());
}

#[test]
fn category_flag_overrides_config() {
    let config = config_with_category(Some("7"));
    assert_eq!(
        commands::category_override(Some("1042"), &config),
        Some(CategoryId::Numeric(1042))
    );
}

#[test]
fn config_category_used_without_flag() {
    let config = config_with_category(Some("dry-food"));
    assert_eq!(
        commands::category_override(None, &config),
        Some(CategoryId::Text("dry-food".to_owned()))
    );
}

#[test]
fn blank_flag_falls_back_to_config() {
    let config = config_with_category(Some("7"));
    assert_eq!(
        commands::category_override(Some("  "), &config),
        Some(CategoryId::Numeric(7))
    );
}

#[test]
fn no_override_resolves_tree() {
    let config = config_with_category(None);
    assert_eq!(commands::category_override(None, &config), None);
}

#[test]
fn zero_padded_category_is_sent_verbatim() {
    let config = config_with_category(None);
    let category = commands::category_override(Some("007"), &config).unwrap();
    assert_eq!(category.to_string(), "007");
}
