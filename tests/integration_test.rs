use sheepdog_exporter::config::Config;

#[test]
fn test_config_load() {
    // This assumes config/Default.toml exists relative to where cargo test is run
    let config_res = Config::load("config/Default.toml");
    assert!(config_res.is_ok(), "Failed to load default config");

    let config = config_res.unwrap();
    assert_eq!(config.server.metrics_path, "/metrics");
    assert_eq!(config.sheepdog.dog_binary, "dog");
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_config_file_falls_back_to_defaults() {
    let config = Config::load("config/does-not-exist").expect("defaults should apply");
    assert_eq!(config.server.listen_address, "0.0.0.0:9525");
}
