use tessy::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../tessy.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.engine.command, "tesseract");
    assert_eq!(cfg.engine.content_sep, "||||");
    assert!(cfg.engine.data_dir.is_none());
    assert_eq!(cfg.engine.path_cache_file, ".TESSPATH");
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let cfg: Config = toml::from_str("[engine]\ncommand = \"/opt/tess/bin/tesseract\"\n")
        .expect("parse TOML");
    assert_eq!(cfg.engine.command, "/opt/tess/bin/tesseract");
    assert_eq!(cfg.engine.content_sep, "||||");
    assert_eq!(cfg.engine.path_cache_file, ".TESSPATH");
    assert!(cfg.paths.temp_dir.is_empty());
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn partial_logging_section_keeps_other_defaults() {
    let cfg: Config = toml::from_str("[logging]\njson = true\n").expect("parse TOML");
    assert!(cfg.logging.json);
    assert_eq!(cfg.logging.level, "info");
    assert!(!cfg.logging.write_to_file);
    assert_eq!(cfg.engine.command, "tesseract");
}

#[test]
fn data_dir_is_read_as_path() {
    let cfg: Config = toml::from_str("[engine]\ndata_dir = \"/usr/share/tessdata\"\n")
        .expect("parse TOML");
    assert_eq!(
        cfg.engine.data_dir.as_deref(),
        Some(std::path::Path::new("/usr/share/tessdata"))
    );
}
