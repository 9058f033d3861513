//! 設定システム統合テスト

use std::{env, fs};
use tempfile::TempDir;

use Checkers::{
    ai::service::{AIService, AIServiceConfig, AIServiceFactory, AIServiceType},
    config::{Config, ConfigError, GameConfig, LoggingConfig},
    game::{Game, GameMode},
};

fn create_test_config() -> Config {
    Config {
        game: GameConfig {
            mode: GameMode::PvP,
            light_player_name: "Alice".to_string(),
            dark_player_name: "Bob".to_string(),
        },
        ai_service: AIServiceConfig {
            service_type: AIServiceType::Mock,
            simulate_thinking_time: false,
            thinking_time_ms: 0,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
    }
}

#[test]
fn test_config_serialization_deserialization() {
    let config = create_test_config();

    let json_str = serde_json::to_string_pretty(&config).unwrap();
    assert!(json_str.contains("PvP"));
    assert!(json_str.contains("Alice"));
    assert!(json_str.contains("Mock"));

    let deserialized: Config = serde_json::from_str(&json_str).unwrap();
    assert_eq!(deserialized.game.mode, GameMode::PvP);
    assert_eq!(deserialized.game.dark_player_name, "Bob");
    assert_eq!(deserialized.ai_service.service_type, AIServiceType::Mock);
    assert_eq!(deserialized.logging.level, "debug");
}

#[test]
fn test_config_file_operations() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("test_config.json");

    let original_config = create_test_config();

    // ファイルに保存
    original_config.save_to_file(&config_path).unwrap();
    assert!(config_path.exists());

    // ファイルから読み込み
    let loaded_config = Config::from_file(&config_path).unwrap();
    assert_eq!(loaded_config.game.light_player_name, original_config.game.light_player_name);
    assert_eq!(loaded_config.ai_service.service_type, original_config.ai_service.service_type);
    assert!(loaded_config.validate().is_ok());
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();

    // 有効な設定
    assert!(config.validate().is_ok());

    // 空のプレイヤー名
    config.game.light_player_name = "  ".to_string();
    assert!(config.validate().is_err());

    // 空のログレベル
    config.game.light_player_name = "Alice".to_string();
    config.logging.level = String::new();
    assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { field, .. }) if field == "logging.level"));
}

#[test]
fn test_env_var_config_loading() {
    env::set_var("CHECKERS_MODE", "pvp");
    env::set_var("CHECKERS_LIGHT_PLAYER", "Carol");
    env::set_var("CHECKERS_DARK_PLAYER", "Dave");
    env::set_var("AI_SERVICE_TYPE", "mock");
    env::set_var("AI_THINKING_TIME_MS", "0");

    let config = Config::from_env().unwrap();

    assert_eq!(config.game.mode, GameMode::PvP);
    assert_eq!(config.game.light_player_name, "Carol");
    assert_eq!(config.game.dark_player_name, "Dave");
    assert_eq!(config.ai_service.service_type, AIServiceType::Mock);
    assert_eq!(config.ai_service.thinking_time_ms, 0);
    assert!(!config.ai_service.simulate_thinking_time);

    // 環境変数はファイルの設定を上書きする
    let mut file_config = Config::default();
    file_config.game.light_player_name = "FromFile".to_string();
    file_config.apply_env().unwrap();
    assert_eq!(file_config.game.light_player_name, "Carol");

    // 不正な値
    env::set_var("AI_THINKING_TIME_MS", "soon");
    let result = Config::from_env();
    assert!(matches!(result, Err(ConfigError::EnvVarError { .. })));

    env::remove_var("CHECKERS_MODE");
    env::remove_var("CHECKERS_LIGHT_PLAYER");
    env::remove_var("CHECKERS_DARK_PLAYER");
    env::remove_var("AI_SERVICE_TYPE");
    env::remove_var("AI_THINKING_TIME_MS");
}

#[test]
fn test_config_error_handling() {
    // 存在しないファイルからの読み込み
    let result = Config::from_file("nonexistent_file.json");
    assert!(matches!(result, Err(ConfigError::FileReadError(_))));

    // 無効なJSONファイル
    let temp_dir = TempDir::new().unwrap();
    let invalid_json_path = temp_dir.path().join("invalid.json");
    fs::write(&invalid_json_path, "invalid json content").unwrap();

    let result = Config::from_file(&invalid_json_path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[tokio::test]
async fn test_game_and_service_from_config() {
    let config = create_test_config();

    let game = Game::from_config(&config.game);
    assert_eq!(game.mode, GameMode::PvP);
    assert_eq!(game.light_player().name(), "Alice");

    let service = AIServiceFactory::create_service(&config.ai_service);
    assert_eq!(service.get_service_type(), AIServiceType::Mock);
    assert!(service.is_available().await);
}
