//! アプリケーション設定管理モジュール
//! 対戦モード、プレイヤー名、AIサービス、ログ出力の設定を
//! 設定ファイルと環境変数から読み込んで管理する。

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

use crate::ai::service::{AIServiceConfig, AIServiceType};
use crate::game::GameMode;

/// 設定ファイルの探索順
const CONFIG_PATHS: [&str; 2] = ["config.json", "config/checkers.json"];

/// ゲームの設定を管理する構造体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub mode: GameMode,
    /// 白（先手）のプレイヤー名
    pub light_player_name: String,
    /// 黒のプレイヤー名（PvAIではAIの名前）
    pub dark_player_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::PvAI,
            light_player_name: "Player".to_string(),
            dark_player_name: "Computer".to_string(),
        }
    }
}

/// ログ出力の設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing-subscriberのEnvFilter書式
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// アプリケーションの全設定を統合するメイン設定構造体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub game: GameConfig,
    pub ai_service: AIServiceConfig,
    pub logging: LoggingConfig,
}

/// 設定関連のエラーを表すenum
/// ファイル読み込み、パース、検証エラーなどを含む
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("設定ファイル読み込みエラー: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("設定ファイル解析エラー: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("環境変数エラー: {name} = {value}")]
    EnvVarError { name: String, value: String },

    #[error("設定値が無効です: {field} = {value}")]
    InvalidValue { field: String, value: String },
}

impl Config {
    /// 指定したファイルパスから設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 環境変数から設定を読み込む
    /// デフォルト値をベースに環境変数で上書きする
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// 設定されている環境変数だけで現在の設定を上書きする
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(mode) = env::var("CHECKERS_MODE") {
            self.game.mode = match mode.to_lowercase().as_str() {
                "pvp" => GameMode::PvP,
                "pvai" => GameMode::PvAI,
                _ => return Err(ConfigError::EnvVarError {
                    name: "CHECKERS_MODE".to_string(),
                    value: mode,
                }),
            };
        }

        if let Ok(name) = env::var("CHECKERS_LIGHT_PLAYER") {
            self.game.light_player_name = name;
        }

        if let Ok(name) = env::var("CHECKERS_DARK_PLAYER") {
            self.game.dark_player_name = name;
        }

        if let Ok(ai_service_type) = env::var("AI_SERVICE_TYPE") {
            self.ai_service.service_type = match ai_service_type.to_lowercase().as_str() {
                "local" => AIServiceType::Local,
                "mock" => AIServiceType::Mock,
                _ => return Err(ConfigError::EnvVarError {
                    name: "AI_SERVICE_TYPE".to_string(),
                    value: ai_service_type,
                }),
            };
        }

        if let Ok(thinking_time) = env::var("AI_THINKING_TIME_MS") {
            self.ai_service.thinking_time_ms = thinking_time.parse().map_err(|_| ConfigError::EnvVarError {
                name: "AI_THINKING_TIME_MS".to_string(),
                value: thinking_time,
            })?;
            self.ai_service.simulate_thinking_time = self.ai_service.thinking_time_ms > 0;
        }

        if let Ok(level) = env::var("CHECKERS_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// 設定ファイルと環境変数を結合して設定を読み込む
    /// 設定ファイルがなくてもデフォルト値で動作する
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = CONFIG_PATHS
            .iter()
            .find_map(|path| Self::from_file(path).ok())
            .unwrap_or_default();

        // 環境変数で設定を上書き
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// 現在の設定を指定したファイルに保存する
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 設定値の妥当性をチェックする
    /// 不正な値がある場合はConfigErrorを返す
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.light_player_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "game.light_player_name".to_string(),
                value: self.game.light_player_name.clone(),
            });
        }

        if self.game.dark_player_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "game.dark_player_name".to_string(),
                value: self.game.dark_player_name.clone(),
            });
        }

        if self.game.mode == GameMode::PvP && self.game.light_player_name == self.game.dark_player_name {
            return Err(ConfigError::InvalidValue {
                field: "game.dark_player_name".to_string(),
                value: self.game.dark_player_name.clone(),
            });
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
            });
        }

        Ok(())
    }
}
