//! AIサービスの抽象化層モジュール
//! 異なるAI実装（ローカル、モック）を統一したインターフェースで提供し、
//! AIサービスの生成と管理を行う。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AIError;
use crate::game::{Game, Move};

/// AIの手の計算結果を表す構造体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIMoveResult {
    /// AIが選択した手
    pub game_move: Move,
    /// 思考時間（ミリ秒）
    pub thinking_time_ms: u64,
}

/// AIサービスの種類を表すenum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AIServiceType {
    /// ローカルAI実装
    Local,
    /// テスト用のモックAI
    Mock,
}

/// AIサービスの状態情報を表す構造体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIServiceStatus {
    pub service_type: AIServiceType,
    pub name: String,
    pub available: bool,
    pub last_check: DateTime<Utc>,
    pub average_response_time_ms: Option<u64>,
}

/// AIサービスの統一インターフェース
/// 計算はゲームのスナップショットに対して行い、盤面は変更しない
#[async_trait]
pub trait AIService: Send + Sync {
    /// 指定したゲーム状態でAIの手を計算する
    async fn calculate_move(&self, game: &Game) -> Result<AIMoveResult, AIError>;

    /// サービスが利用可能かチェックする
    async fn is_available(&self) -> bool;

    /// サービス名を返す
    fn get_name(&self) -> &'static str;

    /// サービスの種類を返す
    fn get_service_type(&self) -> AIServiceType;

    /// サービスの現在の状態を取得する
    async fn get_status(&self) -> AIServiceStatus {
        AIServiceStatus {
            service_type: self.get_service_type(),
            name: self.get_name().to_string(),
            available: self.is_available().await,
            last_check: Utc::now(),
            average_response_time_ms: None,
        }
    }

    /// サービスの健全性チェックを実行し、レスポンス時間も測定する
    async fn health_check(&self) -> Result<AIServiceStatus, AIError> {
        let start_time = std::time::Instant::now();
        let available = self.is_available().await;
        let response_time = start_time.elapsed().as_millis() as u64;

        if available {
            Ok(AIServiceStatus {
                service_type: self.get_service_type(),
                name: self.get_name().to_string(),
                available: true,
                last_check: Utc::now(),
                average_response_time_ms: Some(response_time),
            })
        } else {
            Err(AIError::ServiceUnavailable {
                service_name: self.get_name().to_string(),
                reason: "Service health check failed".to_string(),
            })
        }
    }
}

/// AIサービスの設定を管理する構造体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIServiceConfig {
    pub service_type: AIServiceType,
    /// 思考時間のシミュレーションを行うか
    pub simulate_thinking_time: bool,
    /// 思考時間（ミリ秒）
    pub thinking_time_ms: u64,
}

impl Default for AIServiceConfig {
    fn default() -> Self {
        Self {
            service_type: AIServiceType::Local,
            simulate_thinking_time: true,
            thinking_time_ms: 1000,
        }
    }
}

/// AIサービスを生成するファクトリ
pub struct AIServiceFactory;

impl AIServiceFactory {
    /// 設定に基づいてAIサービスを生成する
    pub fn create_service(config: &AIServiceConfig) -> Box<dyn AIService> {
        match config.service_type {
            AIServiceType::Local => {
                use crate::ai::local_service::LocalAIService;
                if config.simulate_thinking_time {
                    Box::new(LocalAIService::with_thinking_time(config.thinking_time_ms))
                } else {
                    Box::new(LocalAIService::new_fast())
                }
            }
            AIServiceType::Mock => {
                use crate::ai::mock_service::MockAIService;
                Box::new(MockAIService::new_default())
            }
        }
    }

    /// デフォルト設定のローカルAIサービスを生成する
    pub fn create_default_local() -> Box<dyn AIService> {
        use crate::ai::local_service::LocalAIService;
        Box::new(LocalAIService::new())
    }
}
