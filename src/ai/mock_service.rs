//! テスト用のモックAIサービスモジュール
//! 利用可否、エラー注入、固定の手、応答時間を設定で切り替えられる。

use async_trait::async_trait;
use std::time::Instant;
use tokio::time::{sleep, Duration};

use crate::error::AIError;
use crate::game::{Game, Position};

use super::service::{AIService, AIMoveResult, AIServiceType};

#[derive(Debug, Clone)]
pub struct MockAIConfig {
    pub available: bool,
    pub response_time_ms: u64,
    pub should_error: bool,
    pub error_message: String,
    /// 合法手にあれば優先して返す(移動元, 移動先)
    pub fixed_move: Option<(Position, Position)>,
}

impl Default for MockAIConfig {
    fn default() -> Self {
        Self {
            available: true,
            response_time_ms: 100,
            should_error: false,
            error_message: "Mock AI error".to_string(),
            fixed_move: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockAIService {
    config: MockAIConfig,
}

impl MockAIService {
    pub fn new(config: MockAIConfig) -> Self {
        Self { config }
    }

    pub fn new_default() -> Self {
        Self::new(MockAIConfig::default())
    }

    pub fn new_unavailable() -> Self {
        Self::new(MockAIConfig {
            available: false,
            ..MockAIConfig::default()
        })
    }

    pub fn new_error(error_message: impl Into<String>) -> Self {
        Self::new(MockAIConfig {
            should_error: true,
            error_message: error_message.into(),
            response_time_ms: 0,
            ..MockAIConfig::default()
        })
    }

    pub fn new_with_fixed_move(from: Position, to: Position) -> Self {
        Self::new(MockAIConfig {
            fixed_move: Some((from, to)),
            response_time_ms: 0,
            ..MockAIConfig::default()
        })
    }

    pub fn new_fast() -> Self {
        Self::new(MockAIConfig {
            response_time_ms: 0,
            ..MockAIConfig::default()
        })
    }

    pub fn update_config(&mut self, config: MockAIConfig) {
        self.config = config;
    }

    pub fn get_config(&self) -> &MockAIConfig {
        &self.config
    }
}

#[async_trait]
impl AIService for MockAIService {
    async fn calculate_move(&self, game: &Game) -> Result<AIMoveResult, AIError> {
        let start_time = Instant::now();

        if !self.config.available {
            return Err(AIError::ServiceUnavailable {
                service_name: self.get_name().to_string(),
                reason: "Mock AI service is configured as unavailable".to_string(),
            });
        }

        if self.config.should_error {
            return Err(AIError::StrategyError {
                message: self.config.error_message.clone(),
            });
        }

        if self.config.response_time_ms > 0 {
            sleep(Duration::from_millis(self.config.response_time_ms)).await;
        }

        let valid_moves = game.legal_moves();
        let fixed = self.config.fixed_move.and_then(|(from, to)| {
            valid_moves
                .iter()
                .find(|m| m.from.position == from && m.to.position == to)
                .cloned()
        });

        let game_move = match fixed {
            Some(game_move) => game_move,
            None => valid_moves.into_iter().next().ok_or(AIError::NoValidMoves)?,
        };

        Ok(AIMoveResult {
            game_move,
            thinking_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    async fn is_available(&self) -> bool {
        self.config.available
    }

    fn get_name(&self) -> &'static str {
        "MockAIService"
    }

    fn get_service_type(&self) -> AIServiceType {
        AIServiceType::Mock
    }
}
