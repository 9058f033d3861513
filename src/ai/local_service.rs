//! ローカルAIサービスモジュール
//! 設定された思考時間だけ待ってから、最初の合法手を選ぶ戦略で手を返す。

use async_trait::async_trait;
use std::time::Instant;
use tokio::time::{sleep, Duration};
use tracing::debug;

use crate::error::AIError;
use crate::game::Game;

use super::service::{AIService, AIMoveResult, AIServiceType};
use super::strategies::{AIStrategy, FirstMoveAI};

/// 既定の思考時間（ミリ秒）
pub const DEFAULT_THINKING_TIME_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct LocalAIService {
    pub simulate_thinking_time: bool,
    pub thinking_time_ms: u64,
}

impl LocalAIService {
    pub fn new() -> Self {
        Self::with_thinking_time(DEFAULT_THINKING_TIME_MS)
    }

    pub fn with_thinking_time(thinking_time_ms: u64) -> Self {
        Self {
            simulate_thinking_time: true,
            thinking_time_ms,
        }
    }

    pub fn new_fast() -> Self {
        Self {
            simulate_thinking_time: false,
            thinking_time_ms: 0,
        }
    }

    fn get_thinking_time(&self) -> u64 {
        if !self.simulate_thinking_time {
            return 0;
        }
        self.thinking_time_ms
    }
}

impl Default for LocalAIService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AIService for LocalAIService {
    async fn calculate_move(&self, game: &Game) -> Result<AIMoveResult, AIError> {
        let start_time = Instant::now();

        if !game.is_ai_turn() {
            return Err(AIError::StrategyError {
                message: "Not the AI player's turn".to_string(),
            });
        }

        let thinking_time_ms = self.get_thinking_time();
        if thinking_time_ms > 0 {
            sleep(Duration::from_millis(thinking_time_ms)).await;
        }

        let game_move = FirstMoveAI::new().select_move(game)?;
        let actual_thinking_time = start_time.elapsed().as_millis() as u64;

        debug!(
            from = %game_move.from.position,
            to = %game_move.to.position,
            thinking_time_ms = actual_thinking_time,
            "local AI selected move"
        );

        Ok(AIMoveResult {
            game_move,
            thinking_time_ms: actual_thinking_time,
        })
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn get_name(&self) -> &'static str {
        "LocalAIService"
    }

    fn get_service_type(&self) -> AIServiceType {
        AIServiceType::Local
    }
}
