//! AI戦略の実装モジュール
//! AIの手の選び方を定義する。現状は強制取りを反映した合法手の先頭を選ぶ方針のみ。

use crate::error::AIError;
use crate::game::{Game, Move};

/// AI戦略の共通インターフェース
pub trait AIStrategy: Send + Sync {
    /// ゲーム状態から手番のプレイヤーの手を選ぶ
    fn select_move(&self, game: &Game) -> Result<Move, AIError>;
    /// AIの名前を返す
    fn get_name(&self) -> &'static str;
}

/// 最初に列挙された合法手を選ぶAI実装
/// 評価や探索は行わない
#[derive(Debug, Clone, Default)]
pub struct FirstMoveAI;

impl FirstMoveAI {
    pub fn new() -> Self {
        FirstMoveAI
    }
}

impl AIStrategy for FirstMoveAI {
    fn select_move(&self, game: &Game) -> Result<Move, AIError> {
        let ai_player = game.ai_player().ok_or_else(|| AIError::StrategyError {
            message: "Game has no AI player".to_string(),
        })?;

        game.board
            .get_all_possible_moves(ai_player)
            .into_iter()
            .next()
            .ok_or(AIError::NoValidMoves)
    }

    fn get_name(&self) -> &'static str {
        "FirstMoveAI"
    }
}
