//! アプリケーション全体のエラー定義モジュール
//! ゲームロジック、AIサービスのエラーを統一管理。

use thiserror::Error;

use crate::game::Position;

/// ゲームロジックに関連するエラー
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Move attempted out of turn or with an opponent's piece")]
    WrongTurnOrOwnership,

    #[error("Illegal move from {from} to {to}")]
    IllegalDestination { from: Position, to: Position },

    #[error("No moves to undo")]
    NoMovesToUndo,

    #[error("Cannot undo while the AI move is pending")]
    AITurnPending,

    #[error("Move history does not match the board")]
    InconsistentHistory,

    #[error("AI calculation failed: {source}")]
    AIError {
        #[from]
        source: AIError,
    },
}

/// AIサービスに関連するエラー
#[derive(Debug, Error)]
pub enum AIError {
    #[error("No valid moves available")]
    NoValidMoves,

    #[error("AI strategy error: {message}")]
    StrategyError { message: String },

    #[error("AI service unavailable: {service_name} - {reason}")]
    ServiceUnavailable {
        service_name: String,
        reason: String,
    },
}

/// ゲームエラーをベースとした結果型
pub type Result<T> = std::result::Result<T, GameError>;
