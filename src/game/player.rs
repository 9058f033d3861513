//! プレイヤー定義モジュール
//! 人間とAIの2種類のプレイヤーをタグ付きenumで表現する。
//! ターン判定や盤面ロジックは色と名前のみを使い、種類の区別はAI手番の判定でのみ行う。

use serde::{Deserialize, Serialize};

use super::types::ColorType;

/// ゲームのプレイヤー
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Human { name: String, color: ColorType },
    AI { name: String, color: ColorType },
}

impl Player {
    pub fn human(name: impl Into<String>, color: ColorType) -> Self {
        Player::Human { name: name.into(), color }
    }

    pub fn ai(name: impl Into<String>, color: ColorType) -> Self {
        Player::AI { name: name.into(), color }
    }

    pub fn name(&self) -> &str {
        match self {
            Player::Human { name, .. } | Player::AI { name, .. } => name,
        }
    }

    pub fn color(&self) -> ColorType {
        match self {
            Player::Human { color, .. } | Player::AI { color, .. } => *color,
        }
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, Player::AI { .. })
    }
}
