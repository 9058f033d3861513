//! ゲームの基本型定義モジュール
//! チェッカーで使用される座標、駒、マス、手などの値型を定義する。

use serde::{Deserialize, Serialize};
use std::fmt;

use super::player::Player;

/// 盤面の一辺のマス数
pub const BOARD_SIZE: usize = 8;

/// 駒の色およびマスの色を表すenum
/// 駒の場合は前進方向と所有者を決定する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorType {
    Light,
    Dark,
}

impl ColorType {
    /// 相手の色を返す
    pub fn opposite(self) -> ColorType {
        match self {
            ColorType::Light => ColorType::Dark,
            ColorType::Dark => ColorType::Light,
        }
    }

    /// 前進方向の行増分
    /// 黒は行番号が増える方向、白は減る方向に進む
    pub fn forward(self) -> i8 {
        match self {
            ColorType::Dark => 1,
            ColorType::Light => -1,
        }
    }

    /// 成りが発生する最奥の行
    pub fn promotion_row(self) -> usize {
        match self {
            ColorType::Dark => BOARD_SIZE - 1,
            ColorType::Light => 0,
        }
    }
}

/// 駒の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Man,
    King,
}

/// 盤上の駒
/// 不変の値で、成りは同色のKingへの置き換えで表現する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: ColorType,
    pub piece_type: PieceType,
}

impl Piece {
    pub fn new(color: ColorType, piece_type: PieceType) -> Self {
        Self { color, piece_type }
    }

    pub fn man(color: ColorType) -> Self {
        Self::new(color, PieceType::Man)
    }

    pub fn king(color: ColorType) -> Self {
        Self::new(color, PieceType::King)
    }

    pub fn is_king(&self) -> bool {
        self.piece_type == PieceType::King
    }

    /// 同色のKingを返す
    pub fn promoted(self) -> Self {
        Self::king(self.color)
    }

    /// 同色のManを返す（成りの取り消し用）
    pub fn demoted(self) -> Self {
        Self::man(self.color)
    }
}

/// 8x8盤面上の座標を表す構造体
/// row, colともに0-7の範囲で有効
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// 範囲チェック付きのコンストラクタ
    /// 8x8盤面の範囲外の座標の場合はNoneを返す
    pub fn new(row: usize, col: usize) -> Option<Position> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Position { row, col })
        } else {
            None
        }
    }

    /// 座標が有効範囲内かチェックする
    pub fn is_valid(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// 指定した増分だけ移動した座標を返す
    /// 盤外に出る場合はNone
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Position> {
        let row = self.row as i64 + dr as i64;
        let col = self.col as i64 + dc as i64;
        if row < 0 || col < 0 {
            return None;
        }
        Position::new(row as usize, col as usize)
    }

    /// 2点の中点（斜め2マスのジャンプで飛び越すマス）
    pub fn midpoint(&self, other: Position) -> Option<Position> {
        if (self.row + other.row) % 2 != 0 || (self.col + other.col) % 2 != 0 {
            return None;
        }
        Position::new((self.row + other.row) / 2, (self.col + other.col) / 2)
    }

    /// この座標にあるマスの色
    /// (row+col)が偶数なら白マス、奇数なら黒マス
    pub fn square_color(&self) -> ColorType {
        if (self.row + self.col) % 2 == 0 {
            ColorType::Light
        } else {
            ColorType::Dark
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 盤面の1マス
/// マスの色は座標から導出される。盤面の更新はマスごと置き換える
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    pub color_type: ColorType,
    pub position: Position,
    pub piece: Option<Piece>,
}

impl Square {
    pub fn new(position: Position, piece: Option<Piece>) -> Self {
        Self {
            color_type: position.square_color(),
            position,
            piece,
        }
    }

    pub fn empty(position: Position) -> Self {
        Self::new(position, None)
    }

    /// 駒を置いた新しいマスを返す
    pub fn with_piece(&self, piece: Piece) -> Self {
        Self::new(self.position, Some(piece))
    }

    /// 駒を取り除いた新しいマスを返す
    pub fn cleared(&self) -> Self {
        Self::empty(self.position)
    }

    /// 駒を置けるマスか（黒マスのみ）
    pub fn is_playable(&self) -> bool {
        self.color_type == ColorType::Dark
    }

    pub fn is_empty(&self) -> bool {
        self.piece.is_none()
    }
}

/// ゲームの1手を表現する構造体
/// 移動元・移動先のマス、取った駒のマス、成りの有無を保持する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub captured: Option<Square>,
    pub player: Player,
    pub is_promotion: bool,
}

impl Move {
    /// 成りなしの手を作成する
    /// 成りフラグはGame側で移動先の行から再計算される
    pub fn new(from: Square, to: Square, captured: Option<Square>, player: Player) -> Self {
        Self {
            from,
            to,
            captured,
            player,
            is_promotion: false,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// 移動する駒（移動元マスに記録された駒）
    pub fn moving_piece(&self) -> Option<Piece> {
        self.from.piece
    }
}
