//! チェッカーのルール実装モジュール
//! 駒種ごとの移動方向、取りの判定、移動先の列挙、手の検証、強制取りのフィルタを担当する。

use thiserror::Error;

use super::board::Board;
use super::types::{Move, Piece, PieceType, Position, Square};

/// Kingが進める斜め4方向
const KING_DIRECTIONS: [(i8, i8); 4] = [
    (-1, -1), (-1, 1),  // 上方向
    (1, -1),  (1, 1),   // 下方向
];

/// 手が盤面上で成立しない理由
/// 盤面の境界では真偽値に畳み込まれ、ログ出力にのみ使う
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveViolation {
    #[error("no piece on source square {0}")]
    EmptySource(Position),

    #[error("destination {0} is outside the board")]
    DestinationOffBoard(Position),

    #[error("destination {0} is not a playable square")]
    DestinationNotPlayable(Position),

    #[error("destination {0} is occupied")]
    DestinationOccupied(Position),

    #[error("{from} -> {to} does not match the piece's movement")]
    InvalidGeometry { from: Position, to: Position },

    #[error("no capturable piece between {from} and {to}")]
    IllegalCapture { from: Position, to: Position },

    #[error("captured square does not match the jump")]
    CapturedMismatch,
}

/// 検証済みの手
/// 盤面上の実際の駒と、取られるマスを保持する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedMove {
    pub piece: Piece,
    pub captured: Option<Square>,
}

/// チェッカーのルールを実装する構造体
/// スタティックメソッドのみを提供する
pub struct CheckersRules;

impl CheckersRules {
    /// 駒が移動・取りに使える斜め方向
    /// Manは前方2方向のみ、Kingは4方向すべて
    pub fn directions(piece: Piece) -> Vec<(i8, i8)> {
        match piece.piece_type {
            PieceType::Man => {
                let dr = piece.color.forward();
                vec![(dr, -1), (dr, 1)]
            }
            PieceType::King => KING_DIRECTIONS.to_vec(),
        }
    }

    /// attackerがtargetを取れるか
    /// 相手の駒であることに加え、ManはKingを取れない
    pub fn can_capture(attacker: Piece, target: Piece) -> bool {
        attacker.color != target.color && (attacker.is_king() || !target.is_king())
    }

    /// 指定した駒が指定行に到達したときに成るか
    pub fn is_promotion(piece: Piece, to: Position) -> bool {
        piece.piece_type == PieceType::Man && to.row == piece.color.promotion_row()
    }

    /// fromからtoへのジャンプで取れる駒のマスを返す
    /// 斜め2マスの中点に取れる相手の駒があり、toが空の場合のみSome
    pub fn get_capturable_piece_between(
        board: &Board,
        from: Position,
        to: Position,
        moving_piece: Piece,
    ) -> Option<Square> {
        if from.row.abs_diff(to.row) != 2 || from.col.abs_diff(to.col) != 2 {
            return None;
        }

        let landing = board.get_square(to)?;
        if !landing.is_empty() {
            return None;
        }

        let jumped = board.get_square(from.midpoint(to)?)?;
        let target = jumped.piece?;
        if Self::can_capture(moving_piece, target) {
            Some(jumped)
        } else {
            None
        }
    }

    /// fromの駒が移動できる先と、その際に取るマスを列挙する
    /// 各方向について、空なら1マス移動、相手の駒があればジャンプを検討する
    pub fn possible_destinations(board: &Board, from: Position) -> Vec<(Position, Option<Square>)> {
        let piece = match board.get_piece(from) {
            Some(piece) => piece,
            None => return Vec::new(),
        };

        let mut destinations = Vec::new();
        for (dr, dc) in Self::directions(piece) {
            let step = match from.offset(dr, dc) {
                Some(step) => step,
                None => continue,
            };

            if board.is_empty(step) {
                destinations.push((step, None));
            } else if let Some(landing) = from.offset(dr * 2, dc * 2) {
                if let Some(captured) = Self::get_capturable_piece_between(board, from, landing, piece) {
                    destinations.push((landing, Some(captured)));
                }
            }
        }

        destinations
    }

    /// 手を盤面に対して検証する
    /// 移動元の駒、移動先、移動の形、取りの合法性の順にチェックする
    pub fn validate_move(board: &Board, game_move: &Move) -> Result<ValidatedMove, MoveViolation> {
        let from = game_move.from.position;
        let to = game_move.to.position;

        let piece = board
            .get_piece(from)
            .ok_or(MoveViolation::EmptySource(from))?;

        let destination = board
            .get_square(to)
            .ok_or(MoveViolation::DestinationOffBoard(to))?;
        if !destination.is_playable() {
            return Err(MoveViolation::DestinationNotPlayable(to));
        }
        if !destination.is_empty() {
            return Err(MoveViolation::DestinationOccupied(to));
        }

        let dr = to.row as i64 - from.row as i64;
        let dc = to.col as i64 - from.col as i64;
        let distance = dr.abs();
        if distance != dc.abs() || !(1..=2).contains(&distance) {
            return Err(MoveViolation::InvalidGeometry { from, to });
        }
        let direction = (dr.signum() as i8, dc.signum() as i8);
        if !Self::directions(piece).contains(&direction) {
            return Err(MoveViolation::InvalidGeometry { from, to });
        }

        if distance == 1 {
            if game_move.captured.is_some() {
                return Err(MoveViolation::CapturedMismatch);
            }
            return Ok(ValidatedMove { piece, captured: None });
        }

        let captured = Self::get_capturable_piece_between(board, from, to, piece)
            .ok_or(MoveViolation::IllegalCapture { from, to })?;
        if let Some(claimed) = game_move.captured {
            if claimed.position != captured.position {
                return Err(MoveViolation::CapturedMismatch);
            }
        }

        Ok(ValidatedMove { piece, captured: Some(captured) })
    }

    /// 強制取りのルールを適用する
    /// 取る手が1つでもあれば取る手のみを残す
    pub fn apply_mandatory_capture(moves: Vec<Move>) -> Vec<Move> {
        if moves.iter().any(Move::is_capture) {
            moves.into_iter().filter(Move::is_capture).collect()
        } else {
            moves
        }
    }
}
