//! チェッカーの盤面状態を管理するモジュール
//! 8x8グリッドのマスと駒の配置、手の適用と取り消し、合法手の列挙を担当する。

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::player::Player;
use super::rules::{CheckersRules, MoveViolation, ValidatedMove};
use super::types::{ColorType, Move, Piece, Position, Square, BOARD_SIZE};

/// 初期配置で駒を並べる行数
const HOME_ROWS: usize = 3;

/// 8x8チェッカー盤面を表現する構造体
/// 各マスは値として保持し、更新時はマスごと置き換える
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: [[Square; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// 初期配置の盤面を作成する
    /// 黒は0-2行目、白は5-7行目の黒マスに12個ずつManを置く
    pub fn new() -> Self {
        let mut board = Self::empty();

        for row in 0..BOARD_SIZE {
            let color = if row < HOME_ROWS {
                ColorType::Dark
            } else if row >= BOARD_SIZE - HOME_ROWS {
                ColorType::Light
            } else {
                continue;
            };

            for col in 0..BOARD_SIZE {
                let position = Position { row, col };
                if position.square_color() == ColorType::Dark {
                    board.replace_square(Square::new(position, Some(Piece::man(color))));
                }
            }
        }

        board
    }

    /// 駒のない盤面を作成する
    pub fn empty() -> Self {
        Self {
            squares: std::array::from_fn(|row| {
                std::array::from_fn(|col| Square::empty(Position { row, col }))
            }),
        }
    }

    /// 指定した位置のマスを取得する
    /// 範囲外の場合はNoneを返す
    pub fn get_square(&self, position: Position) -> Option<Square> {
        if position.is_valid() {
            Some(self.squares[position.row][position.col])
        } else {
            None
        }
    }

    /// 指定した位置の駒を取得する
    pub fn get_piece(&self, position: Position) -> Option<Piece> {
        self.get_square(position).and_then(|square| square.piece)
    }

    /// 指定した位置が盤内かつ空かチェックする
    pub fn is_empty(&self, position: Position) -> bool {
        matches!(self.get_square(position), Some(square) if square.is_empty())
    }

    /// 指定した位置に駒を置く（Noneで取り除く）
    /// 範囲外、または白マスに駒を置こうとした場合はfalseを返す
    pub fn set_piece(&mut self, position: Position, piece: Option<Piece>) -> bool {
        let square = match self.get_square(position) {
            Some(square) => square,
            None => return false,
        };
        if piece.is_some() && !square.is_playable() {
            return false;
        }

        self.replace_square(Square::new(position, piece));
        true
    }

    fn replace_square(&mut self, square: Square) {
        let Position { row, col } = square.position;
        self.squares[row][col] = square;
    }

    /// 全マスを行優先で走査するイテレータ
    pub fn squares(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter().flatten()
    }

    /// 指定した色の駒数を数える
    pub fn count_pieces(&self, color: ColorType) -> usize {
        self.squares()
            .filter(|square| matches!(square.piece, Some(piece) if piece.color == color))
            .count()
    }

    /// fromの駒が移動できる先の座標を列挙する
    pub fn possible_moves(&self, from: Position) -> Vec<Position> {
        CheckersRules::possible_destinations(self, from)
            .into_iter()
            .map(|(to, _)| to)
            .collect()
    }

    /// fromからtoへのジャンプで取れる駒のマスを返す
    pub fn get_capturable_piece_between(&self, from: Position, to: Position, moving_piece: Piece) -> Option<Square> {
        CheckersRules::get_capturable_piece_between(self, from, to, moving_piece)
    }

    /// 指定したマスの駒の手を、取りと成りの情報付きで列挙する
    /// 駒がplayerの色でない場合は空
    pub fn get_all_possible_moves_from_square(&self, player: &Player, from: Position) -> Vec<Move> {
        let from_square = match self.get_square(from) {
            Some(square) => square,
            None => return Vec::new(),
        };
        let piece = match from_square.piece {
            Some(piece) if piece.color == player.color() => piece,
            _ => return Vec::new(),
        };

        CheckersRules::possible_destinations(self, from)
            .into_iter()
            .filter_map(|(to, captured)| {
                let to_square = self.get_square(to)?;
                let mut game_move = Move::new(from_square, to_square, captured, player.clone());
                game_move.is_promotion = CheckersRules::is_promotion(piece, to);
                Some(game_move)
            })
            .collect()
    }

    /// 指定したプレイヤーの合法手を全て取得する
    /// 取る手が存在する場合は取る手のみを返す（強制取り）
    pub fn get_all_possible_moves(&self, player: &Player) -> Vec<Move> {
        let moves: Vec<Move> = self
            .squares()
            .filter(|square| matches!(square.piece, Some(piece) if piece.color == player.color()))
            .flat_map(|square| self.get_all_possible_moves_from_square(player, square.position))
            .collect();

        CheckersRules::apply_mandatory_capture(moves)
    }

    /// 手を検証して盤面に適用する
    /// 検証に失敗した場合は盤面を変更せずfalseを返す
    /// undo_move_piece で戻すには、取られたマスと成りの情報が入った手が必要。
    /// 列挙した手かGame::make_moveが返した手を使うこと
    pub fn move_piece(&mut self, game_move: &Move) -> bool {
        match self.apply_move(game_move) {
            Ok(_) => true,
            Err(violation) => {
                debug!(%violation, "move rejected by board");
                false
            }
        }
    }

    /// 手を検証して盤面に適用し、実際に取ったマスを含む検証結果を返す
    pub fn apply_move(&mut self, game_move: &Move) -> Result<ValidatedMove, MoveViolation> {
        let validated = CheckersRules::validate_move(self, game_move)?;

        let to = game_move.to.position;
        let placed = if CheckersRules::is_promotion(validated.piece, to) {
            validated.piece.promoted()
        } else {
            validated.piece
        };

        self.replace_square(Square::empty(game_move.from.position));
        if let Some(captured) = validated.captured {
            self.replace_square(captured.cleared());
        }
        self.replace_square(Square::new(to, Some(placed)));

        Ok(validated)
    }

    /// move_pieceの逆操作
    /// 成りの手であればManに戻し、取られた駒を元のマスに戻す
    /// is_promotionとcapturedは手に記録された値だけを見る
    pub fn undo_move_piece(&mut self, game_move: &Move) -> bool {
        let from = game_move.from.position;
        let to = game_move.to.position;

        let moved = match self.get_piece(to) {
            Some(piece) => piece,
            None => return false,
        };
        if !self.is_empty(from) {
            return false;
        }

        let restored = if game_move.is_promotion { moved.demoted() } else { moved };

        self.replace_square(Square::empty(to));
        self.replace_square(Square::new(from, Some(restored)));
        if let Some(captured) = game_move.captured {
            if captured.position.is_valid() {
                self.replace_square(Square::new(captured.position, captured.piece));
            }
        }

        true
    }

    /// デバッグ・コンソール用の盤面表示文字列を生成する
    /// ●/◉で黒のMan/King、○/◎で白のMan/King、.で空の黒マスを表現
    pub fn display(&self) -> String {
        let mut result = String::new();
        result.push_str("  0 1 2 3 4 5 6 7\n");

        for (row_idx, row) in self.squares.iter().enumerate() {
            result.push_str(&format!("{} ", row_idx));
            for square in row {
                let symbol = match square.piece {
                    Some(piece) => match (piece.color, piece.is_king()) {
                        (ColorType::Dark, false) => "●",
                        (ColorType::Dark, true) => "◉",
                        (ColorType::Light, false) => "○",
                        (ColorType::Light, true) => "◎",
                    },
                    None if square.is_playable() => ".",
                    None => " ",
                };
                result.push_str(&format!("{} ", symbol));
            }
            result.push('\n');
        }

        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
