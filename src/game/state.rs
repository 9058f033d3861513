//! ゲーム状態管理モジュール
//! 盤面、2人のプレイヤー、手番、手の履歴を保持し、
//! 手番の検証、成りフラグの計算、勝敗判定、AI手番の実行を担当する。

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::board::Board;
use super::player::Player;
use super::rules::CheckersRules;
use super::types::{ColorType, Move};
use crate::ai::strategies::{AIStrategy, FirstMoveAI};
use crate::config::GameConfig;
use crate::error::{GameError, Result};

/// 対戦モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// 人間同士の対戦
    PvP,
    /// 人間対AI
    PvAI,
}

/// チェッカーのゲーム全体の状態を保持する構造体
/// 手番は常にWaitingForMove(current)で、終了は状態ではなく導出される述語で判定する
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: Uuid,
    pub board: Board,
    pub mode: GameMode,
    light_player: Player,
    dark_player: Player,
    current_turn: ColorType,
    /// 新しい手が先頭
    move_history: VecDeque<Move>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Game {
    /// 人間同士のゲームを作成する
    /// 1人目が白で先手、2人目が黒
    pub fn new(light_name: impl Into<String>, dark_name: impl Into<String>) -> Self {
        Self::with_players(
            GameMode::PvP,
            Player::human(light_name, ColorType::Light),
            Player::human(dark_name, ColorType::Dark),
        )
    }

    /// 人間対AIのゲームを作成する
    /// 人間が白で先手、AIが黒
    pub fn new_vs_ai(human_name: impl Into<String>, ai_name: impl Into<String>) -> Self {
        Self::with_players(
            GameMode::PvAI,
            Player::human(human_name, ColorType::Light),
            Player::ai(ai_name, ColorType::Dark),
        )
    }

    /// 設定からゲームを作成する
    pub fn from_config(config: &GameConfig) -> Self {
        match config.mode {
            GameMode::PvP => Self::new(config.light_player_name.clone(), config.dark_player_name.clone()),
            GameMode::PvAI => Self::new_vs_ai(config.light_player_name.clone(), config.dark_player_name.clone()),
        }
    }

    fn with_players(mode: GameMode, light_player: Player, dark_player: Player) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board: Board::new(),
            mode,
            light_player,
            dark_player,
            current_turn: ColorType::Light,
            move_history: VecDeque::new(),
            created_at: now,
            last_updated: now,
        }
    }

    /// 任意の盤面から始めるゲームを作成する
    /// テストや局面の検証に使用
    pub fn with_board(mut self, board: Board, current_turn: ColorType) -> Self {
        self.board = board;
        self.current_turn = current_turn;
        self.move_history.clear();
        self
    }

    pub fn light_player(&self) -> &Player {
        &self.light_player
    }

    pub fn dark_player(&self) -> &Player {
        &self.dark_player
    }

    /// 指定した色のプレイヤー
    pub fn player(&self, color: ColorType) -> &Player {
        match color {
            ColorType::Light => &self.light_player,
            ColorType::Dark => &self.dark_player,
        }
    }

    /// 現在の手番のプレイヤー
    pub fn current_player(&self) -> &Player {
        self.player(self.current_turn)
    }

    /// PvAIモードのAIプレイヤー
    pub fn ai_player(&self) -> Option<&Player> {
        if self.mode != GameMode::PvAI {
            return None;
        }
        [&self.light_player, &self.dark_player]
            .into_iter()
            .find(|player| player.is_ai())
    }

    /// 手の履歴（新しい順）
    pub fn move_history(&self) -> impl Iterator<Item = &Move> {
        self.move_history.iter()
    }

    /// 直前の手
    pub fn last_move(&self) -> Option<&Move> {
        self.move_history.front()
    }

    /// これまでの手数を取得する
    pub fn get_move_count(&self) -> usize {
        self.move_history.len()
    }

    /// 現在の手番のプレイヤーの合法手
    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.get_all_possible_moves(self.current_player())
    }

    /// 手を実行する
    /// 手番と駒の所有者を確認してから盤面に委譲し、成功すれば履歴に追加して手番を交代する
    pub fn make_move(&mut self, game_move: Move) -> Result<Move> {
        let current = self.current_player();
        if game_move.player != *current {
            warn!(player = game_move.player.name(), current = current.name(), "move attempted out of turn");
            return Err(GameError::WrongTurnOrOwnership);
        }
        if let Some(piece) = self.board.get_piece(game_move.from.position) {
            if piece.color != self.current_turn {
                warn!(from = %game_move.from.position, "move attempted with an opponent's piece");
                return Err(GameError::WrongTurnOrOwnership);
            }
        }

        let validated = match self.board.apply_move(&game_move) {
            Ok(validated) => validated,
            Err(violation) => {
                debug!(%violation, "move rejected by board");
                return Err(GameError::IllegalDestination {
                    from: game_move.from.position,
                    to: game_move.to.position,
                });
            }
        };

        // 履歴には盤面が実際に取ったマスと動かした駒を記録する
        let mut recorded = game_move;
        recorded.from = recorded.from.with_piece(validated.piece);
        recorded.captured = validated.captured;
        recorded.is_promotion = CheckersRules::is_promotion(validated.piece, recorded.to.position);

        debug!(
            player = recorded.player.name(),
            from = %recorded.from.position,
            to = %recorded.to.position,
            capture = recorded.is_capture(),
            promotion = recorded.is_promotion,
            "move applied"
        );

        self.move_history.push_front(recorded.clone());
        self.switch_turn();

        if self.is_game_finished() {
            match self.get_winner() {
                Some(winner) => info!(winner = winner.name(), "game finished"),
                None => info!("game finished without a winner"),
            }
        }

        Ok(recorded)
    }

    /// 直前の手を取り消し、手番を戻す
    pub fn undo_move(&mut self) -> Result<Move> {
        let last = self.move_history.pop_front().ok_or(GameError::NoMovesToUndo)?;

        if !self.board.undo_move_piece(&last) {
            warn!(from = %last.from.position, to = %last.to.position, "history does not match the board");
            self.move_history.push_front(last);
            return Err(GameError::InconsistentHistory);
        }

        self.switch_turn();
        debug!(from = %last.from.position, to = %last.to.position, "move undone");
        Ok(last)
    }

    /// 取り消し可能か
    /// PvAIではプレイヤーとAIの2手がそろって初めて取り消せる
    pub fn can_undo(&self) -> bool {
        match self.mode {
            GameMode::PvP => !self.move_history.is_empty(),
            GameMode::PvAI => self.move_history.len() >= 2,
        }
    }

    /// 人間の手番に戻るまで手を取り消す
    /// PvPでは1手、PvAIではAIの手とその前のプレイヤーの手をまとめて戻す
    pub fn undo_turn(&mut self) -> Result<Vec<Move>> {
        let mut undone = vec![self.undo_move()?];
        while self.is_ai_turn() {
            match self.undo_move() {
                Ok(game_move) => undone.push(game_move),
                Err(GameError::NoMovesToUndo) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(undone)
    }

    /// どちらかのプレイヤーに合法手がなければ終了
    pub fn is_game_finished(&self) -> bool {
        self.board.get_all_possible_moves(&self.light_player).is_empty()
            || self.board.get_all_possible_moves(&self.dark_player).is_empty()
    }

    /// 合法手が残っている側を勝者とする
    /// 両者とも動ける、または両者とも動けない場合はNone
    pub fn get_winner(&self) -> Option<&Player> {
        let light_blocked = self.board.get_all_possible_moves(&self.light_player).is_empty();
        let dark_blocked = self.board.get_all_possible_moves(&self.dark_player).is_empty();

        match (light_blocked, dark_blocked) {
            (true, false) => Some(&self.dark_player),
            (false, true) => Some(&self.light_player),
            _ => None,
        }
    }

    /// PvAIモードでAIの手番か
    pub fn is_ai_turn(&self) -> bool {
        self.mode == GameMode::PvAI && self.current_player().is_ai()
    }

    /// AIの手を選んで実行する
    /// PvAI以外では何もしない。選択は強制取りを反映した合法手の先頭
    pub fn make_ai_move(&mut self) -> Result<Option<Move>> {
        if self.mode != GameMode::PvAI {
            return Ok(None);
        }

        let selected = FirstMoveAI::new().select_move(self)?;
        self.make_move(selected).map(Some)
    }

    fn switch_turn(&mut self) {
        self.current_turn = self.current_turn.opposite();
        self.last_updated = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AIError;
    use crate::game::{Piece, Position, Square};

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    fn move_for(game: &Game, player: &Player, from: Position, to: Position) -> Move {
        Move::new(
            game.board.get_square(from).unwrap(),
            game.board.get_square(to).unwrap(),
            None,
            player.clone(),
        )
    }

    #[test]
    fn test_game_new() {
        let game = Game::new("Alice", "Bob");

        assert_eq!(game.mode, GameMode::PvP);
        assert_eq!(game.current_player().color(), ColorType::Light);
        assert_eq!(game.current_player().name(), "Alice");
        assert_eq!(game.dark_player().name(), "Bob");
        assert_eq!(game.get_move_count(), 0);
        assert!(game.ai_player().is_none());
    }

    #[test]
    fn test_first_move_switches_turn() {
        let mut game = Game::new("Alice", "Bob");
        let alice = game.light_player().clone();

        let game_move = move_for(&game, &alice, pos(5, 0), pos(4, 1));
        let result = game.make_move(game_move);

        assert!(result.is_ok());
        assert_eq!(game.get_move_count(), 1);
        assert_eq!(game.current_player().name(), "Bob");
        assert_eq!(game.board.get_piece(pos(4, 1)), Some(Piece::man(ColorType::Light)));
    }

    #[test]
    fn test_wrong_turn_rejected() {
        let mut game = Game::new("Alice", "Bob");
        let bob = game.dark_player().clone();

        let game_move = move_for(&game, &bob, pos(2, 1), pos(3, 2));
        let result = game.make_move(game_move);

        assert!(matches!(result, Err(GameError::WrongTurnOrOwnership)));
        assert_eq!(game.get_move_count(), 0);
        assert_eq!(game.current_player().name(), "Alice");
    }

    #[test]
    fn test_opponent_piece_rejected() {
        let mut game = Game::new("Alice", "Bob");
        let alice = game.light_player().clone();

        let game_move = move_for(&game, &alice, pos(2, 1), pos(3, 2));
        assert!(matches!(game.make_move(game_move), Err(GameError::WrongTurnOrOwnership)));
    }

    #[test]
    fn test_illegal_destination_rejected() {
        let mut game = Game::new("Alice", "Bob");
        let alice = game.light_player().clone();
        let before = game.board.clone();

        let game_move = move_for(&game, &alice, pos(5, 0), pos(3, 2));
        let result = game.make_move(game_move);

        assert!(matches!(result, Err(GameError::IllegalDestination { .. })));
        assert_eq!(game.board, before);
        assert_eq!(game.current_player().name(), "Alice");
    }

    #[test]
    fn test_promotion_flag_recomputed() {
        let mut board = Board::empty();
        board.set_piece(pos(1, 2), Some(Piece::man(ColorType::Light)));
        board.set_piece(pos(7, 0), Some(Piece::man(ColorType::Dark)));
        let mut game = Game::new("Alice", "Bob").with_board(board, ColorType::Light);
        let alice = game.light_player().clone();

        let game_move = move_for(&game, &alice, pos(1, 2), pos(0, 1));
        assert!(!game_move.is_promotion);

        let recorded = game.make_move(game_move).unwrap();
        assert!(recorded.is_promotion);
        assert_eq!(game.board.get_piece(pos(0, 1)), Some(Piece::king(ColorType::Light)));

        game.undo_move().unwrap();
        assert_eq!(game.board.get_piece(pos(1, 2)), Some(Piece::man(ColorType::Light)));
    }

    #[test]
    fn test_capture_without_captured_square_is_undone() {
        let mut game = Game::new("Alice", "Bob");
        let alice = game.light_player().clone();
        let bob = game.dark_player().clone();

        game.make_move(move_for(&game, &alice, pos(5, 4), pos(4, 3))).unwrap();
        game.make_move(move_for(&game, &bob, pos(2, 1), pos(3, 2))).unwrap();
        let before = game.board.clone();

        let game_move = move_for(&game, &alice, pos(4, 3), pos(2, 1));
        assert!(game_move.captured.is_none());

        let recorded = game.make_move(game_move).unwrap();
        let captured = recorded.captured.unwrap();
        assert_eq!(captured.position, pos(3, 2));
        assert_eq!(captured.piece, Some(Piece::man(ColorType::Dark)));
        assert_eq!(game.board.count_pieces(ColorType::Dark), 11);

        game.undo_move().unwrap();
        assert_eq!(game.board, before);
        assert_eq!(game.board.count_pieces(ColorType::Dark), 12);
    }

    #[test]
    fn test_recorded_capture_uses_board_snapshot() {
        let mut game = Game::new("Alice", "Bob");
        let alice = game.light_player().clone();
        let bob = game.dark_player().clone();

        game.make_move(move_for(&game, &alice, pos(5, 4), pos(4, 3))).unwrap();
        game.make_move(move_for(&game, &bob, pos(2, 1), pos(3, 2))).unwrap();
        let before = game.board.clone();

        // 位置は正しいが駒の内容が違う取りマスを渡す
        let mut game_move = move_for(&game, &alice, pos(4, 3), pos(2, 1));
        game_move.captured = Some(Square::new(pos(3, 2), Some(Piece::king(ColorType::Light))));

        let recorded = game.make_move(game_move).unwrap();
        assert_eq!(recorded.captured.unwrap().piece, Some(Piece::man(ColorType::Dark)));

        game.undo_move().unwrap();
        assert_eq!(game.board, before);
    }

    #[test]
    fn test_king_on_far_row_is_not_promotion() {
        let mut board = Board::empty();
        board.set_piece(pos(1, 2), Some(Piece::king(ColorType::Light)));
        board.set_piece(pos(5, 0), Some(Piece::man(ColorType::Dark)));
        let mut game = Game::new("Alice", "Bob").with_board(board, ColorType::Light);
        let alice = game.light_player().clone();

        let recorded = game.make_move(move_for(&game, &alice, pos(1, 2), pos(0, 1))).unwrap();
        assert!(!recorded.is_promotion);

        game.undo_move().unwrap();
        assert_eq!(game.board.get_piece(pos(1, 2)), Some(Piece::king(ColorType::Light)));
    }

    #[test]
    fn test_undo_move() {
        let mut game = Game::new("Alice", "Bob");
        assert!(matches!(game.undo_move(), Err(GameError::NoMovesToUndo)));

        let alice = game.light_player().clone();
        let before = game.board.clone();
        game.make_move(move_for(&game, &alice, pos(5, 0), pos(4, 1))).unwrap();

        assert!(game.undo_move().is_ok());
        assert_eq!(game.get_move_count(), 0);
        assert_eq!(game.current_player(), &alice);
        assert_eq!(game.board, before);
    }

    #[test]
    fn test_history_is_most_recent_first() {
        let mut game = Game::new("Alice", "Bob");
        let alice = game.light_player().clone();
        let bob = game.dark_player().clone();

        game.make_move(move_for(&game, &alice, pos(5, 0), pos(4, 1))).unwrap();
        game.make_move(move_for(&game, &bob, pos(2, 1), pos(3, 2))).unwrap();

        let history: Vec<&Move> = game.move_history().collect();
        assert_eq!(history[0].player, bob);
        assert_eq!(history[1].player, alice);
        assert_eq!(game.last_move().map(|m| m.to.position), Some(pos(3, 2)));
    }

    #[test]
    fn test_can_undo_pvp() {
        let mut game = Game::new("Alice", "Bob");
        assert!(!game.can_undo());

        let alice = game.light_player().clone();
        game.make_move(move_for(&game, &alice, pos(5, 0), pos(4, 1))).unwrap();
        assert!(game.can_undo());
    }

    #[test]
    fn test_can_undo_pvai() {
        let mut game = Game::new_vs_ai("Alice", "Computer");
        let alice = game.light_player().clone();

        game.make_move(move_for(&game, &alice, pos(5, 0), pos(4, 1))).unwrap();
        assert!(!game.can_undo());

        game.make_ai_move().unwrap();
        assert!(game.can_undo());
    }

    #[test]
    fn test_undo_turn_pvai_returns_to_human() {
        let mut game = Game::new_vs_ai("Alice", "Computer");
        let alice = game.light_player().clone();
        let before = game.board.clone();

        game.make_move(move_for(&game, &alice, pos(5, 0), pos(4, 1))).unwrap();
        game.make_ai_move().unwrap();

        let undone = game.undo_turn().unwrap();
        assert_eq!(undone.len(), 2);
        assert_eq!(game.get_move_count(), 0);
        assert_eq!(game.current_player(), &alice);
        assert_eq!(game.board, before);
    }

    #[test]
    fn test_is_ai_turn() {
        let mut game = Game::new_vs_ai("Alice", "Computer");
        assert!(!game.is_ai_turn());

        let alice = game.light_player().clone();
        game.make_move(move_for(&game, &alice, pos(5, 0), pos(4, 1))).unwrap();
        assert!(game.is_ai_turn());

        let pvp = Game::new("Alice", "Bob");
        assert!(!pvp.is_ai_turn());
    }

    #[test]
    fn test_make_ai_move_takes_first_legal_move() {
        let mut game = Game::new_vs_ai("Alice", "Computer");
        let alice = game.light_player().clone();
        game.make_move(move_for(&game, &alice, pos(5, 0), pos(4, 1))).unwrap();

        let expected = game.legal_moves().remove(0);
        let played = game.make_ai_move().unwrap().unwrap();

        assert_eq!(played.from, expected.from);
        assert_eq!(played.to, expected.to);
        assert_eq!(game.current_player(), &alice);
    }

    #[test]
    fn test_make_ai_move_noop_in_pvp() {
        let mut game = Game::new("Alice", "Bob");
        assert!(game.make_ai_move().unwrap().is_none());
        assert_eq!(game.get_move_count(), 0);
    }

    #[test]
    fn test_make_ai_move_without_moves() {
        let mut board = Board::empty();
        board.set_piece(pos(5, 0), Some(Piece::man(ColorType::Light)));
        let mut game = Game::new_vs_ai("Alice", "Computer").with_board(board, ColorType::Dark);

        let result = game.make_ai_move();
        assert!(matches!(result, Err(GameError::AIError { source: AIError::NoValidMoves })));
    }

    #[test]
    fn test_game_finished_and_winner() {
        let game = Game::new("Alice", "Bob");
        assert!(!game.is_game_finished());
        assert!(game.get_winner().is_none());

        // 黒の駒がない盤面
        let mut board = Board::empty();
        board.set_piece(pos(5, 0), Some(Piece::man(ColorType::Light)));
        let game = Game::new("Alice", "Bob").with_board(board, ColorType::Dark);

        assert!(game.is_game_finished());
        assert_eq!(game.get_winner().map(Player::name), Some("Alice"));
    }

    #[test]
    fn test_blocked_player_loses() {
        // 黒のManが白の2枚に前を塞がれて動けない
        let mut board = Board::empty();
        board.set_piece(pos(6, 1), Some(Piece::man(ColorType::Dark)));
        board.set_piece(pos(7, 0), Some(Piece::man(ColorType::Light)));
        board.set_piece(pos(7, 2), Some(Piece::man(ColorType::Light)));
        let game = Game::new("Alice", "Bob").with_board(board, ColorType::Dark);

        assert_eq!(game.board.count_pieces(ColorType::Dark), 1);
        assert!(game.is_game_finished());
        assert_eq!(game.get_winner().map(Player::name), Some("Alice"));
    }

    #[test]
    fn test_both_blocked_has_no_winner() {
        let game = Game::new("Alice", "Bob").with_board(Board::empty(), ColorType::Light);

        assert!(game.is_game_finished());
        assert!(game.get_winner().is_none());
    }

    #[test]
    fn test_from_config() {
        let config = GameConfig {
            mode: GameMode::PvAI,
            light_player_name: "Carol".to_string(),
            dark_player_name: "Bot".to_string(),
        };
        let game = Game::from_config(&config);

        assert_eq!(game.mode, GameMode::PvAI);
        assert_eq!(game.light_player().name(), "Carol");
        assert_eq!(game.ai_player().map(Player::name), Some("Bot"));
    }
}
