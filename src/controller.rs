//! 画面と盤面をつなぐコントローラモジュール
//! マスのクリックを盤面への問い合わせとGame::make_moveの呼び出しに変換し、
//! AIの手番では思考をバックグラウンドタスクで行い、結果をチャネル経由で受け取る。
//! Game/Boardを変更するのは常にコントローラの所有者だけ。

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::ai::service::{AIMoveResult, AIService};
use crate::error::{AIError, GameError, Result};
use crate::game::{Board, Game, Move, Position};

/// 盤面描画を担当する外部コンポーネントのインターフェース
pub trait View {
    /// 現在の駒配置で全マスを描き直す
    fn render(&mut self, board: &Board);
    /// 移動先候補のマスを強調表示する（空で解除）
    fn highlight_squares(&mut self, positions: &[Position]);
    /// エラーメッセージを表示する
    fn log_error(&mut self, message: &str);
    /// 勝者（引き分けの場合は"Draw"）を表示する
    fn show_winner(&mut self, name: &str);
    /// AIの思考中に入力を止める
    fn disable_input(&mut self);
    /// 入力を再開する
    fn enable_input(&mut self);
}

/// コントローラの所有者に届くイベント
#[derive(Debug)]
pub enum ControllerEvent {
    /// AIの思考が完了した
    AIMoveReady(std::result::Result<AIMoveResult, AIError>),
}

/// 引き分け時にshow_winnerへ渡す名前
pub const DRAW: &str = "Draw";

pub struct Controller<V: View> {
    game: Game,
    view: V,
    ai_service: Arc<dyn AIService>,
    events: UnboundedSender<ControllerEvent>,
    selected: Option<Position>,
    candidates: Vec<Move>,
    ai_pending: bool,
}

impl<V: View> std::fmt::Debug for Controller<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("game", &self.game.id)
            .field("ai_service", &self.ai_service.get_name())
            .field("selected", &self.selected)
            .field("ai_pending", &self.ai_pending)
            .finish()
    }
}

impl<V: View> Controller<V> {
    /// コントローラとイベント受信側を作成する
    /// 受信したイベントはhandle_eventに渡すこと
    pub fn new(
        game: Game,
        view: V,
        ai_service: Arc<dyn AIService>,
    ) -> (Self, UnboundedReceiver<ControllerEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let controller = Self {
            game,
            view,
            ai_service,
            events,
            selected: None,
            candidates: Vec::new(),
            ai_pending: false,
        };
        (controller, receiver)
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn is_ai_pending(&self) -> bool {
        self.ai_pending
    }

    /// 初期盤面を描画し、AIが先手なら思考を開始する
    pub fn start(&mut self) {
        self.view.render(&self.game.board);
        self.after_move();
    }

    /// マスがクリックされたときの処理
    pub fn on_square_clicked(&mut self, position: Position) {
        if self.ai_pending {
            debug!(%position, "click ignored while the AI is thinking");
            return;
        }
        if self.game.is_game_finished() {
            self.view.log_error("The game is over");
            return;
        }
        if self.game.is_ai_turn() {
            self.view.log_error("Waiting for the AI move");
            return;
        }

        if self.selected.is_some() {
            if let Some(game_move) = self.candidates.iter().find(|m| m.to.position == position).cloned() {
                self.clear_selection();
                self.play(game_move);
                return;
            }
        }

        self.select(position);
    }

    /// 手を取り消す
    /// AIの思考中は拒否する。PvAIではプレイヤーの手番まで戻す
    pub fn undo(&mut self) -> Result<Vec<Move>> {
        if self.ai_pending {
            self.view.log_error(&GameError::AITurnPending.to_string());
            return Err(GameError::AITurnPending);
        }
        if !self.game.can_undo() {
            self.view.log_error(&GameError::NoMovesToUndo.to_string());
            return Err(GameError::NoMovesToUndo);
        }

        self.clear_selection();
        let undone = self.game.undo_turn();
        match &undone {
            Ok(moves) => {
                info!(count = moves.len(), "moves undone");
                // AIの失敗後に止めていた入力を戻す
                if !self.game.is_ai_turn() {
                    self.view.enable_input();
                }
            }
            Err(e) => self.view.log_error(&e.to_string()),
        }
        self.view.render(&self.game.board);
        undone
    }

    /// 失敗したAIの思考をやり直す
    /// AIの手番で、思考中でない場合のみ受け付ける
    pub fn retry_ai_move(&mut self) {
        if self.ai_pending || self.game.is_game_finished() || !self.game.is_ai_turn() {
            self.view.log_error("No AI move to retry");
            return;
        }
        info!("retrying AI move");
        self.schedule_ai_move();
    }

    /// 所有者のコンテキストでイベントを処理する
    pub fn handle_event(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::AIMoveReady(result) => self.on_ai_move_ready(result),
        }
    }

    fn select(&mut self, position: Position) {
        let candidates: Vec<Move> = self
            .game
            .legal_moves()
            .into_iter()
            .filter(|m| m.from.position == position)
            .collect();

        if candidates.is_empty() {
            let message = match self.game.board.get_piece(position) {
                Some(piece) if piece.color == self.game.current_player().color() => {
                    format!("No legal moves from {}", position)
                }
                Some(_) => format!("{} is not your piece", position),
                None => format!("No piece to move at {}", position),
            };
            self.clear_selection();
            self.view.log_error(&message);
            return;
        }

        let destinations: Vec<Position> = candidates.iter().map(|m| m.to.position).collect();
        self.selected = Some(position);
        self.candidates = candidates;
        self.view.highlight_squares(&destinations);
    }

    fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            self.candidates.clear();
            self.view.highlight_squares(&[]);
        }
    }

    fn play(&mut self, game_move: Move) {
        match self.game.make_move(game_move) {
            Ok(_) => {
                self.view.render(&self.game.board);
                self.after_move();
            }
            Err(e) => {
                warn!(error = %e, "move rejected");
                self.view.log_error(&e.to_string());
            }
        }
    }

    /// 終局なら勝者を表示し、そうでなければ必要に応じてAIの思考を開始する
    fn after_move(&mut self) {
        if self.game.is_game_finished() {
            let winner = self.game.get_winner().map(|p| p.name().to_string());
            self.view.show_winner(winner.as_deref().unwrap_or(DRAW));
            return;
        }
        if self.game.is_ai_turn() {
            self.schedule_ai_move();
        }
    }

    /// AIの手をバックグラウンドで計算する
    /// タスクはゲームのスナップショットのみを扱い、結果をイベントとして送り返す
    fn schedule_ai_move(&mut self) {
        self.ai_pending = true;
        self.view.disable_input();

        let snapshot = self.game.clone();
        let ai_service = Arc::clone(&self.ai_service);
        let events = self.events.clone();

        debug!(service = ai_service.get_name(), "scheduling AI move");
        tokio::spawn(async move {
            let result = ai_service.calculate_move(&snapshot).await;
            if events.send(ControllerEvent::AIMoveReady(result)).is_err() {
                warn!("controller dropped before the AI move arrived");
            }
        });
    }

    fn on_ai_move_ready(&mut self, result: std::result::Result<AIMoveResult, AIError>) {
        if !self.ai_pending {
            warn!("unexpected AI result ignored");
            return;
        }
        self.ai_pending = false;

        // 失敗時はAIの手番のまま入力を止めておき、retry_ai_moveを待つ
        match result {
            Ok(ai_result) => {
                debug!(thinking_time_ms = ai_result.thinking_time_ms, "AI move received");
                self.view.enable_input();
                self.play(ai_result.game_move);
            }
            Err(e) => {
                warn!(error = %e, "AI move failed");
                self.view.log_error(&GameError::from(e).to_string());
            }
        }
    }
}
