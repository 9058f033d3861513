//! チェッカーのコンソール版エントリポイント
//! 設定読み込み、ログ初期化、AIサービス生成を行い、標準入力からのマス指定で対局する。

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use Checkers::{
    ai::service::{AIService, AIServiceFactory},
    config::Config,
    game::{Board, Game, Position},
    Controller, View,
};

/// 標準出力に盤面を描くView実装
#[derive(Debug, Default)]
struct ConsoleView;

impl View for ConsoleView {
    fn render(&mut self, board: &Board) {
        println!("\n{}", board.display());
    }

    fn highlight_squares(&mut self, positions: &[Position]) {
        if positions.is_empty() {
            return;
        }
        let targets: Vec<String> = positions.iter().map(|p| p.to_string()).collect();
        println!("移動先: {}", targets.join(" "));
    }

    fn log_error(&mut self, message: &str) {
        eprintln!("エラー: {}", message);
    }

    fn show_winner(&mut self, name: &str) {
        println!("対局終了 - 勝者: {}", name);
    }

    fn disable_input(&mut self) {
        println!("AI思考中...");
    }

    fn enable_input(&mut self) {
        println!("あなたの番です");
    }
}

/// コンソールから受け付けるコマンド
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Click(Position),
    Undo,
    Retry,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    match parts.next()? {
        "undo" | "u" => Some(Command::Undo),
        "retry" | "r" => Some(Command::Retry),
        "quit" | "q" => Some(Command::Quit),
        row => {
            let row = row.parse().ok()?;
            let col = parts.next()?.parse().ok()?;
            Position::new(row, col).map(Command::Click)
        }
    }
}

/// メイン関数 - 設定の読み込みと対局ループを担当
#[tokio::main]
async fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("設定エラー: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.level))
        .with_writer(std::io::stderr)
        .init();

    let game = Game::from_config(&config.game);
    let ai_service: Arc<dyn AIService> = Arc::from(AIServiceFactory::create_service(&config.ai_service));
    let status = ai_service.get_status().await;
    if status.available {
        info!(service = %status.name, "AI service ready");
    } else {
        warn!(service = %status.name, "AI service is not available");
    }

    println!("チェッカー開始: {:?}", config.game.mode);
    println!("  白(先手): {}", game.light_player().name());
    println!("  黒: {}", game.dark_player().name());
    println!("マスを \"行 列\" で指定 (例: 5 0)。undo で取り消し、retry でAIの再試行、quit で終了");

    let (mut controller, mut events) = Controller::new(game, ConsoleView, ai_service);
    controller.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(event) = events.recv() => controller.handle_event(event),
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        eprintln!("入力エラー: {}", e);
                        break;
                    }
                };

                match parse_command(&line) {
                    Some(Command::Click(position)) => controller.on_square_clicked(position),
                    Some(Command::Undo) => {
                        let _ = controller.undo();
                    }
                    Some(Command::Retry) => controller.retry_ai_move(),
                    Some(Command::Quit) => break,
                    None => eprintln!("コマンドを解釈できません: {}", line.trim()),
                }
            }
        }
    }
}
