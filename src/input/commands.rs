//! コマンドシステム
//!
//! シンボリックなコマンド名と編集アクションの対応付け、および
//! モード・カーソル・キルリング・ホストバッファを束ねる
//! ディスパッチ処理

use crate::editor::kill_ring::KillRing;
use crate::editor::mode::{Mode, ModeController};
use crate::editor::motion::{Motion, Position};
use crate::editor::region::SelectionResolver;
use crate::error::EmarkError;
use crate::host::HostBuffer;

/// コマンド実行の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// 実行が成功したか
    pub success: bool,
    /// 通知メッセージ（ベストエフォートで表示される）
    pub message: Option<String>,
    /// 画面更新が必要か
    pub needs_refresh: bool,
}

impl CommandResult {
    /// 成功結果を作成
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
            needs_refresh: true,
        }
    }

    /// メッセージ付き成功結果を作成
    pub fn success_with_message(message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            needs_refresh: true,
        }
    }

    /// 画面更新なしの成功結果を作成
    pub fn success_no_refresh() -> Self {
        Self {
            success: true,
            message: None,
            needs_refresh: false,
        }
    }

    /// エラー結果を作成
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            needs_refresh: false,
        }
    }
}

/// コマンドの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    KillLine,
    Cut,
    Copy,
    Yank,
    Undo,
    Redo,
    Quit,
    ToggleMark,
    SetMark,
    ExchangePointAndMark,
    InsertBlankLineBefore,
    InsertBlankLineAfter,
}

impl Command {
    /// シンボリック名からコマンドを解決
    ///
    /// 未知の名前はバインディング層の設定ミスであり、
    /// 状態機械には到達させない
    pub fn from_name(name: &str) -> crate::error::Result<Self> {
        match name {
            "kill-line" => Ok(Command::KillLine),
            "cut" => Ok(Command::Cut),
            "copy" => Ok(Command::Copy),
            "yank" => Ok(Command::Yank),
            "undo" => Ok(Command::Undo),
            "redo" => Ok(Command::Redo),
            "quit" => Ok(Command::Quit),
            "toggle-mark" => Ok(Command::ToggleMark),
            "set-mark" => Ok(Command::SetMark),
            "exchange-point-and-mark" => Ok(Command::ExchangePointAndMark),
            "insert-blank-line-before" => Ok(Command::InsertBlankLineBefore),
            "insert-blank-line-after" => Ok(Command::InsertBlankLineAfter),
            _ => Err(EmarkError::InvalidCommandName {
                name: name.to_string(),
            }),
        }
    }

    /// シンボリック名
    pub fn name(&self) -> &'static str {
        match self {
            Command::KillLine => "kill-line",
            Command::Cut => "cut",
            Command::Copy => "copy",
            Command::Yank => "yank",
            Command::Undo => "undo",
            Command::Redo => "redo",
            Command::Quit => "quit",
            Command::ToggleMark => "toggle-mark",
            Command::SetMark => "set-mark",
            Command::ExchangePointAndMark => "exchange-point-and-mark",
            Command::InsertBlankLineBefore => "insert-blank-line-before",
            Command::InsertBlankLineAfter => "insert-blank-line-after",
        }
    }

    /// コマンドの説明を取得
    pub fn description(&self) -> &'static str {
        match self {
            Command::KillLine => "行末までキル",
            Command::Cut => "リージョンを切り取り",
            Command::Copy => "リージョンをコピー",
            Command::Yank => "キルリングから貼り付け",
            Command::Undo => "直前の操作を取り消し",
            Command::Redo => "取り消した操作をやり直し",
            Command::Quit => "操作をキャンセル",
            Command::ToggleMark => "マークモードを切り替え",
            Command::SetMark => "マークを設定",
            Command::ExchangePointAndMark => "カーソルとマークを交換",
            Command::InsertBlankLineBefore => "現在行の前に空行を挿入",
            Command::InsertBlankLineAfter => "現在行の後に空行を挿入",
        }
    }
}

/// 空行挿入の位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlankLine {
    Before,
    After,
}

/// ホスト編集の完了後に反映する凍結済み状態
///
/// 編集要求の発行前に確定させ、完了通知後はこの値だけを適用する。
/// 完了後のライブなフィールドから導出し直してはならない
#[derive(Debug, Clone, Copy)]
struct EditCommit {
    cursor: Position,
    mode: Mode,
}

/// コマンドディスパッチャ
///
/// 1ドキュメントにつき1インスタンス。編集状態機械の全体を所有し、
/// ホストバッファは各コマンド実行時に外から渡される
#[derive(Debug, Default)]
pub struct Dispatcher {
    motion: Motion,
    mode: ModeController,
    kill_ring: KillRing,
    /// 直前のキル実行直前のカーソル位置。キル連鎖の判定にのみ使う
    last_kill_point: Option<Position>,
}

impl Dispatcher {
    /// 新しいディスパッチャを作成
    pub fn new() -> Self {
        Self {
            motion: Motion::new(),
            mode: ModeController::new(),
            kill_ring: KillRing::new(),
            last_kill_point: None,
        }
    }

    /// 論理カーソルへの参照
    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    /// モード管理への参照
    pub fn mode(&self) -> &ModeController {
        &self.mode
    }

    /// キルリングへの参照
    pub fn kill_ring(&self) -> &KillRing {
        &self.kill_ring
    }

    /// ホスト側のカーソル移動を論理カーソルへ反映
    ///
    /// キル連鎖は位置の一致で判定されるため、移動自体の通知は
    /// 連鎖状態を直接は触らない
    pub fn move_cursor(&mut self, position: Position) {
        self.motion.move_to(position);
    }

    /// コマンドを実行
    pub fn execute(&mut self, command: Command, host: &mut dyn HostBuffer) -> CommandResult {
        match command {
            Command::KillLine => self.kill_line(host),
            Command::Cut => self.cut(host),
            Command::Copy => self.copy(host),
            Command::Yank => self.yank(host),
            Command::Undo => self.undo(host),
            Command::Redo => self.redo(host),
            Command::Quit => self.quit(),
            Command::ToggleMark => self.toggle_mark(),
            Command::SetMark => self.set_mark(),
            Command::ExchangePointAndMark => self.exchange_point_and_mark(),
            Command::InsertBlankLineBefore => self.insert_blank_line(host, BlankLine::Before),
            Command::InsertBlankLineAfter => self.insert_blank_line(host, BlankLine::After),
        }
    }

    /// シンボリック名でコマンドを実行
    pub fn execute_named(
        &mut self,
        name: &str,
        host: &mut dyn HostBuffer,
    ) -> crate::error::Result<CommandResult> {
        Ok(self.execute(Command::from_name(name)?, host))
    }

    /// 行キル
    ///
    /// 行末より手前なら行末までをマーク選択として張ってからキルする。
    /// 行末にいる場合はリージョンなしのキルになり、改行だけが
    /// リングに積まれる
    fn kill_line(&mut self, host: &mut dyn HostBuffer) -> CommandResult {
        let point = self.motion.current();
        let kill_again = self.last_kill_point == Some(point);

        if !self.motion.is_line_end(host) {
            self.mode.enter_mark_region(point);
            let end = self.motion.line_end(host);
            self.motion.move_to(end);
        }

        let result = self.kill(kill_again, host);
        if result.success {
            self.last_kill_point = Some(point);
        }
        result
    }

    /// キル本体
    ///
    /// リージョンがあれば削除してリングへ、なければ改行だけをリングへ。
    /// どちらの経路でもモードはNormalに戻る
    fn kill(&mut self, kill_again: bool, host: &mut dyn HostBuffer) -> CommandResult {
        match SelectionResolver::resolve(&self.mode, &self.motion, host) {
            Some(region) => {
                let text = host.read_text(&region);
                let commit = EditCommit {
                    cursor: region.start,
                    mode: Mode::Normal,
                };
                if !host.delete_range(&region) {
                    return self.rejected("delete");
                }
                if kill_again {
                    self.kill_ring.append(&text);
                } else {
                    self.kill_ring.replace(text);
                }
                self.apply_commit(commit);
                CommandResult::success()
            }
            None => {
                if kill_again {
                    self.kill_ring.append("\n");
                } else {
                    self.kill_ring.replace("\n".to_string());
                }
                self.mode.enter_normal();
                CommandResult::success()
            }
        }
    }

    /// リージョンの切り取り
    fn cut(&mut self, host: &mut dyn HostBuffer) -> CommandResult {
        self.last_kill_point = None;
        match SelectionResolver::resolve(&self.mode, &self.motion, host) {
            None => CommandResult::error(EmarkError::NoActiveRegion.to_string()),
            Some(region) => {
                let text = host.read_text(&region);
                let commit = EditCommit {
                    cursor: region.start,
                    mode: Mode::Normal,
                };
                if !host.delete_range(&region) {
                    return self.rejected("delete");
                }
                self.kill_ring.replace(text);
                self.apply_commit(commit);
                CommandResult::success_with_message("リージョンを切り取りました".to_string())
            }
        }
    }

    /// リージョンのコピー
    ///
    /// バッファもモードも変更しない
    fn copy(&mut self, host: &mut dyn HostBuffer) -> CommandResult {
        self.last_kill_point = None;
        match SelectionResolver::resolve(&self.mode, &self.motion, host) {
            None => CommandResult::error(EmarkError::NoActiveRegion.to_string()),
            Some(region) => {
                let text = host.read_text(&region);
                self.kill_ring.replace(text);
                CommandResult::success_with_message("リージョンをコピーしました".to_string())
            }
        }
    }

    /// ヤンク
    ///
    /// 空のキルリングはエラーではなく空挿入として成功する
    fn yank(&mut self, host: &mut dyn HostBuffer) -> CommandResult {
        self.last_kill_point = None;
        let text = self.kill_ring.read().to_string();
        if text.is_empty() {
            return CommandResult::success_no_refresh();
        }

        let point = self.motion.current();
        let commit = EditCommit {
            cursor: advance(point, &text),
            mode: self.mode.mode(),
        };
        if !host.insert_text(point, &text) {
            return self.rejected("insert");
        }
        self.apply_commit(commit);
        CommandResult::success_with_message("ヤンクしました".to_string())
    }

    /// ホスト側undoへ委譲
    fn undo(&mut self, host: &mut dyn HostBuffer) -> CommandResult {
        self.last_kill_point = None;
        host.undo();
        CommandResult::success_with_message("取り消しました".to_string())
    }

    /// ホスト側redoへ委譲
    fn redo(&mut self, host: &mut dyn HostBuffer) -> CommandResult {
        self.last_kill_point = None;
        host.redo();
        CommandResult::success_with_message("やり直しました".to_string())
    }

    /// 操作のキャンセル
    ///
    /// 進行中のホスト編集があっても即座に成功し、失敗しない
    fn quit(&mut self) -> CommandResult {
        self.last_kill_point = None;
        self.mode.enter_normal();
        CommandResult::success_with_message("Quit".to_string())
    }

    /// マークモードの切り替え
    fn toggle_mark(&mut self) -> CommandResult {
        self.last_kill_point = None;
        self.mode.toggle(self.motion.current());
        let message = if self.mode.is_mark_region() {
            "マークを設定しました"
        } else {
            "マークを解除しました"
        };
        CommandResult::success_with_message(message.to_string())
    }

    /// マークの設定
    fn set_mark(&mut self) -> CommandResult {
        self.last_kill_point = None;
        self.mode.enter_mark_region(self.motion.current());
        CommandResult::success_with_message("マークを設定しました".to_string())
    }

    /// カーソルとマークの交換
    fn exchange_point_and_mark(&mut self) -> CommandResult {
        self.last_kill_point = None;
        match self.mode.swap_mark(self.motion.current()) {
            Some(new_point) => {
                self.motion.move_to(new_point);
                CommandResult::success()
            }
            None => CommandResult::error("マークが設定されていません".to_string()),
        }
    }

    /// 空行の挿入
    ///
    /// beforeは現在行の行頭、afterは現在行の行末に改行を入れる。
    /// カーソルを新しい行頭へ移すのはafterだけ
    fn insert_blank_line(
        &mut self,
        host: &mut dyn HostBuffer,
        placement: BlankLine,
    ) -> CommandResult {
        self.last_kill_point = None;
        let (at, commit) = match placement {
            BlankLine::Before => (
                self.motion.line_begin(),
                EditCommit {
                    cursor: self.motion.current(),
                    mode: self.mode.mode(),
                },
            ),
            BlankLine::After => (
                self.motion.line_end(host),
                EditCommit {
                    cursor: self.motion.next_line(0),
                    mode: self.mode.mode(),
                },
            ),
        };

        if !host.insert_text(at, "\n") {
            return self.rejected("insert");
        }
        self.apply_commit(commit);
        CommandResult::success()
    }

    /// 凍結済み状態の反映
    fn apply_commit(&mut self, commit: EditCommit) {
        self.motion.move_to(commit.cursor);
        self.mode.restore(commit.mode);
    }

    /// 拒否された編集の共通処理
    ///
    /// 編集は起きていないので、モードもキルリングも触らない
    fn rejected(&mut self, operation: &str) -> CommandResult {
        self.last_kill_point = None;
        log::warn!("host rejected {} request", operation);
        CommandResult::error(
            EmarkError::BufferEditRejected {
                operation: operation.to_string(),
            }
            .to_string(),
        )
    }
}

/// 挿入テキストの分だけ進めた位置
fn advance(origin: Position, text: &str) -> Position {
    let newlines = text.matches('\n').count();
    if newlines == 0 {
        Position::new(origin.line, origin.column + text.chars().count())
    } else {
        let last = text.rsplit('\n').next().unwrap_or("");
        Position::new(origin.line + newlines, last.chars().count())
    }
}
