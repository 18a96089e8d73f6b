//! エラーハンドリング
//!
//! emark全体で使用される統一されたエラー型を定義。
//! コマンドはエラーを送出せず結果値で返すため、この型は
//! 通知メッセージの生成とバインディング層の検証に使われる

use crate::input::keybinding::KeyParseError;
use thiserror::Error;

/// コア全体のエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmarkError {
    /// 操作対象のリージョンが存在しない
    #[error("No active region")]
    NoActiveRegion,

    /// ホストが編集要求を拒否した
    #[error("Buffer edit rejected: {operation}")]
    BufferEditRejected { operation: String },

    /// バインディング表に存在しないコマンド名
    #[error("Unknown command: {name}")]
    InvalidCommandName { name: String },

    /// キー表記の解析失敗
    #[error("Key sequence error: {0}")]
    KeyParse(#[from] KeyParseError),
}

/// 標準Result型のエイリアス
pub type Result<T> = std::result::Result<T, EmarkError>;
