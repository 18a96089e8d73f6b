//! 入力処理モジュール
//!
//! コマンドディスパッチとキーバインドを提供

pub mod commands;
pub mod keybinding;

pub use commands::{Command, CommandResult, Dispatcher};
pub use keybinding::{
    Key, KeyCode, KeyMap, KeyModifiers, KeyParseError, KeySequence, KeymapConfig,
};
