//! emark - Emacs-style mark/kill editing core
//!
//! ホストテキストサーフェス上でEmacs風のモーダル編集を再現する
//! 状態機械。ホスト側はバッファ原始操作（範囲読み出し・挿入・
//! 削除・選択報告・行メトリクス）だけを提供すればよい

// コアモジュール
pub mod error;
pub mod host;

// 編集層
pub mod editor;

// ロジック層
pub mod input;

// 公開API
pub use editor::{KillRing, Mode, ModeController, Motion, Position, Region, SelectionResolver};
pub use error::{EmarkError, Result};
pub use host::{HostBuffer, MemoryHost};
pub use input::{Command, CommandResult, Dispatcher, KeyMap, KeySequence, KeymapConfig};
