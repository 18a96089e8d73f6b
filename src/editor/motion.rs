//! カーソル移動
//!
//! 論理カーソル位置の管理と行相対移動の計算

use crate::host::HostBuffer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// バッファ内の論理位置
///
/// 行・列ともに0ベース。順序は(行, 列)の辞書順
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    /// 行番号（0ベース）
    pub line: usize,
    /// 列番号（0ベース、文字単位）
    pub column: usize,
}

impl Position {
    /// 指定位置を作成
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// バッファ先頭
    pub fn origin() -> Self {
        Self::new(0, 0)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::origin()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.column)
    }
}

/// 論理カーソル
///
/// ホストが報告するマウスカーソルとは独立に追跡される。
/// 両者のずれはリージョン解決時に吸収する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Motion {
    current: Position,
}

impl Motion {
    /// 原点に配置されたカーソルを作成
    pub fn new() -> Self {
        Self {
            current: Position::origin(),
        }
    }

    /// 指定位置にカーソルを作成
    pub fn at(position: Position) -> Self {
        Self { current: position }
    }

    /// 現在位置
    pub fn current(&self) -> Position {
        self.current
    }

    /// カーソルを指定位置に移動
    pub fn move_to(&mut self, position: Position) {
        self.current = position;
    }

    /// 現在行の行頭位置
    pub fn line_begin(&self) -> Position {
        Position::new(self.current.line, 0)
    }

    /// 現在行の行末位置（行長はホストに問い合わせる）
    pub fn line_end(&self, host: &dyn HostBuffer) -> Position {
        host.line_end(self.current.line)
    }

    /// 次行の指定列の位置
    pub fn next_line(&self, column: usize) -> Position {
        Position::new(self.current.line + 1, column)
    }

    /// 行頭にいるか
    pub fn is_line_begin(&self) -> bool {
        self.current.column == 0
    }

    /// 行末にいるか
    pub fn is_line_end(&self, host: &dyn HostBuffer) -> bool {
        self.current == host.line_end(self.current.line)
    }
}
