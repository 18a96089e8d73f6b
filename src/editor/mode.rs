//! 編集モード管理
//!
//! Normal / MarkRegion のモード遷移とマーク位置の管理

use crate::editor::motion::Position;

/// 編集モード
///
/// マーク位置はMarkRegionバリアント自身が保持する。
/// Normalモードに孤立したマークが残る状態は型の上で表現できない
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 通常モード
    Normal,
    /// マークによるリージョン選択中
    MarkRegion {
        /// 選択の起点
        mark: Position,
    },
}

/// モード遷移の管理
///
/// モード値を排他的に所有し、遷移時のマーククリアを保証する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    /// Normalモードで作成
    pub fn new() -> Self {
        Self { mode: Mode::Normal }
    }

    /// 現在のモード
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Normalモードへ遷移（マークは構造上消える）
    pub fn enter_normal(&mut self) {
        self.mode = Mode::Normal;
    }

    /// マークリージョンモードへ遷移
    ///
    /// 古いマークを引き継ぐことはなく、常に現在位置が起点になる
    pub fn enter_mark_region(&mut self, current: Position) {
        self.mode = Mode::MarkRegion { mark: current };
    }

    /// モードを反転
    pub fn toggle(&mut self, current: Position) {
        match self.mode {
            Mode::Normal => self.enter_mark_region(current),
            Mode::MarkRegion { .. } => self.enter_normal(),
        }
    }

    /// 凍結済みモード値を反映（編集完了後の二相コミット用）
    pub fn restore(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Normalモードか
    pub fn is_normal(&self) -> bool {
        matches!(self.mode, Mode::Normal)
    }

    /// マークリージョンモードか
    pub fn is_mark_region(&self) -> bool {
        matches!(self.mode, Mode::MarkRegion { .. })
    }

    /// マーク位置（Normalモードでは常にNone）
    pub fn mark(&self) -> Option<Position> {
        match self.mode {
            Mode::Normal => None,
            Mode::MarkRegion { mark } => Some(mark),
        }
    }

    /// カーソルとマークを交換し、新しいカーソル位置を返す
    ///
    /// Normalモードでは何もせずNoneを返す
    pub fn swap_mark(&mut self, current: Position) -> Option<Position> {
        match self.mode {
            Mode::Normal => None,
            Mode::MarkRegion { mark } => {
                self.mode = Mode::MarkRegion { mark: current };
                Some(mark)
            }
        }
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}
