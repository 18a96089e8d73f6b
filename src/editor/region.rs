//! リージョン解決
//!
//! 編集コマンドが操作対象とする範囲の表現と、
//! マウス選択・マーク選択の優先順位付け

use crate::editor::mode::ModeController;
use crate::editor::motion::{Motion, Position};
use crate::host::HostBuffer;
use serde::{Deserialize, Serialize};

/// 操作対象の範囲
///
/// 常に start <= end。空の範囲はリージョンとして扱わず、
/// 解決結果はNoneになる
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub start: Position,
    pub end: Position,
}

impl Region {
    /// 2点から正規化済みリージョンを作成
    pub fn spanning(a: Position, b: Position) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// 空の範囲か
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// リージョン解決器
///
/// 優先順位: (a) ホストのマウス選択 → (b) マーク選択 → (c) なし。
/// ポインタ選択の方が新しく明示的な意図であるため常に優先する
pub struct SelectionResolver;

impl SelectionResolver {
    /// 現在のモードとカーソル・ホスト選択から操作対象を決定
    pub fn resolve(
        mode: &ModeController,
        motion: &Motion,
        host: &dyn HostBuffer,
    ) -> Option<Region> {
        if let Some(selection) = host.current_selection() {
            let region = Region::spanning(selection.start, selection.end);
            if !region.is_empty() {
                return Some(region);
            }
        }

        if let Some(mark) = mode.mark() {
            let region = Region::spanning(mark, motion.current());
            if !region.is_empty() {
                return Some(region);
            }
        }

        None
    }
}
