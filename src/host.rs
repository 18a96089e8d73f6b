//! ホストテキストサーフェス境界
//!
//! コアが依存する最小のバッファ契約と、テスト・組み込み用の
//! インメモリ参照実装を提供

use crate::editor::motion::Position;
use crate::editor::region::Region;
use std::fmt;

/// ホストバッファ契約
///
/// insert/deleteの真偽値は編集完了の通知を兼ねる。falseは
/// ホストが編集を拒否したことを示し、呼び出し側は依存する
/// 状態遷移を確定してはならない
pub trait HostBuffer {
    /// リージョンのテキストを読み出す
    fn read_text(&self, region: &Region) -> String;

    /// 指定位置にテキストを挿入
    fn insert_text(&mut self, position: Position, text: &str) -> bool;

    /// リージョンを削除
    fn delete_range(&mut self, region: &Region) -> bool;

    /// ホスト固有のマウス／ドラッグ選択（コアのマークとは別物）
    fn current_selection(&self) -> Option<Region>;

    /// 行数
    fn line_count(&self) -> usize;

    /// 指定行の行末位置
    fn line_end(&self, line: usize) -> Position;

    /// ホスト側のundoを起動
    fn undo(&mut self);

    /// ホスト側のredoを起動
    fn redo(&mut self);
}

/// 行ベクタによるインメモリ参照実装
///
/// スナップショット方式の素朴なundo/redoと、テストから設定できる
/// マウス選択・読み取り専用フラグを持つ
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    lines: Vec<String>,
    selection: Option<Region>,
    read_only: bool,
    undo_stack: Vec<Vec<String>>,
    redo_stack: Vec<Vec<String>>,
}

/// 列位置（文字単位）をバイト位置へ変換
fn byte_index(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(idx, _)| idx)
        .unwrap_or(line.len())
}

impl MemoryHost {
    /// 空のバッファを作成
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            selection: None,
            read_only: false,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// 文字列からバッファを作成
    pub fn from_str(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(String::from).collect(),
            selection: None,
            read_only: false,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// バッファ全体の内容
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// マウス選択を設定（テスト・ホスト統合用）
    pub fn set_selection(&mut self, selection: Option<Region>) {
        self.selection = selection;
    }

    /// 読み取り専用フラグを設定
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// 位置をバッファ内の有効な位置へクランプ
    fn clamp(&self, position: Position) -> Position {
        let line = position.line.min(self.lines.len().saturating_sub(1));
        let column = position.column.min(self.lines[line].chars().count());
        Position::new(line, column)
    }

    /// 編集前スナップショットを積む
    fn checkpoint(&mut self) {
        self.undo_stack.push(self.lines.clone());
        self.redo_stack.clear();
    }
}

impl fmt::Display for MemoryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

impl HostBuffer for MemoryHost {
    fn read_text(&self, region: &Region) -> String {
        let start = self.clamp(region.start);
        let end = self.clamp(region.end);

        if start.line == end.line {
            let line = &self.lines[start.line];
            let s = byte_index(line, start.column);
            let e = byte_index(line, end.column);
            return line[s..e].to_string();
        }

        let mut out = String::new();
        let first = &self.lines[start.line];
        out.push_str(&first[byte_index(first, start.column)..]);
        for line in &self.lines[start.line + 1..end.line] {
            out.push('\n');
            out.push_str(line);
        }
        let last = &self.lines[end.line];
        out.push('\n');
        out.push_str(&last[..byte_index(last, end.column)]);
        out
    }

    fn insert_text(&mut self, position: Position, text: &str) -> bool {
        if self.read_only {
            return false;
        }
        if text.is_empty() {
            return true;
        }

        self.checkpoint();
        let position = self.clamp(position);

        let split = byte_index(&self.lines[position.line], position.column);
        let tail = self.lines[position.line].split_off(split);

        let mut segments = text.split('\n');
        if let Some(first) = segments.next() {
            self.lines[position.line].push_str(first);
        }

        let mut rest: Vec<String> = segments.map(String::from).collect();
        if rest.is_empty() {
            self.lines[position.line].push_str(&tail);
        } else {
            if let Some(last) = rest.last_mut() {
                last.push_str(&tail);
            }
            let at = position.line + 1;
            for (offset, segment) in rest.into_iter().enumerate() {
                self.lines.insert(at + offset, segment);
            }
        }

        self.selection = None;
        true
    }

    fn delete_range(&mut self, region: &Region) -> bool {
        if self.read_only {
            return false;
        }

        let start = self.clamp(region.start);
        let end = self.clamp(region.end);
        if start == end {
            return true;
        }

        self.checkpoint();
        if start.line == end.line {
            let line = &mut self.lines[start.line];
            let s = byte_index(line, start.column);
            let e = byte_index(line, end.column);
            line.replace_range(s..e, "");
        } else {
            let last_tail = {
                let last = &self.lines[end.line];
                last[byte_index(last, end.column)..].to_string()
            };
            let first = &mut self.lines[start.line];
            first.truncate(byte_index(first, start.column));
            first.push_str(&last_tail);
            self.lines.drain(start.line + 1..=end.line);
        }

        self.selection = None;
        true
    }

    fn current_selection(&self) -> Option<Region> {
        self.selection
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_end(&self, line: usize) -> Position {
        let line = line.min(self.lines.len().saturating_sub(1));
        Position::new(line, self.lines[line].chars().count())
    }

    fn undo(&mut self) {
        if let Some(previous) = self.undo_stack.pop() {
            self.redo_stack.push(std::mem::replace(&mut self.lines, previous));
        }
    }

    fn redo(&mut self) {
        if let Some(next) = self.redo_stack.pop() {
            self.undo_stack.push(std::mem::replace(&mut self.lines, next));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_roundtrip() {
        let host = MemoryHost::from_str("abc\ndef\n");
        assert_eq!(host.line_count(), 3);
        assert_eq!(host.text(), "abc\ndef\n");

        let empty = MemoryHost::new();
        assert_eq!(empty.line_count(), 1);
        assert_eq!(empty.text(), "");
    }

    #[test]
    fn read_single_and_multi_line() {
        let host = MemoryHost::from_str("Hello\nWorld\n123");

        let region = Region::spanning(Position::new(0, 1), Position::new(0, 4));
        assert_eq!(host.read_text(&region), "ell");

        let region = Region::spanning(Position::new(0, 3), Position::new(2, 2));
        assert_eq!(host.read_text(&region), "lo\nWorld\n12");
    }

    #[test]
    fn insert_inline_and_multiline() {
        let mut host = MemoryHost::from_str("Hello World");
        assert!(host.insert_text(Position::new(0, 5), ","));
        assert_eq!(host.text(), "Hello, World");

        let mut host = MemoryHost::from_str("abc\ndef");
        assert!(host.insert_text(Position::new(1, 0), "\n"));
        assert_eq!(host.text(), "abc\n\ndef");

        let mut host = MemoryHost::from_str("ab");
        assert!(host.insert_text(Position::new(0, 1), "1\n2"));
        assert_eq!(host.text(), "a1\n2b");
    }

    #[test]
    fn delete_single_and_multi_line() {
        let mut host = MemoryHost::from_str("Hello World");
        let region = Region::spanning(Position::new(0, 0), Position::new(0, 5));
        assert!(host.delete_range(&region));
        assert_eq!(host.text(), " World");

        let mut host = MemoryHost::from_str("Hello\nWorld\n123");
        let region = Region::spanning(Position::new(0, 3), Position::new(2, 1));
        assert!(host.delete_range(&region));
        assert_eq!(host.text(), "Hel23");
    }

    #[test]
    fn multibyte_columns_are_character_based() {
        let mut host = MemoryHost::from_str("こんにちは");
        assert_eq!(host.line_end(0), Position::new(0, 5));

        let region = Region::spanning(Position::new(0, 1), Position::new(0, 3));
        assert_eq!(host.read_text(&region), "んに");

        assert!(host.insert_text(Position::new(0, 2), "、"));
        assert_eq!(host.text(), "こん、にちは");
    }

    #[test]
    fn undo_redo_roundtrip() {
        let mut host = MemoryHost::from_str("abc");
        host.insert_text(Position::new(0, 3), "def");
        assert_eq!(host.text(), "abcdef");

        host.undo();
        assert_eq!(host.text(), "abc");

        host.redo();
        assert_eq!(host.text(), "abcdef");

        // undoスタックが空なら何も起きない
        host.undo();
        host.undo();
        host.undo();
        assert_eq!(host.text(), "abc");
    }

    #[test]
    fn read_only_rejects_edits() {
        let mut host = MemoryHost::from_str("abc");
        host.set_read_only(true);

        assert!(!host.insert_text(Position::new(0, 0), "x"));
        let region = Region::spanning(Position::new(0, 0), Position::new(0, 1));
        assert!(!host.delete_range(&region));
        assert_eq!(host.text(), "abc");
    }

    #[test]
    fn edits_invalidate_mouse_selection() {
        let mut host = MemoryHost::from_str("abc");
        host.set_selection(Some(Region::spanning(
            Position::new(0, 0),
            Position::new(0, 2),
        )));

        host.insert_text(Position::new(0, 0), "x");
        assert_eq!(host.current_selection(), None);
    }

    #[test]
    fn line_end_clamps_out_of_range_lines() {
        let host = MemoryHost::from_str("ab\ncdef");
        assert_eq!(host.line_end(0), Position::new(0, 2));
        assert_eq!(host.line_end(1), Position::new(1, 4));
        assert_eq!(host.line_end(99), Position::new(1, 4));
    }
}
