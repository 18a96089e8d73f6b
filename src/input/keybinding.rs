//! キーバインドシステム
//!
//! Emacs風キー表記の解析と、キーシーケンスからコマンド名への
//! バインディング表。表は読み取り専用の設定であり、編集状態は
//! 一切持たない

use crate::error::EmarkError;
use crate::input::commands::Command;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// キー入力の内部表現
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    /// 修飾キー
    pub modifiers: KeyModifiers,
    /// 基本キー
    pub code: KeyCode,
}

/// 修飾キーの組み合わせ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyModifiers {
    /// 修飾キーなし
    pub fn none() -> Self {
        Self {
            ctrl: false,
            alt: false,
            shift: false,
        }
    }
}

/// 基本キーコード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Esc,
}

impl Key {
    /// Ctrl+文字のキーを作成
    pub fn ctrl(c: char) -> Self {
        Self {
            modifiers: KeyModifiers {
                ctrl: true,
                alt: false,
                shift: false,
            },
            code: KeyCode::Char(c),
        }
    }

    /// Alt+文字のキーを作成
    pub fn alt(c: char) -> Self {
        Self {
            modifiers: KeyModifiers {
                ctrl: false,
                alt: true,
                shift: false,
            },
            code: KeyCode::Char(c),
        }
    }

    /// 修飾キーなしのキーを作成
    pub fn plain(code: KeyCode) -> Self {
        Self {
            modifiers: KeyModifiers::none(),
            code,
        }
    }
}

/// キーシーケンス（C-x uのような連続キー対応）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeySequence {
    pub keys: Vec<Key>,
}

impl KeySequence {
    /// 単一キーからシーケンスを作成
    pub fn single(key: Key) -> Self {
        Self { keys: vec![key] }
    }

    /// 複数キーからシーケンスを作成
    pub fn multi(keys: Vec<Key>) -> Self {
        Self { keys }
    }

    /// シーケンスの長さ
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// シーケンスが空か
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// 前方一致チェック
    pub fn starts_with(&self, prefix: &KeySequence) -> bool {
        if prefix.len() > self.len() {
            return false;
        }
        self.keys[..prefix.len()] == prefix.keys
    }

    /// 文字列表現からパース
    ///
    /// 空白区切りの各要素が1キー。修飾はC-/M-/S-前置
    pub fn parse(s: &str) -> Result<Self, KeyParseError> {
        if s.trim().is_empty() {
            return Err(KeyParseError::EmptySequence);
        }

        let mut keys = Vec::new();
        for part in s.split_whitespace() {
            keys.push(Self::parse_single_key(part)?);
        }
        Ok(Self { keys })
    }

    fn parse_single_key(s: &str) -> Result<Key, KeyParseError> {
        let mut modifiers = KeyModifiers::none();
        let mut remaining = s;

        // 修飾キーの解析
        loop {
            if let Some(rest) = remaining.strip_prefix("C-") {
                modifiers.ctrl = true;
                remaining = rest;
            } else if let Some(rest) = remaining.strip_prefix("M-") {
                modifiers.alt = true;
                remaining = rest;
            } else if let Some(rest) = remaining.strip_prefix("S-") {
                modifiers.shift = true;
                remaining = rest;
            } else {
                break;
            }
        }

        if remaining.is_empty() {
            return Err(KeyParseError::InvalidFormat(s.to_string()));
        }

        let code = match remaining {
            "SPC" => KeyCode::Char(' '),
            "Enter" => KeyCode::Enter,
            "Backspace" => KeyCode::Backspace,
            "Delete" => KeyCode::Delete,
            "Tab" => KeyCode::Tab,
            "Up" => KeyCode::Up,
            "Down" => KeyCode::Down,
            "Left" => KeyCode::Left,
            "Right" => KeyCode::Right,
            "Esc" => KeyCode::Esc,
            s if s.chars().count() == 1 => {
                KeyCode::Char(s.chars().next().unwrap_or('\0'))
            }
            _ => return Err(KeyParseError::UnknownKey(remaining.to_string())),
        };

        Ok(Key { modifiers, code })
    }
}

/// キー表記の解析エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("Invalid key sequence format: {0}")]
    InvalidFormat(String),

    #[error("Unknown key: {0}")]
    UnknownKey(String),

    #[error("Empty key sequence")]
    EmptySequence,
}

/// 外部から供給されるバインディング表
///
/// キー表記 → コマンド名。JSONで記述して読み込む
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeymapConfig {
    pub bindings: HashMap<String, String>,
}

impl KeymapConfig {
    /// JSON文字列から読み込む
    pub fn from_json(text: &str) -> crate::error::Result<Self> {
        serde_json::from_str(text)
            .map_err(|err| EmarkError::KeyParse(KeyParseError::InvalidFormat(err.to_string())))
    }
}

/// キーマップ
///
/// キーシーケンスからコマンドへの対応表。構築時に全エントリを
/// 検証するため、解決済みの表から未知のコマンドが出ることはない
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    bindings: HashMap<KeySequence, Command>,
}

impl KeyMap {
    /// 空のキーマップを作成
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// 既定のEmacs風バインディングを持つキーマップを作成
    pub fn default_bindings() -> Self {
        let mut map = Self::new();

        map.bind(KeySequence::single(Key::ctrl('k')), Command::KillLine);
        map.bind(KeySequence::single(Key::ctrl('w')), Command::Cut);
        map.bind(KeySequence::single(Key::alt('w')), Command::Copy);
        map.bind(KeySequence::single(Key::ctrl('y')), Command::Yank);
        map.bind(KeySequence::single(Key::ctrl('/')), Command::Undo);
        map.bind(
            KeySequence::multi(vec![Key::ctrl('x'), Key::plain(KeyCode::Char('u'))]),
            Command::Undo,
        );
        map.bind(KeySequence::single(Key::ctrl('.')), Command::Redo);
        map.bind(KeySequence::single(Key::ctrl('g')), Command::Quit);
        map.bind(KeySequence::single(Key::ctrl(' ')), Command::ToggleMark);
        map.bind(KeySequence::single(Key::ctrl('@')), Command::SetMark);
        map.bind(
            KeySequence::multi(vec![Key::ctrl('x'), Key::ctrl('x')]),
            Command::ExchangePointAndMark,
        );
        map.bind(KeySequence::single(Key::ctrl('o')), Command::InsertBlankLineAfter);
        map.bind(KeySequence::single(Key::alt('o')), Command::InsertBlankLineBefore);

        map
    }

    /// 既定バインディングに設定を上書き適用したキーマップを作成
    pub fn with_config(config: &KeymapConfig) -> crate::error::Result<Self> {
        let mut map = Self::default_bindings();
        map.apply_config(config)?;
        Ok(map)
    }

    /// バインディングを登録（同じシーケンスは上書き）
    pub fn bind(&mut self, sequence: KeySequence, command: Command) {
        self.bindings.insert(sequence, command);
    }

    /// 表記文字列の組でバインディングを登録
    pub fn bind_named(&mut self, chord: &str, command_name: &str) -> crate::error::Result<()> {
        let sequence = KeySequence::parse(chord).map_err(EmarkError::KeyParse)?;
        let command = Command::from_name(command_name)?;
        self.bind(sequence, command);
        Ok(())
    }

    /// 設定の全エントリを適用
    ///
    /// 1件でも不正なら適用前の内容を変えずにエラーを返す
    pub fn apply_config(&mut self, config: &KeymapConfig) -> crate::error::Result<()> {
        let mut staged = Vec::with_capacity(config.bindings.len());
        for (chord, command_name) in &config.bindings {
            let sequence = KeySequence::parse(chord).map_err(EmarkError::KeyParse)?;
            let command = Command::from_name(command_name)?;
            staged.push((sequence, command));
        }
        for (sequence, command) in staged {
            self.bind(sequence, command);
        }
        Ok(())
    }

    /// シーケンスに対応するコマンドを検索
    pub fn lookup(&self, sequence: &KeySequence) -> Option<Command> {
        self.bindings.get(sequence).copied()
    }

    /// 部分シーケンスがいずれかのバインディングの前置になっているか
    ///
    /// 複数キーシーケンスの入力途中判定に使う
    pub fn is_prefix(&self, sequence: &KeySequence) -> bool {
        if sequence.is_empty() {
            return false;
        }
        self.bindings
            .keys()
            .any(|bound| bound.len() > sequence.len() && bound.starts_with(sequence))
    }

    /// 登録数
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
