// mark_region_tests.rs - マーク・リージョン機能のテスト

use emark::{
    Command, Dispatcher, HostBuffer, MemoryHost, Mode, ModeController, Motion, Position, Region,
    SelectionResolver,
};

#[test]
fn test_mark_set_and_clear() {
    let mut host = MemoryHost::from_str("Hello World");
    let mut dispatcher = Dispatcher::new();

    // 初期状態ではマークは未設定
    assert_eq!(dispatcher.mode().mark(), None);
    assert!(dispatcher.mode().is_normal());

    // マークを設定
    dispatcher.execute(Command::ToggleMark, &mut host);
    assert_eq!(dispatcher.mode().mark(), Some(Position::new(0, 0)));

    // もう一度トグルするとマークは消える
    dispatcher.execute(Command::ToggleMark, &mut host);
    assert_eq!(dispatcher.mode().mark(), None);
    assert!(dispatcher.mode().is_normal());
}

#[test]
fn test_mark_not_visible_right_after_toggle() {
    let host = MemoryHost::from_str("Hello World");
    let mut dispatcher = Dispatcher::new();
    let mut throwaway = host.clone();

    // Normalからのトグル直後はマーク==カーソルなので選択は見えない
    dispatcher.execute(Command::ToggleMark, &mut throwaway);
    assert_eq!(
        SelectionResolver::resolve(dispatcher.mode(), dispatcher.motion(), &host),
        None
    );

    dispatcher.execute(Command::ToggleMark, &mut throwaway);
    assert_eq!(
        SelectionResolver::resolve(dispatcher.mode(), dispatcher.motion(), &host),
        None
    );
}

#[test]
fn test_selection_range_basic() {
    let host = MemoryHost::from_str("Hello World");
    let mut mode = ModeController::new();
    let mut motion = Motion::new();

    // 先頭でマークを設定してから5文字目へ移動
    mode.enter_mark_region(motion.current());
    motion.move_to(Position::new(0, 5));

    let region = SelectionResolver::resolve(&mode, &motion, &host).unwrap();
    assert_eq!(region, Region::spanning(Position::new(0, 0), Position::new(0, 5)));
    assert_eq!(host.read_text(&region), "Hello");
}

#[test]
fn test_selection_range_reverse() {
    let host = MemoryHost::from_str("Hello World");
    let mut mode = ModeController::new();
    let mut motion = Motion::at(Position::new(0, 11));

    // カーソルが末尾にある状態でマーク設定、5文字目へ戻る
    mode.enter_mark_region(motion.current());
    motion.move_to(Position::new(0, 5));

    // 選択範囲は自動的にソートされる
    let region = SelectionResolver::resolve(&mode, &motion, &host).unwrap();
    assert_eq!(region.start, Position::new(0, 5));
    assert_eq!(region.end, Position::new(0, 11));
    assert_eq!(host.read_text(&region), " World");
}

#[test]
fn test_multiline_mark_selection() {
    let host = MemoryHost::from_str("Hello\nWorld\n123");
    let mut mode = ModeController::new();
    let mut motion = Motion::at(Position::new(0, 3));

    mode.enter_mark_region(motion.current());
    motion.move_to(Position::new(2, 1));

    let region = SelectionResolver::resolve(&mode, &motion, &host).unwrap();
    assert_eq!(host.read_text(&region), "lo\nWorld\n1");
}

#[test]
fn test_mode_variant_owns_mark() {
    let mut mode = ModeController::new();
    assert_eq!(mode.mode(), Mode::Normal);

    mode.enter_mark_region(Position::new(1, 2));
    assert_eq!(
        mode.mode(),
        Mode::MarkRegion {
            mark: Position::new(1, 2)
        }
    );

    // Normalへ戻るとマークは構造上存在しない
    mode.enter_normal();
    assert_eq!(mode.mode(), Mode::Normal);
    assert_eq!(mode.mark(), None);
}

#[test]
fn test_exchange_point_and_mark() {
    let mut host = MemoryHost::from_str("Hello World");
    let mut dispatcher = Dispatcher::new();

    dispatcher.execute(Command::ToggleMark, &mut host);
    dispatcher.move_cursor(Position::new(0, 5));

    let result = dispatcher.execute(Command::ExchangePointAndMark, &mut host);
    assert!(result.success);

    // カーソルが0、マークが5になっていることを確認
    assert_eq!(dispatcher.motion().current(), Position::new(0, 0));
    assert_eq!(dispatcher.mode().mark(), Some(Position::new(0, 5)));
}

#[test]
fn test_exchange_without_mark_fails() {
    let mut host = MemoryHost::from_str("Hello World");
    let mut dispatcher = Dispatcher::new();

    let result = dispatcher.execute(Command::ExchangePointAndMark, &mut host);
    assert!(!result.success);
    assert_eq!(dispatcher.motion().current(), Position::new(0, 0));
}

#[test]
fn test_set_mark_resets_stale_mark() {
    let mut host = MemoryHost::from_str("Hello World");
    let mut dispatcher = Dispatcher::new();

    dispatcher.execute(Command::SetMark, &mut host);
    dispatcher.move_cursor(Position::new(0, 7));
    dispatcher.execute(Command::SetMark, &mut host);

    // 再設定は常に現在位置が起点になる
    assert_eq!(dispatcher.mode().mark(), Some(Position::new(0, 7)));
}
