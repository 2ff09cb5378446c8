use super::*;

fn command(line: &str) -> RoomCommand {
    match parse_input(line) {
        Ok(InputLine::Command(command)) => command,
        other => panic!("expected a command for {line:?}, got {other:?}"),
    }
}

#[test]
fn plain_text_is_chat() {
    assert_eq!(command("  hello there "), RoomCommand::Chat("hello there".to_owned()));
}

#[test]
fn blank_line_is_empty() {
    assert_eq!(parse_input("   "), Ok(InputLine::Empty));
}

#[test]
fn slash_commands_map_to_room_commands() {
    assert_eq!(command("/start"), RoomCommand::Start);
    assert_eq!(command("/choose cat"), RoomCommand::Choose("cat".to_owned()));
    assert_eq!(
        command("/word  hot dog "),
        RoomCommand::ManualWord("hot dog".to_owned())
    );
    assert_eq!(command("/clear"), RoomCommand::ClearCanvas);
    assert_eq!(command("/up"), RoomCommand::PointerUp);
    assert_eq!(command("/exit"), RoomCommand::Exit);
    assert_eq!(command("/down 1 2.5"), RoomCommand::PointerDown { x: 1.0, y: 2.5 });
}

#[test]
fn move_defaults_to_black() {
    assert_eq!(
        command("/move 3 4"),
        RoomCommand::PointerMove {
            x: 3.0,
            y: 4.0,
            color: "#000000".to_owned(),
        }
    );
    assert_eq!(
        command("/move 3 4 #ff0000"),
        RoomCommand::PointerMove {
            x: 3.0,
            y: 4.0,
            color: "#ff0000".to_owned(),
        }
    );
}

#[test]
fn image_and_help_are_local() {
    assert_eq!(
        parse_input("/img https://cdn.test/a.png"),
        Ok(InputLine::ShareImage("https://cdn.test/a.png".to_owned()))
    );
    assert_eq!(parse_input("/help"), Ok(InputLine::Help));
}

#[test]
fn bad_input_is_reported() {
    assert_eq!(
        parse_input("/dance"),
        Err(InputError::UnknownCommand("dance".to_owned()))
    );
    assert_eq!(
        parse_input("/choose"),
        Err(InputError::MissingArgument {
            command: "choose",
            what: "a word",
        })
    );
    assert_eq!(
        parse_input("/down 1 x"),
        Err(InputError::InvalidNumber("x".to_owned()))
    );
    assert!(matches!(
        parse_input("/move 1"),
        Err(InputError::MissingArgument { command: "move", .. })
    ));
}

#[test]
fn terminal_view_prints_one_line_per_effect() {
    let mut view = TerminalView::new(Vec::new());
    view.append_message("bob", "hi");
    view.append_message("bob", r#"<img src="https://cdn.test/a.png" class="chat-image">"#);
    view.system_message("bob guessed it");
    view.show_rankings(&[
        Ranking {
            nickname: "bob".to_owned(),
            point: 30,
        },
        Ranking {
            nickname: "ann".to_owned(),
            point: 10,
        },
    ]);
    view.show_word_candidates(&["cat".to_owned(), "dog".to_owned()]);

    let text = String::from_utf8(view.into_inner()).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "bob: hi",
            "bob shared an image: https://cdn.test/a.png",
            "* bob guessed it",
            "=== GAME OVER ===",
            " 1. bob (30 pts)",
            " 2. ann (10 pts)",
            "Pick a word with /choose: cat, dog",
        ]
    );
}
