use std::sync::{Arc, Mutex};

use chess_rules::piece::Color;
use chess_rules::rules::Rules;
use cli::Session;
use test_case::test_case;
use testresult::TestResult;

type Output = Arc<Mutex<Vec<u8>>>;

fn new_session() -> (Session<Vec<u8>>, Output) {
    let output = Arc::new(Mutex::new(Vec::new()));
    let session = Session::new(Rules::default(), Arc::clone(&output));
    (session, output)
}

/// Everything written since the last call.
fn take_output(output: &Output) -> String {
    let mut buffer = output.lock().unwrap();
    let text = String::from_utf8(buffer.clone()).unwrap();
    buffer.clear();
    text
}

fn feed(session: &mut Session<Vec<u8>>, lines: &[&str]) -> TestResult {
    for line in lines {
        session.handle_line(line)?;
    }
    Ok(())
}

#[test]
fn test_session_starts_with_board_and_prompt() {
    let (_session, output) = new_session();
    let got = take_output(&output);

    assert!(got.starts_with("8 r n b q k b n r\n"));
    assert!(got.contains("  a b c d e f g h\n"));
    assert!(got.contains("Turn: 1\nWaiting for: White\n"));
    assert!(got.ends_with("Origin: "));
}

#[test_case(&["f2", "f3", "e7", "e5", "g2", "g4", "d8", "h4"] ; "square by square")]
#[test_case(&["f2f3", "e7e5", "g2 g4", "d8-h4"] ; "whole moves")]
fn test_fools_mate(lines: &[&str]) -> TestResult {
    let (mut session, output) = new_session();
    feed(&mut session, lines)?;

    let got = take_output(&output);
    assert!(got.contains("CHECKMATE!\nWinner: Black\n"));
    assert!(session.game().is_terminated());
    assert_eq!(session.game().winner(), Some(Color::Black));

    session.handle_line("a2a3")?;
    assert!(take_output(&output).contains("The match is over."));
    Ok(())
}

#[test]
fn test_origin_highlights_destinations() -> TestResult {
    let (mut session, output) = new_session();
    take_output(&output);

    session.handle_line("e2")?;
    let got = take_output(&output);

    assert!(got.contains("4 - - - - * - - -\n"));
    assert!(got.contains("3 - - - - * - - -\n"));
    assert!(got.ends_with("Destination: "));
    Ok(())
}

#[test_case("e4", "There is no piece on e4." ; "empty square")]
#[test_case("e7", "The piece on e7 is not yours." ; "opponent piece")]
#[test_case("a1", "The piece on a1 has no possible moves." ; "blocked rook")]
fn test_rejected_origin(line: &str, want: &str) -> TestResult {
    let (mut session, output) = new_session();
    take_output(&output);

    session.handle_line(line)?;
    let got = take_output(&output);

    assert!(got.contains(want));
    assert!(got.ends_with("Origin: "));
    assert_eq!(session.game().turn(), 1);
    Ok(())
}

#[test]
fn test_rejected_destination_asks_for_origin_again() -> TestResult {
    let (mut session, output) = new_session();
    take_output(&output);

    feed(&mut session, &["b1", "d2"])?;
    let got = take_output(&output);
    assert!(got.contains("The piece on b1 cannot move to d2."));
    assert!(got.ends_with("Origin: "));

    feed(&mut session, &["b1", "c3"])?;
    assert_eq!(session.game().current_player(), Color::Black);
    Ok(())
}

#[test]
fn test_unknown_command() -> TestResult {
    let (mut session, output) = new_session();
    take_output(&output);

    session.handle_line("castle please")?;
    assert_eq!(
        take_output(&output),
        "Unknown command. Type `help` for the list.\n"
    );
    Ok(())
}

#[test]
fn test_undo_and_new() -> TestResult {
    let (mut session, output) = new_session();
    feed(&mut session, &["e2e4", "e7e5"])?;
    assert_eq!(session.game().turn(), 3);

    session.handle_line("undo")?;
    assert_eq!(session.game().turn(), 2);
    assert_eq!(session.game().current_player(), Color::Black);

    session.handle_line("new")?;
    assert_eq!(session.game().turn(), 1);
    assert_eq!(session.game().played_moves().count(), 0);

    take_output(&output);
    session.handle_line("undo")?;
    assert!(take_output(&output).contains("There is no move to take back."));
    Ok(())
}

#[test]
fn test_quit() -> TestResult {
    let (mut session, output) = new_session();
    assert!(!session.is_finished());

    session.handle_line("quit")?;
    assert!(session.is_finished());
    assert!(take_output(&output).ends_with("Bye.\n"));
    Ok(())
}
