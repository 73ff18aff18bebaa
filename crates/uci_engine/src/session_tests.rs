use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn run(session: &mut Session, lines: &[&str]) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut out = Vec::new();
    for line in lines {
        session.handle(line, &mut out, &mut rng).unwrap();
    }
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_handshake_replies() {
    let mut session = Session::new();
    let replies = run(&mut session, &["uci", "isready"]);
    assert_eq!(replies.first().map(String::as_str), Some("id name RandomMover 0.1"));
    assert!(replies.contains(&"uciok".to_string()));
    assert_eq!(replies.last().map(String::as_str), Some("readyok"));
}

#[test]
fn test_go_answers_with_legal_move() {
    let mut session = Session::new();
    let replies = run(&mut session, &["position startpos moves e2e4", "go movetime 1000"]);
    assert_eq!(replies.len(), 1);

    let text = replies[0].strip_prefix("bestmove ").unwrap();
    let mv = parse_uci_move(text).unwrap();
    let mut rules = CozyRules::from_fen(&session.fen()).unwrap();
    assert!(rules.apply(&mv).is_ok(), "{text} is not legal for Black");
}

#[test]
fn test_position_fen_with_moves() {
    let mut session = Session::new();
    run(
        &mut session,
        &["position fen 4k3/8/8/8/8/8/4P3/4K3 w - - 0 1 moves e2e4 e8d8"],
    );
    assert!(session.fen().starts_with("3k4/8/8/8/4P3/8/8/4K3 w"));
}

#[test]
fn test_no_legal_move_answers_null() {
    let mut session = Session::new();
    let replies = run(
        &mut session,
        &["position fen k7/2K5/1Q6/8/8/8/8/8 b - - 0 1", "go"],
    );
    assert_eq!(replies, vec!["bestmove 0000"]);
}

#[test]
fn test_bad_position_falls_back_to_startpos() {
    let mut session = Session::new();
    run(&mut session, &["position startpos moves e2e5"]);
    assert_eq!(session.fen(), CozyRules::new().fen());
}

#[test]
fn test_quit_stops_loop() {
    let mut session = Session::new();
    let mut rng = StdRng::seed_from_u64(1);
    let mut out = Vec::new();
    assert_eq!(session.handle("stop", &mut out, &mut rng).unwrap(), Flow::Continue);
    assert_eq!(session.handle("quit", &mut out, &mut rng).unwrap(), Flow::Quit);
    assert!(out.is_empty());
}
