use super::*;
use crate::rules::CozyRules;
use cozy_chess::Color;

fn rules(fen: &str) -> CozyRules {
    CozyRules::from_fen(fen).unwrap()
}

#[test]
fn test_startpos_in_progress() {
    let outcome = evaluate(&CozyRules::new(), &Seating::default());
    assert_eq!(outcome, Outcome::in_progress());
    assert!(!outcome.is_terminal());
}

#[test]
fn test_checkmate_winner_is_side_not_to_move() {
    // Black is mated; the human plays White.
    let mated = rules("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4");
    let outcome = evaluate(&mated, &Seating::new(Color::White));
    assert_eq!(outcome.kind, OutcomeKind::Checkmate);
    assert_eq!(outcome.winner, Some(Side::Human));
    assert_eq!(outcome.to_string(), "Game Over: You win by checkmate");

    let outcome = evaluate(&mated, &Seating::new(Color::Black));
    assert_eq!(outcome.winner, Some(Side::Engine));
    assert_eq!(outcome.to_string(), "Game Over: Engine wins by checkmate");
}

#[test]
fn test_stalemate_has_no_winner() {
    let outcome = evaluate(&rules("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1"), &Seating::default());
    assert_eq!(outcome.kind, OutcomeKind::Stalemate);
    assert_eq!(outcome.winner, None);
    assert_eq!(outcome.to_string(), "Game Over: Stalemate");
}

#[test]
fn test_draw_rules_labelled() {
    let bare = evaluate(&rules("8/8/8/4k3/8/4K3/8/8 w - - 0 1"), &Seating::default());
    assert_eq!(bare.kind, OutcomeKind::DrawByRule(DrawRule::InsufficientMaterial));
    assert_eq!(bare.to_string(), "Game Over: Draw by insufficient material");

    let fifty = evaluate(&rules("8/8/8/4k3/8/4K3/4P3/8 w - - 100 60"), &Seating::default());
    assert_eq!(fifty.kind, OutcomeKind::DrawByRule(DrawRule::FiftyMoves));
    assert_eq!(fifty.to_string(), "Game Over: Draw by fifty-move rule");
}

#[test]
fn test_time_forfeit_credits_other_side() {
    let outcome = Outcome::time_forfeit(Side::Human);
    assert!(outcome.is_terminal());
    assert_eq!(outcome.winner, Some(Side::Engine));
    assert_eq!(outcome.to_string(), "Game Over: Engine wins on time");
    assert_eq!(
        Outcome::time_forfeit(Side::Engine).to_string(),
        "Game Over: You win on time"
    );
}

#[test]
fn test_evaluation_is_deterministic() {
    let position = rules("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4");
    let first = evaluate(&position, &Seating::default());
    for _ in 0..5 {
        assert_eq!(evaluate(&position, &Seating::default()), first);
    }
}
