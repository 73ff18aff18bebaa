use super::*;

const FEN: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

fn ready_bridge() -> EngineBridge {
    let mut bridge = EngineBridge::new(Duration::from_millis(1000));
    bridge.begin_handshake();
    bridge.on_line("uciok");
    assert_eq!(bridge.on_line("readyok"), BridgeEvent::Ready { queued: false });
    bridge
}

#[test]
fn test_handshake_sequence() {
    let mut bridge = EngineBridge::new(Duration::from_millis(1000));
    assert_eq!(
        bridge.begin_handshake(),
        vec![EngineCommand::Identify, EngineCommand::ReadyProbe]
    );
    assert_eq!(bridge.phase(), SessionPhase::Uninitialized);
    assert_eq!(
        bridge.on_line("id name Stockfish 16"),
        BridgeEvent::Identified("Stockfish 16".to_string())
    );
    assert_eq!(bridge.on_line("uciok"), BridgeEvent::Nothing);
    assert_eq!(bridge.phase(), SessionPhase::Uninitialized, "uciok alone is not ready");
    assert_eq!(bridge.on_line("readyok"), BridgeEvent::Ready { queued: false });
    assert_eq!(bridge.phase(), SessionPhase::Ready);
    assert_eq!(bridge.engine_name(), Some("Stockfish 16"));
}

#[test]
fn test_search_sends_position_then_go() {
    let mut bridge = ready_bridge();
    let commands = bridge.request_search(FEN, Instant::now()).unwrap();
    assert_eq!(
        commands,
        vec![
            EngineCommand::Position { fen: FEN.to_string() },
            EngineCommand::Go { movetime: Duration::from_millis(1000) },
        ]
    );
    assert_eq!(bridge.phase(), SessionPhase::Searching);
    assert!(bridge.pending().is_some());
}

#[test]
fn test_best_move_delivered_once() {
    let mut bridge = ready_bridge();
    bridge.request_search(FEN, Instant::now()).unwrap();

    let BridgeEvent::BestMove(mv) = bridge.on_line("bestmove e7e5 ponder g1f3") else {
        panic!("expected best move");
    };
    assert_eq!(mv.to_string(), "e7e5");
    assert_eq!(bridge.phase(), SessionPhase::Ready);
    assert_eq!(bridge.pending(), None);

    // A duplicate reply has no search to answer.
    assert_eq!(bridge.on_line("bestmove e7e5"), BridgeEvent::Nothing);
}

#[test]
fn test_second_search_rejected() {
    let mut bridge = ready_bridge();
    bridge.request_search(FEN, Instant::now()).unwrap();
    assert_eq!(
        bridge.request_search(FEN, Instant::now()),
        Err(BridgeError::SearchInFlight)
    );
}

#[test]
fn test_search_before_ready_is_queued() {
    let mut bridge = EngineBridge::new(Duration::from_millis(1000));
    bridge.begin_handshake();

    assert_eq!(bridge.request_search(FEN, Instant::now()), Ok(Vec::new()));
    assert_eq!(
        bridge.request_search(FEN, Instant::now()),
        Err(BridgeError::SearchInFlight),
        "queued search still counts as outstanding"
    );
    assert_eq!(bridge.on_line("readyok"), BridgeEvent::Ready { queued: true });

    let commands = bridge.dispatch_queued(FEN, Instant::now());
    assert_eq!(commands.len(), 2);
    assert_eq!(bridge.phase(), SessionPhase::Searching);
    assert!(bridge.dispatch_queued(FEN, Instant::now()).is_empty());
}

#[test]
fn test_malformed_best_move_is_protocol_error() {
    let mut bridge = ready_bridge();
    bridge.request_search(FEN, Instant::now()).unwrap();
    assert_eq!(
        bridge.on_line("bestmove banana"),
        BridgeEvent::Failed(ProtocolError::MalformedBestMove("banana".to_string()))
    );
    assert_eq!(bridge.phase(), SessionPhase::Ready);
    assert_eq!(bridge.pending(), None);
}

#[test]
fn test_reply_to_abandoned_search_is_stale() {
    let mut bridge = ready_bridge();
    bridge.request_search(FEN, Instant::now()).unwrap();
    assert_eq!(
        bridge.abandon_search(),
        vec![EngineCommand::Stop, EngineCommand::ReadyProbe]
    );
    assert_eq!(bridge.phase(), SessionPhase::Uninitialized);

    // The retry waits for the resync.
    assert_eq!(bridge.request_search(FEN, Instant::now()), Ok(Vec::new()));
    assert!(matches!(bridge.on_line("bestmove e7e5"), BridgeEvent::Stale(_)));
    assert_eq!(bridge.on_line("readyok"), BridgeEvent::Ready { queued: true });
    assert_eq!(bridge.dispatch_queued(FEN, Instant::now()).len(), 2);
    assert!(matches!(bridge.on_line("bestmove d7d5"), BridgeEvent::BestMove(_)));
}

#[test]
fn test_readyok_purges_search_the_engine_dropped() {
    let mut bridge = ready_bridge();
    bridge.request_search(FEN, Instant::now()).unwrap();
    bridge.abandon_search();
    bridge.request_search(FEN, Instant::now()).unwrap();

    // No bestmove ever arrives for the abandoned search.
    assert_eq!(bridge.on_line("readyok"), BridgeEvent::Ready { queued: true });
    bridge.dispatch_queued(FEN, Instant::now());
    let BridgeEvent::BestMove(mv) = bridge.on_line("bestmove d7d5") else {
        panic!("reply to the live search was discarded");
    };
    assert_eq!(mv.to_string(), "d7d5");
}

#[test]
fn test_abandon_queued_search_sends_nothing() {
    let mut bridge = EngineBridge::new(Duration::from_millis(1000));
    bridge.begin_handshake();
    bridge.request_search(FEN, Instant::now()).unwrap();

    assert!(bridge.abandon_search().is_empty());
    assert_eq!(bridge.pending(), None);
    assert_eq!(bridge.on_line("readyok"), BridgeEvent::Ready { queued: false });
}

#[test]
fn test_restart_discards_previous_session_reply() {
    let mut bridge = ready_bridge();
    bridge.request_search(FEN, Instant::now()).unwrap();

    assert_eq!(
        bridge.restart(),
        vec![
            EngineCommand::Stop,
            EngineCommand::NewGame,
            EngineCommand::ReadyProbe
        ]
    );
    assert_eq!(bridge.phase(), SessionPhase::Uninitialized);
    assert!(matches!(bridge.on_line("bestmove e7e5"), BridgeEvent::Stale(_)));
    assert_eq!(bridge.on_line("readyok"), BridgeEvent::Ready { queued: false });
}

#[test]
fn test_tokens_are_not_reused() {
    let mut bridge = ready_bridge();
    bridge.request_search(FEN, Instant::now()).unwrap();
    let first = bridge.pending().unwrap();
    bridge.on_line("bestmove e7e5");
    bridge.request_search(FEN, Instant::now()).unwrap();
    assert_ne!(bridge.pending(), Some(first));
}

#[test]
fn test_disconnect_closes_session() {
    let mut bridge = ready_bridge();
    bridge.request_search(FEN, Instant::now()).unwrap();
    assert!(bridge.on_disconnected());
    assert_eq!(bridge.phase(), SessionPhase::Closed);
    assert_eq!(
        bridge.request_search(FEN, Instant::now()),
        Err(BridgeError::EngineUnavailable)
    );
    assert!(bridge.restart().is_empty());
    assert_eq!(bridge.on_line("bestmove e7e5"), BridgeEvent::Nothing);
}

#[test]
fn test_search_overdue_after_movetime_and_grace() {
    let mut bridge = ready_bridge();
    let start = Instant::now();
    let grace = Duration::from_secs(5);
    assert!(!bridge.search_overdue(start, grace));

    bridge.request_search(FEN, start).unwrap();
    assert!(!bridge.search_overdue(start + Duration::from_secs(5), grace));
    assert!(bridge.search_overdue(start + Duration::from_secs(6), grace));
}

#[test]
fn test_queued_search_overdue_without_readyok() {
    let mut bridge = EngineBridge::new(Duration::from_millis(1000));
    bridge.begin_handshake();
    let start = Instant::now();
    let grace = Duration::from_secs(5);
    assert!(!bridge.search_overdue(start + Duration::from_secs(60), grace));

    bridge.request_search(FEN, start).unwrap();
    assert!(!bridge.search_overdue(start + Duration::from_secs(5), grace));
    assert!(bridge.search_overdue(start + Duration::from_secs(6), grace));

    bridge.abandon_search();
    assert!(!bridge.search_overdue(start + Duration::from_secs(60), grace));
}
