//! Drive the built engine binary through the match core's process transport.

use std::time::{Duration, Instant};

use match_core::{
    BridgeEvent, CozyRules, EngineBridge, EngineConfig, EngineLines, EngineProcess, Rules,
    SessionPhase,
};
use tokio::time::timeout;

const LINE_TIMEOUT: Duration = Duration::from_secs(10);

fn engine_config() -> EngineConfig {
    EngineConfig {
        path: env!("CARGO_BIN_EXE_uci_engine").into(),
        args: Vec::new(),
    }
}

async fn send_all(process: &mut EngineProcess, commands: Vec<match_core::EngineCommand>) {
    for command in commands {
        process.send(&command).await.unwrap();
    }
}

/// Feed engine output into the bridge until it yields something other than
/// `Nothing`.
async fn next_event(bridge: &mut EngineBridge, lines: &mut EngineLines) -> BridgeEvent {
    loop {
        let line = timeout(LINE_TIMEOUT, lines.next_line())
            .await
            .expect("engine went silent")
            .unwrap()
            .expect("engine closed stdout");
        match bridge.on_line(&line) {
            BridgeEvent::Nothing => continue,
            event => return event,
        }
    }
}

#[tokio::test]
async fn test_handshake_and_search_against_real_process() {
    let (mut process, mut lines) = EngineProcess::spawn(&engine_config()).unwrap();
    let mut bridge = EngineBridge::new(Duration::from_millis(100));

    let handshake = bridge.begin_handshake();
    send_all(&mut process, handshake).await;
    assert_eq!(
        next_event(&mut bridge, &mut lines).await,
        BridgeEvent::Identified("RandomMover 0.1".to_string())
    );
    assert_eq!(
        next_event(&mut bridge, &mut lines).await,
        BridgeEvent::Ready { queued: false }
    );

    let rules = CozyRules::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")
        .unwrap();
    let search = bridge.request_search(&rules.fen(), Instant::now()).unwrap();
    send_all(&mut process, search).await;

    let BridgeEvent::BestMove(mv) = next_event(&mut bridge, &mut lines).await else {
        panic!("expected a best move");
    };
    let mut after = rules.clone();
    assert!(after.apply(&mv).is_ok(), "engine proposed illegal {mv}");
    assert_eq!(bridge.phase(), SessionPhase::Ready);

    process.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_restart_discards_reply_from_previous_session() {
    let (mut process, mut lines) = EngineProcess::spawn(&engine_config()).unwrap();
    let mut bridge = EngineBridge::new(Duration::from_millis(100));

    send_all(&mut process, bridge.begin_handshake()).await;
    next_event(&mut bridge, &mut lines).await;
    next_event(&mut bridge, &mut lines).await;

    let search = bridge
        .request_search(&CozyRules::new().fen(), Instant::now())
        .unwrap();
    send_all(&mut process, search).await;
    send_all(&mut process, bridge.restart()).await;

    assert!(matches!(
        next_event(&mut bridge, &mut lines).await,
        BridgeEvent::Stale(_)
    ));
    assert_eq!(
        next_event(&mut bridge, &mut lines).await,
        BridgeEvent::Ready { queued: false }
    );

    process.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_missing_binary_reports_spawn_error() {
    let config = EngineConfig {
        path: "/nonexistent/engine".into(),
        args: Vec::new(),
    };
    let err = EngineProcess::spawn(&config).err().unwrap();
    assert!(err.to_string().contains("/nonexistent/engine"));
}
