use crate::{
    game::{word_guess::WordGameStatus, Comparison, PendingResolution, RevealOutcome, SubmitOutcome},
    profile::ProfileId,
    session::{PageSession, SessionInfo, SharedSession},
    websocket::messages::{ClientMessage, ServerMessage},
    AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc;
use uuid::Uuid;

/// WebSocket upgrade handler; one connection per open page
pub async fn handle_websocket(
    profile: ProfileId,
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::info!("WebSocket upgrade requested for profile {}", profile.0);
    ws.on_upgrade(move |socket| handle_socket(socket, state, profile))
}

/// Open a page session: load statistics once and deal the first word
pub async fn open_session(state: &AppState, profile: ProfileId) -> SharedSession {
    let stats = state.stats.load(&profile.0).await;
    let first_word = state.dictionary.random_word(&mut rand::rng());
    let session_id = Uuid::new_v4();

    state.sessions.insert(
        session_id,
        SessionInfo {
            profile: profile.0.clone(),
            connected_at: chrono::Utc::now(),
        },
    );

    PageSession::new(session_id, profile.0, stats, first_word).into_shared()
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, profile: ProfileId) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);

    let session = open_session(&state, profile).await;
    let (session_id, profile) = {
        let page = session.lock().await;
        (page.session_id, page.profile.clone())
    };
    tracing::info!(
        "Page session {} opened for profile {}",
        session_id,
        profile
    );

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    if let Err(e) = greet(&state, &session, &tx).await {
        tracing::error!("Failed to send initial state: {}", e);
    }

    // Handle incoming messages from the client
    let state_for_recv = state.clone();
    let session_for_recv = session.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        if let Err(e) =
                            handle_client_message(client_msg, &state_for_recv, &session_for_recv, &tx)
                                .await
                        {
                            tracing::error!("Error handling message: {}", e);
                            let error_msg = ServerMessage::Error {
                                message: e.to_string(),
                            };
                            let _ = tx.send(error_msg).await;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse message: {}", e);
                        let error_msg = ServerMessage::Error {
                            message: format!("Invalid message format: {}", e),
                        };
                        let _ = tx.send(error_msg).await;
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Page session {} closed by client", session_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    session.lock().await.close();
    if let Some((_, info)) = state.sessions.remove(&session_id) {
        let open_for = chrono::Utc::now() - info.connected_at;
        tracing::info!(
            "Page session {} ended for profile {} after {}s",
            session_id,
            info.profile,
            open_for.num_seconds()
        );
    }
}

/// Announce the session, send every widget's state and start the skill bars
async fn greet(
    state: &AppState,
    session: &SharedSession,
    tx: &mpsc::Sender<ServerMessage>,
) -> anyhow::Result<()> {
    let (session_id, profile) = {
        let page = session.lock().await;
        (page.session_id, page.profile.clone())
    };
    tx.send(ServerMessage::SessionStarted {
        session_id,
        profile,
    })
    .await?;
    send_full_state(session, tx).await?;
    start_skill_animation(session, tx, state.config.game.skill_transition()).await
}

async fn send_full_state(
    session: &SharedSession,
    tx: &mpsc::Sender<ServerMessage>,
) -> anyhow::Result<()> {
    let messages = {
        let page = session.lock().await;
        [
            ServerMessage::BoardState(page.board.snapshot()),
            ServerMessage::MatchingState(page.matching.snapshot()),
            ServerMessage::WordState(page.word.snapshot()),
            ServerMessage::Stats(page.stats.summary()),
            ServerMessage::SkillBars {
                bars: page.skills.snapshot(),
            },
        ]
    };

    for message in messages {
        tx.send(message).await?;
    }
    Ok(())
}

/// Handle individual client messages
pub async fn handle_client_message(
    msg: ClientMessage,
    state: &Arc<AppState>,
    session: &SharedSession,
    tx: &mpsc::Sender<ServerMessage>,
) -> anyhow::Result<()> {
    match msg {
        ClientMessage::Sync => send_full_state(session, tx).await?,

        ClientMessage::PlaceMark { cell } => {
            let snapshot = {
                let mut page = session.lock().await;
                if page.board.place_mark(cell) {
                    tracing::debug!(
                        "Session {} placed mark in cell {} ({})",
                        page.session_id,
                        cell,
                        page.board.status_line()
                    );
                }
                page.board.snapshot()
            };
            tx.send(ServerMessage::BoardState(snapshot)).await?;
        }
        ClientMessage::ResetBoard => {
            let snapshot = {
                let mut page = session.lock().await;
                page.board.reset_board();
                page.board.snapshot()
            };
            tx.send(ServerMessage::BoardState(snapshot)).await?;
        }
        ClientMessage::ResetScores => {
            let snapshot = {
                let mut page = session.lock().await;
                page.board.reset_scores();
                page.board.snapshot()
            };
            tx.send(ServerMessage::BoardState(snapshot)).await?;
        }

        ClientMessage::NewMatchingGame => {
            let snapshot = {
                let mut page = session.lock().await;
                page.matching.new_game(&mut rand::rng());
                page.matching.snapshot()
            };
            tx.send(ServerMessage::MatchingState(snapshot)).await?;
        }
        ClientMessage::RevealToken { token } => {
            let (snapshot, outcome) = {
                let mut page = session.lock().await;
                let outcome = page.matching.reveal(token);
                (page.matching.snapshot(), outcome)
            };
            tx.send(ServerMessage::MatchingState(snapshot)).await?;

            if let RevealOutcome::Compare(pending) = outcome {
                let game = &state.config.game;
                let delay = match pending.comparison {
                    Comparison::Match => game.match_delay(),
                    Comparison::Mismatch => game.mismatch_delay(),
                };
                schedule_resolution(session.clone(), tx.clone(), pending, delay);
            }
        }

        ClientMessage::KeyPress { key } => {
            let outcome = {
                let mut page = session.lock().await;
                let page = &mut *page;
                page.word.handle_key(&key, &mut page.stats)
            };
            after_word_input(state, session, tx, outcome).await?;
        }
        ClientMessage::AppendLetter { letter } => {
            session.lock().await.word.append_letter(letter);
            after_word_input(state, session, tx, None).await?;
        }
        ClientMessage::DeleteLetter => {
            session.lock().await.word.delete_letter();
            after_word_input(state, session, tx, None).await?;
        }
        ClientMessage::SubmitGuess => {
            let outcome = {
                let mut page = session.lock().await;
                let page = &mut *page;
                page.word.submit_guess(&mut page.stats)
            };
            after_word_input(state, session, tx, Some(outcome)).await?;
        }
        ClientMessage::ToggleHint => {
            session.lock().await.word.toggle_hint();
            after_word_input(state, session, tx, None).await?;
        }
        ClientMessage::NewWordGame => {
            let target = state.dictionary.random_word(&mut rand::rng());
            session.lock().await.word.new_game(target);
            after_word_input(state, session, tx, None).await?;
        }
        ClientMessage::GetStats => {
            let summary = session.lock().await.stats.summary();
            tx.send(ServerMessage::Stats(summary)).await?;
        }

        ClientMessage::AnimateSkills => {
            start_skill_animation(session, tx, state.config.game.skill_transition()).await?;
        }
    }

    Ok(())
}

/// Send the word game's state after input, persisting statistics when the
/// round just ended
async fn after_word_input(
    state: &AppState,
    session: &SharedSession,
    tx: &mpsc::Sender<ServerMessage>,
    outcome: Option<SubmitOutcome>,
) -> anyhow::Result<()> {
    let (snapshot, profile, stats) = {
        let page = session.lock().await;
        (page.word.snapshot(), page.profile.clone(), page.stats.clone())
    };

    // A finished round ignores submissions without shaking the row
    if outcome == Some(SubmitOutcome::Rejected) && snapshot.status == WordGameStatus::Playing {
        tx.send(ServerMessage::GuessRejected {
            reason: "Not enough letters".to_string(),
        })
        .await?;
    }
    tx.send(ServerMessage::WordState(snapshot)).await?;

    if let Some(outcome) = outcome.filter(SubmitOutcome::is_terminal) {
        tracing::info!("Word game for profile {} finished: {:?}", profile, outcome);
        if let Err(e) = state.stats.save(&profile, &stats).await {
            // The session copy stays authoritative until the next successful write
            tracing::error!("Failed to persist statistics for {}: {}", profile, e);
        }
        tx.send(ServerMessage::Stats(stats.summary())).await?;
    }

    Ok(())
}

/// Resolve a matching-game comparison after its display delay
pub fn schedule_resolution(
    session: SharedSession,
    tx: mpsc::Sender<ServerMessage>,
    pending: PendingResolution,
    delay: Duration,
) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let snapshot = {
            let mut page = session.lock().await;
            if !page.matching.resolve(pending) {
                tracing::debug!(
                    "Dropped stale resolution for generation {}",
                    pending.generation
                );
                return;
            }
            page.matching.snapshot()
        };

        if snapshot.complete {
            tracing::info!("Matching game completed in {} moves", snapshot.moves);
        }
        let _ = tx.send(ServerMessage::MatchingState(snapshot)).await;
    });
}

/// Reset all skill bars and fill each one after its own delay
pub async fn start_skill_animation(
    session: &SharedSession,
    tx: &mpsc::Sender<ServerMessage>,
    transition: Duration,
) -> anyhow::Result<()> {
    let (generation, bars, views) = {
        let mut page = session.lock().await;
        let generation = page.skills.restart();
        (generation, page.skills.bars().to_vec(), page.skills.snapshot())
    };
    tx.send(ServerMessage::SkillBars { bars: views }).await?;

    for (index, bar) in bars.into_iter().enumerate() {
        let session = session.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(bar.delay() + transition).await;

            let progress = session.lock().await.skills.advance(generation, index);
            if let Some(progress) = progress {
                let _ = tx
                    .send(ServerMessage::SkillProgress {
                        index,
                        skill: bar.skill,
                        progress,
                    })
                    .await;
            }
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        dictionary::Dictionary,
        game::feedback::LetterStatus,
        models::{Portfolio, Statistics},
        storage::FailingStore,
    };
    use std::time::Duration;

    fn test_state() -> Arc<AppState> {
        AppState::in_memory(Config::default())
    }

    async fn drain(rx: &mut mpsc::Receiver<ServerMessage>) -> Vec<ServerMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    fn failing_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            Config::default(),
            Arc::new(FailingStore),
            Dictionary::builtin(),
            Portfolio::empty(),
        ))
    }

    async fn type_guess(
        state: &Arc<AppState>,
        session: &SharedSession,
        tx: &mpsc::Sender<ServerMessage>,
        word: &str,
    ) {
        for ch in word.chars() {
            send(state, session, tx, ClientMessage::KeyPress { key: ch.to_string() }).await;
        }
        send(state, session, tx, ClientMessage::KeyPress { key: "Enter".to_string() }).await;
    }

    async fn send(
        state: &Arc<AppState>,
        session: &SharedSession,
        tx: &mpsc::Sender<ServerMessage>,
        msg: ClientMessage,
    ) {
        handle_client_message(msg, state, session, tx).await.unwrap();
    }

    #[tokio::test]
    async fn test_place_mark_replies_with_board() {
        let state = test_state();
        let session = open_session(&state, ProfileId("p1".to_string())).await;
        let (tx, mut rx) = mpsc::channel(32);

        send(&state, &session, &tx, ClientMessage::PlaceMark { cell: 4 }).await;
        send(&state, &session, &tx, ClientMessage::PlaceMark { cell: 4 }).await;

        let messages = drain(&mut rx).await;
        let ServerMessage::BoardState(board) = &messages[1] else {
            panic!("Expected board state");
        };
        assert_eq!(board.cells.iter().filter(|c| c.is_some()).count(), 1);
        assert_eq!(state.sessions.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_matching_resolution_after_delay() {
        let state = test_state();
        let session = open_session(&state, ProfileId("p2".to_string())).await;
        let (tx, mut rx) = mpsc::channel(32);

        send(&state, &session, &tx, ClientMessage::NewMatchingGame).await;
        let (a, b) = {
            let page = session.lock().await;
            let symbol = page.matching.tokens()[0].symbol;
            let b = page
                .matching
                .tokens()
                .iter()
                .position(|t| t.id != 0 && t.symbol == symbol)
                .unwrap();
            (0, b)
        };
        send(&state, &session, &tx, ClientMessage::RevealToken { token: a }).await;
        send(&state, &session, &tx, ClientMessage::RevealToken { token: b }).await;
        assert_eq!(session.lock().await.matching.matched_pairs(), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;

        let page = session.lock().await;
        assert_eq!(page.matching.matched_pairs(), 1);
        assert_eq!(page.matching.moves(), 1);
        assert!(page.matching.tokens()[a].matched && page.matching.tokens()[b].matched);
        drop(page);
        assert!(drain(&mut rx)
            .await
            .iter()
            .any(|m| matches!(m, ServerMessage::MatchingState(s) if s.matched_pairs == 1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_discards_pending_flip_back() {
        let state = test_state();
        let session = open_session(&state, ProfileId("p3".to_string())).await;
        let (tx, _rx) = mpsc::channel(64);

        send(&state, &session, &tx, ClientMessage::NewMatchingGame).await;
        let stranger = {
            let page = session.lock().await;
            let symbol = page.matching.tokens()[0].symbol;
            page.matching
                .tokens()
                .iter()
                .position(|t| t.symbol != symbol)
                .unwrap()
        };
        send(&state, &session, &tx, ClientMessage::RevealToken { token: 0 }).await;
        send(&state, &session, &tx, ClientMessage::RevealToken { token: stranger }).await;

        send(&state, &session, &tx, ClientMessage::NewMatchingGame).await;
        send(&state, &session, &tx, ClientMessage::RevealToken { token: 0 }).await;

        tokio::time::sleep(Duration::from_millis(1500)).await;

        let page = session.lock().await;
        assert!(
            page.matching.tokens()[0].face_up,
            "Old flip-back must not touch the new deal"
        );
        assert_eq!(page.matching.revealed(), &[0]);
    }

    #[tokio::test]
    async fn test_win_persists_statistics() {
        let state = test_state();
        let session = open_session(&state, ProfileId("winner".to_string())).await;
        let (tx, mut rx) = mpsc::channel(64);

        let target = session.lock().await.word.target().to_string();
        for ch in target.chars() {
            send(&state, &session, &tx, ClientMessage::KeyPress { key: ch.to_string() }).await;
        }
        send(&state, &session, &tx, ClientMessage::KeyPress { key: "Enter".to_string() }).await;

        assert_eq!(session.lock().await.word.status(), WordGameStatus::Won);
        let saved = state.stats.load("winner").await;
        assert_eq!(saved.wins, 1);
        assert_eq!(saved.distribution[0], 1);

        let messages = drain(&mut rx).await;
        assert!(messages.iter().any(|m| matches!(m, ServerMessage::Stats(s) if s.stats.wins == 1)));
        assert!(messages.iter().any(|m| matches!(
            m,
            ServerMessage::WordState(w) if w.keyboard.values().all(|s| *s == LetterStatus::Correct)
        )));
    }

    #[tokio::test]
    async fn test_short_guess_sends_shake() {
        let state = test_state();
        let session = open_session(&state, ProfileId("shaky".to_string())).await;
        let (tx, mut rx) = mpsc::channel(16);

        send(&state, &session, &tx, ClientMessage::AppendLetter { letter: 'a' }).await;
        send(&state, &session, &tx, ClientMessage::SubmitGuess).await;

        let messages = drain(&mut rx).await;
        assert!(messages
            .iter()
            .any(|m| matches!(m, ServerMessage::GuessRejected { .. })));
        assert_eq!(state.stats.load("shaky").await, Statistics::default());
    }

    #[tokio::test]
    async fn test_statistics_reloaded_for_same_profile() {
        let state = test_state();
        let mut stats = Statistics::default();
        stats.record_win(2);
        state.stats.save("returning", &stats).await.unwrap();

        let session = open_session(&state, ProfileId("returning".to_string())).await;
        assert_eq!(session.lock().await.stats, stats);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skill_animation_fills_bars() {
        let state = test_state();
        let session = open_session(&state, ProfileId("skills".to_string())).await;
        let (tx, mut rx) = mpsc::channel(32);

        send(&state, &session, &tx, ClientMessage::AnimateSkills).await;
        tokio::time::sleep(Duration::from_millis(1200)).await;

        let progress: Vec<f64> = drain(&mut rx)
            .await
            .into_iter()
            .filter_map(|m| match m {
                ServerMessage::SkillProgress { progress, .. } => Some(progress),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![90.0, 85.0, 80.0, 75.0, 70.0, 95.0]);
    }

    #[tokio::test]
    async fn test_reveal_before_deal_is_ignored() {
        let state = test_state();
        let session = open_session(&state, ProfileId("early".to_string())).await;
        let outcome = session.lock().await.matching.reveal(0);
        assert_eq!(outcome, RevealOutcome::Ignored);
    }

    #[tokio::test]
    async fn test_submit_after_round_over_does_not_shake() {
        let state = test_state();
        let session = open_session(&state, ProfileId("finished".to_string())).await;
        let (tx, mut rx) = mpsc::channel(64);

        let target = session.lock().await.word.target().to_string();
        type_guess(&state, &session, &tx, &target).await;
        drain(&mut rx).await;

        send(&state, &session, &tx, ClientMessage::SubmitGuess).await;

        let messages = drain(&mut rx).await;
        assert!(!messages
            .iter()
            .any(|m| matches!(m, ServerMessage::GuessRejected { .. })));
        assert!(messages
            .iter()
            .any(|m| matches!(m, ServerMessage::WordState(w) if w.status == WordGameStatus::Won)));
        assert_eq!(state.stats.load("finished").await.played, 1);
    }

    #[tokio::test]
    async fn test_loss_persists_reset_streak() {
        let state = test_state();
        let mut stats = Statistics::default();
        stats.record_win(3);
        stats.record_win(2);
        state.stats.save("unlucky", &stats).await.unwrap();

        let session = open_session(&state, ProfileId("unlucky".to_string())).await;
        let (tx, mut rx) = mpsc::channel(128);

        for _ in 0..6 {
            type_guess(&state, &session, &tx, "zzzzz").await;
        }

        assert_eq!(session.lock().await.word.status(), WordGameStatus::Lost);
        let saved = state.stats.load("unlucky").await;
        assert_eq!(saved.played, 3);
        assert_eq!(saved.wins, 2);
        assert_eq!(saved.current_streak, 0);
        assert_eq!(saved.max_streak, 2);

        let messages = drain(&mut rx).await;
        assert!(messages
            .iter()
            .any(|m| matches!(m, ServerMessage::WordState(w) if w.answer.is_some())));
    }

    #[tokio::test]
    async fn test_failing_store_keeps_session_statistics() {
        let state = failing_state();
        let session = open_session(&state, ProfileId("offline".to_string())).await;
        assert_eq!(session.lock().await.stats, Statistics::default());
        let (tx, mut rx) = mpsc::channel(64);

        let target = session.lock().await.word.target().to_string();
        type_guess(&state, &session, &tx, &target).await;

        assert_eq!(session.lock().await.stats.wins, 1);
        let messages = drain(&mut rx).await;
        assert!(messages
            .iter()
            .any(|m| matches!(m, ServerMessage::Stats(s) if s.stats.wins == 1 && s.win_percentage == 100)));
        assert!(!messages
            .iter()
            .any(|m| matches!(m, ServerMessage::Error { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_greeting_sends_state_and_animates_skills() {
        let state = test_state();
        let session = open_session(&state, ProfileId("visitor".to_string())).await;
        let (tx, mut rx) = mpsc::channel(64);

        greet(&state, &session, &tx).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1200)).await;

        let messages = drain(&mut rx).await;
        assert!(matches!(
            &messages[0],
            ServerMessage::SessionStarted { profile, .. } if profile == "visitor"
        ));
        let filled = messages
            .iter()
            .filter(|m| matches!(m, ServerMessage::SkillProgress { .. }))
            .count();
        assert_eq!(filled, 6);
    }
}
