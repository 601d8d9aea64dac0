use crate::common::test_helpers::{recv, session_config, start_game, RECV_TIMEOUT};
use duel::game::{ChannelPlayer, EndReason, GameOutcome, Session, SessionError};
use duel::Color;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[tokio::test(start_paused = true)]
async fn test_white_times_out_without_moving() {
    let start = Instant::now();
    let mut game = start_game(3).await;

    assert_eq!(recv(&mut game.white).await, "gameover Black timeout");
    assert_eq!(recv(&mut game.black).await, "gameover Black timeout");

    let outcome = game.task.await.unwrap().unwrap();
    assert_eq!(
        outcome,
        GameOutcome {
            winner: Color::Black,
            reason: EndReason::Timeout
        }
    );
    assert_eq!(start.elapsed(), Duration::from_secs(3));
    assert!(game.white.is_closed());
    assert!(game.black.is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_clock_switches_to_black_after_accepted_move() {
    let start = Instant::now();
    let mut game = start_game(3).await;

    game.white.send("1 6 0 4 0").await.unwrap();
    assert_eq!(recv(&mut game.white).await, "moveack 6 0 4 0");
    assert_eq!(recv(&mut game.black).await, "othermove 6 0 4 0");

    assert_eq!(recv(&mut game.black).await, "gameover White timeout");
    let outcome = game.task.await.unwrap().unwrap();
    assert_eq!(outcome.winner, Color::White);
    assert_eq!(outcome.loser(), Color::Black);
    assert_eq!(start.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_rejected_move_does_not_switch_clock() {
    let mut game = start_game(2).await;

    game.white.send("1 1 0 3 0").await.unwrap();
    recv(&mut game.white).await;

    assert_eq!(recv(&mut game.white).await, "gameover Black timeout");
}

#[tokio::test(start_paused = true)]
async fn test_clocks_are_independent() {
    let start = Instant::now();
    let mut game = start_game(4).await;

    // White spends two ticks, then moves
    tokio::time::sleep(Duration::from_millis(2500)).await;
    game.white.send("1 6 0 4 0").await.unwrap();
    recv(&mut game.white).await;
    recv(&mut game.black).await;

    // Black spends one tick, then moves
    tokio::time::sleep(Duration::from_secs(1)).await;
    game.black.send("2 1 0 3 0").await.unwrap();
    recv(&mut game.black).await;
    recv(&mut game.white).await;

    // White had two ticks left, spent on the next two interval boundaries
    assert_eq!(recv(&mut game.white).await, "gameover Black timeout");
    assert_eq!(start.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_ends_session() {
    let mut game = start_game(600).await;

    game.black.disconnect().await;
    assert_eq!(recv(&mut game.white).await, "gameover White disconnect");

    let outcome = game.task.await.unwrap().unwrap();
    assert_eq!(outcome.reason, EndReason::Disconnect);
    assert!(game.white.is_closed());
    assert!(game.black.is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_dropped_connection_ends_session() {
    let game = start_game(600).await;
    let mut black = game.black;
    drop(game.white);

    assert_eq!(recv(&mut black).await, "gameover Black disconnect");
    let outcome = game.task.await.unwrap().unwrap();
    assert_eq!(outcome, GameOutcome::against(Color::White, EndReason::Disconnect));
}

#[tokio::test(start_paused = true)]
async fn test_resign_out_of_turn() {
    let mut game = start_game(600).await;

    game.black.send("resign").await.unwrap();
    assert_eq!(recv(&mut game.white).await, "gameover White resign");
    assert_eq!(recv(&mut game.black).await, "gameover White resign");
    assert_eq!(
        game.task.await.unwrap().unwrap().reason,
        EndReason::Resign
    );
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_session_and_players() {
    let mut game = start_game(600).await;

    game.shutdown.cancel();
    let result = timeout(RECV_TIMEOUT, game.task).await.unwrap().unwrap();
    assert!(matches!(result, Err(SessionError::Cancelled)));

    game.white.closed().await;
    game.black.closed().await;
    // No result to announce on shutdown
    assert_eq!(game.white.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_wins_over_ready_move() {
    let (white, mut white_peer) = ChannelPlayer::pair("white-player", 2);
    let (black, mut black_peer) = ChannelPlayer::pair("black-player", 2);
    let session = Session::start(
        Uuid::new_v4(),
        Box::new(white),
        Box::new(black),
        session_config(1),
        CancellationToken::new(),
    )
    .unwrap();
    assert_eq!(recv(&mut white_peer).await, "StartWhite");
    assert_eq!(recv(&mut black_peer).await, "StartBlack");

    // Both the final tick and a valid move are queued before the loop first runs
    white_peer.send("1 6 0 4 0").await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let outcome = tokio::spawn(session.run()).await.unwrap().unwrap();
    assert_eq!(outcome, GameOutcome::against(Color::White, EndReason::Timeout));
    assert_eq!(recv(&mut white_peer).await, "gameover Black timeout");
    assert_eq!(recv(&mut black_peer).await, "gameover Black timeout");
}
