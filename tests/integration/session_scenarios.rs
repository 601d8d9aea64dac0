use crate::common::test_helpers::{fetch_state, recv, start_game, state_sequence, state_squares};

#[tokio::test(start_paused = true)]
async fn test_white_opening_move_is_acknowledged() {
    let mut game = start_game(600).await;

    game.white.send("1 6 0 4 0").await.unwrap();
    assert_eq!(recv(&mut game.white).await, "moveack 6 0 4 0");
    assert_eq!(recv(&mut game.black).await, "othermove 6 0 4 0");

    // Black now holds the turn and sees sequence 1
    let snapshot = fetch_state(&mut game.black).await;
    assert_eq!(state_sequence(&snapshot), 1);

    let squares = state_squares(&snapshot);
    assert_eq!(squares[6 * 8], "false, None, Empty");
    assert_eq!(squares[4 * 8], "true, White, Pawn");

    game.shutdown.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_stale_resubmission_is_rejected() {
    let mut game = start_game(600).await;

    game.white.send("1 6 0 4 0").await.unwrap();
    assert_eq!(recv(&mut game.white).await, "moveack 6 0 4 0");
    assert_eq!(recv(&mut game.black).await, "othermove 6 0 4 0");

    game.white.send("1 6 0 4 0").await.unwrap();
    assert_eq!(recv(&mut game.white).await, "notYourTurn");
    let snapshot = recv(&mut game.white).await;
    assert_eq!(state_sequence(&snapshot), 1);
    assert!(game.black.try_recv().is_none());

    game.shutdown.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_sequence_mismatch_resends_state() {
    let mut game = start_game(600).await;

    // Skips ahead
    game.white.send("2 6 0 4 0").await.unwrap();
    assert_eq!(state_sequence(&recv(&mut game.white).await), 0);

    // Replays an old number
    game.white.send("0 6 0 4 0").await.unwrap();
    assert_eq!(state_sequence(&recv(&mut game.white).await), 0);

    let snapshot = fetch_state(&mut game.white).await;
    assert_eq!(state_squares(&snapshot)[6 * 8], "false, White, Pawn");
    assert!(game.black.try_recv().is_none());

    game.shutdown.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_out_of_turn_move_is_refused() {
    let mut game = start_game(600).await;
    let before = fetch_state(&mut game.white).await;

    game.black.send("1 1 0 3 0").await.unwrap();
    assert_eq!(recv(&mut game.black).await, "notYourTurn");
    let snapshot = recv(&mut game.black).await;
    assert_eq!(snapshot, before);

    // White still holds the turn
    game.white.send("1 6 4 4 4").await.unwrap();
    assert_eq!(recv(&mut game.white).await, "moveack 6 4 4 4");

    game.shutdown.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_out_of_turn_need_state_still_answers() {
    let mut game = start_game(600).await;

    game.black.send("needState").await.unwrap();
    assert_eq!(recv(&mut game.black).await, "notYourTurn");
    assert_eq!(state_sequence(&recv(&mut game.black).await), 0);

    game.shutdown.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_moving_opponent_piece_is_rejected() {
    let mut game = start_game(600).await;

    game.white.send("1 1 0 3 0").await.unwrap();
    let snapshot = recv(&mut game.white).await;
    assert_eq!(state_sequence(&snapshot), 0);
    assert_eq!(state_squares(&snapshot)[8], "false, Black, Pawn");

    // Turn did not pass
    game.white.send("1 6 0 5 0").await.unwrap();
    assert_eq!(recv(&mut game.white).await, "moveack 6 0 5 0");

    game.shutdown.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_moving_from_empty_square_is_rejected() {
    let mut game = start_game(600).await;

    game.white.send("1 4 4 3 4").await.unwrap();
    assert_eq!(state_sequence(&recv(&mut game.white).await), 0);
    assert!(game.black.try_recv().is_none());

    game.shutdown.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_malformed_text_gets_format_notice_only() {
    let mut game = start_game(600).await;

    for text in ["hello", "1 6 0 4", "1 6 0 4 x", "1 6 0 9 0"] {
        game.white.send(text).await.unwrap();
        assert_eq!(recv(&mut game.white).await, "invalid move fmt");
    }

    assert_eq!(state_sequence(&fetch_state(&mut game.white).await), 0);
    assert!(game.black.try_recv().is_none());

    game.shutdown.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_turns_alternate_and_sequence_counts_up() {
    let mut game = start_game(600).await;
    let moves = [
        "1 6 4 4 4",
        "2 1 4 3 4",
        "3 7 6 5 5",
        "4 0 1 2 2",
        "5 7 5 4 2",
    ];

    for (i, text) in moves.iter().enumerate() {
        let coordinates = text.split_once(' ').unwrap().1;
        let (mover, other) = if i % 2 == 0 {
            (&mut game.white, &mut game.black)
        } else {
            (&mut game.black, &mut game.white)
        };

        mover.send(*text).await.unwrap();
        assert_eq!(recv(mover).await, format!("moveack {}", coordinates));
        assert_eq!(recv(other).await, format!("othermove {}", coordinates));
    }

    // Five moves in, Black is to play
    let snapshot = fetch_state(&mut game.black).await;
    assert_eq!(state_sequence(&snapshot), 5);

    game.shutdown.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_capture_overwrites_destination() {
    let mut game = start_game(600).await;

    // Queen straight onto Black's king; no legality beyond ownership is checked
    game.white.send("1 7 3 0 4").await.unwrap();
    assert_eq!(recv(&mut game.white).await, "moveack 7 3 0 4");
    recv(&mut game.black).await;

    let squares = state_squares(&fetch_state(&mut game.black).await);
    assert_eq!(squares[4], "true, White, Queen");
    assert_eq!(squares[7 * 8 + 3], "false, None, Empty");

    game.shutdown.cancel();
}
