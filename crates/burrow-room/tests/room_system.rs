//! Integration tests for the lobby and room actors.
//!
//! Members are plain `mpsc` outboxes, so these tests observe exactly what a
//! session's outbound duty would write. A snapshot round-trip is used as a
//! barrier: the room handles events one at a time, so once a snapshot comes
//! back every earlier event has been fully delivered.

use burrow_protocol::{parse_command, text};
use burrow_room::{
    LobbyHandle, MemberSender, Outbound, RoomConfig, RoomError, RoomHandle,
    RoomStatus,
};
use tokio::sync::mpsc;

type Inbox = mpsc::Receiver<Outbound>;

// =========================================================================
// Helpers
// =========================================================================

fn lobby() -> LobbyHandle {
    LobbyHandle::spawn(RoomConfig {
        seed: Some(7),
        channel_size: 256,
        ..RoomConfig::default()
    })
    .expect("default config is valid")
}

fn outbox() -> (MemberSender, Inbox) {
    mpsc::channel(256)
}

async fn join(lobby: &LobbyHandle, room: &str, nickname: &str) -> (RoomHandle, Inbox) {
    let (tx, rx) = outbox();
    let handle = lobby.admit(room, nickname, tx).await.expect("should join");
    (handle, rx)
}

/// Everything delivered to `inbox` so far.
async fn drain(room: &RoomHandle, inbox: &mut Inbox) -> Vec<Outbound> {
    let _ = room.snapshot().await;
    let mut out = Vec::new();
    while let Ok(msg) = inbox.try_recv() {
        out.push(msg);
    }
    out
}

/// The text portion of `msgs`, concatenated.
fn text_of(msgs: &[Outbound]) -> String {
    msgs.iter()
        .filter_map(|m| match m {
            Outbound::Text(t) => Some(t.as_str()),
            _ => None,
        })
        .collect()
}

async fn cmd(room: &RoomHandle, from: &str, line: &str) {
    room.command(from, parse_command(line))
        .await
        .expect("room should be reachable");
}

/// Fills a room with A, B and C and clears the join chatter.
async fn running_room(lobby: &LobbyHandle, name: &str) -> (RoomHandle, Vec<(String, Inbox)>) {
    let mut members = Vec::new();
    let mut last = None;
    for nick in ["A", "B", "C"] {
        let (handle, rx) = join(lobby, name, nick).await;
        last = Some(handle);
        members.push((nick.to_string(), rx));
    }
    let room = last.expect("three joins");
    for (_, rx) in members.iter_mut() {
        drain(&room, rx).await;
    }
    (room, members)
}

fn inbox_of<'a>(members: &'a mut [(String, Inbox)], nick: &str) -> &'a mut Inbox {
    &mut members
        .iter_mut()
        .find(|(n, _)| n == nick)
        .expect("known member")
        .1
}

// =========================================================================
// Lobby
// =========================================================================

#[tokio::test]
async fn test_find_or_create_returns_same_room_for_same_name() {
    let lobby = lobby();
    let (_first, _rx) = join(&lobby, "alpha", "A").await;

    let again = lobby.find_or_create("alpha").await.unwrap();
    let snap = again.snapshot().await.unwrap();
    assert_eq!(snap.members.len(), 1);
    assert_eq!(lobby.room_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_lookups_create_one_room() {
    let lobby = lobby();
    let mut tasks = Vec::new();
    for _ in 0..16 {
        let lobby = lobby.clone();
        tasks.push(tokio::spawn(async move {
            lobby.find_or_create("crowded").await.unwrap()
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }
    assert_eq!(lobby.room_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_different_names_get_different_rooms() {
    let lobby = lobby();
    let (_a, _ra) = join(&lobby, "alpha", "A").await;
    let (_b, _rb) = join(&lobby, "beta", "A").await;
    assert_eq!(lobby.room_count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_finished_room_name_gets_fresh_room() {
    let lobby = lobby();
    let (room, _members) = running_room(&lobby, "alpha").await;
    room.leave("A").await.unwrap();
    assert_eq!(room.finished().await.unwrap(), RoomStatus::Fail);

    let fresh = lobby.find_or_create("alpha").await.unwrap();
    let snap = fresh.snapshot().await.unwrap();
    assert_eq!(snap.status, RoomStatus::Lobby);
    assert!(snap.members.is_empty());
}

// =========================================================================
// Admission and the Lobby → Running transition
// =========================================================================

#[tokio::test]
async fn test_room_starts_when_third_member_joins() {
    let lobby = lobby();
    let (room, _ra) = join(&lobby, "alpha", "A").await;
    let (_, _rb) = join(&lobby, "alpha", "B").await;
    assert_eq!(room.status(), RoomStatus::Lobby);

    let (_, _rc) = join(&lobby, "alpha", "C").await;
    let snap = room.snapshot().await.unwrap();
    assert_eq!(snap.status, RoomStatus::Running);

    let mut bandwidths: Vec<i64> = snap.members.iter().map(|m| m.bandwidth).collect();
    bandwidths.sort();
    assert_eq!(bandwidths, vec![50, 81, 120]);

    let mut all_files: Vec<String> = snap
        .members
        .iter()
        .flat_map(|m| m.files.iter().map(|f| f.filename.clone()))
        .collect();
    assert_eq!(all_files.len(), 10);
    all_files.sort();
    all_files.dedup();
    assert_eq!(all_files.len(), 10, "shares must not overlap");

    // Round-robin in join order: the first member holds the extra file.
    let counts: Vec<usize> = snap.members.iter().map(|m| m.files.len()).collect();
    assert_eq!(counts, vec![4, 3, 3]);
}

#[tokio::test]
async fn test_mission_start_is_announced_to_everyone() {
    let lobby = lobby();
    let (room, mut ra) = join(&lobby, "alpha", "A").await;
    let (_, mut rb) = join(&lobby, "alpha", "B").await;
    let (_, mut rc) = join(&lobby, "alpha", "C").await;

    for rx in [&mut ra, &mut rb, &mut rc] {
        let out = text_of(&drain(&room, rx).await);
        assert_eq!(out.matches(text::MISSION_START).count(), 1);
        assert!(out.contains("Your transfer quota is"));
    }
}

#[tokio::test]
async fn test_fourth_member_is_rejected() {
    let lobby = lobby();
    let (room, _members) = running_room(&lobby, "alpha").await;

    let (tx, _rx) = outbox();
    let result = lobby.admit("alpha", "D", tx).await;
    assert!(matches!(result, Err(RoomError::RoomFull(_))));

    let snap = room.snapshot().await.unwrap();
    assert_eq!(snap.members.len(), 3);
    assert!(snap.member("D").is_none());
}

#[tokio::test]
async fn test_duplicate_nickname_is_refused_until_changed() {
    let lobby = lobby();
    let (room, _ra) = join(&lobby, "alpha", "A").await;

    let (tx, _rx) = outbox();
    let result = lobby.admit("alpha", "A", tx.clone()).await;
    assert!(matches!(result, Err(RoomError::NicknameTaken { .. })));
    assert_eq!(room.snapshot().await.unwrap().members.len(), 1);

    lobby.admit("alpha", "A2", tx).await.unwrap();
    let snap = room.snapshot().await.unwrap();
    assert_eq!(snap.members.len(), 2);
    assert!(snap.member("A2").is_some());
}

#[tokio::test]
async fn test_join_is_announced_to_existing_members() {
    let lobby = lobby();
    let (room, mut ra) = join(&lobby, "alpha", "A").await;
    let first = text_of(&drain(&room, &mut ra).await);
    assert!(first.contains("Welcome to alpha (1/3)"));

    let (_, _rb) = join(&lobby, "alpha", "B").await;
    let out = text_of(&drain(&room, &mut ra).await);
    assert!(out.contains("B has joined (2/3)"));
}

#[tokio::test]
async fn test_commands_are_discarded_in_lobby() {
    let lobby = lobby();
    let (room, mut ra) = join(&lobby, "alpha", "A").await;
    drain(&room, &mut ra).await;

    cmd(&room, "A", "/help").await;
    cmd(&room, "A", "/nonsense").await;
    assert!(drain(&room, &mut ra).await.is_empty());
}

#[tokio::test]
async fn test_leaving_the_lobby_does_not_fail_the_room() {
    let lobby = lobby();
    let (room, mut ra) = join(&lobby, "alpha", "A").await;
    let (_, _rb) = join(&lobby, "alpha", "B").await;
    drain(&room, &mut ra).await;

    room.leave("B").await.unwrap();
    let out = text_of(&drain(&room, &mut ra).await);
    assert!(out.contains("B has left (1/3)"));

    let snap = room.snapshot().await.unwrap();
    assert_eq!(snap.status, RoomStatus::Lobby);
    assert_eq!(snap.members.len(), 1);
}

// =========================================================================
// Messages
// =========================================================================

#[tokio::test]
async fn test_msg_all_reaches_every_member() {
    let lobby = lobby();
    let (room, mut members) = running_room(&lobby, "alpha").await;

    cmd(&room, "A", "/msg all hello team").await;
    for (_, rx) in members.iter_mut() {
        let out = text_of(&drain(&room, rx).await);
        assert_eq!(out, text::broadcast("A", "hello team"));
    }
}

#[tokio::test]
async fn test_msg_member_reaches_only_that_member() {
    let lobby = lobby();
    let (room, mut members) = running_room(&lobby, "alpha").await;

    cmd(&room, "A", "/msg B psst").await;
    let b = text_of(&drain(&room, inbox_of(&mut members, "B")).await);
    assert_eq!(b, text::direct("A", "psst"));
    assert!(drain(&room, inbox_of(&mut members, "A")).await.is_empty());
    assert!(drain(&room, inbox_of(&mut members, "C")).await.is_empty());
}

#[tokio::test]
async fn test_msg_unknown_member_errors_to_sender_only() {
    let lobby = lobby();
    let (room, mut members) = running_room(&lobby, "alpha").await;

    cmd(&room, "A", "/msg ghost boo").await;
    let a = text_of(&drain(&room, inbox_of(&mut members, "A")).await);
    assert_eq!(a, text::no_such_member("ghost"));
    assert!(drain(&room, inbox_of(&mut members, "B")).await.is_empty());
}

#[tokio::test]
async fn test_msg_glenda_chatter_gets_briefing() {
    let lobby = lobby();
    let (room, mut members) = running_room(&lobby, "alpha").await;

    cmd(&room, "C", "/msg Glenda who are you?").await;
    let c = text_of(&drain(&room, inbox_of(&mut members, "C")).await);
    assert_eq!(c, text::GLENDA_BRIEFING);
}

#[tokio::test]
async fn test_malformed_and_unknown_commands_error_to_sender() {
    let lobby = lobby();
    let (room, mut members) = running_room(&lobby, "alpha").await;

    cmd(&room, "A", "/msg B").await;
    cmd(&room, "A", "/dance").await;
    cmd(&room, "A", "just typing").await;
    let a = text_of(&drain(&room, inbox_of(&mut members, "A")).await);
    assert_eq!(
        a,
        format!(
            "{}{}{}",
            text::usage("/msg [to] [text]"),
            text::INVALID_COMMAND,
            text::INVALID_COMMAND
        )
    );
    assert!(drain(&room, inbox_of(&mut members, "B")).await.is_empty());
}

#[tokio::test]
async fn test_help_list_and_look() {
    let lobby = lobby();
    let (room, mut members) = running_room(&lobby, "alpha").await;
    let snap = room.snapshot().await.unwrap();
    let a = snap.member("A").unwrap().clone();

    cmd(&room, "A", "/help").await;
    cmd(&room, "A", "/list").await;
    cmd(&room, "A", "/look").await;
    let out = text_of(&drain(&room, inbox_of(&mut members, "A")).await);

    let expected = format!(
        "{}{}{}",
        text::HELP,
        text::list(a.bandwidth, &a.files),
        text::look(["A", "B", "C"])
    );
    assert_eq!(out, expected);
}

// =========================================================================
// File routing
// =========================================================================

#[tokio::test]
async fn test_send_to_teammate_moves_file_without_cost() {
    let lobby = lobby();
    let (room, mut members) = running_room(&lobby, "alpha").await;
    let before = room.snapshot().await.unwrap();

    // A holds filename_0.txt (round-robin, first member).
    cmd(&room, "A", "/send B filename_0.txt").await;

    let after = room.snapshot().await.unwrap();
    let has = |nick: &str| {
        after
            .member(nick)
            .unwrap()
            .files
            .iter()
            .any(|f| f.filename == "filename_0.txt")
    };
    assert!(!has("A"));
    assert!(has("B"));
    for nick in ["A", "B"] {
        assert_eq!(
            after.member(nick).unwrap().bandwidth,
            before.member(nick).unwrap().bandwidth
        );
    }

    let b = drain(&room, inbox_of(&mut members, "B")).await;
    assert!(matches!(
        b.as_slice(),
        [Outbound::FileArrived { file, from }]
            if file.filename == "filename_0.txt" && from == "A"
    ));
    let a = text_of(&drain(&room, inbox_of(&mut members, "A")).await);
    assert!(a.starts_with("send -- | Sent file: filename_0.txt"));
}

#[tokio::test]
async fn test_send_to_glenda_debits_bandwidth_and_collects() {
    let lobby = lobby();
    let (room, _members) = running_room(&lobby, "alpha").await;
    let before = room.snapshot().await.unwrap().member("A").unwrap().bandwidth;

    cmd(&room, "A", "/send glenda filename_0.txt").await;

    let snap = room.snapshot().await.unwrap();
    assert_eq!(snap.status, RoomStatus::Running);
    assert_eq!(snap.member("A").unwrap().bandwidth, before - 23);
    assert_eq!(snap.collected.len(), 1);
    assert_eq!(snap.score(), 92);
}

#[tokio::test]
async fn test_send_to_unknown_addressee_changes_nothing() {
    let lobby = lobby();
    let (room, mut members) = running_room(&lobby, "alpha").await;
    let before = room.snapshot().await.unwrap();

    cmd(&room, "A", "/send ghost filename_0.txt").await;

    let after = room.snapshot().await.unwrap();
    assert_eq!(after.members, before.members);
    assert!(after.collected.is_empty());
    let a = text_of(&drain(&room, inbox_of(&mut members, "A")).await);
    assert!(a.starts_with("err -- |"));
    assert_eq!(a, text::no_such_member("ghost"));
    assert!(drain(&room, inbox_of(&mut members, "B")).await.is_empty());
}

#[tokio::test]
async fn test_send_missing_file_errors() {
    let lobby = lobby();
    let (room, mut members) = running_room(&lobby, "alpha").await;

    // filename_1.txt belongs to B.
    cmd(&room, "A", "/send glenda filename_1.txt").await;

    let a = text_of(&drain(&room, inbox_of(&mut members, "A")).await);
    assert_eq!(a, text::no_such_file("filename_1.txt"));
    assert!(room.snapshot().await.unwrap().collected.is_empty());
}

#[tokio::test]
async fn test_bandwidth_overrun_fails_room_for_everyone() {
    let lobby = lobby();
    let (room, mut members) = running_room(&lobby, "alpha").await;
    let snap = room.snapshot().await.unwrap();

    let poor = snap
        .members
        .iter()
        .find(|m| m.bandwidth == 50)
        .unwrap()
        .nickname
        .clone();
    let holder = snap
        .members
        .iter()
        .find(|m| m.files.iter().any(|f| f.filename == "filename_6.txt"))
        .unwrap()
        .nickname
        .clone();
    if holder != poor {
        cmd(&room, &holder, &format!("/send {poor} filename_6.txt")).await;
    }
    for (_, rx) in members.iter_mut() {
        drain(&room, rx).await;
    }

    // Size 63 against a 50 KB quota.
    cmd(&room, &poor, "/send glenda filename_6.txt").await;
    assert_eq!(room.finished().await.unwrap(), RoomStatus::Fail);

    for (_, rx) in members.iter_mut() {
        let msgs = drain(&room, rx).await;
        assert_eq!(text_of(&msgs).matches(text::FAIL_BANDWIDTH).count(), 1);
        assert_eq!(msgs.last(), Some(&Outbound::Close));
    }
    let after = room.snapshot().await.unwrap();
    assert_eq!(after.member(&poor).unwrap().bandwidth, -13);
}

#[tokio::test]
async fn test_events_after_game_over_are_ignored() {
    let lobby = lobby();
    let (room, mut members) = running_room(&lobby, "alpha").await;
    room.leave("C").await.unwrap();
    room.finished().await.unwrap();
    for (_, rx) in members.iter_mut() {
        drain(&room, rx).await;
    }

    cmd(&room, "A", "/send glenda filename_0.txt").await;
    cmd(&room, "A", "/msg all anyone?").await;

    let snap = room.snapshot().await.unwrap();
    assert_eq!(snap.status, RoomStatus::Fail);
    assert!(snap.collected.is_empty());
    assert!(drain(&room, inbox_of(&mut members, "A")).await.is_empty());
}

// =========================================================================
// Endings
// =========================================================================

#[tokio::test]
async fn test_all_done_succeeds_with_collected_score() {
    let lobby = lobby();
    let (room, mut members) = running_room(&lobby, "alpha").await;

    cmd(&room, "A", "/send glenda filename_0.txt").await;
    cmd(&room, "A", "/msg glenda done").await;
    cmd(&room, "B", "/msg glenda done").await;
    assert_eq!(room.snapshot().await.unwrap().status, RoomStatus::Running);

    cmd(&room, "C", "/msg glenda done").await;
    assert_eq!(room.finished().await.unwrap(), RoomStatus::Success);

    for (_, rx) in members.iter_mut() {
        let msgs = drain(&room, rx).await;
        let out = text_of(&msgs);
        assert!(out.contains("Final score: 92"), "got {out}");
        assert_eq!(out.matches("has finished sending files").count(), 3);
        assert_eq!(msgs.last(), Some(&Outbound::Close));
    }
}

#[tokio::test]
async fn test_repeated_done_is_announced_once() {
    let lobby = lobby();
    let (room, mut members) = running_room(&lobby, "alpha").await;

    cmd(&room, "A", "/msg glenda done").await;
    cmd(&room, "A", "/msg glenda done").await;

    let b = text_of(&drain(&room, inbox_of(&mut members, "B")).await);
    assert_eq!(b, text::member_done("A"));
    assert!(room.snapshot().await.unwrap().member("A").unwrap().done);
}

#[tokio::test]
async fn test_send_after_done_is_refused() {
    let lobby = lobby();
    let (room, mut members) = running_room(&lobby, "alpha").await;

    cmd(&room, "A", "/msg glenda done").await;
    drain(&room, inbox_of(&mut members, "A")).await;
    cmd(&room, "A", "/send B filename_0.txt").await;

    let a = text_of(&drain(&room, inbox_of(&mut members, "A")).await);
    assert_eq!(a, text::ALREADY_DONE);
    let snap = room.snapshot().await.unwrap();
    assert!(snap.member("A").unwrap().files.iter().any(|f| f.filename == "filename_0.txt"));
}

#[tokio::test]
async fn test_member_loss_while_running_fails_room() {
    let lobby = lobby();
    let (room, mut members) = running_room(&lobby, "alpha").await;

    room.leave("B").await.unwrap();
    assert_eq!(room.finished().await.unwrap(), RoomStatus::Fail);

    for nick in ["A", "C"] {
        let msgs = drain(&room, inbox_of(&mut members, nick)).await;
        assert_eq!(text_of(&msgs), text::fail_abort("B"));
        assert_eq!(msgs.last(), Some(&Outbound::Close));
    }
}

#[tokio::test]
async fn test_room_stops_after_everyone_leaves_a_finished_game() {
    let lobby = lobby();
    let (room, _members) = running_room(&lobby, "alpha").await;

    room.leave("A").await.unwrap();
    room.finished().await.unwrap();
    room.leave("B").await.unwrap();
    room.leave("C").await.unwrap();

    // The actor drains the leaves, then drops its receiver.
    for _ in 0..100 {
        if room.snapshot().await.is_err() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(matches!(room.snapshot().await, Err(RoomError::Unavailable(_))));
    assert_eq!(lobby.room_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_room_stops_when_everyone_leaves_the_lobby() {
    let lobby = lobby();
    let (room, _a) = join(&lobby, "alpha", "A").await;
    let (_, _b) = join(&lobby, "alpha", "B").await;

    room.leave("A").await.unwrap();
    room.leave("B").await.unwrap();

    for _ in 0..100 {
        if room.snapshot().await.is_err() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(matches!(room.snapshot().await, Err(RoomError::Unavailable(_))));
    assert!(room.is_finished());
    assert_eq!(lobby.room_count().await.unwrap(), 0);

    // The name is free again and the next join opens a fresh room.
    let (fresh, _c) = join(&lobby, "alpha", "C").await;
    let snap = fresh.snapshot().await.unwrap();
    assert_eq!(snap.status, RoomStatus::Lobby);
    assert_eq!(snap.members.len(), 1);
}
