mod common;

use chrono::Duration;
use common::{date, init_logger, membership, message};
use mail_threading::threading::normalize_subject;
use mail_threading::{ThreadingEngine, ThreadingError};

#[test]
fn reply_joins_original_thread() {
    init_logger();
    let engine = ThreadingEngine::new();

    let a = message("1", "Project Update", date(2024, 1, 1));
    let b = message("2", "Re: Project Update", date(2024, 1, 2)).with_in_reply_to("1");

    let threads = engine.build_threads(vec![a, b]).unwrap();

    assert_eq!(threads.len(), 1);
    assert_eq!(membership(&threads), vec![vec!["1", "2"]]);
    assert_eq!(threads[0].normalized_subject, "project update");
}

#[test]
fn subject_match_outside_window_starts_new_thread() {
    init_logger();
    let engine = ThreadingEngine::new();

    let c = message("10", "Invoice", date(2024, 1, 1));
    let d = message("11", "Re: Invoice", date(2024, 3, 15));

    let threads = engine.build_threads(vec![c, d]).unwrap();

    assert_eq!(membership(&threads), vec![vec!["10"], vec!["11"]]);
    assert_eq!(threads[0].normalized_subject, threads[1].normalized_subject);
}

#[test]
fn window_boundary_is_inclusive() {
    init_logger();
    let engine = ThreadingEngine::new();
    let start = date(2024, 5, 1);

    let at_boundary = engine
        .build_threads(vec![
            message("a", "Status", start),
            message("b", "Re: Status", start + Duration::days(30)),
        ])
        .unwrap();
    assert_eq!(at_boundary.len(), 1);

    let past_boundary = engine
        .build_threads(vec![
            message("a", "Status", start),
            message("b", "Re: Status", start + Duration::days(30) + Duration::seconds(1)),
        ])
        .unwrap();
    assert_eq!(past_boundary.len(), 2);
}

#[test]
fn window_slides_with_last_message() {
    init_logger();
    let engine = ThreadingEngine::new();
    let start = date(2024, 1, 1);

    // Each message is within 30 days of the previous one, though the last is
    // well over 30 days after the first.
    let threads = engine
        .build_threads(vec![
            message("a", "Weekly sync", start),
            message("b", "Re: Weekly sync", start + Duration::days(25)),
            message("c", "Re: Weekly sync", start + Duration::days(50)),
        ])
        .unwrap();

    assert_eq!(membership(&threads), vec![vec!["a", "b", "c"]]);
}

#[test]
fn in_reply_to_beats_subject_match() {
    init_logger();
    let engine = ThreadingEngine::new();

    let threads = engine
        .build_threads(vec![
            message("1", "Budget", date(2024, 2, 1)),
            message("2", "Hiring", date(2024, 2, 2)),
            message("3", "Re: Hiring", date(2024, 2, 3)).with_in_reply_to("1"),
        ])
        .unwrap();

    assert_eq!(membership(&threads), vec![vec!["1", "3"], vec!["2"]]);
}

#[test]
fn in_reply_to_beats_references() {
    init_logger();
    let engine = ThreadingEngine::new();

    let threads = engine
        .build_threads(vec![
            message("1", "One", date(2024, 2, 1)),
            message("2", "Two", date(2024, 2, 2)),
            message("3", "Three", date(2024, 2, 3))
                .with_in_reply_to("2")
                .with_references(["1"]),
        ])
        .unwrap();

    assert_eq!(membership(&threads), vec![vec!["1"], vec!["2", "3"]]);
}

#[test]
fn first_resolving_reference_wins() {
    init_logger();
    let engine = ThreadingEngine::new();

    let threads = engine
        .build_threads(vec![
            message("p", "First topic", date(2024, 2, 1)),
            message("q", "Second topic", date(2024, 2, 2)),
            message("r", "Third topic", date(2024, 2, 3))
                .with_in_reply_to("missing")
                .with_references(["q", "p"]),
        ])
        .unwrap();

    assert_eq!(membership(&threads), vec![vec!["p"], vec!["q", "r"]]);
}

#[test]
fn unresolved_references_are_skipped() {
    init_logger();
    let engine = ThreadingEngine::new();

    let threads = engine
        .build_threads(vec![
            message("y", "Topic", date(2024, 2, 1)),
            message("z", "Unrelated", date(2024, 2, 2)),
            message("e", "Something else", date(2024, 2, 3)).with_references(["x", "y"]),
        ])
        .unwrap();

    assert_eq!(membership(&threads), vec![vec!["y", "e"], vec!["z"]]);
}

#[test]
fn subject_tie_break_picks_earliest_created_thread() {
    init_logger();
    let engine = ThreadingEngine::new();

    let threads = engine
        .build_threads(vec![
            message("x", "Hello", date(2024, 1, 1)),
            // Thread of "x" has gone quiet for over 30 days
            message("y", "Hello", date(2024, 2, 15)),
            // Header reply revives it
            message("z", "Re: Hello", date(2024, 2, 16)).with_in_reply_to("x"),
            // Both threads are now open subject candidates
            message("w", "Re: Hello", date(2024, 2, 20)),
        ])
        .unwrap();

    assert_eq!(membership(&threads), vec![vec!["x", "z", "w"], vec!["y"]]);
}

#[test]
fn input_order_does_not_change_grouping() {
    init_logger();
    let engine = ThreadingEngine::new();

    let messages = vec![
        message("1", "Launch plan", date(2024, 4, 1)),
        message("2", "Re: Launch plan", date(2024, 4, 2)).with_in_reply_to("1"),
        message("3", "Lunch?", date(2024, 4, 2)),
        message("4", "Re: Lunch?", date(2024, 4, 3)),
        message("5", "Re: Launch plan", date(2024, 4, 5)).with_references(["1", "2"]),
        message("6", "Launch plan", date(2024, 8, 1)),
    ];
    let mut reversed = messages.clone();
    reversed.reverse();

    let forward = engine.build_threads(messages).unwrap();
    let backward = engine.build_threads(reversed).unwrap();

    assert_eq!(membership(&forward), membership(&backward));
    assert_eq!(
        membership(&forward),
        vec![vec!["1", "2", "5"], vec!["3", "4"], vec!["6"]]
    );
}

#[test]
fn repeated_runs_are_deterministic() {
    init_logger();
    let engine = ThreadingEngine::new();
    let messages = vec![
        message("1", "Hello", date(2024, 1, 1)),
        message("2", "RE: hello", date(2024, 1, 10)),
        message("3", "Fwd: Hello", date(2024, 1, 20)),
        message("4", "Hello", date(2024, 6, 1)),
    ];

    let first = engine.build_threads(messages.clone()).unwrap();
    let second = engine.build_threads(messages).unwrap();

    assert_eq!(membership(&first), membership(&second));
    let subjects = |threads: &[mail_threading::Thread]| {
        threads
            .iter()
            .map(|t| t.normalized_subject.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(subjects(&first), subjects(&second));
    assert_ne!(first[0].thread_id, second[0].thread_id);
}

#[test]
fn equal_timestamps_keep_input_order() {
    init_logger();
    let engine = ThreadingEngine::new();
    let same_time = date(2024, 3, 3);

    let threads = engine
        .build_threads(vec![
            message("b", "Topic", same_time),
            message("a", "Re: Topic", same_time),
        ])
        .unwrap();

    assert_eq!(membership(&threads), vec![vec!["b", "a"]]);
    assert_eq!(threads[0].subject, "Topic");
}

#[test]
fn thread_subject_comes_from_first_message() {
    init_logger();
    let engine = ThreadingEngine::new();

    let threads = engine
        .build_threads(vec![
            message("2", "Re: quarterly   REVIEW", date(2024, 1, 2)).with_in_reply_to("1"),
            message("1", "Re:  Quarterly Review", date(2024, 1, 1)),
        ])
        .unwrap();

    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].subject, "Quarterly Review");
    assert_eq!(threads[0].first_message().unwrap().message_id, "1");
    assert_eq!(threads[0].last_message().unwrap().message_id, "2");
}

#[test]
fn participants_grow_monotonically() {
    init_logger();
    let engine = ThreadingEngine::new();

    let messages = vec![
        message("1", "Offsite", date(2024, 7, 1))
            .with_from("alice@example.com")
            .with_to(["bob@example.com"]),
        message("2", "Re: Offsite", date(2024, 7, 2))
            .with_in_reply_to("1")
            .with_from("bob@example.com")
            .with_to(["alice@example.com"])
            .with_cc(["carol@example.com"]),
        message("3", "Re: Offsite", date(2024, 7, 3))
            .with_references(["1", "2"])
            .with_from("Dave@example.com")
            .with_cc(["dave@example.com"]),
    ];

    let threads = engine.build_threads(messages.clone()).unwrap();
    assert_eq!(threads.len(), 1);

    let participants = &threads[0].participants;
    for message in &messages {
        for address in mail_threading::threading::extract_participants(message) {
            assert!(participants.contains(&address), "missing {address}");
        }
    }
    assert_eq!(participants.len(), 5);
}

#[test]
fn empty_message_id_is_rejected() {
    init_logger();
    let engine = ThreadingEngine::new();

    let result = engine.build_threads(vec![
        message("1", "Hello", date(2024, 1, 1)),
        message("", "Hello", date(2024, 1, 2)),
    ]);

    assert_eq!(result, Err(ThreadingError::EmptyMessageId { position: 1 }));
}

#[test]
fn repeated_prefix_is_stripped_once() {
    assert_eq!(normalize_subject("Re: Re: Hello"), "re: hello");

    init_logger();
    let engine = ThreadingEngine::new();
    let threads = engine
        .build_threads(vec![
            message("1", "Hello", date(2024, 1, 1)),
            message("2", "Re: Re: Hello", date(2024, 1, 2)),
        ])
        .unwrap();

    assert_eq!(threads.len(), 2);
}
