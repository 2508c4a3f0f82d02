mod common;

use k1_tutor::cli::core::{process_script, Activity};
use k1_tutor::core::{AnswerState, KeyValueStore};
use k1_tutor::domain::{Decimal, WorksheetSnapshot};

use common::setup_test_env;

const PERFECT_BASICS_RUN: [&str; 11] = [
    "quiz start basics",
    "answer 2",
    "next",
    "answer 3",
    "next",
    "answer 4",
    "next",
    "answer 3",
    "next",
    "answer 3",
    "next",
];

#[test]
fn worksheet_commands_save_a_negative_basis() {
    let (store, config_manager) = setup_test_env();
    let app = process_script(
        store.clone(),
        config_manager,
        &[
            "worksheet start 50000",
            "worksheet add decrease 60000 Cash distribution",
            "worksheet save Year one",
        ],
    )
    .expect("run script");

    assert_eq!(k1_tutor::core::worksheet_total(&app.draft.worksheet), Decimal::from(-10000));
    assert_eq!(app.draft.name, "Year one");
    assert_eq!(app.config.last_worksheet.as_deref(), Some("Year one"));

    let raw = store
        .get("basisWorksheet_Year one")
        .expect("read store")
        .expect("snapshot stored");
    let snapshot: WorksheetSnapshot = serde_json::from_str(&raw).expect("decode snapshot");
    assert_eq!(snapshot.initial_basis, "50000");
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].description, "Cash distribution");
}

#[test]
fn cleared_worksheet_can_be_loaded_back() {
    let (store, config_manager) = setup_test_env();
    let app = process_script(
        store,
        config_manager,
        &[
            "worksheet start 40000",
            "worksheet add increase 10000",
            "worksheet save Draft",
            "worksheet clear",
            "worksheet load Draft",
        ],
    )
    .expect("run script");

    assert_eq!(app.draft.name, "Draft");
    assert_eq!(app.draft.worksheet.initial_basis, "40000");
    assert_eq!(k1_tutor::core::worksheet_total(&app.draft.worksheet), Decimal::from(50000));
}

#[test]
fn entries_are_edited_by_position() {
    let (store, config_manager) = setup_test_env();
    let app = process_script(
        store,
        config_manager,
        &[
            "worksheet start 1000",
            "worksheet add increase 500 Income",
            "worksheet add decrease 200 Loss",
            "worksheet amount 1 750",
            "worksheet describe 2 Ordinary loss",
            "worksheet remove 9",
        ],
    )
    .expect("run script");

    let items = &app.draft.worksheet.items;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].amount, "750");
    assert_eq!(items[1].description, "Ordinary loss");
    assert_eq!(k1_tutor::core::worksheet_total(&app.draft.worksheet), Decimal::from(1550));
}

#[test]
fn finished_quiz_records_its_score() {
    let (store, config_manager) = setup_test_env();
    let app = process_script(store, config_manager, &PERFECT_BASICS_RUN).expect("run script");

    assert!(matches!(app.activity, Activity::Idle));
    let results = app.progress.quiz_results().expect("results");
    let basics = results.get("basics").expect("basics recorded");
    assert_eq!((basics.score, basics.total_questions), (5, 5));
}

#[test]
fn answered_question_stays_locked() {
    let (store, config_manager) = setup_test_env();
    let app = process_script(
        store,
        config_manager,
        &["quiz start basics", "answer 1", "answer 2", "answer 9"],
    )
    .expect("run script");

    let Activity::Quiz(session) = &app.activity else {
        panic!("quiz should still be running");
    };
    assert_eq!(
        session.current_answer(),
        AnswerState::Answered {
            selected: 0,
            correct: false
        }
    );
    assert_eq!(session.current_index(), 0);
}

#[test]
fn clearing_the_last_question_unlocks_the_next_level() {
    let (store, config_manager) = setup_test_env();
    let app = process_script(
        store,
        config_manager,
        &[
            "game play 2",
            "game play 1",
            "check 40000 40000",
            "next",
            "check 70000",
            "next",
        ],
    )
    .expect("run script");

    assert!(matches!(app.activity, Activity::Idle));
    let levels = app
        .progress
        .game_levels(app.catalogue.levels())
        .expect("levels");
    assert!(levels[0].completed);
    assert!(!levels[1].locked);
    assert!(levels[2].locked);
}

#[test]
fn wrong_answers_allow_moving_on_after_two_attempts() {
    let (store, config_manager) = setup_test_env();
    let app = process_script(
        store,
        config_manager,
        &[
            "game play 1",
            "check 1 2",
            "next",
            "retry",
            "check 1 2",
            "next",
        ],
    )
    .expect("run script");

    let Activity::Game(session) = &app.activity else {
        panic!("level should still be running");
    };
    assert_eq!(session.current_index(), 1);
    assert_eq!(session.attempts(), 0);
    assert!(!session.is_cleared());
}

#[test]
fn correct_check_cannot_be_overwritten() {
    let (store, config_manager) = setup_test_env();
    let app = process_script(
        store,
        config_manager,
        &[
            "config set reveal_after_attempts 5",
            "game play 1",
            "check 40000 40000",
            "check 1 2",
            "retry",
            "next",
        ],
    )
    .expect("run script");

    let Activity::Game(session) = &app.activity else {
        panic!("level should still be running");
    };
    assert_eq!(session.current_index(), 1);
    assert_eq!(session.attempts(), 0);
}

#[test]
fn exit_stops_the_script() {
    let (store, config_manager) = setup_test_env();
    let app = process_script(
        store,
        config_manager,
        &["wrksheet", "exit", "worksheet start 5"],
    )
    .expect("run script");

    assert!(app.draft.worksheet.initial_basis.is_empty());
}

#[test]
fn config_changes_are_persisted() {
    let (store, config_manager) = setup_test_env();
    let app = process_script(
        store,
        config_manager,
        &[
            "config set currency_symbol €",
            "config set reveal_after_attempts 0",
            "config set bogus 1",
        ],
    )
    .expect("run script");

    let reloaded = app.config_manager.load().expect("reload config");
    assert_eq!(reloaded.currency_symbol, "€");
    assert_eq!(reloaded.reveal_after_attempts, 2);
}
