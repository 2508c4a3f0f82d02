mod common;

use predicates::prelude::*;
use predicates::str::contains;
use regex::Regex;

use common::{script_command, temp_home};

#[test]
fn script_mode_flags_negative_basis() {
    let home = temp_home();
    let input = "worksheet start 50000\n\
                 worksheet add decrease 60000 \"Cash distribution\"\n\
                 worksheet show\n\
                 worksheet save Demo\n\
                 exit\n";

    script_command(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("-$10000.00"))
        .stdout(contains("Negative basis is not allowed for tax purposes"))
        .stdout(contains("Worksheet `Demo` saved."));

    let stored = home.join("store").join("basisWorksheet_Demo.json");
    let json = std::fs::read_to_string(stored).expect("snapshot file");
    assert!(json.contains("\"initialBasis\":\"50000\""));

    let config = std::fs::read_to_string(home.join("config").join("config.json"))
        .expect("config file");
    assert!(config.contains("\"last_worksheet\": \"Demo\""));
}

#[test]
fn saved_worksheets_survive_restarts() {
    let home = temp_home();
    script_command(&home)
        .write_stdin("worksheet start 30000\nworksheet add increase 40000\nworksheet save Alex\n")
        .assert()
        .success();

    script_command(&home)
        .write_stdin("worksheet list\nworksheet load Alex\n")
        .assert()
        .success()
        .stdout(contains("1. Alex"))
        .stdout(contains("Ending basis   : $70000.00"));
}

#[test]
fn loading_an_unknown_worksheet_reports_not_found() {
    let home = temp_home();
    script_command(&home)
        .write_stdin("worksheet load Nope\nexit\n")
        .assert()
        .success()
        .stdout(contains("Worksheet not found: Nope"));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = temp_home();
    script_command(&home)
        .write_stdin("wrksheet\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `wrksheet`"))
        .stdout(contains("Suggestion: `worksheet`?"));
}

#[test]
fn perfect_quiz_run_reports_full_score() {
    let home = temp_home();
    let input = "quiz start basics\n\
                 answer 2\nnext\nanswer 3\nnext\nanswer 4\nnext\nanswer 3\nnext\nanswer 3\nnext\n\
                 progress\n";

    script_command(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Score: 5/5 (100%)"))
        .stdout(contains("Quizzes completed: 1 of 5"));
}

#[test]
fn quiz_score_is_shown_when_it_cannot_be_saved() {
    let home = temp_home();
    std::fs::create_dir_all(home.join("store").join("quizResults.json"))
        .expect("block the results record");
    let input = "quiz start basics\n\
                 answer 2\nnext\nanswer 3\nnext\nanswer 4\nnext\nanswer 3\nnext\nanswer 3\nnext\n\
                 quiz show\n";

    script_command(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Score: 5/5 (100%)"))
        .stdout(contains("Excellent!"))
        .stdout(contains("Your score could not be saved"))
        .stdout(contains("No quiz in progress"))
        .stdout(contains("Nothing was changed").not());
}

#[test]
fn locked_levels_cannot_be_played() {
    let home = temp_home();
    script_command(&home)
        .write_stdin("game play 3\ngame levels\n")
        .assert()
        .success()
        .stdout(contains("Level 3 is locked"))
        .stdout(contains("(open)"));
}

#[test]
fn reference_lookups_show_related_boxes() {
    let home = temp_home();
    script_command(&home)
        .write_stdin("k1 show box4\ncases search tax court\nk1 show box99\n")
        .assert()
        .success()
        .stdout(contains("Related:"))
        .stdout(contains("foxman"))
        .stdout(contains("K-1 box `box99` not found"));
}

#[test]
fn version_reports_package_version() {
    let home = temp_home();
    let output = script_command(&home)
        .write_stdin("version\n")
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let pattern = Regex::new(r"K-1 Tutor \d+\.\d+\.\d+").expect("valid regex");
    assert!(pattern.is_match(&stdout), "unexpected output: {stdout}");
}
