use mockable::DefaultClock;
use todo_core::{KeyValueStore, SessionError, SqliteKeyValueStore, TaskError, TodoApp};

fn app() -> TodoApp<SqliteKeyValueStore> {
    TodoApp::new(SqliteKeyValueStore::open_in_memory().unwrap(), DefaultClock)
}

#[test]
fn signup_establishes_session_with_empty_list() {
    let mut app = app();

    app.signup("a@x.com", "pw").unwrap();

    assert_eq!(app.active_user(), Some("a@x.com"));
    assert!(app.tasks().is_empty());
    assert_eq!(
        app.store().get("todoUser").unwrap().as_deref(),
        Some(r#""a@x.com""#)
    );
    assert_eq!(
        app.store().get("users").unwrap().as_deref(),
        Some(r#"{"a@x.com":"pw"}"#)
    );
    assert_eq!(app.store().get("todos_a@x.com").unwrap().as_deref(), Some("[]"));
}

#[test]
fn duplicate_signup_fails_and_keeps_original_secret() {
    let mut app = app();
    app.signup("u", "p").unwrap();
    app.logout().unwrap();

    let err = app.signup("u", "p2").unwrap_err();
    assert!(matches!(err, SessionError::DuplicateIdentifier));
    assert_eq!(app.active_user(), None);

    assert!(matches!(
        app.login("u", "p2").unwrap_err(),
        SessionError::InvalidCredentials
    ));
    app.login("u", "p").unwrap();
    assert_eq!(app.active_user(), Some("u"));
}

#[test]
fn login_with_unknown_identifier_leaves_session_untouched() {
    let mut app = app();
    app.signup("a@x.com", "pw").unwrap();
    app.add_task("keep me").unwrap();

    let err = app.login("ghost@x.com", "pw").unwrap_err();

    assert!(matches!(err, SessionError::InvalidCredentials));
    assert_eq!(app.active_user(), Some("a@x.com"));
    assert_eq!(app.tasks().len(), 1);
    assert_eq!(app.store().get("todos_ghost@x.com").unwrap(), None);
}

#[test]
fn login_is_case_sensitive() {
    let mut app = app();
    app.signup("a@x.com", "Secret").unwrap();
    app.logout().unwrap();

    assert!(app.login("a@x.com", "secret").is_err());
    assert!(app.login("A@X.COM", "Secret").is_err());
    assert_eq!(app.active_user(), None);
}

#[test]
fn signup_logout_login_recovers_tasks() {
    let mut app = app();
    app.signup("a@x.com", "pw").unwrap();
    app.add_task("task1").unwrap();
    app.logout().unwrap();

    assert_eq!(app.active_user(), None);
    assert!(app.tasks().is_empty());
    assert_eq!(app.store().get("todoUser").unwrap(), None);

    app.login("a@x.com", "pw").unwrap();
    assert_eq!(app.tasks().len(), 1);
    assert_eq!(app.tasks()[0].text, "task1");
}

#[test]
fn users_never_see_each_others_tasks() {
    let mut app = app();
    app.signup("a", "pa").unwrap();
    app.add_task("a's task").unwrap();
    app.signup("b", "pb").unwrap();

    assert_eq!(app.active_user(), Some("b"));
    assert!(app.tasks().is_empty());
    app.add_task("b's task").unwrap();

    app.login("a", "pa").unwrap();
    let texts: Vec<_> = app.tasks().iter().map(|task| task.text.as_str()).collect();
    assert_eq!(texts, ["a's task"]);
}

#[test]
fn signup_overwrites_stale_list_for_identifier() {
    let store = SqliteKeyValueStore::open_in_memory().unwrap();
    store
        .set("todos_a@x.com", r#"[{"id":1,"text":"stale","completed":false}]"#)
        .unwrap();
    let mut app = TodoApp::new(store, DefaultClock);

    app.signup("a@x.com", "pw").unwrap();

    assert!(app.tasks().is_empty());
    assert_eq!(app.store().get("todos_a@x.com").unwrap().as_deref(), Some("[]"));
}

#[test]
fn session_change_drops_in_progress_edit() {
    let mut app = app();
    app.signup("a", "pa").unwrap();
    let id = app.add_task("old").unwrap().unwrap();
    app.begin_edit(id, "old");

    app.logout().unwrap();

    assert_eq!(app.edit_state().task_id(), None);
}

#[test]
fn task_operations_require_session() {
    let mut app = app();

    assert!(matches!(
        app.add_task("orphan").unwrap_err(),
        TaskError::NoActiveSession
    ));
    assert!(matches!(
        app.toggle_task(1).unwrap_err(),
        TaskError::NoActiveSession
    ));
    assert!(matches!(
        app.remove_task(1).unwrap_err(),
        TaskError::NoActiveSession
    ));
    assert!(matches!(
        app.commit_edit().unwrap_err(),
        TaskError::NoActiveSession
    ));
}
