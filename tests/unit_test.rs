// Unit tests for usertable
// These tests drive the public handlers against a recording fake service,
// so every network-facing property is checked without a server.

use std::cell::{Cell, RefCell};

use usertable::api::{User, UserService};
use usertable::app::update;
use usertable::app::{AppState, InputMode, LoadState, ToastKind};
use usertable::error::{AppError, Result as ApiResult};

fn user(id: &str, name: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Call {
    List,
    Create(User),
    Update(User),
    Delete(String),
}

/// In-memory stand-in for the REST service. Records every call and mutates
/// its own list, so "the screen shows a fresh fetch" is observable.
struct FakeService {
    users: RefCell<Vec<User>>,
    calls: RefCell<Vec<Call>>,
    fail_list: Cell<bool>,
    fail_mutations: Cell<bool>,
}

impl FakeService {
    fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RefCell::new(users),
            calls: RefCell::new(Vec::new()),
            fail_list: Cell::new(false),
            fail_mutations: Cell::new(false),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn server_error() -> AppError {
        AppError::Status {
            status: 500,
            message: "boom".to_string(),
        }
    }
}

impl UserService for FakeService {
    fn list_users(&self) -> ApiResult<Vec<User>> {
        self.calls.borrow_mut().push(Call::List);
        if self.fail_list.get() {
            return Err(Self::server_error());
        }
        Ok(self.users.borrow().clone())
    }

    fn create_user(&self, user: &User) -> ApiResult<()> {
        self.calls.borrow_mut().push(Call::Create(user.clone()));
        if self.fail_mutations.get() {
            return Err(Self::server_error());
        }
        self.users.borrow_mut().push(user.clone());
        Ok(())
    }

    fn update_user(&self, user: &User) -> ApiResult<()> {
        self.calls.borrow_mut().push(Call::Update(user.clone()));
        if self.fail_mutations.get() {
            return Err(Self::server_error());
        }
        let mut users = self.users.borrow_mut();
        if let Some(existing) = users.iter_mut().find(|u| u.id == user.id) {
            *existing = user.clone();
        }
        Ok(())
    }

    fn delete_user(&self, id: &str) -> ApiResult<()> {
        self.calls.borrow_mut().push(Call::Delete(id.to_string()));
        if self.fail_mutations.get() {
            return Err(Self::server_error());
        }
        self.users.borrow_mut().retain(|u| u.id != id);
        Ok(())
    }
}

/// App with the initial load already performed.
fn ready_app(service: &FakeService) -> AppState {
    let mut app = AppState::new("http://localhost:2000");
    update::reload(&mut app, service);
    assert_eq!(app.load, LoadState::Ready);
    app
}

mod add_tests {
    use super::*;

    #[test]
    fn valid_form_issues_exactly_one_create_with_the_form_body() {
        let service = FakeService::with_users(vec![]);
        let mut app = ready_app(&service);

        update::open_add(&mut app);
        app.form.id = "9".to_string();
        app.form.name = "Carol".to_string();
        app.form.email = "carol@x.com".to_string();
        update::submit_add(&mut app, &service);

        assert_eq!(
            service.calls(),
            vec![
                Call::List,
                Call::Create(user("9", "Carol", "carol@x.com")),
                Call::List,
            ]
        );
        // Form cleared, panel closed, success reported, list re-fetched.
        assert!(app.form.id.is_empty() && app.form.name.is_empty() && app.form.email.is_empty());
        assert!(!app.adding);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Success));
        assert_eq!(app.users, vec![user("9", "Carol", "carol@x.com")]);
    }

    #[test]
    fn empty_field_sends_nothing_and_reports_validation() {
        let service = FakeService::with_users(vec![]);
        let mut app = AppState::new("http://localhost:2000");

        update::open_add(&mut app);
        app.form.id = "9".to_string();
        app.form.name = String::new();
        app.form.email = "carol@x.com".to_string();
        update::submit_add(&mut app, &service);

        assert!(service.calls().is_empty());
        let toast = app.toast.expect("validation toast");
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Please fill all fields");
    }

    #[test]
    fn failed_create_keeps_the_panel_open_with_values_intact() {
        let service = FakeService::with_users(vec![]);
        let mut app = ready_app(&service);
        service.fail_mutations.set(true);

        update::open_add(&mut app);
        app.form.id = "9".to_string();
        app.form.name = "Carol".to_string();
        app.form.email = "carol@x.com".to_string();
        update::submit_add(&mut app, &service);

        assert!(app.adding);
        assert_eq!(app.input_mode, InputMode::AddForm);
        assert_eq!(app.form.name, "Carol");
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Error));
        // The create was attempted once; no refetch follows a failure.
        assert_eq!(
            service.calls(),
            vec![Call::List, Call::Create(user("9", "Carol", "carol@x.com"))]
        );
    }
}

mod edit_tests {
    use super::*;

    #[test]
    fn save_issues_one_put_keyed_by_id_then_refetches() {
        // The scenario: Ann becomes Annie.
        let service = FakeService::with_users(vec![user("1", "Ann", "ann@x.com")]);
        let mut app = ready_app(&service);

        update::begin_edit(&mut app);
        assert_eq!(app.editing_id.as_deref(), Some("1"));
        app.form.name = "Annie".to_string();
        update::submit_edit(&mut app, &service);

        assert_eq!(
            service.calls(),
            vec![
                Call::List,
                Call::Update(user("1", "Annie", "ann@x.com")),
                Call::List,
            ]
        );
        // The rendered list is the fresh fetch, not a local patch.
        assert_eq!(app.users, vec![user("1", "Annie", "ann@x.com")]);
        assert_eq!(app.editing_id, None);
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Success));
    }

    #[test]
    fn at_most_one_row_is_in_edit_mode() {
        let service = FakeService::with_users(vec![
            user("1", "Ann", "ann@x.com"),
            user("2", "Bob", "bob@x.com"),
        ]);
        let mut app = ready_app(&service);

        update::begin_edit(&mut app);
        assert_eq!(app.editing_id.as_deref(), Some("1"));

        // Entering edit on row B replaces A's edit state with B's.
        app.selected_index = 1;
        update::begin_edit(&mut app);
        assert_eq!(app.editing_id.as_deref(), Some("2"));
        assert_eq!(app.form.name, "Bob");
    }

    #[test]
    fn cancel_discards_values_and_sends_nothing() {
        let service = FakeService::with_users(vec![user("1", "Ann", "ann@x.com")]);
        let mut app = ready_app(&service);

        update::begin_edit(&mut app);
        app.form.name = "Annie".to_string();
        update::cancel_edit(&mut app);

        assert_eq!(app.editing_id, None);
        assert!(app.form.name.is_empty());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(service.calls(), vec![Call::List]);
        assert_eq!(app.users, vec![user("1", "Ann", "ann@x.com")]);
    }

    #[test]
    fn empty_field_on_save_sends_nothing() {
        let service = FakeService::with_users(vec![user("1", "Ann", "ann@x.com")]);
        let mut app = ready_app(&service);

        update::begin_edit(&mut app);
        app.form.email = String::new();
        update::submit_edit(&mut app, &service);

        assert_eq!(service.calls(), vec![Call::List]);
        let toast = app.toast.expect("validation toast");
        assert_eq!(toast.message, "Please fill all fields");
        // Still editing; nothing was discarded.
        assert_eq!(app.editing_id.as_deref(), Some("1"));
    }
}

mod delete_tests {
    use super::*;

    #[test]
    fn delete_issues_one_request_then_refetches() {
        let service = FakeService::with_users(vec![
            user("1", "Ann", "ann@x.com"),
            user("2", "Bob", "bob@x.com"),
        ]);
        let mut app = ready_app(&service);
        app.selected_index = 1;

        update::delete_selected(&mut app, &service);

        assert_eq!(
            service.calls(),
            vec![Call::List, Call::Delete("2".to_string()), Call::List]
        );
        assert_eq!(app.users, vec![user("1", "Ann", "ann@x.com")]);
        // Selection clamped to the shrunken list.
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn delete_on_an_empty_list_is_a_no_op() {
        let service = FakeService::with_users(vec![]);
        let mut app = ready_app(&service);

        update::delete_selected(&mut app, &service);
        assert_eq!(service.calls(), vec![Call::List]);
        assert!(app.toast.is_none());
    }
}

mod load_tests {
    use super::*;

    #[test]
    fn initial_failure_is_the_full_screen_error_state() {
        let service = FakeService::with_users(vec![]);
        service.fail_list.set(true);
        let mut app = AppState::new("http://localhost:2000");

        update::reload(&mut app, &service);
        assert!(matches!(app.load, LoadState::Failed(_)));
    }

    #[test]
    fn failed_refetch_keeps_the_last_good_list() {
        let service = FakeService::with_users(vec![user("1", "Ann", "ann@x.com")]);
        let mut app = ready_app(&service);
        service.fail_list.set(true);

        update::refresh(&mut app, &service);

        assert_eq!(app.load, LoadState::Ready);
        assert_eq!(app.users, vec![user("1", "Ann", "ann@x.com")]);
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Error));
    }

    #[test]
    fn reload_without_invalidate_is_served_from_the_cache() {
        let service = FakeService::with_users(vec![user("1", "Ann", "ann@x.com")]);
        let mut app = ready_app(&service);

        // A plain reload hits the cache; refresh forces the fetch.
        update::reload(&mut app, &service);
        assert_eq!(service.calls(), vec![Call::List]);
        update::refresh(&mut app, &service);
        assert_eq!(service.calls(), vec![Call::List, Call::List]);
    }
}
