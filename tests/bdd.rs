#![allow(dead_code)]

use std::{
    collections::HashMap,
    fmt,
    fs::File,
    net::SocketAddr,
    sync::atomic::{AtomicUsize, Ordering},
};

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use cucumber::{given, then, when, World as _};
use tempfile::TempDir;
use tripplan::{
    access::{JoinFlow, JoinState, RecoveryFlow, RecoveryState, TripGate},
    config::AppConfig,
    db::{init_pool, run_migrations},
    error::AppError,
    models::{
        expense::{NewExpense, NewPaymentUser},
        itinerary::{DayPlanView, NewDayPlan, NewScheduleItem, OrderUpdate},
        place::{Category, NewPlace, PlaceUpdate},
        trip::{
            CodeLookup, NewTrip, RecoveredCode, RecoveryLookup, Trip, TripUpdate, TripView,
        },
    },
    services::trips::TripService,
    state::AppState,
};

#[derive(Debug, cucumber::World, Default)]
struct AppWorld {
    state: Option<TestState>,
    trip: Option<Trip>,
    places: HashMap<String, String>,
    payers: HashMap<String, String>,
    join: JoinFlow,
    recovery: RecoveryFlow,
    round_trips: usize,
    last_error: Option<AppError>,
}

impl AppWorld {
    fn app_state(&self) -> &AppState {
        self.state
            .as_ref()
            .expect("state must be initialised first")
            .app()
    }

    fn trip(&self) -> &Trip {
        self.trip.as_ref().expect("a trip must be created first")
    }

    async fn day(&self, date: &str) -> DayPlanView {
        let date: NaiveDate = date.parse().expect("date");
        self.app_state()
            .itinerary
            .for_trip(&self.trip().id)
            .await
            .expect("itinerary")
            .into_iter()
            .find(|day| day.date == date)
            .expect("day plan for date")
    }
}

struct TestState {
    app: AppState,
    _root: TempDir,
}

impl fmt::Debug for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestState").finish()
    }
}

impl TestState {
    async fn new() -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for bdd world")?;
        let static_root = root.path().join("static");
        std::fs::create_dir_all(&static_root)?;

        let db_path = root.path().join("bdd.sqlite");
        File::create(&db_path)?;
        let database_url = format!("sqlite://{}", db_path.to_string_lossy());

        let config = AppConfig {
            database_url,
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            static_root,
            default_currency: "INR".into(),
        };

        let db = init_pool(&config.database_url).await?;
        run_migrations(&db).await?;

        let app = AppState::new(config, db);
        Ok(Self { app, _root: root })
    }

    fn app(&self) -> &AppState {
        &self.app
    }
}

/// Counts backend round trips made by the access flows.
struct CountingGate<'a> {
    inner: &'a TripService,
    calls: AtomicUsize,
}

impl<'a> CountingGate<'a> {
    fn new(inner: &'a TripService) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TripGate for CountingGate<'_> {
    async fn lookup_code(&self, code: &str) -> Result<CodeLookup, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup_code(code).await
    }

    async fn verify_security(&self, trip_id: &str, answer: &str) -> Result<TripView, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.verify_security(trip_id, answer).await
    }

    async fn recovery_lookup(
        &self,
        name: &str,
        destination: &str,
    ) -> Result<RecoveryLookup, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.recovery_lookup(name, destination).await
    }

    async fn recover(
        &self,
        name: &str,
        destination: &str,
        answer: &str,
    ) -> Result<RecoveredCode, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.recover(name, destination, answer).await
    }
}

fn error_kind(err: &AppError) -> &'static str {
    match err {
        AppError::BadRequest(_) => "bad request",
        AppError::Unauthorized(_) => "unauthorized",
        AppError::NotFound(_) => "not found",
        AppError::Conflict(_) => "conflict",
        _ => "internal",
    }
}

fn new_trip(name: &str, destination: &str, start: &str, end: &str, code: &str) -> NewTrip {
    NewTrip {
        name: name.into(),
        destination: destination.into(),
        start_date: start.parse().expect("start date"),
        end_date: end.parse().expect("end date"),
        budget: None,
        currency: None,
        access_code: code.into(),
        recovery_question: None,
        recovery_answer: None,
        security_question: None,
        security_answer: None,
    }
}

async fn create_trip(world: &mut AppWorld, input: NewTrip) {
    let trip = world
        .app_state()
        .trips
        .create(input)
        .await
        .expect("create trip");
    world.trip = Some(trip);
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

#[given("a fresh application state")]
async fn given_fresh_state(world: &mut AppWorld) {
    world.state = Some(TestState::new().await.expect("state"));
    world.trip = None;
    world.places.clear();
    world.payers.clear();
    world.join = JoinFlow::new();
    world.recovery = RecoveryFlow::new();
    world.round_trips = 0;
    world.last_error = None;
}

#[given(regex = r#"^a trip "([^"]+)" to "([^"]+)" from (\S+) to (\S+) with code "([^"]+)"$"#)]
async fn given_trip(
    world: &mut AppWorld,
    name: String,
    destination: String,
    start: String,
    end: String,
    code: String,
) {
    create_trip(world, new_trip(&name, &destination, &start, &end, &code)).await;
}

#[when(regex = r#"^I create a trip "([^"]+)" to "([^"]+)" from (\S+) to (\S+) with code "([^"]+)"$"#)]
async fn when_create_trip(
    world: &mut AppWorld,
    name: String,
    destination: String,
    start: String,
    end: String,
    code: String,
) {
    create_trip(world, new_trip(&name, &destination, &start, &end, &code)).await;
}

#[given(
    regex = r#"^a trip "([^"]+)" to "([^"]+)" from (\S+) to (\S+) with code "([^"]+)" guarded by "([^"]+)" answered "([^"]+)"$"#
)]
async fn given_guarded_trip(
    world: &mut AppWorld,
    name: String,
    destination: String,
    start: String,
    end: String,
    code: String,
    question: String,
    answer: String,
) {
    let mut input = new_trip(&name, &destination, &start, &end, &code);
    input.security_question = Some(question);
    input.security_answer = Some(answer);
    create_trip(world, input).await;
}

#[given(
    regex = r#"^a trip "([^"]+)" to "([^"]+)" from (\S+) to (\S+) with code "([^"]+)" and recovery question "([^"]+)" answered "([^"]+)"$"#
)]
async fn given_recoverable_trip(
    world: &mut AppWorld,
    name: String,
    destination: String,
    start: String,
    end: String,
    code: String,
    question: String,
    answer: String,
) {
    let mut input = new_trip(&name, &destination, &start, &end, &code);
    input.recovery_question = Some(question);
    input.recovery_answer = Some(answer);
    create_trip(world, input).await;
}

#[when(regex = r#"^I try to create a trip "([^"]+)" to "([^"]+)" from (\S+) to (\S+) with code "([^"]+)"$"#)]
async fn when_try_create_trip(
    world: &mut AppWorld,
    name: String,
    destination: String,
    start: String,
    end: String,
    code: String,
) {
    let input = new_trip(&name, &destination, &start, &end, &code);
    world.last_error = world.app_state().trips.create(input).await.err();
}

#[when(regex = r"^I move the trip end to (\S+)$")]
async fn when_move_trip_end(world: &mut AppWorld, end: String) {
    let update = TripUpdate {
        end_date: Some(end.parse().expect("end date")),
        ..TripUpdate::default()
    };
    let id = world.trip().id.clone();
    let trip = world
        .app_state()
        .trips
        .update(&id, update)
        .await
        .expect("update trip");
    world.trip = Some(trip);
}

#[then(regex = r"^the trip has (\d+) day plans$")]
async fn then_day_plan_count(world: &mut AppWorld, expected: usize) {
    let days = world
        .app_state()
        .itinerary
        .for_trip(&world.trip().id)
        .await
        .expect("itinerary");
    assert_eq!(days.len(), expected);
}

#[then(regex = r#"^the day plans are dated "([^"]+)"$"#)]
async fn then_day_plan_dates(world: &mut AppWorld, dates: String) {
    let days = world
        .app_state()
        .itinerary
        .for_trip(&world.trip().id)
        .await
        .expect("itinerary");
    let actual: Vec<String> = days.iter().map(|day| day.date.to_string()).collect();
    assert_eq!(actual, split_list(&dates));
}

#[when(regex = r"^I try to add a day plan on (\S+)$")]
async fn when_try_add_day_plan(world: &mut AppWorld, date: String) {
    let input = NewDayPlan {
        trip_id: world.trip().id.clone(),
        date: date.parse().expect("date"),
    };
    world.last_error = world.app_state().itinerary.create_day_plan(input).await.err();
}

#[when("I delete the trip")]
async fn when_delete_trip(world: &mut AppWorld) {
    let id = world.trip().id.clone();
    world
        .app_state()
        .trips
        .delete(&id)
        .await
        .expect("delete trip");
}

#[then("nothing of the trip is left")]
async fn then_trip_gone(world: &mut AppWorld) {
    let state = world.app_state();
    let err = state
        .trips
        .get(&world.trip().id)
        .await
        .expect_err("trip should be gone");
    assert_eq!(error_kind(&err), "not found");

    for table in [
        "places",
        "day_plans",
        "schedule_items",
        "payment_users",
        "expenses",
    ] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&state.db)
            .await
            .expect("count rows");
        assert_eq!(count, 0, "{table} still has rows");
    }
}

#[then(regex = r#"^the request fails with "([^"]+)"$"#)]
async fn then_request_fails(world: &mut AppWorld, kind: String) {
    let err = world
        .last_error
        .as_ref()
        .expect("the last request should have failed");
    assert_eq!(error_kind(err), kind, "unexpected error: {err}");
}

#[when(regex = r#"^I join with code "([^"]+)"$"#)]
async fn when_join_with_code(world: &mut AppWorld, code: String) {
    let trips = world.app_state().trips.clone();
    let gate = CountingGate::new(&trips);
    world.join.submit_code(&gate, &code).await;
    world.round_trips += gate.calls();
}

#[when(regex = r#"^I answer "([^"]*)"$"#)]
async fn when_answer_security(world: &mut AppWorld, answer: String) {
    let trips = world.app_state().trips.clone();
    let gate = CountingGate::new(&trips);
    world.join.submit_answer(&gate, &answer).await;
    world.round_trips += gate.calls();
}

#[then(regex = r#"^access is granted to "([^"]+)"$"#)]
async fn then_access_granted(world: &mut AppWorld, name: String) {
    let trip = world.join.granted().expect("access should be granted");
    assert_eq!(trip.name, name);
    assert!(world.join.error().is_none());
}

fn assert_security_question(world: &AppWorld, question: &str) {
    match world.join.state() {
        JoinState::AnsweringSecurity { challenge, .. } => {
            assert!(challenge.requires_security_answer);
            assert_eq!(challenge.security_question, question);
        }
        other => panic!("expected a security question, got {other:?}"),
    }
}

#[then(regex = r#"^I am asked "([^"]+)"$"#)]
async fn then_security_question(world: &mut AppWorld, question: String) {
    assert_security_question(world, &question);
    assert!(world.join.error().is_none());
}

#[then(regex = r#"^I am asked "([^"]+)" again with an error$"#)]
async fn then_security_question_again(world: &mut AppWorld, question: String) {
    assert_security_question(world, &question);
    assert!(world.join.error().is_some());
}

#[then(regex = r#"^joining stays on code entry with an error$"#)]
async fn then_join_failed(world: &mut AppWorld) {
    assert_eq!(world.join.state(), &JoinState::EnteringCode);
    assert!(world.join.error().is_some());
}

#[then(regex = r"^the join flow made (\d+) round trips?$")]
async fn then_round_trips(world: &mut AppWorld, expected: usize) {
    assert_eq!(world.round_trips, expected);
}

#[when(regex = r#"^I recover the code for "([^"]+)" to "([^"]+)"$"#)]
async fn when_recover(world: &mut AppWorld, name: String, destination: String) {
    let trips = world.app_state().trips.clone();
    let gate = CountingGate::new(&trips);
    world
        .recovery
        .submit_details(&gate, &name, &destination)
        .await;
}

#[when(regex = r#"^I give the recovery answer "([^"]*)"$"#)]
async fn when_recovery_answer(world: &mut AppWorld, answer: String) {
    let trips = world.app_state().trips.clone();
    let gate = CountingGate::new(&trips);
    world.recovery.submit_answer(&gate, &answer).await;
}

#[then(regex = r#"^I am asked the recovery question "([^"]+)"$"#)]
async fn then_recovery_question(world: &mut AppWorld, expected: String) {
    match world.recovery.state() {
        RecoveryState::AnsweringRecoveryQuestion { question, .. } => {
            assert_eq!(question, &expected)
        }
        other => panic!("expected a recovery question, got {other:?}"),
    }
}

#[then("recovery is still waiting with an error")]
async fn then_recovery_waiting(world: &mut AppWorld) {
    assert!(matches!(
        world.recovery.state(),
        RecoveryState::AnsweringRecoveryQuestion { .. }
    ));
    assert!(world.recovery.error().is_some());
}

fn assert_disclosed(world: &AppWorld, code: &str, legacy: bool) {
    match world.recovery.state() {
        RecoveryState::Disclosed(recovered) => {
            assert_eq!(recovered.access_code, code);
            assert_eq!(recovered.is_legacy, legacy);
        }
        other => panic!("expected a disclosed code, got {other:?}"),
    }
}

#[then(regex = r#"^the code "([^"]+)" is disclosed$"#)]
async fn then_code_disclosed(world: &mut AppWorld, code: String) {
    assert_disclosed(world, &code, false);
}

#[then(regex = r#"^the code "([^"]+)" is disclosed as a legacy trip$"#)]
async fn then_legacy_code_disclosed(world: &mut AppWorld, code: String) {
    assert_disclosed(world, &code, true);
}

#[given(regex = r#"^places "([^"]+)"$"#)]
async fn given_places(world: &mut AppWorld, names: String) {
    let trip_id = world.trip().id.clone();
    for name in split_list(&names) {
        let place = world
            .app_state()
            .places
            .create(NewPlace {
                trip_id: trip_id.clone(),
                name: name.clone(),
                category: Category::Historical,
                estimated_duration: None,
                address: None,
                notes: None,
            })
            .await
            .expect("create place");
        world.places.insert(name, place.id);
    }
}

#[when(regex = r#"^I rename the place "([^"]+)" to "([^"]+)"$"#)]
async fn when_rename_place(world: &mut AppWorld, name: String, new_name: String) {
    let id = world.places.remove(&name).expect("known place");
    let update = PlaceUpdate {
        name: Some(new_name.clone()),
        ..PlaceUpdate::default()
    };
    world
        .app_state()
        .places
        .update(&id, update)
        .await
        .expect("rename place");
    world.places.insert(new_name, id);
}

#[when(regex = r#"^I delete the place "([^"]+)"$"#)]
async fn when_delete_place(world: &mut AppWorld, name: String) {
    let id = world.places.remove(&name).expect("known place");
    world
        .app_state()
        .places
        .delete(&id)
        .await
        .expect("delete place");
}

#[then(regex = r#"^the trip's places are "([^"]+)"$"#)]
async fn then_places(world: &mut AppWorld, expected: String) {
    let places = world
        .app_state()
        .places
        .list(Some(&world.trip().id))
        .await
        .expect("places");
    let mut names: Vec<String> = places.into_iter().map(|place| place.name).collect();
    names.sort();
    let mut expected = split_list(&expected);
    expected.sort();
    assert_eq!(names, expected);
}

#[given(regex = r#"^"([^"]+)" is scheduled on (\S+) from "([^"]+)" to "([^"]+)"$"#)]
async fn given_scheduled(
    world: &mut AppWorld,
    place: String,
    date: String,
    start: String,
    end: String,
) {
    let day = world.day(&date).await;
    let place_id = world.places.get(&place).expect("known place").clone();
    world
        .app_state()
        .itinerary
        .add_item(
            &day.id,
            NewScheduleItem {
                place_id,
                start_time: start,
                end_time: end,
                order: None,
                travel_time_to_next: None,
            },
        )
        .await
        .expect("schedule place");
}

#[when(regex = r"^I drag the item at position (\d+) to position (\d+) on (\S+)$")]
async fn when_drag(world: &mut AppWorld, source: usize, destination: usize, date: String) {
    let day = world.day(&date).await;
    world
        .app_state()
        .itinerary
        .move_item(&day.id, source, Some(destination))
        .await
        .expect("move item");
}

#[when(regex = r"^I drop the item at position (\d+) outside the list on (\S+)$")]
async fn when_cancelled_drag(world: &mut AppWorld, source: usize, date: String) {
    let day = world.day(&date).await;
    world
        .app_state()
        .itinerary
        .move_item(&day.id, source, None)
        .await
        .expect("cancelled drag");
}

#[when(regex = r#"^I remove "([^"]+)" from (\S+)$"#)]
async fn when_remove_item(world: &mut AppWorld, place: String, date: String) {
    let day = world.day(&date).await;
    let item = day
        .items
        .iter()
        .find(|item| item.place_name == place)
        .expect("scheduled item");
    world
        .app_state()
        .itinerary
        .remove_item(&day.id, &item.id)
        .await
        .expect("remove item");
}

#[when(regex = r#"^I submit the order "([^"]+)" for (\S+) taken from (\S+)$"#)]
async fn when_submit_foreign_order(
    world: &mut AppWorld,
    place: String,
    target: String,
    source: String,
) {
    let source_day = world.day(&source).await;
    let item = source_day
        .items
        .iter()
        .find(|item| item.place_name == place)
        .expect("scheduled item");
    let target_day = world.day(&target).await;
    world.last_error = world
        .app_state()
        .itinerary
        .apply_order(
            &target_day.id,
            vec![OrderUpdate {
                id: item.id.clone(),
                order: 1,
            }],
        )
        .await
        .err();
}

#[then(regex = r#"^the day (\S+) reads "([^"]+)"$"#)]
async fn then_day_reads(world: &mut AppWorld, date: String, expected: String) {
    let day = world.day(&date).await;
    let names: Vec<String> = day.items.iter().map(|item| item.place_name.clone()).collect();
    assert_eq!(names, split_list(&expected));
}

#[then(regex = r#"^the orders on (\S+) are "([^"]+)"$"#)]
async fn then_orders(world: &mut AppWorld, date: String, expected: String) {
    let day = world.day(&date).await;
    let orders: Vec<String> = day.items.iter().map(|item| item.order.to_string()).collect();
    assert_eq!(orders, split_list(&expected));
}

#[given(regex = r#"^payment users "([^"]+)"$"#)]
async fn given_payers(world: &mut AppWorld, names: String) {
    let trip_id = world.trip().id.clone();
    for name in split_list(&names) {
        let user = world
            .app_state()
            .expenses
            .add_user(NewPaymentUser {
                trip_id: trip_id.clone(),
                name: name.clone(),
            })
            .await
            .expect("add payment user");
        world.payers.insert(name, user.id);
    }
}

fn expense_for(world: &AppWorld, payer: &str, amount: f64, mode: &str) -> NewExpense {
    NewExpense {
        trip_id: world.trip().id.clone(),
        amount,
        paid_by: Some(world.payers.get(payer).expect("known payer").clone()),
        description: Some(format!("paid by {payer}")),
        mode_of_payment: mode.parse().expect("payment mode"),
        place_id: None,
        payment_time: None,
    }
}

#[given(regex = r#"^"([^"]+)" paid ([0-9.]+) by "([^"]+)"$"#)]
async fn given_paid(world: &mut AppWorld, payer: String, amount: f64, mode: String) {
    let input = expense_for(world, &payer, amount, &mode);
    world
        .app_state()
        .expenses
        .create(input)
        .await
        .expect("record expense");
}

#[given(regex = r#"^"([^"]+)" paid ([0-9.]+) by "([^"]+)" at "([^"]+)"$"#)]
async fn given_paid_at(
    world: &mut AppWorld,
    payer: String,
    amount: f64,
    mode: String,
    place: String,
) {
    let mut input = expense_for(world, &payer, amount, &mode);
    input.place_id = Some(world.places.get(&place).expect("known place").clone());
    let expense = world
        .app_state()
        .expenses
        .create(input)
        .await
        .expect("record expense");
    assert_eq!(expense.place_name.as_deref(), Some(place.as_str()));
}

#[when(regex = r#"^"([^"]+)" tries to pay (-?[0-9.]+) by "([^"]+)"$"#)]
async fn when_try_pay(world: &mut AppWorld, payer: String, amount: f64, mode: String) {
    let input = expense_for(world, &payer, amount, &mode);
    world.last_error = world.app_state().expenses.create(input).await.err();
}

#[when(regex = r#"^I delete the payment user "([^"]+)"$"#)]
async fn when_delete_payer(world: &mut AppWorld, name: String) {
    let id = world.payers.get(&name).expect("known payer").clone();
    world
        .app_state()
        .expenses
        .delete_user(&id)
        .await
        .expect("delete payment user");
}

#[then(regex = r"^the trip has (\d+) expenses$")]
async fn then_expense_count(world: &mut AppWorld, expected: usize) {
    let expenses = world
        .app_state()
        .expenses
        .list(&world.trip().id)
        .await
        .expect("expenses");
    assert_eq!(expenses.len(), expected);
}

#[then(regex = r"^(\d+) expenses? ha(?:s|ve) no payer$")]
async fn then_unpaid(world: &mut AppWorld, expected: usize) {
    let expenses = world
        .app_state()
        .expenses
        .list(&world.trip().id)
        .await
        .expect("expenses");
    let orphaned = expenses
        .iter()
        .filter(|e| e.paid_by.is_none() && e.payment_user_name.is_none())
        .count();
    assert_eq!(orphaned, expected);
}

#[then(regex = r"^(\d+) expenses? ha(?:s|ve) no place$")]
async fn then_placeless(world: &mut AppWorld, expected: usize) {
    let expenses = world
        .app_state()
        .expenses
        .list(&world.trip().id)
        .await
        .expect("expenses");
    let unlinked = expenses
        .iter()
        .filter(|e| e.place_id.is_none() && e.place_name.is_none())
        .count();
    assert_eq!(unlinked, expected);
}

#[then(regex = r"^the expense total is ([0-9.]+)$")]
async fn then_total(world: &mut AppWorld, expected: f64) {
    let summary = world
        .app_state()
        .expenses
        .summary(&world.trip().id)
        .await
        .expect("summary");
    assert!((summary.total - expected).abs() < 1e-9);
}

#[then(regex = r#"^"([^"]+)" has paid ([0-9.]+)$"#)]
async fn then_payer_total(world: &mut AppWorld, payer: String, expected: f64) {
    let summary = world
        .app_state()
        .expenses
        .summary(&world.trip().id)
        .await
        .expect("summary");
    let total = summary
        .per_user
        .iter()
        .find(|p| p.name == payer)
        .expect("payer in summary")
        .total;
    assert!((total - expected).abs() < 1e-9);
}

#[then(regex = r"^the ledger for the trip has (\d+) entries$")]
async fn then_ledger_count(world: &mut AppWorld, expected: usize) {
    let entries = world
        .app_state()
        .ledger
        .list(Some(&world.trip().id))
        .await
        .expect("ledger");
    assert_eq!(entries.len(), expected);
}

#[then(regex = r#"^the latest ledger entry mentions "([^"]+)"$"#)]
async fn then_latest_ledger(world: &mut AppWorld, needle: String) {
    let entries = world
        .app_state()
        .ledger
        .list(Some(&world.trip().id))
        .await
        .expect("ledger");
    let latest = entries.first().expect("at least one ledger entry");
    assert!(
        latest.event_description.contains(&needle),
        "latest entry was {:?}",
        latest.event_description
    );
}

#[tokio::main]
async fn main() {
    AppWorld::cucumber()
        .fail_on_skipped()
        .with_default_cli()
        .run("tests/features")
        .await;
}
