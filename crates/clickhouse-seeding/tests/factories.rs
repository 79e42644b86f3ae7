//! End-to-end factory scenarios over the process-wide registry.
//!
//! These tests exercise the full path a suite uses: define factories
//! globally, create rows through the helper functions, and assert on what
//! reached the gateway. They mutate process-wide state, so they run
//! serially.

use std::sync::{Arc, Mutex};

use clickhouse_seeding::prelude::*;
use serial_test::serial;
use uuid::Uuid;

fn define_event_factory() {
	define_factory("event", "events", |f| {
		f.sequence("id");
		f.set("name", "Event");
		f.set("tags", vec!["tag1", "tag2"]);
		f.set("active", true);
		f.set_computed("slug", |attrs| {
			Value::from(format!("event-{}", attrs["id"].as_i64().unwrap_or(0)))
		});
		f.define_trait("inactive", |t| {
			t.set("active", false);
		});
		f.define_trait("high_value", |t| {
			t.set("value", 1000i64);
		});
	});
}

fn fresh_state() {
	clear_factories();
	reset_configuration();
}

#[test]
#[serial]
fn creates_a_record_through_the_gateway() {
	fresh_state();
	define_event_factory();

	let gateway = RecordingGateway::new();
	let event = create(&gateway, "event", &[], row! {}).unwrap();

	assert_eq!(event["id"], Value::Int(1));
	assert_eq!(event["name"], Value::from("Event"));
	assert_eq!(event["slug"], Value::from("event-1"));

	let inserts = gateway.inserts();
	assert_eq!(inserts.len(), 1);
	assert_eq!(inserts[0].table, "events");
	assert_eq!(inserts[0].rows, vec![event]);
}

#[test]
#[serial]
fn sequences_increment_across_creates() {
	fresh_state();
	define_event_factory();

	let gateway = RecordingGateway::new();
	let ids: Vec<i64> = (0..3)
		.map(|_| {
			create(&gateway, "event", &[], row! {}).unwrap()["id"]
				.as_i64()
				.unwrap()
		})
		.collect();

	assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
#[serial]
fn overrides_win_over_rules_and_sequences() {
	fresh_state();
	define_event_factory();

	let gateway = RecordingGateway::new();
	let event = create(
		&gateway,
		"event",
		&[],
		row! { "name" => "Custom Name", "id" => 999 },
	)
	.unwrap();

	assert_eq!(event["name"], Value::from("Custom Name"));
	assert_eq!(event["id"], Value::Int(999));
}

#[test]
#[serial]
fn traits_apply_in_call_order() {
	fresh_state();
	define_event_factory();

	let gateway = RecordingGateway::new();
	let event = create(&gateway, "event", &["inactive", "high_value"], row! {}).unwrap();

	assert_eq!(event["active"], Value::from(false));
	assert_eq!(event["value"], Value::Int(1000));
}

#[test]
#[serial]
fn unknown_trait_leaves_no_row_and_no_sequence_advance() {
	fresh_state();
	define_event_factory();

	let gateway = RecordingGateway::new();
	let error = create(&gateway, "event", &["nope"], row! {}).unwrap_err();

	assert!(matches!(error, SeedingError::UnknownTrait { .. }));
	assert_eq!(gateway.call_count(), 0);

	// The failed call advanced nothing.
	let event = create(&gateway, "event", &[], row! {}).unwrap();
	assert_eq!(event["id"], Value::Int(1));
}

#[test]
#[serial]
fn create_list_issues_one_bulk_insert() {
	fresh_state();
	define_event_factory();

	let gateway = RecordingGateway::new();
	let events = create_list(&gateway, "event", 10, &[], row! {}).unwrap();

	assert_eq!(events.len(), 10);
	let inserts = gateway.inserts();
	assert_eq!(inserts.len(), 1);
	assert_eq!(inserts[0].rows.len(), 10);

	let ids: Vec<i64> = events.iter().map(|e| e["id"].as_i64().unwrap()).collect();
	assert_eq!(ids, (1..=10).collect::<Vec<i64>>());
}

#[test]
#[serial]
fn create_list_repeats_static_overrides_across_rows() {
	fresh_state();
	define_event_factory();

	let gateway = RecordingGateway::new();
	let events = create_list(&gateway, "event", 3, &["inactive"], row! { "name" => "Same" })
		.unwrap();

	for event in &events {
		assert_eq!(event["name"], Value::from("Same"));
		assert_eq!(event["active"], Value::from(false));
	}
}

#[test]
#[serial]
fn create_list_zero_count_skips_the_gateway() {
	fresh_state();
	define_event_factory();

	let gateway = RecordingGateway::new();
	let events = create_list(&gateway, "event", 0, &[], row! {}).unwrap();

	assert!(events.is_empty());
	assert_eq!(gateway.call_count(), 0);
}

#[test]
#[serial]
fn callbacks_run_on_create_but_not_create_list() {
	fresh_state();

	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&seen);
	define_factory("audited", "audited_facts", |f| {
		f.sequence("id");
		f.after_create(move |row| {
			sink.lock().unwrap().push(row["id"].as_i64().unwrap());
			Ok(())
		});
	});

	let gateway = RecordingGateway::new();
	create(&gateway, "audited", &[], row! {}).unwrap();
	create_list(&gateway, "audited", 5, &[], row! {}).unwrap();

	assert_eq!(*seen.lock().unwrap(), vec![1]);
}

#[test]
#[serial]
fn factory_defaults_merge_first_and_lose_to_factory_rules() {
	fresh_state();
	configure(|config| {
		config.factory_defaults = row! { "source" => "test", "name" => "From Defaults" };
	});
	define_event_factory();

	let gateway = RecordingGateway::new();
	let event = create(&gateway, "event", &[], row! {}).unwrap();

	assert_eq!(event["source"], Value::from("test"));
	assert_eq!(event["name"], Value::from("Event"));

	reset_configuration();
}

#[test]
#[serial]
fn configured_sequence_start_applies_to_new_definitions() {
	fresh_state();
	configure(|config| config.sequence_start = 1000);

	define_factory("numbered", "numbered_facts", |f| {
		f.sequence("number");
	});

	let numbered = build("numbered", &[], row! {}).unwrap();
	assert_eq!(numbered["number"], Value::Int(1000));

	reset_configuration();
}

#[test]
#[serial]
fn computed_attributes_can_generate_unique_tokens() {
	fresh_state();
	define_factory("session", "sessions", |f| {
		f.sequence("id");
		f.set_computed("token", |_| Value::from(Uuid::new_v4()));
	});

	let first = build("session", &[], row! {}).unwrap();
	let second = build("session", &[], row! {}).unwrap();

	assert!(first["token"].as_str().is_some());
	assert_ne!(first["token"], second["token"]);
}

#[test]
#[serial]
fn clearing_the_registry_makes_factories_unresolvable() {
	fresh_state();
	define_event_factory();
	assert!(build("event", &[], row! {}).is_ok());

	clear_factories();

	let error = build("event", &[], row! {}).unwrap_err();
	assert!(matches!(error, SeedingError::FactoryNotFound(_)));
}

#[test]
#[serial]
fn redefining_a_factory_replaces_it() {
	fresh_state();
	define_event_factory();
	define_factory("event", "events_v2", |f| {
		f.set("name", "Replaced");
	});

	let gateway = RecordingGateway::new();
	let event = create(&gateway, "event", &[], row! {}).unwrap();

	assert_eq!(event["name"], Value::from("Replaced"));
	assert_eq!(gateway.inserts()[0].table, "events_v2");
}
