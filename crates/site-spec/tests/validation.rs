use chrono::{NaiveDate, NaiveDateTime};

use site_spec::{FieldState, SiteConfig, SiteController, SiteEvent};

fn started_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap()
}

fn load_config() -> SiteConfig {
    SiteConfig::from_json(include_str!("fixtures/site.json")).expect("fixture config")
}

fn controller() -> SiteController {
    SiteController::new(load_config(), started_at()).expect("controller")
}

fn type_into(controller: &mut SiteController, field: &str, value: &str) {
    controller.handle(SiteEvent::Input {
        form: "booking".into(),
        field: field.into(),
        value: value.into(),
    });
}

fn feedback(controller: &SiteController, field: &str) -> Vec<String> {
    controller
        .page()
        .field_by_name("booking", field)
        .expect("field")
        .feedback
        .clone()
}

fn fill_valid_booking(controller: &mut SiteController) {
    for (field, value) in [
        ("name", "Ann Smith"),
        ("email", "ann@example.com"),
        ("phone", "+1 555 010 2030"),
        ("date", "2026-10-24"),
        ("time", "19:30"),
        ("people", "4"),
    ] {
        type_into(controller, field, value);
    }
}

#[test]
fn short_name_is_rejected_with_message() {
    let mut controller = controller();
    type_into(&mut controller, "name", "A");
    assert!(!controller.validate_field("booking", "name"));
    assert_eq!(
        feedback(&controller, "name"),
        vec!["Name must be at least 2 characters long".to_string()]
    );

    type_into(&mut controller, "name", "Ann");
    assert!(controller.validate_field("booking", "name"));
    assert!(feedback(&controller, "name").is_empty());
    let field = controller.page().field_by_name("booking", "name").unwrap();
    assert_eq!(field.state, FieldState::Valid);
}

#[test]
fn email_needs_a_dot_in_the_domain() {
    let mut controller = controller();
    type_into(&mut controller, "email", "foo@bar");
    assert!(!controller.validate_field("booking", "email"));
    type_into(&mut controller, "email", "foo@bar.com");
    assert!(controller.validate_field("booking", "email"));
}

#[test]
fn party_size_bounds_are_inclusive() {
    let mut controller = controller();
    for (value, valid) in [("0", false), ("1", true), ("20", true), ("21", false)] {
        type_into(&mut controller, "people", value);
        assert_eq!(controller.validate_field("booking", "people"), valid, "{value}");
    }
    assert_eq!(
        feedback(&controller, "people"),
        vec!["Please enter between 1 and 20 people".to_string()]
    );
}

#[test]
fn date_is_compared_against_the_controller_clock() {
    let mut controller = controller();
    type_into(&mut controller, "date", "2026-10-18");
    assert!(!controller.validate_field("booking", "date"));
    assert_eq!(
        feedback(&controller, "date"),
        vec!["Please select a future date".to_string()]
    );
    type_into(&mut controller, "date", "2026-10-19");
    assert!(controller.validate_field("booking", "date"));
}

#[test]
fn repeated_validation_keeps_exactly_one_annotation() {
    let mut controller = controller();
    type_into(&mut controller, "phone", "abc");
    assert!(!controller.validate_field("booking", "phone"));
    assert!(!controller.validate_field("booking", "phone"));
    assert_eq!(feedback(&controller, "phone").len(), 1);

    type_into(&mut controller, "phone", "5550102030");
    assert!(controller.validate_field("booking", "phone"));
    assert!(controller.validate_field("booking", "phone"));
    assert!(feedback(&controller, "phone").is_empty());
}

#[test]
fn form_validation_annotates_every_required_field() {
    let mut controller = controller();
    fill_valid_booking(&mut controller);
    type_into(&mut controller, "name", "A");
    type_into(&mut controller, "people", "99");

    assert!(!controller.validate_form("booking"));
    let page = controller.page();
    for id in page.required_fields("booking") {
        let field = page.field(id).unwrap();
        assert_ne!(field.state, FieldState::Unvalidated, "{}", field.name);
    }
    assert_eq!(feedback(&controller, "name").len(), 1);
    assert_eq!(feedback(&controller, "people").len(), 1);
    assert!(feedback(&controller, "email").is_empty());

    // The optional message field is never touched by form validation.
    let message = controller.page().field_by_name("booking", "message").unwrap();
    assert_eq!(message.state, FieldState::Unvalidated);
}

#[test]
fn form_validation_passes_when_all_required_fields_pass() {
    let mut controller = controller();
    fill_valid_booking(&mut controller);
    assert!(controller.validate_form("booking"));
}

#[test]
fn field_without_rule_is_valid() {
    let mut controller = controller();
    assert!(controller.validate_field("booking", "message"));
}

#[test]
fn allow_list_controls_which_rules_apply() {
    let mut config = load_config();
    config.validated_fields = vec!["email".into(), "nick*".into()];
    let mut controller = SiteController::new(config, started_at()).unwrap();
    type_into(&mut controller, "name", "A");
    assert!(controller.validate_field("booking", "name"));
    type_into(&mut controller, "email", "nope");
    assert!(!controller.validate_field("booking", "email"));
}

#[test]
fn missing_form_or_field_is_skipped() {
    let mut controller = controller();
    assert!(!controller.validate_field("booking", "nickname"));
    assert!(!controller.validate_form("catering"));
}

#[test]
fn blur_validates_and_input_only_rechecks_invalid_fields() {
    let mut controller = controller();
    type_into(&mut controller, "name", "A");
    let state = |controller: &SiteController| {
        controller
            .page()
            .field_by_name("booking", "name")
            .unwrap()
            .state
    };
    assert_eq!(state(&controller), FieldState::Unvalidated);

    controller.handle(SiteEvent::Blur {
        form: "booking".into(),
        field: "name".into(),
    });
    assert_eq!(state(&controller), FieldState::Invalid);

    type_into(&mut controller, "name", "Al");
    assert_eq!(state(&controller), FieldState::Valid);

    // Once valid, typing no longer re-validates until the next blur.
    type_into(&mut controller, "name", "A");
    assert_eq!(state(&controller), FieldState::Valid);
}
