use serde_json::{Value, json};

use form_spec::{
    AnswerSet, ConditionExpr, ConditionOperator, Question, QuestionType, RuleLogic, RuleSet,
    ValidationError, map_to_external_record, resolve_visible, validate,
};

fn answers(value: Value) -> AnswerSet {
    value.as_object().cloned().unwrap_or_default()
}

fn text_question(key: &str, field_id: &str, label: &str, required: bool) -> Question {
    Question {
        question_key: key.into(),
        field_id: field_id.into(),
        label: label.into(),
        kind: QuestionType::SingleLineText,
        required,
        select_options: vec![],
        conditional_rules: None,
    }
}

fn select_question(key: &str, field_id: &str, label: &str, options: &[&str]) -> Question {
    Question {
        question_key: key.into(),
        field_id: field_id.into(),
        label: label.into(),
        kind: QuestionType::SingleSelect,
        required: false,
        select_options: options.iter().map(|option| option.to_string()).collect(),
        conditional_rules: None,
    }
}

fn multi_select_question(key: &str, field_id: &str, label: &str, options: &[&str]) -> Question {
    Question {
        kind: QuestionType::MultipleSelect,
        ..select_question(key, field_id, label, options)
    }
}

fn visible_if_equals(mut question: Question, other_key: &str, value: Value) -> Question {
    question.conditional_rules = Some(RuleSet {
        logic: RuleLogic::And,
        conditions: vec![ConditionExpr {
            question_key: other_key.into(),
            operator: ConditionOperator::Equals,
            value,
        }],
    });
    question
}

#[test]
fn passes_when_required_answers_are_present_and_options_match() {
    let questions = vec![
        text_question("name", "fldName", "Name", true),
        select_question("color", "fldColor", "Color", &["red", "blue"]),
    ];
    let state = answers(json!({ "name": "Ada", "color": "red" }));
    let visible = resolve_visible(&questions, &state);

    assert!(validate(&state, &visible).is_ok());
}

#[test]
fn reports_the_first_offending_question() {
    let questions = vec![
        text_question("first", "fld1", "First", true),
        text_question("second", "fld2", "Second", true),
    ];
    let state = answers(json!({}));
    let visible = resolve_visible(&questions, &state);

    let error = validate(&state, &visible).unwrap_err();
    assert_eq!(
        error,
        ValidationError::MissingRequired {
            label: "First".into()
        }
    );
    assert_eq!(error.to_string(), "First is required");
}

#[test]
fn blank_variants_all_fail_a_required_question() {
    let questions = vec![text_question("name", "fldName", "Name", true)];
    for state in [
        answers(json!({})),
        answers(json!({ "name": null })),
        answers(json!({ "name": "" })),
    ] {
        let visible = resolve_visible(&questions, &state);
        assert!(validate(&state, &visible).is_err());
    }
}

#[test]
fn hidden_required_questions_are_not_validated() {
    let questions = vec![
        text_question("gate", "fldGate", "Gate", true),
        visible_if_equals(
            text_question("detail", "fldDetail", "Detail", true),
            "gate",
            json!("open"),
        ),
    ];
    let state = answers(json!({ "gate": "closed" }));
    let visible = resolve_visible(&questions, &state);

    assert_eq!(visible.len(), 1);
    assert!(validate(&state, &visible).is_ok());
}

#[test]
fn single_select_rejects_values_outside_the_options() {
    let questions = vec![select_question("color", "fldColor", "Color", &["red", "blue"])];
    let state = answers(json!({ "color": "green" }));
    let visible = resolve_visible(&questions, &state);

    let error = validate(&state, &visible).unwrap_err();
    assert_eq!(error.to_string(), "Invalid value for Color");
}

#[test]
fn optional_select_with_blank_answer_is_fine() {
    let questions = vec![select_question("color", "fldColor", "Color", &["red"])];
    let state = answers(json!({ "color": "" }));
    let visible = resolve_visible(&questions, &state);

    assert!(validate(&state, &visible).is_ok());
}

#[test]
fn multiple_select_requires_a_sequence_of_known_options() {
    let questions = vec![multi_select_question(
        "tags",
        "fldTags",
        "Tags",
        &["a", "b"],
    )];

    let state = answers(json!({ "tags": "a" }));
    let visible = resolve_visible(&questions, &state);
    assert_eq!(
        validate(&state, &visible).unwrap_err().to_string(),
        "Tags must be an array"
    );

    let state = answers(json!({ "tags": ["a", "c"] }));
    let visible = resolve_visible(&questions, &state);
    assert_eq!(
        validate(&state, &visible).unwrap_err().to_string(),
        "Invalid value for Tags"
    );

    let state = answers(json!({ "tags": ["a", "b"] }));
    let visible = resolve_visible(&questions, &state);
    assert!(validate(&state, &visible).is_ok());

    let state = answers(json!({ "tags": [] }));
    let visible = resolve_visible(&questions, &state);
    assert!(validate(&state, &visible).is_ok());
}

#[test]
fn visibility_preserves_order_and_drops_failing_questions() {
    let questions = vec![
        text_question("a", "fldA", "A", false),
        visible_if_equals(text_question("b", "fldB", "B", false), "a", json!("go")),
        text_question("c", "fldC", "C", false),
    ];
    let state = answers(json!({ "a": "stop" }));

    let visible = resolve_visible(&questions, &state);
    let keys: Vec<&str> = visible
        .iter()
        .map(|question| question.question_key.as_str())
        .collect();
    assert_eq!(keys, vec!["a", "c"]);
}

// The two submission scenarios walked end to end: visibility, validation,
// then mapping, the same order the engine runs them in.
#[test]
fn conditional_branch_taken_validates_and_maps_both_questions() {
    let questions = vec![
        text_question("a", "fldA", "A", true),
        visible_if_equals(
            select_question("b", "fldB", "B", &["x", "y"]),
            "a",
            json!("go"),
        ),
    ];
    let state = answers(json!({ "a": "go", "b": "x" }));

    let visible = resolve_visible(&questions, &state);
    assert_eq!(visible.len(), 2);
    assert!(validate(&state, &visible).is_ok());

    let record = map_to_external_record(&state, &questions);
    assert_eq!(record.get("fldA"), Some(&json!("go")));
    assert_eq!(record.get("fldB"), Some(&json!("x")));
}

#[test]
fn conditional_branch_skipped_leaves_hidden_question_out_of_the_record() {
    let questions = vec![
        text_question("a", "fldA", "A", true),
        visible_if_equals(
            select_question("b", "fldB", "B", &["x", "y"]),
            "a",
            json!("go"),
        ),
    ];
    let state = answers(json!({ "a": "stop" }));

    let visible = resolve_visible(&questions, &state);
    assert_eq!(visible.len(), 1);
    assert!(validate(&state, &visible).is_ok());

    let record = map_to_external_record(&state, &questions);
    assert_eq!(record.get("fldA"), Some(&json!("stop")));
    assert!(!record.contains_key("fldB"));
}

#[test]
fn leftover_answer_for_a_hidden_question_is_still_mapped() {
    let questions = vec![
        text_question("a", "fldA", "A", true),
        visible_if_equals(text_question("b", "fldB", "B", false), "a", json!("go")),
    ];
    // The respondent answered b while it was visible, then flipped a back.
    let state = answers(json!({ "a": "stop", "b": "left over" }));

    let visible = resolve_visible(&questions, &state);
    assert_eq!(visible.len(), 1);
    assert!(validate(&state, &visible).is_ok());

    let record = map_to_external_record(&state, &questions);
    assert_eq!(record.get("fldB"), Some(&json!("left over")));
}
