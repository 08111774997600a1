//! End-to-end tests for the validation engine
//!
//! These tests verify that:
//! - Rule chains evaluate in order and short-circuit per field
//! - Sanitization runs before any rule sees a value
//! - Messages render with field names, parameters and value lists
//! - Store-backed rules consult the injected row-count store
//! - Results come back in field order and are repeatable

use fieldcheck::prelude::*;

fn text_input(pairs: &[(&str, &str)]) -> Input {
    pairs
        .iter()
        .map(|(field, value)| (field.to_string(), Value::from(*value)))
        .collect()
}

// =============================================================================
// Short-circuit evaluation
// =============================================================================

mod short_circuit_tests {
    use super::*;

    #[test]
    fn test_first_failing_rule_wins() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("email", "required|email");

        let passed = validator
            .validate(&text_input(&[("email", "")]), &spec)
            .unwrap();
        assert!(!passed);

        let messages = validator.errors().messages("email");
        assert_eq!(messages, &["The email field is required.".to_string()]);
    }

    #[test]
    fn test_later_rules_run_once_earlier_ones_pass() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("email", "required|email");

        validator
            .validate(&text_input(&[("email", "not-an-email")]), &spec)
            .unwrap();
        assert_eq!(
            validator.errors().first("email"),
            Some("The email field must be a valid email address.")
        );
    }

    #[test]
    fn test_fields_fail_independently() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new()
            .field("username", "required|min:3")
            .field("email", "required|email");
        let input = text_input(&[("username", "ab"), ("email", "nope")]);

        assert!(!validator.validate(&input, &spec).unwrap());
        assert_eq!(validator.errors().len(), 2);
        assert_eq!(validator.errors().messages("username").len(), 1);
        assert_eq!(validator.errors().messages("email").len(), 1);
    }

    #[test]
    fn test_errors_follow_spec_order_not_input_order() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new()
            .field("first", "required")
            .field("second", "required");
        // Input order reversed on purpose
        let input = text_input(&[("second", ""), ("first", "")]);

        validator.validate(&input, &spec).unwrap();
        let fields: Vec<&str> = validator.errors().iter().map(|(field, _)| field).collect();
        assert_eq!(fields, ["first", "second"]);
    }
}

// =============================================================================
// Nullable
// =============================================================================

mod nullable_tests {
    use super::*;

    #[test]
    fn test_empty_nullable_field_is_valid() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("website", "nullable|url");

        assert!(validator
            .validate(&text_input(&[("website", "")]), &spec)
            .unwrap());
    }

    #[test]
    fn test_missing_nullable_field_is_valid() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("website", "nullable|url");

        assert!(validator.validate(&Input::new(), &spec).unwrap());
    }

    #[test]
    fn test_null_value_counts_as_empty() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("website", "nullable|url");

        let mut input = Input::new();
        input.insert("website".to_string(), Value::Null);
        assert!(validator.validate(&input, &spec).unwrap());
    }

    #[test]
    fn test_zero_string_is_not_empty_for_nullable() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("website", "nullable|url");

        // "0" is a present value, so the url rule still runs and fails
        assert!(!validator
            .validate(&text_input(&[("website", "0")]), &spec)
            .unwrap());
    }

    #[test]
    fn test_non_empty_nullable_field_faces_the_chain() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("website", "nullable|url");

        assert!(!validator
            .validate(&text_input(&[("website", "not a url")]), &spec)
            .unwrap());
        assert!(validator
            .validate(&text_input(&[("website", "https://example.com")]), &spec)
            .unwrap());
    }
}

// =============================================================================
// Message rendering
// =============================================================================

mod message_tests {
    use super::*;

    #[test]
    fn test_between_message_carries_both_bounds() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("password", "between:3,20");

        validator
            .validate(&text_input(&[("password", "ab")]), &spec)
            .unwrap();
        let message = validator.errors().first("password").unwrap();
        assert!(message.contains('3'), "message was: {}", message);
        assert!(message.contains("20"), "message was: {}", message);
    }

    #[test]
    fn test_min_message_carries_the_parameter() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("username", "min:5");

        validator
            .validate(&text_input(&[("username", "abcd")]), &spec)
            .unwrap();
        assert_eq!(
            validator.errors().first("username"),
            Some("The username field must be at least 5 characters.")
        );
    }

    #[test]
    fn test_in_message_lists_the_allowed_values() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("role", "in:admin,editor");

        validator
            .validate(&text_input(&[("role", "root")]), &spec)
            .unwrap();
        assert_eq!(
            validator.errors().first("role"),
            Some("The role field must be one of the following values: admin, editor.")
        );
    }

    #[test]
    fn test_custom_catalog_replaces_rendering() {
        let mut messages = Messages::new();
        messages.set("required", "Champ :field obligatoire.");

        let mut validator = Validator::new().with_messages(messages);
        let spec = RuleSpec::new().field("nom", "required");

        validator.validate(&Input::new(), &spec).unwrap();
        assert_eq!(
            validator.errors().first("nom"),
            Some("Champ nom obligatoire.")
        );
    }

    #[test]
    fn test_messages_mut_tweaks_one_template() {
        let mut validator = Validator::new();
        validator
            .messages_mut()
            .set("email", "Not an email: :field.");
        let spec = RuleSpec::new().field("contact", "required|email");

        validator
            .validate(&text_input(&[("contact", "nope")]), &spec)
            .unwrap();
        assert_eq!(
            validator.errors().first("contact"),
            Some("Not an email: contact.")
        );
    }
}

// =============================================================================
// Boundaries
// =============================================================================

mod boundary_tests {
    use super::*;

    #[test]
    fn test_min_five_rejects_four_chars_and_accepts_five() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("username", "min:5");

        assert!(!validator
            .validate(&text_input(&[("username", "abcd")]), &spec)
            .unwrap());
        assert!(validator
            .validate(&text_input(&[("username", "abcde")]), &spec)
            .unwrap());
    }

    #[test]
    fn test_between_is_inclusive_at_both_ends() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("code", "between:2,4");

        assert!(!validator.validate(&text_input(&[("code", "a")]), &spec).unwrap());
        assert!(validator.validate(&text_input(&[("code", "ab")]), &spec).unwrap());
        assert!(validator.validate(&text_input(&[("code", "abcd")]), &spec).unwrap());
        assert!(!validator
            .validate(&text_input(&[("code", "abcde")]), &spec)
            .unwrap());
    }

    #[test]
    fn test_numbers_validate_through_their_text() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new()
            .field("age", "required|integer")
            .field("price", "required|numeric");

        let mut input = Input::new();
        input.insert("age".to_string(), Value::Integer(30));
        input.insert("price".to_string(), Value::Float(9.5));

        assert!(validator.validate(&input, &spec).unwrap());
    }
}

// =============================================================================
// Cross-field rules
// =============================================================================

mod cross_field_tests {
    use super::*;

    #[test]
    fn test_same_fails_when_the_field_is_absent() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("password_repeat", "same:password");
        let input = text_input(&[("password", "abc")]);

        assert!(!validator.validate(&input, &spec).unwrap());
        assert_eq!(
            validator.errors().first("password_repeat"),
            Some("The password_repeat field must match the password field.")
        );
    }

    #[test]
    fn test_same_passes_on_equal_values() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("password_repeat", "same:password");
        let input = text_input(&[("password", "abc"), ("password_repeat", "abc")]);

        assert!(validator.validate(&input, &spec).unwrap());
    }

    #[test]
    fn test_confirmed_uses_the_sibling_convention() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("password", "required|confirmed");

        let matching = text_input(&[("password", "secret"), ("password_confirmation", "secret")]);
        assert!(validator.validate(&matching, &spec).unwrap());

        let differing = text_input(&[("password", "secret"), ("password_confirmation", "other")]);
        assert!(!validator.validate(&differing, &spec).unwrap());
        assert_eq!(
            validator.errors().first("password"),
            Some("The password confirmation does not match.")
        );
    }
}

// =============================================================================
// Sanitization before rules
// =============================================================================

mod sanitize_tests {
    use super::*;

    #[test]
    fn test_tagged_text_still_satisfies_required() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("bio", "required");

        assert!(validator
            .validate(&text_input(&[("bio", "<b>Hi</b>")]), &spec)
            .unwrap());
    }

    #[test]
    fn test_tags_only_value_becomes_empty_and_fails_required() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("bio", "required");

        assert!(!validator
            .validate(&text_input(&[("bio", "<b></b>")]), &spec)
            .unwrap());
    }

    #[test]
    fn test_rules_measure_the_sanitized_value() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("code", "size:3");

        // "  abc  " trims to three characters; "<i>abc</i>" strips to them
        assert!(validator
            .validate(&text_input(&[("code", "  abc  ")]), &spec)
            .unwrap());
        assert!(validator
            .validate(&text_input(&[("code", "<i>abc</i>")]), &spec)
            .unwrap());
    }

    #[test]
    fn test_escaped_markup_lengthens_the_value() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new().field("name", "max:10");

        // "Tom & Co" escapes to "Tom &amp; Co", twelve characters
        assert!(!validator
            .validate(&text_input(&[("name", "Tom & Co")]), &spec)
            .unwrap());
    }
}

// =============================================================================
// Store-backed rules
// =============================================================================

mod store_tests {
    use super::*;

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert("users", [("id", "1"), ("email", "taken@example.com")])
            .unwrap();
        store
            .insert("roles", [("id", "1"), ("name", "admin")])
            .unwrap();
        store
    }

    #[test]
    fn test_unique_rejects_a_taken_value() {
        let mut validator = Validator::new().with_store(seeded_store());
        let spec = RuleSpec::new().field("email", "required|email|unique:users,email");

        let taken = text_input(&[("email", "taken@example.com")]);
        assert!(!validator.validate(&taken, &spec).unwrap());
        assert_eq!(
            validator.errors().first("email"),
            Some("The email field must be unique.")
        );

        let fresh = text_input(&[("email", "fresh@example.com")]);
        assert!(validator.validate(&fresh, &spec).unwrap());
    }

    #[test]
    fn test_unique_can_ignore_the_record_being_updated() {
        let mut validator = Validator::new().with_store(seeded_store());
        let spec = RuleSpec::new().field("email", "unique:users,email,1");

        let own_email = text_input(&[("email", "taken@example.com")]);
        assert!(validator.validate(&own_email, &spec).unwrap());
    }

    #[test]
    fn test_exists_requires_a_known_value() {
        let mut validator = Validator::new().with_store(seeded_store());
        let spec = RuleSpec::new().field("role", "required|exists:roles,name");

        assert!(validator
            .validate(&text_input(&[("role", "admin")]), &spec)
            .unwrap());

        assert!(!validator
            .validate(&text_input(&[("role", "emperor")]), &spec)
            .unwrap());
        assert_eq!(
            validator.errors().first("role"),
            Some("The role field does not exist.")
        );
    }

    #[test]
    fn test_verdict_follows_the_store_state() {
        let store = seeded_store();
        let mut validator = Validator::new().with_store(store.clone());
        let spec = RuleSpec::new().field("email", "unique:users,email");
        let input = text_input(&[("email", "new@example.com")]);

        assert!(validator.validate(&input, &spec).unwrap());

        store
            .insert("users", [("id", "2"), ("email", "new@example.com")])
            .unwrap();
        assert!(!validator.validate(&input, &spec).unwrap());
    }
}

// =============================================================================
// Repeatability
// =============================================================================

mod idempotence_tests {
    use super::*;

    #[test]
    fn test_two_passes_yield_identical_error_maps() {
        let mut validator = Validator::new();
        let spec = RuleSpec::new()
            .field("username", "required|min:3")
            .field("email", "required|email")
            .field("age", "integer");
        let input = text_input(&[("username", ""), ("email", "bad"), ("age", "x")]);

        validator.validate(&input, &spec).unwrap();
        let first = serde_json::to_string(validator.errors()).unwrap();

        validator.validate(&input, &spec).unwrap();
        let second = serde_json::to_string(validator.errors()).unwrap();

        // Same messages, same field order
        assert_eq!(first, second);
    }
}

// =============================================================================
// Compact spec form and JSON input
// =============================================================================

mod ingestion_tests {
    use super::*;

    #[test]
    fn test_compact_spec_drives_a_full_pass() {
        let spec = RuleSpec::parse("username:required|min:3;email:required|email").unwrap();
        let mut validator = Validator::new();

        let input = text_input(&[("username", "ab"), ("email", "ana@example.com")]);
        assert!(!validator.validate(&input, &spec).unwrap());
        assert!(validator.errors().contains("username"));
        assert!(!validator.errors().contains("email"));
    }

    #[test]
    fn test_json_payload_validates_directly() {
        let input: Input = serde_json::from_str(
            r#"{"username": "ana_m", "age": 30, "bio": null, "website": ""}"#,
        )
        .unwrap();
        let spec = RuleSpec::new()
            .field("username", "required|min:3|max:20")
            .field("age", "required|integer")
            .field("bio", "nullable|min:10")
            .field("website", "nullable|url");

        let mut validator = Validator::new();
        assert!(validator.validate(&input, &spec).unwrap());
    }

    #[test]
    fn test_json_file_descriptor_passes_file_rules() {
        let input: Input = serde_json::from_str(
            r#"{"avatar": {"temp_path": "/tmp/up_3", "mime_type": "image/png", "name": "me.png", "size": 2048}}"#,
        )
        .unwrap();
        let spec = RuleSpec::new().field("avatar", "required|file|mimes:image/png,image/jpeg");

        let mut validator = Validator::new();
        assert!(validator.validate(&input, &spec).unwrap());
    }

    #[test]
    fn test_wrong_mime_type_is_reported_with_the_allowed_list() {
        let mut input = Input::new();
        input.insert(
            "avatar".to_string(),
            Value::from(FileUpload::new("/tmp/up_4", "application/pdf")),
        );
        let spec = RuleSpec::new().field("avatar", "file|mimes:image/png,image/jpeg");

        let mut validator = Validator::new();
        assert!(!validator.validate(&input, &spec).unwrap());
        assert_eq!(
            validator.errors().first("avatar"),
            Some("The avatar field must be a file of type: image/png, image/jpeg.")
        );
    }
}

// =============================================================================
// Configuration
// =============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn test_yaml_overrides_shape_the_messages() {
        let config = ValidatorConfig::from_yaml_str(
            r#"
messages:
  required: "Il manque :field."
"#,
        )
        .unwrap();

        let mut validator = Validator::new().with_config(&config);
        let spec = RuleSpec::new().field("nom", "required|min:2");

        validator.validate(&Input::new(), &spec).unwrap();
        assert_eq!(validator.errors().first("nom"), Some("Il manque nom."));
    }
}
