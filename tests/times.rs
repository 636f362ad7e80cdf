//! Time fields with permissive parsing and bound checks.

use chrono::{DateTime, Utc};
use conform::new_from;

conform::reflect_struct! {
    #[derive(Debug, Default)]
    pub struct TimeObject {
        pub when: DateTime<Utc> [validate = "required,min=2000-01-01"],
        pub name: String [validate = "required,minlength=1,maxlength=100"],
    }
}

struct Case {
    name: &'static str,
    json: &'static str,
    expected: Option<&'static str>,
}

#[test]
fn test_time_validation() {
    let cases = [
        Case {
            name: "valid human-written time",
            json: r#"{"when": "Dec 15, 2023 10:00AM", "name": "First"}"#,
            expected: None,
        },
        Case {
            name: "valid RFC 3339 time",
            json: r#"{"when": "2023-12-15T10:00:00Z", "name": "First"}"#,
            expected: None,
        },
        Case {
            name: "date exactly at the minimum",
            json: r#"{"when": "2000-01-01", "name": "First"}"#,
            expected: None,
        },
        Case {
            name: "invalid time format",
            json: r#"{"when": "Yesterday", "name": "First"}"#,
            expected: Some(r#"invalid data, in when: "Yesterday""#),
        },
        Case {
            name: "date too early",
            json: r#"{"when": "July 20, 1969 08:18AM", "name": "First"}"#,
            expected: Some(r#"value out of range, in when: "July 20, 1969 08:18AM""#),
        },
        Case {
            name: "missing time field",
            json: r#"{"name": "First"}"#,
            expected: Some(r#"required field missing: "when""#),
        },
    ];

    let schema = new_from::<TimeObject>().unwrap();

    for case in cases {
        let result = schema.validate(case.json);
        match case.expected {
            None => assert!(
                result.is_ok(),
                "in {:?}: unexpected error {}",
                case.name,
                result.unwrap_err()
            ),
            Some(message) => {
                let err = result.expect_err(case.name);
                assert_eq!(err.to_string(), message, "in {:?}", case.name);
            }
        }
    }
}
