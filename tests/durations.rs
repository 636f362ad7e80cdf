//! Duration fields, including the day-suffix extension.

use std::time::Duration;

use conform::new_from;

conform::reflect_struct! {
    #[derive(Debug, Default)]
    pub struct DurationObject {
        pub wait: Duration [validate = "required,min=1s,max=1m"],
    }
}

conform::reflect_struct! {
    #[derive(Debug, Default)]
    pub struct LongDurationObject {
        pub retention: Duration [validate = "required,min=1d,max=30d"],
    }
}

struct Case {
    name: &'static str,
    json: &'static str,
    expected: Option<&'static str>,
}

fn run<T: conform::Reflect>(cases: &[Case]) {
    let schema = new_from::<T>().unwrap();

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

#[test]
fn test_duration_validation() {
    run::<DurationObject>(&[
        Case {
            name: "valid duration",
            json: r#"{"wait": "4500ms"}"#,
            expected: None,
        },
        Case {
            name: "compound duration",
            json: r#"{"wait": "0m30s"}"#,
            expected: None,
        },
        Case {
            name: "invalid duration format",
            json: r#"{"wait": "Yesterday"}"#,
            expected: Some(r#"invalid data, in wait: "Yesterday""#),
        },
        Case {
            name: "wait too short",
            json: r#"{"wait": "15ms"}"#,
            expected: Some(r#"value out of range, in wait: "15ms""#),
        },
        Case {
            name: "wait too long",
            json: r#"{"wait": "2h"}"#,
            expected: Some(r#"value out of range, in wait: "2h""#),
        },
    ]);
}

#[test]
fn test_day_suffix_durations() {
    run::<LongDurationObject>(&[
        Case {
            name: "days accepted",
            json: r#"{"retention": "7d"}"#,
            expected: None,
        },
        Case {
            name: "days fold into hours",
            json: r#"{"retention": "48h"}"#,
            expected: None,
        },
        Case {
            name: "below one day",
            json: r#"{"retention": "23h"}"#,
            expected: Some(r#"value out of range, in retention: "23h""#),
        },
        Case {
            name: "beyond thirty days",
            json: r#"{"retention": "31d"}"#,
            expected: Some(r#"value out of range, in retention: "31d""#),
        },
    ]);
}
