//! Float fields, including the f32 representable range.

use conform::new_from;

conform::reflect_struct! {
    #[derive(Debug, Default)]
    pub struct FloatObject {
        pub item32: f32 = "item32",
        pub item64: f64 = "item64",
    }
}

#[test]
fn test_float_validation() {
    let schema = new_from::<FloatObject>().unwrap();

    assert!(schema.validate(r#"{"item32": 500.25}"#).is_ok());
    assert!(schema.validate(r#"{"item64": 1.0e305}"#).is_ok());
    assert!(schema.validate(r#"{"item32": 5}"#).is_ok());
    assert!(schema.validate(r#"{"item32": "2.5"}"#).is_ok());

    let err = schema.validate(r#"{"item32": 1e305}"#).unwrap_err();
    assert_eq!(err.to_string(), r#"value out of range, in item32: "1e305""#);

    let err = schema.validate(r#"{"item32": -1e305}"#).unwrap_err();
    assert_eq!(err.kind(), conform::ErrorKind::ValueOutOfRange);

    let err = schema.validate(r#"{"item64": "wide"}"#).unwrap_err();
    assert_eq!(err.to_string(), r#"invalid data, in item64: "wide""#);
}
