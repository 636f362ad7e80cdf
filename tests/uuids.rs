//! UUID fields: canonical strings and 16-byte sequences.

use conform::new_from;
use uuid::Uuid;

conform::reflect_struct! {
    #[derive(Debug, Default)]
    pub struct UuidObject {
        pub id: Uuid [validate = "required"],
        pub name: String [validate = "required,minlength=1,maxlength=100"],
    }
}

#[test]
fn test_uuid_validation() {
    let schema = new_from::<UuidObject>().unwrap();

    assert!(schema
        .validate(r#"{"id": "6ba7b810-9dad-11d1-80b4-00c04fd430c8", "name": "First"}"#)
        .is_ok());

    // A 16-byte sequence is an acceptable UUID source.
    assert!(schema
        .validate(r#"{"id": [107,167,184,16,157,173,17,209,128,180,0,192,79,212,48,200], "name": "First"}"#)
        .is_ok());

    let err = schema
        .validate(r#"{"id": "not-a-uuid", "name": "First"}"#)
        .unwrap_err();
    assert_eq!(err.to_string(), r#"invalid data, in id: "not-a-uuid""#);

    let err = schema.validate(r#"{"name": "First"}"#).unwrap_err();
    assert_eq!(err.to_string(), r#"required field missing: "id""#);
}
