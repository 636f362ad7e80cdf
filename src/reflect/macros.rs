//! The `reflect_struct!` macro: defines a struct and derives its schema.

/// Define a struct and implement [`Reflect`](crate::Reflect) for it.
///
/// Each field may carry a JSON name override (`= "jsonName"`) and one or
/// more named tag strings in brackets. At derivation time the tag whose
/// name matches the configured tag name (default `validate`, see
/// [`set_tag_name`](crate::set_tag_name)) is applied through the tag
/// parser:
///
/// ```
/// use conform::{new_from, Kind};
///
/// conform::reflect_struct! {
///     #[derive(Debug, Default)]
///     pub struct Address {
///         pub street: String [validate = "required,minlength=1,maxlength=100"],
///         pub city: String [validate = "required,minlength=1,maxlength=100"],
///     }
/// }
///
/// let schema = new_from::<Address>().unwrap();
/// assert_eq!(schema.kind, Kind::Struct);
/// assert!(schema.fields[0].required);
/// ```
///
/// Recursion through the struct's own name is broken by an alias shell
/// stored in the dictionary before the fields are derived.
#[macro_export]
macro_rules! reflect_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty
                $(= $json_name:literal)?
                $([ $($tag_key:ident = $tag_value:literal),+ $(,)? ])?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $field_ty,
            )*
        }

        impl $crate::Reflect for $name {
            fn reflect_at(depth: usize) -> Result<$crate::Item, $crate::ValidationError> {
                $crate::reflect::build_struct_schema(stringify!($name), depth, |depth| {
                    let mut fields: Vec<$crate::Item> = Vec::new();
                    $(
                        let mut field = <$field_ty as $crate::Reflect>::reflect_at(depth + 1)?;

                        let _field_name = stringify!($field);
                        $(
                            let _field_name = $json_name;
                        )?
                        field.set_name(_field_name);

                        $(
                            let tag_name = $crate::reflect::tag_name();
                            $(
                                if tag_name == stringify!($tag_key) {
                                    field.parse_tag($tag_value)?;
                                }
                            )+
                        )?

                        fields.push(field);
                    )*
                    Ok(fields)
                })
            }
        }
    };
}
