macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Implement [`Translatable`](crate::Translatable) for a plain struct.
///
/// List the fields the engine should see, in declaration order. A field may
/// carry a struct-tag string selecting its translation backend and target:
///
/// ```
/// use dict_trans::translatable;
///
/// #[derive(Default)]
/// struct User {
///     sex: String,
///     sex_name: String,
///     priority: i32,
///     priority_name: String,
/// }
///
/// translatable! {
///     User {
///         sex: r#"dict:"sex" dictField:"sex_name""#,
///         sex_name,
///         priority: r#"enum:"priority" dictField:"priority_name""#,
///         priority_name,
///     }
/// }
/// ```
///
/// Fields left out of the list are invisible to the engine: they are neither
/// traversed nor usable as `dictField` targets.
#[macro_export]
macro_rules! translatable {
    (@tag) => {
        ""
    };
    (@tag $tag:literal) => {
        $tag
    };
    (
        $ty:ty {
            $( $field:ident $(: $tag:literal)? ),* $(,)?
        }
    ) => {
        impl $crate::Translatable for $ty {
            fn fields(&self) -> &'static [$crate::FieldDef] {
                static FIELDS: &[$crate::FieldDef] = &[
                    $( $crate::FieldDef { name: stringify!($field), tag: $crate::translatable!(@tag $($tag)?) } ),*
                ];
                FIELDS
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn field_mut(&mut self, index: usize) -> Option<$crate::Slot<'_>> {
                let mut position = 0usize;
                $(
                    if index == position {
                        return Some($crate::AsSlot::as_slot(&mut self.$field));
                    }
                    position += 1;
                )*
                None
            }
        }
    };
}
