//! Helper macro for declaring driven-port error enums.
//!
//! Each generated enum derives `thiserror::Error`, gets one snake_case
//! constructor per variant (fields accept `impl Into<T>`), and a `kind()`
//! label suitable for structured log fields.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = "Construct the `" $variant "` variant."]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_fields $variant [] [] $( $field : $ty, )*);
    };

    (@ctor_fields $variant:ident [$($params:tt)*] [$($inits:tt)*]) => {
        ::paste::paste! {
            #[doc = "Construct the `" $variant "` variant."]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_fields $variant:ident [$($params:tt)*] [$($inits:tt)*] $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_fields
            $variant
            [$($params)* $field: impl Into<$ty>,]
            [$($inits)* $field: $field.into(),]
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// Snake_case name of the variant, for log fields.
            pub fn kind(&self) -> &'static str {
                ::paste::paste! {
                    match self {
                        $( Self::$variant { .. } => stringify!([<$variant:snake>]), )*
                    }
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for the generated constructors.

    define_port_error! {
        pub enum ReminderPortError {
            Unreachable => "relay unreachable",
            Rejected { status: u16, message: String } => "rejected with {status}: {message}",
            Query { message: String } => "query failed: {message}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        let err = ReminderPortError::unreachable();
        assert_eq!(err, ReminderPortError::Unreachable);
        assert_eq!(err.to_string(), "relay unreachable");
    }

    #[test]
    fn string_fields_accept_str() {
        let err = ReminderPortError::query("timeout");
        assert_eq!(err.to_string(), "query failed: timeout");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = ReminderPortError::rejected(503_u16, "busy");
        assert_eq!(err.to_string(), "rejected with 503: busy");
    }

    #[test]
    fn kind_reports_snake_case_variant_name() {
        assert_eq!(ReminderPortError::unreachable().kind(), "unreachable");
        assert_eq!(ReminderPortError::rejected(500_u16, "x").kind(), "rejected");
    }
}
