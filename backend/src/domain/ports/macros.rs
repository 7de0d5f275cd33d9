//! Helper macro generating port error enums with snake-case constructors.
//!
//! ```ignore
//! define_port_error! {
//!     pub enum LedgerPersistenceError {
//!         Connection { message: String } => "ledger connection failed: {message}",
//!     }
//! }
//! let err = LedgerPersistenceError::connection("refused");
//! ```

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
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
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor and message coverage.
    define_port_error! {
        pub enum SamplePortError {
            Unavailable => "store unavailable",
            Missing { id: i64 } => "record {id} missing",
            Rejected { reason: String, attempts: u32 } => "rejected after {attempts}: {reason}",
        }
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(SamplePortError::unavailable().to_string(), "store unavailable");
    }

    #[test]
    fn fields_accept_into_conversions() {
        assert_eq!(SamplePortError::missing(7_i32).to_string(), "record 7 missing");
        assert_eq!(
            SamplePortError::rejected("locked", 3_u8).to_string(),
            "rejected after 3: locked"
        );
    }
}
