use crate::error::{ConfigError, ParseResult};

/// A value that can be written into the store as text.
///
/// Booleans are written `true`/`false`, integers in base 10, floats in the
/// shortest text that reads back to the same value, and strings verbatim.
pub trait ConfigValue {
    /// Canonical text for this value
    fn to_config_string(&self) -> String;
}

/// A value that can be read back from its stored text.
///
/// Text that does not convert is a [`ConfigError::TypeError`] rather than a
/// silent default.
///
/// ```rust
/// use tinyconf::{ConfigValue, FromConfigValue};
///
/// assert_eq!(3.5f64.to_config_string(), "3.5");
/// assert_eq!(bool::from_config_str("true").unwrap(), true);
/// assert!(i32::from_config_str("12abc").is_err());
/// ```
pub trait FromConfigValue: Sized {
    /// Read a value back from its text
    fn from_config_str(text: &str) -> ParseResult<Self>;
}

macro_rules! impl_numeric_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ConfigValue for $ty {
                fn to_config_string(&self) -> String {
                    self.to_string()
                }
            }

            impl FromConfigValue for $ty {
                fn from_config_str(text: &str) -> ParseResult<Self> {
                    text.trim()
                        .parse::<$ty>()
                        .map_err(|_| ConfigError::type_error("", stringify!($ty), text))
                }
            }
        )*
    };
}

// Rust's float formatting is already the shortest round-trip form, which
// is at least as exact as printing 17 (f64) or 9 (f32) significant digits.
impl_numeric_value!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

impl ConfigValue for bool {
    fn to_config_string(&self) -> String {
        let text = if *self { "true" } else { "false" };
        text.to_string()
    }
}

impl FromConfigValue for bool {
    fn from_config_str(text: &str) -> ParseResult<Self> {
        match text.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ConfigError::type_error("", "bool", text)),
        }
    }
}

impl ConfigValue for char {
    fn to_config_string(&self) -> String {
        self.to_string()
    }
}

impl FromConfigValue for char {
    fn from_config_str(text: &str) -> ParseResult<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ConfigError::type_error("", "char", text)),
        }
    }
}

impl ConfigValue for str {
    fn to_config_string(&self) -> String {
        self.to_string()
    }
}

impl ConfigValue for String {
    fn to_config_string(&self) -> String {
        self.clone()
    }
}

impl FromConfigValue for String {
    fn from_config_str(text: &str) -> ParseResult<Self> {
        Ok(text.to_string())
    }
}

impl<T: ConfigValue + ?Sized> ConfigValue for &T {
    fn to_config_string(&self) -> String {
        (**self).to_config_string()
    }
}
