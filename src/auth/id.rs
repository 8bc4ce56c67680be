//! Login identifiers: the national student number (NISN) and the school code it is paired with.

// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $rule:path) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Validates and wraps the identifier.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				Self::try_from(value.into())
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				$rule(&value)?;

				Ok(Self(value))
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

/// Digit count of a NISN.
pub const NISN_LEN: usize = 10;
/// Longest school code accepted by the backend.
pub const SCHOOL_ID_MAX_LEN: usize = 32;

/// Error returned when an identifier is malformed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The NISN contained something other than ASCII digits.
	#[error("NISN must contain digits only.")]
	NisnNotNumeric,
	/// The NISN had the wrong number of digits.
	#[error("NISN must be exactly {expected} digits, got {actual}.")]
	NisnLength {
		/// Required digit count.
		expected: usize,
		/// Digit count received.
		actual: usize,
	},
	/// The school code was empty.
	#[error("School ID cannot be empty.")]
	SchoolEmpty,
	/// The school code contained whitespace or control characters.
	#[error("School ID may only contain visible characters.")]
	SchoolInvalidChar,
	/// The school code was longer than the backend accepts.
	#[error("School ID exceeds {max} characters.")]
	SchoolTooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { StudentId, "National student number (NISN): ten ASCII digits.", "Nisn", validate_nisn }
def_id! {
	SchoolId,
	"School code paired with the NISN at login.",
	"School",
	validate_school_id
}

fn validate_nisn(value: &str) -> Result<(), IdentifierError> {
	if !value.bytes().all(|b| b.is_ascii_digit()) {
		return Err(IdentifierError::NisnNotNumeric);
	}
	if value.len() != NISN_LEN {
		return Err(IdentifierError::NisnLength { expected: NISN_LEN, actual: value.len() });
	}

	Ok(())
}

fn validate_school_id(value: &str) -> Result<(), IdentifierError> {
	if value.is_empty() {
		return Err(IdentifierError::SchoolEmpty);
	}
	if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
		return Err(IdentifierError::SchoolInvalidChar);
	}
	if value.chars().count() > SCHOOL_ID_MAX_LEN {
		return Err(IdentifierError::SchoolTooLong { max: SCHOOL_ID_MAX_LEN });
	}

	Ok(())
}
