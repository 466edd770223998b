//! Blood group and location value types shared by users, donations and
//! matches.
//!
//! Both are free text in the wire format. Blood groups compare exactly
//! (`"A+" != "a+"`); locations compare case-insensitively by substring.

use std::fmt;

/// Validation errors for [`BloodGroup`] and [`Location`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BloodProfileValidationError {
    /// The blood group was blank once trimmed.
    #[error("blood group must not be empty")]
    EmptyBloodGroup,
    /// The location was blank once trimmed.
    #[error("location must not be empty")]
    EmptyLocation,
}

/// Blood group label such as `O+` or `AB-`.
///
/// Surrounding whitespace is removed; the remaining text is kept verbatim and
/// compared case-sensitively.
///
/// # Examples
/// ```
/// use bloodmatch::domain::BloodGroup;
///
/// let group = BloodGroup::new(" O+ ").expect("valid blood group");
/// assert_eq!(group.as_ref(), "O+");
/// assert_ne!(group, BloodGroup::new("o+").expect("valid blood group"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BloodGroup(String);

impl BloodGroup {
    /// Validate and construct a blood group.
    pub fn new(value: impl AsRef<str>) -> Result<Self, BloodProfileValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BloodProfileValidationError::EmptyBloodGroup);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BloodGroup {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<BloodGroup> for String {
    fn from(value: BloodGroup) -> Self {
        value.0
    }
}

/// Free-text location, typically a city or neighbourhood.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location(String);

impl Location {
    /// Validate and construct a location.
    pub fn new(value: impl AsRef<str>) -> Result<Self, BloodProfileValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BloodProfileValidationError::EmptyLocation);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Whether `needle` occurs in this location, ignoring case.
    ///
    /// # Examples
    /// ```
    /// use bloodmatch::domain::Location;
    ///
    /// let location = Location::new("Downtown Springfield").expect("valid location");
    /// assert!(location.contains_ignore_case("springfield"));
    /// assert!(!location.contains_ignore_case("Shelbyville"));
    /// ```
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(&needle.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Location {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Location> for String {
    fn from(value: Location) -> Self {
        value.0
    }
}
