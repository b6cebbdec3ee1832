//! labeled::label — typed coordinate labels.
//!
//! Coordinate values (case names, season codes, years, time stamps) are kept
//! as a closed tagged union instead of an untyped scalar so that group keys,
//! synthesized case names, and concatenated index coordinates stay
//! comparable and hashable.

use chrono::NaiveDate;

/// A single coordinate value.
///
/// Ordering is total: labels of different kinds order by kind
/// (`Str < Int < Date`), labels of the same kind by value. Grouping relies
/// on this ordering to enumerate groups deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    Str(String),
    Int(i64),
    Date(NaiveDate),
}

impl Label {
    /// Borrow the string payload, if this is a string label.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Label::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Str(s) => write!(f, "{s}"),
            Label::Int(i) => write!(f, "{i}"),
            Label::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Str(value.to_string())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Str(value)
    }
}

impl From<&String> for Label {
    fn from(value: &String) -> Self {
        Label::Str(value.clone())
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Label::Int(value)
    }
}

impl From<i32> for Label {
    fn from(value: i32) -> Self {
        Label::Int(i64::from(value))
    }
}

impl From<NaiveDate> for Label {
    fn from(value: NaiveDate) -> Self {
        Label::Date(value)
    }
}

/// Build a vector of labels from anything convertible into [`Label`].
pub fn labels<I, L>(values: I) -> Vec<Label>
where
    I: IntoIterator<Item = L>,
    L: Into<Label>,
{
    values.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Check that labels order by kind first and by value within a kind, so
    // sorted group keys are deterministic across mixed inputs.
    //
    // Given
    // -----
    // - A shuffled mix of string, integer, and date labels.
    //
    // Expect
    // ------
    // - Sorting yields strings (alphabetical), then ints, then dates.
    fn label_ordering_is_kind_then_value() {
        // Arrange
        let d = NaiveDate::from_ymd_opt(2001, 3, 1).expect("valid date");
        let mut v = vec![Label::Date(d), Label::Int(2), Label::from("MAM"), Label::Int(-1)];
        v.push(Label::from("DJF"));

        // Act
        v.sort();

        // Assert
        assert_eq!(
            v,
            vec![
                Label::from("DJF"),
                Label::from("MAM"),
                Label::Int(-1),
                Label::Int(2),
                Label::Date(d)
            ]
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify the `Display` rendering used in synthesized case names and
    // error messages.
    //
    // Given
    // -----
    // - One label of each kind.
    //
    // Expect
    // ------
    // - Strings render verbatim, ints in decimal, dates as ISO `YYYY-MM-DD`.
    fn label_display_renders_each_kind() {
        // Arrange
        let d = NaiveDate::from_ymd_opt(1995, 12, 1).expect("valid date");

        // Act / Assert
        assert_eq!(Label::from("ssp1").to_string(), "ssp1");
        assert_eq!(Label::Int(42).to_string(), "42");
        assert_eq!(Label::Date(d).to_string(), "1995-12-01");
    }
}
