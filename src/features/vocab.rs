//! Closed vocabularies for the categorical form fields.
//!
//! Each field is an enum whose variants carry the literal label shown in the
//! form and the integer code the model was trained on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EncodeError;

/// A categorical covariate with a fixed label set and numeric codes.
pub trait Vocabulary: Copy + Sized + 'static {
    /// Column name used by the model.
    const FIELD: &'static str;
    /// Every variant, in the order the form offers them.
    const ALL: &'static [Self];

    /// Literal label shown to the user.
    fn label(self) -> &'static str;

    /// Integer code fed to the model.
    fn code(self) -> u8;

    /// Look a label up in the vocabulary.
    fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.iter().copied().find(|item| item.label() == label)
    }
}

/// Parse a label for the named column, reporting `field` on failure.
pub fn parse_field<T: Vocabulary>(field: &'static str, label: &str) -> Result<T, EncodeError> {
    T::from_label(label).ok_or_else(|| EncodeError::UnknownCategory {
        field,
        value: label.to_string(),
    })
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => ($label:literal, $code:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant ),+
        }

        impl Vocabulary for $name {
            const FIELD: &'static str = $field;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            fn code(self) -> u8 {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

vocabulary! {
    /// Patient age bracket.
    AgeBracket, field = "Age" {
        /// Fifty years or older.
        FiftyPlus => ("≥50", 1),
        /// Between 18 and 49 years.
        Adult => ("18-49", 0),
    }
}

/// `FromStr` for vocabularies that belong to exactly one model column.
macro_rules! parse_as_column {
    ($($name:ident),+) => {
        $(
            impl FromStr for $name {
                type Err = EncodeError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    parse_field(Self::FIELD, s)
                }
            }
        )+
    };
}

vocabulary! {
    /// Yes/no answer shared by the `Menopause` and `PA` columns.
    ///
    /// There is no `FromStr`: parse with [`parse_field`] so errors name the
    /// column being filled in.
    YesNo, field = "Yes/No" {
        /// Present.
        Yes => ("Yes", 1),
        /// Absent.
        No => ("No", 0),
    }
}

vocabulary! {
    /// Surgical approach.
    SurgicalModality, field = "SM" {
        /// Laparoscopic surgery.
        Celioscope => ("celioscope", 1),
        /// Open abdominal surgery.
        Laparotomy => ("laparotomy", 0),
    }
}

vocabulary! {
    /// Anesthesia used during surgery.
    AnesthesiaType, field = "TOA" {
        /// Spinal or epidural anesthesia.
        Neuraxial => ("neuraxial anesthesia", 1),
        /// General anesthesia.
        General => ("general anesthesia", 0),
    }
}

vocabulary! {
    /// Pelvic organ prolapse quantification stage.
    ProlapseStage, field = "PQ" {
        Stage0 => ("0", 0),
        Stage1 => ("1", 1),
        Stage2 => ("2", 2),
        Stage3 => ("3", 3),
    }
}

parse_as_column!(AgeBracket, SurgicalModality, AnesthesiaType, ProlapseStage);

impl AgeBracket {
    /// Parse an age label, accepting `>=50` for terminals without `≥`.
    pub fn parse_lenient(label: &str) -> Result<Self, EncodeError> {
        match label.trim() {
            ">=50" => Ok(Self::FiftyPlus),
            other => other.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_training_tables() {
        assert_eq!(AgeBracket::FiftyPlus.code(), 1);
        assert_eq!(AgeBracket::Adult.code(), 0);
        assert_eq!(YesNo::Yes.code(), 1);
        assert_eq!(YesNo::No.code(), 0);
        assert_eq!(SurgicalModality::Celioscope.code(), 1);
        assert_eq!(SurgicalModality::Laparotomy.code(), 0);
        assert_eq!(AnesthesiaType::Neuraxial.code(), 1);
        assert_eq!(AnesthesiaType::General.code(), 0);
        let stages: Vec<u8> = ProlapseStage::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(stages, vec![0, 1, 2, 3]);
    }

    #[test]
    fn labels_round_trip_through_parsing() {
        for stage in ProlapseStage::ALL {
            assert_eq!(stage.label().parse::<ProlapseStage>().unwrap(), *stage);
            assert_eq!(stage.label(), stage.code().to_string());
        }
        assert_eq!("≥50".parse::<AgeBracket>().unwrap(), AgeBracket::FiftyPlus);
        assert_eq!(
            " general anesthesia ".parse::<AnesthesiaType>().unwrap(),
            AnesthesiaType::General
        );
    }

    #[test]
    fn unknown_label_names_field_and_value() {
        let err = "4".parse::<ProlapseStage>().unwrap_err();
        match err {
            EncodeError::UnknownCategory { field, value } => {
                assert_eq!(field, "PQ");
                assert_eq!(value, "4");
            }
            other => panic!("unexpected error {other:?}"),
        }
        let err = parse_field::<YesNo>("Menopause", "maybe").unwrap_err();
        assert_eq!(err.to_string(), "Unknown Menopause value \"maybe\"");
    }

    #[test]
    fn yes_no_errors_name_the_column_being_parsed() {
        let err = parse_field::<YesNo>("PA", "yes").unwrap_err();
        assert_eq!(err.to_string(), "Unknown PA value \"yes\"");
        assert!(!err.to_string().contains(YesNo::FIELD));
        assert_eq!(parse_field::<YesNo>("Menopause", "No").unwrap(), YesNo::No);
    }

    #[test]
    fn ascii_age_alias_is_accepted() {
        assert_eq!(
            AgeBracket::parse_lenient(">=50").unwrap(),
            AgeBracket::FiftyPlus
        );
        assert_eq!(AgeBracket::parse_lenient("18-49").unwrap(), AgeBracket::Adult);
        assert!(AgeBracket::parse_lenient("49").is_err());
    }

    #[test]
    fn first_option_is_form_default() {
        assert_eq!(AgeBracket::ALL[0], AgeBracket::FiftyPlus);
        assert_eq!(YesNo::ALL[0], YesNo::Yes);
        assert_eq!(SurgicalModality::ALL[0], SurgicalModality::Celioscope);
        assert_eq!(AnesthesiaType::ALL[0], AnesthesiaType::Neuraxial);
        assert_eq!(ProlapseStage::ALL[0], ProlapseStage::Stage0);
    }
}
