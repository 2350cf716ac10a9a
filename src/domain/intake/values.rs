//! Canonical categorical values produced by the field normalizers.
//!
//! Each value serializes to the exact category string used by the
//! classifier's training schema.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a categorical value enum with its canonical string per variant.
macro_rules! canonical_value {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Canonical category string.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

canonical_value!(
    /// Three-valued answer to a yes/no question.
    YesNo {
        Yes => "yes",
        No => "no",
        NotSure => "not sure",
    }
);

canonical_value!(
    /// Yes/no answer collapsed to two values; anything but yes is "No".
    BinaryAnswer {
        Yes => "Yes",
        No => "No",
    }
);

canonical_value!(
    Gender {
        Male => "Male",
        Female => "Female",
        Ambiguous => "Ambiguous",
    }
);

canonical_value!(
    /// Birth asphyxia record; "No record" is distinct from "Not available".
    BirthAsphyxia {
        Yes => "Yes",
        NoRecord => "No record",
        NotAvailable => "Not available",
    }
);

canonical_value!(
    /// Whether an autopsy or family history shows a birth defect.
    DefectPresence {
        None => "None",
        Yes => "Yes",
    }
);

canonical_value!(
    BloodTestResult {
        Normal => "normal",
        SlightlyAbnormal => "slightly abnormal",
        Inconclusive => "inconclusive",
    }
);

canonical_value!(
    RespiratoryRate {
        Normal => "Normal (30-60)",
        Tachypnea => "Tachypnea",
    }
);

canonical_value!(
    HeartRate {
        Normal => "Normal",
        Tachycardia => "Tachycardia",
    }
);

canonical_value!(
    /// Yes/no answer as re-normalized when assembling classifier features.
    ReportedAnswer {
        Yes => "Yes",
        No => "No",
        NotAvailable => "Not available",
    }
);

impl BinaryAnswer {
    /// True for `Yes`.
    pub fn is_yes(&self) -> bool {
        matches!(self, BinaryAnswer::Yes)
    }
}
