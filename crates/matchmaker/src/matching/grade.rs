use serde::{Deserialize, Serialize};

/// Letter grade attached to every category score and to the overall average.
///
/// Declaration order is the quality order: `S` is the best grade and `F` the
/// worst, so the derived `Ord` sorts better grades first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    E,
    F,
}

/// Lower bounds (inclusive) for each grade, checked from the top down.
const GRADE_THRESHOLDS: [(f64, Grade); 6] = [
    (95.0, Grade::S),
    (85.0, Grade::A),
    (75.0, Grade::B),
    (65.0, Grade::C),
    (55.0, Grade::D),
    (45.0, Grade::E),
];

impl Grade {
    pub const ALL: [Grade; 7] = [
        Grade::S,
        Grade::A,
        Grade::B,
        Grade::C,
        Grade::D,
        Grade::E,
        Grade::F,
    ];

    /// Map a 0-100 score onto a grade. Anything below the `E` floor (NaN
    /// included) is an `F`.
    pub fn from_score(score: f64) -> Self {
        GRADE_THRESHOLDS
            .iter()
            .find(|(floor, _)| score >= *floor)
            .map(|(_, grade)| *grade)
            .unwrap_or(Grade::F)
    }

    /// Zero-based position in the `S..F` ordering.
    pub const fn rank(self) -> u8 {
        match self {
            Grade::S => 0,
            Grade::A => 1,
            Grade::B => 2,
            Grade::C => 3,
            Grade::D => 4,
            Grade::E => 5,
            Grade::F => 6,
        }
    }

    /// Points a grade contributes to a compatibility score.
    pub const fn compatibility_points(self) -> f64 {
        match self {
            Grade::S => 100.0,
            Grade::A => 90.0,
            Grade::B => 80.0,
            Grade::C => 60.0,
            Grade::D => 40.0,
            Grade::E => 20.0,
            Grade::F => 10.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        }
    }

    pub fn is_better_than(self, other: Grade) -> bool {
        self.rank() < other.rank()
    }
}
