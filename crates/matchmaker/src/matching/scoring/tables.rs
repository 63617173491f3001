//! Lookup tables backing the category scorer.
//!
//! Range tables are kept exactly as the product team supplied them: some
//! ranges overlap and some values fall through to a default. Do not sort or
//! "repair" them without sign-off.

use crate::matching::domain::{BodyType, Education, Gender, Hobby, JobCategory, Mbti};

/// Inclusive numeric range; `max: None` is open-ended.
#[derive(Debug, Clone, Copy)]
pub struct ScoreRange {
    pub min: u64,
    pub max: Option<u64>,
    pub score: f64,
}

impl ScoreRange {
    const fn new(min: u64, max: Option<u64>, score: f64) -> Self {
        Self { min, max, score }
    }

    pub fn contains(&self, value: u64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

/// First matching range wins. When nothing matches, the final entry of the
/// table is the fallback.
pub fn score_by_range(table: &[ScoreRange], value: u64) -> f64 {
    table
        .iter()
        .find(|range| range.contains(value))
        .or_else(|| table.last())
        .map(|range| range.score)
        .unwrap_or(0.0)
}

/// Step table where the last matching range wins, with an explicit default.
#[derive(Debug, Clone, Copy)]
pub struct StepTable {
    pub ranges: &'static [ScoreRange],
    pub default: f64,
}

impl StepTable {
    pub fn lookup(&self, value: u64) -> f64 {
        self.ranges
            .iter()
            .rev()
            .find(|range| range.contains(value))
            .map(|range| range.score)
            .unwrap_or(self.default)
    }
}

const MALE_HEIGHT: StepTable = StepTable {
    ranges: &[
        ScoreRange::new(0, Some(164), 50.0),
        ScoreRange::new(165, Some(169), 60.0),
        ScoreRange::new(170, Some(174), 70.0),
        ScoreRange::new(175, Some(182), 80.0),
        ScoreRange::new(178, Some(182), 90.0),
        ScoreRange::new(183, Some(192), 100.0),
        ScoreRange::new(193, Some(200), 90.0),
    ],
    default: 60.0,
};

const FEMALE_HEIGHT: StepTable = StepTable {
    ranges: &[
        ScoreRange::new(0, Some(149), 50.0),
        ScoreRange::new(150, Some(154), 60.0),
        ScoreRange::new(155, Some(159), 70.0),
        ScoreRange::new(160, Some(169), 90.0),
        ScoreRange::new(163, Some(167), 100.0),
        ScoreRange::new(170, Some(174), 90.0),
        ScoreRange::new(175, Some(185), 80.0),
    ],
    default: 60.0,
};

const MALE_AGE: StepTable = StepTable {
    ranges: &[
        ScoreRange::new(20, Some(24), 80.0),
        ScoreRange::new(25, Some(29), 90.0),
        ScoreRange::new(30, Some(34), 100.0),
        ScoreRange::new(35, Some(39), 90.0),
        ScoreRange::new(40, Some(44), 70.0),
        ScoreRange::new(45, Some(49), 60.0),
        ScoreRange::new(50, Some(59), 50.0),
    ],
    default: 40.0,
};

const FEMALE_AGE: StepTable = StepTable {
    ranges: &[
        ScoreRange::new(20, Some(24), 90.0),
        ScoreRange::new(25, Some(29), 100.0),
        ScoreRange::new(30, Some(34), 90.0),
        ScoreRange::new(35, Some(39), 70.0),
        ScoreRange::new(40, Some(44), 60.0),
        ScoreRange::new(45, Some(49), 50.0),
    ],
    default: 40.0,
};

/// Annual income, in units of ten thousand.
pub const SALARY_RANGES: &[ScoreRange] = &[
    ScoreRange::new(15_000, None, 100.0),
    ScoreRange::new(10_000, Some(14_999), 95.0),
    ScoreRange::new(7_000, Some(9_999), 85.0),
    ScoreRange::new(5_000, Some(6_999), 75.0),
    ScoreRange::new(3_500, Some(4_999), 65.0),
    ScoreRange::new(2_500, Some(3_499), 55.0),
    ScoreRange::new(0, Some(2_499), 45.0),
];

/// Net assets, in units of ten thousand.
pub const ASSET_RANGES: &[ScoreRange] = &[
    ScoreRange::new(100_000, None, 100.0),
    ScoreRange::new(50_000, Some(99_999), 90.0),
    ScoreRange::new(30_000, Some(49_999), 80.0),
    ScoreRange::new(15_000, Some(29_999), 70.0),
    ScoreRange::new(5_000, Some(14_999), 60.0),
    ScoreRange::new(1_000, Some(4_999), 50.0),
    ScoreRange::new(0, Some(999), 40.0),
];

pub fn height_score(gender: Gender, height_cm: u16) -> f64 {
    let table = match gender {
        Gender::Male => MALE_HEIGHT,
        Gender::Female => FEMALE_HEIGHT,
    };
    table.lookup(u64::from(height_cm))
}

pub fn age_score(gender: Gender, age: u8) -> f64 {
    let table = match gender {
        Gender::Male => MALE_AGE,
        Gender::Female => FEMALE_AGE,
    };
    table.lookup(u64::from(age))
}

pub fn body_type_score(body_type: BodyType) -> f64 {
    match body_type {
        BodyType::Athletic => 100.0,
        BodyType::Muscular | BodyType::Glamorous => 95.0,
        BodyType::Slender => 90.0,
        BodyType::Slim => 85.0,
        BodyType::Average => 80.0,
        BodyType::Chubby => 60.0,
    }
}

/// Rank 1 scores 100 and each following rank 10 less, floored at 50.
pub fn ideal_rank_score(rank: u8) -> f64 {
    match rank {
        1..=5 => 110.0 - 10.0 * f64::from(rank),
        _ => 50.0,
    }
}

pub fn hobby_score(hobby: Hobby) -> f64 {
    match hobby {
        Hobby::Volunteering => 100.0,
        Hobby::SelfImprovement | Hobby::Reading | Hobby::Walking => 90.0,
        Hobby::Gaming => 60.0,
        _ => 80.0,
    }
}

pub fn mbti_score(mbti: Mbti) -> f64 {
    match mbti {
        Mbti::Enfj => 100.0,
        Mbti::Infj | Mbti::Enfp => 95.0,
        Mbti::Infp | Mbti::Esfj | Mbti::Isfj => 90.0,
        Mbti::Entj | Mbti::Intj | Mbti::Estj | Mbti::Istj => 85.0,
        Mbti::Entp | Mbti::Intp | Mbti::Esfp | Mbti::Isfp => 80.0,
        Mbti::Estp | Mbti::Istp => 75.0,
        Mbti::Other => 70.0,
    }
}

pub fn job_category_score(job: JobCategory) -> f64 {
    match job {
        JobCategory::Professional => 100.0,
        JobCategory::PublicServant | JobCategory::LargeCorporation | JobCategory::Finance => 90.0,
        JobCategory::Engineer => 85.0,
        JobCategory::MidsizeCompany => 75.0,
        JobCategory::SelfEmployed | JobCategory::Startup => 70.0,
        JobCategory::SmallCompany => 65.0,
        JobCategory::Freelancer => 60.0,
        JobCategory::Student | JobCategory::Other => 50.0,
        JobCategory::Unemployed => 30.0,
    }
}

/// Job categories weighed for earning stability rather than standing.
pub fn economics_job_score(job: JobCategory) -> f64 {
    match job {
        JobCategory::Professional => 100.0,
        JobCategory::SelfEmployed | JobCategory::Finance => 90.0,
        JobCategory::LargeCorporation => 85.0,
        JobCategory::PublicServant | JobCategory::Engineer => 80.0,
        JobCategory::MidsizeCompany => 70.0,
        JobCategory::Startup => 65.0,
        JobCategory::SmallCompany | JobCategory::Freelancer => 60.0,
        JobCategory::Other => 50.0,
        JobCategory::Student => 40.0,
        JobCategory::Unemployed => 20.0,
    }
}

pub fn education_score(education: Education) -> f64 {
    match education {
        Education::Doctorate => 100.0,
        Education::Master => 90.0,
        Education::Bachelor => 80.0,
        Education::Associate => 65.0,
        Education::HighSchool => 50.0,
    }
}
