use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::priority::PriorityList;
use super::scoring::ScoreRecord;

/// Identifier wrapper for people known to the profile store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub String);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for an applicant's match-seeking request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Case-insensitive label lookup shared by the enums parsed from CSV exports.
pub trait Labelled: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn parse_label(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|value| value.label().eq_ignore_ascii_case(raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn opposite(self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }
}

impl Labelled for Gender {
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female];

    fn label(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    Slim,
    Slender,
    Average,
    Athletic,
    Muscular,
    Glamorous,
    Chubby,
}

impl Labelled for BodyType {
    const ALL: &'static [Self] = &[
        BodyType::Slim,
        BodyType::Slender,
        BodyType::Average,
        BodyType::Athletic,
        BodyType::Muscular,
        BodyType::Glamorous,
        BodyType::Chubby,
    ];

    fn label(self) -> &'static str {
        match self {
            BodyType::Slim => "slim",
            BodyType::Slender => "slender",
            BodyType::Average => "average",
            BodyType::Athletic => "athletic",
            BodyType::Muscular => "muscular",
            BodyType::Glamorous => "glamorous",
            BodyType::Chubby => "chubby",
        }
    }
}

/// Dominant hobby tag recorded by the evaluating manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hobby {
    Volunteering,
    SelfImprovement,
    Reading,
    Walking,
    Exercise,
    Travel,
    Music,
    Cooking,
    Gaming,
    Other,
}

impl Labelled for Hobby {
    const ALL: &'static [Self] = &[
        Hobby::Volunteering,
        Hobby::SelfImprovement,
        Hobby::Reading,
        Hobby::Walking,
        Hobby::Exercise,
        Hobby::Travel,
        Hobby::Music,
        Hobby::Cooking,
        Hobby::Gaming,
        Hobby::Other,
    ];

    fn label(self) -> &'static str {
        match self {
            Hobby::Volunteering => "volunteering",
            Hobby::SelfImprovement => "self_improvement",
            Hobby::Reading => "reading",
            Hobby::Walking => "walking",
            Hobby::Exercise => "exercise",
            Hobby::Travel => "travel",
            Hobby::Music => "music",
            Hobby::Cooking => "cooking",
            Hobby::Gaming => "gaming",
            Hobby::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mbti {
    Intj,
    Intp,
    Entj,
    Entp,
    Infj,
    Infp,
    Enfj,
    Enfp,
    Istj,
    Isfj,
    Estj,
    Esfj,
    Istp,
    Isfp,
    Estp,
    Esfp,
    Other,
}

impl Labelled for Mbti {
    const ALL: &'static [Self] = &[
        Mbti::Intj,
        Mbti::Intp,
        Mbti::Entj,
        Mbti::Entp,
        Mbti::Infj,
        Mbti::Infp,
        Mbti::Enfj,
        Mbti::Enfp,
        Mbti::Istj,
        Mbti::Isfj,
        Mbti::Estj,
        Mbti::Esfj,
        Mbti::Istp,
        Mbti::Isfp,
        Mbti::Estp,
        Mbti::Esfp,
        Mbti::Other,
    ];

    fn label(self) -> &'static str {
        match self {
            Mbti::Intj => "INTJ",
            Mbti::Intp => "INTP",
            Mbti::Entj => "ENTJ",
            Mbti::Entp => "ENTP",
            Mbti::Infj => "INFJ",
            Mbti::Infp => "INFP",
            Mbti::Enfj => "ENFJ",
            Mbti::Enfp => "ENFP",
            Mbti::Istj => "ISTJ",
            Mbti::Isfj => "ISFJ",
            Mbti::Estj => "ESTJ",
            Mbti::Esfj => "ESFJ",
            Mbti::Istp => "ISTP",
            Mbti::Isfp => "ISFP",
            Mbti::Estp => "ESTP",
            Mbti::Esfp => "ESFP",
            Mbti::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobCategory {
    Professional,
    PublicServant,
    LargeCorporation,
    Finance,
    Engineer,
    MidsizeCompany,
    SmallCompany,
    SelfEmployed,
    Startup,
    Freelancer,
    Student,
    Unemployed,
    Other,
}

impl Labelled for JobCategory {
    const ALL: &'static [Self] = &[
        JobCategory::Professional,
        JobCategory::PublicServant,
        JobCategory::LargeCorporation,
        JobCategory::Finance,
        JobCategory::Engineer,
        JobCategory::MidsizeCompany,
        JobCategory::SmallCompany,
        JobCategory::SelfEmployed,
        JobCategory::Startup,
        JobCategory::Freelancer,
        JobCategory::Student,
        JobCategory::Unemployed,
        JobCategory::Other,
    ];

    fn label(self) -> &'static str {
        match self {
            JobCategory::Professional => "professional",
            JobCategory::PublicServant => "public_servant",
            JobCategory::LargeCorporation => "large_corporation",
            JobCategory::Finance => "finance",
            JobCategory::Engineer => "engineer",
            JobCategory::MidsizeCompany => "midsize_company",
            JobCategory::SmallCompany => "small_company",
            JobCategory::SelfEmployed => "self_employed",
            JobCategory::Startup => "startup",
            JobCategory::Freelancer => "freelancer",
            JobCategory::Student => "student",
            JobCategory::Unemployed => "unemployed",
            JobCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Education {
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl Labelled for Education {
    const ALL: &'static [Self] = &[
        Education::HighSchool,
        Education::Associate,
        Education::Bachelor,
        Education::Master,
        Education::Doctorate,
    ];

    fn label(self) -> &'static str {
        match self {
            Education::HighSchool => "high_school",
            Education::Associate => "associate",
            Education::Bachelor => "bachelor",
            Education::Master => "master",
            Education::Doctorate => "doctorate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokingHabit {
    NonSmoker,
    Occasional,
    Smoker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrinkingHabit {
    Never,
    Social,
    Regular,
}

/// Profile attributes owned by the profile store. Monetary fields are
/// expressed in units of ten thousand of the local currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: PersonId,
    pub gender: Gender,
    pub age: u8,
    pub height_cm: u16,
    pub body_type: BodyType,
    pub region: String,
    pub job: JobCategory,
    pub education: Education,
    #[serde(default)]
    pub religion: Option<String>,
    pub smoking: SmokingHabit,
    pub drinking: DrinkingHabit,
    #[serde(default)]
    pub interests: Vec<String>,
    pub annual_income: u32,
    pub net_assets: u64,
    #[serde(default)]
    pub introduction: String,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Inclusive bounds; an unset side imposes no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangePreference<T> {
    #[serde(default)]
    pub min: Option<T>,
    #[serde(default)]
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> RangePreference<T> {
    pub fn between(min: T, max: T) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn admits(&self, value: T) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// What a person is looking for in a partner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    pub person_id: PersonId,
    #[serde(default)]
    pub age: RangePreference<u8>,
    #[serde(default)]
    pub height_cm: RangePreference<u16>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub priorities: PriorityList,
}

impl Preference {
    pub fn admits_region(&self, region: &str) -> bool {
        self.regions.is_empty()
            || self
                .regions
                .iter()
                .any(|wanted| wanted.trim().eq_ignore_ascii_case(region.trim()))
    }
}

/// Account lifecycle flags mirrored from the user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Warned,
    Suspended,
    Dormant,
    Withdrawn,
}

impl AccountStatus {
    /// Healthy and warned accounts remain recommendable.
    pub const fn is_recommendable(self) -> bool {
        matches!(self, AccountStatus::Active | AccountStatus::Warned)
    }

    pub const fn label(self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Warned => "warned",
            AccountStatus::Suspended => "suspended",
            AccountStatus::Dormant => "dormant",
            AccountStatus::Withdrawn => "withdrawn",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    pub status: AccountStatus,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl AccountState {
    pub fn active() -> Self {
        Self {
            status: AccountStatus::Active,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Joined row returned by candidate pool queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub profile: Profile,
    pub account: AccountState,
    #[serde(default)]
    pub score: Option<ScoreRecord>,
}

/// A match-seeking request opened on behalf of an applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub id: RequestId,
    pub applicant: PersonId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Accepted,
    Refused,
    Cancelled,
}

/// Introduction proposal exchanged between two people.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: String,
    pub proposer: PersonId,
    pub recipient: PersonId,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
}

impl Proposal {
    /// The other party when `person` is one side of the proposal.
    pub fn counterpart_of(&self, person: &PersonId) -> Option<&PersonId> {
        if &self.proposer == person {
            Some(&self.recipient)
        } else if &self.recipient == person {
            Some(&self.proposer)
        } else {
            None
        }
    }
}
