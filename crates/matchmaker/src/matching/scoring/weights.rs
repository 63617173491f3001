//! Fixed weight vectors for the category scorer.

/// Blend of the five category scores into the overall average.
#[derive(Debug, Clone, Copy)]
pub struct OverallWeights {
    pub appearance: f64,
    pub personality: f64,
    pub job: f64,
    pub education: f64,
    pub economics: f64,
}

impl OverallWeights {
    pub fn sum(&self) -> f64 {
        self.appearance + self.personality + self.job + self.education + self.economics
    }
}

pub const OVERALL_WEIGHTS: OverallWeights = OverallWeights {
    appearance: 0.25,
    personality: 0.25,
    job: 0.2,
    education: 0.15,
    economics: 0.15,
};

#[derive(Debug, Clone, Copy)]
pub struct AppearanceWeights {
    pub face: f64,
    pub height: f64,
    pub body_type: f64,
    pub age: f64,
}

pub const APPEARANCE_WEIGHTS: AppearanceWeights = AppearanceWeights {
    face: 0.5,
    height: 0.2,
    body_type: 0.15,
    age: 0.15,
};

#[derive(Debug, Clone, Copy)]
pub struct PersonalityWeights {
    pub ideal: f64,
    pub smoking: f64,
    pub hobby: f64,
    pub children: f64,
    pub mbti: f64,
}

pub const PERSONALITY_WEIGHTS: PersonalityWeights = PersonalityWeights {
    ideal: 0.1,
    smoking: 0.2,
    hobby: 0.35,
    children: 0.15,
    mbti: 0.2,
};

/// Split between the personality-ideal and values-ideal ranks.
pub const IDEAL_RANK_BLEND: (f64, f64) = (0.7, 0.3);

#[derive(Debug, Clone, Copy)]
pub struct JobWeights {
    pub category: f64,
    pub salary: f64,
    /// Applied weight of the employer-prestige term. Zero until a prestige
    /// source exists; see [`RESERVED_EMPLOYER_PRESTIGE_WEIGHT`].
    pub employer_prestige: f64,
}

pub const JOB_WEIGHTS: JobWeights = JobWeights {
    category: 0.5,
    salary: 0.3,
    employer_prestige: 0.0,
};

/// Share of the job score held back for employer prestige.
pub const RESERVED_EMPLOYER_PRESTIGE_WEIGHT: f64 = 0.2;

#[derive(Debug, Clone, Copy)]
pub struct EconomicsWeights {
    pub assets: f64,
    pub job_category: f64,
    pub salary: f64,
}

pub const ECONOMICS_WEIGHTS: EconomicsWeights = EconomicsWeights {
    assets: 0.7,
    job_category: 0.2,
    salary: 0.1,
};
