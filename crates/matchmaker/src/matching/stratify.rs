use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::domain::PersonId;
use super::eligibility::EligibleCandidate;
use super::grade::Grade;

/// Per-band caps applied before supplementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandQuotas {
    pub upper: usize,
    pub same: usize,
    pub lower: usize,
}

impl BandQuotas {
    pub const fn total(&self) -> usize {
        self.upper + self.same + self.lower
    }
}

impl Default for BandQuotas {
    fn default() -> Self {
        Self {
            upper: 3,
            same: 4,
            lower: 3,
        }
    }
}

/// Position of a candidate's overall grade relative to the applicant's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    Upper,
    Same,
    Lower,
}

impl GradeBand {
    pub fn relative_to(applicant: Grade, candidate: Grade) -> Self {
        match candidate.rank().cmp(&applicant.rank()) {
            std::cmp::Ordering::Less => GradeBand::Upper,
            std::cmp::Ordering::Equal => GradeBand::Same,
            std::cmp::Ordering::Greater => GradeBand::Lower,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StratifiedSelection {
    pub upper: Vec<EligibleCandidate>,
    pub same: Vec<EligibleCandidate>,
    pub lower: Vec<EligibleCandidate>,
    /// Appended from the relaxed pool when the bands fall short.
    pub supplemental: Vec<EligibleCandidate>,
}

impl StratifiedSelection {
    pub fn len(&self) -> usize {
        self.upper.len() + self.same.len() + self.lower.len() + self.supplemental.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &PersonId) -> bool {
        self.iter().any(|candidate| candidate.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EligibleCandidate> {
        self.upper
            .iter()
            .chain(&self.same)
            .chain(&self.lower)
            .chain(&self.supplemental)
    }

    /// Upper, same, lower, then supplemental.
    pub fn into_ordered(self) -> Vec<EligibleCandidate> {
        let mut ordered = Vec::with_capacity(self.len());
        ordered.extend(self.upper);
        ordered.extend(self.same);
        ordered.extend(self.lower);
        ordered.extend(self.supplemental);
        ordered
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GradeStratifier {
    quotas: BandQuotas,
    minimum: usize,
}

impl Default for GradeStratifier {
    fn default() -> Self {
        Self::new(BandQuotas::default(), 10)
    }
}

impl GradeStratifier {
    pub fn new(quotas: BandQuotas, minimum: usize) -> Self {
        Self { quotas, minimum }
    }

    pub fn quotas(&self) -> BandQuotas {
        self.quotas
    }

    pub fn minimum(&self) -> usize {
        self.minimum
    }

    pub fn stratify(
        &self,
        applicant_grade: Grade,
        candidates: Vec<EligibleCandidate>,
    ) -> StratifiedSelection {
        let mut selection = StratifiedSelection::default();
        for candidate in candidates {
            match GradeBand::relative_to(applicant_grade, candidate.score.overall_grade()) {
                GradeBand::Upper => selection.upper.push(candidate),
                GradeBand::Same => selection.same.push(candidate),
                GradeBand::Lower => selection.lower.push(candidate),
            }
        }

        for (band, quota) in [
            (&mut selection.upper, self.quotas.upper),
            (&mut selection.same, self.quotas.same),
            (&mut selection.lower, self.quotas.lower),
        ] {
            sort_by_average_desc(band);
            band.truncate(quota);
        }
        selection
    }

    /// How many more candidates are needed to reach the minimum.
    pub fn shortfall(&self, selection: &StratifiedSelection) -> usize {
        self.minimum.saturating_sub(selection.len())
    }

    /// Top up `selection` from `relaxed` in descending average order,
    /// skipping ids already chosen. Returns how many were added.
    pub fn supplement(
        &self,
        selection: &mut StratifiedSelection,
        mut relaxed: Vec<EligibleCandidate>,
    ) -> usize {
        let needed = self.shortfall(selection);
        if needed == 0 {
            return 0;
        }

        let mut chosen: HashSet<PersonId> = selection.iter().map(|c| c.id().clone()).collect();
        sort_by_average_desc(&mut relaxed);

        let before = selection.supplemental.len();
        for candidate in relaxed {
            if selection.supplemental.len() - before == needed {
                break;
            }
            if chosen.insert(candidate.id().clone()) {
                selection.supplemental.push(candidate);
            }
        }
        selection.supplemental.len() - before
    }
}

fn sort_by_average_desc(candidates: &mut [EligibleCandidate]) {
    candidates.sort_by(|a, b| b.score.average().total_cmp(&a.score.average()));
}
