use crate::infra::{in_memory_service, InMemoryMatchStore, InMemoryMatchmakingService};
use chrono::{Duration, Utc};
use clap::Args;
use matchmaker::error::AppError;
use matchmaker::matching::{
    AccountState, AccountStatus, BodyType, CategoryScorer, DrinkingHabit, Education, Evaluation,
    EvaluationImporter, Gender, Hobby, JobCategory, MatchRequest, Mbti, PersonId, Preference,
    PriorityList, Profile, Proposal, ProposalStatus, RangePreference, RecommendationPolicy,
    RecommendationRun, RequestId, RunStatus, SmokingHabit,
};
use serde::Serialize;
use std::path::PathBuf;

pub(crate) const DEMO_REQUEST: &str = "req-demo";
const DEMO_APPLICANT: &str = "applicant-demo";
const REGIONS: [&str; 3] = ["Seoul", "Incheon", "Busan"];

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of synthetic candidates to seed into the pool.
    #[arg(long, default_value_t = 24)]
    pub(crate) candidates: usize,
    /// Print both runs as JSON instead of tables.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// CSV export with one evaluation per row.
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

#[derive(Debug, Serialize)]
struct ScoredRow {
    line: u64,
    #[serde(flatten)]
    record: matchmaker::matching::ScoreRecord,
}

/// Score every row of an evaluation export and print the records as JSON.
pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let scorer = CategoryScorer::new();
    let evaluated_at = Utc::now();
    let mut scored = Vec::new();
    let mut rejected = 0usize;

    for row in EvaluationImporter::from_path(&args.csv)? {
        match scorer.record(row.person_id.clone(), &row.evaluation, None, evaluated_at) {
            Ok(record) => scored.push(ScoredRow {
                line: row.line,
                record,
            }),
            Err(err) => {
                rejected += 1;
                eprintln!("line {}: {} skipped ({err})", row.line, row.person_id);
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&scored)?);
    if rejected > 0 {
        eprintln!("{rejected} evaluation(s) rejected");
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = InMemoryMatchStore::default();
    let service = in_memory_service(&store, RecommendationPolicy::default());
    seed_demo_pool(&store, &service, args.candidates)?;

    let request = RequestId(DEMO_REQUEST.to_string());
    let first = service.recommend(&request)?;
    let second = service.recommend(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&[&first, &second])?);
        return Ok(());
    }

    println!("Matchmaking demo ({} candidates seeded)", args.candidates);
    render_run(&first);
    render_run(&second);
    Ok(())
}

fn render_run(run: &RecommendationRun) {
    match (run.status, run.batch) {
        (RunStatus::Completed, Some(batch)) => {
            println!(
                "\nBatch {batch}: {} persisted, {} failed",
                run.persisted(),
                run.failed()
            );
            println!("{:<5} {:<14} {:<6} {:>9} {:>13}", "rank", "candidate", "grade", "score", "compatibility");
            for entry in &run.entries {
                println!(
                    "{:<5} {:<14} {:<6} {:>9.2} {:>13.2}",
                    entry.rank,
                    entry.candidate_id,
                    entry.grade.label(),
                    entry.personal_score,
                    entry.compatibility_score
                );
            }
        }
        (RunStatus::MissingApplicantData { missing }, _) => {
            println!("\nRun skipped: applicant {} unavailable", missing.label());
        }
        _ => println!("\nNo eligible candidates remain for {}", run.request_id),
    }
}

/// Seed an applicant, their open request, and `candidates` scored people of
/// the opposite gender.
pub(crate) fn seed_demo_pool(
    store: &InMemoryMatchStore,
    service: &InMemoryMatchmakingService,
    candidates: usize,
) -> Result<(), AppError> {
    let applicant = PersonId(DEMO_APPLICANT.to_string());
    let applicant_eval = synthetic_evaluation(Gender::Male, 7);
    service.submit_evaluation(applicant.clone(), &applicant_eval, Some("demo".to_string()))?;
    store.add_profile(
        profile_for(&applicant, &applicant_eval, REGIONS[0]),
        AccountState::active(),
    )?;
    store.set_preferences(Preference {
        person_id: applicant.clone(),
        age: RangePreference::between(25, 36),
        height_cm: RangePreference::between(155, 175),
        regions: vec!["Seoul".to_string(), "Incheon".to_string()],
        priorities: PriorityList::parse("personality > appearance > economics"),
    })?;
    store.open_request(MatchRequest {
        id: RequestId(DEMO_REQUEST.to_string()),
        applicant: applicant.clone(),
        created_at: Utc::now() - Duration::days(1),
    })?;

    for index in 0..candidates {
        let id = PersonId(format!("cand-{:03}", index + 1));
        let evaluation = synthetic_evaluation(Gender::Female, index);
        service.submit_evaluation(id.clone(), &evaluation, Some("demo".to_string()))?;

        let account = match index % 11 {
            5 => AccountState {
                status: AccountStatus::Dormant,
                deleted_at: None,
            },
            9 => AccountState {
                status: AccountStatus::Warned,
                deleted_at: None,
            },
            _ => AccountState::active(),
        };
        store.add_profile(
            profile_for(&id, &evaluation, REGIONS[index % REGIONS.len()]),
            account,
        )?;

        if index == 2 {
            store.add_proposal(Proposal {
                id: "proposal-demo".to_string(),
                proposer: applicant.clone(),
                recipient: id,
                status: ProposalStatus::Pending,
                created_at: Utc::now(),
            })?;
        }
    }
    Ok(())
}

fn synthetic_evaluation(gender: Gender, index: usize) -> Evaluation {
    const BODIES: [BodyType; 4] = [
        BodyType::Slender,
        BodyType::Average,
        BodyType::Athletic,
        BodyType::Slim,
    ];
    const HOBBIES: [Hobby; 5] = [
        Hobby::Reading,
        Hobby::Travel,
        Hobby::Volunteering,
        Hobby::Gaming,
        Hobby::Exercise,
    ];
    const TYPES: [Mbti; 6] = [Mbti::Enfj, Mbti::Istj, Mbti::Infp, Mbti::Estp, Mbti::Esfj, Mbti::Intj];
    const JOBS: [JobCategory; 6] = [
        JobCategory::Engineer,
        JobCategory::PublicServant,
        JobCategory::SmallCompany,
        JobCategory::Professional,
        JobCategory::Freelancer,
        JobCategory::MidsizeCompany,
    ];
    const DEGREES: [Education; 4] = [
        Education::Bachelor,
        Education::Master,
        Education::Associate,
        Education::Doctorate,
    ];

    let step = index as u64;
    Evaluation {
        gender,
        face_score: (55 + (step * 7) % 45) as f64,
        height_cm: match gender {
            Gender::Female => 152 + ((step * 3) % 22) as u16,
            Gender::Male => 178,
        },
        body_type: BODIES[index % BODIES.len()],
        age: 24 + (step % 14) as u8,
        personality_rank: 1 + (step % 6) as u8,
        values_rank: 1 + ((step + 2) % 6) as u8,
        smoker: index % 7 == 3,
        hobby: HOBBIES[index % HOBBIES.len()],
        wants_children: index % 4 != 1,
        mbti: TYPES[index % TYPES.len()],
        job: JOBS[index % JOBS.len()],
        annual_income: 2_400 + ((step * 1_150) % 12_000) as u32,
        education: DEGREES[index % DEGREES.len()],
        net_assets: 800 + (step * 9_700) % 90_000,
    }
}

fn profile_for(id: &PersonId, evaluation: &Evaluation, region: &str) -> Profile {
    Profile {
        id: id.clone(),
        gender: evaluation.gender,
        age: evaluation.age,
        height_cm: evaluation.height_cm,
        body_type: evaluation.body_type,
        region: region.to_string(),
        job: evaluation.job,
        education: evaluation.education,
        religion: None,
        smoking: if evaluation.smoker {
            SmokingHabit::Smoker
        } else {
            SmokingHabit::NonSmoker
        },
        drinking: DrinkingHabit::Social,
        interests: Vec::new(),
        annual_income: evaluation.annual_income,
        net_assets: evaluation.net_assets,
        introduction: String::new(),
        photos: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchmaker::matching::RecommendationStore;

    #[test]
    fn demo_pool_supports_two_disjoint_batches() {
        let store = InMemoryMatchStore::default();
        let service = in_memory_service(&store, RecommendationPolicy::default());
        seed_demo_pool(&store, &service, 24).expect("seed demo pool");

        let request = RequestId(DEMO_REQUEST.to_string());
        let first = service.recommend(&request).expect("first batch");
        let second = service.recommend(&request).expect("second batch");

        assert_eq!(first.status, RunStatus::Completed);
        assert_eq!(first.batch, Some(1));
        assert!(first.persisted() > 0);
        assert!(second
            .entries
            .iter()
            .all(|entry| !first.entries.iter().any(|f| f.candidate_id == entry.candidate_id)));

        let log = store.list_recommendations(&request).expect("log");
        assert_eq!(log.len(), first.persisted() + second.persisted());
        assert!(log
            .iter()
            .all(|entry| entry.candidate_id.0 != "cand-003"));
    }

    #[test]
    fn small_candidate_limit_keeps_serving_new_batches() {
        let store = InMemoryMatchStore::default();
        let policy = RecommendationPolicy {
            candidate_limit: 6,
            ..RecommendationPolicy::default()
        };
        let service = in_memory_service(&store, policy);
        seed_demo_pool(&store, &service, 24).expect("seed demo pool");

        let request = RequestId(DEMO_REQUEST.to_string());
        for batch in 1..=3 {
            let run = service.recommend(&request).expect("run");
            assert_eq!(run.status, RunStatus::Completed, "batch {batch}");
            assert_eq!(run.batch, Some(batch));
            assert!(run.persisted() > 0);
        }
    }

    #[test]
    fn synthetic_evaluations_stay_in_range_for_large_pools() {
        let scorer = CategoryScorer::new();
        for index in [500_000, 5_000_000, usize::from(u16::MAX) * 100] {
            let evaluation = synthetic_evaluation(Gender::Female, index);
            assert!(scorer.validate(&evaluation).is_ok(), "index {index}");
            assert!(evaluation.net_assets < 800 + 90_000);
        }
    }

    #[test]
    fn synthetic_evaluations_are_valid() {
        let scorer = CategoryScorer::new();
        for index in 0..64 {
            let evaluation = synthetic_evaluation(Gender::Female, index);
            assert!(scorer.validate(&evaluation).is_ok(), "index {index}");
        }
    }
}
