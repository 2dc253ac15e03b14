//! Demo data: plausible graduating students with generated avatar images.

use crate::{
    data::{
        DataType,
        department::Department,
        student::{NewStudent, Student},
    },
    error::ShowcaseResult,
};
use rand::Rng;
use sqlx::PgConnection;
use std::time::Duration;
use uuid::Uuid;

///how many students the admin panel's seed button adds
pub const DEMO_SEED_COUNT: usize = 24;
///default for the standalone seeder
pub const SCRIPT_SEED_COUNT: usize = 20;
pub const SCRIPT_PAUSE: Duration = Duration::from_millis(100);

const FIRST_NAMES: [&str; 24] = [
    "Abebe", "Desta", "Girma", "Hiwot", "Kanji", "Lula", "Marta", "Negus", "Oshene", "Petros",
    "Rahel", "Solomon", "Tigist", "Uta", "Workit", "Yohannes", "Zewdiw", "Almaz", "Bethel",
    "Chalachew", "Eleni", "Fisseha", "Gebreyes", "Hafte",
];

const LAST_NAMES: [&str; 24] = [
    "Addis", "Bekele", "Birru", "Bogale", "Bossa", "Defar", "Demissie", "Desta", "Dinka",
    "Fantaye", "Gebremedhin", "Getnet", "Hailu", "Habte", "Hailemariam", "Kassa", "Kebede",
    "Kebene", "Kidane", "Kinfe", "Korsa", "Kumsa", "Lema", "Lemma",
];

const FUTURE_GOALS: [&str; 14] = [
    "Specialized Surgeon",
    "Healthcare Researcher",
    "Community Health Worker",
    "Medical Administrator",
    "Emergency Medicine Specialist",
    "Public Health Officer",
    "Hospital Director",
    "Medical Educator",
    "Clinical Researcher",
    "Healthcare Consultant",
    "Cardiologist",
    "Pediatrician",
    "Oncologist",
    "Neurologist",
];

const FINAL_WORDS: [&str; 14] = [
    "Thank you for the knowledge and experiences. I will serve my community with dedication.",
    "Every challenge has made me stronger. I am ready for the future.",
    "Education is the key to progress. Let us build a better healthcare system.",
    "Proud of my journey. Grateful to my mentors and friends.",
    "The future belongs to those who believe in the beauty of their dreams.",
    "Hard work and determination lead to success. I am proof of that.",
    "Let us use our knowledge to heal and help others.",
    "This is just the beginning of my journey in healthcare.",
    "Thank you to Wolkite University for shaping my career.",
    "I will always remember my time here with pride and gratitude.",
    "My success is the result of teamwork and perseverance.",
    "I am excited to make a difference in healthcare.",
    "Forever grateful for this opportunity to learn and grow.",
    "The knowledge I gained here will guide my career.",
];

const AVATAR_BACKGROUNDS: [&str; 8] = [
    "FF6B6B", "4ECDC4", "45B7D1", "FFA07A", "98D8C8", "F7DC6F", "BB8FCE", "85C1E2",
];

pub fn avatar_url(name: &str, background: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background={background}&color=fff&size=400&bold=true",
        urlencoding::encode(name)
    )
}

fn pick<'a, R: Rng>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool[rng.random_range(0..pool.len())]
}

pub fn generate_student<R: Rng>(rng: &mut R) -> NewStudent {
    let name = format!("{} {}", pick(rng, &FIRST_NAMES), pick(rng, &LAST_NAMES));
    let department = Department::ALL[rng.random_range(0..Department::ALL.len())];
    let future_goal = pick(rng, &FUTURE_GOALS).to_string();
    let final_words = pick(rng, &FINAL_WORDS).to_string();
    let image_url = avatar_url(&name, pick(rng, &AVATAR_BACKGROUNDS));

    NewStudent {
        name,
        department,
        future_goal,
        final_words,
        image_url,
    }
}

/// Somewhere new students can be written to.
#[allow(async_fn_in_trait)]
pub trait StudentSink {
    async fn insert_student(&mut self, student: NewStudent) -> ShowcaseResult<Uuid>;
}

impl StudentSink for PgConnection {
    async fn insert_student(&mut self, student: NewStudent) -> ShowcaseResult<Uuid> {
        Student::insert_into_database(student, self).await
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub added: usize,
    pub failed: usize,
}

///every record is inserted on its own - a failed insert is logged and skipped
pub async fn seed_students<S: StudentSink + ?Sized>(
    sink: &mut S,
    count: usize,
    pause_between: Option<Duration>,
) -> SeedReport {
    let mut report = SeedReport::default();

    for _ in 0..count {
        let student = generate_student(&mut rand::rng());
        let name = student.name.clone();
        let department = student.department.name();

        match sink.insert_student(student).await {
            Ok(id) => {
                report.added += 1;
                info!(%name, %department, %id, "Added demo student");
            }
            Err(e) => {
                report.failed += 1;
                warn!(?e, %name, "Unable to add demo student, skipping");
            }
        }

        if let Some(pause) = pause_between {
            tokio::time::sleep(pause).await;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShowcaseError;
    use rand::{SeedableRng, rngs::StdRng};

    #[derive(Default)]
    struct MemorySink {
        attempts: usize,
        fail_every: Option<usize>,
        stored: Vec<NewStudent>,
    }

    impl StudentSink for MemorySink {
        async fn insert_student(&mut self, student: NewStudent) -> ShowcaseResult<Uuid> {
            self.attempts += 1;
            if self.fail_every.is_some_and(|n| self.attempts % n == 0) {
                return Err(ShowcaseError::MakeQuery {
                    source: sqlx::Error::Protocol("connection reset".into()),
                });
            }
            self.stored.push(student);
            Ok(Uuid::new_v4())
        }
    }

    #[test]
    fn generated_students_come_from_the_pools() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let student = generate_student(&mut rng);

            let (first, last) = student.name.split_once(' ').expect("first and last name");
            assert!(FIRST_NAMES.contains(&first));
            assert!(LAST_NAMES.contains(&last));
            assert!(FUTURE_GOALS.contains(&student.future_goal.as_str()));
            assert!(FINAL_WORDS.contains(&student.final_words.as_str()));
            assert!(Department::ALL.contains(&student.department));
            assert!(student.image_url.starts_with(&format!(
                "https://ui-avatars.com/api/?name={first}%20{last}&background="
            )));
        }
    }

    #[test]
    fn every_department_gets_picked_eventually() {
        let mut rng = StdRng::seed_from_u64(1);
        let seen: std::collections::HashSet<_> = (0..500)
            .map(|_| generate_student(&mut rng).department)
            .collect();
        assert_eq!(seen.len(), Department::ALL.len());
    }

    #[test]
    fn avatar_names_are_percent_encoded() {
        assert_eq!(
            avatar_url("Abebe Kassa", "FF6B6B"),
            "https://ui-avatars.com/api/?name=Abebe%20Kassa&background=FF6B6B&color=fff&size=400&bold=true"
        );
        assert!(avatar_url("A&B?c", "4ECDC4").contains("name=A%26B%3Fc&"));
    }

    #[tokio::test]
    async fn seeds_exactly_n_when_everything_succeeds() {
        let mut sink = MemorySink::default();
        let report = seed_students(&mut sink, 24, None).await;

        assert_eq!(report, SeedReport { added: 24, failed: 0 });
        assert_eq!(sink.stored.len(), 24);
    }

    #[tokio::test]
    async fn failures_are_skipped_without_aborting() {
        let mut sink = MemorySink {
            fail_every: Some(3),
            ..MemorySink::default()
        };
        let report = seed_students(&mut sink, 20, None).await;

        assert_eq!(sink.attempts, 20);
        assert_eq!(report, SeedReport { added: 14, failed: 6 });
        assert_eq!(sink.stored.len(), 14);
    }

    #[tokio::test]
    async fn zero_count_does_nothing() {
        let mut sink = MemorySink::default();
        assert_eq!(seed_students(&mut sink, 0, None).await, SeedReport::default());
        assert_eq!(sink.attempts, 0);
    }
}
