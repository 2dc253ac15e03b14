use crate::{
    data::{
        DataType,
        department::{Department, slugify},
    },
    error::{MakeQuerySnafu, ShowcaseResult},
};
use snafu::ResultExt;
use sqlx::{FromRow, PgConnection};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub department: String,
    pub future_goal: String,
    pub final_words: String,
    pub image_url: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub department: Department,
    pub future_goal: String,
    pub final_words: String,
    pub image_url: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum StudentOrder {
    #[default]
    NewestFirst,
    ByName,
}

impl Student {
    pub fn department(&self) -> Option<Department> {
        Department::from_name(&self.department)
    }

    pub fn department_slug(&self) -> String {
        slugify(&self.department)
    }

    pub async fn get_all_ordered(
        order: StudentOrder,
        conn: &mut PgConnection,
    ) -> ShowcaseResult<Vec<Self>> {
        let query = match order {
            StudentOrder::NewestFirst => "SELECT * FROM public.students ORDER BY created_at DESC",
            StudentOrder::ByName => "SELECT * FROM public.students ORDER BY name ASC",
        };

        sqlx::query_as::<_, Self>(query)
            .fetch_all(conn)
            .await
            .context(MakeQuerySnafu)
    }

    ///ordered by name, as shown on the department pages
    pub async fn get_by_department(
        department_name: &str,
        conn: &mut PgConnection,
    ) -> ShowcaseResult<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM public.students WHERE department = $1 ORDER BY name ASC",
        )
        .bind(department_name)
        .fetch_all(conn)
        .await
        .context(MakeQuerySnafu)
    }

    pub async fn count(conn: &mut PgConnection) -> ShowcaseResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM public.students")
            .fetch_one(conn)
            .await
            .context(MakeQuerySnafu)
    }
}

impl DataType for Student {
    type Id = Uuid;
    type FormForAdding = NewStudent;

    async fn get_from_db_by_id(id: Self::Id, conn: &mut PgConnection) -> ShowcaseResult<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM public.students WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await
            .context(MakeQuerySnafu)
    }

    async fn get_all(conn: &mut PgConnection) -> ShowcaseResult<Vec<Self>> {
        Self::get_all_ordered(StudentOrder::default(), conn).await
    }

    async fn insert_into_database(
        NewStudent {
            name,
            department,
            future_goal,
            final_words,
            image_url,
        }: Self::FormForAdding,
        conn: &mut PgConnection,
    ) -> ShowcaseResult<Self::Id> {
        sqlx::query_scalar::<_, Uuid>("INSERT INTO public.students (name, department, future_goal, final_words, image_url) VALUES ($1, $2, $3, $4, $5) RETURNING id")
            .bind(name)
            .bind(department.name())
            .bind(future_goal)
            .bind(final_words)
            .bind(image_url)
            .fetch_one(conn)
            .await
            .context(MakeQuerySnafu)
    }

    ///the stored photo (if any) needs removing separately
    async fn remove_from_database(id: Self::Id, conn: &mut PgConnection) -> ShowcaseResult<()> {
        sqlx::query("DELETE FROM public.students WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await
            .context(MakeQuerySnafu)?;
        Ok(())
    }
}

/// Case-insensitive substring match on the student's name. An empty query keeps everyone.
pub fn filter_by_name<'a>(students: &'a [Student], query: &str) -> Vec<&'a Student> {
    let query = query.to_lowercase();
    students
        .iter()
        .filter(|student| student.name.to_lowercase().contains(&query))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn student(name: &str, department: Department) -> Student {
        Student {
            id: Uuid::new_v4(),
            name: name.to_string(),
            department: department.name().to_string(),
            future_goal: "Cardiologist".to_string(),
            final_words: "Thank you all.".to_string(),
            image_url: "https://example.org/a.png".to_string(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn names<'a>(students: &[&'a Student]) -> Vec<&'a str> {
        students.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let students = vec![
            student("Abebe Kassa", Department::Medicine),
            student("Hiwot Lema", Department::Nursing),
            student("Marta Kebede", Department::Midwifery),
        ];

        assert_eq!(names(&filter_by_name(&students, "KE")), vec!["Marta Kebede"]);
        assert_eq!(
            names(&filter_by_name(&students, "e")),
            vec!["Abebe Kassa", "Hiwot Lema", "Marta Kebede"]
        );
        assert_eq!(names(&filter_by_name(&students, "abebe k")), vec!["Abebe Kassa"]);
        assert!(filter_by_name(&students, "zz").is_empty());
    }

    #[test]
    fn empty_query_keeps_everyone_in_order() {
        let students = vec![
            student("Lula Hailu", Department::Medicine),
            student("Desta Bekele", Department::Nursing),
        ];
        assert_eq!(
            names(&filter_by_name(&students, "")),
            vec!["Lula Hailu", "Desta Bekele"]
        );
    }

    #[test]
    fn filter_returns_exactly_the_matching_subset() {
        let students: Vec<_> = ["Abebe", "abel", "BETHEL", "Tigist", "Yohannes", "be"]
            .into_iter()
            .map(|n| student(n, Department::Medicine))
            .collect();

        for query in ["be", "BE", "t", "nes", "", "x"] {
            let filtered = filter_by_name(&students, query);
            let expected: Vec<_> = students
                .iter()
                .filter(|s| s.name.to_lowercase().contains(&query.to_lowercase()))
                .map(|s| s.name.as_str())
                .collect();
            assert_eq!(names(&filtered), expected, "query {query:?}");
        }
    }

    #[test]
    fn department_lookup_from_row() {
        let s = student("Rahel Getnet", Department::MedicalLaboratory);
        assert_eq!(s.department(), Some(Department::MedicalLaboratory));
        assert_eq!(s.department_slug(), "medical-laboratory");
    }
}
