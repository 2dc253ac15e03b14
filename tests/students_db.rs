//! Needs a real Postgres, so these only run with `DATABASE_URL` set and `--ignored`.

use showcase::{
    data::{
        DataType,
        department::Department,
        student::{NewStudent, Student, StudentOrder},
    },
    seed::{SeedReport, seed_students},
};
use sqlx::PgPool;

fn new_student(name: &str) -> NewStudent {
    NewStudent {
        name: name.to_string(),
        department: Department::MedicalLaboratory,
        future_goal: "Clinical Researcher".to_string(),
        final_words: "See you all at the lab bench.".to_string(),
        image_url: "https://storage.example.org/student-images/1700000000000-me.png".to_string(),
    }
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn created_students_show_up_intact(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let id = Student::insert_into_database(new_student("Tigist Habte"), &mut conn)
        .await
        .unwrap();

    let all = Student::get_all_ordered(StudentOrder::NewestFirst, &mut conn)
        .await
        .unwrap();
    let stored = all.iter().find(|s| s.id == id).expect("new student is listed");

    assert_eq!(stored.name, "Tigist Habte");
    assert_eq!(stored.department, "Medical Laboratory");
    assert_eq!(stored.future_goal, "Clinical Researcher");
    assert_eq!(stored.final_words, "See you all at the lab bench.");
    assert!(!stored.image_url.is_empty());

    let in_department = Student::get_by_department("Medical Laboratory", &mut conn)
        .await
        .unwrap();
    assert!(in_department.iter().any(|s| s.id == id));
    assert_eq!(Student::count(&mut conn).await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn deleted_students_are_gone(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let id = Student::insert_into_database(new_student("Girma Dinka"), &mut conn)
        .await
        .unwrap();
    Student::remove_from_database(id, &mut conn).await.unwrap();

    assert!(
        Student::get_from_db_by_id(id, &mut conn)
            .await
            .unwrap()
            .is_none()
    );
    assert!(Student::get_all(&mut conn).await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn department_pages_are_sorted_by_name(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    for name in ["Yohannes Lemma", "Almaz Bogale", "Petros Kumsa"] {
        Student::insert_into_database(new_student(name), &mut conn)
            .await
            .unwrap();
    }

    let names: Vec<_> = Student::get_by_department("Medical Laboratory", &mut conn)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Almaz Bogale", "Petros Kumsa", "Yohannes Lemma"]);
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn seeding_inserts_every_record(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let report = seed_students(&mut *conn, 5, None).await;
    assert_eq!(report, SeedReport { added: 5, failed: 0 });
    assert_eq!(Student::count(&mut conn).await.unwrap(), 5);
}
