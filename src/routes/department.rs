use crate::{
    auth::ShowcaseSession,
    data::{
        department::{Department, FALLBACK_BLURB, display_name_from_slug},
        student::{Student, filter_by_name},
    },
    error::ShowcaseResult,
    maud_conveniences::{student_card, supertitle},
    state::ShowcaseState,
};
use axum::extract::{Path, Query, State};
use maud::{Markup, html};
use serde::Deserialize;

#[derive(Deserialize, Default)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn get_department(
    State(state): State<ShowcaseState>,
    session: ShowcaseSession,
    Path(slug): Path<String>,
) -> ShowcaseResult<Markup> {
    let dept_name = display_name_from_slug(&slug);
    let students =
        Student::get_by_department(&dept_name, &mut *state.get_connection().await?).await?;
    let blurb = Department::from_slug(&slug).map_or(FALLBACK_BLURB, Department::blurb);

    Ok(state.render(&session, html! {
        div class="max-w-6xl mx-auto px-4 pt-6" {
            a href="/departments" class="text-amber-300 hover:text-amber-200" {"← Departments"}
        }

        section class="py-12 px-4" {
            (supertitle(&dept_name))
            p class="text-center text-gray-300" {(blurb)}
            p class="text-center text-gray-400 mt-2" {(students.len()) " graduating students"}
        }

        section class="px-4 pb-12" {
            div class="max-w-6xl mx-auto" {
                input type="search" name="q" placeholder="Search by student name..."
                    hx-get={"/internal/department/" (urlencoding::encode(&slug)) "/students"}
                    hx-trigger="input changed delay:200ms, search"
                    hx-target="#students"
                    class="w-full max-w-md mb-8 px-4 py-3 bg-gray-800 border border-gray-700 rounded-xl text-gray-100 placeholder-gray-500 focus:outline-none focus:border-amber-300";

                div id="students" {
                    (students_grid(&students, ""))
                }
            }
        }
    }))
}

pub async fn internal_get_department_students(
    State(state): State<ShowcaseState>,
    Path(slug): Path<String>,
    Query(SearchQuery { q }): Query<SearchQuery>,
) -> ShowcaseResult<Markup> {
    let dept_name = display_name_from_slug(&slug);
    let students =
        Student::get_by_department(&dept_name, &mut *state.get_connection().await?).await?;

    Ok(students_grid(&students, &q))
}

fn students_grid(students: &[Student], query: &str) -> Markup {
    let filtered = filter_by_name(students, query);

    html! {
        @if filtered.is_empty() {
            p class="text-center text-gray-400 py-12" {
                @if query.is_empty() {
                    "No students in this department yet."
                } @else {
                    "No students found matching your search."
                }
            }
        } @else {
            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-6" {
                @for student in filtered {
                    (student_card(student))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::student::tests::student;

    #[test]
    fn grid_shows_only_matches() {
        let students = vec![
            student("Solomon Kidane", Department::Medicine),
            student("Eleni Korsa", Department::Medicine),
        ];

        let rendered = students_grid(&students, "solo").into_string();
        assert!(rendered.contains("Solomon Kidane"));
        assert!(!rendered.contains("Eleni Korsa"));
    }

    #[test]
    fn empty_states_depend_on_the_query() {
        assert!(
            students_grid(&[], "")
                .into_string()
                .contains("No students in this department yet.")
        );

        let students = vec![student("Eleni Korsa", Department::Nursing)];
        assert!(
            students_grid(&students, "zzz")
                .into_string()
                .contains("No students found matching your search.")
        );
    }
}
