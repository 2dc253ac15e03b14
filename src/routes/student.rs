use crate::{
    auth::ShowcaseSession,
    data::{
        DataType,
        department::{Department, FALLBACK_ACCENT},
        student::Student,
    },
    error::ShowcaseResult,
    state::ShowcaseState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use uuid::Uuid;

pub async fn get_student(
    State(state): State<ShowcaseState>,
    session: ShowcaseSession,
    Path(id): Path<String>,
) -> ShowcaseResult<Response> {
    //a malformed id can't match anyone, so it gets the same page as a missing one
    let student = match Uuid::parse_str(&id) {
        Ok(id) => Student::get_from_db_by_id(id, &mut *state.get_connection().await?).await?,
        Err(_) => None,
    };

    let Some(student) = student else {
        debug!(?id, "Student not found");
        return Ok((
            StatusCode::NOT_FOUND,
            state.render(&session, student_not_found()),
        )
            .into_response());
    };

    Ok(state.render(&session, student_profile(&student)).into_response())
}

fn student_not_found() -> Markup {
    html! {
        section class="py-24 px-4 text-center" {
            h1 class="text-3xl font-bold text-amber-300 mb-4" {"Student not found"}
            a href="/departments" class="text-amber-300 hover:text-amber-200" {"← Back to departments"}
        }
    }
}

fn student_profile(student: &Student) -> Markup {
    let dept_href = format!("/department/{}", student.department_slug());
    let accent = student.department().map_or(FALLBACK_ACCENT, Department::accent);

    html! {
        div class="max-w-4xl mx-auto px-4 pt-6" {
            a href=(dept_href) class="text-amber-300 hover:text-amber-200" {"← " (student.department)}
        }

        section class={"max-w-4xl mx-auto my-10 p-6 rounded-2xl grid grid-cols-1 md:grid-cols-2 gap-8 bg-gradient-to-br " (accent)} {
            @if !student.image_url.is_empty() {
                img src=(student.image_url) alt=(student.name) class="w-full rounded-2xl object-cover shadow-lg";
            }

            div class="flex flex-col" {
                h1 class="text-4xl font-bold mb-2" {(student.name)}
                a href=(dept_href) class="text-amber-300 hover:text-amber-200 mb-6" {(student.department)}

                div class="mb-6" {
                    h2 class="text-sm uppercase tracking-wide text-gray-400 mb-1" {"Future Goal"}
                    p class="text-lg" {
                        @if student.future_goal.is_empty() {
                            "—"
                        } @else {
                            (student.future_goal)
                        }
                    }
                }

                div class="bg-gray-800 border-l-4 border-amber-300 rounded p-6" {
                    h2 class="text-sm uppercase tracking-wide text-gray-400 mb-2" {"Final Words"}
                    blockquote class="italic text-gray-200 whitespace-pre-line" {(student.final_words)}
                }
            }
        }
    }
}
