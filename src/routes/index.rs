use crate::{
    auth::ShowcaseSession,
    data::{department::Department, student::Student},
    error::ShowcaseResult,
    maud_conveniences::{department_card, supertitle, title},
    state::ShowcaseState,
};
use axum::extract::State;
use maud::{Markup, html};

pub async fn get_index_route(
    State(state): State<ShowcaseState>,
    session: ShowcaseSession,
) -> ShowcaseResult<Markup> {
    let student_count = Student::count(&mut *state.get_connection().await?).await?;

    Ok(state.render(&session, html! {
        section class="py-24 px-4 bg-gradient-to-b from-gray-800 to-gray-900" {
            div class="max-w-4xl mx-auto text-center" {
                (supertitle("Class of Graduates"))
                p class="text-lg text-gray-300 mb-8" {
                    "Graduating Class Student Showcase - explore departments, meet the graduates, and read the messages they leave behind."
                }
                div class="flex flex-row space-x-4 justify-center" {
                    a href="/departments" class="bg-amber-400 hover:bg-amber-300 text-gray-900 font-bold py-3 px-6 rounded" {
                        "Explore Departments"
                    }
                    a href="/admin" class="border border-amber-300 text-amber-300 hover:bg-amber-300/10 font-bold py-3 px-6 rounded" {
                        "Admin Panel"
                    }
                }
            }
        }

        section class="py-12 px-4" {
            div class="max-w-4xl mx-auto grid grid-cols-2 gap-6 text-center" {
                div class="bg-gray-800 rounded-lg p-6" {
                    p class="text-4xl font-bold text-amber-300" {(student_count)}
                    p class="text-gray-300" {"Graduating Students"}
                }
                div class="bg-gray-800 rounded-lg p-6" {
                    p class="text-4xl font-bold text-amber-300" {(Department::ALL.len())}
                    p class="text-gray-300" {"Departments"}
                }
            }
        }

        section class="py-12 px-4" {
            div class="max-w-6xl mx-auto" {
                (title("Departments"))
                div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-6" {
                    @for dept in Department::ALL {
                        (department_card(dept))
                    }
                }
            }
        }
    }))
}
