use crate::{
    auth::ShowcaseSession,
    data::department::Department,
    maud_conveniences::{department_card, supertitle},
    state::ShowcaseState,
};
use axum::extract::State;
use maud::{Markup, html};

pub async fn get_departments(State(state): State<ShowcaseState>, session: ShowcaseSession) -> Markup {
    state.render(&session, html! {
        section class="py-16 px-4 bg-gradient-to-b from-gray-800 to-gray-900" {
            (supertitle("Academic Departments"))
            p class="text-center text-gray-300 text-lg" {
                "Browse " (Department::ALL.len()) " departments and view graduating students."
            }
        }

        section class="py-12 px-4" {
            div class="max-w-6xl mx-auto grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-6" {
                @for dept in Department::ALL {
                    (department_card(dept))
                }
            }
        }
    })
}
