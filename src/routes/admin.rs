use crate::{
    auth::{AuthUtilities, ShowcaseSession},
    data::{
        DataType,
        department::Department,
        photo::{NewPhoto, key_from_public_url, remove_photo},
        student::{NewStudent, Student, StudentOrder, filter_by_name},
    },
    error::{MissingStudentSnafu, MultipartSnafu, ShowcaseError, ShowcaseResult},
    maud_conveniences::{
        Notice, errors_list, form_element, form_submit_button, simple_form_element, title,
    },
    routes::department::SearchQuery,
    seed::{DEMO_SEED_COUNT, seed_students},
    state::ShowcaseState,
};
use axum::{
    Form,
    extract::{Multipart, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use bitflags::bitflags;
use maud::{Markup, Render, html};
use serde::Deserialize;
use snafu::{OptionExt, ResultExt};
use time::OffsetDateTime;
use uuid::Uuid;

const MISSING_FIELDS_MESSAGE: &str = "Please fill all fields and select an image";
const CREATE_FAILED_MESSAGE: &str = "Error uploading student. Please try again.";
const DELETE_FAILED_MESSAGE: &str = "Error deleting student. Please try again.";
const FETCH_FAILED_MESSAGE: &str = "Error fetching students";
const SEED_FAILED_MESSAGE: &str = "Error seeding dummy data";

///shows the chosen file under the input before anything is uploaded
const PHOTO_PREVIEW_SCRIPT: &str = "const preview = document.getElementById('photo_preview'); const file = this.files[0]; if (file) { preview.src = URL.createObjectURL(file); preview.classList.remove('hidden'); } else { preview.removeAttribute('src'); preview.classList.add('hidden'); }";

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct NewStudentErrors: u8 {
        const EMPTY_NAME =         0b0000_0001;
        const MISSING_PHOTO =      0b0000_0010;
        const UNKNOWN_DEPARTMENT = 0b0000_0100;
    }
}

impl NewStudentErrors {
    pub fn as_nice_list(&self) -> impl Iterator<Item = &'static str> {
        self.iter().filter_map(|x| match x {
            Self::EMPTY_NAME => Some("Provided name was empty"),
            Self::MISSING_PHOTO => Some("No photo was selected"),
            Self::UNKNOWN_DEPARTMENT => Some("Selected department doesn't exist"),
            _ => None,
        })
    }
}

/// Everything the new student form sends, before any checks.
#[derive(Debug, Default)]
pub struct StudentDraft {
    pub name: String,
    pub department: String,
    pub future_goal: String,
    pub final_words: String,
    pub photo: Option<NewPhoto>,
    ///the admin list's search box, so the refreshed list keeps its filter
    pub q: String,
}

impl StudentDraft {
    pub async fn from_multipart(mut multipart: Multipart) -> ShowcaseResult<Self> {
        let mut draft = Self::default();

        while let Some(field) = multipart.next_field().await.context(MultipartSnafu)? {
            let field_name = field.name().unwrap_or_default().to_string();

            match field_name.as_str() {
                "photo" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.context(MultipartSnafu)?;
                    //an untouched file input still sends an empty part
                    if !bytes.is_empty() {
                        draft.photo = Some(NewPhoto {
                            file_name,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                "name" => draft.name = field.text().await.context(MultipartSnafu)?,
                "department" => draft.department = field.text().await.context(MultipartSnafu)?,
                "future_goal" => draft.future_goal = field.text().await.context(MultipartSnafu)?,
                "final_words" => draft.final_words = field.text().await.context(MultipartSnafu)?,
                "q" => draft.q = field.text().await.context(MultipartSnafu)?,
                _ => debug!(?field_name, "Ignoring unknown field in new student form"),
            }
        }

        Ok(draft)
    }

    ///takes the photo out of the draft, the rest stays around for re-rendering the form.
    ///text is stored exactly as typed, trimming only decides whether the name is blank
    pub fn check(&mut self) -> Result<(NewStudent, NewPhoto), NewStudentErrors> {
        let department = self.department.parse::<Department>().ok();
        let photo = self.photo.take();

        let mut errors = NewStudentErrors::empty();
        if self.name.trim().is_empty() {
            errors |= NewStudentErrors::EMPTY_NAME;
        }
        if department.is_none() {
            errors |= NewStudentErrors::UNKNOWN_DEPARTMENT;
        }
        if photo.is_none() {
            errors |= NewStudentErrors::MISSING_PHOTO;
        }

        match (department, photo) {
            (Some(department), Some(photo)) if errors.is_empty() => Ok((
                NewStudent {
                    name: self.name.clone(),
                    department,
                    future_goal: self.future_goal.clone(),
                    final_words: self.final_words.clone(),
                    image_url: String::new(),
                },
                photo,
            )),
            _ => Err(errors),
        }
    }
}

#[derive(Deserialize)]
pub struct DeleteStudentQuery {
    pub id: Uuid,
    #[serde(default)]
    pub q: String,
}

pub async fn get_admin(State(state): State<ShowcaseState>, session: ShowcaseSession) -> Response {
    if !session.is_admin() {
        return Redirect::to("/admin/login").into_response();
    }

    let list = student_list_or_notice(load_students(&state).await, "");

    state
        .render(&session, html! {
            section class="py-12 px-4" {
                div class="max-w-6xl mx-auto grid grid-cols-1 lg:grid-cols-3 gap-8" {
                    div class="bg-gray-800 rounded-lg shadow-md p-6 h-fit" {
                        (title("Add New Student"))
                        div id="new_student_section" {
                            (new_student_form(None, None, NewStudentErrors::empty()))
                        }
                    }
                    div class="bg-gray-800 rounded-lg shadow-md p-6 lg:col-span-2" id="student_management" {
                        (management_panel(None, "", list))
                    }
                }
            }
        })
        .into_response()
}

pub async fn internal_get_students(
    State(state): State<ShowcaseState>,
    session: ShowcaseSession,
    Query(SearchQuery { q }): Query<SearchQuery>,
) -> ShowcaseResult<Markup> {
    session.ensure_admin()?;

    Ok(student_list_or_notice(load_students(&state).await, q.trim()))
}

pub async fn internal_post_new_student(
    State(state): State<ShowcaseState>,
    session: ShowcaseSession,
    multipart: Multipart,
) -> ShowcaseResult<Markup> {
    session.ensure_admin()?;

    let mut draft = StudentDraft::from_multipart(multipart).await?;
    let (student, photo) = match draft.check() {
        Ok(x) => x,
        Err(errors) => {
            return Ok(new_student_form(
                Some(&draft),
                Some(Notice::failure(MISSING_FIELDS_MESSAGE)),
                errors,
            ));
        }
    };

    let form = match add_student(&state, student, photo).await {
        Ok(id) => {
            info!(%id, name = %draft.name.trim(), "Added student");
            new_student_form(
                None,
                Some(Notice::success("✓ Student added successfully!")),
                NewStudentErrors::empty(),
            )
        }
        Err(e) => {
            error!(?e, "Unable to add student");
            let message = match &e {
                ShowcaseError::NotAnImage { .. } => {
                    "The selected file isn't an image. Please choose a photo."
                }
                _ => e.hint().describe(CREATE_FAILED_MESSAGE),
            };
            //nothing changed, so the list can stay as it is
            return Ok(new_student_form(
                Some(&draft),
                Some(Notice::failure(message)),
                NewStudentErrors::empty(),
            ));
        }
    };

    let list = student_list_or_notice(load_students(&state).await, draft.q.trim());
    Ok(html! {
        (form)
        div hx-swap-oob="outerHTML:#student_list" id="student_list" {
            (list)
        }
    })
}

pub async fn internal_delete_student(
    State(state): State<ShowcaseState>,
    session: ShowcaseSession,
    Query(DeleteStudentQuery { id, q }): Query<DeleteStudentQuery>,
) -> ShowcaseResult<Markup> {
    session.ensure_admin()?;

    let notice = match delete_student(&state, id).await {
        Ok(()) => {
            info!(%id, "Deleted student");
            Notice::success("✓ Student deleted successfully!")
        }
        Err(e) => {
            error!(?e, %id, "Unable to delete student");
            Notice::failure(e.hint().describe(DELETE_FAILED_MESSAGE))
        }
    };

    let list = student_list_or_notice(load_students(&state).await, q.trim());
    Ok(management_panel(Some(notice), q.trim(), list))
}

pub async fn internal_post_seed(
    State(state): State<ShowcaseState>,
    session: ShowcaseSession,
    Form(SearchQuery { q }): Form<SearchQuery>,
) -> ShowcaseResult<Markup> {
    session.ensure_admin()?;

    let notice = match state.get_connection().await {
        Ok(mut conn) => {
            let report = seed_students(&mut *conn, DEMO_SEED_COUNT, None).await;
            info!(?report, "Seeded demo students");

            if report.added == 0 && report.failed > 0 {
                Notice::failure(SEED_FAILED_MESSAGE)
            } else {
                Notice::success(format!(
                    "✓ Successfully added {} dummy students!",
                    report.added
                ))
            }
        }
        Err(e) => {
            error!(?e, "Unable to seed demo students");
            Notice::failure(SEED_FAILED_MESSAGE)
        }
    };

    let list = student_list_or_notice(load_students(&state).await, q.trim());
    Ok(management_panel(Some(notice), q.trim(), list))
}

///uploads the photo first, and takes it back down if the row can't be written
async fn add_student(
    state: &ShowcaseState,
    mut student: NewStudent,
    photo: NewPhoto,
) -> ShowcaseResult<Uuid> {
    let storage = state.config().storage_config();
    let stored = photo.upload(&storage, OffsetDateTime::now_utc()).await?;
    student.image_url = stored.public_url;

    let inserted = Student::insert_into_database(student, &mut *state.get_connection().await?).await;
    if inserted.is_err() {
        if let Err(e) = remove_photo(&storage, &stored.key).await {
            warn!(?e, key = %stored.key, "Unable to remove orphaned photo");
        }
    }

    inserted
}

async fn delete_student(state: &ShowcaseState, id: Uuid) -> ShowcaseResult<()> {
    let mut conn = state.get_connection().await?;
    let student = Student::get_from_db_by_id(id, &mut conn)
        .await?
        .context(MissingStudentSnafu { id })?;

    let storage = state.config().storage_config();
    if let Some(key) = key_from_public_url(storage.public_base(), &student.image_url) {
        if let Err(e) = remove_photo(&storage, key).await {
            warn!(?e, %key, "Unable to remove student photo, deleting the record anyway");
        }
    }

    Student::remove_from_database(id, &mut conn).await
}

async fn load_students(state: &ShowcaseState) -> ShowcaseResult<Vec<Student>> {
    Student::get_all_ordered(StudentOrder::NewestFirst, &mut *state.get_connection().await?).await
}

fn student_list_or_notice(students: ShowcaseResult<Vec<Student>>, q: &str) -> Markup {
    match students {
        Ok(students) => student_list(&students, q),
        Err(e) => {
            error!(?e, "Unable to fetch students");
            Notice::failure(e.hint().describe(FETCH_FAILED_MESSAGE)).render()
        }
    }
}

fn new_student_form(
    draft: Option<&StudentDraft>,
    notice: Option<Notice>,
    errors: NewStudentErrors,
) -> Markup {
    let selected_department = draft
        .and_then(|d| d.department.parse::<Department>().ok())
        .unwrap_or(Department::Medicine);
    let text_area_class = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600 text-gray-100";

    html! {
        @if let Some(notice) = notice {
            (notice)
        }
        @if !errors.is_empty() {
            (errors_list(None, errors.as_nice_list()))
        }

        form hx-post="/internal/admin/students" hx-encoding="multipart/form-data" hx-target="#new_student_section" hx-include="#student_search" hx-disabled-elt="find button" {
            (simple_form_element("name", "Full Name", true, None, draft.map(|d| d.name.as_str())))
            (form_element("department", "Department", html! {
                select id="department" name="department" class=(text_area_class) {
                    @for dept in Department::ALL {
                        option value=(dept.name()) selected[dept == selected_department] {(dept.name())}
                    }
                }
            }))
            (simple_form_element("future_goal", "Future Goal", false, None, draft.map(|d| d.future_goal.as_str())))
            (form_element("final_words", "Final Words", html! {
                textarea id="final_words" name="final_words" rows="4" class=(text_area_class) {
                    @if let Some(draft) = draft {
                        (draft.final_words)
                    }
                }
            }))
            (form_element("photo", "Photo", html! {
                input id="photo" name="photo" type="file" accept="image/*" required onchange=(PHOTO_PREVIEW_SCRIPT) class="block w-full text-sm text-gray-300 file:mr-4 file:py-2 file:px-4 file:rounded file:border-0 file:bg-amber-400 file:text-gray-900" {}
                img id="photo_preview" alt="Selected photo" class="hidden mt-4 w-full h-48 object-cover rounded";
            }))
            (form_submit_button(Some("Add Student")))
        }
    }
}

fn management_panel(notice: Option<Notice>, q: &str, list: Markup) -> Markup {
    html! {
        div class="flex flex-row items-center justify-between mb-4" {
            (title("Students"))
            button hx-post="/internal/admin/seed" hx-target="#student_management" hx-include="#student_search" hx-disabled-elt="this" class="bg-amber-400 hover:bg-amber-300 text-gray-900 font-bold py-2 px-4 rounded" {
                "Seed " (DEMO_SEED_COUNT) " Dummy Students"
            }
        }
        @if let Some(notice) = notice {
            (notice)
        }
        input id="student_search" type="search" name="q" value=(q) placeholder="Search by name..."
            hx-get="/internal/admin/students"
            hx-trigger="input changed delay:200ms, search"
            hx-target="#student_list"
            class="w-full mb-4 px-4 py-2 bg-gray-700 border border-gray-600 rounded text-gray-100 placeholder-gray-400 focus:outline-none focus:border-amber-300";
        div id="student_list" {
            (list)
        }
    }
}

fn student_list(students: &[Student], q: &str) -> Markup {
    let filtered = filter_by_name(students, q);

    html! {
        h3 class="text-xl font-semibold mb-2" {"Manage Students (" (filtered.len()) ")"}
        @if !q.is_empty() {
            p class="text-sm text-gray-400 mb-2" {"Showing " (filtered.len()) " of " (students.len())}
        }

        @if students.is_empty() {
            p class="text-gray-400 py-8 text-center" {"No students added yet"}
        } @else if filtered.is_empty() {
            p class="text-gray-400 py-8 text-center" {"No students found matching your search."}
        } @else {
            div class="overflow-x-auto" {
                table class="w-full text-left" {
                    thead class="border-b border-gray-700 text-gray-400" {
                        tr {
                            th class="py-2 pr-4" {"Name"}
                            th class="py-2 pr-4" {"Department"}
                            th class="py-2 pr-4" {"Future Goal"}
                            th class="py-2" {"Action"}
                        }
                    }
                    tbody {
                        @for student in filtered {
                            tr class="border-b border-gray-700/50" {
                                td class="py-2 pr-4" {
                                    a href={"/student/" (student.id)} class="hover:text-amber-300" {(student.name)}
                                }
                                td class="py-2 pr-4" {(student.department)}
                                td class="py-2 pr-4" {(student.future_goal)}
                                td class="py-2" {
                                    button
                                        hx-delete={"/internal/admin/students?id=" (student.id)}
                                        hx-confirm={"Are you sure you want to delete " (student.name) "?"}
                                        hx-include="#student_search"
                                        hx-target="#student_management"
                                        class="bg-red-600 hover:bg-red-500 text-white text-sm py-1 px-3 rounded" {
                                        "Delete"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
