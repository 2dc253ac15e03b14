use crate::data::{
    department::Department,
    student::Student,
};
use maud::{Markup, Render, html};

pub fn supertitle(s: impl Render) -> Markup {
    html! {
        h1 class="text-4xl md:text-5xl font-bold mb-4 text-amber-300 text-center" {(s)}
    }
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h2 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn form_element(id: &'static str, label: &'static str, element: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (element)
        }
    }
}

pub fn simple_form_element(
    id: &'static str,
    label: &'static str,
    required: bool,
    input_type: Option<&'static str>,
    value: Option<&str>,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            input id=(id) name=(id) type=(input_type.unwrap_or("text")) required[required] value=[value] class="shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600 text-gray-100" {}
        },
    )
}

pub fn form_submit_button(text: Option<&'static str>) -> Markup {
    html! {
        div class="flex items-center justify-between" {
            button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                (text.unwrap_or("Submit"))
            }
        }
    }
}

pub fn errors_list(heading: Option<&str>, errors: impl Iterator<Item = impl Render>) -> Markup {
    html! {
        div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
            @if let Some(heading) = heading {
                strong class="font-bold" {(heading)}
            }
            ul class="list-disc list-inside" {
                @for error in errors {
                    li {(error)}
                }
            }
        }
    }
}

/// A one-line outcome shown above a form or list.
#[derive(Debug, Clone)]
pub enum Notice {
    Success(String),
    Failure(String),
}

impl Notice {
    pub fn success(s: impl Into<String>) -> Self {
        Self::Success(s.into())
    }

    pub fn failure(s: impl Into<String>) -> Self {
        Self::Failure(s.into())
    }
}

impl Render for Notice {
    fn render(&self) -> Markup {
        match self {
            Self::Success(msg) => html! {
                p class="text-sm font-semibold text-emerald-400 mb-4" role="status" {(msg)}
            },
            Self::Failure(msg) => html! {
                p class="text-sm font-semibold text-red-400 mb-4" role="alert" {(msg)}
            },
        }
    }
}

pub fn render_nav(is_admin: bool) -> Markup {
    html! {
        nav class="w-full bg-gray-800/95 border-b border-gray-700 sticky top-0 z-40" {
            div class="max-w-6xl mx-auto px-4 py-4 flex flex-row items-center justify-between" {
                a href="/" class="text-amber-300 font-bold hover:text-amber-200" {"Graduating Class Showcase"}
                div class="flex flex-row space-x-4 items-center" {
                    a href="/departments" class="hover:text-amber-200" {"Departments"}
                    a href="/admin" class="hover:text-amber-200" {"Admin Panel"}
                    @if is_admin {
                        form method="post" action="/admin/logout" {
                            button type="submit" class="border border-amber-300 text-amber-300 hover:bg-amber-300/10 py-1 px-3 rounded" {"Logout"}
                        }
                    }
                }
            }
        }
    }
}

pub fn department_card(dept: Department) -> Markup {
    html! {
        a href={"/department/" (dept.slug())} class="group relative block h-56 rounded-2xl overflow-hidden border border-gray-700 bg-gray-800 hover:border-amber-300/60 shadow-md" {
            div class={"absolute inset-0 bg-gradient-to-br " (dept.accent())} {}
            div class="relative h-full p-6 flex flex-col" {
                h3 class="text-2xl font-bold" {(dept.name())}
                p class="mt-2 text-gray-200" {(dept.blurb())}
                div class="mt-auto flex items-center justify-between text-sm text-gray-200" {
                    span {"View students"}
                    span class="transition-transform group-hover:translate-x-1" {"→"}
                }
            }
        }
    }
}

pub fn student_card(student: &Student) -> Markup {
    html! {
        a href={"/student/" (student.id)} class="block rounded-xl overflow-hidden bg-gray-800 border border-gray-700 hover:border-amber-300/60 shadow-md" {
            @if !student.image_url.is_empty() {
                img src=(student.image_url) alt=(student.name) class="w-full h-64 object-cover" loading="lazy";
            }
            div class="p-4" {
                h3 class="text-lg font-semibold" {(student.name)}
                p class="text-sm text-amber-300" {(student.department)}
                p class="text-sm text-gray-300 mt-2" {
                    span class="font-semibold" {"Future Goal: "}
                    (student.future_goal)
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
    fn student_cards_escape_names() {
        let mut s = student("<script>alert(1)</script>", Department::Nursing);
        s.future_goal = "Nurse & Educator".into();
        let rendered = student_card(&s).into_string();

        assert!(!rendered.contains("<script>"));
        assert!(rendered.contains("&lt;script&gt;"));
        assert!(rendered.contains("Nurse &amp; Educator"));
        assert!(rendered.contains(&format!("/student/{}", s.id)));
    }

    #[test]
    fn department_cards_link_to_slugs() {
        let rendered = department_card(Department::MedicalLaboratory).into_string();
        assert!(rendered.contains("href=\"/department/medical-laboratory\""));
        assert!(rendered.contains("Discovery, diagnostics, and precision"));
    }
}
