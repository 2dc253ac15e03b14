use crate::error::{ShowcaseError, UnknownDepartmentSnafu};
use snafu::OptionExt;
use std::str::FromStr;

pub const FALLBACK_BLURB: &str = "Explore students and their final words";
pub const FALLBACK_ACCENT: &str = "from-slate-500/25 to-gray-500/20";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Department {
    Medicine,
    Nursing,
    MedicalLaboratory,
    Midwifery,
}

impl Department {
    pub const ALL: [Self; 4] = [
        Self::Medicine,
        Self::Nursing,
        Self::MedicalLaboratory,
        Self::Midwifery,
    ];

    ///what gets stored in the `department` column
    pub const fn name(self) -> &'static str {
        match self {
            Self::Medicine => "Medicine",
            Self::Nursing => "Nursing",
            Self::MedicalLaboratory => "Medical Laboratory",
            Self::Midwifery => "Midwifery",
        }
    }

    pub fn slug(self) -> String {
        slugify(self.name())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dept| dept.name() == name)
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::from_name(&display_name_from_slug(slug))
    }

    pub const fn blurb(self) -> &'static str {
        match self {
            Self::Medicine => "Clinical excellence and compassionate care",
            Self::Nursing => "Professional practice with heart",
            Self::MedicalLaboratory => "Discovery, diagnostics, and precision",
            Self::Midwifery => "Safe births and maternal wellbeing",
        }
    }

    ///tailwind gradient stops for the department card
    pub const fn accent(self) -> &'static str {
        match self {
            Self::Medicine => "from-emerald-500/25 to-cyan-500/20",
            Self::Nursing => "from-rose-500/25 to-amber-500/20",
            Self::MedicalLaboratory => "from-violet-500/25 to-indigo-500/20",
            Self::Midwifery => "from-sky-500/25 to-fuchsia-500/20",
        }
    }
}

impl FromStr for Department {
    type Err = ShowcaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).context(UnknownDepartmentSnafu { name: s })
    }
}

pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// `medical-laboratory` -> `Medical Laboratory`. Only the first letter of each word is touched.
pub fn display_name_from_slug(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
