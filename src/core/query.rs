//! core::query
//!
//! Vacancy search query construction.
//!
//! Turns search-form filters into the parameter list expected by the
//! downstream vacancy search API. Free-form `area` and `metro` fields are
//! resolved to identifier lists; list-valued parameters become one pair per
//! identifier. No HTTP is performed here.
//!
//! # Example
//!
//! ```
//! use georesolve::core::query::{SearchFilters, VacancyQuery};
//! use georesolve::core::resolver::AreaResolver;
//! use georesolve::core::tree::AreaNode;
//!
//! let areas = AreaResolver::from_forest(&[AreaNode::leaf("1", "Москва")]);
//! let filters = SearchFilters {
//!     text: Some("rust".into()),
//!     area: Some("г. Москва".into()),
//!     ..Default::default()
//! };
//!
//! let query = VacancyQuery::build(&filters, Some(&areas), None);
//! assert!(query.to_pairs().contains(&("area".to_string(), "1".to_string())));
//! ```

use serde::{Deserialize, Serialize};

use super::resolver::{AreaResolver, MetroResolver};

/// Declares a downstream enumeration with its wire values.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All accepted wire values.
            pub const VALUES: &'static [&'static str] = &[$($wire),+];

            /// Parse a wire value; unknown values yield `None`.
            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// The wire value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }
    };
}

wire_enum! {
    /// Required work experience.
    Experience {
        NoExperience => "noExperience",
        OneToThree => "between1And3",
        ThreeToSix => "between3And6",
        MoreThanSix => "moreThan6",
    }
}

wire_enum! {
    /// Employment form.
    EmploymentForm {
        Full => "FULL",
        Part => "PART",
        Project => "PROJECT",
        FlyInFlyOut => "FLY_IN_FLY_OUT",
    }
}

wire_enum! {
    /// Working schedule.
    Schedule {
        FullDay => "fullDay",
        Shift => "shift",
        Flexible => "flexible",
        Remote => "remote",
    }
}

wire_enum! {
    /// Work format.
    WorkFormat {
        OnSite => "ON_SITE",
        Remote => "REMOTE",
        Hybrid => "HYBRID",
        FieldWork => "FIELD_WORK",
    }
}

wire_enum! {
    /// Required education level.
    Education {
        NotRequired => "not_required_or_not_specified",
        SpecialSecondary => "special_secondary",
        Higher => "higher",
    }
}

/// Raw search-form fields, as submitted by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub page: u32,
    pub per_page: u32,
    pub text: Option<String>,
    pub experience: Option<String>,
    pub employment_form: Option<String>,
    pub work_format: Option<String>,
    pub schedule: Option<String>,
    /// Free-form area name
    pub area: Option<String>,
    /// Free-form metro station name
    pub metro: Option<String>,
    pub salary: Option<String>,
    pub currency: Option<String>,
    pub education: Option<String>,
    pub only_with_salary: bool,
    pub premium: bool,
    pub responses_count_enabled: bool,
    pub no_magic: bool,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: 20,
            text: None,
            experience: None,
            employment_form: None,
            work_format: None,
            schedule: None,
            area: None,
            metro: None,
            salary: None,
            currency: None,
            education: None,
            only_with_salary: false,
            premium: false,
            responses_count_enabled: true,
            no_magic: true,
        }
    }
}

/// A parameter value: a single value or a list of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    One(String),
    Many(Vec<String>),
}

/// One named query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParam {
    pub key: &'static str,
    pub value: ParamValue,
}

/// Ordered parameters for a vacancy search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VacancyQuery {
    params: Vec<QueryParam>,
}

impl VacancyQuery {
    /// Build the query from form filters.
    ///
    /// Empty text fields and unknown enumeration values are omitted. `area`
    /// always resolves to something (the area fallback applies); `metro` is
    /// omitted when no station matches. Without a resolver the corresponding
    /// field is ignored.
    pub fn build(
        filters: &SearchFilters,
        areas: Option<&AreaResolver>,
        metro: Option<&MetroResolver>,
    ) -> Self {
        let mut query = VacancyQuery::default();

        query.push_text("text", filters.text.as_deref());
        query.push_enum("experience", filters.experience.as_deref(), Experience::parse, Experience::as_str);
        query.push_enum(
            "employment_form",
            filters.employment_form.as_deref(),
            EmploymentForm::parse,
            EmploymentForm::as_str,
        );
        query.push_enum("schedule", filters.schedule.as_deref(), Schedule::parse, Schedule::as_str);

        if let (Some(area), Some(resolver)) = (non_empty(filters.area.as_deref()), areas) {
            query.push_many("area", resolver.resolve(area));
        }

        query.push_text("salary", filters.salary.as_deref());
        query.push_text("currency", filters.currency.as_deref());

        if let (Some(station), Some(resolver)) = (non_empty(filters.metro.as_deref()), metro) {
            query.push_many("metro", resolver.resolve(station));
        }

        query.push_enum("education", filters.education.as_deref(), Education::parse, Education::as_str);
        query.push_enum(
            "work_format",
            filters.work_format.as_deref(),
            WorkFormat::parse,
            WorkFormat::as_str,
        );

        if filters.premium {
            query.push_one("premium", "true");
        }
        if filters.only_with_salary {
            query.push_one("only_with_salary", "true");
        }
        if !filters.responses_count_enabled {
            query.push_one("responses_count_enabled", "false");
        }

        query.push_one("page", filters.page.to_string());
        query.push_one("per_page", filters.per_page.to_string());
        query.push_one("no_magic", filters.no_magic.to_string());

        query
    }

    /// The parameters in insertion order.
    pub fn params(&self) -> &[QueryParam] {
        &self.params
    }

    /// Value of the first parameter named `key`.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.iter().find(|p| p.key == key).map(|p| &p.value)
    }

    /// Flatten into `(key, value)` pairs, one pair per list element.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for param in &self.params {
            match &param.value {
                ParamValue::One(v) => pairs.push((param.key.to_string(), v.clone())),
                ParamValue::Many(vs) => {
                    pairs.extend(vs.iter().map(|v| (param.key.to_string(), v.clone())))
                }
            }
        }
        pairs
    }

    fn push_one(&mut self, key: &'static str, value: impl Into<String>) {
        self.params.push(QueryParam {
            key,
            value: ParamValue::One(value.into()),
        });
    }

    fn push_many(&mut self, key: &'static str, values: Vec<String>) {
        if !values.is_empty() {
            self.params.push(QueryParam {
                key,
                value: ParamValue::Many(values),
            });
        }
    }

    fn push_text(&mut self, key: &'static str, value: Option<&str>) {
        if let Some(v) = non_empty(value) {
            self.push_one(key, v);
        }
    }

    fn push_enum<T>(
        &mut self,
        key: &'static str,
        value: Option<&str>,
        parse: fn(&str) -> Option<T>,
        wire: fn(T) -> &'static str,
    ) {
        if let Some(v) = non_empty(value).and_then(parse) {
            self.push_one(key, wire(v));
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
