use serde::Serialize;
use strum_macros::{AsRefStr, EnumIter, EnumString};
use utoipa::ToSchema;

/// Fields that may be edited one at a time. Anything else is ignored.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, AsRefStr, EnumString, EnumIter, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WritableField {
    #[strum(to_string = "emp_code", serialize = "empCode")]
    EmpCode,
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "division")]
    Division,
    #[strum(serialize = "designation")]
    Designation,
    #[strum(serialize = "hq")]
    Hq,
    #[strum(to_string = "resigned_date", serialize = "resignedDate")]
    ResignedDate,
    #[strum(serialize = "vacancy")]
    Vacancy,
    #[strum(serialize = "remarks")]
    Remarks,
}

impl WritableField {
    /// Column in `employees_flat`.
    pub fn column(self) -> &'static str {
        match self {
            WritableField::EmpCode => "emp_code",
            WritableField::Name => "name",
            WritableField::Division => "division",
            WritableField::Designation => "designation",
            WritableField::Hq => "hq",
            WritableField::ResignedDate => "resigned_date",
            WritableField::Vacancy => "vacancy",
            WritableField::Remarks => "remarks",
        }
    }

    /// Returns `None` for names outside the allow-list.
    pub fn parse(name: &str) -> Option<Self> {
        name.trim().parse().ok()
    }
}
