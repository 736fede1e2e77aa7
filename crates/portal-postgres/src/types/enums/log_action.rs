use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Session boundary recorded in the audit log.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::LogAction"]
pub enum LogAction {
    #[db_rename = "login"]
    #[serde(rename = "Login")]
    #[strum(serialize = "Login")]
    Login,

    #[db_rename = "logout"]
    #[serde(rename = "Logout")]
    #[strum(serialize = "Logout")]
    Logout,
}
