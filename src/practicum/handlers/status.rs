use std::{fmt, str::FromStr};

use serde_json::Value;

use super::{HomeworkError, HomeworkResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [Self::Approved, Self::Reviewing, Self::Rejected];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    pub fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = HomeworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| HomeworkError::UnknownStatus(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkRecord<'a> {
    pub homework_name: &'a str,
    pub status: HomeworkStatus,
}

impl<'a> TryFrom<&'a Value> for HomeworkRecord<'a> {
    type Error = HomeworkError;

    fn try_from(record: &'a Value) -> HomeworkResult<Self> {
        let Some(fields) = record.as_object() else {
            return Err(HomeworkError::Shape("запись о работе не является словарём"));
        };

        // Both keys are checked on their own; `status` wins when both are gone.
        let status = fields
            .get("status")
            .ok_or(HomeworkError::MissingField("status"))?;
        let homework_name = fields
            .get("homework_name")
            .ok_or(HomeworkError::MissingField("homework_name"))?;

        let homework_name = homework_name
            .as_str()
            .ok_or(HomeworkError::Shape("имя работы не является строкой"))?;
        let status = match status.as_str() {
            Some(status) => status.parse::<HomeworkStatus>()?,
            None => return Err(HomeworkError::UnknownStatus(status.to_string())),
        };

        Ok(Self {
            homework_name,
            status,
        })
    }
}

impl fmt::Display for HomeworkRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Изменился статус проверки работы \"{}\". {}",
            self.homework_name,
            self.status.verdict()
        )
    }
}

/// Turns one homework record into the text sent to the chat.
pub fn interpret(record: &Value) -> HomeworkResult<String> {
    HomeworkRecord::try_from(record).map(|record| record.to_string())
}
